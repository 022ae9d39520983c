use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;

use anyhow::{
    bail,
    Context,
};
use biotsv::prelude::*;
use clap::Args;
use log::info;
use serde::Deserialize;

use crate::utils::{
    is_stdin,
    parse_column,
    unescape,
    validate_input,
    validate_output,
    PipelineCommand,
};

/// Option sets loadable from a JSON file with `--config`.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ConvertConfig {
    reader: ReaderOptions,
    writer: WriterOptions,
    head:   HeadOptions,
}

#[derive(Args, Debug, Clone)]
pub(crate) struct ConvertArgs {
    #[arg(help = "Path of the input file.")]
    input: PathBuf,

    #[arg(
        short = 'o',
        long,
        required = true,
        help = "Path for the generated output file. A .gz suffix compresses it."
    )]
    output: PathBuf,

    #[arg(long, help = "JSON file with \"reader\", \"writer\" and \"head\" option sets.")]
    config: Option<PathBuf>,

    #[arg(long, help = "Input format: bed, bed12, bedpe, bedx, head or nometa.")]
    from: Option<String>,

    #[arg(long, help = "Output format: bed, nometa, or \"reader\" to keep the input columns.")]
    to: Option<String>,

    #[arg(
        long,
        value_delimiter = ',',
        value_parser = parse_column,
        help = "Input columns as NAME or NAME:conv (conv is str, int or float)."
    )]
    cnames: Vec<Column>,

    #[arg(
        long,
        value_delimiter = ',',
        value_parser = parse_column,
        help = "Output columns, same syntax as --cnames."
    )]
    out_cnames: Vec<Column>,

    #[arg(long, help = "Number of leading non-comment lines to drop.")]
    skip: Option<usize>,

    #[arg(long, help = "Comment prefix of the input. Empty disables comments.")]
    comment: Option<String>,

    #[arg(short = 'd', long, help = "Input delimiter; escapes like \\t are understood.")]
    delimit: Option<String>,

    #[arg(short = 'D', long, help = "Output delimiter; the input delimiter by default.")]
    out_delimit: Option<String>,

    #[arg(long, default_value_t = false, help = "Do not write a header line.")]
    no_head: bool,

    #[arg(long, help = "Prefix of the header line, e.g. '#'.")]
    head_prefix: Option<String>,

    #[arg(long, default_value_t = false, help = "Drop rows whose fields are all empty.")]
    drop_empty: bool,
}

impl ConvertArgs {
    fn load_config(&self) -> anyhow::Result<ConvertConfig> {
        match self.config.as_ref() {
            Some(path) => {
                let handle = File::open(path)
                    .with_context(|| format!("Failed to open {}", path.display()))?;
                serde_json::from_reader(BufReader::new(handle))
                    .with_context(|| format!("Failed to parse {}", path.display()))
            },
            None => Ok(ConvertConfig::default()),
        }
    }

    pub(crate) fn options(&self) -> anyhow::Result<(ReaderOptions, WriterOptions, HeadOptions)> {
        let ConvertConfig {
            mut reader,
            mut writer,
            mut head,
        } = self.load_config()?;

        if let Some(from) = self.from.as_deref() {
            reader = reader.with_ftype(from);
        }
        if !self.cnames.is_empty() {
            reader = reader.with_cnames(self.cnames.clone());
        }
        if let Some(skip) = self.skip {
            reader = reader.with_skip(skip);
        }
        if let Some(comment) = self.comment.as_deref() {
            reader = reader.with_comment(Some(comment));
        }
        if let Some(delimit) = self.delimit.as_deref() {
            let delimit = unescape(delimit);
            reader = reader.with_delimit(&delimit);
            writer = writer.with_delimit(&delimit);
        }

        if let Some(to) = self.to.as_deref() {
            writer = writer.with_ftype(to);
        }
        if !self.out_cnames.is_empty() {
            writer = writer.with_cnames(self.out_cnames.clone());
        }
        if let Some(delimit) = self.out_delimit.as_deref() {
            writer = writer.with_delimit(&unescape(delimit));
        }

        if self.no_head {
            head = head.with_head(false);
        }
        if let Some(prefix) = self.head_prefix.as_deref() {
            head = head.with_prefix(prefix);
        }
        Ok((reader, writer, head))
    }
}

impl PipelineCommand for ConvertArgs {
    fn run(&self) -> anyhow::Result<()> {
        let input = validate_input(&self.input)?;
        if is_stdin(&input) {
            bail!("convert needs a file input, standard input cannot be rewound");
        }
        let output = validate_output(&self.output)?;
        let (reader, writer, head) = self.options()?;

        let drop_empty = self.drop_empty;
        let written = tsv_ops(&input, &output, &reader, &writer, &head, |row| {
            if drop_empty && row.fields().iter().all(String::is_empty) {
                return Ok(None);
            }
            Ok(Some(row))
        })?;
        info!(
            "Converted {} into {} ({} rows)",
            input.display(),
            output.display(),
            written
        );
        Ok(())
    }
}
