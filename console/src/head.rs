use std::io::Read;
use std::path::PathBuf;

use biotsv::prelude::*;
use clap::Args;
use console::style;

use crate::utils::{
    is_stdin,
    parse_column,
    unescape,
    validate_input,
    PipelineCommand,
};

#[derive(Args, Debug, Clone)]
pub(crate) struct HeadArgs {
    #[arg(help = "Input file, '-' for standard input.")]
    input: PathBuf,

    #[arg(short = 'n', long, default_value_t = 10, help = "Number of rows to print.")]
    lines: usize,

    #[arg(long, help = "Input format: bed, bed12, bedpe, bedx, head or nometa.")]
    ftype: Option<String>,

    #[arg(
        long,
        value_delimiter = ',',
        value_parser = parse_column,
        help = "Columns as NAME or NAME:conv."
    )]
    cnames: Vec<Column>,

    #[arg(long, default_value_t = 0, help = "Number of leading non-comment lines to drop.")]
    skip: usize,

    #[arg(short = 'd', long, default_value = "\\t", help = "Input delimiter.")]
    delimit: String,
}

impl HeadArgs {
    fn options(&self) -> ReaderOptions {
        let mut options = ReaderOptions::default()
            .with_delimit(&unescape(&self.delimit))
            .with_skip(self.skip)
            .with_cnames(self.cnames.clone());
        if let Some(ftype) = self.ftype.as_deref() {
            options = options.with_ftype(ftype);
        }
        options
    }
}

impl PipelineCommand for HeadArgs {
    fn run(&self) -> anyhow::Result<()> {
        let input = validate_input(&self.input)?;
        let options = self.options();
        let mut reader = if is_stdin(&input) {
            let mut bytes = Vec::new();
            std::io::stdin().read_to_end(&mut bytes)?;
            TsvReader::from_bytes(bytes, &options)?
        }
        else {
            TsvReader::open(&input, &options)?
        };
        if reader.meta().is_empty() && reader.ftype() == FileType::Base {
            reader.auto_meta("COL")?;
        }

        println!(
            "{} {} {}",
            style("format").bold(),
            reader.ftype(),
            style(reader.meta()).cyan()
        );
        for row in reader.by_ref().take(self.lines) {
            println!("{}", row?);
        }
        reader.close();
        Ok(())
    }
}
