use std::path::PathBuf;

use biotsv::prelude::*;
use clap::Args;
use itertools::Itertools;
use log::info;

use crate::utils::{
    is_stdin,
    unescape,
    validate_input,
    validate_output,
    PipelineCommand,
};

#[derive(Args, Debug, Clone)]
pub(crate) struct JoinArgs {
    #[arg(
        value_parser,
        num_args = 2..,
        required = true,
        help = "Input files, each sorted ascending on its first column."
    )]
    files: Vec<PathBuf>,

    #[arg(
        short = 'o',
        long,
        default_value = "-",
        help = "Output file, standard output by default."
    )]
    output: PathBuf,

    #[arg(
        long,
        value_delimiter = ',',
        help = "Format of each input, in order. Missing entries read plain columns."
    )]
    ftype: Vec<String>,

    #[arg(
        long,
        value_delimiter = ',',
        help = "Leading lines to skip in each input, in order."
    )]
    skip: Vec<usize>,

    #[arg(short = 'd', long, default_value = "\\t", help = "Delimiter of inputs and output.")]
    delimit: String,
}

impl PipelineCommand for JoinArgs {
    fn run(&self) -> anyhow::Result<()> {
        let files = self
            .files
            .iter()
            .map(|path| validate_input(path))
            .collect::<anyhow::Result<Vec<_>>>()?;
        let delimit = unescape(&self.delimit);
        let options = WriterOptions::default().with_delimit(&delimit);

        let mut writer = if is_stdin(&self.output) {
            TsvWriter::from_writer(std::io::stdout(), &options)?
        }
        else {
            TsvWriter::open(validate_output(&self.output)?, &options)?
        };

        let matched = SimRead::builder(&files)
            .with_delimit(PerStream::All(delimit.as_str()))
            .with_ftype(PerStream::Each(
                self.ftype
                    .iter()
                    .map(String::as_str)
                    .collect_vec(),
            ))
            .with_skip(PerStream::Each(self.skip.clone()))
            .with_do(|rows: &[Row]| {
                writer.write_fields(rows.iter().flat_map(Row::fields))
            })
            .build()?
            .run()?;
        writer.close()?;

        info!("Joined {} files on {} keys", files.len(), matched);
        Ok(())
    }
}
