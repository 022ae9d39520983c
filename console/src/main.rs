mod convert;
mod head;
mod join;
mod utils;

use clap::{
    Parser,
    Subcommand,
};
use convert::ConvertArgs;
use head::HeadArgs;
use join::JoinArgs;
use utils::{
    PipelineCommand,
    UtilsArgs,
};
use wild::ArgsOs;

#[derive(Parser, Debug)]
#[command(
    author = env!("CARGO_PKG_AUTHORS"),
    version = env!("CARGO_PKG_VERSION"),
    about = env!("CARGO_PKG_DESCRIPTION"),
    long_about = None,)]
struct Cli {
    #[command(subcommand)]
    command: MainMenu,
}

#[derive(Subcommand, Debug)]
enum MainMenu {
    /// Re-read a file with one format and write it with another.
    Convert {
        #[clap(flatten)]
        utils: UtilsArgs,
        #[clap(flatten)]
        args:  ConvertArgs,
    },

    /// Merge-join sorted files on their first column.
    Join {
        #[clap(flatten)]
        utils: UtilsArgs,
        #[clap(flatten)]
        args:  JoinArgs,
    },

    /// Print the derived columns and the first rows of a file.
    Head {
        #[clap(flatten)]
        utils: UtilsArgs,
        #[clap(flatten)]
        args:  HeadArgs,
    },
}

fn main() -> anyhow::Result<()> {
    let args: ArgsOs = wild::args_os();
    let cli = Cli::parse_from(args);

    match cli.command {
        MainMenu::Convert { utils, args } => {
            utils.setup()?;
            args.run()?;
        },
        MainMenu::Join { utils, args } => {
            utils.setup()?;
            args.run()?;
        },
        MainMenu::Head { utils, args } => {
            utils.setup()?;
            args.run()?;
        },
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn cli_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn convert_parses_columns() {
        let cli = Cli::try_parse_from([
            "biotsv",
            "convert",
            "in.bed",
            "-o",
            "out.txt",
            "--from",
            "bed",
            "--out-cnames",
            "CHR,START:int",
            "-v",
        ])
        .expect("valid command line");
        match cli.command {
            MainMenu::Convert { utils, args } => {
                assert_eq!(utils.verbose, 1);
                let (_, writer, _) = args.options().expect("options resolve");
                let names = writer
                    .cnames
                    .iter()
                    .map(|c| (c.name.as_str(), c.converter.as_ref().map(|v| v.name())))
                    .collect::<Vec<_>>();
                assert_eq!(names, vec![("CHR", None), ("START", Some("int"))]);
            },
            other => panic!("unexpected subcommand {:?}", other),
        }
    }

    #[test]
    fn unknown_converter_is_a_usage_error() {
        let result = Cli::try_parse_from([
            "biotsv",
            "head",
            "in.txt",
            "--cnames",
            "A:decimal",
        ]);
        assert!(result.is_err());
    }
}
