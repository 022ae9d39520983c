use std::path::{
    Path,
    PathBuf,
};

use anyhow::{
    anyhow,
    bail,
};
use biotsv::prelude::{
    Column,
    TsvError,
};
use clap::Args;
use console::style;
use log::LevelFilter;

/// Options shared by every subcommand.
#[derive(Args, Debug, Clone)]
pub(crate) struct UtilsArgs {
    #[arg(
        short = 'v',
        long,
        action = clap::ArgAction::Count,
        help = "Raise log verbosity (-v debug, -vv trace). RUST_LOG overrides."
    )]
    pub verbose: u8,
}

impl UtilsArgs {
    pub fn level(&self) -> LevelFilter {
        match self.verbose {
            0 => LevelFilter::Info,
            1 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    }

    pub fn setup(&self) -> anyhow::Result<()> {
        let mut builder = pretty_env_logger::formatted_builder();
        builder.filter_level(self.level());
        if let Ok(filters) = std::env::var("RUST_LOG") {
            builder.parse_filters(&filters);
        }
        builder
            .try_init()
            .map_err(|e| anyhow!("Failed to set up logger: {}", e))
    }
}

pub(crate) trait PipelineCommand {
    fn run(&self) -> anyhow::Result<()>;
}

/// `-` stands for standard input and is always accepted.
pub(crate) fn validate_input(path: &Path) -> anyhow::Result<PathBuf> {
    if is_stdin(path) {
        return Ok(path.to_path_buf());
    }
    if !path.exists() {
        bail!("Path {} does not exist.", style(path.display()).red());
    }
    if !path.is_file() {
        bail!("Path {} is not a file.", style(path.display()).red());
    }
    Ok(path.to_path_buf())
}

pub(crate) fn validate_output(path: &Path) -> anyhow::Result<PathBuf> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.is_dir() {
            bail!(
                "Output directory {} does not exist.",
                style(parent.display()).red()
            );
        }
    }
    if path.is_dir() {
        bail!("Output path {} is a directory.", style(path.display()).red());
    }
    Ok(path.to_path_buf())
}

pub(crate) fn is_stdin(path: &Path) -> bool {
    path.as_os_str() == "-"
}

/// Column argument parser. `NAME:conv` must resolve to a known converter.
pub(crate) fn parse_column(spec: &str) -> Result<Column, TsvError> {
    spec.parse()
}

/// Turns the escapes a shell user would type (`\t`, `\n`, `\\`) into the
/// characters they stand for.
pub(crate) fn unescape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('t') => out.push('\t'),
            Some('n') => out.push('\n'),
            Some('\\') => out.push('\\'),
            Some(other) => {
                out.push('\\');
                out.push(other);
            },
            None => out.push('\\'),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unescape_tab_and_literals() {
        assert_eq!(unescape("\\t"), "\t");
        assert_eq!(unescape(","), ",");
        assert_eq!(unescape("a\\\\b"), "a\\b");
        assert_eq!(unescape("\\x"), "\\x");
    }

    #[test]
    fn column_arguments_resolve_converters() {
        let column = parse_column("START:int").expect("known converter");
        assert_eq!(column.name, "START");
        assert_eq!(
            column
                .converter
                .as_ref()
                .map(|c| c.name()),
            Some("int")
        );
        assert_eq!(
            parse_column("A:decimal").err(),
            Some(TsvError::UnknownConverter("decimal".to_string()))
        );
    }

    #[test]
    fn verbosity_levels() {
        let utils = UtilsArgs { verbose: 2 };
        assert_eq!(utils.level(), LevelFilter::Trace);
    }
}
