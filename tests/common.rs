#![allow(dead_code)]
use std::io::{
    Read,
    Write,
};
use std::path::Path;

use flate2::read::MultiGzDecoder;
use flate2::write::GzEncoder;
use tempfile::NamedTempFile;

/// Routes library logs to the test output; `RUST_LOG=debug` shows them.
pub fn init_logger() {
    let _ = pretty_env_logger::try_init();
}

/// Writes `content` to a temporary file with the given suffix, gzipped when
/// the suffix ends in `.gz`.
pub fn temp_input(
    content: &str,
    suffix: &str,
) -> anyhow::Result<NamedTempFile> {
    init_logger();
    let mut file = tempfile::Builder::new()
        .suffix(suffix)
        .tempfile()?;
    if suffix.ends_with(".gz") {
        let mut encoder =
            GzEncoder::new(file.reopen()?, flate2::Compression::default());
        encoder.write_all(content.as_bytes())?;
        encoder.finish()?;
    }
    else {
        file.write_all(content.as_bytes())?;
        file.flush()?;
    }
    Ok(file)
}

/// An empty temporary output path with the given suffix.
pub fn temp_output(suffix: &str) -> anyhow::Result<NamedTempFile> {
    init_logger();
    Ok(tempfile::Builder::new()
        .suffix(suffix)
        .tempfile()?)
}

/// Reads a (possibly gzipped) file back as text.
pub fn read_text<P: AsRef<Path>>(path: P) -> anyhow::Result<String> {
    let path = path.as_ref();
    let mut text = String::new();
    let file = std::fs::File::open(path)?;
    if path.to_string_lossy().ends_with(".gz") {
        MultiGzDecoder::new(file).read_to_string(&mut text)?;
    }
    else {
        std::io::BufReader::new(file).read_to_string(&mut text)?;
    }
    Ok(text)
}

/// Sorted keyed lines, one per key: `{key}\t{tag}{key}`.
pub fn keyed_lines(
    keys: &[u32],
    tag: &str,
) -> String {
    keys.iter()
        .map(|k| format!("{}\t{}{}\n", k, tag, k))
        .collect()
}
