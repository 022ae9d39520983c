use std::io::{
    self,
    BufRead,
    BufReader,
    BufWriter,
    Read,
    Write,
};
use std::path::Path;
use std::str::FromStr;

use serde::{
    Deserialize,
    Serialize,
};

use crate::error::TsvError;

const GZIP_SUFFIXES: [&str; 3] = [".gz", ".bgz", ".gzip"];

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Compression {
    #[default]
    None,
    Gz,
}

impl Compression {
    pub fn name(&self) -> &str {
        match self {
            Compression::None => "none",
            Compression::Gz => "gzip",
        }
    }

    /// Detects compression from the file name suffix.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Self {
        let name = path
            .as_ref()
            .to_string_lossy()
            .to_lowercase();
        if GZIP_SUFFIXES
            .iter()
            .any(|suffix| name.ends_with(suffix))
        {
            Compression::Gz
        }
        else {
            Compression::None
        }
    }

    /// Wraps an opened source in a buffered, decompressing line reader.
    pub fn get_decoder<R: Read + 'static>(
        &self,
        handle: R,
    ) -> Box<dyn BufRead> {
        match self {
            Compression::Gz => {
                Box::new(BufReader::new(flate2::read::MultiGzDecoder::new(
                    handle,
                )))
            },
            Compression::None => Box::new(BufReader::new(handle)),
        }
    }

    /// Wraps a sink in a buffered, compressing writer.
    pub fn get_encoder<W: Write>(
        &self,
        handle: W,
        compression_level: u32,
    ) -> Encoder<W> {
        match self {
            Compression::Gz => {
                Encoder::Gz(BufWriter::new(flate2::write::GzEncoder::new(
                    handle,
                    flate2::Compression::new(compression_level),
                )))
            },
            Compression::None => Encoder::Plain(BufWriter::new(handle)),
        }
    }
}

impl FromStr for Compression {
    type Err = TsvError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "none" | "" => Ok(Compression::None),
            "gz" | "gzip" => Ok(Compression::Gz),
            other => {
                Err(TsvError::InvalidOption(format!(
                    "unknown compression '{}'",
                    other
                )))
            },
        }
    }
}

/// Output side of [`Compression`]. Must be [`Encoder::finish`]ed to write
/// the gzip trailer and surface flush errors.
pub enum Encoder<W: Write> {
    Plain(BufWriter<W>),
    Gz(BufWriter<flate2::write::GzEncoder<W>>),
}

impl<W: Write> Encoder<W> {
    pub fn finish(self) -> io::Result<W> {
        match self {
            Encoder::Plain(inner) => inner.into_inner().map_err(|e| e.into_error()),
            Encoder::Gz(inner) => {
                inner
                    .into_inner()
                    .map_err(|e| e.into_error())?
                    .finish()
            },
        }
    }
}

impl<W: Write> Write for Encoder<W> {
    fn write(
        &mut self,
        buf: &[u8],
    ) -> io::Result<usize> {
        match self {
            Encoder::Plain(inner) => inner.write(buf),
            Encoder::Gz(inner) => inner.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            Encoder::Plain(inner) => inner.flush(),
            Encoder::Gz(inner) => inner.flush(),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Read;

    use super::*;

    #[test]
    fn detects_gzip_suffixes() {
        assert_eq!(Compression::from_path("a.bed.gz"), Compression::Gz);
        assert_eq!(Compression::from_path("A.BGZ"), Compression::Gz);
        assert_eq!(Compression::from_path("a.bed"), Compression::None);
        assert_eq!("GZIP".parse::<Compression>(), Ok(Compression::Gz));
        assert!("zstd".parse::<Compression>().is_err());
    }

    #[test]
    fn encoder_output_decodes() -> anyhow::Result<()> {
        let mut encoder = Compression::Gz.get_encoder(Vec::new(), 6);
        encoder.write_all(b"chr1\t1\t2\n")?;
        let bytes = encoder.finish()?;

        let mut text = String::new();
        Compression::Gz
            .get_decoder(io::Cursor::new(bytes))
            .read_to_string(&mut text)?;
        assert_eq!(text, "chr1\t1\t2\n");
        Ok(())
    }
}
