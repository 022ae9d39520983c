use std::path::{
    Path,
    PathBuf,
};

use anyhow::Context;
use itertools::Itertools;
use log::{
    debug,
    trace,
};

use super::options::ReaderOptions;
use super::read::TsvReader;
use crate::data_structs::{
    Column,
    Row,
};
use crate::error::TsvError;

/// Outcome of a match function.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchResult {
    /// Every stream's current row matches; run the callback.
    All,
    /// Stream `i` is behind and must be advanced.
    Advance(usize),
}

type MatchFn<'a> = Box<dyn FnMut(&[Row]) -> anyhow::Result<MatchResult> + 'a>;
type DoFn<'a> = Box<dyn FnMut(&[Row]) -> anyhow::Result<()> + 'a>;

/// Default match: compares the first field of every row. All equal means a
/// match; otherwise the first stream holding the smallest key is behind.
///
/// Assumes every input is sorted ascending on its first column.
pub fn default_match(lines: &[Row]) -> anyhow::Result<MatchResult> {
    let keys = lines.iter().map(Row::first).collect_vec();
    let min = keys.iter().min().cloned().flatten();
    let min = min.as_ref();
    if keys.iter().all(|k| k.as_ref() == min) {
        return Ok(MatchResult::All);
    }
    let behind = keys
        .iter()
        .position(|k| k.as_ref() == min)
        .unwrap_or(0);
    Ok(MatchResult::Advance(behind))
}

/// Two-stream comparison helper for custom match functions: `All` when the
/// keys are equal, otherwise the stream that is behind in the sort order
/// (descending when `reverse`).
pub fn compare<T: Ord>(
    a: &T,
    b: &T,
    reverse: bool,
) -> MatchResult {
    let (a, b) = if reverse { (b, a) } else { (a, b) };
    match a.cmp(b) {
        std::cmp::Ordering::Less => MatchResult::Advance(0),
        std::cmp::Ordering::Greater => MatchResult::Advance(1),
        std::cmp::Ordering::Equal => MatchResult::All,
    }
}

/// Either one value for every stream or one value per stream. A shorter
/// per-stream list covers the leading streams only.
#[derive(Debug, Clone)]
pub enum PerStream<T> {
    All(T),
    Each(Vec<T>),
}

impl<T: Clone> PerStream<T> {
    fn apply<F>(
        self,
        n: usize,
        mut func: F,
    ) where
        F: FnMut(usize, T), {
        match self {
            PerStream::All(value) => {
                (0..n).for_each(|i| func(i, value.clone()));
            },
            PerStream::Each(values) => {
                values
                    .into_iter()
                    .take(n)
                    .enumerate()
                    .for_each(|(i, v)| func(i, v));
            },
        }
    }
}

impl<T> From<Vec<T>> for PerStream<T> {
    fn from(value: Vec<T>) -> Self {
        PerStream::Each(value)
    }
}

/// Configures the readers of a [`SimRead`].
pub struct SimReadBuilder<'a> {
    paths:    Vec<PathBuf>,
    options:  Vec<ReaderOptions>,
    match_fn: Option<MatchFn<'a>>,
    do_fn:    Option<DoFn<'a>>,
}

impl<'a> SimReadBuilder<'a> {
    pub fn new<I, P>(paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>, {
        let paths = paths
            .into_iter()
            .map(|p| p.as_ref().to_path_buf())
            .collect_vec();
        let options = vec![ReaderOptions::default(); paths.len()];
        Self {
            paths,
            options,
            match_fn: None,
            do_fn: None,
        }
    }

    /// Same options for every stream.
    pub fn with_options(
        mut self,
        options: ReaderOptions,
    ) -> Self {
        self.options.fill(options);
        self
    }

    pub fn with_stream_options(
        mut self,
        index: usize,
        options: ReaderOptions,
    ) -> Self {
        if let Some(slot) = self.options.get_mut(index) {
            *slot = options;
        }
        self
    }

    pub fn with_delimit(
        mut self,
        delimit: PerStream<&str>,
    ) -> Self {
        let n = self.options.len();
        delimit.apply(n, |i, d| self.options[i].delimit = d.to_string());
        self
    }

    pub fn with_comment(
        mut self,
        comment: PerStream<Option<&str>>,
    ) -> Self {
        let n = self.options.len();
        comment.apply(n, |i, c| self.options[i].comment = c.map(str::to_string));
        self
    }

    pub fn with_skip(
        mut self,
        skip: PerStream<usize>,
    ) -> Self {
        let n = self.options.len();
        skip.apply(n, |i, s| self.options[i].skip = s);
        self
    }

    pub fn with_ftype(
        mut self,
        ftype: PerStream<&str>,
    ) -> Self {
        let n = self.options.len();
        ftype.apply(n, |i, f| self.options[i].ftype = Some(f.to_string()));
        self
    }

    pub fn with_cnames(
        mut self,
        cnames: PerStream<Vec<Column>>,
    ) -> Self {
        let n = self.options.len();
        cnames.apply(n, |i, c| self.options[i].cnames = c);
        self
    }

    pub fn with_match<F>(
        mut self,
        func: F,
    ) -> Self
    where
        F: FnMut(&[Row]) -> anyhow::Result<MatchResult> + 'a, {
        self.match_fn = Some(Box::new(func));
        self
    }

    pub fn with_do<F>(
        mut self,
        func: F,
    ) -> Self
    where
        F: FnMut(&[Row]) -> anyhow::Result<()> + 'a, {
        self.do_fn = Some(Box::new(func));
        self
    }

    /// Opens every reader and derives placeholder schemas where needed.
    pub fn build(self) -> anyhow::Result<SimRead<'a>> {
        let readers = self
            .paths
            .iter()
            .zip(self.options.iter())
            .map(|(path, options)| TsvReader::open(path, options))
            .collect::<anyhow::Result<Vec<_>>>()?;
        let mut simread = SimRead::from_readers(readers)?;
        if let Some(match_fn) = self.match_fn {
            simread.match_fn = match_fn;
        }
        simread.do_fn = self.do_fn;
        Ok(simread)
    }
}

/// Synchronized scan over several sorted inputs, calling back whenever all
/// current rows match (a k-way merge-join).
///
/// After a match only stream 0 is advanced; the other streams are compared
/// against its next row. The scan stops, without error, as soon as any
/// stream runs out of rows.
pub struct SimRead<'a> {
    readers:  Vec<TsvReader>,
    match_fn: MatchFn<'a>,
    do_fn:    Option<DoFn<'a>>,
}

impl<'a> SimRead<'a> {
    pub fn builder<I, P>(paths: I) -> SimReadBuilder<'a>
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>, {
        SimReadBuilder::new(paths)
    }

    /// Wraps already opened readers. Readers without columns get
    /// `COL1..COLn` placeholders.
    pub fn from_readers(mut readers: Vec<TsvReader>) -> anyhow::Result<Self> {
        if readers.is_empty() {
            return Err(TsvError::InvalidOption(
                "SimRead needs at least one input".to_string(),
            )
            .into());
        }
        for reader in readers.iter_mut() {
            if reader.meta().is_empty() {
                reader.auto_meta("COL")?;
            }
        }
        Ok(Self {
            readers,
            match_fn: Box::new(default_match),
            do_fn: None,
        })
    }

    pub fn with_match<F>(
        mut self,
        func: F,
    ) -> Self
    where
        F: FnMut(&[Row]) -> anyhow::Result<MatchResult> + 'a, {
        self.match_fn = Box::new(func);
        self
    }

    pub fn with_do<F>(
        mut self,
        func: F,
    ) -> Self
    where
        F: FnMut(&[Row]) -> anyhow::Result<()> + 'a, {
        self.do_fn = Some(Box::new(func));
        self
    }

    pub fn readers(&self) -> &[TsvReader] {
        &self.readers
    }

    /// Runs the scan and returns how many times the callback fired.
    pub fn run(&mut self) -> anyhow::Result<usize> {
        let do_fn = self
            .do_fn
            .as_mut()
            .ok_or(TsvError::MissingCallback)?;
        let n = self.readers.len();

        let mut lines = Vec::with_capacity(n);
        for reader in self.readers.iter_mut() {
            match reader.next_row()? {
                Some(row) => lines.push(row),
                None => return Ok(0),
            }
        }
        debug!("Lines initiated for {} streams", n);

        let mut matched = 0;
        loop {
            trace!(
                "{}",
                lines
                    .iter()
                    .enumerate()
                    .map(|(i, line)| format!("  > FILE {}: [{}]", i + 1, line))
                    .join("\n")
            );
            if lines.iter().any(Row::is_empty) {
                break;
            }

            let result = (self.match_fn)(&lines)
                .map_err(|e| annotate(e, "MATCH", &lines))?;
            trace!("  Match returns: {:?}", result);

            let behind = match result {
                MatchResult::All => {
                    do_fn(&lines).map_err(|e| annotate(e, "DO", &lines))?;
                    matched += 1;
                    0
                },
                MatchResult::Advance(index) if index < n => index,
                MatchResult::Advance(index) => {
                    let e = anyhow::Error::from(
                        TsvError::MatchIndexOutOfRange { index, n },
                    );
                    return Err(annotate(e, "MATCH", &lines));
                },
            };

            trace!("- File {} is behind, read it ...", behind + 1);
            match self.readers[behind]
                .next_row()
                .with_context(|| format!("Failed to read file {}", behind + 1))?
            {
                Some(row) => lines[behind] = row,
                None => break,
            }
        }

        debug!("Synchronized scan finished with {} matches", matched);
        Ok(matched)
    }
}

/// Adds every stream's current row to an error raised by a user function.
/// The wrapped error stays reachable through `downcast_ref`.
fn annotate(
    error: anyhow::Error,
    function: &str,
    lines: &[Row],
) -> anyhow::Error {
    let mut msgs = vec![format!("{} in {} function:", error, function)];
    msgs.extend(
        lines
            .iter()
            .enumerate()
            .map(|(k, line)| format!("File {}: {}", k + 1, line)),
    );
    error.context(msgs.join("\n"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn per_stream_list_covers_leading_streams() {
        let builder = SimRead::builder(["a", "b", "c"])
            .with_skip(PerStream::Each(vec![1, 2]))
            .with_delimit(PerStream::All(","));
        let options = builder
            .options
            .iter()
            .map(|o| (o.skip, o.delimit.as_str()))
            .collect_vec();
        assert_eq!(options, vec![(1, ","), (2, ","), (0, ",")]);
    }
}
