//! # biotsv
//!
//! `biotsv` reads and writes the delimited text files that genomics
//! pipelines pass around (BED, BED12, BEDPE, extended BED, tables with a
//! header line, or plain columns), and joins several sorted files in
//! lockstep.
//!
//! ## Key Features
//!
//! * **Schema-driven parsing**: a [`TsvMeta`] maps column names to optional
//!   [`Converter`]s, so each line becomes a typed [`TsvRecord`].
//! * **Format registry**: readers and writers are chosen by a format tag
//!   (`bed`, `bed12`, `bedpe`, `bedx`, `head`, `nometa`, or none) through
//!   [`FileType`]. Unknown tags are rejected before any file is opened.
//! * **Transparent gzip**: inputs and outputs ending in `.gz` are
//!   (de)compressed on the fly.
//! * **Synchronized scan**: [`SimRead`] advances several readers in a
//!   merge-join and calls back whenever all current rows share a key.
//! * **Conversion pipeline**: [`tsv_ops`] re-reads, filters and rewrites a
//!   file in one call.
//!
//! ## Usage
//!
//! ### Reading a BED file
//!
//! ```no_run
//! use biotsv::prelude::*;
//!
//! fn main() -> anyhow::Result<()> {
//!     let options = ReaderOptions::default().with_ftype("bed");
//!     let mut reader = TsvReader::open("regions.bed.gz", &options)?;
//!
//!     for record in reader.records() {
//!         let record = record?;
//!         println!(
//!             "{}:{}-{} {}",
//!             record.get_str("CHR").unwrap_or_default(),
//!             record.get_int("START").unwrap_or_default(),
//!             record.get_int("END").unwrap_or_default(),
//!             record.get_str("NAME").unwrap_or_default(),
//!         );
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ### Writing records with a header
//!
//! ```no_run
//! use biotsv::prelude::*;
//!
//! fn main() -> anyhow::Result<()> {
//!     let options = WriterOptions::default().with_cnames(["GENE", "SCORE"]);
//!     let mut writer = TsvWriter::open("scores.txt", &options)?;
//!     writer.write_head(&HeadOptions::default().with_prefix("#"))?;
//!
//!     let record: TsvRecord = [("GENE", Value::from("TP53")), ("SCORE", Value::from(0.5))]
//!         .into_iter()
//!         .collect();
//!     writer.write(&record)?;
//!     writer.close()
//! }
//! ```
//!
//! ### Joining sorted files on their first column
//!
//! ```no_run
//! use biotsv::prelude::*;
//!
//! fn main() -> anyhow::Result<()> {
//!     let mut shared = Vec::new();
//!     SimRead::builder(["a.txt", "b.txt"])
//!         .with_do(|rows: &[Row]| {
//!             shared.push(rows[0].fields()[0].clone());
//!             Ok(())
//!         })
//!         .build()?
//!         .run()?;
//!     println!("{} shared keys", shared.len());
//!     Ok(())
//! }
//! ```
//!
//! ## Structure
//!
//! * [`data_structs`]: values, converters, schemas and records.
//! * [`io`]: compression handling and the delimited readers and writers.
//! * [`error`]: the [`TsvError`] taxonomy carried inside `anyhow::Error`.

pub mod data_structs;
pub mod error;
pub mod io;
pub mod prelude;

#[allow(unused_imports)]
use prelude::*;
