pub mod compression;
pub mod tsv;
