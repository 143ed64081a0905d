//! TREC run output: `<queryNumber> 0 <documentId> <rank> <score> STANDARD`.

use crate::error::Result;
use std::fmt;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

pub const RUN_TAG: &str = "STANDARD";

#[derive(Debug, Clone, PartialEq)]
pub struct ResultRecord {
    pub query_number: usize,
    pub doc_id: String,
    pub rank: usize,
    pub score: f32,
}

impl ResultRecord {
    pub fn new(query_number: usize, doc_id: &str, rank: usize, score: f32) -> Self {
        Self { query_number, doc_id: doc_id.to_string(), rank, score }
    }
}

/// Shortest decimal that round-trips the `f32`, always with a fraction or exponent (`1.0`, not
/// `1`).
pub fn format_score(score: f32) -> String { format!("{score:?}") }

impl fmt::Display for ResultRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} 0 {} {} {} {}",
            self.query_number,
            self.doc_id,
            self.rank,
            format_score(self.score),
            RUN_TAG
        )
    }
}

pub fn write_run<W: Write>(mut writer: W, records: &[ResultRecord]) -> std::io::Result<()> {
    for record in records {
        writeln!(writer, "{record}")?;
    }
    writer.flush()
}

fn staging_path(path: &Path) -> PathBuf {
    let name = path.file_name().map(|n| n.to_string_lossy().into_owned()).unwrap_or_default();
    path.with_file_name(format!(".{name}.tmp"))
}

/// Write the run to a sibling temporary file and rename it over `path`, so a failed write never
/// leaves a truncated run behind.
pub fn write_run_file(path: &Path, records: &[ResultRecord]) -> Result<()> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        fs::create_dir_all(dir)?;
    }
    let tmp = staging_path(path);
    let written = File::create(&tmp).and_then(|f| write_run(BufWriter::new(f), records));
    if let Err(e) = written {
        let _ = fs::remove_file(&tmp);
        return Err(e.into());
    }
    fs::rename(&tmp, path)?;
    Ok(())
}
