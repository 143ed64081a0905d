use crate::corpus::Document;
use crate::error::{Error, Result};
use crate::index::{Field, FieldIndex, InvertedIndex};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fs::{self, create_dir_all, File};
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};

pub const FORMAT_VERSION: u32 = 1;

#[derive(Debug, Serialize, Deserialize)]
pub struct MetaFile {
    pub num_docs: u32,
    pub created_at: String,
    pub version: u32,
}

pub struct IndexPaths {
    pub root: PathBuf,
}

impl IndexPaths {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self { root: root.as_ref().to_path_buf() }
    }
    fn docs(&self) -> PathBuf { self.root.join("docs.bin") }
    fn meta(&self) -> PathBuf { self.root.join("meta.json") }
    fn field(&self, field: Field) -> PathBuf { self.root.join(format!("{}.bin", field.name())) }

    fn sibling(&self, suffix: &str) -> PathBuf {
        let name = self
            .root
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "index".into());
        self.root.with_file_name(format!(".{name}.{suffix}"))
    }

    /// Sibling directory the index is assembled in before it is moved into place.
    fn staging(&self) -> PathBuf { self.sibling("staging") }

    /// Where the previous index waits while the new one is moved into place.
    fn backup(&self) -> PathBuf { self.sibling("old") }
}

fn save_bin<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let mut w = BufWriter::new(File::create(path)?);
    bincode::serialize_into(&mut w, value)?;
    w.flush()?;
    Ok(())
}

fn load_bin<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let mut buf = Vec::new();
    BufReader::new(File::open(path)?).read_to_end(&mut buf)?;
    Ok(bincode::deserialize(&buf)?)
}

pub fn save_meta(paths: &IndexPaths, meta: &MetaFile) -> Result<()> {
    create_dir_all(&paths.root)?;
    let mut f = File::create(paths.meta())?;
    let json = serde_json::to_string_pretty(meta)?;
    f.write_all(json.as_bytes())?;
    Ok(())
}

pub fn load_meta(paths: &IndexPaths) -> Result<MetaFile> {
    let path = paths.meta();
    if !path.is_file() {
        return Err(Error::IndexNotFound(paths.root.clone()));
    }
    let mut buf = String::new();
    File::open(path)?.read_to_string(&mut buf)?;
    let meta: MetaFile = serde_json::from_str(&buf)?;
    if meta.version != FORMAT_VERSION {
        return Err(Error::IndexVersion { found: meta.version, expected: FORMAT_VERSION });
    }
    Ok(meta)
}

fn write_files(paths: &IndexPaths, index: &InvertedIndex) -> Result<()> {
    create_dir_all(&paths.root)?;
    save_bin(&paths.docs(), &index.documents())?;
    for field in Field::ALL {
        save_bin::<FieldIndex>(&paths.field(field), index.field(field))?;
    }
    let meta = MetaFile {
        num_docs: index.num_docs(),
        created_at: time::OffsetDateTime::now_utc()
            .format(&time::format_description::well_known::Rfc3339)
            .unwrap_or_else(|_| "".into()),
        version: FORMAT_VERSION,
    };
    // meta.json last: its presence marks a complete index
    save_meta(paths, &meta)
}

/// Persist `index` at `paths.root`. Everything is written to a staging directory first and
/// renamed into place only once every file is complete. A previous index is moved aside before
/// the rename and deleted after it, so a failed swap puts it back. A non-empty destination that
/// does not hold an index is left alone.
pub fn save_index(paths: &IndexPaths, index: &InvertedIndex) -> Result<()> {
    let had_index = paths.root.exists();
    if had_index && !paths.meta().is_file() && fs::read_dir(&paths.root)?.next().is_some() {
        return Err(Error::NotAnIndex(paths.root.clone()));
    }
    let staging = IndexPaths::new(paths.staging());
    if staging.root.exists() {
        fs::remove_dir_all(&staging.root)?;
    }
    if let Err(e) = write_files(&staging, index) {
        let _ = fs::remove_dir_all(&staging.root);
        return Err(e);
    }

    let backup = paths.backup();
    if backup.exists() {
        fs::remove_dir_all(&backup)?;
    }
    if had_index {
        fs::rename(&paths.root, &backup)?;
    }
    if let Err(e) = fs::rename(&staging.root, &paths.root) {
        if had_index {
            let _ = fs::rename(&backup, &paths.root);
        }
        let _ = fs::remove_dir_all(&staging.root);
        return Err(e.into());
    }
    if had_index {
        fs::remove_dir_all(&backup)?;
    }
    tracing::info!(path = %paths.root.display(), num_docs = index.num_docs(), "index saved");
    Ok(())
}

pub fn load_index(paths: &IndexPaths) -> Result<InvertedIndex> {
    let meta = load_meta(paths)?;
    let docs: Vec<Document> = load_bin(&paths.docs())?;
    let title = load_bin(&paths.field(Field::Title))?;
    let author = load_bin(&paths.field(Field::Author))?;
    let contents = load_bin(&paths.field(Field::Contents))?;
    tracing::info!(
        path = %paths.root.display(),
        num_docs = meta.num_docs,
        created_at = %meta.created_at,
        "index loaded"
    );
    Ok(InvertedIndex::from_parts(docs, [title, author, contents]))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn staging_and_backup_are_hidden_siblings() {
        let paths = IndexPaths::new("/tmp/runs/index");
        assert_eq!(paths.staging(), PathBuf::from("/tmp/runs/.index.staging"));
        assert_eq!(paths.backup(), PathBuf::from("/tmp/runs/.index.old"));
    }
}
