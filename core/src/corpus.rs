//! Parser for `.I/.T/.A/.W` line-marker corpora.
//!
//! A corpus stream holds zero or more documents, each opened by an `.I <id>` line. `.T` and
//! `.A` open title and author sections that run until the next line starting with `.`; that
//! line is then handled as a marker itself. `.W` switches on the content flag, after which every
//! non-marker line is body text.
//!
//! The content flag is never switched off once set, so for every document after the first
//! `.W` of a stream, unrecognised lines (such as `.B` bibliography sections) also land in the
//! content.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub id: String,
    pub title: String,
    pub author: String,
    pub content: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    None,
    Title,
    Author,
}

#[derive(Default)]
struct Pending {
    id: String,
    title: String,
    author: String,
    content: String,
}

impl Pending {
    fn finish(self) -> Option<Document> {
        if self.id.is_empty() {
            tracing::debug!("dropping document without an id");
            return None;
        }
        Some(Document {
            id: self.id,
            title: self.title.trim_end().to_string(),
            author: self.author.trim_end().to_string(),
            content: self.content.trim_end().to_string(),
        })
    }
}

fn push_line(buf: &mut String, line: &str) {
    buf.push_str(line);
    buf.push(' ');
}

/// Line-at-a-time parser state. Feed every line of one stream, then call [`CorpusParser::finish`].
pub struct CorpusParser {
    current: Option<Pending>,
    section: Section,
    in_content: bool,
}

impl Default for CorpusParser {
    fn default() -> Self { Self::new() }
}

impl CorpusParser {
    pub fn new() -> Self {
        Self { current: None, section: Section::None, in_content: false }
    }

    /// Process one line. Returns the previous document when this line starts a new one.
    pub fn feed_line(&mut self, line: &str) -> Option<Document> {
        if self.section != Section::None {
            if !line.starts_with('.') {
                if let Some(doc) = self.current.as_mut() {
                    match self.section {
                        Section::Title => push_line(&mut doc.title, line),
                        _ => push_line(&mut doc.author, line),
                    }
                }
                return None;
            }
            self.section = Section::None;
        }

        if line.starts_with(".I") {
            let id = line[2..].trim().to_string();
            let finished = self.current.take().and_then(Pending::finish);
            self.current = Some(Pending { id, ..Pending::default() });
            return finished;
        }
        if line.starts_with(".T") {
            self.section = Section::Title;
        } else if line.starts_with(".A") {
            self.section = Section::Author;
        } else if line.starts_with(".W") {
            self.in_content = true;
        } else if self.in_content {
            if let Some(doc) = self.current.as_mut() {
                push_line(&mut doc.content, line);
            }
        }
        None
    }

    /// End of stream: emit the document still in progress, if any.
    pub fn finish(self) -> Option<Document> {
        self.current.and_then(Pending::finish)
    }
}

/// Parse a whole stream into documents, in stream order.
pub fn parse_corpus<R: BufRead>(reader: R) -> Result<Vec<Document>> {
    let mut parser = CorpusParser::new();
    let mut docs = Vec::new();
    for line in reader.lines() {
        let line = line?;
        if let Some(doc) = parser.feed_line(&line) {
            docs.push(doc);
        }
    }
    docs.extend(parser.finish());
    Ok(docs)
}

pub fn parse_str(text: &str) -> Vec<Document> {
    let mut parser = CorpusParser::new();
    let mut docs: Vec<Document> = text.lines().filter_map(|line| parser.feed_line(line)).collect();
    docs.extend(parser.finish());
    docs
}

/// Regular files directly inside `dir`, sorted by name. Subdirectories are not descended into.
pub fn corpus_files(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(Error::CorpusDirectory(dir.to_path_buf()));
    }
    let mut files = Vec::new();
    for entry in WalkDir::new(dir).min_depth(1).max_depth(1).sort_by_file_name() {
        let entry = entry.map_err(std::io::Error::from)?;
        if entry.file_type().is_file() {
            files.push(entry.into_path());
        }
    }
    Ok(files)
}

/// Parse every corpus file in `dir`. Each file is an independent stream.
pub fn read_corpus_dir(dir: &Path) -> Result<Vec<Document>> {
    let mut docs = Vec::new();
    for file in corpus_files(dir)? {
        tracing::info!(file = %file.display(), "parsing corpus file");
        let reader = BufReader::new(File::open(&file)?);
        let parsed = parse_corpus(reader)?;
        tracing::debug!(file = %file.display(), documents = parsed.len(), "parsed corpus file");
        docs.extend(parsed);
    }
    Ok(docs)
}
