use crate::corpus::Document;
use crate::tokenizer::analyze;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

pub type TermId = u32;
/// Dense document number, assigned in arrival order during [`InvertedIndex::build`].
pub type DocId = u32;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Field {
    Title,
    Author,
    Contents,
}

impl Field {
    pub const ALL: [Field; 3] = [Field::Title, Field::Author, Field::Contents];

    pub fn boost(self) -> f32 {
        match self {
            Field::Title => 2.0,
            Field::Author => 1.5,
            Field::Contents => 1.0,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Field::Title => "title",
            Field::Author => "author",
            Field::Contents => "contents",
        }
    }

    fn slot(self) -> usize {
        match self {
            Field::Title => 0,
            Field::Author => 1,
            Field::Contents => 2,
        }
    }

    fn text(self, doc: &Document) -> &str {
        match self {
            Field::Title => &doc.title,
            Field::Author => &doc.author,
            Field::Contents => &doc.content,
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.name()) }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Posting {
    pub doc_id: DocId,
    pub term_frequency: u32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TermStats {
    /// Documents containing the term in this field.
    pub doc_freq: u32,
    /// Occurrences of the term in this field across all documents.
    pub collection_freq: u64,
}

/// Postings and statistics for one field.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FieldIndex {
    dictionary: HashMap<String, TermId>,
    stats: Vec<TermStats>,
    postings: Vec<Vec<Posting>>, // by term id, in doc arrival order
    lengths: Vec<u32>,           // by doc id, analyzed token count
    total_length: u64,
}

impl FieldIndex {
    pub fn term_id(&self, term: &str) -> Option<TermId> { self.dictionary.get(term).copied() }

    pub fn term_stats(&self, term_id: TermId) -> TermStats { self.stats[term_id as usize] }

    pub fn postings_for(&self, term_id: TermId) -> &[Posting] { &self.postings[term_id as usize] }

    pub fn postings(&self, term: &str) -> &[Posting] {
        self.term_id(term).map(|tid| self.postings_for(tid)).unwrap_or(&[])
    }

    pub fn doc_freq(&self, term: &str) -> u32 {
        self.term_id(term).map(|tid| self.term_stats(tid).doc_freq).unwrap_or(0)
    }

    pub fn collection_freq(&self, term: &str) -> u64 {
        self.term_id(term).map(|tid| self.term_stats(tid).collection_freq).unwrap_or(0)
    }

    pub fn term_frequency(&self, term: &str, doc_id: DocId) -> u32 {
        let postings = self.postings(term);
        match postings.binary_search_by_key(&doc_id, |p| p.doc_id) {
            Ok(i) => postings[i].term_frequency,
            Err(_) => 0,
        }
    }

    pub fn field_length(&self, doc_id: DocId) -> u32 {
        self.lengths.get(doc_id as usize).copied().unwrap_or(0)
    }

    pub fn total_length(&self) -> u64 { self.total_length }

    pub fn num_terms(&self) -> usize { self.dictionary.len() }

    fn add(&mut self, doc_id: DocId, terms: Vec<String>) {
        let len = terms.len() as u32;
        let mut tf_counts: Vec<(TermId, u32)> = Vec::new();
        let mut slot: HashMap<TermId, usize> = HashMap::new();
        for term in terms {
            let next_id = self.stats.len() as TermId;
            let tid = *self.dictionary.entry(term).or_insert(next_id);
            if tid == next_id {
                self.stats.push(TermStats::default());
                self.postings.push(Vec::new());
            }
            match slot.get(&tid) {
                Some(&i) => tf_counts[i].1 += 1,
                None => {
                    slot.insert(tid, tf_counts.len());
                    tf_counts.push((tid, 1));
                }
            }
        }
        for (tid, tf) in tf_counts {
            let stats = &mut self.stats[tid as usize];
            stats.doc_freq += 1;
            stats.collection_freq += tf as u64;
            self.postings[tid as usize].push(Posting { doc_id, term_frequency: tf });
        }
        self.lengths.push(len);
        self.total_length += len as u64;
    }
}

/// Immutable multi-field inverted index. Construct with [`InvertedIndex::build`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InvertedIndex {
    docs: Vec<Document>,
    fields: [FieldIndex; 3],
}

impl InvertedIndex {
    pub fn build<I>(documents: I) -> Self
    where
        I: IntoIterator<Item = Document>,
    {
        let mut index = InvertedIndex::default();
        for doc in documents {
            let doc_id = index.docs.len() as DocId;
            for field in Field::ALL {
                let terms = analyze(field.text(&doc));
                index.fields[field.slot()].add(doc_id, terms);
            }
            index.docs.push(doc);
        }
        tracing::info!(
            num_docs = index.docs.len(),
            title_terms = index.field(Field::Title).num_terms(),
            author_terms = index.field(Field::Author).num_terms(),
            contents_terms = index.field(Field::Contents).num_terms(),
            "built inverted index"
        );
        index
    }

    pub(crate) fn from_parts(docs: Vec<Document>, fields: [FieldIndex; 3]) -> Self {
        Self { docs, fields }
    }

    pub fn num_docs(&self) -> u32 { self.docs.len() as u32 }

    pub fn document(&self, doc_id: DocId) -> Option<&Document> { self.docs.get(doc_id as usize) }

    pub fn documents(&self) -> &[Document] { &self.docs }

    pub fn field(&self, field: Field) -> &FieldIndex { &self.fields[field.slot()] }

    pub fn average_field_length(&self, field: Field) -> f32 {
        if self.docs.is_empty() {
            return 0.0;
        }
        self.field(field).total_length() as f32 / self.docs.len() as f32
    }

    pub fn term_frequency(&self, term: &str, field: Field, doc_id: DocId) -> u32 {
        self.field(field).term_frequency(term, doc_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(id: &str, title: &str, author: &str, content: &str) -> Document {
        Document {
            id: id.into(),
            title: title.into(),
            author: author.into(),
            content: content.into(),
        }
    }

    #[test]
    fn postings_follow_arrival_order() {
        let index = InvertedIndex::build(vec![
            doc("30", "", "", "wing wing flow"),
            doc("10", "", "", "flow"),
            doc("20", "", "", "wing"),
        ]);
        let contents = index.field(Field::Contents);
        let wing: Vec<DocId> = contents.postings("wing").iter().map(|p| p.doc_id).collect();
        assert_eq!(wing, vec![0, 2]);
        assert_eq!(contents.term_frequency("wing", 0), 2);
        assert_eq!(contents.doc_freq("wing"), 2);
        assert_eq!(contents.collection_freq("wing"), 3);
        assert_eq!(index.document(1).map(|d| d.id.as_str()), Some("10"));
    }

    #[test]
    fn field_statistics() {
        let index = InvertedIndex::build(vec![
            doc("1", "Cats", "Smith", "Cats are small mammals."),
            doc("2", "", "", "dogs"),
        ]);
        assert_eq!(index.num_docs(), 2);
        assert_eq!(index.field(Field::Contents).field_length(0), 3);
        assert_eq!(index.field(Field::Contents).total_length(), 4);
        assert_eq!(index.average_field_length(Field::Contents), 2.0);
        assert_eq!(index.field(Field::Title).field_length(1), 0);
        assert_eq!(index.term_frequency("smith", Field::Author, 0), 1);
        assert_eq!(index.term_frequency("smith", Field::Title, 0), 0);
    }

    #[test]
    fn stopwords_are_not_indexed() {
        let index = InvertedIndex::build(vec![doc("1", "the theory", "", "")]);
        assert_eq!(index.field(Field::Title).doc_freq("the"), 0);
        assert_eq!(index.field(Field::Title).doc_freq("theory"), 1);
    }

    #[test]
    fn empty_index() {
        let index = InvertedIndex::build(Vec::new());
        assert_eq!(index.num_docs(), 0);
        assert_eq!(index.average_field_length(Field::Title), 0.0);
        assert!(index.field(Field::Contents).postings("anything").is_empty());
    }

    #[test]
    fn deterministic() {
        let docs = vec![doc("1", "a b c", "x", "wing flow"), doc("2", "c d", "y", "flow")];
        assert_eq!(InvertedIndex::build(docs.clone()), InvertedIndex::build(docs));
    }
}
