use crate::config::SearchConfig;
use crate::index::{DocId, Field, InvertedIndex};
use crate::output::ResultRecord;
use crate::query::{Occur, Query};
use crate::similarity::{FieldStats, ScoringModel};
use std::collections::{HashMap, HashSet};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoredResult {
    pub doc_id: DocId,
    /// 1-based.
    pub rank: usize,
    pub score: f32,
}

struct Candidate {
    doc_id: DocId,
    score: f32,
    required: usize,
    optional: bool,
    prohibited: bool,
}

/// Score every matching document. Each clause term is scored in every field, weighted by the
/// field boost, and summed; documents whose sum is not positive are dropped. Results come back
/// in the order documents were first encountered while walking clause, field, term and posting
/// list.
pub fn evaluate(query: &Query, index: &InvertedIndex, model: ScoringModel) -> Vec<(DocId, f32)> {
    let required_total = query.clauses().iter().filter(|c| c.occur == Occur::Must).count();
    if !query.clauses().iter().any(|c| c.occur != Occur::MustNot) {
        return Vec::new();
    }

    let field_stats = Field::ALL.map(|field| FieldStats::new(index, field));
    let mut candidates: Vec<Candidate> = Vec::new();
    let mut slots: HashMap<DocId, usize> = HashMap::new();

    for clause in query.clauses() {
        let mut matched: HashSet<DocId> = HashSet::new();
        for (field, stats) in Field::ALL.iter().zip(field_stats.iter()) {
            let fi = index.field(*field);
            let boost = field.boost();
            for term in &clause.terms {
                let Some(tid) = fi.term_id(term) else { continue };
                let term_stats = fi.term_stats(tid);
                for posting in fi.postings_for(tid) {
                    let slot = *slots.entry(posting.doc_id).or_insert_with(|| {
                        candidates.push(Candidate {
                            doc_id: posting.doc_id,
                            score: 0.0,
                            required: 0,
                            optional: false,
                            prohibited: false,
                        });
                        candidates.len() - 1
                    });
                    let candidate = &mut candidates[slot];
                    if clause.occur != Occur::MustNot {
                        let len = fi.field_length(posting.doc_id);
                        let tf = posting.term_frequency;
                        candidate.score += boost * model.score_posting(stats, term_stats, tf, len);
                    }
                    if matched.insert(posting.doc_id) {
                        match clause.occur {
                            Occur::Must => candidate.required += 1,
                            Occur::Should => candidate.optional = true,
                            Occur::MustNot => candidate.prohibited = true,
                        }
                    }
                }
            }
        }
    }

    candidates
        .into_iter()
        .filter(|c| !c.prohibited && c.required == required_total)
        .filter(|c| required_total > 0 || c.optional)
        .filter(|c| c.score > 0.0)
        .map(|c| (c.doc_id, c.score))
        .collect()
}

/// Order by descending score and keep the first `k`. The sort is stable, so equal scores keep
/// their encounter order.
pub fn rank(mut scored: Vec<(DocId, f32)>, k: usize) -> Vec<ScoredResult> {
    scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
    scored
        .into_iter()
        .take(k)
        .enumerate()
        .map(|(i, (doc_id, score))| ScoredResult { doc_id, rank: i + 1, score })
        .collect()
}

pub fn search(query: &Query, index: &InvertedIndex, config: &SearchConfig) -> Vec<ScoredResult> {
    rank(evaluate(query, index, config.model), config.top_k)
}

#[derive(Debug, Default)]
pub struct BatchOutcome {
    pub records: Vec<ResultRecord>,
    /// Queries that parsed and ran, each of which consumed a query number.
    pub executed: usize,
    pub skipped: usize,
}

/// Run every query line in order. Blank lines are ignored outright; lines that fail to parse are
/// logged and skipped without consuming a query number.
pub fn run_batch<I, S>(index: &InvertedIndex, lines: I, config: &SearchConfig) -> BatchOutcome
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut outcome = BatchOutcome::default();
    let mut query_number = 1usize;
    for line in lines {
        let raw = line.as_ref().trim();
        if raw.is_empty() {
            continue;
        }
        let query = match Query::parse(raw) {
            Ok(q) => q,
            Err(error) => {
                tracing::warn!(query = raw, %error, "error parsing query, skipping");
                outcome.skipped += 1;
                continue;
            }
        };
        let hits = search(&query, index, config);
        tracing::debug!(query_number, hits = hits.len(), "query evaluated");
        for hit in hits {
            if let Some(doc) = index.document(hit.doc_id) {
                outcome.records.push(ResultRecord::new(query_number, &doc.id, hit.rank, hit.score));
            }
        }
        query_number += 1;
        outcome.executed += 1;
    }
    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::corpus::Document;

    fn doc(id: &str, title: &str, content: &str) -> Document {
        Document {
            id: id.into(),
            title: title.into(),
            author: String::new(),
            content: content.into(),
        }
    }

    fn bm25() -> ScoringModel { ScoringModel::from_id(1).unwrap() }

    #[test]
    fn title_boost_beats_contents() {
        let index = InvertedIndex::build(vec![
            doc("a", "wing", "filler text"),
            doc("b", "filler", "wing text"),
        ]);
        let q = Query::parse("wing").unwrap();
        for model in [ScoringModel::Boolean, ScoringModel::Classic, bm25()] {
            let hits = rank(evaluate(&q, &index, model), 50);
            assert_eq!(hits.len(), 2);
            assert_eq!(hits[0].doc_id, 0, "{model}");
            assert!(hits[0].score > hits[1].score, "{model}");
        }
    }

    #[test]
    fn boolean_sums_boosts() {
        let index = InvertedIndex::build(vec![doc("a", "wing", "wing")]);
        let q = Query::parse("wing").unwrap();
        let scored = evaluate(&q, &index, ScoringModel::Boolean);
        assert_eq!(scored, vec![(0, 3.0)]);
    }

    #[test]
    fn ties_keep_encounter_order() {
        let index = InvertedIndex::build(vec![
            doc("z", "", "flow"),
            doc("a", "", "wing"),
            doc("m", "", "flow"),
        ]);
        let q = Query::parse("wing flow").unwrap();
        let hits = rank(evaluate(&q, &index, ScoringModel::Boolean), 50);
        let order: Vec<DocId> = hits.iter().map(|h| h.doc_id).collect();
        assert_eq!(order, vec![1, 0, 2]);
        assert_eq!(hits.iter().map(|h| h.rank).collect::<Vec<_>>(), vec![1, 2, 3]);
    }

    #[test]
    fn must_and_must_not() {
        let index = InvertedIndex::build(vec![
            doc("1", "", "wing flutter"),
            doc("2", "", "wing"),
            doc("3", "", "flutter"),
        ]);
        let ids = |raw: &str| -> Vec<DocId> {
            let q = Query::parse(raw).unwrap();
            evaluate(&q, &index, bm25()).into_iter().map(|(d, _)| d).collect()
        };
        assert_eq!(ids("wing AND flutter"), vec![0]);
        assert_eq!(ids("wing NOT flutter"), vec![1]);
        assert_eq!(ids("wing flutter"), vec![0, 1, 2]);
        assert!(ids("NOT wing").is_empty());
    }

    #[test]
    fn no_match_is_empty() {
        let index = InvertedIndex::build(vec![doc("1", "", "wing")]);
        let q = Query::parse("propeller").unwrap();
        assert!(search(&q, &index, &SearchConfig::new(bm25())).is_empty());
        assert!(search(&Query::default(), &index, &SearchConfig::new(bm25())).is_empty());
    }

    #[test]
    fn truncates_to_top_k() {
        let docs: Vec<Document> =
            (0..80).map(|i| doc(&i.to_string(), "", &"wing ".repeat(i % 7 + 1))).collect();
        let index = InvertedIndex::build(docs);
        let q = Query::parse("wing").unwrap();
        let hits = search(&q, &index, &SearchConfig::new(bm25()));
        assert_eq!(hits.len(), 50);
        assert!(hits.windows(2).all(|w| w[0].score >= w[1].score));
    }

    #[test]
    fn dirichlet_never_emits_zero_scores() {
        let index = InvertedIndex::build(vec![
            doc("1", "", "common common rare"),
            doc("2", "", "common common"),
        ]);
        let config = SearchConfig::from_model_id(3).unwrap();
        let outcome = run_batch(&index, ["common"], &config);
        assert_eq!(outcome.records.len(), 1);
        assert_eq!(outcome.records[0].doc_id, "2");
        assert!(outcome.records.iter().all(|r| r.score > 0.0));

        // P(t|d) equals the smoothed estimate exactly in every field, so nothing scores.
        let cats = InvertedIndex::build(vec![doc("1", "Cats", "Cats are small mammals.")]);
        let outcome = run_batch(&cats, ["cats"], &config);
        assert!(outcome.records.is_empty(), "{:?}", outcome.records);
        assert_eq!(outcome.executed, 1);
    }

    #[test]
    fn batch_numbering_skips_blank_and_bad_queries() {
        let index = InvertedIndex::build(vec![doc("11", "wing", "flutter")]);
        let lines = ["wing", "", "   ", "AND", "flutter", "the"];
        let outcome = run_batch(&index, lines, &SearchConfig::new(bm25()));
        assert_eq!(outcome.executed, 3);
        assert_eq!(outcome.skipped, 1);
        let numbers: Vec<usize> = outcome.records.iter().map(|r| r.query_number).collect();
        assert_eq!(numbers, vec![1, 2]);
        assert!(outcome.records.iter().all(|r| r.doc_id == "11"));
    }
}
