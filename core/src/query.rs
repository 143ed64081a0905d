//! Query parsing.
//!
//! User text is escaped first so punctuation is matched literally rather than read as query
//! syntax. The bare uppercase words `AND`, `OR` and `NOT` survive escaping and still act as
//! operators, which is also the only way a query can fail to parse.

use crate::error::QueryError;
use crate::tokenizer::analyze;

/// Maximum number of clauses in one query.
pub const MAX_CLAUSES: usize = 1024;

const SPECIAL_CHARS: &[char] = &[
    '\\', '+', '-', '!', '(', ')', ':', '^', '[', ']', '"', '{', '}', '~', '*', '?', '|', '&', '/',
];

/// Backslash-escape every character the query syntax treats specially.
pub fn escape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        if SPECIAL_CHARS.contains(&c) {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

fn unescape(word: &str) -> String {
    let mut out = String::with_capacity(word.len());
    let mut chars = word.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            if let Some(next) = chars.next() {
                out.push(next);
            }
        } else {
            out.push(c);
        }
    }
    out
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Occur {
    Should,
    Must,
    MustNot,
}

/// One query word after analysis. A word can analyze to several terms (`high-speed`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Clause {
    pub occur: Occur,
    pub terms: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Conj {
    And,
    Or,
}

impl Conj {
    fn keyword(self) -> &'static str {
        match self {
            Conj::And => "AND",
            Conj::Or => "OR",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Query {
    clauses: Vec<Clause>,
}

impl Query {
    pub fn parse(raw: &str) -> Result<Query, QueryError> {
        let escaped = escape(raw);
        let mut clauses: Vec<Clause> = Vec::new();
        let mut conj: Option<Conj> = None;
        let mut negate = false;
        let mut seen_word = false;

        for word in escaped.split_whitespace() {
            match word {
                "AND" | "OR" => {
                    let next = if word == "AND" { Conj::And } else { Conj::Or };
                    if !seen_word || negate {
                        return Err(QueryError::MissingOperand(next.keyword()));
                    }
                    if let Some(prev) = conj {
                        return Err(QueryError::MissingOperand(prev.keyword()));
                    }
                    conj = Some(next);
                }
                "NOT" => {
                    if negate {
                        return Err(QueryError::MissingOperand("NOT"));
                    }
                    negate = true;
                }
                _ => {
                    let and = conj.take() == Some(Conj::And);
                    if and {
                        if let Some(last) = clauses.last_mut() {
                            if last.occur != Occur::MustNot {
                                last.occur = Occur::Must;
                            }
                        }
                    }
                    let occur = if negate {
                        Occur::MustNot
                    } else if and {
                        Occur::Must
                    } else {
                        Occur::Should
                    };
                    negate = false;
                    seen_word = true;

                    let terms = analyze(&unescape(word));
                    if !terms.is_empty() {
                        clauses.push(Clause { occur, terms });
                    }
                }
            }
        }

        if let Some(dangling) = conj {
            return Err(QueryError::MissingOperand(dangling.keyword()));
        }
        if negate {
            return Err(QueryError::MissingOperand("NOT"));
        }
        if clauses.len() > MAX_CLAUSES {
            return Err(QueryError::TooManyClauses { count: clauses.len(), max: MAX_CLAUSES });
        }
        Ok(Query { clauses })
    }

    pub fn clauses(&self) -> &[Clause] { &self.clauses }

    pub fn is_empty(&self) -> bool { self.clauses.is_empty() }

    /// All terms in clause order, duplicates included.
    pub fn terms(&self) -> impl Iterator<Item = &str> + '_ {
        self.clauses.iter().flat_map(|c| c.terms.iter().map(String::as_str))
    }
}
