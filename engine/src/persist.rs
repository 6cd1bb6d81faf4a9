use crate::knowledge::{parse_keywords, Category, FaqEntry, KnowledgeBase};
use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

pub const DEFAULT_KB_PATH: &str = "knowledge_base/faqs.json";

#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct LoadReport {
    pub categories: usize,
    pub entries: usize,
    /// Entries rejected for a missing or mistyped `question`/`answer`.
    pub skipped: usize,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawKeywords {
    Csv(String),
    List(Vec<String>),
}

#[derive(Deserialize)]
struct RawEntry {
    question: String,
    answer: String,
    #[serde(default)]
    keywords: Option<RawKeywords>,
}

impl From<RawEntry> for FaqEntry {
    fn from(raw: RawEntry) -> Self {
        let keywords = match raw.keywords {
            Some(RawKeywords::Csv(s)) => parse_keywords(s.split(',')),
            Some(RawKeywords::List(v)) => parse_keywords(v.iter().map(|s| s.as_str())),
            None => Default::default(),
        };
        FaqEntry { question: raw.question, answer: raw.answer, keywords }
    }
}

/// Load the knowledge base, substituting the empty default on any failure.
pub fn load_knowledge_base<P: AsRef<Path>>(path: P) -> KnowledgeBase {
    let path = path.as_ref();
    match try_load_knowledge_base(path) {
        Ok((kb, report)) => {
            tracing::info!(path = %path.display(), categories = report.categories, entries = report.entries, skipped = report.skipped, "loaded knowledge base");
            kb
        }
        Err(err) => {
            tracing::warn!(path = %path.display(), error = %err, "knowledge base unavailable, using empty default");
            KnowledgeBase::empty_default()
        }
    }
}

pub fn try_load_knowledge_base<P: AsRef<Path>>(path: P) -> Result<(KnowledgeBase, LoadReport)> {
    let path = path.as_ref();
    let f = File::open(path).with_context(|| format!("opening {}", path.display()))?;
    let json: Value = serde_json::from_reader(BufReader::new(f)).with_context(|| format!("parsing {}", path.display()))?;
    parse_knowledge_base(json)
}

/// Build a knowledge base from a parsed document, skipping malformed entries.
pub fn parse_knowledge_base(json: Value) -> Result<(KnowledgeBase, LoadReport)> {
    let Value::Object(map) = json else {
        return Err(anyhow!("knowledge base must be an object of category -> entries"));
    };
    let mut report = LoadReport::default();
    let mut categories = Vec::with_capacity(map.len());
    for (name, value) in map {
        let items = match value {
            Value::Array(items) => items,
            other => {
                tracing::warn!(category = %name, kind = json_kind(&other), "category is not a list, treating as empty");
                Vec::new()
            }
        };
        let mut entries = Vec::with_capacity(items.len());
        for (pos, item) in items.into_iter().enumerate() {
            match serde_json::from_value::<RawEntry>(item) {
                Ok(raw) => entries.push(FaqEntry::from(raw)),
                Err(err) => {
                    tracing::warn!(category = %name, pos, error = %err, "skipping malformed entry");
                    report.skipped += 1;
                }
            }
        }
        report.entries += entries.len();
        categories.push(Category { name, entries });
    }
    report.categories = categories.len();
    Ok((KnowledgeBase::new(categories), report))
}

fn json_kind(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn skips_malformed_entries() {
        let doc = json!({
            "admissions": [
                { "question": "How do I apply?", "answer": "Online.", "keywords": "apply" },
                { "question": "No answer here" },
                { "answer": "No question here" }
            ],
            "courses": [
                { "question": "Which courses?", "answer": "Many.", "keywords": ["Course", " program "] }
            ]
        });
        let (kb, report) = parse_knowledge_base(doc).unwrap();
        assert_eq!(report, LoadReport { categories: 2, entries: 2, skipped: 2 });
        assert_eq!(kb.categories()[0].entries.len(), 1);
        let kws: Vec<&str> = kb.categories()[1].entries[0].keywords.iter().map(|s| s.as_str()).collect();
        assert_eq!(kws, vec!["course", "program"]);
    }

    #[test]
    fn preserves_document_order() {
        let doc: Value = serde_json::from_str(r#"{"zeta": [], "alpha": [], "mid": []}"#).unwrap();
        let (kb, _) = parse_knowledge_base(doc).unwrap();
        let names: Vec<&str> = kb.categories().iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["zeta", "alpha", "mid"]);
    }

    #[test]
    fn non_list_category_is_empty() {
        let (kb, report) = parse_knowledge_base(json!({ "facilities": "oops" })).unwrap();
        assert_eq!(report.entries, 0);
        assert!(kb.category("facilities").unwrap().entries.is_empty());
    }

    #[test]
    fn rejects_non_object_document() {
        assert!(parse_knowledge_base(json!([1, 2, 3])).is_err());
    }
}
