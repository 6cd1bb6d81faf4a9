use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Categories present in the empty knowledge base used when the source cannot be loaded.
pub const DEFAULT_CATEGORIES: &[&str] = &["admissions", "courses", "registration", "facilities"];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FaqEntry {
    pub question: String,
    pub answer: String,
    /// Trimmed, lowercased, never empty.
    pub keywords: BTreeSet<String>,
}

impl FaqEntry {
    pub fn new(question: impl Into<String>, answer: impl Into<String>, keywords: &str) -> Self {
        Self { question: question.into(), answer: answer.into(), keywords: parse_keywords(keywords.split(',')) }
    }
}

/// Trim, lowercase and deduplicate keywords, dropping empty ones.
pub fn parse_keywords<'a, I: IntoIterator<Item = &'a str>>(raw: I) -> BTreeSet<String> {
    raw.into_iter()
        .map(|k| k.trim().to_lowercase())
        .filter(|k| !k.is_empty())
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub name: String,
    pub entries: Vec<FaqEntry>,
}

/// Categorized entries in declared order. Never mutated after construction.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct KnowledgeBase {
    categories: Vec<Category>,
}

impl KnowledgeBase {
    pub fn new(categories: Vec<Category>) -> Self { Self { categories } }

    /// Empty knowledge base keyed by [`DEFAULT_CATEGORIES`].
    pub fn empty_default() -> Self {
        let categories = DEFAULT_CATEGORIES
            .iter()
            .map(|name| Category { name: (*name).to_string(), entries: Vec::new() })
            .collect();
        Self { categories }
    }

    pub fn categories(&self) -> &[Category] { &self.categories }

    pub fn category(&self, name: &str) -> Option<&Category> {
        self.categories.iter().find(|c| c.name == name)
    }

    pub fn num_entries(&self) -> usize {
        self.categories.iter().map(|c| c.entries.len()).sum()
    }

    /// All entries in iteration order, paired with their category name.
    pub fn entries(&self) -> impl Iterator<Item = (&str, &FaqEntry)> {
        self.categories
            .iter()
            .flat_map(|c| c.entries.iter().map(move |e| (c.name.as_str(), e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keywords_are_normalized_into_a_set() {
        let e = FaqEntry::new("q", "a", " Fees, tuition ,,FEES, ");
        let kws: Vec<&str> = e.keywords.iter().map(|s| s.as_str()).collect();
        assert_eq!(kws, vec!["fees", "tuition"]);
    }

    #[test]
    fn empty_default_keeps_category_order() {
        let kb = KnowledgeBase::empty_default();
        let names: Vec<&str> = kb.categories().iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, DEFAULT_CATEGORIES);
        assert_eq!(kb.num_entries(), 0);
    }
}
