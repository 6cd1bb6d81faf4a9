use crate::knowledge::{FaqEntry, KnowledgeBase};
use crate::tokenizer::normalize;
use crate::vector::{cosine_similarity, TermVector, VocabularyWeights};

/// Added to the similarity for every distinct keyword found in the query, in tenths.
const KEYWORD_BONUS_TENTHS: usize = 1;

#[derive(Debug, Clone, PartialEq)]
pub struct MatchResult<'a> {
    pub entry: Option<&'a FaqEntry>,
    pub score: f64,
    pub category: Option<&'a str>,
}

impl MatchResult<'_> {
    fn none() -> Self { Self { entry: None, score: 0.0, category: None } }
}

/// A knowledge base with IDF weights and per-entry vectors computed once.
#[derive(Debug, Clone)]
pub struct FaqIndex {
    kb: KnowledgeBase,
    weights: VocabularyWeights,
    /// `vectors[c][e]` belongs to entry `e` of category `c`.
    vectors: Vec<Vec<TermVector>>,
}

impl FaqIndex {
    pub fn build(kb: KnowledgeBase) -> Self {
        let tokens: Vec<Vec<Vec<String>>> = kb
            .categories()
            .iter()
            .map(|c| c.entries.iter().map(|e| normalize(&e.question)).collect())
            .collect();
        let weights = VocabularyWeights::build(tokens.iter().flatten().enumerate().map(|(id, t)| (id, t.as_slice())));
        let vectors = tokens
            .iter()
            .map(|cat| cat.iter().map(|t| weights.vector(t)).collect())
            .collect();
        tracing::info!(
            categories = kb.categories().len(),
            entries = weights.num_docs(),
            vocabulary = weights.vocabulary_len(),
            "built faq index"
        );
        Self { kb, weights, vectors }
    }

    pub fn knowledge_base(&self) -> &KnowledgeBase { &self.kb }
    pub fn weights(&self) -> &VocabularyWeights { &self.weights }
    pub fn num_entries(&self) -> usize { self.kb.num_entries() }

    /// Best entry for `query` by cosine similarity plus keyword bonus.
    ///
    /// Searches only `category` when given (an unknown category yields no match), otherwise
    /// every category in declared order. Ties keep the earliest entry, and only a positive
    /// score can produce a match.
    pub fn find_best_match(&self, query: &str, category: Option<&str>) -> MatchResult<'_> {
        let query_vector = self.weights.vector(&normalize(query));
        let query_lower = query.to_lowercase();

        let mut best = MatchResult::none();
        for (cat, vectors) in self.kb.categories().iter().zip(&self.vectors) {
            if category.is_some_and(|wanted| wanted != cat.name) {
                continue;
            }
            for (entry, entry_vector) in cat.entries.iter().zip(vectors) {
                let similarity = cosine_similarity(&query_vector, entry_vector);
                let score = similarity + keyword_bonus(entry, &query_lower);
                if score > best.score {
                    best = MatchResult { entry: Some(entry), score, category: Some(cat.name.as_str()) };
                }
            }
        }
        tracing::debug!(query, ?category, score = best.score, matched = ?best.category, "best match");
        best
    }
}

/// `0.1` per entry keyword that occurs in the lowercased query.
pub fn keyword_bonus(entry: &FaqEntry, query_lower: &str) -> f64 {
    let hits = entry.keywords.iter().filter(|k| query_lower.contains(k.as_str())).count();
    // tenths are divided rather than multiplied so 3 hits is exactly 0.3
    (hits * KEYWORD_BONUS_TENTHS) as f64 / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::knowledge::Category;

    fn kb(cats: Vec<(&str, Vec<FaqEntry>)>) -> KnowledgeBase {
        KnowledgeBase::new(cats.into_iter().map(|(n, e)| Category { name: n.to_string(), entries: e }).collect())
    }

    #[test]
    fn keyword_bonus_counts_distinct_hits() {
        let e = FaqEntry::new("q", "a", "fee,tuition,hostel");
        assert_eq!(keyword_bonus(&e, "nothing here"), 0.0);
        assert_eq!(keyword_bonus(&e, "fee and fee again"), 0.1);
        assert_eq!(keyword_bonus(&e, "tuition fee"), 0.2);
        assert_eq!(keyword_bonus(&e, "tuition fee hostel"), 0.3);
    }

    #[test]
    fn empty_scope_returns_no_match() {
        let index = FaqIndex::build(KnowledgeBase::empty_default());
        assert_eq!(index.find_best_match("anything at all", None), MatchResult::none());
    }

    #[test]
    fn unknown_category_returns_no_match() {
        let index = FaqIndex::build(kb(vec![("courses", vec![FaqEntry::new("Which courses are offered?", "Many.", "course")])]));
        let m = index.find_best_match("course list", Some("admissions"));
        assert!(m.entry.is_none());
    }

    #[test]
    fn restricts_to_category() {
        let index = FaqIndex::build(kb(vec![
            ("courses", vec![FaqEntry::new("Library opening hours", "courses answer", "library")]),
            ("facilities", vec![FaqEntry::new("Library opening hours", "facilities answer", "library")]),
        ]));
        let m = index.find_best_match("library hours", Some("facilities"));
        assert_eq!(m.entry.unwrap().answer, "facilities answer");
        assert_eq!(m.category, Some("facilities"));
    }

    #[test]
    fn earlier_entry_wins_ties() {
        let index = FaqIndex::build(kb(vec![
            ("a", vec![FaqEntry::new("Hostel accommodation fees", "first", "hostel")]),
            ("b", vec![FaqEntry::new("Hostel accommodation fees", "second", "hostel")]),
            ("c", vec![FaqEntry::new("Graduation ceremony date", "other", "")]),
        ]));
        for _ in 0..10 {
            let m = index.find_best_match("hostel fees", None);
            assert_eq!(m.entry.unwrap().answer, "first");
            assert_eq!(m.category, Some("a"));
        }
    }

    #[test]
    fn vectors_are_precomputed_per_entry() {
        let index = FaqIndex::build(kb(vec![
            ("a", vec![FaqEntry::new("one question", "x", ""), FaqEntry::new("two question", "y", "")]),
            ("b", vec![FaqEntry::new("three", "z", "")]),
        ]));
        assert_eq!(index.vectors.iter().map(Vec::len).collect::<Vec<_>>(), vec![2, 1]);
        assert_eq!(index.weights().num_docs(), 3);
    }
}
