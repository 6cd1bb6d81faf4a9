use std::collections::{BTreeMap, HashMap, HashSet};

pub type DocId = usize;

/// Inverse document frequency per term, fixed for one corpus snapshot.
#[derive(Debug, Clone, Default)]
pub struct VocabularyWeights {
    idf: HashMap<String, f64>,
    num_docs: usize,
}

impl VocabularyWeights {
    /// `idf = ln(N / (1 + df))`. Negative when a term appears in most documents; that is kept as is.
    pub fn build<'a, I>(corpus: I) -> Self
    where
        I: IntoIterator<Item = (DocId, &'a [String])>,
    {
        let mut df: HashMap<&str, u32> = HashMap::new();
        let mut num_docs = 0usize;
        for (_id, tokens) in corpus {
            num_docs += 1;
            let seen: HashSet<&str> = tokens.iter().map(|t| t.as_str()).collect();
            for term in seen {
                *df.entry(term).or_insert(0) += 1;
            }
        }
        let n = num_docs as f64;
        let idf = df
            .into_iter()
            .map(|(term, df_t)| (term.to_string(), (n / (1.0 + df_t as f64)).ln()))
            .collect();
        Self { idf, num_docs }
    }

    pub fn idf(&self, term: &str) -> Option<f64> { self.idf.get(term).copied() }
    pub fn num_docs(&self) -> usize { self.num_docs }
    pub fn vocabulary_len(&self) -> usize { self.idf.len() }

    /// tf * idf for every in-vocabulary term of `tokens`; unknown terms are dropped.
    pub fn vector(&self, tokens: &[String]) -> TermVector {
        let mut tf: BTreeMap<&str, u32> = BTreeMap::new();
        for t in tokens {
            *tf.entry(t.as_str()).or_insert(0) += 1;
        }
        let weights = tf
            .into_iter()
            .filter_map(|(term, count)| self.idf(term).map(|w| (term.to_string(), count as f64 * w)))
            .collect();
        TermVector { weights }
    }
}

/// Sparse term weights. Ordered so sums are taken in a fixed order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TermVector {
    weights: BTreeMap<String, f64>,
}

impl TermVector {
    pub fn get(&self, term: &str) -> f64 { self.weights.get(term).copied().unwrap_or(0.0) }
    pub fn len(&self) -> usize { self.weights.len() }
    pub fn is_empty(&self) -> bool { self.weights.is_empty() }
    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> { self.weights.iter().map(|(k, v)| (k.as_str(), *v)) }

    pub fn norm(&self) -> f64 {
        self.weights.values().map(|w| w * w).sum::<f64>().sqrt()
    }
}

impl FromIterator<(String, f64)> for TermVector {
    fn from_iter<T: IntoIterator<Item = (String, f64)>>(iter: T) -> Self {
        Self { weights: iter.into_iter().collect() }
    }
}

/// Dot product over the shared terms divided by both norms; `0` when either norm is zero.
pub fn cosine_similarity(a: &TermVector, b: &TermVector) -> f64 {
    let norm_a = a.norm();
    let norm_b = b.norm();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    // terms missing from either side contribute zero
    let dot: f64 = a.iter().map(|(term, w)| w * b.get(term)).sum();
    dot / (norm_a * norm_b)
}
