//! FAQ answer engine: normalization, TF-IDF matching and response policy over a fixed knowledge base.

pub mod classify;
pub mod knowledge;
pub mod matcher;
pub mod persist;
pub mod response;
pub mod snapshot;
pub mod tokenizer;
pub mod vector;

pub use classify::extract_category;
pub use knowledge::{Category, FaqEntry, KnowledgeBase};
pub use matcher::{FaqIndex, MatchResult};
pub use response::{Response, ResponseGenerator};
pub use snapshot::SharedIndex;
pub use vector::{cosine_similarity, TermVector, VocabularyWeights};
