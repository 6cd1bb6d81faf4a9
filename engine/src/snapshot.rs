use crate::knowledge::KnowledgeBase;
use crate::matcher::FaqIndex;
use crate::persist::load_knowledge_base;
use crate::response::{Response, ResponseGenerator};
use parking_lot::RwLock;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Process-wide index that queries read through cheap `Arc` snapshots.
///
/// A reload builds the new index without holding the lock and then swaps it in,
/// so a query sees either the old index or the new one, never a partial rebuild.
pub struct SharedIndex {
    source: Option<PathBuf>,
    current: RwLock<Arc<FaqIndex>>,
}

impl SharedIndex {
    /// Load from `path`, falling back to the empty default knowledge base.
    pub fn load<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref().to_path_buf();
        let index = FaqIndex::build(load_knowledge_base(&path));
        Self { source: Some(path), current: RwLock::new(Arc::new(index)) }
    }

    /// Fixed in-memory knowledge base; [`reload`](Self::reload) is a no-op.
    pub fn from_knowledge_base(kb: KnowledgeBase) -> Self {
        Self { source: None, current: RwLock::new(Arc::new(FaqIndex::build(kb))) }
    }

    pub fn source(&self) -> Option<&Path> { self.source.as_deref() }

    pub fn snapshot(&self) -> Arc<FaqIndex> { self.current.read().clone() }

    /// Re-read the source and publish the new index. Returns the index now being served.
    pub fn reload(&self) -> Arc<FaqIndex> {
        let Some(path) = &self.source else {
            return self.snapshot();
        };
        let fresh = Arc::new(FaqIndex::build(load_knowledge_base(path)));
        *self.current.write() = fresh.clone();
        tracing::info!(path = %path.display(), entries = fresh.num_entries(), "knowledge base reloaded");
        fresh
    }

    /// Replace the served index with one built from `kb`.
    pub fn replace(&self, kb: KnowledgeBase) -> Arc<FaqIndex> {
        let fresh = Arc::new(FaqIndex::build(kb));
        *self.current.write() = fresh.clone();
        fresh
    }

    pub fn generator(&self) -> ResponseGenerator { ResponseGenerator::new(self.snapshot()) }

    pub fn generate_response(&self, message: &str) -> Response { self.generator().generate_response(message) }
}
