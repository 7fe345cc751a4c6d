use crate::store::Corpus;
use crate::IngestError;
use parking_lot::RwLock;
use std::sync::Arc;
use tracing::info;

/// Readers hold an `Arc` snapshot; a reload only blocks them for the pointer swap.
#[derive(Clone)]
pub struct SharedCorpus {
    current: Arc<RwLock<Arc<Corpus>>>,
}

impl SharedCorpus {
    pub fn new(corpus: Corpus) -> Self {
        Self {
            current: Arc::new(RwLock::new(Arc::new(corpus))),
        }
    }

    pub fn snapshot(&self) -> Arc<Corpus> {
        Arc::clone(&self.current.read())
    }

    /// On failure the previous snapshot stays active.
    pub fn reload(&self) -> Result<Arc<Corpus>, IngestError> {
        let rebuilt = Arc::new(self.snapshot().reload()?);
        *self.current.write() = Arc::clone(&rebuilt);
        info!(books = rebuilt.len(), "swapped in reloaded corpus");
        Ok(rebuilt)
    }
}
