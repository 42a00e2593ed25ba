//! In-memory presentation host used by `--dry-run` and tests.

use super::PresentationHost;
use crate::error::SlidesError;
use crate::operation::OperationBatch;
use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

#[derive(Debug, Default)]
struct State {
    presentations: Vec<(String, String)>,
    batches: Vec<(String, OperationBatch)>,
}

/// Records every presentation and batch instead of publishing them.
#[derive(Debug, Default)]
pub struct MemoryHost {
    state: Mutex<State>,
    next_id: AtomicUsize,
    reject_with: Option<String>,
}

impl MemoryHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// A host that refuses every batch with `detail`.
    pub fn rejecting(detail: impl Into<String>) -> Self {
        Self {
            reject_with: Some(detail.into()),
            ..Self::default()
        }
    }

    /// `(id, title)` of every presentation created so far.
    pub fn presentations(&self) -> Vec<(String, String)> {
        self.lock().presentations.clone()
    }

    /// Every batch applied so far, with its presentation id.
    pub fn batches(&self) -> Vec<(String, OperationBatch)> {
        self.lock().batches.clone()
    }

    /// Number of host calls of either kind.
    pub fn call_count(&self) -> usize {
        let state = self.lock();
        state.presentations.len() + state.batches.len()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, State> {
        // A poisoned lock only means a test panicked mid-call; the data is
        // still usable.
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[async_trait]
impl PresentationHost for MemoryHost {
    async fn create_presentation(&self, title: &str) -> Result<String, SlidesError> {
        let n = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
        let id = format!("dry-run-{n}");
        self.lock()
            .presentations
            .push((id.clone(), title.to_string()));
        Ok(id)
    }

    async fn apply_batch(
        &self,
        presentation_id: &str,
        batch: &OperationBatch,
    ) -> Result<(), SlidesError> {
        if let Some(ref detail) = self.reject_with {
            return Err(SlidesError::HostRejected {
                detail: detail.clone(),
            });
        }
        let mut state = self.lock();
        if !state.presentations.iter().any(|(id, _)| id == presentation_id) {
            return Err(SlidesError::HostRejected {
                detail: format!("unknown presentation '{presentation_id}'"),
            });
        }
        state
            .batches
            .push((presentation_id.to_string(), batch.clone()));
        Ok(())
    }
}
