use std::sync::Arc;

use crate::foundation::error::{CanvasError, CanvasResult};

/// Ordered, bounded list of encoded reference images.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ReferenceSet {
    images: Vec<Arc<[u8]>>,
    limit: usize,
}

impl ReferenceSet {
    pub fn new(limit: usize) -> Self {
        Self {
            images: Vec::new(),
            limit,
        }
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.images.len() >= self.limit
    }

    pub fn images(&self) -> &[Arc<[u8]>] {
        &self.images
    }

    /// Append `image`; a full set rejects it and stays unchanged.
    pub fn add(&mut self, image: impl Into<Arc<[u8]>>) -> CanvasResult<usize> {
        if self.is_full() {
            return Err(CanvasError::capacity(format!(
                "reference limit of {} images reached",
                self.limit
            )));
        }
        self.images.push(image.into());
        Ok(self.images.len() - 1)
    }

    /// Remove the image at `index`; out-of-range indices are ignored.
    pub fn remove(&mut self, index: usize) -> Option<Arc<[u8]>> {
        (index < self.images.len()).then(|| self.images.remove(index))
    }

    pub fn clear(&mut self) {
        self.images.clear();
    }
}

#[cfg(test)]
#[path = "../../tests/unit/generate/references.rs"]
mod tests;
