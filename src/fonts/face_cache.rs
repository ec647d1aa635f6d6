//! Lazily instantiated faces, scoped to one output document.

use super::descriptor::FontDescriptorTable;
use super::font_driver::FontDriver;
use log::*;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_DOCUMENT_ID: AtomicU64 = AtomicU64::new(1);

/// Identifies one output document (the scope that owns instantiated faces).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DocumentId(pub u64);

impl DocumentId {
    /// A process-unique id for a new document.
    pub fn next() -> Self {
        DocumentId(NEXT_DOCUMENT_ID.fetch_add(1, Ordering::Relaxed))
    }
}

/// Identifier → face cache.
///
/// Holds at most one face per identifier for the active document. Faces that
/// failed to instantiate are remembered and not retried until the cache is
/// invalidated.
#[derive(Debug)]
pub struct FaceCache<F> {
    document: DocumentId,
    faces: HashMap<String, F>,
    failed: HashSet<String>,
}

impl<F: Clone> FaceCache<F> {
    pub fn new(document: DocumentId) -> Self {
        Self {
            document,
            faces: HashMap::new(),
            failed: HashSet::new(),
        }
    }

    pub fn document(&self) -> DocumentId {
        self.document
    }

    /// Make `document` the active scope. Switching to a different document
    /// drops every cached face. Returns whether a switch happened.
    pub fn switch_document(&mut self, document: DocumentId) -> bool {
        if self.document == document {
            return false;
        }
        info!(
            "FaceCache: Switching document {:?} -> {:?}, dropping {} face(s)",
            self.document,
            document,
            self.faces.len()
        );
        self.invalidate();
        self.document = document;
        true
    }

    pub fn invalidate(&mut self) {
        self.faces.clear();
        self.failed.clear();
    }

    /// Return the face for `identifier`, instantiating it on first use.
    ///
    /// Returns `None` when the identifier is not registered, the face cannot
    /// be loaded, or it has no usable character map.
    pub fn get<D>(&mut self, identifier: &str, table: &FontDescriptorTable, driver: &D) -> Option<F>
    where
        D: FontDriver<Face = F>,
    {
        if let Some(face) = self.faces.get(identifier) {
            trace!("FaceCache: Cache hit for '{}'", identifier);
            return Some(face.clone());
        }
        if self.failed.contains(identifier) {
            return None;
        }

        let descriptor = table.get(identifier)?;
        let face = match driver.load_face(self.document, &descriptor.file_path, descriptor.face_index)
        {
            Ok(face) => face,
            Err(e) => {
                warn!(
                    "FaceCache: Failed to load '{}' from '{}': {:#}",
                    identifier,
                    descriptor.file_path.display(),
                    e
                );
                self.failed.insert(identifier.to_string());
                return None;
            }
        };

        if !driver.has_unicode_cmap(&face) {
            warn!(
                "FaceCache: '{}' has no usable Unicode cmap, skipping",
                identifier
            );
            self.failed.insert(identifier.to_string());
            return None;
        }

        debug!(
            "FaceCache: Loaded '{}' for document {:?}",
            identifier, self.document
        );
        self.faces.insert(identifier.to_string(), face.clone());
        Some(face)
    }

    /// The cached face for `identifier`, without loading anything.
    pub fn cached(&self, identifier: &str) -> Option<&F> {
        self.faces.get(identifier)
    }

    pub fn len(&self) -> usize {
        self.faces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.faces.is_empty()
    }
}
