//! Font container parsing and per-face glyph query primitives.
//!
//! This module defines the `FontDriver` trait, the seam between the fallback
//! logic in this crate and whatever actually decodes font files. The
//! `FontSession` uses it to implement registration, caching and fallback.

use super::descriptor::ContainerFormat;
use super::face_cache::DocumentId;
use anyhow::Result;
use std::path::Path;

/// Metadata for one face found while scanning a font container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScannedFace {
    /// Position inside a collection file; `None` for single-face containers.
    pub face_index: Option<u32>,
    /// Stable name from the face's naming table (PostScript name, else family).
    pub name: Option<String>,
    /// Whether the face maps Unicode characters to glyphs. Faces without such
    /// a mapping cannot be embedded and are never registered.
    pub has_unicode_cmap: bool,
}

/// Font driver trait.
///
/// Implementors wrap a font parser and handle:
/// - Enumerating the faces of a container file
/// - Instantiating a face for a given output document
/// - Glyph presence and advance width queries
///
/// Characters are UTF-16 code units. Units that cannot stand alone as a
/// `char` (surrogates) are never present in any face.
pub trait FontDriver {
    /// Instantiated face handle. Cloning must be cheap; clones share the face.
    type Face: Clone;

    /// List the faces of the container at `path`.
    ///
    /// # Arguments
    /// * `path` - Font file to scan
    /// * `format` - Container format, usually from the file suffix
    ///
    /// # Returns
    /// One entry per face in container order. Single-face formats yield
    /// exactly one entry with `face_index == None`. Errors if the file cannot
    /// be read or is not a font of that format.
    fn scan_container(&self, path: &Path, format: ContainerFormat) -> Result<Vec<ScannedFace>>;

    /// Instantiate a face for an output document.
    ///
    /// # Arguments
    /// * `document` - Output scope the handle is bound to
    /// * `path` - Font file holding the face
    /// * `face_index` - Position inside a collection, `None` for single faces
    ///
    /// # Returns
    /// A face handle, only valid while `document` is the active output scope,
    /// or error if the file can no longer be read or parsed
    fn load_face(
        &self,
        document: DocumentId,
        path: &Path,
        face_index: Option<u32>,
    ) -> Result<Self::Face>;

    /// Whether an instantiated face still has a usable character map.
    fn has_unicode_cmap(&self, face: &Self::Face) -> bool;

    /// Check whether a face can draw a code unit.
    ///
    /// # Arguments
    /// * `face` - Face to search in
    /// * `unit` - UTF-16 code unit
    ///
    /// # Returns
    /// `Ok(true)` if the face maps the unit to a real glyph (not `.notdef`).
    /// An `Err` means the face could not be queried; callers treat it as absent.
    fn has_glyph(&self, face: &Self::Face, unit: u16) -> Result<bool>;

    /// Horizontal advance of a code unit.
    ///
    /// # Arguments
    /// * `face` - Face containing the glyph
    /// * `unit` - UTF-16 code unit
    ///
    /// # Returns
    /// Advance in 1000-units-per-em font space, or error if the face has no
    /// glyph or no metrics for the unit
    fn advance_width(&self, face: &Self::Face, unit: u16) -> Result<f32>;
}
