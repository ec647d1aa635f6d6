//! `FontDriver` backed by `ttf-parser`.
//!
//! Handles TrueType (`.ttf`), OpenType (`.otf`) and TrueType collection
//! (`.ttc`) files. Font bytes are read once per file and document, and shared
//! by every face of the file and every clone of a face handle. Glyph lookups
//! are memoized per face, so each code unit is parsed out of the font once.

use super::descriptor::ContainerFormat;
use super::face_cache::DocumentId;
use super::font_driver::{FontDriver, ScannedFace};
use anyhow::{anyhow, Context, Result};
use log::*;
use std::fmt;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use ttf_parser::{name_id, Face, GlyphId};

/// What a face knows about one code unit.
#[derive(Debug, Clone, Copy)]
struct GlyphInfo {
    glyph: GlyphId,
    /// Horizontal advance in font units, if the face has metrics for it.
    advance: Option<u16>,
}

struct FaceData {
    data: Arc<[u8]>,
    index: u32,
    path: PathBuf,
    document: DocumentId,
    units_per_em: u16,
    name: Option<String>,
    has_unicode_cmap: bool,
    /// Memoized lookups; `None` means the unit has no glyph.
    glyphs: Mutex<HashMap<u16, Option<GlyphInfo>>>,
}

/// An instantiated face. Clones share the underlying font bytes.
#[derive(Clone)]
pub struct TrueTypeFace {
    inner: Arc<FaceData>,
}

impl TrueTypeFace {
    /// Raw font file bytes, for embedding.
    pub fn data(&self) -> &[u8] {
        &self.inner.data
    }

    pub fn face_index(&self) -> u32 {
        self.inner.index
    }

    pub fn path(&self) -> &Path {
        &self.inner.path
    }

    /// The document this face was instantiated for.
    pub fn document(&self) -> DocumentId {
        self.inner.document
    }

    pub fn units_per_em(&self) -> u16 {
        self.inner.units_per_em
    }

    pub fn name(&self) -> Option<&str> {
        self.inner.name.as_deref()
    }

    /// Number of code units whose glyph lookup has been memoized.
    pub fn cached_units(&self) -> usize {
        self.glyph_cache().len()
    }

    fn glyph_cache(&self) -> MutexGuard<'_, HashMap<u16, Option<GlyphInfo>>> {
        self.inner
            .glyphs
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Look up `unit`, parsing the face only on the first query for it.
    fn lookup(&self, unit: u16) -> Result<Option<GlyphInfo>> {
        if let Some(info) = self.glyph_cache().get(&unit) {
            return Ok(*info);
        }

        let face = Face::parse(&self.inner.data, self.inner.index).map_err(|e| {
            anyhow!(
                "Failed to parse face {} of '{}': {}",
                self.inner.index,
                self.inner.path.display(),
                e
            )
        })?;
        let info = glyph_for_unit(&face, unit).map(|glyph| GlyphInfo {
            glyph,
            advance: face.glyph_hor_advance(glyph),
        });
        self.glyph_cache().insert(unit, info);
        Ok(info)
    }
}

impl PartialEq for TrueTypeFace {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl fmt::Debug for TrueTypeFace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TrueTypeFace")
            .field("name", &self.inner.name)
            .field("path", &self.inner.path)
            .field("index", &self.inner.index)
            .field("document", &self.inner.document)
            .finish()
    }
}

/// PostScript name, else family name.
fn face_name(face: &Face<'_>) -> Option<String> {
    [name_id::POST_SCRIPT_NAME, name_id::FAMILY]
        .into_iter()
        .find_map(|id| {
            face.names()
                .into_iter()
                .filter(|name| name.name_id == id)
                .find_map(|name| name.to_string())
                .filter(|name| !name.is_empty())
        })
}

fn has_unicode_cmap(face: &Face<'_>) -> bool {
    face.tables()
        .cmap
        .map_or(false, |cmap| cmap.subtables.into_iter().any(|s| s.is_unicode()))
}

/// Maps a code unit to a non-`.notdef` glyph.
fn glyph_for_unit(face: &Face<'_>, unit: u16) -> Option<GlyphId> {
    let ch = char::from_u32(u32::from(unit))?;
    face.glyph_index(ch).filter(|glyph| glyph.0 != 0)
}

/// Driver for TrueType/OpenType files and collections.
///
/// Keeps a weak map of file bytes per (document, path) so that faces of the
/// same collection instantiated for one document share a single buffer.
#[derive(Debug, Default)]
pub struct TrueTypeDriver {
    files: Mutex<HashMap<(DocumentId, PathBuf), Weak<[u8]>>>,
}

impl TrueTypeDriver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bytes of `path` for `document`, read from disk unless a live face of
    /// the same document already holds them.
    fn file_data(&self, document: DocumentId, path: &Path) -> Result<Arc<[u8]>> {
        let mut files = self.files.lock().unwrap_or_else(PoisonError::into_inner);
        let key = (document, path.to_path_buf());
        if let Some(data) = files.get(&key).and_then(Weak::upgrade) {
            trace!("TrueTypeDriver: Reusing bytes of '{}'", path.display());
            return Ok(data);
        }

        let data: Arc<[u8]> = fs::read(path)
            .with_context(|| format!("Failed to read '{}'", path.display()))?
            .into();
        files.retain(|_, weak| weak.strong_count() > 0);
        files.insert(key, Arc::downgrade(&data));
        Ok(data)
    }
}

impl FontDriver for TrueTypeDriver {
    type Face = TrueTypeFace;

    fn scan_container(&self, path: &Path, format: ContainerFormat) -> Result<Vec<ScannedFace>> {
        let data =
            fs::read(path).with_context(|| format!("Failed to read '{}'", path.display()))?;

        let count = if format.is_collection() {
            ttf_parser::fonts_in_collection(&data)
                .ok_or_else(|| anyhow!("'{}' is not a font collection", path.display()))?
        } else {
            1
        };

        let mut faces = Vec::with_capacity(count as usize);
        for index in 0..count {
            match Face::parse(&data, index) {
                Ok(face) => faces.push(ScannedFace {
                    face_index: format.is_collection().then_some(index),
                    name: face_name(&face),
                    has_unicode_cmap: has_unicode_cmap(&face),
                }),
                Err(e) if format.is_collection() => {
                    warn!(
                        "TrueTypeDriver: Skipping face {} of '{}': {}",
                        index,
                        path.display(),
                        e
                    );
                }
                Err(e) => {
                    return Err(anyhow!("Failed to parse '{}': {}", path.display(), e));
                }
            }
        }
        Ok(faces)
    }

    fn load_face(
        &self,
        document: DocumentId,
        path: &Path,
        face_index: Option<u32>,
    ) -> Result<Self::Face> {
        let data = self.file_data(document, path)?;
        let index = face_index.unwrap_or(0);

        let (units_per_em, name, has_cmap) = {
            let face = Face::parse(&data, index).map_err(|e| {
                anyhow!("Failed to parse face {} of '{}': {}", index, path.display(), e)
            })?;
            (face.units_per_em(), face_name(&face), has_unicode_cmap(&face))
        };

        trace!(
            "TrueTypeDriver: Loaded face {} of '{}' ({:?}, {} units/em)",
            index,
            path.display(),
            name,
            units_per_em
        );

        Ok(TrueTypeFace {
            inner: Arc::new(FaceData {
                data,
                index,
                path: path.to_path_buf(),
                document,
                units_per_em,
                name,
                has_unicode_cmap: has_cmap,
                glyphs: Mutex::new(HashMap::new()),
            }),
        })
    }

    fn has_unicode_cmap(&self, face: &Self::Face) -> bool {
        face.inner.has_unicode_cmap
    }

    fn has_glyph(&self, face: &Self::Face, unit: u16) -> Result<bool> {
        Ok(face.lookup(unit)?.is_some())
    }

    fn advance_width(&self, face: &Self::Face, unit: u16) -> Result<f32> {
        let info = face
            .lookup(unit)?
            .ok_or_else(|| anyhow!("No glyph for U+{:04X} in '{}'", unit, face.path().display()))?;
        let advance = info.advance.ok_or_else(|| {
            anyhow!(
                "No horizontal metrics for glyph {} in '{}'",
                info.glyph.0,
                face.path().display()
            )
        })?;
        Ok(f32::from(advance) * 1000.0 / f32::from(face.units_per_em()))
    }
}
