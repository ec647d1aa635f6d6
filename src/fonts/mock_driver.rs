//! In-memory `FontDriver` used by the unit tests.

use super::descriptor::ContainerFormat;
use super::face_cache::DocumentId;
use super::font_driver::{FontDriver, ScannedFace};
use anyhow::{anyhow, Result};
use std::cell::Cell;
use std::collections::{HashMap, HashSet};
use std::path::Path;
use std::sync::Arc;

/// Description of one face in the mock database.
#[derive(Debug, Clone, Default)]
pub struct MockFace {
    pub name: Option<String>,
    pub has_cmap: bool,
    /// Code unit → advance in 1000 units.
    pub glyphs: HashMap<u16, f32>,
    /// Instantiation fails for this face.
    pub broken: bool,
    /// Glyph queries error out for these units.
    pub query_errors: HashSet<u16>,
    /// Advance queries error out for these units even though a glyph exists.
    pub advance_errors: HashSet<u16>,
}

impl MockFace {
    pub fn named(name: &str) -> Self {
        MockFace {
            name: Some(name.to_string()),
            has_cmap: true,
            ..Default::default()
        }
    }

    pub fn unnamed() -> Self {
        MockFace {
            has_cmap: true,
            ..Default::default()
        }
    }

    pub fn without_cmap(mut self) -> Self {
        self.has_cmap = false;
        self
    }

    /// Every character of `chars` gets the same advance.
    pub fn with_glyphs(mut self, chars: &str, advance: f32) -> Self {
        for unit in chars.encode_utf16() {
            self.glyphs.insert(unit, advance);
        }
        self
    }

    pub fn broken(mut self) -> Self {
        self.broken = true;
        self
    }

    pub fn with_query_error(mut self, ch: char) -> Self {
        self.query_errors.insert(ch as u16);
        self
    }

    pub fn with_advance_error(mut self, ch: char) -> Self {
        self.advance_errors.insert(ch as u16);
        self
    }
}

/// Represents the font files on "disk", keyed by file name.
#[derive(Debug, Default)]
pub struct MockFontDatabase {
    files: HashMap<String, Vec<MockFace>>,
}

impl MockFontDatabase {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_file(&mut self, file_name: &str, faces: Vec<MockFace>) {
        self.files.insert(file_name.to_string(), faces);
    }

    fn faces(&self, path: &Path) -> Option<&Vec<MockFace>> {
        let name = path.file_name()?.to_str()?;
        self.files.get(name)
    }
}

#[derive(Debug, Clone)]
pub struct MockFaceHandle {
    pub label: String,
    pub document: DocumentId,
    pub face: Arc<MockFace>,
}

impl PartialEq for MockFaceHandle {
    fn eq(&self, other: &Self) -> bool {
        self.label == other.label && self.document == other.document
    }
}

#[derive(Debug)]
pub struct MockFontDriver<'db> {
    db: &'db MockFontDatabase,
    loads: Cell<usize>,
}

impl<'db> MockFontDriver<'db> {
    pub fn new(db: &'db MockFontDatabase) -> Self {
        Self {
            db,
            loads: Cell::new(0),
        }
    }

    /// Number of `load_face` calls, successful or not.
    pub fn load_count(&self) -> usize {
        self.loads.get()
    }
}

impl<'db> FontDriver for MockFontDriver<'db> {
    type Face = MockFaceHandle;

    fn scan_container(&self, path: &Path, format: ContainerFormat) -> Result<Vec<ScannedFace>> {
        let faces = self
            .db
            .faces(path)
            .ok_or_else(|| anyhow!("MockFontDriver: '{}' is not a font", path.display()))?;
        let faces = if format.is_collection() {
            &faces[..]
        } else {
            &faces[..faces.len().min(1)]
        };
        Ok(faces
            .iter()
            .enumerate()
            .map(|(i, face)| ScannedFace {
                face_index: format.is_collection().then_some(i as u32),
                name: face.name.clone(),
                has_unicode_cmap: face.has_cmap,
            })
            .collect())
    }

    fn load_face(
        &self,
        document: DocumentId,
        path: &Path,
        face_index: Option<u32>,
    ) -> Result<Self::Face> {
        self.loads.set(self.loads.get() + 1);
        let face = self
            .db
            .faces(path)
            .and_then(|faces| faces.get(face_index.unwrap_or(0) as usize))
            .ok_or_else(|| anyhow!("MockFontDriver: no face {:?} in '{}'", face_index, path.display()))?;
        if face.broken {
            return Err(anyhow!("MockFontDriver: '{}' is corrupt", path.display()));
        }
        Ok(MockFaceHandle {
            label: face
                .name
                .clone()
                .unwrap_or_else(|| path.display().to_string()),
            document,
            face: Arc::new(face.clone()),
        })
    }

    fn has_unicode_cmap(&self, face: &Self::Face) -> bool {
        face.face.has_cmap
    }

    fn has_glyph(&self, face: &Self::Face, unit: u16) -> Result<bool> {
        if face.face.query_errors.contains(&unit) {
            return Err(anyhow!("MockFontDriver: glyph query failed"));
        }
        Ok(face.face.glyphs.contains_key(&unit))
    }

    fn advance_width(&self, face: &Self::Face, unit: u16) -> Result<f32> {
        if face.face.advance_errors.contains(&unit) {
            return Err(anyhow!("MockFontDriver: I/O error reading hmtx"));
        }
        face.face
            .glyphs
            .get(&unit)
            .copied()
            .ok_or_else(|| anyhow!("MockFontDriver: no glyph for U+{:04X}", unit))
    }
}
