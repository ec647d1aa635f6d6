//! Ordered registry of font faces available for fallback.
//!
//! Insertion order is resolution priority: the first registered face that has
//! a glyph for a character wins.

use super::font_driver::FontDriver;
use log::*;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Font container formats recognised by file suffix (case-insensitive).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContainerFormat {
    /// `.ttf`: one TrueType outline face.
    TrueType,
    /// `.otf`: one OpenType (CFF or TrueType outline) face.
    OpenType,
    /// `.ttc`: a collection holding several faces.
    Collection,
}

impl ContainerFormat {
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "ttf" => Some(ContainerFormat::TrueType),
            "otf" => Some(ContainerFormat::OpenType),
            "ttc" => Some(ContainerFormat::Collection),
            _ => None,
        }
    }

    pub fn is_collection(self) -> bool {
        self == ContainerFormat::Collection
    }
}

/// One registered face.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FontDescriptor {
    /// Unique key: the face's PostScript/family name, or the file path
    /// (`path#index` for collection faces) when the face has no name.
    pub identifier: String,
    pub file_path: PathBuf,
    /// Set only for faces inside a collection.
    pub face_index: Option<u32>,
}

impl FontDescriptor {
    fn fallback_identifier(file_path: &Path, face_index: Option<u32>) -> String {
        match face_index {
            Some(index) => format!("{}#{}", file_path.display(), index),
            None => file_path.display().to_string(),
        }
    }
}

/// Identifier → descriptor map that remembers insertion order.
#[derive(Debug, Default, Clone)]
pub struct FontDescriptorTable {
    entries: Vec<FontDescriptor>,
    index: HashMap<String, usize>,
}

impl FontDescriptorTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a font file, or every supported font file in a directory.
    ///
    /// Directories are scanned non-recursively in file-name order. An explicit
    /// file path is registered even when its suffix is unknown, as a
    /// single-face container. Returns the number of descriptors added;
    /// identifiers already present are skipped.
    pub fn register<D: FontDriver>(&mut self, driver: &D, path: impl AsRef<Path>) -> usize {
        let path = path.as_ref();
        let metadata = match fs::metadata(path) {
            Ok(metadata) => metadata,
            Err(e) => {
                warn!(
                    "FontDescriptorTable: Path '{}' not found: {}",
                    path.display(),
                    e
                );
                return 0;
            }
        };

        if metadata.is_file() {
            let format = ContainerFormat::from_path(path).unwrap_or(ContainerFormat::TrueType);
            return self.register_file(driver, path, format);
        }

        if !metadata.is_dir() {
            return 0;
        }

        let mut files: Vec<(PathBuf, ContainerFormat)> = match fs::read_dir(path) {
            Ok(entries) => entries
                .filter_map(|entry| entry.ok())
                .map(|entry| entry.path())
                .filter(|file| file.is_file())
                .filter_map(|file| ContainerFormat::from_path(&file).map(|format| (file, format)))
                .collect(),
            Err(e) => {
                warn!(
                    "FontDescriptorTable: Failed to read directory '{}': {}",
                    path.display(),
                    e
                );
                return 0;
            }
        };
        files.sort_by(|a, b| a.0.file_name().cmp(&b.0.file_name()));

        let added: usize = files
            .iter()
            .map(|(file, format)| self.register_file(driver, file, *format))
            .sum();
        info!(
            "FontDescriptorTable: Registered {} face(s) from directory '{}'",
            added,
            path.display()
        );
        added
    }

    fn register_file<D: FontDriver>(
        &mut self,
        driver: &D,
        path: &Path,
        format: ContainerFormat,
    ) -> usize {
        let file_path = fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf());

        let faces = match driver.scan_container(&file_path, format) {
            Ok(faces) => faces,
            Err(e) => {
                warn!(
                    "FontDescriptorTable: Failed to scan '{}': {:#}",
                    file_path.display(),
                    e
                );
                return 0;
            }
        };

        if format.is_collection() {
            if faces.is_empty() {
                warn!(
                    "FontDescriptorTable: No faces found in collection '{}'",
                    file_path.display()
                );
            } else {
                info!(
                    "FontDescriptorTable: Found {} face(s) in collection '{}'",
                    faces.len(),
                    file_path.display()
                );
            }
        }

        let mut added = 0;
        for face in faces {
            if !face.has_unicode_cmap {
                debug!(
                    "FontDescriptorTable: Skipping face {:?} of '{}' (no Unicode cmap)",
                    face.face_index,
                    file_path.display()
                );
                continue;
            }
            let identifier = face
                .name
                .filter(|name| !name.is_empty())
                .unwrap_or_else(|| {
                    FontDescriptor::fallback_identifier(&file_path, face.face_index)
                });
            let inserted = self.insert(FontDescriptor {
                identifier,
                file_path: file_path.clone(),
                face_index: face.face_index,
            });
            if inserted {
                added += 1;
            }
        }
        added
    }

    /// Append a descriptor. Returns `false` (and changes nothing) when the
    /// identifier is already registered.
    pub fn insert(&mut self, descriptor: FontDescriptor) -> bool {
        if self.index.contains_key(&descriptor.identifier) {
            trace!(
                "FontDescriptorTable: '{}' already registered",
                descriptor.identifier
            );
            return false;
        }
        debug!(
            "FontDescriptorTable: Registered '{}' ({}, face {:?})",
            descriptor.identifier,
            descriptor.file_path.display(),
            descriptor.face_index
        );
        self.index
            .insert(descriptor.identifier.clone(), self.entries.len());
        self.entries.push(descriptor);
        true
    }

    pub fn get(&self, identifier: &str) -> Option<&FontDescriptor> {
        self.index.get(identifier).map(|&i| &self.entries[i])
    }

    /// Identifiers in priority order.
    pub fn list(&self) -> Vec<&str> {
        self.entries.iter().map(|d| d.identifier.as_str()).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FontDescriptor> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.index.clear();
    }
}
