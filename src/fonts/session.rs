//! The font session: one descriptor table, one face cache, one active
//! document.
//!
//! `FontSession` is the entry point for callers. It owns the driver, registers
//! fonts, keeps faces bound to the active output document, and measures or
//! renders text with per-character fallback.

use super::descriptor::{FontDescriptor, FontDescriptorTable};
use super::face_cache::{DocumentId, FaceCache};
use super::font_driver::FontDriver;
use super::metrics;
use super::render::{self, ContentSink};
use super::resolver::FontResolver;
use crate::config::FontConfig;
use crate::error::FontError;
use log::*;
use std::path::Path;

pub struct FontSession<D: FontDriver> {
    driver: D,
    table: FontDescriptorTable,
    cache: FaceCache<D::Face>,
    default_font_size: f32,
    character_spacing: f32,
    preferred_font: Option<String>,
}

impl<D: FontDriver> FontSession<D> {
    /// Create an empty session bound to a fresh document.
    ///
    /// # Arguments
    /// * `driver` - Font driver used to scan, load and query faces
    ///
    /// # Returns
    /// A session with no registered fonts and the default size and spacing
    pub fn new(driver: D) -> Self {
        let defaults = FontConfig::default();
        Self {
            driver,
            table: FontDescriptorTable::new(),
            cache: FaceCache::new(DocumentId::next()),
            default_font_size: defaults.default_font_size,
            character_spacing: defaults.character_spacing,
            preferred_font: defaults.preferred_font,
        }
    }

    /// Create a session and register every configured font path in order.
    ///
    /// # Arguments
    /// * `driver` - Font driver used to scan, load and query faces
    /// * `config` - Font paths, default size, spacing and preferred font
    ///
    /// # Returns
    /// A session whose priority order follows `config.font_paths`. Paths
    /// that yield no usable face are logged and skipped.
    pub fn from_config(driver: D, config: &FontConfig) -> Self {
        let mut session = Self::new(driver);
        session.default_font_size = config.default_font_size;
        session.character_spacing = config.character_spacing;
        session.preferred_font = config.preferred_font.clone();
        for path in &config.font_paths {
            session.register(path);
        }
        info!(
            "FontSession: {} face(s) registered from configuration",
            session.table.len()
        );
        session
    }

    /// Register a font file or directory. See `FontDescriptorTable::register`.
    pub fn register(&mut self, path: impl AsRef<Path>) -> usize {
        self.table.register(&self.driver, path)
    }

    /// Add a descriptor directly, after any already registered.
    pub fn insert(&mut self, descriptor: FontDescriptor) -> bool {
        self.table.insert(descriptor)
    }

    /// Forget every registered font and every cached face.
    pub fn clear(&mut self) {
        info!(
            "FontSession: Clearing {} descriptor(s) and {} cached face(s)",
            self.table.len(),
            self.cache.len()
        );
        self.table.clear();
        self.cache.invalidate();
    }

    /// Registered identifiers in priority order.
    pub fn list(&self) -> Vec<&str> {
        self.table.list()
    }

    pub fn descriptor(&self, identifier: &str) -> Option<&FontDescriptor> {
        self.table.get(identifier)
    }

    pub fn table(&self) -> &FontDescriptorTable {
        &self.table
    }

    pub fn driver(&self) -> &D {
        &self.driver
    }

    /// Make `document` the active output scope. Faces loaded for a previous
    /// document are dropped. Returns whether the document changed.
    pub fn begin_document(&mut self, document: DocumentId) -> bool {
        self.cache.switch_document(document)
    }

    pub fn document(&self) -> DocumentId {
        self.cache.document()
    }

    /// Drop every cached face without changing documents.
    pub fn invalidate_cache(&mut self) {
        self.cache.invalidate();
    }

    /// Faces instantiated so far for the active document, in priority order.
    pub fn loaded_faces(&self) -> Vec<D::Face> {
        self.table
            .iter()
            .filter_map(|descriptor| self.cache.cached(&descriptor.identifier).cloned())
            .collect()
    }

    /// The face that would draw the UTF-16 code unit `unit`.
    pub fn resolve(&mut self, unit: u16, preferred: Option<&str>) -> Option<D::Face> {
        FontResolver::new(&self.driver, &self.table, &mut self.cache)
            .resolve_with_preference(unit, preferred)
            .map(|resolved| resolved.face)
    }

    /// Width of `text` in points, using the configured preferred font.
    pub fn measure(&mut self, text: &str, font_size: f32) -> f32 {
        let preferred = self.preferred_font.take();
        let width = self.measure_with_preference(text, font_size, preferred.as_deref());
        self.preferred_font = preferred;
        width
    }

    pub fn measure_with_preference(
        &mut self,
        text: &str,
        font_size: f32,
        preferred: Option<&str>,
    ) -> f32 {
        let mut resolver = FontResolver::new(&self.driver, &self.table, &mut self.cache);
        metrics::measure(
            &mut resolver,
            text,
            font_size,
            self.character_spacing,
            preferred,
        )
    }

    pub fn measure_default(&mut self, text: &str) -> f32 {
        self.measure(text, self.default_font_size)
    }

    /// Draw `text` at (`x`, `y`) and return the final pen x position.
    ///
    /// Fails with `FontError::EmptyFontTable` when no font is registered.
    pub fn render<S>(
        &mut self,
        sink: &mut S,
        text: &str,
        x: f32,
        y: f32,
        font_size: f32,
    ) -> Result<f32, FontError>
    where
        S: ContentSink<D::Face>,
    {
        let preferred = self.preferred_font.take();
        let end = self.render_with_preference(sink, text, x, y, font_size, preferred.as_deref());
        self.preferred_font = preferred;
        end
    }

    pub fn render_with_preference<S>(
        &mut self,
        sink: &mut S,
        text: &str,
        x: f32,
        y: f32,
        font_size: f32,
        preferred: Option<&str>,
    ) -> Result<f32, FontError>
    where
        S: ContentSink<D::Face>,
    {
        let mut resolver = FontResolver::new(&self.driver, &self.table, &mut self.cache);
        render::render(
            &mut resolver,
            sink,
            text,
            x,
            y,
            font_size,
            self.character_spacing,
            preferred,
        )
    }

    pub fn render_default<S>(
        &mut self,
        sink: &mut S,
        text: &str,
        x: f32,
        y: f32,
    ) -> Result<f32, FontError>
    where
        S: ContentSink<D::Face>,
    {
        self.render(sink, text, x, y, self.default_font_size)
    }

    pub fn default_font_size(&self) -> f32 {
        self.default_font_size
    }

    pub fn set_default_font_size(&mut self, font_size: f32) {
        self.default_font_size = font_size;
    }

    pub fn character_spacing(&self) -> f32 {
        self.character_spacing
    }

    pub fn set_character_spacing(&mut self, spacing: f32) {
        self.character_spacing = spacing;
    }

    pub fn preferred_font(&self) -> Option<&str> {
        self.preferred_font.as_deref()
    }

    pub fn set_preferred_font(&mut self, identifier: Option<String>) {
        self.preferred_font = identifier;
    }
}
