//! Per-character face selection.
//!
//! Table order is the only priority signal. The first face (in table order)
//! that has a glyph for the character wins; if none does, the first face that
//! instantiated at all is returned so the caller can draw a blank in its place.

use super::descriptor::FontDescriptorTable;
use super::face_cache::FaceCache;
use super::font_driver::FontDriver;
use log::*;

/// A face picked for one code unit.
#[derive(Debug, Clone)]
pub struct ResolvedFace<'t, F> {
    pub identifier: &'t str,
    pub face: F,
    /// `false` when this is the fallback face and the unit must be replaced.
    pub has_glyph: bool,
}

/// Borrowed view over a driver, a descriptor table and its face cache.
pub struct FontResolver<'a, D: FontDriver> {
    driver: &'a D,
    table: &'a FontDescriptorTable,
    cache: &'a mut FaceCache<D::Face>,
}

impl<'a, D: FontDriver> FontResolver<'a, D> {
    pub fn new(
        driver: &'a D,
        table: &'a FontDescriptorTable,
        cache: &'a mut FaceCache<D::Face>,
    ) -> Self {
        Self {
            driver,
            table,
            cache,
        }
    }

    pub fn driver(&self) -> &'a D {
        self.driver
    }

    pub fn table(&self) -> &'a FontDescriptorTable {
        self.table
    }

    /// Glyph presence with query errors folded into "absent".
    pub fn contains(&self, face: &D::Face, unit: u16) -> bool {
        self.driver.has_glyph(face, unit).unwrap_or_else(|e| {
            trace!(
                "FontResolver: Glyph query for U+{:04X} failed, treating as absent: {:#}",
                unit,
                e
            );
            false
        })
    }

    /// First face in table order with a glyph for `unit`, else the first face
    /// that loads. `None` when nothing loads.
    pub fn resolve_in_order(&mut self, unit: u16) -> Option<ResolvedFace<'a, D::Face>> {
        let table = self.table;
        let mut first_loaded: Option<ResolvedFace<'a, D::Face>> = None;

        for descriptor in table.iter() {
            let identifier = descriptor.identifier.as_str();
            let Some(face) = self.cache.get(identifier, table, self.driver) else {
                continue;
            };

            if self.contains(&face, unit) {
                debug!(
                    "FontResolver: Found U+{:04X} in '{}'",
                    unit, identifier
                );
                return Some(ResolvedFace {
                    identifier,
                    face,
                    has_glyph: true,
                });
            }

            if first_loaded.is_none() {
                first_loaded = Some(ResolvedFace {
                    identifier,
                    face,
                    has_glyph: false,
                });
            }
        }

        if let Some(fallback) = &first_loaded {
            debug!(
                "FontResolver: No face has U+{:04X}, falling back to '{}'",
                unit, fallback.identifier
            );
        }
        first_loaded
    }

    /// Try `preferred` first, then the ordered scan.
    ///
    /// The preference is checked again for every unit; a miss does not
    /// demote it for the rest of the text.
    pub fn resolve_with_preference(
        &mut self,
        unit: u16,
        preferred: Option<&str>,
    ) -> Option<ResolvedFace<'a, D::Face>> {
        let table = self.table;
        if let Some(descriptor) = preferred.and_then(|id| table.get(id)) {
            let identifier = descriptor.identifier.as_str();
            if let Some(face) = self.cache.get(identifier, table, self.driver) {
                if self.contains(&face, unit) {
                    trace!(
                        "FontResolver: Preferred '{}' has U+{:04X}",
                        identifier, unit
                    );
                    return Some(ResolvedFace {
                        identifier,
                        face,
                        has_glyph: true,
                    });
                }
            }
        }
        self.resolve_in_order(unit)
    }
}
