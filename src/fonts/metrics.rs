//! Text width measurement.
//!
//! Text is walked one UTF-16 code unit at a time. Each unit gets a face from
//! the resolver; units the face lacks are replaced by a space. Measuring and
//! rendering share `walk_units`, so a rendered run always ends exactly where
//! `measure` says it does.

use super::font_driver::FontDriver;
use super::resolver::FontResolver;
use log::*;

/// Code unit substituted for characters no registered face can draw.
pub const SPACE: u16 = b' ' as u16;

/// One measurable unit of text, after face resolution and substitution.
#[derive(Debug, Clone)]
pub struct PlacedUnit<F> {
    pub face: F,
    /// The unit to draw; `SPACE` when the original had no glyph.
    pub unit: u16,
    /// The unit as it appeared in the text.
    pub source_unit: u16,
    /// Advance in points at the requested size, spacing excluded.
    pub width: f32,
    /// Position among the counted units (0-based).
    pub ordinal: usize,
}

/// Running totals for one measure/render call.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TextLayoutState {
    pub pen_x: f32,
    pub width: f32,
    pub valid_count: usize,
}

/// Converts a 1000-units-per-em advance to points.
pub fn scale_advance(advance: f32, font_size: f32) -> f32 {
    advance / 1000.0 * font_size
}

/// Resolve, substitute and size every code unit of `text`, handing each
/// counted unit to `visit`.
///
/// Units with no face at all are skipped. Units whose advance query fails are
/// skipped and not counted, while substituted units are counted.
pub fn walk_units<D, E>(
    resolver: &mut FontResolver<'_, D>,
    text: &str,
    font_size: f32,
    preferred: Option<&str>,
    mut visit: impl FnMut(&PlacedUnit<D::Face>) -> Result<(), E>,
) -> Result<usize, E>
where
    D: FontDriver,
{
    let driver = resolver.driver();
    let mut valid_count = 0;

    for source_unit in text.encode_utf16() {
        let Some(resolved) = resolver.resolve_with_preference(source_unit, preferred) else {
            trace!("walk_units: No face for U+{:04X}, skipping", source_unit);
            continue;
        };

        let unit = if resolved.has_glyph { source_unit } else { SPACE };

        let advance = match driver.advance_width(&resolved.face, unit) {
            Ok(advance) => advance,
            Err(e) => {
                warn!(
                    "walk_units: Failed to measure U+{:04X} in '{}': {:#}",
                    unit, resolved.identifier, e
                );
                continue;
            }
        };

        visit(&PlacedUnit {
            face: resolved.face,
            unit,
            source_unit,
            width: scale_advance(advance, font_size),
            ordinal: valid_count,
        })?;
        valid_count += 1;
    }

    Ok(valid_count)
}

/// Total width of `text` in points, including `character_spacing` between
/// counted units. Zero for empty text or an empty table.
pub fn measure<D: FontDriver>(
    resolver: &mut FontResolver<'_, D>,
    text: &str,
    font_size: f32,
    character_spacing: f32,
    preferred: Option<&str>,
) -> f32 {
    if text.is_empty() || resolver.table().is_empty() {
        return 0.0;
    }

    let mut state = TextLayoutState::default();
    let walked = walk_units(resolver, text, font_size, preferred, |placed| {
        state.width += placed.width;
        Ok::<(), std::convert::Infallible>(())
    });
    state.valid_count = match walked {
        Ok(count) => count,
        Err(never) => match never {},
    };

    if state.valid_count > 1 {
        state.width += character_spacing * (state.valid_count - 1) as f32;
    }
    state.width
}
