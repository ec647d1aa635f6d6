//! Drawing text through a content sink, one code unit at a time.

use super::font_driver::FontDriver;
use super::metrics::{walk_units, TextLayoutState};
use super::resolver::FontResolver;
use crate::error::FontError;
use anyhow::Result;
use log::*;

/// Receiver of draw commands, typically a page content stream.
///
/// The sink does not advance the pen on its own; every glyph is placed at
/// the position given.
pub trait ContentSink<F> {
    /// Select the face and size for following glyphs.
    fn set_face(&mut self, face: &F, font_size: f32) -> Result<()>;

    /// Draw the glyph for `unit` with its origin at (`x`, `y`).
    fn draw_glyph_at(&mut self, x: f32, y: f32, unit: u16) -> Result<()>;
}

/// A recorded draw command.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand<F> {
    SetFace { face: F, font_size: f32 },
    Glyph { x: f32, y: f32, unit: u16 },
}

/// `ContentSink` that records commands in order.
#[derive(Debug, Clone)]
pub struct DrawList<F> {
    commands: Vec<DrawCommand<F>>,
}

impl<F> Default for DrawList<F> {
    fn default() -> Self {
        Self {
            commands: Vec::new(),
        }
    }
}

impl<F> DrawList<F> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn commands(&self) -> &[DrawCommand<F>] {
        &self.commands
    }

    /// Drawn glyphs as (x, y, unit), in drawing order.
    pub fn glyphs(&self) -> impl Iterator<Item = (f32, f32, u16)> + '_ {
        self.commands.iter().filter_map(|command| match command {
            DrawCommand::Glyph { x, y, unit } => Some((*x, *y, *unit)),
            DrawCommand::SetFace { .. } => None,
        })
    }

    /// The drawn text, decoded lossily from the recorded units.
    pub fn text(&self) -> String {
        let units: Vec<u16> = self.glyphs().map(|(_, _, unit)| unit).collect();
        String::from_utf16_lossy(&units)
    }

    pub fn clear(&mut self) {
        self.commands.clear();
    }
}

impl<F: Clone> ContentSink<F> for DrawList<F> {
    fn set_face(&mut self, face: &F, font_size: f32) -> Result<()> {
        self.commands.push(DrawCommand::SetFace {
            face: face.clone(),
            font_size,
        });
        Ok(())
    }

    fn draw_glyph_at(&mut self, x: f32, y: f32, unit: u16) -> Result<()> {
        self.commands.push(DrawCommand::Glyph { x, y, unit });
        Ok(())
    }
}

/// Draw `text` starting at (`x`, `y`) and return the final pen position.
///
/// Uses the same walk as `measure`, so the returned position is always
/// `x + measure(text, ...)` for the same arguments.
#[allow(clippy::too_many_arguments)]
pub fn render<D, S>(
    resolver: &mut FontResolver<'_, D>,
    sink: &mut S,
    text: &str,
    x: f32,
    y: f32,
    font_size: f32,
    character_spacing: f32,
    preferred: Option<&str>,
) -> Result<f32, FontError>
where
    D: FontDriver,
    S: ContentSink<D::Face>,
{
    if resolver.table().is_empty() {
        return Err(FontError::EmptyFontTable);
    }

    let mut state = TextLayoutState {
        pen_x: x,
        ..TextLayoutState::default()
    };
    state.valid_count = walk_units(resolver, text, font_size, preferred, |placed| {
        if placed.ordinal > 0 {
            state.pen_x += character_spacing;
        }
        sink.set_face(&placed.face, font_size)
            .and_then(|()| sink.draw_glyph_at(state.pen_x, y, placed.unit))
            .map_err(FontError::Sink)?;
        state.pen_x += placed.width;
        state.width = state.pen_x - x;
        Ok::<(), FontError>(())
    })?;

    trace!(
        "render: Drew {} unit(s), {:.2}pt wide",
        state.valid_count,
        state.width
    );
    Ok(state.pen_x)
}
