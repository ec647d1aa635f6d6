//! Per-character font fallback for document text.
//!
//! ```text
//! register(path)  →  FontDescriptorTable  (ordered: priority)
//!                          │
//! measure / render  →  FontResolver  →  FaceCache  →  FontDriver::load_face
//!                          │
//!                   walk_units (per UTF-16 code unit)
//!                      ├─ measure: sum widths + spacing
//!                      └─ render:  ContentSink::set_face / draw_glyph_at
//! ```
//!
//! `FontSession` ties the pieces together; `SharedFontSession` puts one behind
//! a lock for processes that emit several documents in sequence.

pub mod descriptor;
pub mod face_cache;
pub mod font_driver;
pub mod metrics;
pub mod render;
pub mod resolver;
pub mod session;
pub mod shared;
pub mod truetype_driver;

#[cfg(test)]
pub(crate) mod mock_driver;

pub use descriptor::{ContainerFormat, FontDescriptor, FontDescriptorTable};
pub use face_cache::{DocumentId, FaceCache};
pub use font_driver::{FontDriver, ScannedFace};
pub use metrics::{PlacedUnit, TextLayoutState};
pub use render::{ContentSink, DrawCommand, DrawList};
pub use resolver::{FontResolver, ResolvedFace};
pub use session::FontSession;
pub use shared::{global, SharedFontSession};
pub use truetype_driver::{TrueTypeDriver, TrueTypeFace};
