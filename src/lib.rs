// src/lib.rs

//! `fontmatch`: picks a font per character from an ordered list of font
//! files, caches the faces it loads, and measures or draws mixed-script text
//! for paginated document layout.
//!
//! ```ignore
//! use fontmatch::{DrawList, FontSession, TrueTypeDriver};
//!
//! let mut fonts = FontSession::new(TrueTypeDriver::new());
//! fonts.register("/usr/share/fonts/truetype/dejavu");
//! fonts.register("/usr/share/fonts/opentype/noto/NotoSansCJK-Regular.ttc");
//!
//! let width = fonts.measure("Hello 世界", 12.0);
//! let mut page = DrawList::new();
//! let end_x = fonts.render(&mut page, "Hello 世界", 72.0, 720.0, 12.0)?;
//! assert_eq!(end_x, 72.0 + width);
//! ```

pub mod config;
pub mod error;
pub mod fonts;

pub use config::{FontConfig, CONFIG};
pub use error::FontError;
pub use fonts::{
    global, ContainerFormat, ContentSink, DocumentId, DrawCommand, DrawList, FontDescriptor,
    FontDescriptorTable, FontDriver, FontSession, ScannedFace, SharedFontSession, TrueTypeDriver,
    TrueTypeFace,
};
