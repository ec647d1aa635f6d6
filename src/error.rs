// src/error.rs

//! Caller-facing error type.
//!
//! Most failures in this crate are recovered locally (a missing path registers
//! nothing, a face that will not load is skipped, an absent glyph becomes a
//! space). Only the cases below ever reach a caller as an `Err`.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FontError {
    /// Text was rendered before any font was registered; there is no face to
    /// fall back to.
    #[error("font table is empty, register fonts before rendering text")]
    EmptyFontTable,
    /// The content sink refused a command.
    #[error("content sink failed: {0}")]
    Sink(#[source] anyhow::Error),
    #[error("failed to load font configuration from {path:?}: {source}")]
    Config {
        path: PathBuf,
        #[source]
        source: anyhow::Error,
    },
}
