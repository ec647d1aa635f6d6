//! A `FontSession` shared behind a lock.
//!
//! For processes that produce several documents in sequence from one font
//! registry. The document switch and every resolution run under the same
//! lock, so no caller can observe a half-switched session.

use super::face_cache::DocumentId;
use super::font_driver::FontDriver;
use super::session::FontSession;
use super::truetype_driver::TrueTypeDriver;
use crate::config::CONFIG;
use once_cell::sync::Lazy;
use std::sync::{Mutex, MutexGuard, PoisonError};

pub struct SharedFontSession<D: FontDriver> {
    inner: Mutex<FontSession<D>>,
}

impl<D: FontDriver> SharedFontSession<D> {
    pub fn new(session: FontSession<D>) -> Self {
        Self {
            inner: Mutex::new(session),
        }
    }

    /// Lock the session. A poisoned lock is recovered: the session holds no
    /// invariant a panicking caller could have broken half-way.
    pub fn lock(&self) -> MutexGuard<'_, FontSession<D>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Run `f` with exclusive access to the session.
    pub fn with<R>(&self, f: impl FnOnce(&mut FontSession<D>) -> R) -> R {
        f(&mut self.lock())
    }

    /// Switch the active document. See `FontSession::begin_document`.
    pub fn begin_document(&self, document: DocumentId) -> bool {
        self.lock().begin_document(document)
    }

    pub fn measure(&self, text: &str, font_size: f32) -> f32 {
        self.lock().measure(text, font_size)
    }
}

static GLOBAL: Lazy<SharedFontSession<TrueTypeDriver>> = Lazy::new(|| {
    SharedFontSession::new(FontSession::from_config(TrueTypeDriver::new(), &CONFIG))
});

/// The process-wide session, built from `CONFIG` on first use.
pub fn global() -> &'static SharedFontSession<TrueTypeDriver> {
    &GLOBAL
}
