//! Error types for the swiftconvert library.
//!
//! One error type covers the whole pipeline because every failure here is
//! terminal for the operation that raised it: a conversion either yields an
//! artifact or it yields a [`ConvertError`], and the session guarantees that a
//! failed conversion leaves the staged files untouched.
//!
//! Intake rejection is NOT an error. Files that miss the
//! extension allow-list or the per-tool cap are filtered silently by
//! [`crate::intake::accept`] — the observed behavior of the product, where a
//! drop of unsupported files simply stages nothing.

use thiserror::Error;

/// All errors returned by the swiftconvert library.
#[derive(Debug, Error)]
pub enum ConvertError {
    // ── Codec errors ──────────────────────────────────────────────────────
    /// An input could not be interpreted as a raster image.
    #[error("Could not decode '{name}' as an image: {detail}")]
    DecodeFailed { name: String, detail: String },

    /// Page rasterisation or raster encoding failed.
    #[error("Rasterisation failed for page {page}: {detail}")]
    RenderFailed { page: usize, detail: String },

    /// Text extraction failed. `page` is 1-indexed when the failure is
    /// attributable to a specific page, `None` for container-level failures
    /// (e.g. a DOCX archive missing its main document part).
    #[error("Text extraction failed{}: {detail}", page_suffix(.page))]
    ExtractFailed { page: Option<usize>, detail: String },

    /// The document parsed cleanly but contains zero pages.
    #[error("Document '{name}' has no pages to render")]
    NoPages { name: String },

    /// The container format could not be parsed at all.
    #[error("Document '{name}' could not be parsed: {detail}")]
    CorruptDocument { name: String, detail: String },

    /// A codec operation was invoked with no input files.
    ///
    /// The session's `Staged` precondition normally makes this unreachable;
    /// calling the codec directly with an empty sequence is an error, never a
    /// silent success.
    #[error("Conversion requires at least one input file")]
    EmptyInput,

    // ── Binding errors ────────────────────────────────────────────────────
    /// Could not bind to a pdfium library.
    #[error(
        "Failed to bind to pdfium library: {0}\n\
Install pdfium or set PDFIUM_LIB_PATH to an existing copy."
    )]
    BindingFailed(String),

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

fn page_suffix(page: &Option<usize>) -> String {
    match page {
        Some(p) => format!(" on page {p}"),
        None => String::new(),
    }
}
