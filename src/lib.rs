//! # swiftconvert
//!
//! On-device file conversion: image→PDF, Word→PDF, PDF→image, and PDF→text,
//! with nothing leaving the process.
//!
//! ## Why this crate?
//!
//! The interesting part of a client-side converter is not the codecs — mature
//! libraries decode JPEGs and parse PDFs better than any re-derivation would.
//! It is the orchestration: validating what the user dropped, dispatching the
//! right transformation, and guaranteeing that every temporary in-memory
//! reference created for a preview or a download is released exactly once
//! across every success, failure, and reset path. This crate makes that
//! lifecycle a first-class, testable object instead of a scatter of UI
//! teardown hooks.
//!
//! ## Pipeline Overview
//!
//! ```text
//! selection
//!  │
//!  ├─ 1. Intake   allow-list + per-tool cap, silent filtering
//!  ├─ 2. Stage    StagedFile items, preview references for images
//!  ├─ 3. Convert  codec dispatch by ToolKind (pdfium / printpdf / zip+xml)
//!  ├─ 4. Store    artifact registered as a revocable object reference
//!  └─ 5. Reset    deterministic release of every outstanding reference
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use swiftconvert::{ConversionSession, SourceFile, ToolKind};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut session = ConversionSession::new(ToolKind::ImageToPdf);
//!     session.intake(vec![SourceFile::new(
//!         "photo.jpg",
//!         std::fs::read("photo.jpg")?,
//!     )]);
//!     session.convert().await?;
//!
//!     let result = session.result().expect("conversion completed");
//!     let stored = session.resolve(result.reference()).expect("live reference");
//!     std::fs::write(result.file_name(), stored.bytes.as_slice())?;
//!
//!     session.reset(); // releases the preview and result references
//!     Ok(())
//! }
//! ```
//!
//! ## Tools
//!
//! | Tool | Input | Output |
//! |------|-------|--------|
//! | [`ToolKind::ImageToPdf`] | up to 20 jpg/jpeg/png/webp | one PDF, one page per image |
//! | [`ToolKind::WordToPdf`]  | one docx/doc | paginated text-only PDF |
//! | [`ToolKind::PdfToImage`] | one pdf | first page as PNG at 2× |
//! | [`ToolKind::PdfToWord`]  | one pdf | all pages' text, Word-readable |
//!
//! The PDF-reading tools need a pdfium native library at runtime (system
//! install or `PDFIUM_LIB_PATH`); see [`codec::pdfium_available`].

// ── Modules ──────────────────────────────────────────────────────────────

pub mod artifact;
pub mod codec;
pub mod config;
pub mod error;
pub mod intake;
pub mod session;
pub mod store;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use artifact::{file_stem, ConvertedArtifact, SourceFile};
pub use config::{EngineConfig, EngineConfigBuilder, ToolKind};
pub use error::ConvertError;
pub use session::{
    ConversionSession, FileId, FileStatus, SessionState, StagedFile, StoredArtifact,
};
pub use store::{ObjectRef, ObjectStore, StoredObject};
