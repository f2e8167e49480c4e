//! One-time pdfium binding.
//!
//! The product configured its PDF worker once at module load and never
//! touched it again. The equivalent here is a process-wide binding acquired on
//! first use through [`once_cell`]'s guarded initializer: configure once
//! before any codec call, never mutate afterward. A failed bind is NOT cached
//! — a later call retries, so a user who installs pdfium mid-session is not
//! locked out.
//!
//! Resolution order: `PDFIUM_LIB_PATH` (explicit override), the current
//! directory, then the system library.

use crate::error::ConvertError;
use once_cell::sync::OnceCell;
use pdfium_render::prelude::*;

/// Newtype wrapper so the process-wide [`Pdfium`] handle can live in a
/// `static`. The `thread_safe` feature serialises every pdfium call through an
/// internal mutex, so sharing the handle across threads is sound even though
/// the upstream type is not auto-marked `Send`/`Sync`.
struct SyncPdfium(Pdfium);

// SAFETY: the `thread_safe` feature of pdfium-render guards all library calls
// with an internal mutex, so concurrent access through a shared reference is
// serialised and safe.
unsafe impl Send for SyncPdfium {}
unsafe impl Sync for SyncPdfium {}

static PDFIUM: OnceCell<SyncPdfium> = OnceCell::new();

/// The process-wide pdfium handle, bound on first use.
pub(crate) fn pdfium() -> Result<&'static Pdfium, ConvertError> {
    PDFIUM
        .get_or_try_init(|| {
            let bindings = bind()?;
            Ok(SyncPdfium(Pdfium::new(bindings)))
        })
        .map(|p| &p.0)
}

fn bind() -> Result<Box<dyn PdfiumLibraryBindings>, ConvertError> {
    if let Ok(dir) = std::env::var("PDFIUM_LIB_PATH") {
        return Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name_at_path(&dir))
            .map_err(|e| ConvertError::BindingFailed(format!("PDFIUM_LIB_PATH={dir}: {e}")));
    }

    Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name_at_path("./"))
        .or_else(|_| Pdfium::bind_to_system_library())
        .map_err(|e| ConvertError::BindingFailed(e.to_string()))
}

/// Whether a pdfium library can be bound in this process.
///
/// Used by integration tests to skip pdfium-dependent scenarios on machines
/// without the native library, and available to hosts that want to disable
/// the PDF tools up front rather than fail at convert time.
pub fn pdfium_available() -> bool {
    pdfium().is_ok()
}
