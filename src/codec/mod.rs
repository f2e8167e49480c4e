//! Format codec adapter: four conversion operations behind one dispatch seam.
//!
//! Each submodule implements exactly one conversion direction. Keeping the
//! stages separate makes each independently testable and lets a backend be
//! swapped (e.g. a different PDF engine) without touching the others.
//!
//! ## Data flow
//!
//! ```text
//! ImageToPdf   images ──▶ compose   ──▶ one PDF page per image, input order
//! WordToPdf    docx   ──▶ richtext  ──▶ raw text, reflowed + paginated PDF
//! PdfToImage   pdf    ──▶ rasterize ──▶ first page at 2×, PNG
//! PdfToWord    pdf    ──▶ extract   ──▶ all pages' text, .doc envelope
//! ```
//!
//! Every operation is async but stateless: CPU-bound native work (pdfium,
//! printpdf, image codecs) runs on `tokio::task::spawn_blocking`, ordering
//! within an operation is strictly sequential (image\[i\] before
//! image\[i+1\], page 1 before page 2), and nothing persists between calls
//! apart from the process-wide pdfium binding in [`binding`].

pub mod binding;
pub mod compose;
pub mod extract;
pub mod rasterize;
pub mod richtext;

pub use binding::pdfium_available;

use crate::artifact::{ConvertedArtifact, SourceFile};
use crate::config::{EngineConfig, ToolKind};
use crate::error::ConvertError;

/// Dispatch one conversion to the operation matching `tool`.
///
/// Batch tools receive the whole input sequence; single-file tools convert
/// the first entry (their intake cap is 1, so there is never another). An
/// empty input sequence is an error for every tool.
pub async fn run(
    tool: ToolKind,
    inputs: &[SourceFile],
    config: &EngineConfig,
) -> Result<ConvertedArtifact, ConvertError> {
    let first = inputs.first().ok_or(ConvertError::EmptyInput)?;
    match tool {
        ToolKind::ImageToPdf => compose::images_to_pdf(inputs, config).await,
        ToolKind::WordToPdf => richtext::docx_to_pdf(first, config).await,
        ToolKind::PdfToImage => rasterize::first_page_to_png(first, config).await,
        ToolKind::PdfToWord => extract::pdf_to_doc(first, config).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn empty_input_is_an_error_for_every_tool() {
        let config = EngineConfig::default();
        for tool in ToolKind::ALL {
            let err = run(tool, &[], &config).await.unwrap_err();
            assert!(
                matches!(err, ConvertError::EmptyInput),
                "{tool:?} accepted an empty input sequence"
            );
        }
    }
}
