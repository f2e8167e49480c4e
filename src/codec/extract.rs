//! PDF text extraction into a Word-readable envelope.
//!
//! Every page's text is extracted in page order and joined with a blank line
//! between pages. The output is the concatenated text as plain bytes under
//! the legacy `application/msword` MIME type with a `.doc` filename — a
//! Word-readable envelope, not structured markup. This path does not attempt
//! a layout-preserving DOCX reconstruction.
//!
//! A single failing page aborts the whole operation; there is no partial
//! output and no skip-and-continue.

use crate::artifact::{file_stem, ConvertedArtifact, SourceFile};
use crate::codec::binding;
use crate::config::EngineConfig;
use crate::error::ConvertError;
use tracing::{debug, info};

/// Extract plain text from every page of the input PDF.
pub async fn pdf_to_doc(
    input: &SourceFile,
    _config: &EngineConfig,
) -> Result<ConvertedArtifact, ConvertError> {
    let input = input.clone();

    let artifact = tokio::task::spawn_blocking(move || extract_blocking(&input))
        .await
        .map_err(|e| ConvertError::Internal(format!("Extract task panicked: {e}")))??;

    info!(name = %artifact.file_name, bytes = artifact.bytes.len(), "extracted document text");
    Ok(artifact)
}

fn extract_blocking(input: &SourceFile) -> Result<ConvertedArtifact, ConvertError> {
    let pdfium = binding::pdfium()?;

    let document = pdfium
        .load_pdf_from_byte_slice(&input.bytes, None)
        .map_err(|e| ConvertError::CorruptDocument {
            name: input.name.clone(),
            detail: format!("{e:?}"),
        })?;

    let pages = document.pages();
    let total_pages = pages.len() as usize;
    debug!(name = %input.name, total_pages, "PDF loaded");

    let mut page_texts = Vec::with_capacity(total_pages);
    for idx in 0..total_pages {
        let page = pages
            .get(idx as u16)
            .map_err(|e| ConvertError::ExtractFailed {
                page: Some(idx + 1),
                detail: format!("{e:?}"),
            })?;
        let text = page
            .text()
            .map_err(|e| ConvertError::ExtractFailed {
                page: Some(idx + 1),
                detail: format!("{e:?}"),
            })?
            .all();
        debug!(page = idx + 1, chars = text.len(), "extracted page text");
        page_texts.push(text);
    }

    let full_text = page_texts.join("\n\n");

    Ok(ConvertedArtifact {
        bytes: full_text.into_bytes(),
        file_name: format!("{}.doc", file_stem(&input.name)),
        mime: "application/msword",
    })
}
