//! PDF rasterisation: render the first page to a PNG via pdfium.
//!
//! ## Why spawn_blocking?
//!
//! The `pdfium-render` crate wraps the pdfium C++ library, which uses
//! thread-local state internally and is not safe to call from async contexts.
//! `tokio::task::spawn_blocking` moves the work onto the blocking thread
//! pool, keeping the async workers responsive during CPU-heavy rendering.
//!
//! ## Why only page 1?
//!
//! First-page semantics are the product contract: the exported image always
//! corresponds to page 1, at a 2× linear scale of the page's natural size for
//! output sharpness. This tool never exports pages 2+.

use crate::artifact::{file_stem, ConvertedArtifact, SourceFile};
use crate::codec::binding;
use crate::config::EngineConfig;
use crate::error::ConvertError;
use pdfium_render::prelude::*;
use std::io::Cursor;
use tracing::{debug, info};

/// Render the first page of the input PDF as a PNG at the configured scale.
///
/// # Errors
/// - [`ConvertError::CorruptDocument`] — the container cannot be parsed
/// - [`ConvertError::NoPages`] — the document parsed but has zero pages
/// - [`ConvertError::RenderFailed`] — rasterisation or PNG encoding failed
pub async fn first_page_to_png(
    input: &SourceFile,
    config: &EngineConfig,
) -> Result<ConvertedArtifact, ConvertError> {
    let input = input.clone();
    let scale = config.raster_scale;

    let artifact = tokio::task::spawn_blocking(move || rasterize_blocking(&input, scale))
        .await
        .map_err(|e| ConvertError::Internal(format!("Render task panicked: {e}")))??;

    info!(
        name = %artifact.file_name,
        bytes = artifact.bytes.len(),
        "rendered first page"
    );

    Ok(artifact)
}

fn rasterize_blocking(input: &SourceFile, scale: f32) -> Result<ConvertedArtifact, ConvertError> {
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

    if total_pages == 0 {
        return Err(ConvertError::NoPages {
            name: input.name.clone(),
        });
    }

    let page = pages.get(0).map_err(|e| ConvertError::RenderFailed {
        page: 1,
        detail: format!("{e:?}"),
    })?;

    let render_config = PdfRenderConfig::new().scale_page_by_factor(scale);
    let bitmap = page
        .render_with_config(&render_config)
        .map_err(|e| ConvertError::RenderFailed {
            page: 1,
            detail: format!("{e:?}"),
        })?;

    let image = bitmap.as_image();
    debug!(
        width = image.width(),
        height = image.height(),
        "rasterised page 1"
    );

    let mut buf = Vec::new();
    image
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .map_err(|e| ConvertError::RenderFailed {
            page: 1,
            detail: format!("PNG encoding failed: {e}"),
        })?;

    Ok(ConvertedArtifact {
        bytes: buf,
        file_name: format!("{}_page1.png", file_stem(&input.name)),
        mime: "image/png",
    })
}
