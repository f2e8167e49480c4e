//! Image composition: one PDF page per input image, in input order.
//!
//! ## Why fit-to-width only?
//!
//! The product placed every image at a fixed 10 mm margin scaled to the
//! printable width, height following proportionally, and shipped that way.
//! Fit-to-width is therefore the contract: portrait, landscape, and panorama
//! inputs all fill the same width, and a sufficiently tall image may run past
//! the bottom margin rather than shrink.

use crate::artifact::{ConvertedArtifact, SourceFile};
use crate::config::EngineConfig;
use crate::error::ConvertError;
use printpdf::{image_crate, Image, ImageTransform, Mm, PdfDocument};
use std::io::Cursor;
use tracing::{debug, info};

/// Output name is fixed for this path regardless of input names.
const OUTPUT_NAME: &str = "converted_document.pdf";

/// DPI the embedded images are declared at; placement math scales from it.
const EMBED_DPI: f32 = 300.0;

/// Compose the input images into a single PDF, one page per image.
///
/// Fails with [`ConvertError::DecodeFailed`] if any input cannot be
/// interpreted as a raster image — a single bad input aborts the whole batch.
/// An empty input sequence is an error, never an empty document.
pub async fn images_to_pdf(
    inputs: &[SourceFile],
    config: &EngineConfig,
) -> Result<ConvertedArtifact, ConvertError> {
    if inputs.is_empty() {
        return Err(ConvertError::EmptyInput);
    }

    let inputs = inputs.to_vec();
    let page_count = inputs.len();
    let config = config.clone();

    let bytes = tokio::task::spawn_blocking(move || compose_blocking(&inputs, &config))
        .await
        .map_err(|e| ConvertError::Internal(format!("Compose task panicked: {e}")))??;

    info!(pages = page_count, bytes = bytes.len(), "composed image PDF");

    Ok(ConvertedArtifact {
        bytes,
        file_name: OUTPUT_NAME.to_string(),
        mime: "application/pdf",
    })
}

fn compose_blocking(inputs: &[SourceFile], config: &EngineConfig) -> Result<Vec<u8>, ConvertError> {
    let page_w = config.page_width_mm;
    let page_h = config.page_height_mm;
    let margin = config.image_margin_mm;
    let target_w = config.printable_image_width_mm();

    let (doc, first_page, first_layer) =
        PdfDocument::new("converted_document", Mm(page_w), Mm(page_h), "Layer 1");
    let mut current = (first_page, first_layer);

    for (i, input) in inputs.iter().enumerate() {
        let (decoded, px_w, px_h) = decode_for_embedding(input)?;
        debug!(name = %input.name, px_w, px_h, "decoded image");

        if i > 0 {
            current = doc.add_page(Mm(page_w), Mm(page_h), "Layer 1");
        }
        let layer = doc.get_page(current.0).get_layer(current.1);

        // Natural size at EMBED_DPI, then scale to the printable width.
        let natural_w_mm = px_w as f32 * 25.4 / EMBED_DPI;
        let natural_h_mm = px_h as f32 * 25.4 / EMBED_DPI;
        let scale = target_w / natural_w_mm;
        let display_h_mm = natural_h_mm * scale;

        let embedded = Image::from_dynamic_image(&decoded);
        embedded.add_to_layer(
            layer,
            ImageTransform {
                translate_x: Some(Mm(margin)),
                translate_y: Some(Mm(page_h - margin - display_h_mm)),
                scale_x: Some(scale),
                scale_y: Some(scale),
                dpi: Some(EMBED_DPI),
                ..Default::default()
            },
        );
    }

    doc.save_to_bytes()
        .map_err(|e| ConvertError::Internal(format!("PDF serialisation failed: {e}")))
}

/// Decode an input into the pixel type printpdf embeds, plus its dimensions.
///
/// Decoding runs on this crate's own `image` dependency, whose format set
/// (PNG/JPEG/WebP) matches the intake allow-list; printpdf's re-exported
/// image crate is a separate, possibly older, link with its own format set.
/// Bridging through lossless PNG keeps the two decoupled: any input we can
/// decode becomes a PNG the embedding side always understands. Alpha is
/// flattened to RGB first since the page background is white and embedded
/// transparency would need a soft mask.
fn decode_for_embedding(
    input: &SourceFile,
) -> Result<(image_crate::DynamicImage, u32, u32), ConvertError> {
    let decoded =
        image::load_from_memory(&input.bytes).map_err(|e| ConvertError::DecodeFailed {
            name: input.name.clone(),
            detail: e.to_string(),
        })?;
    let flat = image::DynamicImage::ImageRgb8(decoded.to_rgb8());
    let (px_w, px_h) = (flat.width(), flat.height());

    let mut png = Vec::new();
    flat.write_to(&mut Cursor::new(&mut png), image::ImageFormat::Png)
        .map_err(|e| ConvertError::Internal(format!("PNG bridge encoding failed: {e}")))?;

    let embeddable = image_crate::load_from_memory(&png)
        .map_err(|e| ConvertError::Internal(format!("PNG bridge decoding failed: {e}")))?;

    Ok((embeddable, px_w, px_h))
}
