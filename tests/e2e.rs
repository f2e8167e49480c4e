//! End-to-end conversion tests that need a pdfium native library.
//!
//! The PDF-reading tools (PDF→image, PDF→Word) bind to pdfium at runtime.
//! These tests skip themselves on machines without the library so the rest
//! of the suite stays green everywhere.
//!
//! Run with a system pdfium, or point the binding at a copy:
//!   PDFIUM_LIB_PATH=/path/to/libpdfium cargo test --test e2e -- --nocapture

use std::io::{Cursor, Write};
use swiftconvert::codec;
use swiftconvert::{ConversionSession, ConvertError, EngineConfig, SourceFile, ToolKind};
use zip::write::SimpleFileOptions;

/// Skip this test if no pdfium library can be bound in this process.
macro_rules! skip_unless_pdfium {
    () => {
        if !codec::pdfium_available() {
            println!("SKIP — pdfium library not available; set PDFIUM_LIB_PATH to run e2e tests");
            return;
        }
    };
}

// ── Fixtures ─────────────────────────────────────────────────────────────────

fn solid_png(rgb: [u8; 3]) -> Vec<u8> {
    let img = image::DynamicImage::ImageRgb8(image::RgbImage::from_pixel(64, 48, image::Rgb(rgb)));
    let mut buf = Vec::new();
    img.write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .expect("encode fixture");
    buf
}

fn docx_with_paragraphs(paragraphs: &[String]) -> Vec<u8> {
    let body: String = paragraphs
        .iter()
        .map(|p| format!("<w:p><w:r><w:t>{p}</w:t></w:r></w:p>"))
        .collect();
    let xml = format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">
<w:body>{body}</w:body>
</w:document>"#
    );
    let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
    writer
        .start_file("word/document.xml", SimpleFileOptions::default())
        .unwrap();
    writer.write_all(xml.as_bytes()).unwrap();
    writer.finish().unwrap().into_inner()
}

/// Compose a multi-page PDF by running the image→PDF tool over solid-colour
/// pages. Pure Rust — usable even as input-building for the pdfium tests.
async fn pdf_with_pages(colours: &[[u8; 3]]) -> Vec<u8> {
    let inputs: Vec<SourceFile> = colours
        .iter()
        .enumerate()
        .map(|(i, c)| SourceFile::new(format!("page{i}.png"), solid_png(*c)))
        .collect();
    codec::compose::images_to_pdf(&inputs, &EngineConfig::default())
        .await
        .expect("compose fixture")
        .bytes
}

/// A structurally valid PDF whose page tree is empty.
fn zero_page_pdf() -> Vec<u8> {
    let mut buf = Vec::new();
    let mut offsets = Vec::new();
    buf.extend_from_slice(b"%PDF-1.4\n");
    offsets.push(buf.len());
    buf.extend_from_slice(b"1 0 obj\n<< /Type /Catalog /Pages 2 0 R >>\nendobj\n");
    offsets.push(buf.len());
    buf.extend_from_slice(b"2 0 obj\n<< /Type /Pages /Kids [] /Count 0 >>\nendobj\n");
    let xref_pos = buf.len();
    buf.extend_from_slice(b"xref\n0 3\n0000000000 65535 f \n");
    for off in &offsets {
        buf.extend_from_slice(format!("{off:010} 00000 n \n").as_bytes());
    }
    buf.extend_from_slice(b"trailer\n<< /Size 3 /Root 1 0 R >>\nstartxref\n");
    buf.extend_from_slice(xref_pos.to_string().as_bytes());
    buf.extend_from_slice(b"\n%%EOF\n");
    buf
}

// ── PDF → image ──────────────────────────────────────────────────────────────

#[tokio::test]
async fn first_page_only_is_rendered() {
    skip_unless_pdfium!();

    // Page 1 red, page 2 green, page 3 blue. Only page 1 may appear.
    let pdf = pdf_with_pages(&[[220, 30, 30], [30, 220, 30], [30, 30, 220]]).await;

    let mut session = ConversionSession::new(ToolKind::PdfToImage);
    session.intake(vec![SourceFile::new("deck.pdf", pdf)]);
    session.convert().await.expect("render should succeed");

    let result = session.result().expect("artifact present");
    assert_eq!(result.file_name(), "deck_page1.png");
    assert_eq!(result.mime(), "image/png");

    let stored = session.resolve(result.reference()).expect("live reference");
    let rendered = image::load_from_memory(&stored.bytes).expect("valid PNG");
    let rgb = rendered.to_rgb8();
    // Sample inside the placed image area (top-left quadrant, below margin).
    let px = rgb.get_pixel(rgb.width() / 2, rgb.height() / 4);
    assert!(
        px[0] > 150 && px[1] < 100 && px[2] < 100,
        "expected page 1's red fill, got {px:?}"
    );
}

#[tokio::test]
async fn rendered_page_is_upscaled() {
    skip_unless_pdfium!();

    let pdf = pdf_with_pages(&[[0, 0, 0]]).await;
    let input = SourceFile::new("single.pdf", pdf);

    let at_1x = codec::rasterize::first_page_to_png(
        &input,
        &EngineConfig::builder().raster_scale(1.0).build().unwrap(),
    )
    .await
    .unwrap();
    let at_2x = codec::rasterize::first_page_to_png(&input, &EngineConfig::default())
        .await
        .unwrap();

    // Pixel sizes come from point sizes scaled and rounded, so allow a
    // rounding pixel either way.
    let small = image::load_from_memory(&at_1x.bytes).unwrap();
    let large = image::load_from_memory(&at_2x.bytes).unwrap();
    assert!(
        (large.width() as i64 - small.width() as i64 * 2).abs() <= 2,
        "expected ~2× width: {} vs {}",
        large.width(),
        small.width()
    );
    assert!(
        (large.height() as i64 - small.height() as i64 * 2).abs() <= 2,
        "expected ~2× height: {} vs {}",
        large.height(),
        small.height()
    );
}

#[tokio::test]
async fn zero_page_document_fails_with_no_pages() {
    skip_unless_pdfium!();

    let input = SourceFile::new("hollow.pdf", zero_page_pdf());
    let err = codec::rasterize::first_page_to_png(&input, &EngineConfig::default())
        .await
        .expect_err("zero pages must not render");
    assert!(matches!(err, ConvertError::NoPages { .. }), "got {err:?}");
}

// ── PDF → Word ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn extracts_every_page_in_order() {
    skip_unless_pdfium!();

    // Build a text PDF long enough to paginate, with sentinel words at both
    // ends, by running the Word→PDF tool first.
    let paragraphs: Vec<String> = (1..=120).map(|i| format!("paragraph-{i:03}")).collect();
    let docx = docx_with_paragraphs(&paragraphs);

    let mut word_session = ConversionSession::new(ToolKind::WordToPdf);
    word_session.intake(vec![SourceFile::new("report.docx", docx)]);
    word_session.convert().await.expect("reflow should succeed");
    let reflowed = word_session.result().unwrap();
    assert_eq!(reflowed.file_name(), "report.pdf");
    let pdf_bytes = word_session
        .resolve(reflowed.reference())
        .unwrap()
        .bytes
        .as_slice()
        .to_vec();

    let mut session = ConversionSession::new(ToolKind::PdfToWord);
    session.intake(vec![SourceFile::new("report.pdf", pdf_bytes)]);
    session.convert().await.expect("extraction should succeed");

    let result = session.result().expect("artifact present");
    assert_eq!(result.file_name(), "report.doc");
    assert_eq!(result.mime(), "application/msword");

    let stored = session.resolve(result.reference()).unwrap();
    let text = String::from_utf8_lossy(&stored.bytes).into_owned();
    let first = text.find("paragraph-001").expect("first page text present");
    let last = text.find("paragraph-120").expect("last page text present");
    assert!(first < last, "page order must be preserved");
}

#[tokio::test]
async fn garbage_input_surfaces_as_corrupt_document() {
    skip_unless_pdfium!();

    let mut session = ConversionSession::new(ToolKind::PdfToWord);
    session.intake(vec![SourceFile::new("noise.pdf", vec![0u8; 64])]);
    let err = session.convert().await.expect_err("garbage must fail");
    assert!(matches!(err, ConvertError::CorruptDocument { .. }), "got {err:?}");

    // Failure leaves the file staged for another attempt.
    assert_eq!(session.files().len(), 1);
    assert!(session.result().is_none());
}
