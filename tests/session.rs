//! Public-API lifecycle tests for the conversion session.
//!
//! Everything here runs without a pdfium library: the image→PDF path is pure
//! Rust, and the lifecycle invariants (reference counts, clamping, reset
//! idempotency) never touch a PDF reader. Pdfium-dependent conversions live
//! in `tests/e2e.rs`.

use std::io::Cursor;
use swiftconvert::{ConversionSession, ConvertError, SessionState, SourceFile, ToolKind};

// ── Fixtures ─────────────────────────────────────────────────────────────────

fn png_bytes(width: u32, height: u32, rgb: [u8; 3]) -> Vec<u8> {
    let img = image::DynamicImage::ImageRgb8(image::RgbImage::from_pixel(
        width,
        height,
        image::Rgb(rgb),
    ));
    let mut buf = Vec::new();
    img.write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .expect("encode fixture");
    buf
}

fn image_file(name: &str) -> SourceFile {
    SourceFile::new(name, png_bytes(16, 16, [10, 120, 240]))
}

/// The invariant the whole store design exists for: at any observation point,
/// the number of live references equals staged image files plus a possible
/// result.
fn assert_reference_balance(session: &ConversionSession) {
    let previews = session.files().iter().filter(|f| f.preview().is_some()).count();
    let results = usize::from(session.result().is_some());
    assert_eq!(
        session.live_reference_count(),
        previews + results,
        "live references out of balance"
    );
}

// ── Intake ───────────────────────────────────────────────────────────────────

#[test]
fn uppercase_extension_is_accepted() {
    let mut session = ConversionSession::new(ToolKind::ImageToPdf);
    let staged = session.intake(vec![image_file("photo.JPG")]);
    assert_eq!(staged, 1);
    assert_eq!(session.state(), SessionState::Staged);
}

#[test]
fn unsupported_files_are_silently_filtered() {
    let mut session = ConversionSession::new(ToolKind::ImageToPdf);
    let staged = session.intake(vec![
        image_file("keep.png"),
        SourceFile::new("skip.gif", vec![0u8; 8]),
        SourceFile::new("skip.pdf", vec![0u8; 8]),
    ]);
    assert_eq!(staged, 1);
    assert_eq!(session.files()[0].name(), "keep.png");
}

#[test]
fn intake_never_exceeds_the_tool_cap() {
    let mut session = ConversionSession::new(ToolKind::ImageToPdf);
    let batch: Vec<SourceFile> = (0..30).map(|i| image_file(&format!("img{i}.png"))).collect();
    session.intake(batch);
    assert_eq!(session.files().len(), ToolKind::ImageToPdf.max_files());
    assert_reference_balance(&session);
}

// ── Reference lifecycle ──────────────────────────────────────────────────────

#[test]
fn references_balance_across_arbitrary_intake_and_removal() {
    let mut session = ConversionSession::new(ToolKind::ImageToPdf);
    assert_reference_balance(&session);

    session.intake(vec![image_file("a.png"), image_file("b.png")]);
    assert_reference_balance(&session);

    let first = session.files()[0].id();
    session.remove_file(first);
    assert_reference_balance(&session);

    session.intake(vec![image_file("c.png"), image_file("d.png"), image_file("e.png")]);
    assert_reference_balance(&session);

    // Remove everything one by one.
    while let Some(file) = session.files().first() {
        let id = file.id();
        session.remove_file(id);
        assert_reference_balance(&session);
    }
    assert_eq!(session.state(), SessionState::Empty);
    assert_eq!(session.live_reference_count(), 0);
}

#[test]
fn double_removal_does_not_double_release() {
    let mut session = ConversionSession::new(ToolKind::ImageToPdf);
    session.intake(vec![image_file("a.png"), image_file("b.png")]);
    let id = session.files()[0].id();

    assert!(session.remove_file(id));
    let live_after_first = session.live_reference_count();
    assert!(!session.remove_file(id));
    assert_eq!(session.live_reference_count(), live_after_first);
}

#[test]
fn reset_from_every_reachable_state_yields_empty_with_zero_references() {
    // Empty.
    let mut session = ConversionSession::new(ToolKind::ImageToPdf);
    session.reset();
    assert_eq!(session.state(), SessionState::Empty);
    assert_eq!(session.live_reference_count(), 0);

    // Staged.
    session.intake(vec![image_file("a.png"), image_file("b.png")]);
    session.reset();
    assert_eq!(session.state(), SessionState::Empty);
    assert_eq!(session.live_reference_count(), 0);
}

// ── Conversion (image→PDF is pdfium-free) ────────────────────────────────────

#[tokio::test]
async fn photo_jpg_scenario_end_to_end() {
    // Intake one JPEG named photo.JPG, convert, download, reset.
    let mut session = ConversionSession::new(ToolKind::ImageToPdf);
    let jpeg = {
        let img = image::DynamicImage::ImageRgb8(image::RgbImage::from_pixel(
            24,
            24,
            image::Rgb([250, 180, 20]),
        ));
        let mut buf = Vec::new();
        img.write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Jpeg)
            .expect("encode fixture");
        buf
    };
    session.intake(vec![SourceFile::new("photo.JPG", jpeg)]);
    assert_eq!(session.files().len(), 1);

    assert!(session.convert().await.expect("conversion should succeed"));
    let result = session.result().expect("artifact present");
    assert_eq!(result.file_name(), "converted_document.pdf");

    let stored = session.resolve(result.reference()).expect("live reference");
    assert!(stored.bytes.starts_with(b"%PDF"));
    assert_reference_balance(&session);

    session.reset();
    assert_eq!(session.state(), SessionState::Empty);
    assert_eq!(session.live_reference_count(), 0);
}

#[tokio::test]
async fn failure_keeps_staged_files_and_reports_the_error() {
    let mut session = ConversionSession::new(ToolKind::ImageToPdf);
    session.intake(vec![
        image_file("ok.png"),
        SourceFile::new("corrupt.jpeg", b"\xff\xd8 nope".to_vec()),
    ]);
    let err = session.convert().await.expect_err("batch must abort");
    assert!(matches!(err, ConvertError::DecodeFailed { ref name, .. } if name == "corrupt.jpeg"));

    // No partial state corruption: both files still staged, no result.
    assert_eq!(session.state(), SessionState::Staged);
    assert_eq!(session.files().len(), 2);
    assert!(session.result().is_none());
    assert_reference_balance(&session);
}

#[tokio::test]
async fn completed_session_resets_to_empty() {
    let mut session = ConversionSession::new(ToolKind::ImageToPdf);
    session.intake(vec![image_file("a.png"), image_file("b.png")]);
    session.convert().await.unwrap();
    assert_eq!(session.state(), SessionState::Completed);
    assert_reference_balance(&session);

    session.reset();
    assert_eq!(session.state(), SessionState::Empty);
    assert_eq!(session.live_reference_count(), 0);
    assert!(session.result().is_none());
}
