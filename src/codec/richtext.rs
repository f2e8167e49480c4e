//! Word-to-PDF: raw text extraction and paginated reflow.
//!
//! Formatting, images, tables, and layout are discarded: the contract of
//! this path is the *text content* of the document, reflowed onto clean A4
//! pages. A DOCX file is a ZIP archive whose main document part
//! (`word/document.xml`) carries every run of text in `<w:t>` elements;
//! extraction walks that XML once, emitting a newline per paragraph, a tab
//! per `<w:tab/>`, and a newline per `<w:br/>`.
//!
//! Legacy binary `.doc` files are not a ZIP container, so they fail at the
//! archive-open step with [`ConvertError::ExtractFailed`]; the intake
//! allow-list still admits them for parity with the product.

use crate::artifact::{file_stem, ConvertedArtifact, SourceFile};
use crate::config::EngineConfig;
use crate::error::ConvertError;
use printpdf::{BuiltinFont, Mm, PdfDocument};
use quick_xml::events::Event;
use quick_xml::Reader;
use std::io::{Cursor, Read};
use tracing::{debug, info};

/// Convert a DOCX file to a paginated, text-only PDF.
pub async fn docx_to_pdf(
    input: &SourceFile,
    config: &EngineConfig,
) -> Result<ConvertedArtifact, ConvertError> {
    let input = input.clone();
    let config = config.clone();

    let artifact = tokio::task::spawn_blocking(move || {
        let text = extract_docx_text(&input.bytes)?;
        debug!(name = %input.name, chars = text.len(), "extracted document text");
        let bytes = paginate_text(&text, &config)?;
        Ok::<_, ConvertError>(ConvertedArtifact {
            bytes,
            file_name: format!("{}.pdf", file_stem(&input.name)),
            mime: "application/pdf",
        })
    })
    .await
    .map_err(|e| ConvertError::Internal(format!("Reflow task panicked: {e}")))??;

    info!(name = %artifact.file_name, bytes = artifact.bytes.len(), "reflowed document");
    Ok(artifact)
}

/// Pull the raw text out of a DOCX byte buffer.
pub fn extract_docx_text(bytes: &[u8]) -> Result<String, ConvertError> {
    let extract_err = |detail: String| ConvertError::ExtractFailed { page: None, detail };

    let mut archive = zip::ZipArchive::new(Cursor::new(bytes))
        .map_err(|e| extract_err(format!("not an OOXML container: {e}")))?;

    let mut xml = String::new();
    archive
        .by_name("word/document.xml")
        .map_err(|e| extract_err(format!("main document part missing: {e}")))?
        .read_to_string(&mut xml)
        .map_err(|e| extract_err(format!("main document part unreadable: {e}")))?;

    let mut reader = Reader::from_str(&xml);
    let mut out = String::new();
    let mut in_text_run = false;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) if e.local_name().as_ref() == b"t" => in_text_run = true,
            Ok(Event::End(e)) => match e.local_name().as_ref() {
                b"t" => in_text_run = false,
                b"p" => out.push('\n'),
                _ => {}
            },
            Ok(Event::Empty(e)) => match e.local_name().as_ref() {
                b"tab" => out.push('\t'),
                b"br" => out.push('\n'),
                _ => {}
            },
            Ok(Event::Text(t)) if in_text_run => {
                let chunk = t
                    .unescape()
                    .map_err(|e| extract_err(format!("malformed text run: {e}")))?;
                out.push_str(&chunk);
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(extract_err(format!("malformed document XML: {e}"))),
            _ => {}
        }
    }

    Ok(out)
}

/// Reflow `text` onto as many pages as needed, word-wrapped to the configured
/// content width.
fn paginate_text(text: &str, config: &EngineConfig) -> Result<Vec<u8>, ConvertError> {
    let page_w = config.page_width_mm;
    let page_h = config.page_height_mm;
    let left = config.text_margin_mm;
    let top = config.text_top_mm;
    let bottom = config.text_margin_mm;

    // Line advance converted from points (font metrics) to millimetres.
    let line_height_mm = config.font_size_pt * config.line_height_factor * 25.4 / 72.0;
    let lines = wrap_text(text, max_chars_per_line(config));

    let (doc, first_page, first_layer) =
        PdfDocument::new("converted_document", Mm(page_w), Mm(page_h), "Layer 1");
    let font = doc
        .add_builtin_font(BuiltinFont::Helvetica)
        .map_err(|e| ConvertError::Internal(format!("builtin font unavailable: {e}")))?;

    let mut layer = doc.get_page(first_page).get_layer(first_layer);
    let mut cursor_y = page_h - top;

    for line in &lines {
        if cursor_y < bottom {
            let (page, layer_idx) = doc.add_page(Mm(page_w), Mm(page_h), "Layer 1");
            layer = doc.get_page(page).get_layer(layer_idx);
            cursor_y = page_h - top;
        }
        if !line.is_empty() {
            layer.use_text(line.as_str(), config.font_size_pt, Mm(left), Mm(cursor_y), &font);
        }
        cursor_y -= line_height_mm;
    }

    doc.save_to_bytes()
        .map_err(|e| ConvertError::Internal(format!("PDF serialisation failed: {e}")))
}

/// Greedy word wrap to a character budget per line.
///
/// The budget comes from the average Helvetica advance width, which is close
/// enough for reflowed body text; exact glyph metrics are not part of this
/// path's contract. Words longer than a full line are hard-broken.
fn wrap_text(text: &str, max_chars: usize) -> Vec<String> {
    let max_chars = max_chars.max(1);
    let mut lines = Vec::new();

    for paragraph in text.split('\n') {
        // Builtin PDF fonts are WinAnsi-encoded; anything outside Latin-1
        // would render as garbage glyphs, so substitute up front.
        let paragraph: String = paragraph
            .chars()
            .map(|c| if (c as u32) <= 0xFF { c } else { '?' })
            .collect();

        if paragraph.trim().is_empty() {
            lines.push(String::new());
            continue;
        }

        let mut current = String::new();
        for word in paragraph.split_whitespace() {
            let mut word = word;
            // Hard-break words that cannot fit any line on their own.
            while word.chars().count() > max_chars {
                if !current.is_empty() {
                    lines.push(std::mem::take(&mut current));
                }
                let split_at = word
                    .char_indices()
                    .nth(max_chars)
                    .map(|(i, _)| i)
                    .unwrap_or(word.len());
                lines.push(word[..split_at].to_string());
                word = &word[split_at..];
            }
            if word.is_empty() {
                continue;
            }
            let needed = if current.is_empty() {
                word.chars().count()
            } else {
                current.chars().count() + 1 + word.chars().count()
            };
            if needed > max_chars && !current.is_empty() {
                lines.push(std::mem::take(&mut current));
            }
            if !current.is_empty() {
                current.push(' ');
            }
            current.push_str(word);
        }
        if !current.is_empty() {
            lines.push(current);
        }
    }

    lines
}

/// Character budget for one line at the configured width and font size.
fn max_chars_per_line(config: &EngineConfig) -> usize {
    const AVG_ADVANCE_EM: f32 = 0.5;
    let content_width_pt = config.content_width_mm * 72.0 / 25.4;
    (content_width_pt / (config.font_size_pt * AVG_ADVANCE_EM)).floor() as usize
}
