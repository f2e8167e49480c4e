//! Tool definitions and engine configuration.
//!
//! [`ToolKind`] is the closed set of the four conversion directions. Dispatch
//! over it is a plain `match`, so adding a fifth tool is a compile error until
//! every seam handles it — there is no string-keyed lookup table to fall
//! through at runtime.
//!
//! [`EngineConfig`] holds the layout and rendering knobs, built via
//! [`EngineConfigBuilder`]. The defaults reproduce the product's observed
//! output geometry: A4 pages, a 10 mm image margin (190 mm printable width),
//! text at 15 mm/20 mm margins wrapped to 180 mm, and a 2× raster scale for
//! PDF-to-image output sharpness.

use crate::error::ConvertError;
use serde::{Deserialize, Serialize};

/// One of the four supported conversion directions.
///
/// Fixed for a session's lifetime; selected by the host via the route slug
/// ([`ToolKind::from_slug`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ToolKind {
    /// One or more raster images composed into a single PDF.
    ImageToPdf,
    /// A Word document reflowed into a paginated PDF (text only).
    WordToPdf,
    /// The first page of a PDF rendered as a PNG.
    PdfToImage,
    /// Every page's text extracted into a Word-readable envelope.
    PdfToWord,
}

impl ToolKind {
    /// All four tools, in the order the host lists them.
    pub const ALL: [ToolKind; 4] = [
        ToolKind::ImageToPdf,
        ToolKind::WordToPdf,
        ToolKind::PdfToImage,
        ToolKind::PdfToWord,
    ];

    /// Stable route identifier for this tool.
    pub fn slug(self) -> &'static str {
        match self {
            ToolKind::ImageToPdf => "image-to-pdf",
            ToolKind::WordToPdf => "word-to-pdf",
            ToolKind::PdfToImage => "pdf-to-image",
            ToolKind::PdfToWord => "pdf-to-word",
        }
    }

    /// Resolve a route slug back to a tool, `None` for unknown routes.
    pub fn from_slug(slug: &str) -> Option<ToolKind> {
        ToolKind::ALL.into_iter().find(|t| t.slug() == slug)
    }

    /// Human-readable tool name.
    pub fn display_name(self) -> &'static str {
        match self {
            ToolKind::ImageToPdf => "Image to PDF",
            ToolKind::WordToPdf => "Word to PDF",
            ToolKind::PdfToImage => "PDF to Image",
            ToolKind::PdfToWord => "PDF to Word",
        }
    }

    /// One-line tool description for host UIs.
    pub fn description(self) -> &'static str {
        match self {
            ToolKind::ImageToPdf => {
                "Transform your photos and graphics into high-quality PDF documents."
            }
            ToolKind::WordToPdf => "Convert DOC and DOCX files to clean, professional PDFs.",
            ToolKind::PdfToImage => {
                "Extract pages from your PDFs and save them as separate image files."
            }
            ToolKind::PdfToWord => "Convert fixed PDFs into editable Microsoft Word documents.",
        }
    }

    /// Lower-case file extensions this tool accepts, without the dot.
    pub fn allowed_extensions(self) -> &'static [&'static str] {
        match self {
            ToolKind::ImageToPdf => &["jpg", "jpeg", "png", "webp"],
            ToolKind::WordToPdf => &["docx", "doc"],
            ToolKind::PdfToImage => &["pdf"],
            ToolKind::PdfToWord => &["pdf"],
        }
    }

    /// Maximum number of files a session for this tool may stage at once.
    pub fn max_files(self) -> usize {
        match self {
            ToolKind::ImageToPdf => 20,
            ToolKind::WordToPdf => 5,
            ToolKind::PdfToImage => 1,
            ToolKind::PdfToWord => 1,
        }
    }

    /// Whether inputs for this tool are raster images (and get a preview
    /// reference at intake).
    pub fn stages_image_inputs(self) -> bool {
        matches!(self, ToolKind::ImageToPdf)
    }
}

/// Layout and rendering configuration shared by all codec operations.
///
/// Built via [`EngineConfig::builder()`] or [`EngineConfig::default()`].
///
/// # Example
/// ```rust
/// use swiftconvert::EngineConfig;
///
/// let config = EngineConfig::builder()
///     .raster_scale(3.0)
///     .font_size_pt(10.0)
///     .build()
///     .unwrap();
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Output page width in millimetres. Default: 210.0 (A4).
    pub page_width_mm: f32,

    /// Output page height in millimetres. Default: 297.0 (A4).
    pub page_height_mm: f32,

    /// Margin around composed images in millimetres. Default: 10.0.
    ///
    /// Images are scaled to fit the printable width
    /// (`page_width_mm - 2 * image_margin_mm`, 190 mm on A4) with
    /// proportional height. No other fitting policy is applied; a very tall
    /// image may extend past the bottom margin, matching the product's
    /// fit-to-width behavior.
    pub image_margin_mm: f32,

    /// Left margin for reflowed text in millimetres. Default: 15.0.
    pub text_margin_mm: f32,

    /// Top margin for reflowed text in millimetres. Default: 20.0.
    pub text_top_mm: f32,

    /// Content width text is word-wrapped to, in millimetres. Default: 180.0.
    pub content_width_mm: f32,

    /// Font size for reflowed text in points. Default: 12.0.
    pub font_size_pt: f32,

    /// Line height as a multiple of the font size. Default: 1.4.
    pub line_height_factor: f32,

    /// Linear scale applied when rasterising a PDF page. Default: 2.0.
    ///
    /// 2× of the page's natural size keeps text legible in the exported
    /// image without ballooning memory on large pages.
    pub raster_scale: f32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            page_width_mm: 210.0,
            page_height_mm: 297.0,
            image_margin_mm: 10.0,
            text_margin_mm: 15.0,
            text_top_mm: 20.0,
            content_width_mm: 180.0,
            font_size_pt: 12.0,
            line_height_factor: 1.4,
            raster_scale: 2.0,
        }
    }
}

impl EngineConfig {
    /// Create a new builder for `EngineConfig`.
    pub fn builder() -> EngineConfigBuilder {
        EngineConfigBuilder {
            config: Self::default(),
        }
    }

    /// Printable width available to composed images, in millimetres.
    pub fn printable_image_width_mm(&self) -> f32 {
        self.page_width_mm - 2.0 * self.image_margin_mm
    }
}

/// Builder for [`EngineConfig`].
#[derive(Debug)]
pub struct EngineConfigBuilder {
    config: EngineConfig,
}

impl EngineConfigBuilder {
    pub fn page_size_mm(mut self, width: f32, height: f32) -> Self {
        self.config.page_width_mm = width;
        self.config.page_height_mm = height;
        self
    }

    pub fn image_margin_mm(mut self, mm: f32) -> Self {
        self.config.image_margin_mm = mm.max(0.0);
        self
    }

    pub fn text_margin_mm(mut self, mm: f32) -> Self {
        self.config.text_margin_mm = mm.max(0.0);
        self
    }

    pub fn text_top_mm(mut self, mm: f32) -> Self {
        self.config.text_top_mm = mm.max(0.0);
        self
    }

    pub fn content_width_mm(mut self, mm: f32) -> Self {
        self.config.content_width_mm = mm.max(10.0);
        self
    }

    pub fn font_size_pt(mut self, pt: f32) -> Self {
        self.config.font_size_pt = pt.clamp(6.0, 48.0);
        self
    }

    pub fn line_height_factor(mut self, factor: f32) -> Self {
        self.config.line_height_factor = factor.clamp(1.0, 3.0);
        self
    }

    pub fn raster_scale(mut self, scale: f32) -> Self {
        self.config.raster_scale = scale.clamp(0.5, 8.0);
        self
    }

    /// Build the configuration, validating cross-field constraints.
    pub fn build(self) -> Result<EngineConfig, ConvertError> {
        let c = &self.config;
        if c.page_width_mm < 50.0 || c.page_height_mm < 50.0 {
            return Err(ConvertError::InvalidConfig(format!(
                "Page size must be at least 50×50 mm, got {}×{}",
                c.page_width_mm, c.page_height_mm
            )));
        }
        if c.printable_image_width_mm() <= 0.0 {
            return Err(ConvertError::InvalidConfig(
                "Image margins leave no printable width".into(),
            ));
        }
        if c.content_width_mm + c.text_margin_mm > c.page_width_mm {
            return Err(ConvertError::InvalidConfig(format!(
                "Content width {} mm does not fit a {} mm page at a {} mm margin",
                c.content_width_mm, c.page_width_mm, c.text_margin_mm
            )));
        }
        Ok(self.config)
    }
}
