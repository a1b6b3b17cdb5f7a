//! # Document Rendering
//!
//! Turns substituted template text into a PDF in two passes:
//!
//! 1.  **Layout** (`layout`): a pure pass that walks the text paragraph by
//!     paragraph with a single vertical cursor. It decides page breaks and
//!     decodes image data URIs, falling back to literal text for any image
//!     that cannot be embedded.
//! 2.  **Writing** (`pdf`): serializes the laid-out pages with lopdf using the
//!     built-in Helvetica font.
//!
//! The layout uses rough estimates rather than font metrics for vertical
//! advance. Page-break positions depend on that estimate, so it must stay
//! stable.

mod embed;
mod layout;
mod metrics;
mod pdf;

use common::model::form_value::FormData;
use layout::layout;
use pdf::write_pdf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("failed to encode PDF: {0}")]
    Encode(String),
}

/// Page geometry and the fixed advances used by the layout pass, in points.
#[derive(Debug, Clone, PartialEq)]
pub struct PageConfig {
    pub width: f64,
    pub height: f64,
    pub margin_top: f64,
    pub margin_bottom: f64,
    pub margin_left: f64,
    pub margin_right: f64,
    pub font_size: f64,
    /// Baseline distance between wrapped lines of one text block.
    pub text_leading: f64,
    /// Estimated height of one line of text.
    pub line_height: f64,
    pub chars_per_line: usize,
    pub paragraph_gap: f64,
    pub image_width: f64,
    pub image_height: f64,
    /// Cursor advance after an embedded image (image height plus padding).
    pub image_advance: f64,
}

impl PageConfig {
    /// A4 portrait with one-inch margins.
    pub fn a4() -> Self {
        Self {
            width: 595.28,
            height: 841.89,
            margin_top: 72.0,
            margin_bottom: 72.0,
            margin_left: 72.0,
            margin_right: 72.0,
            font_size: 12.0,
            text_leading: 14.0,
            line_height: 20.0,
            chars_per_line: 80,
            paragraph_gap: 10.0,
            image_width: 200.0,
            image_height: 150.0,
            image_advance: 160.0,
        }
    }

    /// Page height minus top and bottom margins. The cursor is compared
    /// against this value directly.
    pub fn printable_height(&self) -> f64 {
        self.height - self.margin_top - self.margin_bottom
    }

    pub fn printable_width(&self) -> f64 {
        self.width - self.margin_left - self.margin_right
    }
}

impl Default for PageConfig {
    fn default() -> Self {
        Self::a4()
    }
}

/// A finished PDF and what went into it.
#[derive(Debug, Clone)]
pub struct RenderedPdf {
    pub bytes: Vec<u8>,
    pub pages: usize,
    pub paragraphs: usize,
    pub images_embedded: usize,
    pub image_fallbacks: usize,
}

/// Lays out `substituted` and writes it as a PDF.
///
/// `values` are the raw form values; `[IMAGE:name]` markers are resolved
/// against them.
pub fn render(
    substituted: &str,
    values: &FormData,
    config: &PageConfig,
) -> Result<RenderedPdf, RenderError> {
    let layout = layout(substituted, values, config);
    let bytes = write_pdf(&layout, config)?;

    Ok(RenderedPdf {
        bytes,
        pages: layout.pages.len(),
        paragraphs: layout.paragraphs,
        images_embedded: layout.images_embedded,
        image_fallbacks: layout.image_fallbacks,
    })
}
