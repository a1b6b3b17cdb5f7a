//! Cursor-based layout of substituted text into pages.
//!
//! The cursor is a single `(page, y)` pair where `y` is measured from the top
//! edge of the page. Each non-blank line of the input is one paragraph unit.
//! The page-break test runs once per paragraph, before it is placed, so a long
//! paragraph can run past the bottom margin. Text height is an estimate of
//! `line_height * ceil(chars / chars_per_line)` rather than a measurement.

use super::embed::ImageXObject;
use super::PageConfig;
use common::model::form_value::FormData;
use regex::Regex;
use std::sync::LazyLock;

static IMAGE_MARKER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[IMAGE:([^\]]+)\]").expect("valid image marker regex"));

#[derive(Debug, Clone)]
pub enum LayoutOp {
    /// A text block to be wrapped to `width`, top edge at `y`.
    Text { x: f64, y: f64, width: f64, text: String },
    /// An image stretched into the `width` x `height` box, top edge at `y`.
    Image {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        name: String,
        image: ImageXObject,
    },
}

#[derive(Debug, Clone, Default)]
pub struct LayoutPage {
    pub ops: Vec<LayoutOp>,
}

#[derive(Debug, Clone)]
pub struct Layout {
    pub pages: Vec<LayoutPage>,
    /// Number of paragraph units processed.
    pub paragraphs: usize,
    pub images_embedded: usize,
    pub image_fallbacks: usize,
}

struct Cursor<'a> {
    config: &'a PageConfig,
    done: Vec<LayoutPage>,
    page: LayoutPage,
    y: f64,
}

impl<'a> Cursor<'a> {
    fn new(config: &'a PageConfig) -> Self {
        Self {
            config,
            done: Vec::new(),
            page: LayoutPage::default(),
            y: config.margin_top,
        }
    }

    fn break_page_if_full(&mut self) {
        if self.y > self.config.printable_height() {
            self.done.push(std::mem::take(&mut self.page));
            self.y = self.config.margin_top;
        }
    }

    fn text(&mut self, text: String, advance: f64) {
        self.page.ops.push(LayoutOp::Text {
            x: self.config.margin_left,
            y: self.y,
            width: self.config.printable_width(),
            text,
        });
        self.y += advance;
    }

    fn image(&mut self, name: &str, image: ImageXObject) {
        self.page.ops.push(LayoutOp::Image {
            x: self.config.margin_left,
            y: self.y,
            width: self.config.image_width,
            height: self.config.image_height,
            name: name.to_string(),
            image,
        });
        self.y += self.config.image_advance;
    }

    fn finish(mut self) -> Vec<LayoutPage> {
        self.done.push(self.page);
        self.done
    }
}

/// Lays out `text`, resolving `[IMAGE:name]` markers against `values`.
///
/// Image problems never fail the layout: a missing, non-image or undecodable
/// value is replaced by the literal text `[Image: name]`.
pub fn layout(text: &str, values: &FormData, config: &PageConfig) -> Layout {
    let mut cursor = Cursor::new(config);
    let mut paragraphs = 0;
    let mut images_embedded = 0;
    let mut image_fallbacks = 0;

    for paragraph in text.split('\n').filter(|p| !p.trim().is_empty()) {
        paragraphs += 1;
        cursor.break_page_if_full();

        let names: Vec<&str> = IMAGE_MARKER_RE
            .captures_iter(paragraph)
            .filter_map(|caps| caps.get(1).map(|m| m.as_str()))
            .collect();

        if names.is_empty() {
            let clean = IMAGE_MARKER_RE.replace_all(paragraph, "");
            let clean = clean.trim();
            if !clean.is_empty() {
                let lines = clean.chars().count().div_ceil(config.chars_per_line.max(1));
                cursor.text(clean.to_string(), config.line_height * lines as f64);
            }
        } else {
            for name in names {
                let value = values.get(name).map(|v| v.as_str());
                match ImageXObject::from_data_uri(value) {
                    Ok(image) => {
                        cursor.image(name, image);
                        images_embedded += 1;
                    }
                    Err(err) => {
                        log::warn!("image placeholder '{}' rendered as text: {}", name, err);
                        cursor.text(format!("[Image: {}]", name), config.line_height);
                        image_fallbacks += 1;
                    }
                }
            }
        }

        cursor.y += config.paragraph_gap;
    }

    Layout {
        pages: cursor.finish(),
        paragraphs,
        images_embedded,
        image_fallbacks,
    }
}
