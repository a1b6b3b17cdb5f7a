//! Writes a `Layout` as PDF bytes with lopdf.
//!
//! Text uses the built-in Helvetica Type1 font, so no font files are needed.
//! Layout coordinates are measured from the top of the page and are flipped
//! into PDF user space here.

use super::layout::{Layout, LayoutOp};
use super::metrics::{encode_win_ansi, wrap_text};
use super::{PageConfig, RenderError};
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Dictionary, Document, Object, StringFormat};

/// Helvetica ascender, as a fraction of the font size.
const ASCENT: f64 = 0.718;

fn real(value: f64) -> Object {
    Object::Real(value as _)
}

pub fn write_pdf(layout: &Layout, config: &PageConfig) -> Result<Vec<u8>, RenderError> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
        "Encoding" => "WinAnsiEncoding",
    });

    let mut kids: Vec<Object> = Vec::with_capacity(layout.pages.len());
    let mut image_count = 0usize;

    for page in &layout.pages {
        let mut operations = Vec::new();
        let mut xobjects = Dictionary::new();

        for op in &page.ops {
            match op {
                LayoutOp::Text { x, y, width, text } => {
                    push_text(&mut operations, config, *x, *y, *width, text);
                }
                LayoutOp::Image {
                    x,
                    y,
                    width,
                    height,
                    name,
                    image,
                } => {
                    log::debug!("embedding image '{}' ({}x{})", name, image.width, image.height);
                    image_count += 1;
                    let resource = format!("Im{}", image_count);
                    let image_id = doc.add_object(image.to_pdf_stream());
                    xobjects.set(resource.as_bytes().to_vec(), image_id);

                    let pdf_y = config.height - y - height;
                    operations.push(Operation::new("q", vec![]));
                    operations.push(Operation::new(
                        "cm",
                        vec![
                            real(*width),
                            0.into(),
                            0.into(),
                            real(*height),
                            real(*x),
                            real(pdf_y),
                        ],
                    ));
                    operations.push(Operation::new(
                        "Do",
                        vec![Object::Name(resource.into_bytes())],
                    ));
                    operations.push(Operation::new("Q", vec![]));
                }
            }
        }

        let content = Content { operations }
            .encode()
            .map_err(|e| RenderError::Encode(e.to_string()))?;
        let content_id = doc.add_object(lopdf::Stream::new(dictionary! {}, content));

        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "MediaBox" => vec![0.into(), 0.into(), real(config.width), real(config.height)],
            "Contents" => content_id,
            "Resources" => dictionary! {
                "Font" => dictionary! { "F1" => font_id },
                "XObject" => xobjects,
            },
        });
        kids.push(page_id.into());
    }

    let page_count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => page_count,
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut buffer = Vec::new();
    doc.save_to(&mut buffer)
        .map_err(|e| RenderError::Encode(e.to_string()))?;
    Ok(buffer)
}

fn push_text(
    operations: &mut Vec<Operation>,
    config: &PageConfig,
    x: f64,
    y: f64,
    width: f64,
    text: &str,
) {
    let lines = wrap_text(text, config.font_size, width);
    if lines.is_empty() {
        return;
    }

    let baseline = config.height - y - config.font_size * ASCENT;
    operations.push(Operation::new("BT", vec![]));
    operations.push(Operation::new(
        "Tf",
        vec!["F1".into(), real(config.font_size)],
    ));
    operations.push(Operation::new("TL", vec![real(config.text_leading)]));
    operations.push(Operation::new("Td", vec![real(x), real(baseline)]));
    for (i, line) in lines.iter().enumerate() {
        if i > 0 {
            operations.push(Operation::new("T*", vec![]));
        }
        operations.push(Operation::new(
            "Tj",
            vec![Object::String(encode_win_ansi(line), StringFormat::Literal)],
        ));
    }
    operations.push(Operation::new("ET", vec![]));
}
