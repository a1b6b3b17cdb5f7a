//! Turns `data:image/...;base64,...` form values into PDF image XObjects.

use base64::alphabet;
use base64::engine::general_purpose::{GeneralPurpose, GeneralPurposeConfig};
use base64::engine::DecodePaddingMode;
use base64::Engine;
use flate2::write::ZlibEncoder;
use flate2::Compression;
use lopdf::{dictionary, Stream};
use std::io::Write;
use thiserror::Error;

// Browsers sometimes drop the padding of data URIs; accept it either way.
const LENIENT_BASE64: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Why an image placeholder could not be embedded.
#[derive(Debug, Error)]
pub enum EmbedError {
    #[error("no image value supplied")]
    Missing,

    #[error("value is not an image data URI")]
    NotDataUri,

    #[error("data URI has no payload")]
    NoPayload,

    #[error("invalid base64 payload: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("unreadable image: {0}")]
    Decode(#[from] image::ImageError),

    #[error("failed to compress image: {0}")]
    Compress(#[from] std::io::Error),
}

/// Decoded RGB image, zlib-compressed and ready to be written as an XObject.
#[derive(Debug, Clone)]
pub struct ImageXObject {
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
}

impl ImageXObject {
    /// Decodes a form value of the shape `data:image/<fmt>;base64,<payload>`.
    pub fn from_data_uri(value: Option<&str>) -> Result<Self, EmbedError> {
        let value = value.ok_or(EmbedError::Missing)?;
        if !value.starts_with("data:image") {
            return Err(EmbedError::NotDataUri);
        }
        let (_, payload) = value.split_once(',').ok_or(EmbedError::NoPayload)?;
        let payload: String = payload.chars().filter(|c| !c.is_whitespace()).collect();
        let bytes = LENIENT_BASE64.decode(payload)?;
        Self::from_image_bytes(&bytes)
    }

    /// Decodes PNG/JPEG bytes, flattening any alpha channel onto white.
    pub fn from_image_bytes(bytes: &[u8]) -> Result<Self, EmbedError> {
        let rgba = image::load_from_memory(bytes)?.to_rgba8();
        let (width, height) = rgba.dimensions();

        let mut rgb = Vec::with_capacity((width as usize) * (height as usize) * 3);
        for pixel in rgba.pixels() {
            let alpha = f32::from(pixel[3]) / 255.0;
            for channel in &pixel.0[..3] {
                rgb.push((f32::from(*channel) * alpha + 255.0 * (1.0 - alpha)) as u8);
            }
        }

        let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(&rgb)?;
        let data = encoder.finish()?;

        Ok(Self {
            width,
            height,
            data,
        })
    }

    pub fn to_pdf_stream(&self) -> Stream {
        Stream::new(
            dictionary! {
                "Type" => "XObject",
                "Subtype" => "Image",
                "Width" => i64::from(self.width),
                "Height" => i64::from(self.height),
                "ColorSpace" => "DeviceRGB",
                "BitsPerComponent" => 8_i64,
                "Filter" => "FlateDecode",
            },
            self.data.clone(),
        )
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use base64::engine::general_purpose::STANDARD as BASE64;
    use image::{ImageFormat, Rgba, RgbaImage};
    use std::io::Cursor;

    /// A tiny PNG data URI suitable for image placeholders in tests.
    pub(crate) fn png_data_uri() -> String {
        let img = RgbaImage::from_pixel(4, 3, Rgba([200, 30, 30, 255]));
        let mut png = Cursor::new(Vec::new());
        img.write_to(&mut png, ImageFormat::Png).unwrap();
        format!("data:image/png;base64,{}", BASE64.encode(png.into_inner()))
    }

    #[test]
    fn decodes_png_data_uri() {
        let xobject = ImageXObject::from_data_uri(Some(&png_data_uri())).unwrap();
        assert_eq!((xobject.width, xobject.height), (4, 3));
        assert!(!xobject.data.is_empty());
    }

    #[test]
    fn accepts_unpadded_payload() {
        let uri = png_data_uri();
        let trimmed = uri.trim_end_matches('=');
        assert!(ImageXObject::from_data_uri(Some(trimmed)).is_ok());
    }

    #[test]
    fn rejects_missing_and_non_image_values() {
        assert!(matches!(
            ImageXObject::from_data_uri(None),
            Err(EmbedError::Missing)
        ));
        assert!(matches!(
            ImageXObject::from_data_uri(Some("https://example.com/logo.png")),
            Err(EmbedError::NotDataUri)
        ));
        assert!(matches!(
            ImageXObject::from_data_uri(Some("data:image/png;base64")),
            Err(EmbedError::NoPayload)
        ));
    }

    #[test]
    fn rejects_garbage_payloads() {
        assert!(matches!(
            ImageXObject::from_data_uri(Some("data:image/png;base64,@@@not-base64")),
            Err(EmbedError::Base64(_))
        ));
        let not_an_image = format!("data:image/png;base64,{}", BASE64.encode(b"hello world"));
        assert!(matches!(
            ImageXObject::from_data_uri(Some(&not_an_image)),
            Err(EmbedError::Decode(_))
        ));
    }

    #[test]
    fn flattens_transparency_onto_white() {
        let img = RgbaImage::from_pixel(1, 1, Rgba([0, 0, 0, 0]));
        let mut png = Cursor::new(Vec::new());
        img.write_to(&mut png, ImageFormat::Png).unwrap();
        let xobject = ImageXObject::from_image_bytes(&png.into_inner()).unwrap();

        let mut raw = Vec::new();
        let mut decoder = flate2::read::ZlibDecoder::new(&xobject.data[..]);
        std::io::Read::read_to_end(&mut decoder, &mut raw).unwrap();
        assert_eq!(raw, vec![255, 255, 255]);
    }
}
