//! Single-page PDF export of a rendered certificate
//!
//! The page is the image at 72 dpi: one pixel per point. The image is embedded
//! as a JPEG (DCTDecode) XObject and painted over the full page.

use std::path::Path;

use image::RgbImage;
use image::codecs::jpeg::JpegEncoder;
use lopdf::{Document, Object, Stream, dictionary};

use crate::error::AwardError;

const JPEG_QUALITY: u8 = 95;

/// Build the PDF bytes for one image
pub fn certificate_pdf(image: &RgbImage) -> Result<Vec<u8>, String> {
    let (width, height) = image.dimensions();

    let mut jpeg = Vec::new();
    JpegEncoder::new_with_quality(&mut jpeg, JPEG_QUALITY)
        .encode_image(image)
        .map_err(|e| format!("Failed to encode image: {}", e))?;

    let mut doc = Document::with_version("1.4");

    let image_id = doc.add_object(Stream::new(
        dictionary! {
            "Type" => "XObject",
            "Subtype" => "Image",
            "Width" => width as i64,
            "Height" => height as i64,
            "ColorSpace" => "DeviceRGB",
            "BitsPerComponent" => 8,
            "Filter" => "DCTDecode",
        },
        jpeg,
    ));

    let content = format!("q\n{} 0 0 {} 0 0 cm\n/Im0 Do\nQ\n", width, height);
    let content_id = doc.add_object(Stream::new(dictionary! {}, content.into_bytes()));

    let page_id = doc.add_object(dictionary! {
        "Type" => "Page",
        "MediaBox" => vec![0.into(), 0.into(), (width as i64).into(), (height as i64).into()],
        "Contents" => Object::Reference(content_id),
        "Resources" => dictionary! {
            "XObject" => dictionary! {
                "Im0" => Object::Reference(image_id),
            },
        },
    });
    let pages_id = doc.add_object(dictionary! {
        "Type" => "Pages",
        "Kids" => vec![Object::Reference(page_id)],
        "Count" => 1,
    });
    if let Ok(page) = doc.get_object_mut(page_id) {
        if let Ok(dict) = page.as_dict_mut() {
            dict.set("Parent", Object::Reference(pages_id));
        }
    }
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => Object::Reference(pages_id),
    });
    doc.trailer.set("Root", Object::Reference(catalog_id));

    let mut buffer = Vec::new();
    doc.save_to(&mut buffer)
        .map_err(|e| format!("Failed to serialize PDF: {}", e))?;
    Ok(buffer)
}

/// Write the certificate PDF to `path`
pub fn export_pdf(image: &RgbImage, path: &Path) -> Result<(), AwardError> {
    let export_error = |reason: String| AwardError::Export {
        path: path.to_path_buf(),
        reason,
    };

    let bytes = certificate_pdf(image).map_err(export_error)?;
    std::fs::write(path, &bytes).map_err(|e| export_error(e.to_string()))?;

    log::info!("Exported {} ({} bytes)", path.display(), bytes.len());
    Ok(())
}
