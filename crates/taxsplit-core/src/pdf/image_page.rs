//! Wrapping a rendered page image in a one-page PDF.

use image::codecs::jpeg::JpegEncoder;
use image::DynamicImage;
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream};

use super::{Result, POINTS_PER_INCH};
use crate::error::PdfError;

const JPEG_QUALITY: u8 = 90;

/// Build a single-page PDF that shows `image` at its rendering resolution.
///
/// The image is stored as a JPEG (`DCTDecode`) XObject, so the page is
/// raster-only. `page` is used for error reporting.
pub fn image_to_pdf(image: &DynamicImage, dpi: u32, page: u32) -> Result<Vec<u8>> {
    let write_err = |detail: String| PdfError::Write { page, detail };

    if dpi == 0 {
        return Err(write_err("DPI must be positive".to_string()));
    }

    let rgb = image.to_rgb8();
    let (width, height) = rgb.dimensions();
    if width == 0 || height == 0 {
        return Err(write_err("empty image".to_string()));
    }

    let mut jpeg = Vec::new();
    JpegEncoder::new_with_quality(&mut jpeg, JPEG_QUALITY)
        .encode_image(&rgb)
        .map_err(|e| write_err(e.to_string()))?;

    let scale = POINTS_PER_INCH / dpi as f32;
    let width_pt = width as f32 * scale;
    let height_pt = height as f32 * scale;

    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let image_stream = Stream::new(
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
    )
    .with_compression(false);
    let image_id = doc.add_object(image_stream);

    let content = Content {
        operations: vec![
            Operation::new("q", vec![]),
            Operation::new(
                "cm",
                vec![
                    width_pt.into(),
                    0.into(),
                    0.into(),
                    height_pt.into(),
                    0.into(),
                    0.into(),
                ],
            ),
            Operation::new("Do", vec![Object::Name(b"Im0".to_vec())]),
            Operation::new("Q", vec![]),
        ],
    };
    let content_bytes = content.encode().map_err(|e| write_err(e.to_string()))?;
    let content_id = doc.add_object(Stream::new(dictionary! {}, content_bytes));

    let page_id = doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => pages_id,
        "Contents" => content_id,
        "MediaBox" => vec![0.into(), 0.into(), width_pt.into(), height_pt.into()],
        "Resources" => dictionary! {
            "XObject" => dictionary! {
                "Im0" => image_id,
            },
        },
    });

    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => vec![page_id.into()],
            "Count" => 1,
        }),
    );

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);
    doc.compress();

    let mut out = Vec::new();
    doc.save_to(&mut out).map_err(|e| write_err(e.to_string()))?;
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};

    fn sample_image(width: u32, height: u32) -> DynamicImage {
        DynamicImage::ImageRgb8(RgbImage::from_pixel(width, height, Rgb([250, 250, 250])))
    }

    #[test]
    fn test_image_page_is_single_page_pdf() {
        let bytes = image_to_pdf(&sample_image(400, 200), 200, 1).unwrap();
        assert!(bytes.starts_with(b"%PDF-1.5"));

        let doc = Document::load_mem(&bytes).unwrap();
        assert_eq!(doc.get_pages().len(), 1);
    }

    #[test]
    fn test_media_box_follows_dpi() {
        // 400x200 px at 200 DPI is 2x1 inch, i.e. 144x72 pt
        let bytes = image_to_pdf(&sample_image(400, 200), 200, 1).unwrap();
        let doc = Document::load_mem(&bytes).unwrap();
        let page_id = *doc.get_pages().get(&1).unwrap();
        let page = doc.get_dictionary(page_id).unwrap();
        let media_box = page.get(b"MediaBox").unwrap().as_array().unwrap();

        let width = media_box[2].as_float().unwrap();
        let height = media_box[3].as_float().unwrap();
        assert!((width - 144.0).abs() < 0.01);
        assert!((height - 72.0).abs() < 0.01);
    }

    #[test]
    fn test_zero_dpi_rejected() {
        let result = image_to_pdf(&sample_image(10, 10), 0, 4);
        assert!(matches!(result, Err(PdfError::Write { page: 4, .. })));
    }
}
