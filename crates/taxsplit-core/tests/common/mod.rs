//! Shared fixtures: in-memory PDFs and scripted OCR collaborators.

#![allow(dead_code)]

use std::collections::HashMap;
use std::io::{Cursor, Read};
use std::sync::atomic::{AtomicUsize, Ordering};

use image::{DynamicImage, Rgb, RgbImage};
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream, StringFormat};
use md5::{Digest, Md5};
use zip::ZipArchive;

use taxsplit_core::error::{OcrError, PdfError};
use taxsplit_core::{PageRasterizer, RenderedPage, TextRecognizer};

/// Build a PDF with one page per entry; `None` pages carry no text at all.
pub fn build_pdf(pages: &[Option<&str>]) -> Vec<u8> {
    let mut doc = build_document(pages);
    let mut out = Vec::new();
    doc.save_to(&mut out).unwrap();
    out
}

fn build_document(pages: &[Option<&str>]) -> Document {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Courier",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! {
            "F1" => font_id,
        },
    });

    let mut kids = Vec::new();
    for text in pages {
        let operations = match text {
            Some(text) => text
                .lines()
                .enumerate()
                .flat_map(|(i, line)| {
                    vec![
                        Operation::new("BT", vec![]),
                        Operation::new("Tf", vec!["F1".into(), 12.into()]),
                        Operation::new("Td", vec![72.into(), (720 - 20 * i as i64).into()]),
                        Operation::new("Tj", vec![Object::string_literal(line)]),
                        Operation::new("ET", vec![]),
                    ]
                })
                .collect(),
            None => vec![
                Operation::new("re", vec![72.into(), 72.into(), 100.into(), 100.into()]),
                Operation::new("S", vec![]),
            ],
        };
        let content = Content { operations };
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));

        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
            "Resources" => resources_id,
            "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
        });
        kids.push(page_id.into());
    }

    let count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
        }),
    );

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);
    doc.compress();
    doc
}

const PASSWORD_PADDING: [u8; 32] = [
    0x28, 0xBF, 0x4E, 0x5E, 0x4E, 0x75, 0x8A, 0x41, 0x64, 0x00, 0x4E, 0x56, 0xFF, 0xFA, 0x01,
    0x08, 0x2E, 0x2E, 0x00, 0xB6, 0xD0, 0x68, 0x3E, 0x80, 0x2F, 0x0C, 0xA9, 0xFE, 0x64, 0x53,
    0x69, 0x7A,
];

fn pad_password(password: &[u8]) -> [u8; 32] {
    let n = password.len().min(32);
    let mut out = [0u8; 32];
    out[..n].copy_from_slice(&password[..n]);
    out[n..].copy_from_slice(&PASSWORD_PADDING[..32 - n]);
    out
}

fn rc4(key: &[u8], data: &[u8]) -> Vec<u8> {
    let mut s: Vec<u8> = (0..=255).collect();
    let mut j = 0u8;
    for i in 0..256 {
        j = j.wrapping_add(s[i]).wrapping_add(key[i % key.len()]);
        s.swap(i, j as usize);
    }

    let (mut i, mut j) = (0u8, 0u8);
    data.iter()
        .map(|byte| {
            i = i.wrapping_add(1);
            j = j.wrapping_add(s[i as usize]);
            s.swap(i as usize, j as usize);
            byte ^ s[s[i as usize].wrapping_add(s[j as usize]) as usize]
        })
        .collect()
}

/// Like [`build_pdf`], encrypted with the standard 40-bit RC4 handler
/// (revision 2) under `user_password`.
pub fn build_encrypted_pdf(pages: &[Option<&str>], user_password: &str) -> Vec<u8> {
    let mut doc = build_document(pages);
    let file_id = b"taxsplit-fixture".to_vec();
    let permissions: i32 = -4;

    let owner_key = Md5::digest(pad_password(b"owner"));
    let owner_entry = rc4(&owner_key[..5], &pad_password(user_password.as_bytes()));

    let mut hasher = Md5::new();
    hasher.update(pad_password(user_password.as_bytes()));
    hasher.update(&owner_entry);
    hasher.update(permissions.to_le_bytes());
    hasher.update(&file_id);
    let file_key = hasher.finalize()[..5].to_vec();
    let user_entry = rc4(&file_key, &PASSWORD_PADDING);

    for (&(number, generation), object) in doc.objects.iter_mut() {
        if let Object::Stream(stream) = object {
            let mut hasher = Md5::new();
            hasher.update(&file_key);
            hasher.update(&number.to_le_bytes()[..3]);
            hasher.update(&generation.to_le_bytes()[..2]);
            let object_key = hasher.finalize();
            let encrypted = rc4(&object_key[..10], &stream.content);
            stream.set_content(encrypted);
        }
    }

    let encrypt_id = doc.add_object(dictionary! {
        "Filter" => "Standard",
        "V" => 1,
        "R" => 2,
        "Length" => 40,
        "O" => Object::String(owner_entry, StringFormat::Hexadecimal),
        "U" => Object::String(user_entry, StringFormat::Hexadecimal),
        "P" => permissions as i64,
    });
    doc.trailer.set("Encrypt", encrypt_id);
    doc.trailer.set(
        "ID",
        vec![
            Object::String(file_id.clone(), StringFormat::Hexadecimal),
            Object::String(file_id, StringFormat::Hexadecimal),
        ],
    );

    let mut out = Vec::new();
    doc.save_to(&mut out).unwrap();
    out
}

/// Rasterizer that renders page N as a (10 + N) px wide blank image.
///
/// Page count comes from the real page tree, so unreadable input still fails.
#[derive(Default)]
pub struct FakeRasterizer {
    pub calls: AtomicUsize,
    pub fail_on_page: Option<u32>,
}

impl FakeRasterizer {
    pub fn failing_on(page: u32) -> Self {
        Self {
            calls: AtomicUsize::new(0),
            fail_on_page: Some(page),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

pub fn page_of(image: &DynamicImage) -> u32 {
    image.width() - 10
}

impl PageRasterizer for FakeRasterizer {
    fn rasterize(&self, document: &[u8], _dpi: u32) -> Result<Vec<RenderedPage>, PdfError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        let doc = Document::load_mem(document).map_err(|e| PdfError::Parse(e.to_string()))?;
        let count = doc.get_pages().len() as u32;

        (1..=count)
            .map(|number| {
                if self.fail_on_page == Some(number) {
                    return Err(PdfError::Rasterization {
                        page: number,
                        detail: "unsupported page".to_string(),
                    });
                }
                let image = RgbImage::from_pixel(10 + number, 20, Rgb([255, 255, 255]));
                Ok(RenderedPage {
                    number,
                    image: DynamicImage::ImageRgb8(image),
                })
            })
            .collect()
    }
}

/// Recognizer returning scripted text per page number.
#[derive(Default)]
pub struct FakeRecognizer {
    pub texts: HashMap<u32, String>,
    pub calls: AtomicUsize,
}

impl FakeRecognizer {
    pub fn with_pages(texts: &[(u32, &str)]) -> Self {
        Self {
            texts: texts.iter().map(|(p, t)| (*p, t.to_string())).collect(),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl TextRecognizer for FakeRecognizer {
    fn recognize(&self, image: &DynamicImage) -> Result<String, OcrError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.texts.get(&page_of(image)).cloned().unwrap_or_default())
    }
}

/// Read every entry of a ZIP archive, in archive order.
pub fn read_archive(bytes: &[u8]) -> Vec<(String, Vec<u8>)> {
    let mut archive = ZipArchive::new(Cursor::new(bytes.to_vec())).unwrap();
    (0..archive.len())
        .map(|i| {
            let mut file = archive.by_index(i).unwrap();
            let mut content = Vec::new();
            file.read_to_end(&mut content).unwrap();
            (file.name().to_string(), content)
        })
        .collect()
}

/// Names of the archive entries, in archive order.
pub fn entry_names(bytes: &[u8]) -> Vec<String> {
    read_archive(bytes).into_iter().map(|(name, _)| name).collect()
}

/// True when the single page of `pdf` draws an image XObject.
pub fn is_image_page(pdf: &[u8]) -> bool {
    let doc = Document::load_mem(pdf).unwrap();
    let pages = doc.get_pages();
    assert_eq!(pages.len(), 1);
    let page = doc.get_dictionary(pages[&1]).unwrap();
    let resources = page.get(b"Resources").unwrap();
    let resources = match resources {
        Object::Reference(id) => doc.get_dictionary(*id).unwrap(),
        Object::Dictionary(dict) => dict,
        _ => return false,
    };
    resources.has(b"XObject")
}
