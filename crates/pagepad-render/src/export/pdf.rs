//! Multi-page PDF export.

use flate2::Compression;
use flate2::write::ZlibEncoder;
use lopdf::content::{Content, Operation};
use lopdf::{Dictionary, Document, Object, ObjectId, Stream, dictionary};
use pagepad_core::{ExportArtifact, ExportError, ExportSource, Exporter, PdfConfig, Snapshot};
use std::io::Write;

/// Writes one PDF page per populated document page.
///
/// Blank pages are skipped without leaving a gap. Each page image is
/// stretched over the full output page, ignoring its aspect ratio.
#[derive(Debug, Clone)]
pub struct PdfExporter {
    /// Output page width in points.
    page_width: f32,
    /// Output page height in points.
    page_height: f32,
    file_name: String,
}

impl Default for PdfExporter {
    fn default() -> Self {
        Self::from_config(&PdfConfig::default())
    }
}

impl PdfExporter {
    pub fn new(page_width: f32, page_height: f32, file_name: impl Into<String>) -> Self {
        Self {
            page_width,
            page_height,
            file_name: file_name.into(),
        }
    }

    pub fn from_config(config: &PdfConfig) -> Self {
        Self::new(config.page_width, config.page_height, config.file_name.clone())
    }

    fn media_box(&self) -> Vec<Object> {
        vec![
            0.into(),
            0.into(),
            Object::Real(self.page_width),
            Object::Real(self.page_height),
        ]
    }

    /// Add one output page showing `snapshot` stretched to the page size.
    fn add_image_page(
        &self,
        doc: &mut Document,
        pages_id: ObjectId,
        snapshot: &Snapshot,
    ) -> Result<ObjectId, ExportError> {
        let image_id = add_image_xobject(doc, snapshot)?;

        // Map the unit square the image occupies onto the whole page
        let content = Content {
            operations: vec![
                Operation::new("q", vec![]),
                Operation::new(
                    "cm",
                    vec![
                        Object::Real(self.page_width),
                        0.into(),
                        0.into(),
                        Object::Real(self.page_height),
                        0.into(),
                        0.into(),
                    ],
                ),
                Operation::new("Do", vec![Object::Name(b"Im0".to_vec())]),
                Operation::new("Q", vec![]),
            ],
        };
        let encoded = content.encode().map_err(|e| ExportError::Pdf(e.to_string()))?;
        let content_id = doc.add_object(Stream::new(Dictionary::new(), encoded));

        Ok(doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "MediaBox" => self.media_box(),
            "Contents" => content_id,
            "Resources" => dictionary! {
                "XObject" => dictionary! {
                    "Im0" => image_id,
                },
            },
        }))
    }
}

/// Store the RGB channels as an image XObject, with alpha as a soft mask
/// when any pixel is not opaque.
fn add_image_xobject(doc: &mut Document, snapshot: &Snapshot) -> Result<ObjectId, ExportError> {
    let pixel_count = snapshot.width() as usize * snapshot.height() as usize;
    let mut rgb = Vec::with_capacity(pixel_count * 3);
    let mut alpha = Vec::with_capacity(pixel_count);
    for px in snapshot.pixels().chunks_exact(4) {
        rgb.extend_from_slice(&px[..3]);
        alpha.push(px[3]);
    }
    let width = i64::from(snapshot.width());
    let height = i64::from(snapshot.height());

    let mut image_dict = dictionary! {
        "Type" => "XObject",
        "Subtype" => "Image",
        "Width" => width,
        "Height" => height,
        "ColorSpace" => "DeviceRGB",
        "BitsPerComponent" => 8_i64,
        "Filter" => "FlateDecode",
    };

    if alpha.iter().any(|&a| a != 255) {
        let smask_id = doc.add_object(Stream::new(
            dictionary! {
                "Type" => "XObject",
                "Subtype" => "Image",
                "Width" => width,
                "Height" => height,
                "ColorSpace" => "DeviceGray",
                "BitsPerComponent" => 8_i64,
                "Filter" => "FlateDecode",
            },
            deflate(&alpha)?,
        ));
        image_dict.set("SMask", smask_id);
    }

    Ok(doc.add_object(Stream::new(image_dict, deflate(&rgb)?)))
}

fn deflate(data: &[u8]) -> Result<Vec<u8>, ExportError> {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(data)?;
    Ok(encoder.finish()?)
}

impl Exporter for PdfExporter {
    fn export(&self, source: &ExportSource<'_>) -> Result<ExportArtifact, ExportError> {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let mut kids: Vec<Object> = Vec::new();

        for (index, page) in source.populated_pages() {
            let Some(image) = page.image() else { continue };
            let snapshot = match source.codec.decode(image) {
                Ok(snapshot) => snapshot,
                Err(e) => {
                    log::warn!("Skipping page {} in PDF: {}", index + 1, e);
                    continue;
                }
            };
            let page_id = self.add_image_page(&mut doc, pages_id, &snapshot)?;
            kids.push(page_id.into());
        }

        // A PDF needs at least one page
        if kids.is_empty() {
            let page_id = doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "MediaBox" => self.media_box(),
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

        let mut bytes = Vec::new();
        doc.save_to(&mut bytes)
            .map_err(|e| ExportError::Pdf(e.to_string()))?;

        Ok(ExportArtifact {
            file_name: self.file_name.clone(),
            mime_type: "application/pdf",
            bytes,
        })
    }
}
