//! Exporters for the whole page book.

mod combined;
mod pdf;

pub use combined::CombinedImageExporter;
pub use pdf::PdfExporter;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::{PngCodec, decode_png};
    use crate::raster::{RasterSurface, load_font};
    use ab_glyph::FontArc;
    use kurbo::Point;
    use lopdf::Document;
    use pagepad_core::{
        CanvasConfig, Color, DrawingSurface, EncodedImage, ExportSource, Exporter, LabelConfig,
        Page, PageCanvasController, PageCodec, Snapshot, TextAlign, TextStyle,
    };

    const W: u32 = 40;
    const H: u32 = 30;
    const GREY: [u8; 4] = [200, 200, 200, 255];

    fn controller() -> PageCanvasController<RasterSurface, PngCodec> {
        let mut controller = PageCanvasController::new(PngCodec, CanvasConfig::default());
        controller.mount(RasterSurface::new(W, H));
        controller.set_stroke_color(Color::rgb(0, 0, 255));
        controller
    }

    fn stroke(controller: &mut PageCanvasController<RasterSurface, PngCodec>, y: f64) {
        controller.pointer_down(Point::new(5.0, y));
        controller.pointer_move(Point::new(35.0, y));
        controller.pointer_up();
    }

    fn test_font() -> FontArc {
        load_font(concat!(env!("CARGO_MANIFEST_DIR"), "/testdata/DejaVuSans.ttf")).unwrap()
    }

    /// A surface holding only the page label for `text`, drawn directly.
    fn label_only(width: u32, height: u32, text: &str) -> Snapshot {
        let label = LabelConfig::default();
        let mut surface = RasterSurface::new(width, height).with_font(test_font());
        surface.draw_text(
            text,
            Point::new(
                f64::from(width) - label.offset,
                f64::from(height) - label.offset,
            ),
            &TextStyle {
                size: label.font_size,
                color: label.color,
                align: TextAlign::Right,
            },
        );
        surface.snapshot()
    }

    fn encoded(width: u32, height: u32) -> Page {
        let pixels = [200, 200, 200, 255].repeat((width * height) as usize);
        let snapshot = Snapshot::from_rgba(width, height, pixels).unwrap();
        Page::with_image(PngCodec.encode(&snapshot).unwrap())
    }

    /// Width of the image XObject on each PDF page, in page order.
    fn pdf_image_widths(bytes: &[u8]) -> Vec<i64> {
        let doc = Document::load_mem(bytes).unwrap();
        doc.get_pages()
            .values()
            .map(|&page_id| {
                let page = doc.get_dictionary(page_id).unwrap();
                let resources = page.get(b"Resources").unwrap().as_dict().unwrap();
                let xobjects = resources.get(b"XObject").unwrap().as_dict().unwrap();
                let image_id = xobjects.get(b"Im0").unwrap().as_reference().unwrap();
                let image = doc.get_object(image_id).unwrap().as_stream().unwrap();
                image.dict.get(b"Width").unwrap().as_i64().unwrap()
            })
            .collect()
    }

    #[test]
    fn test_combined_image_stacks_pages() {
        let mut controller = controller();
        stroke(&mut controller, 10.0);
        controller.next_page().unwrap();
        controller.prev_page().unwrap();

        let exporter = CombinedImageExporter::default().with_timestamp(1_700_000_000_000);
        let artifact = controller.export_with(&exporter).unwrap();
        assert_eq!(artifact.file_name, "combined-canvas-1700000000000.png");
        assert_eq!(artifact.mime_type, "image/png");

        let combined = decode_png(&artifact.bytes).unwrap();
        assert_eq!(combined.width(), W);
        assert_eq!(combined.height(), 2 * H);
        assert_eq!(combined.pixel(20, 10), Some([0, 0, 255, 255]));
        // prev_page saved the second page; with no font there is no label in it
        for y in H..2 * H {
            for x in 0..W {
                assert_eq!(combined.pixel(x, y), Some([0, 0, 0, 0]));
            }
        }
    }

    #[test]
    fn test_combined_height_counts_blank_pages() {
        let pages = vec![encoded(W, H), Page::blank(), Page::blank(), encoded(W, H)];
        let source = ExportSource {
            pages: &pages,
            width: W,
            height: H,
            codec: &PngCodec,
        };
        let artifact = CombinedImageExporter::new("out").with_timestamp(1).export(&source).unwrap();
        let combined = decode_png(&artifact.bytes).unwrap();
        assert_eq!(combined.height(), 4 * H);
        assert_eq!(combined.pixel(0, 0), Some(GREY));
        assert_eq!(combined.pixel(0, H), Some([0, 0, 0, 0]));
        assert_eq!(combined.pixel(0, 3 * H), Some(GREY));
    }

    #[test]
    fn test_combined_scales_mismatched_pages() {
        let pages = vec![encoded(W / 2, H / 2)];
        let source = ExportSource {
            pages: &pages,
            width: W,
            height: H,
            codec: &PngCodec,
        };
        let artifact = CombinedImageExporter::new("out").with_timestamp(1).export(&source).unwrap();
        let combined = decode_png(&artifact.bytes).unwrap();
        assert_eq!((combined.width(), combined.height()), (W, H));
        let [r, g, b, a] = combined.pixel(W - 1, H - 1).unwrap();
        assert_eq!(a, 255);
        for channel in [r, g, b] {
            assert!(channel.abs_diff(200) <= 1);
        }
    }

    #[test]
    fn test_combined_skips_undecodable_pages() {
        let pages = vec![Page::with_image(EncodedImage::new(vec![1, 2, 3])), encoded(W, H)];
        let source = ExportSource {
            pages: &pages,
            width: W,
            height: H,
            codec: &PngCodec,
        };
        let artifact = CombinedImageExporter::new("out").with_timestamp(1).export(&source).unwrap();
        let combined = decode_png(&artifact.bytes).unwrap();
        assert_eq!(combined.height(), 2 * H);
        assert_eq!(combined.pixel(0, 0), Some([0, 0, 0, 0]));
        assert_eq!(combined.pixel(0, H), Some(GREY));
    }

    #[test]
    fn test_pdf_has_one_page_per_populated_page() {
        let pages = vec![encoded(4, 4), Page::blank(), encoded(6, 6), Page::blank()];
        let source = ExportSource {
            pages: &pages,
            width: W,
            height: H,
            codec: &PngCodec,
        };
        let artifact = PdfExporter::default().export(&source).unwrap();
        assert_eq!(artifact.file_name, "handwriting.pdf");
        assert_eq!(artifact.mime_type, "application/pdf");
        assert!(artifact.bytes.starts_with(b"%PDF-"));
        assert_eq!(pdf_image_widths(&artifact.bytes), vec![4, 6]);
    }

    #[test]
    fn test_pdf_pages_use_configured_size() {
        let pages = vec![encoded(4, 4)];
        let source = ExportSource {
            pages: &pages,
            width: W,
            height: H,
            codec: &PngCodec,
        };
        let artifact = PdfExporter::new(612.0, 792.0, "letter.pdf").export(&source).unwrap();
        let doc = Document::load_mem(&artifact.bytes).unwrap();
        let page_id = *doc.get_pages().values().next().unwrap();
        let media_box = doc
            .get_dictionary(page_id)
            .unwrap()
            .get(b"MediaBox")
            .unwrap()
            .as_array()
            .unwrap()
            .clone();
        assert_eq!(media_box.len(), 4);
        assert_eq!(media_box[2].as_float().unwrap(), 612.0);
        assert_eq!(media_box[3].as_float().unwrap(), 792.0);
    }

    #[test]
    fn test_pdf_with_only_blank_pages_has_one_empty_page() {
        let pages = vec![Page::blank(), Page::blank()];
        let source = ExportSource {
            pages: &pages,
            width: W,
            height: H,
            codec: &PngCodec,
        };
        let artifact = PdfExporter::default().export(&source).unwrap();
        let doc = Document::load_mem(&artifact.bytes).unwrap();
        assert_eq!(doc.get_pages().len(), 1);
    }

    #[test]
    fn test_pdf_skips_undecodable_pages() {
        let pages = vec![Page::with_image(EncodedImage::new(vec![9; 4])), encoded(5, 5)];
        let source = ExportSource {
            pages: &pages,
            width: W,
            height: H,
            codec: &PngCodec,
        };
        let artifact = PdfExporter::default().export(&source).unwrap();
        assert_eq!(pdf_image_widths(&artifact.bytes), vec![5]);
    }

    #[test]
    fn test_pdf_export_from_controller() {
        let mut controller = controller();
        stroke(&mut controller, 10.0);
        controller.next_page().unwrap();
        stroke(&mut controller, 20.0);

        let artifact = controller.export_with(&PdfExporter::default()).unwrap();
        // Both pages were saved, the second by the export itself
        assert_eq!(pdf_image_widths(&artifact.bytes), vec![i64::from(W), i64::from(W)]);
        assert_eq!(controller.current_page(), 1);
    }

    #[test]
    fn test_clear_then_undo_brings_stroke_back() {
        let mut controller = controller();
        stroke(&mut controller, 10.0);
        let with_stroke = controller.snapshot().unwrap();

        assert!(controller.clear());
        assert!(controller.snapshot().unwrap().is_blank());
        assert!(controller.undo());
        assert_eq!(controller.snapshot().unwrap(), with_stroke);
    }

    #[test]
    fn test_page_round_trip_through_png_is_exact() {
        let mut controller = controller();
        stroke(&mut controller, 10.0);
        let page_one = controller.snapshot().unwrap();

        controller.next_page().unwrap();
        stroke(&mut controller, 20.0);
        controller.prev_page().unwrap();

        // Label is not drawn without a font, so the page comes back unchanged
        assert_eq!(controller.snapshot().unwrap(), page_one);
    }

    #[test]
    fn test_page_label_is_one_based_and_bottom_right() {
        let mut controller = PageCanvasController::new(PngCodec, CanvasConfig::default());
        controller.mount(RasterSurface::new(200, 60).with_font(test_font()));

        let page_one = controller.snapshot().unwrap();
        assert!(!page_one.is_blank());
        assert_eq!(page_one, label_only(200, 60, "Page 1"));
        for y in 0..60 {
            for x in 0..200 {
                let [_, _, _, a] = page_one.pixel(x, y).unwrap();
                if a > 0 {
                    assert!(x >= 120 && y >= 30, "label pixel at ({x}, {y})");
                }
            }
        }

        controller.next_page().unwrap();
        assert_eq!(controller.snapshot().unwrap(), label_only(200, 60, "Page 2"));
    }

    #[test]
    fn test_disabled_label_leaves_page_blank() {
        let mut config = CanvasConfig::default();
        config.page_label.enabled = false;
        let mut controller = PageCanvasController::new(PngCodec, config);
        controller.mount(RasterSurface::new(200, 60).with_font(test_font()));
        assert!(controller.snapshot().unwrap().is_blank());
    }
}
