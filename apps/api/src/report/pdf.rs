//! PDF assembly with `printpdf`.
//!
//! CPU-bound; callers run `render_pdf` inside `tokio::task::spawn_blocking`.

use anyhow::{anyhow, Result};
use printpdf::{IndirectFontRef, Mm, PdfDocument};

use crate::report::font::ReportFont;
use crate::report::layout::{paginate, Block, PageConfig};

/// Renders the blocks to an in-memory PDF.
pub fn render_pdf(
    title: &str,
    blocks: &[Block],
    page: &PageConfig,
    font: &ReportFont,
) -> Result<Vec<u8>> {
    let pages = paginate(blocks, page);

    let (doc, first_page, first_layer) =
        PdfDocument::new(title, Mm(page.width_mm), Mm(page.height_mm), "Layer 1");

    let font_ref: IndirectFontRef = doc
        .add_external_font(font.bytes())
        .map_err(|e| anyhow!("failed to embed font {}: {e:?}", font.path().display()))?;

    for (index, lines) in pages.iter().enumerate() {
        let (page_index, layer_index) = if index == 0 {
            (first_page, first_layer)
        } else {
            doc.add_page(
                Mm(page.width_mm),
                Mm(page.height_mm),
                format!("Layer {}", index + 1),
            )
        };
        let layer = doc.get_page(page_index).get_layer(layer_index);

        for line in lines {
            layer.use_text(
                line.text.as_str(),
                line.font_size_pt,
                Mm(line.x_mm),
                Mm(line.y_mm),
                &font_ref,
            );
        }
    }

    doc.save_to_bytes()
        .map_err(|e| anyhow!("failed to serialize PDF: {e:?}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::font::test_font;
    use crate::report::layout::default_page_config;

    const DAY_MASTER: &str = "日主偏旺，喜用金泄秀生财。";
    const LIFE_PALACE: &str = "命宫贪狼，多才多艺。";

    fn blocks() -> Vec<Block> {
        vec![
            Block {
                text: "玄学综合分析报告".to_string(),
                font_size_pt: 18.0,
                space_before_mm: 0.0,
            },
            Block {
                text: "一、八字分析".to_string(),
                font_size_pt: 14.0,
                space_before_mm: 6.0,
            },
            Block {
                text: format!("{DAY_MASTER}\n\n{LIFE_PALACE}"),
                font_size_pt: 11.0,
                space_before_mm: 2.0,
            },
        ]
    }

    fn squash(text: &str) -> String {
        text.chars().filter(|c| !c.is_whitespace()).collect()
    }

    #[test]
    fn test_render_produces_valid_pdf() {
        let bytes = render_pdf("报告", &blocks(), &default_page_config(), &test_font()).unwrap();
        assert!(bytes.starts_with(b"%PDF-"));
    }

    #[test]
    fn test_chinese_text_survives_rendering() {
        let bytes = render_pdf("报告", &blocks(), &default_page_config(), &test_font()).unwrap();

        let text = squash(&pdf_extract::extract_text_from_mem(&bytes).unwrap());
        assert!(!text.contains('?'), "glyphs were replaced: {text}");
        assert!(text.contains("玄学综合分析报告"), "missing title in {text}");
        assert!(text.contains("一、八字分析"), "missing heading in {text}");
        assert!(text.contains(DAY_MASTER), "missing body in {text}");
        assert!(text.contains(LIFE_PALACE), "missing body in {text}");
    }

    #[test]
    fn test_long_chinese_body_spans_pages() {
        let long = vec![Block {
            text: DAY_MASTER.repeat(400),
            font_size_pt: 11.0,
            space_before_mm: 0.0,
        }];
        let page = default_page_config();
        assert!(paginate(&long, &page).len() > 1);
        let bytes = render_pdf("报告", &long, &page, &test_font()).unwrap();

        let text = squash(&pdf_extract::extract_text_from_mem(&bytes).unwrap());
        assert_eq!(text.matches("喜用金").count(), 400);
    }
}
