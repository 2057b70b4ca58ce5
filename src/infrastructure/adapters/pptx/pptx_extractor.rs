//! PPTX Extractor - OOXML 演示文稿文本提取
//!
//! 实现 SlideExtractorPort trait。
//! .pptx 是 zip 容器，幻灯片在 ppt/slides/slide{N}.xml，
//! 文本在 DrawingML 的 <a:t> 节点内；<a:p> 为段落，<a:br/> 为段内换行

use quick_xml::events::Event;
use quick_xml::Reader;
use std::io::{Cursor, Read};
use zip::ZipArchive;

use crate::application::ports::{ExtractError, SlideExtractorPort};

/// PPTX 文本提取器
pub struct PptxSlideExtractor;

impl PptxSlideExtractor {
    pub fn new() -> Self {
        Self
    }

    /// 从 `ppt/slides/slide{N}.xml` 提取序号 N
    fn slide_index(name: &str) -> Option<u32> {
        let rest = name.strip_prefix("ppt/slides/slide")?;
        let digits = rest.strip_suffix(".xml")?;
        if digits.is_empty() {
            return None;
        }
        digits.parse().ok()
    }

    /// 解析单页幻灯片 XML，段落以换行分隔
    fn slide_text(xml: &str) -> Result<String, ExtractError> {
        let mut reader = Reader::from_str(xml);
        let mut lines: Vec<String> = Vec::new();
        let mut paragraph = String::new();
        let mut in_run_text = false;

        loop {
            match reader.read_event() {
                Ok(Event::Start(e)) if e.name().as_ref() == b"a:t" => {
                    in_run_text = true;
                }
                Ok(Event::End(e)) => match e.name().as_ref() {
                    b"a:t" => in_run_text = false,
                    b"a:p" => lines.push(std::mem::take(&mut paragraph)),
                    _ => {}
                },
                Ok(Event::Empty(e)) if e.name().as_ref() == b"a:br" => {
                    paragraph.push('\n');
                }
                Ok(Event::Text(t)) if in_run_text => {
                    let text = t
                        .unescape()
                        .map_err(|e| ExtractError::InvalidDocument(format!("bad text node: {}", e)))?;
                    paragraph.push_str(&text);
                }
                Ok(Event::Eof) => break,
                Ok(_) => {}
                Err(e) => {
                    return Err(ExtractError::InvalidDocument(format!(
                        "malformed slide XML: {}",
                        e
                    )))
                }
            }
        }

        if !paragraph.is_empty() {
            lines.push(paragraph);
        }

        Ok(lines.join("\n").trim().to_string())
    }
}

impl Default for PptxSlideExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl SlideExtractorPort for PptxSlideExtractor {
    fn extract(&self, file_bytes: &[u8]) -> Result<Vec<String>, ExtractError> {
        let mut archive = ZipArchive::new(Cursor::new(file_bytes))
            .map_err(|e| ExtractError::InvalidDocument(format!("not a zip container: {}", e)))?;

        // OOXML 容器必须有 content types 清单
        if archive.by_name("[Content_Types].xml").is_err() {
            return Err(ExtractError::InvalidDocument(
                "missing [Content_Types].xml, not an OOXML package".to_string(),
            ));
        }

        // 按幻灯片序号排序（文稿页序）
        let mut slide_entries: Vec<(u32, String)> = archive
            .file_names()
            .filter_map(|name| Self::slide_index(name).map(|idx| (idx, name.to_string())))
            .collect();
        slide_entries.sort_by_key(|(idx, _)| *idx);

        let mut slides = Vec::with_capacity(slide_entries.len());
        for (_, name) in slide_entries {
            let mut entry = archive
                .by_name(&name)
                .map_err(|e| ExtractError::InvalidDocument(format!("corrupt entry {}: {}", name, e)))?;
            let mut xml = String::new();
            entry
                .read_to_string(&mut xml)
                .map_err(|e| ExtractError::InvalidDocument(format!("unreadable entry {}: {}", name, e)))?;
            slides.push(Self::slide_text(&xml)?);
        }

        // 无幻灯片的空文稿返回空序列，不是错误
        Ok(slides)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use zip::write::SimpleFileOptions;
    use zip::ZipWriter;

    const CONTENT_TYPES: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"/>"#;

    fn slide_xml(paragraphs: &[&str]) -> String {
        let body: String = paragraphs
            .iter()
            .map(|p| format!("<a:p><a:r><a:t>{}</a:t></a:r></a:p>", p))
            .collect();
        format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<p:sld xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main"
       xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main">
<p:cSld><p:spTree><p:sp><p:txBody>{}</p:txBody></p:sp></p:spTree></p:cSld>
</p:sld>"#,
            body
        )
    }

    fn make_pptx(slides: &[(&str, String)]) -> Vec<u8> {
        let mut buf = Cursor::new(Vec::new());
        let mut writer = ZipWriter::new(&mut buf);
        let options = SimpleFileOptions::default();

        writer.start_file("[Content_Types].xml", options).unwrap();
        writer.write_all(CONTENT_TYPES.as_bytes()).unwrap();

        for (name, xml) in slides {
            writer.start_file(*name, options).unwrap();
            writer.write_all(xml.as_bytes()).unwrap();
        }

        writer.finish().unwrap();
        buf.into_inner()
    }

    #[test]
    fn test_extract_five_slides_in_deck_order() {
        let slides: Vec<(String, String)> = (1..=5)
            .map(|i| {
                (
                    format!("ppt/slides/slide{}.xml", i),
                    slide_xml(&[&format!("第{}页", i)]),
                )
            })
            .collect();
        let entries: Vec<(&str, String)> = slides
            .iter()
            .map(|(n, x)| (n.as_str(), x.clone()))
            .collect();
        let pptx = make_pptx(&entries);

        let texts = PptxSlideExtractor::new().extract(&pptx).unwrap();
        assert_eq!(texts.len(), 5);
        for (i, text) in texts.iter().enumerate() {
            assert_eq!(text, &format!("第{}页", i + 1));
        }
    }

    #[test]
    fn test_extract_orders_numerically_not_lexically() {
        // zip 内顺序打乱，且 slide10 按字典序会排在 slide2 前
        let pptx = make_pptx(&[
            ("ppt/slides/slide10.xml", slide_xml(&["ten"])),
            ("ppt/slides/slide2.xml", slide_xml(&["two"])),
            ("ppt/slides/slide1.xml", slide_xml(&["one"])),
        ]);

        let texts = PptxSlideExtractor::new().extract(&pptx).unwrap();
        assert_eq!(texts, vec!["one", "two", "ten"]);
    }

    #[test]
    fn test_extract_preserves_internal_line_breaks() {
        let pptx = make_pptx(&[(
            "ppt/slides/slide1.xml",
            slide_xml(&["标题", "第一行", "第二行"]),
        )]);

        let texts = PptxSlideExtractor::new().extract(&pptx).unwrap();
        assert_eq!(texts[0], "标题\n第一行\n第二行");
    }

    #[test]
    fn test_extract_empty_deck_returns_empty_sequence() {
        let pptx = make_pptx(&[]);
        let texts = PptxSlideExtractor::new().extract(&pptx).unwrap();
        assert!(texts.is_empty());
    }

    #[test]
    fn test_extract_rejects_non_zip() {
        let err = PptxSlideExtractor::new()
            .extract(b"definitely not a zip file")
            .unwrap_err();
        assert!(matches!(err, ExtractError::InvalidDocument(_)));
    }

    #[test]
    fn test_extract_rejects_zip_without_content_types() {
        let mut buf = Cursor::new(Vec::new());
        let mut writer = ZipWriter::new(&mut buf);
        writer
            .start_file("random.txt", SimpleFileOptions::default())
            .unwrap();
        writer.write_all(b"hello").unwrap();
        writer.finish().unwrap();

        let err = PptxSlideExtractor::new()
            .extract(&buf.into_inner())
            .unwrap_err();
        assert!(matches!(err, ExtractError::InvalidDocument(_)));
    }

    #[test]
    fn test_extract_rejects_malformed_slide_xml() {
        let pptx = make_pptx(&[(
            "ppt/slides/slide1.xml",
            "<p:sld><a:p><a:t>text</a:wrong></a:p></p:sld>".to_string(),
        )]);
        let err = PptxSlideExtractor::new().extract(&pptx).unwrap_err();
        assert!(matches!(err, ExtractError::InvalidDocument(_)));
    }

    #[test]
    fn test_slide_index_parsing() {
        assert_eq!(
            PptxSlideExtractor::slide_index("ppt/slides/slide12.xml"),
            Some(12)
        );
        assert_eq!(
            PptxSlideExtractor::slide_index("ppt/slides/_rels/slide1.xml.rels"),
            None
        );
        assert_eq!(PptxSlideExtractor::slide_index("ppt/slides/slide.xml"), None);
        assert_eq!(PptxSlideExtractor::slide_index("docProps/app.xml"), None);
    }
}
