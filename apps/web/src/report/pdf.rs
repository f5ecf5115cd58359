//! Minimal PDF 1.4 writer for laid-out report pages.
//!
//! Only the two standard Type1 fonts are referenced, so nothing is embedded.
//! Object layout:
//!   1 Catalog, 2 Pages, 3 Helvetica, 4 Helvetica-Bold, 5 Info,
//!   then a Page / content-stream pair per page.
//! Output depends only on the pages and the document info; there is no
//! random document id and no wall-clock read.

use chrono::{DateTime, Utc};

use crate::report::font_metrics::Font;
use crate::report::layout::{Page, PageGeometry};

const CATALOG_ID: usize = 1;
const PAGES_ID: usize = 2;
const INFO_ID: usize = 5;
const FIRST_PAGE_ID: usize = 6;

const FONTS: [(Font, usize); 2] = [(Font::Helvetica, 3), (Font::HelveticaBold, 4)];

pub struct DocumentInfo<'a> {
    pub title: &'a str,
    pub producer: &'a str,
    pub created_at: DateTime<Utc>,
}

/// Escapes a literal string for use inside `( ... )`.
///
/// Latin-1 letters and the bullet are written as WinAnsi octal escapes.
/// Anything WinAnsi cannot encode is replaced with `?`.
pub fn escape_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '(' | ')' | '\\' => {
                out.push('\\');
                out.push(c);
            }
            '\u{2022}' => out.push_str("\\225"),
            ' '..='~' => out.push(c),
            '\u{a0}'..='\u{ff}' => out.push_str(&format!("\\{:03o}", c as u32)),
            _ => out.push('?'),
        }
    }
    out
}

/// Text operators for one page. PDF y grows upwards, so each line's
/// baseline sits one font size below its top.
pub fn content_stream(page: &Page, geometry: &PageGeometry) -> String {
    let mut out = String::new();
    for line in &page.lines {
        let size = line.style.size_pt();
        let baseline = geometry.height - (line.top + size);
        out.push_str(&format!(
            "BT /{} {} Tf {:.2} {:.2} Td ({}) Tj ET\n",
            line.style.font().resource_name(),
            size,
            line.x,
            baseline,
            escape_text(&line.text)
        ));
    }
    out
}

struct PdfWriter {
    buf: Vec<u8>,
    offsets: Vec<usize>,
}

impl PdfWriter {
    fn new() -> Self {
        let mut buf = Vec::new();
        buf.extend_from_slice(b"%PDF-1.4\n%\xE2\xE3\xCF\xD3\n");
        Self {
            buf,
            offsets: Vec::new(),
        }
    }

    /// Objects must be written in id order starting at 1.
    fn object(&mut self, id: usize, body: &str) {
        debug_assert_eq!(id, self.offsets.len() + 1);
        self.offsets.push(self.buf.len());
        self.buf
            .extend_from_slice(format!("{id} 0 obj\n{body}\nendobj\n").as_bytes());
    }

    fn stream(&mut self, id: usize, content: &str) {
        let body = format!(
            "<< /Length {} >>\nstream\n{}endstream",
            content.len(),
            content
        );
        self.object(id, &body);
    }

    fn finish(mut self, root: usize, info: usize) -> Vec<u8> {
        let xref_offset = self.buf.len();
        let size = self.offsets.len() + 1;

        let mut xref = format!("xref\n0 {size}\n0000000000 65535 f \n");
        for offset in &self.offsets {
            xref.push_str(&format!("{offset:010} 00000 n \n"));
        }
        xref.push_str(&format!(
            "trailer\n<< /Size {size} /Root {root} 0 R /Info {info} 0 R >>\nstartxref\n{xref_offset}\n%%EOF\n"
        ));
        self.buf.extend_from_slice(xref.as_bytes());
        self.buf
    }
}

pub fn write_document(pages: &[Page], geometry: &PageGeometry, info: &DocumentInfo<'_>) -> Vec<u8> {
    let page_ids: Vec<usize> = (0..pages.len()).map(|i| FIRST_PAGE_ID + 2 * i).collect();
    let kids = page_ids
        .iter()
        .map(|id| format!("{id} 0 R"))
        .collect::<Vec<_>>()
        .join(" ");
    let font_resources = FONTS
        .iter()
        .map(|(font, id)| format!("/{} {id} 0 R", font.resource_name()))
        .collect::<Vec<_>>()
        .join(" ");

    let mut writer = PdfWriter::new();
    writer.object(
        CATALOG_ID,
        &format!("<< /Type /Catalog /Pages {PAGES_ID} 0 R >>"),
    );
    writer.object(
        PAGES_ID,
        &format!("<< /Type /Pages /Kids [{kids}] /Count {} >>", pages.len()),
    );
    for (font, id) in FONTS {
        writer.object(
            id,
            &format!(
                "<< /Type /Font /Subtype /Type1 /BaseFont /{} /Encoding /WinAnsiEncoding >>",
                font.base_name()
            ),
        );
    }
    writer.object(
        INFO_ID,
        &format!(
            "<< /Title ({}) /Producer ({}) /CreationDate (D:{}Z) >>",
            escape_text(info.title),
            escape_text(info.producer),
            info.created_at.format("%Y%m%d%H%M%S")
        ),
    );

    for (page, page_id) in pages.iter().zip(&page_ids) {
        let contents_id = page_id + 1;
        writer.object(
            *page_id,
            &format!(
                "<< /Type /Page /Parent {PAGES_ID} 0 R /MediaBox [0 0 {} {}] \
                 /Resources << /Font << {font_resources} >> >> /Contents {contents_id} 0 R >>",
                geometry.width, geometry.height
            ),
        );
        writer.stream(contents_id, &content_stream(page, geometry));
    }

    writer.finish(CATALOG_ID, INFO_ID)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::layout::{PlacedLine, TextStyle};
    use chrono::TimeZone;

    fn info() -> DocumentInfo<'static> {
        DocumentInfo {
            title: "Resume Analysis Report",
            producer: "resumatch",
            created_at: Utc.with_ymd_and_hms(2024, 3, 5, 14, 7, 9).unwrap(),
        }
    }

    fn page(texts: &[&str]) -> Page {
        Page {
            lines: texts
                .iter()
                .enumerate()
                .map(|(i, t)| PlacedLine {
                    x: 72.0,
                    top: 72.0 + i as f32 * 15.4,
                    style: TextStyle::Body,
                    text: t.to_string(),
                })
                .collect(),
        }
    }

    fn rfind(haystack: &[u8], needle: &[u8]) -> Option<usize> {
        haystack.windows(needle.len()).rposition(|w| w == needle)
    }

    #[test]
    fn test_escape_text() {
        assert_eq!(escape_text(r"a (b) \c"), r"a \(b\) \\c");
        assert_eq!(escape_text("\u{2022} Rust"), "\\225 Rust");
        assert_eq!(escape_text("Polish your résumé"), r"Polish your r\351sum\351");
        assert_eq!(escape_text("Façade"), r"Fa\347ade");
        assert_eq!(escape_text("\u{4e2d}"), "?");
    }

    #[test]
    fn test_baseline_is_measured_from_bottom() {
        let stream = content_stream(&page(&["hello"]), &PageGeometry::letter());
        // 792 - (72 + 11)
        assert_eq!(stream, "BT /F1 11 Tf 72.00 709.00 Td (hello) Tj ET\n");
    }

    #[test]
    fn test_document_structure() {
        let geometry = PageGeometry::letter();
        let pdf = write_document(&[page(&["one"]), page(&["two"])], &geometry, &info());
        let text = String::from_utf8_lossy(&pdf);

        assert!(pdf.starts_with(b"%PDF-1.4\n"));
        assert!(pdf.ends_with(b"%%EOF\n"));
        assert!(text.contains("/Kids [6 0 R 8 0 R] /Count 2"));
        assert!(text.contains("/CreationDate (D:20240305140709Z)"));
        assert!(text.contains("(one) Tj"));
        assert!(text.contains("(two) Tj"));
    }

    #[test]
    fn test_xref_offsets_point_at_objects() {
        let geometry = PageGeometry::letter();
        let pdf = write_document(&[page(&["a", "b"])], &geometry, &info());

        let marker = rfind(&pdf, b"startxref\n").unwrap();
        let tail = std::str::from_utf8(&pdf[marker..]).unwrap();
        let xref_offset: usize = tail.lines().nth(1).unwrap().parse().unwrap();

        let xref = std::str::from_utf8(&pdf[xref_offset..]).unwrap();
        assert!(xref.starts_with("xref\n0 8\n"));
        let entries: Vec<&str> = xref.lines().skip(3).take(7).collect();
        for (i, entry) in entries.iter().enumerate() {
            let offset: usize = entry[..10].parse().unwrap();
            let expected = format!("{} 0 obj", i + 1);
            assert!(
                pdf[offset..].starts_with(expected.as_bytes()),
                "object {} not at offset {offset}",
                i + 1
            );
        }
    }

    #[test]
    fn test_stream_length_matches_content() {
        let geometry = PageGeometry::letter();
        let single = page(&["line"]);
        let expected = content_stream(&single, &geometry);
        let pdf = write_document(&[single], &geometry, &info());
        let text = String::from_utf8_lossy(&pdf);
        assert!(text.contains(&format!("<< /Length {} >>\nstream\n{}endstream", expected.len(), expected)));
    }
}
