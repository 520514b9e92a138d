//! DOCX to text.
//!
//! A .docx file is a zip package; the body lives in `word/document.xml`.
//! Text runs (`w:t`) are concatenated, each paragraph (`w:p`) ends with a
//! newline, `w:tab` becomes `\t`, and `w:br`/`w:cr` become `\n`.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use quick_xml::events::Event;
use quick_xml::reader::Reader;
use zip::ZipArchive;

use super::ExtractionError;

const DOCUMENT_PART: &str = "word/document.xml";

pub fn extract_document_text(path: &Path) -> Result<String, ExtractionError> {
    let file = File::open(path)?;
    let mut archive = ZipArchive::new(BufReader::new(file))
        .map_err(|e| ExtractionError::Docx(format!("not a Word document package: {e}")))?;
    let mut part = archive
        .by_name(DOCUMENT_PART)
        .map_err(|e| ExtractionError::Docx(format!("{DOCUMENT_PART} unreadable: {e}")))?;

    let mut xml = String::new();
    part.read_to_string(&mut xml)?;
    document_xml_to_text(&xml)
}

pub fn document_xml_to_text(xml: &str) -> Result<String, ExtractionError> {
    let mut reader = Reader::from_str(xml);
    let mut text = String::new();
    let mut in_run_text = false;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => {
                if e.name().as_ref() == b"w:t" {
                    in_run_text = true;
                }
            }
            Ok(Event::End(e)) => match e.name().as_ref() {
                b"w:t" => in_run_text = false,
                b"w:p" => text.push('\n'),
                _ => {}
            },
            Ok(Event::Empty(e)) => match e.name().as_ref() {
                b"w:tab" => text.push('\t'),
                b"w:br" | b"w:cr" | b"w:p" => text.push('\n'),
                _ => {}
            },
            Ok(Event::Text(t)) if in_run_text => {
                let unescaped = t
                    .unescape()
                    .map_err(|e| ExtractionError::Docx(e.to_string()))?;
                text.push_str(&unescaped);
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(ExtractionError::Docx(format!(
                    "malformed {DOCUMENT_PART} at byte {}: {e}",
                    reader.buffer_position()
                )))
            }
            _ => {}
        }
    }

    Ok(text.trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use zip::write::SimpleFileOptions;
    use zip::ZipWriter;

    const BODY: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">
  <w:body>
    <w:p><w:r><w:t>Ada Lovelace</w:t></w:r></w:p>
    <w:p><w:r><w:t xml:space="preserve">Skills: </w:t></w:r><w:r><w:t>Go &amp; Python</w:t></w:r></w:p>
    <w:p><w:r><w:t>Name</w:t><w:tab/><w:t>Role</w:t><w:br/><w:t>Next line</w:t></w:r></w:p>
  </w:body>
</w:document>"#;

    fn write_docx(path: &Path, document_xml: &str) {
        let file = File::create(path).unwrap();
        let mut zip = ZipWriter::new(file);
        zip.start_file(DOCUMENT_PART, SimpleFileOptions::default())
            .unwrap();
        zip.write_all(document_xml.as_bytes()).unwrap();
        zip.finish().unwrap();
    }

    #[test]
    fn test_paragraphs_runs_tabs_and_breaks() {
        let text = document_xml_to_text(BODY).unwrap();
        assert_eq!(
            text,
            "Ada Lovelace\nSkills: Go & Python\nName\tRole\nNext line"
        );
    }

    #[test]
    fn test_extracts_from_zip_package() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("resume.docx");
        write_docx(&path, BODY);

        let text = extract_document_text(&path).unwrap();
        assert!(text.starts_with("Ada Lovelace\n"));
        assert!(text.contains("Go & Python"));
    }

    #[test]
    fn test_package_without_document_part_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.docx");
        let mut zip = ZipWriter::new(File::create(&path).unwrap());
        zip.start_file("word/styles.xml", SimpleFileOptions::default())
            .unwrap();
        zip.write_all(b"<w:styles/>").unwrap();
        zip.finish().unwrap();

        let result = extract_document_text(&path);
        assert!(matches!(result, Err(ExtractionError::Docx(_))));
    }

    #[test]
    fn test_text_outside_runs_is_ignored() {
        let xml = r#"<w:document><w:body><w:p><w:instrText>PAGE</w:instrText><w:r><w:t>Body</w:t></w:r></w:p></w:body></w:document>"#;
        assert_eq!(document_xml_to_text(xml).unwrap(), "Body");
    }
}
