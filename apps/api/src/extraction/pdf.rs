use std::path::Path;

use super::ExtractionError;

/// Extracts text page by page and joins the pages in order, each followed by a
/// newline. A page with no extractable text contributes an empty line.
pub fn extract_pages(path: &Path) -> Result<String, ExtractionError> {
    let pages = pdf_extract::extract_text_by_pages(path)
        .map_err(|e| ExtractionError::Pdf(e.to_string()))?;
    Ok(join_pages(&pages))
}

fn join_pages(pages: &[String]) -> String {
    pages.iter().fold(String::new(), |mut text, page| {
        text.push_str(page);
        text.push('\n');
        text
    })
}
