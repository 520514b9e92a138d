//! Lenient JSON parsing for model output.
//!
//! Models are asked for bare JSON but often wrap it in a markdown fence,
//! sometimes with prose around it. The whole text is tried as JSON first;
//! only if that fails are fenced blocks scanned for and tried in order.

use serde::de::DeserializeOwned;

const FENCE: &str = "```";

/// Returns the interiors of all complete ``` fences in `text`, in order.
///
/// An opening fence may carry a language tag (`json`, `JSON`, `js` ...) on the
/// same line; the tag is not part of the interior. An unterminated fence
/// yields nothing.
pub fn fenced_blocks(text: &str) -> Vec<&str> {
    let mut blocks = Vec::new();
    let mut rest = text;

    while let Some(open) = rest.find(FENCE) {
        let body = skip_language_tag(&rest[open + FENCE.len()..]);
        let Some(close) = body.find(FENCE) else {
            break;
        };
        blocks.push(body[..close].trim());
        rest = &body[close + FENCE.len()..];
    }

    blocks
}

fn skip_language_tag(after_fence: &str) -> &str {
    let line = after_fence.trim_start_matches([' ', '\t']);
    let tag_len = line
        .find(|c: char| !(c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '+' | '.')))
        .unwrap_or(line.len());

    if tag_len == 0 {
        return line;
    }
    let after_tag = &line[tag_len..];
    if after_tag.starts_with(|c: char| c.is_whitespace()) {
        after_tag
    } else {
        // Something like ```json{ is not a tag followed by a body.
        line
    }
}

/// Parses `text` as JSON, falling back to the contents of fenced blocks.
///
/// On total failure the error from the first fenced attempt is returned if
/// there was one, otherwise the error from parsing the whole text.
pub fn parse_json_lenient<T: DeserializeOwned>(text: &str) -> Result<T, serde_json::Error> {
    let whole_text_err = match serde_json::from_str(text.trim()) {
        Ok(value) => return Ok(value),
        Err(e) => e,
    };

    let mut first_fenced_err = None;
    for block in fenced_blocks(text) {
        match serde_json::from_str(block) {
            Ok(value) => return Ok(value),
            Err(e) => {
                first_fenced_err.get_or_insert(e);
            }
        }
    }

    Err(first_fenced_err.unwrap_or(whole_text_err))
}
