use once_cell::sync::Lazy;
use regex::Regex;

/// `#tag` at line start or after whitespace, together with the whitespace in
/// front of it. `# Heading` has a space after the hash and never matches.
static INLINE_TAG: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?:^|[ \t]+)#[A-Za-z][\w/-]*").expect("inline tag pattern"));

fn is_fence(line: &str) -> bool {
    let trimmed = line.trim_start();
    trimmed.starts_with("```") || trimmed.starts_with("~~~")
}

/// `-`, `*`, `+` or `1.` with nothing after it: a list item left empty.
fn is_bare_list_marker(text: &str) -> bool {
    let marker = text.trim_start();
    matches!(marker, "-" | "*" | "+")
        || marker
            .strip_suffix(|c| c == '.' || c == ')')
            .map(|n| !n.is_empty() && n.chars().all(|c| c.is_ascii_digit()))
            .unwrap_or(false)
}

/// Remove inline `#tag` tokens outside fenced code blocks.
///
/// Returns the new body and the number of tokens removed. Lines that lost a
/// token are right-trimmed (line endings kept), list items left empty are
/// dropped, and all other lines are kept as they were.
pub fn strip_inline_tags(body: &str) -> (String, usize) {
    let mut in_fence = false;
    let mut removed = 0;
    let mut out = String::with_capacity(body.len());

    for line in body.split_inclusive('\n') {
        if is_fence(line) {
            in_fence = !in_fence;
            out.push_str(line);
            continue;
        }
        if in_fence {
            out.push_str(line);
            continue;
        }

        let (text, newline) = if let Some(text) = line.strip_suffix("\r\n") {
            (text, "\r\n")
        } else if let Some(text) = line.strip_suffix('\n') {
            (text, "\n")
        } else {
            (line, "")
        };
        let count = INLINE_TAG.find_iter(text).count();
        if count == 0 {
            out.push_str(line);
            continue;
        }

        removed += count;
        let stripped = INLINE_TAG.replace_all(text, "");
        // a tag that opened the line must not leave the rest indented
        let stripped = if text.starts_with(char::is_whitespace) {
            stripped.as_ref()
        } else {
            stripped.trim_start()
        };
        let stripped = stripped.trim_end();
        if is_bare_list_marker(stripped) {
            continue;
        }
        out.push_str(stripped);
        out.push_str(newline);
    }

    (out, removed)
}
