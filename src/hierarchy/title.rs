//! Friendly titles for folder and file names.

const FILE_EXTENSIONS: [&str; 9] = ["md", "pdf", "mp4", "mov", "avi", "mkv", "webm", "txt", "html"];

const STRUCTURAL_WORDS: [&str; 8] = [
    "lesson", "module", "course", "class", "program", "week", "unit", "part",
];

const CONNECTIVES: [&str; 12] = [
    "a", "an", "and", "as", "at", "for", "in", "of", "on", "or", "the", "to",
];

const ACRONYMS: [&str; 32] = [
    "mba", "emba", "ai", "hr", "ceo", "cfo", "cto", "roi", "npv", "irr", "esg", "kpi", "api",
    "ui", "ux", "ml", "pdf", "usa", "uk", "dcf", "wacc", "capm", "ebitda", "gdp", "vc", "ipo",
    "b2b", "b2c", "saas", "sql", "crm", "erp",
];

const ROMAN_NUMERALS: [&str; 10] = ["i", "ii", "iii", "iv", "v", "vi", "vii", "viii", "ix", "x"];

fn strip_extension(name: &str) -> &str {
    match name.rsplit_once('.') {
        Some((stem, ext))
            if !stem.is_empty() && FILE_EXTENSIONS.contains(&ext.to_lowercase().as_str()) =>
        {
            stem
        }
        _ => name,
    }
}

/// `01`, `3a`, `12b`: ordering prefixes, not words.
fn is_ordinal(token: &str) -> bool {
    let digits = token.trim_end_matches(|c: char| c.is_ascii_alphabetic());
    !digits.is_empty()
        && digits.chars().all(|c| c.is_ascii_digit())
        && token.len() - digits.len() <= 1
}

fn is_one_of(token: &str, words: &[&str]) -> bool {
    words.contains(&token.to_lowercase().as_str())
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn case_word(word: &str, first: bool) -> String {
    let lower = word.to_lowercase();
    if is_one_of(word, &ACRONYMS) || is_one_of(word, &ROMAN_NUMERALS) {
        return word.to_uppercase();
    }
    if !first && is_one_of(word, &CONNECTIVES) {
        return lower;
    }
    capitalize(word)
}

fn title_case(tokens: &[&str]) -> String {
    tokens
        .iter()
        .enumerate()
        .map(|(i, t)| case_word(t, i == 0))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Turn a file or folder name into a display title.
///
/// `01 - lesson-3_npv-and-irr.md` becomes `NPV and IRR`. When stripping
/// leaves nothing, the words of the name are title-cased as they are.
pub fn friendly_title(name: &str) -> String {
    let stem = strip_extension(name.trim());
    let tokens: Vec<&str> = stem
        .split(|c: char| c == '_' || c == '-' || c == '.' || c.is_whitespace())
        .filter(|t| !t.is_empty())
        .collect();

    let mut kept: Vec<&str> = Vec::with_capacity(tokens.len());
    let mut iter = tokens.iter().copied().skip_while(|t| is_ordinal(t)).peekable();
    while let Some(token) = iter.next() {
        if is_one_of(token, &STRUCTURAL_WORDS) {
            if iter.peek().map(|next| is_ordinal(next)).unwrap_or(false) {
                iter.next();
            }
            continue;
        }
        kept.push(token);
    }

    let start = kept
        .iter()
        .position(|t| !is_one_of(t, &CONNECTIVES))
        .unwrap_or(kept.len());
    let end = kept
        .iter()
        .rposition(|t| !is_one_of(t, &CONNECTIVES))
        .map(|i| i + 1)
        .unwrap_or(start);
    let kept = &kept[start..end.max(start)];

    if kept.is_empty() {
        if tokens.is_empty() {
            return stem.to_string();
        }
        return title_case(&tokens);
    }
    title_case(kept)
}
