//! Text normalization helpers.

/// Whether the text contains any CJK ideographs or CJK punctuation. Used
/// for rule-based language detection when the intent collaborator is
/// unavailable.
pub fn contains_cjk(text: &str) -> bool {
    text.chars().any(|c| {
        matches!(c,
            '\u{4E00}'..='\u{9FFF}'   // CJK unified ideographs
            | '\u{3400}'..='\u{4DBF}' // extension A
            | '\u{F900}'..='\u{FAFF}' // compatibility ideographs
            | '\u{3040}'..='\u{30FF}' // kana
        )
    })
}

/// Detect a book's language from its own metadata: the declared language
/// code when present, otherwise CJK presence in the title.
pub fn detect_language(declared: Option<&str>, title: &str) -> &'static str {
    if let Some(code) = declared {
        let code = code.to_ascii_lowercase();
        if code.starts_with("zh") || code == "chi" || code == "cmn" {
            return "zh";
        }
        if code.starts_with("en") || code == "eng" {
            return "en";
        }
    }
    if contains_cjk(title) {
        "zh"
    } else {
        "en"
    }
}

/// Normalize a title for dedup keying: drop parenthetical/bracketed
/// annotations (ASCII and full-width), truncate at the first colon
/// (subtitle), collapse whitespace, lowercase.
pub fn normalize_title(title: &str) -> String {
    let mut out = String::with_capacity(title.len());
    let mut depth = 0usize;
    for c in title.chars() {
        match c {
            '(' | '[' | '（' | '【' | '〔' => depth += 1,
            ')' | ']' | '）' | '】' | '〕' => depth = depth.saturating_sub(1),
            ':' | '：' if depth == 0 => break,
            _ if depth == 0 => out.push(c),
            _ => {}
        }
    }
    out.to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Share of a string's characters that are alphanumeric (any script).
/// Titles dominated by punctuation or replacement characters are encoding
/// garbage and get filtered before scoring.
pub fn alphanumeric_ratio(text: &str) -> f32 {
    let total = text.chars().filter(|c| !c.is_whitespace()).count();
    if total == 0 {
        return 0.0;
    }
    let alnum = text.chars().filter(|c| c.is_alphanumeric()).count();
    alnum as f32 / total as f32
}
