use std::sync::LazyLock;

static WHITESPACE: LazyLock<regex::Regex> =
    LazyLock::new(|| regex::Regex::new(r"\s+").expect("valid whitespace pattern"));

/// Collapse runs of whitespace and trim, so SSML is not padded with newlines
pub fn normalize_sentence(sentence: &str) -> String {
    WHITESPACE.replace_all(sentence, " ").trim().to_string()
}

/// Escape text for embedding in an SSML document
pub fn escape_xml(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Format a percentage offset with an explicit sign, e.g. `+10%` or `-5.5%`
pub fn signed_percent(value: f32) -> String {
    if value >= 0.0 {
        format!("+{}%", value.abs())
    } else {
        format!("{}%", value)
    }
}
