//! Text normalization applied before scoring.
//!
//! Whitespace tokenizers would treat a run of Chinese ideographs as a single
//! word. Surrounding every ideograph with spaces makes each one its own token
//! while Latin-script words keep their existing boundaries.

/// Whether `ch` lies in the CJK Unified Ideographs block U+4E00..=U+9FA5.
pub fn is_chinese_char(ch: char) -> bool {
    ('\u{4e00}'..='\u{9fa5}').contains(&ch)
}

/// Whitespace plus the ASCII information separators U+001C..=U+001F.
fn is_separator(ch: char) -> bool {
    ch.is_whitespace() || ('\u{1c}'..='\u{1f}').contains(&ch)
}

/// Space out every Chinese ideograph, then collapse separator runs and trim.
pub fn rebuild_str(text: &str) -> String {
    let mut spaced = String::with_capacity(text.len() * 2);
    for ch in text.chars() {
        if is_chinese_char(ch) {
            spaced.push(' ');
            spaced.push(ch);
            spaced.push(' ');
        } else {
            spaced.push(ch);
        }
    }

    spaced
        .split(is_separator)
        .filter(|token| !token.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}
