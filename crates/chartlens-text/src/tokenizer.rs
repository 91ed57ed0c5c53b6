//! Tokenizer shared by insertion and querying.
//!
//! Pipeline: lowercase → every char outside `[a-z0-9_]` and whitespace
//! becomes a space → split on whitespace → drop tokens of 2 chars or fewer.
//!
//! Non-ASCII letters count as punctuation, so `"café"` yields `"caf"`.

/// Tokens shorter than this are discarded.
const MIN_TOKEN_LEN: usize = 3;

#[inline]
fn is_word_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// Tokenize text into index terms, preserving order and duplicates.
///
/// ```
/// use chartlens_text::tokenize;
///
/// assert_eq!(tokenize("Revenue grew, YoY!"), vec!["revenue", "grew", "yoy"]);
/// ```
pub fn tokenize(text: &str) -> Vec<String> {
    let normalized: String = text
        .to_lowercase()
        .chars()
        .map(|c| if is_word_char(c) || c.is_whitespace() { c } else { ' ' })
        .collect();
    normalized
        .split_whitespace()
        .filter(|t| t.len() >= MIN_TOKEN_LEN)
        .map(str::to_string)
        .collect()
}
