//! Locale-aware number rendering with at most two fraction digits.

const MAX_FRACTION_DIGITS: usize = 2;

/// Group and decimal separators for a BCP 47 locale tag. Unknown
/// languages use English conventions.
fn separators(locale: &str) -> (&'static str, &'static str) {
    let language = locale.split(|c: char| c == '-' || c == '_').next().unwrap_or("").to_ascii_lowercase();
    match language.as_str() {
        "de" | "es" | "it" | "nl" | "pt" | "id" | "tr" => (".", ","),
        "fr" => ("\u{202f}", ","),
        _ => (",", "."),
    }
}

fn group_digits(digits: &str, separator: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 * separator.len());
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push_str(separator);
        }
        out.push(c);
    }
    out
}

pub fn format_number(n: f64, locale: &str) -> String {
    if !n.is_finite() {
        return n.to_string();
    }
    let (group, decimal) = separators(locale);
    let fixed = format!("{:.*}", MAX_FRACTION_DIGITS, n.abs());
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), ""));
    let frac_part = frac_part.trim_end_matches('0');

    let mut out = String::new();
    let is_zero = int_part.chars().all(|c| c == '0') && frac_part.is_empty();
    if n < 0.0 && !is_zero {
        out.push('-');
    }
    out.push_str(&group_digits(int_part, group));
    if !frac_part.is_empty() {
        out.push_str(decimal);
        out.push_str(frac_part);
    }
    out
}

pub fn format_percent(n: f64, locale: &str) -> String {
    format!("{}%", format_number(n, locale))
}
