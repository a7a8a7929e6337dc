// src/core/sanitize.rs

/// Normalize whitespace, then upper-case the first letter of each word and
/// lower-case the rest ("JOHN  doe" → "John Doe").
pub fn capitalize_words(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for (i, word) in s.split_whitespace().enumerate() {
        if i > 0 { out.push(' '); }
        let mut chars = word.chars();
        if let Some(first) = chars.next() {
            // title-case: one capital even when the mapping is longer ("ß" → "Ss")
            let mut upper = first.to_uppercase();
            out.extend(upper.next());
            out.extend(upper.flat_map(char::to_lowercase));
            for ch in chars {
                out.extend(ch.to_lowercase());
            }
        }
    }
    out
}

/// Make a string usable as part of a filename:
/// `/` and `:` become `-`, `< > " \ | ? *` are dropped, ends trimmed.
pub fn safe_filename(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '/' | ':' => out.push('-'),
            '<' | '>' | '"' | '\\' | '|' | '?' | '*' => {}
            _ => out.push(ch),
        }
    }
    out.trim().to_string()
}

/// First run of ASCII digits, or empty.
pub fn first_digits(s: &str) -> String {
    s.chars()
        .skip_while(|c| !c.is_ascii_digit())
        .take_while(|c| c.is_ascii_digit())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capitalize_variants() {
        assert_eq!(capitalize_words("john doe"), "John Doe");
        assert_eq!(capitalize_words("  JOHN   DOE "), "John Doe");
        assert_eq!(capitalize_words("o'brien's GIFT"), "O'brien's Gift");
        assert_eq!(capitalize_words(""), "");
    }

    #[test]
    fn capitalize_multi_char_uppercase() {
        let once = capitalize_words("ßtrasse king");
        assert_eq!(once, "Sstrasse King");
        assert_eq!(capitalize_words(&once), once);
    }

    #[test]
    fn safe_filename_strips_reserved() {
        assert_eq!(safe_filename("Mumbai"), "Mumbai");
        assert_eq!(safe_filename(" 05/01:2025 "), "05-01-2025");
        assert_eq!(safe_filename(r#"a<b>c"d\e|f?g*h"#), "abcdefgh");
    }

    #[test]
    fn first_digits_picks_first_run() {
        assert_eq!(first_digits("4 yrs"), "4");
        assert_eq!(first_digits("age: 12 (3)"), "12");
        assert_eq!(first_digits("n/a"), "");
    }
}
