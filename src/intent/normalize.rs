use lazy_static::lazy_static;
use regex::Regex;

/// Shorthand → full word. Applied in this order, one pass over the table.
const ABBREVIATIONS: &[(&str, &str)] = &[
    ("bg", "background"),
    ("btn", "button"),
    ("clr", "color"),
    ("colour", "color"),
    ("sz", "size"),
    ("txt", "text"),
    ("img", "image"),
    ("pic", "image"),
    ("hdr", "header"),
    ("fnt", "font"),
    ("pad", "padding"),
    ("marg", "margin"),
    ("lnk", "link"),
    ("nav", "navigation"),
    ("desc", "description"),
    ("align", "alignment"),
    ("centre", "center"),
];

lazy_static! {
    static ref ABBREVIATION_PATTERNS: Vec<(Regex, &'static str)> = ABBREVIATIONS
        .iter()
        .map(|(short, full)| {
            let pattern = format!(r"\b{}\b", regex::escape(short));
            (Regex::new(&pattern).expect("abbreviation pattern"), *full)
        })
        .collect();
    static ref PUNCTUATION: Regex = Regex::new(r"[^\w\s]").expect("punctuation pattern");
}

/// Lowercase, trim and expand shorthand words.
pub fn normalize(text: &str) -> String {
    let mut normalized = text.trim().to_lowercase();
    for (pattern, full) in ABBREVIATION_PATTERNS.iter() {
        if pattern.is_match(&normalized) {
            normalized = pattern.replace_all(&normalized, *full).into_owned();
        }
    }
    normalized
}

/// Split normalized text into word tokens, dropping punctuation.
pub fn tokenize(normalized: &str) -> Vec<String> {
    PUNCTUATION
        .replace_all(normalized, " ")
        .split_whitespace()
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expands_whole_words_only() {
        assert_eq!(normalize("  Change BG clr "), "change background color");
        assert_eq!(normalize("align the btn"), "alignment the button");
        // "padding" must not become "paddingding"
        assert_eq!(normalize("padding"), "padding");
    }

    #[test]
    fn test_normalize_is_idempotent() {
        for text in [
            "set the bg colour to #FF0000",
            "where is the txt sz on mobile?",
            "centre the hdr img",
            "make nav lnk desc bigger",
        ] {
            let once = normalize(text);
            assert_eq!(normalize(&once), once, "not idempotent for {:?}", text);
        }
    }

    #[test]
    fn test_tokenize_strips_punctuation() {
        assert_eq!(
            tokenize("where's the font-size, please?"),
            vec!["where", "s", "the", "font", "size", "please"]
        );
        assert!(tokenize("  ?! ").is_empty());
    }
}
