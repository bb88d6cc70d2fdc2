//! Case-aware stem splitting and keyword expansion for display titles.

/// Character classes driving stem boundaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CharClass {
    Upper,
    /// Lowercase letters, plus letters without case (e.g. CJK)
    Lower,
    Digit,
    Other,
}

fn classify(c: char) -> CharClass {
    if c.is_numeric() {
        CharClass::Digit
    } else if c.is_uppercase() {
        CharClass::Upper
    } else if c.is_alphabetic() {
        CharClass::Lower
    } else {
        CharClass::Other
    }
}

/// Splits an identifier-like token into case- and digit-delimited stems.
///
/// This is a small state machine over character classes:
/// - **camelCase / PascalCase**: "getValue" → ["get", "Value"]
/// - **Acronyms**: an uppercase run ends before the uppercase letter that starts
///   a lowercase word, so "HTTPResponse" → ["HTTP", "Response"]
/// - **Digits**: digit runs are their own stems, "Vec2" → ["Vec", "2"]
/// - Any other character ends the current stem and is dropped.
///
/// HTML entities are decoded first. An empty token yields a single empty stem.
pub fn stems(token: &str) -> Vec<String> {
    if token.is_empty() {
        return vec![String::new()];
    }

    let decoded = html_escape::decode_html_entities(token);
    let text: &str = &decoded;

    let mut stems = Vec::new();
    let mut stem_start: Option<usize> = None;
    let mut prev = CharClass::Other;
    let mut chars = text.char_indices().peekable();

    while let Some((i, c)) = chars.next() {
        let class = classify(c);
        let boundary = match (prev, class) {
            (CharClass::Upper | CharClass::Lower, CharClass::Lower)
            | (CharClass::Digit, CharClass::Digit) => false,
            // Inside an acronym: split only where the next letter starts a word
            (CharClass::Upper, CharClass::Upper) => chars
                .peek()
                .is_some_and(|&(_, next)| classify(next) == CharClass::Lower),
            _ => true,
        };

        if boundary && let Some(start) = stem_start.take() {
            stems.push(text[start..i].to_string());
        }
        if class != CharClass::Other && stem_start.is_none() {
            stem_start = Some(i);
        }
        prev = class;
    }

    if let Some(start) = stem_start {
        stems.push(text[start..].to_string());
    }

    stems
}

/// Produces every concatenation of a contiguous run of stems.
///
/// For `n` stems this yields `n * (n + 1) / 2` keywords, ordered by start
/// position then length: ["A", "B", "C"] → A, AB, ABC, B, BC, C. Duplicates are
/// kept.
pub fn aggregations(stems: &[String]) -> Vec<String> {
    let mut results = Vec::with_capacity(stems.len() * (stems.len() + 1) / 2);
    for start in 0..stems.len() {
        let mut current = String::new();
        for stem in &stems[start..] {
            current.push_str(stem);
            results.push(current.clone());
        }
    }
    results
}

/// Builds the keyword expansion for a display title.
///
/// A trailing ` | Site` suffix is dropped, then each space-separated word is
/// reduced to its simple name (the part after the last `.`) and expanded into
/// its stem aggregations. All keywords are joined with single spaces.
pub fn keywords_for_title(title: &str) -> String {
    let body = match title.rfind('|') {
        Some(bar) => title[..bar].trim_end(),
        None => title,
    };

    body.split(' ')
        .map(|word| {
            let simple_name = word.rsplit('.').next().unwrap_or(word);
            aggregations(&stems(simple_name)).join(" ")
        })
        .collect::<Vec<_>>()
        .join(" ")
}
