//! Sentence segmentation for abstracts.

/// Abbreviations common in biomedical prose that end in a period without
/// ending the sentence. Compared lowercase, without the trailing period.
const ABBREVIATIONS: &[&str] = &[
    "e.g", "i.e", "et al", "fig", "figs", "vs", "approx", "ref", "refs", "no", "cf", "resp",
];

/// Split text at `.`, `!` or `?` followed by whitespace or end of input.
///
/// A period after a known abbreviation or between two digits (`2.5`) is
/// not a boundary. Fragments of two characters or fewer are dropped.
pub fn split_sentences(text: &str) -> Vec<String> {
    let chars: Vec<char> = text.chars().collect();
    let mut sentences = Vec::new();
    let mut current = String::new();

    for (i, &c) in chars.iter().enumerate() {
        current.push(c);
        if !matches!(c, '.' | '!' | '?') {
            continue;
        }

        let next = chars.get(i + 1).copied();
        let at_boundary = next.map_or(true, char::is_whitespace);
        if !at_boundary {
            continue;
        }
        if c == '.' && ends_with_abbreviation(&current) {
            continue;
        }

        push_sentence(&mut sentences, &current);
        current.clear();
    }
    push_sentence(&mut sentences, &current);

    sentences
}

fn ends_with_abbreviation(fragment: &str) -> bool {
    let body = fragment.trim_end_matches('.').to_lowercase();
    ABBREVIATIONS.iter().any(|abbr| {
        body.ends_with(abbr)
            && body[..body.len() - abbr.len()]
                .chars()
                .last()
                .map_or(true, |prev| !prev.is_alphanumeric())
    })
}

fn push_sentence(sentences: &mut Vec<String>, fragment: &str) {
    let trimmed = fragment.trim();
    if trimmed.chars().count() > 2 {
        sentences.push(trimmed.to_string());
    }
}
