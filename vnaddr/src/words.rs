//! Word spans and backward window scans shared by the resolvers.

/// Byte ranges of whitespace-separated words in `s`.
pub fn word_spans(s: &str) -> Vec<(usize, usize)> {
    let mut spans = Vec::new();
    let mut start = None;
    for (i, c) in s.char_indices() {
        match (c.is_whitespace(), start) {
            (true, Some(st)) => {
                spans.push((st, i));
                start = None;
            }
            (false, None) => start = Some(i),
            _ => {}
        }
    }
    if let Some(st) = start {
        spans.push((st, s.len()));
    }
    spans
}

/// Walk word windows from the last word toward the first. At each end
/// position every width in `widths` is tried in order. Returns the first probe
/// hit and the byte range of the window that produced it.
pub fn scan_windows<T, F>(s: &str, widths: &[usize], mut probe: F) -> Option<(T, usize, usize)>
where
    F: FnMut(&str) -> Option<T>,
{
    let spans = word_spans(s);
    for last in (0..spans.len()).rev() {
        let end = spans[last].1;
        for &width in widths {
            if width == 0 || width > last + 1 {
                continue;
            }
            let start = spans[last + 1 - width].0;
            if let Some(v) = probe(&s[start..end]) {
                return Some((v, start, end));
            }
        }
    }
    None
}

/// A bare token of one or two digits.
pub fn is_short_number(word: &str) -> bool {
    (1..=2).contains(&word.len()) && word.bytes().all(|b| b.is_ascii_digit())
}

/// Digits joined by `/` or `-`: `1/2`, `45-3B`.
pub fn is_house_number(word: &str) -> bool {
    word.bytes().any(|b| b.is_ascii_digit()) && word.contains(['/', '-'])
}

/// All letters or all ASCII digits, ignoring trailing punctuation.
pub fn is_plain_word(word: &str) -> bool {
    let w = word.trim_end_matches(|c: char| c.is_ascii_punctuation());
    !w.is_empty() && (w.chars().all(char::is_alphabetic) || w.bytes().all(|b| b.is_ascii_digit()))
}

/// True if the first non-space character is an ASCII digit.
pub fn starts_with_digit(s: &str) -> bool {
    s.trim_start().starts_with(|c: char| c.is_ascii_digit())
}
