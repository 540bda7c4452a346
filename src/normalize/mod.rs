//! Review text normalization.
//!
//! [`normalize`] is the single entry point every text takes before embedding,
//! for training and scoring alike. It is pure, deterministic and idempotent.


use unicode_normalization::UnicodeNormalization;

/// Normalizes raw review text for embedding.
///
/// Applies, in order: NFKC unicode normalization, markup-tag stripping
/// (structural text only, attributes discarded), emoji-block removal and
/// whitespace collapsing. NFKC runs first so compatibility characters that
/// normalize into angle brackets are stripped in the same pass, which keeps
/// the function idempotent.
///
/// Malformed markup is handled best-effort; the function never fails.
pub fn normalize(raw: &str) -> String {
    let text: String = raw.nfkc().collect();
    let text = strip_markup(&text);
    let text: String = text.chars().filter(|c| !in_emoji_block(*c)).collect();
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Removes `<...>` tag spans, replacing each with a single space.
///
/// A `<` only opens a tag when followed by a tag-like character; bare
/// comparisons such as `"5 < 6"` are kept verbatim. An unterminated tag
/// swallows the remainder of the input (best-effort extraction).
fn strip_markup(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '<' {
            out.push(c);
            continue;
        }

        let opens_tag = matches!(
            chars.peek(),
            Some(&next) if next.is_ascii_alphabetic() || next == '/' || next == '!' || next == '?'
        );

        if opens_tag {
            for t in chars.by_ref() {
                if t == '>' {
                    break;
                }
            }
            out.push(' ');
        } else {
            out.push(c);
        }
    }

    out
}

/// Emoji code-point blocks removed from review text: symbols & pictographs,
/// emoticons, transport & map symbols, and flags.
fn in_emoji_block(c: char) -> bool {
    matches!(
        c,
        '\u{1F300}'..='\u{1F5FF}'
            | '\u{1F600}'..='\u{1F64F}'
            | '\u{1F680}'..='\u{1F6FF}'
            | '\u{1F1E0}'..='\u{1F1FF}'
    )
}
