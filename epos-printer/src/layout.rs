//! Text layout engine
//!
//! Pure functions for laying text out on a fixed-width character grid:
//! greedy word wrapping, right-alignment padding, and the capitalize
//! transform. No I/O, no state.
//!
//! All budgets and lengths are measured in characters, not bytes.

use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

/// Wrap text to fit a character grid.
///
/// The first produced line shares its row with `column_offset` characters of
/// already-printed content, so its budget is
/// `characters_per_line - right_padding - column_offset`; every later line
/// gets `characters_per_line - right_padding`.
///
/// Words are split on single spaces and packed greedily, one space between
/// words on the same line. A word longer than the line budget is placed
/// whole on its own line, never split or truncated. Lines that end up empty
/// are dropped; survivors are joined with `\n`.
pub fn wrap_text(
    text: &str,
    characters_per_line: usize,
    right_padding: usize,
    column_offset: usize,
) -> String {
    if text.is_empty() {
        return String::new();
    }

    let max_len = characters_per_line.saturating_sub(right_padding);
    let mut done: Vec<String> = Vec::new();
    let mut current = String::new();
    let mut current_len = 0usize;

    for (index, word) in text.split(' ').enumerate() {
        let word_len = word.chars().count();
        // Only the line sharing the row with existing content is narrowed.
        let budget = if done.is_empty() {
            max_len.saturating_sub(column_offset)
        } else {
            max_len
        };
        let sep_len = usize::from(index > 0);

        if current_len + sep_len + word_len > budget {
            done.push(std::mem::take(&mut current));
            current.push_str(word);
            current_len = word_len;
        } else {
            if index > 0 {
                current.push(' ');
            }
            current.push_str(word);
            current_len += sep_len + word_len;
        }
    }
    done.push(current);

    let kept: Vec<String> = done.into_iter().filter(|line| !line.is_empty()).collect();
    kept.join("\n")
}

/// Compute the padding that pushes `content_len` characters flush right.
///
/// With `remaining = characters_per_line - column_offset - content_len`:
/// exactly zero means the content already fills the line (no padding);
/// positive means that many spaces; negative means the content cannot fit
/// on the current row, so the padding is a newline followed by enough
/// spaces to right-align the content on a fresh line.
pub fn right_align_padding(
    column_offset: usize,
    content_len: usize,
    characters_per_line: usize,
) -> String {
    let used = column_offset + content_len;
    if used == characters_per_line {
        return String::new();
    }
    if used < characters_per_line {
        return " ".repeat(characters_per_line - used);
    }
    let mut padding = String::from("\n");
    padding.push_str(&" ".repeat(characters_per_line.saturating_sub(content_len)));
    padding
}

/// Uppercase text and strip diacritics.
///
/// Decomposes to NFD, drops combining marks, then uppercases. Non-letter
/// characters pass through unchanged.
pub fn capitalize_and_strip_accents(text: &str) -> String {
    text.nfd()
        .filter(|c| !is_combining_mark(*c))
        .flat_map(char::to_uppercase)
        .collect()
}
