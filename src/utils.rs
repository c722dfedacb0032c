use std::borrow::Cow;

pub(crate) const TRUNCATION_NOTE: &str = "… (output truncated)";

/// Shorten `text` to at most `max_chars` characters, cutting at a line break where possible.
///
/// When anything is cut, [`TRUNCATION_NOTE`] is appended on its own line and counted
/// towards the limit.
pub(crate) fn clamp_lines(text: &str, max_chars: usize) -> Cow<'_, str> {
    if text.chars().count() <= max_chars {
        return Cow::Borrowed(text);
    }
    let budget = max_chars.saturating_sub(TRUNCATION_NOTE.chars().count() + 1);
    let cut = text.char_indices().nth(budget).map_or(text.len(), |(i, _)| i);
    let kept = &text[..cut];
    let kept = kept.rfind('\n').map_or(kept, |nl| &kept[..=nl]);
    let mut clamped = String::with_capacity(kept.len() + TRUNCATION_NOTE.len() + 1);
    clamped.push_str(kept);
    if !clamped.is_empty() && !clamped.ends_with('\n') {
        clamped.push('\n');
    }
    clamped.push_str(TRUNCATION_NOTE);
    Cow::Owned(clamped)
}
