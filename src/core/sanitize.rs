//! Strip control characters from server text before it reaches the terminal.

use std::borrow::Cow;

/// Characters dropped from displayed text: C0/C1 controls, DEL and the soft
/// hyphen.  Newlines and tabs survive because the review pane lays them out.
fn is_unsafe(c: char) -> bool {
    matches!(c, '\u{00}'..='\u{1F}' | '\u{7F}'..='\u{9F}' | '\u{AD}') && c != '\n' && c != '\t'
}

/// Remove terminal-unsafe characters.  Borrows when nothing needs removing.
pub fn sanitize_for_terminal(text: &str) -> Cow<'_, str> {
    if !text.chars().any(is_unsafe) {
        return Cow::Borrowed(text);
    }
    Cow::Owned(text.chars().filter(|c| !is_unsafe(*c)).collect())
}
