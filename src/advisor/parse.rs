use serde::Deserialize;

use super::Substitute;

#[derive(Deserialize)]
struct Wrapped {
    substitutes: Vec<Substitute>,
}

/// Pulls a substitute list out of free-form model output.
///
/// Accepts a bare JSON array, an object carrying a `substitutes` array, or
/// either of those embedded in surrounding prose or a code fence.
pub(super) fn extract_substitutes(content: &str) -> Option<Vec<Substitute>> {
    let trimmed = content.trim();

    if let Ok(list) = serde_json::from_str::<Vec<Substitute>>(trimmed) {
        return Some(list);
    }
    if let Ok(w) = serde_json::from_str::<Wrapped>(trimmed) {
        return Some(w.substitutes);
    }

    if let Some(obj) = slice_between(trimmed, '{', '}') {
        if let Ok(w) = serde_json::from_str::<Wrapped>(obj) {
            return Some(w.substitutes);
        }
    }
    let arr = slice_between(trimmed, '[', ']')?;
    serde_json::from_str::<Vec<Substitute>>(arr).ok()
}

fn slice_between(s: &str, open: char, close: char) -> Option<&str> {
    let start = s.find(open)?;
    let end = s.rfind(close)?;
    (end > start).then(|| &s[start..=end])
}
