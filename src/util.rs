use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

/// Canonical form for keyword keys: trimmed and lowercased.
pub fn normalize_keyword(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// Truncates to at most `max_chars` characters, appending an ellipsis when
/// anything was cut.
pub fn truncate_label(text: &str, max_chars: usize) -> String {
    let mut chars = text.char_indices();
    match chars.nth(max_chars) {
        None => text.to_string(),
        Some((byte_index, _)) => format!("{}...", text[..byte_index].trim_end()),
    }
}

pub fn stable_pair(id: &str) -> (f32, f32) {
    let mut hasher = DefaultHasher::new();
    id.hash(&mut hasher);
    let hash = hasher.finish();

    let x = ((hash & 0xffff_ffff) as f64 / u32::MAX as f64) as f32;
    let y = (((hash >> 32) & 0xffff_ffff) as f64 / u32::MAX as f64) as f32;
    ((x * 2.0) - 1.0, (y * 2.0) - 1.0)
}
