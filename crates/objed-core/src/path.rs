// PathKey helpers: splitting on the delimiter and classifying segments.

/// Separator between segments of a PathKey.
pub const DELIMITER: char = '.';

/// Largest index a List built from form data may hold. Keys beyond it are
/// dropped so a single pair cannot force an arbitrarily large padded List.
pub const MAX_LIST_INDEX: usize = 65_535;

/// Split a PathKey into its segments. Consecutive delimiters yield empty
/// segments, which are kept as literal `""` keys.
pub fn split_key(key: &str) -> Vec<&str> {
    key.split(DELIMITER).collect()
}

/// Join segments back into a PathKey.
pub fn join_key<S: AsRef<str>>(segments: &[S]) -> String {
    let mut out = String::new();
    for (i, seg) in segments.iter().enumerate() {
        if i > 0 {
            out.push(DELIMITER);
        }
        out.push_str(seg.as_ref());
    }
    out
}

/// A numeric segment is one or more ASCII decimal digits and nothing else.
pub fn is_numeric_segment(seg: &str) -> bool {
    !seg.is_empty() && seg.bytes().all(|b| b.is_ascii_digit())
}

/// The List position a segment addresses: a canonical decimal (`"0"` or no
/// leading zero) no greater than [`MAX_LIST_INDEX`]. `"01"` is numeric but
/// names no position.
pub fn list_index(seg: &str) -> Option<usize> {
    if !is_numeric_segment(seg) || (seg.len() > 1 && seg.starts_with('0')) {
        return None;
    }
    seg.parse::<usize>().ok().filter(|&i| i <= MAX_LIST_INDEX)
}
