//! Pattern matching utilities

/// Find a pattern in binary data
pub fn find_pattern(data: &[u8], pattern: &[u8]) -> bool {
    if pattern.is_empty() {
        return true;
    }
    data.windows(pattern.len()).any(|window| window == pattern)
}

/// Presence of each marker in `data`, in marker order
pub fn marker_hits<'m>(data: &[u8], markers: &[&'m [u8]]) -> Vec<(&'m [u8], bool)> {
    markers.iter().map(|&m| (m, find_pattern(data, m))).collect()
}
