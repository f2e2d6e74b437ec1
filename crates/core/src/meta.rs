use crate::document::MetaEntry;

/// Look up a `wp:postmeta` value with priority fallback.
///
/// Candidate keys are tried in the order given; for each key the entries are
/// scanned in document order. Keys compare case-insensitively after trimming.
/// The first value that is neither blank nor the literal `null` (any case)
/// wins and is returned trimmed.
///
/// # Example
///
/// ```rust
/// use wxr_core::document::MetaEntry;
/// use wxr_core::meta::meta_value;
///
/// let meta = vec![MetaEntry::new("autor", "null"), MetaEntry::new("Author_Name", " Ana ")];
/// assert_eq!(meta_value(&meta, &["redator", "autor", "author_name"]), Some("Ana"));
/// assert_eq!(meta_value(&meta, &["subtitulo"]), None);
/// ```
pub fn meta_value<'a, K: AsRef<str>>(meta: &'a [MetaEntry], keys: &[K]) -> Option<&'a str> {
    keys.iter().find_map(|key| {
        let key = key.as_ref().trim();
        meta.iter()
            .filter(|entry| entry.key.trim().eq_ignore_ascii_case(key))
            .find_map(|entry| clean_meta_value(&entry.value))
    })
}

/// Trim a meta value, treating blank and `null` as absent
pub fn clean_meta_value(value: &str) -> Option<&str> {
    let trimmed = value.trim();
    if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("null") { None } else { Some(trimmed) }
}
