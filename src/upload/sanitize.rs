//! Client filename reduction.
//!
//! # Responsibilities
//! - Reduce a claimed filename to its final path component
//! - Derive the lower-cased extension used for allow-listing
//!
//! # Design Decisions
//! - Both `/` and `\` are separators, whatever the host OS
//! - Names that reduce to nothing usable (`""`, `.`, `..`) are refused

const SEPARATORS: [char; 2] = ['/', '\\'];

/// Final path component of `claimed`, or `None` when nothing usable remains.
pub fn safe_name(claimed: &str) -> Option<&str> {
    let trimmed = claimed.trim_end_matches(SEPARATORS);
    let name = trimmed.rsplit(SEPARATORS).next().unwrap_or_default();
    match name {
        "" | "." | ".." => None,
        _ => Some(name),
    }
}

/// Text after the last `.`, ASCII lower-cased. `None` when there is no dot or
/// nothing follows it.
pub fn extension(name: &str) -> Option<String> {
    name.rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .filter(|ext| !ext.is_empty())
}
