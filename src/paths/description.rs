//! Shortcut description cleanup
//!
//! The shell reports a path in a shortcut's description field when none was
//! set explicitly. When authoring marker files such descriptions are dropped.
//! The check is a heuristic: prose containing two slashes is dropped too.

/// Extensions that mark a description as a file reference
const EXECUTABLE_EXTENSIONS: [&str; 9] = [
    ".exe", ".lnk", ".bat", ".cmd", ".com", ".ps1", ".msc", ".url", ".dll",
];

/// Return the description unchanged, or an empty string if it looks like a path
pub fn clean_description(description: &str) -> String {
    let trimmed = description.trim();
    if looks_like_path(trimmed) {
        String::new()
    } else {
        trimmed.to_string()
    }
}

fn looks_like_path(text: &str) -> bool {
    if text.is_empty() {
        return false;
    }

    let bytes = text.as_bytes();
    let drive_prefix = bytes.len() >= 3
        && bytes[0].is_ascii_alphabetic()
        && bytes[1] == b':'
        && matches!(bytes[2], b'\\' | b'/');
    if drive_prefix || text.starts_with("\\\\") {
        return true;
    }

    if text.chars().filter(|c| matches!(c, '\\' | '/')).count() >= 2 {
        return true;
    }

    let lower = text.to_lowercase();
    EXECUTABLE_EXTENSIONS.iter().any(|ext| lower.ends_with(ext))
}
