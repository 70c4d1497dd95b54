//! File names for converted outputs and the archives that carry them.

/// Swap the last extension of `name` for `extension`, which may be given with
/// or without its leading dot. A name without an extension just gains one.
///
/// Only a non-empty suffix after the final `.` counts, and never one that
/// crosses a `/`, so `photos.2024/cat` becomes `photos.2024/cat.png`.
pub fn replace_extension(name: &str, extension: &str) -> String {
    let stem = match name.rfind('.') {
        Some(dot) if dot + 1 < name.len() && !name[dot + 1..].contains('/') => &name[..dot],
        _ => name,
    };
    let extension = extension.strip_prefix('.').unwrap_or(extension);
    format!("{}.{}", stem, extension)
}

/// Name for a downloaded batch: `{label}-{millis}.zip`
pub fn archive_file_name(label: &str, millis: i64) -> String {
    format!("{}-{}.zip", label, millis)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn swaps_last_extension() {
        assert_eq!(replace_extension("cat.webp", ".png"), "cat.png");
        assert_eq!(replace_extension("cat.tar.webp", "jpg"), "cat.tar.jpg");
    }

    #[test]
    fn adds_missing_extension() {
        assert_eq!(replace_extension("cat", ".png"), "cat.png");
        assert_eq!(replace_extension("cat.", ".png"), "cat..png");
        assert_eq!(replace_extension("photos.2024/cat", ".png"), "photos.2024/cat.png");
    }

    #[test]
    fn dotfile_is_all_extension() {
        assert_eq!(replace_extension(".hidden", ".webp"), ".webp");
    }

    #[test]
    fn archive_name() {
        assert_eq!(
            archive_file_name("webp-png", 1700000000000),
            "webp-png-1700000000000.zip"
        );
    }
}
