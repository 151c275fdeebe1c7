//! Display-name derivation and width squeezing for status lines.

use url::Url;

/// Derives the name shown for a transfer: for a source with a recognized
/// scheme the path component (scheme and host stripped), otherwise the raw
/// identifier verbatim.
pub fn display_path(source: &str) -> String {
    match Url::parse(source) {
        Ok(u) if !u.path().is_empty() => u.path().to_string(),
        _ => source.to_string(),
    }
}

/// Final path segment of a name; the name itself if it has no `/`.
pub fn basename(name: &str) -> &str {
    let trimmed = name.trim_end_matches('/');
    match trimmed.rsplit('/').next() {
        Some(b) if !b.is_empty() => b,
        _ => name,
    }
}

/// Left-elides `name` with `...` so it fits in `width` characters.
pub fn squeeze(name: &str, width: usize) -> String {
    let len = name.chars().count();
    if len <= width {
        return name.to_string();
    }
    if width <= 3 {
        return name
            .chars()
            .skip(len - width)
            .collect();
    }
    let tail: String = name.chars().skip(len - (width - 3)).collect();
    format!("...{}", tail)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_path_strips_scheme_and_host() {
        assert_eq!(
            display_path("ftp://mirror.example.org/debian/README"),
            "/debian/README"
        );
        assert_eq!(display_path("file:///tmp/a.iso"), "/tmp/a.iso");
    }

    #[test]
    fn display_path_keeps_plain_names() {
        assert_eq!(display_path("archive.tar.gz"), "archive.tar.gz");
        assert_eq!(display_path("dir/file.bin"), "dir/file.bin");
        assert_eq!(display_path("/abs/path"), "/abs/path");
    }

    #[test]
    fn basename_variants() {
        assert_eq!(basename("/debian/README"), "README");
        assert_eq!(basename("plain.txt"), "plain.txt");
        assert_eq!(basename("dir/"), "dir");
    }

    #[test]
    fn squeeze_fits_and_elides() {
        assert_eq!(squeeze("short", 10), "short");
        assert_eq!(squeeze("averylongfilename.iso", 10), "...ame.iso");
        assert_eq!(squeeze("abcdef", 2), "ef");
        assert_eq!(squeeze("abcdef", 0), "");
    }
}
