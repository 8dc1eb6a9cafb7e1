/// ATX heading block type (`#` to `######`).
pub struct Heading;

impl Heading {
    pub const MARKER: u8 = b'#';
    pub const MAX_LEVEL: usize = 6;
    /// Headings indented by more than this are not headings.
    const MAX_INDENT: usize = 3;

    /// Returns `(level, content_offset)` when `remainder` opens a heading.
    ///
    /// `content_offset` is the byte index in `remainder` where the heading
    /// text begins, after the markers and the separating whitespace.
    pub fn open(remainder: &str) -> Option<(u8, usize)> {
        let body = remainder.trim_end_matches(['\r', '\n']);
        let indent = body.len() - body.trim_start_matches(' ').len();
        if indent > Self::MAX_INDENT {
            return None;
        }

        let rest = &body[indent..];
        let level = rest.bytes().take_while(|&b| b == Self::MARKER).count();
        if level == 0 || level > Self::MAX_LEVEL {
            return None;
        }

        let after = &rest[level..];
        if after.is_empty() {
            return Some((level as u8, indent + level));
        }
        if !after.starts_with([' ', '\t']) {
            return None;
        }
        let ws = after.len() - after.trim_start_matches([' ', '\t']).len();
        Some((level as u8, indent + level + ws))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn open_levels() {
        assert_eq!(Heading::open("# Title"), Some((1, 2)));
        assert_eq!(Heading::open("### Deep"), Some((3, 4)));
        assert_eq!(Heading::open("###### Six"), Some((6, 7)));
    }

    #[test]
    fn rejects_non_headings() {
        assert_eq!(Heading::open("####### seven"), None);
        assert_eq!(Heading::open("#hashtag"), None);
        assert_eq!(Heading::open("    # code"), None);
        assert_eq!(Heading::open("plain"), None);
    }

    #[test]
    fn empty_heading_and_indent() {
        assert_eq!(Heading::open("##"), Some((2, 2)));
        assert_eq!(Heading::open("  #  Spaced\n"), Some((1, 5)));
    }
}
