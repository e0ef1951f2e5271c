//! Counted nouns for log lines.

use std::fmt;

/// `count` followed by `noun`, pluralized with a trailing `s`.
///
/// Nouns ending in `s` or phrases (`table of contents`) are left as is.
///
/// ```ignore
/// assert_eq!(Count(1, "link").to_string(), "1 link");
/// assert_eq!(Count(3, "link").to_string(), "3 links");
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Count<'a>(pub usize, pub &'a str);

impl fmt::Display for Count<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Self(count, noun) = *self;
        let invariable = noun.ends_with('s') || noun.contains(' ');
        if count == 1 || invariable {
            write!(f, "{count} {noun}")
        } else {
            write!(f, "{count} {noun}s")
        }
    }
}

#[inline]
pub fn plural_count(count: usize, noun: &str) -> String {
    Count(count, noun).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_count() {
        assert_eq!(plural_count(0, "document"), "0 documents");
        assert_eq!(plural_count(1, "document"), "1 document");
        assert_eq!(Count(2, "table of contents").to_string(), "2 table of contents");
        assert_eq!(Count(5, "alias").to_string(), "5 alias");
    }
}
