//! Slugification shared by posts, categories, tags and the editor

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref NON_WORD: Regex = Regex::new(r"[^\w\s-]").unwrap();
    static ref SEPARATORS: Regex = Regex::new(r"[\s_-]+").unwrap();
    static ref EDGE_HYPHENS: Regex = Regex::new(r"^-+|-+$").unwrap();
}

/// Turn a human-readable label into a URL path segment.
///
/// Lowercases, drops everything that is not a word character, whitespace or
/// hyphen, collapses whitespace/underscore/hyphen runs into a single hyphen and
/// trims hyphens from both ends. Word characters are Unicode-aware, so CJK
/// labels are kept as-is. Distinct labels may map to the same slug.
pub fn slugify(text: &str) -> String {
    let lower = text.to_lowercase();
    let stripped = NON_WORD.replace_all(&lower, "");
    let joined = SEPARATORS.replace_all(&stripped, "-");
    EDGE_HYPHENS.replace_all(&joined, "").into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slugify_punctuation_and_underscore() {
        assert_eq!(slugify("Hello, World!  Test_2"), "hello-world-test-2");
    }

    #[test]
    fn test_slugify_trims_hyphens() {
        assert_eq!(slugify("---a---"), "a");
        assert_eq!(slugify("  Rust  "), "rust");
    }

    #[test]
    fn test_slugify_keeps_cjk() {
        assert_eq!(slugify("技术"), "技术");
        assert_eq!(slugify("Rust 学习笔记"), "rust-学习笔记");
    }

    #[test]
    fn test_slugify_collisions_are_possible() {
        assert_eq!(slugify("C++"), slugify("c"));
        assert_eq!(slugify("!!!"), "");
    }
}
