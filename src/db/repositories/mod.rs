//! Database repositories
//!
//! Repositories handle all direct database interactions.

pub mod comment_repo;
pub mod review_repo;
pub mod taxonomy_repo;
pub mod title_repo;
pub mod user_repo;
pub mod verify_code_repo;

pub use comment_repo::CommentRepository;
pub use review_repo::ReviewRepository;
pub use taxonomy_repo::{TaxonomyRepository, TitleGenre};
pub use title_repo::TitleRepository;
pub use user_repo::UserRepository;
pub use verify_code_repo::VerifyCodeRepository;

/// `ILIKE` pattern matching `needle` anywhere, with wildcards in it taken literally
pub(crate) fn contains_pattern(needle: &str) -> String {
    let mut pattern = String::with_capacity(needle.len() + 2);
    pattern.push('%');
    for c in needle.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contains_pattern_plain() {
        assert_eq!(contains_pattern("dune"), "%dune%");
        assert_eq!(contains_pattern(""), "%%");
    }

    #[test]
    fn test_contains_pattern_escapes_wildcards() {
        assert_eq!(contains_pattern("a_b"), r"%a\_b%");
        assert_eq!(contains_pattern("100%"), r"%100\%%");
        assert_eq!(contains_pattern(r"c:\x"), r"%c:\\x%");
    }
}
