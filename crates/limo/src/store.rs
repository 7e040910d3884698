//! Local star store: services, stars, tags and their associations.
//!
//! Everything here works against a sea-orm connection and is shared by the
//! sync consumer and the CLI commands.

mod errors;
mod query;
mod services;
mod stars;
mod tags;

pub use errors::{Result, StoreError};
pub use query::{
    count_stars, find_languages, find_prunable_stars, find_stars, find_stars_by_language,
    find_stars_by_language_and_or_tag, find_untagged_stars,
};
pub use services::{find_or_create_service, find_service_by_name, list_services, mark_success};
pub use stars::{
    UpsertOutcome, add_tag, find_star_by_remote_id, fuzzy_find_stars, has_tag, load_tags,
    remove_all_tags, remove_tag, soft_delete_star, upsert_star,
};
pub use tags::{
    TagWithCount, delete_tag, find_or_create_tag, find_tag_by_name, list_tags_with_star_count,
    load_stars, rename_tag,
};

/// Case-fold a name for the `*_folded` columns.
///
/// SQLite's `LOWER()` only folds ASCII, so folding happens here and every
/// case-insensitive comparison runs against the stored folded value.
pub(crate) fn fold(value: &str) -> String {
    value.to_lowercase()
}

/// `LIKE` pattern for a substring match against a folded column.
pub(crate) fn contains_pattern(needle: &str) -> String {
    format!("%{}%", fold(needle))
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::DbErr;

    #[test]
    fn contains_pattern_lowercases() {
        assert_eq!(contains_pattern("Limo"), "%limo%");
        assert_eq!(contains_pattern("ÄRGER"), "%ärger%");
    }

    #[test]
    fn store_error_database_from_db_err() {
        let err: StoreError = DbErr::RecordNotFound("x".to_string()).into();
        assert!(err.to_string().contains("Database error"));
    }

    #[test]
    fn tag_not_found_message() {
        assert_eq!(
            StoreError::tag_not_found("rust").to_string(),
            "Tag 'rust' not found"
        );
    }

    #[test]
    fn ambiguous_star_message() {
        let err = StoreError::AmbiguousStar {
            query: "lim".to_string(),
            candidates: vec!["a/limo".to_string(), "b/limo".to_string()],
        };
        assert_eq!(err.to_string(), "Star 'lim' ambiguous");
    }
}
