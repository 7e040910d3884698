//! `limo tag`, `untag`, `rename`, and `delete tag`.

use console::style;
use limo::StoreError;
use limo::tagging::{self, TagOutcome};

use super::{CommandResult, Context};

fn success(message: impl std::fmt::Display) {
    println!("{} {}", style("✓").green().bold(), message);
}

fn failure(message: impl std::fmt::Display) {
    eprintln!("{} {}", style("✗").red().bold(), message);
}

/// Print the candidates of an ambiguous star query before failing with it.
pub(super) fn explain(err: StoreError) -> Box<dyn std::error::Error> {
    if let StoreError::AmbiguousStar { ref candidates, .. } = err {
        eprintln!("Matching stars:");
        for name in candidates {
            eprintln!("  {name}");
        }
    }
    err.into()
}

pub(crate) async fn handle_tag(ctx: &Context, star: &str, tags: &[String]) -> CommandResult {
    let (star, outcomes) = tagging::tag_star(&ctx.db, star, tags)
        .await
        .map_err(explain)?;

    println!("{}", style(&star.full_name).bold());
    for outcome in outcomes {
        match outcome {
            TagOutcome::Added { .. } => success(&outcome),
            TagOutcome::AlreadyTagged { .. } => failure(&outcome),
        }
    }
    Ok(())
}

pub(crate) async fn handle_untag(ctx: &Context, star: &str, tags: &[String]) -> CommandResult {
    let (star, outcomes) = tagging::untag_star(&ctx.db, star, tags)
        .await
        .map_err(explain)?;

    println!("{}", style(&star.full_name).bold());
    for outcome in outcomes {
        if outcome.is_error() {
            failure(&outcome);
        } else {
            success(&outcome);
        }
    }
    Ok(())
}

pub(crate) async fn handle_rename(ctx: &Context, old: &str, new: &str) -> CommandResult {
    let tag = tagging::rename_tag(&ctx.db, old, new).await?;
    success(format!("Renamed tag '{}' to '{}'", old, tag.name));
    Ok(())
}

pub(crate) async fn handle_delete_tags(ctx: &Context, names: &[String]) -> CommandResult {
    let mut failed = 0usize;
    for name in names {
        match tagging::delete_tag(&ctx.db, name).await {
            Ok(tag) => success(format!("Deleted tag '{}'", tag.name)),
            Err(e @ StoreError::NotFound { .. }) => {
                failure(&e);
                failed += 1;
            }
            Err(e) => return Err(e.into()),
        }
    }

    if failed > 0 {
        return Err(format!("{failed} tag(s) could not be deleted").into());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use limo::store;

    use super::*;
    use crate::commands::testing::{context, global, seed};

    async fn tags_of(ctx: &Context, full_name: &str) -> Vec<String> {
        let star = tagging::resolve_star(&ctx.db, full_name).await.unwrap();
        store::load_tags(&ctx.db, &star, None)
            .await
            .unwrap()
            .into_iter()
            .map(|t| t.name)
            .collect()
    }

    #[tokio::test]
    async fn test_tag_then_untag() {
        let ctx = context(global()).await;
        seed(&ctx, "o/limo", Some("Go"), &[]).await;

        handle_tag(&ctx, "limo", &["cli".to_string(), "go".to_string()])
            .await
            .unwrap();
        assert_eq!(tags_of(&ctx, "o/limo").await, vec!["cli", "go"]);

        handle_untag(&ctx, "limo", &["go".to_string(), "missing".to_string()])
            .await
            .unwrap();
        assert_eq!(tags_of(&ctx, "o/limo").await, vec!["cli"]);

        handle_untag(&ctx, "limo", &[]).await.unwrap();
        assert!(tags_of(&ctx, "o/limo").await.is_empty());
    }

    #[tokio::test]
    async fn test_tag_ambiguous_star_fails() {
        let ctx = context(global()).await;
        seed(&ctx, "a/limo", None, &[]).await;
        seed(&ctx, "b/limo", None, &[]).await;

        let err = handle_tag(&ctx, "limo", &["x".to_string()])
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Star 'limo' ambiguous");
    }

    #[tokio::test]
    async fn test_rename_and_delete_tags() {
        let ctx = context(global()).await;
        seed(&ctx, "o/limo", None, &["cli"]).await;

        handle_rename(&ctx, "cli", "command-line").await.unwrap();
        assert_eq!(tags_of(&ctx, "o/limo").await, vec!["command-line"]);

        let err = handle_delete_tags(&ctx, &["command-line".to_string(), "nope".to_string()])
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "1 tag(s) could not be deleted");
        assert!(tags_of(&ctx, "o/limo").await.is_empty());
    }

    #[tokio::test]
    async fn test_rename_missing_tag() {
        let ctx = context(global()).await;
        let err = handle_rename(&ctx, "nope", "x").await.unwrap_err();
        assert_eq!(err.to_string(), "Tag 'nope' not found");
    }
}
