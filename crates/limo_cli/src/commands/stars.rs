//! `limo add`, `delete star`, `show`, and `open`.

use std::sync::Arc;

use console::style;
use limo::source::{RepoRef, StarSource};
use limo::starring::{star_repository, unstar_repository};
use limo::store::{self, UpsertOutcome};
use limo::tagging;

use super::output::{StarDetail, print_details};
use super::tags::explain;
use super::{CommandResult, Context};

/// The repository named on the command line, and the source that hosts it.
///
/// A URL picks its service from the host; otherwise `--service` applies.
fn target(
    ctx: &Context,
    values: &[String],
) -> Result<(RepoRef, Arc<dyn StarSource>), Box<dyn std::error::Error>> {
    let repo = RepoRef::parse(values)?;
    let source = match repo.service {
        Some(ref service) => ctx.registry.try_for_name(service)?,
        None => ctx.source(),
    };
    Ok((repo, source))
}

pub(crate) async fn handle_add(ctx: &Context, values: &[String]) -> CommandResult {
    let (repo, source) = target(ctx, values)?;
    let token = ctx.token_for(source.name())?;
    let tags: Vec<String> = ctx.global.tag.iter().cloned().collect();

    let (star, outcome) = star_repository(&ctx.db, source.as_ref(), &token, &repo, &tags).await?;

    let verb = match outcome {
        UpsertOutcome::Created => "Starred",
        UpsertOutcome::Updated => "Already starred",
    };
    println!(
        "{} {} '{}'",
        style("✓").green().bold(),
        verb,
        star.full_name
    );
    for tag in &tags {
        println!("  tagged '{tag}'");
    }
    Ok(())
}

pub(crate) async fn handle_delete_star(ctx: &Context, values: &[String]) -> CommandResult {
    let (repo, source) = target(ctx, values)?;
    let token = ctx.token_for(source.name())?;

    let star = unstar_repository(&ctx.db, source.as_ref(), &token, &repo).await?;

    println!(
        "{} Deleted star '{}'",
        style("✓").green().bold(),
        star.full_name
    );
    Ok(())
}

pub(crate) async fn handle_show(ctx: &Context, query: &str) -> CommandResult {
    let star = tagging::resolve_star(&ctx.db, query)
        .await
        .map_err(explain)?;
    let tags = store::load_tags(&ctx.db, &star, None)
        .await?
        .into_iter()
        .map(|t| t.name)
        .collect();

    print_details(&[StarDetail { star, tags }], ctx.global.output)?;
    Ok(())
}

pub(crate) async fn handle_open(ctx: &Context, query: &str, homepage: bool) -> CommandResult {
    open_star(ctx, query, homepage, |url| open::that(url)).await
}

/// Resolve `query` to exactly one star and hand its URL to `launch`.
async fn open_star<F>(ctx: &Context, query: &str, homepage: bool, launch: F) -> CommandResult
where
    F: FnOnce(&str) -> std::io::Result<()>,
{
    let star = tagging::resolve_star(&ctx.db, query)
        .await
        .map_err(explain)?;
    let url = star.browse_url(homepage).ok_or("No URL for star")?;

    println!("Opening {url}...");
    launch(url)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use limo::source::RemoteStar;

    use super::*;
    use crate::commands::testing::{context, global, seed};

    async fn seed_with_urls(ctx: &Context, full_name: &str) {
        let (service, _) = store::find_or_create_service(&ctx.db, "github")
            .await
            .unwrap();
        let remote = RemoteStar {
            remote_id: full_name.to_string(),
            name: full_name.rsplit('/').next().unwrap().to_string(),
            full_name: full_name.to_string(),
            url: Some(format!("https://github.com/{full_name}.git")),
            homepage: Some("https://limo.example".to_string()),
            ..RemoteStar::default()
        };
        store::upsert_star(&ctx.db, service.id, &remote, Utc::now())
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_target_uses_service_from_url_host() {
        let ctx = context(global()).await;
        let err = target(&ctx, &["https://bitbucket.org/o/r".to_string()])
            .err()
            .unwrap();
        assert!(err.to_string().contains("bitbucket"));

        let (repo, source) = target(&ctx, &["o".to_string(), "r".to_string()]).unwrap();
        assert_eq!(repo.full_name(), "o/r");
        assert_eq!(source.name(), "notfound");
    }

    #[tokio::test]
    async fn test_add_requires_login() {
        let ctx = context(global()).await;
        let err = handle_add(&ctx, &["o/r".to_string()]).await.unwrap_err();
        assert!(err.to_string().starts_with("not logged in"));
    }

    #[tokio::test]
    async fn test_show_matches_and_misses() {
        let ctx = context(global()).await;
        seed(&ctx, "o/limo", Some("Go"), &["cli"]).await;

        handle_show(&ctx, "LIMO").await.unwrap();

        let err = handle_show(&ctx, "nothing").await.unwrap_err();
        assert_eq!(err.to_string(), "No stars match 'nothing'");

        seed(&ctx, "p/limo", None, &[]).await;
        let err = handle_show(&ctx, "limo").await.unwrap_err();
        assert_eq!(err.to_string(), "Star 'limo' ambiguous");
    }

    #[tokio::test]
    async fn test_open_launches_repository_or_homepage_url() {
        let ctx = context(global()).await;
        seed_with_urls(&ctx, "hoop33/limo").await;

        let mut launched = Vec::new();
        open_star(&ctx, "limo", false, |url| {
            launched.push(url.to_string());
            Ok(())
        })
        .await
        .unwrap();
        open_star(&ctx, "limo", true, |url| {
            launched.push(url.to_string());
            Ok(())
        })
        .await
        .unwrap();

        assert_eq!(
            launched,
            vec!["https://github.com/hoop33/limo.git", "https://limo.example"]
        );
    }

    #[tokio::test]
    async fn test_open_rejects_ambiguous_query_before_launching() {
        let ctx = context(global()).await;
        seed_with_urls(&ctx, "o/limo").await;
        seed_with_urls(&ctx, "p/limo").await;

        let mut launched = false;
        let err = open_star(&ctx, "limo", false, |_| {
            launched = true;
            Ok(())
        })
        .await
        .unwrap_err();

        assert_eq!(err.to_string(), "Star 'limo' ambiguous");
        assert!(!launched);
    }

    #[tokio::test]
    async fn test_open_without_url_fails() {
        let ctx = context(global()).await;
        seed(&ctx, "o/bare", None, &[]).await;

        let err = open_star(&ctx, "bare", false, |_| Ok(()))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "No URL for star");
    }
}
