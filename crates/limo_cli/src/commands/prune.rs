//! `limo prune`: list, and with `--delete` remove, stars that the service no
//! longer reports.

use console::style;
use limo::prune::prune_service;

use super::output::{OutputFormat, print_stars};
use super::{CommandResult, Context};

pub(crate) async fn handle_prune(ctx: &Context, delete: bool) -> CommandResult {
    let service = ctx.global.service.to_lowercase();
    let stars = prune_service(&ctx.db, &service, delete).await?;

    if ctx.global.output == OutputFormat::Json {
        print_stars(&stars, OutputFormat::Json)?;
        return Ok(());
    }

    if stars.is_empty() {
        println!("Nothing to prune.");
        return Ok(());
    }

    print_stars(&stars, OutputFormat::Table)?;

    if delete {
        println!(
            "{} Deleted {} star(s)",
            style("✓").green().bold(),
            stars.len()
        );
    } else {
        println!("Run `limo prune --delete` to remove them.");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::testing::{context, global, seed};

    #[tokio::test]
    async fn test_prune_unknown_service() {
        let ctx = context(global()).await;
        let err = handle_prune(&ctx, false).await.unwrap_err();
        assert_eq!(err.to_string(), "Service 'github' not found");
    }

    #[tokio::test]
    async fn test_prune_never_synced_service_deletes_nothing() {
        let ctx = context(global()).await;
        seed(&ctx, "o/limo", None, &[]).await;

        handle_prune(&ctx, true).await.unwrap();

        let stars = limo::store::find_stars(&ctx.db, None).await.unwrap();
        assert_eq!(stars.len(), 1);
    }
}
