//! `limo update`: pull the selected service's stars into the local store.

use std::sync::Arc;

use console::style;
use limo::sync::{SyncOptions, sync_service};

use super::{CommandResult, Context};
use crate::progress::ProgressReporter;

pub(crate) async fn handle_update(ctx: &Context, user: Option<String>) -> CommandResult {
    let service = ctx.global.service.to_lowercase();
    let token = ctx.token_for(&service)?;
    let options = SyncOptions {
        user: user.unwrap_or_else(|| ctx.config.user_for(&service)),
        ..SyncOptions::default()
    };

    let reporter = Arc::new(ProgressReporter::new());
    let summary = sync_service(
        &ctx.db,
        ctx.source(),
        &token,
        &options,
        Some(reporter.as_callback()),
    )
    .await;
    reporter.finish();
    let summary = summary?;

    println!("{summary}");

    if let Some(fatal) = summary.fatal {
        eprintln!("{} {}", style("Update stopped:").red().bold(), fatal);
        return Err(fatal.into());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::testing::{context, global};

    #[tokio::test]
    async fn test_update_without_token_is_not_logged_in() {
        let ctx = context(global()).await;
        let err = handle_update(&ctx, None).await.unwrap_err();
        assert!(err.to_string().starts_with("not logged in to github"));
    }
}
