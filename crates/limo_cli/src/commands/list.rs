//! `limo list` and `limo count`.

use limo::store;
use limo::StoreError;

use super::output::{
    print_count, print_events, print_remote_stars, print_stars, print_strings, print_tags,
};
use super::{CommandResult, Context};
use crate::{CountTarget, ListTarget};

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

pub(crate) async fn handle_list(ctx: &Context, target: ListTarget) -> CommandResult {
    let format = ctx.global.output;
    match target {
        ListTarget::Stars {
            pattern,
            untagged,
            any,
        } => {
            let stars = list_stars(ctx, pattern.as_deref(), untagged, any).await?;
            print_stars(&stars, format)?;
        }
        ListTarget::Tags => {
            let tags = store::list_tags_with_star_count(&ctx.db).await?;
            print_tags(&tags, format)?;
        }
        ListTarget::Languages => {
            let languages = store::find_languages(&ctx.db).await?;
            print_strings(&languages, format)?;
        }
        ListTarget::Events { user, page, count } => {
            let source = ctx.source();
            let token = ctx.token_for(source.name())?;
            let user = user.unwrap_or_else(|| ctx.config.user_for(source.name()));
            let events = source.fetch_events(&token, &user, page, count).await?;
            print_events(&events, format)?;
        }
        ListTarget::Trending => {
            let source = ctx.source();
            let token = ctx.config.token_for(source.name()).unwrap_or_default();
            let language = non_empty(&ctx.global.language).unwrap_or_default();
            let stars = source.fetch_trending(&token, language).await?;
            print_remote_stars(&stars, format)?;
        }
    }
    Ok(())
}

/// Pick the star query from `--language`, `--tag`, and the list flags.
async fn list_stars(
    ctx: &Context,
    pattern: Option<&str>,
    untagged: bool,
    any: bool,
) -> Result<Vec<limo::StarModel>, StoreError> {
    let language = non_empty(&ctx.global.language);
    let tag = non_empty(&ctx.global.tag);

    match (untagged, language, tag) {
        (true, _, _) => store::find_untagged_stars(&ctx.db, pattern).await,
        (false, Some(language), Some(tag)) => {
            store::find_stars_by_language_and_or_tag(&ctx.db, pattern, language, tag, any).await
        }
        (false, Some(language), None) => {
            store::find_stars_by_language(&ctx.db, pattern, language).await
        }
        (false, None, Some(name)) => {
            let tag = store::find_tag_by_name(&ctx.db, name)
                .await?
                .ok_or_else(|| StoreError::tag_not_found(name))?;
            store::load_stars(&ctx.db, &tag, pattern).await
        }
        (false, None, None) => store::find_stars(&ctx.db, pattern).await,
    }
}

pub(crate) async fn handle_count(ctx: &Context, target: CountTarget) -> CommandResult {
    let count = match target {
        CountTarget::Stars => {
            store::count_stars(
                &ctx.db,
                non_empty(&ctx.global.language),
                non_empty(&ctx.global.tag),
            )
            .await?
        }
        CountTarget::Tags => store::list_tags_with_star_count(&ctx.db).await?.len() as u64,
        CountTarget::Languages => store::find_languages(&ctx.db).await?.len() as u64,
    };
    print_count(count, ctx.global.output)?;
    Ok(())
}
