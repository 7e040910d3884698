//! Rendering of stars, tags, and events as tables or JSON.

use chrono::{DateTime, FixedOffset, Utc};
use clap::ValueEnum;
use console::style;
use limo::StarModel;
use limo::source::{RemoteEvent, RemoteStar};
use limo::store::TagWithCount;
use serde::Serialize;
use tabled::Tabled;

/// Output format for listings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub(crate) enum OutputFormat {
    /// Display as a formatted table (default)
    #[default]
    Table,
    /// Display as JSON
    Json,
}

/// One star in a listing.
#[derive(Debug, Clone, Serialize, Tabled)]
pub(crate) struct StarRow {
    #[tabled(rename = "Star")]
    pub full_name: String,
    #[tabled(rename = "Language")]
    pub language: String,
    #[tabled(rename = "Stars")]
    pub stargazers: i32,
    #[tabled(rename = "URL")]
    pub url: String,
}

impl From<&StarModel> for StarRow {
    fn from(star: &StarModel) -> Self {
        Self {
            full_name: star.full_name.clone(),
            language: star.language.clone().unwrap_or_default(),
            stargazers: star.stargazers,
            url: star.homepage.clone().or_else(|| star.url.clone()).unwrap_or_default(),
        }
    }
}

impl From<&RemoteStar> for StarRow {
    fn from(star: &RemoteStar) -> Self {
        Self {
            full_name: star.full_name.clone(),
            language: star.language.clone().unwrap_or_default(),
            stargazers: star.stargazers,
            url: star.homepage.clone().or_else(|| star.url.clone()).unwrap_or_default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Tabled)]
pub(crate) struct TagRow {
    #[tabled(rename = "Tag")]
    pub name: String,
    #[tabled(rename = "Stars")]
    pub star_count: i64,
}

impl From<&TagWithCount> for TagRow {
    fn from(tag: &TagWithCount) -> Self {
        Self {
            name: tag.tag.name.clone(),
            star_count: tag.star_count,
        }
    }
}

#[derive(Debug, Clone, Serialize, Tabled)]
pub(crate) struct EventRow {
    #[tabled(rename = "When")]
    pub when: String,
    #[tabled(rename = "Who")]
    pub who: String,
    #[tabled(rename = "What")]
    pub what: String,
    #[tabled(rename = "Which")]
    pub which: String,
}

impl From<&RemoteEvent> for EventRow {
    fn from(event: &RemoteEvent) -> Self {
        Self {
            when: format_time(event.when),
            who: event.who.clone(),
            what: event.what.clone(),
            which: event.which.clone(),
        }
    }
}

/// A star with its tags, as shown by `limo show`.
#[derive(Debug, Serialize)]
pub(crate) struct StarDetail {
    #[serde(flatten)]
    pub star: StarModel,
    pub tags: Vec<String>,
}

fn format_time(when: DateTime<Utc>) -> String {
    when.format("%Y-%m-%d %H:%M").to_string()
}

fn format_local(when: Option<DateTime<FixedOffset>>) -> String {
    when.map(|w| format_time(w.with_timezone(&Utc)))
        .unwrap_or_default()
}

pub(crate) fn print_table<T: Tabled>(rows: Vec<T>) {
    let mut table = tabled::Table::new(rows);
    table.with(tabled::settings::Style::rounded());
    println!("{table}");
}

pub(crate) fn print_json<T: Serialize + ?Sized>(value: &T) -> serde_json::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

pub(crate) fn print_stars(stars: &[StarModel], format: OutputFormat) -> serde_json::Result<()> {
    match format {
        OutputFormat::Table => {
            print_table(stars.iter().map(StarRow::from).collect());
            Ok(())
        }
        OutputFormat::Json => print_json(stars),
    }
}

pub(crate) fn print_remote_stars(
    stars: &[RemoteStar],
    format: OutputFormat,
) -> serde_json::Result<()> {
    match format {
        OutputFormat::Table => {
            print_table(stars.iter().map(StarRow::from).collect());
            Ok(())
        }
        OutputFormat::Json => print_json(stars),
    }
}

pub(crate) fn print_tags(tags: &[TagWithCount], format: OutputFormat) -> serde_json::Result<()> {
    match format {
        OutputFormat::Table => {
            print_table(tags.iter().map(TagRow::from).collect());
            Ok(())
        }
        OutputFormat::Json => print_json(tags),
    }
}

pub(crate) fn print_events(events: &[RemoteEvent], format: OutputFormat) -> serde_json::Result<()> {
    match format {
        OutputFormat::Table => {
            print_table(events.iter().map(EventRow::from).collect());
            Ok(())
        }
        OutputFormat::Json => print_json(events),
    }
}

pub(crate) fn print_strings(values: &[String], format: OutputFormat) -> serde_json::Result<()> {
    match format {
        OutputFormat::Table => {
            for value in values {
                println!("{value}");
            }
            Ok(())
        }
        OutputFormat::Json => print_json(values),
    }
}

pub(crate) fn print_count(count: u64, format: OutputFormat) -> serde_json::Result<()> {
    match format {
        OutputFormat::Table => {
            println!("{count}");
            Ok(())
        }
        OutputFormat::Json => print_json(&serde_json::json!({ "count": count })),
    }
}

/// Multi-line description of one star.
pub(crate) fn render_detail(detail: &StarDetail) -> String {
    let star = &detail.star;
    let mut lines = vec![format!(
        "{} {}",
        style(&star.full_name).bold().cyan(),
        style(format!("★ {}", star.stargazers)).yellow()
    )];

    if let Some(ref description) = star.description
        && !description.is_empty()
    {
        lines.push(description.clone());
    }

    let fields = [
        ("Language", star.language.clone().unwrap_or_default()),
        ("Homepage", star.homepage.clone().unwrap_or_default()),
        ("URL", star.url.clone().unwrap_or_default()),
        ("Tags", detail.tags.join(", ")),
        ("Starred", format_local(star.starred_at)),
        ("Pushed", format_local(star.pushed_at)),
    ];
    for (label, value) in fields {
        if !value.is_empty() {
            lines.push(format!("{}: {}", style(format!("{label:>9}")).dim(), value));
        }
    }

    lines.join("\n")
}

pub(crate) fn print_details(details: &[StarDetail], format: OutputFormat) -> serde_json::Result<()> {
    match format {
        OutputFormat::Table => {
            for detail in details {
                println!("{}\n", render_detail(detail));
            }
            Ok(())
        }
        OutputFormat::Json => print_json(details),
    }
}
