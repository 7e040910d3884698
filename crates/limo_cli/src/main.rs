//! Limo CLI - manage your starred repositories from the command line.

mod commands;
mod config;
mod progress;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use console::Term;
use tracing_subscriber::EnvFilter;

use crate::commands::output::OutputFormat;

#[derive(Parser)]
#[command(name = "limo")]
#[command(version)]
#[command(about = "A CLI for managing starred repositories")]
#[command(
    long_about = "Limo keeps a local copy of the repositories you have starred on GitHub or \
GitLab. Stars can be tagged, searched by language or tag, and pruned once the remote \
service no longer reports them."
)]
#[command(after_long_help = r#"EXAMPLES
    Log in and pull your GitHub stars:
        $ limo login
        $ limo update

    Tag a star and list everything tagged 'cli' written in Rust:
        $ limo tag ripgrep cli search
        $ limo list stars -t cli -l rust

    Open a star in your browser:
        $ limo open limo

    Show stars that were unstarred remotely, then delete them:
        $ limo prune
        $ limo prune --delete

    Generate shell completions:
        $ limo completions bash > ~/.local/share/bash-completion/completions/limo

CONFIGURATION
    Limo reads configuration from:
      1. ~/.config/limo/config.toml (or $XDG_CONFIG_HOME/limo/config.toml)
      2. ./limo.toml
      3. Environment variables (LIMO_* prefix, e.g., LIMO_GITHUB_TOKEN)
      4. .env file in current directory

ENVIRONMENT VARIABLES
    LIMO_DATABASE_URL      Database connection string (default: ~/.local/state/limo/limo.db)
    LIMO_GITHUB_TOKEN      GitHub personal access token
    LIMO_GITLAB_TOKEN      GitLab personal access token
    LIMO_GITLAB_HOST       GitLab host (default: gitlab.com)
"#)]
pub(crate) struct Cli {
    #[command(flatten)]
    global: GlobalArgs,

    #[command(subcommand)]
    command: Commands,
}

/// Flags accepted by every subcommand.
#[derive(Debug, Clone, Args)]
pub(crate) struct GlobalArgs {
    /// Remote service to talk to
    #[arg(short, long, global = true, default_value = "github")]
    pub service: String,

    /// Accept invalid TLS certificates (self-hosted services)
    #[arg(short, long, global = true)]
    pub insecure: bool,

    /// Filter by language
    #[arg(short, long, global = true)]
    pub language: Option<String>,

    /// Filter by tag, or the tag to attach when adding a star
    #[arg(short, long, global = true)]
    pub tag: Option<String>,

    /// Output format
    #[arg(short, long, global = true, value_enum, default_value_t = OutputFormat::Table)]
    pub output: OutputFormat,

    /// Verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Save an API token for the selected service
    Login,
    /// Pull starred repositories from the selected service
    #[command(visible_alias = "sync")]
    Update {
        /// Sync another user's stars instead of the token owner's
        #[arg(short, long)]
        user: Option<String>,
    },
    /// List local stars that the service no longer reports
    Prune {
        /// Delete them instead of only listing them
        #[arg(long)]
        delete: bool,
    },
    /// Tag a star
    Tag {
        /// Star to tag (full name, name, or a fragment of either)
        star: String,
        /// Tags to attach
        #[arg(required = true)]
        tags: Vec<String>,
    },
    /// Remove tags from a star (all tags when none are given)
    Untag {
        star: String,
        tags: Vec<String>,
    },
    /// Rename a tag
    Rename {
        tag: String,
        name: String,
    },
    /// Delete tags or stars
    Delete {
        #[command(subcommand)]
        target: DeleteTarget,
    },
    /// Star a repository remotely and save it locally
    Add {
        /// Repository URL, `owner/repo`, or `owner repo`
        #[arg(required = true, num_args = 1..=2)]
        repo: Vec<String>,
    },
    /// List stars, tags, languages, events, or trending repositories
    #[command(visible_alias = "ls")]
    List {
        #[command(subcommand)]
        target: ListTarget,
    },
    /// Count stars, tags, or languages
    Count {
        #[command(subcommand)]
        target: CountTarget,
    },
    /// Show details for the stars matching a query
    Show {
        star: String,
    },
    /// Open a star's URL in the default browser
    Open {
        star: String,
        /// Prefer the project homepage over the repository URL
        #[arg(long)]
        homepage: bool,
    },
    /// Run database migrations
    Migrate {
        #[command(subcommand)]
        action: MigrateAction,
    },
    /// Generate shell completion scripts
    Completions {
        /// Shell to generate completions for
        shell: clap_complete::Shell,
    },
    /// Generate man page(s)
    Man {
        /// Print the page of this command instead, e.g. `limo man list stars`
        command: Vec<String>,
        /// Output directory for every man page (prints to stdout if not specified)
        #[arg(short, long, conflicts_with = "command")]
        dir: Option<PathBuf>,
    },
}

#[derive(Subcommand)]
pub(crate) enum DeleteTarget {
    /// Delete tags, detaching them from every star
    Tag {
        #[arg(required = true)]
        names: Vec<String>,
    },
    /// Unstar a repository remotely and delete it locally
    Star {
        #[arg(required = true, num_args = 1..=2)]
        repo: Vec<String>,
    },
}

#[derive(Subcommand)]
pub(crate) enum ListTarget {
    /// Local stars, filtered by --language and --tag
    Stars {
        /// Only stars whose full name contains this text
        pattern: Option<String>,
        /// Only stars without tags
        #[arg(short, long)]
        untagged: bool,
        /// Match --language OR --tag instead of both
        #[arg(short, long)]
        any: bool,
    },
    /// Tags with their star counts
    Tags,
    /// Languages of local stars
    Languages,
    /// Recent activity visible to a user
    Events {
        #[arg(short, long)]
        user: Option<String>,
        /// First page to fetch
        #[arg(long, default_value_t = 1)]
        page: u32,
        /// Number of pages to fetch
        #[arg(long, default_value_t = 1)]
        count: u32,
    },
    /// Trending repositories, optionally filtered by --language
    Trending,
}

#[derive(Subcommand)]
pub(crate) enum CountTarget {
    /// Local stars, filtered by --language and --tag
    Stars,
    Tags,
    Languages,
}

#[derive(Subcommand)]
pub(crate) enum MigrateAction {
    /// Apply all pending migrations
    Up,
    /// Rollback the last migration
    Down,
    /// Show migration status
    Status,
    /// Fresh install - drop all tables and reapply migrations
    Fresh,
}

fn init_tracing(verbose: bool) {
    if Term::stdout().is_term() && !verbose {
        return;
    }
    let default = if verbose {
        "limo=debug,limo_cli=debug"
    } else {
        "limo=info,limo_cli=info"
    };
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Create the parent directory of a file-backed SQLite database.
fn ensure_sqlite_dir(database_url: &str) -> std::io::Result<()> {
    let Some(db_path) = database_url.strip_prefix("sqlite://") else {
        return Ok(());
    };
    // Strip query parameters (e.g., ?mode=rwc) before path operations
    let db_path = db_path.split('?').next().unwrap_or(db_path);
    let db_path = std::path::Path::new(db_path);

    if db_path.is_relative() && !db_path.as_os_str().is_empty() {
        tracing::warn!(
            "Database path '{}' is relative - behavior depends on current directory. \
             Consider using an absolute path.",
            db_path.display()
        );
    }

    if let Some(parent) = db_path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)?;
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_tracing(cli.global.verbose);

    match &cli.command {
        Commands::Completions { shell } => {
            commands::meta::handle_completions(*shell)?;
            return Ok(());
        }
        Commands::Man { command, dir } => {
            commands::meta::handle_man(command, dir.clone())?;
            return Ok(());
        }
        _ => {}
    }

    // Load configuration (config file -> env vars -> defaults)
    let config = config::Config::load();
    let registry = commands::build_registry(&config, cli.global.insecure)?;

    if let Commands::Login = cli.command {
        return commands::login::handle_login(&registry, &cli.global.service);
    }

    let database_url = config
        .database_url()
        .ok_or("Could not determine database location; set LIMO_DATABASE_URL")?;
    ensure_sqlite_dir(&database_url)?;

    if let Commands::Migrate { action } = cli.command {
        return commands::migrate::handle_migrate(action, &database_url).await;
    }

    let db = limo::connect_and_migrate(&database_url).await?;
    let ctx = commands::Context {
        config,
        db,
        registry,
        global: cli.global,
    };

    match cli.command {
        Commands::Update { user } => commands::update::handle_update(&ctx, user).await?,
        Commands::Prune { delete } => commands::prune::handle_prune(&ctx, delete).await?,
        Commands::Tag { star, tags } => commands::tags::handle_tag(&ctx, &star, &tags).await?,
        Commands::Untag { star, tags } => commands::tags::handle_untag(&ctx, &star, &tags).await?,
        Commands::Rename { tag, name } => commands::tags::handle_rename(&ctx, &tag, &name).await?,
        Commands::Delete { target } => match target {
            DeleteTarget::Tag { names } => commands::tags::handle_delete_tags(&ctx, &names).await?,
            DeleteTarget::Star { repo } => commands::stars::handle_delete_star(&ctx, &repo).await?,
        },
        Commands::Add { repo } => commands::stars::handle_add(&ctx, &repo).await?,
        Commands::List { target } => commands::list::handle_list(&ctx, target).await?,
        Commands::Count { target } => commands::list::handle_count(&ctx, target).await?,
        Commands::Show { star } => commands::stars::handle_show(&ctx, &star).await?,
        Commands::Open { star, homepage } => {
            commands::stars::handle_open(&ctx, &star, homepage).await?
        }
        Commands::Login
        | Commands::Migrate { .. }
        | Commands::Completions { .. }
        | Commands::Man { .. } => {}
    }

    Ok(())
}
