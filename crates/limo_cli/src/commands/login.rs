//! `limo login`: ask for an API token and save it to the config file.

use console::{Term, style};
use limo::source::{CredentialPrompt, ServiceRegistry};

use crate::config::Config;

/// Reads hidden input from the controlling terminal.
pub(crate) struct TermPrompt;

impl CredentialPrompt for TermPrompt {
    fn ask_secret(&self, question: &str) -> std::io::Result<String> {
        rpassword::prompt_password(format!("{}: ", style(question).green()))
    }
}

pub(crate) fn handle_login(
    registry: &ServiceRegistry,
    service: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let source = registry.try_for_name(service)?;
    let token = source.login(&TermPrompt)?;
    let config_path = Config::save_token(source.name(), &token)?;

    if Term::stdout().is_term() {
        println!(
            "{} {} token saved to: {}",
            style("✓").green().bold(),
            source.name(),
            config_path.display()
        );
        println!();
        println!("You can now pull your stars with:");
        println!("  limo update --service {}", source.name());
    } else {
        tracing::info!(
            service = source.name(),
            config_path = %config_path.display(),
            "Token saved"
        );
    }

    Ok(())
}
