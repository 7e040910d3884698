//! Shell completions and man pages.

use std::io::Write;
use std::path::{Path, PathBuf};

use clap::CommandFactory;

use crate::Cli;

fn completion_script(shell: clap_complete::Shell) -> Vec<u8> {
    let mut cmd = Cli::command();
    let mut out = Vec::new();
    clap_complete::generate(shell, &mut cmd, "limo", &mut out);
    out
}

/// The command at `path` below `limo`, plus its man page name
/// (`limo-list-stars`). Aliases such as `ls` resolve too.
fn find_command(path: &[String]) -> Result<(clap::Command, String), String> {
    let mut cmd = Cli::command();
    cmd.build();
    let mut name = "limo".to_string();
    let mut typed = "limo".to_string();

    for part in path {
        typed = format!("{typed} {part}");
        let sub = cmd
            .find_subcommand(part)
            .cloned()
            .ok_or_else(|| format!("Unknown command '{typed}'"))?;
        name = format!("{name}-{}", sub.get_name());
        cmd = sub;
    }
    Ok((cmd, name))
}

fn man_page(path: &[String]) -> Result<Vec<u8>, Box<dyn std::error::Error>> {
    let (cmd, name) = find_command(path)?;
    let man = clap_mangen::Man::new(cmd).title(name);
    let mut out = Vec::new();
    man.render(&mut out)?;
    Ok(out)
}

/// Write every page into `dir` and return how many were written.
fn write_man_pages(dir: &Path) -> std::io::Result<usize> {
    std::fs::create_dir_all(dir)?;
    clap_mangen::generate_to(Cli::command(), dir)?;
    Ok(std::fs::read_dir(dir)?
        .filter_map(Result::ok)
        .filter(|e| e.path().extension().is_some_and(|ext| ext == "1"))
        .count())
}

pub(crate) fn handle_completions(
    shell: clap_complete::Shell,
) -> Result<(), Box<dyn std::error::Error>> {
    std::io::stdout().write_all(&completion_script(shell))?;
    Ok(())
}

pub(crate) fn handle_man(
    command: &[String],
    dir: Option<PathBuf>,
) -> Result<(), Box<dyn std::error::Error>> {
    match dir {
        Some(dir) => {
            let count = write_man_pages(&dir)?;
            println!("Generated {count} man pages in: {}", dir.display());
        }
        None => std::io::stdout().write_all(&man_page(command)?)?,
    }
    Ok(())
}
