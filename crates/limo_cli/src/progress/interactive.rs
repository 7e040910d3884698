use std::sync::Mutex;
use std::time::Duration;

use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use limo::sync::SyncProgress;

/// Consolidated progress state to avoid multiple mutex locks.
#[derive(Default)]
struct ProgressState {
    /// Page fetching; a spinner until the last page is known.
    fetch_bar: Option<ProgressBar>,
    /// Stars written locally.
    save_bar: Option<ProgressBar>,
    service: String,
}

/// Interactive progress reporter using indicatif.
pub struct InteractiveReporter {
    multi: MultiProgress,
    state: Mutex<ProgressState>,
}

impl InteractiveReporter {
    pub fn new() -> Self {
        Self {
            multi: MultiProgress::new(),
            state: Mutex::new(ProgressState::default()),
        }
    }

    /// A reporter that draws nowhere.
    #[cfg(test)]
    pub fn hidden() -> Self {
        Self {
            multi: MultiProgress::with_draw_target(indicatif::ProgressDrawTarget::hidden()),
            state: Mutex::new(ProgressState::default()),
        }
    }

    fn fetch_bar(&self, state: &mut ProgressState) -> ProgressBar {
        if let Some(ref pb) = state.fetch_bar {
            return pb.clone();
        }
        let pb = self.multi.add(ProgressBar::new_spinner());
        pb.set_style(Self::spinner_style());
        pb.set_prefix(format!("{:8}", state.service));
        pb.enable_steady_tick(Duration::from_millis(100));
        state.fetch_bar = Some(pb.clone());
        pb
    }

    fn save_bar(&self, state: &mut ProgressState) -> ProgressBar {
        if let Some(ref pb) = state.save_bar {
            return pb.clone();
        }
        let pb = self.multi.add(ProgressBar::new_spinner());
        pb.set_style(Self::counter_style());
        pb.set_prefix(format!("{:8}", "saving"));
        pb.enable_steady_tick(Duration::from_millis(100));
        state.save_bar = Some(pb.clone());
        pb
    }

    pub fn handle(&self, event: SyncProgress) {
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());

        match event {
            SyncProgress::Starting { service } => {
                state.service = service;
                let pb = self.fetch_bar(&mut state);
                pb.set_message("Fetching stars...");
            }

            SyncProgress::FetchedPage {
                page,
                count,
                last_page,
            } => {
                let pb = self.fetch_bar(&mut state);
                if pb.length().is_none() {
                    pb.set_style(Self::bar_style());
                    pb.disable_steady_tick();
                }
                pb.set_length(u64::from(last_page.max(page)));
                pb.set_position(u64::from(page));
                pb.set_message(format!("{} stars on page {}", count, page));
            }

            SyncProgress::PageFailed { page, error } => {
                drop(state);
                self.multi
                    .println(format!("✗ page {}: {}", page, error))
                    .ok();
            }

            SyncProgress::FetchComplete { pages } => {
                let pb = self.fetch_bar(&mut state);
                pb.finish_with_message(format!("✓ {} pages", pages));
            }

            SyncProgress::Upserted { full_name, created } => {
                let pb = self.save_bar(&mut state);
                pb.inc(1);
                let verb = if created { "created" } else { "updated" };
                pb.set_message(format!("{} {}", verb, full_name));
            }

            SyncProgress::RecordFailed { error } => {
                drop(state);
                self.multi.println(format!("✗ {}", error)).ok();
            }

            SyncProgress::Finished {
                created,
                updated,
                errors,
            } => {
                let pb = self.save_bar(&mut state);
                let msg = if errors > 0 {
                    format!("✓ {} created, {} updated, {} errors", created, updated, errors)
                } else {
                    format!("✓ {} created, {} updated", created, updated)
                };
                pb.finish_with_message(msg);
            }

            _ => {}
        }
    }

    pub fn finish(&self) {
        let state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(ref pb) = state.fetch_bar
            && !pb.is_finished()
        {
            pb.finish();
        }
        if let Some(ref pb) = state.save_bar
            && !pb.is_finished()
        {
            pb.finish();
        }
    }

    fn spinner_style() -> ProgressStyle {
        ProgressStyle::default_spinner()
            .template("{prefix:.bold.cyan} {spinner:.green} {msg}")
            .expect("Invalid template")
            .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏")
    }

    fn counter_style() -> ProgressStyle {
        ProgressStyle::default_spinner()
            .template("{prefix:.bold.cyan} {spinner:.green} {pos:>4} {msg}")
            .expect("Invalid template")
            .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏")
    }

    fn bar_style() -> ProgressStyle {
        ProgressStyle::default_bar()
            .template("{prefix:.bold.cyan} [{bar:40.cyan/blue}] {pos:>3}/{len:3} {msg}")
            .expect("Invalid template")
            .progress_chars("█▓░")
    }
}

impl Default for InteractiveReporter {
    fn default() -> Self {
        Self::new()
    }
}
