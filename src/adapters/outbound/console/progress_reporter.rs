use crate::ports::outbound::ProgressReporter;
use indicatif::{ProgressBar, ProgressStyle};
use owo_colors::OwoColorize;
use std::cell::RefCell;
use std::time::Duration;

/// StderrProgressReporter adapter for reporting progress to stderr
///
/// This adapter implements the ProgressReporter port, writing progress
/// information to stderr so it doesn't interfere with stdout output.
/// Uses indicatif for the step bar and owo-colors for warnings and errors.
pub struct StderrProgressReporter {
    progress_bar: RefCell<Option<ProgressBar>>,
    quiet: bool,
}

impl StderrProgressReporter {
    pub fn new() -> Self {
        Self {
            progress_bar: RefCell::new(None),
            quiet: false,
        }
    }

    /// A reporter that only prints warnings and errors
    pub fn quiet() -> Self {
        Self {
            progress_bar: RefCell::new(None),
            quiet: true,
        }
    }

    fn get_or_create_progress_bar(&self, total: usize) -> ProgressBar {
        let mut pb_option = self.progress_bar.borrow_mut();
        if let Some(pb) = pb_option.as_ref() {
            return pb.clone();
        }

        let pb = ProgressBar::new(total as u64);
        let style = ProgressStyle::default_bar()
            .template("   {spinner:.green} [{bar:30.cyan/blue}] {pos}/{len} - {msg}")
            .map(|style| style.progress_chars("=>-"))
            .unwrap_or_else(|_| ProgressStyle::default_spinner());
        pb.set_style(style);
        pb.enable_steady_tick(Duration::from_millis(100));
        *pb_option = Some(pb.clone());
        pb
    }

    fn clear_progress_bar(&self) {
        if let Some(pb) = self.progress_bar.borrow_mut().take() {
            pb.finish_and_clear();
        }
    }
}

impl Default for StderrProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressReporter for StderrProgressReporter {
    fn report(&self, message: &str) {
        if !self.quiet {
            eprintln!("{}", message);
        }
    }

    fn report_progress(&self, current: usize, total: usize, message: Option<&str>) {
        if self.quiet {
            return;
        }
        let pb = self.get_or_create_progress_bar(total);
        pb.set_position(current as u64);
        if let Some(msg) = message {
            pb.set_message(msg.to_string());
        }
        if current >= total {
            drop(pb);
            self.clear_progress_bar();
        }
    }

    fn report_warning(&self, message: &str) {
        if let Some(pb) = self.progress_bar.borrow().as_ref() {
            pb.suspend(|| eprintln!("{} {}", "warning:".yellow().bold(), message));
            return;
        }
        eprintln!("{} {}", "warning:".yellow().bold(), message);
    }

    fn report_error(&self, message: &str) {
        self.clear_progress_bar();
        eprintln!("{} {}", "error:".red().bold(), message);
    }

    fn report_completion(&self, message: &str) {
        self.clear_progress_bar();
        if !self.quiet {
            eprintln!("{}", message);
        }
    }
}
