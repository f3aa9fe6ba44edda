//! Host Capabilities
//!
//! The views ask the host for the current date and for yes/no confirmation
//! through these traits, so they can be driven without a terminal or a real
//! clock.

use chrono::{Local, NaiveDate};
use std::io::{BufRead, Write};

/// Source of "today"
pub trait Clock: Send + Sync {
    fn today(&self) -> NaiveDate;
}

/// Local wall clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

/// Clock pinned to one date
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDate);

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.0
    }
}

/// Asks the user to confirm a destructive action
pub trait Confirm: Send + Sync {
    fn confirm(&self, prompt: &str) -> bool;
}

/// Always gives the same answer
#[derive(Debug, Clone, Copy)]
pub struct FixedConfirm(pub bool);

impl Confirm for FixedConfirm {
    fn confirm(&self, _prompt: &str) -> bool {
        self.0
    }
}

/// Prompts on stdout and reads `y`/`yes` from stdin; anything else declines
#[derive(Debug, Clone, Copy, Default)]
pub struct StdinConfirm;

impl Confirm for StdinConfirm {
    fn confirm(&self, prompt: &str) -> bool {
        let mut stdout = std::io::stdout();
        if write!(stdout, "{} [y/N] ", prompt)
            .and_then(|_| stdout.flush())
            .is_err()
        {
            return false;
        }

        let mut answer = String::new();
        match std::io::stdin().lock().read_line(&mut answer) {
            Ok(_) => is_yes(&answer),
            Err(e) => {
                tracing::warn!(error = %e, "Failed to read confirmation");
                false
            }
        }
    }
}

fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_yes() {
        assert!(is_yes("y\n"));
        assert!(is_yes(" YES "));
        assert!(!is_yes(""));
        assert!(!is_yes("no"));
    }

    #[test]
    fn test_fixed_clock() {
        let date = NaiveDate::from_ymd_opt(2024, 2, 29).unwrap();
        assert_eq!(FixedClock(date).today(), date);
    }
}
