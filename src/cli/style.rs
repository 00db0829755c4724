//! Terminal styling helpers

use indicatif::ProgressStyle;
use owo_colors::OwoColorize;

/// Extension trait for styled CLI text
pub trait Stylize {
    /// De-emphasized secondary text
    fn muted(&self) -> String;
    /// Bold emphasis
    fn emphasis(&self) -> String;
    /// Accent color for identifiers and versions
    fn accent(&self) -> String;
    /// Success green
    fn success(&self) -> String;
    /// Warning yellow
    fn warn(&self) -> String;
}

impl Stylize for str {
    fn muted(&self) -> String {
        self.bright_black().to_string()
    }

    fn emphasis(&self) -> String {
        self.bold().to_string()
    }

    fn accent(&self) -> String {
        self.cyan().to_string()
    }

    fn success(&self) -> String {
        self.green().to_string()
    }

    fn warn(&self) -> String {
        self.yellow().to_string()
    }
}

impl Stylize for String {
    fn muted(&self) -> String {
        self.as_str().muted()
    }

    fn emphasis(&self) -> String {
        self.as_str().emphasis()
    }

    fn accent(&self) -> String {
        self.as_str().accent()
    }

    fn success(&self) -> String {
        self.as_str().success()
    }

    fn warn(&self) -> String {
        self.as_str().warn()
    }
}

/// Green check mark
pub fn check() -> String {
    "✓".green().to_string()
}

/// Spinner style used while loading catalogs
pub fn spinner_style() -> ProgressStyle {
    ProgressStyle::with_template("{spinner} {msg}").unwrap_or_else(|_| ProgressStyle::default_spinner())
}
