//! Printers for `ntree` results and diagnostics
//!
//! Traversals and renderings go to stdout uncolored so they can be piped.
//! Coloring follows NO_COLOR and CLICOLOR unless `color = false` turned it off.

use std::fmt::Display;

use colored::Colorize;

/// Failure line on stderr, prefixed `ntree:`.
pub fn error(msg: &(impl Display + ?Sized)) {
    eprintln!("{} {}", "ntree:".red().bold(), msg);
}

/// Non-fatal condition on stderr, prefixed `note:`.
pub fn note(msg: &(impl Display + ?Sized)) {
    eprintln!("{} {}", "note:".yellow(), msg);
}

/// Title above a TOML listing, written as a comment so the listing stays valid TOML.
pub fn toml_title(title: &(impl Display + ?Sized)) {
    println!("{}", toml_comment(title));
}

pub fn toml_comment(title: &(impl Display + ?Sized)) -> String {
    format!("# {title}")
}

/// Names, renderings and JSON, written as is.
pub fn info(msg: &(impl Display + ?Sized)) {
    println!("{msg}");
}
