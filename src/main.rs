//! Verdant - a static site generator for markdown blogs and digital gardens.

#![allow(dead_code)]

mod cli;
mod config;
mod content;
mod generator;
mod logger;
mod render;
mod utils;

use anyhow::Result;
use clap::{ColorChoice, Parser};
use cli::{Cli, build::build_site};
use utils::plural_count;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set global color override based on CLI option
    match cli.color {
        ColorChoice::Always => owo_colors::set_override(true),
        ColorChoice::Never => owo_colors::set_override(false),
        ColorChoice::Auto => {} // owo-colors auto-detects TTY
    }
    logger::set_verbose(cli.verbose);

    let report = build_site(&cli.root)?;

    if !report.skipped.is_empty() {
        log!("warning"; "{} skipped", plural_count(report.skipped.len(), "file"));
    }
    if report.tag_pages_failed > 0 || report.assets_failed > 0 {
        log!(
            "warning";
            "{} and {} failed",
            plural_count(report.tag_pages_failed, "tag page"),
            plural_count(report.assets_failed, "asset")
        );
    }
    log!(
        "done";
        "{}, {}, {}",
        plural_count(report.posts, "post"),
        plural_count(report.notes, "note"),
        plural_count(report.tags, "tag")
    );
    Ok(())
}
