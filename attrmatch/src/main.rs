/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

use std::path::PathBuf;
use std::process;

use clap::Parser;
use tracing::{error, info, warn};

use attrmatch::bitmap::Bitmap;
use attrmatch::config::IndexConfig;
use attrmatch::index::{self, ApplyMode, AttrCategory};
use attrmatch::logic::LogicMode;
use attrmatch::requirement::FeatureRequirement;

// ── CLI argument definition ───────────────────────────────────────────────────

/// Checks a node's attribute list against a job's feature requirement.
///
/// Example:
///   attrmatch -a "rack1:gpu" -r "rack1 bigmem" -m or -x slow --show-table
#[derive(Debug, Parser)]
#[command(
    name = "attrmatch",
    about = "Attribute index and AND/OR/NOT feature matching",
    long_about = None,
)]
struct Cli {
    /// Path to the YAML attribute index configuration file.
    #[arg(short = 'c', long = "config")]
    config: Option<PathBuf>,

    /// Attribute category the lists belong to.
    #[arg(short = 'k', long = "category", default_value = "node-feature")]
    category: AttrCategory,

    /// Attributes the node provides (e.g. "rack1:gpu").
    #[arg(short = 'a', long = "available", default_value = "")]
    available: String,

    /// Attributes the job requires.
    #[arg(short = 'r', long = "required", default_value = "")]
    required: String,

    /// How required attributes combine: and, or, not.
    #[arg(short = 'm', long = "mode", default_value = "and")]
    mode: LogicMode,

    /// Attributes the node must not match (any one rejects).
    #[arg(short = 'x', long = "excluded")]
    excluded: Option<String>,

    /// Print the category's index table after the check.
    #[arg(long = "show-table", default_value_t = false)]
    show_table: bool,
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() {
    // Level is controlled by the RUST_LOG env-var (e.g. RUST_LOG=debug).
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    info!(
        category = %cli.category,
        mode     = %cli.mode,
        config   = ?cli.config,
        "Configuration"
    );

    // ── Load index configuration ──────────────────────────────────────────────
    let config = match &cli.config {
        Some(path) => match IndexConfig::load_from_file(path) {
            Ok(cfg) => cfg,
            Err(e) => {
                error!("Failed to load index configuration: {:#}", e);
                process::exit(2);
            }
        },
        None => {
            warn!("No index configuration file provided, using default capacities");
            IndexConfig::default()
        }
    };

    let attrs = match index::init_global(&config) {
        Ok(attrs) => attrs,
        Err(e) => {
            error!("Failed to initialise attribute index: {e}");
            process::exit(2);
        }
    };

    // ── Build bitmaps and check ───────────────────────────────────────────────
    let mut available = Bitmap::new();
    let line = &cli.available;
    attrs.parse_list(cli.category, line, ApplyMode::Add, &mut available);

    let requirement = FeatureRequirement::parse(
        attrs,
        cli.category,
        &cli.required,
        cli.mode,
        cli.excluded.as_deref(),
        LogicMode::Or,
    );

    let snapshot = attrs.snapshot(cli.category);
    let result = requirement.check(&available, &snapshot);

    if cli.show_table {
        info!(
            "{} table: {}/{} slot(s) used (version {})",
            cli.category,
            snapshot.len(),
            attrs.capacity(cli.category) - 1,
            snapshot.version(),
        );
        for (i, name) in snapshot.entries() {
            info!("  [{i:>3}] {name}");
        }
        if let Some(name) = attrs.overflow(cli.category) {
            warn!("  first rejected name: {name}");
        }
    }

    match result {
        Ok(()) => {
            info!(
                available = %attrs.render(cli.category, &available, Some(',')),
                "requirement satisfied"
            );
        }
        Err(reason) => {
            info!("requirement rejected: {reason}");
            process::exit(1);
        }
    }
}
