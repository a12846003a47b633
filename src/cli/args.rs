// Copyright (c) 2025 Nikolay Denev <ndenev@gmail.com>
// SPDX-License-Identifier: BSD-3-Clause

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

#[derive(Parser, Debug)]
#[command(name = "pdbmap")]
#[command(
    author,
    version,
    about = "Map PodDisruptionBudgets to the workloads they protect"
)]
pub struct Args {
    /// Path to the certsuite claim file (claim.json)
    #[arg(long, value_name = "PATH")]
    pub claim: PathBuf,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub output: OutputFormat,

    /// Omit column headers in output
    #[arg(long)]
    pub no_headers: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

#[derive(ValueEnum, Clone, Debug, Default)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
    Csv,
    Yaml,
}
