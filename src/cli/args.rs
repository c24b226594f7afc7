// Copyright (c) 2026 Nikolay Denev <ndenev@gmail.com>
// SPDX-License-Identifier: BSD-3-Clause

use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser, Debug)]
#[command(name = "labeldrift")]
#[command(author, version, about = "Detect Kubernetes label selector outcome changes")]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    pub output: OutputFormat,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Check whether a selector's matching outcome differs between two label sets
    Changed {
        /// Labels before the mutation, as comma-separated key=value pairs
        #[arg(long, value_name = "LABELS")]
        old: String,

        /// Labels after the mutation
        #[arg(long, value_name = "LABELS")]
        new: String,

        /// Label selector expression.
        /// Example: -s "app=nginx,env in (prod,staging)"
        #[arg(short, long)]
        selector: String,
    },

    /// Evaluate a selector against a single label set
    Match {
        /// Labels as comma-separated key=value pairs
        #[arg(long, value_name = "LABELS")]
        labels: String,

        /// Label selector expression
        #[arg(short, long)]
        selector: String,
    },

    /// Print a namespace's pod security enforcement level
    PodSecurity {
        /// Namespace name
        namespace: String,

        /// Kubernetes context to use (defaults to the kubeconfig current context)
        #[arg(short, long, value_name = "CONTEXT")]
        context: Option<String>,
    },
}

#[derive(ValueEnum, Clone, Debug, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}
