// Copyright (c) 2026 Nikolay Denev <ndenev@gmail.com>
// SPDX-License-Identifier: BSD-3-Clause

//! Command handlers for the labeldrift binary

mod args;

pub use args::{Args, Command, OutputFormat};

use std::time::Duration;

use anyhow::{Context, Result};
use kube::config::KubeConfigOptions;
use kube::{Client, Config};
use serde::Serialize;

use labeldrift::{
    KubeNamespaceSource, Selector, label_selection_has_changed, parse_label_set,
    pod_security_enforce_level,
};

/// Timeout for connecting to the K8s API
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Timeout for reading K8s API responses
const READ_TIMEOUT: Duration = Duration::from_secs(30);

pub async fn run(args: Args) -> Result<()> {
    match args.command {
        Command::Changed { old, new, selector } => changed(&old, &new, &selector, &args.output),
        Command::Match { labels, selector } => evaluate(&labels, &selector, &args.output),
        Command::PodSecurity { namespace, context } => {
            pod_security(&namespace, context.as_deref(), &args.output).await
        }
    }
}

#[derive(Debug, Serialize)]
struct ChangedReport {
    selector: String,
    changed: bool,
}

fn changed(old: &str, new: &str, selector: &str, output: &OutputFormat) -> Result<()> {
    let old = parse_label_set(old).context("Failed to parse --old labels")?;
    let new = parse_label_set(new).context("Failed to parse --new labels")?;

    let changed = label_selection_has_changed(&old, &new, selector)?;

    match output {
        OutputFormat::Text => println!("{}", if changed { "changed" } else { "unchanged" }),
        OutputFormat::Json => {
            let report = ChangedReport {
                selector: selector.to_string(),
                changed,
            };
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
    }
    Ok(())
}

#[derive(Debug, Serialize)]
struct MatchReport {
    selector: String,
    matched: bool,
}

fn evaluate(labels: &str, selector: &str, output: &OutputFormat) -> Result<()> {
    let labels = parse_label_set(labels).context("Failed to parse --labels")?;
    let compiled = Selector::parse(selector)?;

    let matched = compiled.matches(&labels);

    match output {
        OutputFormat::Text => println!("{}", if matched { "match" } else { "no match" }),
        OutputFormat::Json => {
            let report = MatchReport {
                selector: compiled.to_string(),
                matched,
            };
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
    }
    Ok(())
}

#[derive(Debug, Serialize)]
struct PodSecurityReport {
    namespace: String,
    enforce: Option<String>,
}

async fn pod_security(namespace: &str, context: Option<&str>, output: &OutputFormat) -> Result<()> {
    let client = create_client(context).await?;
    let source = KubeNamespaceSource::new(client);

    let enforce = pod_security_enforce_level(&source, namespace).await?;

    match output {
        OutputFormat::Text => match &enforce {
            Some(level) => println!("{}", level),
            None => println!("(not set)"),
        },
        OutputFormat::Json => {
            let report = PodSecurityReport {
                namespace: namespace.to_string(),
                enforce,
            };
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
    }
    Ok(())
}

/// Build a client for the given kubeconfig context, or the current context
/// when none is given.
async fn create_client(context: Option<&str>) -> Result<Client> {
    let mut config = Config::from_kubeconfig(&KubeConfigOptions {
        context: context.map(String::from),
        ..Default::default()
    })
    .await
    .with_context(|| match context {
        Some(ctx) => format!("Failed to load kubeconfig for context '{}'", ctx),
        None => "Failed to load kubeconfig".to_string(),
    })?;

    // Set timeouts for reliability
    config.connect_timeout = Some(CONNECT_TIMEOUT);
    config.read_timeout = Some(READ_TIMEOUT);

    Client::try_from(config).context("Failed to create Kubernetes client")
}
