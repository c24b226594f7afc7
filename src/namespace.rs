// Copyright (c) 2026 Nikolay Denev <ndenev@gmail.com>
// SPDX-License-Identifier: BSD-3-Clause

//! Namespace metadata lookup
//!
//! Reads the pod security admission enforcement level off a namespace's
//! labels. Cluster access sits behind [`NamespaceMetadataSource`] so the
//! lookup logic is testable without a live API server; transport behavior
//! (timeouts, cancellation) belongs to the source implementation.

use anyhow::{Context, Result};
use async_trait::async_trait;
use k8s_openapi::api::core::v1::Namespace;
use kube::{Api, Client};
use tracing::debug;

use crate::labels::LabelSet;

/// Well-known label carrying a namespace's pod security enforcement level.
pub const POD_SECURITY_ENFORCE_LABEL: &str = "pod-security.kubernetes.io/enforce";

/// Source of namespace label metadata.
#[async_trait]
pub trait NamespaceMetadataSource {
    /// Fetch the labels of the named namespace.
    ///
    /// Returns `Ok(None)` when the namespace does not exist. Transient
    /// fetch failures are errors, never treated as absence.
    async fn namespace_labels(&self, name: &str) -> Result<Option<LabelSet>>;
}

/// Namespace metadata source backed by a live cluster connection.
pub struct KubeNamespaceSource {
    client: Client,
}

impl KubeNamespaceSource {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl NamespaceMetadataSource for KubeNamespaceSource {
    async fn namespace_labels(&self, name: &str) -> Result<Option<LabelSet>> {
        let api: Api<Namespace> = Api::all(self.client.clone());
        let namespace = api
            .get_opt(name)
            .await
            .with_context(|| format!("Failed to fetch namespace '{}'", name))?;
        Ok(namespace.map(|ns| ns.metadata.labels.unwrap_or_default()))
    }
}

/// Look up the pod security enforcement level of a namespace.
///
/// Returns `Some(value)` when the enforce label is set. The value may be
/// the empty string, which is distinct from `None` for an unset label or a
/// namespace that doesn't exist. Fetch failures propagate.
pub async fn pod_security_enforce_level<S>(source: &S, namespace: &str) -> Result<Option<String>>
where
    S: NamespaceMetadataSource + ?Sized,
{
    let Some(labels) = source.namespace_labels(namespace).await? else {
        debug!(namespace = %namespace, "Namespace not found");
        return Ok(None);
    };

    let level = labels.get(POD_SECURITY_ENFORCE_LABEL).cloned();
    debug!(
        namespace = %namespace,
        level = ?level,
        "Looked up pod security enforcement level"
    );

    Ok(level)
}
