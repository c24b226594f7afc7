// Copyright (c) 2026 Nikolay Denev <ndenev@gmail.com>
// SPDX-License-Identifier: BSD-3-Clause

//! Label selector change detection for Kubernetes controllers
//!
//! When a resource's labels are mutated, a controller needs to know whether
//! a label selector's matching outcome for that resource could have
//! changed; that decides whether a reconciliation can be skipped. The
//! [`detector`] module answers exactly that question. The [`selector`]
//! module provides the compile/evaluate machinery behind it, and
//! [`namespace`] reads the pod security enforcement level off namespace
//! metadata.

pub mod detector;
pub mod error;
pub mod labels;
pub mod namespace;
pub mod selector;

pub use detector::label_selection_has_changed;
pub use error::{CompileError, ParseError};
pub use labels::{LabelSet, parse_label_set};
pub use namespace::{
    KubeNamespaceSource, NamespaceMetadataSource, POD_SECURITY_ENFORCE_LABEL,
    pod_security_enforce_level,
};
pub use selector::{RawSelector, Requirement, Selector};
