use serde::{Deserialize, Serialize};

/// Package ecosystem a dependency was declared in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Ecosystem {
    Npm,
    Pip,
    Nuget,
    Other,
}

/// One parsed manifest line. Duplicates across manifests are kept; the
/// record order follows discovery order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DependencyRecord {
    pub name: String,
    pub version: Option<String>,
    pub ecosystem: Ecosystem,
    pub source_file: String,
}
