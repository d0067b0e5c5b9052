use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Aggregate counts derived from a snapshot's file listing. BTreeMap keeps
/// the serialized key order stable across runs.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CodeMetrics {
    pub total_files: usize,
    pub total_size_bytes: u64,
    pub languages_breakdown: BTreeMap<String, usize>,
    pub file_types: BTreeMap<String, usize>,
}
