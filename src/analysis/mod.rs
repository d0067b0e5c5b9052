pub mod insights;
pub mod language;
pub mod manifests;
pub mod metrics;
