pub mod dependency;
pub mod insight;
pub mod metrics;
pub mod report;
pub mod snapshot;
