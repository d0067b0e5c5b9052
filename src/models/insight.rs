use serde::{Deserialize, Serialize};

/// Natural-language output of the synthesis stage. An empty default stands
/// in when generation fails.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InsightBundle {
    pub summary: String,
    pub insights: Vec<String>,
    pub recommendations: Vec<String>,
}
