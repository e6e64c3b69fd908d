use serde::{Deserialize, Serialize};

/// Structured description of an uploaded episode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub topic: String,
    pub mood: String,
    pub genre: String,
    pub audience: String,
    pub keywords: Vec<String>,
}

impl AnalysisResult {
    /// Canned result returned in offline mode.
    pub fn offline_sample() -> Self {
        Self {
            topic: "דוגמה: פודקאסט על טכנולוגיה".to_string(),
            mood: "energetic".to_string(),
            genre: "technology".to_string(),
            audience: "Developers and tech enthusiasts".to_string(),
            keywords: vec!["tech".to_string(), "ai".to_string(), "dev".to_string()],
        }
    }
}
