//! Audit result types shared between the Gemini layer and the UI.
//!
//! Field names mirror the JSON schema the model is instructed to emit, so
//! the whole reply deserializes directly into [`RepoAnalysis`].

use serde::{Deserialize, Serialize};

/// Ordinal quality tier for the repository as a whole.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Level {
    Beginner,
    Intermediate,
    Advanced,
    Elite,
}

impl Level {
    pub fn as_str(&self) -> &'static str {
        match self {
            Level::Beginner => "Beginner",
            Level::Intermediate => "Intermediate",
            Level::Advanced => "Advanced",
            Level::Elite => "Elite",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Priority {
    High,
    Medium,
    Low,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::High => "High",
            Priority::Medium => "Medium",
            Priority::Low => "Low",
        }
    }
}

/// One named evaluation dimension, scored against a declared maximum.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RepoMetric {
    pub name: String,
    pub score: f64,
    #[serde(rename = "fullMark")]
    pub full_mark: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoadmapStep {
    pub title: String,
    pub description: String,
    pub priority: Priority,
}

/// A grounding citation the model attached to its answer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Source {
    pub title: String,
    pub uri: String,
}

/// The normalized outcome of one audit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RepoAnalysis {
    pub score: f64,
    pub level: Level,
    pub summary: String,
    pub metrics: Vec<RepoMetric>,
    pub roadmap: Vec<RoadmapStep>,
    pub tech_stack: Vec<String>,
    pub strengths: Vec<String>,
    pub weaknesses: Vec<String>,
    /// Not part of the model's JSON reply; merged in from grounding metadata.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sources: Vec<Source>,
}
