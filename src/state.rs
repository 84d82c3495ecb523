//! UI-agnostic request state machine.
//!
//! One analysis session is a value moving through
//! `Idle -> Loading -> {Success | Error}` and back to `Idle` on an explicit
//! reset. Keeping it as a plain enum (rather than flags scattered across the
//! app) makes every transition unit-testable.

use crate::analysis::RepoAnalysis;

#[derive(Debug, Clone, Default, PartialEq)]
pub enum AnalysisState {
    #[default]
    Idle,
    Loading,
    Success(RepoAnalysis),
    Error(String),
}

impl AnalysisState {
    pub fn is_idle(&self) -> bool {
        matches!(self, AnalysisState::Idle)
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, AnalysisState::Loading)
    }

    /// Begin an analysis. Only legal from `Idle` with a non-empty URL;
    /// returns whether the transition happened.
    pub fn begin(&mut self, repo_url: &str) -> bool {
        if !self.is_idle() || repo_url.trim().is_empty() {
            return false;
        }
        *self = AnalysisState::Loading;
        true
    }

    /// Complete the in-flight analysis. Ignored outside `Loading`.
    pub fn finish(&mut self, outcome: Result<RepoAnalysis, String>) {
        if !self.is_loading() {
            return;
        }
        *self = match outcome {
            Ok(analysis) => AnalysisState::Success(analysis),
            Err(message) => AnalysisState::Error(message),
        };
    }

    /// Back to `Idle`, dropping any held result or error.
    pub fn reset(&mut self) {
        *self = AnalysisState::Idle;
    }

    pub fn analysis(&self) -> Option<&RepoAnalysis> {
        match self {
            AnalysisState::Success(analysis) => Some(analysis),
            _ => None,
        }
    }

    pub fn error_message(&self) -> Option<&str> {
        match self {
            AnalysisState::Error(message) => Some(message),
            _ => None,
        }
    }
}
