use ratatui::widgets::ListState;
use tokio::task::JoinHandle;

use crate::analysis::RepoAnalysis;
use crate::auditor::Auditor;
use crate::config::Config;
use crate::error::AuditError;
use crate::gemini::GeminiBackend;
use crate::state::AnalysisState;

/// Cosmetic progress log shown while the model call is in flight. The lines
/// are revealed on a timer and have no relationship to real progress.
pub const LOADER_MESSAGES: &[&str] = &[
    "Connecting to GitHub gateway...",
    "Cloning repository metadata...",
    "Analyzing file structure...",
    "Running static code analysis...",
    "Checking test coverage reports...",
    "Parsing README and documentation...",
    "Evaluating commit history patterns...",
    "Generating final scorecard...",
];

pub struct App {
    // Core state
    pub should_quit: bool,
    pub state: AnalysisState,

    // URL input
    pub url_input: String,
    pub url_cursor: usize, // cursor position in chars

    // In-flight analysis. `generation` increments on every submit and on
    // abandon, so a reply from an older request can never overwrite newer
    // state.
    pub generation: u64,
    pub task_generation: u64,
    pub analysis_task: Option<JoinHandle<Result<RepoAnalysis, AuditError>>>,

    // Animation state
    pub tick_count: u32,
    pub loader_step: usize,

    // Dashboard state
    pub roadmap_state: ListState,
    pub notice: Option<String>,

    pub backend: GeminiBackend,
}

impl App {
    pub fn new(config: &Config) -> Self {
        Self {
            should_quit: false,
            state: AnalysisState::Idle,
            url_input: String::new(),
            url_cursor: 0,
            generation: 0,
            task_generation: 0,
            analysis_task: None,
            tick_count: 0,
            loader_step: 0,
            roadmap_state: ListState::default(),
            notice: None,
            backend: GeminiBackend::from_config(config),
        }
    }

    /// Submit the current URL for analysis. No-op unless idle with a
    /// non-empty URL.
    pub fn submit(&mut self) {
        let repo_url = self.url_input.trim().to_string();
        if !self.state.begin(&repo_url) {
            return;
        }

        self.notice = None;
        self.loader_step = 0;
        self.tick_count = 0;
        self.generation += 1;
        self.task_generation = self.generation;

        tracing::info!(%repo_url, generation = self.generation, "analysis started");

        let auditor = Auditor::new(self.backend.clone());
        self.analysis_task = Some(tokio::spawn(
            async move { auditor.analyze(&repo_url).await },
        ));
    }

    /// Return from a terminal state to the input screen. The URL text is
    /// kept so a retry can resubmit or edit it.
    pub fn reset(&mut self) {
        self.state.reset();
        self.roadmap_state.select(None);
        self.notice = None;
        self.url_cursor = self.url_input.chars().count();
    }

    /// Walk away from an in-flight request. The task keeps running detached;
    /// bumping the generation guarantees its eventual reply is discarded.
    pub fn abandon(&mut self) {
        if !self.state.is_loading() {
            return;
        }
        self.generation += 1;
        self.analysis_task = None;
        self.state.reset();
        tracing::info!("analysis abandoned; any late reply will be discarded");
    }

    /// Collect a finished analysis task, if any. Called from the event loop
    /// every pass; cheap when nothing is pending.
    pub async fn harvest(&mut self) {
        if !self
            .analysis_task
            .as_ref()
            .is_some_and(|task| task.is_finished())
        {
            return;
        }
        let Some(task) = self.analysis_task.take() else {
            return;
        };

        let generation = self.task_generation;
        let outcome = match task.await {
            Ok(result) => result.map_err(|err| err.to_string()),
            Err(err) => Err(format!("Analysis task failed: {err}")),
        };

        self.apply_result(generation, outcome);
    }

    /// Apply a completed analysis, unless it belongs to an older generation.
    pub fn apply_result(&mut self, generation: u64, outcome: Result<RepoAnalysis, String>) {
        if generation != self.generation {
            tracing::debug!(
                generation,
                current = self.generation,
                "discarding stale analysis result"
            );
            return;
        }

        if let Err(message) = &outcome {
            tracing::error!(%message, "analysis failed");
        }

        self.state.finish(outcome);

        if let Some(analysis) = self.state.analysis() {
            if !analysis.roadmap.is_empty() {
                self.roadmap_state.select(Some(0));
            }
        }
    }

    /// Advance the loading animation (called on Tick, every ~300ms).
    pub fn tick_animation(&mut self) {
        if self.state.is_loading() {
            self.tick_count = self.tick_count.wrapping_add(1);
            // Reveal the next loader line roughly every 600ms
            if self.tick_count % 2 == 0 && self.loader_step < LOADER_MESSAGES.len() {
                self.loader_step += 1;
            }
        }
    }

    // Roadmap navigation (success view)
    pub fn roadmap_next(&mut self) {
        let len = self
            .state
            .analysis()
            .map(|a| a.roadmap.len())
            .unwrap_or(0);
        if len > 0 {
            let i = self.roadmap_state.selected().unwrap_or(0);
            self.roadmap_state.select(Some((i + 1).min(len - 1)));
        }
    }

    pub fn roadmap_prev(&mut self) {
        let i = self.roadmap_state.selected().unwrap_or(0);
        self.roadmap_state.select(Some(i.saturating_sub(1)));
    }

    /// Action stub: the key exists, the feature does not.
    pub fn export_roadmap(&mut self) {
        if self.state.analysis().is_some() {
            self.notice = Some("Roadmap export is not implemented yet.".to_string());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_analysis() -> RepoAnalysis {
        serde_json::from_str(
            r#"{
                "score": 92, "level": "Elite", "summary": "s",
                "metrics": [], "techStack": [],
                "roadmap": [{ "title": "t", "description": "d", "priority": "High" }],
                "strengths": [], "weaknesses": []
            }"#,
        )
        .unwrap()
    }

    fn app() -> App {
        App::new(&Config::new())
    }

    #[tokio::test]
    async fn submit_moves_to_loading_and_spawns_one_task() {
        let mut app = app();
        app.url_input = "https://github.com/facebook/react".to_string();

        app.submit();

        assert!(app.state.is_loading());
        assert!(app.analysis_task.is_some());
        assert_eq!(app.generation, 1);

        // loading accepts no new submissions
        app.submit();
        assert_eq!(app.generation, 1);
    }

    #[tokio::test]
    async fn empty_url_does_not_submit() {
        let mut app = app();
        app.url_input = "   ".to_string();
        app.submit();
        assert!(app.state.is_idle());
        assert!(app.analysis_task.is_none());
    }

    #[test]
    fn matching_generation_resolves_the_state() {
        let mut app = app();
        app.state = AnalysisState::Loading;
        app.generation = 1;
        app.task_generation = 1;

        app.apply_result(1, Ok(sample_analysis()));
        assert_eq!(app.state.analysis().unwrap().score, 92.0);
        assert_eq!(app.roadmap_state.selected(), Some(0));
    }

    #[test]
    fn rejected_call_lands_in_error_with_the_message() {
        let mut app = app();
        app.state = AnalysisState::Loading;
        app.generation = 1;

        app.apply_result(1, Err("Model call failed: boom".to_string()));
        assert_eq!(app.state.error_message(), Some("Model call failed: boom"));
    }

    #[test]
    fn stale_generation_is_discarded() {
        let mut app = app();
        app.state = AnalysisState::Loading;
        app.generation = 2;

        app.apply_result(1, Ok(sample_analysis()));
        assert!(app.state.is_loading());
    }

    #[test]
    fn abandon_invalidates_the_in_flight_request() {
        let mut app = app();
        app.state = AnalysisState::Loading;
        app.generation = 1;
        app.task_generation = 1;

        app.abandon();
        assert!(app.state.is_idle());

        // the late reply from generation 1 must not resurrect anything
        app.apply_result(1, Ok(sample_analysis()));
        assert!(app.state.is_idle());
    }

    #[test]
    fn reset_returns_to_idle_and_keeps_the_url() {
        let mut app = app();
        app.url_input = "https://github.com/x/y".to_string();
        app.state = AnalysisState::Success(sample_analysis());
        app.roadmap_state.select(Some(0));

        app.reset();
        assert!(app.state.is_idle());
        assert!(app.roadmap_state.selected().is_none());
        assert_eq!(app.url_input, "https://github.com/x/y");
    }

    #[test]
    fn loader_lines_only_advance_while_loading() {
        let mut app = app();
        app.tick_animation();
        assert_eq!(app.loader_step, 0);

        app.state = AnalysisState::Loading;
        for _ in 0..4 {
            app.tick_animation();
        }
        assert_eq!(app.loader_step, 2);

        for _ in 0..100 {
            app.tick_animation();
        }
        assert_eq!(app.loader_step, LOADER_MESSAGES.len());
    }

    #[test]
    fn export_is_a_stub_that_only_posts_a_notice() {
        let mut app = app();
        app.export_roadmap();
        assert!(app.notice.is_none());

        app.state = AnalysisState::Success(sample_analysis());
        app.export_roadmap();
        assert_eq!(
            app.notice.as_deref(),
            Some("Roadmap export is not implemented yet.")
        );
    }
}
