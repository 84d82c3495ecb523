//! The audit pipeline: prompt construction, one model call, normalization.

use crate::analysis::RepoAnalysis;
use crate::error::{AuditError, Result};
use crate::extract::extract_json;
use crate::gemini::ModelBackend;

/// Persona and output contract given to the model once per call, separate
/// from the per-repository prompt.
pub const SYSTEM_INSTRUCTION: &str = r#"You are "Repository Mirror", an elite AI code auditor and career mentor.
Your task is to analyze GitHub repositories to provide a harsh but fair professional evaluation.
You must use the Google Search tool to find information about the provided repository URL if you cannot access it directly, or infer structure from standard patterns if the URL is well-known or detailed in the prompt.

Analyze based on these dimensions:
1. Code Quality & Readability (Linting, complexity, naming)
2. Project Structure (Organization, separation of concerns)
3. Documentation (README, comments, wiki)
4. Testing (Coverage, presence of CI/CD)
5. Consistency (Commits, version control)
6. Real-world Relevance (Modern stack, utility)

OUTPUT FORMAT:
Return a raw JSON object. Do not wrap it in markdown code blocks. Do not include any conversational text, warnings, or disclaimers outside the JSON object.
The JSON must strictly match this structure:
{
  "score": number (0-100),
  "level": "Beginner" | "Intermediate" | "Advanced" | "Elite",
  "summary": string,
  "metrics": [ { "name": string, "score": number, "fullMark": number } ],
  "roadmap": [ { "title": string, "description": string, "priority": "High" | "Medium" | "Low" } ],
  "techStack": string[],
  "strengths": string[],
  "weaknesses": string[]
}
"#;

/// Per-call instruction embedding the target URL.
pub fn build_prompt(repo_url: &str) -> String {
    format!(
        "Analyze the GitHub repository at this URL: {repo_url}\n\
         \n\
         If the repository is real and public, search for its details, readme content, and structure.\n\
         If it is a hypothetical example or you cannot find it, perform a best-effort analysis based on \
         what a repository with that name/context usually contains, but strictly flag it in the summary \
         if you are making assumptions.\n\
         \n\
         Provide:\n\
         1. A simplified overall score (0-100).\n\
         2. A difficulty level (Beginner, Intermediate, Advanced, Elite).\n\
         3. A professional executive summary (2-3 sentences).\n\
         4. Key metrics (0-10 scale) for: Code Quality, Documentation, Structure, Testing, Innovation.\n\
         5. A personalized roadmap of 3-5 actionable steps to improve the repo.\n\
         6. Detected Tech Stack.\n\
         7. Top 3 Strengths and Top 3 Weaknesses."
    )
}

/// Drives exactly one model call per analysis and normalizes the reply.
pub struct Auditor<B: ModelBackend> {
    backend: B,
}

impl<B: ModelBackend> Auditor<B> {
    pub fn new(backend: B) -> Self {
        Self { backend }
    }

    /// Audit one repository URL. Exactly one outbound call, no retries.
    pub async fn analyze(&self, repo_url: &str) -> Result<RepoAnalysis> {
        let prompt = build_prompt(repo_url);

        let reply = self
            .backend
            .generate(SYSTEM_INSTRUCTION, &prompt)
            .await
            .map_err(|err| {
                tracing::error!(%err, repo_url, "model call failed");
                err
            })?;

        if reply.text.trim().is_empty() {
            tracing::error!(repo_url, "model returned no text content");
            return Err(AuditError::EmptyResponse);
        }

        let value = extract_json(&reply.text)?;

        let mut analysis: RepoAnalysis = serde_json::from_value(value).map_err(|err| {
            tracing::error!(%err, repo_url, "reply JSON does not match the audit schema");
            AuditError::MalformedResponse {
                detail: format!("reply JSON does not match the audit schema: {err}"),
            }
        })?;

        analysis.sources = reply.sources;
        Ok(analysis)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::{Level, Source};
    use crate::gemini::ModelReply;
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Records every call and hands back a canned reply.
    struct MockBackend {
        reply: Result<ModelReply>,
        calls: Mutex<Vec<String>>,
    }

    impl MockBackend {
        fn with_text(text: &str) -> Self {
            Self {
                reply: Ok(ModelReply {
                    text: text.to_string(),
                    sources: Vec::new(),
                }),
                calls: Mutex::new(Vec::new()),
            }
        }

        fn call_count(&self) -> usize {
            self.calls.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl ModelBackend for MockBackend {
        async fn generate(&self, _system_instruction: &str, prompt: &str) -> Result<ModelReply> {
            self.calls.lock().unwrap().push(prompt.to_string());
            match &self.reply {
                Ok(reply) => Ok(reply.clone()),
                Err(AuditError::MissingCredential) => Err(AuditError::MissingCredential),
                Err(err) => Err(AuditError::Transport {
                    message: err.to_string(),
                }),
            }
        }
    }

    const FULL_REPLY: &str = r#"{
        "score": 92,
        "level": "Elite",
        "summary": "Industry-defining UI library with exemplary engineering discipline.",
        "metrics": [
            { "name": "Code Quality", "score": 9, "fullMark": 10 },
            { "name": "Documentation", "score": 10, "fullMark": 10 },
            { "name": "Structure", "score": 9, "fullMark": 10 },
            { "name": "Testing", "score": 10, "fullMark": 10 },
            { "name": "Innovation", "score": 9, "fullMark": 10 }
        ],
        "roadmap": [
            { "title": "Trim legacy APIs", "description": "Deprecate remaining class-component paths.", "priority": "Medium" },
            { "title": "Speed up CI", "description": "Shard the slowest suites.", "priority": "High" },
            { "title": "Contributor docs", "description": "Document the fiber internals.", "priority": "Low" }
        ],
        "techStack": ["JavaScript"],
        "strengths": ["testing culture", "documentation", "architecture"],
        "weaknesses": ["repo size", "build complexity", "steep internals"]
    }"#;

    #[tokio::test]
    async fn one_call_with_the_url_in_the_prompt() {
        let backend = MockBackend::with_text(FULL_REPLY);
        let auditor = Auditor::new(backend);

        let analysis = auditor
            .analyze("https://github.com/facebook/react")
            .await
            .unwrap();

        assert_eq!(analysis.score, 92.0);
        assert_eq!(analysis.level, Level::Elite);
        assert_eq!(analysis.metrics.len(), 5);

        let calls = auditor.backend.calls.lock().unwrap();
        assert_eq!(calls.len(), 1);
        assert!(calls[0].contains("https://github.com/facebook/react"));
    }

    #[tokio::test]
    async fn reply_wrapped_in_prose_still_parses() {
        let wrapped = format!("Sure, here is the audit:\n{FULL_REPLY}\nLet me know!");
        let backend = MockBackend::with_text(&wrapped);
        let auditor = Auditor::new(backend);

        let analysis = auditor.analyze("https://github.com/x/y").await.unwrap();
        assert_eq!(analysis.score, 92.0);
    }

    #[tokio::test]
    async fn empty_text_is_empty_response() {
        let backend = MockBackend::with_text("   \n ");
        let auditor = Auditor::new(backend);

        let err = auditor.analyze("https://github.com/x/y").await.unwrap_err();
        assert!(matches!(err, AuditError::EmptyResponse));
    }

    #[tokio::test]
    async fn valid_json_with_wrong_shape_is_malformed() {
        let backend = MockBackend::with_text(r#"{"totally": "unrelated"}"#);
        let auditor = Auditor::new(backend);

        let err = auditor.analyze("https://github.com/x/y").await.unwrap_err();
        assert!(matches!(err, AuditError::MalformedResponse { .. }));
    }

    #[tokio::test]
    async fn missing_credential_means_no_further_processing() {
        let backend = MockBackend {
            reply: Err(AuditError::MissingCredential),
            calls: Mutex::new(Vec::new()),
        };
        let auditor = Auditor::new(backend);

        let err = auditor.analyze("https://github.com/x/y").await.unwrap_err();
        assert!(matches!(err, AuditError::MissingCredential));
        assert_eq!(auditor.backend.call_count(), 1);
    }

    #[tokio::test]
    async fn grounding_sources_are_merged_into_the_result() {
        let backend = MockBackend {
            reply: Ok(ModelReply {
                text: FULL_REPLY.to_string(),
                sources: vec![Source {
                    title: "facebook/react".to_string(),
                    uri: "https://github.com/facebook/react".to_string(),
                }],
            }),
            calls: Mutex::new(Vec::new()),
        };
        let auditor = Auditor::new(backend);

        let analysis = auditor
            .analyze("https://github.com/facebook/react")
            .await
            .unwrap();
        assert_eq!(analysis.sources.len(), 1);
        assert_eq!(analysis.sources[0].title, "facebook/react");
    }

    #[test]
    fn prompt_embeds_the_exact_url() {
        let prompt = build_prompt("https://github.com/rust-lang/rust");
        assert!(prompt.contains("https://github.com/rust-lang/rust"));
        assert!(prompt.contains("0-100"));
        assert!(prompt.contains("3-5 actionable steps"));
    }
}
