use std::path::PathBuf;
use std::sync::Arc;

use adlens_core::error::{ConfigError, Result};
use adlens_core::model::ChatModel;
use tracing::{debug, info};

use crate::analyzer::{analyze_comments, analyze_creative, decode_creative_image};
use crate::corpus::CorpusResolver;
use crate::prompts::PromptStore;
use crate::strategist::{self, NO_ANALYSIS_ERROR};
use crate::types::{Cohort, PipelineMode, PipelineResult, Platform, TargetGroup};
use crate::reviser;

/// The audience-panel pipeline with its wired collaborators.
///
/// The gateway is configured once at startup and shared read-only across
/// requests; a missing API key keeps the process alive but fails every
/// analysis run with a configuration error.
#[derive(Clone)]
pub struct Pipeline {
    gateway: Option<Arc<dyn ChatModel>>,
    prompts: PromptStore,
    corpus: CorpusResolver,
}

impl Pipeline {
    pub fn new(
        gateway: Option<Arc<dyn ChatModel>>,
        prompts: PromptStore,
        fixture_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            gateway,
            prompts,
            corpus: CorpusResolver::new(fixture_dir),
        }
    }

    /// Replace the corpus resolver (tests shorten its scrape timeout).
    pub fn with_corpus_resolver(mut self, corpus: CorpusResolver) -> Self {
        self.corpus = corpus;
        self
    }

    fn gateway(&self) -> Result<&dyn ChatModel> {
        match &self.gateway {
            Some(g) => Ok(g.as_ref()),
            None => Err(ConfigError::MissingApiKey.into()),
        }
    }

    /// Post-launch analysis: resolve the comment corpus, run both cohort
    /// personas over it, then synthesize a strategy.
    pub async fn run_post_analysis(
        &self,
        platform: Platform,
        url: Option<&str>,
    ) -> PipelineResult {
        info!(%platform, "starting post-launch analysis");

        let gateway = match self.gateway() {
            Ok(g) => g,
            Err(e) => return PipelineResult::from_error(e.to_string()),
        };

        let corpus = match self.corpus.resolve(gateway, platform, url).await {
            Ok(c) => c,
            Err(e) => return PipelineResult::from_error(e.to_string()),
        };

        let mut results = PipelineResult::default();
        results.youth_analysis =
            analyze_comments(gateway, &self.prompts, platform, Cohort::Youth, &corpus)
                .await
                .text()
                .to_string();
        results.adult_analysis =
            analyze_comments(gateway, &self.prompts, platform, Cohort::Adult, &corpus)
                .await
                .text()
                .to_string();

        self.finish_with_strategist(gateway, results, PipelineMode::Post)
            .await
    }

    /// Pre-launch analysis: run the targeted cohort personas over an
    /// unreleased creative (image + caption), then synthesize a strategy.
    pub async fn run_pre_analysis(
        &self,
        image_b64: &str,
        text_content: &str,
        platform: Platform,
        target: TargetGroup,
    ) -> PipelineResult {
        info!(%platform, ?target, "starting pre-launch analysis");

        let image = match decode_creative_image(image_b64) {
            Ok(i) => i,
            Err(e) => return PipelineResult::from_error(e.to_string()),
        };

        let gateway = match self.gateway() {
            Ok(g) => g,
            Err(e) => return PipelineResult::from_error(e.to_string()),
        };

        let mut results = PipelineResult::default();

        if target.includes(Cohort::Youth) {
            results.youth_analysis =
                analyze_creative(gateway, platform, Cohort::Youth, &image, text_content)
                    .await
                    .text()
                    .to_string();
        } else {
            debug!("youth cohort not targeted");
        }

        if target.includes(Cohort::Adult) {
            results.adult_analysis =
                analyze_creative(gateway, platform, Cohort::Adult, &image, text_content)
                    .await
                    .text()
                    .to_string();
        } else {
            debug!("adult cohort not targeted");
        }

        self.finish_with_strategist(gateway, results, PipelineMode::Pre)
            .await
    }

    /// Rewrite a caption per strategic suggestions. Terminal failures
    /// propagate to the caller.
    pub async fn apply_suggestions(&self, content: &str, suggestions: &str) -> Result<String> {
        let gateway = self.gateway()?;
        reviser::apply_suggestions(gateway, content, suggestions).await
    }

    async fn finish_with_strategist(
        &self,
        gateway: &dyn ChatModel,
        mut results: PipelineResult,
        mode: PipelineMode,
    ) -> PipelineResult {
        if !results.has_any_analysis() {
            results.error = Some(NO_ANALYSIS_ERROR.to_string());
            return results;
        }

        match strategist::synthesize(
            gateway,
            &self.prompts,
            mode,
            &results.youth_analysis,
            &results.adult_analysis,
        )
        .await
        {
            Ok(strategy) => results.strategy = strategy,
            Err(e) => results.error = Some(e.to_string()),
        }

        results
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    use adlens_core::error::{AdlensError, GatewayError};
    use adlens_core::message::Message;
    use adlens_core::model::{CallOptions, ChatResult};
    use async_trait::async_trait;

    const PNG_B64: &str = "iVBORw0KGgo=";

    /// Scripted gateway: replays queued replies in call order and records
    /// the system instruction of every call.
    struct ScriptedGateway {
        replies: Mutex<VecDeque<std::result::Result<String, String>>>,
        systems: Mutex<Vec<String>>,
    }

    impl ScriptedGateway {
        fn new(replies: Vec<std::result::Result<String, String>>) -> Arc<Self> {
            Arc::new(Self {
                replies: Mutex::new(replies.into()),
                systems: Mutex::new(Vec::new()),
            })
        }

        fn call_count(&self) -> usize {
            self.systems.lock().unwrap().len()
        }

        fn systems(&self) -> Vec<String> {
            self.systems.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl ChatModel for ScriptedGateway {
        async fn generate(
            &self,
            messages: &[Message],
            _options: &CallOptions,
        ) -> Result<ChatResult> {
            let system = messages
                .first()
                .map(|m| m.content())
                .unwrap_or_default();
            self.systems.lock().unwrap().push(system);

            let reply = self
                .replies
                .lock()
                .unwrap()
                .pop_front()
                .expect("gateway called more times than scripted");
            match reply {
                Ok(text) => Ok(ChatResult {
                    message: Message::ai(text),
                    usage: None,
                }),
                Err(msg) => Err(AdlensError::Gateway(GatewayError::ApiRequest(msg))),
            }
        }

        fn model_name(&self) -> &str {
            "scripted"
        }
    }

    struct Fixture {
        _prompts_dir: tempfile::TempDir,
        _data_dir: tempfile::TempDir,
        prompts: PromptStore,
        data_path: PathBuf,
    }

    fn fixture() -> Fixture {
        let prompts_dir = tempfile::tempdir().unwrap();
        for (name, body) in [
            ("analyze_campaign.prompt", "Youth panelist instructions."),
            ("analyze_campaign_30_50.prompt", "Adult panelist instructions."),
            ("analyze_instagram_18_30.prompt", "IG youth instructions."),
            ("analyze_instagram_30_50.prompt", "IG adult instructions."),
            ("negotiate_suggestions.prompt", "Strategist instructions."),
        ] {
            std::fs::write(prompts_dir.path().join(name), body).unwrap();
        }

        let data_dir = tempfile::tempdir().unwrap();
        std::fs::write(
            data_dir.path().join("linkedin_comments.json"),
            r#"[{"user": "A", "comment": "great", "age_group": "18-30"}]"#,
        )
        .unwrap();
        std::fs::write(
            data_dir.path().join("instagram_comments.json"),
            r#"[{"user": "B", "comment": "fire", "age_group": "18-30"}]"#,
        )
        .unwrap();

        let prompts = PromptStore::new(prompts_dir.path());
        let data_path = data_dir.path().to_path_buf();
        Fixture {
            _prompts_dir: prompts_dir,
            _data_dir: data_dir,
            prompts,
            data_path,
        }
    }

    fn pipeline_with(gateway: Arc<ScriptedGateway>, fx: &Fixture) -> Pipeline {
        Pipeline::new(
            Some(gateway as Arc<dyn ChatModel>),
            fx.prompts.clone(),
            &fx.data_path,
        )
    }

    #[tokio::test]
    async fn post_analysis_happy_path() {
        let fx = fixture();
        let gateway = ScriptedGateway::new(vec![
            Ok("youth view".into()),
            Ok("adult view".into()),
            Ok("{\"final_verdict\": \"go\"}".into()),
        ]);
        let pipeline = pipeline_with(gateway.clone(), &fx);

        let result = pipeline.run_post_analysis(Platform::Linkedin, None).await;

        assert_eq!(result.youth_analysis, "youth view");
        assert_eq!(result.adult_analysis, "adult view");
        assert_eq!(result.strategy, "{\"final_verdict\": \"go\"}");
        assert!(result.error.is_none());
        assert_eq!(gateway.call_count(), 3);

        let systems = gateway.systems();
        assert_eq!(systems[0], "Youth panelist instructions.");
        assert_eq!(systems[1], "Adult panelist instructions.");
        assert!(systems[2].starts_with("Strategist instructions."));
    }

    #[tokio::test]
    async fn post_analysis_single_cohort_failure_still_synthesizes() {
        let fx = fixture();
        let gateway = ScriptedGateway::new(vec![
            Err("youth agent down".into()),
            Ok("adult view".into()),
            Ok("strategy text".into()),
        ]);
        let pipeline = pipeline_with(gateway.clone(), &fx);

        let result = pipeline.run_post_analysis(Platform::Linkedin, None).await;

        assert_eq!(result.youth_analysis, "");
        assert_eq!(result.adult_analysis, "adult view");
        assert_eq!(result.strategy, "strategy text");
        assert!(result.error.is_none());
        assert_eq!(gateway.call_count(), 3);
    }

    #[tokio::test]
    async fn post_analysis_both_cohorts_failing_skips_strategist() {
        let fx = fixture();
        let gateway = ScriptedGateway::new(vec![
            Err("down".into()),
            Err("down".into()),
        ]);
        let pipeline = pipeline_with(gateway.clone(), &fx);

        let result = pipeline.run_post_analysis(Platform::Linkedin, None).await;

        assert_eq!(result.error.as_deref(), Some(NO_ANALYSIS_ERROR));
        assert!(result.strategy.is_empty());
        // Two cohort calls only; the strategist was never invoked.
        assert_eq!(gateway.call_count(), 2);
    }

    #[tokio::test]
    async fn post_analysis_strategist_failure_sets_error() {
        let fx = fixture();
        let gateway = ScriptedGateway::new(vec![
            Ok("youth view".into()),
            Ok("adult view".into()),
            Err("quota".into()),
        ]);
        let pipeline = pipeline_with(gateway.clone(), &fx);

        let result = pipeline.run_post_analysis(Platform::Linkedin, None).await;

        assert!(result.error.as_deref().unwrap().contains("quota"));
        assert!(result.strategy.is_empty());
        // Partial analyses are kept alongside the error.
        assert_eq!(result.youth_analysis, "youth view");
    }

    #[tokio::test]
    async fn post_analysis_missing_fixture_aborts_early() {
        let fx = fixture();
        let gateway = ScriptedGateway::new(vec![]);
        let empty_dir = tempfile::tempdir().unwrap();
        let pipeline = Pipeline::new(
            Some(gateway.clone() as Arc<dyn ChatModel>),
            fx.prompts.clone(),
            empty_dir.path(),
        );

        let result = pipeline.run_post_analysis(Platform::Instagram, None).await;

        assert_eq!(
            result.error.as_deref(),
            Some("Data file not found: instagram_comments.json")
        );
        assert_eq!(gateway.call_count(), 0);
    }

    #[tokio::test]
    async fn post_analysis_demo_url_uses_fixture() {
        let fx = fixture();
        let gateway = ScriptedGateway::new(vec![
            Ok("y".into()),
            Ok("a".into()),
            Ok("s".into()),
        ]);
        let pipeline = pipeline_with(gateway.clone(), &fx);

        let result = pipeline
            .run_post_analysis(Platform::Linkedin, Some("demo"))
            .await;

        assert!(result.error.is_none());
        // Fixture path: exactly three gateway calls, none for synthesis of
        // a comment corpus.
        assert_eq!(gateway.call_count(), 3);
    }

    #[tokio::test]
    async fn missing_api_key_fails_with_config_error() {
        let fx = fixture();
        let pipeline = Pipeline::new(None, fx.prompts.clone(), &fx.data_path);

        let result = pipeline.run_post_analysis(Platform::Linkedin, None).await;

        assert_eq!(
            result.error.as_deref(),
            Some("GEMINI_API_KEY or GOOGLE_API_KEY environment variable not set")
        );
    }

    #[tokio::test]
    async fn pre_analysis_happy_path() {
        let fx = fixture();
        let gateway = ScriptedGateway::new(vec![
            Ok("cool".into()),
            Ok("trustworthy".into()),
            Ok("{\"pros_cons\": {}}".into()),
        ]);
        let pipeline = pipeline_with(gateway.clone(), &fx);

        let result = pipeline
            .run_pre_analysis(PNG_B64, "New launch!", Platform::Linkedin, TargetGroup::All)
            .await;

        assert_eq!(result.youth_analysis, "cool");
        assert_eq!(result.adult_analysis, "trustworthy");
        assert_eq!(result.strategy, "{\"pros_cons\": {}}");
        assert!(result.error.is_none());

        let systems = gateway.systems();
        assert!(systems[0].contains("Gen-Z digital native"));
        assert!(systems[1].contains("working professional"));
    }

    #[tokio::test]
    async fn pre_analysis_invalid_image_aborts() {
        let fx = fixture();
        let gateway = ScriptedGateway::new(vec![]);
        let pipeline = pipeline_with(gateway.clone(), &fx);

        let result = pipeline
            .run_pre_analysis("!!!", "caption", Platform::Linkedin, TargetGroup::All)
            .await;

        assert!(result.error.as_deref().unwrap().contains("Invalid image data"));
        assert_eq!(gateway.call_count(), 0);
    }

    #[tokio::test]
    async fn pre_analysis_targets_single_cohort() {
        let fx = fixture();
        let gateway = ScriptedGateway::new(vec![
            Ok("youth only".into()),
            Ok("strategy".into()),
        ]);
        let pipeline = pipeline_with(gateway.clone(), &fx);

        let result = pipeline
            .run_pre_analysis(PNG_B64, "caption", Platform::Instagram, TargetGroup::Youth)
            .await;

        assert_eq!(result.youth_analysis, "youth only");
        assert_eq!(result.adult_analysis, "");
        assert_eq!(result.strategy, "strategy");
        // One cohort call plus the strategist.
        assert_eq!(gateway.call_count(), 2);
    }

    #[tokio::test]
    async fn apply_suggestions_passes_through_gateway_text() {
        let fx = fixture();
        let gateway = ScriptedGateway::new(vec![Ok("{\"new_content\": \"x\"}".into())]);
        let pipeline = pipeline_with(gateway.clone(), &fx);

        let out = pipeline
            .apply_suggestions("caption", "be concise")
            .await
            .unwrap();
        assert_eq!(out, "{\"new_content\": \"x\"}");
    }

    #[tokio::test]
    async fn apply_suggestions_without_key_is_config_error() {
        let fx = fixture();
        let pipeline = Pipeline::new(None, fx.prompts.clone(), &fx.data_path);

        let err = pipeline
            .apply_suggestions("caption", "tips")
            .await
            .unwrap_err();
        assert!(err.to_string().contains("GEMINI_API_KEY"));
    }
}
