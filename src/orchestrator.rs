/// 分類オーケストレータ。
///
/// テキスト経路はカタログ選択 → キーワード分類、画像経路は
/// 登録順のプロバイダ → 乱数フォールバックの順に試す。各段は1回だけ試行し、
/// 失敗（設定不足・通信エラー・タイムアウト）は即座に次の段へ進む。
use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, Instant};

use serde::{Serialize, Serializer};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::catalog::ProductRecord;
use crate::category::{Category, CategoryDetails, ConfidenceLevel, MaterialTag};
use crate::classifier::{KeywordClassifier, MatchStrategy, TEXT_RULES};
use crate::observability::metrics::Metrics;
use crate::recognition::{
    Detection, ImageInput, ImageInputError, ImageLabelProvider, ProviderError, RandomFallback,
};

/// カタログから選択された製品に与える固定信頼度。
pub const SELECTED_PRODUCT_CONFIDENCE: f64 = 0.95;

const DEFAULT_STAGE_TIMEOUT: Duration = Duration::from_secs(10);
const EMPTY_INPUT_MESSAGE: &str = "Please provide at least one piece of information about the item";

/// テキスト入力フォームの内容。
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TextInput {
    pub description: String,
    pub product_name: String,
    pub material: Option<MaterialTag>,
    pub selected_product: Option<ProductRecord>,
}

impl TextInput {
    #[must_use]
    pub fn describe(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_product_name(mut self, product_name: impl Into<String>) -> Self {
        self.product_name = product_name.into();
        self
    }

    #[must_use]
    pub fn with_material(mut self, material: MaterialTag) -> Self {
        self.material = Some(material);
        self
    }

    #[must_use]
    pub fn with_selected_product(mut self, product: ProductRecord) -> Self {
        self.selected_product = Some(product);
        self
    }

    fn is_blank(&self) -> bool {
        self.selected_product.is_none()
            && self.material.is_none()
            && self.description.trim().is_empty()
            && self.product_name.trim().is_empty()
    }

    /// 説明・製品名・素材を空白区切りで連結し、小文字化する。
    fn combined_text(&self) -> String {
        let material = self.material.map_or("", MaterialTag::as_str);
        format!(
            "{} {} {}",
            self.description.trim(),
            self.product_name.trim(),
            material
        )
        .to_lowercase()
    }
}

#[derive(Debug, Clone)]
pub enum ClassifyInput {
    Text(TextInput),
    Image(ImageInput),
}

/// 結果がどの段で決まったか。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClassificationSource {
    CatalogSelection,
    KeywordText,
    /// 画像認識プロバイダ（名前は [`ImageLabelProvider::name`]）。
    Provider(&'static str),
    Fallback,
}

impl ClassificationSource {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            ClassificationSource::CatalogSelection => "catalog_selection",
            ClassificationSource::KeywordText => "keyword_text",
            ClassificationSource::Provider(name) => name,
            ClassificationSource::Fallback => "fallback",
        }
    }
}

impl Serialize for ClassificationSource {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// 1リクエスト分の分類結果。永続化しない。
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassificationResult {
    pub category: Category,
    pub confidence: f64,
    pub confidence_level: ConfidenceLevel,
    pub details: &'static CategoryDetails,
    pub disposal_instructions: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product: Option<ProductRecord>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub labels: Vec<String>,
    pub source: ClassificationSource,
}

impl ClassificationResult {
    fn new(category: Category, confidence: f64, source: ClassificationSource) -> Self {
        Self {
            category,
            confidence,
            confidence_level: ConfidenceLevel::from_confidence(confidence),
            details: category.details(),
            disposal_instructions: category.instruction_list(),
            product: None,
            labels: Vec::new(),
            source,
        }
    }

    fn from_selection(product: ProductRecord) -> Self {
        let mut result = Self::new(
            product.category,
            SELECTED_PRODUCT_CONFIDENCE,
            ClassificationSource::CatalogSelection,
        );
        if !product.disposal_instructions.is_empty() {
            result
                .disposal_instructions
                .clone_from(&product.disposal_instructions);
        }
        result.product = Some(product);
        result
    }
}

#[derive(Debug, Error)]
pub enum ClassifyError {
    /// 入力不足。リクエストは送信されず、メッセージをそのまま利用者に見せる。
    #[error("{0}")]
    InvalidInput(String),
    #[error("classification failed, try again")]
    Failed(#[source] anyhow::Error),
}

impl ClassifyError {
    /// リクエスト全体を再試行する価値があるか。
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, ClassifyError::Failed(_))
    }
}

impl From<ImageInputError> for ClassifyError {
    fn from(error: ImageInputError) -> Self {
        match error {
            ImageInputError::Empty | ImageInputError::InvalidBase64(_) => {
                ClassifyError::InvalidInput(error.to_string())
            }
            ImageInputError::Io { .. } => ClassifyError::Failed(anyhow::Error::new(error)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrchestratorSettings {
    /// 各プロバイダ段のタイムアウト。超過は段の失敗として扱う。
    pub stage_timeout: Duration,
    /// `false` の場合はプロバイダを呼ばずに乱数フォールバックを返す。
    pub recognition_enabled: bool,
    pub text_strategy: MatchStrategy,
}

impl Default for OrchestratorSettings {
    fn default() -> Self {
        Self {
            stage_timeout: DEFAULT_STAGE_TIMEOUT,
            recognition_enabled: true,
            text_strategy: MatchStrategy::FirstMatch,
        }
    }
}

pub struct ClassificationOrchestrator {
    text_classifier: KeywordClassifier,
    label_classifier: KeywordClassifier,
    providers: Vec<Arc<dyn ImageLabelProvider>>,
    fallback: RandomFallback,
    settings: OrchestratorSettings,
    metrics: Arc<Metrics>,
}

impl ClassificationOrchestrator {
    /// `providers` は試行順に並べる。
    #[must_use]
    pub fn new(
        providers: Vec<Arc<dyn ImageLabelProvider>>,
        fallback: RandomFallback,
        settings: OrchestratorSettings,
        metrics: Arc<Metrics>,
    ) -> Self {
        Self {
            text_classifier: KeywordClassifier::new(TEXT_RULES, settings.text_strategy),
            label_classifier: KeywordClassifier::for_labels(),
            providers,
            fallback,
            settings,
            metrics,
        }
    }

    #[must_use]
    pub fn settings(&self) -> &OrchestratorSettings {
        &self.settings
    }

    #[must_use]
    pub fn provider_names(&self) -> Vec<&'static str> {
        self.providers.iter().map(|provider| provider.name()).collect()
    }

    /// # Errors
    /// テキスト入力が空の場合は [`ClassifyError::InvalidInput`] を返す。
    pub async fn classify(&self, input: ClassifyInput) -> Result<ClassificationResult, ClassifyError> {
        match input {
            ClassifyInput::Text(text) => self.classify_text(text),
            ClassifyInput::Image(image) => Ok(self.classify_image(&image).await),
        }
    }

    /// # Errors
    /// 説明・製品名・素材・選択製品のいずれもない場合は [`ClassifyError::InvalidInput`] を返す。
    pub fn classify_text(&self, input: TextInput) -> Result<ClassificationResult, ClassifyError> {
        if input.is_blank() {
            self.metrics.validation_rejections.inc();
            return Err(ClassifyError::InvalidInput(EMPTY_INPUT_MESSAGE.to_string()));
        }

        let combined = input.combined_text();

        if let Some(product) = input.selected_product {
            debug!(product_id = %product.id, "using selected catalog product");
            return Ok(self.finish(ClassificationResult::from_selection(product)));
        }

        let matched = self.text_classifier.classify_text(&combined);
        debug!(
            category = %matched.category,
            confidence = matched.confidence,
            keywords = ?matched.matched_keywords,
            strategy = ?self.text_classifier.strategy(),
            "text keyword classification"
        );

        Ok(self.finish(ClassificationResult::new(
            matched.category,
            matched.confidence,
            ClassificationSource::KeywordText,
        )))
    }

    /// 画像を分類する。最終段の乱数フォールバックは失敗しないため、結果は必ず返る。
    pub async fn classify_image(&self, image: &ImageInput) -> ClassificationResult {
        if !self.settings.recognition_enabled {
            debug!("image recognition disabled, using fallback");
            return self.fallback_result();
        }

        for provider in &self.providers {
            match self.run_stage(provider.as_ref(), image).await {
                Ok(detection) => {
                    let result = self.interpret(provider.name(), detection);
                    return self.finish(result);
                }
                Err(error) => {
                    let kind = error.kind().as_str();
                    warn!(
                        provider = error.provider(),
                        kind,
                        error = %error,
                        "recognition stage failed, advancing fallback chain"
                    );
                    self.metrics.record_provider_failure(error.provider(), kind);
                }
            }
        }

        self.fallback_result()
    }

    /// # Errors
    /// Base64 が不正または空の場合は [`ClassifyError::InvalidInput`] を返す。
    pub async fn classify_image_base64(
        &self,
        raw: &str,
    ) -> Result<ClassificationResult, ClassifyError> {
        let image = ImageInput::from_base64(raw)?;
        Ok(self.classify_image(&image).await)
    }

    /// # Errors
    /// ファイルの読み込みに失敗した場合は [`ClassifyError::Failed`] を返す。
    pub async fn classify_image_file(
        &self,
        path: impl AsRef<Path>,
    ) -> Result<ClassificationResult, ClassifyError> {
        let image = ImageInput::load(path).await?;
        Ok(self.classify_image(&image).await)
    }

    async fn run_stage(
        &self,
        provider: &dyn ImageLabelProvider,
        image: &ImageInput,
    ) -> Result<Detection, ProviderError> {
        let name = provider.name();
        let started = Instant::now();
        let outcome = tokio::time::timeout(self.settings.stage_timeout, provider.detect(image)).await;
        self.metrics
            .observe_provider_latency(name, started.elapsed().as_secs_f64());

        outcome.unwrap_or_else(|_| {
            Err(ProviderError::Timeout {
                provider: name,
                elapsed_ms: u64::try_from(self.settings.stage_timeout.as_millis())
                    .unwrap_or(u64::MAX),
            })
        })
    }

    fn interpret(&self, provider: &'static str, detection: Detection) -> ClassificationResult {
        let source = ClassificationSource::Provider(provider);
        match detection {
            Detection::Labels(labels) => {
                let names: Vec<String> = labels.into_iter().map(|label| label.name).collect();
                let matched = self.label_classifier.classify_labels(&names);
                debug!(
                    provider,
                    labels = ?names,
                    keywords = ?matched.matched_keywords,
                    "mapped vision labels"
                );
                let mut result =
                    ClassificationResult::new(matched.category, matched.confidence, source);
                result.labels = names;
                result
            }
            Detection::Verdict {
                category,
                confidence,
            } => ClassificationResult::new(category, confidence, source),
        }
    }

    fn fallback_result(&self) -> ClassificationResult {
        let (category, confidence) = self.fallback.classify();
        self.finish(ClassificationResult::new(
            category,
            confidence,
            ClassificationSource::Fallback,
        ))
    }

    fn finish(&self, result: ClassificationResult) -> ClassificationResult {
        self.metrics
            .record_classification(result.source.as_str(), result.category.as_str());
        info!(
            source = result.source.as_str(),
            category = %result.category,
            confidence = result.confidence,
            "classification completed"
        );
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;
    use crate::recognition::{FALLBACK_CATEGORIES, PlaceholderLocalProvider, VisionLabel};
    use async_trait::async_trait;
    use prometheus::Registry;

    struct NotConfiguredProvider(&'static str);

    #[async_trait]
    impl ImageLabelProvider for NotConfiguredProvider {
        fn name(&self) -> &'static str {
            self.0
        }

        async fn detect(&self, _image: &ImageInput) -> Result<Detection, ProviderError> {
            Err(ProviderError::NotConfigured {
                provider: self.0,
                reason: "api key missing",
            })
        }
    }

    struct StaticLabels(&'static str, Vec<&'static str>);

    #[async_trait]
    impl ImageLabelProvider for StaticLabels {
        fn name(&self) -> &'static str {
            self.0
        }

        async fn detect(&self, _image: &ImageInput) -> Result<Detection, ProviderError> {
            Ok(Detection::Labels(
                self.1
                    .iter()
                    .map(|name| VisionLabel::new(*name, Some(0.9)))
                    .collect(),
            ))
        }
    }

    struct SlowProvider;

    #[async_trait]
    impl ImageLabelProvider for SlowProvider {
        fn name(&self) -> &'static str {
            "slow"
        }

        async fn detect(&self, _image: &ImageInput) -> Result<Detection, ProviderError> {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Ok(Detection::Labels(vec![VisionLabel::new("bottle", None)]))
        }
    }

    fn metrics() -> Arc<Metrics> {
        Arc::new(Metrics::new(Arc::new(Registry::new())).expect("metrics"))
    }

    fn orchestrator(providers: Vec<Arc<dyn ImageLabelProvider>>) -> ClassificationOrchestrator {
        orchestrator_with(providers, OrchestratorSettings::default())
    }

    fn orchestrator_with(
        providers: Vec<Arc<dyn ImageLabelProvider>>,
        settings: OrchestratorSettings,
    ) -> ClassificationOrchestrator {
        ClassificationOrchestrator::new(providers, RandomFallback::with_seed(1), settings, metrics())
    }

    fn image() -> ImageInput {
        ImageInput::from_bytes(vec![0xff, 0xd8, 0xff]).expect("image")
    }

    #[test]
    fn blank_text_input_is_rejected() {
        let orchestrator = orchestrator(Vec::new());
        let error = orchestrator
            .classify_text(TextInput::describe("   ").with_product_name(" "))
            .expect_err("blank input must be rejected");

        assert!(matches!(error, ClassifyError::InvalidInput(_)));
        assert!(!error.is_retryable());
        assert_eq!(orchestrator.metrics.validation_rejections.get(), 1);
    }

    #[test]
    fn material_alone_is_enough() {
        let orchestrator = orchestrator(Vec::new());
        let result = orchestrator
            .classify_text(TextInput::default().with_material(MaterialTag::Glass))
            .expect("material is valid input");

        assert_eq!(result.category, Category::Glass);
        assert!((result.confidence - 0.80).abs() < f64::EPSILON);
        assert_eq!(result.source, ClassificationSource::KeywordText);
    }

    #[test]
    fn combined_text_joins_all_fields() {
        let input = TextInput::describe("Old ")
            .with_product_name("Jar")
            .with_material(MaterialTag::Metal);
        assert_eq!(input.combined_text(), "old jar metal");
    }

    #[test]
    fn selected_product_overrides_keywords() {
        let catalog = Catalog::seeded();
        let banana = catalog.get_product_by_id("banana-peel").expect("seed product");
        let orchestrator = orchestrator(Vec::new());

        let result = orchestrator
            .classify_text(
                TextInput::describe("plastic bottle")
                    .with_material(MaterialTag::Plastic)
                    .with_selected_product(banana.clone()),
            )
            .expect("classification");

        assert_eq!(result.category, Category::Organic);
        assert!((result.confidence - SELECTED_PRODUCT_CONFIDENCE).abs() < f64::EPSILON);
        assert_eq!(result.disposal_instructions, banana.disposal_instructions);
        assert_eq!(result.source, ClassificationSource::CatalogSelection);
        assert_eq!(result.product, Some(banana));
    }

    #[test]
    fn selected_product_without_instructions_uses_category_list() {
        let catalog = Catalog::seeded();
        let mut product = catalog.get_product_by_id("glass-jar").expect("seed product");
        product.disposal_instructions.clear();
        let orchestrator = orchestrator(Vec::new());

        let result = orchestrator
            .classify_text(TextInput::default().with_selected_product(product))
            .expect("classification");

        assert_eq!(result.disposal_instructions, Category::Glass.instruction_list());
    }

    #[test]
    fn selected_textile_product_keeps_category_but_uses_garbage_details() {
        let catalog = Catalog::seeded();
        let shirt = catalog.get_product_by_id("cotton-shirt").expect("seed product");
        let orchestrator = orchestrator(Vec::new());

        let result = orchestrator
            .classify_text(TextInput::default().with_selected_product(shirt))
            .expect("classification");

        assert_eq!(result.category, Category::Textile);
        assert_eq!(result.details, Category::Garbage.details());
    }

    #[test]
    fn best_match_text_strategy_is_configurable() {
        let orchestrator = orchestrator_with(
            Vec::new(),
            OrchestratorSettings {
                text_strategy: MatchStrategy::BestMatch,
                ..OrchestratorSettings::default()
            },
        );
        let result = orchestrator
            .classify_text(TextInput::describe("a bottle"))
            .expect("classification");

        // 1語だけの一致では既定の garbage 0.5 を超えない
        assert_eq!(result.category, Category::Garbage);
    }

    #[tokio::test]
    async fn image_chain_skips_failing_stage() {
        let orchestrator = orchestrator(vec![
            Arc::new(NotConfiguredProvider("primary_vision")),
            Arc::new(StaticLabels("secondary_vision", vec!["tin", "aluminum", "can"])),
        ]);

        let result = orchestrator.classify_image(&image()).await;

        assert_eq!(result.category, Category::Metal);
        assert!((result.confidence - (3.0 / 7.0 + 0.3)).abs() < 1e-9);
        assert_eq!(result.source, ClassificationSource::Provider("secondary_vision"));
        assert_eq!(result.labels, vec!["tin", "aluminum", "can"]);
        assert_eq!(
            orchestrator
                .metrics
                .provider_failures
                .with_label_values(&["primary_vision", "configuration"])
                .get(),
            1
        );
    }

    #[tokio::test]
    async fn image_chain_times_out_slow_stage() {
        let orchestrator = orchestrator_with(
            vec![
                Arc::new(SlowProvider),
                Arc::new(PlaceholderLocalProvider::with_seed(9)),
            ],
            OrchestratorSettings {
                stage_timeout: Duration::from_millis(20),
                ..OrchestratorSettings::default()
            },
        );

        let result = orchestrator.classify_image(&image()).await;

        assert_eq!(result.source, ClassificationSource::Provider("local_model"));
        assert!(Category::CLASSIFIABLE.contains(&result.category));
        assert!((0.7..1.0).contains(&result.confidence));
        assert_eq!(
            orchestrator
                .metrics
                .provider_failures
                .with_label_values(&["slow", "transport"])
                .get(),
            1
        );
    }

    #[tokio::test]
    async fn exhausted_chain_ends_in_fallback() {
        let orchestrator = orchestrator(vec![
            Arc::new(NotConfiguredProvider("primary_vision")),
            Arc::new(NotConfiguredProvider("secondary_vision")),
        ]);

        let result = orchestrator.classify_image(&image()).await;

        assert_eq!(result.source, ClassificationSource::Fallback);
        assert!(FALLBACK_CATEGORIES.contains(&result.category));
        assert!((0.6..1.0).contains(&result.confidence));
    }

    #[tokio::test]
    async fn disabled_recognition_never_calls_providers() {
        let orchestrator = orchestrator_with(
            vec![Arc::new(StaticLabels("primary_vision", vec!["bottle"]))],
            OrchestratorSettings {
                recognition_enabled: false,
                ..OrchestratorSettings::default()
            },
        );

        let result = orchestrator.classify_image(&image()).await;
        assert_eq!(result.source, ClassificationSource::Fallback);
    }

    #[tokio::test]
    async fn invalid_base64_is_invalid_input() {
        let orchestrator = orchestrator(Vec::new());
        let error = orchestrator
            .classify_image_base64("%%%")
            .await
            .expect_err("bad payload");
        assert!(matches!(error, ClassifyError::InvalidInput(_)));
    }

    #[tokio::test]
    async fn unreadable_file_is_retryable_failure() {
        let orchestrator = orchestrator(Vec::new());
        let error = orchestrator
            .classify_image_file("/nonexistent/photo.jpg")
            .await
            .expect_err("missing file");

        assert!(error.is_retryable());
        assert_eq!(error.to_string(), "classification failed, try again");
    }

    #[tokio::test]
    async fn classify_dispatches_on_input_kind() {
        let orchestrator = orchestrator(Vec::new());

        let text = orchestrator
            .classify(ClassifyInput::Text(TextInput::describe("newspaper")))
            .await
            .expect("text");
        assert_eq!(text.category, Category::Paper);

        let image = orchestrator
            .classify(ClassifyInput::Image(image()))
            .await
            .expect("image");
        assert_eq!(image.source, ClassificationSource::Fallback);
    }

    #[test]
    fn source_serializes_as_snake_case_name() {
        let json = serde_json::to_value(ClassificationSource::CatalogSelection).expect("json");
        assert_eq!(json, serde_json::json!("catalog_selection"));
        let json = serde_json::to_value(ClassificationSource::Provider("primary_vision"))
            .expect("json");
        assert_eq!(json, serde_json::json!("primary_vision"));
    }
}
