/// 一次 Vision API（`images:annotate` 形式）のクライアント。
///
/// ラベル検出とオブジェクト検出を同時に要求し、両方の名称を小文字化してラベルとして返す。
use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{Client, Url};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::recognition::{Detection, ImageInput, ImageLabelProvider, ProviderError, VisionLabel};

use super::truncate_body;

const MAX_LABEL_RESULTS: u32 = 10;
const MAX_OBJECT_RESULTS: u32 = 5;

#[derive(Debug, Clone)]
pub struct PrimaryVisionConfig {
    pub base_url: String,
    pub api_key: Option<String>,
    pub connect_timeout: Duration,
    pub total_timeout: Duration,
}

#[derive(Debug, Serialize)]
struct AnnotateRequest<'a> {
    requests: [AnnotateImageRequest<'a>; 1],
}

#[derive(Debug, Serialize)]
struct AnnotateImageRequest<'a> {
    image: ImageContent<'a>,
    features: [Feature; 2],
}

#[derive(Debug, Serialize)]
struct ImageContent<'a> {
    content: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Feature {
    #[serde(rename = "type")]
    kind: &'static str,
    max_results: u32,
}

#[derive(Debug, Deserialize)]
struct AnnotateResponse {
    #[serde(default)]
    responses: Vec<AnnotateImageResponse>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AnnotateImageResponse {
    #[serde(default)]
    label_annotations: Vec<LabelAnnotation>,
    #[serde(default)]
    localized_object_annotations: Vec<LocalizedObjectAnnotation>,
    #[serde(default)]
    error: Option<ApiStatus>,
}

#[derive(Debug, Deserialize)]
struct LabelAnnotation {
    description: String,
    #[serde(default)]
    score: Option<f32>,
}

#[derive(Debug, Deserialize)]
struct LocalizedObjectAnnotation {
    name: String,
    #[serde(default)]
    score: Option<f32>,
}

#[derive(Debug, Deserialize)]
struct ApiStatus {
    #[serde(default)]
    code: i32,
    #[serde(default)]
    message: String,
}

#[derive(Debug, Clone)]
pub struct PrimaryVisionClient {
    client: Client,
    annotate_url: Option<Url>,
    api_key: Option<String>,
}

impl PrimaryVisionClient {
    pub const NAME: &'static str = "primary_vision";

    /// # Errors
    /// HTTP クライアントの構築またはベース URL のパースに失敗した場合はエラーを返す。
    pub fn new(config: PrimaryVisionConfig) -> Result<Self> {
        let client = Client::builder()
            .connect_timeout(config.connect_timeout)
            .timeout(config.total_timeout)
            .build()
            .context("failed to build primary vision HTTP client")?;

        let base_url = config.base_url.trim();
        let annotate_url = if base_url.is_empty() {
            None
        } else {
            let url = Url::parse(base_url)
                .context("invalid primary vision base URL")?
                .join("v1/images:annotate")
                .context("failed to build primary vision annotate URL")?;
            Some(url)
        };

        let api_key = config.api_key.filter(|key| !key.trim().is_empty());

        Ok(Self {
            client,
            annotate_url,
            api_key,
        })
    }

    #[must_use]
    pub fn is_configured(&self) -> bool {
        self.api_key.is_some() && self.annotate_url.is_some()
    }
}

#[async_trait]
impl ImageLabelProvider for PrimaryVisionClient {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    async fn detect(&self, image: &ImageInput) -> Result<Detection, ProviderError> {
        let Some(api_key) = self.api_key.as_deref() else {
            return Err(ProviderError::NotConfigured {
                provider: Self::NAME,
                reason: "api key missing",
            });
        };

        let Some(mut url) = self.annotate_url.clone() else {
            return Err(ProviderError::NotConfigured {
                provider: Self::NAME,
                reason: "endpoint missing",
            });
        };
        url.query_pairs_mut().append_pair("key", api_key);

        let content = image.to_base64();
        let body = AnnotateRequest {
            requests: [AnnotateImageRequest {
                image: ImageContent { content: &content },
                features: [
                    Feature {
                        kind: "LABEL_DETECTION",
                        max_results: MAX_LABEL_RESULTS,
                    },
                    Feature {
                        kind: "OBJECT_LOCALIZATION",
                        max_results: MAX_OBJECT_RESULTS,
                    },
                ],
            }],
        };

        debug!(bytes = image.len(), "requesting primary vision annotation");

        let response = self
            .client
            .post(url)
            .json(&body)
            .send()
            .await
            .map_err(|source| ProviderError::Transport {
                provider: Self::NAME,
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            return Err(ProviderError::Status {
                provider: Self::NAME,
                status,
                body: truncate_body(&error_body),
            });
        }

        let parsed: AnnotateResponse =
            response
                .json()
                .await
                .map_err(|error| ProviderError::InvalidResponse {
                    provider: Self::NAME,
                    reason: error.to_string(),
                })?;

        let Some(first) = parsed.responses.into_iter().next() else {
            return Err(ProviderError::InvalidResponse {
                provider: Self::NAME,
                reason: "response contained no annotations".to_string(),
            });
        };

        if let Some(error) = first.error {
            return Err(ProviderError::InvalidResponse {
                provider: Self::NAME,
                reason: format!("api error {}: {}", error.code, truncate_body(&error.message)),
            });
        }

        let labels: Vec<VisionLabel> = first
            .label_annotations
            .into_iter()
            .map(|label| VisionLabel::new(label.description.to_lowercase(), label.score))
            .chain(
                first
                    .localized_object_annotations
                    .into_iter()
                    .map(|object| VisionLabel::new(object.name.to_lowercase(), object.score)),
            )
            .collect();

        debug!(count = labels.len(), "primary vision returned labels");

        Ok(Detection::Labels(labels))
    }
}
