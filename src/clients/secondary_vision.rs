/// 二次 Vision API（`DetectLabels` 形式）のクライアント。
///
/// ゲートウェイ経由で呼び出す想定で、認証はアクセスキーヘッダーで行う。
use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{Client, Url};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::recognition::{Detection, ImageInput, ImageLabelProvider, ProviderError, VisionLabel};

use super::truncate_body;

const MAX_LABELS: u32 = 10;
const MIN_CONFIDENCE: f32 = 50.0;
const TARGET: &str = "RekognitionService.DetectLabels";
const CONTENT_TYPE: &str = "application/x-amz-json-1.1";

#[derive(Debug, Clone)]
pub struct SecondaryVisionConfig {
    pub base_url: Option<String>,
    pub access_key: Option<String>,
    pub region: String,
    pub connect_timeout: Duration,
    pub total_timeout: Duration,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
struct DetectLabelsRequest<'a> {
    image: ImageBytes<'a>,
    max_labels: u32,
    min_confidence: f32,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
struct ImageBytes<'a> {
    bytes: &'a str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct DetectLabelsResponse {
    #[serde(default)]
    labels: Vec<DetectedLabel>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct DetectedLabel {
    name: String,
    #[serde(default)]
    confidence: Option<f32>,
}

#[derive(Debug, Clone)]
pub struct SecondaryVisionClient {
    client: Client,
    endpoint: Option<Url>,
    access_key: Option<String>,
    region: String,
}

impl SecondaryVisionClient {
    pub const NAME: &'static str = "secondary_vision";

    /// # Errors
    /// HTTP クライアントの構築またはエンドポイント URL のパースに失敗した場合はエラーを返す。
    pub fn new(config: SecondaryVisionConfig) -> Result<Self> {
        let client = Client::builder()
            .connect_timeout(config.connect_timeout)
            .timeout(config.total_timeout)
            .build()
            .context("failed to build secondary vision HTTP client")?;

        let endpoint = config
            .base_url
            .filter(|url| !url.trim().is_empty())
            .map(|url| Url::parse(&url))
            .transpose()
            .context("invalid secondary vision base URL")?;

        Ok(Self {
            client,
            endpoint,
            access_key: config.access_key.filter(|key| !key.trim().is_empty()),
            region: config.region,
        })
    }

    #[must_use]
    pub fn is_configured(&self) -> bool {
        self.endpoint.is_some() && self.access_key.is_some()
    }
}

#[async_trait]
impl ImageLabelProvider for SecondaryVisionClient {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    async fn detect(&self, image: &ImageInput) -> Result<Detection, ProviderError> {
        let Some(access_key) = self.access_key.as_deref() else {
            return Err(ProviderError::NotConfigured {
                provider: Self::NAME,
                reason: "access key missing",
            });
        };
        let Some(endpoint) = self.endpoint.clone() else {
            return Err(ProviderError::NotConfigured {
                provider: Self::NAME,
                reason: "endpoint missing",
            });
        };

        let bytes = image.to_base64();
        let body = DetectLabelsRequest {
            image: ImageBytes { bytes: &bytes },
            max_labels: MAX_LABELS,
            min_confidence: MIN_CONFIDENCE,
        };
        let payload = serde_json::to_vec(&body).map_err(|error| ProviderError::InvalidResponse {
            provider: Self::NAME,
            reason: format!("failed to encode request: {error}"),
        })?;

        debug!(bytes = image.len(), region = %self.region, "requesting secondary vision labels");

        let response = self
            .client
            .post(endpoint)
            .header("Content-Type", CONTENT_TYPE)
            .header("X-Amz-Target", TARGET)
            .header("X-Api-Key", access_key)
            .header("X-Region", &self.region)
            .body(payload)
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

        let bytes = response
            .bytes()
            .await
            .map_err(|source| ProviderError::Transport {
                provider: Self::NAME,
                source,
            })?;
        let parsed: DetectLabelsResponse =
            serde_json::from_slice(&bytes).map_err(|error| ProviderError::InvalidResponse {
                provider: Self::NAME,
                reason: error.to_string(),
            })?;

        // DetectLabels の信頼度は 0〜100
        let labels: Vec<VisionLabel> = parsed
            .labels
            .into_iter()
            .map(|label| {
                VisionLabel::new(
                    label.name.to_lowercase(),
                    label.confidence.map(|c| c / 100.0),
                )
            })
            .collect();

        debug!(count = labels.len(), "secondary vision returned labels");

        Ok(Detection::Labels(labels))
    }
}
