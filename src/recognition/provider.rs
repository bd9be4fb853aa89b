/// 画像認識プロバイダの共通インターフェース。
///
/// 実プロバイダ（外部 Vision API）もプレースホルダのローカルモデルも同じトレイトの背後に置き、
/// オーケストレータは実装を意識せずにフォールバックチェーンを組み立てる。
use std::{fmt, path::Path};

use async_trait::async_trait;
use base64::{Engine as _, engine::general_purpose::STANDARD};
use serde::Serialize;
use thiserror::Error;

use crate::category::Category;

/// 分類対象の画像（生バイト列）。
#[derive(Clone, PartialEq, Eq)]
pub struct ImageInput {
    bytes: Vec<u8>,
}

#[derive(Debug, Error)]
pub enum ImageInputError {
    #[error("image payload is empty")]
    Empty,
    #[error("image payload is not valid base64: {0}")]
    InvalidBase64(#[from] base64::DecodeError),
    #[error("failed to read image file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

impl ImageInput {
    /// # Errors
    /// バイト列が空の場合は [`ImageInputError::Empty`] を返す。
    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self, ImageInputError> {
        if bytes.is_empty() {
            return Err(ImageInputError::Empty);
        }
        Ok(Self { bytes })
    }

    /// base64 文字列から画像を復元する。`data:image/...;base64,` 形式の接頭辞も受け付ける。
    ///
    /// # Errors
    /// デコードに失敗した場合、または内容が空の場合はエラーを返す。
    pub fn from_base64(raw: &str) -> Result<Self, ImageInputError> {
        let trimmed = raw.trim();
        let payload = match trimmed.split_once(";base64,") {
            Some((prefix, data)) if prefix.starts_with("data:") => data,
            _ => trimmed,
        };
        if payload.is_empty() {
            return Err(ImageInputError::Empty);
        }
        Self::from_bytes(STANDARD.decode(payload)?)
    }

    /// 画像ファイルを非同期に読み込む。
    ///
    /// # Errors
    /// ファイルの読み込みに失敗した場合、または空ファイルの場合はエラーを返す。
    pub async fn load(path: impl AsRef<Path>) -> Result<Self, ImageInputError> {
        let path = path.as_ref();
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|source| ImageInputError::Io {
                path: path.display().to_string(),
                source,
            })?;
        Self::from_bytes(bytes)
    }

    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    #[must_use]
    pub fn to_base64(&self) -> String {
        STANDARD.encode(&self.bytes)
    }
}

impl fmt::Debug for ImageInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImageInput")
            .field("len", &self.bytes.len())
            .finish()
    }
}

/// 外部 API が返す認識ラベル。
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VisionLabel {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<f32>,
}

impl VisionLabel {
    #[must_use]
    pub fn new(name: impl Into<String>, score: Option<f32>) -> Self {
        Self {
            name: name.into(),
            score,
        }
    }
}

/// プロバイダの検出結果。
#[derive(Debug, Clone, PartialEq)]
pub enum Detection {
    /// ラベル検出型 API の結果。キーワード分類器（best-match）で解釈する。
    Labels(Vec<VisionLabel>),
    /// カテゴリを直接出力するモデルの結果。
    Verdict { category: Category, confidence: f64 },
}

/// エラーの種類（ログ・メトリクスのラベル用）。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// 認証情報や接続先が未設定
    Configuration,
    /// ネットワークエラー・タイムアウト
    Transport,
    /// 異常ステータスや解釈できないレスポンス
    Response,
}

impl ErrorKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            ErrorKind::Configuration => "configuration",
            ErrorKind::Transport => "transport",
            ErrorKind::Response => "response",
        }
    }
}

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("{provider} is not configured: {reason}")]
    NotConfigured {
        provider: &'static str,
        reason: &'static str,
    },
    #[error("{provider} request failed: {source}")]
    Transport {
        provider: &'static str,
        #[source]
        source: reqwest::Error,
    },
    #[error("{provider} returned error status {status}: {body}")]
    Status {
        provider: &'static str,
        status: reqwest::StatusCode,
        body: String,
    },
    #[error("{provider} returned an invalid response: {reason}")]
    InvalidResponse {
        provider: &'static str,
        reason: String,
    },
    #[error("{provider} timed out after {elapsed_ms} ms")]
    Timeout {
        provider: &'static str,
        elapsed_ms: u64,
    },
}

impl ProviderError {
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            ProviderError::NotConfigured { .. } => ErrorKind::Configuration,
            ProviderError::Transport { .. } | ProviderError::Timeout { .. } => ErrorKind::Transport,
            ProviderError::Status { .. } | ProviderError::InvalidResponse { .. } => {
                ErrorKind::Response
            }
        }
    }

    #[must_use]
    pub fn provider(&self) -> &'static str {
        match self {
            ProviderError::NotConfigured { provider, .. }
            | ProviderError::Transport { provider, .. }
            | ProviderError::Status { provider, .. }
            | ProviderError::InvalidResponse { provider, .. }
            | ProviderError::Timeout { provider, .. } => *provider,
        }
    }
}

/// 画像からラベルまたはカテゴリを得るプロバイダ。
#[async_trait]
pub trait ImageLabelProvider: Send + Sync {
    /// ログ・メトリクス・結果の出典に使う識別子。
    fn name(&self) -> &'static str;

    async fn detect(&self, image: &ImageInput) -> Result<Detection, ProviderError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_base64_accepts_data_uri() {
        let image = ImageInput::from_base64("data:image/png;base64,aGVsbG8=").expect("decodes");
        assert_eq!(image.as_bytes(), b"hello");
        assert_eq!(image.to_base64(), "aGVsbG8=");
    }

    #[test]
    fn from_base64_rejects_garbage() {
        let error = ImageInput::from_base64("not base64 !!").expect_err("invalid");
        assert!(matches!(error, ImageInputError::InvalidBase64(_)));
    }

    #[test]
    fn from_base64_rejects_empty() {
        let error = ImageInput::from_base64("   ").expect_err("empty");
        assert!(matches!(error, ImageInputError::Empty));
    }

    #[tokio::test]
    async fn load_reads_file_and_reports_missing() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("item.jpg");
        std::fs::write(&path, [0xFF, 0xD8, 0xFF]).expect("write image");

        let image = ImageInput::load(&path).await.expect("loads");
        assert_eq!(image.len(), 3);

        let error = ImageInput::load(dir.path().join("missing.jpg"))
            .await
            .expect_err("missing file");
        assert!(matches!(error, ImageInputError::Io { .. }));
    }

    #[test]
    fn error_kinds() {
        let not_configured = ProviderError::NotConfigured {
            provider: "primary_vision",
            reason: "api key missing",
        };
        assert_eq!(not_configured.kind(), ErrorKind::Configuration);
        assert_eq!(not_configured.provider(), "primary_vision");

        let timeout = ProviderError::Timeout {
            provider: "secondary_vision",
            elapsed_ms: 10,
        };
        assert_eq!(timeout.kind().as_str(), "transport");
    }
}
