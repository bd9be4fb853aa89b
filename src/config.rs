use std::{env, net::SocketAddr, time::Duration};

use thiserror::Error;

use crate::classifier::MatchStrategy;

const DEFAULT_PRIMARY_VISION_BASE_URL: &str = "https://vision.googleapis.com/";

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    http_bind: SocketAddr,
    primary_vision_base_url: String,
    primary_vision_api_key: Option<String>,
    secondary_vision_base_url: Option<String>,
    secondary_vision_access_key: Option<String>,
    secondary_vision_region: String,
    vision_connect_timeout: Duration,
    provider_stage_timeout: Duration,
    image_recognition_enabled: bool,
    text_match_strategy: MatchStrategy,
    search_result_limit: usize,
    popular_products_limit: usize,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {name}: {source}")]
    Invalid {
        name: &'static str,
        #[source]
        source: anyhow::Error,
    },
}

impl Config {
    /// 環境変数から設定値を読み込み、検証する。
    ///
    /// すべての変数は省略可能で、未設定のものは既定値を使う。
    /// Vision API の認証情報が欠けていても起動は失敗せず、該当する段がスキップされる。
    ///
    /// # Errors
    /// 数値・アドレス・真偽値・戦略名のパースに失敗した場合は [`ConfigError`] を返す。
    pub fn from_env() -> Result<Self, ConfigError> {
        let http_bind = parse_socket_addr("WASTE_CLASSIFIER_HTTP_BIND", "0.0.0.0:9010")?;

        // Vision provider settings
        let primary_vision_base_url = optional_var("PRIMARY_VISION_BASE_URL")
            .unwrap_or_else(|| DEFAULT_PRIMARY_VISION_BASE_URL.to_string());
        let primary_vision_api_key = optional_var("PRIMARY_VISION_API_KEY");
        let secondary_vision_base_url = optional_var("SECONDARY_VISION_BASE_URL");
        let secondary_vision_access_key = optional_var("SECONDARY_VISION_ACCESS_KEY");
        let secondary_vision_region =
            env::var("SECONDARY_VISION_REGION").unwrap_or_else(|_| "us-east-1".to_string());
        let vision_connect_timeout = parse_duration_ms("VISION_CONNECT_TIMEOUT_MS", 3000)?;
        let provider_stage_timeout = parse_duration_ms("PROVIDER_STAGE_TIMEOUT_MS", 10000)?;
        if provider_stage_timeout.is_zero() {
            return Err(ConfigError::Invalid {
                name: "PROVIDER_STAGE_TIMEOUT_MS",
                source: anyhow::anyhow!("must be greater than zero"),
            });
        }

        let image_recognition_enabled = parse_bool("IMAGE_RECOGNITION_ENABLED", true)?;
        let text_match_strategy = parse_strategy("TEXT_MATCH_STRATEGY", "first_match")?;

        // Catalog presentation limits
        let search_result_limit = parse_usize("SEARCH_RESULT_LIMIT", 5)?;
        let popular_products_limit = parse_usize("POPULAR_PRODUCTS_LIMIT", 10)?;

        Ok(Self {
            http_bind,
            primary_vision_base_url,
            primary_vision_api_key,
            secondary_vision_base_url,
            secondary_vision_access_key,
            secondary_vision_region,
            vision_connect_timeout,
            provider_stage_timeout,
            image_recognition_enabled,
            text_match_strategy,
            search_result_limit,
            popular_products_limit,
        })
    }

    #[must_use]
    pub fn http_bind(&self) -> SocketAddr {
        self.http_bind
    }

    #[must_use]
    pub fn primary_vision_base_url(&self) -> &str {
        &self.primary_vision_base_url
    }

    #[must_use]
    pub fn primary_vision_api_key(&self) -> Option<&str> {
        self.primary_vision_api_key.as_deref()
    }

    #[must_use]
    pub fn secondary_vision_base_url(&self) -> Option<&str> {
        self.secondary_vision_base_url.as_deref()
    }

    #[must_use]
    pub fn secondary_vision_access_key(&self) -> Option<&str> {
        self.secondary_vision_access_key.as_deref()
    }

    #[must_use]
    pub fn secondary_vision_region(&self) -> &str {
        &self.secondary_vision_region
    }

    #[must_use]
    pub fn vision_connect_timeout(&self) -> Duration {
        self.vision_connect_timeout
    }

    #[must_use]
    pub fn provider_stage_timeout(&self) -> Duration {
        self.provider_stage_timeout
    }

    #[must_use]
    pub fn image_recognition_enabled(&self) -> bool {
        self.image_recognition_enabled
    }

    #[must_use]
    pub fn text_match_strategy(&self) -> MatchStrategy {
        self.text_match_strategy
    }

    #[must_use]
    pub fn search_result_limit(&self) -> usize {
        self.search_result_limit
    }

    #[must_use]
    pub fn popular_products_limit(&self) -> usize {
        self.popular_products_limit
    }
}

fn optional_var(name: &'static str) -> Option<String> {
    env::var(name).ok().filter(|value| !value.trim().is_empty())
}

fn parse_socket_addr(name: &'static str, default: &str) -> Result<SocketAddr, ConfigError> {
    let raw = env::var(name).unwrap_or_else(|_| default.to_string());

    raw.parse().map_err(|error| ConfigError::Invalid {
        name,
        source: anyhow::Error::new(error),
    })
}

fn parse_duration_ms(name: &'static str, default_ms: u64) -> Result<Duration, ConfigError> {
    let raw = env::var(name).unwrap_or_else(|_| default_ms.to_string());
    let ms = raw.parse::<u64>().map_err(|error| ConfigError::Invalid {
        name,
        source: anyhow::Error::new(error),
    })?;
    Ok(Duration::from_millis(ms))
}

fn parse_usize(name: &'static str, default: usize) -> Result<usize, ConfigError> {
    let raw = env::var(name).unwrap_or_else(|_| default.to_string());
    raw.parse::<usize>().map_err(|error| ConfigError::Invalid {
        name,
        source: anyhow::Error::new(error),
    })
}

fn parse_bool(name: &'static str, default: bool) -> Result<bool, ConfigError> {
    let raw = env::var(name).unwrap_or_else(|_| default.to_string());
    match raw.to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::Invalid {
            name,
            source: anyhow::anyhow!("invalid boolean value: {raw}"),
        }),
    }
}

fn parse_strategy(name: &'static str, default: &str) -> Result<MatchStrategy, ConfigError> {
    let raw = env::var(name).unwrap_or_else(|_| default.to_string());
    MatchStrategy::parse(&raw).ok_or_else(|| ConfigError::Invalid {
        name,
        source: anyhow::anyhow!("unknown match strategy: {raw}"),
    })
}
