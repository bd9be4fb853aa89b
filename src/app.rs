use std::sync::Arc;

use anyhow::{Context, Result};
use axum::Router;
use tracing::info;

use crate::{
    api,
    catalog::Catalog,
    clients::{PrimaryVisionClient, PrimaryVisionConfig, SecondaryVisionClient, SecondaryVisionConfig},
    config::Config,
    observability::Telemetry,
    orchestrator::{ClassificationOrchestrator, OrchestratorSettings},
    recognition::{ImageLabelProvider, PlaceholderLocalProvider, RandomFallback},
};

#[derive(Clone)]
pub(crate) struct AppState {
    registry: Arc<ComponentRegistry>,
}

pub struct ComponentRegistry {
    config: Arc<Config>,
    telemetry: Telemetry,
    catalog: Arc<Catalog>,
    orchestrator: Arc<ClassificationOrchestrator>,
}

impl AppState {
    pub(crate) fn new(registry: ComponentRegistry) -> Self {
        Self {
            registry: Arc::new(registry),
        }
    }

    pub(crate) fn telemetry(&self) -> &Telemetry {
        &self.registry.telemetry
    }

    pub(crate) fn config(&self) -> &Config {
        &self.registry.config
    }

    pub(crate) fn catalog(&self) -> &Catalog {
        &self.registry.catalog
    }

    pub(crate) fn orchestrator(&self) -> &ClassificationOrchestrator {
        &self.registry.orchestrator
    }
}

impl ComponentRegistry {
    /// 構成情報と依存をまとめて初期化し、アプリケーションの共有レジストリを構築する。
    ///
    /// # Errors
    /// Telemetry の初期化や HTTP クライアント構築が失敗した場合はエラーを返す。
    pub fn build(config: Config) -> Result<Self> {
        let telemetry = Telemetry::new()?;
        Self::with_telemetry(config, telemetry)
    }

    /// 既存の [`Telemetry`] を使ってレジストリを構築する。
    ///
    /// # Errors
    /// Vision クライアントの構築に失敗した場合はエラーを返す。
    pub fn with_telemetry(config: Config, telemetry: Telemetry) -> Result<Self> {
        let config = Arc::new(config);
        let catalog = Arc::new(Catalog::seeded());
        let providers = build_providers(&config)?;

        let settings = OrchestratorSettings {
            stage_timeout: config.provider_stage_timeout(),
            recognition_enabled: config.image_recognition_enabled(),
            text_strategy: config.text_match_strategy(),
        };
        let orchestrator = Arc::new(ClassificationOrchestrator::new(
            providers,
            RandomFallback::new(),
            settings,
            telemetry.metrics_arc(),
        ));

        info!(
            products = catalog.len(),
            providers = ?orchestrator.provider_names(),
            recognition_enabled = settings.recognition_enabled,
            "component registry built"
        );

        Ok(Self {
            config,
            telemetry,
            catalog,
            orchestrator,
        })
    }

    #[must_use]
    pub fn config(&self) -> Arc<Config> {
        Arc::clone(&self.config)
    }

    #[must_use]
    pub fn catalog(&self) -> Arc<Catalog> {
        Arc::clone(&self.catalog)
    }

    #[must_use]
    pub fn orchestrator(&self) -> Arc<ClassificationOrchestrator> {
        Arc::clone(&self.orchestrator)
    }
}

/// フォールバック順（一次 → 二次 → ローカルモデル）にプロバイダを並べる。
fn build_providers(config: &Config) -> Result<Vec<Arc<dyn ImageLabelProvider>>> {
    let total_timeout = config.provider_stage_timeout();

    let primary = PrimaryVisionClient::new(PrimaryVisionConfig {
        base_url: config.primary_vision_base_url().to_string(),
        api_key: config.primary_vision_api_key().map(str::to_string),
        connect_timeout: config.vision_connect_timeout(),
        total_timeout,
    })
    .context("failed to build primary vision client")?;

    let secondary = SecondaryVisionClient::new(SecondaryVisionConfig {
        base_url: config.secondary_vision_base_url().map(str::to_string),
        access_key: config.secondary_vision_access_key().map(str::to_string),
        region: config.secondary_vision_region().to_string(),
        connect_timeout: config.vision_connect_timeout(),
        total_timeout,
    })
    .context("failed to build secondary vision client")?;

    info!(
        primary_configured = primary.is_configured(),
        secondary_configured = secondary.is_configured(),
        "vision providers prepared"
    );

    Ok(vec![
        Arc::new(primary),
        Arc::new(secondary),
        Arc::new(PlaceholderLocalProvider::new()),
    ])
}

pub fn build_router(registry: ComponentRegistry) -> Router {
    let state = AppState::new(registry);
    api::router(state)
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn component_registry_wires_fallback_chain() {
        let registry = test_support::registry();

        assert_eq!(
            registry.orchestrator().provider_names(),
            vec!["primary_vision", "secondary_vision", "local_model"]
        );
        assert_eq!(registry.catalog().len(), 19);

        let state = AppState::new(registry);
        state.telemetry().record_ready_probe();
        assert_eq!(state.config().search_result_limit(), 5);
        assert!(state.orchestrator().settings().recognition_enabled);
    }
}
