pub mod metrics;
pub(crate) mod tracing;

use std::sync::Arc;

use anyhow::{Context, Result};
use prometheus::{Encoder, Registry, TextEncoder};

use self::metrics::Metrics;

/// Telemetry（メトリクスとトレーシング）を管理する構造体。
///
/// メトリクスはインスタンスごとの [`Registry`] に登録するため、
/// テストで複数のインスタンスを作っても衝突しない。
#[derive(Debug, Clone)]
pub struct Telemetry {
    metrics: Arc<Metrics>,
    registry: Arc<Registry>,
}

impl Telemetry {
    /// 新しいTelemetryインスタンスを作成し、トレーシングとメトリクスを初期化する。
    ///
    /// # Errors
    /// トレーシングの初期化またはメトリクス登録に失敗した場合はエラーを返す。
    pub fn new() -> Result<Self> {
        tracing::init()?;
        Self::without_tracing()
    }

    /// トレーシングを初期化せずにメトリクスだけを用意する（テスト用）。
    ///
    /// # Errors
    /// メトリクス登録に失敗した場合はエラーを返す。
    pub fn without_tracing() -> Result<Self> {
        let registry = Arc::new(Registry::new());
        let metrics = Arc::new(
            Metrics::new(Arc::clone(&registry)).context("failed to register metrics")?,
        );
        Ok(Self { metrics, registry })
    }

    /// メトリクスへのアクセスを提供する。
    #[must_use]
    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }

    #[must_use]
    pub fn metrics_arc(&self) -> Arc<Metrics> {
        Arc::clone(&self.metrics)
    }

    /// 準備完了プローブを記録する。
    pub fn record_ready_probe(&self) {
        ::tracing::info!("service ready probe recorded");
    }

    /// ライブプローブを記録する。
    pub fn record_live_probe(&self) {
        ::tracing::debug!("service live probe");
    }

    /// Prometheusメトリクスをレンダリングする。
    #[must_use]
    pub fn render_prometheus(&self) -> String {
        let encoder = TextEncoder::new();
        let metric_families = self.registry.gather();
        let mut buffer = Vec::new();
        encoder.encode(&metric_families, &mut buffer).ok();
        String::from_utf8(buffer).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn render_includes_recorded_counters() {
        let telemetry = Telemetry::without_tracing().expect("telemetry");
        telemetry
            .metrics()
            .record_classification("fallback", "paper");
        telemetry.metrics().validation_rejections.inc();

        let rendered = telemetry.render_prometheus();
        assert!(rendered.contains("waste_classifications_total{"));
        assert!(rendered.contains("source=\"fallback\""));
        assert!(rendered.contains("category=\"paper\""));
        assert!(rendered.contains("waste_validation_rejections_total 1"));
    }

    #[test]
    fn metrics_arc_shares_collectors() {
        let telemetry = Telemetry::without_tracing().expect("telemetry");
        telemetry.metrics_arc().catalog_searches.inc();
        assert_eq!(telemetry.metrics().catalog_searches.get(), 1);
    }
}
