/// Prometheusメトリクス定義。
use prometheus::{
    HistogramOpts, HistogramVec, IntCounter, IntCounterVec, Opts, Registry,
    register_histogram_vec_with_registry, register_int_counter_vec_with_registry,
    register_int_counter_with_registry,
};
use std::sync::Arc;

const LATENCY_BUCKETS: &[f64] = &[0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 20.0];

/// メトリクスコレクター。
#[derive(Debug, Clone)]
pub struct Metrics {
    // カウンター
    pub classifications: IntCounterVec,
    pub provider_failures: IntCounterVec,
    pub catalog_searches: IntCounter,
    pub validation_rejections: IntCounter,

    // ヒストグラム
    pub provider_latency: HistogramVec,
}

impl Metrics {
    /// 新しいメトリクスコレクターを作成し、`registry` に登録する。
    ///
    /// # Errors
    /// 同名のメトリクスが既に登録されている場合はエラーを返す。
    pub fn new(registry: Arc<Registry>) -> Result<Self, prometheus::Error> {
        Ok(Self {
            classifications: register_int_counter_vec_with_registry!(
                Opts::new(
                    "waste_classifications_total",
                    "Total number of classification results by source and category"
                ),
                &["source", "category"],
                registry
            )?,
            provider_failures: register_int_counter_vec_with_registry!(
                Opts::new(
                    "waste_provider_failures_total",
                    "Total number of failed recognition stages by provider and error kind"
                ),
                &["provider", "kind"],
                registry
            )?,
            catalog_searches: register_int_counter_with_registry!(
                Opts::new(
                    "waste_catalog_searches_total",
                    "Total number of catalog searches"
                ),
                registry
            )?,
            validation_rejections: register_int_counter_with_registry!(
                Opts::new(
                    "waste_validation_rejections_total",
                    "Total number of classification requests rejected by validation"
                ),
                registry
            )?,
            provider_latency: register_histogram_vec_with_registry!(
                HistogramOpts::new(
                    "waste_provider_latency_seconds",
                    "Recognition stage latency in seconds"
                )
                .buckets(LATENCY_BUCKETS.to_vec()),
                &["provider"],
                registry
            )?,
        })
    }

    pub fn record_classification(&self, source: &str, category: &str) {
        self.classifications
            .with_label_values(&[source, category])
            .inc();
    }

    pub fn record_provider_failure(&self, provider: &str, kind: &str) {
        self.provider_failures
            .with_label_values(&[provider, kind])
            .inc();
    }

    pub fn observe_provider_latency(&self, provider: &str, seconds: f64) {
        self.provider_latency
            .with_label_values(&[provider])
            .observe(seconds);
    }
}
