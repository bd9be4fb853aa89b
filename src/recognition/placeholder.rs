/// 乱数ベースのプレースホルダ段。
///
/// どちらも実際の推論は行わない。ローカルモデルが用意されるまでの仮実装であり、
/// 本番の分類精度を意図したものではない。テストでは `with_seed` で決定的にできる。
use std::ops::Range;

use async_trait::async_trait;
use parking_lot::Mutex;
use rand::{Rng, SeedableRng, rngs::StdRng};

use crate::category::Category;

use super::provider::{Detection, ImageInput, ImageLabelProvider, ProviderError};

/// 最終フォールバックで選ばれるカテゴリ。
pub const FALLBACK_CATEGORIES: [Category; 4] = [
    Category::Plastic,
    Category::Paper,
    Category::Organic,
    Category::Garbage,
];

const PLACEHOLDER_CONFIDENCE: Range<f64> = 0.7..1.0;
const FALLBACK_CONFIDENCE: Range<f64> = 0.6..1.0;

#[derive(Debug)]
struct RandomPick {
    rng: Mutex<StdRng>,
}

impl RandomPick {
    fn from_os() -> Self {
        Self {
            rng: Mutex::new(StdRng::from_os_rng()),
        }
    }

    fn seeded(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }

    fn pick(&self, categories: &[Category], confidence: Range<f64>) -> (Category, f64) {
        let mut rng = self.rng.lock();
        let category = categories
            .get(rng.random_range(0..categories.len()))
            .copied()
            .unwrap_or(Category::Garbage);
        (category, rng.random_range(confidence))
    }
}

/// ローカル（カスタム）モデル段のプレースホルダ。
///
/// 6カテゴリから一様にカテゴリを選び、信頼度は [0.7, 1.0) の一様乱数。
#[derive(Debug)]
pub struct PlaceholderLocalProvider {
    pick: RandomPick,
}

impl Default for PlaceholderLocalProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl PlaceholderLocalProvider {
    pub const NAME: &'static str = "local_model";

    #[must_use]
    pub fn new() -> Self {
        Self {
            pick: RandomPick::from_os(),
        }
    }

    #[must_use]
    pub fn with_seed(seed: u64) -> Self {
        Self {
            pick: RandomPick::seeded(seed),
        }
    }
}

#[async_trait]
impl ImageLabelProvider for PlaceholderLocalProvider {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    async fn detect(&self, _image: &ImageInput) -> Result<Detection, ProviderError> {
        let (category, confidence) = self
            .pick
            .pick(&Category::CLASSIFIABLE, PLACEHOLDER_CONFIDENCE);
        Ok(Detection::Verdict {
            category,
            confidence,
        })
    }
}

/// フォールバックチェーン終端。失敗しない。
///
/// {plastic, paper, organic, garbage} から一様に選び、信頼度は [0.6, 1.0) の一様乱数。
#[derive(Debug)]
pub struct RandomFallback {
    pick: RandomPick,
}

impl Default for RandomFallback {
    fn default() -> Self {
        Self::new()
    }
}

impl RandomFallback {
    #[must_use]
    pub fn new() -> Self {
        Self {
            pick: RandomPick::from_os(),
        }
    }

    #[must_use]
    pub fn with_seed(seed: u64) -> Self {
        Self {
            pick: RandomPick::seeded(seed),
        }
    }

    #[must_use]
    pub fn classify(&self) -> (Category, f64) {
        self.pick.pick(&FALLBACK_CATEGORIES, FALLBACK_CONFIDENCE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn image() -> ImageInput {
        ImageInput::from_bytes(vec![1, 2, 3]).expect("image")
    }

    #[tokio::test]
    async fn placeholder_stays_within_bounds() {
        let provider = PlaceholderLocalProvider::with_seed(7);
        for _ in 0..200 {
            let Detection::Verdict {
                category,
                confidence,
            } = provider.detect(&image()).await.expect("never fails")
            else {
                panic!("placeholder must return a verdict");
            };
            assert!(Category::CLASSIFIABLE.contains(&category));
            assert!((0.7..1.0).contains(&confidence));
        }
    }

    #[tokio::test]
    async fn placeholder_is_deterministic_with_seed() {
        let first = PlaceholderLocalProvider::with_seed(42);
        let second = PlaceholderLocalProvider::with_seed(42);
        for _ in 0..10 {
            assert_eq!(
                first.detect(&image()).await.expect("detect"),
                second.detect(&image()).await.expect("detect")
            );
        }
    }

    #[test]
    fn fallback_stays_within_bounds() {
        let fallback = RandomFallback::with_seed(3);
        for _ in 0..200 {
            let (category, confidence) = fallback.classify();
            assert!(FALLBACK_CATEGORIES.contains(&category));
            assert!((0.6..1.0).contains(&confidence));
        }
    }

    #[test]
    fn fallback_never_picks_glass_or_metal() {
        let fallback = RandomFallback::with_seed(11);
        let picked: Vec<Category> = (0..500).map(|_| fallback.classify().0).collect();
        assert!(!picked.contains(&Category::Glass));
        assert!(!picked.contains(&Category::Metal));
        assert!(picked.contains(&Category::Garbage));
    }
}
