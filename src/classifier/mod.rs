/// キーワード集合による廃棄物分類器。
///
/// 同じキーワードテーブルを2通りの戦略で評価する。
/// - `FirstMatch`: 優先順に規則を試し、最初に一致した規則の固定信頼度を返す。
/// - `BestMatch`: 規則ごとに一致率から信頼度を算出し、最大のものを返す。
pub mod keywords;

use serde::Serialize;

use crate::category::Category;

pub use self::keywords::{KeywordRule, LABEL_RULES, TEXT_RULES};

/// どの規則にも一致しなかったときのカテゴリと信頼度。
pub const DEFAULT_CATEGORY: Category = Category::Garbage;
pub const DEFAULT_CONFIDENCE: f64 = 0.5;

const BEST_MATCH_FLOOR: f64 = 0.3;
const BEST_MATCH_CAP: f64 = 0.95;

/// 規則の評価戦略。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchStrategy {
    FirstMatch,
    BestMatch,
}

impl MatchStrategy {
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_lowercase().as_str() {
            "first_match" | "first-match" | "first" => Some(MatchStrategy::FirstMatch),
            "best_match" | "best-match" | "best" => Some(MatchStrategy::BestMatch),
            _ => None,
        }
    }
}

/// 分類結果（カテゴリと信頼度）。
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KeywordMatch {
    pub category: Category,
    pub confidence: f64,
    pub matched_keywords: Vec<&'static str>,
}

impl KeywordMatch {
    fn fallback() -> Self {
        Self {
            category: DEFAULT_CATEGORY,
            confidence: DEFAULT_CONFIDENCE,
            matched_keywords: Vec::new(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct KeywordClassifier {
    rules: &'static [KeywordRule],
    strategy: MatchStrategy,
}

impl KeywordClassifier {
    #[must_use]
    pub const fn new(rules: &'static [KeywordRule], strategy: MatchStrategy) -> Self {
        Self { rules, strategy }
    }

    /// 自由記述テキスト用の first-match 分類器。
    #[must_use]
    pub const fn for_text() -> Self {
        Self::new(TEXT_RULES, MatchStrategy::FirstMatch)
    }

    /// 画像認識ラベル用の best-match 分類器。
    #[must_use]
    pub const fn for_labels() -> Self {
        Self::new(LABEL_RULES, MatchStrategy::BestMatch)
    }

    #[must_use]
    pub const fn strategy(&self) -> MatchStrategy {
        self.strategy
    }

    /// 1つのテキストを分類する。キーワードはテキストの部分文字列として判定する。
    #[must_use]
    pub fn classify_text(&self, text: &str) -> KeywordMatch {
        let haystack = text.to_lowercase();
        self.classify_haystacks(&[haystack.as_str()])
    }

    /// 認識ラベルの集合を分類する。いずれかのラベルがキーワードを含めば一致とみなす。
    #[must_use]
    pub fn classify_labels<S: AsRef<str>>(&self, labels: &[S]) -> KeywordMatch {
        let lowered: Vec<String> = labels
            .iter()
            .map(|label| label.as_ref().to_lowercase())
            .collect();
        let haystacks: Vec<&str> = lowered.iter().map(String::as_str).collect();
        self.classify_haystacks(&haystacks)
    }

    fn classify_haystacks(&self, haystacks: &[&str]) -> KeywordMatch {
        match self.strategy {
            MatchStrategy::FirstMatch => self.first_match(haystacks),
            MatchStrategy::BestMatch => self.best_match(haystacks),
        }
    }

    fn first_match(&self, haystacks: &[&str]) -> KeywordMatch {
        self.rules
            .iter()
            .find_map(|rule| {
                let matched = matched_keywords(rule, haystacks);
                (!matched.is_empty()).then(|| KeywordMatch {
                    category: rule.category,
                    confidence: rule.confidence,
                    matched_keywords: matched,
                })
            })
            .unwrap_or_else(KeywordMatch::fallback)
    }

    fn best_match(&self, haystacks: &[&str]) -> KeywordMatch {
        let mut best = KeywordMatch::fallback();

        for rule in self.rules {
            if rule.keywords.is_empty() {
                continue;
            }
            let matched = matched_keywords(rule, haystacks);
            #[allow(clippy::cast_precision_loss)]
            let ratio = matched.len() as f64 / rule.keywords.len() as f64;
            let confidence = (ratio + BEST_MATCH_FLOOR).min(BEST_MATCH_CAP);

            // 同点の場合は先に評価した規則を残す
            if confidence > best.confidence {
                best = KeywordMatch {
                    category: rule.category,
                    confidence,
                    matched_keywords: matched,
                };
            }
        }

        best
    }
}

fn matched_keywords(rule: &KeywordRule, haystacks: &[&str]) -> Vec<&'static str> {
    rule.keywords
        .iter()
        .copied()
        .filter(|keyword| haystacks.iter().any(|haystack| haystack.contains(keyword)))
        .collect()
}
