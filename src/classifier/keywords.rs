/// 分類用キーワードテーブル。
///
/// テーブル内の順序はそのまま優先順位になる（first-match では先頭の規則が勝つ）。
use crate::category::Category;

/// 1カテゴリ分のキーワード規則。
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KeywordRule {
    pub category: Category,
    pub keywords: &'static [&'static str],
    /// first-match で一致したときに返す固定信頼度。
    pub confidence: f64,
}

/// 自由記述テキスト用の規則（plastic → paper → organic → glass → metal）。
pub const TEXT_RULES: &[KeywordRule] = &[
    KeywordRule {
        category: Category::Plastic,
        keywords: &["plastic", "bottle", "bag", "container", "wrapper"],
        confidence: 0.85,
    },
    KeywordRule {
        category: Category::Paper,
        keywords: &["paper", "cardboard", "box", "newspaper", "magazine"],
        confidence: 0.85,
    },
    KeywordRule {
        category: Category::Organic,
        keywords: &[
            "food",
            "organic",
            "banana",
            "apple",
            "vegetable",
            "fruit",
            "scraps",
        ],
        confidence: 0.90,
    },
    KeywordRule {
        category: Category::Glass,
        keywords: &["glass", "jar", "bottle"],
        confidence: 0.80,
    },
    KeywordRule {
        category: Category::Metal,
        keywords: &["metal", "can", "aluminum", "tin"],
        confidence: 0.80,
    },
];

/// 画像認識ラベル用の拡張規則。信頼度は一致率から算出するため固定値は参照されない。
pub const LABEL_RULES: &[KeywordRule] = &[
    KeywordRule {
        category: Category::Plastic,
        keywords: &[
            "plastic",
            "bottle",
            "bag",
            "container",
            "wrapper",
            "packaging",
            "polyethylene",
            "pvc",
        ],
        confidence: 0.85,
    },
    KeywordRule {
        category: Category::Paper,
        keywords: &[
            "paper",
            "cardboard",
            "box",
            "newspaper",
            "magazine",
            "document",
            "tissue",
            "napkin",
        ],
        confidence: 0.85,
    },
    KeywordRule {
        category: Category::Organic,
        keywords: &[
            "food",
            "fruit",
            "vegetable",
            "organic",
            "banana",
            "apple",
            "orange",
            "scraps",
            "compost",
        ],
        confidence: 0.90,
    },
    KeywordRule {
        category: Category::Glass,
        keywords: &[
            "glass",
            "jar",
            "bottle",
            "container",
            "crystal",
            "transparent",
        ],
        confidence: 0.80,
    },
    KeywordRule {
        category: Category::Metal,
        keywords: &["metal", "can", "aluminum", "tin", "steel", "iron", "copper"],
        confidence: 0.80,
    },
];
