/// 廃棄物カテゴリとその固定メタデータ。
///
/// メタデータと廃棄手順はプロセス全体で不変の定数として扱い、実行時に変更しない。
use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// 廃棄物カテゴリ（閉じた列挙）。
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Plastic,
    Paper,
    Organic,
    Glass,
    Metal,
    Textile,
    Electronics,
    Garbage,
}

/// カテゴリの表示用メタデータ。
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryDetails {
    pub name: &'static str,
    pub icon: &'static str,
    pub description: &'static str,
    pub color: &'static str,
    pub recyclable: bool,
    pub compostable: bool,
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown waste category: {0}")]
pub struct ParseCategoryError(pub String);

static PLASTIC: CategoryDetails = CategoryDetails {
    name: "Plastic",
    icon: "🔄",
    description: "Recyclable plastic materials",
    color: "#2196F3",
    recyclable: true,
    compostable: false,
};

static PAPER: CategoryDetails = CategoryDetails {
    name: "Paper/Cardboard",
    icon: "📄",
    description: "Paper and cardboard materials",
    color: "#8BC34A",
    recyclable: true,
    compostable: false,
};

static ORGANIC: CategoryDetails = CategoryDetails {
    name: "Organic/Wet Waste",
    icon: "🍎",
    description: "Biodegradable food and organic materials",
    color: "#FF9800",
    recyclable: false,
    compostable: true,
};

static GLASS: CategoryDetails = CategoryDetails {
    name: "Glass",
    icon: "🍶",
    description: "Glass containers and bottles",
    color: "#9C27B0",
    recyclable: true,
    compostable: false,
};

static METAL: CategoryDetails = CategoryDetails {
    name: "Metal",
    icon: "🥫",
    description: "Metal cans and containers",
    color: "#607D8B",
    recyclable: true,
    compostable: false,
};

static GARBAGE: CategoryDetails = CategoryDetails {
    name: "General Garbage",
    icon: "🗑️",
    description: "Non-recyclable waste",
    color: "#795548",
    recyclable: false,
    compostable: false,
};

const PLASTIC_INSTRUCTIONS: &[&str] = &[
    "Clean the plastic item before recycling",
    "Remove any food residue or labels if possible",
    "Check if your local recycling program accepts this type of plastic",
    "Look for recycling symbols (1-7) on the item",
    "Place in recycling bin or take to recycling center",
];

const PAPER_INSTRUCTIONS: &[&str] = &[
    "Remove any plastic or metal components",
    "Keep paper dry and clean",
    "Flatten cardboard boxes to save space",
    "Remove any food contamination",
    "Place in paper recycling bin",
];

const ORGANIC_INSTRUCTIONS: &[&str] = &[
    "Remove any non-organic materials (plastic, metal)",
    "Compost at home if possible",
    "Use municipal composting service",
    "Avoid putting meat or dairy in home compost",
    "Consider worm composting for food scraps",
];

const GLASS_INSTRUCTIONS: &[&str] = &[
    "Remove caps and lids (recycle separately)",
    "Rinse glass containers",
    "Check for cracks - broken glass may need special handling",
    "Separate by color if required by local program",
    "Place in glass recycling bin",
];

const METAL_INSTRUCTIONS: &[&str] = &[
    "Rinse metal containers",
    "Remove any plastic or paper labels",
    "Flatten aluminum cans to save space",
    "Separate ferrous and non-ferrous metals if required",
    "Place in metal recycling bin",
];

const GARBAGE_INSTRUCTIONS: &[&str] = &[
    "Ensure item is completely non-recyclable",
    "Remove any recyclable components first",
    "Consider if item can be donated or repurposed",
    "Check if item can be taken to special collection",
    "Place in general waste bin",
];

impl Category {
    /// 全カテゴリ（宣言順）。
    pub const ALL: [Category; 8] = [
        Category::Plastic,
        Category::Paper,
        Category::Organic,
        Category::Glass,
        Category::Metal,
        Category::Textile,
        Category::Electronics,
        Category::Garbage,
    ];

    /// キーワード分類器とモデルステージが出力し得る6カテゴリ。
    pub const CLASSIFIABLE: [Category; 6] = [
        Category::Plastic,
        Category::Paper,
        Category::Organic,
        Category::Glass,
        Category::Metal,
        Category::Garbage,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Category::Plastic => "plastic",
            Category::Paper => "paper",
            Category::Organic => "organic",
            Category::Glass => "glass",
            Category::Metal => "metal",
            Category::Textile => "textile",
            Category::Electronics => "electronics",
            Category::Garbage => "garbage",
        }
    }

    /// カテゴリの表示メタデータを返す。
    ///
    /// textile / electronics には専用のメタデータが定義されていないため、
    /// 一般ごみ（garbage）のレコードにフォールバックする。
    #[must_use]
    pub fn details(self) -> &'static CategoryDetails {
        match self {
            Category::Plastic => &PLASTIC,
            Category::Paper => &PAPER,
            Category::Organic => &ORGANIC,
            Category::Glass => &GLASS,
            Category::Metal => &METAL,
            Category::Textile | Category::Electronics | Category::Garbage => &GARBAGE,
        }
    }

    /// カテゴリ既定の廃棄手順を返す。
    #[must_use]
    pub const fn disposal_instructions(self) -> &'static [&'static str] {
        match self {
            Category::Plastic => PLASTIC_INSTRUCTIONS,
            Category::Paper => PAPER_INSTRUCTIONS,
            Category::Organic => ORGANIC_INSTRUCTIONS,
            Category::Glass => GLASS_INSTRUCTIONS,
            Category::Metal => METAL_INSTRUCTIONS,
            Category::Textile | Category::Electronics | Category::Garbage => GARBAGE_INSTRUCTIONS,
        }
    }

    #[must_use]
    pub fn instruction_list(self) -> Vec<String> {
        self.disposal_instructions()
            .iter()
            .map(|step| (*step).to_string())
            .collect()
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = ParseCategoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase();
        Category::ALL
            .into_iter()
            .find(|category| category.as_str() == normalized)
            .ok_or_else(|| ParseCategoryError(s.to_string()))
    }
}

/// テキスト入力フォームで選択できる素材タグ。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MaterialTag {
    Plastic,
    Paper,
    Metal,
    Glass,
    Organic,
    Textile,
    Unknown,
}

impl MaterialTag {
    pub const ALL: [MaterialTag; 7] = [
        MaterialTag::Plastic,
        MaterialTag::Paper,
        MaterialTag::Metal,
        MaterialTag::Glass,
        MaterialTag::Organic,
        MaterialTag::Textile,
        MaterialTag::Unknown,
    ];

    /// 分類テキストに連結される値。
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            MaterialTag::Plastic => "plastic",
            MaterialTag::Paper => "paper",
            MaterialTag::Metal => "metal",
            MaterialTag::Glass => "glass",
            MaterialTag::Organic => "organic",
            MaterialTag::Textile => "textile",
            MaterialTag::Unknown => "unknown",
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            MaterialTag::Plastic => "Plastic",
            MaterialTag::Paper => "Paper/Cardboard",
            MaterialTag::Metal => "Metal",
            MaterialTag::Glass => "Glass",
            MaterialTag::Organic => "Organic/Food",
            MaterialTag::Textile => "Textile",
            MaterialTag::Unknown => "Unknown",
        }
    }

    #[must_use]
    pub const fn icon(self) -> &'static str {
        match self {
            MaterialTag::Plastic => "🔄",
            MaterialTag::Paper => "📄",
            MaterialTag::Metal => "🥫",
            MaterialTag::Glass => "🍶",
            MaterialTag::Organic => "🍎",
            MaterialTag::Textile => "👕",
            MaterialTag::Unknown => "❓",
        }
    }

    /// 選択ボタンの表示色。
    #[must_use]
    pub const fn color(self) -> &'static str {
        match self {
            MaterialTag::Plastic => "#2196F3",
            MaterialTag::Paper => "#8BC34A",
            MaterialTag::Metal => "#607D8B",
            MaterialTag::Glass => "#9C27B0",
            MaterialTag::Organic => "#FF9800",
            MaterialTag::Textile => "#E91E63",
            MaterialTag::Unknown => "#9E9E9E",
        }
    }
}

/// 結果画面で表示する信頼度の区分。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfidenceLevel {
    High,
    Medium,
    Low,
}

impl ConfidenceLevel {
    #[must_use]
    pub fn from_confidence(confidence: f64) -> Self {
        if confidence >= 0.8 {
            ConfidenceLevel::High
        } else if confidence >= 0.6 {
            ConfidenceLevel::Medium
        } else {
            ConfidenceLevel::Low
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("plastic", Category::Plastic)]
    #[case(" Glass ", Category::Glass)]
    #[case("ELECTRONICS", Category::Electronics)]
    #[case("textile", Category::Textile)]
    fn from_str_is_case_insensitive(#[case] raw: &str, #[case] expected: Category) {
        assert_eq!(raw.parse::<Category>().expect("category parses"), expected);
    }

    #[test]
    fn from_str_rejects_unknown() {
        let error = "styrofoam".parse::<Category>().expect_err("should fail");
        assert_eq!(error, ParseCategoryError("styrofoam".to_string()));
    }

    #[test]
    fn display_round_trips_through_serde_name() {
        for category in Category::ALL {
            let json = serde_json::to_string(&category).expect("serializes");
            assert_eq!(json, format!("\"{category}\""));
        }
    }

    #[test]
    fn textile_and_electronics_fall_back_to_garbage_metadata() {
        assert_eq!(Category::Textile.details(), Category::Garbage.details());
        assert_eq!(Category::Electronics.details(), Category::Garbage.details());
        assert_eq!(
            Category::Electronics.disposal_instructions(),
            Category::Garbage.disposal_instructions()
        );
    }

    #[test]
    fn organic_is_compostable_not_recyclable() {
        let details = Category::Organic.details();
        assert!(details.compostable);
        assert!(!details.recyclable);
        assert_eq!(details.name, "Organic/Wet Waste");
    }

    #[test]
    fn every_category_has_five_instructions() {
        for category in Category::ALL {
            assert_eq!(category.disposal_instructions().len(), 5, "{category}");
        }
    }

    #[rstest]
    #[case(0.95, ConfidenceLevel::High)]
    #[case(0.8, ConfidenceLevel::High)]
    #[case(0.6, ConfidenceLevel::Medium)]
    #[case(0.5, ConfidenceLevel::Low)]
    fn confidence_level_bands(#[case] confidence: f64, #[case] expected: ConfidenceLevel) {
        assert_eq!(ConfidenceLevel::from_confidence(confidence), expected);
    }

    #[rstest]
    #[case(MaterialTag::Plastic, "#2196F3")]
    #[case(MaterialTag::Textile, "#E91E63")]
    #[case(MaterialTag::Unknown, "#9E9E9E")]
    fn material_tag_colors(#[case] tag: MaterialTag, #[case] expected: &str) {
        assert_eq!(tag.color(), expected);
    }

    #[test]
    fn material_tag_deserializes_from_form_value() {
        let tag: MaterialTag = serde_json::from_str("\"organic\"").expect("tag parses");
        assert_eq!(tag, MaterialTag::Organic);
        assert_eq!(tag.label(), "Organic/Food");
        assert_eq!(MaterialTag::ALL.len(), 7);
    }
}
