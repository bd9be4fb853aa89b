use serde::{Deserialize, Serialize};

use crate::category::Category;

/// 1種類の製品（廃棄物）を表すカタログレコード。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductRecord {
    pub id: String,
    pub name: String,
    pub category: Category,
    pub material: String,
    pub description: String,
    pub keywords: Vec<String>,
    pub recyclable: bool,
    #[serde(default)]
    pub compostable: bool,
    #[serde(default)]
    pub special_disposal: bool,
    pub disposal_instructions: Vec<String>,
    pub icon: String,
}

impl ProductRecord {
    /// 検索語（小文字化済み）が名前に含まれるか。
    pub(crate) fn name_matches(&self, term: &str) -> bool {
        self.name.to_lowercase().contains(term)
    }

    pub(crate) fn keyword_matches(&self, term: &str) -> bool {
        self.keywords
            .iter()
            .any(|keyword| keyword.to_lowercase().contains(term))
    }

    pub(crate) fn matches(&self, term: &str) -> bool {
        self.name_matches(term)
            || self.description.to_lowercase().contains(term)
            || self.keyword_matches(term)
            || self.material.to_lowercase().contains(term)
    }
}

/// 追加用の製品定義。`id` を省略した場合はカタログが採番する。
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct NewProduct {
    #[serde(default)]
    pub id: Option<String>,
    pub name: String,
    pub category: Category,
    #[serde(default)]
    pub material: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default)]
    pub recyclable: bool,
    #[serde(default)]
    pub compostable: bool,
    #[serde(default)]
    pub special_disposal: bool,
    #[serde(default)]
    pub disposal_instructions: Vec<String>,
    #[serde(default)]
    pub icon: String,
}

impl NewProduct {
    pub(crate) fn into_record(self, id: String) -> ProductRecord {
        ProductRecord {
            id,
            name: self.name,
            category: self.category,
            material: self.material,
            description: self.description,
            keywords: self.keywords,
            recyclable: self.recyclable,
            compostable: self.compostable,
            special_disposal: self.special_disposal,
            disposal_instructions: self.disposal_instructions,
            icon: self.icon,
        }
    }
}

/// 部分更新。指定されたフィールドのみ上書きし、`id` は変更できない。
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ProductUpdate {
    pub name: Option<String>,
    pub category: Option<Category>,
    pub material: Option<String>,
    pub description: Option<String>,
    pub keywords: Option<Vec<String>>,
    pub recyclable: Option<bool>,
    pub compostable: Option<bool>,
    pub special_disposal: Option<bool>,
    pub disposal_instructions: Option<Vec<String>>,
    pub icon: Option<String>,
}

impl ProductUpdate {
    pub(crate) fn apply(self, record: &mut ProductRecord) {
        if let Some(name) = self.name {
            record.name = name;
        }
        if let Some(category) = self.category {
            record.category = category;
        }
        if let Some(material) = self.material {
            record.material = material;
        }
        if let Some(description) = self.description {
            record.description = description;
        }
        if let Some(keywords) = self.keywords {
            record.keywords = keywords;
        }
        if let Some(recyclable) = self.recyclable {
            record.recyclable = recyclable;
        }
        if let Some(compostable) = self.compostable {
            record.compostable = compostable;
        }
        if let Some(special_disposal) = self.special_disposal {
            record.special_disposal = special_disposal;
        }
        if let Some(instructions) = self.disposal_instructions {
            record.disposal_instructions = instructions;
        }
        if let Some(icon) = self.icon {
            record.icon = icon;
        }
    }
}
