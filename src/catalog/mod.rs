/// インメモリの製品カタログ。
///
/// 起動時に組み込みリストから初期化され、追加・更新・削除はプロセス内のリストにのみ反映される。
/// 再起動すると組み込みリストに戻る。
pub mod product;
pub mod seed;

use std::collections::{BTreeSet, HashSet};

use chrono::Utc;
use parking_lot::RwLock;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info};

use crate::category::Category;

pub use self::product::{NewProduct, ProductRecord, ProductUpdate};
pub use self::seed::seed_products;

/// 検索を実行する最小クエリ長（トリム後）。
pub const MIN_QUERY_LEN: usize = 2;
/// 人気製品として返す既定件数。
pub const DEFAULT_POPULAR_LIMIT: usize = 10;
/// 製品詳細に添える関連製品の件数。
pub const RELATED_PRODUCTS_LIMIT: usize = 3;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CatalogError {
    #[error("product id already exists: {0}")]
    DuplicateId(String),
    #[error("product name must not be empty")]
    EmptyName,
}

/// リサイクル統計。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RecyclingStats {
    pub total: usize,
    pub recyclable: usize,
    pub compostable: usize,
    pub special_disposal: usize,
    pub recyclable_percentage: u32,
    pub compostable_percentage: u32,
    pub special_disposal_percentage: u32,
}

#[derive(Debug)]
pub struct Catalog {
    products: RwLock<Vec<ProductRecord>>,
}

impl Default for Catalog {
    fn default() -> Self {
        Self::seeded()
    }
}

impl Catalog {
    /// 組み込みリストで初期化したカタログを返す。
    #[must_use]
    pub fn seeded() -> Self {
        Self {
            products: RwLock::new(seed_products()),
        }
    }

    /// 任意のレコード列からカタログを構築する。
    ///
    /// # Errors
    /// ID が重複している場合は [`CatalogError::DuplicateId`] を返す。
    pub fn new(products: Vec<ProductRecord>) -> Result<Self, CatalogError> {
        let mut seen = HashSet::with_capacity(products.len());
        for product in &products {
            if !seen.insert(product.id.as_str()) {
                return Err(CatalogError::DuplicateId(product.id.clone()));
            }
        }
        Ok(Self {
            products: RwLock::new(products),
        })
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.products.read().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.products.read().is_empty()
    }

    /// 名前・説明・キーワード・素材の部分一致で検索する。
    ///
    /// 並び順は「名前一致 → キーワード一致 → その他」の2段階で、同順位はカタログ順を保つ。
    /// トリム後の長さが [`MIN_QUERY_LEN`] 未満なら空を返す。
    #[must_use]
    pub fn search(&self, query: &str) -> Vec<ProductRecord> {
        let term = query.trim().to_lowercase();
        if term.chars().count() < MIN_QUERY_LEN {
            return Vec::new();
        }

        let products = self.products.read();
        let mut hits: Vec<(bool, bool, &ProductRecord)> = products
            .iter()
            .filter(|product| product.matches(&term))
            .map(|product| {
                (
                    product.name_matches(&term),
                    product.keyword_matches(&term),
                    product,
                )
            })
            .collect();

        // sort_by_key は安定ソート
        hits.sort_by_key(|(name_hit, keyword_hit, _)| (!*name_hit, !*keyword_hit));

        debug!(query = %term, hits = hits.len(), "catalog search");

        hits.into_iter()
            .map(|(_, _, product)| product.clone())
            .collect()
    }

    /// 検索結果を先頭 `limit` 件に絞る（タイプアヘッド用）。
    #[must_use]
    pub fn search_limited(&self, query: &str, limit: usize) -> Vec<ProductRecord> {
        let mut results = self.search(query);
        results.truncate(limit);
        results
    }

    #[must_use]
    pub fn get_product_by_id(&self, id: &str) -> Option<ProductRecord> {
        self.products
            .read()
            .iter()
            .find(|product| product.id == id)
            .cloned()
    }

    /// 全製品のスナップショット（カタログ順）。
    #[must_use]
    pub fn all_products(&self) -> Vec<ProductRecord> {
        self.products.read().clone()
    }

    #[must_use]
    pub fn get_products_by_category(&self, category: Category) -> Vec<ProductRecord> {
        self.products
            .read()
            .iter()
            .filter(|product| product.category == category)
            .cloned()
            .collect()
    }

    /// 同じカテゴリの他の製品をカタログ順に最大 `limit` 件返す。ID が存在しなければ空。
    #[must_use]
    pub fn get_related_products(&self, id: &str, limit: usize) -> Vec<ProductRecord> {
        let products = self.products.read();
        let Some(category) = products
            .iter()
            .find(|product| product.id == id)
            .map(|product| product.category)
        else {
            return Vec::new();
        };

        products
            .iter()
            .filter(|product| product.category == category && product.id != id)
            .take(limit)
            .cloned()
            .collect()
    }

    /// カタログに存在するカテゴリ（重複なし・昇順）。
    #[must_use]
    pub fn get_categories(&self) -> Vec<Category> {
        let categories: BTreeSet<Category> = self
            .products
            .read()
            .iter()
            .map(|product| product.category)
            .collect();
        let mut sorted: Vec<Category> = categories.into_iter().collect();
        sorted.sort_by_key(|category| category.as_str());
        sorted
    }

    /// カタログ先頭から `limit` 件を人気製品として返す。
    #[must_use]
    pub fn get_popular_products(&self, limit: usize) -> Vec<ProductRecord> {
        self.products.read().iter().take(limit).cloned().collect()
    }

    #[must_use]
    pub fn get_recycling_stats(&self) -> RecyclingStats {
        let products = self.products.read();
        let total = products.len();
        let recyclable = products.iter().filter(|p| p.recyclable).count();
        let compostable = products.iter().filter(|p| p.compostable).count();
        let special_disposal = products.iter().filter(|p| p.special_disposal).count();

        RecyclingStats {
            total,
            recyclable,
            compostable,
            special_disposal,
            recyclable_percentage: percentage(recyclable, total),
            compostable_percentage: percentage(compostable, total),
            special_disposal_percentage: percentage(special_disposal, total),
        }
    }

    /// 製品を末尾に追加する。
    ///
    /// # Errors
    /// 指定された ID が既に存在する場合、または名前が空の場合はエラーを返す。
    pub fn add_product(&self, product: NewProduct) -> Result<ProductRecord, CatalogError> {
        if product.name.trim().is_empty() {
            return Err(CatalogError::EmptyName);
        }

        let mut products = self.products.write();
        let id = match product.id.as_deref().map(str::trim) {
            Some(id) if !id.is_empty() => {
                if products.iter().any(|existing| existing.id == id) {
                    return Err(CatalogError::DuplicateId(id.to_string()));
                }
                id.to_string()
            }
            _ => generate_id(&products),
        };

        let record = product.into_record(id);
        products.push(record.clone());
        info!(id = %record.id, category = %record.category, "product added");
        Ok(record)
    }

    /// 製品を部分更新する。ID が存在しなければ `Ok(None)`。
    ///
    /// # Errors
    /// 更新後の名前が空になる場合は [`CatalogError::EmptyName`] を返し、レコードは変更しない。
    pub fn update_product(
        &self,
        id: &str,
        update: ProductUpdate,
    ) -> Result<Option<ProductRecord>, CatalogError> {
        if update.name.as_deref().is_some_and(|name| name.trim().is_empty()) {
            return Err(CatalogError::EmptyName);
        }

        let mut products = self.products.write();
        let Some(record) = products.iter_mut().find(|product| product.id == id) else {
            return Ok(None);
        };
        update.apply(record);
        info!(id = %record.id, "product updated");
        Ok(Some(record.clone()))
    }

    /// 製品を削除して返す。ID が存在しなければ `None`。
    pub fn delete_product(&self, id: &str) -> Option<ProductRecord> {
        let mut products = self.products.write();
        let index = products.iter().position(|product| product.id == id)?;
        let removed = products.remove(index);
        info!(id = %removed.id, "product deleted");
        Some(removed)
    }
}

fn generate_id(products: &[ProductRecord]) -> String {
    let base = format!("product-{}", Utc::now().timestamp_millis());
    let taken = |candidate: &str| products.iter().any(|product| product.id == candidate);

    if !taken(&base) {
        return base;
    }
    let mut suffix = 1_u32;
    loop {
        let candidate = format!("{base}-{suffix}");
        if !taken(&candidate) {
            return candidate;
        }
        suffix += 1;
    }
}

#[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn percentage(count: usize, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    (count as f64 / total as f64 * 100.0).round() as u32
}
