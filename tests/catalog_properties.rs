// 製品カタログの検索・統計の性質。
use rstest::rstest;
use waste_classifier::catalog::{Catalog, CatalogError, NewProduct, ProductUpdate, seed_products};
use waste_classifier::category::Category;

fn ids(catalog: &Catalog, query: &str) -> Vec<String> {
    catalog
        .search(query)
        .into_iter()
        .map(|product| product.id)
        .collect()
}

fn trash(name: &str) -> NewProduct {
    NewProduct {
        id: None,
        name: name.to_string(),
        category: Category::Garbage,
        material: "Mixed".to_string(),
        description: String::new(),
        keywords: Vec::new(),
        recyclable: false,
        compostable: false,
        special_disposal: false,
        disposal_instructions: Vec::new(),
        icon: String::new(),
    }
}

#[rstest]
#[case("")]
#[case("a")]
#[case(" j ")]
fn short_queries_return_nothing(#[case] query: &str) {
    assert!(Catalog::seeded().search(query).is_empty());
}

#[test]
fn two_character_query_may_match() {
    assert!(!Catalog::seeded().search("ja").is_empty());
}

#[test]
fn jar_query_ranks_name_match_first() {
    let catalog = Catalog::seeded();
    let results = ids(&catalog, "jar");

    assert_eq!(results.first().map(String::as_str), Some("glass-jar"));
}

#[test]
fn search_is_idempotent() {
    let catalog = Catalog::seeded();
    for query in ["bottle", "recyclable", "can", "paper", "organic"] {
        assert_eq!(ids(&catalog, query), ids(&catalog, query));
    }
}

#[test]
fn search_is_case_insensitive() {
    let catalog = Catalog::seeded();
    assert_eq!(ids(&catalog, "BOTTLE"), ids(&catalog, "bottle"));
}

#[test]
fn missing_id_is_not_found() {
    let catalog = Catalog::seeded();
    assert!(catalog.get_product_by_id("does-not-exist").is_none());
    assert!(
        catalog
            .update_product("does-not-exist", ProductUpdate::default())
            .expect("empty update is valid")
            .is_none()
    );
    assert!(catalog.delete_product("does-not-exist").is_none());
}

#[test]
fn stats_follow_catalog_size() {
    let catalog = Catalog::seeded();
    let before = catalog.get_recycling_stats();
    assert_eq!(before.total, 19);
    assert_eq!(before.recyclable, 15);
    assert_eq!(before.recyclable_percentage, 79);

    catalog.add_product(trash("Ceramic Plate")).expect("add product");

    let after = catalog.get_recycling_stats();
    assert_eq!(after.total, 20);
    assert_eq!(after.recyclable, 15);
    assert_eq!(after.recyclable_percentage, 75);
}

#[test]
fn stats_round_for_eighteen_record_catalog() {
    // 18件中14件がリサイクル可能なカタログ
    let products: Vec<_> = seed_products()
        .into_iter()
        .filter(|product| product.id != "glass-jar")
        .collect();
    let catalog = Catalog::new(products).expect("catalog builds");

    let before = catalog.get_recycling_stats();
    assert_eq!(before.total, 18);
    assert_eq!(before.recyclable, 14);
    assert_eq!(before.recyclable_percentage, 78);

    catalog.add_product(trash("Ceramic Plate")).expect("add product");

    let after = catalog.get_recycling_stats();
    assert_eq!(after.total, 19);
    assert_eq!(after.recyclable_percentage, 74);
}

#[test]
fn generated_ids_stay_unique() {
    let catalog = Catalog::seeded();
    let first = catalog.add_product(trash("First")).expect("add first");
    let second = catalog.add_product(trash("Second")).expect("add second");

    assert_ne!(first.id, second.id);
    assert!(first.id.starts_with("product-"));
    assert_eq!(catalog.len(), 21);
}

#[test]
fn explicit_duplicate_id_is_rejected() {
    let catalog = Catalog::seeded();
    let mut product = trash("Another Laptop");
    product.id = Some("laptop".to_string());

    assert_eq!(
        catalog.add_product(product),
        Err(CatalogError::DuplicateId("laptop".to_string()))
    );
}

#[test]
fn added_products_become_searchable() {
    let catalog = Catalog::seeded();
    let mut product = trash("Ceramic Plate");
    product.keywords = vec!["dish".to_string()];
    catalog.add_product(product).expect("add product");

    let results = catalog.search("dish");
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].name, "Ceramic Plate");
}
