/// 起動時に読み込む組み込み製品リスト。
use crate::category::Category;

use super::product::ProductRecord;

struct SeedProduct {
    id: &'static str,
    name: &'static str,
    category: Category,
    material: &'static str,
    description: &'static str,
    keywords: &'static [&'static str],
    recyclable: bool,
    compostable: bool,
    special_disposal: bool,
    disposal_instructions: &'static [&'static str],
    icon: &'static str,
}

impl SeedProduct {
    fn to_record(&self) -> ProductRecord {
        ProductRecord {
            id: self.id.to_string(),
            name: self.name.to_string(),
            category: self.category,
            material: self.material.to_string(),
            description: self.description.to_string(),
            keywords: self.keywords.iter().map(|k| (*k).to_string()).collect(),
            recyclable: self.recyclable,
            compostable: self.compostable,
            special_disposal: self.special_disposal,
            disposal_instructions: self
                .disposal_instructions
                .iter()
                .map(|s| (*s).to_string())
                .collect(),
            icon: self.icon.to_string(),
        }
    }
}

const SEED: &[SeedProduct] = &[
    // Plastic
    SeedProduct {
        id: "plastic-bottle-water",
        name: "Water Bottle",
        category: Category::Plastic,
        material: "PET (Polyethylene Terephthalate)",
        description: "Clear plastic water bottle, typically made from PET plastic. Usually recyclable.",
        keywords: &["water", "bottle", "plastic", "drink", "pet", "clear"],
        recyclable: true,
        compostable: false,
        special_disposal: false,
        disposal_instructions: &[
            "Remove cap and label if possible",
            "Rinse thoroughly",
            "Check for recycling symbol #1",
            "Place in plastic recycling bin",
        ],
        icon: "🥤",
    },
    SeedProduct {
        id: "plastic-bottle-soda",
        name: "Soda Bottle",
        category: Category::Plastic,
        material: "PET (Polyethylene Terephthalate)",
        description: "Colored plastic soda bottle, typically made from PET plastic. Usually recyclable.",
        keywords: &["soda", "bottle", "plastic", "drink", "pet", "colored"],
        recyclable: true,
        compostable: false,
        special_disposal: false,
        disposal_instructions: &[
            "Remove cap and label",
            "Rinse thoroughly to remove sticky residue",
            "Check for recycling symbol #1",
            "Place in plastic recycling bin",
        ],
        icon: "🥤",
    },
    SeedProduct {
        id: "plastic-bag",
        name: "Plastic Bag",
        category: Category::Plastic,
        material: "HDPE (High-Density Polyethylene)",
        description: "Thin plastic shopping bag, typically made from HDPE. Check local recycling programs.",
        keywords: &["bag", "plastic", "shopping", "grocery", "hdpe"],
        recyclable: true,
        compostable: false,
        special_disposal: false,
        disposal_instructions: &[
            "Check if your local store accepts plastic bag recycling",
            "Remove any receipts or stickers",
            "Take to designated plastic bag collection point",
            "Do not put in regular recycling bin",
        ],
        icon: "🛍️",
    },
    SeedProduct {
        id: "plastic-container",
        name: "Food Container",
        category: Category::Plastic,
        material: "Various plastics (PP, PS, etc.)",
        description: "Plastic food storage container, check recycling number on bottom.",
        keywords: &["container", "food", "storage", "plastic", "tupperware"],
        recyclable: true,
        compostable: false,
        special_disposal: false,
        disposal_instructions: &[
            "Clean thoroughly",
            "Check recycling number on bottom",
            "Remove any non-plastic components",
            "Place in appropriate recycling bin",
        ],
        icon: "🥡",
    },
    // Paper
    SeedProduct {
        id: "cardboard-box",
        name: "Cardboard Box",
        category: Category::Paper,
        material: "Corrugated cardboard",
        description: "Brown corrugated cardboard box, highly recyclable.",
        keywords: &["box", "cardboard", "shipping", "brown", "corrugated"],
        recyclable: true,
        compostable: false,
        special_disposal: false,
        disposal_instructions: &[
            "Remove any tape or labels",
            "Flatten to save space",
            "Keep dry",
            "Place in paper recycling bin",
        ],
        icon: "📦",
    },
    SeedProduct {
        id: "newspaper",
        name: "Newspaper",
        category: Category::Paper,
        material: "Newsprint paper",
        description: "Daily newspaper, made from newsprint paper. Highly recyclable.",
        keywords: &["newspaper", "news", "paper", "print", "daily"],
        recyclable: true,
        compostable: false,
        special_disposal: false,
        disposal_instructions: &[
            "Keep dry and clean",
            "Remove any plastic wrapping",
            "Bundle or place in paper recycling bin",
            "Can also be used for composting",
        ],
        icon: "📰",
    },
    SeedProduct {
        id: "pizza-box",
        name: "Pizza Box",
        category: Category::Paper,
        material: "Corrugated cardboard",
        description: "Cardboard pizza box, may have grease stains. Check local guidelines.",
        keywords: &["pizza", "box", "cardboard", "food", "grease"],
        recyclable: false,
        compostable: false,
        special_disposal: false,
        disposal_instructions: &[
            "Remove any leftover food",
            "Check if your local program accepts greasy cardboard",
            "If not accepted, place in general waste",
            "Consider composting if clean",
        ],
        icon: "🍕",
    },
    SeedProduct {
        id: "magazine",
        name: "Magazine",
        category: Category::Paper,
        material: "Glossy paper",
        description: "Glossy magazine, made from coated paper. Usually recyclable.",
        keywords: &["magazine", "glossy", "paper", "reading", "coated"],
        recyclable: true,
        compostable: false,
        special_disposal: false,
        disposal_instructions: &[
            "Remove any plastic wrapping",
            "Keep dry",
            "Place in paper recycling bin",
            "Glossy coating is usually acceptable",
        ],
        icon: "📖",
    },
    // Organic
    SeedProduct {
        id: "banana-peel",
        name: "Banana Peel",
        category: Category::Organic,
        material: "Organic matter",
        description: "Banana peel, completely biodegradable and compostable.",
        keywords: &["banana", "peel", "fruit", "organic", "compost"],
        recyclable: false,
        compostable: true,
        special_disposal: false,
        disposal_instructions: &[
            "Perfect for home composting",
            "Add to compost bin or pile",
            "Will break down naturally",
            "Can also be used as fertilizer",
        ],
        icon: "🍌",
    },
    SeedProduct {
        id: "apple-core",
        name: "Apple Core",
        category: Category::Organic,
        material: "Organic matter",
        description: "Apple core with seeds, completely biodegradable.",
        keywords: &["apple", "core", "fruit", "organic", "compost"],
        recyclable: false,
        compostable: true,
        special_disposal: false,
        disposal_instructions: &[
            "Remove any stickers",
            "Add to compost bin",
            "Seeds may sprout in compost",
            "Will decompose naturally",
        ],
        icon: "🍎",
    },
    SeedProduct {
        id: "food-scraps",
        name: "Food Scraps",
        category: Category::Organic,
        material: "Organic matter",
        description: "General food scraps and leftovers, perfect for composting.",
        keywords: &["food", "scraps", "leftovers", "organic", "compost"],
        recyclable: false,
        compostable: true,
        special_disposal: false,
        disposal_instructions: &[
            "Remove any non-organic materials",
            "Add to compost bin",
            "Avoid meat and dairy in home compost",
            "Mix with brown materials for best results",
        ],
        icon: "🍽️",
    },
    // Glass
    SeedProduct {
        id: "glass-jar",
        name: "Glass Jar",
        category: Category::Glass,
        material: "Glass",
        description: "Glass jar, typically from food products. Highly recyclable.",
        keywords: &["jar", "glass", "food", "container", "recyclable"],
        recyclable: true,
        compostable: false,
        special_disposal: false,
        disposal_instructions: &[
            "Remove lid and label",
            "Rinse thoroughly",
            "Check for cracks",
            "Place in glass recycling bin",
        ],
        icon: "🍶",
    },
    SeedProduct {
        id: "wine-bottle",
        name: "Wine Bottle",
        category: Category::Glass,
        material: "Glass",
        description: "Glass wine bottle, highly recyclable.",
        keywords: &["wine", "bottle", "glass", "alcohol", "recyclable"],
        recyclable: true,
        compostable: false,
        special_disposal: false,
        disposal_instructions: &[
            "Remove cork and label",
            "Rinse thoroughly",
            "Place in glass recycling bin",
            "Can also be reused for crafts",
        ],
        icon: "🍷",
    },
    // Metal
    SeedProduct {
        id: "aluminum-can",
        name: "Aluminum Can",
        category: Category::Metal,
        material: "Aluminum",
        description: "Aluminum beverage can, highly recyclable and valuable.",
        keywords: &["can", "aluminum", "beverage", "drink", "metal"],
        recyclable: true,
        compostable: false,
        special_disposal: false,
        disposal_instructions: &[
            "Rinse thoroughly",
            "Remove any plastic labels",
            "Flatten to save space",
            "Place in metal recycling bin",
        ],
        icon: "🥫",
    },
    SeedProduct {
        id: "tin-can",
        name: "Tin Can",
        category: Category::Metal,
        material: "Steel with tin coating",
        description: "Tin-plated steel can, typically from food products.",
        keywords: &["can", "tin", "steel", "food", "metal"],
        recyclable: true,
        compostable: false,
        special_disposal: false,
        disposal_instructions: &[
            "Remove label and lid",
            "Rinse thoroughly",
            "Place in metal recycling bin",
            "Check for any plastic components",
        ],
        icon: "🥫",
    },
    // Electronics
    SeedProduct {
        id: "smartphone",
        name: "Smartphone",
        category: Category::Electronics,
        material: "Mixed materials (plastic, metal, glass)",
        description: "Electronic device containing valuable materials and hazardous components.",
        keywords: &["phone", "smartphone", "electronic", "device", "battery"],
        recyclable: true,
        compostable: false,
        special_disposal: true,
        disposal_instructions: &[
            "Remove personal data first",
            "Take to electronic waste collection point",
            "Do not put in regular recycling",
            "Battery must be handled separately",
        ],
        icon: "📱",
    },
    SeedProduct {
        id: "laptop",
        name: "Laptop",
        category: Category::Electronics,
        material: "Mixed materials (plastic, metal, glass)",
        description: "Electronic device with valuable materials and hazardous components.",
        keywords: &["laptop", "computer", "electronic", "device", "battery"],
        recyclable: true,
        compostable: false,
        special_disposal: true,
        disposal_instructions: &[
            "Remove personal data first",
            "Take to electronic waste collection point",
            "Battery must be handled separately",
            "Consider donating if still functional",
        ],
        icon: "💻",
    },
    // Textile
    SeedProduct {
        id: "cotton-shirt",
        name: "Cotton Shirt",
        category: Category::Textile,
        material: "Cotton fabric",
        description: "Cotton clothing item, can be recycled or donated.",
        keywords: &["shirt", "cotton", "clothing", "fabric", "textile"],
        recyclable: true,
        compostable: false,
        special_disposal: false,
        disposal_instructions: &[
            "Consider donating if in good condition",
            "Take to textile recycling collection point",
            "Remove any non-fabric components",
            "Clean before recycling",
        ],
        icon: "👕",
    },
    SeedProduct {
        id: "denim-jeans",
        name: "Denim Jeans",
        category: Category::Textile,
        material: "Denim fabric",
        description: "Denim jeans, can be recycled or donated.",
        keywords: &["jeans", "denim", "pants", "clothing", "textile"],
        recyclable: true,
        compostable: false,
        special_disposal: false,
        disposal_instructions: &[
            "Consider donating if in good condition",
            "Take to textile recycling collection point",
            "Remove any metal components (buttons, zippers)",
            "Clean before recycling",
        ],
        icon: "👖",
    },
];

/// 組み込み製品リストを複製して返す。
#[must_use]
pub fn seed_products() -> Vec<ProductRecord> {
    SEED.iter().map(SeedProduct::to_record).collect()
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn seed_ids_are_unique() {
        let products = seed_products();
        let ids: HashSet<&str> = products.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids.len(), products.len());
        assert_eq!(products.len(), 19);
    }

    #[test]
    fn seed_mixes_catalog_only_categories() {
        let products = seed_products();
        assert!(products.iter().any(|p| p.category == Category::Electronics));
        assert!(products.iter().any(|p| p.category == Category::Textile));
    }
}
