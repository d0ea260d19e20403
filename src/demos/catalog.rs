//! Nested routes demo: category and item lookup
//!
//! The nested layout lists categories in a sidebar; the category and item
//! routes resolve their dynamic segments against the static catalog.

use serde::Serialize;

use super::RouteArgs;
use crate::error::DemoError;

#[derive(Debug, PartialEq, Serialize)]
pub struct Item {
    pub id: &'static str,
    pub name: &'static str,
    pub price: u32,
    pub description: &'static str,
    pub in_stock: bool,
    pub rating: f64,
}

#[derive(Debug, PartialEq, Serialize)]
pub struct Category {
    pub id: &'static str,
    pub name: &'static str,
    pub icon: &'static str,
    pub description: &'static str,
    pub items: &'static [Item],
}

impl Category {
    pub fn item(&self, id: &str) -> Option<&'static Item> {
        self.items.iter().find(|item| item.id == id)
    }
}

const fn item(
    id: &'static str,
    name: &'static str,
    price: u32,
    description: &'static str,
    in_stock: bool,
    rating: f64,
) -> Item {
    Item {
        id,
        name,
        price,
        description,
        in_stock,
        rating,
    }
}

const ELECTRONICS: &[Item] = &[
    item("laptop", "MacBook Pro", 1999, "Powerful laptop with M3 chip", true, 4.8),
    item("phone", "iPhone 15", 999, "Latest smartphone with Dynamic Island", true, 4.7),
    item("headphones", "AirPods Pro", 249, "Wireless earbuds with noise cancellation", false, 4.6),
    item("tablet", "iPad Air", 599, "Versatile tablet for work and play", true, 4.5),
];

const BOOKS: &[Item] = &[
    item("fiction", "The Great Gatsby", 15, "Classic American novel by F. Scott Fitzgerald", true, 4.4),
    item("programming", "Clean Code", 45, "A handbook of agile software craftsmanship", true, 4.9),
    item("science", "A Brief History of Time", 18, "Stephen Hawking's exploration of cosmology", true, 4.7),
    item("biography", "Steve Jobs", 25, "Walter Isaacson's biography of Apple's co-founder", false, 4.6),
];

const CLOTHING: &[Item] = &[
    item("shirt", "Cotton T-Shirt", 25, "Comfortable everyday basic", true, 4.2),
    item("jeans", "Denim Jeans", 79, "Classic fit blue jeans", true, 4.3),
    item("jacket", "Leather Jacket", 199, "Genuine leather biker jacket", false, 4.8),
    item("shoes", "Running Shoes", 129, "Lightweight athletic footwear", true, 4.5),
];

const SPORTS: &[Item] = &[
    item("ball", "Soccer Ball", 35, "Official size and weight", true, 4.4),
    item("racket", "Tennis Racket", 159, "Professional grade racket", true, 4.6),
    item("weights", "Dumbbell Set", 89, "Adjustable weight set", true, 4.7),
    item("yoga", "Yoga Mat", 29, "Non-slip exercise mat", true, 4.3),
];

pub static CATEGORIES: &[Category] = &[
    Category {
        id: "electronics",
        name: "Electronics",
        icon: "💻",
        description: "Gadgets and tech devices",
        items: ELECTRONICS,
    },
    Category {
        id: "books",
        name: "Books",
        icon: "📚",
        description: "Reading materials and literature",
        items: BOOKS,
    },
    Category {
        id: "clothing",
        name: "Clothing",
        icon: "👕",
        description: "Fashion and apparel",
        items: CLOTHING,
    },
    Category {
        id: "sports",
        name: "Sports",
        icon: "⚽",
        description: "Athletic equipment and gear",
        items: SPORTS,
    },
];

pub fn find_category(id: &str) -> Result<&'static Category, DemoError> {
    CATEGORIES
        .iter()
        .find(|c| c.id == id)
        .ok_or_else(|| DemoError::not_found("Category not found"))
}

/// Item lookup; an unknown category reports the item as missing
pub fn find_item(category_id: &str, item_id: &str) -> Result<&'static Item, DemoError> {
    CATEGORIES
        .iter()
        .find(|c| c.id == category_id)
        .and_then(|c| c.item(item_id))
        .ok_or_else(|| DemoError::not_found("Item not found"))
}

#[derive(Debug, Serialize)]
pub struct SidebarEntry {
    pub id: &'static str,
    pub name: &'static str,
    pub icon: &'static str,
}

#[derive(Debug, Serialize)]
pub struct Sidebar {
    pub categories: Vec<SidebarEntry>,
    pub category_id: Option<String>,
    pub item_id: Option<String>,
}

#[allow(clippy::unused_async)]
pub async fn layout_loader(args: RouteArgs<'_>) -> Result<Sidebar, DemoError> {
    Ok(Sidebar {
        categories: CATEGORIES
            .iter()
            .map(|c| SidebarEntry {
                id: c.id,
                name: c.name,
                icon: c.icon,
            })
            .collect(),
        category_id: args.params.get("categoryId").cloned(),
        item_id: args.params.get("itemId").cloned(),
    })
}

#[derive(Debug, Serialize)]
pub struct NestedOverview {
    pub url_structure: [&'static str; 3],
    pub category_count: usize,
}

#[allow(clippy::unused_async)]
pub async fn index_loader() -> Result<NestedOverview, DemoError> {
    Ok(NestedOverview {
        url_structure: [
            "/demos/nested",
            "/demos/nested/:categoryId",
            "/demos/nested/:categoryId/:itemId",
        ],
        category_count: CATEGORIES.len(),
    })
}

#[derive(Debug, Serialize)]
pub struct ItemSummary {
    pub id: &'static str,
    pub name: &'static str,
    pub price: u32,
}

#[derive(Debug, Serialize)]
pub struct CategoryPage {
    pub category_id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub items: Vec<ItemSummary>,
}

#[allow(clippy::unused_async)]
pub async fn category_loader(args: RouteArgs<'_>) -> Result<CategoryPage, DemoError> {
    let category = find_category(args.param("categoryId"))?;
    Ok(CategoryPage {
        category_id: category.id,
        name: category.name,
        description: category.description,
        items: category
            .items
            .iter()
            .map(|i| ItemSummary {
                id: i.id,
                name: i.name,
                price: i.price,
            })
            .collect(),
    })
}

#[derive(Debug, Serialize)]
pub struct ItemPage {
    pub category_id: &'static str,
    #[serde(flatten)]
    pub item: &'static Item,
}

#[allow(clippy::unused_async)]
pub async fn item_loader(args: RouteArgs<'_>) -> Result<ItemPage, DemoError> {
    let category_id = args.param("categoryId");
    let item = find_item(category_id, args.param("itemId"))?;
    let category = find_category(category_id)?;
    Ok(ItemPage {
        category_id: category.id,
        item,
    })
}
