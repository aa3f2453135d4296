//! # Sample Catalog
//!
//! A small, realistic menu with stock and recipes, so a fresh store has
//! something to show. Loaded through the public store operations, so it
//! emits the same events a user would.

use tracing::info;

use cafe_core::{CoreResult, MenuCategory, NewInventoryItem, NewMenuItem, RecipeIngredient};

use crate::config::StoreConfig;
use crate::store::Store;

/// (name, category, price in cents, prep minutes, menu card ingredients)
const MENU: &[(&str, MenuCategory, i64, u32, &[&str])] = &[
    ("Espresso", MenuCategory::Coffee, 300, 2, &["Coffee beans"]),
    ("Cappuccino", MenuCategory::Coffee, 420, 4, &["Coffee beans", "Milk"]),
    ("Latte", MenuCategory::Coffee, 450, 4, &["Coffee beans", "Milk"]),
    ("Mocha", MenuCategory::Coffee, 480, 5, &["Coffee beans", "Milk", "Chocolate"]),
    ("Green Tea", MenuCategory::Tea, 280, 3, &["Green tea"]),
    ("Chai Latte", MenuCategory::Tea, 390, 4, &["Chai blend", "Milk"]),
    ("Club Sandwich", MenuCategory::Food, 850, 10, &["Bread", "Chicken", "Lettuce"]),
    ("Avocado Toast", MenuCategory::Food, 720, 8, &["Bread", "Avocado"]),
    ("Croissant", MenuCategory::Pastry, 325, 1, &["Butter", "Flour"]),
    ("Blueberry Muffin", MenuCategory::Pastry, 295, 1, &["Blueberries", "Flour"]),
    ("Orange Juice", MenuCategory::Beverage, 350, 2, &["Oranges"]),
    ("Sparkling Water", MenuCategory::Beverage, 200, 1, &[]),
];

/// (name, quantity, unit, min quantity, cost per unit in cents)
const STOCK: &[(&str, f64, &str, f64, i64)] = &[
    ("Coffee Beans", 12.0, "kg", 3.0, 1800),
    ("Milk", 40.0, "L", 10.0, 120),
    ("Chocolate Syrup", 4.0, "L", 1.0, 650),
    ("Green Tea Leaves", 2.0, "kg", 0.5, 2400),
    ("Chai Blend", 1.5, "kg", 0.5, 2100),
    ("Sourdough", 12.0, "loaves", 4.0, 450),
    ("Croissant Dough", 60.0, "pieces", 20.0, 90),
    ("Muffins", 24.0, "pieces", 12.0, 110),
    ("Avocados", 30.0, "units", 10.0, 95),
    ("Oranges", 50.0, "units", 20.0, 40),
    ("Sparkling Water", 48.0, "units", 12.0, 60),
];

/// (menu item, [(stock item, per portion)])
const RECIPES: &[(&str, &[(&str, f64)])] = &[
    ("Espresso", &[("Coffee Beans", 0.018)]),
    ("Cappuccino", &[("Coffee Beans", 0.018), ("Milk", 0.15)]),
    ("Latte", &[("Coffee Beans", 0.018), ("Milk", 0.25)]),
    ("Mocha", &[("Coffee Beans", 0.018), ("Milk", 0.2), ("Chocolate Syrup", 0.03)]),
    ("Green Tea", &[("Green Tea Leaves", 0.004)]),
    ("Chai Latte", &[("Chai Blend", 0.006), ("Milk", 0.2)]),
    ("Avocado Toast", &[("Sourdough", 0.1), ("Avocados", 1.0)]),
    ("Croissant", &[("Croissant Dough", 1.0)]),
    ("Blueberry Muffin", &[("Muffins", 1.0)]),
    ("Orange Juice", &[("Oranges", 3.0)]),
    ("Sparkling Water", &[("Sparkling Water", 1.0)]),
];

/// Counts of what [`load_sample_catalog`] added.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedSummary {
    pub menu_items: usize,
    pub inventory_items: usize,
    pub recipes: usize,
}

fn id_named(ids: &[(&str, String)], name: &str) -> Option<String> {
    ids.iter()
        .find(|(n, _)| *n == name)
        .map(|(_, id)| id.clone())
}

/// Builds a store from `config`, with the sample catalog if enabled.
pub fn build_store(config: &StoreConfig) -> CoreResult<Store> {
    let store = Store::new(config)?;
    if config.seed.sample_catalog {
        load_sample_catalog(&store)?;
    }
    Ok(store)
}

/// Adds the sample menu, stock and recipes to `store`.
///
/// Menu items and stock are looked up by name when wiring recipes, so the
/// catalog can be loaded into a store that already has other records.
pub fn load_sample_catalog(store: &Store) -> CoreResult<SeedSummary> {
    let mut summary = SeedSummary::default();

    let mut menu_ids = Vec::with_capacity(MENU.len());
    for (name, category, price_cents, prep, ingredients) in MENU {
        let mut input = NewMenuItem::new(*name, *category, *price_cents);
        input.prep_time_minutes = *prep;
        input.ingredients = ingredients.iter().map(|s| s.to_string()).collect();

        let item = store.add_menu_item(input)?;
        menu_ids.push((*name, item.id));
        summary.menu_items += 1;
    }

    let mut stock_ids = Vec::with_capacity(STOCK.len());
    for (name, quantity, unit, min, cost) in STOCK {
        let item = store
            .add_inventory_item(NewInventoryItem::new(*name, *quantity, *unit, *min).with_cost(*cost))?;
        stock_ids.push((*name, item.id));
        summary.inventory_items += 1;
    }

    for (menu_name, ingredients) in RECIPES {
        let Some(menu_item_id) = id_named(&menu_ids, menu_name) else {
            continue;
        };
        let ingredients: Vec<RecipeIngredient> = ingredients
            .iter()
            .filter_map(|(stock_name, qty)| {
                id_named(&stock_ids, stock_name).map(|id| RecipeIngredient::new(id, *qty))
            })
            .collect();

        store.add_recipe(&menu_item_id, ingredients)?;
        summary.recipes += 1;
    }

    info!(
        menu_items = summary.menu_items,
        inventory_items = summary.inventory_items,
        recipes = summary.recipes,
        "Sample catalog loaded"
    );
    Ok(summary)
}
