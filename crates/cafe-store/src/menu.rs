//! # Menu
//!
//! Menu item CRUD and the waiter screen's browse queries.
//!
//! Editing or deleting a menu item never reaches open orders: their lines
//! carry a [`cafe_core::MenuItemSnapshot`]. Deleting an item also deletes
//! its recipe so no recipe points at a missing item.

use tracing::debug;

use cafe_core::{CoreResult, MenuCategory, MenuItem, MenuItemUpdate, NewMenuItem};

use crate::events::StoreEvent;
use crate::store::{new_id, Store};

/// Trims entries and drops blanks from a free-text ingredient list.
fn clean_ingredients(ingredients: Vec<String>) -> Vec<String> {
    ingredients
        .into_iter()
        .map(|i| i.trim().to_string())
        .filter(|i| !i.is_empty())
        .collect()
}

/// Waiter screen filter: category chip plus case-insensitive name search.
pub fn matches_search(item: &MenuItem, category: Option<MenuCategory>, query: &str) -> bool {
    let query = query.trim().to_lowercase();
    category.map_or(true, |c| item.category == c)
        && (query.is_empty() || item.name.to_lowercase().contains(&query))
}

impl Store {
    /// Adds a menu item.
    ///
    /// ## Errors
    /// - `Validation` for an empty name, a price outside 0..=MAX_PRICE_CENTS
    ///   or an absurd prep time
    pub fn add_menu_item(&self, input: NewMenuItem) -> CoreResult<MenuItem> {
        input.validate()?;

        self.mutate(|m| {
            let item = MenuItem {
                id: new_id(),
                name: input.name.trim().to_string(),
                category: input.category,
                price_cents: input.price_cents,
                available: input.available,
                prep_time_minutes: input.prep_time_minutes,
                ingredients: clean_ingredients(input.ingredients),
            };
            debug!(menu_item_id = %item.id, name = %item.name, "Menu item added");

            m.state.menu_items.push(item.clone());
            m.emit(StoreEvent::MenuItemAdded {
                menu_item_id: item.id.clone(),
            });
            Ok(item)
        })
    }

    /// Applies the fields present in `update`.
    pub fn update_menu_item(&self, id: &str, update: MenuItemUpdate) -> CoreResult<MenuItem> {
        update.validate()?;

        self.mutate(|m| {
            let idx = m.state.menu_item_index(id)?;
            let item = &mut m.state.menu_items[idx];

            if let Some(name) = update.name {
                item.name = name.trim().to_string();
            }
            if let Some(category) = update.category {
                item.category = category;
            }
            if let Some(price) = update.price_cents {
                item.price_cents = price;
            }
            if let Some(available) = update.available {
                item.available = available;
            }
            if let Some(prep) = update.prep_time_minutes {
                item.prep_time_minutes = prep;
            }
            if let Some(ingredients) = update.ingredients {
                item.ingredients = clean_ingredients(ingredients);
            }
            debug!(menu_item_id = %id, "Menu item updated");

            let item = item.clone();
            m.emit(StoreEvent::MenuItemUpdated {
                menu_item_id: item.id.clone(),
            });
            Ok(item)
        })
    }

    /// Removes a menu item and its recipe. Returns the removed item.
    pub fn delete_menu_item(&self, id: &str) -> CoreResult<MenuItem> {
        self.mutate(|m| {
            let idx = m.state.menu_item_index(id)?;
            let item = m.state.menu_items.remove(idx);

            let recipe_id = m
                .state
                .recipes
                .iter()
                .position(|r| r.menu_item_id == item.id)
                .map(|pos| m.state.recipes.remove(pos).id);

            debug!(menu_item_id = %id, ?recipe_id, "Menu item deleted");
            m.emit(StoreEvent::MenuItemDeleted {
                menu_item_id: item.id.clone(),
                recipe_id,
            });
            Ok(item)
        })
    }

    /// Items the waiter screen offers.
    pub fn available_menu_items(&self) -> Vec<MenuItem> {
        self.read(|s| s.menu_items.iter().filter(|m| m.available).cloned().collect())
    }

    /// Available items in `category` (any if `None`) whose name contains
    /// `query`, ignoring case.
    pub fn search_menu(&self, category: Option<MenuCategory>, query: &str) -> Vec<MenuItem> {
        self.read(|s| {
            s.menu_items
                .iter()
                .filter(|m| m.available && matches_search(m, category, query))
                .cloned()
                .collect()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cafe_core::{ErrorKind, RecipeIngredient};

    fn store() -> Store {
        Store::with_tables(&[4]).unwrap()
    }

    #[test]
    fn test_add_menu_item() {
        let store = store();
        let mut input = NewMenuItem::new("  Latte ", MenuCategory::Coffee, 450);
        input.ingredients = vec!["Espresso".into(), " ".into(), " Milk".into()];

        let item = store.add_menu_item(input).unwrap();
        assert_eq!(item.name, "Latte");
        assert_eq!(item.ingredients, vec!["Espresso", "Milk"]);
        assert_eq!(store.menu_items(), vec![item]);
    }

    #[test]
    fn test_add_menu_item_validation() {
        let store = store();
        let err = store
            .add_menu_item(NewMenuItem::new("", MenuCategory::Tea, 300))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ValidationFailure);

        let err = store
            .add_menu_item(NewMenuItem::new("Chai", MenuCategory::Tea, -5))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ValidationFailure);
        assert!(store.menu_items().is_empty());
        assert_eq!(store.version(), 0);
    }

    #[test]
    fn test_partial_update() {
        let store = store();
        let item = store
            .add_menu_item(NewMenuItem::new("Scone", MenuCategory::Pastry, 310))
            .unwrap();

        let updated = store
            .update_menu_item(
                &item.id,
                MenuItemUpdate {
                    price_cents: Some(350),
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(updated.price_cents, 350);
        assert_eq!(updated.name, "Scone");

        let updated = store
            .update_menu_item(&item.id, MenuItemUpdate::availability(false))
            .unwrap();
        assert!(!updated.available);
    }

    #[test]
    fn test_update_missing_item() {
        let err = store()
            .update_menu_item("missing", MenuItemUpdate::availability(true))
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_delete_cascades_to_recipe() {
        let store = store();
        let item = store
            .add_menu_item(NewMenuItem::new("Latte", MenuCategory::Coffee, 450))
            .unwrap();
        let milk = store
            .add_inventory_item(cafe_core::NewInventoryItem::new("Milk", 10.0, "L", 2.0))
            .unwrap();
        store
            .add_recipe(&item.id, vec![RecipeIngredient::new(&milk.id, 0.2)])
            .unwrap();

        store.delete_menu_item(&item.id).unwrap();
        assert!(store.menu_items().is_empty());
        assert!(store.recipes().is_empty());
        assert!(store.delete_menu_item(&item.id).unwrap_err().is_not_found());
    }

    #[test]
    fn test_search_menu() {
        let store = store();
        store
            .add_menu_item(NewMenuItem::new("Latte", MenuCategory::Coffee, 450))
            .unwrap();
        store
            .add_menu_item(NewMenuItem::new("Iced Latte", MenuCategory::Beverage, 500))
            .unwrap();
        let mocha = store
            .add_menu_item(NewMenuItem::new("Mocha", MenuCategory::Coffee, 480))
            .unwrap();
        store
            .update_menu_item(&mocha.id, MenuItemUpdate::availability(false))
            .unwrap();

        assert_eq!(store.available_menu_items().len(), 2);
        assert_eq!(store.search_menu(None, "latte").len(), 2);
        assert_eq!(store.search_menu(Some(MenuCategory::Coffee), "").len(), 1);
        assert!(store.search_menu(None, "mocha").is_empty());
    }
}
