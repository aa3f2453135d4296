//! # Recipe Resolver
//!
//! Structured bills of materials: which stocked items one portion of a menu
//! item uses.
//!
//! ## Save Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          Recipe Save Flow                               │
//! │                                                                         │
//! │  Recipe form rows ──► drop blank refs, qty <= 0, NaN                   │
//! │                            │                                            │
//! │                            ▼                                            │
//! │               menu item exists?  ── no ──► NotFound                    │
//! │               stock items exist? ── no ──► NotFound                    │
//! │                            │                                            │
//! │                            ▼                                            │
//! │          recipe for this menu item already saved?                      │
//! │              yes ──► replace its ingredients, keep its id              │
//! │              no  ──► insert with a fresh id                            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! At most one recipe exists per menu item, however many times it is saved.

use tracing::debug;

use cafe_core::{CoreResult, Recipe, RecipeIngredient, RecipeUpdate, ValidationError};

use crate::events::StoreEvent;
use crate::inventory::StockRequirement;
use crate::store::{new_id, Store, StoreState};

/// Keeps only usable ingredient rows, in their original order.
pub fn usable_ingredients(ingredients: Vec<RecipeIngredient>) -> Vec<RecipeIngredient> {
    ingredients
        .into_iter()
        .filter(RecipeIngredient::is_usable)
        .map(|mut i| {
            i.inventory_item_id = i.inventory_item_id.trim().to_string();
            i
        })
        .collect()
}

impl StoreState {
    fn ensure_ingredients_exist(&self, ingredients: &[RecipeIngredient]) -> CoreResult<()> {
        for ingredient in ingredients {
            self.inventory_index(&ingredient.inventory_item_id)?;
        }
        Ok(())
    }

    /// Stock needed for `portions` of a menu item. Empty without a recipe.
    pub(crate) fn requirements_for(
        &self,
        menu_item_id: &str,
        portions: i64,
    ) -> Vec<StockRequirement> {
        self.recipes
            .iter()
            .find(|r| r.menu_item_id == menu_item_id)
            .map(|recipe| {
                recipe
                    .ingredients
                    .iter()
                    .map(|i| StockRequirement::new(&i.inventory_item_id, i.quantity * portions as f64))
                    .collect()
            })
            .unwrap_or_default()
    }
}

impl Store {
    /// Saves the recipe for a menu item, replacing any existing one in place.
    ///
    /// ## Errors
    /// - `NotFound` if the menu item or a referenced stock item is missing
    pub fn add_recipe(
        &self,
        menu_item_id: &str,
        ingredients: Vec<RecipeIngredient>,
    ) -> CoreResult<Recipe> {
        let ingredients = usable_ingredients(ingredients);

        self.mutate(|m| {
            m.state.menu_item_index(menu_item_id)?;
            m.state.ensure_ingredients_exist(&ingredients)?;

            let recipe = match m
                .state
                .recipes
                .iter_mut()
                .find(|r| r.menu_item_id == menu_item_id)
            {
                Some(existing) => {
                    existing.ingredients = ingredients;
                    debug!(recipe_id = %existing.id, menu_item_id = %menu_item_id, "Recipe replaced");
                    existing.clone()
                }
                None => {
                    let recipe = Recipe {
                        id: new_id(),
                        menu_item_id: menu_item_id.to_string(),
                        ingredients,
                    };
                    debug!(recipe_id = %recipe.id, menu_item_id = %menu_item_id, "Recipe added");
                    m.state.recipes.push(recipe.clone());
                    recipe
                }
            };

            m.emit(StoreEvent::RecipeSaved {
                recipe_id: recipe.id.clone(),
                menu_item_id: recipe.menu_item_id.clone(),
            });
            Ok(recipe)
        })
    }

    /// Applies the fields present in `update`.
    ///
    /// ## Errors
    /// - `NotFound` for a missing recipe, menu item or stock item
    /// - `Validation` when moving onto a menu item that already has a recipe
    pub fn update_recipe(&self, id: &str, update: RecipeUpdate) -> CoreResult<Recipe> {
        let ingredients = update.ingredients.map(usable_ingredients);

        self.mutate(|m| {
            let idx = m.state.recipe_index(id)?;

            if let Some(menu_item_id) = &update.menu_item_id {
                m.state.menu_item_index(menu_item_id)?;
                if m
                    .state
                    .recipes
                    .iter()
                    .any(|r| r.id != id && &r.menu_item_id == menu_item_id)
                {
                    return Err(ValidationError::Duplicate {
                        field: "recipe for menu item".to_string(),
                        value: menu_item_id.clone(),
                    }
                    .into());
                }
            }
            if let Some(ingredients) = &ingredients {
                m.state.ensure_ingredients_exist(ingredients)?;
            }

            let recipe = &mut m.state.recipes[idx];
            if let Some(menu_item_id) = update.menu_item_id {
                recipe.menu_item_id = menu_item_id;
            }
            if let Some(ingredients) = ingredients {
                recipe.ingredients = ingredients;
            }
            debug!(recipe_id = %id, "Recipe updated");

            let recipe = recipe.clone();
            m.emit(StoreEvent::RecipeSaved {
                recipe_id: recipe.id.clone(),
                menu_item_id: recipe.menu_item_id.clone(),
            });
            Ok(recipe)
        })
    }

    /// Stock needed for `portions` of a menu item, per its recipe.
    pub fn requirements_for(&self, menu_item_id: &str, portions: i64) -> Vec<StockRequirement> {
        self.read(|s| s.requirements_for(menu_item_id, portions))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cafe_core::{ErrorKind, MenuCategory, NewInventoryItem, NewMenuItem};

    struct Fixture {
        store: Store,
        latte: String,
        mocha: String,
        milk: String,
        beans: String,
    }

    fn fixture() -> Fixture {
        let store = Store::with_tables(&[2]).unwrap();
        let latte = store
            .add_menu_item(NewMenuItem::new("Latte", MenuCategory::Coffee, 450))
            .unwrap()
            .id;
        let mocha = store
            .add_menu_item(NewMenuItem::new("Mocha", MenuCategory::Coffee, 480))
            .unwrap()
            .id;
        let milk = store
            .add_inventory_item(NewInventoryItem::new("Milk", 20.0, "L", 5.0))
            .unwrap()
            .id;
        let beans = store
            .add_inventory_item(NewInventoryItem::new("Coffee Beans", 3.0, "kg", 1.0))
            .unwrap()
            .id;
        Fixture {
            store,
            latte,
            mocha,
            milk,
            beans,
        }
    }

    #[test]
    fn test_repeated_saves_keep_one_recipe() {
        let f = fixture();

        let first = f
            .store
            .add_recipe(&f.latte, vec![RecipeIngredient::new(&f.milk, 0.2)])
            .unwrap();
        let second = f
            .store
            .add_recipe(
                &f.latte,
                vec![
                    RecipeIngredient::new(&f.milk, 0.25),
                    RecipeIngredient::new(&f.beans, 0.018),
                ],
            )
            .unwrap();

        assert_eq!(first.id, second.id);
        assert_eq!(f.store.recipes().len(), 1);
        assert_eq!(f.store.recipes()[0].ingredients.len(), 2);
    }

    #[test]
    fn test_unusable_rows_are_dropped() {
        let f = fixture();
        let recipe = f
            .store
            .add_recipe(
                &f.latte,
                vec![
                    RecipeIngredient::new("", 1.0),
                    RecipeIngredient::new(&f.milk, 0.0),
                    RecipeIngredient::new(&f.beans, -1.0),
                    RecipeIngredient::new(&f.milk, 0.2),
                ],
            )
            .unwrap();

        assert_eq!(recipe.ingredients, vec![RecipeIngredient::new(&f.milk, 0.2)]);
    }

    #[test]
    fn test_missing_references() {
        let f = fixture();
        assert!(f
            .store
            .add_recipe("missing", vec![])
            .unwrap_err()
            .is_not_found());
        assert!(f
            .store
            .add_recipe(&f.latte, vec![RecipeIngredient::new("missing", 1.0)])
            .unwrap_err()
            .is_not_found());
        assert!(f.store.recipes().is_empty());
    }

    #[test]
    fn test_update_recipe() {
        let f = fixture();
        let recipe = f
            .store
            .add_recipe(&f.latte, vec![RecipeIngredient::new(&f.milk, 0.2)])
            .unwrap();

        let updated = f
            .store
            .update_recipe(
                &recipe.id,
                RecipeUpdate {
                    menu_item_id: Some(f.mocha.clone()),
                    ingredients: None,
                },
            )
            .unwrap();
        assert_eq!(updated.menu_item_id, f.mocha);
        assert_eq!(updated.ingredients.len(), 1);
        assert!(f.store.recipe_for_menu_item(&f.latte).is_none());
    }

    #[test]
    fn test_update_recipe_onto_taken_menu_item() {
        let f = fixture();
        let latte_recipe = f
            .store
            .add_recipe(&f.latte, vec![RecipeIngredient::new(&f.milk, 0.2)])
            .unwrap();
        f.store
            .add_recipe(&f.mocha, vec![RecipeIngredient::new(&f.milk, 0.2)])
            .unwrap();

        let err = f
            .store
            .update_recipe(
                &latte_recipe.id,
                RecipeUpdate {
                    menu_item_id: Some(f.mocha.clone()),
                    ingredients: None,
                },
            )
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ValidationFailure);
    }

    #[test]
    fn test_update_missing_recipe() {
        let f = fixture();
        assert!(f
            .store
            .update_recipe("missing", RecipeUpdate::default())
            .unwrap_err()
            .is_not_found());
    }

    #[test]
    fn test_requirements_scale_with_portions() {
        let f = fixture();
        f.store
            .add_recipe(
                &f.latte,
                vec![
                    RecipeIngredient::new(&f.milk, 0.25),
                    RecipeIngredient::new(&f.beans, 0.02),
                ],
            )
            .unwrap();

        let reqs = f.store.requirements_for(&f.latte, 2);
        assert_eq!(reqs.len(), 2);
        assert_eq!(reqs[0], StockRequirement::new(&f.milk, 0.5));
        assert_eq!(reqs[1], StockRequirement::new(&f.beans, 0.04));

        assert!(f.store.requirements_for(&f.mocha, 3).is_empty());
    }
}
