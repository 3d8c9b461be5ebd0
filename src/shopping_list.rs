//! Consolidated shopping list of a menu plan

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::{
    model::{round_to, IngredientCategory, RecipeIngredient},
    plan::{MenuPlan, MenuSlot},
};

/// An ingredient to buy, with the amounts of all the recipes that use it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShoppingListEntry {
    /// Name as first seen in the plan
    pub ingredient: String,
    /// Sum of the scaled amounts, rounded to 2 decimals
    pub total_amount: f64,
    pub unit: String,
    /// Category as first seen in the plan
    pub category: IngredientCategory,
    /// Names of the recipes using this ingredient, without duplicates
    pub recipes: Vec<String>,
}

/// List of ingredients needed for a plan
///
/// Ingredients are merged when both the name and the unit are equal, ignoring
/// case. Units are never converted, so `1 taza` and `200 ml` of the same
/// ingredient are 2 different entries.
///
/// Entries keep the order in which they are first found in the plan.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ShoppingList {
    entries: Vec<ShoppingListEntry>,
}

impl ShoppingList {
    /// Shopping list of all the slots of a plan
    pub fn from_plan(plan: &MenuPlan) -> Self {
        Self::from_slots(&plan.slots)
    }

    /// Shopping list of a set of slots
    ///
    /// Every ingredient amount is multiplied by the portions of its slot.
    #[tracing::instrument(level = "debug", name = "shopping_list", skip_all)]
    pub fn from_slots<'a>(slots: impl IntoIterator<Item = &'a MenuSlot>) -> Self {
        let mut consolidator = Consolidator::default();
        for slot in slots {
            for ingredient in &slot.recipe.ingredients {
                consolidator.add(ingredient, slot.portions, &slot.recipe.name);
            }
        }
        let list = consolidator.finish();
        tracing::debug!(entries = list.len(), "consolidated ingredients");
        list
    }

    pub fn entries(&self) -> &[ShoppingListEntry] {
        &self.entries
    }

    /// Find an entry, name and unit ignoring case
    pub fn get(&self, ingredient: &str, unit: &str) -> Option<&ShoppingListEntry> {
        let wanted = key(ingredient, unit);
        self.entries
            .iter()
            .find(|e| key(&e.ingredient, &e.unit) == wanted)
    }

    pub fn iter(&self) -> std::slice::Iter<ShoppingListEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Split the list into categories
    ///
    /// Categories are in the order they are first found and there are no
    /// empty groups.
    pub fn group_by_category(&self) -> IndexMap<IngredientCategory, Vec<&ShoppingListEntry>> {
        let mut groups: IndexMap<_, Vec<_>> = IndexMap::new();
        for entry in &self.entries {
            groups.entry(entry.category).or_default().push(entry);
        }
        groups
    }
}

impl<'a> IntoIterator for &'a ShoppingList {
    type Item = &'a ShoppingListEntry;

    type IntoIter = std::slice::Iter<'a, ShoppingListEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

impl IntoIterator for ShoppingList {
    type Item = ShoppingListEntry;

    type IntoIter = std::vec::IntoIter<ShoppingListEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

fn key(name: &str, unit: &str) -> (String, String) {
    (name.to_lowercase(), unit.to_lowercase())
}

#[derive(Default)]
struct Consolidator {
    entries: IndexMap<(String, String), ShoppingListEntry>,
}

impl Consolidator {
    fn add(&mut self, ingredient: &RecipeIngredient, portions: f64, recipe_name: &str) {
        let amount = ingredient.amount * portions;
        let entry = self
            .entries
            .entry(key(&ingredient.name, &ingredient.unit))
            .or_insert_with(|| ShoppingListEntry {
                ingredient: ingredient.name.clone(),
                total_amount: 0.0,
                unit: ingredient.unit.clone(),
                category: ingredient.category,
                recipes: Vec::new(),
            });
        entry.total_amount += amount;
        if !entry.recipes.iter().any(|r| r == recipe_name) {
            entry.recipes.push(recipe_name.to_string());
        }
    }

    fn finish(self) -> ShoppingList {
        let entries = self
            .entries
            .into_values()
            .map(|mut entry| {
                entry.total_amount = round_to(entry.total_amount, 2);
                entry
            })
            .collect();
        ShoppingList { entries }
    }
}

/// Write a printable version of the list, grouped by category
///
/// ```text
/// LISTA DE COMPRAS
/// ========================================
///
/// CARBOHIDRATOS
/// ------------------------------
///   - Arroz: 3 taza
///     (para: Arroz con pollo, Arroz con atún)
///
/// ```
pub fn write(list: &ShoppingList, mut write: impl std::io::Write) -> std::io::Result<()> {
    let w = &mut write;
    writeln!(w, "LISTA DE COMPRAS")?;
    writeln!(w, "{}", "=".repeat(40))?;
    writeln!(w)?;
    for (category, entries) in list.group_by_category() {
        writeln!(w, "{}", category.title().to_uppercase())?;
        writeln!(w, "{}", "-".repeat(30))?;
        for entry in entries {
            writeln!(
                w,
                "  - {}: {} {}",
                entry.ingredient, entry.total_amount, entry.unit
            )?;
            writeln!(w, "    (para: {})", entry.recipes.join(", "))?;
        }
        writeln!(w)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{tests::recipe, MealType, Nutrition};
    use indoc::indoc;
    use std::sync::Arc;

    fn ingredient(name: &str, amount: f64, unit: &str, category: IngredientCategory) -> RecipeIngredient {
        RecipeIngredient {
            name: name.into(),
            amount,
            unit: unit.into(),
            category,
        }
    }

    fn slot(name: &str, portions: f64, ingredients: Vec<RecipeIngredient>) -> MenuSlot {
        let mut r = recipe(&name.to_lowercase());
        r.name = name.into();
        r.ingredients = ingredients;
        MenuSlot {
            date: "2025-02-03".parse().unwrap(),
            meal_type: MealType::Lunch,
            recipe: Arc::new(r),
            portions,
            nutrition: Nutrition::default(),
        }
    }

    #[test]
    fn merges_same_name_and_unit() {
        let slots = [
            slot("A", 1.0, vec![ingredient("arroz", 2.0, "taza", IngredientCategory::Carb)]),
            slot("B", 1.0, vec![ingredient("Arroz", 1.0, "Taza", IngredientCategory::Other)]),
        ];
        let list = ShoppingList::from_slots(&slots);
        assert_eq!(list.len(), 1);
        let entry = &list.entries()[0];
        assert_eq!(entry.ingredient, "arroz");
        assert_eq!(entry.unit, "taza");
        assert_eq!(entry.category, IngredientCategory::Carb);
        assert_eq!(entry.total_amount, 3.0);
        assert_eq!(entry.recipes, ["A", "B"]);
    }

    #[test]
    fn different_units_never_merge() {
        let slots = [
            slot("A", 1.0, vec![ingredient("Leche", 1.0, "taza", IngredientCategory::Dairy)]),
            slot("B", 1.0, vec![ingredient("Leche", 200.0, "ml", IngredientCategory::Dairy)]),
        ];
        let list = ShoppingList::from_slots(&slots);
        assert_eq!(list.len(), 2);
        assert_eq!(list.get("leche", "TAZA").unwrap().total_amount, 1.0);
        assert_eq!(list.get("LECHE", "ml").unwrap().total_amount, 200.0);
        assert!(list.get("leche", "g").is_none());
    }

    #[test]
    fn scaled_by_portions_and_rounded() {
        let slots = [
            slot("A", 1.6, vec![ingredient("Pollo", 120.0, "g", IngredientCategory::Protein)]),
            slot("B", 0.33, vec![ingredient("pollo", 1.0, "g", IngredientCategory::Protein)]),
        ];
        let list = ShoppingList::from_slots(&slots);
        assert_eq!(list.entries()[0].total_amount, 192.33);
    }

    #[test]
    fn recipe_listed_once() {
        let slots = [slot(
            "A",
            1.0,
            vec![
                ingredient("Sal", 0.5, "cucharada", IngredientCategory::Seasoning),
                ingredient("sal", 0.25, "cucharada", IngredientCategory::Seasoning),
            ],
        )];
        let list = ShoppingList::from_slots(&slots);
        assert_eq!(list.entries()[0].total_amount, 0.75);
        assert_eq!(list.entries()[0].recipes, ["A"]);
    }

    #[test]
    fn groups() {
        let slots = [
            slot(
                "A",
                1.0,
                vec![
                    ingredient("Arroz", 1.0, "taza", IngredientCategory::Carb),
                    ingredient("Pollo", 100.0, "g", IngredientCategory::Protein),
                ],
            ),
            slot("B", 1.0, vec![ingredient("Papa", 2.0, "unidad", IngredientCategory::Carb)]),
        ];
        let list = ShoppingList::from_slots(&slots);
        let groups = list.group_by_category();
        assert_eq!(groups.len(), 2);
        let carbs: Vec<_> = groups[&IngredientCategory::Carb]
            .iter()
            .map(|e| e.ingredient.as_str())
            .collect();
        assert_eq!(carbs, ["Arroz", "Papa"]);
        assert!(!groups.contains_key(&IngredientCategory::Fruit));
        assert!(groups.values().all(|g| !g.is_empty()));
        assert_eq!(groups.keys().next(), Some(&IngredientCategory::Carb));
    }

    #[test]
    fn empty() {
        let list = ShoppingList::from_slots(&Vec::<MenuSlot>::new());
        assert!(list.is_empty());
        assert!(list.group_by_category().is_empty());
    }

    #[test]
    fn printable() {
        let slots = [
            slot("Arroz con pollo", 1.0, vec![
                ingredient("Arroz", 0.5, "taza", IngredientCategory::Carb),
                ingredient("Pollo", 100.0, "g", IngredientCategory::Protein),
            ]),
            slot("Arroz con atún", 2.0, vec![ingredient("arroz", 0.5, "taza", IngredientCategory::Carb)]),
        ];
        let list = ShoppingList::from_slots(&slots);
        let mut out = Vec::new();
        write(&list, &mut out).unwrap();
        let expected = indoc! {"
            LISTA DE COMPRAS
            ========================================

            CARBOHIDRATOS
            ------------------------------
              - Arroz: 1.5 taza
                (para: Arroz con pollo, Arroz con atún)

            PROTEÍNAS
            ------------------------------
              - Pollo: 100 g
                (para: Arroz con pollo)

        "};
        assert_eq!(String::from_utf8(out).unwrap(), expected);
    }

    #[test]
    fn serialize() {
        let slots = [slot("A", 1.0, vec![ingredient("Arroz", 1.0, "taza", IngredientCategory::Carb)])];
        let list = ShoppingList::from_slots(&slots);
        let json = serde_json::to_value(&list).unwrap();
        assert_eq!(json[0]["ingredient"], "Arroz");
        assert_eq!(json[0]["category"], "carb");
        assert_eq!(json[0]["recipes"][0], "A");
    }
}
