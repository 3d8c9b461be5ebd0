use std::collections::HashSet;

use lonchera::{
    shopping_list, ActivityLevel, Catalog, ChildProfile, FixedRequirements, IngredientCategory,
    MenuPlan, MenuPlanner, PlannerConfig, Preferences, Sex, ShoppingList,
};
use rand::{rngs::StdRng, SeedableRng};

fn plan(seed: u64) -> MenuPlan {
    let planner = MenuPlanner::new(
        Catalog::bundled().clone(),
        PlannerConfig::default(),
        FixedRequirements(1830.0),
    )
    .unwrap();
    let child = ChildProfile {
        id: "valentina".into(),
        name: "Valentina".into(),
        birth_date: "2018-06-10".parse().unwrap(),
        sex: Sex::Female,
        weight_kg: 24.0,
        height_cm: 122.0,
        activity_level: ActivityLevel::Light,
        allergies: vec!["maní".into(), "gluten".into()],
        preferences: Preferences::default(),
    };
    let mut rng = StdRng::seed_from_u64(seed);
    planner.generate_month_with_rng(&child, "2025-03-03".parse().unwrap(), &mut rng)
}

fn expected_amount(plan: &MenuPlan, name: &str, unit: &str) -> f64 {
    let key = (name.to_lowercase(), unit.to_lowercase());
    let mut total = 0.0;
    for slot in &plan.slots {
        for i in &slot.recipe.ingredients {
            if (i.name.to_lowercase(), i.unit.to_lowercase()) == key {
                total += i.amount * slot.portions;
            }
        }
    }
    (total * 100.0).round() / 100.0
}

#[test]
fn consolidates_month() {
    let plan = plan(1);
    let list = ShoppingList::from_plan(&plan);

    let keys: HashSet<_> = list
        .iter()
        .map(|e| (e.ingredient.to_lowercase(), e.unit.to_lowercase()))
        .collect();
    assert_eq!(keys.len(), list.len());

    let names: HashSet<_> = plan.recipes().map(|r| r.name.as_str()).collect();
    for entry in &list {
        assert!(entry.total_amount > 0.0);
        assert!(!entry.recipes.is_empty());
        let unique: HashSet<_> = entry.recipes.iter().collect();
        assert_eq!(unique.len(), entry.recipes.len());
        assert!(entry.recipes.iter().all(|r| names.contains(r.as_str())));
        assert_eq!(
            entry.total_amount,
            expected_amount(&plan, &entry.ingredient, &entry.unit)
        );
    }

    for slot in &plan.slots {
        for ingredient in &slot.recipe.ingredients {
            let entry = list.get(&ingredient.name, &ingredient.unit).unwrap();
            assert!(entry.recipes.contains(&slot.recipe.name));
        }
    }
}

#[test]
fn grouped_by_category() {
    let plan = plan(2);
    let list = ShoppingList::from_plan(&plan);
    let groups = list.group_by_category();

    assert_eq!(groups.values().map(Vec::len).sum::<usize>(), list.len());
    for (category, entries) in &groups {
        assert!(!entries.is_empty());
        assert!(entries.iter().all(|e| e.category == *category));
    }
    assert!(groups.contains_key(&IngredientCategory::Protein));
}

#[test]
fn printable() {
    let plan = plan(3);
    let list = ShoppingList::from_plan(&plan);
    let mut out = Vec::new();
    shopping_list::write(&list, &mut out).unwrap();
    let text = String::from_utf8(out).unwrap();

    assert!(text.starts_with("LISTA DE COMPRAS\n"));
    for category in list.group_by_category().keys() {
        assert!(text.contains(&category.title().to_uppercase()));
    }
    for entry in &list {
        assert!(text.contains(&format!("  - {}: ", entry.ingredient)));
    }
}

#[test]
fn empty_plan() {
    let mut plan = plan(4);
    plan.slots.clear();
    let list = ShoppingList::from_plan(&plan);
    assert!(list.is_empty());

    let mut out = Vec::new();
    shopping_list::write(&list, &mut out).unwrap();
    assert_eq!(
        String::from_utf8(out).unwrap(),
        format!("LISTA DE COMPRAS\n{}\n\n", "=".repeat(40))
    );
}
