use criterion::{criterion_group, criterion_main, Criterion};

use lonchera::{
    ActivityLevel, Catalog, ChildProfile, FixedRequirements, Horizon, MealType, MenuPlanner,
    PlannerConfig, Preferences, Sex, ShoppingList,
};
use rand::{rngs::StdRng, SeedableRng};

fn child() -> ChildProfile {
    ChildProfile {
        id: "bench".into(),
        name: "Bench".into(),
        birth_date: "2017-01-01".parse().unwrap(),
        sex: Sex::Male,
        weight_kg: 26.0,
        height_cm: 125.0,
        activity_level: ActivityLevel::Moderate,
        allergies: vec!["maní".into()],
        preferences: Preferences {
            likes: vec!["arroz".into()],
            dislikes: vec!["pescado".into()],
        },
    }
}

fn generate(c: &mut Criterion) {
    let mut group = c.benchmark_group("generate");
    let planner = MenuPlanner::new(
        Catalog::bundled().clone(),
        PlannerConfig::default(),
        FixedRequirements(1800.0),
    )
    .unwrap();
    let child = child();
    let start = "2025-02-03".parse().unwrap();
    let mut rng = StdRng::seed_from_u64(0);

    group.bench_function("week", |b| {
        b.iter(|| planner.generate_week_with_rng(&child, start, &mut rng))
    });
    group.bench_function("month", |b| {
        b.iter(|| planner.generate_month_with_rng(&child, start, &mut rng))
    });
    group.bench_function("month-all-meals", |b| {
        b.iter(|| planner.generate_with_rng(&child, start, &MealType::ALL, Horizon::Month, &mut rng))
    });
}

fn shopping_list(c: &mut Criterion) {
    let planner = MenuPlanner::new(
        Catalog::bundled().clone(),
        PlannerConfig::default(),
        FixedRequirements(1800.0),
    )
    .unwrap();
    let mut rng = StdRng::seed_from_u64(0);
    let plan = planner.generate_month_with_rng(&child(), "2025-02-03".parse().unwrap(), &mut rng);

    c.bench_function("shopping_list", |b| b.iter(|| ShoppingList::from_plan(&plan)));
}

criterion_group!(benches, generate, shopping_list);
criterion_main!(benches);
