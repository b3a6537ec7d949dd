//! Meal plan persistence against a real Postgres.
//!
//! Run with `DATABASE_URL=postgres://... cargo test -- --ignored`; each test gets
//! a fresh database with the migrations applied.

use chrono::NaiveDate;
use sqlx::PgPool;
use uuid::Uuid;

use mealplanner_api::{
    error::ServiceError,
    models::meal_plan::{AssignmentChanges, NewAssignment, NewMealPlan},
    services::meal_plans::MealPlanService,
};

async fn recipe(pool: &PgPool, category: &str, title: &str) -> Uuid {
    let category_id: Uuid = sqlx::query_scalar(
        "INSERT INTO categories (name) VALUES ($1)
         ON CONFLICT (name) DO UPDATE SET name = EXCLUDED.name
         RETURNING id",
    )
    .bind(category)
    .fetch_one(pool)
    .await
    .unwrap();

    sqlx::query_scalar(
        "INSERT INTO recipes (title, preparation_time, difficulty, instructions, category_id)
         VALUES ($1, 30, 2, 'Cook it.', $2)
         RETURNING id",
    )
    .bind(title)
    .bind(category_id)
    .fetch_one(pool)
    .await
    .unwrap()
}

fn assignment(recipe_id: Uuid, meal_type: &str, order: i32) -> NewAssignment {
    NewAssignment {
        recipe_id,
        meal_type: meal_type.into(),
        order,
    }
}

fn june(day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 6, day).unwrap()
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "needs a Postgres DATABASE_URL"]
async fn created_plan_is_grouped_and_ordered(pool: PgPool) {
    let salad = recipe(&pool, "Starter", "Caesar Salad").await;
    let chicken = recipe(&pool, "Main", "Roast Chicken").await;
    let soup = recipe(&pool, "Starter", "Onion Soup").await;

    let plan = NewMealPlan {
        date: june(1),
        assignments: vec![
            assignment(salad, "Starter", 1),
            assignment(chicken, "Main", 0),
            assignment(soup, "Starter", 0),
        ],
    };
    let view = MealPlanService::create(&pool, "user_a", &plan).await.unwrap();

    assert_eq!(view.date, june(1));
    assert_eq!(view.recipes.len(), 3);
    let groups: Vec<_> = view.meals.iter().map(|g| g.meal_type.as_str()).collect();
    assert_eq!(groups, vec!["Starter", "Main"]);
    let starters: Vec<_> = view.meals[0]
        .recipes
        .iter()
        .map(|r| r.recipe.title.as_str())
        .collect();
    assert_eq!(starters, vec!["Onion Soup", "Caesar Salad"]);

    let listed = MealPlanService::list_for_user(&pool, "user_a").await.unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].meals, view.meals);
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "needs a Postgres DATABASE_URL"]
async fn second_plan_on_the_same_date_conflicts(pool: PgPool) {
    let plan = NewMealPlan {
        date: june(2),
        assignments: Vec::new(),
    };
    MealPlanService::create(&pool, "user_a", &plan).await.unwrap();

    let err = MealPlanService::create(&pool, "user_a", &plan).await.unwrap_err();
    assert!(matches!(err, ServiceError::DuplicateDate(d) if d == june(2)));

    // Another user may plan the same day
    MealPlanService::create(&pool, "user_b", &plan).await.unwrap();
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "needs a Postgres DATABASE_URL"]
async fn concurrent_creates_for_one_date_admit_a_single_winner(pool: PgPool) {
    let plan = NewMealPlan {
        date: june(3),
        assignments: Vec::new(),
    };
    let (a, b) = tokio::join!(
        MealPlanService::create(&pool, "user_a", &plan),
        MealPlanService::create(&pool, "user_a", &plan),
    );

    let outcomes = [a, b];
    assert_eq!(outcomes.iter().filter(|r| r.is_ok()).count(), 1);
    assert!(outcomes
        .iter()
        .any(|r| matches!(r, Err(ServiceError::DuplicateDate(_)))));
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "needs a Postgres DATABASE_URL"]
async fn unknown_recipe_rolls_the_whole_plan_back(pool: PgPool) {
    let cake = recipe(&pool, "Dessert", "Chocolate Cake").await;
    let plan = NewMealPlan {
        date: june(4),
        assignments: vec![
            assignment(cake, "Dessert", 0),
            assignment(Uuid::new_v4(), "Dessert", 1),
        ],
    };

    let err = MealPlanService::create(&pool, "user_a", &plan).await.unwrap_err();
    assert!(matches!(err, ServiceError::UnknownRecipe));

    let plans: i64 = sqlx::query_scalar("SELECT COUNT(*)::BIGINT FROM meal_plans")
        .fetch_one(&pool)
        .await
        .unwrap();
    let assignments: i64 = sqlx::query_scalar("SELECT COUNT(*)::BIGINT FROM meal_plan_recipes")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!((plans, assignments), (0, 0));
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "needs a Postgres DATABASE_URL"]
async fn only_the_owner_can_touch_a_plan(pool: PgPool) {
    let cake = recipe(&pool, "Dessert", "Chocolate Cake").await;
    let view = MealPlanService::create(
        &pool,
        "user_a",
        &NewMealPlan {
            date: june(5),
            assignments: vec![assignment(cake, "Dessert", 0)],
        },
    )
    .await
    .unwrap();
    let assignment_id = view.recipes[0].id;

    let err = MealPlanService::delete(&pool, "user_b", view.id).await.unwrap_err();
    assert!(matches!(err, ServiceError::NotFound("Meal plan")));

    let err = MealPlanService::add_recipe(&pool, "user_b", view.id, &assignment(cake, "Snack", 2))
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::NotFound("Meal plan")));

    let changes = AssignmentChanges {
        meal_type: Some("Snack".into()),
        order: None,
    };
    let err = MealPlanService::update_recipe(&pool, "user_b", assignment_id, &changes)
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::NotFound("Meal plan recipe")));

    let err = MealPlanService::remove_recipe(&pool, "user_b", assignment_id)
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::NotFound("Meal plan recipe")));

    assert_eq!(
        MealPlanService::list_for_user(&pool, "user_a").await.unwrap()[0]
            .recipes
            .len(),
        1
    );
    MealPlanService::delete(&pool, "user_a", view.id).await.unwrap();
    assert!(MealPlanService::list_for_user(&pool, "user_a")
        .await
        .unwrap()
        .is_empty());
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "needs a Postgres DATABASE_URL"]
async fn assignments_can_be_added_retagged_and_removed(pool: PgPool) {
    let cake = recipe(&pool, "Dessert", "Chocolate Cake").await;
    let chicken = recipe(&pool, "Main", "Roast Chicken").await;
    let view = MealPlanService::create(
        &pool,
        "user_a",
        &NewMealPlan {
            date: june(6),
            assignments: Vec::new(),
        },
    )
    .await
    .unwrap();

    let added = MealPlanService::add_recipe(&pool, "user_a", view.id, &assignment(cake, "Dessert", 0))
        .await
        .unwrap();
    assert_eq!(added.meal_plan_id, view.id);
    assert_eq!(added.order, 0);

    let err = MealPlanService::add_recipe(
        &pool,
        "user_a",
        view.id,
        &assignment(Uuid::new_v4(), "Main", 0),
    )
    .await
    .unwrap_err();
    assert!(matches!(err, ServiceError::UnknownRecipe));

    MealPlanService::add_recipe(&pool, "user_a", view.id, &assignment(chicken, "Main", 0))
        .await
        .unwrap();

    let changed = MealPlanService::update_recipe(
        &pool,
        "user_a",
        added.id,
        &AssignmentChanges {
            meal_type: None,
            order: Some(4),
        },
    )
    .await
    .unwrap();
    assert_eq!(changed.meal_type, "Dessert");
    assert_eq!(changed.order, 4);

    MealPlanService::remove_recipe(&pool, "user_a", added.id).await.unwrap();
    let listed = MealPlanService::list_for_user(&pool, "user_a").await.unwrap();
    assert_eq!(listed[0].recipes.len(), 1);
    assert_eq!(listed[0].meals[0].meal_type, "Main");
}
