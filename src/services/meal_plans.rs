use std::collections::HashMap;

use chrono::NaiveDate;
use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use crate::{
    error::ServiceError,
    models::meal_plan::{
        AssignmentChanges, MealGroup, MealPlan, MealPlanRecipe, MealPlanRecipeDetail,
        MealPlanRecipeRow, MealPlanView, NewAssignment, NewMealPlan,
    },
};

/// Assignment rows joined with their recipe and category. Callers append WHERE/ORDER BY.
const DETAIL_SELECT: &str = r#"SELECT mpr.id, mpr.meal_plan_id, mpr.meal_type, mpr.sort_order,
                  r.id AS recipe_id, r.title, r.preparation_time, r.difficulty, r.image,
                  c.id AS category_id, c.name AS category_name
           FROM meal_plan_recipes mpr
           JOIN meal_plans mp ON mp.id = mpr.meal_plan_id
           JOIN recipes r     ON r.id = mpr.recipe_id
           JOIN categories c  ON c.id = r.category_id"#;

const ASSIGNMENT_COLUMNS: &str = "id, meal_plan_id, recipe_id, meal_type, sort_order, created_at";

pub struct MealPlanService;

impl MealPlanService {
    /// All plans owned by `user_id`, date ascending, with recipes expanded and grouped.
    pub async fn list_for_user(
        pool: &PgPool,
        user_id: &str,
    ) -> Result<Vec<MealPlanView>, ServiceError> {
        let plans = sqlx::query_as::<_, MealPlan>(
            "SELECT id, date, user_id, created_at
             FROM meal_plans
             WHERE user_id = $1
             ORDER BY date",
        )
        .bind(user_id)
        .fetch_all(pool)
        .await?;

        let rows = sqlx::query_as::<_, MealPlanRecipeRow>(&format!(
            "{DETAIL_SELECT} WHERE mp.user_id = $1 ORDER BY mpr.seq"
        ))
        .bind(user_id)
        .fetch_all(pool)
        .await?;

        Ok(assemble(plans, rows))
    }

    /// Create a plan and its assignments in one transaction.
    ///
    /// The EXISTS pre-check gives the common case a clean error; the
    /// (user_id, date) unique index catches the concurrent one.
    pub async fn create(
        pool: &PgPool,
        user_id: &str,
        plan: &NewMealPlan,
    ) -> Result<MealPlanView, ServiceError> {
        let mut tx = pool.begin().await?;

        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM meal_plans WHERE user_id = $1 AND date = $2)",
        )
        .bind(user_id)
        .bind(plan.date)
        .fetch_one(&mut *tx)
        .await?;
        if exists {
            return Err(ServiceError::DuplicateDate(plan.date));
        }

        let created = sqlx::query_as::<_, MealPlan>(
            "INSERT INTO meal_plans (date, user_id)
             VALUES ($1, $2)
             RETURNING id, date, user_id, created_at",
        )
        .bind(plan.date)
        .bind(user_id)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| duplicate_date_or(e, plan.date))?;

        for assignment in &plan.assignments {
            insert_assignment(&mut *tx, created.id, assignment).await?;
        }

        let rows = sqlx::query_as::<_, MealPlanRecipeRow>(&format!(
            "{DETAIL_SELECT} WHERE mpr.meal_plan_id = $1 ORDER BY mpr.seq"
        ))
        .bind(created.id)
        .fetch_all(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(build_view(created, rows.into_iter().map(Into::into).collect()))
    }

    /// Delete a plan only if `user_id` owns it. Its assignments cascade.
    pub async fn delete(pool: &PgPool, user_id: &str, meal_plan_id: Uuid) -> Result<(), ServiceError> {
        let result = sqlx::query("DELETE FROM meal_plans WHERE id = $1 AND user_id = $2")
            .bind(meal_plan_id)
            .bind(user_id)
            .execute(pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(ServiceError::NotFound("Meal plan"));
        }
        Ok(())
    }

    /// Attach a recipe to a plan owned by `user_id`.
    pub async fn add_recipe(
        pool: &PgPool,
        user_id: &str,
        meal_plan_id: Uuid,
        assignment: &NewAssignment,
    ) -> Result<MealPlanRecipe, ServiceError> {
        let row = sqlx::query_as::<_, MealPlanRecipe>(&format!(
            "INSERT INTO meal_plan_recipes (meal_plan_id, recipe_id, meal_type, sort_order)
             SELECT mp.id, $3, $4, $5
             FROM meal_plans mp
             WHERE mp.id = $1 AND mp.user_id = $2
             RETURNING {ASSIGNMENT_COLUMNS}"
        ))
        .bind(meal_plan_id)
        .bind(user_id)
        .bind(assignment.recipe_id)
        .bind(&assignment.meal_type)
        .bind(assignment.order)
        .fetch_optional(pool)
        .await
        .map_err(unknown_recipe_or)?;

        row.ok_or(ServiceError::NotFound("Meal plan"))
    }

    /// Retag and/or reorder an assignment whose plan belongs to `user_id`.
    pub async fn update_recipe(
        pool: &PgPool,
        user_id: &str,
        meal_plan_recipe_id: Uuid,
        changes: &AssignmentChanges,
    ) -> Result<MealPlanRecipe, ServiceError> {
        let row = sqlx::query_as::<_, MealPlanRecipe>(
            "UPDATE meal_plan_recipes mpr
             SET meal_type  = COALESCE($3, mpr.meal_type),
                 sort_order = COALESCE($4, mpr.sort_order)
             FROM meal_plans mp
             WHERE mpr.id = $1 AND mp.id = mpr.meal_plan_id AND mp.user_id = $2
             RETURNING mpr.id, mpr.meal_plan_id, mpr.recipe_id, mpr.meal_type,
                       mpr.sort_order, mpr.created_at",
        )
        .bind(meal_plan_recipe_id)
        .bind(user_id)
        .bind(&changes.meal_type)
        .bind(changes.order)
        .fetch_optional(pool)
        .await?;

        row.ok_or(ServiceError::NotFound("Meal plan recipe"))
    }

    /// Remove an assignment whose plan belongs to `user_id`.
    pub async fn remove_recipe(
        pool: &PgPool,
        user_id: &str,
        meal_plan_recipe_id: Uuid,
    ) -> Result<(), ServiceError> {
        let result = sqlx::query(
            "DELETE FROM meal_plan_recipes mpr
             USING meal_plans mp
             WHERE mpr.id = $1 AND mp.id = mpr.meal_plan_id AND mp.user_id = $2",
        )
        .bind(meal_plan_recipe_id)
        .bind(user_id)
        .execute(pool)
        .await?;
        if result.rows_affected() == 0 {
            return Err(ServiceError::NotFound("Meal plan recipe"));
        }
        Ok(())
    }
}

async fn insert_assignment(
    conn: &mut PgConnection,
    meal_plan_id: Uuid,
    assignment: &NewAssignment,
) -> Result<(), ServiceError> {
    sqlx::query(
        "INSERT INTO meal_plan_recipes (meal_plan_id, recipe_id, meal_type, sort_order)
         VALUES ($1, $2, $3, $4)",
    )
    .bind(meal_plan_id)
    .bind(assignment.recipe_id)
    .bind(&assignment.meal_type)
    .bind(assignment.order)
    .execute(conn)
    .await
    .map_err(unknown_recipe_or)?;
    Ok(())
}

fn duplicate_date_or(err: sqlx::Error, date: NaiveDate) -> ServiceError {
    match &err {
        sqlx::Error::Database(db) if db.is_unique_violation() => ServiceError::DuplicateDate(date),
        _ => err.into(),
    }
}

fn unknown_recipe_or(err: sqlx::Error) -> ServiceError {
    match &err {
        sqlx::Error::Database(db) if db.is_foreign_key_violation() => ServiceError::UnknownRecipe,
        _ => err.into(),
    }
}

/// Attach detail rows (in insertion order) to their plans, keeping plan order.
pub fn assemble(plans: Vec<MealPlan>, rows: Vec<MealPlanRecipeRow>) -> Vec<MealPlanView> {
    let mut by_plan: HashMap<Uuid, Vec<MealPlanRecipeDetail>> = HashMap::new();
    for row in rows {
        by_plan
            .entry(row.meal_plan_id)
            .or_default()
            .push(row.into());
    }

    plans
        .into_iter()
        .map(|plan| {
            let recipes = by_plan.remove(&plan.id).unwrap_or_default();
            build_view(plan, recipes)
        })
        .collect()
}

fn build_view(plan: MealPlan, recipes: Vec<MealPlanRecipeDetail>) -> MealPlanView {
    let meals = group_by_meal_type(&recipes);
    MealPlanView {
        id: plan.id,
        date: plan.date,
        user_id: plan.user_id,
        created_at: plan.created_at,
        recipes,
        meals,
    }
}

/// Partition entries by meal type.
///
/// Groups come out in order of first appearance. Within a group entries are
/// stably sorted by `order`, so ties keep their input order.
pub fn group_by_meal_type(entries: &[MealPlanRecipeDetail]) -> Vec<MealGroup> {
    let mut groups: Vec<MealGroup> = Vec::new();
    for entry in entries {
        match groups.iter_mut().find(|g| g.meal_type == entry.meal_type) {
            Some(group) => group.recipes.push(entry.clone()),
            None => groups.push(MealGroup {
                meal_type: entry.meal_type.clone(),
                recipes: vec![entry.clone()],
            }),
        }
    }
    for group in &mut groups {
        group.recipes.sort_by_key(|e| e.order);
    }
    groups
}
