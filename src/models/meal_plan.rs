use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::catalog::Category;
use crate::error::ServiceError;

/// A user's planned meals for one calendar day. Unique per (user_id, date).
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct MealPlan {
    pub id: Uuid,
    pub date: NaiveDate,
    pub user_id: String,
    pub created_at: DateTime<Utc>,
}

/// One recipe assigned to a plan under a meal-type slot.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct MealPlanRecipe {
    pub id: Uuid,
    pub meal_plan_id: Uuid,
    pub recipe_id: Uuid,
    pub meal_type: String,
    #[sqlx(rename = "sort_order")]
    pub order: i32,
    pub created_at: DateTime<Utc>,
}

/// Catalog fields of the recipe behind an assignment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecipeSummary {
    pub id: Uuid,
    pub title: String,
    pub preparation_time: i32,
    pub difficulty: i16,
    pub image: Option<String>,
    pub category: Category,
}

/// Flat join row: meal_plan_recipes ⋈ recipes ⋈ categories.
#[derive(Debug, Clone, FromRow)]
pub struct MealPlanRecipeRow {
    pub id: Uuid,
    pub meal_plan_id: Uuid,
    pub meal_type: String,
    pub sort_order: i32,
    pub recipe_id: Uuid,
    pub title: String,
    pub preparation_time: i32,
    pub difficulty: i16,
    pub image: Option<String>,
    pub category_id: Uuid,
    pub category_name: String,
}

/// An assignment with its recipe expanded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MealPlanRecipeDetail {
    pub id: Uuid,
    pub meal_plan_id: Uuid,
    pub meal_type: String,
    pub order: i32,
    pub recipe: RecipeSummary,
}

impl From<MealPlanRecipeRow> for MealPlanRecipeDetail {
    fn from(row: MealPlanRecipeRow) -> Self {
        Self {
            id: row.id,
            meal_plan_id: row.meal_plan_id,
            meal_type: row.meal_type,
            order: row.sort_order,
            recipe: RecipeSummary {
                id: row.recipe_id,
                title: row.title,
                preparation_time: row.preparation_time,
                difficulty: row.difficulty,
                image: row.image,
                category: Category {
                    id: row.category_id,
                    name: row.category_name,
                },
            },
        }
    }
}

/// Entries of one meal type, sorted by `order`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MealGroup {
    pub meal_type: String,
    pub recipes: Vec<MealPlanRecipeDetail>,
}

/// Response shape of GET /mealplan and POST /mealplan.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MealPlanView {
    pub id: Uuid,
    pub date: NaiveDate,
    pub user_id: String,
    pub created_at: DateTime<Utc>,
    /// Assignments in insertion order.
    pub recipes: Vec<MealPlanRecipeDetail>,
    pub meals: Vec<MealGroup>,
}

/// Body for POST /mealplan. Fields are optional so that missing ones yield a 400.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateMealPlanRequest {
    pub date: Option<String>,
    #[serde(default)]
    pub meal_plan_recipes: Vec<AssignmentInput>,
}

#[derive(Debug, Default, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignmentInput {
    pub recipe_id: Option<Uuid>,
    pub meal_type: Option<String>,
    pub order: Option<i32>,
}

/// Body for POST /mealplanrecipe.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddMealPlanRecipeRequest {
    pub meal_plan_id: Option<Uuid>,
    #[serde(flatten)]
    pub assignment: AssignmentInput,
}

/// Body for PUT /mealplanrecipe.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateMealPlanRecipeRequest {
    pub meal_plan_recipe_id: Option<Uuid>,
    pub meal_type: Option<String>,
    pub order: Option<i32>,
}

/// Body for DELETE /mealplanrecipe.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteMealPlanRecipeRequest {
    pub meal_plan_recipe_id: Option<Uuid>,
}

/// Query params for GET /mealplan.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MealPlanQuery {
    pub user_id: Option<String>,
}

/// Query params for DELETE /mealplan.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteMealPlanQuery {
    pub meal_plan_id: Option<Uuid>,
}

/// A validated assignment, ready to insert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAssignment {
    pub recipe_id: Uuid,
    pub meal_type: String,
    pub order: i32,
}

/// A validated plan with its initial assignments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewMealPlan {
    pub date: NaiveDate,
    pub assignments: Vec<NewAssignment>,
}

/// Validated in-place changes to an assignment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssignmentChanges {
    pub meal_type: Option<String>,
    pub order: Option<i32>,
}

/// Accepts `YYYY-MM-DD` or an RFC 3339 timestamp (kept at UTC calendar-day granularity).
pub fn parse_plan_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok().or_else(|| {
        DateTime::parse_from_rfc3339(raw)
            .ok()
            .map(|dt| dt.with_timezone(&Utc).date_naive())
    })
}

fn validate_meal_type(raw: &str) -> Result<String, ServiceError> {
    let meal_type = raw.trim();
    if meal_type.is_empty() {
        return Err(ServiceError::Validation("mealType must not be blank".into()));
    }
    Ok(meal_type.to_string())
}

fn validate_order(order: i32) -> Result<i32, ServiceError> {
    if order < 0 {
        return Err(ServiceError::Validation("order must not be negative".into()));
    }
    Ok(order)
}

impl AssignmentInput {
    pub fn validate(&self) -> Result<NewAssignment, ServiceError> {
        let recipe_id = self
            .recipe_id
            .ok_or_else(|| ServiceError::Validation("recipeId is required".into()))?;
        let meal_type = self
            .meal_type
            .as_deref()
            .ok_or_else(|| ServiceError::Validation("mealType is required".into()))
            .and_then(validate_meal_type)?;
        let order = self
            .order
            .ok_or_else(|| ServiceError::Validation("order is required".into()))
            .and_then(validate_order)?;
        Ok(NewAssignment {
            recipe_id,
            meal_type,
            order,
        })
    }
}

impl CreateMealPlanRequest {
    pub fn validate(&self) -> Result<NewMealPlan, ServiceError> {
        let raw = self
            .date
            .as_deref()
            .ok_or_else(|| ServiceError::Validation("date is required".into()))?;
        let date = parse_plan_date(raw).ok_or_else(|| {
            ServiceError::Validation("date must be YYYY-MM-DD or an RFC 3339 timestamp".into())
        })?;
        let assignments = self
            .meal_plan_recipes
            .iter()
            .map(AssignmentInput::validate)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(NewMealPlan { date, assignments })
    }
}

impl AddMealPlanRecipeRequest {
    pub fn validate(&self) -> Result<(Uuid, NewAssignment), ServiceError> {
        let meal_plan_id = self
            .meal_plan_id
            .ok_or_else(|| ServiceError::Validation("mealPlanId is required".into()))?;
        Ok((meal_plan_id, self.assignment.validate()?))
    }
}

impl UpdateMealPlanRecipeRequest {
    pub fn validate(&self) -> Result<(Uuid, AssignmentChanges), ServiceError> {
        let id = self
            .meal_plan_recipe_id
            .ok_or_else(|| ServiceError::Validation("mealPlanRecipeId is required".into()))?;
        if self.meal_type.is_none() && self.order.is_none() {
            return Err(ServiceError::Validation(
                "mealType or order must be provided".into(),
            ));
        }
        let meal_type = self.meal_type.as_deref().map(validate_meal_type).transpose()?;
        let order = self.order.map(validate_order).transpose()?;
        Ok((id, AssignmentChanges { meal_type, order }))
    }
}
