pub mod articles;
pub mod catalog;
pub mod comments;
pub mod meal_plans;
pub mod metrics;
pub mod nutrition;
pub mod recipes;
pub mod users;
