pub mod article;
pub mod auth;
pub mod catalog;
pub mod comment;
pub mod meal_plan;
pub mod recipe;
pub mod user;
