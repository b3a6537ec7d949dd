pub mod auth;
pub mod extract;
pub mod rate_limit;
pub mod webhook;
