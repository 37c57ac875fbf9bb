pub mod article;
pub mod auth;
pub mod category;
pub mod comment;
pub mod frontend;
pub mod tag;
pub mod user;
