pub mod account;
pub mod article;
