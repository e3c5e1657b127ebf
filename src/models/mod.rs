pub mod account;
pub mod article;

pub use account::{Account, AccountInput, Role};
pub use article::{Article, ArticleInput};
