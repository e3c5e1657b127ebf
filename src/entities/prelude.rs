pub use super::accounts::Entity as Accounts;
pub use super::articles::Entity as Articles;
