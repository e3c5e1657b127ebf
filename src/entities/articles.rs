use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "articles")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    /// Operator-assigned code, unique case-insensitively.
    #[sea_orm(unique)]
    pub code: String,

    pub description: String,

    pub demar: Option<String>,

    pub prix_vente: f64,

    pub achat_minimum: f64,

    pub unite: Option<String>,

    #[sea_orm(column_name = "type")]
    pub article_type: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
