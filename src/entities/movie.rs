use sea_orm::entity::prelude::*;

use crate::models::BoxOffice;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "movies")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    #[sea_orm(unique)]
    pub title: String,
    /// Lowercased title used for substring search.
    pub title_search: String,
    pub release_date: String,
    pub genre: String,
    pub distributor: Option<String>,
    pub budget: Option<i64>,
    pub mpa_rating: Option<String>,
    #[sea_orm(column_type = "Json", nullable)]
    pub box_office: Option<BoxOffice>,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
