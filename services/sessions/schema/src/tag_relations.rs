use sea_orm::entity::prelude::*;

/// Weighted directed edge between two tags, used for one-hop chemistry
/// propagation when scoring a deck.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "tag_relations")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub from_tag: String,
    #[sea_orm(primary_key, auto_increment = false)]
    pub to_tag: String,
    pub weight: f32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
