use sea_orm::entity::prelude::*;

/// Per-(user pair, tag) swipe/match counters.
///
/// The pair is normalized so `user_a < user_b`; both participants map to the
/// same row regardless of who is host or guest.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "pair_chemistry")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub user_a: Uuid,
    #[sea_orm(primary_key, auto_increment = false)]
    pub user_b: Uuid,
    #[sea_orm(primary_key, auto_increment = false)]
    pub tag: String,
    pub swipe_count: i64,
    pub match_count: i64,
    pub last_matched_at: Option<chrono::DateTime<chrono::Utc>>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
