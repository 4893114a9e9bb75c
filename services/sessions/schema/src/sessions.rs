use sea_orm::entity::prelude::*;

/// A private two-participant swipe session.
///
/// `guest_id` is assigned at most once (conditional update on NULL). A row
/// with `ended_at` set is terminal. Preference bundles are stored as JSON
/// per participant role.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "sessions")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub code: String,
    pub host_id: Uuid,
    pub guest_id: Option<Uuid>,
    pub genre_id: i32,
    pub industry: Option<String>,
    pub host_prefs: Option<Json>,
    pub guest_prefs: Option<Json>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub ended_at: Option<chrono::DateTime<chrono::Utc>>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::swipes::Entity")]
    Swipes,
    #[sea_orm(has_many = "super::matches::Entity")]
    Matches,
}

impl Related<super::swipes::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Swipes.def()
    }
}

impl Related<super::matches::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Matches.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
