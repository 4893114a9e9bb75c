use sea_orm_migration::prelude::*;

mod m20250801_000001_create_catalog;
mod m20250801_000002_create_sessions;
mod m20250801_000003_create_swipes;
mod m20250801_000004_create_matches;
mod m20250801_000005_create_movie_exposures;
mod m20250801_000006_create_taste_signals;
mod m20250801_000007_create_pair_chemistry;
mod m20250801_000008_create_session_stats;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250801_000001_create_catalog::Migration),
            Box::new(m20250801_000002_create_sessions::Migration),
            Box::new(m20250801_000003_create_swipes::Migration),
            Box::new(m20250801_000004_create_matches::Migration),
            Box::new(m20250801_000005_create_movie_exposures::Migration),
            Box::new(m20250801_000006_create_taste_signals::Migration),
            Box::new(m20250801_000007_create_pair_chemistry::Migration),
            Box::new(m20250801_000008_create_session_stats::Migration),
        ]
    }
}
