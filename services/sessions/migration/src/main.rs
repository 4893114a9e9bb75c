use sea_orm_migration::prelude::*;

#[tokio::main]
async fn main() {
    cli::run_cli(cinematch_sessions_migration::Migrator).await;
}
