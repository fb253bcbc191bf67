pub use sea_orm_migration::prelude::*;

mod m20260301_000001_create_players_table;
mod m20260301_000002_create_matches_table;
mod m20260301_000003_create_courses_table;
mod m20260301_000004_create_students_table;
mod m20260301_000005_create_enrollments_table;
mod m20260301_000006_create_predictions_table;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20260301_000001_create_players_table::Migration),
            Box::new(m20260301_000002_create_matches_table::Migration),
            Box::new(m20260301_000003_create_courses_table::Migration),
            Box::new(m20260301_000004_create_students_table::Migration),
            Box::new(m20260301_000005_create_enrollments_table::Migration),
            Box::new(m20260301_000006_create_predictions_table::Migration),
        ]
    }
}
