//! Database migrations.
//!
//! Schema migrations for the database.

#![allow(missing_docs)]

use sea_orm_migration::prelude::*;

mod m20250601_000001_create_sequence_counter_table;
mod m20250601_000002_create_subject_table;
mod m20250601_000003_create_reaction_table;
mod m20250601_000004_create_comment_table;
mod m20250601_000005_create_comment_like_table;
mod m20250601_000006_create_saved_item_table;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250601_000001_create_sequence_counter_table::Migration),
            Box::new(m20250601_000002_create_subject_table::Migration),
            Box::new(m20250601_000003_create_reaction_table::Migration),
            Box::new(m20250601_000004_create_comment_table::Migration),
            Box::new(m20250601_000005_create_comment_like_table::Migration),
            Box::new(m20250601_000006_create_saved_item_table::Migration),
        ]
    }
}
