//! Database seeding for development and load testing.

pub mod models;
pub mod users;

use sqlx::PgPool;
use std::time::Instant;

pub use models::{SeedConfig, UserSeed};
pub use users::{clear_users, generate_staff, generate_students, seed_staff, seed_students};

/// Seeds staff and students according to `config`.
pub async fn seed_all(db: &PgPool, config: SeedConfig) -> anyhow::Result<()> {
    let start_time = Instant::now();
    println!("🌱 Seeding database...");

    seed_staff(db, config.admins, config.teachers).await?;
    seed_students(db, config.students, &config.grades, &config.sections).await?;

    println!("✅ Seeding finished in {:?}", start_time.elapsed());
    Ok(())
}
