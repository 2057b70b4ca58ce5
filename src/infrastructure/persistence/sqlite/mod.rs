//! SQLite Persistence

mod database;
mod task_repo;
mod voice_repo;

pub use database::{create_pool, run_migrations, DatabaseConfig, DbPool};
pub use task_repo::SqliteTaskRepository;
pub use voice_repo::SqliteVoiceRepository;
