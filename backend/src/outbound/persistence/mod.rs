//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! Each repository implements one domain port over a shared [`DbPool`] of
//! `diesel-async` connections.
//!
//! - Diesel row structs (`models.rs`) and table definitions (`schema.rs`)
//!   stay private to this module; `row_mapping.rs` converts them into
//!   domain values.
//! - Pool and Diesel failures map onto each port's `connection` (503) and
//!   `query` (500) variants through `diesel_helpers`.
//!
//! # Example
//!
//! ```ignore
//! use coffee_chat::outbound::persistence::{DbPool, DieselNoteRepository, PoolConfig};
//!
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/coffee_chat")).await?;
//! let notes = DieselNoteRepository::new(pool.clone());
//! ```

mod diesel_chat_repository;
mod diesel_company_repository;
pub(crate) mod diesel_helpers;
mod diesel_note_repository;
mod diesel_person_repository;
mod diesel_user_preferences_repository;
mod json_serializers;
mod migrations;
mod models;
mod pool;
mod row_mapping;
mod schema;

pub use diesel_chat_repository::DieselChatRepository;
pub use diesel_company_repository::DieselCompanyRepository;
pub use diesel_note_repository::DieselNoteRepository;
pub use diesel_person_repository::DieselPersonRepository;
pub use diesel_user_preferences_repository::DieselUserPreferencesRepository;
pub use migrations::{MIGRATIONS, MigrationError, run_pending_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};
