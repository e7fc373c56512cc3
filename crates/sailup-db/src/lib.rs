//! # sailup-db: Database Layer for SailUp
//!
//! This crate provides database access for the SailUp booking backend.
//! It uses SQLite for storage with sqlx for async operations.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        SailUp Data Flow                                 │
//! │                                                                         │
//! │  Form handler (register / book / admin)                                │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     sailup-db (THIS CRATE)                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌────────────────┐    ┌──────────────┐ │   │
//! │  │   │   Database    │    │  Repositories  │    │  Migrations  │ │   │
//! │  │   │   (pool.rs)   │◄───│  user.rs       │    │  (embedded)  │ │   │
//! │  │   │   SqlitePool  │    │  product.rs    │    │  001_init…   │ │   │
//! │  │   │               │    │  booking.rs    │    │              │ │   │
//! │  │   └───────────────┘    └────────────────┘    └──────────────┘ │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SQLite database file (WAL mode)                                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database error types and classification
//! - [`repository`] - Repository implementations (user, product, booking)
//!
//! ## Usage
//!
//! ```rust,ignore
//! use sailup_db::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("path/to/sailup.db")).await?;
//!
//! let user = db.users().authenticate("gianni@example.com", "secret").await?;
//! let id = db.bookings().create(&new_booking).await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};

// Repository re-exports for convenience
pub use repository::booking::BookingRepository;
pub use repository::product::{ProductFilter, ProductRepository};
pub use repository::user::UserRepository;
