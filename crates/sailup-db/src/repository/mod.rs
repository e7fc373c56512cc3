//! # Repository Module
//!
//! Database repository implementations for SailUp.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  The Repository pattern abstracts database access behind a clean API.  │
//! │                                                                         │
//! │  Caller (HTTP handler, CLI, test)                                      │
//! │       │                                                                 │
//! │       │  db.bookings().create(&new_booking)                            │
//! │       ▼                                                                 │
//! │  BookingRepository                                                     │
//! │  ├── create(&self, booking)                                            │
//! │  ├── has_conflict(&self, product_id, window)                           │
//! │  ├── update_status(&self, id, status)                                  │
//! │  └── for_user(&self, user_id, filter, language)                        │
//! │       │                                                                 │
//! │       │  parameterized SQL                                              │
//! │       ▼                                                                 │
//! │  SQLite Database                                                       │
//! │                                                                         │
//! │  Benefits:                                                              │
//! │  • Transaction boundaries live in ONE place                            │
//! │  • SQL is isolated from business code                                  │
//! │  • Repositories are cheap handles over the shared pool                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`user::UserRepository`] - registration, authentication, profiles
//! - [`product::ProductRepository`] - products + translations (transactional)
//! - [`booking::BookingRepository`] - availability gate and booking lifecycle

pub mod booking;
pub mod product;
pub mod user;
