//! # sailup-core: Pure Business Logic for SailUp
//!
//! This crate is the **heart** of the SailUp booking backend. It contains all
//! business logic as pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        SailUp Architecture                              │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │              Web Frontend (forms, session layer)                │   │
//! │  │      register ──► book a boat ──► my bookings ──► admin        │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ extracted form data                    │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ sailup-core (THIS CRATE) ★                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌─────────────┐  ┌───────────┐  ┌──────────┐ │   │
//! │  │   │   types   │  │ fiscal_code │  │ validation│  │  money   │ │   │
//! │  │   │  Booking  │  │  checksum   │  │   rules   │  │  cents   │ │   │
//! │  │   │  Product  │  │  tables     │  │  policy   │  │  math    │ │   │
//! │  │   └───────────┘  └─────────────┘  └───────────┘  └──────────┘ │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    sailup-db (Database Layer)                   │   │
//! │  │          SQLite queries, migrations, repositories               │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (User, Product, Booking, status machine)
//! - [`fiscal_code`] - Codice Fiscale checksum validation
//! - [`validation`] - Field validators and the shared validation policy
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`error`] - Domain error types
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: every function is deterministic - same input, same output
//! 2. **No I/O**: database, network, file system access is FORBIDDEN here
//! 3. **Integer Money**: all monetary values are euro cents (i64)
//! 4. **Explicit Errors**: all errors are typed, never strings or panics
//! 5. **Collected Validation**: a form check reports every failing field at once

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod fiscal_code;
pub mod money;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================
// These allow users to do `use sailup_core::Booking` instead of
// `use sailup_core::types::Booking`

pub use error::{CoreError, CoreResult, ValidationError, ValidationFailures};
pub use money::Money;
pub use types::*;
pub use validation::{PasswordPolicy, ValidationPolicy};

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum length of a free-text address line (street, house number).
///
/// ## Business Reason
/// Matches the column width of the legacy store; anything longer is truncated
/// data waiting to happen, so it is rejected up front.
pub const MAX_ADDRESS_LINE_LEN: usize = 30;

/// Maximum length of an email address (RFC 5321 limit).
pub const MAX_EMAIL_LEN: usize = 254;

/// Minimum password length accepted by the default policy.
pub const MIN_PASSWORD_LEN: usize = 8;
