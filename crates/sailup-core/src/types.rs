//! # Domain Types
//!
//! Core domain types used throughout SailUp.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │     User        │   │    Product      │   │    Booking      │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id             │   │  code           │   │  id             │       │
//! │  │  fiscal_code    │   │  product_type   │   │  user_id        │       │
//! │  │  email          │   │  base_price     │   │  product_id     │       │
//! │  │  address_id ────┼─┐ │  translations   │   │  window         │       │
//! │  └─────────────────┘ │ └─────────────────┘   │  status         │       │
//! │                      │                       └─────────────────┘       │
//! │  ┌─────────────────┐ │ ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Address      │◄┘ │  BookingStatus  │   │  BookingWindow  │       │
//! │  │  street, city…  │   │  Pending        │   │  [start, end)   │       │
//! │  └─────────────────┘   │  Confirmed      │   │  half-open      │       │
//! │                        │  Cancelled      │   │  interval       │       │
//! │                        └─────────────────┘   └─────────────────┘       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Naming
//! The persisted store keeps the legacy Italian column values
//! (`'In Attesa'`, `'Noleggio'`, …); the sqlx derives carry the mapping so
//! the rest of the code only ever sees the English enums.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::money::Money;

// =============================================================================
// Product Type
// =============================================================================

/// What kind of product is on offer: a rentable boat or a guided experience.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[serde(rename_all = "snake_case")]
pub enum ProductType {
    /// Bare-boat rental (store value `Noleggio`).
    #[cfg_attr(feature = "sqlx", sqlx(rename = "Noleggio"))]
    Rental,
    /// Guided experience with crew (store value `Experience`).
    #[cfg_attr(feature = "sqlx", sqlx(rename = "Experience"))]
    Experience,
}

// =============================================================================
// Booking Status
// =============================================================================

/// The status of a booking.
///
/// ## Transition Table
/// ```text
/// Pending ──► Confirmed ──► Cancelled
///    │                          ▲
///    └──────────────────────────┘
/// ```
/// Cancelled is terminal. Same-status transitions are idempotent no-ops, so
/// cancelling an already-cancelled booking succeeds without effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[serde(rename_all = "snake_case")]
pub enum BookingStatus {
    /// Awaiting confirmation (store value `In Attesa`).
    #[cfg_attr(feature = "sqlx", sqlx(rename = "In Attesa"))]
    Pending,
    /// Confirmed by an administrator (store value `Confermata`).
    #[cfg_attr(feature = "sqlx", sqlx(rename = "Confermata"))]
    Confirmed,
    /// Cancelled; terminal logical state (store value `Cancellata`).
    #[cfg_attr(feature = "sqlx", sqlx(rename = "Cancellata"))]
    Cancelled,
}

impl BookingStatus {
    /// Whether a booking in this status may move to `target`.
    ///
    /// Same-status transitions are allowed (idempotent), every other legal
    /// move is listed explicitly; anything else is rejected.
    pub fn can_transition_to(self, target: BookingStatus) -> bool {
        use BookingStatus::*;

        match (self, target) {
            (from, to) if from == to => true,
            (Pending, Confirmed) | (Pending, Cancelled) | (Confirmed, Cancelled) => true,
            _ => false,
        }
    }

    /// True once no further transitions (other than no-ops) are possible.
    pub fn is_terminal(self) -> bool {
        self == BookingStatus::Cancelled
    }
}

impl Default for BookingStatus {
    fn default() -> Self {
        BookingStatus::Pending
    }
}

// =============================================================================
// Payment Method
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    /// Payment on site (store value `Contanti`).
    #[cfg_attr(feature = "sqlx", sqlx(rename = "Contanti"))]
    Cash,
    /// Card payment (store value `Carta`).
    #[cfg_attr(feature = "sqlx", sqlx(rename = "Carta"))]
    Card,
    /// Bank transfer (store value `Bonifico`).
    #[cfg_attr(feature = "sqlx", sqlx(rename = "Bonifico"))]
    BankTransfer,
}

impl Default for PaymentMethod {
    fn default() -> Self {
        PaymentMethod::Cash
    }
}

// =============================================================================
// Booking Window
// =============================================================================

/// A half-open `[start, end)` time interval for a booking.
///
/// The constructor is the single place where `start < end` is enforced, so a
/// `BookingWindow` value is valid by construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingWindow {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

impl BookingWindow {
    /// Creates a window, rejecting empty or inverted intervals.
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Self, ValidationError> {
        if start >= end {
            return Err(ValidationError::InvalidFormat {
                field: "booking window",
                reason: "start must be before end",
            });
        }
        Ok(BookingWindow { start, end })
    }

    #[inline]
    pub fn start(&self) -> DateTime<Utc> {
        self.start
    }

    #[inline]
    pub fn end(&self) -> DateTime<Utc> {
        self.end
    }

    pub fn duration(&self) -> Duration {
        self.end - self.start
    }

    /// Strict interval-intersection test over half-open intervals:
    /// two windows conflict iff `self.start < other.end && self.end > other.start`.
    ///
    /// Back-to-back windows (one ending exactly when the other starts) do
    /// NOT overlap.
    pub fn overlaps(&self, other: &BookingWindow) -> bool {
        self.start < other.end && self.end > other.start
    }
}

// =============================================================================
// User & Address
// =============================================================================

/// A registered user.
///
/// The password hash never leaves the persistence layer; this type is safe to
/// hand to presentation code.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct User {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    /// Italian fiscal code, unique, checksummed.
    pub fiscal_code: String,
    pub email: String,
    /// Optional nautical licence number (5-10 digits).
    pub nautical_license: Option<String>,
    pub address_id: i64,
    /// Proper boolean; never compared loosely.
    pub is_admin: bool,
    pub is_active: bool,
    pub registered_at: DateTime<Utc>,
    /// Bumped on every successful authentication.
    pub last_access: Option<DateTime<Utc>>,
}

/// A postal address, owned exclusively by the user referencing it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Address {
    pub id: i64,
    pub street: String,
    pub house_number: String,
    pub postal_code: String,
    pub city: String,
    pub province: String,
    pub country: String,
}

// =============================================================================
// Product & Translation
// =============================================================================

/// A rentable boat or bookable experience.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Product {
    /// Caller-assigned product code (business identifier).
    pub code: String,
    pub product_type: ProductType,
    /// Base price in euro cents.
    pub base_price_cents: i64,
    pub total_seats: i64,
    pub accessible: bool,
    /// Boat length in metres; None for experiences without a fixed boat.
    pub boat_length_m: Option<f64>,
    /// When true, bookings require the user to hold a nautical licence.
    pub license_required: bool,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl Product {
    /// Returns the base price as a Money value.
    #[inline]
    pub fn base_price(&self) -> Money {
        Money::from_cents(self.base_price_cents)
    }
}

/// Localized name/description/specs for a product in one language.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Translation {
    pub language_code: String,
    pub name: String,
    pub description: Option<String>,
    pub specs: Option<String>,
}

/// A product together with all of its translations.
///
/// A displayable product should have at least one translation; persistence
/// does not enforce this, so `translations` may be empty.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductWithTranslations {
    pub product: Product,
    pub translations: Vec<Translation>,
}

/// A product row projected for listings in one language.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct LocalizedProduct {
    pub code: String,
    pub product_type: ProductType,
    pub base_price_cents: i64,
    pub total_seats: i64,
    pub accessible: bool,
    /// None when the product has no translation in the requested language.
    pub name: Option<String>,
    pub description: Option<String>,
}

// =============================================================================
// Booking
// =============================================================================

/// A reservation of a product by a user for a time interval.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Booking {
    pub id: i64,
    pub user_id: i64,
    pub product_id: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub skipper_requested: bool,
    pub guide_language: Option<String>,
    pub total_price_cents: i64,
    pub payment_method: PaymentMethod,
    pub status: BookingStatus,
    pub notes: Option<String>,
}

impl Booking {
    /// Returns the booked interval as a window value.
    ///
    /// The store enforces `start < end`, so this cannot fail on persisted
    /// rows; a corrupted row would surface here.
    pub fn window(&self) -> Result<BookingWindow, ValidationError> {
        BookingWindow::new(self.start, self.end)
    }

    /// Returns the total price as a Money value.
    #[inline]
    pub fn total_price(&self) -> Money {
        Money::from_cents(self.total_price_cents)
    }
}

/// A booking row joined with the localized product name for user listings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct BookingSummary {
    pub id: i64,
    pub product_id: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub status: BookingStatus,
    pub total_price_cents: i64,
    /// None when the product has no translation in the requested language.
    pub product_name: Option<String>,
}

/// Time filter for per-user booking listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BookingFilter {
    /// Bookings whose start is at or after now.
    Future,
    /// Bookings whose end is before now.
    Past,
    /// No time filter.
    All,
}

// =============================================================================
// Input Types
// =============================================================================

/// Address fields as submitted by the registration form.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewAddress {
    pub street: String,
    pub house_number: String,
    pub postal_code: String,
    pub city: String,
    pub province: String,
    /// Defaults to `IT` when absent.
    pub country: Option<String>,
}

/// Registration form input. Plain password; it is hashed before storage and
/// never persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegistrationInput {
    pub first_name: String,
    pub last_name: String,
    pub fiscal_code: String,
    pub email: String,
    pub password: String,
    pub nautical_license: Option<String>,
    pub address: NewAddress,
}

/// Editable user profile fields; None means "leave unchanged".
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserUpdate {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub nautical_license: Option<String>,
}

/// Input for creating a product.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewProduct {
    pub code: String,
    pub product_type: ProductType,
    pub base_price_cents: i64,
    pub total_seats: i64,
    pub accessible: bool,
    pub boat_length_m: Option<f64>,
    pub license_required: bool,
}

/// One translation row accompanying a product creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewTranslation {
    pub language_code: String,
    pub name: String,
    pub description: Option<String>,
    pub specs: Option<String>,
}

/// Input for creating a booking. The window is valid by construction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewBooking {
    pub user_id: i64,
    pub product_id: String,
    pub window: BookingWindow,
    pub skipper_requested: bool,
    pub guide_language: Option<String>,
    pub total_price_cents: i64,
    pub payment_method: PaymentMethod,
    /// Initial status; Pending when absent.
    pub status: Option<BookingStatus>,
    pub notes: Option<String>,
}

// =============================================================================
// Unit Tests
// =============================================================================
