//! # Booking Repository
//!
//! Database operations for bookings: availability, creation, status
//! transitions and per-user listings.
//!
//! ## Availability Gate
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Two requests race for the same boat and weekend:                       │
//! │                                                                         │
//! │  naive:   check(ok) ──────────── insert ─► two overlapping bookings ❌ │
//! │           check(ok) ── insert ──                                        │
//! │                                                                         │
//! │  here:    INSERT … SELECT … WHERE NOT EXISTS (overlap probe)           │
//! │           ──► gate and insert are ONE atomic statement inside the      │
//! │               transaction; the loser inserts zero rows and gets        │
//! │               BookingConflict ✓                                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Overlap uses strict half-open semantics: an existing non-cancelled
//! booking conflicts with `[start, end)` iff
//! `existing.start < end AND existing.end > start`.

use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use sailup_core::validation::validate_price_cents;
use sailup_core::{
    Booking, BookingFilter, BookingStatus, BookingSummary, BookingWindow, CoreError, NewBooking,
};

/// Repository for booking database operations.
#[derive(Debug, Clone)]
pub struct BookingRepository {
    pool: SqlitePool,
}

/// Product facts needed by the booking gate; never leaves this module.
#[derive(Debug, sqlx::FromRow)]
struct ProductGateRow {
    license_required: bool,
}

impl BookingRepository {
    /// Creates a new BookingRepository.
    pub fn new(pool: SqlitePool) -> Self {
        BookingRepository { pool }
    }

    /// Creates a booking, enforcing availability atomically.
    ///
    /// ## What This Does (one transaction)
    /// 1. The product must exist and be active
    /// 2. If the product requires a licence, the user must have one recorded
    /// 3. The insert is guarded by the overlap probe; zero rows inserted
    ///    means another non-cancelled booking holds the window
    ///
    /// ## Returns
    /// The generated booking id.
    ///
    /// ## Errors
    /// * `Domain(ProductNotFound)` / `NotFound` (user)
    /// * `Domain(LicenseRequired)`
    /// * `Domain(BookingConflict)` - overlapping window, nothing written
    pub async fn create(&self, booking: &NewBooking) -> DbResult<i64> {
        validate_price_cents("total price", booking.total_price_cents)
            .map_err(|f| CoreError::Validation(sailup_core::ValidationFailures(vec![f])))?;

        let window = &booking.window;
        let status = booking.status.unwrap_or_default();

        debug!(
            product_id = %booking.product_id,
            user_id = booking.user_id,
            start = %window.start(),
            end = %window.end(),
            "creating booking"
        );

        let mut tx = self.pool.begin().await?;

        let product: Option<ProductGateRow> = sqlx::query_as(
            r#"
            SELECT Richiede_Patente AS license_required
            FROM Prodotto
            WHERE IDProdotto = ?1 AND Attivo = 1
            "#,
        )
        .bind(&booking.product_id)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(product) = product else {
            return Err(CoreError::ProductNotFound(booking.product_id.clone()).into());
        };

        let license: Option<Option<String>> = sqlx::query_scalar(
            "SELECT Numero_Patente_Nautica FROM Utente WHERE IDUtente = ?1 AND Attivo = 1",
        )
        .bind(booking.user_id)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(license) = license else {
            return Err(DbError::not_found("Utente", booking.user_id));
        };

        if product.license_required && license.as_deref().map_or(true, str::is_empty) {
            return Err(CoreError::LicenseRequired {
                product_id: booking.product_id.clone(),
            }
            .into());
        }

        // Gate and insert in one statement: the overlap probe runs under the
        // same transaction as the write, so a concurrent attempt for the same
        // window can never also pass it.
        let result = sqlx::query(
            r#"
            INSERT INTO Prenotazione
                (IDUtente, IDProdotto, Data_Ora_Inizio, Data_Ora_Fine,
                 Skipper_Richiesto, Lingua_Guida, Prezzo_Totale,
                 Metodo_Pagamento, Stato_Prenotazione, Note_Addizionali)
            SELECT ?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10
            WHERE NOT EXISTS (
                SELECT 1 FROM Prenotazione
                WHERE IDProdotto = ?2
                  AND Stato_Prenotazione <> 'Cancellata'
                  AND datetime(Data_Ora_Inizio) < datetime(?4)
                  AND datetime(Data_Ora_Fine)   > datetime(?3)
            )
            "#,
        )
        .bind(booking.user_id)
        .bind(&booking.product_id)
        .bind(window.start())
        .bind(window.end())
        .bind(booking.skipper_requested)
        .bind(&booking.guide_language)
        .bind(booking.total_price_cents)
        .bind(booking.payment_method)
        .bind(status)
        .bind(&booking.notes)
        .execute(&mut *tx)
        .await?;

        if result.rows_affected() == 0 {
            return Err(CoreError::BookingConflict {
                product_id: booking.product_id.clone(),
            }
            .into());
        }

        let id = result.last_insert_rowid();
        tx.commit().await?;

        debug!(id, "booking created");
        Ok(id)
    }

    /// Read-only availability probe.
    ///
    /// True iff some non-cancelled booking for the product overlaps the
    /// window. The create path does NOT rely on this check; it exists for
    /// calendar displays and pre-flight UX.
    pub async fn has_conflict(&self, product_id: &str, window: &BookingWindow) -> DbResult<bool> {
        let count: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*) FROM Prenotazione
            WHERE IDProdotto = ?1
              AND Stato_Prenotazione <> 'Cancellata'
              AND datetime(Data_Ora_Inizio) < datetime(?3)
              AND datetime(Data_Ora_Fine)   > datetime(?2)
            "#,
        )
        .bind(product_id)
        .bind(window.start())
        .bind(window.end())
        .fetch_one(&self.pool)
        .await?;

        Ok(count > 0)
    }

    /// Gets a booking by ID.
    pub async fn get(&self, id: i64) -> DbResult<Option<Booking>> {
        let booking = sqlx::query_as::<_, Booking>(
            r#"
            SELECT
                IDPrenotazione     AS id,
                IDUtente           AS user_id,
                IDProdotto         AS product_id,
                Data_Ora_Inizio    AS "start",
                Data_Ora_Fine      AS "end",
                Skipper_Richiesto  AS skipper_requested,
                Lingua_Guida       AS guide_language,
                Prezzo_Totale      AS total_price_cents,
                Metodo_Pagamento   AS payment_method,
                Stato_Prenotazione AS status,
                Note_Addizionali   AS notes
            FROM Prenotazione
            WHERE IDPrenotazione = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(booking)
    }

    /// Moves a booking through the status machine.
    ///
    /// The transition table is enforced (no unconditional overwrite):
    /// illegal moves fail with `InvalidStatusTransition`, same-status updates
    /// succeed without writing, so cancelling twice is idempotent.
    ///
    /// ## Returns
    /// The status the booking ends up in.
    pub async fn update_status(&self, id: i64, new_status: BookingStatus) -> DbResult<BookingStatus> {
        let mut tx = self.pool.begin().await?;

        let current: Option<BookingStatus> =
            sqlx::query_scalar("SELECT Stato_Prenotazione FROM Prenotazione WHERE IDPrenotazione = ?1")
                .bind(id)
                .fetch_optional(&mut *tx)
                .await?;

        let Some(current) = current else {
            return Err(DbError::not_found("Prenotazione", id));
        };

        if current == new_status {
            // Idempotent no-op; nothing to write
            return Ok(current);
        }

        if !current.can_transition_to(new_status) {
            return Err(CoreError::InvalidStatusTransition {
                from: current,
                to: new_status,
            }
            .into());
        }

        // Optimistic guard: the row must still hold the status we just read
        let result = sqlx::query(
            r#"
            UPDATE Prenotazione
            SET Stato_Prenotazione = ?2
            WHERE IDPrenotazione = ?1 AND Stato_Prenotazione = ?3
            "#,
        )
        .bind(id)
        .bind(new_status)
        .bind(current)
        .execute(&mut *tx)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::Unavailable(
                "booking status changed concurrently, retry".to_string(),
            ));
        }

        tx.commit().await?;

        debug!(id, ?current, ?new_status, "booking status updated");
        Ok(new_status)
    }

    /// Lists a user's bookings, newest start first, with the product name
    /// localized to `language`.
    ///
    /// ## Filters
    /// * `Future` - bookings whose start is at or after now
    /// * `Past`   - bookings whose end is before now
    /// * `All`    - everything
    pub async fn for_user(
        &self,
        user_id: i64,
        filter: BookingFilter,
        language: &str,
    ) -> DbResult<Vec<BookingSummary>> {
        // Fixed fragments only; user data never reaches the statement text.
        let time_clause = match filter {
            BookingFilter::Future => "AND datetime(p.Data_Ora_Inizio) >= datetime('now')",
            BookingFilter::Past => "AND datetime(p.Data_Ora_Fine) < datetime('now')",
            BookingFilter::All => "",
        };

        let sql = format!(
            r#"
            SELECT
                p.IDPrenotazione     AS id,
                p.IDProdotto         AS product_id,
                p.Data_Ora_Inizio    AS "start",
                p.Data_Ora_Fine      AS "end",
                p.Stato_Prenotazione AS status,
                p.Prezzo_Totale      AS total_price_cents,
                pt.Nome_Prodotto     AS product_name
            FROM Prenotazione p
            LEFT JOIN Lingua l ON l.Codice_Lingua = ?2
            LEFT JOIN Prodotto_Traduzione pt
                ON pt.IDProdotto = p.IDProdotto AND pt.IDLingua = l.IDLingua
            WHERE p.IDUtente = ?1
            {time_clause}
            ORDER BY datetime(p.Data_Ora_Inizio) DESC
            "#
        );

        let bookings = sqlx::query_as::<_, BookingSummary>(&sql)
            .bind(user_id)
            .bind(language)
            .fetch_all(&self.pool)
            .await?;

        Ok(bookings)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
