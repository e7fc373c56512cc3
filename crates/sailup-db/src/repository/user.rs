//! # User Repository
//!
//! Database operations for users and their addresses.
//!
//! ## Registration Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  register(input)                                                        │
//! │     │                                                                   │
//! │     ├── validate ALL fields (collected failures, one round trip)       │
//! │     │                                                                   │
//! │     ▼  BEGIN TRANSACTION                                               │
//! │     ├── email already taken?        → EmailAlreadyRegistered           │
//! │     ├── fiscal code already taken?  → FiscalCodeAlreadyRegistered      │
//! │     ├── INSERT Indirizzo            → address id                       │
//! │     ├── INSERT Utente (argon2 hash) → user id                          │
//! │     ▼  COMMIT                                                          │
//! │     └── return the stored User (never the hash)                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//! The UNIQUE constraints on Email and CF remain as a backstop under
//! concurrent registrations; the pre-checks exist to give precise errors.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use sailup_core::validation::{
    self, validate_email, validate_nautical_license, validate_person_name,
};
use sailup_core::{
    Address, CoreError, RegistrationInput, User, UserUpdate, ValidationFailures, ValidationPolicy,
};

/// Repository for user database operations.
#[derive(Debug, Clone)]
pub struct UserRepository {
    pool: SqlitePool,
}

/// Credential row fetched for authentication; never leaves this module.
#[derive(Debug, sqlx::FromRow)]
struct AuthRow {
    id: i64,
    password_hash: String,
}

impl UserRepository {
    /// Creates a new UserRepository.
    pub fn new(pool: SqlitePool) -> Self {
        UserRepository { pool }
    }

    /// Registers a new user together with their address.
    ///
    /// ## Arguments
    /// * `input` - raw registration form data (plain password)
    /// * `policy` - the deployment's validation rule set
    ///
    /// ## Errors
    /// * `Domain(Validation(_))` - one entry per failing field
    /// * `Domain(EmailAlreadyRegistered)` / `Domain(FiscalCodeAlreadyRegistered)`
    pub async fn register(
        &self,
        input: &RegistrationInput,
        policy: &ValidationPolicy,
    ) -> DbResult<User> {
        validation::validate_registration(input, policy).map_err(CoreError::Validation)?;

        let email = input.email.trim().to_string();
        let fiscal_code = input.fiscal_code.trim().to_uppercase();
        let license = input
            .nautical_license
            .as_deref()
            .map(str::trim)
            .filter(|l| !l.is_empty());

        let mut tx = self.pool.begin().await?;

        let email_taken: Option<i64> =
            sqlx::query_scalar("SELECT IDUtente FROM Utente WHERE Email = ?1")
                .bind(&email)
                .fetch_optional(&mut *tx)
                .await?;
        if email_taken.is_some() {
            return Err(CoreError::EmailAlreadyRegistered.into());
        }

        let cf_taken: Option<i64> = sqlx::query_scalar("SELECT IDUtente FROM Utente WHERE CF = ?1")
            .bind(&fiscal_code)
            .fetch_optional(&mut *tx)
            .await?;
        if cf_taken.is_some() {
            return Err(CoreError::FiscalCodeAlreadyRegistered.into());
        }

        let address = &input.address;
        let address_id = sqlx::query(
            r#"
            INSERT INTO Indirizzo (Via, N_Civico, CAP, Citta, Provincia, Paese)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
        )
        .bind(address.street.trim())
        .bind(address.house_number.trim())
        .bind(address.postal_code.trim())
        .bind(address.city.trim())
        .bind(address.province.trim().to_uppercase())
        .bind(address.country.as_deref().unwrap_or("IT"))
        .execute(&mut *tx)
        .await?
        .last_insert_rowid();

        let password_hash = hash_password(&input.password)?;
        let now = Utc::now();

        let user_id = sqlx::query(
            r#"
            INSERT INTO Utente
                (Nome, Cognome, CF, Email, PasswordHash, Numero_Patente_Nautica,
                 IDIndirizzo, Is_Admin, Attivo, Data_Registrazione)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
            "#,
        )
        .bind(input.first_name.trim())
        .bind(input.last_name.trim())
        .bind(&fiscal_code)
        .bind(&email)
        .bind(&password_hash)
        .bind(license)
        .bind(address_id)
        .bind(false)
        .bind(true)
        .bind(now)
        .execute(&mut *tx)
        .await?
        .last_insert_rowid();

        tx.commit().await?;

        debug!(id = user_id, "user registered");

        self.get(user_id)
            .await?
            .ok_or_else(|| DbError::Internal("registered user not readable".to_string()))
    }

    /// Authenticates a user by email and password.
    ///
    /// ## Returns
    /// * `Ok(Some(user))` - credentials valid; the last-access timestamp is
    ///   bumped before the user is returned
    /// * `Ok(None)` - unknown email, wrong password or inactive account.
    ///   Deliberately indistinguishable so probing reveals nothing.
    pub async fn authenticate(&self, email: &str, password: &str) -> DbResult<Option<User>> {
        let email = email.trim();
        if email.is_empty() || password.is_empty() {
            return Ok(None);
        }

        let row: Option<AuthRow> = sqlx::query_as(
            r#"
            SELECT IDUtente AS id, PasswordHash AS password_hash
            FROM Utente
            WHERE Email = ?1 AND Attivo = 1
            LIMIT 1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        if !verify_password(password, &row.password_hash) {
            return Ok(None);
        }

        sqlx::query("UPDATE Utente SET Data_Ultimo_Accesso = datetime('now') WHERE IDUtente = ?1")
            .bind(row.id)
            .execute(&self.pool)
            .await?;

        debug!(id = row.id, "user authenticated");

        self.get(row.id).await
    }

    /// Gets a user by ID. The password hash is never selected.
    pub async fn get(&self, id: i64) -> DbResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT
                IDUtente               AS id,
                Nome                   AS first_name,
                Cognome                AS last_name,
                CF                     AS fiscal_code,
                Email                  AS email,
                Numero_Patente_Nautica AS nautical_license,
                IDIndirizzo            AS address_id,
                Is_Admin               AS is_admin,
                Attivo                 AS is_active,
                Data_Registrazione     AS registered_at,
                Data_Ultimo_Accesso    AS last_access
            FROM Utente
            WHERE IDUtente = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    /// Gets a user by email.
    pub async fn get_by_email(&self, email: &str) -> DbResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT
                IDUtente               AS id,
                Nome                   AS first_name,
                Cognome                AS last_name,
                CF                     AS fiscal_code,
                Email                  AS email,
                Numero_Patente_Nautica AS nautical_license,
                IDIndirizzo            AS address_id,
                Is_Admin               AS is_admin,
                Attivo                 AS is_active,
                Data_Registrazione     AS registered_at,
                Data_Ultimo_Accesso    AS last_access
            FROM Utente
            WHERE Email = ?1
            "#,
        )
        .bind(email.trim())
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    /// Gets the address owned by a user record.
    pub async fn get_address(&self, address_id: i64) -> DbResult<Option<Address>> {
        let address = sqlx::query_as::<_, Address>(
            r#"
            SELECT
                IDIndirizzo AS id,
                Via         AS street,
                N_Civico    AS house_number,
                CAP         AS postal_code,
                Citta       AS city,
                Provincia   AS province,
                Paese       AS country
            FROM Indirizzo
            WHERE IDIndirizzo = ?1
            "#,
        )
        .bind(address_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(address)
    }

    /// Updates the editable profile fields of a user.
    ///
    /// `None` fields are left unchanged (COALESCE in SQL, no dynamic query
    /// assembly). Provided fields are validated first, all together.
    pub async fn update_profile(&self, id: i64, update: &UserUpdate) -> DbResult<()> {
        let mut failures = Vec::new();

        if let Some(first_name) = &update.first_name {
            if let Err(f) = validate_person_name("first name", first_name) {
                failures.push(f);
            }
        }
        if let Some(last_name) = &update.last_name {
            if let Err(f) = validate_person_name("last name", last_name) {
                failures.push(f);
            }
        }
        if let Some(email) = &update.email {
            if let Err(f) = validate_email(email) {
                failures.push(f);
            }
        }
        if let Err(f) = validate_nautical_license(update.nautical_license.as_deref()) {
            failures.push(f);
        }

        if !failures.is_empty() {
            return Err(CoreError::Validation(ValidationFailures(failures)).into());
        }

        let result = sqlx::query(
            r#"
            UPDATE Utente SET
                Nome                   = COALESCE(?2, Nome),
                Cognome                = COALESCE(?3, Cognome),
                Email                  = COALESCE(?4, Email),
                Numero_Patente_Nautica = COALESCE(?5, Numero_Patente_Nautica)
            WHERE IDUtente = ?1
            "#,
        )
        .bind(id)
        .bind(update.first_name.as_deref().map(str::trim))
        .bind(update.last_name.as_deref().map(str::trim))
        .bind(update.email.as_deref().map(str::trim))
        .bind(update.nautical_license.as_deref().map(str::trim))
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Utente", id));
        }

        Ok(())
    }
}

// =============================================================================
// Password Hashing
// =============================================================================

/// Hashes a password for storage (argon2, PHC string format).
pub fn hash_password(password: &str) -> DbResult<String> {
    use argon2::{
        password_hash::{rand_core::OsRng, SaltString},
        Argon2, PasswordHasher,
    };

    let salt = SaltString::generate(&mut OsRng);

    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| DbError::Internal(format!("failed to hash password: {e}")))?;

    Ok(hash.to_string())
}

/// Verifies a password against its stored hash.
pub fn verify_password(password: &str, hash: &str) -> bool {
    use argon2::{Argon2, PasswordHash, PasswordVerifier};

    let parsed_hash = match PasswordHash::new(hash) {
        Ok(h) => h,
        Err(_) => return false,
    };

    Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok()
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use sailup_core::NewAddress;

    async fn test_db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    fn registration(email: &str, fiscal_code: &str) -> RegistrationInput {
        RegistrationInput {
            first_name: "Gianni".to_string(),
            last_name: "Esposito".to_string(),
            fiscal_code: fiscal_code.to_string(),
            email: email.to_string(),
            password: "Passw0rd!".to_string(),
            nautical_license: Some("1234567".to_string()),
            address: NewAddress {
                street: "Via Caracciolo 12".to_string(),
                house_number: "12".to_string(),
                postal_code: "80122".to_string(),
                city: "Napoli".to_string(),
                province: "NA".to_string(),
                country: None,
            },
        }
    }

    #[tokio::test]
    async fn test_register_and_authenticate() {
        let db = test_db().await;
        let users = db.users();
        let policy = ValidationPolicy::default();

        let user = users
            .register(&registration("gianni@example.com", "RSSMRA85T10A562S"), &policy)
            .await
            .unwrap();

        assert_eq!(user.email, "gianni@example.com");
        assert_eq!(user.fiscal_code, "RSSMRA85T10A562S");
        assert!(!user.is_admin);
        assert!(user.is_active);
        assert!(user.last_access.is_none());

        // The address was created in the same transaction
        let address = users.get_address(user.address_id).await.unwrap().unwrap();
        assert_eq!(address.city, "Napoli");
        assert_eq!(address.country, "IT");

        // Successful login bumps last access
        let logged_in = users
            .authenticate("gianni@example.com", "Passw0rd!")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(logged_in.id, user.id);
        assert!(logged_in.last_access.is_some());
    }

    #[tokio::test]
    async fn test_authenticate_rejects_bad_credentials() {
        let db = test_db().await;
        let users = db.users();
        let policy = ValidationPolicy::default();

        users
            .register(&registration("gianni@example.com", "RSSMRA85T10A562S"), &policy)
            .await
            .unwrap();

        assert!(users
            .authenticate("gianni@example.com", "WrongPass1!")
            .await
            .unwrap()
            .is_none());
        assert!(users
            .authenticate("nobody@example.com", "Passw0rd!")
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_inactive_user_cannot_authenticate() {
        let db = test_db().await;
        let users = db.users();
        let policy = ValidationPolicy::default();

        let user = users
            .register(&registration("gianni@example.com", "RSSMRA85T10A562S"), &policy)
            .await
            .unwrap();

        sqlx::query("UPDATE Utente SET Attivo = 0 WHERE IDUtente = ?1")
            .bind(user.id)
            .execute(db.pool())
            .await
            .unwrap();

        assert!(users
            .authenticate("gianni@example.com", "Passw0rd!")
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_duplicate_email_is_a_conflict() {
        let db = test_db().await;
        let users = db.users();
        let policy = ValidationPolicy::default();

        users
            .register(&registration("gianni@example.com", "RSSMRA85T10A562S"), &policy)
            .await
            .unwrap();

        // Same email, different fiscal code
        let err = users
            .register(&registration("gianni@example.com", "MRARSS90A01H501V"), &policy)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            DbError::Domain(CoreError::EmailAlreadyRegistered)
        ));
        assert_eq!(err.user_message(), "email already registered");

        // Different email, same fiscal code
        let err = users
            .register(&registration("other@example.com", "RSSMRA85T10A562S"), &policy)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            DbError::Domain(CoreError::FiscalCodeAlreadyRegistered)
        ));
    }

    #[tokio::test]
    async fn test_register_collects_every_validation_failure() {
        let db = test_db().await;
        let users = db.users();

        let mut input = registration("not-an-email", "RSSMRA85T10A562S");
        input.password = "short".to_string();

        let err = users
            .register(&input, &ValidationPolicy::default())
            .await
            .unwrap_err();

        match err {
            DbError::Domain(CoreError::Validation(failures)) => {
                assert_eq!(failures.len(), 2);
            }
            other => panic!("expected validation failure, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_update_profile() {
        let db = test_db().await;
        let users = db.users();
        let policy = ValidationPolicy::default();

        let user = users
            .register(&registration("gianni@example.com", "RSSMRA85T10A562S"), &policy)
            .await
            .unwrap();

        users
            .update_profile(
                user.id,
                &UserUpdate {
                    last_name: Some("Russo".to_string()),
                    ..UserUpdate::default()
                },
            )
            .await
            .unwrap();

        let updated = users.get(user.id).await.unwrap().unwrap();
        assert_eq!(updated.last_name, "Russo");
        assert_eq!(updated.first_name, "Gianni"); // untouched

        let err = users
            .update_profile(9999, &UserUpdate::default())
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));
    }

    #[test]
    fn test_password_hash_roundtrip() {
        let hash = hash_password("Passw0rd!").unwrap();
        assert!(hash.starts_with("$argon2"));
        assert!(verify_password("Passw0rd!", &hash));
        assert!(!verify_password("Passw0rd?", &hash));
        assert!(!verify_password("Passw0rd!", "not-a-phc-string"));
    }
}
