//! # Product Repository
//!
//! Database operations for products and their translations.
//!
//! ## Transactional Create
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  create(product, translations)                                          │
//! │                                                                         │
//! │  BEGIN TRANSACTION                                                     │
//! │     │                                                                   │
//! │     ├── INSERT Prodotto                                                │
//! │     │                                                                   │
//! │     ├── for each translation:                                          │
//! │     │      ├── look up language id   ── missing? ─► ROLLBACK, error    │
//! │     │      └── INSERT Prodotto_Traduzione ── fails? ─► ROLLBACK        │
//! │     │                                                                   │
//! │  COMMIT  (only after every row succeeded)                              │
//! │                                                                         │
//! │  A failed 2nd translation leaves ZERO product and translation rows.    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use sailup_core::validation::validate_new_product;
use sailup_core::{
    CoreError, LocalizedProduct, NewProduct, NewTranslation, Product, ProductType,
    ProductWithTranslations, Translation,
};

/// Search filters for the product catalog.
///
/// `None` fields do not filter; every filter is a bound parameter, never a
/// spliced string.
#[derive(Debug, Clone, Default)]
pub struct ProductFilter {
    pub product_type: Option<ProductType>,
    pub max_price_cents: Option<i64>,
    pub min_seats: Option<i64>,
    pub accessible_only: bool,
}

/// Repository for product database operations.
#[derive(Debug, Clone)]
pub struct ProductRepository {
    pool: SqlitePool,
}

impl ProductRepository {
    /// Creates a new ProductRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ProductRepository { pool }
    }

    /// Creates a product with its translations in a single transaction.
    ///
    /// ## Errors
    /// * `Domain(Validation(_))` - bad code / price / seats, collected
    /// * `Domain(LanguageNotFound)` - a translation names an unknown language
    ///   code; nothing is persisted
    /// * `UniqueViolation` - duplicate product code
    pub async fn create(
        &self,
        product: &NewProduct,
        translations: &[NewTranslation],
    ) -> DbResult<()> {
        validate_new_product(product).map_err(CoreError::Validation)?;

        let code = product.code.trim();
        let now = Utc::now();

        debug!(code = %code, translations = translations.len(), "creating product");

        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO Prodotto
                (IDProdotto, Tipo_Prodotto, Prezzo_Base, Posti_Totali,
                 Accessibile_Disabili, Lunghezza_Barca_Metri, Richiede_Patente,
                 Attivo, Data_Creazione)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
            "#,
        )
        .bind(code)
        .bind(product.product_type)
        .bind(product.base_price_cents)
        .bind(product.total_seats)
        .bind(product.accessible)
        .bind(product.boat_length_m)
        .bind(product.license_required)
        .bind(true)
        .bind(now)
        .execute(&mut *tx)
        .await?;

        for translation in translations {
            let language_code = translation.language_code.trim();

            let language_id: Option<i64> =
                sqlx::query_scalar("SELECT IDLingua FROM Lingua WHERE Codice_Lingua = ?1")
                    .bind(language_code)
                    .fetch_optional(&mut *tx)
                    .await?;

            // Dropping the transaction on this early return rolls back the
            // product row and any translations inserted so far.
            let Some(language_id) = language_id else {
                return Err(CoreError::LanguageNotFound(language_code.to_string()).into());
            };

            sqlx::query(
                r#"
                INSERT INTO Prodotto_Traduzione
                    (IDProdotto, IDLingua, Nome_Prodotto, Descrizione, Specifiche)
                VALUES (?1, ?2, ?3, ?4, ?5)
                "#,
            )
            .bind(code)
            .bind(language_id)
            .bind(&translation.name)
            .bind(&translation.description)
            .bind(&translation.specs)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        debug!(code = %code, "product created");
        Ok(())
    }

    /// Gets an active product with all of its translations.
    pub async fn get(&self, code: &str) -> DbResult<Option<ProductWithTranslations>> {
        let product = sqlx::query_as::<_, Product>(
            r#"
            SELECT
                IDProdotto            AS code,
                Tipo_Prodotto         AS product_type,
                Prezzo_Base           AS base_price_cents,
                Posti_Totali          AS total_seats,
                Accessibile_Disabili  AS accessible,
                Lunghezza_Barca_Metri AS boat_length_m,
                Richiede_Patente      AS license_required,
                Attivo                AS is_active,
                Data_Creazione        AS created_at
            FROM Prodotto
            WHERE IDProdotto = ?1 AND Attivo = 1
            "#,
        )
        .bind(code)
        .fetch_optional(&self.pool)
        .await?;

        let Some(product) = product else {
            return Ok(None);
        };

        let translations = sqlx::query_as::<_, Translation>(
            r#"
            SELECT
                l.Codice_Lingua   AS language_code,
                pt.Nome_Prodotto  AS name,
                pt.Descrizione    AS description,
                pt.Specifiche     AS specs
            FROM Prodotto_Traduzione pt
            INNER JOIN Lingua l ON l.IDLingua = pt.IDLingua
            WHERE pt.IDProdotto = ?1
            ORDER BY l.Codice_Lingua
            "#,
        )
        .bind(code)
        .fetch_all(&self.pool)
        .await?;

        Ok(Some(ProductWithTranslations {
            product,
            translations,
        }))
    }

    /// Lists active products of one type, localized to `language`.
    ///
    /// Products without a translation in that language are still listed, with
    /// a NULL name. Newest first.
    pub async fn list_by_type(
        &self,
        product_type: ProductType,
        language: &str,
    ) -> DbResult<Vec<LocalizedProduct>> {
        let products = sqlx::query_as::<_, LocalizedProduct>(
            r#"
            SELECT
                p.IDProdotto           AS code,
                p.Tipo_Prodotto        AS product_type,
                p.Prezzo_Base          AS base_price_cents,
                p.Posti_Totali         AS total_seats,
                p.Accessibile_Disabili AS accessible,
                pt.Nome_Prodotto       AS name,
                pt.Descrizione         AS description
            FROM Prodotto p
            LEFT JOIN Lingua l ON l.Codice_Lingua = ?2
            LEFT JOIN Prodotto_Traduzione pt
                ON pt.IDProdotto = p.IDProdotto AND pt.IDLingua = l.IDLingua
            WHERE p.Tipo_Prodotto = ?1 AND p.Attivo = 1
            ORDER BY datetime(p.Data_Creazione) DESC
            "#,
        )
        .bind(product_type)
        .bind(language)
        .fetch_all(&self.pool)
        .await?;

        Ok(products)
    }

    /// Searches active products with optional filters, price ascending.
    ///
    /// Each absent filter collapses to `?N IS NULL`, so the statement text is
    /// constant and every value stays a bound parameter.
    pub async fn search(
        &self,
        filter: &ProductFilter,
        language: &str,
    ) -> DbResult<Vec<LocalizedProduct>> {
        let products = sqlx::query_as::<_, LocalizedProduct>(
            r#"
            SELECT
                p.IDProdotto           AS code,
                p.Tipo_Prodotto        AS product_type,
                p.Prezzo_Base          AS base_price_cents,
                p.Posti_Totali         AS total_seats,
                p.Accessibile_Disabili AS accessible,
                pt.Nome_Prodotto       AS name,
                pt.Descrizione         AS description
            FROM Prodotto p
            LEFT JOIN Lingua l ON l.Codice_Lingua = ?1
            LEFT JOIN Prodotto_Traduzione pt
                ON pt.IDProdotto = p.IDProdotto AND pt.IDLingua = l.IDLingua
            WHERE p.Attivo = 1
              AND (?2 IS NULL OR p.Tipo_Prodotto = ?2)
              AND (?3 IS NULL OR p.Prezzo_Base <= ?3)
              AND (?4 IS NULL OR p.Posti_Totali >= ?4)
              AND (?5 = 0 OR p.Accessibile_Disabili = 1)
            ORDER BY p.Prezzo_Base ASC
            LIMIT 100
            "#,
        )
        .bind(language)
        .bind(filter.product_type)
        .bind(filter.max_price_cents)
        .bind(filter.min_seats)
        .bind(filter.accessible_only)
        .fetch_all(&self.pool)
        .await?;

        Ok(products)
    }

    /// Deactivates a product (soft delete; existing bookings are untouched).
    pub async fn deactivate(&self, code: &str) -> DbResult<()> {
        let result = sqlx::query("UPDATE Prodotto SET Attivo = 0 WHERE IDProdotto = ?1")
            .bind(code)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Prodotto", code));
        }

        Ok(())
    }

    /// Counts all products (active or not).
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM Prodotto")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};

    async fn test_db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    fn rental(code: &str, price_cents: i64) -> NewProduct {
        NewProduct {
            code: code.to_string(),
            product_type: ProductType::Rental,
            base_price_cents: price_cents,
            total_seats: 6,
            accessible: false,
            boat_length_m: Some(7.5),
            license_required: false,
        }
    }

    fn translation(language: &str, name: &str) -> NewTranslation {
        NewTranslation {
            language_code: language.to_string(),
            name: name.to_string(),
            description: Some(format!("{name} description")),
            specs: None,
        }
    }

    #[tokio::test]
    async fn test_create_and_get_with_translations() {
        let db = test_db().await;
        let products = db.products();

        products
            .create(
                &rental("BARCA-01", 12000),
                &[translation("it", "Gozzo sorrentino"), translation("en", "Sorrento gozzo")],
            )
            .await
            .unwrap();

        let found = products.get("BARCA-01").await.unwrap().unwrap();
        assert_eq!(found.product.code, "BARCA-01");
        assert_eq!(found.product.base_price_cents, 12000);
        assert_eq!(found.translations.len(), 2);
        assert_eq!(found.translations[0].language_code, "en");
        assert_eq!(found.translations[1].name, "Gozzo sorrentino");
    }

    #[tokio::test]
    async fn test_unknown_language_rolls_back_everything() {
        let db = test_db().await;
        let products = db.products();

        let err = products
            .create(
                &rental("BARCA-01", 12000),
                &[translation("it", "Gozzo"), translation("xx", "???")],
            )
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            DbError::Domain(CoreError::LanguageNotFound(code)) if code == "xx"
        ));

        // The whole transaction rolled back: no product, no translations
        assert_eq!(products.count().await.unwrap(), 0);
        let orphans: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM Prodotto_Traduzione")
            .fetch_one(db.pool())
            .await
            .unwrap();
        assert_eq!(orphans, 0);
    }

    #[tokio::test]
    async fn test_duplicate_code_is_a_conflict() {
        let db = test_db().await;
        let products = db.products();

        products
            .create(&rental("BARCA-01", 12000), &[translation("it", "Gozzo")])
            .await
            .unwrap();

        let err = products
            .create(&rental("BARCA-01", 9000), &[])
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::UniqueViolation { .. }));
    }

    #[tokio::test]
    async fn test_invalid_product_input_is_collected() {
        let db = test_db().await;

        let err = db
            .products()
            .create(
                &NewProduct {
                    code: "bad code".to_string(),
                    product_type: ProductType::Experience,
                    base_price_cents: -5,
                    total_seats: 0,
                    accessible: false,
                    boat_length_m: None,
                    license_required: false,
                },
                &[],
            )
            .await
            .unwrap_err();

        match err {
            DbError::Domain(CoreError::Validation(failures)) => assert_eq!(failures.len(), 3),
            other => panic!("expected validation failure, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_list_by_type_localizes_and_orders() {
        let db = test_db().await;
        let products = db.products();

        products
            .create(&rental("BARCA-01", 12000), &[translation("it", "Gozzo")])
            .await
            .unwrap();
        products
            .create(
                &NewProduct {
                    product_type: ProductType::Experience,
                    ..rental("TOUR-01", 4500)
                },
                &[translation("it", "Tramonto in barca")],
            )
            .await
            .unwrap();

        let rentals = products.list_by_type(ProductType::Rental, "it").await.unwrap();
        assert_eq!(rentals.len(), 1);
        assert_eq!(rentals[0].name.as_deref(), Some("Gozzo"));

        // No English translation: the product still lists, without a name
        let rentals_en = products.list_by_type(ProductType::Rental, "en").await.unwrap();
        assert_eq!(rentals_en.len(), 1);
        assert!(rentals_en[0].name.is_none());
    }

    #[tokio::test]
    async fn test_search_filters() {
        let db = test_db().await;
        let products = db.products();

        products
            .create(&rental("BARCA-01", 12000), &[translation("it", "Gozzo")])
            .await
            .unwrap();
        products
            .create(
                &NewProduct {
                    accessible: true,
                    total_seats: 12,
                    ..rental("BARCA-02", 20000)
                },
                &[translation("it", "Lancia")],
            )
            .await
            .unwrap();

        // No filters: everything, cheapest first
        let all = products.search(&ProductFilter::default(), "it").await.unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].code, "BARCA-01");

        let cheap = products
            .search(
                &ProductFilter {
                    max_price_cents: Some(15000),
                    ..ProductFilter::default()
                },
                "it",
            )
            .await
            .unwrap();
        assert_eq!(cheap.len(), 1);
        assert_eq!(cheap[0].code, "BARCA-01");

        let accessible = products
            .search(
                &ProductFilter {
                    accessible_only: true,
                    min_seats: Some(10),
                    ..ProductFilter::default()
                },
                "it",
            )
            .await
            .unwrap();
        assert_eq!(accessible.len(), 1);
        assert_eq!(accessible[0].code, "BARCA-02");
    }

    #[tokio::test]
    async fn test_deactivated_product_disappears() {
        let db = test_db().await;
        let products = db.products();

        products
            .create(&rental("BARCA-01", 12000), &[translation("it", "Gozzo")])
            .await
            .unwrap();

        products.deactivate("BARCA-01").await.unwrap();

        assert!(products.get("BARCA-01").await.unwrap().is_none());
        assert!(products
            .list_by_type(ProductType::Rental, "it")
            .await
            .unwrap()
            .is_empty());

        let err = products.deactivate("MISSING").await.unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));
    }
}
