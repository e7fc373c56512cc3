//! # Validation Module
//!
//! Field validators for registration and booking forms.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Form layer (client)                                          │
//! │  ├── Immediate feedback, SAME rules via ValidationPolicy               │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE (server, authoritative)                          │
//! │  ├── Every field checked independently                                 │
//! │  └── Failures COLLECTED into one list, never short-circuited           │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Database (SQLite)                                            │
//! │  ├── NOT NULL / UNIQUE / CHECK constraints as backstop                 │
//! │                                                                         │
//! │  Defense in depth: multiple layers catch different errors              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The historical client and server rule sets had drifted apart (the client
//! demanded mixed-case passwords, the server a special character). The rules
//! now live in ONE place, [`ValidationPolicy`]; both layers consume the same
//! value. The mixed-case requirement survives as an opt-in knob.

use crate::error::{ValidationError, ValidationFailures};
use crate::types::RegistrationInput;
use crate::{fiscal_code, MAX_ADDRESS_LINE_LEN, MAX_EMAIL_LEN, MIN_PASSWORD_LEN};

/// Result type for single-field validation.
pub type ValidationResult = Result<(), ValidationError>;

// =============================================================================
// Policy
// =============================================================================

/// Password strength requirements.
///
/// The default matches the authoritative server rule: at least 8 characters
/// with a letter, a digit and a non-alphanumeric character.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PasswordPolicy {
    pub min_length: usize,
    pub require_letter: bool,
    pub require_digit: bool,
    pub require_special: bool,
    /// Requires both an uppercase and a lowercase letter. Off by default;
    /// enable for the stricter profile the registration form used to apply.
    pub require_mixed_case: bool,
}

impl Default for PasswordPolicy {
    fn default() -> Self {
        PasswordPolicy {
            min_length: MIN_PASSWORD_LEN,
            require_letter: true,
            require_digit: true,
            require_special: true,
            require_mixed_case: false,
        }
    }
}

/// The single source of truth for form validation rules.
///
/// Constructed once per deployment and handed to every layer that validates
/// input, so client and server can never disagree again.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationPolicy {
    pub password: PasswordPolicy,
}

// =============================================================================
// String Validators
// =============================================================================

/// Validates an email address.
///
/// ## Rules
/// - Non-empty after trimming, at most 254 characters
/// - Exactly one `@` with a non-empty local part
/// - Domain contains an interior dot (`local@domain.tld`)
/// - No whitespace anywhere
///
/// ## Example
/// ```rust
/// use sailup_core::validation::validate_email;
///
/// assert!(validate_email("gianni@example.com").is_ok());
/// assert!(validate_email("gianni@com").is_err());
/// assert!(validate_email("@example.com").is_err());
/// ```
pub fn validate_email(email: &str) -> ValidationResult {
    let email = email.trim();

    if email.is_empty() {
        return Err(ValidationError::Required { field: "email" });
    }

    if email.len() > MAX_EMAIL_LEN {
        return Err(ValidationError::TooLong {
            field: "email",
            max: MAX_EMAIL_LEN,
        });
    }

    if email.chars().any(char::is_whitespace) {
        return Err(ValidationError::InvalidFormat {
            field: "email",
            reason: "must not contain whitespace",
        });
    }

    let Some((local, domain)) = email.split_once('@') else {
        return Err(ValidationError::InvalidFormat {
            field: "email",
            reason: "must contain an @ symbol",
        });
    };

    if local.is_empty() || domain.contains('@') {
        return Err(ValidationError::InvalidFormat {
            field: "email",
            reason: "must have the form local@domain.tld",
        });
    }

    // The domain needs an interior dot: "a.b" is fine, ".b" and "a." are not.
    if !domain.contains('.') || domain.starts_with('.') || domain.ends_with('.') {
        return Err(ValidationError::InvalidFormat {
            field: "email",
            reason: "domain must contain a dot",
        });
    }

    Ok(())
}

/// Validates a password against a [`PasswordPolicy`].
///
/// ## Example
/// ```rust
/// use sailup_core::validation::{validate_password, PasswordPolicy};
///
/// let policy = PasswordPolicy::default();
/// assert!(validate_password("Passw0rd!", &policy).is_ok());
/// assert!(validate_password("password", &policy).is_err()); // no digit
/// assert!(validate_password("PASS123", &policy).is_err());  // too short
/// ```
pub fn validate_password(password: &str, policy: &PasswordPolicy) -> ValidationResult {
    if password.is_empty() {
        return Err(ValidationError::Required { field: "password" });
    }

    if password.chars().count() < policy.min_length {
        return Err(ValidationError::TooShort {
            field: "password",
            min: policy.min_length,
        });
    }

    if policy.require_letter && !password.chars().any(char::is_alphabetic) {
        return Err(ValidationError::InvalidFormat {
            field: "password",
            reason: "must contain at least one letter",
        });
    }

    if policy.require_digit && !password.chars().any(|c| c.is_ascii_digit()) {
        return Err(ValidationError::InvalidFormat {
            field: "password",
            reason: "must contain at least one digit",
        });
    }

    if policy.require_special && password.chars().all(char::is_alphanumeric) {
        return Err(ValidationError::InvalidFormat {
            field: "password",
            reason: "must contain at least one special character",
        });
    }

    if policy.require_mixed_case
        && !(password.chars().any(char::is_uppercase) && password.chars().any(char::is_lowercase))
    {
        return Err(ValidationError::InvalidFormat {
            field: "password",
            reason: "must contain both uppercase and lowercase letters",
        });
    }

    Ok(())
}

/// Validates a person name (first or last).
///
/// ## Rules
/// - At least 2 characters after trimming
/// - Letters (extended Latin included), spaces, apostrophes and hyphens
pub fn validate_person_name(field: &'static str, value: &str) -> ValidationResult {
    let value = value.trim();

    if value.is_empty() {
        return Err(ValidationError::Required { field });
    }

    if value.chars().count() < 2 {
        return Err(ValidationError::TooShort { field, min: 2 });
    }

    if !value
        .chars()
        .all(|c| c.is_alphabetic() || c == ' ' || c == '\'' || c == '-')
    {
        return Err(ValidationError::InvalidFormat {
            field,
            reason: "must contain only letters, spaces, apostrophes and hyphens",
        });
    }

    Ok(())
}

/// Validates a fiscal code: shape first, then the embedded checksum.
pub fn validate_fiscal_code(code: &str) -> ValidationResult {
    let code = code.trim();

    if code.is_empty() {
        return Err(ValidationError::Required {
            field: "fiscal code",
        });
    }

    let normalized = code.to_uppercase();
    if normalized.chars().count() != fiscal_code::FISCAL_CODE_LEN
        || !normalized.chars().all(|c| c.is_ascii_alphanumeric())
    {
        return Err(ValidationError::InvalidFormat {
            field: "fiscal code",
            reason: "must be 16 alphanumeric characters",
        });
    }

    if !fiscal_code::is_valid(&normalized) {
        return Err(ValidationError::InvalidFormat {
            field: "fiscal code",
            reason: "checksum mismatch",
        });
    }

    Ok(())
}

/// Validates an optional nautical licence number.
///
/// ## Rules
/// - None or empty is valid (the field is optional)
/// - Otherwise 5 to 10 ASCII digits
pub fn validate_nautical_license(license: Option<&str>) -> ValidationResult {
    let Some(license) = license else {
        return Ok(());
    };

    let license = license.trim();
    if license.is_empty() {
        return Ok(());
    }

    let digits_only = license.chars().all(|c| c.is_ascii_digit());
    if !digits_only || license.len() < 5 || license.len() > 10 {
        return Err(ValidationError::InvalidFormat {
            field: "nautical license",
            reason: "must be 5 to 10 digits",
        });
    }

    Ok(())
}

/// Validates a free-text address line (street, house number).
///
/// ## Rules
/// - Non-empty after trimming, at most 30 characters
/// - Letters, digits, spaces and `, . - /` only; markup characters such as
///   `<` or `;` are rejected outright
pub fn validate_address_line(field: &'static str, value: &str) -> ValidationResult {
    let value = value.trim();

    if value.is_empty() {
        return Err(ValidationError::Required { field });
    }

    if value.chars().count() > MAX_ADDRESS_LINE_LEN {
        return Err(ValidationError::TooLong {
            field,
            max: MAX_ADDRESS_LINE_LEN,
        });
    }

    if !value
        .chars()
        .all(|c| c.is_alphanumeric() || matches!(c, ' ' | ',' | '.' | '-' | '/'))
    {
        return Err(ValidationError::InvalidFormat {
            field,
            reason: "must contain only letters, digits, spaces and , . - /",
        });
    }

    Ok(())
}

/// Validates an Italian postal code (CAP): exactly 5 digits.
pub fn validate_postal_code(cap: &str) -> ValidationResult {
    let cap = cap.trim();

    if cap.is_empty() {
        return Err(ValidationError::Required {
            field: "postal code",
        });
    }

    if cap.len() != 5 || !cap.chars().all(|c| c.is_ascii_digit()) {
        return Err(ValidationError::InvalidFormat {
            field: "postal code",
            reason: "must be 5 digits",
        });
    }

    Ok(())
}

/// Validates a province code: exactly 2 letters (e.g. `NA`).
pub fn validate_province(province: &str) -> ValidationResult {
    let province = province.trim();

    if province.is_empty() {
        return Err(ValidationError::Required { field: "province" });
    }

    if province.len() != 2 || !province.chars().all(|c| c.is_ascii_alphabetic()) {
        return Err(ValidationError::InvalidFormat {
            field: "province",
            reason: "must be 2 letters",
        });
    }

    Ok(())
}

/// Validates a city name.
pub fn validate_city(city: &str) -> ValidationResult {
    let city = city.trim();

    if city.is_empty() {
        return Err(ValidationError::Required { field: "city" });
    }

    if !city
        .chars()
        .all(|c| c.is_alphabetic() || c == ' ' || c == '\'' || c == '-')
    {
        return Err(ValidationError::InvalidFormat {
            field: "city",
            reason: "must contain only letters, spaces, apostrophes and hyphens",
        });
    }

    Ok(())
}

// =============================================================================
// Product Validators
// =============================================================================

/// Validates a product code (business identifier, e.g. `BARCA-01`).
///
/// ## Rules
/// - Must not be empty
/// - Must be between 1 and 50 characters
/// - Only alphanumeric characters, hyphens, underscores
pub fn validate_product_code(code: &str) -> ValidationResult {
    let code = code.trim();

    if code.is_empty() {
        return Err(ValidationError::Required {
            field: "product code",
        });
    }

    if code.len() > 50 {
        return Err(ValidationError::TooLong {
            field: "product code",
            max: 50,
        });
    }

    if !code
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        return Err(ValidationError::InvalidFormat {
            field: "product code",
            reason: "must contain only letters, numbers, hyphens and underscores",
        });
    }

    Ok(())
}

/// Validates a price in cents.
///
/// ## Rules
/// - Must be non-negative (zero is allowed, e.g. promotional experiences)
pub fn validate_price_cents(field: &'static str, cents: i64) -> ValidationResult {
    if cents < 0 {
        return Err(ValidationError::OutOfRange {
            field,
            min: 0,
            max: i64::MAX,
        });
    }

    Ok(())
}

/// Validates a seat count: must be positive.
pub fn validate_seats(seats: i64) -> ValidationResult {
    if seats <= 0 {
        return Err(ValidationError::MustBePositive { field: "seats" });
    }

    Ok(())
}

/// Validates a product creation request, collecting every failure.
pub fn validate_new_product(
    input: &crate::types::NewProduct,
) -> Result<(), ValidationFailures> {
    let mut failures = Vec::new();

    let checks = [
        validate_product_code(&input.code),
        validate_price_cents("base price", input.base_price_cents),
        validate_seats(input.total_seats),
    ];

    for check in checks {
        if let Err(failure) = check {
            failures.push(failure);
        }
    }

    if failures.is_empty() {
        Ok(())
    } else {
        Err(ValidationFailures(failures))
    }
}

// =============================================================================
// Form Validation
// =============================================================================

/// Validates a whole registration form.
///
/// Every field is checked independently and ALL failures are returned, so the
/// caller can present one complete correction list instead of replaying the
/// form once per error.
pub fn validate_registration(
    input: &RegistrationInput,
    policy: &ValidationPolicy,
) -> Result<(), ValidationFailures> {
    let mut failures = Vec::new();

    let checks = [
        validate_person_name("first name", &input.first_name),
        validate_person_name("last name", &input.last_name),
        validate_fiscal_code(&input.fiscal_code),
        validate_email(&input.email),
        validate_password(&input.password, &policy.password),
        validate_nautical_license(input.nautical_license.as_deref()),
        validate_address_line("street", &input.address.street),
        validate_address_line("house number", &input.address.house_number),
        validate_postal_code(&input.address.postal_code),
        validate_city(&input.address.city),
        validate_province(&input.address.province),
    ];

    for check in checks {
        if let Err(failure) = check {
            failures.push(failure);
        }
    }

    if failures.is_empty() {
        Ok(())
    } else {
        Err(ValidationFailures(failures))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::NewAddress;

    fn valid_input() -> RegistrationInput {
        RegistrationInput {
            first_name: "Gianni".to_string(),
            last_name: "Esposito".to_string(),
            fiscal_code: "RSSMRA85T10A562S".to_string(),
            email: "gianni@example.com".to_string(),
            password: "Passw0rd!".to_string(),
            nautical_license: Some("1234567".to_string()),
            address: NewAddress {
                street: "Via Caracciolo 12".to_string(),
                house_number: "12/B".to_string(),
                postal_code: "80122".to_string(),
                city: "Napoli".to_string(),
                province: "NA".to_string(),
                country: None,
            },
        }
    }

    #[test]
    fn test_validate_email() {
        assert!(validate_email("gianni@example.com").is_ok());
        assert!(validate_email("g.esposito+boat@mare.co.uk").is_ok());

        assert!(validate_email("").is_err());
        assert!(validate_email("no-at-symbol").is_err());
        assert!(validate_email("@example.com").is_err());
        assert!(validate_email("gianni@").is_err());
        assert!(validate_email("gianni@com").is_err());
        assert!(validate_email("gia nni@example.com").is_err());
        assert!(validate_email("a@b@example.com").is_err());
    }

    #[test]
    fn test_validate_password_default_policy() {
        let policy = PasswordPolicy::default();

        assert!(validate_password("Passw0rd!", &policy).is_ok());
        assert!(validate_password("mare-blu-42", &policy).is_ok());

        // No digit, no special character
        assert!(validate_password("password", &policy).is_err());
        // Too short (and no special character either)
        assert!(validate_password("PASS123", &policy).is_err());
        // No special character
        assert!(validate_password("Passw0rd", &policy).is_err());
        assert!(validate_password("", &policy).is_err());
    }

    #[test]
    fn test_validate_password_mixed_case_knob() {
        let policy = PasswordPolicy {
            require_mixed_case: true,
            ..PasswordPolicy::default()
        };

        assert!(validate_password("Passw0rd!", &policy).is_ok());
        assert!(validate_password("passw0rd!", &policy).is_err());
        assert!(validate_password("PASSW0RD!", &policy).is_err());
    }

    #[test]
    fn test_validate_person_name() {
        assert!(validate_person_name("first name", "Gianni").is_ok());
        assert!(validate_person_name("first name", "Maria Grazia").is_ok());
        assert!(validate_person_name("last name", "D'Angelo").is_ok());
        assert!(validate_person_name("last name", "Rossi-Bianchi").is_ok());
        assert!(validate_person_name("first name", "Chloé").is_ok());

        assert!(validate_person_name("first name", "").is_err());
        assert!(validate_person_name("first name", "  ").is_err());
        assert!(validate_person_name("first name", "G").is_err());
        assert!(validate_person_name("first name", "Mario5").is_err());
    }

    #[test]
    fn test_validate_fiscal_code() {
        assert!(validate_fiscal_code("RSSMRA85T10A562S").is_ok());
        assert!(validate_fiscal_code("rssmra85t10a562s").is_ok());

        assert!(validate_fiscal_code("").is_err());
        assert!(validate_fiscal_code("RSSMRA85T10A562").is_err());
        // Well-formed but failing the checksum
        let err = validate_fiscal_code("RSSMRA85T10A562X").unwrap_err();
        assert!(matches!(
            err,
            ValidationError::InvalidFormat {
                reason: "checksum mismatch",
                ..
            }
        ));
    }

    #[test]
    fn test_validate_nautical_license() {
        assert!(validate_nautical_license(None).is_ok());
        assert!(validate_nautical_license(Some("")).is_ok());
        assert!(validate_nautical_license(Some("12345")).is_ok());
        assert!(validate_nautical_license(Some("1234567890")).is_ok());

        assert!(validate_nautical_license(Some("1234")).is_err());
        assert!(validate_nautical_license(Some("12345678901")).is_err());
        assert!(validate_nautical_license(Some("abcde")).is_err());
    }

    #[test]
    fn test_validate_address_line() {
        assert!(validate_address_line("street", "Via Caracciolo 12").is_ok());
        assert!(validate_address_line("street", "C.so Umberto I, 5/a").is_ok());

        assert!(validate_address_line("street", "").is_err());
        assert!(validate_address_line("street", &"a".repeat(31)).is_err());
        assert!(validate_address_line("street", "Via <script>").is_err());
        assert!(validate_address_line("street", "Via Roma; DROP").is_err());
    }

    #[test]
    fn test_validate_postal_code_and_province() {
        assert!(validate_postal_code("80122").is_ok());
        assert!(validate_postal_code("8012").is_err());
        assert!(validate_postal_code("8012a").is_err());

        assert!(validate_province("NA").is_ok());
        assert!(validate_province("na").is_ok());
        assert!(validate_province("N").is_err());
        assert!(validate_province("NAP").is_err());
        assert!(validate_province("N1").is_err());
    }

    #[test]
    fn test_validate_registration_collects_every_failure() {
        let mut input = valid_input();
        input.email = "not-an-email".to_string();
        input.password = "short".to_string();
        input.address.postal_code = "12".to_string();

        let failures = validate_registration(&input, &ValidationPolicy::default()).unwrap_err();

        let fields: Vec<_> = failures.iter().map(|f| f.field()).collect();
        assert_eq!(fields, vec!["email", "password", "postal code"]);
    }

    #[test]
    fn test_validate_registration_accepts_valid_input() {
        assert!(validate_registration(&valid_input(), &ValidationPolicy::default()).is_ok());
    }

    #[test]
    fn test_validate_product_code() {
        assert!(validate_product_code("BARCA-01").is_ok());
        assert!(validate_product_code("sunset_tour").is_ok());

        assert!(validate_product_code("").is_err());
        assert!(validate_product_code("has space").is_err());
        assert!(validate_product_code(&"A".repeat(60)).is_err());
    }

    #[test]
    fn test_validate_new_product() {
        use crate::types::{NewProduct, ProductType};

        let input = NewProduct {
            code: "BARCA-01".to_string(),
            product_type: ProductType::Rental,
            base_price_cents: 12000,
            total_seats: 6,
            accessible: false,
            boat_length_m: Some(7.5),
            license_required: true,
        };
        assert!(validate_new_product(&input).is_ok());

        let bad = NewProduct {
            code: String::new(),
            base_price_cents: -1,
            total_seats: 0,
            ..input
        };
        let failures = validate_new_product(&bad).unwrap_err();
        assert_eq!(failures.len(), 3);
    }
}
