//! # Fiscal Code Checksum
//!
//! Validation of the Italian fiscal code (Codice Fiscale), the 16-character
//! alphanumeric personal identifier with an embedded check letter.
//!
//! ## How The Check Works
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Input: R S S M R A 8 5 T 1 0 A 5 6 2 S                                │
//! │         ─ ─ ─ ─ ─ ─ ─ ─ ─ ─ ─ ─ ─ ─ ─ ▲                                │
//! │         15 weighted characters         check letter                     │
//! │                                                                         │
//! │  Positions 1,3,5,… (0-indexed even) → ODD weight table                 │
//! │  Positions 2,4,6,… (0-indexed odd)  → EVEN weight table                │
//! │                                                                         │
//! │  sum = Σ weights        expected = 'A' + (sum mod 26)                  │
//! │  valid ⇔ expected == 16th character                                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Both tables map the 36 characters '0'-'9','A'-'Z' to fixed integer
//! weights published by the Agenzia delle Entrate. The function is pure and
//! total: any input yields true or false, never a panic.

/// Number of characters in a fiscal code.
pub const FISCAL_CODE_LEN: usize = 16;

/// Weights for characters in odd positions (1st, 3rd, ...; 0-indexed even).
///
/// Indexed by `char_index`: 0-9 for digits, 10-35 for 'A'-'Z'.
const ODD_WEIGHTS: [u32; 36] = [
    1, 0, 5, 7, 9, 13, 15, 17, 19, 21, // '0'-'9'
    1, 0, 5, 7, 9, 13, 15, 17, 19, 21, // 'A'-'J'
    2, 4, 18, 20, 11, 3, 6, 8, 12, 14, // 'K'-'T'
    16, 10, 22, 25, 24, 23, // 'U'-'Z'
];

/// Weights for characters in even positions (2nd, 4th, ...; 0-indexed odd).
///
/// Digits map to their value, letters to their alphabet index.
const EVEN_WEIGHTS: [u32; 36] = [
    0, 1, 2, 3, 4, 5, 6, 7, 8, 9, // '0'-'9'
    0, 1, 2, 3, 4, 5, 6, 7, 8, 9, // 'A'-'J'
    10, 11, 12, 13, 14, 15, 16, 17, 18, 19, // 'K'-'T'
    20, 21, 22, 23, 24, 25, // 'U'-'Z'
];

/// Maps '0'-'9' to 0-9 and 'A'-'Z' to 10-35; None for anything else.
/// Input is expected to be already uppercased.
fn char_index(c: char) -> Option<usize> {
    match c {
        '0'..='9' => Some(c as usize - '0' as usize),
        'A'..='Z' => Some(c as usize - 'A' as usize + 10),
        _ => None,
    }
}

/// Computes the expected check letter for a fiscal code.
///
/// The input is normalized to uppercase. Returns `None` unless the input is
/// exactly 16 alphanumeric ASCII characters; otherwise the letter that the
/// 16th character must equal for the code to be valid.
pub fn check_char(code: &str) -> Option<char> {
    let code = code.trim().to_uppercase();

    if code.len() != FISCAL_CODE_LEN {
        return None;
    }

    let mut sum: u32 = 0;
    for (position, c) in code.chars().take(FISCAL_CODE_LEN - 1).enumerate() {
        let idx = char_index(c)?;
        sum += if position % 2 == 0 {
            ODD_WEIGHTS[idx]
        } else {
            EVEN_WEIGHTS[idx]
        };
    }

    // The last character must still be alphanumeric for the code to be
    // well-formed, even though it carries no weight.
    let last = code.chars().nth(FISCAL_CODE_LEN - 1)?;
    char_index(last)?;

    Some((b'A' + (sum % 26) as u8) as char)
}

/// Validates a fiscal code against its embedded check letter.
///
/// ## Rules
/// - Input is normalized to uppercase
/// - Must be exactly 16 alphanumeric ASCII characters
/// - The 16th character must equal the computed check letter
///
/// ## Example
/// ```rust
/// use sailup_core::fiscal_code::is_valid;
///
/// assert!(is_valid("RSSMRA85T10A562S"));
/// assert!(is_valid("rssmra85t10a562s")); // case-insensitive
/// assert!(!is_valid("RSSMRA85T10A562X")); // wrong check letter
/// assert!(!is_valid("RSSMRA85T10A562"));  // wrong length
/// ```
pub fn is_valid(code: &str) -> bool {
    let normalized = code.trim().to_uppercase();

    match check_char(&normalized) {
        Some(expected) => normalized.ends_with(expected),
        None => false,
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
