use std::fmt;

use serde::Serialize;

/// Symbols that count towards a strong password.
pub const STRONG_SYMBOLS: &[char] = &['!', '@', '#', '$', '%', '^', '&', '*'];

pub const MIN_LENGTH: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PasswordStrength {
    Weak,
    Moderate,
    Strong,
}

impl fmt::Display for PasswordStrength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            PasswordStrength::Weak => "Weak",
            PasswordStrength::Moderate => "Moderate",
            PasswordStrength::Strong => "Strong",
        })
    }
}

/// Classifies a password in a single pass without allocating.
///
/// - Strong: ≥ 8 characters, an uppercase letter, a digit and one of [`STRONG_SYMBOLS`]
/// - Moderate: ≥ 8 characters, an uppercase letter and a digit
/// - Weak: anything else
pub fn classify(password: &str) -> PasswordStrength {
    let mut length = 0usize;
    let mut has_upper = false;
    let mut has_digit = false;
    let mut has_symbol = false;

    for c in password.chars() {
        length += 1;
        has_upper |= c.is_uppercase();
        has_digit |= c.is_ascii_digit();
        has_symbol |= STRONG_SYMBOLS.contains(&c);
    }

    if length < MIN_LENGTH || !has_upper || !has_digit {
        PasswordStrength::Weak
    } else if has_symbol {
        PasswordStrength::Strong
    } else {
        PasswordStrength::Moderate
    }
}
