//! Phone number validation and masking helpers.

use once_cell::sync::Lazy;
use regex::Regex;

/// E.164 format: leading '+', country code starting 1-9, up to 15 digits total.
static E164_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\+[1-9]\d{1,14}$").expect("E.164 regex is valid")
});

/// Validate a phone number against the E.164 format
pub fn is_valid_phone_number(phone: &str) -> bool {
    E164_RE.is_match(phone)
}

/// Mask a phone number for logging, keeping only the last four digits
///
/// ```
/// use confirm_shared::utils::phone::mask_phone;
/// assert_eq!(mask_phone("+14155550123"), "+*******0123");
/// ```
pub fn mask_phone(phone: &str) -> String {
    // Counted in characters, not bytes: the input is caller-supplied and
    // may not be valid E.164 at this point.
    let chars: Vec<char> = phone.chars().collect();
    if chars.len() <= 4 {
        return "*".repeat(chars.len());
    }

    let visible = 4;
    let (head, tail) = chars.split_at(chars.len() - visible);
    let last_digits: String = tail.iter().collect();

    if head.first() == Some(&'+') {
        format!("+{}{}", "*".repeat(head.len() - 1), last_digits)
    } else {
        format!("{}{}", "*".repeat(head.len()), last_digits)
    }
}
