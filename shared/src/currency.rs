//! Currency and phone display helpers
//!
//! Amounts render in Indian Rupees; phone numbers follow the Indian
//! 10-digit mobile format (optionally with the 91 country prefix).

/// Currency symbol used by all price rendering
pub const CURRENCY_SYMBOL: &str = "₹";

/// Format a whole-rupee amount: `format_currency(299.0)` -> "₹299"
pub fn format_currency(amount: f64) -> String {
    format!("{}{:.0}", CURRENCY_SYMBOL, amount)
}

/// Format an amount with paise: `format_currency_decimal(299.5)` -> "₹299.50"
pub fn format_currency_decimal(amount: f64) -> String {
    format!("{}{:.2}", CURRENCY_SYMBOL, amount)
}

fn digits_of(phone: &str) -> String {
    phone.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// Format a phone number as "+91 xxxxx xxxxx".
///
/// Inputs that are neither a bare 10-digit number nor a 12-digit number
/// with the 91 prefix come back unchanged.
pub fn format_phone(phone: &str) -> String {
    let digits = digits_of(phone);

    if digits.len() == 12 && digits.starts_with("91") {
        return format!("+91 {} {}", &digits[2..7], &digits[7..]);
    }
    if digits.len() == 10 {
        return format!("+91 {} {}", &digits[..5], &digits[5..]);
    }
    phone.to_string()
}

/// Validate an Indian mobile number: 10 digits starting 6-9, with or
/// without the 91 country prefix.
pub fn is_valid_phone(phone: &str) -> bool {
    let digits = digits_of(phone);

    let national = if digits.len() == 12 && digits.starts_with("91") {
        &digits[2..]
    } else if digits.len() == 10 {
        digits.as_str()
    } else {
        return false;
    };

    matches!(national.chars().next(), Some('6'..='9'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_currency() {
        assert_eq!(format_currency(299.0), "₹299");
        assert_eq!(format_currency(0.0), "₹0");
        assert_eq!(format_currency_decimal(299.5), "₹299.50");
        assert_eq!(format_currency_decimal(48.0), "₹48.00");
    }

    #[test]
    fn test_format_phone() {
        assert_eq!(format_phone("9876543210"), "+91 98765 43210");
        assert_eq!(format_phone("+91 98765-43210"), "+91 98765 43210");
        assert_eq!(format_phone("919876543210"), "+91 98765 43210");
        // Unrecognized shapes pass through untouched
        assert_eq!(format_phone("12345"), "12345");
    }

    #[test]
    fn test_is_valid_phone() {
        assert!(is_valid_phone("9876543210"));
        assert!(is_valid_phone("6000000000"));
        assert!(is_valid_phone("91 98765 43210"));
        assert!(is_valid_phone("+91-8876543210"));

        // Must start 6-9
        assert!(!is_valid_phone("5876543210"));
        // Wrong lengths
        assert!(!is_valid_phone("987654321"));
        assert!(!is_valid_phone("98765432100"));
        assert!(!is_valid_phone(""));
        // Prefix without a valid national number
        assert!(!is_valid_phone("915876543210"));
    }
}
