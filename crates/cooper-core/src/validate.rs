//! Boundary validation for user-supplied fields.
//!
//! Every function either returns the normalized value or a
//! `CoreError::Validation` describing the first problem found.

use crate::errors::CoreError;

/// Length of a CNPJ once punctuation is stripped.
pub const CNPJ_DIGITS: usize = 14;

/// Normalize a CNPJ to its 14 digits.
///
/// Accepts the formatted form (`12.345.678/0001-90`) or bare digits.
///
/// # Errors
///
/// Returns `CoreError::Validation` if anything other than digits and the
/// usual separators is present, or if the digit count is wrong.
pub fn normalize_cnpj(raw: &str) -> Result<String, CoreError> {
    let mut digits = String::with_capacity(CNPJ_DIGITS);
    for c in raw.trim().chars() {
        match c {
            '0'..='9' => digits.push(c),
            '.' | '/' | '-' | ' ' => {}
            other => {
                return Err(CoreError::Validation(format!(
                    "cnpj '{raw}' contains invalid character '{other}'"
                )));
            }
        }
    }
    if digits.len() != CNPJ_DIGITS {
        return Err(CoreError::Validation(format!(
            "cnpj '{raw}' must have {CNPJ_DIGITS} digits, found {}",
            digits.len()
        )));
    }
    Ok(digits)
}

/// Normalize an email address (trim + lowercase) and check its shape.
///
/// When `allowed_domain` is non-empty the address must belong to it.
///
/// # Errors
///
/// Returns `CoreError::Validation` for malformed addresses or a foreign domain.
pub fn normalize_email(raw: &str, allowed_domain: &str) -> Result<String, CoreError> {
    let email = raw.trim().to_lowercase();
    let Some((local, domain)) = email.split_once('@') else {
        return Err(CoreError::Validation(format!("invalid email '{raw}'")));
    };
    if local.is_empty() || !domain.contains('.') || domain.starts_with('.') || domain.ends_with('.')
    {
        return Err(CoreError::Validation(format!("invalid email '{raw}'")));
    }
    if email.chars().any(char::is_whitespace) || domain.contains('@') {
        return Err(CoreError::Validation(format!("invalid email '{raw}'")));
    }

    let allowed = allowed_domain.trim().trim_start_matches('@').to_lowercase();
    if !allowed.is_empty() && domain != allowed {
        return Err(CoreError::Validation(format!(
            "email domain must be @{allowed}"
        )));
    }
    Ok(email)
}

/// Company names must carry at least one visible character.
///
/// # Errors
///
/// Returns `CoreError::Validation` for blank names.
pub fn normalize_company_name(raw: &str) -> Result<String, CoreError> {
    let name = raw.trim();
    if name.is_empty() {
        return Err(CoreError::Validation(
            "company name must not be empty".to_string(),
        ));
    }
    Ok(name.to_string())
}

/// Estimated deal value: finite and not negative.
///
/// # Errors
///
/// Returns `CoreError::Validation` for NaN, infinities, or negative values.
pub fn check_estimated_value(value: f64) -> Result<f64, CoreError> {
    if !value.is_finite() || value < 0.0 {
        return Err(CoreError::Validation(format!(
            "estimated value must be a non-negative number, got {value}"
        )));
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cnpj_strips_punctuation() {
        assert_eq!(
            normalize_cnpj("12.345.678/0001-90").unwrap(),
            "12345678000190"
        );
        assert_eq!(normalize_cnpj(" 12345678000190 ").unwrap(), "12345678000190");
    }

    #[test]
    fn cnpj_rejects_wrong_length_and_letters() {
        assert!(normalize_cnpj("1234").is_err());
        assert!(normalize_cnpj("12.345.678/0001-9X").is_err());
        assert!(normalize_cnpj("").is_err());
    }

    #[test]
    fn email_is_lowercased() {
        assert_eq!(
            normalize_email("  Ana@CooperCard.com.br ", "").unwrap(),
            "ana@coopercard.com.br"
        );
    }

    #[test]
    fn email_domain_restriction() {
        assert!(normalize_email("ana@coopercard.com.br", "coopercard.com.br").is_ok());
        assert!(normalize_email("ana@coopercard.com.br", "@coopercard.com.br").is_ok());
        let err = normalize_email("ana@gmail.com", "coopercard.com.br").unwrap_err();
        assert!(err.to_string().contains("@coopercard.com.br"));
    }

    #[test]
    fn email_shape_checks() {
        for bad in ["", "ana", "@x.com", "ana@localhost", "ana@.com", "a b@x.com", "a@b@c.com"] {
            assert!(normalize_email(bad, "").is_err(), "{bad} should be rejected");
        }
    }

    #[test]
    fn company_name_and_value() {
        assert_eq!(normalize_company_name("  Acme LTDA ").unwrap(), "Acme LTDA");
        assert!(normalize_company_name("   ").is_err());
        assert!(check_estimated_value(0.0).is_ok());
        assert!(check_estimated_value(-1.0).is_err());
        assert!(check_estimated_value(f64::NAN).is_err());
        assert!(check_estimated_value(f64::INFINITY).is_err());
    }
}
