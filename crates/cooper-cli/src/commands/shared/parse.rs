use std::str::FromStr;

use anyhow::Context;
use chrono::{DateTime, NaiveDate, Utc};
use cooper_core::errors::CoreError;

/// Parse a domain label (`Negociação`, `quente`, `4L`, ...) via its `FromStr`.
///
/// The `CoreError` stays in the error chain so the exit code reflects a
/// validation failure.
pub fn parse_label<T>(raw: &str, field: &str) -> anyhow::Result<T>
where
    T: FromStr<Err = CoreError>,
{
    raw.parse()
        .with_context(|| format!("invalid {field} '{raw}'"))
}

/// Like [`parse_label`], but `none` (or an empty value) clears the field.
pub fn parse_nullable_label<T>(raw: &str, field: &str) -> anyhow::Result<Option<T>>
where
    T: FromStr<Err = CoreError>,
{
    match raw.trim().to_lowercase().as_str() {
        "" | "none" | "null" | "-" => Ok(None),
        _ => parse_label(raw, field).map(Some),
    }
}

/// Accept RFC 3339 or a bare date (midnight UTC).
pub fn parse_timestamp(raw: &str, field: &str) -> anyhow::Result<DateTime<Utc>> {
    let trimmed = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(dt.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
        .ok_or_else(|| {
            CoreError::Validation(format!(
                "invalid {field} '{raw}': expected RFC 3339 or YYYY-MM-DD"
            ))
        })
        .map_err(anyhow::Error::from)
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use cooper_core::enums::{PipelineStatus, Product, Temperature};

    use super::*;

    #[test]
    fn parses_portuguese_labels() {
        let status: PipelineStatus = parse_label("negociacao", "status").unwrap();
        assert_eq!(status, PipelineStatus::Negotiation);
        let product: Product = parse_label("4L", "product").unwrap();
        assert_eq!(product, Product::FourthLine);
    }

    #[test]
    fn invalid_label_keeps_core_error() {
        let err = parse_label::<PipelineStatus>("em andamento", "status").unwrap_err();
        assert!(err.to_string().contains("invalid status 'em andamento'"));
        assert!(err.chain().any(|cause| cause.downcast_ref::<CoreError>().is_some()));
    }

    #[test]
    fn nullable_label_clears() {
        assert_eq!(parse_nullable_label::<Temperature>("none", "temperature").unwrap(), None);
        assert_eq!(
            parse_nullable_label::<Temperature>("Quente", "temperature").unwrap(),
            Some(Temperature::Hot)
        );
    }

    #[test]
    fn timestamps() {
        assert_eq!(
            parse_timestamp("2025-06-10", "at").unwrap(),
            Utc.with_ymd_and_hms(2025, 6, 10, 0, 0, 0).unwrap()
        );
        assert_eq!(
            parse_timestamp("2025-06-10T12:00:00-03:00", "at").unwrap(),
            Utc.with_ymd_and_hms(2025, 6, 10, 15, 0, 0).unwrap()
        );
        assert!(parse_timestamp("10/06/2025", "at").is_err());
    }
}
