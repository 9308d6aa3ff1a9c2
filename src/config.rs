//! Startup configuration.
//!
//! Resolves the two inputs the application takes — the target instant and
//! the encoded motivation payload — into a [`Settings`] value, falling back
//! to built-in defaults on anything unparseable. Fallbacks are silent apart
//! from a diagnostic log line; nothing here can abort the program.
//!
//! The motivation payload is standard-alphabet base64 of a comma-separated
//! quote list. [`encode_quotes`] is the inverse of [`decode_quotes`], up to
//! trimming and dropping empty pieces.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use thiserror::Error;
use time::format_description::well_known::Rfc3339;
use time::macros::datetime;
use time::OffsetDateTime;
use tracing::warn;

/// Quote list used when no motivation payload is supplied or it cannot be
/// decoded.
pub const DEFAULT_QUOTES: [&str; 4] = [
    "Almost there!",
    "Just a bit longer!",
    "Time flies by!",
    "Thinking of you!",
];

/// Target instant used when no end date is supplied or it cannot be parsed.
pub fn default_target() -> OffsetDateTime {
    datetime!(2025-09-06 20:58:00 -6)
}

/// Builds the default quote list as owned strings.
pub fn default_quotes() -> Vec<String> {
    DEFAULT_QUOTES.iter().map(|q| q.to_string()).collect()
}

/// The recoverable configuration error classes. Every variant resolves to a
/// default plus a logged warning.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The end date did not parse as an RFC3339 instant.
    #[error("unparseable target instant: {0}")]
    InvalidTarget(#[from] time::error::Parse),
    /// The motivation payload was not valid base64.
    #[error("motivation payload is not valid base64: {0}")]
    InvalidBase64(#[from] base64::DecodeError),
    /// The motivation payload decoded to bytes that are not UTF-8.
    #[error("motivation payload is not valid UTF-8: {0}")]
    InvalidUtf8(#[from] std::string::FromUtf8Error),
}

/// Resolved startup configuration.
#[derive(Debug, Clone)]
pub struct Settings {
    /// The instant the countdown runs to.
    pub target: OffsetDateTime,
    /// The motivational quote set; may legitimately be empty.
    pub quotes: Vec<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            target: default_target(),
            quotes: default_quotes(),
        }
    }
}

impl Settings {
    /// Resolves raw command-line inputs into settings, applying the
    /// default-on-error policy for both fields.
    pub fn resolve(end_date: Option<&str>, motivation: Option<&str>) -> Self {
        let target = match end_date {
            Some(raw) => parse_target(raw).unwrap_or_else(|err| {
                warn!(%err, raw, "invalid end date, using the default target");
                default_target()
            }),
            None => default_target(),
        };
        let quotes = match motivation {
            Some(payload) => decode_quotes(payload).unwrap_or_else(|err| {
                warn!(%err, "undecodable motivation payload, using the default quotes");
                default_quotes()
            }),
            None => default_quotes(),
        };
        Self { target, quotes }
    }
}

/// Parses an RFC3339 end date, e.g. `2025-09-06T20:58:00-06:00`.
pub fn parse_target(raw: &str) -> Result<OffsetDateTime, ConfigError> {
    Ok(OffsetDateTime::parse(raw, &Rfc3339)?)
}

/// Decodes a motivation payload: base64, then comma-split with trimming,
/// dropping empty pieces.
///
/// A payload that decodes cleanly but contains only empty pieces yields an
/// empty list — that is not an error, it just leaves the popup with nothing
/// to show.
pub fn decode_quotes(payload: &str) -> Result<Vec<String>, ConfigError> {
    let bytes = STANDARD.decode(payload)?;
    let text = String::from_utf8(bytes)?;
    Ok(split_quotes(&text))
}

/// Splits a comma-separated quote list, trimming each piece and dropping
/// empty ones.
pub fn split_quotes(text: &str) -> Vec<String> {
    text.split(',')
        .map(str::trim)
        .filter(|piece| !piece.is_empty())
        .map(str::to_owned)
        .collect()
}

/// Encodes a quote list into the motivation payload format.
pub fn encode_quotes<S: AsRef<str>>(quotes: &[S]) -> String {
    let joined = quotes
        .iter()
        .map(|q| q.as_ref())
        .collect::<Vec<_>>()
        .join(",");
    STANDARD.encode(joined)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_rfc3339_with_offset() {
        let target = parse_target("2025-09-06T20:58:00-06:00").unwrap();
        assert_eq!(target, default_target());
    }

    #[test]
    fn rejects_garbage_end_date() {
        assert!(matches!(
            parse_target("next tuesday"),
            Err(ConfigError::InvalidTarget(_))
        ));
    }

    #[test]
    fn decode_trims_and_drops_empty_pieces() {
        let payload = STANDARD.encode("  one , ,two,, three  ");
        let quotes = decode_quotes(&payload).unwrap();
        assert_eq!(quotes, vec!["one", "two", "three"]);
    }

    #[test]
    fn decode_of_only_separators_is_empty_not_an_error() {
        let payload = STANDARD.encode(", ,,");
        assert!(decode_quotes(&payload).unwrap().is_empty());
    }

    #[test]
    fn rejects_invalid_base64() {
        assert!(matches!(
            decode_quotes("!!not base64!!"),
            Err(ConfigError::InvalidBase64(_))
        ));
    }

    #[test]
    fn rejects_non_utf8_payload() {
        let payload = STANDARD.encode([0xffu8, 0xfe, 0xfd]);
        assert!(matches!(
            decode_quotes(&payload),
            Err(ConfigError::InvalidUtf8(_))
        ));
    }

    #[test]
    fn round_trip_preserves_trimmed_non_empty_subset_in_order() {
        let quotes = ["Almost there!", "Just a bit longer!", "Time flies by!"];
        let decoded = decode_quotes(&encode_quotes(&quotes)).unwrap();
        assert_eq!(decoded, quotes);
    }

    #[test]
    fn resolve_falls_back_per_field() {
        let settings = Settings::resolve(Some("not a date"), None);
        assert_eq!(settings.target, default_target());
        assert_eq!(settings.quotes, default_quotes());

        let payload = encode_quotes(&["keep going"]);
        let settings = Settings::resolve(Some("2031-01-01T00:00:00Z"), Some(&payload));
        assert_ne!(settings.target, default_target());
        assert_eq!(settings.quotes, vec!["keep going"]);

        let settings = Settings::resolve(None, Some("%%%"));
        assert_eq!(settings.quotes, default_quotes());
    }
}
