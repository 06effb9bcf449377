//! Session value object: the pre-issued token plus its optional expiry.
//!
//! The token and expiry live in the local key-value store under
//! [`TOKEN_KEY`] and [`TOKEN_EXPIRY_KEY`]. This module only interprets those
//! stored strings; reading and clearing the store is the job of
//! [`crate::domain::SessionGuard`].

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use zeroize::Zeroizing;

/// Store key holding the opaque session token.
pub const TOKEN_KEY: &str = "token";
/// Store key holding the expiry as epoch milliseconds, rendered as a string.
pub const TOKEN_EXPIRY_KEY: &str = "tokenExpiry";

/// A point in time as milliseconds since the Unix epoch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EpochMillis(i64);

impl EpochMillis {
    /// Wrap a raw millisecond count.
    pub const fn new(millis: i64) -> Self {
        Self(millis)
    }

    /// Raw millisecond count.
    pub const fn get(self) -> i64 {
        self.0
    }

    /// Convert a UTC timestamp.
    pub fn from_datetime(at: DateTime<Utc>) -> Self {
        Self(at.timestamp_millis())
    }

    /// Offset by whole seconds, saturating at the representable range.
    pub const fn saturating_add_secs(self, secs: u64) -> Self {
        let millis = if secs > (i64::MAX / 1000) as u64 {
            i64::MAX
        } else {
            (secs as i64) * 1000
        };
        Self(self.0.saturating_add(millis))
    }
}

impl fmt::Display for EpochMillis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Stored expiry text that does not denote a number.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("expiry '{raw}' is not a number")]
pub struct ExpiryNotANumber {
    raw: String,
}

impl FromStr for EpochMillis {
    type Err = ExpiryNotANumber;

    /// Read any decimal or exponent notation. Blank text reads as zero,
    /// fractions round towards the past and infinities saturate.
    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Ok(Self(0));
        }
        let value = trimmed
            .parse::<f64>()
            .ok()
            .filter(|value| !value.is_nan())
            .ok_or_else(|| ExpiryNotANumber {
                raw: raw.to_owned(),
            })?;
        // Saturating cast; flooring keeps `expiry < now` exact against a
        // whole-millisecond clock.
        Ok(Self(value.floor() as i64))
    }
}

/// Reasons the users view refuses to proceed without a fresh login.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    /// No token is stored, or the stored token is empty.
    #[error("no session token stored")]
    Missing,
    /// The stored expiry lies in the past.
    #[error("session expired at {expired_at} (now {now})")]
    Expired {
        /// Stored expiry.
        expired_at: EpochMillis,
        /// Time of the check.
        now: EpochMillis,
    },
}

/// Authenticated-user proof held client-side.
///
/// ## Invariants
/// - `token` is never empty.
/// - A session without an expiry never expires.
/// - The token is wiped from memory when the session is dropped.
#[derive(Clone, PartialEq, Eq)]
pub struct Session {
    token: Zeroizing<String>,
    expires_at: Option<EpochMillis>,
}

impl Session {
    /// Build a session from a token and optional expiry.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Missing`] when `token` is empty.
    ///
    /// # Examples
    /// ```
    /// use panel::domain::{EpochMillis, Session};
    ///
    /// let session = Session::new("QpwL5tke4Pnpja7X4", Some(EpochMillis::new(2_000))).unwrap();
    /// let session = session.validate_at(EpochMillis::new(2_000)).unwrap();
    /// assert!(session.validate_at(EpochMillis::new(2_001)).is_err());
    /// ```
    pub fn new(
        token: impl Into<String>,
        expires_at: Option<EpochMillis>,
    ) -> Result<Self, SessionError> {
        let token = Zeroizing::new(token.into());
        if token.is_empty() {
            return Err(SessionError::Missing);
        }
        Ok(Self { token, expires_at })
    }

    /// Rebuild a session from the raw strings read out of the store.
    ///
    /// An expiry that is not a number disables the expiry check rather than
    /// invalidating the session.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Missing`] when no non-empty token is stored.
    pub fn from_stored(
        token: Option<String>,
        expiry: Option<String>,
    ) -> Result<Self, SessionError> {
        let token = token.ok_or(SessionError::Missing)?;
        let expires_at = expiry.and_then(|raw| match raw.parse::<EpochMillis>() {
            Ok(at) => Some(at),
            Err(error) => {
                tracing::warn!(%error, raw = %raw, "ignoring unparseable session expiry");
                None
            }
        });
        Self::new(token, expires_at)
    }

    /// Opaque token string.
    pub fn token(&self) -> &str {
        self.token.as_str()
    }

    /// Expiry, if the login flow recorded one.
    pub const fn expires_at(&self) -> Option<EpochMillis> {
        self.expires_at
    }

    /// Keep the session if it is still valid at `now`.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Expired`] when the expiry has passed.
    pub fn validate_at(self, now: EpochMillis) -> Result<Self, SessionError> {
        match self.expires_at {
            Some(expired_at) if expired_at < now => Err(SessionError::Expired { expired_at, now }),
            _ => Ok(self),
        }
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("token", &"<redacted>")
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;

    const NOW: EpochMillis = EpochMillis::new(1_700_000_000_000);

    #[rstest]
    #[case::no_token(None, None)]
    #[case::empty_token(Some(""), Some("1800000000000"))]
    fn missing_tokens_are_rejected(#[case] token: Option<&str>, #[case] expiry: Option<&str>) {
        let result = Session::from_stored(token.map(str::to_owned), expiry.map(str::to_owned));
        assert_eq!(result, Err(SessionError::Missing));
    }

    #[rstest]
    #[case::past(Some("1699999999999"), false)]
    #[case::exactly_now(Some("1700000000000"), true)]
    #[case::future(Some("1700000000001"), true)]
    #[case::absent(None, true)]
    #[case::unparseable(Some("soon"), true)]
    #[case::not_a_number(Some("NaN"), true)]
    #[case::fractional_past(Some("1699999999999.0"), false)]
    #[case::fractional_after_now(Some("1700000000000.5"), true)]
    #[case::exponent_past(Some("1.6e12"), false)]
    #[case::exponent_future(Some("1.8e12"), true)]
    #[case::padded(Some(" 1699999999999 "), false)]
    #[case::blank_reads_as_zero(Some("  "), false)]
    #[case::negative_infinity(Some("-inf"), false)]
    fn expiry_is_checked_against_now(#[case] expiry: Option<&str>, #[case] valid: bool) {
        let session = Session::from_stored(Some("abc".to_owned()), expiry.map(str::to_owned))
            .expect("token present");
        assert_eq!(session.validate_at(NOW).is_ok(), valid);
    }

    #[rstest]
    fn expired_error_reports_both_instants() {
        let session = Session::new("abc", Some(EpochMillis::new(10))).expect("session");
        let error = session
            .validate_at(EpochMillis::new(11))
            .expect_err("expired");
        assert_eq!(
            error,
            SessionError::Expired {
                expired_at: EpochMillis::new(10),
                now: EpochMillis::new(11),
            }
        );
        assert_eq!(error.to_string(), "session expired at 10 (now 11)");
    }

    #[rstest]
    fn debug_output_redacts_the_token() {
        let session = Session::new("very-secret", None).expect("session");
        let rendered = format!("{session:?}");
        assert!(!rendered.contains("very-secret"));
        assert!(rendered.contains("<redacted>"));
    }

    #[rstest]
    #[case(0, 1_000)]
    #[case(3_600, 3_601_000)]
    fn adding_seconds_moves_in_milliseconds(#[case] secs: u64, #[case] expected: i64) {
        assert_eq!(EpochMillis::new(1_000).saturating_add_secs(secs).get(), expected);
    }

    #[rstest]
    fn adding_huge_offsets_saturates() {
        assert_eq!(
            EpochMillis::new(1).saturating_add_secs(u64::MAX).get(),
            i64::MAX
        );
    }
}
