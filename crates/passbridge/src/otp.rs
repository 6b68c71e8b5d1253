//! One-time-password adapter for TOTP-bearing secrets.
//!
//! A secret qualifies when its body carries an `otpauth://totp/...` URI.
//! The URI supplies everything needed for RFC 6238 derivation: the base32
//! shared secret, digit count, time step, and HMAC algorithm. Malformed
//! URIs fail with an [`OtpError`] and are never retried.

use std::time::{SystemTime, SystemTimeError, UNIX_EPOCH};

use data_encoding::BASE32_NOPAD;
use hmac::{Hmac, Mac};
use sha1::Sha1;
use sha2::{Sha256, Sha512};
use thiserror::Error;
use url::Url;

type HmacSha1 = Hmac<Sha1>;
type HmacSha256 = Hmac<Sha256>;
type HmacSha512 = Hmac<Sha512>;

/// Default digit count when the URI does not specify one.
const DEFAULT_DIGITS: u32 = 6;
/// Default time step in seconds when the URI does not specify one.
const DEFAULT_PERIOD: u64 = 30;

/// Errors surfaced while parsing an otpauth URI or deriving a code.
#[derive(Debug, Error)]
pub enum OtpError {
    /// The URI is not syntactically valid.
    #[error("failed to parse otpauth URI: {0}")]
    InvalidUri(#[from] url::ParseError),

    /// The URI scheme is not `otpauth`.
    #[error("unsupported URI scheme '{scheme}'")]
    InvalidScheme {
        /// The rejected scheme.
        scheme: String,
    },

    /// The otpauth type is not `totp` (e.g. counter-based `hotp`).
    #[error("unsupported otpauth type '{kind}'")]
    UnsupportedType {
        /// The rejected otpauth type.
        kind: String,
    },

    /// The URI carries no `secret` parameter.
    #[error("otpauth URI is missing a secret")]
    MissingSecret,

    /// The shared secret is not valid base32.
    #[error("otpauth secret is not valid base32")]
    InvalidSecret,

    /// The `digits` parameter falls outside the supported range.
    #[error("otpauth digits '{digits}' out of range")]
    InvalidDigits {
        /// The rejected digits value.
        digits: String,
    },

    /// The `period` parameter is zero or unparsable.
    #[error("otpauth period '{period}' is not a positive integer")]
    InvalidPeriod {
        /// The rejected period value.
        period: String,
    },

    /// The `algorithm` parameter names an unsupported HMAC.
    #[error("unsupported otpauth algorithm '{algorithm}'")]
    UnsupportedAlgorithm {
        /// The rejected algorithm name.
        algorithm: String,
    },

    /// The system clock reads before the Unix epoch.
    #[error("system clock is before the Unix epoch: {0}")]
    Clock(#[from] SystemTimeError),
}

/// HMAC algorithms accepted in otpauth URIs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Algorithm {
    /// HMAC-SHA1, the RFC 6238 default.
    #[default]
    Sha1,
    /// HMAC-SHA256.
    Sha256,
    /// HMAC-SHA512.
    Sha512,
}

/// Parsed TOTP parameters extracted from an otpauth URI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TotpSpec {
    secret: Vec<u8>,
    digits: u32,
    period: u64,
    algorithm: Algorithm,
}

impl TotpSpec {
    /// Parses an `otpauth://totp/...` URI into derivation parameters.
    ///
    /// # Errors
    ///
    /// Returns an [`OtpError`] describing the first malformed component:
    /// scheme, type, secret, digits, period, or algorithm.
    pub fn parse(uri: &str) -> Result<Self, OtpError> {
        let url = Url::parse(uri)?;
        if url.scheme() != "otpauth" {
            return Err(OtpError::InvalidScheme {
                scheme: url.scheme().to_owned(),
            });
        }
        let kind = url.host_str().unwrap_or_default();
        if !kind.eq_ignore_ascii_case("totp") {
            return Err(OtpError::UnsupportedType {
                kind: kind.to_owned(),
            });
        }

        let mut secret = None;
        let mut digits = DEFAULT_DIGITS;
        let mut period = DEFAULT_PERIOD;
        let mut algorithm = Algorithm::default();
        for (key, value) in url.query_pairs() {
            match key.as_ref() {
                "secret" => secret = Some(decode_secret(&value)?),
                "digits" => digits = parse_digits(&value)?,
                "period" => period = parse_period(&value)?,
                "algorithm" => algorithm = parse_algorithm(&value)?,
                _ => {}
            }
        }

        Ok(Self {
            secret: secret.ok_or(OtpError::MissingSecret)?,
            digits,
            period,
            algorithm,
        })
    }

    /// Derives the code for the time step containing `unix_secs`.
    #[must_use]
    pub fn code_at(&self, unix_secs: u64) -> String {
        let counter = unix_secs / self.period;
        let digest = self.hmac(&counter.to_be_bytes());
        let truncated = dynamic_truncate(&digest);
        let modulus = 10_u64.pow(self.digits);
        let code = u64::from(truncated) % modulus;
        format!("{code:0width$}", width = self.digits as usize)
    }

    /// Derives the code for the current system time.
    ///
    /// # Errors
    ///
    /// Returns [`OtpError::Clock`] when the system clock reads before the
    /// Unix epoch.
    pub fn current_code(&self) -> Result<String, OtpError> {
        let now = SystemTime::now().duration_since(UNIX_EPOCH)?;
        Ok(self.code_at(now.as_secs()))
    }

    fn hmac(&self, message: &[u8]) -> Vec<u8> {
        // HMAC accepts keys of any length, so new_from_slice cannot fail
        // for a decoded secret; an empty digest would only surface as a
        // non-matching code.
        match self.algorithm {
            Algorithm::Sha1 => HmacSha1::new_from_slice(&self.secret).map_or_else(
                |_| Vec::new(),
                |mut mac| {
                    mac.update(message);
                    mac.finalize().into_bytes().to_vec()
                },
            ),
            Algorithm::Sha256 => HmacSha256::new_from_slice(&self.secret).map_or_else(
                |_| Vec::new(),
                |mut mac| {
                    mac.update(message);
                    mac.finalize().into_bytes().to_vec()
                },
            ),
            Algorithm::Sha512 => HmacSha512::new_from_slice(&self.secret).map_or_else(
                |_| Vec::new(),
                |mut mac| {
                    mac.update(message);
                    mac.finalize().into_bytes().to_vec()
                },
            ),
        }
    }
}

/// Convenience wrapper: parse the URI and derive the current code.
///
/// # Errors
///
/// Propagates any [`OtpError`] from parsing or clock access.
pub fn current_code(uri: &str) -> Result<String, OtpError> {
    TotpSpec::parse(uri)?.current_code()
}

/// RFC 4226 dynamic truncation: a 31-bit window selected by the low nibble
/// of the final digest byte.
fn dynamic_truncate(digest: &[u8]) -> u32 {
    let offset = digest.last().map_or(0, |byte| usize::from(byte & 0x0f));
    let window = digest.get(offset..offset + 4).unwrap_or_default();
    let mut value: u32 = 0;
    for byte in window {
        value = (value << 8) | u32::from(*byte);
    }
    value & 0x7fff_ffff
}

/// Normalises and decodes a base32 shared secret.
///
/// Whitespace and `=` padding are stripped and letters upper-cased before
/// decoding, tolerating the loosely formatted secrets provisioning tools
/// emit.
fn decode_secret(raw: &str) -> Result<Vec<u8>, OtpError> {
    let normalized: String = raw
        .chars()
        .filter(|ch| !ch.is_ascii_whitespace() && *ch != '=')
        .map(|ch| ch.to_ascii_uppercase())
        .collect();
    BASE32_NOPAD
        .decode(normalized.as_bytes())
        .map_err(|_| OtpError::InvalidSecret)
}

fn parse_digits(raw: &str) -> Result<u32, OtpError> {
    raw.parse::<u32>()
        .ok()
        .filter(|digits| (1..=10).contains(digits))
        .ok_or_else(|| OtpError::InvalidDigits {
            digits: raw.to_owned(),
        })
}

fn parse_period(raw: &str) -> Result<u64, OtpError> {
    raw.parse::<u64>()
        .ok()
        .filter(|period| *period > 0)
        .ok_or_else(|| OtpError::InvalidPeriod {
            period: raw.to_owned(),
        })
}

fn parse_algorithm(raw: &str) -> Result<Algorithm, OtpError> {
    match raw.to_ascii_uppercase().as_str() {
        "SHA1" => Ok(Algorithm::Sha1),
        "SHA256" => Ok(Algorithm::Sha256),
        "SHA512" => Ok(Algorithm::Sha512),
        _ => Err(OtpError::UnsupportedAlgorithm {
            algorithm: raw.to_owned(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    // RFC 6238 appendix B test secrets for each algorithm.
    const SECRET_SHA1: &str = "GEZDGNBVGY3TQOJQGEZDGNBVGY3TQOJQ";
    const SECRET_SHA256: &str = "GEZDGNBVGY3TQOJQGEZDGNBVGY3TQOJQGEZDGNBVGY3TQOJQGEZA";
    const SECRET_SHA512: &str = "GEZDGNBVGY3TQOJQGEZDGNBVGY3TQOJQGEZDGNBVGY3TQOJQGEZDGNBVGY3TQOJQGEZDGNBVGY3TQOJQGEZDGNBVGY3TQOJQGEZDGNA";

    fn spec(uri: &str) -> TotpSpec {
        TotpSpec::parse(uri).expect("URI should parse")
    }

    #[rstest]
    #[case::sha1_default_algorithm(
        format!("otpauth://totp/ref?secret={SECRET_SHA1}&digits=8"),
        "94287082"
    )]
    #[case::sha256(
        format!("otpauth://totp/ref?secret={SECRET_SHA256}&digits=8&algorithm=SHA256"),
        "46119246"
    )]
    #[case::sha512(
        format!("otpauth://totp/ref?secret={SECRET_SHA512}&digits=8&algorithm=SHA512"),
        "90693936"
    )]
    fn derives_rfc6238_reference_codes(#[case] uri: String, #[case] expected: &str) {
        assert_eq!(spec(&uri).code_at(59), expected);
    }

    #[test]
    fn six_digit_codes_are_the_default() {
        let uri = format!("otpauth://totp/ref?secret={SECRET_SHA1}");
        // Same window as the 8-digit reference vector, truncated display.
        assert_eq!(spec(&uri).code_at(59), "287082");
    }

    #[test]
    fn codes_are_stable_within_a_period() {
        let uri = format!("otpauth://totp/ref?secret={SECRET_SHA1}");
        let totp = spec(&uri);
        assert_eq!(totp.code_at(30), totp.code_at(59));
        assert_ne!(totp.code_at(59), totp.code_at(60));
    }

    #[test]
    fn parses_custom_period() {
        let uri = format!("otpauth://totp/ref?secret={SECRET_SHA1}&period=60");
        let totp = spec(&uri);
        assert_eq!(totp.code_at(60), totp.code_at(119));
    }

    #[test]
    fn tolerates_lowercase_and_padded_secrets() {
        let lower = spec("otpauth://totp/gh?secret=rpna55555qyho42j");
        let padded = spec("otpauth://totp/gh?secret=RPNA55555QYHO42J======");
        assert_eq!(lower.code_at(59), padded.code_at(59));
    }

    #[test]
    fn rejects_missing_secret() {
        let error = TotpSpec::parse("otpauth://totp/ref?digits=6").expect_err("expected error");
        assert!(matches!(error, OtpError::MissingSecret));
    }

    #[test]
    fn rejects_invalid_base32() {
        let error = TotpSpec::parse("otpauth://totp/ref?secret=!!!").expect_err("expected error");
        assert!(matches!(error, OtpError::InvalidSecret));
    }

    #[test]
    fn rejects_wrong_scheme() {
        let error = TotpSpec::parse("https://totp/ref?secret=AAAA").expect_err("expected error");
        assert!(matches!(error, OtpError::InvalidScheme { .. }));
    }

    #[test]
    fn rejects_hotp_type() {
        let error =
            TotpSpec::parse("otpauth://hotp/ref?secret=AAAA&counter=1").expect_err("expected error");
        assert!(matches!(error, OtpError::UnsupportedType { .. }));
    }

    #[rstest]
    #[case::zero_digits("digits=0")]
    #[case::huge_digits("digits=12")]
    #[case::garbage_digits("digits=six")]
    #[case::zero_period("period=0")]
    #[case::garbage_algorithm("algorithm=MD5")]
    fn rejects_out_of_range_parameters(#[case] parameter: &str) {
        let uri = format!("otpauth://totp/ref?secret={SECRET_SHA1}&{parameter}");
        assert!(TotpSpec::parse(&uri).is_err());
    }

    #[test]
    fn malformed_uri_is_an_error() {
        assert!(matches!(
            TotpSpec::parse("not a uri"),
            Err(OtpError::InvalidUri(_))
        ));
    }
}
