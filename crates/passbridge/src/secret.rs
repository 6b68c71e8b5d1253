//! Structured-secret field model.
//!
//! A stored secret is plain text: the first line is the primary password and
//! everything after it is an optional YAML metadata block (with or without a
//! leading `---` document marker). Metadata that fails to parse as a YAML
//! mapping is treated as absent rather than an error; handlers never crash
//! on a malformed body.
//!
//! Login resolution for an entry follows a fixed fallback chain: an explicit
//! `login` metadata key wins, otherwise the last path component of the entry
//! name stands in. A well-formed `login_fields` sub-mapping is surfaced
//! verbatim for multi-field credentials; a malformed one is silently
//! dropped while the rest of the resolution still succeeds.

use serde_json::{Map, Value as JsonValue};
use serde_yaml::{Mapping, Value as YamlValue};
use thiserror::Error;

/// Scheme prefix marking a body line as a TOTP URI.
const OTPAUTH_PREFIX: &str = "otpauth://";

/// Errors surfaced when a named sub-field is requested from a secret.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FieldError {
    /// The requested key is absent from the metadata mapping.
    ///
    /// The display text is part of the protocol contract; clients match on
    /// `failed to get secret sub entry: key not found in YAML document`.
    #[error("key not found in YAML document")]
    KeyNotFound,
}

/// A stored credential: primary password line plus raw metadata block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Secret {
    password: String,
    body: String,
}

impl Secret {
    /// Creates a secret from a password line and a raw metadata block.
    #[must_use]
    pub fn new(password: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            password: password.into(),
            body: body.into(),
        }
    }

    /// Parses the stored text form: first line password, remainder body.
    #[must_use]
    pub fn from_text(text: &str) -> Self {
        match text.split_once('\n') {
            Some((password, body)) => Self::new(password.trim_end_matches('\r'), body),
            None => Self::new(text, ""),
        }
    }

    /// Renders the secret back to its stored text form.
    #[must_use]
    pub fn to_text(&self) -> String {
        if self.body.is_empty() {
            format!("{}\n", self.password)
        } else {
            format!("{}\n{}", self.password, self.body)
        }
    }

    /// The primary password (always line one of the body).
    #[must_use]
    pub fn password(&self) -> &str {
        &self.password
    }

    /// The raw metadata block following the password line.
    #[must_use]
    pub fn body(&self) -> &str {
        &self.body
    }

    /// Parses the metadata block into a YAML mapping.
    ///
    /// Returns `None` when the block is empty, malformed, or not a mapping;
    /// degradation is silent by design.
    #[must_use]
    pub fn data(&self) -> Option<Mapping> {
        if self.body.trim().is_empty() {
            return None;
        }
        match serde_yaml::from_str::<YamlValue>(&self.body) {
            Ok(YamlValue::Mapping(mapping)) => Some(mapping),
            Ok(_) | Err(_) => None,
        }
    }

    /// The explicit `login` metadata value, if present and scalar.
    #[must_use]
    pub fn login(&self) -> Option<String> {
        self.data()
            .and_then(|data| data.get("login").and_then(scalar_to_string))
    }

    /// Resolves the displayed username for this secret.
    ///
    /// Prefers the explicit `login` metadata key and falls back to the last
    /// path component of the entry name.
    #[must_use]
    pub fn resolve_login(&self, entry_name: &str) -> String {
        self.login().unwrap_or_else(|| {
            entry_name
                .rsplit('/')
                .next()
                .unwrap_or(entry_name)
                .to_owned()
        })
    }

    /// The `login_fields` sub-mapping, surfaced verbatim as JSON.
    ///
    /// Returns `None` when the key is absent or is not a mapping; the
    /// malformed case is deliberately indistinguishable from the absent one.
    #[must_use]
    pub fn login_fields(&self) -> Option<Map<String, JsonValue>> {
        let data = self.data()?;
        match data.get("login_fields") {
            Some(YamlValue::Mapping(fields)) => Some(mapping_to_json(fields)),
            _ => None,
        }
    }

    /// Looks up a named metadata field and renders it as text.
    ///
    /// # Errors
    ///
    /// Returns [`FieldError::KeyNotFound`] when the metadata block has no
    /// such key or the block is absent entirely.
    pub fn field(&self, key: &str) -> Result<String, FieldError> {
        self.data()
            .and_then(|data| data.get(key).and_then(render_value))
            .ok_or(FieldError::KeyNotFound)
    }

    /// The first `otpauth://` URI found in the secret, if any.
    ///
    /// Both the password line and the metadata block are searched, matching
    /// how stores keep TOTP seeds either as the secret itself or alongside
    /// the password.
    #[must_use]
    pub fn otpauth(&self) -> Option<&str> {
        std::iter::once(self.password.as_str())
            .chain(self.body.lines())
            .map(str::trim)
            .find(|line| line.starts_with(OTPAUTH_PREFIX))
    }

    /// The full metadata mapping converted to a JSON object.
    ///
    /// The password line is never part of this view. An absent or malformed
    /// block yields an empty object.
    #[must_use]
    pub fn data_as_json(&self) -> JsonValue {
        self.data()
            .map_or_else(|| JsonValue::Object(Map::new()), |data| {
                JsonValue::Object(mapping_to_json(&data))
            })
    }
}

/// Converts a YAML mapping into a JSON object, preserving value types.
fn mapping_to_json(mapping: &Mapping) -> Map<String, JsonValue> {
    let mut object = Map::new();
    for (key, value) in mapping {
        if let Some(key) = scalar_to_string(key) {
            object.insert(key, yaml_to_json(value));
        }
    }
    object
}

/// Converts one YAML value into its JSON counterpart.
fn yaml_to_json(value: &YamlValue) -> JsonValue {
    match value {
        YamlValue::Null => JsonValue::Null,
        YamlValue::Bool(b) => JsonValue::Bool(*b),
        YamlValue::Number(n) => yaml_number_to_json(n),
        YamlValue::String(s) => JsonValue::String(s.clone()),
        YamlValue::Sequence(items) => JsonValue::Array(items.iter().map(yaml_to_json).collect()),
        YamlValue::Mapping(mapping) => JsonValue::Object(mapping_to_json(mapping)),
        YamlValue::Tagged(tagged) => yaml_to_json(&tagged.value),
    }
}

fn yaml_number_to_json(number: &serde_yaml::Number) -> JsonValue {
    if let Some(i) = number.as_i64() {
        JsonValue::from(i)
    } else if let Some(u) = number.as_u64() {
        JsonValue::from(u)
    } else {
        number
            .as_f64()
            .and_then(serde_json::Number::from_f64)
            .map_or(JsonValue::Null, JsonValue::Number)
    }
}

/// Renders a scalar YAML value as plain text; mappings and sequences yield
/// `None`.
fn scalar_to_string(value: &YamlValue) -> Option<String> {
    match value {
        YamlValue::String(s) => Some(s.clone()),
        YamlValue::Number(n) => Some(n.to_string()),
        YamlValue::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Renders a metadata value for clipboard-style consumption.
///
/// Scalars render as themselves; structured values render as their YAML
/// text so nested data is still copyable.
fn render_value(value: &YamlValue) -> Option<String> {
    if let Some(scalar) = scalar_to_string(value) {
        return Some(scalar);
    }
    serde_yaml::to_string(value)
        .ok()
        .map(|text| text.trim_end().to_owned())
}
