//! Operation routing and handlers.
//!
//! The dispatcher resolves a parsed [`Request`] to its handler via an
//! exhaustive match and runs it against the injected store. All state lives
//! in the store; the dispatcher itself only carries the version triple and
//! the generator/clipboard collaborators, so it can serve any number of
//! sequential requests.

use semver::Version;
use serde::Serialize;
use serde_yaml::Mapping;
use tracing::debug;

use crate::clipboard::Clipboard;
use crate::otp;
use crate::pwgen::PasswordGenerator;
use crate::query;
use crate::secret::Secret;
use crate::store::Store;

use super::DISPATCH_TARGET;
use super::errors::DispatchError;
use super::request::{CopyRequest, CreateRequest, Request};
use super::response::{LoginResponse, StatusResponse, TotpResponse, VersionResponse};

/// Routes requests to operation handlers.
pub struct Dispatcher<'a> {
    version: Version,
    generator: &'a dyn PasswordGenerator,
    clipboard: &'a dyn Clipboard,
}

impl<'a> Dispatcher<'a> {
    /// Creates a dispatcher over the given collaborators.
    #[must_use]
    pub const fn new(
        version: Version,
        generator: &'a dyn PasswordGenerator,
        clipboard: &'a dyn Clipboard,
    ) -> Self {
        Self {
            version,
            generator,
            clipboard,
        }
    }

    /// Handles one inbound payload and produces the outbound payload.
    ///
    /// # Errors
    ///
    /// Returns a [`DispatchError`] for parse failures and handler
    /// failures alike; the caller must not write any frame in that case.
    pub fn respond<S: Store>(
        &self,
        store: &mut S,
        payload: &[u8],
    ) -> Result<Vec<u8>, DispatchError> {
        let request = Request::parse(payload)?;
        debug!(target: DISPATCH_TARGET, kind = request.kind(), "dispatching request");

        match request {
            Request::GetVersion => serialize(&VersionResponse::from(&self.version)),
            Request::Query(request) => {
                let names = list_entries(store)?;
                serialize(&query::search(&names, &request.query))
            }
            Request::QueryHost(request) => {
                let names = list_entries(store)?;
                serialize(&query::search_host(&names, &request.host))
            }
            Request::GetLogin(request) => {
                let secret = get_secret(store, &request.entry)?;
                serialize(&login_response(&request.entry, &secret))
            }
            Request::GetData(request) => self.get_data(store, &request.entry),
            Request::Create(request) => self.create(store, &request),
            Request::CopyToClipboard(request) => self.copy_to_clipboard(store, &request),
        }
    }

    /// `getData`: the metadata map, or TOTP fields for TOTP-bearing bodies.
    fn get_data<S: Store>(&self, store: &mut S, entry: &str) -> Result<Vec<u8>, DispatchError> {
        let secret = get_secret(store, entry)?;
        if let Some(uri) = secret.otpauth() {
            let current_totp = otp::current_code(uri)?;
            return serialize(&TotpResponse {
                current_totp,
                otpauth: uri.to_owned(),
            });
        }
        serialize(&secret.data_as_json())
    }

    /// `create`: conflict-checked store of a new secret.
    fn create<S: Store>(
        &self,
        store: &mut S,
        request: &CreateRequest,
    ) -> Result<Vec<u8>, DispatchError> {
        if store.exists(&request.entry_name) {
            return Err(DispatchError::already_exists(&request.entry_name));
        }

        let password = if request.generate {
            self.generator.generate(request.length, request.use_symbols)
        } else {
            request.password.clone()
        };
        let secret = Secret::new(&password, login_metadata(&request.login));
        store
            .set(&request.entry_name, secret.clone())
            .map_err(DispatchError::store_secret)?;

        // The response mirrors what a follow-up getLogin would resolve.
        serialize(&login_response(&request.entry_name, &secret))
    }

    /// `copyToClipboard`: hand the password or a named sub-field over.
    fn copy_to_clipboard<S: Store>(
        &self,
        store: &mut S,
        request: &CopyRequest,
    ) -> Result<Vec<u8>, DispatchError> {
        let secret = get_secret(store, &request.entry)?;
        let value = match request.key.as_deref() {
            Some(key) if !key.is_empty() => {
                secret.field(key).map_err(DispatchError::get_sub_entry)?
            }
            _ => secret.password().to_owned(),
        };
        self.clipboard.copy(&value)?;
        serialize(&StatusResponse::OK)
    }
}

fn login_response(entry: &str, secret: &Secret) -> LoginResponse {
    LoginResponse {
        username: secret.resolve_login(entry),
        password: secret.password().to_owned(),
        login_fields: secret.login_fields(),
    }
}

/// Renders the metadata block for a freshly created secret.
fn login_metadata(login: &str) -> String {
    let mut mapping = Mapping::new();
    mapping.insert("login".into(), login.into());
    let yaml = serde_yaml::to_string(&mapping).unwrap_or_default();
    format!("---\n{yaml}")
}

fn get_secret<S: Store>(store: &S, entry: &str) -> Result<Secret, DispatchError> {
    store.get(entry).map_err(DispatchError::get_secret)
}

fn list_entries<S: Store>(store: &S) -> Result<Vec<String>, DispatchError> {
    store.list().map_err(DispatchError::list_entries)
}

fn serialize<T: Serialize>(response: &T) -> Result<Vec<u8>, DispatchError> {
    serde_json::to_vec(response).map_err(DispatchError::serialize_response)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use crate::clipboard::MemoryClipboard;
    use crate::pwgen::CharClassGenerator;
    use crate::store::MemoryStore;

    use super::*;

    fn version() -> Version {
        Version::parse("1.2.3-test").expect("version should parse")
    }

    fn respond_json(store: &mut MemoryStore, payload: &str) -> serde_json::Value {
        let generator = CharClassGenerator;
        let clipboard = MemoryClipboard::new();
        let dispatcher = Dispatcher::new(version(), &generator, &clipboard);
        let response = dispatcher
            .respond(store, payload.as_bytes())
            .expect("dispatch should succeed");
        serde_json::from_slice(&response).expect("response should be JSON")
    }

    #[test]
    fn login_metadata_round_trips_through_secret_model() {
        let secret = Secret::new("pw", login_metadata("myname"));
        assert_eq!(secret.resolve_login("prefix/stored"), "myname");
    }

    #[test]
    fn login_metadata_handles_delimiter_characters() {
        let secret = Secret::new("pw", login_metadata("name: with#chars"));
        assert_eq!(secret.resolve_login("prefix/stored"), "name: with#chars");
    }

    #[test]
    fn get_version_reports_triple() {
        let mut store = MemoryStore::new();
        assert_eq!(
            respond_json(&mut store, r#"{"type":"getVersion"}"#),
            json!({"version": "1.2.3-test", "major": 1, "minor": 2, "patch": 3})
        );
    }

    #[test]
    fn create_persists_and_echoes_login() {
        let mut store = MemoryStore::new();
        let response = respond_json(
            &mut store,
            r#"{"type":"create","entry_name":"prefix/stored","login":"myname","password":"mypass","length":16,"generate":false,"use_symbols":true}"#,
        );
        assert_eq!(response, json!({"username": "myname", "password": "mypass"}));
        assert!(store.exists("prefix/stored"));
    }

    #[test]
    fn create_conflict_leaves_store_unchanged() {
        let mut store = MemoryStore::new();
        store
            .set("awesomePrefix/overwrite/me", Secret::new("20", ""))
            .expect("seed should succeed");

        let generator = CharClassGenerator;
        let clipboard = MemoryClipboard::new();
        let dispatcher = Dispatcher::new(version(), &generator, &clipboard);
        let error = dispatcher
            .respond(
                &mut store,
                br#"{"type":"create","entry_name":"awesomePrefix/overwrite/me","login":"myname","password":"mypass","length":16,"generate":false,"use_symbols":true}"#,
            )
            .expect_err("expected conflict");
        assert!(error.to_string().contains("already exists"));
        assert_eq!(
            store
                .get("awesomePrefix/overwrite/me")
                .expect("entry should remain")
                .password(),
            "20"
        );
    }

    #[test]
    fn copy_to_clipboard_delivers_password() {
        let mut store = MemoryStore::new();
        store
            .set("foo/bar", Secret::new("20", ""))
            .expect("seed should succeed");

        let generator = CharClassGenerator;
        let clipboard = MemoryClipboard::new();
        let dispatcher = Dispatcher::new(version(), &generator, &clipboard);
        let response = dispatcher
            .respond(&mut store, br#"{"type": "copyToClipboard","entry":"foo/bar"}"#)
            .expect("dispatch should succeed");
        assert_eq!(
            serde_json::from_slice::<serde_json::Value>(&response).expect("json"),
            json!({"status": "ok"})
        );
        assert_eq!(clipboard.contents().as_deref(), Some("20"));
    }

    #[test]
    fn copy_to_clipboard_resolves_sub_key() {
        let mut store = MemoryStore::new();
        store
            .set("yamllogin", Secret::new("thesecret", "---\nlogin: muh"))
            .expect("seed should succeed");

        let generator = CharClassGenerator;
        let clipboard = MemoryClipboard::new();
        let dispatcher = Dispatcher::new(version(), &generator, &clipboard);
        dispatcher
            .respond(
                &mut store,
                br#"{"type": "copyToClipboard","entry":"yamllogin","key":"login"}"#,
            )
            .expect("dispatch should succeed");
        assert_eq!(clipboard.contents().as_deref(), Some("muh"));
    }
}
