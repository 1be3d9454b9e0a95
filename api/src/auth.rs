use crate::client::{ApiError, ApiResult};
use crate::wire::{Envelope, error_message};
use crate::{AuthStatus, User};
use log::debug;
use reqwest::cookie::Jar;
use reqwest::header::ACCEPT;
use reqwest::{Client, Method, Url};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use std::{fs, io};

const AUTHENTICATED_KEY: &str = "auth_authenticated";
const USER_KEY: &str = "auth_user";

/// Session lifecycle against the backend's cookie session.
#[derive(Debug, Clone)]
pub struct AuthClient {
    base_url: String,
    client: Client,
    jar: Arc<Jar>,
    timeout: Duration,
}

impl AuthClient {
    pub fn new(base_url: impl Into<String>, jar: Arc<Jar>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_owned(),
            client: Client::builder()
                .cookie_provider(jar.clone())
                .build()
                .unwrap_or_default(),
            jar,
            timeout: Duration::from_secs(10),
        }
    }

    /// Where the user has to go to sign in with Google. A full navigation,
    /// not an API call.
    pub fn login_url(&self) -> String {
        format!("{}/auth/google", self.base_url)
    }

    /// Seed a session cookie obtained elsewhere (e.g. copied from a browser).
    pub fn import_session_cookie(&self, cookie: &str) -> ApiResult<()> {
        let url = Url::parse(&self.base_url)
            .map_err(|e| ApiError::Other(format!("invalid base url {}: {e}", self.base_url)))?;
        self.jar.add_cookie_str(cookie, &url);
        Ok(())
    }

    pub async fn auth_status(&self) -> ApiResult<AuthStatus> {
        let envelope: Envelope<AuthStatus> = self.send(Method::GET, "/auth/status").await?;
        Ok(envelope.data.unwrap_or_default())
    }

    pub async fn current_user(&self) -> ApiResult<User> {
        let envelope: Envelope<User> = self.send(Method::GET, "/auth/me").await?;
        envelope
            .data
            .ok_or_else(|| ApiError::Other(envelope.message.unwrap_or_else(|| "no user in session".into())))
    }

    pub async fn logout(&self) -> ApiResult<()> {
        let _: Envelope<Value> = self.send(Method::POST, "/auth/logout").await?;
        Ok(())
    }

    async fn send<T: DeserializeOwned>(&self, method: Method, path: &str) -> ApiResult<T> {
        let url = format!("{}{path}", self.base_url);
        debug!("{method} {url}");
        let response = self
            .client
            .request(method, &url)
            .header(ACCEPT, "application/json")
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| ApiError::Network { url: url.clone(), message: format!("Unable to reach the server: {e}") })?;

        let status = response.status();
        if !status.is_success() {
            let details = response
                .json::<Value>()
                .await
                .unwrap_or_else(|_| Value::Object(Default::default()));
            return Err(ApiError::Api {
                status: status.as_u16(),
                message: error_message(&details, status.as_u16()),
                details,
            });
        }

        response
            .json::<T>()
            .await
            .map_err(|e| ApiError::Parsing { url, message: e.to_string() })
    }
}

/// Local mirror of the last known auth state, kept as string key/value pairs
/// in a JSON file. Only a startup hint: the server status check is the truth.
#[derive(Debug, Clone)]
pub struct SessionMirror {
    path: PathBuf,
}

impl SessionMirror {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn set_auth_state(&self, authenticated: bool, user: Option<&User>) -> io::Result<()> {
        let mut entries = Map::new();
        entries.insert(AUTHENTICATED_KEY.into(), Value::String(authenticated.to_string()));
        if let Some(user) = user {
            let raw = serde_json::to_string(user).map_err(io::Error::other)?;
            entries.insert(USER_KEY.into(), Value::String(raw));
        }
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let payload = serde_json::to_string_pretty(&Value::Object(entries)).map_err(io::Error::other)?;
        fs::write(&self.path, payload)
    }

    pub fn stored_user(&self) -> Option<User> {
        let raw = self.read_entries().remove(USER_KEY)?;
        serde_json::from_str(raw.as_str()?).ok()
    }

    pub fn is_authenticated(&self) -> bool {
        self.read_entries()
            .get(AUTHENTICATED_KEY)
            .and_then(Value::as_str)
            == Some("true")
    }

    pub fn clear_auth_state(&self) -> io::Result<()> {
        match fs::remove_file(&self.path) {
            Err(e) if e.kind() != io::ErrorKind::NotFound => Err(e),
            _ => Ok(()),
        }
    }

    /// Missing or corrupt files read as empty.
    fn read_entries(&self) -> Map<String, Value> {
        fs::read_to_string(&self.path)
            .ok()
            .and_then(|content| serde_json::from_str::<Map<String, Value>>(&content).ok())
            .unwrap_or_default()
    }
}
