//! Client construction and the chat-completion entry point.
//!
//! A [`Client`] is immutable after construction: the API key, base URL, and
//! client-identifier string are resolved once in [`ClientBuilder::build`] and
//! shared freely across threads afterwards. Each call performs exactly one
//! request/response cycle; there are no retries and no silent recovery.

use std::env;
use std::path::PathBuf;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use serde_json::{Map, Value};
use tracing::debug;
use uuid::Uuid;

use crate::transport::HttpTransport;
use crate::types::request::{Message, ModelSelector};
use crate::types::response::ChatCompletion;
use crate::utils::version;
use crate::{Error, Result};

/// Production endpoint for the Infuzu API.
pub const API_BASE_URL: &str = "https://chat.infuzu.com/api";

/// Environment variable supplying the default API key.
pub const API_KEY_ENV: &str = "INFUZU_API_KEY";

const CHAT_COMPLETIONS_PATH: &str = "/v1/chat/completions";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(600);

/// Model name reported when the server omits one.
const FALLBACK_MODEL: &str = "infuzu-ims";

const COMPLETION_OBJECT: &str = "chat.completion";

/// Builder for creating clients with custom configuration.
///
/// Keep this surface area small and predictable.
pub struct ClientBuilder {
    api_key: Option<String>,
    /// Override base URL (primarily for testing with mock servers)
    base_url_override: Option<String>,
    version_file: Option<PathBuf>,
}

impl ClientBuilder {
    pub fn new() -> Self {
        Self {
            api_key: None,
            base_url_override: None,
            version_file: None,
        }
    }

    /// Set the API key explicitly instead of reading `INFUZU_API_KEY`.
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Override the base URL.
    ///
    /// This is primarily for testing with mock servers. In production the
    /// fixed [`API_BASE_URL`] applies.
    pub fn base_url_override(mut self, base_url: impl Into<String>) -> Self {
        self.base_url_override = Some(base_url.into());
        self
    }

    /// Read the client version from this file instead of the default
    /// `.package-version`.
    pub fn version_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.version_file = Some(path.into());
        self
    }

    /// Build the client.
    ///
    /// Resolves the API key (explicit argument, then environment) and reads
    /// the version file; both failures are configuration errors raised before
    /// any network I/O.
    pub fn build(self) -> Result<Client> {
        let api_key = match self.api_key {
            Some(key) => key,
            None => env::var(API_KEY_ENV).map_err(|_| {
                Error::configuration(format!(
                    "API key not provided and {API_KEY_ENV} environment variable not set"
                ))
            })?,
        };

        let version = match &self.version_file {
            Some(path) => version::read_version_file(path)?,
            None => version::client_version()?,
        };

        let base_url = self
            .base_url_override
            .unwrap_or_else(|| API_BASE_URL.to_string());

        Ok(Client {
            transport: HttpTransport::new(base_url, user_agent(&version), REQUEST_TIMEOUT),
            api_key,
        })
    }
}

impl Default for ClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Client for the Infuzu chat completions API.
pub struct Client {
    transport: HttpTransport,
    api_key: String,
}

impl Client {
    pub fn builder() -> ClientBuilder {
        ClientBuilder::new()
    }

    /// Build a client with default configuration (key from the environment,
    /// production base URL).
    pub fn new() -> Result<Self> {
        Self::builder().build()
    }

    /// Create a chat completion from an ordered list of messages.
    ///
    /// When `model` is `None` it is omitted from the payload and the server
    /// applies its own default. On success the response is normalized:
    /// missing `id`, `created`, `model`, and `object` fields are filled with
    /// deterministic client-side defaults before schema validation. Explicit
    /// server values are never overwritten.
    pub fn create_chat_completion(
        &self,
        messages: &[Message],
        model: Option<&ModelSelector>,
    ) -> Result<ChatCompletion> {
        let payload = build_payload(messages, model)?;

        debug!(
            message_count = messages.len(),
            has_model = model.is_some(),
            "creating chat completion"
        );
        let mut body = self
            .transport
            .post_json(CHAT_COMPLETIONS_PATH, &self.api_key, &payload)?;

        fill_response_defaults(&mut body);
        serde_json::from_value(body)
            .map_err(|e| Error::validation(format!("malformed chat completion response: {e}")))
    }
}

/// Create a chat completion with a throwaway default client.
///
/// `api_key` falls back to the `INFUZU_API_KEY` environment variable; if
/// neither is available the call fails with [`Error::Configuration`] before
/// any network I/O. `model` may name a model outright or carry a full
/// [`ModelParams`](crate::types::request::ModelParams) directive; when `None`
/// the server picks its own default.
pub fn create_chat_completion(
    messages: &[Message],
    api_key: Option<&str>,
    model: Option<ModelSelector>,
) -> Result<ChatCompletion> {
    let mut builder = Client::builder();
    if let Some(key) = api_key {
        builder = builder.api_key(key);
    }
    builder.build()?.create_chat_completion(messages, model.as_ref())
}

fn build_payload(messages: &[Message], model: Option<&ModelSelector>) -> Result<Value> {
    let mut payload = Map::new();
    payload.insert(
        "messages".to_string(),
        serde_json::to_value(messages)
            .map_err(|e| Error::validation(format!("failed to serialize messages: {e}")))?,
    );
    if let Some(model) = model {
        payload.insert(
            "model".to_string(),
            serde_json::to_value(model)
                .map_err(|e| Error::validation(format!("failed to serialize model: {e}")))?,
        );
    }
    Ok(Value::Object(payload))
}

/// Fill deterministic defaults for metadata the server may omit. Values the
/// server did supply are left untouched.
fn fill_response_defaults(body: &mut Value) {
    // A non-object body is left alone; schema validation rejects it next.
    let Some(map) = body.as_object_mut() else {
        return;
    };

    map.entry("id")
        .or_insert_with(|| Value::String(format!("chatcmpl-{}", Uuid::new_v4())));
    map.entry("created").or_insert_with(|| unix_now().into());
    map.entry("model")
        .or_insert_with(|| Value::String(FALLBACK_MODEL.to_string()));
    map.entry("object")
        .or_insert_with(|| Value::String(COMPLETION_OBJECT.to_string()));
}

fn unix_now() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or(0)
}

/// Descriptive client identifier: library version, toolchain version, HTTP
/// client version, and platform.
fn user_agent(version: &str) -> String {
    format!(
        "infuzu-rust/{} (rust {}; reqwest/{}; {} {})",
        version,
        env!("INFUZU_RUSTC_VERSION"),
        env!("INFUZU_REQWEST_VERSION"),
        std::env::consts::OS,
        std::env::consts::ARCH,
    )
}
