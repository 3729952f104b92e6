//! Outbound request records for the chat completions endpoint.
//!
//! Every record validates its own invariants at construction time; a value
//! that exists is a value that is well-formed. Unknown fields are kept in a
//! flattened `extra` map and round-trip on serialization.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

use crate::{Error, Result};

/// Message role. Only these three roles are accepted by the endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::System => "system",
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "system" => Ok(Role::System),
            "user" => Ok(Role::User),
            "assistant" => Ok(Role::Assistant),
            other => Err(Error::validation(format!(
                "role must be one of: system, user, assistant (got {other:?})"
            ))),
        }
    }
}

/// Message content: either a plain string or an ordered list of parts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MessageContent {
    Text(String),
    Parts(Vec<ContentPart>),
}

impl MessageContent {
    pub fn text(text: impl Into<String>) -> Self {
        MessageContent::Text(text.into())
    }

    pub fn parts(parts: Vec<ContentPart>) -> Self {
        MessageContent::Parts(parts)
    }
}

impl From<&str> for MessageContent {
    fn from(text: &str) -> Self {
        MessageContent::Text(text.to_string())
    }
}

impl From<String> for MessageContent {
    fn from(text: String) -> Self {
        MessageContent::Text(text)
    }
}

/// One unit of multi-modal content within a message.
///
/// Invariant: `text` is present if and only if the part type is `"text"`.
/// Fields are private so that no construction path, including
/// deserialization, can observe a part that violates it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ContentPartWire")]
pub struct ContentPart {
    #[serde(rename = "type")]
    kind: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    image_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    input_audio: Option<String>,
    #[serde(flatten)]
    extra: Map<String, Value>,
}

/// Raw wire shape; promoted to [`ContentPart`] only if the invariant holds.
#[derive(Deserialize)]
struct ContentPartWire {
    #[serde(rename = "type")]
    kind: String,
    text: Option<String>,
    image_url: Option<String>,
    input_audio: Option<String>,
    #[serde(flatten)]
    extra: Map<String, Value>,
}

impl TryFrom<ContentPartWire> for ContentPart {
    type Error = Error;

    fn try_from(wire: ContentPartWire) -> Result<Self> {
        let part = ContentPart {
            kind: wire.kind,
            text: wire.text,
            image_url: wire.image_url,
            input_audio: wire.input_audio,
            extra: wire.extra,
        };
        part.check_text_pairing()?;
        Ok(part)
    }
}

impl ContentPart {
    /// Construct a part from a type discriminator and an optional text
    /// payload, enforcing the text/type pairing invariant.
    pub fn new(kind: impl Into<String>, text: Option<String>) -> Result<Self> {
        let part = Self {
            kind: kind.into(),
            text,
            image_url: None,
            input_audio: None,
            extra: Map::new(),
        };
        part.check_text_pairing()?;
        Ok(part)
    }

    /// A `"text"` part.
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            kind: "text".to_string(),
            text: Some(text.into()),
            image_url: None,
            input_audio: None,
            extra: Map::new(),
        }
    }

    /// An `"image_url"` part.
    pub fn image_url(url: impl Into<String>) -> Self {
        Self {
            kind: "image_url".to_string(),
            text: None,
            image_url: Some(url.into()),
            input_audio: None,
            extra: Map::new(),
        }
    }

    /// An `"input_audio"` part.
    pub fn input_audio(data: impl Into<String>) -> Self {
        Self {
            kind: "input_audio".to_string(),
            text: None,
            image_url: None,
            input_audio: Some(data.into()),
            extra: Map::new(),
        }
    }

    /// Attach an image payload to a non-text part built via [`ContentPart::new`].
    pub fn with_image_url(mut self, url: impl Into<String>) -> Self {
        self.image_url = Some(url.into());
        self
    }

    /// Attach an audio payload to a non-text part built via [`ContentPart::new`].
    pub fn with_input_audio(mut self, data: impl Into<String>) -> Self {
        self.input_audio = Some(data.into());
        self
    }

    /// Attach an additional field that is passed through to the wire as-is.
    pub fn with_extra(mut self, key: impl Into<String>, value: Value) -> Self {
        self.extra.insert(key.into(), value);
        self
    }

    pub fn kind(&self) -> &str {
        &self.kind
    }

    pub fn text_payload(&self) -> Option<&str> {
        self.text.as_deref()
    }

    pub fn image_url_payload(&self) -> Option<&str> {
        self.image_url.as_deref()
    }

    pub fn input_audio_payload(&self) -> Option<&str> {
        self.input_audio.as_deref()
    }

    pub fn extra(&self) -> &Map<String, Value> {
        &self.extra
    }

    fn check_text_pairing(&self) -> Result<()> {
        if self.kind == "text" && self.text.is_none() {
            return Err(Error::validation(
                "text must be provided when content part type is \"text\"",
            ));
        }
        if self.kind != "text" && self.text.is_some() {
            return Err(Error::validation(format!(
                "text cannot be provided when content part type is {:?}",
                self.kind
            )));
        }
        Ok(())
    }
}

/// One turn in a conversation.
///
/// The role is an enum, so an invalid role is unrepresentable here; input
/// arriving as a string goes through [`Message::from_role`] or
/// [`Role::from_str`], which reject anything outside the allowed set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: MessageContent,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Message {
    pub fn system(text: impl Into<String>) -> Self {
        Self::with_content(Role::System, MessageContent::Text(text.into()))
    }

    pub fn user(text: impl Into<String>) -> Self {
        Self::with_content(Role::User, MessageContent::Text(text.into()))
    }

    pub fn assistant(text: impl Into<String>) -> Self {
        Self::with_content(Role::Assistant, MessageContent::Text(text.into()))
    }

    pub fn with_content(role: Role, content: MessageContent) -> Self {
        Self {
            role,
            content,
            name: None,
            extra: Map::new(),
        }
    }

    /// Build a message from a dynamically supplied role string.
    pub fn from_role(role: &str, content: impl Into<MessageContent>) -> Result<Self> {
        Ok(Self::with_content(role.parse()?, content.into()))
    }

    /// Optional label for the message author.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Attach an additional field that is passed through to the wire as-is.
    pub fn with_extra(mut self, key: impl Into<String>, value: Value) -> Self {
        self.extra.insert(key.into(), value);
        self
    }
}

/// Scoring weights for the server-side model selector. Opaque to the client
/// beyond shape.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ModelWeights {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_latency: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_latency: Option<f64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Advanced model-selection directive, an alternative to naming a model
/// outright. Unrecognized fields pass through unrejected.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ModelParams {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub llms: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exclude_llms: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weights: Option<ModelWeights>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub imsn: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_input_cost: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_output_cost: Option<f64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ModelParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Candidate models the selector may route to.
    pub fn llms(mut self, llms: Vec<String>) -> Self {
        self.llms = Some(llms);
        self
    }

    /// Models the selector must not route to.
    pub fn exclude_llms(mut self, llms: Vec<String>) -> Self {
        self.exclude_llms = Some(llms);
        self
    }

    pub fn weights(mut self, weights: ModelWeights) -> Self {
        self.weights = Some(weights);
        self
    }

    pub fn imsn(mut self, imsn: i64) -> Self {
        self.imsn = Some(imsn);
        self
    }

    pub fn max_input_cost(mut self, cost: f64) -> Self {
        self.max_input_cost = Some(cost);
        self
    }

    pub fn max_output_cost(mut self, cost: f64) -> Self {
        self.max_output_cost = Some(cost);
        self
    }
}

/// Model argument for a request: a plain model name or a full
/// [`ModelParams`] directive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ModelSelector {
    Name(String),
    Params(ModelParams),
}

impl From<&str> for ModelSelector {
    fn from(name: &str) -> Self {
        ModelSelector::Name(name.to_string())
    }
}

impl From<String> for ModelSelector {
    fn from(name: String) -> Self {
        ModelSelector::Name(name)
    }
}

impl From<ModelParams> for ModelSelector {
    fn from(params: ModelParams) -> Self {
        ModelSelector::Params(params)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_role_parses_allowed_values() {
        assert_eq!("system".parse::<Role>().unwrap(), Role::System);
        assert_eq!("user".parse::<Role>().unwrap(), Role::User);
        assert_eq!("assistant".parse::<Role>().unwrap(), Role::Assistant);
    }

    #[test]
    fn test_role_rejects_unknown_values() {
        for role in ["tool", "function", "SYSTEM", "", "moderator"] {
            let err = role.parse::<Role>().unwrap_err();
            assert!(matches!(err, Error::Validation { .. }), "role {role:?}");
        }
    }

    #[test]
    fn test_message_from_role_rejects_unknown_role() {
        let err = Message::from_role("tool", "hi").unwrap_err();
        assert!(matches!(err, Error::Validation { .. }));
    }

    #[test]
    fn test_message_deserialization_rejects_unknown_role() {
        let result: std::result::Result<Message, _> =
            serde_json::from_value(json!({"role": "tool", "content": "hi"}));
        assert!(result.is_err());
    }

    #[test]
    fn test_content_part_text_requires_text() {
        let err = ContentPart::new("text", None).unwrap_err();
        assert!(matches!(err, Error::Validation { .. }));
    }

    #[test]
    fn test_content_part_text_with_text_succeeds() {
        let part = ContentPart::new("text", Some("x".to_string())).unwrap();
        assert_eq!(part.kind(), "text");
        assert_eq!(part.text_payload(), Some("x"));
    }

    #[test]
    fn test_content_part_non_text_rejects_text() {
        let err = ContentPart::new("image_url", Some("x".to_string())).unwrap_err();
        assert!(matches!(err, Error::Validation { .. }));
    }

    #[test]
    fn test_content_part_non_text_without_text_succeeds() {
        let part = ContentPart::new("image_url", None).unwrap();
        assert_eq!(part.kind(), "image_url");
        assert_eq!(part.text_payload(), None);
    }

    #[test]
    fn test_content_part_deserialization_enforces_pairing() {
        let result: std::result::Result<ContentPart, _> =
            serde_json::from_value(json!({"type": "text"}));
        assert!(result.is_err());

        let result: std::result::Result<ContentPart, _> =
            serde_json::from_value(json!({"type": "image_url", "text": "x"}));
        assert!(result.is_err());
    }

    #[test]
    fn test_message_serializes_plain_text_content() {
        let message = Message::user("Hello");
        let value = serde_json::to_value(&message).unwrap();
        assert_eq!(value, json!({"role": "user", "content": "Hello"}));
    }

    #[test]
    fn test_message_serializes_multi_part_content() {
        let message = Message::with_content(
            Role::User,
            MessageContent::parts(vec![
                ContentPart::text("describe this"),
                ContentPart::image_url("https://example.com/cat.png"),
            ]),
        );
        let value = serde_json::to_value(&message).unwrap();
        assert_eq!(
            value,
            json!({
                "role": "user",
                "content": [
                    {"type": "text", "text": "describe this"},
                    {"type": "image_url", "image_url": "https://example.com/cat.png"},
                ]
            })
        );
    }

    #[test]
    fn test_message_extra_fields_round_trip() {
        let message = Message::user("hi").with_extra("cache_hint", json!("aggressive"));
        let value = serde_json::to_value(&message).unwrap();
        assert_eq!(value["cache_hint"], json!("aggressive"));

        let back: Message = serde_json::from_value(value).unwrap();
        assert_eq!(back.extra.get("cache_hint"), Some(&json!("aggressive")));
    }

    #[test]
    fn test_model_selector_serializes_untagged() {
        let by_name = ModelSelector::from("gpt-4o");
        assert_eq!(serde_json::to_value(&by_name).unwrap(), json!("gpt-4o"));

        let by_params = ModelSelector::from(
            ModelParams::new()
                .llms(vec!["a".to_string(), "b".to_string()])
                .imsn(3),
        );
        assert_eq!(
            serde_json::to_value(&by_params).unwrap(),
            json!({"llms": ["a", "b"], "imsn": 3})
        );
    }

    #[test]
    fn test_model_params_unknown_fields_pass_through() {
        let params: ModelParams =
            serde_json::from_value(json!({"llms": ["a"], "future_knob": true})).unwrap();
        assert_eq!(params.extra.get("future_knob"), Some(&json!(true)));
        let value = serde_json::to_value(&params).unwrap();
        assert_eq!(value["future_knob"], json!(true));
    }
}
