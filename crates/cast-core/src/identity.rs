use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Sender identity behind a bot token, as reported by `getMe`.
///
/// Produced by `cast-telegram`, displayed by the server and CLI.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct BotIdentity {
    /// Numeric bot user id.
    pub id: i64,
    /// Bot handle without the leading `@`.
    pub username: String,
    /// Display name.
    pub first_name: String,
}

/// Outcome of validating a single token.
///
/// `identity` is only present when `valid` is true.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Validation {
    pub valid: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub identity: Option<BotIdentity>,
}

impl Validation {
    #[must_use]
    pub const fn invalid() -> Self {
        Self {
            valid: false,
            identity: None,
        }
    }

    #[must_use]
    pub const fn valid(identity: BotIdentity) -> Self {
        Self {
            valid: true,
            identity: Some(identity),
        }
    }
}
