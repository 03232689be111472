use anyhow::Context;
use futures::future::join_all;
use serde::Serialize;

use cast_config::CastConfig;
use cast_core::identity::Validation;
use cast_core::input::split_list;
use cast_core::responses::mask_token;
use cast_telegram::TelegramClient;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::ValidateArgs;
use crate::output::output_columns;

/// One row of `tgcast validate` output.
#[derive(Debug, Serialize)]
struct TokenCheck {
    token: String,
    valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    bot_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    first_name: Option<String>,
}

impl TokenCheck {
    fn new(token: &str, validation: Validation) -> Self {
        let identity = validation.identity;
        Self {
            token: mask_token(token),
            valid: validation.valid,
            bot_id: identity.as_ref().map(|i| i.id),
            username: identity.as_ref().map(|i| format!("@{}", i.username)),
            first_name: identity.map(|i| i.first_name),
        }
    }
}

/// Handle `tgcast validate`. Talks to the Bot API directly; no server needed.
pub async fn handle(
    args: &ValidateArgs,
    config: &CastConfig,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let client =
        TelegramClient::from_config(&config.telegram).context("failed to build Bot API client")?;
    let tokens: Vec<String> = args
        .tokens
        .iter()
        .map(String::as_str)
        .flat_map(split_list)
        .collect();

    let results = join_all(tokens.iter().map(|t| client.validate_token(t))).await;
    let rows: Vec<TokenCheck> = tokens
        .iter()
        .zip(results)
        .map(|(token, validation)| TokenCheck::new(token, validation))
        .collect();

    output_columns(
        &rows,
        &["token", "valid", "username", "first_name"],
        flags.format,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use cast_core::identity::BotIdentity;
    use pretty_assertions::assert_eq;

    #[test]
    fn rows_mask_tokens_and_flatten_identity() {
        let row = TokenCheck::new(
            "123:secret",
            Validation::valid(BotIdentity {
                id: 123,
                username: "news_bot".into(),
                first_name: "News".into(),
            }),
        );
        assert_eq!(row.token, "123:…");
        assert_eq!(row.username.as_deref(), Some("@news_bot"));

        let row = TokenCheck::new("junk", Validation::invalid());
        assert!(!row.valid);
        assert_eq!(
            serde_json::to_value(&row).expect("serialize"),
            serde_json::json!({"token": "junk…", "valid": false})
        );
    }
}
