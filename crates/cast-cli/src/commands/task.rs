use cast_config::CastConfig;
use cast_core::input::NewTask;

use crate::bootstrap::server_url;
use crate::cli::GlobalFlags;
use crate::cli::subcommands::TaskCommands;
use crate::client::ApiClient;
use crate::output::{output, output_columns};

const LIST_COLUMNS: &[&str] = &[
    "id",
    "name",
    "running",
    "token_count",
    "chat_ids",
    "sent_count",
    "last_sent",
];

/// Handle `tgcast task`.
pub async fn handle(
    action: &TaskCommands,
    config: &CastConfig,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let client = ApiClient::new(server_url(flags, config))?;
    match action {
        TaskCommands::Create {
            name,
            tokens,
            chats,
            message,
            photo,
            delay,
            typing,
        } => {
            let request = NewTask {
                name: name.clone(),
                tokens: tokens.join(","),
                chat_ids: chats.join(","),
                message: message.clone(),
                photo: photo.clone(),
                delay: *delay,
                typing: *typing,
            };
            let ack = client.create_task(&request).await?;
            output(&ack.task, flags.format)
        }
        TaskCommands::List => {
            let tasks = client.list_tasks().await?;
            output_columns(&tasks, LIST_COLUMNS, flags.format)
        }
        TaskCommands::Get { id } => output(&client.get_task(id).await?, flags.format),
        TaskCommands::Start { id } => output(&client.start_task(id).await?, flags.format),
        TaskCommands::Stop { id } => output(&client.stop_task(id).await?, flags.format),
        TaskCommands::Delete { id } => output(&client.delete_task(id).await?, flags.format),
    }
}
