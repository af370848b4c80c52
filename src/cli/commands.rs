use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::model::IdeaId;

#[derive(Parser)]
#[command(
    name = "idea",
    about = concat!(
        "ideabox v",
        env!("CARGO_PKG_VERSION"),
        " - jot ideas down, let the AI grow them"
    ),
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Idea server base URL (overrides config and IDEABOX_API_URL)
    #[arg(short = 'u', long = "api-url", global = true)]
    pub api_url: Option<String>,

    /// Config file (default: <config dir>/ideabox/config.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List ideas with a short preview
    List,
    /// Show one idea in full
    Show(IdArgs),
    /// Add a new idea
    Add(AddArgs),
    /// Change an idea's title or content
    Edit(EditArgs),
    /// Permanently delete an idea
    Delete(IdArgs),
    /// Ask the AI to expand an idea
    Expand(IdArgs),
    /// Chat with the AI about an idea, then fold the conversation into it
    Chat(ChatArgs),
    /// Show the effective configuration, or change it
    Config(ConfigArgs),
}

#[derive(Args)]
pub struct IdArgs {
    /// Idea ID
    pub id: IdeaId,
}

#[derive(Args)]
pub struct AddArgs {
    /// Idea title
    pub title: String,
    /// Idea content
    pub content: String,
}

#[derive(Args)]
pub struct EditArgs {
    /// Idea ID
    pub id: IdeaId,
    /// New title (default: keep current)
    #[arg(long)]
    pub title: Option<String>,
    /// New content (default: keep current)
    #[arg(long)]
    pub content: Option<String>,
}

#[derive(Args)]
pub struct ChatArgs {
    /// Idea ID
    pub id: IdeaId,
    /// Messages to send, in order
    #[arg(required = true)]
    pub messages: Vec<String>,
    /// Start with a fresh AI expansion before the first message
    #[arg(long)]
    pub expand: bool,
    /// Do not summarize the conversation into the idea afterwards
    #[arg(long)]
    pub no_save: bool,
}

#[derive(Args)]
pub struct ConfigArgs {
    /// Persist a new idea server URL to the config file
    #[arg(long, value_name = "URL")]
    pub set_api_url: Option<String>,
}
