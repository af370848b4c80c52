mod config;
pub use config::cmd_config;

use std::collections::VecDeque;
use std::path::PathBuf;

use crate::cli::commands::*;
use crate::cli::output::*;
use crate::io::api::{HttpApi, IdeaApi};
use crate::io::config_io;
use crate::io::dispatch::perform;
use crate::io::logging;
use crate::model::{Idea, IdeaId};
use crate::ops::form::validate;
use crate::ops::{Composer, Effect, Origin, Reply, effects_of};

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

pub fn dispatch(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let json = cli.json;
    let config_path = resolve_config_path(cli.config)?;

    let cmd = match cli.command {
        Some(cmd) => cmd,
        None => {
            // No subcommand → launch TUI, logging to a file
            let config = config_io::load_config(&config_path, cli.api_url.as_deref())?;
            let log_path = config.log.file.clone().or_else(config_io::default_log_path);
            if let Some(path) = log_path {
                logging::init_file(&config.log, &path);
            }
            return crate::tui::run(config);
        }
    };

    logging::init_stderr();
    let config = config_io::load_config(&config_path, cli.api_url.as_deref())?;

    let api = match cmd {
        Commands::Config(args) => return cmd_config(args, &config, &config_path, json),
        _ => HttpApi::new(&config.api)?,
    };
    match cmd {
        Commands::List => cmd_list(&api, json),
        Commands::Show(args) => cmd_show(&api, args.id, json),
        Commands::Add(args) => cmd_add(&api, args, json),
        Commands::Edit(args) => cmd_edit(&api, args, json),
        Commands::Delete(args) => cmd_delete(&api, args.id),
        Commands::Expand(args) => cmd_expand(&api, args.id, json),
        Commands::Chat(args) => cmd_chat(&api, args, json),
        Commands::Config(args) => cmd_config(args, &config, &config_path, json),
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn resolve_config_path(explicit: Option<PathBuf>) -> Result<PathBuf, Box<dyn std::error::Error>> {
    match explicit {
        Some(path) => Ok(path),
        None => Ok(config_io::default_config_path()?),
    }
}

/// The server has no single-idea endpoint, so look it up in the list
fn fetch_idea(api: &dyn IdeaApi, id: IdeaId) -> Result<Idea, Box<dyn std::error::Error>> {
    api.list()?
        .into_iter()
        .find(|i| i.id == id)
        .ok_or_else(|| format!("idea not found: {}", id).into())
}

/// What happened while settling a batch of effects
#[derive(Default)]
struct Settled {
    alerts: Vec<String>,
    performed: Vec<Origin>,
}

/// Perform calls one after another until the composer stops asking for
/// more.
fn settle(composer: &mut Composer, api: &dyn IdeaApi, effects: Vec<Effect>) -> Settled {
    let mut queue: VecDeque<Effect> = effects.into();
    let mut settled = Settled::default();
    while let Some(effect) = queue.pop_front() {
        match effect {
            Effect::Call(call) => {
                settled.performed.push(call.origin);
                let result = perform(api, call.request);
                queue.extend(composer.apply(Reply {
                    origin: call.origin,
                    result,
                }));
            }
            Effect::Alert(message) => settled.alerts.push(message),
            Effect::Saved | Effect::ScrollChat => {}
        }
    }
    settled
}

// ---------------------------------------------------------------------------
// Read commands
// ---------------------------------------------------------------------------

fn cmd_list(api: &dyn IdeaApi, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let ideas = api.list()?;
    if json {
        let items: Vec<IdeaSummaryJson> = ideas.iter().map(idea_to_summary).collect();
        println!("{}", serde_json::to_string_pretty(&items)?);
    } else {
        if ideas.is_empty() {
            println!("(no ideas yet)");
        }
        for idea in &ideas {
            println!("{}", format_idea_row(idea));
        }
    }
    Ok(())
}

fn cmd_show(api: &dyn IdeaApi, id: IdeaId, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let idea = fetch_idea(api, id)?;
    if json {
        println!("{}", serde_json::to_string_pretty(&idea)?);
    } else {
        print!("{}", format_idea_detail(&idea));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Write commands
// ---------------------------------------------------------------------------

fn cmd_add(api: &dyn IdeaApi, args: AddArgs, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let (title, content) =
        validate(&args.title, &args.content).ok_or("title and content must not be empty")?;
    let idea = api.create(&title, &content)?;
    tracing::info!(id = idea.id, "idea added");
    if json {
        println!("{}", serde_json::to_string_pretty(&idea)?);
    } else {
        println!("added #{}", idea.id);
    }
    Ok(())
}

fn cmd_edit(
    api: &dyn IdeaApi,
    args: EditArgs,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    if args.title.is_none() && args.content.is_none() {
        return Err("nothing to change: pass --title and/or --content".into());
    }
    let current = fetch_idea(api, args.id)?;
    let title = args.title.unwrap_or(current.title);
    let content = args.content.unwrap_or(current.content);
    let (title, content) =
        validate(&title, &content).ok_or("title and content must not be empty")?;
    let idea = api.update(args.id, &title, &content)?;
    if json {
        println!("{}", serde_json::to_string_pretty(&idea)?);
    } else {
        println!("updated #{}", idea.id);
    }
    Ok(())
}

fn cmd_delete(api: &dyn IdeaApi, id: IdeaId) -> Result<(), Box<dyn std::error::Error>> {
    api.delete(id)?;
    println!("deleted #{}", id);
    Ok(())
}

// ---------------------------------------------------------------------------
// AI commands
// ---------------------------------------------------------------------------

fn cmd_expand(api: &dyn IdeaApi, id: IdeaId, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let expansion = api.expand(id)?;
    if json {
        println!("{}", serde_json::to_string_pretty(&expansion)?);
    } else {
        println!("{}", expansion.expanded);
    }
    Ok(())
}

/// Run a whole session non-interactively: open, optionally expand, send
/// each message, then close (which summarizes unless `--no-save`).
fn cmd_chat(
    api: &dyn IdeaApi,
    args: ChatArgs,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut composer = Composer::new();
    let effects = composer.start();
    if let Some(alert) = settle(&mut composer, api, effects).alerts.pop() {
        return Err(alert.into());
    }
    if !composer.list.open_idea(args.id) {
        return Err(format!("idea not found: {}", args.id).into());
    }

    let mut printed = 0;
    let mut show_new = |composer: &Composer| {
        if json {
            return;
        }
        if let Some(session) = composer.list.session() {
            for message in &session.chat()[printed..] {
                println!("{}", format_chat_message(message));
            }
            printed = session.chat().len();
        }
    };

    if args.expand {
        let effects = effects_of(composer.list.start_expansion());
        if let Some(alert) = settle(&mut composer, api, effects).alerts.pop() {
            return Err(alert.into());
        }
        show_new(&composer);
    }

    for message in &args.messages {
        if let Some(session) = composer.list.session_mut() {
            session.chat_input = message.clone();
        }
        let effects = effects_of(composer.list.send_user_message());
        for alert in settle(&mut composer, api, effects).alerts {
            eprintln!("warning: {}", alert);
        }
        show_new(&composer);
    }

    let transcript = composer
        .list
        .session()
        .map(|s| s.chat().to_vec())
        .unwrap_or_default();

    let saved = if args.no_save || transcript.is_empty() {
        false
    } else {
        let effects = effects_of(composer.list.close_idea());
        // A successful summary is followed by a refresh
        settle(&mut composer, api, effects)
            .performed
            .iter()
            .any(|origin| matches!(origin, Origin::Refresh(_)))
    };

    if json {
        let out = ChatJson {
            id: args.id,
            transcript,
            saved,
        };
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else if saved {
        println!("conversation saved to #{}", args.id);
    }
    Ok(())
}
