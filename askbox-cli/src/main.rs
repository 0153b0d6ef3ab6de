use anyhow::{bail, Context, Result};
use askbox_core::{ChatSession, ConversationStore, KnowledgeBase, Resolver, SessionOptions};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::time::Duration;

mod chat;
mod config;
mod logging;
mod state;
mod store;
mod typing;

use config::Config;
use store::FileStore;

#[derive(Parser, Debug)]
#[command(
    name = "askbox",
    version,
    long_version = concat!(env!("CARGO_PKG_VERSION"), " (", env!("ASKBOX_BUILD_SHA"), ")"),
    about = "Rule-based help desk: GST calculator, algorithm explainer, FAQ"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Resolve one message and print the reply
    Ask {
        /// Message text (quote it or pass several words)
        #[arg(required = true)]
        text: Vec<String>,

        /// Print the reply (text, confidence, source) as JSON
        #[arg(long)]
        json: bool,

        /// Do not record this exchange in the conversation history
        #[arg(long)]
        no_history: bool,
    },

    /// Interactive chat screen
    Chat,

    /// Knowledge-base administration
    Kb {
        #[command(subcommand)]
        command: KbCommand,
    },

    /// Conversation history
    History {
        #[command(subcommand)]
        command: HistoryCommand,
    },

    /// Configuration file (~/.askbox/config.toml)
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

#[derive(Subcommand, Debug)]
enum KbCommand {
    /// Print the current knowledge base as pretty JSON
    Export {
        /// Write to a file instead of stdout
        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// Validate a JSON array of entries and make it the knowledge base
    Import { file: PathBuf },

    /// Drop the imported knowledge base and go back to the built-in entries
    Reset,
}

#[derive(Subcommand, Debug)]
enum HistoryCommand {
    /// Print the stored conversation
    Show,

    /// Erase the stored conversation
    Clear,
}

#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Write a default config if none exists
    Init,

    /// Print the effective config
    Show,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let cfg = config::load_config()?;

    let log_file = match cli.command {
        Command::Chat => Some(state::log_path()?),
        _ => None,
    };
    logging::init(&cfg.logging.level, log_file.as_deref())?;

    match cli.command {
        Command::Ask {
            text,
            json,
            no_history,
        } => {
            ask(&cfg, &text.join(" "), json, !no_history)?;
        }

        Command::Chat => {
            let mut session = open_session(&cfg, cfg.chat.persist_history, cfg.chat.welcome)?;
            chat::run_chat(&mut session, Duration::from_millis(cfg.chat.typing_delay_ms))?;
        }

        Command::Kb { command } => match command {
            KbCommand::Export { out } => {
                let json = load_knowledge(&cfg)?
                    .export()
                    .context("export knowledge base")?;
                match out {
                    Some(path) => {
                        std::fs::write(&path, json)
                            .with_context(|| format!("write {}", path.display()))?;
                        println!("Wrote {}", path.display());
                    }
                    None => println!("{json}"),
                }
            }
            KbCommand::Import { file } => {
                import_knowledge(&cfg, &file)?;
            }
            KbCommand::Reset => {
                let path = knowledge_file(&cfg)?;
                if path.exists() {
                    std::fs::remove_file(&path)
                        .with_context(|| format!("remove {}", path.display()))?;
                    println!("Removed {}", path.display());
                } else {
                    println!("No imported knowledge base at {}", path.display());
                }
            }
        },

        Command::History { command } => {
            let mut session = open_session(&cfg, true, false)?;
            match command {
                HistoryCommand::Show => {
                    if session.turns().is_empty() {
                        println!("(no conversation yet)");
                    }
                    for turn in session.turns() {
                        let at = turn.at.with_timezone(&chrono::Local).format("%Y-%m-%d %H:%M");
                        println!("[{at}] {}: {}\n", turn.role.tag(), turn.text);
                    }
                }
                HistoryCommand::Clear => {
                    session.clear_conversation();
                    println!("Conversation cleared ({})", session.store().path().display());
                }
            }
        }

        Command::Config { command } => match command {
            ConfigCommand::Init => config::init_config()?,
            ConfigCommand::Show => {
                println!("# {}", config::config_path()?.display());
                print!("{}", toml::to_string_pretty(&cfg).context("serialize config")?);
            }
        },
    }

    Ok(())
}

fn ask(cfg: &Config, text: &str, json: bool, record: bool) -> Result<()> {
    let mut session = open_session(cfg, record && cfg.chat.persist_history, false)?;
    println!("{}", reply_output(&mut session, text, json)?);
    Ok(())
}

fn reply_output<S: ConversationStore>(session: &mut ChatSession<S>, text: &str, json: bool) -> Result<String> {
    let Some(reply) = session.ask(text) else {
        bail!("empty message");
    };
    if json {
        Ok(serde_json::to_string_pretty(&reply)?)
    } else {
        Ok(reply.display_text())
    }
}

fn open_session(cfg: &Config, persist_history: bool, welcome: bool) -> Result<ChatSession<FileStore>> {
    let store_path = state::store_path()?;
    let store = FileStore::open(&store_path)
        .with_context(|| format!("open {}", store_path.display()))?;
    let options = SessionOptions {
        persist_history,
        welcome,
    };
    Ok(ChatSession::with_options(
        Resolver::new(load_knowledge(cfg)?),
        store,
        options,
    ))
}

fn knowledge_file(cfg: &Config) -> Result<PathBuf> {
    match &cfg.knowledge.path {
        Some(p) => Ok(p.clone()),
        None => state::knowledge_path(),
    }
}

/// Built-in entries, replaced by the imported file when one exists.
fn load_knowledge(cfg: &Config) -> Result<KnowledgeBase> {
    let kb = KnowledgeBase::with_defaults();
    let path = knowledge_file(cfg)?;
    if path.exists() {
        let raw = std::fs::read_to_string(&path)
            .with_context(|| format!("read {}", path.display()))?;
        let count = kb
            .import(raw)
            .with_context(|| format!("load knowledge base {}", path.display()))?;
        tracing::debug!(entries = count, path = %path.display(), "loaded knowledge base");
    }
    Ok(kb)
}

fn import_knowledge(cfg: &Config, file: &Path) -> Result<()> {
    let raw = std::fs::read_to_string(file).with_context(|| format!("read {}", file.display()))?;

    let staged = KnowledgeBase::new(Vec::new());
    let count = staged
        .import(raw)
        .with_context(|| format!("{} rejected; knowledge base unchanged", file.display()))?;

    let dest = knowledge_file(cfg)?;
    std::fs::write(&dest, staged.export()?).with_context(|| format!("write {}", dest.display()))?;
    println!("Imported {} entries into {}", count, dest.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use askbox_core::{MemoryStore, HISTORY_KEY};

    fn session() -> ChatSession<MemoryStore> {
        let options = SessionOptions {
            persist_history: true,
            welcome: false,
        };
        ChatSession::with_options(Resolver::default(), MemoryStore::default(), options)
    }

    #[test]
    fn test_json_reply_is_recorded_in_history() {
        let mut s = session();
        let out = reply_output(&mut s, "hello", true).unwrap();

        let json: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(json["kind"], "answer");
        assert_eq!(json["source"]["kind"], "knowledge");
        assert_eq!(s.turns().len(), 2);
        assert!(s.store().get(HISTORY_KEY).unwrap().is_some());
    }

    #[test]
    fn test_plain_reply_and_blank_input() {
        let mut s = session();
        assert_eq!(reply_output(&mut s, "hello", false).unwrap(), "Hello! How can I assist?");
        assert!(reply_output(&mut s, "   ", false).is_err());
    }
}
