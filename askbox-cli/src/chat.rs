use anyhow::Result;
use askbox_core::{ChatSession, ConversationStore, Role};
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Paragraph, Wrap},
    Terminal,
};
use std::io::{self, Stdout};
use std::path::Path;
use std::sync::mpsc::TryRecvError;
use std::time::{Duration, Instant};

use crate::typing::{self, DisplayEvent, DisplayRequest};

#[derive(Clone, Debug)]
struct Msg {
    role: Role,
    content: String,
}

/// Messages on screen plus replies still held by the typing worker.
#[derive(Debug, Default)]
struct Transcript {
    messages: Vec<Msg>,
    pending: usize,
    next_request: u64,
    // Replies queued at or before this id belong to a cleared conversation.
    cleared_through: u64,
}

impl Transcript {
    fn push_user(&mut self, content: String) {
        self.messages.push(Msg {
            role: Role::User,
            content,
        });
    }

    fn queue_reply(&mut self) -> u64 {
        self.pending += 1;
        self.next_request += 1;
        self.next_request
    }

    fn clear(&mut self) {
        self.messages.clear();
        self.cleared_through = self.next_request;
    }

    fn on_event(&mut self, event: DisplayEvent) {
        if let DisplayEvent::Reply { request_id, text } = event {
            self.pending = self.pending.saturating_sub(1);
            if request_id > self.cleared_through {
                self.messages.push(Msg {
                    role: Role::Bot,
                    content: text,
                });
            }
        }
    }
}

pub fn run_chat<S: ConversationStore>(session: &mut ChatSession<S>, typing_delay: Duration) -> Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = chat_loop(&mut terminal, session, typing_delay);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen, DisableMouseCapture)?;
    terminal.show_cursor()?;

    res
}

fn chat_loop<S: ConversationStore>(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    session: &mut ChatSession<S>,
    typing_delay: Duration,
) -> Result<()> {
    let mut transcript = Transcript {
        messages: session
            .turns()
            .iter()
            .map(|t| Msg {
                role: t.role,
                content: t.text.clone(),
            })
            .collect(),
        ..Transcript::default()
    };

    let (display_tx, display_rx) = typing::spawn(typing_delay);

    let mut input = String::new();
    let mut show_help = true;
    let mut notice: Option<String> = None;

    loop {
        terminal.draw(|f| {
            let size = f.area();
            let chunks = Layout::default()
                .direction(Direction::Vertical)
                .constraints([
                    Constraint::Length(4),
                    Constraint::Min(5),
                    Constraint::Length(3),
                ])
                .split(size);

            let splash = Paragraph::new(Text::from(vec![
                Line::from(Span::styled(
                    "askbox",
                    Style::default()
                        .fg(Color::Yellow)
                        .add_modifier(Modifier::BOLD),
                )),
                Line::from(Span::styled(
                    "GST calculator · algorithm explainer · help desk",
                    Style::default().fg(Color::Gray),
                )),
            ]))
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL));
            f.render_widget(splash, chunks[0]);

            let header = Block::default().borders(Borders::ALL).title("conversation");

            let mut lines: Vec<Line> = Vec::new();
            if show_help {
                lines.push(Line::from(Span::styled(
                    "Shortcuts: Enter=send, Esc=quit, F1=toggle help",
                    Style::default().fg(Color::Gray),
                )));
                lines.push(Line::raw("Commands: /help /clear /export <file> /import <file>"));
                lines.push(Line::raw(""));
            }

            for m in &transcript.messages {
                let color = match m.role {
                    Role::User => Color::Cyan,
                    Role::Bot => Color::Magenta,
                };
                let mut first = true;
                for part in m.content.lines() {
                    let tag = if first { format!("{}: ", m.role.tag()) } else { "     ".to_string() };
                    first = false;
                    lines.push(Line::from(vec![
                        Span::styled(tag, Style::default().fg(color)),
                        Span::raw(part.to_string()),
                    ]));
                }
                lines.push(Line::raw(""));
            }

            if transcript.pending > 0 {
                lines.push(Line::from(Span::styled(
                    "bot is typing…",
                    Style::default().fg(Color::Gray).add_modifier(Modifier::ITALIC),
                )));
            }
            if let Some(n) = &notice {
                lines.push(Line::from(Span::styled(n.clone(), Style::default().fg(Color::Yellow))));
            }

            let history = Paragraph::new(Text::from(lines))
                .block(header)
                .wrap(Wrap { trim: false });
            f.render_widget(history, chunks[1]);

            let input_block = Block::default().borders(Borders::ALL).title("message");
            let input_widget = Paragraph::new(input.as_str())
                .block(input_block)
                .style(Style::default().fg(Color::White));
            f.render_widget(input_widget, chunks[2]);
        })?;

        loop {
            match display_rx.try_recv() {
                Ok(event) => transcript.on_event(event),
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => anyhow::bail!("display worker stopped"),
            }
        }

        if !event::poll(Duration::from_millis(50))? {
            continue;
        }
        let Event::Key(key) = event::read()? else {
            continue;
        };
        if key.kind != KeyEventKind::Press {
            continue;
        }

        match key.code {
            KeyCode::Esc => break,
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => break,
            KeyCode::F(1) => {
                show_help = !show_help;
            }
            KeyCode::Enter => {
                let trimmed = input.trim().to_string();
                input.clear();
                if trimmed.is_empty() {
                    continue;
                }
                notice = None;

                if trimmed.starts_with('/') {
                    match handle_slash(session, &trimmed) {
                        SlashOutcome::Cleared => transcript.clear(),
                        SlashOutcome::Notice(n) => notice = Some(n),
                    }
                    continue;
                }

                transcript.push_user(trimmed.clone());

                if let Some(reply) = session.ask(&trimmed) {
                    let _ = display_tx.send(DisplayRequest {
                        request_id: transcript.queue_reply(),
                        text: reply.display_text(),
                        received_at: Instant::now(),
                    });
                }
            }
            KeyCode::Backspace => {
                input.pop();
            }
            KeyCode::Char(c) => {
                input.push(c);
            }
            _ => {}
        }
    }

    Ok(())
}

enum SlashOutcome {
    Cleared,
    Notice(String),
}

fn handle_slash<S: ConversationStore>(session: &mut ChatSession<S>, input: &str) -> SlashOutcome {
    let (cmd, arg) = match input.split_once(char::is_whitespace) {
        Some((c, a)) => (c, a.trim()),
        None => (input, ""),
    };

    match cmd {
        "/help" => SlashOutcome::Notice(
            "Try: \"Calculate GST for 1000 at 18% exclusive\", \"Explain quicksort\", \
\"What can you do?\". /clear erases history; /export and /import take a JSON file path."
                .to_string(),
        ),
        "/clear" => {
            session.clear_conversation();
            SlashOutcome::Cleared
        }
        "/export" if !arg.is_empty() => SlashOutcome::Notice(export_to(session, Path::new(arg))),
        "/import" if !arg.is_empty() => SlashOutcome::Notice(import_from(session, Path::new(arg))),
        "/export" | "/import" => SlashOutcome::Notice(format!("Usage: {cmd} <file>")),
        _ => SlashOutcome::Notice("Unknown command. Try /help".to_string()),
    }
}

fn export_to<S: ConversationStore>(session: &ChatSession<S>, path: &Path) -> String {
    let res = session
        .export_knowledge_base()
        .map_err(anyhow::Error::from)
        .and_then(|json| std::fs::write(path, json).map_err(anyhow::Error::from));
    match res {
        Ok(()) => format!("Knowledge base exported to {}", path.display()),
        Err(e) => format!("Export failed: {e}"),
    }
}

fn import_from<S: ConversationStore>(session: &ChatSession<S>, path: &Path) -> String {
    let raw = match std::fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(e) => return format!("Cannot read {}: {e}", path.display()),
    };
    if session.import_knowledge_base(raw) {
        format!(
            "Knowledge base replaced ({} entries) for this session",
            session.resolver().knowledge().len()
        )
    } else {
        "Import rejected: expected a JSON array of entries. Knowledge base unchanged.".to_string()
    }
}
