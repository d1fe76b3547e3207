//! Headless mode runner - command loop without a UI
//!
//! Reads line commands from stdin, feeds them to the Engine, and writes every
//! resulting engine event to stdout as NDJSON.

use std::io::Write;
use std::path::Path;
use std::time::Duration;

use tokio::sync::{broadcast, mpsc};
use tracing::{error, info, warn};

use docview_app::services::{Clipboard, DiagramEngine};
use docview_app::{Engine, EngineEvent, Message};
use docview_core::prelude::*;
use docview_render::CodeBlockId;

use super::{emit, HeadlessEvent};
use crate::bootstrap::SystemEngine;

/// A parsed stdin command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Select(String),
    Next,
    Prev,
    Copy(usize),
    Search(String),
    /// Toggle the mobile navigation overlay
    Menu,
    /// Write a page snapshot
    Page,
    Quit,
}

impl Command {
    /// Parse one input line. Blank lines parse to `Ok(None)`.
    pub fn parse(line: &str) -> std::result::Result<Option<Command>, String> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(None);
        }

        let (name, arg) = match line.split_once(char::is_whitespace) {
            Some((name, arg)) => (name, arg.trim()),
            None => (line, ""),
        };

        let command = match name {
            "select" | "s" if !arg.is_empty() => Command::Select(arg.to_string()),
            "select" | "s" => return Err("select needs a document id".to_string()),
            "next" | "n" => Command::Next,
            "prev" | "p" => Command::Prev,
            "copy" | "c" => match arg.parse() {
                Ok(index) => Command::Copy(index),
                Err(_) => return Err(format!("copy needs a block number, got '{}'", arg)),
            },
            "search" | "/" => Command::Search(arg.to_string()),
            "menu" | "m" => Command::Menu,
            "page" => Command::Page,
            "quit" | "q" => Command::Quit,
            other => return Err(format!("Unknown command: {}", other)),
        };
        Ok(Some(command))
    }
}

/// Run in headless mode over stdin/stdout until `quit` or end of input.
pub async fn run_headless(engine: &mut SystemEngine, project_path: &Path) -> Result<()> {
    info!("Headless mode for {}", project_path.display());

    let mut out = std::io::stdout();
    emit(
        &mut out,
        &HeadlessEvent::ready(
            &project_path.display().to_string(),
            engine.state.navigator.flattened().len(),
            engine.services().diagrams.is_available(),
        ),
    );

    let (cmd_tx, cmd_rx) = mpsc::channel(32);
    std::thread::spawn(move || {
        spawn_stdin_reader_blocking(cmd_tx);
    });

    headless_loop(engine, cmd_rx, &mut out).await;

    info!("docview headless mode exiting");
    Ok(())
}

/// Main headless loop, generic over the output for testing.
pub async fn headless_loop<D, C>(
    engine: &mut Engine<D, C>,
    mut commands: mpsc::Receiver<Command>,
    out: &mut impl Write,
) where
    D: DiagramEngine + Sync + 'static,
    C: Clipboard + Sync + 'static,
{
    let mut events = engine.subscribe();
    let settle_timeout = Duration::from_millis(engine.state.settings.export.settle_timeout_ms);

    engine.start();

    loop {
        forward_events(&mut events, out);

        if engine.should_quit() {
            info!("Quit requested");
            break;
        }

        tokio::select! {
            cmd = commands.recv() => match cmd {
                Some(cmd) => handle_command(engine, cmd, out),
                None => {
                    info!("Command input closed, waiting for renders before exit");
                    engine.settle(settle_timeout).await;
                    forward_events(&mut events, out);
                    break;
                }
            },
            Some(msg) = engine.recv_message() => engine.process_message(msg),
        }
    }

    engine.shutdown();
    forward_events(&mut events, out);
}

fn handle_command<D, C>(engine: &mut Engine<D, C>, command: Command, out: &mut impl Write)
where
    D: DiagramEngine + Sync + 'static,
    C: Clipboard + Sync + 'static,
{
    let message = match command {
        Command::Select(id) => Message::SelectDocument { id },
        Command::Next => Message::SelectNext,
        Command::Prev => Message::SelectPrevious,
        Command::Copy(index) => Message::CopyCode {
            block: CodeBlockId(index),
        },
        Command::Search(query) => Message::SearchChanged { query },
        Command::Menu => Message::ToggleMobileMenu,
        Command::Quit => Message::Quit,
        Command::Page => {
            emit(out, &HeadlessEvent::page(engine.page_view()));
            return;
        }
    };
    engine.process_message(message);
}

/// Write every queued engine event.
fn forward_events(events: &mut broadcast::Receiver<EngineEvent>, out: &mut impl Write) {
    loop {
        match events.try_recv() {
            Ok(event) => emit(out, &event),
            Err(broadcast::error::TryRecvError::Lagged(skipped)) => {
                warn!("Headless output lagged, {} event(s) dropped", skipped);
            }
            Err(_) => break,
        }
    }
}

/// Read stdin lines and forward parsed commands (blocking, own thread)
fn spawn_stdin_reader_blocking(cmd_tx: mpsc::Sender<Command>) {
    use std::io::BufRead;

    let stdin = std::io::stdin();
    let reader = stdin.lock();

    for line in reader.lines() {
        match line {
            Ok(line) => match Command::parse(&line) {
                Ok(Some(command)) => {
                    let quit = command == Command::Quit;
                    if cmd_tx.blocking_send(command).is_err() || quit {
                        break;
                    }
                }
                Ok(None) => {}
                Err(message) => {
                    warn!("{}", message);
                    emit(&mut std::io::stdout(), &HeadlessEvent::error(message, false));
                }
            },
            Err(e) => {
                error!("Failed to read stdin: {}", e);
                break;
            }
        }
    }

    info!("Stdin reader exiting");
}
