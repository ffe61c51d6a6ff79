//! REPL (Read-Eval-Print Loop) for interactive chat
//!
//! ```text
//! reader thread (rustyline) ──lines──▶ ChatRepl::run (select! loop)
//!                                        ├─ input   → controller begin_* → JoinSet
//!                                        ├─ JoinSet → controller.finalize(completion)
//!                                        └─ UiEvent → console output
//! ```
//!
//! The controller is only ever touched from the loop, so every state change
//! happens on one logical thread while remote calls run concurrently.

use super::command::{HELP, ReplCommand, resolve_open_target};
use crate::config::ReplConfig;
use crate::output::console::ConsoleFormatter;
use chatsync_application::{ChatController, Completion, RemoteRequest, UiEvent};
use chatsync_domain::{Delivery, Role, SessionId};
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use std::path::PathBuf;
use tokio::sync::mpsc;
use tokio::task::JoinSet;
use tracing::{debug, warn};

const PROMPT: &str = "> ";

#[derive(Debug)]
enum InputLine {
    Line(String),
    Interrupted,
    Eof,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Exit,
}

/// Interactive chat REPL
pub struct ChatRepl {
    controller: ChatController,
    events: mpsc::UnboundedReceiver<UiEvent>,
    config: ReplConfig,
    tasks: JoinSet<Completion>,
}

impl ChatRepl {
    /// `events` must be the receiving end of the channel `controller` emits on.
    pub fn new(
        controller: ChatController,
        events: mpsc::UnboundedReceiver<UiEvent>,
        config: ReplConfig,
    ) -> Self {
        Self {
            controller,
            events,
            config,
            tasks: JoinSet::new(),
        }
    }

    /// Open `session` as soon as the loop starts instead of a draft.
    pub fn open_on_start(&mut self, session: SessionId) {
        let request = self.controller.switch_to(session);
        self.spawn(request);
    }

    /// Run the interactive REPL until `/quit` or end of input
    pub async fn run(mut self) {
        let (input_tx, mut input_rx) = mpsc::unbounded_channel();
        spawn_reader(self.config.history_path(), input_tx);

        self.print_welcome();
        let request = self.controller.request_registry();
        self.spawn(request);

        loop {
            tokio::select! {
                biased;

                Some(res) = self.tasks.join_next() => {
                    match res {
                        Ok(completion) => self.controller.finalize(completion),
                        Err(e) if e.is_cancelled() => {}
                        Err(e) => eprintln!("{}", ConsoleFormatter::notice(&format!("Task panicked: {}", e))),
                    }
                }

                Some(event) = self.events.recv() => {
                    self.print_event(&event);
                }

                input = input_rx.recv() => {
                    match input {
                        Some(InputLine::Line(line)) => {
                            if self.handle_line(&line) == Flow::Exit {
                                break;
                            }
                        }
                        Some(InputLine::Interrupted) => println!("^C"),
                        Some(InputLine::Eof) | None => {
                            println!("Bye!");
                            break;
                        }
                    }
                }
            }
        }

        self.tasks.abort_all();
        while let Ok(event) = self.events.try_recv() {
            self.print_event(&event);
        }
    }

    fn spawn(&mut self, request: RemoteRequest) {
        let service = self.controller.service();
        self.tasks.spawn(request.execute(service));
    }

    fn handle_line(&mut self, line: &str) -> Flow {
        match ReplCommand::parse(line) {
            ReplCommand::Empty => {}
            ReplCommand::Message(text) => match self.controller.begin_send(text) {
                Ok(request) => {
                    self.spawn(request);
                    if self.config.show_progress {
                        println!("{}", ConsoleFormatter::notice("waiting for reply..."));
                    }
                }
                Err(rejected) => eprintln!("{}", ConsoleFormatter::notice(&rejected.to_string())),
            },
            ReplCommand::Chats => println!(
                "{}",
                ConsoleFormatter::registry(self.controller.registry(), self.controller.active())
            ),
            ReplCommand::Open(arg) => {
                match resolve_open_target(&arg, self.controller.registry()) {
                    Some(id) => {
                        let request = self.controller.switch_to(id);
                        self.spawn(request);
                    }
                    None => eprintln!("No such chat: {}", arg),
                }
            }
            ReplCommand::New => self.controller.start_new(),
            ReplCommand::Show => println!(
                "{}",
                ConsoleFormatter::transcript(self.controller.transcript().entries())
            ),
            ReplCommand::Help => println!("{}", HELP),
            ReplCommand::Quit => {
                println!("Bye!");
                return Flow::Exit;
            }
            ReplCommand::MissingArgument(name) => {
                println!("/{} needs an argument. Type /help for usage", name)
            }
            ReplCommand::Unknown(cmd) => {
                println!("Unknown command: {}", cmd);
                println!("Type /help for available commands");
            }
        }
        Flow::Continue
    }

    fn print_event(&self, event: &UiEvent) {
        let Some(text) = self.render_event(event) else {
            return;
        };
        if matches!(event, UiEvent::Error(_)) {
            eprintln!("{}", text);
        } else {
            println!("{}", text);
        }
    }

    /// Console text for an event, if it warrants any. Errors go to stderr.
    fn render_event(&self, event: &UiEvent) -> Option<String> {
        match event {
            UiEvent::RegistryLoaded { sessions } if sessions.is_empty() => None,
            UiEvent::RegistryLoaded { sessions } => Some(ConsoleFormatter::notice(&format!(
                "{} chat(s) available. Type /chats to list them.",
                sessions.len()
            ))),
            UiEvent::RegistryChanged { .. } => None,
            UiEvent::ActiveChanged { active } => Some(ConsoleFormatter::active_banner(
                active,
                self.controller.registry(),
            )),
            UiEvent::HistoryLoading { .. } if self.config.show_progress => {
                Some(ConsoleFormatter::notice("loading history..."))
            }
            UiEvent::HistoryLoading { .. } => None,
            UiEvent::TranscriptReplaced { entries } if entries.is_empty() => None,
            UiEvent::TranscriptReplaced { entries } => Some(ConsoleFormatter::transcript(entries)),
            // The user's own line is already on screen.
            UiEvent::MessageAppended {
                message, delivery, ..
            } if message.role == Role::User && *delivery == Delivery::Pending => None,
            UiEvent::MessageAppended {
                message, delivery, ..
            } => Some(ConsoleFormatter::message(message, *delivery)),
            UiEvent::DeliveryChanged {
                index,
                delivery: Delivery::Failed,
            } => self
                .controller
                .transcript()
                .get(*index)
                .map(|entry| ConsoleFormatter::message(&entry.message, Delivery::Failed)),
            UiEvent::DeliveryChanged { .. } => None,
            UiEvent::StaleDropped { kind, issued_for } => {
                debug!("Dropped late {:?} response for {}", kind, issued_for);
                None
            }
            UiEvent::Error(error) => Some(ConsoleFormatter::error(error)),
        }
    }

    fn print_welcome(&self) {
        println!();
        println!("╭─────────────────────────────────────────────╮");
        println!("│                  chatsync                   │");
        println!("╰─────────────────────────────────────────────╯");
        println!();
        println!("{}", HELP);
        println!();
    }
}

/// Read lines on a plain OS thread; rustyline blocks and must not hold up
/// the runtime (nor keep it alive at shutdown).
fn spawn_reader(history_path: Option<PathBuf>, tx: mpsc::UnboundedSender<InputLine>) {
    std::thread::spawn(move || {
        let mut rl = match DefaultEditor::new() {
            Ok(rl) => rl,
            Err(e) => {
                warn!("Could not start line editor: {}", e);
                let _ = tx.send(InputLine::Eof);
                return;
            }
        };

        if let Some(path) = &history_path {
            if let Some(parent) = path.parent() {
                let _ = std::fs::create_dir_all(parent);
            }
            let _ = rl.load_history(path);
        }

        loop {
            let input = match rl.readline(PROMPT) {
                Ok(line) => {
                    if !line.trim().is_empty() {
                        let _ = rl.add_history_entry(line.as_str());
                        if let Some(path) = &history_path {
                            let _ = rl.save_history(path);
                        }
                    }
                    InputLine::Line(line)
                }
                Err(ReadlineError::Interrupted) => InputLine::Interrupted,
                Err(ReadlineError::Eof) => InputLine::Eof,
                Err(e) => {
                    warn!("Readline error: {}", e);
                    InputLine::Eof
                }
            };

            let last = match &input {
                InputLine::Eof => true,
                InputLine::Line(line) => ReplCommand::parse(line) == ReplCommand::Quit,
                InputLine::Interrupted => false,
            };
            if tx.send(input).is_err() || last {
                break;
            }
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chatsync_application::{ChatServicePort, RemoteError, SendReply};
    use chatsync_domain::{ActiveSession, Message, Session};
    use std::sync::Arc;

    struct EchoService;

    #[async_trait]
    impl ChatServicePort for EchoService {
        async fn list_sessions(&self) -> Result<Vec<Session>, RemoteError> {
            Ok(vec![
                Session::new(SessionId::new("c1").unwrap(), "First"),
                Session::new(SessionId::new("c2").unwrap(), "Second"),
            ])
        }

        async fn load_history(&self, session: &SessionId) -> Result<Vec<Message>, RemoteError> {
            Ok(vec![Message::user(format!("earlier in {}", session))])
        }

        async fn send_message(
            &self,
            text: &str,
            session: Option<&SessionId>,
        ) -> Result<SendReply, RemoteError> {
            let id = session
                .cloned()
                .unwrap_or_else(|| SessionId::new("fresh").unwrap());
            Ok(SendReply {
                chat: Some(Session::new(id, text)),
                message: Message::assistant(format!("re: {}", text)),
            })
        }
    }

    fn repl() -> ChatRepl {
        let (tx, rx) = mpsc::unbounded_channel();
        let controller = ChatController::new(Arc::new(EchoService), tx);
        ChatRepl::new(controller, rx, ReplConfig::default())
    }

    async fn settle(repl: &mut ChatRepl) {
        while let Some(res) = repl.tasks.join_next().await {
            repl.controller.finalize(res.unwrap());
        }
    }

    #[tokio::test]
    async fn test_message_round_trip_through_tasks() {
        let mut repl = repl();
        assert_eq!(repl.handle_line("hello"), Flow::Continue);
        assert_eq!(repl.controller.transcript().len(), 1);

        settle(&mut repl).await;

        let texts = repl.controller.transcript().texts();
        assert_eq!(texts, vec!["hello", "re: hello"]);
        assert_eq!(
            repl.controller.active(),
            &ActiveSession::Persisted(SessionId::new("fresh").unwrap())
        );
    }

    #[tokio::test]
    async fn test_open_by_position_after_listing() {
        let mut repl = repl();
        let request = repl.controller.request_registry();
        repl.spawn(request);
        settle(&mut repl).await;

        repl.handle_line("/open 2");
        settle(&mut repl).await;

        assert_eq!(
            repl.controller.active(),
            &ActiveSession::Persisted(SessionId::new("c2").unwrap())
        );
        assert_eq!(repl.controller.transcript().texts(), vec!["earlier in c2"]);
    }

    #[tokio::test]
    async fn test_new_and_quit() {
        let mut repl = repl();
        repl.open_on_start(SessionId::new("c1").unwrap());
        settle(&mut repl).await;

        assert_eq!(repl.handle_line("/new"), Flow::Continue);
        assert!(repl.controller.active().is_draft());
        assert!(repl.controller.transcript().is_empty());
        assert_eq!(repl.handle_line("/quit"), Flow::Exit);
    }

    #[tokio::test]
    async fn test_render_hides_pending_user_echo() {
        colored::control::set_override(false);
        let repl = repl();

        let pending = UiEvent::MessageAppended {
            index: chatsync_domain::EntryIndex(0),
            message: Message::user("hi"),
            delivery: Delivery::Pending,
        };
        assert_eq!(repl.render_event(&pending), None);

        let reply = UiEvent::MessageAppended {
            index: chatsync_domain::EntryIndex(1),
            message: Message::assistant("hello"),
            delivery: Delivery::Confirmed,
        };
        assert_eq!(repl.render_event(&reply).as_deref(), Some("[A] hello"));
    }

    #[tokio::test]
    async fn test_render_error_event() {
        colored::control::set_override(false);
        let repl = repl();

        let failed = UiEvent::Error(chatsync_application::ErrorEvent::new(
            chatsync_application::ErrorContext::Send,
            "connection refused",
        ));
        assert_eq!(
            repl.render_event(&failed).as_deref(),
            Some("Error: connection refused")
        );
    }
}
