//! REPL (Read-Eval-Print Loop) for interactive chat

use super::interrupt::ask_interruptible;
use crate::config::ReplConfig;
use crate::output::console::ConsoleFormatter;
use crate::progress::reporter::{ProgressReporter, SimpleProgress};
use sales_agent_application::{ChatSession, LlmGateway, TurnProgressNotifier};
use sales_agent_domain::Question;
use rustyline::error::ReadlineError;
use rustyline::{DefaultEditor, Result as RlResult};
use tracing::warn;

/// A line entered at the prompt that is not a question
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplCommand {
    Help,
    Tools,
    Reset,
    Quit,
    Unknown(String),
}

impl ReplCommand {
    /// `None` when the line should be sent to the model
    pub fn parse(line: &str) -> Option<Self> {
        let line = line.trim();
        match line {
            "exit" | "quit" => return Some(ReplCommand::Quit),
            _ if !line.starts_with('/') => return None,
            _ => {}
        }
        Some(match line {
            "/quit" | "/exit" | "/q" => ReplCommand::Quit,
            "/help" | "/h" | "/?" => ReplCommand::Help,
            "/tools" => ReplCommand::Tools,
            "/reset" | "/clear" => ReplCommand::Reset,
            other => ReplCommand::Unknown(other.to_string()),
        })
    }
}

/// Interactive chat REPL
pub struct ChatRepl<G: LlmGateway + 'static> {
    session: ChatSession<G>,
    config: ReplConfig,
}

impl<G: LlmGateway + 'static> ChatRepl<G> {
    pub fn new(session: ChatSession<G>, config: ReplConfig) -> Self {
        Self { session, config }
    }

    /// Run the interactive REPL
    pub async fn run(&mut self) -> RlResult<()> {
        let mut rl = DefaultEditor::new()?;

        let history_path = self.config.history_path();
        if let Some(ref path) = history_path {
            if let Some(parent) = path.parent() {
                let _ = std::fs::create_dir_all(parent);
            }
            let _ = rl.load_history(path);
        }

        println!(
            "{}",
            ConsoleFormatter::welcome(self.session.model_name(), self.session.tools())
        );

        loop {
            let readline = rl.readline("> ");

            match readline {
                Ok(line) => {
                    let line = line.trim();
                    if line.is_empty() {
                        continue;
                    }

                    if let Some(command) = ReplCommand::parse(line) {
                        if self.handle_command(command) {
                            break;
                        }
                        continue;
                    }

                    let _ = rl.add_history_entry(line);
                    self.process_question(line).await;
                }
                Err(ReadlineError::Interrupted) => {
                    println!("^C");
                    continue;
                }
                Err(ReadlineError::Eof) => {
                    println!("Bye!");
                    break;
                }
                Err(err) => {
                    eprintln!("Error: {:?}", err);
                    break;
                }
            }
        }

        if let Some(ref path) = history_path
            && let Err(e) = rl.save_history(path)
        {
            warn!("Could not save history to {}: {}", path.display(), e);
        }

        Ok(())
    }

    /// Returns true if the REPL should exit
    fn handle_command(&mut self, command: ReplCommand) -> bool {
        match command {
            ReplCommand::Quit => {
                println!("Bye!");
                true
            }
            ReplCommand::Help => {
                println!();
                println!("{}", ConsoleFormatter::help());
                false
            }
            ReplCommand::Tools => {
                println!();
                println!("{}", ConsoleFormatter::tool_list(self.session.tools()));
                false
            }
            ReplCommand::Reset => {
                self.session.reset();
                println!("Started a new conversation.");
                println!();
                false
            }
            ReplCommand::Unknown(cmd) => {
                println!("Unknown command: {}", cmd);
                println!("Type /help for available commands");
                false
            }
        }
    }

    async fn process_question(&mut self, line: &str) {
        let question = match Question::try_new(line) {
            Ok(q) => q,
            Err(e) => {
                eprintln!("{}", e);
                return;
            }
        };
        println!();

        let progress: Box<dyn TurnProgressNotifier> = if self.config.show_progress {
            Box::new(ProgressReporter::new().with_tool_calls(self.config.show_tool_calls))
        } else {
            Box::new(SimpleProgress::new(self.config.show_tool_calls))
        };

        match ask_interruptible(&mut self.session, &question, progress.as_ref()).await {
            Ok(output) => print!("{}", ConsoleFormatter::answer(&output)),
            Err(e) => eprintln!("{}", ConsoleFormatter::turn_error(&e)),
        }
        println!();
    }
}
