use crate::{AppCommand, AppResult, config::Config, state_view};

use std::io::Write;

use captain_log_core::{Phase, RecordingSession, SessionState, list_entries};
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
use tracing::{debug, error, info, instrument, warn};

const HELP: &str = "\
Commands:
  record | r        start a new take
  stop | s          stop the current take
  toggle | t        record or stop
  play | p          play the current take
  halt              stop playback
  save              copy the take into the journal
  transcribe        transcribe the take
  list [query]      list saved entries
  status            show the current state
  quit | q          exit";

/// Console front end for one [`RecordingSession`].
///
/// Reads commands from stdin and prints every published state change.
/// Dropping the app drops the session, which releases the audio devices.
pub struct App {
    pub(crate) session: RecordingSession,
    pub(crate) config: Config,
    /// The live meter line is on screen and needs a newline before output.
    meter_drawn: bool,
}

impl App {
    pub(crate) fn new(session: RecordingSession, config: Config) -> Self {
        Self {
            session,
            config,
            meter_drawn: false,
        }
    }

    /// Run until `quit` or end of input.
    #[instrument(skip(self))]
    pub(crate) async fn run(mut self) -> AppResult<()> {
        info!("Captain's Log starting");

        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        let mut state_rx = self.session.subscribe();

        self.ensure_microphone_permission(&mut lines).await?;

        println!("{}", HELP);
        let mut shown = state_rx.borrow_and_update().clone();

        loop {
            tokio::select! {
                line = lines.next_line() => {
                    let line = match line {
                        Ok(Some(line)) => line,
                        Ok(None) => {
                            info!("Console input closed");
                            break;
                        }
                        Err(e) => {
                            error!(error = ?e, "Failed to read console input");
                            break;
                        }
                    };
                    if line.trim().is_empty() {
                        continue;
                    }

                    let command = match line.parse::<AppCommand>() {
                        Ok(AppCommand::Quit) => break,
                        Ok(command) => command,
                        Err(e) => {
                            self.print_line(&e.user_message());
                            continue;
                        }
                    };

                    let result = self.execute(command);
                    let next = state_rx.borrow_and_update().clone();
                    self.render(&shown, &next);

                    // Failures recorded in lastError were printed by render,
                    // unless the message repeats the previous one.
                    if let Err(e) = result {
                        debug!(error = %e, "Command failed");
                        if next.last_error == shown.last_error {
                            self.print_line(&format!("Error: {}", e.user_message()));
                        }
                    }
                    shown = next;
                }

                changed = state_rx.changed() => {
                    if changed.is_err() {
                        warn!("Session state channel closed");
                        break;
                    }
                    let next = state_rx.borrow_and_update().clone();
                    self.render(&shown, &next);
                    shown = next;
                }
            }
        }

        if self.meter_drawn {
            println!();
        }
        info!("Captain's Log shut down");

        Ok(())
    }

    /// Ask for microphone access once and persist the answer.
    async fn ensure_microphone_permission(
        &mut self,
        lines: &mut Lines<BufReader<Stdin>>,
    ) -> AppResult<()> {
        let granted = match self.config.microphone.granted {
            Some(granted) => granted,
            None => {
                println!("Captain's Log needs the microphone to record. Allow access? [y/N]");
                let answer = lines.next_line().await?.unwrap_or_default();
                let granted = matches!(answer.trim().to_lowercase().as_str(), "y" | "yes");

                self.config.microphone.granted = Some(granted);
                if let Err(e) = self.config.save() {
                    warn!(error = ?e, "Failed to persist microphone permission");
                }
                granted
            }
        };

        if !granted {
            println!("Microphone access denied. Edit the config file to change this.");
        }
        self.session.set_microphone_permission(granted);
        info!(granted, "Microphone permission applied");

        Ok(())
    }

    #[instrument(skip(self))]
    fn execute(&mut self, command: AppCommand) -> AppResult<()> {
        match command {
            AppCommand::Record => self
                .session
                .start_recording(&self.config.journal.scratch_file)?,
            AppCommand::Stop => self.session.stop_recording()?,
            AppCommand::Toggle => {
                if self.session.state().phase == Phase::Recording {
                    self.session.stop_recording()?;
                } else {
                    self.session
                        .start_recording(&self.config.journal.scratch_file)?;
                }
            }
            AppCommand::Play => self.session.play_audio()?,
            AppCommand::Halt => self.session.stop_playback(),
            AppCommand::Save => self.session.save_audio(&self.config.journal.directory),
            AppCommand::Transcribe => self.session.transcribe()?,
            AppCommand::List { query } => self.print_journal(&query)?,
            AppCommand::Status => {
                let line = state_view::status_line(&self.session.state());
                self.print_line(&line);
            }
            AppCommand::Help => self.print_line(HELP),
            AppCommand::Quit => {}
        }
        Ok(())
    }

    fn print_journal(&mut self, query: &str) -> AppResult<()> {
        let entries = list_entries(&self.config.journal.directory)?;
        let matching: Vec<_> = entries.iter().filter(|e| e.matches(query)).collect();

        if matching.is_empty() {
            self.print_line("No saved logs");
            return Ok(());
        }
        for entry in matching {
            self.print_line(&format!("{}  {}", entry.title(), entry.file_name));
        }
        Ok(())
    }

    fn render(&mut self, prev: &SessionState, next: &SessionState) {
        for line in state_view::changes(prev, next) {
            self.print_line(&line);
        }

        if next.phase == Phase::Recording && next.amplitude_history != prev.amplitude_history {
            print!("\r{}", state_view::live_line(next));
            if let Err(e) = std::io::stdout().flush() {
                warn!(error = ?e, "Failed to flush level meter");
            }
            self.meter_drawn = true;
        }
    }

    fn print_line(&mut self, line: &str) {
        if self.meter_drawn {
            println!();
            self.meter_drawn = false;
        }
        println!("{}", line);
    }
}
