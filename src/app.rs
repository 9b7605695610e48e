//! App: terminal init, main loop, tick scheduling and the delayed reset.

use crate::GameConfig;
use crate::game::{Command, Session, SessionEvent, Status};
use crate::input::{Action, key_to_action};
use crate::theme::Theme;
use anyhow::Result;
use crossterm::event::{self, Event, KeyEventKind};
use rand::SeedableRng;
use rand::rngs::StdRng;
use ratatui::DefaultTerminal;
use std::time::{Duration, Instant};

/// Poll timeout while the gravity timer is not running (paused, ended, or a
/// reset pending).
const IDLE_POLL_MS: u64 = 50;

pub struct App {
    config: GameConfig,
    theme: Theme,
    session: Session,
    /// One-shot deadline for the delayed session reinit after Reset.
    pending_reset: Option<Instant>,
    last_tick: Instant,
}

impl App {
    pub fn new(config: GameConfig, theme: Theme) -> Self {
        let session = Session::new(
            config.width,
            config.height,
            config.first_piece,
            StdRng::from_entropy(),
        );
        Self {
            config,
            theme,
            session,
            pending_reset: None,
            last_tick: Instant::now(),
        }
    }

    pub fn run(&mut self) -> Result<()> {
        use crossterm::{
            execute,
            terminal::{
                EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
            },
        };

        enable_raw_mode()?;
        let mut stdout = std::io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let mut terminal =
            ratatui::DefaultTerminal::new(ratatui::backend::CrosstermBackend::new(stdout))?;

        let result = self.run_loop(&mut terminal);

        execute!(std::io::stdout(), LeaveAlternateScreen)?;
        disable_raw_mode()?;
        result
    }

    /// Single-threaded event loop: draw, poll input, fire the gravity tick at
    /// the configured period while Playing. Each command is fully processed
    /// before the next is dequeued.
    fn run_loop(&mut self, terminal: &mut DefaultTerminal) -> Result<()> {
        loop {
            terminal.draw(|f| crate::ui::draw(f, &self.session, &self.theme, f.area()))?;

            if let Some(deadline) = self.pending_reset {
                if Instant::now() >= deadline {
                    self.session = Session::new(
                        self.config.width,
                        self.config.height,
                        self.config.first_piece,
                        StdRng::from_entropy(),
                    );
                    self.pending_reset = None;
                    self.last_tick = Instant::now();
                }
            }

            let ticking = self.session.status == Status::Playing && self.pending_reset.is_none();
            let timeout = if ticking {
                self.config.tick.saturating_sub(self.last_tick.elapsed())
            } else {
                Duration::from_millis(IDLE_POLL_MS)
            };

            if event::poll(timeout)? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        match key_to_action(key, self.session.status) {
                            Action::Quit => return Ok(()),
                            Action::Game(command) => self.dispatch(command),
                            Action::None => {}
                        }
                    }
                }
            }

            if ticking && self.last_tick.elapsed() >= self.config.tick {
                self.last_tick = Instant::now();
                self.dispatch(Command::Tick);
            }
        }
    }

    /// Feed one command into the session. A reset request tears the session
    /// down: the one-shot deadline is scheduled and no further commands reach
    /// the stale session until the fresh one replaces it.
    fn dispatch(&mut self, command: Command) {
        if self.pending_reset.is_some() {
            return;
        }
        if let Some(SessionEvent::ResetRequested) = self.session.handle(command) {
            self.pending_reset = Some(Instant::now() + self.config.reset_delay);
        }
    }
}
