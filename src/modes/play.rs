use std::cell::RefCell;
use std::collections::VecDeque;
use std::io::{Stderr, stderr};
use std::rc::Rc;
use std::time::Duration;

use anyhow::{Context, Result};
use crossterm::{
    event::{Event, EventStream, KeyEvent, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use futures::StreamExt;
use ratatui::{Frame, Terminal, backend::CrosstermBackend};
use tokio::time::{Instant, Interval, MissedTickBehavior, interval, interval_at};

use super::login::{LoginEvent, LoginForm};
use crate::auth::AuthService;
use crate::game::{EngineCallbacks, GameConfig, GameEngine, Phase};
use crate::input::{InputHandler, KeyAction};
use crate::metrics::SessionMetrics;
use crate::render::{HudContext, Renderer};

/// Which screen has the keyboard
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Screen {
    Login,
    Game,
}

/// Events the engine reported from inside a tick, drained by the app loop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EngineEvent {
    ScoreChanged(u32),
    GameOver(u32),
}

/// Build the single tick timer at the given pacing
///
/// The first tick lands a full period from now, and ticks missed while the
/// loop was busy are skipped instead of bursted. Every lifecycle change that
/// affects pacing replaces the previous timer with a fresh one from here, so
/// at most one tick timer exists per app at any time.
fn new_ticker(period: Duration) -> Interval {
    let mut ticker = interval_at(Instant::now() + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    ticker
}

/// The interactive TUI application: login screen plus game screen
///
/// Owns the engine, the auth session, and the tick timer. Movement keys are
/// forwarded to the engine's direction buffer; Space (start/pause), R
/// (restart), L (logout) and Q (quit) are handled here, as is switching
/// between screens.
pub struct PlayMode {
    engine: GameEngine,
    auth: AuthService,
    renderer: Renderer,
    input_handler: InputHandler,
    metrics: SessionMetrics,
    login: LoginForm,
    screen: Screen,
    engine_events: Rc<RefCell<VecDeque<EngineEvent>>>,
    should_quit: bool,
}

impl PlayMode {
    pub fn new(config: GameConfig, auth: AuthService, renderer: Renderer) -> Self {
        let mut engine = GameEngine::new(config);

        let engine_events: Rc<RefCell<VecDeque<EngineEvent>>> =
            Rc::new(RefCell::new(VecDeque::new()));
        let score_queue = Rc::clone(&engine_events);
        let over_queue = Rc::clone(&engine_events);
        engine.set_callbacks(
            EngineCallbacks::new()
                .on_score_update(move |score| {
                    score_queue
                        .borrow_mut()
                        .push_back(EngineEvent::ScoreChanged(score));
                })
                .on_game_over(move |final_score| {
                    over_queue
                        .borrow_mut()
                        .push_back(EngineEvent::GameOver(final_score));
                }),
        );

        // A session left behind by the previous run resumes directly on the
        // game screen.
        let screen = if auth.is_logged_in() {
            Screen::Game
        } else {
            Screen::Login
        };

        Self {
            engine,
            auth,
            renderer,
            input_handler: InputHandler::new(),
            metrics: SessionMetrics::new(),
            login: LoginForm::new(),
            screen,
            engine_events,
            should_quit: false,
        }
    }

    pub async fn run(&mut self) -> Result<()> {
        enable_raw_mode().context("Failed to enable raw mode")?;
        let mut stderr = stderr();
        execute!(stderr, EnterAlternateScreen).context("Failed to enter alternate screen")?;
        let backend = CrosstermBackend::new(stderr);
        let mut terminal = Terminal::new(backend).context("Failed to create terminal")?;
        terminal.hide_cursor().context("Failed to hide cursor")?;
        terminal.clear().context("Failed to clear terminal")?;

        let result = self.run_event_loop(&mut terminal).await;

        self.cleanup_terminal(&mut terminal)?;

        result
    }

    async fn run_event_loop(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stderr>>,
    ) -> Result<()> {
        let mut key_events = EventStream::new();
        let mut ticker = new_ticker(self.engine.tick_interval());

        // Render at 30 FPS, independent of the simulation pace
        let mut render_timer = interval(Duration::from_millis(33));

        loop {
            tokio::select! {
                maybe_event = key_events.next() => {
                    if let Some(Ok(event)) = maybe_event {
                        if self.handle_event(event) {
                            ticker = new_ticker(self.engine.tick_interval());
                        }
                    }
                }

                // The guard keeps the timer silent outside of active play;
                // pausing therefore stops ticks synchronously with the key
                // press that caused it.
                _ = ticker.tick(), if self.screen == Screen::Game
                        && self.engine.phase() == Phase::Playing => {
                    let outcome = self.engine.tick();
                    self.drain_engine_events();
                    if outcome.speed_changed {
                        ticker = new_ticker(self.engine.tick_interval());
                    }
                }

                _ = render_timer.tick() => {
                    self.metrics.update();
                    terminal.draw(|frame| {
                        self.draw(frame);
                    }).context("Failed to draw frame")?;
                }

                _ = tokio::signal::ctrl_c() => {
                    self.should_quit = true;
                }
            }

            if self.should_quit {
                break;
            }
        }

        Ok(())
    }

    /// Returns true when the tick timer must be re-paced
    fn handle_event(&mut self, event: Event) -> bool {
        let Event::Key(key) = event else {
            return false;
        };
        // Only process key press events, not release
        if key.kind != KeyEventKind::Press {
            return false;
        }

        match self.screen {
            Screen::Login => {
                self.handle_login_key(key);
                false
            }
            Screen::Game => self.handle_game_key(key),
        }
    }

    fn handle_login_key(&mut self, key: KeyEvent) {
        match self.login.handle_key(key) {
            LoginEvent::Submitted => {
                let outcome = self.auth.login(&self.login.username, &self.login.password);
                if outcome.success {
                    self.enter_game();
                } else {
                    self.login.reject(outcome.message);
                }
            }
            LoginEvent::GuestRequested => {
                self.auth.login_as_guest();
                self.enter_game();
            }
            LoginEvent::Quit => self.should_quit = true,
            LoginEvent::None => {}
        }
    }

    fn handle_game_key(&mut self, key: KeyEvent) -> bool {
        match self.input_handler.handle_key_event(key) {
            KeyAction::Steer(direction) => {
                self.engine.queue_direction(direction);
                false
            }
            KeyAction::StartPause => self.start_or_toggle(),
            KeyAction::Restart => {
                self.engine.reset();
                self.metrics.on_game_reset();
                true
            }
            KeyAction::Logout => {
                self.leave_game();
                false
            }
            KeyAction::Quit => {
                self.should_quit = true;
                false
            }
            KeyAction::None => false,
        }
    }

    /// Space: start from a standstill, toggle pause otherwise
    fn start_or_toggle(&mut self) -> bool {
        match self.engine.phase() {
            Phase::Idle | Phase::GameOver => {
                self.engine.start();
                self.metrics.on_game_start();
                true
            }
            Phase::Playing | Phase::Paused => {
                self.engine.toggle_pause();
                // A resume gets a freshly phased timer; on pause the guard
                // already silences the old one.
                self.engine.phase() == Phase::Playing
            }
        }
    }

    fn enter_game(&mut self) {
        self.login = LoginForm::new();
        self.engine.reset();
        self.metrics = SessionMetrics::new();
        self.screen = Screen::Game;
    }

    fn leave_game(&mut self) {
        self.auth.logout();
        self.engine.reset();
        self.screen = Screen::Login;
    }

    fn drain_engine_events(&mut self) {
        let drained: Vec<EngineEvent> = self.engine_events.borrow_mut().drain(..).collect();
        for event in drained {
            match event {
                EngineEvent::ScoreChanged(score) => {
                    log::debug!("score is now {score}");
                }
                EngineEvent::GameOver(final_score) => {
                    log::info!("game over at {final_score}");
                    self.metrics.on_game_over(final_score);
                    self.auth.record_game(final_score);
                }
            }
        }
    }

    fn draw(&self, frame: &mut Frame) {
        match self.screen {
            Screen::Login => self.renderer.render_login(frame, &self.login),
            Screen::Game => {
                let username = self.auth.current_username().unwrap_or_default();
                let hud = HudContext {
                    username: &username,
                    stats: self.auth.current_user_stats(),
                    clock: self.metrics.format_time(),
                };
                self.renderer.render_game(frame, &self.engine.snapshot(), &hud);
            }
        }
    }

    fn cleanup_terminal(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stderr>>,
    ) -> Result<()> {
        disable_raw_mode().context("Failed to disable raw mode")?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)
            .context("Failed to leave alternate screen")?;
        terminal.show_cursor().context("Failed to show cursor")?;
        Ok(())
    }
}
