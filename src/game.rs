//! Session orchestration
//!
//! Owns the phase state machine `Idle -> CountingDown -> Playing -> {Won,
//! Ended}` and runs one fixed-order simulation step per display frame.
//! Every entry point returns a [`LoopDirective`] telling the driver which
//! callback (animation frame or 1 Hz countdown) should stay scheduled, so a
//! stopped session never leaves a dangling reschedule behind.

use std::collections::VecDeque;

use crate::input::{InputEvent, InputTranslator};
use crate::records::{
    CompletionStatus, GameResult, HighScoreStore, Identity, IdentityProvider, SessionRecorder,
};
use crate::renderer::{Overlay, RenderSurface, render_frame};
use crate::settings::Settings;
use crate::sim::{GameState, TickOutcome, tick};
use crate::tuning::Tuning;

/// Current phase of the kiosk
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamePhase {
    /// Waiting for a start command
    Idle,
    /// Counting down to a fresh session
    CountingDown,
    /// Active gameplay
    Playing,
    /// Session reached the target score
    Won,
    /// Session lost (fell off)
    Ended,
}

impl GamePhase {
    pub fn is_terminal(self) -> bool {
        matches!(self, GamePhase::Won | GamePhase::Ended)
    }
}

/// Which callback the driver should keep scheduled
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopDirective {
    /// Keep requesting animation frames (cancel any countdown timer)
    Frame,
    /// Keep the 1 Hz countdown timer running (no animation frames)
    Countdown,
    /// Cancel every pending callback
    Idle,
}

/// Everything the orchestrator needs from the outside world
pub trait GameServices: IdentityProvider + SessionRecorder + HighScoreStore {}

impl<T: IdentityProvider + SessionRecorder + HighScoreStore> GameServices for T {}

/// The kiosk game: phase machine plus the current session
pub struct Game<S> {
    services: S,
    tuning: Tuning,
    settings: Settings,
    phase: GamePhase,
    /// Countdown ticks remaining
    countdown: u32,
    paused: bool,
    /// Live session (only while playing)
    session: Option<GameState>,
    /// Player snapshot taken when the countdown started
    player: Option<Identity>,
    pending_seed: u64,
    /// Final score of the last terminal session
    last_score: u32,
    high_score: u32,
    input: InputTranslator,
    events: VecDeque<InputEvent>,
    /// Missing-surface warning already logged (reset once a surface returns)
    warned_no_surface: bool,
}

impl<S: GameServices> Game<S> {
    pub fn new(services: S, tuning: Tuning, settings: Settings) -> Self {
        let high_score = services.load_high_score();
        log::info!("Game ready (high score {})", high_score);
        Self {
            input: InputTranslator::new(settings.inputs),
            services,
            tuning,
            settings,
            phase: GamePhase::Idle,
            countdown: 0,
            paused: false,
            session: None,
            player: None,
            pending_seed: 0,
            last_score: 0,
            high_score,
            events: VecDeque::new(),
            warned_no_surface: false,
        }
    }

    /// Callback the driver should currently have scheduled
    pub fn directive(&self) -> LoopDirective {
        match self.phase {
            GamePhase::Playing if !self.paused => LoopDirective::Frame,
            GamePhase::CountingDown => LoopDirective::Countdown,
            _ => LoopDirective::Idle,
        }
    }

    /// Start command from the title screen (no-op without a logged-in player)
    pub fn start(&mut self, seed: u64) -> LoopDirective {
        if self.phase != GamePhase::Idle {
            log::warn!("Start ignored in {:?}", self.phase);
            return self.directive();
        }
        self.begin_countdown(seed)
    }

    /// Play again after a win or loss (skips the title screen)
    pub fn restart(&mut self, seed: u64) -> LoopDirective {
        if !self.phase.is_terminal() {
            log::warn!("Restart ignored in {:?}", self.phase);
            return self.directive();
        }
        self.begin_countdown(seed)
    }

    fn begin_countdown(&mut self, seed: u64) -> LoopDirective {
        let Some(identity) = self.services.current_identity() else {
            log::warn!("Start rejected: no player logged in");
            return self.directive();
        };

        log::info!("Countdown started for {}", identity.name);
        self.player = Some(identity);
        self.pending_seed = self.settings.seed.unwrap_or(seed);
        self.countdown = self.tuning.countdown_secs;
        self.paused = false;
        self.phase = GamePhase::CountingDown;
        self.directive()
    }

    /// One countdown second elapsed
    pub fn countdown_tick(&mut self) -> LoopDirective {
        if self.phase != GamePhase::CountingDown {
            return self.directive();
        }
        if self.countdown <= 1 {
            self.begin_play();
        } else {
            self.countdown -= 1;
        }
        self.directive()
    }

    /// Build a fresh session; nothing survives from the previous one
    fn begin_play(&mut self) {
        self.session = Some(GameState::new(self.pending_seed, &self.tuning));
        self.countdown = 0;
        self.input.reset();
        self.events.clear();
        self.phase = GamePhase::Playing;
        log::info!("Session started (seed {})", self.pending_seed);
    }

    /// Leave the countdown or a running session without recording it
    pub fn abandon(&mut self) -> LoopDirective {
        if matches!(self.phase, GamePhase::CountingDown | GamePhase::Playing) {
            log::info!("Session abandoned in {:?}", self.phase);
            self.session = None;
            self.countdown = 0;
            self.paused = false;
            self.input.reset();
            self.events.clear();
            self.phase = GamePhase::Idle;
        }
        self.directive()
    }

    pub fn toggle_pause(&mut self) -> LoopDirective {
        if self.phase == GamePhase::Playing {
            self.paused = !self.paused;
            log::info!("{}", if self.paused { "Paused" } else { "Resumed" });
        }
        self.directive()
    }

    /// Pause if playing (window blur / hidden tab)
    pub fn auto_pause(&mut self) -> LoopDirective {
        if self.settings.auto_pause && self.phase == GamePhase::Playing && !self.paused {
            self.paused = true;
            log::info!("Auto-paused");
        }
        self.directive()
    }

    /// Queue an input event for the next frame (dropped outside gameplay)
    pub fn push_input(&mut self, event: InputEvent) {
        if self.phase == GamePhase::Playing {
            self.events.push_back(event);
        }
    }

    /// Run one display frame: input, simulation, terminal checks, render
    ///
    /// `now_ms` is the wall-clock time used to stamp recorded results. A
    /// missing surface only skips drawing.
    pub fn frame(&mut self, now_ms: f64, surface: Option<&mut dyn RenderSurface>) -> LoopDirective {
        if self.phase == GamePhase::Playing && !self.paused {
            self.step(now_ms);
        }

        match surface {
            Some(surface) => {
                self.warned_no_surface = false;
                self.render(surface);
            }
            None if !self.warned_no_surface => {
                log::warn!("No render surface, frames will not be drawn");
                self.warned_no_surface = true;
            }
            None => {}
        }
        self.directive()
    }

    fn step(&mut self, now_ms: f64) {
        let Some(session) = self.session.as_mut() else {
            return;
        };

        while let Some(event) = self.events.pop_front() {
            self.input
                .apply(event, Some(&mut session.player), &self.tuning);
        }

        match tick(session, &self.input.intent(), &self.tuning) {
            TickOutcome::Continue => {}
            TickOutcome::FellOff => self.finish(false, now_ms),
            TickOutcome::ReachedTarget => self.finish(true, now_ms),
        }
    }

    /// Terminal transition: record once, update the high score, drop the session
    fn finish(&mut self, won: bool, now_ms: f64) {
        let Some(session) = self.session.take() else {
            return;
        };
        let score = session.score;
        self.last_score = score;
        self.phase = if won { GamePhase::Won } else { GamePhase::Ended };
        self.input.reset();
        self.events.clear();
        log::info!("Session {:?} with score {}", self.phase, score);

        match self.player.clone() {
            Some(identity) => {
                let status = CompletionStatus::from_won(won);
                self.services
                    .record_result(GameResult::new(identity, score, status, now_ms));
            }
            None => log::warn!("No player snapshot, result not recorded"),
        }

        if score > self.high_score {
            self.high_score = score;
            self.services.save_high_score(score);
        }
    }

    /// Draw the current phase
    pub fn render(&self, surface: &mut dyn RenderSurface) {
        let overlay = match self.phase {
            GamePhase::Idle => Overlay::Title {
                high_score: self.high_score,
                target: self.tuning.target_score,
            },
            GamePhase::CountingDown => Overlay::Countdown(self.countdown),
            GamePhase::Playing if self.paused => Overlay::Paused,
            GamePhase::Playing => Overlay::None,
            GamePhase::Won => Overlay::Won {
                score: self.last_score,
            },
            GamePhase::Ended => Overlay::Ended {
                score: self.last_score,
            },
        };
        render_frame(
            surface,
            self.session.as_ref(),
            &overlay,
            self.settings.show_hud,
        );
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn countdown(&self) -> u32 {
        self.countdown
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Live score while playing, final score afterwards
    pub fn score(&self) -> u32 {
        self.session
            .as_ref()
            .map(|s| s.score)
            .unwrap_or(self.last_score)
    }

    pub fn high_score(&self) -> u32 {
        self.high_score
    }

    pub fn session(&self) -> Option<&GameState> {
        self.session.as_ref()
    }

    /// Direct access to the live session (debug tooling)
    pub fn session_mut(&mut self) -> Option<&mut GameState> {
        self.session.as_mut()
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn services(&self) -> &S {
        &self.services
    }

    pub fn services_mut(&mut self) -> &mut S {
        &mut self.services
    }
}
