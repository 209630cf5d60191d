//! Score, lives and game phase for one run

use crate::config::GameConfig;

/// Generation counter identifying one run; bumps on every restart
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct SessionId(u64);

impl SessionId {
    pub fn next(self) -> Self {
        Self(self.0.wrapping_add(1))
    }
}

/// Current phase of the game
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamePhase {
    /// Start screen
    Ready,
    /// Fish are swimming and clicks count
    Playing,
    /// Out of lives
    GameOver,
}

/// Floating feedback flavor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedbackKind {
    /// "+1"
    Hit,
    /// Broken heart
    Miss,
}

/// Floating feedback to show at a client-space point
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Feedback {
    pub x: f64,
    pub y: f64,
    pub kind: FeedbackKind,
    pub lifetime_ms: u32,
}

/// Result of a page-level click
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ClickOutcome {
    /// Not playing
    Ignored,
    /// The click that pressed Start (or Play Again)
    Suppressed,
    /// Landed on a fish; the fish handles it
    OnAgent,
    /// Missed: a life was lost
    Miss { feedback: Feedback, lives: u32 },
    /// Missed with the last life
    GameOver { feedback: Feedback },
}

/// Score/lives bookkeeping
#[derive(Debug, Clone)]
pub struct GameSession {
    config: GameConfig,
    id: SessionId,
    phase: GamePhase,
    score: u64,
    lives: u32,
    suppress_next_click: bool,
}

impl GameSession {
    pub fn new(config: GameConfig) -> Self {
        Self {
            lives: config.initial_lives,
            config,
            id: SessionId::default(),
            phase: GamePhase::Ready,
            score: 0,
            suppress_next_click: false,
        }
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn score(&self) -> u64 {
        self.score
    }

    pub fn lives(&self) -> u32 {
        self.lives
    }

    pub fn is_playing(&self) -> bool {
        self.phase == GamePhase::Playing
    }

    /// Leave the start screen
    pub fn start(&mut self) {
        if self.phase != GamePhase::Ready {
            return;
        }
        self.phase = GamePhase::Playing;
        self.suppress_next_click = true;
        log::info!("Session {:?} started", self.id);
    }

    /// Back to the start screen with a fresh score; outstanding respawns expire
    pub fn restart(&mut self) {
        self.id = self.id.next();
        self.phase = GamePhase::Ready;
        self.score = 0;
        self.lives = self.config.initial_lives;
        self.suppress_next_click = true;
        log::info!("Session reset, now {:?}", self.id);
    }

    /// A fish was caught at client point (x, y)
    pub fn score_hit(&mut self, x: f64, y: f64) -> Option<Feedback> {
        if !self.is_playing() {
            return None;
        }
        self.score += 1;
        Some(Feedback {
            x,
            y,
            kind: FeedbackKind::Hit,
            lifetime_ms: self.config.hit_feedback_ms,
        })
    }

    /// Classify a page-level click; `on_agent` is true when the click target
    /// (or an ancestor) carries the fish marker class
    pub fn global_click(&mut self, on_agent: bool, x: f64, y: f64) -> ClickOutcome {
        if self.suppress_next_click {
            self.suppress_next_click = false;
            return ClickOutcome::Suppressed;
        }
        if !self.is_playing() {
            return ClickOutcome::Ignored;
        }
        if on_agent {
            return ClickOutcome::OnAgent;
        }

        self.lives = self.lives.saturating_sub(1);
        let feedback = Feedback {
            x,
            y,
            kind: FeedbackKind::Miss,
            lifetime_ms: self.config.miss_feedback_ms,
        };

        if self.lives == 0 {
            self.phase = GamePhase::GameOver;
            log::info!("Game over with score {}", self.score);
            ClickOutcome::GameOver { feedback }
        } else {
            ClickOutcome::Miss {
                feedback,
                lives: self.lives,
            }
        }
    }

    pub fn fish_count(&self) -> usize {
        self.config.fish_count
    }
}
