use super::{GameEvent, InputCmd, Session};
use std::time::{Duration, Instant};

pub const SIM_FPS: u32 = 60;
pub const DT: f32 = 1.0 / SIM_FPS as f32;
const TIC: Duration = Duration::from_micros(1_000_000 / SIM_FPS as u64);

/// Drop backlog beyond this many tics (window dragged, debugger pause).
const MAX_CATCH_UP: u32 = 10;

/// Owns the session and steps it at a fixed rate.
pub struct TicRunner {
    session: Session,
    last: Instant,
    tics: u64,
}

impl TicRunner {
    pub fn new(session: Session) -> Self {
        Self {
            session,
            last: Instant::now(),
            tics: 0,
        }
    }

    #[inline]
    pub fn session(&self) -> &Session {
        &self.session
    }

    #[inline]
    pub fn session_mut(&mut self) -> &mut Session {
        &mut self.session
    }

    /// Tics run since creation.
    #[inline]
    pub fn tics(&self) -> u64 {
        self.tics
    }

    /// Advance enough tics to synchronise simulation with real time,
    /// holding `cmd` for all of them.
    pub fn pump(&mut self, cmd: InputCmd) -> Vec<GameEvent> {
        let mut events = Vec::new();
        let mut ran = 0;
        while self.last.elapsed() >= TIC {
            if ran == MAX_CATCH_UP {
                self.last = Instant::now();
                break;
            }
            events.extend(self.tick(cmd));
            self.last += TIC;
            ran += 1;
        }
        events
    }

    /// Run exactly one fixed-rate tic.
    pub fn tick(&mut self, cmd: InputCmd) -> Vec<GameEvent> {
        self.tics += 1;
        self.session.step(cmd, DT)
    }
}
