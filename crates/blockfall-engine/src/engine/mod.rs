//! Session state machine and everything it owns.
//!
//! - [`GameSession`] - board, active piece, score, stage and the single timer
//! - [`GameConfig`] - constants fixed for a session, loadable from JSON
//! - [`SessionSeed`] - seed for a reproducible session
//! - [`Timer`] - the one scheduling handle a session holds
//! - [`GameStats`] - score and progress counters
//! - [`SessionEvent`] - what happened, for logs and status lines
//! - [`GameSnapshot`] - read-only view for renderers
//!
//! # Game Flow
//!
//! 1. Create a [`GameSession`]; stage 1 starts on a seeded board
//! 2. Feed elapsed time with [`GameSession::advance`]; each gravity tick moves
//!    the piece down or locks it
//! 3. Apply player input with the `try_*` commands
//! 4. Locks clear full rows and add 10 points per row
//! 5. Reaching the winning score clears the stage; a spawn collision ends the game
//!
//! # Example
//!
//! ```
//! use std::time::Duration;
//!
//! use blockfall_engine::{GameConfig, GameSession};
//!
//! let mut session = GameSession::new(GameConfig::default()).unwrap();
//! session.try_move_left().ok();
//! session.try_rotate().ok();
//! session.advance(Duration::from_millis(500));
//!
//! for event in session.drain_events() {
//!     println!("{event}");
//! }
//! assert!(session.session_state().is_playing());
//! ```

pub use self::{config::*, event::*, seed::*, session::*, snapshot::*, stats::*, timer::*};

mod config;
mod event;
mod seed;
mod session;
mod snapshot;
mod stats;
mod timer;
