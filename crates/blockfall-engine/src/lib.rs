//! Game logic for a falling-block puzzle with pre-seeded obstacle terrain.
//!
//! The crate is split in two layers:
//!
//! - [`core`] - board, shape library, active piece and the collision resolver
//! - [`engine`] - the session state machine, its timer, configuration and the
//!   read-only snapshot consumed by renderers
//!
//! Nothing here touches a terminal, a clock or a global RNG; callers feed
//! elapsed time and input commands into a [`GameSession`] and read back a
//! [`GameSnapshot`].

pub use self::{core::*, engine::*};

pub mod core;
pub mod engine;

#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("piece colliding when setting falling piece")]
pub struct PieceCollisionError;

/// Why an input command was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum InputError {
    #[display("piece colliding when applying input")]
    PieceCollision(PieceCollisionError),
    #[display("session is not accepting input")]
    NotPlaying,
}
