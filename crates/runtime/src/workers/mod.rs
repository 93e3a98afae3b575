//! Workers that drive agents through a level.
//!
//! An [`Episode`] owns one agent and runs its tick loop synchronously; the
//! batch runner schedules episodes on tokio's blocking pool.

mod episode;
mod movement;

pub use episode::{AbortSignal, Episode, EpisodeOutcome, EpisodeSetup, EpisodeSummary};
