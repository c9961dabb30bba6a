//! Lexivox — flashcard audio synthesis service
//!
//! Turns an uploaded front/back vocabulary table into spoken audio: each
//! cell is synthesized through an ordered provider fallback chain, and the
//! resulting clips are stitched into one timed track (or an archive of
//! per-row clips when the mixing capability is absent).

pub mod assembly;
pub mod config;
pub mod orchestrator;
pub mod policy;
pub mod server;
pub mod table;
