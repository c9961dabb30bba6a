//! Speech-synthesis abstraction layer for Lexivox
//!
//! This crate provides the foundational types and traits shared by all
//! synthesis backends: the provider trait, provider identifiers, and the
//! segment/audio types that flow between the table adapter, the fallback
//! orchestrator, and the assemblers.

pub mod error;
pub mod provider;
pub mod types;

pub use error::{TtsError, TtsResult};
pub use provider::{discard_partial_output, SpeechProvider};
pub use types::{ClipFormat, ProviderKind, Role, Segment, SegmentAudio, VoiceCandidate};
