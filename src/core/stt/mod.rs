pub mod base;
pub mod remote;

pub use base::{ModelError, Transcriber, Transcription};
pub use remote::RemoteTranscriber;
