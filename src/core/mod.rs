pub mod audio;
pub mod session;
pub mod stt;

pub use audio::buffer::StreamingBuffer;
pub use audio::decode::{DecodeError, PcmDecoder, PcmEncoding};
pub use session::{SessionEvent, SessionState, StreamingSession};
pub use stt::{ModelError, RemoteTranscriber, Transcriber, Transcription};
