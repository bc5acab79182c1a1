mod stub;
mod transcriber;

pub use {stub::StubTranscriber, transcriber::Transcriber};
