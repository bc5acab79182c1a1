mod backend;
pub(crate) mod capture;
mod cpal_backend;
pub(crate) mod playback;

pub(crate) use {capture::CpalRecorder, playback::CpalPlayer};

pub use {
    backend::{AudioBackend, Player, Recorder},
    capture::MAX_AMPLITUDE,
    cpal_backend::CpalBackend,
};
