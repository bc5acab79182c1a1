mod lifecycle;
mod transcription;
