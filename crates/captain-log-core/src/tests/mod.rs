mod audio;
mod session;
