mod capture;
mod device;
mod playback;
