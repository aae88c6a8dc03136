//! 录音采集

mod file_capture;

pub use file_capture::FileAudioCapture;
