pub mod clip_storage;
pub mod clock;
pub mod recorder_delegate;
pub mod sample_source;
