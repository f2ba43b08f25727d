pub mod amplitude;
pub mod pre_buffer;
pub mod trigger;
pub mod wav_format;
