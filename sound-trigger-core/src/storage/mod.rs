pub mod clip_index;
pub mod clip_writer;
pub mod fs;
