//! WAV container format for clips.
//!
//! Clips are always canonical 44-byte RIFF/WAVE headers, PCM, mono, 16-bit,
//! followed by raw little-endian samples. Only the two size fields change
//! after the header is first written.

use std::io::{self, Seek, SeekFrom, Write};

use crate::models::error::RecorderError;

/// Size of the standard WAV RIFF header in bytes.
pub const WAV_HEADER_SIZE: usize = 44;

/// Byte offset of the RIFF chunk size (`36 + data_size`).
pub const RIFF_SIZE_OFFSET: u64 = 4;

/// Byte offset of the `data` sub-chunk size.
pub const DATA_SIZE_OFFSET: u64 = 40;

pub const CHANNELS: u16 = 1;
pub const BITS_PER_SAMPLE: u16 = 16;
pub const BYTES_PER_SAMPLE: u32 = 2;

/// Build a canonical PCM header, fields in file order:
///
/// ```text
/// "RIFF" riff_size "WAVE"
/// "fmt " 16 format=1 channels sample_rate byte_rate block_align bit_depth
/// "data" data_size
/// ```
///
/// `byte_rate` and `block_align` are derived and saturate at their field
/// width instead of overflowing.
pub fn generate_wav_header(sample_rate: u32, bit_depth: u16, channels: u16, data_size: u32) -> [u8; WAV_HEADER_SIZE] {
    let frame_bytes = u32::from(channels) * u32::from(bit_depth) / 8;
    let block_align = u16::try_from(frame_bytes).unwrap_or(u16::MAX);
    let byte_rate = u32::try_from(u64::from(sample_rate) * u64::from(frame_bytes)).unwrap_or(u32::MAX);

    let fields: [&[u8]; 13] = [
        b"RIFF",
        &36u32.saturating_add(data_size).to_le_bytes(),
        b"WAVE",
        b"fmt ",
        &16u32.to_le_bytes(),
        &1u16.to_le_bytes(),
        &channels.to_le_bytes(),
        &sample_rate.to_le_bytes(),
        &byte_rate.to_le_bytes(),
        &block_align.to_le_bytes(),
        &bit_depth.to_le_bytes(),
        b"data",
        &data_size.to_le_bytes(),
    ];

    let mut header = [0u8; WAV_HEADER_SIZE];
    let mut at = 0;
    for field in fields {
        header[at..at + field.len()].copy_from_slice(field);
        at += field.len();
    }
    header
}

/// Payload size in bytes for `num_samples` mono 16-bit samples.
pub fn data_size(num_samples: u64) -> u32 {
    u32::try_from(num_samples.saturating_mul(BYTES_PER_SAMPLE as u64)).unwrap_or(u32::MAX)
}

/// RIFF chunk size for `num_samples` samples: `36 + 2N`.
pub fn riff_size(num_samples: u64) -> u32 {
    36u32.saturating_add(data_size(num_samples))
}

/// Write a mono 16-bit clip header. `num_samples = 0` writes the placeholder.
pub fn write_header<W: Write>(writer: &mut W, sample_rate: u32, num_samples: u64) -> io::Result<()> {
    let header = generate_wav_header(sample_rate, BITS_PER_SAMPLE, CHANNELS, data_size(num_samples));
    writer.write_all(&header)
}

/// Overwrite only the two size fields (offsets 4 and 40) for `num_samples`.
///
/// Leaves the format fields and the payload untouched.
pub fn patch_sizes<U: Write + Seek>(file: &mut U, num_samples: u64) -> io::Result<()> {
    file.seek(SeekFrom::Start(RIFF_SIZE_OFFSET))?;
    file.write_all(&riff_size(num_samples).to_le_bytes())?;
    file.seek(SeekFrom::Start(DATA_SIZE_OFFSET))?;
    file.write_all(&data_size(num_samples).to_le_bytes())?;
    file.flush()
}

/// Fields read back from a clip header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WavHeaderInfo {
    pub riff_size: u32,
    pub channels: u16,
    pub sample_rate: u32,
    pub byte_rate: u32,
    pub block_align: u16,
    pub bits_per_sample: u16,
    pub data_size: u32,
}

impl WavHeaderInfo {
    /// Declared duration from the data size field.
    pub fn duration_secs(&self) -> f64 {
        if self.byte_rate == 0 {
            return 0.0;
        }
        self.data_size as f64 / self.byte_rate as f64
    }
}

/// Parse a canonical 44-byte PCM header.
pub fn parse_header(header: &[u8]) -> Result<WavHeaderInfo, RecorderError> {
    if header.len() < WAV_HEADER_SIZE {
        return Err(RecorderError::InvalidContainer(format!(
            "header is {} bytes, expected {}",
            header.len(),
            WAV_HEADER_SIZE
        )));
    }
    if &header[0..4] != b"RIFF" || &header[8..12] != b"WAVE" {
        return Err(RecorderError::InvalidContainer("missing RIFF/WAVE tags".into()));
    }
    if &header[12..16] != b"fmt " || &header[36..40] != b"data" {
        return Err(RecorderError::InvalidContainer("not a canonical PCM header".into()));
    }
    let format = u16_at(header, 20);
    if format != 1 {
        return Err(RecorderError::InvalidContainer(format!("unsupported format code {}", format)));
    }

    Ok(WavHeaderInfo {
        riff_size: u32_at(header, 4),
        channels: u16_at(header, 22),
        sample_rate: u32_at(header, 24),
        byte_rate: u32_at(header, 28),
        block_align: u16_at(header, 32),
        bits_per_sample: u16_at(header, 34),
        data_size: u32_at(header, 40),
    })
}

fn u16_at(bytes: &[u8], offset: usize) -> u16 {
    u16::from_le_bytes([bytes[offset], bytes[offset + 1]])
}

fn u32_at(bytes: &[u8], offset: usize) -> u32 {
    u32::from_le_bytes([bytes[offset], bytes[offset + 1], bytes[offset + 2], bytes[offset + 3]])
}
