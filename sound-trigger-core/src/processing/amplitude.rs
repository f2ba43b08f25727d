/// Integer RMS amplitude of interleaved little-endian 16-bit PCM.
///
/// Returns `floor(sqrt(mean(sample²)))` over all whole samples in `pcm`.
/// A trailing odd byte is ignored; an empty chunk yields 0. The sum of
/// squares is accumulated in `u64`, which holds `32768²` for any chunk
/// shorter than 2^34 samples.
pub fn rms(pcm: &[u8]) -> u32 {
    let sample_count = pcm.len() / 2;
    if sample_count == 0 {
        return 0;
    }

    let sum_sq: u64 = pcm
        .chunks_exact(2)
        .map(|b| {
            let sample = i16::from_le_bytes([b[0], b[1]]) as i64;
            (sample * sample) as u64
        })
        .sum();

    let mean_sq = sum_sq / sample_count as u64;
    // mean of i16 squares is at most 2^30
    isqrt(mean_sq) as u32
}

/// Integer square root (floor) by Newton's iteration.
pub fn isqrt(n: u64) -> u64 {
    if n == 0 {
        return 0;
    }
    let mut x = n;
    // (x + 1) / 2 without overflowing at u64::MAX
    let mut y = x / 2 + (x & 1);
    while y < x {
        x = y;
        y = (x + n / x) / 2;
    }
    x
}
