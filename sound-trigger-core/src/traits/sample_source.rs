use crate::models::error::RecorderError;

/// Interface for the PCM sample source (microphone, I2S peripheral, replay).
///
/// Delivers interleaved little-endian signed 16-bit mono samples at the
/// configured sample rate. Must not block: each call copies whatever is
/// currently available into `buf` and returns the number of bytes written,
/// which may be zero.
pub trait SampleSource {
    fn read_into(&mut self, buf: &mut [u8]) -> Result<usize, RecorderError>;
}

impl<S: SampleSource + ?Sized> SampleSource for Box<S> {
    fn read_into(&mut self, buf: &mut [u8]) -> Result<usize, RecorderError> {
        (**self).read_into(buf)
    }
}
