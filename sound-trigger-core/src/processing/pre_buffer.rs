/// Fixed-capacity circular byte buffer holding the most recent pre-roll audio.
///
/// Allocated once and never resized. Overflow behavior: overwrites the oldest
/// bytes. Reads are non-destructive and borrow the backing storage as at most
/// two spans, so draining into a clip never copies the whole window.
#[derive(Debug)]
pub struct PreBuffer {
    buffer: Box<[u8]>,
    write_index: usize,
    filled: usize,
}

impl PreBuffer {
    pub fn new(capacity: usize) -> Self {
        Self {
            buffer: vec![0u8; capacity].into_boxed_slice(),
            write_index: 0,
            filled: 0,
        }
    }

    /// Append bytes, overwriting the oldest data once full.
    ///
    /// If `data` is at least as long as the buffer, only its last `capacity`
    /// bytes are kept and the write cursor restarts at 0.
    pub fn write(&mut self, data: &[u8]) {
        let capacity = self.buffer.len();
        let n = data.len();
        if n == 0 || capacity == 0 {
            return;
        }

        if n >= capacity {
            self.buffer.copy_from_slice(&data[n - capacity..]);
            self.write_index = 0;
            self.filled = capacity;
            return;
        }

        let end = self.write_index + n;
        if end <= capacity {
            self.buffer[self.write_index..end].copy_from_slice(data);
        } else {
            // Wraps: fill to the end, then continue from the start
            let first = capacity - self.write_index;
            self.buffer[self.write_index..].copy_from_slice(&data[..first]);
            self.buffer[..n - first].copy_from_slice(&data[first..]);
        }
        self.write_index = end % capacity;
        self.filled = (self.filled + n).min(capacity);
    }

    /// Valid contents in chronological order as `(older, newer)` spans.
    ///
    /// Write `older` then `newer` to get oldest-to-newest order. `newer` is
    /// empty unless the ring has wrapped.
    pub fn read_ordered(&self) -> (&[u8], &[u8]) {
        if self.filled < self.buffer.len() {
            return (&self.buffer[..self.filled], &[]);
        }
        (&self.buffer[self.write_index..], &self.buffer[..self.write_index])
    }

    /// Forget all contents. Storage is not zeroed; `filled` gates validity.
    pub fn clear(&mut self) {
        self.write_index = 0;
        self.filled = 0;
    }

    /// Number of valid bytes.
    pub fn len(&self) -> usize {
        self.filled
    }

    pub fn is_empty(&self) -> bool {
        self.filled == 0
    }

    pub fn is_full(&self) -> bool {
        self.filled == self.buffer.len()
    }

    /// The total capacity of the buffer in bytes.
    pub fn capacity(&self) -> usize {
        self.buffer.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ordered(buf: &PreBuffer) -> Vec<u8> {
        let (older, newer) = buf.read_ordered();
        let mut out = older.to_vec();
        out.extend_from_slice(newer);
        out
    }

    /// Deterministic byte stream so every written byte is distinguishable.
    fn stream(start: usize, len: usize) -> Vec<u8> {
        (start..start + len).map(|i| (i * 7 % 251) as u8).collect()
    }

    #[test]
    fn basic_write_read() {
        let mut buf = PreBuffer::new(10);
        buf.write(&[1, 2, 3]);

        assert_eq!(buf.len(), 3);
        assert_eq!(ordered(&buf), vec![1, 2, 3]);
        let (_, newer) = buf.read_ordered();
        assert!(newer.is_empty());
    }

    #[test]
    fn read_does_not_consume() {
        let mut buf = PreBuffer::new(4);
        buf.write(&[1, 2, 3, 4, 5]);
        assert_eq!(ordered(&buf), ordered(&buf));
        assert_eq!(buf.len(), 4);
    }

    #[test]
    fn overflow_drops_oldest() {
        let mut buf = PreBuffer::new(4);
        buf.write(&[1, 2, 3, 4]);
        buf.write(&[5, 6]); // overwrites 1, 2

        assert!(buf.is_full());
        assert_eq!(ordered(&buf), vec![3, 4, 5, 6]);
        let (older, newer) = buf.read_ordered();
        assert_eq!(older, &[3, 4]);
        assert_eq!(newer, &[5, 6]);
    }

    #[test]
    fn write_larger_than_capacity_keeps_tail() {
        let mut buf = PreBuffer::new(3);
        buf.write(&[9]);
        buf.write(&[1, 2, 3, 4, 5]);

        assert_eq!(buf.len(), 3);
        assert_eq!(ordered(&buf), vec![3, 4, 5]);
        buf.write(&[6]);
        assert_eq!(ordered(&buf), vec![4, 5, 6]);
    }

    #[test]
    fn wraparound_split_write() {
        let mut buf = PreBuffer::new(5);
        buf.write(&[1, 2, 3]);
        buf.write(&[4, 5, 6, 7]); // crosses the end of storage

        assert_eq!(ordered(&buf), vec![3, 4, 5, 6, 7]);
    }

    #[test]
    fn clear_empties_buffer() {
        let mut buf = PreBuffer::new(10);
        buf.write(&[1, 2, 3]);
        buf.clear();

        assert!(buf.is_empty());
        assert!(ordered(&buf).is_empty());

        buf.write(&[8, 9]);
        assert_eq!(ordered(&buf), vec![8, 9]);
    }

    #[test]
    fn empty_operations() {
        let mut buf = PreBuffer::new(10);
        buf.write(&[]);
        assert!(buf.is_empty());

        let mut zero = PreBuffer::new(0);
        zero.write(&[1, 2, 3]);
        assert!(zero.is_empty());
        assert!(ordered(&zero).is_empty());
    }

    #[test]
    fn reproduces_tail_for_all_write_size_sequences() {
        for capacity in [1usize, 2, 5, 8] {
            let sizes = [0, 1, capacity - 1, capacity, capacity + 1, 2 * capacity];
            // every ordered triple of write sizes
            for &a in &sizes {
                for &b in &sizes {
                    for &c in &sizes {
                        let mut buf = PreBuffer::new(capacity);
                        let mut written = Vec::new();
                        for len in [a, b, c] {
                            let chunk = stream(written.len(), len);
                            buf.write(&chunk);
                            written.extend_from_slice(&chunk);

                            let keep = written.len().min(capacity);
                            assert_eq!(
                                ordered(&buf),
                                written[written.len() - keep..].to_vec(),
                                "capacity {} writes {:?}",
                                capacity,
                                [a, b, c]
                            );
                        }
                    }
                }
            }
        }
    }
}
