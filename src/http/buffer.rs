use std::borrow::Cow;

use tokio::io::{AsyncRead, AsyncReadExt};

pub const REQUEST_BUFFER_CAPACITY: usize = 1024;

/// Fixed-capacity buffer for whatever a client sends first.
///
/// One buffer is owned by the responder and reused for every connection, so
/// it must be cleared before each read.
#[derive(Debug)]
pub struct RequestBuffer {
    bytes: Box<[u8]>,
    filled: usize,
}

impl RequestBuffer {
    pub fn new() -> Self {
        Self::with_capacity(REQUEST_BUFFER_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            bytes: vec![0u8; capacity].into_boxed_slice(),
            filled: 0,
        }
    }

    pub fn capacity(&self) -> usize {
        self.bytes.len()
    }

    pub fn len(&self) -> usize {
        self.filled
    }

    pub fn is_empty(&self) -> bool {
        self.filled == 0
    }

    /// Forgets the previous connection's data.
    pub fn clear(&mut self) {
        self.bytes[..self.filled].fill(0);
        self.filled = 0;
    }

    pub fn filled(&self) -> &[u8] {
        &self.bytes[..self.filled]
    }

    pub fn as_lossy_str(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(self.filled())
    }

    /// Clears the buffer and performs a single read of at most `capacity()`
    /// bytes. Short reads are not retried.
    pub async fn read_from<R>(&mut self, reader: &mut R) -> std::io::Result<usize>
    where
        R: AsyncRead + Unpin,
    {
        self.clear();
        let n = reader.read(&mut self.bytes).await?;
        self.filled = n;
        Ok(n)
    }
}

impl Default for RequestBuffer {
    fn default() -> Self {
        Self::new()
    }
}
