use std::io::{self, Read, Seek, SeekFrom};

/// Maximum bytes in a 7-bit length prefix (35 bits of magnitude).
pub const VARINT_MAX_BYTES: usize = 5;

pub struct LittleEndianReader<R> {
    inner: R,
    saved: Vec<u64>,
}

impl<R: Read + Seek> LittleEndianReader<R> {
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            saved: Vec::new(),
        }
    }

    pub fn get_mut(&mut self) -> &mut R {
        &mut self.inner
    }

    pub fn into_inner(self) -> R {
        self.inner
    }

    pub fn read_u8(&mut self) -> io::Result<u8> {
        let mut buf = [0u8; 1];
        self.inner.read_exact(&mut buf)?;
        Ok(buf[0])
    }

    /// Any non-zero byte reads as `true`.
    pub fn read_bool(&mut self) -> io::Result<bool> {
        Ok(self.read_u8()? != 0)
    }

    pub fn read_i32(&mut self) -> io::Result<i32> {
        let mut buf = [0u8; 4];
        self.inner.read_exact(&mut buf)?;
        Ok(i32::from_le_bytes(buf))
    }

    pub fn read_i64(&mut self) -> io::Result<i64> {
        let mut buf = [0u8; 8];
        self.inner.read_exact(&mut buf)?;
        Ok(i64::from_le_bytes(buf))
    }

    pub fn read_f32(&mut self) -> io::Result<f32> {
        let mut buf = [0u8; 4];
        self.inner.read_exact(&mut buf)?;
        Ok(f32::from_le_bytes(buf))
    }

    pub fn read_i32_array<const N: usize>(&mut self) -> io::Result<[i32; N]> {
        let mut result = [0i32; N];
        for item in &mut result {
            *item = self.read_i32()?;
        }
        Ok(result)
    }

    pub fn read_f32_array<const N: usize>(&mut self) -> io::Result<[f32; N]> {
        let mut result = [0f32; N];
        for item in &mut result {
            *item = self.read_f32()?;
        }
        Ok(result)
    }

    /// Reads through `take` so a corrupt length cannot force a huge upfront
    /// allocation.
    pub fn read_bytes(&mut self, n: usize) -> io::Result<Vec<u8>> {
        let mut buf = Vec::new();
        (&mut self.inner).take(n as u64).read_to_end(&mut buf)?;
        if buf.len() != n {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                format!("wanted {n} bytes, stream ended after {}", buf.len()),
            ));
        }
        Ok(buf)
    }

    /// Decode a 7-bit-group length: low groups first, high bit set means
    /// another byte follows.
    pub fn read_varint_len(&mut self) -> io::Result<usize> {
        let mut value: u64 = 0;
        for index in 0..VARINT_MAX_BYTES {
            let byte = self.read_u8()?;
            value |= u64::from(byte & 0x7f) << (7 * index);
            if byte & 0x80 == 0 {
                return usize::try_from(value).map_err(|_| {
                    io::Error::new(
                        io::ErrorKind::InvalidData,
                        format!("string length {value} does not fit in memory"),
                    )
                });
            }
        }

        Err(io::Error::new(
            io::ErrorKind::InvalidData,
            format!(
                "string length prefix exceeds {VARINT_MAX_BYTES} bytes at pos={}",
                self.position().unwrap_or(0)
            ),
        ))
    }

    /// Length-prefixed raw bytes, no text decoding.
    pub fn read_byte_string(&mut self) -> io::Result<Vec<u8>> {
        let len = self.read_varint_len()?;
        self.read_bytes(len)
    }

    /// Length-prefixed ASCII string.
    pub fn read_string(&mut self) -> io::Result<String> {
        let bytes = self.read_byte_string()?;
        if !bytes.is_ascii() {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!(
                    "non-ASCII string data ending at pos={}",
                    self.position().unwrap_or(0)
                ),
            ));
        }
        String::from_utf8(bytes).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
    }

    /// Read an i32 element count. Negative counts are corrupt input.
    pub fn read_count(&mut self, what: &str) -> io::Result<usize> {
        let count = self.read_i32()?;
        usize::try_from(count).map_err(|_| {
            io::Error::new(
                io::ErrorKind::InvalidData,
                format!(
                    "invalid {what} count {count} at pos={}",
                    self.position().unwrap_or(0)
                ),
            )
        })
    }

    pub fn skip(&mut self, n: u64) -> io::Result<()> {
        self.inner.seek(SeekFrom::Current(n as i64))?;
        Ok(())
    }

    pub fn position(&mut self) -> io::Result<u64> {
        self.inner.stream_position()
    }

    pub fn seek_to(&mut self, pos: u64) -> io::Result<()> {
        self.inner.seek(SeekFrom::Start(pos))?;
        Ok(())
    }

    /// Remember the current position and jump to `pos`.
    pub fn push_pos(&mut self, pos: u64) -> io::Result<()> {
        let current = self.position()?;
        self.saved.push(current);
        self.seek_to(pos)
    }

    /// Return to the position saved by the matching `push_pos`.
    pub fn pop_pos(&mut self) -> io::Result<()> {
        let pos = self.saved.pop().ok_or_else(|| {
            io::Error::other("pop_pos without matching push_pos")
        })?;
        self.seek_to(pos)
    }

    pub fn len(&mut self) -> io::Result<u64> {
        let cur = self.position()?;
        let end = self.inner.seek(SeekFrom::End(0))?;
        self.inner.seek(SeekFrom::Start(cur))?;
        Ok(end)
    }

    pub fn is_empty(&mut self) -> io::Result<bool> {
        Ok(self.len()? == 0)
    }

    /// Bytes between the cursor and the end of the stream.
    pub fn remaining(&mut self) -> io::Result<u64> {
        let pos = self.position()?;
        Ok(self.len()?.saturating_sub(pos))
    }
}
