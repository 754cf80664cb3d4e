use std::io::{self, Seek, SeekFrom, Write};

use crate::reader::VARINT_MAX_BYTES;

pub struct LittleEndianWriter<W> {
    inner: W,
    saved: Vec<u64>,
}

/// A reserved i32 byte-count slot, filled in by `finish_length_prefix`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use = "a reserved length prefix must be finished"]
pub struct LengthSlot {
    slot_pos: u64,
    data_start: u64,
}

impl<W: Write + Seek> LittleEndianWriter<W> {
    pub fn new(inner: W) -> Self {
        Self {
            inner,
            saved: Vec::new(),
        }
    }

    pub fn get_mut(&mut self) -> &mut W {
        &mut self.inner
    }

    pub fn into_inner(self) -> W {
        self.inner
    }

    pub fn write_u8(&mut self, v: u8) -> io::Result<()> {
        self.inner.write_all(&[v])
    }

    pub fn write_bool(&mut self, v: bool) -> io::Result<()> {
        self.write_u8(u8::from(v))
    }

    pub fn write_i32(&mut self, v: i32) -> io::Result<()> {
        self.inner.write_all(&v.to_le_bytes())
    }

    pub fn write_i64(&mut self, v: i64) -> io::Result<()> {
        self.inner.write_all(&v.to_le_bytes())
    }

    pub fn write_f32(&mut self, v: f32) -> io::Result<()> {
        self.inner.write_all(&v.to_le_bytes())
    }

    pub fn write_i32_slice(&mut self, values: &[i32]) -> io::Result<()> {
        for &v in values {
            self.write_i32(v)?;
        }
        Ok(())
    }

    pub fn write_f32_slice(&mut self, values: &[f32]) -> io::Result<()> {
        for &v in values {
            self.write_f32(v)?;
        }
        Ok(())
    }

    pub fn write_bytes(&mut self, bytes: &[u8]) -> io::Result<()> {
        self.inner.write_all(bytes)
    }

    pub fn write_varint_len(&mut self, len: usize) -> io::Result<()> {
        let mut value = len as u64;
        if value >> (7 * VARINT_MAX_BYTES) != 0 {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("string length {len} exceeds the 35-bit length prefix"),
            ));
        }
        loop {
            let group = (value & 0x7f) as u8;
            value >>= 7;
            if value == 0 {
                return self.write_u8(group);
            }
            self.write_u8(group | 0x80)?;
        }
    }

    pub fn write_byte_string(&mut self, bytes: &[u8]) -> io::Result<()> {
        self.write_varint_len(bytes.len())?;
        self.write_bytes(bytes)
    }

    pub fn write_string(&mut self, s: &str) -> io::Result<()> {
        if !s.is_ascii() {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("string {s:?} contains non-ASCII characters"),
            ));
        }
        self.write_byte_string(s.as_bytes())
    }

    pub fn write_count(&mut self, count: usize, what: &str) -> io::Result<()> {
        let count = i32::try_from(count).map_err(|_| {
            io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("{what} count {count} does not fit in an i32"),
            )
        })?;
        self.write_i32(count)
    }

    pub fn position(&mut self) -> io::Result<u64> {
        self.inner.stream_position()
    }

    pub fn seek_to(&mut self, pos: u64) -> io::Result<()> {
        self.inner.seek(SeekFrom::Start(pos))?;
        Ok(())
    }

    pub fn push_pos(&mut self, pos: u64) -> io::Result<()> {
        let current = self.position()?;
        self.saved.push(current);
        self.seek_to(pos)
    }

    pub fn pop_pos(&mut self) -> io::Result<()> {
        let pos = self
            .saved
            .pop()
            .ok_or_else(|| io::Error::other("pop_pos without matching push_pos"))?;
        self.seek_to(pos)
    }

    /// Overwrite an i32 at `pos` without moving the write cursor.
    pub fn patch_i32(&mut self, pos: u64, v: i32) -> io::Result<()> {
        self.push_pos(pos)?;
        self.write_i32(v)?;
        self.pop_pos()
    }

    pub fn begin_length_prefix(&mut self) -> io::Result<LengthSlot> {
        let slot_pos = self.position()?;
        self.write_i32(0)?;
        let data_start = self.position()?;
        Ok(LengthSlot {
            slot_pos,
            data_start,
        })
    }

    /// Patch the slot with the bytes written since it was reserved. Returns
    /// that byte count.
    pub fn finish_length_prefix(&mut self, slot: LengthSlot) -> io::Result<u64> {
        let end = self.position()?;
        let len = end - slot.data_start;
        let raw = i32::try_from(len).map_err(|_| {
            io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("block of {len} bytes does not fit an i32 length prefix"),
            )
        })?;
        self.patch_i32(slot.slot_pos, raw)?;
        Ok(len)
    }

    pub fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}

impl LengthSlot {
    pub fn data_start(&self) -> u64 {
        self.data_start
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;

    fn encode_len(len: usize) -> Vec<u8> {
        let mut w = LittleEndianWriter::new(Cursor::new(Vec::new()));
        w.write_varint_len(len).unwrap();
        w.into_inner().into_inner()
    }

    #[test]
    fn varint_boundaries() {
        assert_eq!(encode_len(0), vec![0x00]);
        assert_eq!(encode_len(127), vec![0x7f]);
        assert_eq!(encode_len(128), vec![0x80, 0x01]);
        assert_eq!(encode_len(300), vec![0xac, 0x02]);
    }

    #[test]
    fn rejects_non_ascii_strings() {
        let mut w = LittleEndianWriter::new(Cursor::new(Vec::new()));
        let err = w.write_string("Þór").unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidInput);
    }

    #[test]
    fn length_prefix_is_patched_after_the_fact() {
        let mut w = LittleEndianWriter::new(Cursor::new(Vec::new()));
        w.write_u8(0xaa).unwrap();
        let slot = w.begin_length_prefix().unwrap();
        w.write_i64(7).unwrap();
        w.write_u8(1).unwrap();
        assert_eq!(w.finish_length_prefix(slot).unwrap(), 9);
        w.write_u8(0xbb).unwrap();

        let bytes = w.into_inner().into_inner();
        assert_eq!(bytes.len(), 1 + 4 + 9 + 1);
        assert_eq!(&bytes[1..5], &9i32.to_le_bytes());
        assert_eq!(bytes[14], 0xbb);
    }
}
