//! Packed single-bit grid used for explored-map visibility.
//!
//! Storage is one bit per cell, eight cells to a byte, row-major. On disk the
//! same grid is one byte per cell with the top row first. Images want the
//! bottom row first, so every accessor takes a `flipped` flag that addresses
//! row `height - 1 - y` instead of `y`.

use std::io::{self, Read, Seek, Write};

use crate::core_api::{CoreError, CoreResult};
use crate::reader::LittleEndianReader;
use crate::writer::LittleEndianWriter;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BitMatrix {
    width: usize,
    height: usize,
    bytes_per_row: usize,
    bits: Vec<u8>,
}

impl BitMatrix {
    pub fn new(width: usize, height: usize) -> io::Result<Self> {
        let mut matrix = Self::default();
        matrix.set_dimensions(width, height)?;
        Ok(matrix)
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Reallocate to `width` x `height`, clearing every cell. On error the
    /// matrix is left untouched.
    pub fn set_dimensions(&mut self, width: usize, height: usize) -> io::Result<()> {
        let bytes_per_row = width.div_ceil(8);
        let len = bytes_per_row.checked_mul(height).ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::InvalidData,
                format!("matrix of {width}x{height} cells does not fit in memory"),
            )
        })?;
        let mut bits = Vec::new();
        bits.try_reserve_exact(len).map_err(|e| {
            io::Error::new(
                io::ErrorKind::InvalidData,
                format!("cannot allocate {width}x{height} matrix: {e}"),
            )
        })?;
        bits.resize(len, 0);
        self.width = width;
        self.height = height;
        self.bytes_per_row = bytes_per_row;
        self.bits = bits;
        Ok(())
    }

    fn check_bounds(&self, x: usize, y: usize) -> io::Result<()> {
        if x >= self.width {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("column {x} out of range 0..{}", self.width),
            ));
        }
        if y >= self.height {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("row {y} out of range 0..{}", self.height),
            ));
        }
        Ok(())
    }

    fn locate(&self, x: usize, y: usize, flipped: bool) -> (usize, u8) {
        let row = if flipped { self.height - 1 - y } else { y };
        (row * self.bytes_per_row + (x >> 3), 1u8 << (x & 7))
    }

    pub fn set(&mut self, x: usize, y: usize, value: bool, flipped: bool) -> io::Result<()> {
        self.check_bounds(x, y)?;
        let (index, mask) = self.locate(x, y, flipped);
        if value {
            self.bits[index] |= mask;
        } else {
            self.bits[index] &= !mask;
        }
        Ok(())
    }

    pub fn get(&self, x: usize, y: usize, flipped: bool) -> io::Result<bool> {
        self.check_bounds(x, y)?;
        let (index, mask) = self.locate(x, y, flipped);
        Ok(self.bits[index] & mask != 0)
    }

    pub fn count_set(&self) -> usize {
        self.bits.iter().map(|b| b.count_ones() as usize).sum()
    }

    /// Read `height` rows of `width` bytes. Each byte must be 0 or 1.
    pub fn decode_from<R: Read + Seek>(&mut self, r: &mut LittleEndianReader<R>) -> CoreResult<()> {
        self.bits.fill(0);
        for y in 0..self.height {
            let row = r.read_bytes(self.width)?;
            for (x, &byte) in row.iter().enumerate() {
                let value = match byte {
                    0 => false,
                    1 => true,
                    other => {
                        return Err(CoreError::malformed(format!(
                            "visibility cell ({x}, {y}) holds {other}, expected 0 or 1"
                        )));
                    }
                };
                let (index, mask) = self.locate(x, y, false);
                if value {
                    self.bits[index] |= mask;
                }
            }
        }
        Ok(())
    }

    pub fn encode_to<W: Write + Seek>(&self, w: &mut LittleEndianWriter<W>) -> io::Result<()> {
        let mut row = vec![0u8; self.width];
        for y in 0..self.height {
            for (x, cell) in row.iter_mut().enumerate() {
                let (index, mask) = self.locate(x, y, false);
                *cell = u8::from(self.bits[index] & mask != 0);
            }
            w.write_bytes(&row)?;
        }
        Ok(())
    }
}
