//! Plain-text (`P1`) portable bitmaps for the explored-map matrix.
//!
//! The matrix keeps the on-disk row order, top row first. Image lines are
//! addressed with flipped rows in both directions, so stored row 0 becomes the
//! last line of the picture.

use std::io::{Read, Write};

use crate::bitmatrix::BitMatrix;
use crate::core_api::{CoreError, CoreResult};

const MAGIC: &[u8; 2] = b"P1";

struct Scanner<'a> {
    data: &'a [u8],
    pos: usize,
}

fn is_space(b: u8) -> bool {
    matches!(b, b' ' | b'\t' | b'\r' | b'\n')
}

impl<'a> Scanner<'a> {
    fn next(&mut self) -> Option<u8> {
        let b = self.data.get(self.pos).copied();
        if b.is_some() {
            self.pos += 1;
        }
        b
    }

    fn skip_comment(&mut self) {
        while let Some(b) = self.next() {
            if b == b'\n' {
                break;
            }
        }
    }

    /// Skip whitespace and comments. Returns the first significant byte and
    /// whether anything was skipped.
    fn significant(&mut self) -> (Option<u8>, bool) {
        let mut skipped = false;
        loop {
            match self.next() {
                Some(b) if is_space(b) => skipped = true,
                Some(b'#') => {
                    self.skip_comment();
                    skipped = true;
                }
                other => return (other, skipped),
            }
        }
    }

    fn integer(&mut self, first: Option<u8>, what: &str) -> CoreResult<usize> {
        let first = match first {
            Some(b) => Some(b),
            None => self.significant().0,
        };
        let mut value: usize = match first {
            Some(b @ b'0'..=b'9') => usize::from(b - b'0'),
            Some(b) => return Err(bad_char(b, what)),
            None => return Err(CoreError::malformed(format!("PBM ends before {what}"))),
        };
        loop {
            match self.next() {
                Some(b @ b'0'..=b'9') => {
                    value = value
                        .checked_mul(10)
                        .and_then(|v| v.checked_add(usize::from(b - b'0')))
                        .ok_or_else(|| CoreError::malformed(format!("PBM {what} is too large")))?;
                }
                Some(b) if is_space(b) => break,
                Some(b'#') => {
                    self.skip_comment();
                    break;
                }
                None => break,
                Some(b) => return Err(bad_char(b, what)),
            }
        }
        Ok(value)
    }

    fn pixel(&mut self) -> CoreResult<bool> {
        match self.significant().0 {
            Some(b'0') => Ok(false),
            Some(b'1') => Ok(true),
            Some(b) => Err(bad_char(b, "pixel")),
            None => Err(CoreError::malformed("PBM ends before the last pixel")),
        }
    }
}

fn bad_char(b: u8, what: &str) -> CoreError {
    CoreError::malformed(format!(
        "bad character {:?} in PBM {what}",
        char::from(b)
    ))
}

/// Parse a plain PBM. Anything after the last pixel is ignored.
pub fn parse_pbm(data: &[u8]) -> CoreResult<BitMatrix> {
    if data.get(..2) != Some(MAGIC.as_slice()) {
        return Err(CoreError::malformed("not a plain PBM (missing P1 magic)"));
    }
    let mut s = Scanner { data, pos: 2 };
    let (first, skipped) = s.significant();
    if !skipped {
        return Err(CoreError::malformed("not a plain PBM (no separator after magic)"));
    }
    let width = s.integer(first, "width")?;
    let height = s.integer(None, "height")?;

    // every pixel takes at least one byte
    let available = data.len().saturating_sub(s.pos);
    if width.checked_mul(height).is_none_or(|cells| cells > available) {
        return Err(CoreError::malformed(format!(
            "PBM dimensions {width}x{height} exceed image data"
        )));
    }
    let mut matrix = BitMatrix::new(width, height)?;
    for y in 0..height {
        for x in 0..width {
            if s.pixel()? {
                matrix.set(x, y, true, true)?;
            }
        }
    }
    Ok(matrix)
}

pub fn read_pbm<R: Read>(mut reader: R) -> CoreResult<BitMatrix> {
    let mut data = Vec::new();
    reader.read_to_end(&mut data)?;
    parse_pbm(&data)
}

pub fn write_pbm<W: Write>(mut out: W, matrix: &BitMatrix) -> CoreResult<()> {
    write!(out, "P1\n{} {}\n", matrix.width(), matrix.height())?;
    let mut line = Vec::with_capacity(matrix.width() + 1);
    for y in 0..matrix.height() {
        line.clear();
        for x in 0..matrix.width() {
            line.push(if matrix.get(x, y, true)? { b'1' } else { b'0' });
        }
        line.push(b'\n');
        out.write_all(&line)?;
    }
    out.flush()?;
    Ok(())
}
