//! Length-prefixed payload followed by a detached SHA-512 checksum.
//!
//! ```text
//! i32  payload byte count
//! u8[] payload (PlayerStats, worlds, PlayerData)
//! i32  checksum byte count
//! u8[] SHA-512 of the payload
//! ```

use std::io::{self, Read, Seek, Write};

use log::{debug, warn};
use sha2::{Digest, Sha512};

use crate::core_api::{CoreError, CoreErrorCode, CoreResult};
use crate::reader::LittleEndianReader;
use crate::writer::LittleEndianWriter;

pub const CHECKSUM_LEN: usize = 64;
const DIGEST_CHUNK: usize = 8192;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChecksumMode {
    #[default]
    Sha512,
    /// Degraded mode: stored checksums are not verified and zeros are written.
    Disabled,
}

/// Where the verified payload sits in the stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PayloadSpan {
    pub start: u64,
    pub len: u64,
}

/// Hash `len` bytes of `stream` starting at `start`, in bounded chunks.
/// The stream position is left just after the hashed range.
pub fn digest_payload<S: Read + Seek>(stream: &mut S, start: u64, len: u64) -> io::Result<[u8; CHECKSUM_LEN]> {
    stream.seek(io::SeekFrom::Start(start))?;
    let mut hasher = Sha512::new();
    let mut chunk = [0u8; DIGEST_CHUNK];
    let mut remaining = len;
    while remaining > 0 {
        let want = remaining.min(DIGEST_CHUNK as u64) as usize;
        stream.read_exact(&mut chunk[..want])?;
        hasher.update(&chunk[..want]);
        remaining -= want as u64;
    }
    let mut out = [0u8; CHECKSUM_LEN];
    out.copy_from_slice(&hasher.finalize());
    Ok(out)
}

/// Checks the stored checksum and leaves the reader at the start of the
/// payload, ready for the structural decode.
pub fn open_envelope<R: Read + Seek>(
    r: &mut LittleEndianReader<R>,
    mode: ChecksumMode,
) -> CoreResult<PayloadSpan> {
    let declared = r.read_i32()?;
    let len = u64::try_from(declared)
        .map_err(|_| CoreError::malformed(format!("invalid payload byte count {declared}")))?;
    let start = r.position()?;
    let total = r.len()?;
    if start + len > total {
        return Err(CoreError::malformed(format!(
            "payload of {len} bytes runs past end of file ({total} bytes)"
        )));
    }
    r.skip(len)?;

    let checksum_len = r.read_i32()?;
    if usize::try_from(checksum_len).ok() != Some(CHECKSUM_LEN) {
        return Err(CoreError::malformed(format!(
            "checksum byte count is {checksum_len}, expected {CHECKSUM_LEN}"
        )));
    }
    let stored = r.read_bytes(CHECKSUM_LEN)?;
    debug!("payload {len} bytes at {start}, checksum {}", hex::encode(&stored));

    match mode {
        ChecksumMode::Sha512 => {
            let computed = digest_payload(r.get_mut(), start, len)?;
            if stored.as_slice() != computed.as_slice() {
                return Err(CoreError::new(
                    CoreErrorCode::IntegrityMismatch,
                    format!(
                        "checksum mismatch: file has {}, payload hashes to {}",
                        hex::encode(&stored),
                        hex::encode(computed)
                    ),
                ));
            }
        }
        ChecksumMode::Disabled => warn!("checksum verification disabled"),
    }

    r.seek_to(start)?;
    Ok(PayloadSpan { start, len })
}

/// Confirms the structural decode consumed exactly the declared payload.
pub fn close_envelope<R: Read + Seek>(
    r: &mut LittleEndianReader<R>,
    span: PayloadSpan,
) -> CoreResult<()> {
    let end = r.position()?;
    let consumed = end - span.start;
    if consumed != span.len {
        return Err(CoreError::malformed(format!(
            "payload declares {} bytes but records used {consumed}",
            span.len
        )));
    }
    Ok(())
}

/// Writes the envelope around whatever `write_payload` emits, then appends
/// the checksum of those bytes and patches the length prefix.
pub fn write_envelope<W, F>(
    w: &mut LittleEndianWriter<W>,
    mode: ChecksumMode,
    write_payload: F,
) -> CoreResult<()>
where
    W: Read + Write + Seek,
    F: FnOnce(&mut LittleEndianWriter<W>) -> CoreResult<()>,
{
    let slot = w.begin_length_prefix()?;
    write_payload(w)?;
    let start = slot.data_start();
    let len = w.finish_length_prefix(slot)?;

    let checksum = match mode {
        ChecksumMode::Sha512 => {
            w.push_pos(start)?;
            let digest = digest_payload(w.get_mut(), start, len);
            w.pop_pos()?;
            digest?
        }
        ChecksumMode::Disabled => {
            warn!("writing zeroed checksum");
            [0u8; CHECKSUM_LEN]
        }
    };
    w.write_i32(CHECKSUM_LEN as i32)?;
    w.write_bytes(&checksum)?;
    debug!("payload {len} bytes, checksum {}", hex::encode(checksum));
    Ok(())
}
