use std::io::{Read, Seek, Write};

use serde_json::Value as JsonValue;

use crate::core_api::CoreResult;
use crate::reader::LittleEndianReader;
use crate::writer::LittleEndianWriter;

/// Upper bound on capacity reserved from an on-disk count before any element
/// has actually been read.
const MAX_PREALLOCATED: usize = 1024;

/// A node of the character tree with binary and JSON forms.
///
/// `Context` carries whatever version the owning scope declared, so a record
/// can gate its fields on it. Encoding always writes the newest layout.
pub trait Record: Sized {
    type Context: Copy;

    fn decode_binary<R: Read + Seek>(
        r: &mut LittleEndianReader<R>,
        ctx: Self::Context,
    ) -> CoreResult<Self>;

    fn encode_binary<W: Write + Seek>(&self, w: &mut LittleEndianWriter<W>) -> CoreResult<()>;

    fn decode_json(value: &JsonValue) -> CoreResult<Self>;

    fn encode_json(&self) -> JsonValue;
}

pub fn read_records<T: Record, R: Read + Seek>(
    r: &mut LittleEndianReader<R>,
    ctx: T::Context,
    what: &str,
) -> CoreResult<Vec<T>> {
    let count = r.read_count(what)?;
    let mut out = Vec::with_capacity(count.min(MAX_PREALLOCATED));
    for index in 0..count {
        let item = T::decode_binary(r, ctx).map_err(|e| e.context(format!("{what}[{index}]")))?;
        out.push(item);
    }
    Ok(out)
}

pub fn write_records<T: Record, W: Write + Seek>(
    w: &mut LittleEndianWriter<W>,
    items: &[T],
    what: &str,
) -> CoreResult<()> {
    w.write_count(items.len(), what)?;
    for item in items {
        item.encode_binary(w)?;
    }
    Ok(())
}

pub fn read_strings<R: Read + Seek>(
    r: &mut LittleEndianReader<R>,
    what: &str,
) -> CoreResult<Vec<String>> {
    let count = r.read_count(what)?;
    let mut out = Vec::with_capacity(count.min(MAX_PREALLOCATED));
    for _ in 0..count {
        out.push(r.read_string()?);
    }
    Ok(out)
}

pub fn write_strings<W: Write + Seek>(
    w: &mut LittleEndianWriter<W>,
    items: &[String],
    what: &str,
) -> CoreResult<()> {
    w.write_count(items.len(), what)?;
    for item in items {
        w.write_string(item)?;
    }
    Ok(())
}

pub fn records_to_json<T: Record>(items: &[T]) -> JsonValue {
    JsonValue::Array(items.iter().map(Record::encode_json).collect())
}
