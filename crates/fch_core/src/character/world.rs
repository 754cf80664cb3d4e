use std::io::{Read, Seek, Write};

use log::{debug, info, warn};
use serde_json::{Map as JsonMap, Value as JsonValue};

use crate::bitmatrix::BitMatrix;
use crate::codex::MarkerSymbol;
use crate::core_api::{CoreError, CoreResult, check_version};
use crate::json::{JsonFields, f32_list_to_json};
use crate::reader::LittleEndianReader;
use crate::record::{Record, read_records, records_to_json, write_records};
use crate::writer::LittleEndianWriter;

use super::stats::PlayerStats;

pub type Point = [f32; 3];

/// File version that introduced the death point.
pub const DEATH_POINT_SINCE: i32 = 30;
/// File version that introduced per-world visibility data.
pub const VISIBILITY_SINCE: i32 = 29;

#[derive(Debug, Clone, PartialEq)]
pub struct MapMarker {
    pub text: String,
    pub point: Point,
    pub symbol: MarkerSymbol,
    pub crossed: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WorldVisibility {
    pub version: i32,
    pub explored: BitMatrix,
    pub markers: Vec<MapMarker>,
    pub public_position: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct World {
    pub uid: i64,
    pub spawn_point: Option<Point>,
    pub logout_point: Option<Point>,
    pub death_point: Option<Point>,
    pub home_point: Point,
    pub visibility: Option<WorldVisibility>,
}

impl Default for MapMarker {
    fn default() -> Self {
        Self {
            text: String::new(),
            point: [0.0; 3],
            symbol: MarkerSymbol::from_raw(0),
            crossed: false,
        }
    }
}

impl Record for MapMarker {
    /// Owning visibility block version.
    type Context = i32;

    fn decode_binary<R: Read + Seek>(r: &mut LittleEndianReader<R>, version: i32) -> CoreResult<Self> {
        let text = r.read_string()?;
        let point = r.read_f32_array::<3>()?;
        let symbol = MarkerSymbol::from_raw(r.read_i32()?);
        let crossed = if version >= WorldVisibility::CROSSED_SINCE {
            r.read_bool()?
        } else {
            false
        };
        Ok(Self {
            text,
            point,
            symbol,
            crossed,
        })
    }

    fn encode_binary<W: Write + Seek>(&self, w: &mut LittleEndianWriter<W>) -> CoreResult<()> {
        w.write_string(&self.text)?;
        w.write_f32_slice(&self.point)?;
        w.write_i32(self.symbol.raw())?;
        w.write_bool(self.crossed)?;
        Ok(())
    }

    fn decode_json(value: &JsonValue) -> CoreResult<Self> {
        let j = JsonFields::new("MapMarker", value)?;
        let symbol_name = j.get_str("Symbol", "0x00")?;
        let symbol = MarkerSymbol::from_name(&symbol_name).ok_or_else(|| {
            CoreError::type_mismatch(format!("unknown marker symbol '{symbol_name}'"))
        })?;
        Ok(Self {
            text: j.get_str("Text", "")?,
            point: j.get_f32_array("PointXYZ", [0.0; 3])?,
            symbol,
            crossed: j.get_bool("Crossed", false)?,
        })
    }

    fn encode_json(&self) -> JsonValue {
        let mut out = JsonMap::new();
        out.insert("Text".to_string(), JsonValue::String(self.text.clone()));
        out.insert("PointXYZ".to_string(), f32_list_to_json(&self.point));
        out.insert("Symbol".to_string(), JsonValue::String(self.symbol.name()));
        out.insert("Crossed".to_string(), JsonValue::Bool(self.crossed));
        JsonValue::Object(out)
    }
}

impl WorldVisibility {
    pub const CURRENT_VERSION: i32 = 4;
    pub const MARKERS_SINCE: i32 = 2;
    pub const CROSSED_SINCE: i32 = 3;
    pub const PUBLIC_POSITION_SINCE: i32 = 4;

    pub fn edge_length(&self) -> usize {
        self.explored.width()
    }
}

impl Default for WorldVisibility {
    fn default() -> Self {
        Self {
            version: Self::CURRENT_VERSION,
            explored: BitMatrix::default(),
            markers: Vec::new(),
            public_position: false,
        }
    }
}

impl Record for WorldVisibility {
    type Context = ();

    fn decode_binary<R: Read + Seek>(r: &mut LittleEndianReader<R>, _: ()) -> CoreResult<Self> {
        let version = r.read_i32()?;
        check_version("world visibility", version, None, Self::CURRENT_VERSION)?;
        info!("world visibility version: {version}");

        let edge = r.read_i32()?;
        let edge = usize::try_from(edge)
            .map_err(|_| CoreError::malformed(format!("invalid visibility edge length {edge}")))?;
        let remaining = r.remaining()?;
        let cells = edge
            .checked_mul(edge)
            .and_then(|n| u64::try_from(n).ok())
            .filter(|&n| n <= remaining)
            .ok_or_else(|| {
                CoreError::malformed(format!(
                    "visibility edge length {edge} exceeds the remaining data"
                ))
            })?;
        debug!("explored map: {edge}x{edge} ({cells} cells)");
        let mut explored = BitMatrix::new(edge, edge)?;
        explored.decode_from(r)?;

        let markers = if version >= Self::MARKERS_SINCE {
            read_records::<MapMarker, _>(r, version, "map marker")?
        } else {
            Vec::new()
        };
        let public_position = if version >= Self::PUBLIC_POSITION_SINCE {
            r.read_bool()?
        } else {
            false
        };

        Ok(Self {
            version,
            explored,
            markers,
            public_position,
        })
    }

    fn encode_binary<W: Write + Seek>(&self, w: &mut LittleEndianWriter<W>) -> CoreResult<()> {
        let edge = self.explored.width();
        if self.explored.height() != edge {
            return Err(CoreError::type_mismatch(format!(
                "visibility matrix must be square, got {}x{}",
                edge,
                self.explored.height()
            )));
        }
        let edge = i32::try_from(edge).map_err(|_| {
            CoreError::type_mismatch(format!("visibility edge length {edge} does not fit an i32"))
        })?;

        w.write_i32(Self::CURRENT_VERSION)?;
        w.write_i32(edge)?;
        self.explored.encode_to(w)?;
        write_records(w, &self.markers, "map marker")?;
        w.write_bool(self.public_position)?;
        Ok(())
    }

    /// The explored matrix travels as a separate image, so it starts empty.
    fn decode_json(value: &JsonValue) -> CoreResult<Self> {
        let j = JsonFields::new("VisibilityData", value)?;
        Ok(Self {
            version: Self::CURRENT_VERSION,
            explored: BitMatrix::default(),
            markers: j.get_records("MapMarkers", MapMarker::decode_json)?,
            public_position: j.get_bool("PublicPosition", false)?,
        })
    }

    fn encode_json(&self) -> JsonValue {
        let mut out = JsonMap::new();
        out.insert(
            "PublicPosition".to_string(),
            JsonValue::Bool(self.public_position),
        );
        out.insert("MapMarkers".to_string(), records_to_json(&self.markers));
        JsonValue::Object(out)
    }
}

impl Default for World {
    fn default() -> Self {
        Self {
            uid: 0,
            spawn_point: None,
            logout_point: None,
            death_point: None,
            home_point: [0.0; 3],
            visibility: None,
        }
    }
}

fn read_optional_point<R: Read + Seek>(r: &mut LittleEndianReader<R>) -> CoreResult<Option<Point>> {
    let present = r.read_bool()?;
    let point = r.read_f32_array::<3>()?;
    Ok(present.then_some(point))
}

/// An absent point is still written, as zeros behind a `false` flag.
fn write_optional_point<W: Write + Seek>(
    w: &mut LittleEndianWriter<W>,
    point: Option<Point>,
) -> CoreResult<()> {
    w.write_bool(point.is_some())?;
    w.write_f32_slice(&point.unwrap_or([0.0; 3]))?;
    Ok(())
}

impl Record for World {
    /// File version from `PlayerStats`.
    type Context = i32;

    fn decode_binary<R: Read + Seek>(
        r: &mut LittleEndianReader<R>,
        file_version: i32,
    ) -> CoreResult<Self> {
        let uid = r.read_i64()?;
        let spawn_point = read_optional_point(r)?;
        let logout_point = read_optional_point(r)?;
        let death_point = if file_version >= DEATH_POINT_SINCE {
            read_optional_point(r)?
        } else {
            None
        };
        let home_point = r.read_f32_array::<3>()?;

        let mut visibility = None;
        if file_version >= VISIBILITY_SINCE && r.read_bool()? {
            let declared = r.read_i32()?;
            let start = r.position()?;
            let block = WorldVisibility::decode_binary(r, ())
                .map_err(|e| e.context(format!("world {uid}")))?;
            let consumed = r.position()? - start;
            if i64::from(declared) != consumed as i64 {
                warn!("world {uid}: visibility block declares {declared} bytes, decoded {consumed}");
            }
            visibility = Some(block);
        }
        debug!(
            "world {uid}: visibility={}, markers={}",
            visibility.is_some(),
            visibility.as_ref().map_or(0, |v| v.markers.len())
        );

        Ok(Self {
            uid,
            spawn_point,
            logout_point,
            death_point,
            home_point,
            visibility,
        })
    }

    fn encode_binary<W: Write + Seek>(&self, w: &mut LittleEndianWriter<W>) -> CoreResult<()> {
        w.write_i64(self.uid)?;
        write_optional_point(w, self.spawn_point)?;
        write_optional_point(w, self.logout_point)?;
        write_optional_point(w, self.death_point)?;
        w.write_f32_slice(&self.home_point)?;

        w.write_bool(self.visibility.is_some())?;
        if let Some(visibility) = &self.visibility {
            let slot = w.begin_length_prefix()?;
            visibility.encode_binary(w)?;
            w.finish_length_prefix(slot)?;
        }
        Ok(())
    }

    fn decode_json(value: &JsonValue) -> CoreResult<Self> {
        let j = JsonFields::new("World", value)?;
        let optional_point = |key: &str| -> CoreResult<Option<Point>> {
            if j.has(key) {
                j.get_f32_array(key, [0.0; 3]).map(Some)
            } else {
                Ok(None)
            }
        };
        let visibility = match j.value("VisibilityData") {
            Some(data) => Some(WorldVisibility::decode_json(data)?),
            None => None,
        };
        Ok(Self {
            uid: j.get_i64("UID", 0)?,
            spawn_point: optional_point("SpawnPointXYZ")?,
            logout_point: optional_point("LogoutPointXYZ")?,
            death_point: optional_point("DeathPointXYZ")?,
            home_point: j.get_f32_array("HomePointXYZ", [0.0; 3])?,
            visibility,
        })
    }

    fn encode_json(&self) -> JsonValue {
        let mut out = JsonMap::new();
        out.insert("UID".to_string(), JsonValue::from(self.uid));
        if let Some(point) = &self.spawn_point {
            out.insert("SpawnPointXYZ".to_string(), f32_list_to_json(point));
        }
        if let Some(point) = &self.logout_point {
            out.insert("LogoutPointXYZ".to_string(), f32_list_to_json(point));
        }
        if let Some(point) = &self.death_point {
            out.insert("DeathPointXYZ".to_string(), f32_list_to_json(point));
        }
        out.insert("HomePointXYZ".to_string(), f32_list_to_json(&self.home_point));
        if let Some(visibility) = &self.visibility {
            out.insert("VisibilityData".to_string(), visibility.encode_json());
        }
        JsonValue::Object(out)
    }
}

pub fn read_worlds<R: Read + Seek>(
    r: &mut LittleEndianReader<R>,
    stats: &PlayerStats,
) -> CoreResult<Vec<World>> {
    let worlds = read_records::<World, _>(r, stats.version, "world")?;
    info!("worlds visited: {}", worlds.len());
    Ok(worlds)
}
