use std::io::{Read, Seek, Write};

use log::info;
use serde_json::{Map as JsonMap, Value as JsonValue};

use crate::codex::SkillType;
use crate::core_api::{CoreError, CoreResult, check_version};
use crate::json::{JsonFields, decode_list, f32_to_json};
use crate::reader::LittleEndianReader;
use crate::record::{Record, read_records, records_to_json, write_records};
use crate::writer::LittleEndianWriter;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Skill {
    pub skill: SkillType,
    pub level: f32,
    pub experience: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SkillList {
    pub version: i32,
    pub skills: Vec<Skill>,
}

impl Record for Skill {
    /// Owning skill list version.
    type Context = i32;

    fn decode_binary<R: Read + Seek>(r: &mut LittleEndianReader<R>, version: i32) -> CoreResult<Self> {
        let skill = SkillType::from_raw(r.read_i32()?);
        let level = r.read_f32()?;
        let experience = if version >= SkillList::EXPERIENCE_SINCE {
            r.read_f32()?
        } else {
            0.0
        };
        Ok(Self {
            skill,
            level,
            experience,
        })
    }

    fn encode_binary<W: Write + Seek>(&self, w: &mut LittleEndianWriter<W>) -> CoreResult<()> {
        w.write_i32(self.skill.raw())?;
        w.write_f32(self.level)?;
        w.write_f32(self.experience)?;
        Ok(())
    }

    fn decode_json(value: &JsonValue) -> CoreResult<Self> {
        let j = JsonFields::new("Skill", value)?;
        let name = j.get_str("Name", "0x00")?;
        let skill = SkillType::from_name(&name)
            .ok_or_else(|| CoreError::type_mismatch(format!("unknown skill '{name}'")))?;
        Ok(Self {
            skill,
            level: j.get_f32("Level", 0.0)?,
            experience: j.get_f32("Experience", 0.0)?,
        })
    }

    fn encode_json(&self) -> JsonValue {
        let mut out = JsonMap::new();
        out.insert("Name".to_string(), JsonValue::String(self.skill.name()));
        out.insert("Level".to_string(), f32_to_json(self.level));
        out.insert("Experience".to_string(), f32_to_json(self.experience));
        JsonValue::Object(out)
    }
}

impl SkillList {
    pub const CURRENT_VERSION: i32 = 2;
    pub const EXPERIENCE_SINCE: i32 = 2;

    pub fn find(&self, skill: SkillType) -> Option<&Skill> {
        self.skills.iter().find(|s| s.skill == skill)
    }
}

impl Default for SkillList {
    fn default() -> Self {
        Self {
            version: Self::CURRENT_VERSION,
            skills: Vec::new(),
        }
    }
}

impl Record for SkillList {
    type Context = ();

    fn decode_binary<R: Read + Seek>(r: &mut LittleEndianReader<R>, _: ()) -> CoreResult<Self> {
        let version = r.read_i32()?;
        check_version("skill list", version, None, Self::CURRENT_VERSION)?;
        info!("skills version: {version}");
        let skills = read_records::<Skill, _>(r, version, "skill")?;
        Ok(Self { version, skills })
    }

    fn encode_binary<W: Write + Seek>(&self, w: &mut LittleEndianWriter<W>) -> CoreResult<()> {
        w.write_i32(Self::CURRENT_VERSION)?;
        write_records(w, &self.skills, "skill")
    }

    fn decode_json(value: &JsonValue) -> CoreResult<Self> {
        Ok(Self {
            version: Self::CURRENT_VERSION,
            skills: decode_list("Skills", value, Skill::decode_json)?,
        })
    }

    fn encode_json(&self) -> JsonValue {
        records_to_json(&self.skills)
    }
}
