mod engine;
mod error;
mod types;

pub use engine::{Engine, Session};
pub(crate) use error::check_version;
pub use error::{CoreError, CoreErrorCode, CoreResult};
pub use types::{ItemEntry, Origin, SkillEntry, Snapshot, WorldEntry};
