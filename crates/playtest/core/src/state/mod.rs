//! Level and perception data model.
//!
//! - [`common`]: identifiers and vector math
//! - [`entity`]: authored level entities and the read-only catalog
//! - [`perceived`]: per-tick perception snapshot
mod common;
mod entity;
mod perceived;

pub use common::{AgentId, AgentPose, EntityId, Vec3};
pub use entity::{EntityCatalog, EntityType, LevelEntity, Omniscience};
pub use perceived::{PerceivedEntity, PerceivedInfo};
