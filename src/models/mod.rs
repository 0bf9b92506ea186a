mod banner;
mod entity;

pub use banner::Banner;
pub use entity::{Entity, EntityId, ID_FIELD};
