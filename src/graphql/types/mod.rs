pub mod master;
pub mod monster;

pub use master::Master;
pub use monster::{Monster, MonsterFilter, MonsterPage};
