//! Frame systems that operate across entity containers

pub mod collision;
pub mod spawn;
pub mod wave;

pub use collision::CollisionOutcome;
pub use spawn::{SpawnPattern, SpawnSystem};
pub use wave::{WaveOutcome, WaveSystem, wave_config};
