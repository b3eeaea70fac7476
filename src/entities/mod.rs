//! Entity types: the player ship, enemies, projectiles, particles, pickups
//!
//! Each entity is a plain mutable record owned by exactly one container on
//! `Game`. Death is two-phase: systems flip `alive` off during their passes
//! and the per-frame cleanup compacts the containers afterwards, so nothing
//! is removed while another pass is still iterating.

pub mod bullet;
pub mod enemy;
pub mod particle;
pub mod pickup;
pub mod player;

pub use bullet::{Bullet, BulletKind, LaserBeam};
pub use enemy::{Enemy, EnemyBehavior, EnemyType};
pub use particle::{Particle, ParticleEmitter, ParticleSystem};
pub use pickup::{Pickup, PickupKind};
pub use player::Player;
