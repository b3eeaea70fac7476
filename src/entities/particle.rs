//! Capacity-bounded particle system for visual effects
//!
//! Particles never affect gameplay. The pool has a hard cap: once full, new
//! requests are silently dropped so the oldest effects get to finish.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::consts::FRAME_SCALE;

/// Render shape hint for the host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ParticleShape {
    Circle,
    Square,
    Spark,
    Trail,
}

/// A single visual-effect particle
#[derive(Debug, Clone)]
pub struct Particle {
    pub pos: Vec2,
    /// px per reference frame
    pub vel: Vec2,
    pub acceleration: Vec2,
    /// Extra downward acceleration
    pub gravity: f32,
    pub color: [u8; 3],
    pub size: f32,
    pub shape: ParticleShape,
    /// Seconds of life left; fade alpha = lifetime / max_lifetime
    pub lifetime: f32,
    pub max_lifetime: f32,
    pub rotation: f32,
    pub rotation_speed: f32,
    pub scale: f32,
    pub scale_speed: f32,
}

impl Particle {
    /// Advance physics; returns false once expired.
    pub fn update(&mut self, dt: f32) -> bool {
        self.lifetime -= dt;
        if self.lifetime <= 0.0 {
            return false;
        }

        self.vel += self.acceleration * dt;
        self.vel.y += self.gravity * dt;
        self.pos += self.vel * FRAME_SCALE * dt;

        self.rotation += self.rotation_speed * dt;
        self.scale += self.scale_speed * dt;
        true
    }

    /// Fade-out alpha in [0, 1]
    pub fn alpha(&self) -> f32 {
        if self.max_lifetime <= 0.0 {
            0.0
        } else {
            (self.lifetime / self.max_lifetime).clamp(0.0, 1.0)
        }
    }
}

/// Continuous particle source with a rate and optional duration
#[derive(Debug, Clone)]
pub struct ParticleEmitter {
    pub pos: Vec2,
    /// Particles per second
    pub emit_rate: f32,
    /// Negative means run forever
    pub duration: f32,
    pub active: bool,
    pub color: [u8; 3],
    pub particle_size: f32,
    pub particle_lifetime: f32,
    pub speed_range: (f32, f32),
    timer: f32,
    accumulator: f32,
}

impl ParticleEmitter {
    pub fn new(pos: Vec2, emit_rate: f32, duration: f32) -> Self {
        Self {
            pos,
            emit_rate,
            duration,
            active: true,
            color: [255, 200, 100],
            particle_size: 2.0,
            particle_lifetime: 1.0,
            speed_range: (10.0, 50.0),
            timer: 0.0,
            accumulator: 0.0,
        }
    }

    /// Number of whole particles owed this frame. Fractional emission
    /// carries over between frames.
    fn step(&mut self, dt: f32) -> u32 {
        if !self.active {
            return 0;
        }
        self.timer += dt;
        if self.duration > 0.0 && self.timer >= self.duration {
            self.active = false;
            return 0;
        }
        self.accumulator += self.emit_rate * dt;
        let whole = self.accumulator.floor();
        self.accumulator -= whole;
        whole as u32
    }

    fn emit(&self, rng: &mut impl Rng) -> Particle {
        let angle = rng.random_range(0.0..std::f32::consts::TAU);
        let speed = rng.random_range(self.speed_range.0..self.speed_range.1) / FRAME_SCALE;
        Particle {
            pos: self.pos,
            vel: Vec2::new(angle.cos(), angle.sin()) * speed,
            acceleration: Vec2::ZERO,
            gravity: 0.0,
            color: self.color,
            size: rng.random_range(self.particle_size * 0.5..self.particle_size * 1.5),
            shape: if rng.random_bool(0.5) {
                ParticleShape::Circle
            } else {
                ParticleShape::Square
            },
            lifetime: rng.random_range(self.particle_lifetime * 0.5..self.particle_lifetime * 1.5),
            max_lifetime: self.particle_lifetime * 1.5,
            rotation: 0.0,
            rotation_speed: rng.random_range(-5.0..5.0),
            scale: 1.0,
            scale_speed: 0.0,
        }
    }

    pub fn stop(&mut self) {
        self.active = false;
    }
}

/// Owns every live particle and emitter
#[derive(Debug)]
pub struct ParticleSystem {
    particles: Vec<Particle>,
    emitters: Vec<ParticleEmitter>,
    max_particles: usize,
}

impl ParticleSystem {
    pub fn new(max_particles: usize) -> Self {
        Self {
            particles: Vec::with_capacity(max_particles),
            emitters: Vec::new(),
            max_particles,
        }
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    /// Admit a particle unless the pool is at capacity (then it is dropped).
    pub fn add_particle(&mut self, particle: Particle) {
        if self.particles.len() < self.max_particles {
            self.particles.push(particle);
        }
    }

    pub fn add_emitter(&mut self, emitter: ParticleEmitter) {
        self.emitters.push(emitter);
    }

    /// Advance all particles and emitters; expired particles are filtered
    /// out, finished emitters removed.
    pub fn update(&mut self, dt: f32, rng: &mut impl Rng) {
        self.particles.retain_mut(|p| p.update(dt));

        for i in 0..self.emitters.len() {
            let owed = self.emitters[i].step(dt);
            for _ in 0..owed {
                let p = self.emitters[i].emit(rng);
                self.add_particle(p);
            }
        }
        self.emitters.retain(|e| e.active);
    }

    /// Radial explosion burst
    pub fn create_explosion(
        &mut self,
        rng: &mut impl Rng,
        pos: Vec2,
        color: [u8; 3],
        size: f32,
        count: u32,
    ) {
        for _ in 0..count {
            let angle = rng.random_range(0.0..std::f32::consts::TAU);
            let speed = rng.random_range(50.0..200.0) / FRAME_SCALE;
            self.add_particle(Particle {
                pos,
                vel: Vec2::new(angle.cos(), angle.sin()) * speed,
                acceleration: Vec2::ZERO,
                gravity: 0.0,
                color,
                size: rng.random_range(size * 0.5..size * 1.5),
                shape: if rng.random_bool(0.5) {
                    ParticleShape::Circle
                } else {
                    ParticleShape::Spark
                },
                lifetime: rng.random_range(0.5..1.5),
                max_lifetime: 1.5,
                rotation: 0.0,
                rotation_speed: rng.random_range(-5.0..5.0),
                scale: 1.0,
                scale_speed: 0.0,
            });
        }
    }

    /// Loose engine-trail puffs around a point
    pub fn create_trail(&mut self, rng: &mut impl Rng, pos: Vec2, color: [u8; 3], count: u32) {
        for _ in 0..count {
            let offset = Vec2::new(rng.random_range(-5.0..5.0), rng.random_range(-5.0..5.0));
            self.add_particle(Particle {
                pos: pos + offset,
                vel: Vec2::new(rng.random_range(-10.0..10.0), rng.random_range(-10.0..10.0))
                    / FRAME_SCALE,
                acceleration: Vec2::ZERO,
                gravity: 0.0,
                color,
                size: rng.random_range(1.0..3.0),
                shape: ParticleShape::Circle,
                lifetime: rng.random_range(0.2..0.5),
                max_lifetime: 0.5,
                rotation: 0.0,
                rotation_speed: 0.0,
                scale: 1.0,
                scale_speed: 0.0,
            });
        }
    }

    /// Single stationary spinning spark
    pub fn create_sparkle(&mut self, rng: &mut impl Rng, pos: Vec2, color: [u8; 3]) {
        self.add_particle(Particle {
            pos,
            vel: Vec2::ZERO,
            acceleration: Vec2::ZERO,
            gravity: 0.0,
            color,
            size: rng.random_range(2.0..4.0),
            shape: ParticleShape::Spark,
            lifetime: rng.random_range(0.3..0.7),
            max_lifetime: 0.7,
            rotation: 0.0,
            rotation_speed: rng.random_range(-10.0..10.0),
            scale: 1.0,
            scale_speed: -2.0,
        });
    }

    pub fn clear(&mut self) {
        self.particles.clear();
        self.emitters.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn rng() -> Pcg32 {
        Pcg32::seed_from_u64(11)
    }

    #[test]
    fn test_capacity_never_exceeded() {
        let mut ps = ParticleSystem::new(50);
        let mut r = rng();
        for _ in 0..10 {
            ps.create_explosion(&mut r, Vec2::ZERO, [255, 100, 50], 3.0, 30);
            assert!(ps.len() <= 50);
        }
        assert_eq!(ps.len(), 50);
        // Existing particles stay; new ones were the ones dropped
        ps.create_sparkle(&mut r, Vec2::ZERO, [255, 255, 200]);
        assert_eq!(ps.len(), 50);
    }

    #[test]
    fn test_expired_particles_are_filtered() {
        let mut ps = ParticleSystem::new(100);
        let mut r = rng();
        ps.create_trail(&mut r, Vec2::ZERO, [100, 150, 255], 5);
        assert_eq!(ps.len(), 5);
        // Trails live at most 0.5 s
        ps.update(0.6, &mut r);
        assert!(ps.is_empty());
    }

    #[test]
    fn test_particle_physics_integration() {
        let mut p = Particle {
            pos: Vec2::ZERO,
            vel: Vec2::new(1.0, 0.0),
            acceleration: Vec2::new(0.0, 2.0),
            gravity: 1.0,
            color: [255, 255, 255],
            size: 2.0,
            shape: ParticleShape::Circle,
            lifetime: 1.0,
            max_lifetime: 1.0,
            rotation: 0.0,
            rotation_speed: 1.0,
            scale: 1.0,
            scale_speed: 0.5,
        };
        assert!(p.update(0.5));
        assert!(p.pos.x > 0.0);
        // Acceleration plus gravity both pull the velocity downward
        assert!((p.vel.y - 1.5).abs() < 1e-6);
        assert!((p.rotation - 0.5).abs() < 1e-6);
        assert!((p.alpha() - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_emitter_fractional_accumulation() {
        let mut ps = ParticleSystem::new(100);
        let mut r = rng();
        // 10/s at 0.05 s steps: half a particle per step
        ps.add_emitter(ParticleEmitter::new(Vec2::ZERO, 10.0, -1.0));
        ps.update(0.05, &mut r);
        assert_eq!(ps.len(), 0);
        ps.update(0.05, &mut r);
        assert_eq!(ps.len(), 1);
    }

    #[test]
    fn test_emitter_duration_cutoff() {
        let mut ps = ParticleSystem::new(100);
        let mut r = rng();
        ps.add_emitter(ParticleEmitter::new(Vec2::ZERO, 100.0, 0.2));
        ps.update(0.1, &mut r);
        let after_first = ps.len();
        assert!(after_first > 0);
        // Past the duration the emitter deactivates and is removed
        ps.update(0.2, &mut r);
        ps.update(0.1, &mut r);
        assert!(ps.emitters.is_empty());
    }
}
