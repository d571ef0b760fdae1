//! Particle Pool
//!
//! Fixed-capacity ring buffer of visual-effect points. Emission writes the
//! next `count` slots after a monotonically advancing cursor, overwriting
//! whatever was there (oldest emission evicted first). Slots carry no
//! gameplay meaning; the renderer draws every occupied one.

use bevy::prelude::*;
use rand::Rng;

use super::components::GameRng;
use super::constants::*;

/// One particle
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ParticleSlot {
    pub position: Vec3,
    /// Displacement per tick
    pub velocity: Vec3,
    pub color: Color,
    pub size: f32,
    /// False once the slot has decayed or left the world bound
    pub occupied: bool,
}

impl Default for ParticleSlot {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            velocity: Vec3::ZERO,
            color: Color::WHITE,
            size: 0.0,
            occupied: false,
        }
    }
}

/// Request to emit a burst of particles this frame
#[derive(Event, Clone, Copy, Debug)]
pub struct ParticleBurst {
    pub origin: Vec3,
    /// General direction of travel; spread is added per particle
    pub direction: Vec3,
    pub color: Color,
    pub count: usize,
}

impl ParticleBurst {
    /// Burst rising from a point
    pub fn upward(origin: Vec3, color: Color, count: usize) -> Self {
        Self {
            origin,
            direction: Vec3::Y,
            color,
            count,
        }
    }
}

/// The ring buffer
#[derive(Resource, Clone, Debug)]
pub struct ParticlePool {
    slots: Vec<ParticleSlot>,
    cursor: usize,
}

impl Default for ParticlePool {
    fn default() -> Self {
        Self::with_capacity(PARTICLE_CAPACITY)
    }
}

impl ParticlePool {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: vec![ParticleSlot::default(); capacity],
            cursor: 0,
        }
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Index the next emission starts writing at
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn slots(&self) -> &[ParticleSlot] {
        &self.slots
    }

    pub fn live_count(&self) -> usize {
        self.slots.iter().filter(|s| s.occupied).count()
    }

    /// Write `count` particles starting at the cursor and advance it.
    ///
    /// Returns the index of the first slot written. Bursts larger than the
    /// pool are truncated to its capacity.
    pub fn emit<R: Rng>(
        &mut self,
        origin: Vec3,
        direction: Vec3,
        color: Color,
        count: usize,
        rng: &mut R,
    ) -> usize {
        let capacity = self.capacity();
        let start = self.cursor;
        if capacity == 0 {
            return start;
        }
        let count = count.min(capacity);

        for i in 0..count {
            let spread = Vec3::new(
                rng.gen_range(-PARTICLE_SPREAD..=PARTICLE_SPREAD),
                rng.gen_range(-PARTICLE_SPREAD..=PARTICLE_SPREAD),
                rng.gen_range(-PARTICLE_SPREAD..=PARTICLE_SPREAD),
            );
            self.slots[(start + i) % capacity] = ParticleSlot {
                position: origin,
                velocity: (direction + spread).normalize_or_zero() * PARTICLE_SPEED,
                color,
                size: PARTICLE_START_SIZE,
                occupied: true,
            };
        }

        self.cursor = (start + count) % capacity;
        start
    }

    /// Advance every occupied slot by one tick.
    pub fn integrate(&mut self) {
        for slot in self.slots.iter_mut().filter(|s| s.occupied) {
            slot.position += slot.velocity;
            slot.velocity *= PARTICLE_DECAY;
            slot.size *= PARTICLE_DECAY;

            if slot.size < PARTICLE_MIN_SIZE || slot.position.length() > PARTICLE_WORLD_BOUND {
                *slot = ParticleSlot::default();
            }
        }
    }

    /// Empty every slot and rewind the cursor
    pub fn clear(&mut self) {
        self.slots.fill(ParticleSlot::default());
        self.cursor = 0;
    }
}

/// Write this frame's bursts into the pool.
pub fn emit_particle_bursts(
    mut bursts: EventReader<ParticleBurst>,
    mut pool: ResMut<ParticlePool>,
    mut rng: ResMut<GameRng>,
) {
    for burst in bursts.read() {
        pool.emit(burst.origin, burst.direction, burst.color, burst.count, &mut *rng);
    }
}

/// Advance all particles one tick.
pub fn integrate_particles(mut pool: ResMut<ParticlePool>) {
    pool.integrate();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cursor_wraps() {
        let mut pool = ParticlePool::with_capacity(10);
        let mut rng = GameRng::from_seed(3);
        pool.emit(Vec3::ZERO, Vec3::Y, Color::WHITE, 8, &mut rng);
        let start = pool.emit(Vec3::ZERO, Vec3::Y, Color::WHITE, 5, &mut rng);
        assert_eq!(start, 8);
        assert_eq!(pool.cursor(), 3);
        assert_eq!(pool.live_count(), 10);
    }

    #[test]
    fn test_out_of_bounds_slot_is_recycled() {
        let mut pool = ParticlePool::with_capacity(4);
        let mut rng = GameRng::from_seed(3);
        pool.emit(Vec3::new(49.9, 0.0, 0.0), Vec3::X, Color::WHITE, 1, &mut rng);
        pool.integrate();
        assert_eq!(pool.live_count(), 0);
        assert_eq!(pool.slots()[0], ParticleSlot::default());
    }
}
