//! Snapshot of simulation state passed to plugin callbacks.

use std::time::Duration;

use glam::Vec2;

/// Read-only view of the running simulation.
///
/// Plugins receive a shared reference to this in `update` and `draw`. The
/// host advances it once per frame; plugins never mutate it.
#[derive(Clone, Debug, PartialEq)]
pub struct Simulation {
    world_size: Vec2,
    iteration: u64,
    elapsed: Duration,
}

impl Simulation {
    /// Creates a simulation with the given world size, at iteration zero.
    pub fn new(world_size: Vec2) -> Self {
        Self {
            world_size,
            iteration: 0,
            elapsed: Duration::ZERO,
        }
    }

    /// Size of the simulated world, used to scale grid space into world space.
    pub fn world_size(&self) -> Vec2 {
        self.world_size
    }

    /// Number of completed iterations.
    pub fn iteration(&self) -> u64 {
        self.iteration
    }

    /// Total simulated time.
    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    pub(crate) fn advance(&mut self, dt: Duration) {
        self.iteration += 1;
        self.elapsed += dt;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn advance_accumulates() {
        let mut sim = Simulation::new(Vec2::new(10.0, 10.0));
        assert_eq!(sim.iteration(), 0);

        sim.advance(Duration::from_millis(16));
        sim.advance(Duration::from_millis(16));

        assert_eq!(sim.iteration(), 2);
        assert_eq!(sim.elapsed(), Duration::from_millis(32));
        assert_eq!(sim.world_size(), Vec2::new(10.0, 10.0));
    }
}
