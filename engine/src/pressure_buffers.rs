//! Rolling directional impulse buffers per obstacle probe wall.

use crate::units::force_per_length_to_bar;

/// Which wall of an obstacle's inflated bounding box a collision crossed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Wall {
    West,
    North,
    East,
    South,
}

#[derive(Debug, Clone, Copy, Default)]
struct Impulses {
    west: f64,
    north: f64,
    east: f64,
    south: f64,
}

impl Impulses {
    fn get(&self, wall: Wall) -> f64 {
        match wall {
            Wall::West => self.west,
            Wall::North => self.north,
            Wall::East => self.east,
            Wall::South => self.south,
        }
    }

    fn add(&mut self, wall: Wall, value: f64) {
        match wall {
            Wall::West => self.west += value,
            Wall::North => self.north += value,
            Wall::East => self.east += value,
            Wall::South => self.south += value,
        }
    }
}

/// One rolling window per obstacle: accumulated normal impulse on each
/// probed wall since the window was last read, and the simulated time the
/// window has been open.
#[derive(Debug, Clone, Default)]
pub struct PressureBuffers {
    windows: Vec<Impulses>,
    elapsed_fs: f64,
}

impl PressureBuffers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_obstacle(&mut self) -> usize {
        self.windows.push(Impulses::default());
        self.windows.len() - 1
    }

    pub fn len(&self) -> usize {
        self.windows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.windows.is_empty()
    }

    /// Accumulate `m*(v_before - v_after)` (signed, already oriented along
    /// the wall's outward normal by the caller) into obstacle `idx`'s
    /// buffer for `wall`.
    pub fn accumulate(&mut self, idx: usize, wall: Wall, impulse: f64) {
        if let Some(window) = self.windows.get_mut(idx) {
            window.add(wall, impulse);
        }
    }

    /// Advance every window's elapsed-time clock. Called once per
    /// `integrate(duration, dt)` call with the full `duration`, matching
    /// the spec's "after the loop, pressure buffers are advanced by
    /// duration".
    pub fn advance(&mut self, duration_fs: f64) {
        self.elapsed_fs += duration_fs;
    }

    /// Time-averaged pressure on `wall` of obstacle `idx`, in bar, using
    /// `length_nm` as the probe's extent (the obstacle's height for the
    /// E/W walls, width for N/S). Zero while the window has no elapsed
    /// time yet.
    pub fn pressure_bar(&self, idx: usize, wall: Wall, length_nm: f64) -> f64 {
        if self.elapsed_fs <= 0.0 || length_nm <= 0.0 {
            return 0.0;
        }
        let Some(window) = self.windows.get(idx) else {
            return 0.0;
        };
        let force = window.get(wall).abs() / self.elapsed_fs;
        force_per_length_to_bar(force / length_nm)
    }

    /// Reset every window to start a fresh averaging period. A caller that
    /// wants a genuinely "rolling" average instead calls this on a fixed
    /// cadence after reading; the engine itself never calls this
    /// automatically, leaving the averaging window under host control.
    pub fn reset(&mut self) {
        for window in &mut self.windows {
            *window = Impulses::default();
        }
        self.elapsed_fs = 0.0;
    }
}
