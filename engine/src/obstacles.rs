//! Movable/immovable rectangular obstacles that reflect atoms.

use crate::error::{EngineError, Result};

/// One axis-aligned rectangular obstacle. `mass = f64::INFINITY` marks an
/// immovable obstacle: atoms bounce off it exactly as off a domain wall,
/// and it never integrates under its own forces.
#[derive(Debug, Clone, Copy)]
pub struct Obstacle {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub vx: f64,
    pub vy: f64,
    /// Externally-applied force, already per-mass (i.e. acceleration).
    pub ext_fx: f64,
    pub ext_fy: f64,
    pub friction: f64,
    pub mass: f64,
    pub prev_x: f64,
    pub prev_y: f64,
    pub probe_west: bool,
    pub probe_north: bool,
    pub probe_east: bool,
    pub probe_south: bool,
    pub color: (u8, u8, u8),
    pub visible: bool,
}

#[derive(Debug, Clone, Copy)]
pub struct ObstacleProps {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub vx: f64,
    pub vy: f64,
    pub ext_fx: f64,
    pub ext_fy: f64,
    pub friction: f64,
    pub mass: f64,
    pub probe_west: bool,
    pub probe_north: bool,
    pub probe_east: bool,
    pub probe_south: bool,
    pub color: (u8, u8, u8),
    pub visible: bool,
}

impl Default for ObstacleProps {
    fn default() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            width: 1.0,
            height: 1.0,
            vx: 0.0,
            vy: 0.0,
            ext_fx: 0.0,
            ext_fy: 0.0,
            friction: 0.0,
            mass: f64::INFINITY,
            probe_west: false,
            probe_north: false,
            probe_east: false,
            probe_south: false,
            color: (128, 128, 128),
            visible: true,
        }
    }
}

impl Obstacle {
    fn from_props(props: ObstacleProps) -> Self {
        Self {
            x: props.x,
            y: props.y,
            width: props.width,
            height: props.height,
            vx: props.vx,
            vy: props.vy,
            ext_fx: props.ext_fx,
            ext_fy: props.ext_fy,
            friction: props.friction,
            mass: props.mass,
            prev_x: props.x,
            prev_y: props.y,
            probe_west: props.probe_west,
            probe_north: props.probe_north,
            probe_east: props.probe_east,
            probe_south: props.probe_south,
            color: props.color,
            visible: props.visible,
        }
    }

    #[inline]
    pub fn is_movable(&self) -> bool {
        self.mass.is_finite()
    }

    #[inline]
    pub fn left(&self) -> f64 {
        self.x
    }

    #[inline]
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    #[inline]
    pub fn bottom(&self) -> f64 {
        self.y
    }

    #[inline]
    pub fn top(&self) -> f64 {
        self.y + self.height
    }

    #[inline]
    pub fn prev_left(&self) -> f64 {
        self.prev_x
    }

    #[inline]
    pub fn prev_right(&self) -> f64 {
        self.prev_x + self.width
    }

    #[inline]
    pub fn prev_bottom(&self) -> f64 {
        self.prev_y
    }

    #[inline]
    pub fn prev_top(&self) -> f64 {
        self.prev_y + self.height
    }

    pub fn kinetic_energy_mw(&self) -> f64 {
        if !self.is_movable() {
            return 0.0;
        }
        0.5 * self.mass * (self.vx * self.vx + self.vy * self.vy)
    }
}

#[derive(Debug, Clone, Default)]
pub struct Obstacles {
    list: Vec<Obstacle>,
}

impl Obstacles {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.list.len()
    }

    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Obstacle> {
        self.list.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, Obstacle> {
        self.list.iter_mut()
    }

    pub fn get(&self, i: usize) -> Result<&Obstacle> {
        self.list.get(i).ok_or(EngineError::IndexOutOfRange {
            what: "obstacle",
            index: i,
            len: self.list.len(),
        })
    }

    pub fn get_mut(&mut self, i: usize) -> Result<&mut Obstacle> {
        let len = self.list.len();
        self.list
            .get_mut(i)
            .ok_or(EngineError::IndexOutOfRange {
                what: "obstacle",
                index: i,
                len,
            })
    }

    pub fn add(&mut self, props: ObstacleProps) -> usize {
        self.list.push(Obstacle::from_props(props));
        self.list.len() - 1
    }

    pub fn set_properties(&mut self, i: usize, props: ObstacleProps) -> Result<()> {
        let prev_x = self.get(i)?.prev_x;
        let prev_y = self.get(i)?.prev_y;
        let obstacle = self.get_mut(i)?;
        *obstacle = Obstacle::from_props(props);
        obstacle.prev_x = prev_x;
        obstacle.prev_y = prev_y;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn immovable_obstacle_has_infinite_mass() {
        let obstacles_default = ObstacleProps::default();
        let obstacle = Obstacle::from_props(obstacles_default);
        assert!(!obstacle.is_movable());
        assert_eq!(obstacle.kinetic_energy_mw(), 0.0);
    }

    #[test]
    fn movable_obstacle_reports_finite_mass() {
        let obstacle = Obstacle::from_props(ObstacleProps {
            mass: 10.0,
            vx: 1.0,
            ..Default::default()
        });
        assert!(obstacle.is_movable());
        assert!(obstacle.kinetic_energy_mw() > 0.0);
    }
}
