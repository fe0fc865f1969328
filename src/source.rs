use crate::{Field, Grid, Vec2};
use std::f32::consts::TAU;

/// Adds `amount` to one cell of a previous/source density buffer. The caller
/// keeps `(i, j)` inside `[1, n]`.
pub fn inject_density(prev_density: &mut Field, i: usize, j: usize, amount: f32) {
    prev_density.add(i, j, amount);
}

/// Adds an impulse to one cell of both previous/source velocity buffers.
pub fn inject_velocity(
    prev_u: &mut Field,
    prev_v: &mut Field,
    i: usize,
    j: usize,
    vx: f32,
    vy: f32,
) {
    prev_u.add(i, j, vx);
    prev_v.add(i, j, vy);
}

/// Weight applied to a deposit at offset `(di, dj)` from a kernel centre.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Falloff {
    Uniform,
    Manhattan { slope: f32 },
    Gaussian { sigma: f32 },
}

impl Falloff {
    pub fn weight(self, di: i32, dj: i32) -> f32 {
        match self {
            Falloff::Uniform => 1.0,
            Falloff::Manhattan { slope } => {
                let distance = (di.abs() + dj.abs()) as f32;
                (1.0 - slope * distance).max(0.0)
            }
            Falloff::Gaussian { sigma } => {
                let r2 = (di * di + dj * dj) as f32;
                (-r2 / (2.0 * sigma * sigma)).exp()
            }
        }
    }
}

/// Maps a pointer position in window pixels (origin top-left) to the interior
/// cell under it, with `j` growing upwards.
pub fn pointer_to_cell(
    x: f32,
    y: f32,
    width: f32,
    height: f32,
    grid: Grid,
) -> Option<(usize, usize)> {
    if width <= 0.0 || height <= 0.0 {
        return None;
    }
    let n = grid.n() as f32;
    let i = (x / width * n).floor() as i32 + 1;
    let j = ((height - y) / height * n).floor() as i32 + 1;
    grid.contains_interior(i, j).then(|| (i as usize, j as usize))
}

/// Interactive drag brush: a square neighbourhood of deposits weighted by
/// `falloff`, clipped to the interior.
#[derive(Clone, Copy, Debug)]
pub struct Brush {
    pub radius: i32,
    pub falloff: Falloff,
    pub density: f32,
    pub pointer_gain: f32,
    pub velocity_limit: f32,
    pub velocity_scale: f32,
}

impl Default for Brush {
    fn default() -> Self {
        Self {
            radius: 2,
            falloff: Falloff::Manhattan { slope: 0.05 },
            density: 60.0,
            pointer_gain: 0.3,
            velocity_limit: 10.0,
            velocity_scale: 10.0,
        }
    }
}

impl Brush {
    /// Converts a pointer delta in window pixels into a bounded grid-space
    /// velocity. Screen y grows downwards, grid y grows upwards.
    pub fn drag_velocity(&self, dx_px: f32, dy_px: f32) -> Vec2 {
        Vec2::new(dx_px, -dy_px)
            .scale(self.pointer_gain)
            .clamp_components(self.velocity_limit)
    }

    pub fn stroke(
        &self,
        prev_density: &mut Field,
        prev_u: &mut Field,
        prev_v: &mut Field,
        i: usize,
        j: usize,
        velocity: Vec2,
    ) {
        let grid = prev_density.grid();
        let impulse = velocity.scale(self.velocity_scale);
        for di in -self.radius..=self.radius {
            for dj in -self.radius..=self.radius {
                let ci = i as i32 + di;
                let cj = j as i32 + dj;
                if !grid.contains_interior(ci, cj) {
                    continue;
                }
                let (ci, cj) = (ci as usize, cj as usize);
                let factor = self.falloff.weight(di, dj);
                inject_velocity(prev_u, prev_v, ci, cj, impulse.x * factor, impulse.y * factor);
                inject_density(prev_density, ci, cj, self.density * factor);
            }
        }
    }
}

/// Ambient emitter at the grid centre whose velocity direction rotates with
/// simulation time. Every cell within `radius` receives the same deposit.
#[derive(Clone, Copy, Debug)]
pub struct ScriptedSource {
    pub radius: f32,
    pub density: f32,
    pub strength: f32,
    pub rotation_speed: f32,
}

impl Default for ScriptedSource {
    fn default() -> Self {
        Self {
            radius: 5.0,
            density: 500.0,
            strength: 50.0,
            rotation_speed: 0.5,
        }
    }
}

impl ScriptedSource {
    pub fn direction(&self, time: f32) -> Vec2 {
        Vec2::from_angle((time * self.rotation_speed).rem_euclid(TAU))
    }

    pub fn apply(
        &self,
        prev_density: &mut Field,
        prev_u: &mut Field,
        prev_v: &mut Field,
        time: f32,
        dt: f32,
    ) {
        let grid = prev_density.grid();
        let n = grid.n() as i32;
        let (cx, cy) = grid.center();
        let impulse = self.direction(time).scale(self.strength * dt);
        let amount = self.density * dt;
        let min_i = ((cx - self.radius) as i32).max(1);
        let max_i = ((cx + self.radius) as i32).min(n);
        let min_j = ((cy - self.radius) as i32).max(1);
        let max_j = ((cy + self.radius) as i32).min(n);
        for i in min_i..=max_i {
            for j in min_j..=max_j {
                let dx = i as f32 - cx;
                let dy = j as f32 - cy;
                if (dx * dx + dy * dy).sqrt() > self.radius {
                    continue;
                }
                let (i, j) = (i as usize, j as usize);
                inject_density(prev_density, i, j, amount);
                inject_velocity(prev_u, prev_v, i, j, impulse.x, impulse.y);
            }
        }
    }
}
