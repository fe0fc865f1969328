use crate::{
    solver::{add_source, advect, diffuse, max_divergence, project},
    source::{self, Brush, ScriptedSource},
    BoundaryKind, DoubleBuffer, Field, Grid, Vec2,
};
use log::{debug, info};

/// Upper bound on how far a measured frame time may stretch the step.
pub const FRAME_DT_FACTOR: f32 = 5.0;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FluidParams {
    pub n: usize,
    pub dt: f32,
    pub diffusion: f32,
    pub viscosity: f32,
}

impl Default for FluidParams {
    fn default() -> Self {
        Self {
            n: 200,
            dt: 0.01,
            diffusion: 0.0001,
            viscosity: 0.001,
        }
    }
}

/// Caps the step used for a frame: `min(configured, frame_time * 5)`.
pub fn clamp_frame_dt(configured: f32, frame_time: f32) -> f32 {
    configured.min(frame_time * FRAME_DT_FACTOR)
}

/// Owns every buffer of the simulation. Each quantity is a current/previous
/// pair; the previous slot collects injections between steps and is scratch
/// space while stepping.
#[derive(Clone, Debug)]
pub struct FluidSim {
    params: FluidParams,
    grid: Grid,
    density: DoubleBuffer,
    u: DoubleBuffer,
    v: DoubleBuffer,
    scripted: Option<ScriptedSource>,
    time: f32,
    frame: u64,
}

impl FluidSim {
    pub fn new(params: FluidParams) -> Self {
        let grid = Grid::new(params.n);
        info!(
            "fluid sim: n={} cells={} diffusion={} viscosity={}",
            params.n,
            grid.size(),
            params.diffusion,
            params.viscosity
        );
        Self {
            params,
            grid,
            density: DoubleBuffer::new(grid),
            u: DoubleBuffer::new(grid),
            v: DoubleBuffer::new(grid),
            scripted: None,
            time: 0.0,
            frame: 0,
        }
    }

    pub fn with_scripted_source(mut self, source: ScriptedSource) -> Self {
        self.scripted = Some(source);
        self
    }

    /// Zeroes every buffer and the clock.
    pub fn reset(&mut self) {
        self.density.clear();
        self.u.clear();
        self.v.clear();
        self.time = 0.0;
        self.frame = 0;
    }

    pub fn params(&self) -> FluidParams {
        self.params
    }

    pub fn grid(&self) -> Grid {
        self.grid
    }

    pub fn time(&self) -> f32 {
        self.time
    }

    pub fn frame(&self) -> u64 {
        self.frame
    }

    pub fn density_at(&self, i: usize, j: usize) -> f32 {
        self.density.current().get(i, j)
    }

    pub fn density(&self) -> &Field {
        self.density.current()
    }

    pub fn velocity(&self) -> (&Field, &Field) {
        (self.u.current(), self.v.current())
    }

    pub fn pending_density(&self) -> &Field {
        self.density.previous()
    }

    pub fn pending_velocity(&self) -> (&Field, &Field) {
        (self.u.previous(), self.v.previous())
    }

    pub fn inject_density(&mut self, i: usize, j: usize, amount: f32) {
        source::inject_density(self.density.previous_mut(), i, j, amount);
    }

    pub fn inject_velocity(&mut self, i: usize, j: usize, vx: f32, vy: f32) {
        source::inject_velocity(self.u.previous_mut(), self.v.previous_mut(), i, j, vx, vy);
    }

    pub fn apply_brush(&mut self, brush: &Brush, i: usize, j: usize, velocity: Vec2) {
        brush.stroke(
            self.density.previous_mut(),
            self.u.previous_mut(),
            self.v.previous_mut(),
            i,
            j,
            velocity,
        );
    }

    /// Deposits the ambient rotating source for `time`. Without a configured
    /// source this uses the default emitter.
    pub fn advance_scripted_source(&mut self, time: f32, dt: f32) {
        let emitter = self.scripted.unwrap_or_default();
        emitter.apply(
            self.density.previous_mut(),
            self.u.previous_mut(),
            self.v.previous_mut(),
            time,
            dt,
        );
    }

    /// One frame as driven by a frame loop: advance the clock, feed the
    /// scripted source if one is configured, then step.
    pub fn update(&mut self, dt: f32) {
        self.time += dt;
        if self.scripted.is_some() {
            self.advance_scripted_source(self.time, dt);
        }
        self.step(dt);
    }

    pub fn step(&mut self, dt: f32) {
        self.velocity_step(dt);
        self.density_step(dt);
        self.density.clear_previous();
        self.u.clear_previous();
        self.v.clear_previous();
        self.frame += 1;
        if log::log_enabled!(log::Level::Debug) {
            let (u, v) = self.velocity();
            debug!(
                "frame={} dt={:.4} mass={:.4} max_div={:.3e}",
                self.frame,
                dt,
                self.density().interior_sum(),
                max_divergence(u, v)
            );
        }
    }

    fn velocity_step(&mut self, dt: f32) {
        let viscosity = self.params.viscosity;
        {
            let (u, u0) = self.u.split_current_mut();
            add_source(u, u0, dt);
            let (v, v0) = self.v.split_current_mut();
            add_source(v, v0, dt);
        }
        self.u.swap();
        {
            let (u, u0) = self.u.split_current_mut();
            diffuse(BoundaryKind::HorizontalVelocity, u, u0, viscosity, dt);
        }
        self.v.swap();
        {
            let (v, v0) = self.v.split_current_mut();
            diffuse(BoundaryKind::VerticalVelocity, v, v0, viscosity, dt);
        }
        self.project();
        self.u.swap();
        self.v.swap();
        // The projected velocity now sits in the previous slots and is the
        // field both components are traced through.
        {
            let (u, u0) = self.u.split_current_mut();
            advect(BoundaryKind::HorizontalVelocity, u, u0, u0, self.v.previous(), dt);
        }
        {
            let (v, v0) = self.v.split_current_mut();
            advect(BoundaryKind::VerticalVelocity, v, v0, self.u.previous(), v0, dt);
        }
        self.project();
    }

    fn density_step(&mut self, dt: f32) {
        let diffusion = self.params.diffusion;
        {
            let (x, x0) = self.density.split_current_mut();
            add_source(x, x0, dt);
        }
        self.density.swap();
        {
            let (x, x0) = self.density.split_current_mut();
            diffuse(BoundaryKind::Scalar, x, x0, diffusion, dt);
        }
        self.density.swap();
        let (x, x0) = self.density.split_current_mut();
        advect(BoundaryKind::Scalar, x, x0, self.u.current(), self.v.current(), dt);
    }

    fn project(&mut self) {
        let (u, pressure) = self.u.split_mut();
        let (v, divergence) = self.v.split_mut();
        project(u, v, pressure, divergence);
    }
}
