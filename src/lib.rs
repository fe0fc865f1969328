mod boundary;
mod buffer;
mod config;
mod field;
mod grid;
mod sim;
mod snapshot;
mod solver;
mod source;
mod vec2;

pub use boundary::{enforce, BoundaryKind};
pub use buffer::DoubleBuffer;
pub use config::{ConfigError, Lookup, ProcessEnv, RunConfig};
pub use field::Field;
pub use grid::Grid;
pub use sim::{clamp_frame_dt, FluidParams, FluidSim, FRAME_DT_FACTOR};
pub use snapshot::{density_to_luma, save_density_png};
pub use solver::{
    add_source, advect, diffuse, divergence_into, max_divergence, project, RELAXATION_SWEEPS,
};
pub use source::{
    inject_density, inject_velocity, pointer_to_cell, Brush, Falloff, ScriptedSource,
};
pub use vec2::Vec2;
