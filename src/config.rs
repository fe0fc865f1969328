use crate::FluidParams;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("{key}={value:?} is not a valid value")]
    Parse { key: &'static str, value: String },
    #[error("grid resolution must be at least 1")]
    ZeroResolution,
    #[error("timestep must be positive, got {0}")]
    NonPositiveTimestep(f32),
    #[error("{key} must not be negative, got {value}")]
    NegativeRate { key: &'static str, value: f32 },
}

/// Source of `KEY=value` overrides. The process environment in practice, a
/// closure in tests.
pub trait Lookup {
    fn get(&self, key: &str) -> Option<String>;
}

pub struct ProcessEnv;

impl Lookup for ProcessEnv {
    fn get(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }
}

impl<F> Lookup for F
where
    F: Fn(&str) -> Option<String>,
{
    fn get(&self, key: &str) -> Option<String> {
        self(key)
    }
}

fn read<T: FromStr>(
    env: &impl Lookup,
    key: &'static str,
    fallback: T,
) -> Result<T, ConfigError> {
    match env.get(key) {
        None => Ok(fallback),
        Some(value) => value
            .trim()
            .parse::<T>()
            .map_err(|_| ConfigError::Parse { key, value }),
    }
}

impl FluidParams {
    /// Defaults overridden by `FLUID_N`, `FLUID_DT`, `FLUID_DIFFUSION` and
    /// `FLUID_VISCOSITY`.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(&ProcessEnv)
    }

    pub fn from_lookup(env: &impl Lookup) -> Result<Self, ConfigError> {
        let base = Self::default();
        let params = Self {
            n: read(env, "FLUID_N", base.n)?,
            dt: read(env, "FLUID_DT", base.dt)?,
            diffusion: read(env, "FLUID_DIFFUSION", base.diffusion)?,
            viscosity: read(env, "FLUID_VISCOSITY", base.viscosity)?,
        };
        params.validate()?;
        Ok(params)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.n == 0 {
            return Err(ConfigError::ZeroResolution);
        }
        if !(self.dt > 0.0) {
            return Err(ConfigError::NonPositiveTimestep(self.dt));
        }
        if self.diffusion < 0.0 {
            return Err(ConfigError::NegativeRate {
                key: "FLUID_DIFFUSION",
                value: self.diffusion,
            });
        }
        if self.viscosity < 0.0 {
            return Err(ConfigError::NegativeRate {
                key: "FLUID_VISCOSITY",
                value: self.viscosity,
            });
        }
        Ok(())
    }
}

/// Settings for the headless driver.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RunConfig {
    pub frames: u64,
    pub scripted: bool,
    pub snapshot_every: u64,
    pub realtime: bool,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            frames: 600,
            scripted: true,
            snapshot_every: 0,
            realtime: false,
        }
    }
}

impl RunConfig {
    /// Reads `FLUID_FRAMES`, `FLUID_SCRIPTED` (`0` disables the emitter),
    /// `FLUID_SNAPSHOT_EVERY` (`0` writes only the final frame) and
    /// `FLUID_REALTIME` (`1` caps each step by the measured frame time).
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(&ProcessEnv)
    }

    pub fn from_lookup(env: &impl Lookup) -> Result<Self, ConfigError> {
        let base = Self::default();
        Ok(Self {
            frames: read(env, "FLUID_FRAMES", base.frames)?,
            scripted: env
                .get("FLUID_SCRIPTED")
                .map(|value| value.trim() != "0")
                .unwrap_or(base.scripted),
            snapshot_every: read(env, "FLUID_SNAPSHOT_EVERY", base.snapshot_every)?,
            realtime: env
                .get("FLUID_REALTIME")
                .map(|value| value.trim() == "1")
                .unwrap_or(base.realtime),
        })
    }

    pub fn snapshot_due(&self, frame: u64) -> bool {
        self.snapshot_every > 0 && frame % self.snapshot_every == 0
    }
}
