use anyhow::{Context, Result};
use log::info;
use stable_fluids::{
    clamp_frame_dt, max_divergence, save_density_png, FluidParams, FluidSim, RunConfig,
    ScriptedSource,
};
use std::path::{Path, PathBuf};
use std::time::Instant;

fn snapshot_path(dir: &Path, frame: u64) -> PathBuf {
    dir.join(format!("density_{frame:05}.png"))
}

fn write_snapshot(sim: &FluidSim, dir: &Path) -> Result<()> {
    let path = snapshot_path(dir, sim.frame());
    save_density_png(sim.density(), &path).with_context(|| format!("writing {}", path.display()))
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let params = FluidParams::from_env().context("invalid simulation parameters")?;
    let run = RunConfig::from_env().context("invalid run configuration")?;
    let out_dir = std::env::args_os()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("frames"));
    std::fs::create_dir_all(&out_dir)
        .with_context(|| format!("creating {}", out_dir.display()))?;

    let mut sim = FluidSim::new(params);
    if run.scripted {
        sim = sim.with_scripted_source(ScriptedSource::default());
    }
    info!(
        "running {} frames, scripted source {}",
        run.frames,
        if run.scripted { "on" } else { "off" }
    );

    let started = Instant::now();
    let mut last = Instant::now();
    for _ in 0..run.frames {
        let now = Instant::now();
        let frame_time = now.duration_since(last).as_secs_f32();
        last = now;
        // The first frame has no measured time yet.
        let dt = if run.realtime && sim.frame() > 0 {
            clamp_frame_dt(params.dt, frame_time)
        } else {
            params.dt
        };
        sim.update(dt);
        if run.snapshot_due(sim.frame()) {
            write_snapshot(&sim, &out_dir)?;
        }
    }

    let path = snapshot_path(&out_dir, sim.frame());
    if !run.snapshot_due(sim.frame()) {
        write_snapshot(&sim, &out_dir)?;
    }
    let (u, v) = sim.velocity();
    info!(
        "done: {} frames in {:.2?}, t={:.3}, mass={:.3}, max_div={:.3e}, wrote {}",
        sim.frame(),
        started.elapsed(),
        sim.time(),
        sim.density().interior_sum(),
        max_divergence(u, v),
        path.display()
    );
    Ok(())
}
