use crate::Field;
use image::error::{ParameterError, ParameterErrorKind};
use image::{GrayImage, ImageError};
use rayon::prelude::*;
use std::path::Path;
use std::sync::OnceLock;

const PAR_THRESHOLD_DEFAULT: usize = 65_536;
const PAR_MIN_ROWS_PER_THREAD: usize = 16;

fn parallel_threshold() -> usize {
    static THRESHOLD: OnceLock<usize> = OnceLock::new();
    *THRESHOLD.get_or_init(|| {
        std::env::var("FLUID_PAR_THRESHOLD")
            .ok()
            .and_then(|value| value.parse::<usize>().ok())
            .filter(|value| *value > 0)
            .unwrap_or(PAR_THRESHOLD_DEFAULT)
    })
}

fn should_parallel(cells: usize, rows: usize) -> bool {
    if cells < parallel_threshold() {
        return false;
    }
    let threads = rayon::current_num_threads().max(1);
    rows / threads >= PAR_MIN_ROWS_PER_THREAD
}

fn luma(value: f32) -> u8 {
    (value.clamp(0.0, 1.0) * 255.0) as u8
}

fn fill_row(row: &mut [u8], density: &Field, j: usize) {
    for (i, pixel) in row.iter_mut().enumerate() {
        *pixel = luma(density.get(i + 1, j));
    }
}

/// Converts the interior of a density field into an `n * n` grayscale image,
/// top row first. Grid row `j = n` is the top of the image.
pub fn density_to_luma(density: &Field, out: &mut Vec<u8>) {
    let n = density.grid().n();
    convert(density, out, should_parallel(n * n, n));
}

fn convert(density: &Field, out: &mut Vec<u8>, parallel: bool) {
    let n = density.grid().n();
    out.resize(n * n, 0);
    if parallel {
        out.par_chunks_mut(n)
            .enumerate()
            .for_each(|(row, pixels)| fill_row(pixels, density, n - row));
    } else {
        for (row, pixels) in out.chunks_mut(n).enumerate() {
            fill_row(pixels, density, n - row);
        }
    }
}

pub fn save_density_png(density: &Field, path: &Path) -> Result<(), ImageError> {
    let n = density.grid().n() as u32;
    let mut pixels = Vec::new();
    density_to_luma(density, &mut pixels);
    let image = GrayImage::from_raw(n, n, pixels).ok_or_else(|| {
        ImageError::Parameter(ParameterError::from_kind(
            ParameterErrorKind::DimensionMismatch,
        ))
    })?;
    image.save(path)
}
