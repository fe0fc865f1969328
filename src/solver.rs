use crate::{boundary::enforce, BoundaryKind, Field};

/// Gauss-Seidel sweeps per diffusion solve and per pressure solve.
pub const RELAXATION_SWEEPS: usize = 20;

/// `field += dt * source` over the whole buffer, ghost ring included.
pub fn add_source(field: &mut Field, source: &Field, dt: f32) {
    field.add_scaled_in_place(source, dt);
}

/// Implicit diffusion of `source` into `field`. `field` doubles as the
/// initial guess, so callers normally pass the buffer left over from the
/// previous frame.
pub fn diffuse(kind: BoundaryKind, field: &mut Field, source: &Field, rate: f32, dt: f32) {
    let n = field.grid().n() as f32;
    let a = dt * rate * n * n;
    for _ in 0..RELAXATION_SWEEPS {
        diffusion_sweep(field, source, a);
        enforce(kind, field);
    }
}

fn diffusion_sweep(field: &mut Field, source: &Field, a: f32) {
    let grid = field.grid();
    let n = grid.n();
    let stride = grid.stride();
    let denom = 1.0 + 4.0 * a;
    let src = source.as_slice();
    let x = field.data_mut();
    for i in 1..=n {
        for j in 1..=n {
            let idx = grid.idx(i, j);
            let neighbours = x[idx - 1] + x[idx + 1] + x[idx - stride] + x[idx + stride];
            x[idx] = (src[idx] + a * neighbours) / denom;
        }
    }
}

/// Semi-Lagrangian transport: every interior cell of `dest` takes the value of
/// `source` at the point its centre came from `dt` ago.
pub fn advect(
    kind: BoundaryKind,
    dest: &mut Field,
    source: &Field,
    velocity_x: &Field,
    velocity_y: &Field,
    dt: f32,
) {
    let grid = dest.grid();
    let n = grid.n();
    let dt0 = dt * n as f32;
    let lo = 0.5;
    let hi = n as f32 + 0.5;
    for i in 1..=n {
        for j in 1..=n {
            let x = (i as f32 - dt0 * velocity_x.get(i, j)).clamp(lo, hi);
            let y = (j as f32 - dt0 * velocity_y.get(i, j)).clamp(lo, hi);
            let i0 = x.floor() as usize;
            let j0 = y.floor() as usize;
            let i1 = i0 + 1;
            let j1 = j0 + 1;
            let s1 = x - i0 as f32;
            let s0 = 1.0 - s1;
            let t1 = y - j0 as f32;
            let t0 = 1.0 - t1;
            let value = s0 * (t0 * source.get(i0, j0) + t1 * source.get(i0, j1))
                + s1 * (t0 * source.get(i1, j0) + t1 * source.get(i1, j1));
            dest.set(i, j, value);
        }
    }
    enforce(kind, dest);
}

/// Writes the scaled negative central-difference divergence of the velocity
/// into the interior of `divergence`. Ghost cells are left as they were.
pub fn divergence_into(divergence: &mut Field, velocity_x: &Field, velocity_y: &Field) {
    let grid = divergence.grid();
    let n = grid.n();
    let h = grid.h();
    for i in 1..=n {
        for j in 1..=n {
            let du = velocity_x.get(i + 1, j) - velocity_x.get(i - 1, j);
            let dv = velocity_y.get(i, j + 1) - velocity_y.get(i, j - 1);
            divergence.set(i, j, -0.5 * h * (du + dv));
        }
    }
}

/// Largest interior divergence magnitude of a velocity field.
pub fn max_divergence(velocity_x: &Field, velocity_y: &Field) -> f32 {
    let mut divergence = Field::new(velocity_x.grid(), 0.0);
    divergence_into(&mut divergence, velocity_x, velocity_y);
    divergence.max_abs()
}

/// Removes the gradient part of the velocity field. `pressure` and
/// `divergence` are scratch and are overwritten.
pub fn project(
    velocity_x: &mut Field,
    velocity_y: &mut Field,
    pressure: &mut Field,
    divergence: &mut Field,
) {
    let grid = velocity_x.grid();
    let n = grid.n();
    let h = grid.h();
    divergence_into(divergence, velocity_x, velocity_y);
    for i in 1..=n {
        for j in 1..=n {
            pressure.set(i, j, 0.0);
        }
    }
    enforce(BoundaryKind::Scalar, divergence);
    enforce(BoundaryKind::Scalar, pressure);
    for _ in 0..RELAXATION_SWEEPS {
        pressure_sweep(pressure, divergence);
        enforce(BoundaryKind::Scalar, pressure);
    }
    for i in 1..=n {
        for j in 1..=n {
            let gx = 0.5 * (pressure.get(i + 1, j) - pressure.get(i - 1, j)) / h;
            let gy = 0.5 * (pressure.get(i, j + 1) - pressure.get(i, j - 1)) / h;
            velocity_x.add(i, j, -gx);
            velocity_y.add(i, j, -gy);
        }
    }
    enforce(BoundaryKind::HorizontalVelocity, velocity_x);
    enforce(BoundaryKind::VerticalVelocity, velocity_y);
}

fn pressure_sweep(pressure: &mut Field, divergence: &Field) {
    let grid = pressure.grid();
    let n = grid.n();
    let stride = grid.stride();
    let div = divergence.as_slice();
    let p = pressure.data_mut();
    for i in 1..=n {
        for j in 1..=n {
            let idx = grid.idx(i, j);
            let neighbours = p[idx - 1] + p[idx + 1] + p[idx - stride] + p[idx + stride];
            p[idx] = (div[idx] + neighbours) / 4.0;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Grid;
    use rand::{rngs::StdRng, Rng, SeedableRng};

    fn assert_close(a: f32, b: f32, tol: f32) {
        assert!(
            (a - b).abs() <= tol,
            "expected {a} to be within {tol} of {b}"
        );
    }

    fn bump(grid: Grid) -> Field {
        Field::from_fn(grid, |i, j| ((i * 5 + j * 3) % 7) as f32)
    }

    #[test]
    fn add_source_scales_by_dt() {
        let grid = Grid::new(3);
        let mut field = Field::new(grid, 1.0);
        let source = Field::new(grid, 4.0);
        add_source(&mut field, &source, 0.25);
        assert_close(field.get(0, 0), 2.0, 1e-6);
        assert_close(field.get(2, 3), 2.0, 1e-6);
    }

    #[test]
    fn diffuse_with_zero_rate_copies_source() {
        let grid = Grid::new(6);
        let source = bump(grid);
        let mut field = source.clone();
        diffuse(BoundaryKind::Scalar, &mut field, &source, 0.0, 123.0);
        for j in 1..=6 {
            for i in 1..=6 {
                assert_eq!(field.get(i, j), source.get(i, j));
            }
        }
    }

    #[test]
    fn diffusion_sweep_reads_updated_neighbours() {
        let grid = Grid::new(2);
        let mut field = Field::new(grid, 0.0);
        let mut source = Field::new(grid, 0.0);
        source.set(1, 1, 1.0);
        diffusion_sweep(&mut field, &source, 1.0);
        assert_close(field.get(1, 1), 0.2, 1e-6);
        // (1, 2) is visited after (1, 1) and must see its new value.
        assert_close(field.get(1, 2), 0.04, 1e-6);
        assert_close(field.get(2, 1), 0.04, 1e-6);
    }

    #[test]
    fn diffuse_spreads_a_peak() {
        let grid = Grid::new(8);
        let mut source = Field::new(grid, 0.0);
        source.set(4, 4, 10.0);
        let mut field = Field::new(grid, 0.0);
        diffuse(BoundaryKind::Scalar, &mut field, &source, 0.01, 0.1);
        assert!(field.get(4, 4) < 10.0);
        assert!(field.get(3, 4) > 0.0);
        assert!(field.get(4, 5) > 0.0);
        assert!(field.get(4, 4) > field.get(3, 4));
    }

    #[test]
    fn advect_with_zero_velocity_is_identity() {
        let grid = Grid::new(6);
        let source = bump(grid);
        let zero = Field::new(grid, 0.0);
        let mut dest = Field::new(grid, 0.0);
        advect(BoundaryKind::Scalar, &mut dest, &source, &zero, &zero, 0.3);
        for j in 1..=6 {
            for i in 1..=6 {
                assert_eq!(dest.get(i, j), source.get(i, j));
            }
        }
    }

    #[test]
    fn advect_shifts_by_whole_cells() {
        let grid = Grid::new(8);
        let source = bump(grid);
        let ux = Field::new(grid, 1.0);
        let uy = Field::new(grid, 0.0);
        let mut dest = Field::new(grid, 0.0);
        // dt * n * u == 1, so each cell samples its left neighbour exactly.
        advect(BoundaryKind::Scalar, &mut dest, &source, &ux, &uy, 0.125);
        for j in 1..=8 {
            for i in 2..=8 {
                assert_close(dest.get(i, j), source.get(i - 1, j), 1e-6);
            }
        }
    }

    #[test]
    fn advect_clamps_back_trace_inside_half_cell() {
        let grid = Grid::new(4);
        let source = Field::from_fn(grid, |i, _j| i as f32 * 10.0);
        let ux = Field::new(grid, 100.0);
        let uy = Field::new(grid, 0.0);
        let mut dest = Field::new(grid, 0.0);
        advect(BoundaryKind::Scalar, &mut dest, &source, &ux, &uy, 1.0);
        for j in 1..=4 {
            for i in 1..=4 {
                // Clamped to x = 0.5: halfway between ghost column 0 and column 1.
                assert_close(dest.get(i, j), 5.0, 1e-5);
            }
        }
    }

    fn random_field(grid: Grid, rng: &mut StdRng) -> Field {
        let mut field = Field::new(grid, 0.0);
        for j in 0..grid.stride() {
            for i in 0..grid.stride() {
                field.set(i, j, rng.gen_range(-1.0..1.0));
            }
        }
        field
    }

    #[test]
    fn project_reduces_divergence_of_random_field() {
        let grid = Grid::new(16);
        let mut rng = StdRng::seed_from_u64(7);
        let mut u = random_field(grid, &mut rng);
        let mut v = random_field(grid, &mut rng);
        enforce(BoundaryKind::HorizontalVelocity, &mut u);
        enforce(BoundaryKind::VerticalVelocity, &mut v);
        let mut div = Field::new(grid, 0.0);
        divergence_into(&mut div, &u, &v);
        let before = div.interior_abs_sum();

        let mut p = Field::new(grid, 0.0);
        let mut scratch = Field::new(grid, 0.0);
        project(&mut u, &mut v, &mut p, &mut scratch);

        divergence_into(&mut div, &u, &v);
        let after = div.interior_abs_sum();
        assert!(after < before, "divergence grew: {before} -> {after}");
        assert!(after < 0.8 * before, "divergence barely moved: {before} -> {after}");
    }

    #[test]
    fn project_ignores_stale_scratch() {
        let grid = Grid::new(6);
        let mut u = Field::new(grid, 0.0);
        let mut v = Field::new(grid, 0.0);
        let mut p = Field::new(grid, 3.0);
        let mut scratch = Field::new(grid, -2.0);
        project(&mut u, &mut v, &mut p, &mut scratch);
        assert_eq!(u.max_abs(), 0.0);
        assert_eq!(v.max_abs(), 0.0);
        assert_eq!(max_divergence(&u, &v), 0.0);
    }
}
