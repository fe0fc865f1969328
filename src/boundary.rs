use crate::Field;

/// Which axis, if any, is reflected when the ghost ring is filled.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BoundaryKind {
    Scalar,
    HorizontalVelocity,
    VerticalVelocity,
}

impl BoundaryKind {
    fn flip_x(self) -> f32 {
        if self == BoundaryKind::HorizontalVelocity {
            -1.0
        } else {
            1.0
        }
    }

    fn flip_y(self) -> f32 {
        if self == BoundaryKind::VerticalVelocity {
            -1.0
        } else {
            1.0
        }
    }
}

/// Fills the ghost ring of `field` from its interior neighbours. Corners are
/// the mean of the two edge ghosts next to them.
pub fn enforce(kind: BoundaryKind, field: &mut Field) {
    let n = field.grid().n();
    let sx = kind.flip_x();
    let sy = kind.flip_y();
    for k in 1..=n {
        field.set(0, k, sx * field.get(1, k));
        field.set(n + 1, k, sx * field.get(n, k));
        field.set(k, 0, sy * field.get(k, 1));
        field.set(k, n + 1, sy * field.get(k, n));
    }
    field.set(0, 0, 0.5 * (field.get(1, 0) + field.get(0, 1)));
    field.set(0, n + 1, 0.5 * (field.get(1, n + 1) + field.get(0, n)));
    field.set(n + 1, 0, 0.5 * (field.get(n, 0) + field.get(n + 1, 1)));
    field.set(n + 1, n + 1, 0.5 * (field.get(n, n + 1) + field.get(n + 1, n)));
}
