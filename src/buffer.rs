use crate::{Field, Grid};

/// A current/previous pair of fields. Swapping flips which slot plays which
/// role; the storage itself never moves.
#[derive(Clone, Debug)]
pub struct DoubleBuffer {
    slots: [Field; 2],
    current: usize,
}

impl DoubleBuffer {
    pub fn new(grid: Grid) -> Self {
        Self {
            slots: [Field::new(grid, 0.0), Field::new(grid, 0.0)],
            current: 0,
        }
    }

    pub fn current(&self) -> &Field {
        &self.slots[self.current]
    }

    pub fn previous(&self) -> &Field {
        &self.slots[1 - self.current]
    }

    pub fn current_mut(&mut self) -> &mut Field {
        &mut self.slots[self.current]
    }

    pub fn previous_mut(&mut self) -> &mut Field {
        &mut self.slots[1 - self.current]
    }

    /// Returns `(current, previous)`.
    pub fn split_mut(&mut self) -> (&mut Field, &mut Field) {
        let [a, b] = &mut self.slots;
        if self.current == 0 {
            (a, b)
        } else {
            (b, a)
        }
    }

    /// Returns `(current, previous)` with the previous slot read-only.
    pub fn split_current_mut(&mut self) -> (&mut Field, &Field) {
        let (current, previous) = self.split_mut();
        (current, previous)
    }

    pub fn swap(&mut self) {
        self.current = 1 - self.current;
    }

    pub fn clear_previous(&mut self) {
        self.previous_mut().fill(0.0);
    }

    pub fn clear(&mut self) {
        for slot in &mut self.slots {
            slot.fill(0.0);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn swap_toggles_roles_without_copying() {
        let mut buffer = DoubleBuffer::new(Grid::new(2));
        buffer.current_mut().set(1, 1, 3.0);
        buffer.previous_mut().set(1, 1, 7.0);
        buffer.swap();
        assert_eq!(buffer.current().get(1, 1), 7.0);
        assert_eq!(buffer.previous().get(1, 1), 3.0);
        buffer.swap();
        assert_eq!(buffer.current().get(1, 1), 3.0);
    }

    #[test]
    fn split_mut_matches_roles_after_swap() {
        let mut buffer = DoubleBuffer::new(Grid::new(2));
        buffer.swap();
        {
            let (current, previous) = buffer.split_mut();
            current.set(2, 2, 1.0);
            previous.set(2, 2, 2.0);
        }
        assert_eq!(buffer.current().get(2, 2), 1.0);
        assert_eq!(buffer.previous().get(2, 2), 2.0);
    }

    #[test]
    fn clear_previous_leaves_current_alone() {
        let mut buffer = DoubleBuffer::new(Grid::new(2));
        buffer.current_mut().fill(4.0);
        buffer.previous_mut().fill(5.0);
        buffer.clear_previous();
        assert_eq!(buffer.previous().max_abs(), 0.0);
        assert_eq!(buffer.current().get(0, 0), 4.0);
    }
}
