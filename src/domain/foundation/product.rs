//! Lazy Cartesian product over candidate lists.

/// Iterates over every combination picking one item per dimension.
///
/// The first dimension varies slowest. Any empty dimension yields nothing;
/// zero dimensions yield a single empty combination.
#[derive(Debug, Clone)]
pub struct CartesianProduct<'a, T> {
    dims: &'a [Vec<T>],
    cursor: Vec<usize>,
    done: bool,
}

impl<'a, T> CartesianProduct<'a, T> {
    pub fn new(dims: &'a [Vec<T>]) -> Self {
        Self {
            dims,
            cursor: vec![0; dims.len()],
            done: dims.iter().any(Vec::is_empty),
        }
    }

    /// Number of combinations, saturating instead of overflowing.
    pub fn size(dims: &[Vec<T>]) -> u128 {
        dims.iter()
            .fold(1u128, |acc, d| acc.saturating_mul(d.len() as u128))
    }
}

impl<'a, T: Clone> Iterator for CartesianProduct<'a, T> {
    type Item = Vec<T>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        let item = self
            .cursor
            .iter()
            .zip(self.dims)
            .map(|(&i, dim)| dim[i].clone())
            .collect();

        // Odometer step, last dimension fastest.
        let mut pos = self.dims.len();
        loop {
            if pos == 0 {
                self.done = true;
                break;
            }
            pos -= 1;
            self.cursor[pos] += 1;
            if self.cursor[pos] < self.dims[pos].len() {
                break;
            }
            self.cursor[pos] = 0;
        }

        Some(item)
    }
}
