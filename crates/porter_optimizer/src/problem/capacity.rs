use std::ops::{Add, AddAssign, Index, IndexMut, Sub, SubAssign};

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

type Vector = SmallVec<[f64; 2]>;

/// Multi-dimensional load or capacity. Warehouse instances use two
/// dimensions: weight (kg) and volume (dm³). Missing dimensions read as zero.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Capacity(Vector);

impl Capacity {
    pub const EMPTY: Capacity = Capacity(Vector::new_const());

    pub fn empty() -> Self {
        Self::EMPTY
    }

    pub fn with_dimensions(dimensions: usize) -> Self {
        let mut vec = SmallVec::with_capacity(dimensions);
        vec.resize(dimensions, 0.0);
        Capacity(vec)
    }

    pub fn from_vec(vec: Vec<f64>) -> Self {
        Capacity(SmallVec::from_vec(vec))
    }

    pub fn weight_and_volume(weight_kg: f64, volume_dm3: f64) -> Self {
        Capacity::from_vec(vec![weight_kg, volume_dm3])
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty() || self.0.iter().all(|&v| v == 0.0)
    }

    #[inline]
    pub fn get(&self, index: usize) -> f64 {
        self.0.get(index).copied().unwrap_or(0.0)
    }

    pub fn iter(&self) -> impl Iterator<Item = f64> + '_ {
        self.0.iter().copied()
    }

    pub fn reset(&mut self) {
        self.0.iter_mut().for_each(|v| *v = 0.0);
    }

    pub fn update_max(&mut self, other: &Capacity) {
        let max_len = self.len().max(other.len());
        self.0.resize(max_len, 0.0);
        for i in 0..max_len {
            self.0[i] = self.get(i).max(other.get(i));
        }
    }

    pub fn scale(&self, factor: f64) -> Capacity {
        Capacity(self.0.iter().map(|v| v * factor).collect())
    }

    /// True when every dimension of `self` fits within `capacity`.
    pub fn fits_within(&self, capacity: &Capacity) -> bool {
        let dims = self.len().max(capacity.len());
        (0..dims).all(|i| self.get(i) <= capacity.get(i))
    }
}

impl Default for Capacity {
    fn default() -> Self {
        Self::EMPTY
    }
}

impl Index<usize> for Capacity {
    type Output = f64;

    #[inline]
    fn index(&self, index: usize) -> &Self::Output {
        &self.0[index]
    }
}

impl IndexMut<usize> for Capacity {
    #[inline]
    fn index_mut(&mut self, index: usize) -> &mut Self::Output {
        if index >= self.0.len() {
            self.0.resize(index + 1, 0.0);
        }
        &mut self.0[index]
    }
}

impl Add<&Capacity> for &Capacity {
    type Output = Capacity;

    fn add(self, other: &Capacity) -> Capacity {
        let dims = self.len().max(other.len());
        Capacity((0..dims).map(|i| self.get(i) + other.get(i)).collect())
    }
}

impl AddAssign<&Capacity> for Capacity {
    fn add_assign(&mut self, other: &Capacity) {
        let dims = self.len().max(other.len());
        self.0.resize(dims, 0.0);
        for i in 0..dims {
            self.0[i] += other.get(i);
        }
    }
}

impl Sub<&Capacity> for &Capacity {
    type Output = Capacity;

    fn sub(self, other: &Capacity) -> Capacity {
        let dims = self.len().max(other.len());
        Capacity((0..dims).map(|i| self.get(i) - other.get(i)).collect())
    }
}

impl SubAssign<&Capacity> for Capacity {
    fn sub_assign(&mut self, other: &Capacity) {
        let dims = self.len().max(other.len());
        self.0.resize(dims, 0.0);
        for i in 0..dims {
            self.0[i] -= other.get(i);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fits_within() {
        let load = Capacity::weight_and_volume(10.0, 20.0);
        let capacity = Capacity::weight_and_volume(10.0, 25.0);
        assert!(load.fits_within(&capacity));

        let heavy = Capacity::weight_and_volume(10.1, 5.0);
        assert!(!heavy.fits_within(&capacity));
    }

    #[test]
    fn test_missing_dimensions_read_as_zero() {
        let load = Capacity::from_vec(vec![5.0]);
        let capacity = Capacity::weight_and_volume(10.0, 0.0);
        assert_eq!(load.get(1), 0.0);
        assert!(load.fits_within(&capacity));
    }

    #[test]
    fn test_add_assign() {
        let mut total = Capacity::empty();
        total += &Capacity::weight_and_volume(2.0, 3.0);
        total += &Capacity::weight_and_volume(1.0, 1.5);
        assert_eq!(total.get(0), 3.0);
        assert_eq!(total.get(1), 4.5);
    }

    #[test]
    fn test_update_max() {
        let mut max = Capacity::empty();
        max.update_max(&Capacity::weight_and_volume(2.0, 8.0));
        max.update_max(&Capacity::weight_and_volume(5.0, 1.0));
        assert_eq!(max.get(0), 5.0);
        assert_eq!(max.get(1), 8.0);
    }
}
