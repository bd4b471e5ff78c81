use std::sync::Arc;

use jiff::SignedDuration;
use porter_matrix::RawTravelMatrices;

use crate::problem::location::LocationIdx;

pub type Distance = f64;
pub type Time = f64;
pub type Cost = f64;

/// Flat pairwise travel matrices over the problem's location list.
/// To find the entry for a pair of locations, use
/// `index = from * num_locations + to`.
#[derive(Debug, Clone)]
pub struct TravelMatrices {
    distances: Arc<Vec<Distance>>,
    times: Arc<Vec<Time>>,
    num_locations: usize,
    is_symmetric: bool,
}

fn is_flat_matrix_symmetric(matrix: &[f64], num_locations: usize) -> bool {
    for i in 0..num_locations {
        for j in 0..num_locations {
            if matrix[i * num_locations + j] != matrix[j * num_locations + i] {
                return false;
            }
        }
    }
    true
}

impl TravelMatrices {
    /// Wraps provider output for an agent speed class. Distances are meters;
    /// times are seconds at `speed_mps`.
    pub fn from_raw(raw: &RawTravelMatrices, speed_mps: f64) -> Self {
        let distances = Arc::new(raw.distances.clone());
        let times = Arc::new(
            raw.distances
                .iter()
                .map(|distance| distance / speed_mps)
                .collect::<Vec<Time>>(),
        );
        let is_symmetric = is_flat_matrix_symmetric(&distances, raw.num_locations);

        TravelMatrices {
            distances,
            times,
            num_locations: raw.num_locations,
            is_symmetric,
        }
    }

    /// Reuses the distance matrix of `other` with times rescaled to a new
    /// speed. Cheap: the distances are shared.
    pub fn with_speed(&self, speed_mps: f64) -> Self {
        let times = Arc::new(
            self.distances
                .iter()
                .map(|distance| distance / speed_mps)
                .collect::<Vec<Time>>(),
        );

        TravelMatrices {
            distances: Arc::clone(&self.distances),
            times,
            num_locations: self.num_locations,
            is_symmetric: self.is_symmetric,
        }
    }

    #[cfg(test)]
    pub fn from_constant(num_locations: usize, distance: f64, time: f64) -> Self {
        TravelMatrices {
            distances: Arc::new(vec![distance; num_locations * num_locations]),
            times: Arc::new(vec![time; num_locations * num_locations]),
            num_locations,
            is_symmetric: true,
        }
    }

    #[inline(always)]
    fn index(&self, from: LocationIdx, to: LocationIdx) -> usize {
        from.get() * self.num_locations + to.get()
    }

    #[inline(always)]
    pub fn travel_distance(&self, from: LocationIdx, to: LocationIdx) -> Distance {
        if from == to {
            return 0.0;
        }

        self.distances[self.index(from, to)]
    }

    #[inline(always)]
    pub fn travel_time(&self, from: LocationIdx, to: LocationIdx) -> SignedDuration {
        if from == to {
            return SignedDuration::ZERO;
        }

        SignedDuration::from_secs_f64(self.times[self.index(from, to)])
    }

    pub fn is_symmetric(&self) -> bool {
        self.is_symmetric
    }

    pub fn num_locations(&self) -> usize {
        self.num_locations
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_raw() {
        let raw = RawTravelMatrices {
            distances: vec![0.0, 10.0, 10.0, 0.0],
            num_locations: 2,
        };
        let matrices = TravelMatrices::from_raw(&raw, 2.0);

        assert!(matrices.is_symmetric());
        assert_eq!(
            matrices.travel_distance(LocationIdx::new(0), LocationIdx::new(1)),
            10.0
        );
        assert_eq!(
            matrices.travel_time(LocationIdx::new(0), LocationIdx::new(1)),
            SignedDuration::from_secs(5)
        );
        assert_eq!(
            matrices.travel_time(LocationIdx::new(1), LocationIdx::new(1)),
            SignedDuration::ZERO
        );
    }

    #[test]
    fn test_with_speed_shares_distances() {
        let raw = RawTravelMatrices {
            distances: vec![0.0, 12.0, 12.0, 0.0],
            num_locations: 2,
        };
        let walk = TravelMatrices::from_raw(&raw, 1.0);
        let run = walk.with_speed(4.0);

        assert_eq!(
            run.travel_time(LocationIdx::new(0), LocationIdx::new(1)),
            SignedDuration::from_secs(3)
        );
        assert_eq!(
            run.travel_distance(LocationIdx::new(0), LocationIdx::new(1)),
            12.0
        );
    }
}
