use std::sync::Arc;

use crate::{City, Error, Result};

/// A closed visiting order over a fixed set of cities.
///
/// The city table is shared between every tour derived from the same input;
/// a tour only owns its order. Operations never mutate `self`, they return a
/// fresh tour.
#[derive(Clone, Debug, PartialEq)]
pub struct Tour {
    cities: Arc<[City]>,
    order: Vec<usize>,
}

/// One leg of the cycle, including the closing leg back to the start.
#[derive(Clone, Copy, Debug)]
pub struct Edge<'a> {
    pub from: &'a City,
    pub to: &'a City,
    pub cost: f64,
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct TourMetrics {
    pub total: f64,
    pub longest: f64,
    pub average: f64,
}

impl Tour {
    /// Builds a tour visiting `cities` in the given order.
    pub fn new(cities: Vec<City>) -> Result<Self> {
        if cities.is_empty() {
            return Err(Error::EmptyTour);
        }
        let order = (0..cities.len()).collect();
        Ok(Self {
            cities: cities.into(),
            order,
        })
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn cities(&self) -> impl ExactSizeIterator<Item = &City> + '_ {
        self.order.iter().map(|&idx| &self.cities[idx])
    }

    /// Sum of every leg, the closing leg included. Always recomputed.
    pub fn cost(&self) -> f64 {
        let n = self.len();
        (0..n).map(|i| self.leg(i, (i + 1) % n)).sum()
    }

    pub fn edges(&self) -> Vec<Edge<'_>> {
        let n = self.len();
        (0..n)
            .map(|i| {
                let from = &self.cities[self.order[i]];
                let to = &self.cities[self.order[(i + 1) % n]];
                Edge {
                    from,
                    to,
                    cost: from.dist(to),
                }
            })
            .collect()
    }

    /// Exchanges positions `i` and `j`, returning the new tour and its cost.
    pub fn swap(&self, i: usize, j: usize) -> Result<(Tour, f64)> {
        let len = self.len();
        for index in [i, j] {
            if index >= len {
                return Err(Error::IndexOutOfRange { index, len });
            }
        }

        let mut order = self.order.clone();
        order.swap(i, j);
        let swapped = self.with_order(order);
        let cost = swapped.cost();
        Ok((swapped, cost))
    }

    /// Moves every city forward one position; the last city becomes the first.
    pub fn rotate(&self) -> Tour {
        let mut order = self.order.clone();
        // Non-empty by construction.
        order.rotate_right(1);
        self.with_order(order)
    }

    pub fn metrics(&self) -> TourMetrics {
        let edges = self.edges();
        let total: f64 = edges.iter().map(|e| e.cost).sum();
        let longest = edges.iter().map(|e| e.cost).fold(0.0_f64, f64::max);
        let average = total / edges.len() as f64;

        TourMetrics {
            total,
            longest,
            average,
        }
    }

    fn with_order(&self, order: Vec<usize>) -> Tour {
        Tour {
            cities: Arc::clone(&self.cities),
            order,
        }
    }

    #[inline]
    fn leg(&self, a: usize, b: usize) -> f64 {
        self.cities[self.order[a]].dist(&self.cities[self.order[b]])
    }
}

/// Cost of visiting `cities` in the given order and returning to the start.
pub fn tour_cost(cities: &[City]) -> Result<f64> {
    if cities.is_empty() {
        return Err(Error::EmptyTour);
    }
    let n = cities.len();
    Ok((0..n).map(|i| cities[i].dist(&cities[(i + 1) % n])).sum())
}

#[cfg(test)]
mod tests {
    use rand::{Rng, SeedableRng, rngs::StdRng};

    use super::{Tour, tour_cost};
    use crate::{City, Error};

    fn square() -> Vec<City> {
        vec![
            City::new("", "a", 0.0, 0.0),
            City::new("", "b", 0.0, 1.0),
            City::new("", "c", 1.0, 1.0),
            City::new("", "d", 1.0, 0.0),
        ]
    }

    fn scattered(n: usize, seed: u64) -> Vec<City> {
        let mut rng = StdRng::seed_from_u64(seed);
        (0..n)
            .map(|i| {
                City::new(
                    "r",
                    format!("c{i}"),
                    rng.random_range(-90.0..90.0),
                    rng.random_range(-180.0..180.0),
                )
            })
            .collect()
    }

    fn names(tour: &Tour) -> Vec<&str> {
        tour.cities().map(|c| c.name.as_str()).collect()
    }

    #[test]
    fn new_rejects_empty_input() {
        assert!(matches!(Tour::new(Vec::new()), Err(Error::EmptyTour)));
    }

    #[test]
    fn cost_closes_cycle() {
        let tour = Tour::new(square()).expect("tour");
        assert_eq!(tour.cost(), 4.0);
    }

    #[test]
    fn single_city_costs_nothing() {
        let tour = Tour::new(vec![City::new("", "solo", 5.0, 7.0)]).expect("tour");
        assert_eq!(tour.cost(), 0.0);
    }

    #[test]
    fn tour_cost_matches_tour_method_and_rejects_empty() {
        let cities = scattered(12, 3);
        let tour = Tour::new(cities.clone()).expect("tour");
        assert_eq!(tour_cost(&cities).expect("cost"), tour.cost());
        assert!(matches!(tour_cost(&[]), Err(Error::EmptyTour)));
    }

    #[test]
    fn cost_is_symmetric_under_reversal() {
        let cities = scattered(25, 7);
        let tour = Tour::new(cities.clone()).expect("tour");
        let reversed = Tour::new(cities.into_iter().rev().collect()).expect("tour");
        assert!((reversed.cost() - tour.cost()).abs() < 1e-9);
    }

    #[test]
    fn rotation_preserves_cost() {
        let tour = Tour::new(scattered(25, 11)).expect("tour");
        let mut rotated = tour.clone();
        for _ in 0..tour.len() {
            rotated = rotated.rotate();
            assert!((rotated.cost() - tour.cost()).abs() < 1e-9);
        }
    }

    #[test]
    fn rotate_moves_last_city_to_front() {
        let tour = Tour::new(square()).expect("tour");
        assert_eq!(names(&tour.rotate()), vec!["d", "a", "b", "c"]);
        assert_eq!(names(&tour), vec!["a", "b", "c", "d"]);
    }

    #[test]
    fn rotate_single_city_is_identity() {
        let tour = Tour::new(vec![City::new("", "solo", 1.0, 1.0)]).expect("tour");
        assert_eq!(tour.rotate(), tour);
    }

    #[test]
    fn swap_exchanges_positions_and_returns_fresh_cost() {
        let tour = Tour::new(square()).expect("tour");
        let (swapped, cost) = tour.swap(1, 2).expect("swap");

        assert_eq!(names(&swapped), vec!["a", "c", "b", "d"]);
        assert_eq!(cost, swapped.cost());
        assert!((cost - (2.0 + 2.0 * 2.0_f64.sqrt())).abs() < 1e-12);
        assert_eq!(names(&tour), vec!["a", "b", "c", "d"]);
    }

    #[test]
    fn swap_same_index_is_noop() {
        let tour = Tour::new(square()).expect("tour");
        let (swapped, cost) = tour.swap(2, 2).expect("swap");
        assert_eq!(swapped, tour);
        assert_eq!(cost, tour.cost());
    }

    #[test]
    fn swap_is_an_involution() {
        let tour = Tour::new(scattered(9, 5)).expect("tour");
        for (i, j) in [(0, 8), (3, 4), (7, 1), (6, 6)] {
            let (once, _) = tour.swap(i, j).expect("swap");
            let (twice, _) = once.swap(i, j).expect("swap back");
            assert_eq!(twice, tour);
        }
    }

    #[test]
    fn swap_rejects_out_of_range_index() {
        let tour = Tour::new(square()[..3].to_vec()).expect("tour");
        let err = tour.swap(5, 2).expect_err("index 5 should fail");
        assert!(matches!(err, Error::IndexOutOfRange { index: 5, len: 3 }));

        let err = tour.swap(0, 3).expect_err("index 3 should fail");
        assert!(matches!(err, Error::IndexOutOfRange { index: 3, len: 3 }));
    }

    #[test]
    fn edges_include_closing_leg() {
        let tour = Tour::new(square()).expect("tour");
        let edges = tour.edges();
        assert_eq!(edges.len(), 4);
        let last = edges.last().expect("closing edge");
        assert_eq!(last.from.name, "d");
        assert_eq!(last.to.name, "a");
        assert_eq!(last.cost, 1.0);
    }

    #[test]
    fn metrics_summarize_edges() {
        let tour = Tour::new(square()).expect("tour");
        let (crossed, _) = tour.swap(1, 2).expect("swap");
        let metrics = crossed.metrics();

        assert!((metrics.total - crossed.cost()).abs() < 1e-12);
        assert!((metrics.longest - 2.0_f64.sqrt()).abs() < 1e-12);
        assert!((metrics.average - metrics.total / 4.0).abs() < 1e-12);
    }
}
