//! Value sources feeding the tree builder

use std::collections::VecDeque;
use std::ops::RangeInclusive;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::domain::arena::Side;
use crate::domain::error::DomainResult;
use crate::domain::scalar::Scalar;

/// Supplies node values (and optionally child decisions) during construction.
///
/// `ordinal` is the 1-based level-order position of the node being filled.
pub trait NodeSource {
    /// Next node value, `None` once the source is exhausted.
    fn next_value(&mut self, ordinal: usize) -> DomainResult<Option<Scalar>>;

    /// Whether to create the `side` child of node `ordinal`.
    fn wants_child(&mut self, _ordinal: usize, _side: Side) -> DomainResult<bool> {
        Ok(true)
    }

    /// Upper bound on the requested node count, if the source has one.
    fn node_limit(&self) -> Option<usize> {
        None
    }
}

/// Uniform random integers from an inclusive range.
pub struct RandomSource {
    rng: StdRng,
    range: RangeInclusive<i64>,
}

impl RandomSource {
    pub const DEFAULT_MIN: i64 = 0;
    pub const DEFAULT_MAX: i64 = 1000;

    pub fn new(range: RangeInclusive<i64>) -> Self {
        Self {
            rng: StdRng::from_os_rng(),
            range,
        }
    }

    /// Reproducible source, used by tests.
    pub fn seeded(seed: u64, range: RangeInclusive<i64>) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            range,
        }
    }
}

impl Default for RandomSource {
    fn default() -> Self {
        Self::new(Self::DEFAULT_MIN..=Self::DEFAULT_MAX)
    }
}

impl NodeSource for RandomSource {
    fn next_value(&mut self, _ordinal: usize) -> DomainResult<Option<Scalar>> {
        Ok(Some(Scalar::Int(self.rng.random_range(self.range.clone()))))
    }
}

/// Pre-collected values consumed in level order.
#[derive(Debug, Default)]
pub struct ListSource {
    values: VecDeque<Scalar>,
}

impl ListSource {
    pub fn new(values: impl IntoIterator<Item = Scalar>) -> Self {
        Self {
            values: values.into_iter().collect(),
        }
    }

    pub fn remaining(&self) -> usize {
        self.values.len()
    }
}

impl NodeSource for ListSource {
    fn next_value(&mut self, _ordinal: usize) -> DomainResult<Option<Scalar>> {
        Ok(self.values.pop_front())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_seeded_sources_when_drawing_then_values_repeat_and_stay_in_range() {
        let mut a = RandomSource::seeded(7, 0..=1000);
        let mut b = RandomSource::seeded(7, 0..=1000);

        for ordinal in 1..=50 {
            let va = a.next_value(ordinal).unwrap().unwrap();
            let vb = b.next_value(ordinal).unwrap().unwrap();
            assert_eq!(va, vb);
            let Scalar::Int(i) = va else {
                panic!("random source produced non-integer {va:?}");
            };
            assert!((0..=1000).contains(&i));
        }
    }

    #[test]
    fn given_list_when_exhausted_then_returns_none() {
        let mut source = ListSource::new(vec![Scalar::Float(1.5)]);
        assert_eq!(source.next_value(1).unwrap(), Some(Scalar::Float(1.5)));
        assert_eq!(source.remaining(), 0);
        assert_eq!(source.next_value(2).unwrap(), None);
    }
}
