use log::debug;

use crate::algorithm::Algorithm;
use crate::bubble::bubble_sort;
use crate::element::Element;
use crate::insertion::insertion_sort;
use crate::instrument::{Flow, Instrument};
use crate::merge::merge_sort;
use crate::quick::quick_sort;
use crate::selection::selection_sort;

/// Signature shared by the five drivers.
pub type Driver = fn(&mut [Element], &mut Instrument) -> Flow;

pub fn driver_for(algorithm: Algorithm) -> Driver {
    match algorithm {
        Algorithm::Bubble => bubble_sort,
        Algorithm::Selection => selection_sort,
        Algorithm::Insertion => insertion_sort,
        Algorithm::Merge => merge_sort,
        Algorithm::Quick => quick_sort,
    }
}

/// Runs `algorithm` over `arr`, publishing every step through `ins`.
///
/// On `Err(Interrupted)` the array holds the partial, possibly unsorted, order
/// reached at the last checkpoint.
pub fn sort(algorithm: Algorithm, arr: &mut [Element], ins: &mut Instrument) -> Flow {
    debug!("{} over {} elements", algorithm, arr.len());
    driver_for(algorithm)(arr, ins)
}

#[cfg(test)]
mod tests {
    use crossbeam_channel::unbounded;
    use rand::rngs::StdRng;
    use rand::seq::SliceRandom;
    use rand::SeedableRng;

    use super::*;
    use crate::config::Pacing;
    use crate::element::from_values;
    use crate::instrument::{CancelToken, Event, SpeedHandle};

    fn run(algorithm: Algorithm, arr: &mut [Element]) -> (Flow, Instrument) {
        let (tx, _rx) = unbounded::<Event>();
        let mut ins = Instrument::new(tx, CancelToken::new(), SpeedHandle::new(100), Pacing::Immediate);
        let flow = sort(algorithm, arr, &mut ins);
        (flow, ins)
    }

    #[test]
    fn test_small() {
        let mut values: Vec<u32> = (1..=64).rev().collect();
        values.shuffle(&mut StdRng::seed_from_u64(12345));
        for algorithm in Algorithm::ALL {
            let mut arr = from_values(&values);
            let (flow, _) = run(algorithm, &mut arr);
            assert_eq!(flow, Ok(()));
            check_range(&arr, 1, 64);
            assert!(arr.windows(2).all(|w| w[0].value < w[1].value), "{algorithm} left {:?}", arr);
        }
    }

    #[test]
    fn test_reversed_counts() {
        // n = 8 reversed: 28 inversions, every pair out of order
        let values: Vec<u32> = (1..=8).rev().collect();

        let mut arr = from_values(&values);
        let (_, ins) = run(Algorithm::Bubble, &mut arr);
        assert_eq!(ins.counters().comparisons, 28);
        assert_eq!(ins.counters().swaps, 28);

        let mut arr = from_values(&values);
        let (_, ins) = run(Algorithm::Insertion, &mut arr);
        assert_eq!(ins.counters().comparisons, 28);
        assert_eq!(ins.counters().swaps, 28);

        let mut arr = from_values(&values);
        let (_, ins) = run(Algorithm::Selection, &mut arr);
        assert_eq!(ins.counters().comparisons, 28);
        assert_eq!(ins.counters().swaps, 4);
    }

    #[test]
    fn test_presorted_does_not_swap() {
        let values: Vec<u32> = (10..30).collect();
        for algorithm in Algorithm::ALL {
            let mut arr = from_values(&values);
            let (_, ins) = run(algorithm, &mut arr);
            assert_eq!(ins.counters().swaps, 0, "{algorithm} swapped a sorted input");
            let ids: Vec<u32> = arr.iter().map(|el| el.id).collect();
            assert_eq!(ids, (0..20).collect::<Vec<u32>>());
        }
    }

    fn check_range(input: &[Element], from: u32, to: u32) {
        'outer: for i in from..=to {
            for el in input.iter() {
                if i == el.value {
                    continue 'outer;
                }
            }
            panic!("Element {} not found", i);
        }
    }
}
