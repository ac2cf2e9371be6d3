/// Unbiased in-place shuffling against any bounded random source.
use crate::testing;

use rand::rngs::StdRng;
use rand::Rng;
use rand::SeedableRng;
use speculate::speculate;
use std::collections::HashMap;

/// Anything that can hand out integers uniformly distributed over [0, n).
pub trait BoundedRandom {
    fn next_bounded(&mut self, n: usize) -> usize;
}

impl<R: Rng + ?Sized> BoundedRandom for R {
    fn next_bounded(&mut self, n: usize) -> usize {
        self.gen_range(0, n)
    }
}

/// Fisher-Yates, walking down from the end of the slice.
///
/// Each step swaps the last unshuffled position with a randomly chosen one
/// at or below it, so every permutation is equally likely given a uniform
/// source. A deterministic source gives a deterministic permutation.
pub fn shuffle_in_place<T, R: BoundedRandom + ?Sized>(items: &mut [T], rng: &mut R) {
    let mut size = items.len();
    while size > 1 {
        let index = rng.next_bounded(size);
        if index != size - 1 {
            items.swap(index, size - 1);
        }
        size -= 1;
    }
}

/// Replays a fixed list of draws, for tests that need exact permutations.
#[derive(Debug, Clone)]
pub struct ScriptedDraws {
    draws: Vec<usize>,
    next: usize,
}

impl ScriptedDraws {
    pub fn new(draws: Vec<usize>) -> Self {
        Self { draws, next: 0 }
    }

    /// How many draws have been taken so far.
    pub fn taken(&self) -> usize {
        self.next
    }
}

impl BoundedRandom for ScriptedDraws {
    fn next_bounded(&mut self, n: usize) -> usize {
        // Out-of-range or exhausted scripts fall back to the last position.
        let draw = self.draws.get(self.next).cloned().unwrap_or(n - 1);
        self.next += 1;
        draw.min(n - 1)
    }
}

speculate! {
    before {
        testing::set_up();
    }

    describe "fisher yates" {
        it "matches a permutation worked by hand" {
            // [A,B,C,D]: swap A<->D, swap D<->C, swap C<->B.
            let mut items = vec!['A', 'B', 'C', 'D'];
            let mut draws = ScriptedDraws::new(vec![0, 0, 0]);
            shuffle_in_place(&mut items, &mut draws);
            assert_eq!(vec!['B', 'C', 'D', 'A'], items);
            assert_eq!(3, draws.taken());
        }

        it "leaves the order alone when every draw is the last position" {
            let mut items = vec![1, 2, 3, 4, 5];
            shuffle_in_place(&mut items, &mut ScriptedDraws::new(vec![4, 3, 2, 1]));
            assert_eq!(vec![1, 2, 3, 4, 5], items);
        }

        it "reverses with mirrored draws" {
            let mut items = vec![1, 2, 3, 4];
            shuffle_in_place(&mut items, &mut ScriptedDraws::new(vec![0, 1, 1]));
            assert_eq!(vec![4, 3, 2, 1], items);
        }

        it "does not draw for empty or single slices" {
            let mut empty: Vec<u8> = vec![];
            let mut draws = ScriptedDraws::new(vec![]);
            shuffle_in_place(&mut empty, &mut draws);
            let mut single = vec![7];
            shuffle_in_place(&mut single, &mut draws);
            assert_eq!(0, draws.taken());
            assert_eq!(vec![7], single);
        }

        it "is reproducible from a seed and keeps every item" {
            let mut a: Vec<usize> = (0..81).collect();
            let mut b: Vec<usize> = (0..81).collect();
            shuffle_in_place(&mut a, &mut StdRng::seed_from_u64(17));
            shuffle_in_place(&mut b, &mut StdRng::seed_from_u64(17));
            assert_eq!(a, b);

            let mut sorted = a.clone();
            sorted.sort();
            assert_eq!((0..81).collect::<Vec<usize>>(), sorted);
        }

        it "spreads three items evenly over all orderings" {
            let mut rng = StdRng::seed_from_u64(3);
            let mut counts = HashMap::new();
            let trials = 60000;
            for _ in 0..trials {
                let mut items = [0, 1, 2];
                shuffle_in_place(&mut items, &mut rng);
                *counts.entry(items).or_insert(0) += 1;
            }
            assert_eq!(6, counts.len());
            for (_, count) in counts {
                let share = count as f64 / trials as f64;
                assert!((share - 1.0 / 6.0).abs() < 0.01);
            }
        }
    }
}
