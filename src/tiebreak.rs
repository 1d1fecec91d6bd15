use rand::prelude::*;

/// How to choose between candidates that are equally good.
/// `Stable` keeps the first one encountered so identical input gives identical output.
#[derive(Debug)]
pub enum TieBreak {
    Stable,
    Seeded(StdRng),
}
impl TieBreak {
    pub fn new(seed: Option<u64>) -> Self {
        match seed {
            Some(seed) => TieBreak::Seeded(StdRng::seed_from_u64(seed)),
            None => TieBreak::Stable,
        }
    }

    /// Select the candidate with the smallest key.
    /// Ties are resolved by encounter order, or uniformly at random when seeded.
    pub fn min_by_key<T, K: Ord>(&mut self, candidates: impl IntoIterator<Item=T>, key: impl Fn(&T) -> K) -> Option<T> {
        let mut best: Option<(K, T)> = None;
        let mut num_tied = 0u32;
        for candidate in candidates {
            let candidate_key = key(&candidate);
            let replace = match &best {
                None => {
                    num_tied = 1;
                    true
                },
                Some((best_key, _)) if candidate_key < *best_key => {
                    num_tied = 1;
                    true
                },
                Some((best_key, _)) if candidate_key == *best_key => {
                    num_tied += 1;
                    match self {
                        TieBreak::Stable => false,
                        TieBreak::Seeded(rng) => rng.gen_range(0..num_tied) == 0, // reservoir sample over the ties
                    }
                },
                Some(_) => false,
            };
            if replace {
                best = Some((candidate_key, candidate));
            }
        }
        best.map(|(_, candidate)| candidate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stable_keeps_first_of_equals() {
        let mut tie_break = TieBreak::new(None);
        let picked = tie_break.min_by_key(vec![(3, 'a'), (1, 'b'), (1, 'c'), (2, 'd')], |&(k, _)| k);
        assert_eq!(picked, Some((1, 'b')));
    }

    #[test]
    fn empty_has_no_minimum() {
        let mut tie_break = TieBreak::new(None);
        assert_eq!(tie_break.min_by_key(Vec::<i32>::new(), |&k| k), None);
    }

    #[test]
    fn seeded_picks_among_minimums_only() {
        let mut tie_break = TieBreak::new(Some(7));
        for _ in 0..50 {
            let (key, _) = tie_break.min_by_key(vec![(2, 'a'), (1, 'b'), (1, 'c'), (1, 'd')], |&(k, _)| k).expect("non-empty");
            assert_eq!(key, 1);
        }
    }

    #[test]
    fn same_seed_same_choices() {
        let candidates = || (0..20).map(|i| (i % 3, i));
        let mut first = TieBreak::new(Some(42));
        let mut second = TieBreak::new(Some(42));
        for _ in 0..10 {
            assert_eq!(first.min_by_key(candidates(), |&(k, _)| k), second.min_by_key(candidates(), |&(k, _)| k));
        }
    }
}
