mod config;
use log::{debug, info};

use std::collections::BTreeMap;

use rand::rngs::StdRng;
use rand::seq::{IndexedRandom, SliceRandom};
use rand::{Rng, SeedableRng};
use rand_distr::{Beta, Distribution, Normal};

pub use crate::config::*;

/// Draws synthetic vote records for a list of districts.
///
/// The generator owns its random number generator, so that a seeded
/// generator replays the same sequence of picks and tallies.
pub struct VoteGenerator {
    rng: StdRng,
    total_dist: Normal<f64>,
    split_dist: Beta<f64>,
    min_total: u64,
}

impl VoteGenerator {
    /// A generator seeded from the operating system.
    pub fn new(rules: &GenerationRules) -> Result<VoteGenerator, GenerationErrors> {
        VoteGenerator::from_rng(rules, StdRng::from_os_rng())
    }

    /// A deterministic generator.
    pub fn with_seed(rules: &GenerationRules, seed: u64) -> Result<VoteGenerator, GenerationErrors> {
        VoteGenerator::from_rng(rules, StdRng::seed_from_u64(seed))
    }

    fn from_rng(rules: &GenerationRules, rng: StdRng) -> Result<VoteGenerator, GenerationErrors> {
        if !rules.total_mean.is_finite() || !rules.total_std_dev.is_finite() {
            return Err(GenerationErrors::InvalidRules(format!(
                "total distribution must be finite, got mean {} and deviation {}",
                rules.total_mean, rules.total_std_dev
            )));
        }
        if rules.total_std_dev < 0.0 {
            return Err(GenerationErrors::InvalidRules(format!(
                "total deviation must not be negative, got {}",
                rules.total_std_dev
            )));
        }
        if !rules.split_shape.is_finite() {
            return Err(GenerationErrors::InvalidRules(format!(
                "split shape must be finite, got {}",
                rules.split_shape
            )));
        }
        let total_dist = Normal::new(rules.total_mean, rules.total_std_dev)
            .map_err(|e| GenerationErrors::InvalidRules(format!("total distribution: {}", e)))?;
        let split_dist = Beta::new(rules.split_shape, rules.split_shape)
            .map_err(|e| GenerationErrors::InvalidRules(format!("split distribution: {}", e)))?;
        Ok(VoteGenerator {
            rng,
            total_dist,
            split_dist,
            min_total: rules.min_total,
        })
    }

    /// Selects `n` districts, bounding how often a district repeats.
    ///
    /// - up to one full pass, districts are drawn without replacement.
    /// - beyond that, every district is taken once and a second pass without
    ///   replacement covers up to one more occurrence per district.
    /// - only requests larger than two full passes fall back to sampling with
    ///   replacement for the remainder, where a district may appear more than
    ///   twice.
    ///
    /// The picks are shuffled before being returned.
    pub fn pick_districts(
        &mut self,
        districts: &[String],
        n: usize,
    ) -> Result<Vec<String>, GenerationErrors> {
        if n == 0 {
            return Ok(Vec::new());
        }
        if districts.is_empty() {
            return Err(GenerationErrors::NoDistricts);
        }
        let num_districts = districts.len();

        let mut picks: Vec<String> = if n <= num_districts {
            districts.choose_multiple(&mut self.rng, n).cloned().collect()
        } else {
            let mut res: Vec<String> = districts.to_vec();
            let second_pass = (n - num_districts).min(num_districts);
            res.extend(districts.choose_multiple(&mut self.rng, second_pass).cloned());

            let overflow = n - num_districts - second_pass;
            debug!(
                "pick_districts: first pass: {} second pass: {} overflow: {}",
                num_districts, second_pass, overflow
            );
            for _ in 0..overflow {
                let idx = self.rng.random_range(0..num_districts);
                res.push(districts[idx].clone());
            }
            res
        };

        picks.shuffle(&mut self.rng);
        Ok(picks)
    }

    /// Draws one `(yes, no)` split.
    pub fn draw_tally(&mut self) -> (u64, u64) {
        let raw_total = self.total_dist.sample(&mut self.rng);
        // Truncation first, then the floor.
        let total = if raw_total >= self.min_total as f64 {
            raw_total as u64
        } else {
            self.min_total
        };
        let share = self.split_dist.sample(&mut self.rng);
        let yes = ((share * total as f64) as u64).min(total);
        (yes, total - yes)
    }

    /// Picks `n` districts and draws a tally for each of them.
    pub fn generate(
        &mut self,
        districts: &[String],
        n: usize,
    ) -> Result<Vec<VoteRecord>, GenerationErrors> {
        let picks = self.pick_districts(districts, n)?;
        let mut res: Vec<VoteRecord> = Vec::with_capacity(picks.len());
        for district in picks {
            let (yes, no) = self.draw_tally();
            res.push(VoteRecord { district, yes, no });
        }
        Ok(res)
    }
}

/// Generates `n` vote records for the given districts.
///
/// Arguments:
/// * `districts` the identifiers to attach the records to. Duplicates are not removed.
/// * `n` the number of records to generate
/// * `rules` the shape of the tallies
/// * `seed` if provided, the generation is deterministic
///
/// ```
/// use district_votes::{generate_votes, GenerationRules};
/// # use district_votes::GenerationErrors;
///
/// let districts = vec!["CA".to_string(), "NY".to_string(), "TX".to_string()];
/// let records = generate_votes(&districts, 3, &GenerationRules::DEFAULT_RULES, Some(42))?;
///
/// assert_eq!(records.len(), 3);
/// assert!(records.iter().all(|r| r.total() >= 50));
/// # Ok::<(), GenerationErrors>(())
/// ```
pub fn generate_votes(
    districts: &[String],
    n: usize,
    rules: &GenerationRules,
    seed: Option<u64>,
) -> Result<Vec<VoteRecord>, GenerationErrors> {
    info!(
        "Generating {:?} votes for {:?} districts (seed: {:?})",
        n,
        districts.len(),
        seed
    );
    let mut generator = match seed {
        Some(s) => VoteGenerator::with_seed(rules, s)?,
        None => VoteGenerator::new(rules)?,
    };
    let res = generator.generate(districts, n)?;
    if log::log_enabled!(log::Level::Debug) {
        let counts = district_counts(&res);
        let max_repeat = counts.values().max().cloned().unwrap_or(0);
        debug!(
            "generate_votes: {} districts used, at most {} records per district",
            counts.len(),
            max_repeat
        );
    }
    Ok(res)
}

/// The number of records per district.
pub fn district_counts(records: &[VoteRecord]) -> BTreeMap<String, usize> {
    let mut res: BTreeMap<String, usize> = BTreeMap::new();
    for r in records {
        *res.entry(r.district.clone()).or_insert(0) += 1;
    }
    res
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn districts(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    fn numbered_districts(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("D{:03}", i)).collect()
    }

    fn seeded(seed: u64) -> VoteGenerator {
        let _ = env_logger::builder().is_test(true).try_init();
        VoteGenerator::with_seed(&GenerationRules::DEFAULT_RULES, seed).unwrap()
    }

    #[test]
    fn zero_requested_gives_nothing() {
        let mut g = seeded(1);
        assert!(g.generate(&districts(&["CA", "TX"]), 0).unwrap().is_empty());
        assert!(g.generate(&[], 0).unwrap().is_empty());
    }

    #[test]
    fn no_districts_is_an_error() {
        let mut g = seeded(1);
        assert_eq!(g.generate(&[], 3), Err(GenerationErrors::NoDistricts));
    }

    #[test]
    fn exact_number_of_records() {
        let mut g = seeded(7);
        for d in [1, 2, 3, 10, 51] {
            let ds = numbered_districts(d);
            for n in [1, d / 2 + 1, d, d + 1, 2 * d, 2 * d + 1, 5 * d + 3] {
                let records = g.generate(&ds, n).unwrap();
                assert_eq!(records.len(), n, "d={} n={}", d, n);
            }
        }
    }

    #[test]
    fn no_repeat_within_one_pass() {
        let mut g = seeded(11);
        let ds = numbered_districts(20);
        for n in [1, 5, 19, 20] {
            let records = g.generate(&ds, n).unwrap();
            let counts = district_counts(&records);
            assert_eq!(counts.len(), n);
            assert!(counts.values().all(|c| *c == 1));
        }
    }

    #[test]
    fn at_most_two_within_two_passes() {
        let mut g = seeded(13);
        let ds = numbered_districts(20);
        for n in [21, 30, 39, 40] {
            let records = g.generate(&ds, n).unwrap();
            let counts = district_counts(&records);
            // Every district is covered by the first pass.
            assert_eq!(counts.len(), ds.len());
            assert!(counts.values().all(|c| *c == 1 || *c == 2));
        }
    }

    #[test]
    fn overflow_still_covers_everything() {
        let mut g = seeded(17);
        let ds = districts(&["CA", "TX"]);
        let records = g.generate(&ds, 5).unwrap();
        assert_eq!(records.len(), 5);
        let counts = district_counts(&records);
        assert_eq!(counts.len(), 2);
        assert!(counts.values().all(|c| *c >= 2));
    }

    #[test]
    fn one_record_per_state() {
        let mut g = seeded(3);
        let ds = districts(&["CA", "NY", "TX"]);
        let records = g.generate(&ds, 3).unwrap();
        let seen: HashSet<String> = records.iter().map(|r| r.district.clone()).collect();
        assert_eq!(seen, ds.iter().cloned().collect::<HashSet<String>>());
        for r in records {
            assert!(r.total() >= 50);
        }
    }

    #[test]
    fn picks_are_shuffled() {
        let mut g = seeded(5);
        let ds = numbered_districts(50);
        let picks = g.pick_districts(&ds, 100).unwrap();
        // The first pass is not left in input order.
        assert_ne!(&picks[..50], ds.as_slice());
    }

    #[test]
    fn tallies_are_bounded() {
        let mut g = seeded(23);
        for _ in 0..10000 {
            let (yes, no) = g.draw_tally();
            assert!(yes + no >= 50);
        }
    }

    #[test]
    fn tallies_follow_the_rules() {
        let mut g = seeded(29);
        let num_draws = 5000;
        let mut sum_total: u64 = 0;
        let mut sum_share: f64 = 0.0;
        for _ in 0..num_draws {
            let (yes, no) = g.draw_tally();
            sum_total += yes + no;
            sum_share += yes as f64 / (yes + no) as f64;
        }
        let mean_total = sum_total as f64 / num_draws as f64;
        let mean_share = sum_share / num_draws as f64;
        assert!((mean_total - 500.0).abs() < 20.0, "mean total {}", mean_total);
        assert!((mean_share - 0.5).abs() < 0.05, "mean share {}", mean_share);
    }

    #[test]
    fn floor_applies_to_small_totals() {
        let rules = GenerationRules {
            total_mean: -1000.0,
            total_std_dev: 1.0,
            ..GenerationRules::DEFAULT_RULES
        };
        let mut g = VoteGenerator::with_seed(&rules, 31).unwrap();
        for _ in 0..100 {
            let (yes, no) = g.draw_tally();
            assert_eq!(yes + no, 50);
        }
    }

    #[test]
    fn same_seed_same_records() {
        let ds = numbered_districts(10);
        let rules = GenerationRules::DEFAULT_RULES;
        let a = generate_votes(&ds, 37, &rules, Some(99)).unwrap();
        let b = generate_votes(&ds, 37, &rules, Some(99)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn invalid_rules() {
        let negative_dev = GenerationRules {
            total_std_dev: -1.0,
            ..GenerationRules::DEFAULT_RULES
        };
        assert!(matches!(
            VoteGenerator::with_seed(&negative_dev, 1),
            Err(GenerationErrors::InvalidRules(_))
        ));
        let wide_negative_dev = GenerationRules {
            total_std_dev: -150.0,
            ..GenerationRules::DEFAULT_RULES
        };
        assert_eq!(
            VoteGenerator::with_seed(&wide_negative_dev, 1).err(),
            Some(GenerationErrors::InvalidRules(
                "total deviation must not be negative, got -150".to_string()
            ))
        );
        let flat_split = GenerationRules {
            split_shape: 0.0,
            ..GenerationRules::DEFAULT_RULES
        };
        assert!(matches!(
            VoteGenerator::with_seed(&flat_split, 1),
            Err(GenerationErrors::InvalidRules(_))
        ));
        let nan_mean = GenerationRules {
            total_mean: f64::NAN,
            ..GenerationRules::DEFAULT_RULES
        };
        assert!(matches!(
            VoteGenerator::new(&nan_mean),
            Err(GenerationErrors::InvalidRules(_))
        ));
    }
}
