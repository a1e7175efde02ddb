// ********* Output data structures ***********

use std::error::Error;
use std::fmt::Display;

/// One synthetic tally for a district.
///
/// `yes + no` is the total number of ballots drawn for this record.
#[derive(Eq, PartialEq, Debug, Clone, Hash)]
pub struct VoteRecord {
    pub district: String,
    pub yes: u64,
    pub no: u64,
}

impl VoteRecord {
    pub fn total(&self) -> u64 {
        self.yes + self.no
    }
}

/// Errors that prevent the generator from completing successfully.
#[derive(Eq, PartialEq, Debug, Clone)]
pub enum GenerationErrors {
    /// Records were requested but there is no district to attach them to.
    NoDistricts,
    /// The generation rules cannot be turned into distributions.
    InvalidRules(String),
}

impl Error for GenerationErrors {}

impl Display for GenerationErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GenerationErrors::NoDistricts => {
                write!(f, "cannot generate votes without any district")
            }
            GenerationErrors::InvalidRules(msg) => write!(f, "invalid generation rules: {}", msg),
        }
    }
}

// ********* Configuration **********

/// The shape of the generated tallies.
///
/// The total number of ballots of a record follows a normal distribution,
/// truncated to an integer and floored at `min_total`. The share of yes
/// votes follows a symmetric beta distribution with both shape parameters
/// equal to `split_shape`.
#[derive(PartialEq, Debug, Clone, Copy)]
pub struct GenerationRules {
    pub total_mean: f64,
    pub total_std_dev: f64,
    pub min_total: u64,
    pub split_shape: f64,
}

impl GenerationRules {
    pub const DEFAULT_RULES: GenerationRules = GenerationRules {
        total_mean: 500.0,
        total_std_dev: 150.0,
        min_total: 50,
        split_shape: 2.0,
    };
}

impl Default for GenerationRules {
    fn default() -> Self {
        GenerationRules::DEFAULT_RULES
    }
}
