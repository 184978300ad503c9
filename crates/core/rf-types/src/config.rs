//! Configuration types for partition sizing.

use serde::{Deserialize, Serialize};

/// Partition sizing heuristic configuration.
///
/// Input partitioning and output-unit counts are computed independently:
/// the input side favors enough partitions to keep workers busy, the output
/// side favors fewer, larger units even when compute used many small tasks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SizerConfig {
    /// Record counts at or below this stay in a single input partition
    #[serde(default = "default_small_threshold")]
    pub small_threshold: u64,

    /// Record counts above this switch to the large-dataset target
    #[serde(default = "default_large_threshold")]
    pub large_threshold: u64,

    /// Target rows per input partition for mid-sized datasets
    #[serde(default = "default_target_rows")]
    pub target_rows: u64,

    /// Target rows per input partition above the large threshold
    #[serde(default = "default_large_target_rows")]
    pub large_target_rows: u64,

    /// Lower clamp on the input partition count (once above the small threshold)
    #[serde(default = "default_min_partitions")]
    pub min_partitions: u32,

    /// Hard upper cap on the input partition count
    #[serde(default = "default_max_partitions")]
    pub max_partitions: u32,

    /// Record counts below this produce a single output unit
    #[serde(default = "default_single_output_threshold")]
    pub single_output_threshold: u64,

    /// Target rows per output unit for mid-sized datasets
    #[serde(default = "default_output_target_rows")]
    pub output_target_rows: u64,

    /// Upper clamp on output units for mid-sized datasets
    #[serde(default = "default_medium_output_cap")]
    pub medium_output_cap: u32,

    /// Target rows per output unit above the large threshold
    #[serde(default = "default_large_output_target_rows")]
    pub large_output_target_rows: u64,

    /// Hard upper cap on the output unit count
    #[serde(default = "default_max_output_units")]
    pub max_output_units: u32,
}

impl Default for SizerConfig {
    fn default() -> Self {
        Self {
            small_threshold: default_small_threshold(),
            large_threshold: default_large_threshold(),
            target_rows: default_target_rows(),
            large_target_rows: default_large_target_rows(),
            min_partitions: default_min_partitions(),
            max_partitions: default_max_partitions(),
            single_output_threshold: default_single_output_threshold(),
            output_target_rows: default_output_target_rows(),
            medium_output_cap: default_medium_output_cap(),
            large_output_target_rows: default_large_output_target_rows(),
            max_output_units: default_max_output_units(),
        }
    }
}

fn default_small_threshold() -> u64 {
    10_000
}

fn default_large_threshold() -> u64 {
    1_000_000
}

fn default_target_rows() -> u64 {
    50_000
}

fn default_large_target_rows() -> u64 {
    150_000
}

fn default_min_partitions() -> u32 {
    2
}

fn default_max_partitions() -> u32 {
    200
}

fn default_single_output_threshold() -> u64 {
    50_000
}

fn default_output_target_rows() -> u64 {
    250_000
}

fn default_medium_output_cap() -> u32 {
    4
}

fn default_large_output_target_rows() -> u64 {
    750_000
}

fn default_max_output_units() -> u32 {
    50
}
