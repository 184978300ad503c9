//! Partition sizing heuristic.

use rf_types::SizerConfig;

/// Pure heuristic mapping total record count to parallelism granularity.
///
/// Input partitioning and output-unit counts are computed independently.
/// Both follow the same shape: tiny datasets stay in one unit, mid-sized
/// datasets scale with a target rows-per-unit clamped to configured bounds,
/// and above the large threshold a bigger target applies (fewer, larger
/// units) with a hard cap. Both functions are deterministic and
/// monotonically non-decreasing in the record count, flat once the cap is
/// reached.
///
/// The resulting counts are consumed by the surrounding I/O layer to decide
/// read/write splitting; this core never touches storage.
#[derive(Debug, Clone, Default)]
pub struct PartitionSizer {
    config: SizerConfig,
}

impl PartitionSizer {
    pub fn new(config: SizerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SizerConfig {
        &self.config
    }

    /// Number of input partitions for processing `records` rows.
    pub fn input_partitions(&self, records: u64) -> u32 {
        let c = &self.config;
        if records <= c.small_threshold {
            return 1;
        }

        let medium = |n: u64| clamp(n.div_ceil(c.target_rows), c.min_partitions, c.max_partitions);
        if records <= c.large_threshold {
            return medium(records);
        }

        // Above the large threshold the bigger target applies, floored at
        // the boundary value so the curve never regresses as N grows.
        let at_boundary = medium(c.large_threshold);
        let scaled = clamp(
            records.div_ceil(c.large_target_rows),
            c.min_partitions,
            c.max_partitions,
        );
        at_boundary.max(scaled)
    }

    /// Number of output units for writing `records` rows.
    ///
    /// Output favors fewer, larger units than input processing used: small
    /// results collapse to a single unit, and the caps are much lower.
    pub fn output_partitions(&self, records: u64) -> u32 {
        let c = &self.config;
        if records < c.single_output_threshold {
            return 1;
        }

        let medium = |n: u64| {
            clamp(
                n.div_ceil(c.output_target_rows),
                c.min_partitions,
                c.medium_output_cap,
            )
        };
        if records < c.large_threshold {
            return medium(records);
        }

        let at_boundary = medium(c.large_threshold);
        let scaled = clamp(
            records.div_ceil(c.large_output_target_rows),
            c.min_partitions,
            c.max_output_units,
        );
        at_boundary.max(scaled).min(c.max_output_units)
    }
}

fn clamp(value: u64, min: u32, max: u32) -> u32 {
    value.clamp(u64::from(min), u64::from(max)) as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sizer() -> PartitionSizer {
        PartitionSizer::default()
    }

    #[test]
    fn test_small_dataset_single_partition() {
        assert_eq!(sizer().input_partitions(0), 1);
        assert_eq!(sizer().input_partitions(500), 1);
        assert_eq!(sizer().input_partitions(10_000), 1);
    }

    #[test]
    fn test_medium_dataset_scales_with_target() {
        // 100k rows / 50k target = 2 partitions
        assert_eq!(sizer().input_partitions(100_000), 2);
        // 500k rows / 50k target = 10
        assert_eq!(sizer().input_partitions(500_000), 10);
        // 1M rows / 50k target = 20
        assert_eq!(sizer().input_partitions(1_000_000), 20);
    }

    #[test]
    fn test_large_dataset_within_bounds() {
        let s = sizer();
        let p = s.input_partitions(2_000_000);
        assert!(p >= s.config().min_partitions);
        assert!(p <= s.config().max_partitions);
        // Floored at the boundary value, not the raw 2M/150k = 14
        assert_eq!(p, 20);
    }

    #[test]
    fn test_input_monotone_then_flat() {
        let s = sizer();
        let counts: Vec<u64> = vec![
            100,
            10_000,
            10_001,
            50_000,
            200_000,
            1_000_000,
            1_000_001,
            2_000_000,
            5_000_000,
            30_000_000,
            50_000_000,
            1_000_000_000,
        ];
        let mut previous = 0;
        for n in counts {
            let p = s.input_partitions(n);
            assert!(p >= previous, "regressed at N={n}: {p} < {previous}");
            previous = p;
        }
        // Hard cap: flat beyond 30M rows (200 * 150k)
        assert_eq!(s.input_partitions(30_000_000), 200);
        assert_eq!(s.input_partitions(1_000_000_000), 200);
    }

    #[test]
    fn test_deterministic() {
        let s = sizer();
        assert_eq!(s.input_partitions(2_000_000), s.input_partitions(2_000_000));
        assert_eq!(s.output_partitions(750_000), s.output_partitions(750_000));
    }

    #[test]
    fn test_output_small_single_file() {
        assert_eq!(sizer().output_partitions(0), 1);
        assert_eq!(sizer().output_partitions(49_999), 1);
    }

    #[test]
    fn test_output_medium_capped_low() {
        // 50k rows -> min clamp of 2
        assert_eq!(sizer().output_partitions(50_000), 2);
        // 600k rows / 250k target = 3
        assert_eq!(sizer().output_partitions(600_000), 3);
        // 999k rows -> capped at 4
        assert_eq!(sizer().output_partitions(999_999), 4);
    }

    #[test]
    fn test_output_large_fewer_bigger_units() {
        let s = sizer();
        // Boundary floor holds until 750k-per-unit overtakes it
        assert_eq!(s.output_partitions(1_000_000), 4);
        assert_eq!(s.output_partitions(3_750_000), 5);
        // Hard cap at 50 units
        assert_eq!(s.output_partitions(37_500_000), 50);
        assert_eq!(s.output_partitions(400_000_000), 50);
    }

    #[test]
    fn test_output_uses_fewer_units_than_input() {
        let s = sizer();
        for n in [200_000u64, 1_000_000, 5_000_000, 50_000_000] {
            assert!(s.output_partitions(n) <= s.input_partitions(n), "at N={n}");
        }
    }
}
