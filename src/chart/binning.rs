#[cfg(feature = "parallel-binning")]
use rayon::prelude::*;

use crate::core::QuantizeScale;

use super::Record;

/// Counts records per cell of a `bins_per_side` x `bins_per_side` grid.
///
/// Cell `i` covers column `i % bins_per_side` and row `i / bins_per_side`,
/// row 0 being the lowest y bucket. Records with a `NaN` coordinate are
/// not counted.
#[must_use]
pub fn bin_counts(
    records: &[Record],
    x_domain: (f64, f64),
    y_domain: (f64, f64),
    bins_per_side: usize,
) -> Vec<u32> {
    let cells = bins_per_side * bins_per_side;
    let x_bin = QuantizeScale::new(x_domain, bins_per_side);
    let y_bin = QuantizeScale::new(y_domain, bins_per_side);
    let cell_of = |record: &Record| {
        let column = x_bin.bucket(record.x)?;
        let row = y_bin.bucket(record.y)?;
        Some(column + bins_per_side * row)
    };

    // Large datasets are counted per thread and merged; the result is the
    // same either way.
    #[cfg(feature = "parallel-binning")]
    {
        records
            .par_iter()
            .fold(
                || vec![0u32; cells],
                |mut counts, record| {
                    if let Some(cell) = cell_of(record) {
                        counts[cell] += 1;
                    }
                    counts
                },
            )
            .reduce(
                || vec![0u32; cells],
                |mut left, right| {
                    for (total, count) in left.iter_mut().zip(right) {
                        *total += count;
                    }
                    left
                },
            )
    }

    #[cfg(not(feature = "parallel-binning"))]
    {
        let mut counts = vec![0u32; cells];
        for record in records {
            if let Some(cell) = cell_of(record) {
                counts[cell] += 1;
            }
        }
        counts
    }
}

#[cfg(test)]
mod tests {
    use super::bin_counts;
    use crate::chart::Record;

    #[test]
    fn counts_land_in_row_major_cells_from_the_bottom() {
        let records = vec![
            Record::new(0.0, 0.0, ""),
            Record::new(9.0, 0.0, ""),
            Record::new(9.0, 9.0, ""),
            Record::new(9.5, 9.5, ""),
            Record::new(f64::NAN, 1.0, ""),
        ];
        let counts = bin_counts(&records, (0.0, 10.0), (0.0, 10.0), 2);
        assert_eq!(counts, vec![1, 1, 0, 2]);
    }

    #[test]
    fn zero_bins_yields_no_cells() {
        let records = vec![Record::new(1.0, 1.0, "")];
        assert!(bin_counts(&records, (0.0, 10.0), (0.0, 10.0), 0).is_empty());
    }
}
