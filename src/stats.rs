//! Two-sided Fisher exact test on a 2x2 contingency table.

use statrs::distribution::{Discrete, Hypergeometric};

use crate::error::KeggError;

/// Relative tolerance when comparing table probabilities against the observed one.
const RELATIVE_TOLERANCE: f64 = 1.0 + 1e-7;

/// Two-sided p-value of `[[a, b], [c, d]]`: the summed probability of every table
/// with the same margins that is at most as likely as the observed one.
///
/// A table with an empty row or column carries no information and yields `1.0`.
pub fn fisher_exact(table: [[u64; 2]; 2]) -> Result<f64, KeggError> {
    let [[a, b], [c, d]] = table;
    let row1 = a + b;
    let row2 = c + d;
    let col1 = a + c;
    let col2 = b + d;
    if row1 == 0 || row2 == 0 || col1 == 0 || col2 == 0 {
        return Ok(1.0);
    }

    let total = row1 + row2;
    let distribution = Hypergeometric::new(total, row1, col1)
        .map_err(|err| KeggError::Statistics(err.to_string()))?;

    let observed = distribution.pmf(a) * RELATIVE_TOLERANCE;
    let low = col1.saturating_sub(total - row1);
    let high = col1.min(row1);
    let pvalue: f64 = (low..=high)
        .map(|x| distribution.pmf(x))
        .filter(|probability| *probability <= observed)
        .sum();

    Ok(pvalue.min(1.0))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(left: f64, right: f64) -> bool {
        (left - right).abs() < 1e-9
    }

    #[test]
    fn tea_tasting_table() {
        // Fisher's lady tasting tea: [[3, 1], [1, 3]]
        let pvalue = fisher_exact([[3, 1], [1, 3]]).unwrap();
        assert!(close(pvalue, 0.4857142857142857), "{pvalue}");
    }

    #[test]
    fn strongly_skewed_table() {
        let pvalue = fisher_exact([[8, 2], [1, 5]]).unwrap();
        assert!(close(pvalue, 0.03496503496503495), "{pvalue}");
    }

    #[test]
    fn degenerate_margins_yield_one() {
        assert_eq!(fisher_exact([[4, 0], [0, 0]]).unwrap(), 1.0);
        assert_eq!(fisher_exact([[0, 0], [3, 2]]).unwrap(), 1.0);
        assert_eq!(fisher_exact([[2, 0], [5, 0]]).unwrap(), 1.0);
    }

    #[test]
    fn balanced_table_is_not_significant() {
        let pvalue = fisher_exact([[5, 5], [5, 5]]).unwrap();
        assert!(close(pvalue, 1.0), "{pvalue}");
    }
}
