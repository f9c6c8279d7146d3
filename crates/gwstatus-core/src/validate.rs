// Co-indexed column check.
//
// Rate tables arrive as independently sized arrays that must describe the
// same rows. A short column is a publisher bug; truncating to the shortest
// would pin rates on the wrong hosts, so any disagreement fails the table.

use crate::error::InconsistencyError;

/// Fail unless every `(label, count)` has the same count as the first.
pub fn check_equal_lengths(columns: &[(&'static str, usize)]) -> Result<(), InconsistencyError> {
    let Some(&(expected_label, expected)) = columns.first() else {
        return Ok(());
    };

    match columns.iter().find(|(_, count)| *count != expected) {
        Some(&(actual_label, actual)) => Err(InconsistencyError {
            expected,
            actual,
            expected_label,
            actual_label,
        }),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[test]
    fn equal_columns_pass() {
        assert_eq!(check_equal_lengths(&[("hosts", 3), ("speeds", 3)]), Ok(()));
        assert_eq!(check_equal_lengths(&[("hosts", 0), ("speeds", 0)]), Ok(()));
        assert_eq!(check_equal_lengths(&[]), Ok(()));
    }

    #[test]
    fn mismatch_names_both_counts() {
        let err = check_equal_lengths(&[("hosts", 3), ("speeds", 2)]).unwrap_err();
        assert_eq!(err.to_string(), "(3 hosts, 2 speeds)");
    }

    #[test]
    fn third_column_is_checked() {
        let err =
            check_equal_lengths(&[("hosts", 2), ("speeds", 2), ("accounts", 1)]).unwrap_err();
        assert_eq!(err.expected, 2);
        assert_eq!(err.actual, 1);
        assert_eq!(err.actual_label, "accounts");
    }
}
