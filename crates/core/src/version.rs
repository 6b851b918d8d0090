//! Optimistic concurrency expectations.

use crate::error::{DomainError, DomainResult};

/// Optimistic concurrency expectation for a versioned record.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ExpectedVersion {
    /// Skip version checking.
    Any,
    /// Require the record to be at an exact version.
    Exact(u64),
}

impl ExpectedVersion {
    pub fn matches(self, actual: u64) -> bool {
        match self {
            ExpectedVersion::Any => true,
            ExpectedVersion::Exact(v) => v == actual,
        }
    }

    pub fn check(self, actual: u64) -> DomainResult<()> {
        if self.matches(actual) {
            Ok(())
        } else {
            Err(DomainError::conflict(format!(
                "optimistic concurrency check failed (expected: {self:?}, actual: {actual})"
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_version_mismatch_is_conflict() {
        assert!(ExpectedVersion::Any.check(9).is_ok());
        assert!(ExpectedVersion::Exact(3).check(3).is_ok());
        assert!(matches!(
            ExpectedVersion::Exact(3).check(4),
            Err(DomainError::Conflict(_))
        ));
    }
}
