use serde::{Deserialize, Serialize};

use attest_core::DiagnosticValue;

/// Decision of one upstream verifier about one check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "verdict", rename_all = "snake_case")]
pub enum Verdict {
    Pass,
    Fail {
        #[serde(default)]
        actual: DiagnosticValue,
        #[serde(default)]
        expected: DiagnosticValue,
    },
}

impl Verdict {
    pub fn fail(actual: impl Into<DiagnosticValue>, expected: impl Into<DiagnosticValue>) -> Self {
        Self::Fail {
            actual: actual.into(),
            expected: expected.into(),
        }
    }

    /// Pass when `actual == expected`, otherwise fail with both values.
    pub fn expect_eq<T>(actual: T, expected: T) -> Self
    where
        T: PartialEq + Into<DiagnosticValue>,
    {
        if actual == expected {
            Self::Pass
        } else {
            Self::fail(actual, expected)
        }
    }

    /// Pass when `ok`, otherwise fail with the given values.
    pub fn ensure(
        ok: bool,
        actual: impl Into<DiagnosticValue>,
        expected: impl Into<DiagnosticValue>,
    ) -> Self {
        if ok {
            Self::Pass
        } else {
            Self::fail(actual, expected)
        }
    }

    pub fn is_pass(&self) -> bool {
        matches!(self, Self::Pass)
    }
}
