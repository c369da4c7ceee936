//! Check and report types shared by the static and live validators.
//!
//! Validation failures are data, not process errors: every check records its
//! expected and actual value, and a failing check never stops the checks
//! around it from running.

use serde::Serialize;

/// One assertion: what was checked, what was expected, what was observed
#[derive(Debug, Clone, Serialize)]
pub struct Check {
    pub name: String,
    pub passed: bool,
    pub expected: String,
    pub actual: String,
}

impl Check {
    pub fn pass(name: impl Into<String>, value: impl Into<String>) -> Self {
        let value = value.into();
        Self {
            name: name.into(),
            passed: true,
            expected: value.clone(),
            actual: value,
        }
    }

    pub fn fail(
        name: impl Into<String>,
        expected: impl Into<String>,
        actual: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            passed: false,
            expected: expected.into(),
            actual: actual.into(),
        }
    }
}

/// A named batch of independent checks
#[derive(Debug, Clone, Serialize)]
pub struct CheckGroup {
    pub name: String,
    pub checks: Vec<Check>,
}

impl CheckGroup {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            checks: Vec::new(),
        }
    }

    pub fn passed(&self) -> bool {
        self.checks.iter().all(|c| c.passed)
    }

    /// Record `actual == expected`
    pub fn expect_eq(&mut self, name: &str, expected: &str, actual: &str) {
        if expected == actual {
            self.checks.push(Check::pass(name, expected));
        } else {
            self.checks.push(Check::fail(name, expected, actual));
        }
    }

    /// Record that `haystack` contains `needle`
    pub fn expect_contains(&mut self, name: &str, haystack: &str, needle: &str) {
        if haystack.contains(needle) {
            self.checks.push(Check::pass(name, format!("contains {:?}", needle)));
        } else {
            self.checks.push(Check::fail(
                name,
                format!("contains {:?}", needle),
                "not found".to_string(),
            ));
        }
    }

    /// Record a boolean condition with a description of the observed state
    pub fn expect_true(&mut self, name: &str, condition: bool, actual: impl Into<String>) {
        if condition {
            self.checks.push(Check::pass(name, "true"));
        } else {
            self.checks.push(Check::fail(name, "true", actual));
        }
    }

    /// Record an exact count
    pub fn expect_count(&mut self, name: &str, expected: usize, actual: usize) {
        if expected == actual {
            self.checks.push(Check::pass(name, expected.to_string()));
        } else {
            self.checks
                .push(Check::fail(name, expected.to_string(), actual.to_string()));
        }
    }
}

/// The outcome of one validator pass: all groups, all checks, no fail-fast
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub groups: Vec<CheckGroup>,
}

impl Report {
    pub fn new(groups: Vec<CheckGroup>) -> Self {
        Self { groups }
    }

    pub fn passed(&self) -> bool {
        self.groups.iter().all(|g| g.passed())
    }

    pub fn group(&self, name: &str) -> Option<&CheckGroup> {
        self.groups.iter().find(|g| g.name == name)
    }

    pub fn failures(&self) -> Vec<&Check> {
        self.groups
            .iter()
            .flat_map(|g| g.checks.iter().filter(|c| !c.passed))
            .collect()
    }

    pub fn total_checks(&self) -> usize {
        self.groups.iter().map(|g| g.checks.len()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failing_check_does_not_hide_siblings() {
        let mut g = CheckGroup::new("demo");
        g.expect_eq("first", "a", "b");
        g.expect_eq("second", "x", "x");
        assert!(!g.passed());
        assert_eq!(g.checks.len(), 2);
        assert!(g.checks[1].passed);
    }

    #[test]
    fn report_collects_failures_with_expected_vs_actual() {
        let mut g = CheckGroup::new("demo");
        g.expect_count("headings", 4, 3);
        let report = Report::new(vec![g]);
        assert!(!report.passed());
        let failures = report.failures();
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].expected, "4");
        assert_eq!(failures[0].actual, "3");
    }
}
