//! Display-oriented test run model
//!
//! This is what [`crate::project`] produces. Each assembly owns a forest of
//! [`TestGroup`] trees, one root per trait key, where nested .NET types become
//! nested groups.

use crate::utils::sorted_keys;
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Relevant information of one test run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TestRun {
    /// Name of the computer that produced the report
    pub computer: String,
    /// Name of the user that produced the report
    pub user: String,
    /// Time the first assembly started running
    pub start_time_rtf: String,
    /// Time the last assembly finished running
    pub end_time_rtf: String,
    /// Time the first assembly started running, as written by the runner
    pub timestamp: String,
    /// Assemblies in document order
    pub assemblies: Vec<Assembly>,
}

/// The run of a single test assembly
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Assembly {
    /// File name of the assembly, without its directory
    pub name: String,
    /// Environmental errors
    pub error_count: i64,
    /// Tests that passed
    pub passed_count: i64,
    /// Tests that failed
    pub failed_count: i64,
    /// Tests that were skipped
    pub skipped_count: i64,
    /// Tests that were not run
    pub not_run_count: i64,
    /// Total number of tests
    pub total_count: i64,
    /// Date the run started (`run-date`)
    pub run_date: String,
    /// Time the run started (`run-time`)
    pub run_time: String,
    /// Time spent running the assembly (`time-rtf`)
    pub time: String,
    /// Root groups, one per trait key, the trait-less group first
    pub groups: Vec<TestGroup>,
}

/// A named group of tests and subgroups
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestGroup {
    /// Trait key for a root group, nested type or method name below it
    pub name: String,
    /// Tests owned directly by this group, in first-seen order
    pub tests: Vec<TestCase>,
    /// Subgroups in the order they were first needed; names are unique
    pub groups: Vec<TestGroup>,
}

/// A single test
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestCase {
    /// Fully-qualified test name as reported
    pub name: String,
    /// Result status, e.g. `Pass`, `Fail` or `Skip`
    pub result: String,
}

impl Assembly {
    /// Start of the run, from `run-date` and `run-time`
    pub fn run_started(&self) -> Option<NaiveDateTime> {
        let date = NaiveDate::parse_from_str(self.run_date.trim(), "%Y-%m-%d").ok()?;
        let time = NaiveTime::parse_from_str(self.run_time.trim(), "%H:%M:%S").ok()?;
        Some(date.and_time(time))
    }

    /// Distinct result statuses across every group, sorted
    pub fn result_statuses(&self) -> Vec<String> {
        let mut tally: HashMap<String, usize> = HashMap::new();
        for group in &self.groups {
            group.tally_results(&mut tally);
        }
        sorted_keys(&tally)
    }
}

impl TestGroup {
    /// Create an empty group
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            tests: Vec::new(),
            groups: Vec::new(),
        }
    }

    /// Direct subgroup with the given name
    pub fn find(&self, name: &str) -> Option<&TestGroup> {
        self.groups.iter().find(|g| g.name == name)
    }

    /// Direct subgroup with the given name, appended first if missing
    pub fn find_or_insert(&mut self, name: &str) -> &mut TestGroup {
        let idx = match self.groups.iter().position(|g| g.name == name) {
            Some(idx) => idx,
            None => {
                self.groups.push(TestGroup::new(name));
                self.groups.len() - 1
            }
        };
        &mut self.groups[idx]
    }

    /// Number of tests in this group and all of its subgroups
    pub fn count_tests(&self) -> usize {
        self.tests.len() + self.groups.iter().map(TestGroup::count_tests).sum::<usize>()
    }

    fn tally_results(&self, tally: &mut HashMap<String, usize>) {
        for test in &self.tests {
            *tally.entry(test.result.clone()).or_insert(0) += 1;
        }
        for group in &self.groups {
            group.tally_results(tally);
        }
    }
}

impl TestCase {
    /// Create a test case
    pub fn new(name: impl Into<String>, result: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            result: result.into(),
        }
    }
}
