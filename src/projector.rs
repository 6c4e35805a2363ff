//! Projection of a decoded report onto the display model
//!
//! Tests are grouped per assembly, first by trait key and then by the
//! nested-type path encoded in their names with `+`.

use crate::model::{Assembly, TestCase, TestGroup, TestRun};
use crate::schema::{AssemblyRaw, Report, TestRaw};
use crate::utils::contains;
use log::trace;

/// Key of the root group that collects tests without traits
pub const NO_TRAIT: &str = "";

/// Build the display model for a decoded report
pub fn project(report: &Report) -> TestRun {
    TestRun {
        computer: report.computer.clone(),
        user: report.user.clone(),
        start_time_rtf: report.start_rtf.clone(),
        end_time_rtf: report.finish_rtf.clone(),
        timestamp: report.timestamp.clone(),
        assemblies: report.assemblies.iter().map(project_assembly).collect(),
    }
}

fn project_assembly(raw: &AssemblyRaw) -> Assembly {
    Assembly {
        name: short_name(&raw.full_name).to_string(),
        error_count: raw.error_count,
        passed_count: raw.passed_count,
        failed_count: raw.failed_count,
        skipped_count: raw.skipped_count,
        not_run_count: raw.not_run_count,
        total_count: raw.total,
        run_date: raw.run_date.clone(),
        run_time: raw.run_time.clone(),
        time: raw.time_rtf.clone(),
        groups: group_tests(raw),
    }
}

/// File name part of a path-qualified assembly name
///
/// `/` is used as separator when present, `\` otherwise.
pub fn short_name(full_name: &str) -> &str {
    let separator = if full_name.contains('/') { '/' } else { '\\' };
    match full_name.rfind(separator) {
        Some(idx) => &full_name[idx + separator.len_utf8()..],
        None => full_name,
    }
}

/// Distinct trait keys of an assembly in first-seen order, [`NO_TRAIT`] first
pub fn trait_keys(raw: &AssemblyRaw) -> Vec<String> {
    let mut keys = vec![NO_TRAIT.to_string()];
    for key in tests(raw).flat_map(|test| test.trait_keys()) {
        if !contains(&keys, &key) {
            keys.push(key);
        }
    }
    keys
}

/// Root groups of an assembly, one per trait key
pub fn group_tests(raw: &AssemblyRaw) -> Vec<TestGroup> {
    if !raw.collections.iter().any(|c| !c.tests.is_empty()) {
        return Vec::new();
    }

    let keys = trait_keys(raw);
    trace!("grouping '{}' under {} trait keys", raw.full_name, keys.len());

    keys.iter()
        .map(|key| {
            let mut root = TestGroup::new(key.as_str());
            for test in tests_with_trait(raw, key) {
                place(&mut root, test);
            }
            root
        })
        .collect()
}

/// Tests belonging to a trait key, in document order
///
/// A test carrying the same trait twice is yielded twice.
fn tests_with_trait<'a>(raw: &'a AssemblyRaw, key: &'a str) -> impl Iterator<Item = &'a TestRaw> + 'a {
    tests(raw).flat_map(move |test| {
        let hits = if key == NO_TRAIT && test.traits.is_empty() {
            1
        } else {
            test.trait_keys().filter(|k| k == key).count()
        };
        std::iter::repeat(test).take(hits)
    })
}

fn tests(raw: &AssemblyRaw) -> impl Iterator<Item = &TestRaw> {
    raw.collections.iter().flat_map(|c| c.tests.iter())
}

/// Attach a test below a trait root, walking its nested-type path
fn place(root: &mut TestGroup, test: &TestRaw) {
    let case = TestCase::new(test.name.as_str(), test.result.as_str());

    if has_display_name(&test.name) || !is_nested(&test.name) {
        root.tests.push(case);
        return;
    }

    let mut node = root;
    for label in nested_names(&test.name) {
        node = node.find_or_insert(label);
    }
    node.tests.push(case);
}

/// A display name contains spaces and no `+`
pub fn has_display_name(name: &str) -> bool {
    name.contains(' ') && !name.contains('+')
}

/// A nested test name contains one or more `+`
pub fn is_nested(name: &str) -> bool {
    name.contains('+')
}

/// Group labels encoded in a nested test name
///
/// The first part keeps what follows its last `.`, the last part keeps what
/// precedes its first `.`, and parts in between are kept as they are.
pub fn nested_names(name: &str) -> Vec<&str> {
    let parts: Vec<&str> = name.split('+').collect();
    let Some((&last, rest)) = parts.split_last() else {
        return Vec::new();
    };
    let Some((&first, middle)) = rest.split_first() else {
        return vec![last];
    };

    let mut names = Vec::with_capacity(parts.len());
    names.push(first.rsplit('.').next().unwrap_or(first));
    names.extend_from_slice(middle);
    names.push(last.split('.').next().unwrap_or(last));
    names
}
