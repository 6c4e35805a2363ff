//! Property tests for trait grouping and nested-name placement

use proptest::prelude::*;
use xunit_report::projector::{group_tests, nested_names, trait_keys, NO_TRAIT};
use xunit_report::schema::{AssemblyRaw, Collection, TestRaw, Trait};
use xunit_report::{project, Report, TestGroup};

fn arb_trait() -> impl Strategy<Value = Trait> {
    (prop::sample::select(vec!["Category", "Owner"]), prop::sample::select(vec!["A", "B", "C"]))
        .prop_map(|(name, value)| Trait {
            name: name.to_string(),
            value: value.to_string(),
        })
}

fn arb_name() -> impl Strategy<Value = String> {
    prop_oneof![
        "[A-Z][a-z]{0,3}\\.[A-Z][a-z]{0,3}\\.[A-Z][a-z]{0,3}",
        "[A-Z][a-z]{0,3}\\.[A-Z][a-z]{0,3}(\\+[A-Z][a-z]{0,3}){1,3}",
        "[A-Z][a-z]{0,3} [a-z]{1,4} [a-z]{1,4}",
    ]
}

fn arb_test() -> impl Strategy<Value = TestRaw> {
    (arb_name(), prop::collection::vec(arb_trait(), 0..3)).prop_map(|(name, traits)| TestRaw {
        name,
        result: "Pass".to_string(),
        traits,
        ..TestRaw::default()
    })
}

fn arb_assembly() -> impl Strategy<Value = AssemblyRaw> {
    prop::collection::vec(prop::collection::vec(arb_test(), 0..6), 0..3).prop_map(|collections| {
        AssemblyRaw {
            full_name: "/tmp/Tests.dll".to_string(),
            collections: collections
                .into_iter()
                .map(|tests| Collection {
                    tests,
                    ..Collection::default()
                })
                .collect(),
            ..AssemblyRaw::default()
        }
    })
}

fn assert_unique_children(group: &TestGroup) {
    let mut seen: Vec<&str> = Vec::new();
    for child in &group.groups {
        assert!(!seen.contains(&child.name.as_str()), "duplicate group {:?}", child.name);
        seen.push(&child.name);
        assert_unique_children(child);
    }
}

proptest! {
    #[test]
    fn trait_keys_are_unique_and_start_with_sentinel(assembly in arb_assembly()) {
        let keys = trait_keys(&assembly);
        prop_assert_eq!(keys[0].as_str(), NO_TRAIT);
        for (i, key) in keys.iter().enumerate() {
            prop_assert!(!keys[..i].contains(key));
        }
    }

    #[test]
    fn every_test_is_placed_once_per_matching_key(assembly in arb_assembly()) {
        let groups = group_tests(&assembly);
        let tests: Vec<&TestRaw> = assembly.collections.iter().flat_map(|c| c.tests.iter()).collect();

        if tests.is_empty() {
            prop_assert!(groups.is_empty());
        } else {
            let expected: usize = tests.iter().map(|t| t.traits.len().max(1)).sum();
            let placed: usize = groups.iter().map(TestGroup::count_tests).sum();
            prop_assert_eq!(placed, expected);
        }
    }

    #[test]
    fn sibling_groups_have_unique_names(assembly in arb_assembly()) {
        for root in group_tests(&assembly) {
            assert_unique_children(&root);
        }
    }

    #[test]
    fn nested_names_has_one_label_per_part(name in "[A-Za-z.]{1,8}(\\+[A-Za-z.]{1,8}){1,4}") {
        let labels = nested_names(&name);
        prop_assert_eq!(labels.len(), name.split('+').count());
        prop_assert!(!labels[0].contains('.'));
        prop_assert!(!labels[labels.len() - 1].contains('.'));
    }

    #[test]
    fn projection_is_repeatable(assembly in arb_assembly()) {
        let report = Report {
            assemblies: vec![assembly],
            ..Report::default()
        };
        prop_assert_eq!(project(&report), project(&report));
    }
}
