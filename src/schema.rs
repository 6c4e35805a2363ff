//! Structural mirror of the xUnit v2+ XML result format
//!
//! Every type here maps one-to-one onto an element of the format described
//! at <https://xunit.net/docs/format-xml-v2>. Values are kept as decoded;
//! nothing is normalized. Absent attributes decode to empty strings or zero,
//! and unknown elements and attributes are ignored.

use crate::documents::Element;
use crate::error::{DecodeError, Result};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Name of the document root element
pub const ROOT_ELEMENT: &str = "assemblies";

/// Binding from a parsed element onto a schema type
pub trait FromElement: Sized {
    /// Element local name this type binds to
    const ELEMENT: &'static str;

    /// Decode the type from an element of the matching name
    fn from_element(element: &Element) -> Result<Self>;
}

/// Root of a report: the result of one `dotnet test` run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Report {
    /// Computer that ran the tests (`computer`)
    pub computer: String,
    /// Time the last assembly finished (`finish-rtf`)
    pub finish_rtf: String,
    /// Run identifier (`id`)
    pub id: String,
    /// Format version (`schema-version`)
    pub schema_version: String,
    /// Time the first assembly started (`start-rtf`)
    pub start_rtf: String,
    /// Start of the run as written by the runner (`timestamp`)
    pub timestamp: String,
    /// User that ran the tests (`user`)
    pub user: String,
    /// Assemblies in document order
    pub assemblies: Vec<AssemblyRaw>,
}

/// The run of a single test assembly, including environmental information
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AssemblyRaw {
    /// Configuration file used for the run (`config-file`)
    pub config_file: String,
    /// Runtime environment description (`environment`)
    pub environment: String,
    /// Environmental errors (`errors`)
    pub error_count: i64,
    /// Failed tests (`failed`)
    pub failed_count: i64,
    /// Time the assembly finished (`finish-rtf`)
    pub finish_rtf: String,
    /// Assembly identifier (`id`)
    pub id: String,
    /// Path-qualified name of the tested binary (`name`)
    pub full_name: String,
    /// Tests that were not run (`not-run`)
    pub not_run_count: i64,
    /// Passed tests (`passed`)
    pub passed_count: i64,
    /// Date the run started (`run-date`)
    pub run_date: String,
    /// Time the run started (`run-time`)
    pub run_time: String,
    /// Skipped tests (`skipped`)
    pub skipped_count: i64,
    /// Time the assembly started (`start-rtf`)
    pub start_rtf: String,
    /// Target framework of the binary (`target-framework`)
    pub target_framework: String,
    /// Test framework name and version (`test-framework`)
    pub test_framework: String,
    /// Seconds spent running the assembly (`time`)
    pub time: f64,
    /// Time spent running the assembly (`time-rtf`)
    pub time_rtf: String,
    /// Total number of tests (`total`)
    pub total: i64,
    /// Collections in document order
    pub collections: Vec<Collection>,
    /// Environmental errors from every `errors` block, in document order
    pub errors: Vec<ErrorRecord>,
}

/// The run of a single test collection
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Collection {
    /// Collection identifier (`id`)
    pub id: String,
    /// Display name of the collection (`name`)
    pub name: String,
    /// Failed tests (`failed`)
    pub failed_count: i64,
    /// Tests that were not run (`not-run`)
    pub not_run_count: i64,
    /// Passed tests (`passed`)
    pub passed_count: i64,
    /// Skipped tests (`skipped`)
    pub skipped_count: i64,
    /// Seconds spent, as written (`time`)
    pub time: String,
    /// Time spent (`time-rtf`)
    pub time_rtf: String,
    /// Total number of tests (`total`)
    pub total_count: i64,
    /// Tests in document order
    pub tests: Vec<TestRaw>,
}

/// The run of a single test
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TestRaw {
    /// Test identifier (`id`)
    pub id: String,
    /// Test method name (`method`)
    pub method: String,
    /// Fully-qualified test name, possibly encoding nested types with `+`
    pub name: String,
    /// Result status, e.g. `Pass`, `Fail` or `Skip` (`result`)
    pub result: String,
    /// Source file of the test (`source-file`)
    pub source_file: String,
    /// Source line of the test (`source-line`)
    pub source_line: String,
    /// Seconds spent running the test (`time`)
    pub time: f64,
    /// Time spent running the test (`time-rtf`)
    pub time_rtf: String,
    /// Declaring type (`type`)
    #[serde(rename = "type")]
    pub type_name: String,
    /// Failure details of a failed test
    pub failure: Option<Failure>,
    /// Captured output
    pub output: Option<String>,
    /// Skip reason
    pub reason: Option<String>,
    /// Traits from every `traits` block, in document order
    pub traits: Vec<Trait>,
    /// Warnings from every `warnings` block, in document order
    pub warnings: Vec<String>,
}

/// Details of a test or environment failure
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Failure {
    /// Type of the thrown exception (`exception-type`)
    pub exception_type: String,
    /// Exception message
    pub message: String,
    /// Exception stack trace
    pub stack_trace: String,
}

/// A single trait name/value pair
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trait {
    /// Trait name (`name`)
    pub name: String,
    /// Trait value (`value`)
    pub value: String,
}

/// An environment failure that happened outside the scope of a single test,
/// for example an exception thrown while disposing of a fixture
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorRecord {
    /// Name of the failing component (`name`)
    pub name: String,
    /// Kind of error, e.g. `fixture-cleanup` (`type`)
    #[serde(rename = "type")]
    pub type_name: String,
    /// Failure details
    pub failure: Option<Failure>,
}

impl TestRaw {
    /// Composite grouping keys of this test's traits, in document order
    pub fn trait_keys(&self) -> impl Iterator<Item = String> + '_ {
        self.traits.iter().map(Trait::key)
    }
}

impl Trait {
    /// Composite key `"<name> - <value>"`
    pub fn key(&self) -> String {
        format!("{} - {}", self.name, self.value)
    }
}

impl FromElement for Report {
    const ELEMENT: &'static str = ROOT_ELEMENT;

    fn from_element(element: &Element) -> Result<Self> {
        Ok(Self {
            computer: attr(element, "computer"),
            finish_rtf: attr(element, "finish-rtf"),
            id: attr(element, "id"),
            schema_version: attr(element, "schema-version"),
            start_rtf: attr(element, "start-rtf"),
            timestamp: attr(element, "timestamp"),
            user: attr(element, "user"),
            assemblies: children(element)?,
        })
    }
}

impl FromElement for AssemblyRaw {
    const ELEMENT: &'static str = "assembly";

    fn from_element(element: &Element) -> Result<Self> {
        Ok(Self {
            config_file: attr(element, "config-file"),
            environment: attr(element, "environment"),
            error_count: number_attr(element, "errors")?,
            failed_count: number_attr(element, "failed")?,
            finish_rtf: attr(element, "finish-rtf"),
            id: attr(element, "id"),
            full_name: attr(element, "name"),
            not_run_count: number_attr(element, "not-run")?,
            passed_count: number_attr(element, "passed")?,
            run_date: attr(element, "run-date"),
            run_time: attr(element, "run-time"),
            skipped_count: number_attr(element, "skipped")?,
            start_rtf: attr(element, "start-rtf"),
            target_framework: attr(element, "target-framework"),
            test_framework: attr(element, "test-framework"),
            time: number_attr(element, "time")?,
            time_rtf: attr(element, "time-rtf"),
            total: number_attr(element, "total")?,
            collections: children(element)?,
            errors: grandchildren(element, "errors")?,
        })
    }
}

impl FromElement for Collection {
    const ELEMENT: &'static str = "collection";

    fn from_element(element: &Element) -> Result<Self> {
        Ok(Self {
            id: attr(element, "id"),
            name: attr(element, "name"),
            failed_count: number_attr(element, "failed")?,
            not_run_count: number_attr(element, "not-run")?,
            passed_count: number_attr(element, "passed")?,
            skipped_count: number_attr(element, "skipped")?,
            time: attr(element, "time"),
            time_rtf: attr(element, "time-rtf"),
            total_count: number_attr(element, "total")?,
            tests: children(element)?,
        })
    }
}

impl FromElement for TestRaw {
    const ELEMENT: &'static str = "test";

    fn from_element(element: &Element) -> Result<Self> {
        Ok(Self {
            id: attr(element, "id"),
            method: attr(element, "method"),
            name: attr(element, "name"),
            result: attr(element, "result"),
            source_file: attr(element, "source-file"),
            source_line: attr(element, "source-line"),
            time: number_attr(element, "time")?,
            time_rtf: attr(element, "time-rtf"),
            type_name: attr(element, "type"),
            failure: last_child(element)?,
            output: child_text(element, "output"),
            reason: child_text(element, "reason"),
            traits: grandchildren(element, "traits")?,
            warnings: element
                .children_named("warnings")
                .flat_map(|set| set.children_named("warning"))
                .map(|w| w.text.clone())
                .collect(),
        })
    }
}

impl FromElement for Failure {
    const ELEMENT: &'static str = "failure";

    fn from_element(element: &Element) -> Result<Self> {
        Ok(Self {
            exception_type: attr(element, "exception-type"),
            message: child_text(element, "message").unwrap_or_default(),
            stack_trace: child_text(element, "stack-trace").unwrap_or_default(),
        })
    }
}

impl FromElement for Trait {
    const ELEMENT: &'static str = "trait";

    fn from_element(element: &Element) -> Result<Self> {
        Ok(Self {
            name: attr(element, "name"),
            value: attr(element, "value"),
        })
    }
}

impl FromElement for ErrorRecord {
    const ELEMENT: &'static str = "error";

    fn from_element(element: &Element) -> Result<Self> {
        Ok(Self {
            name: attr(element, "name"),
            type_name: attr(element, "type"),
            failure: last_child(element)?,
        })
    }
}

/// String attribute, empty when absent
fn attr(element: &Element, name: &str) -> String {
    element.get_attribute(name).unwrap_or_default().to_string()
}

/// Numeric attribute, zero when absent or empty
fn number_attr<T>(element: &Element, name: &str) -> Result<T>
where
    T: FromStr + Default,
    T::Err: std::fmt::Display,
{
    match element.get_attribute(name).map(str::trim) {
        None | Some("") => Ok(T::default()),
        Some(raw) => raw.parse().map_err(|e: T::Err| {
            DecodeError::new(format!("invalid value {:?} for attribute '{}': {}", raw, name, e))
                .with_element(element.name.clone())
                .with_position(element.position)
                .into()
        }),
    }
}

/// All direct children bound to `T`, in document order
fn children<T: FromElement>(element: &Element) -> Result<Vec<T>> {
    element
        .children_named(T::ELEMENT)
        .map(T::from_element)
        .collect()
}

/// Children of every `container` child, flattened in document order
fn grandchildren<T: FromElement>(element: &Element, container: &str) -> Result<Vec<T>> {
    let mut items = Vec::new();
    for set in element.children_named(container) {
        items.extend(children::<T>(set)?);
    }
    Ok(items)
}

/// The last direct child bound to `T`, if any
fn last_child<T: FromElement>(element: &Element) -> Result<Option<T>> {
    element
        .last_child_named(T::ELEMENT)
        .map(T::from_element)
        .transpose()
}

/// Text of the last direct child with the given name, if any
fn child_text(element: &Element, name: &str) -> Option<String> {
    element.last_child_named(name).map(|e| e.text.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::documents::Document;
    use crate::error::Error;

    fn root(xml: &str) -> Element {
        Document::from_string(xml).unwrap().root.unwrap()
    }

    #[test]
    fn test_report_attributes() {
        let el = root(
            r#"<assemblies computer="BUILD01" user="ci" timestamp="05/19/2023 10:00:00"
                 start-rtf="2023-05-19T10:00:00" finish-rtf="2023-05-19T10:00:05"
                 schema-version="3" id="run-1" />"#,
        );
        let report = Report::from_element(&el).unwrap();

        assert_eq!(report.computer, "BUILD01");
        assert_eq!(report.user, "ci");
        assert_eq!(report.schema_version, "3");
        assert_eq!(report.finish_rtf, "2023-05-19T10:00:05");
        assert!(report.assemblies.is_empty());
    }

    #[test]
    fn test_assembly_counters_default_to_zero() {
        let el = root(r#"<assembly name="Tests.dll" passed="3" failed="" time="1.25" />"#);
        let assembly = AssemblyRaw::from_element(&el).unwrap();

        assert_eq!(assembly.full_name, "Tests.dll");
        assert_eq!(assembly.passed_count, 3);
        assert_eq!(assembly.failed_count, 0);
        assert_eq!(assembly.skipped_count, 0);
        assert_eq!(assembly.time, 1.25);
        assert_eq!(assembly.config_file, "");
    }

    #[test]
    fn test_invalid_number_is_decode_error() {
        let el = root(r#"<assembly name="Tests.dll" passed="many" />"#);
        let err = AssemblyRaw::from_element(&el).unwrap_err();

        match err {
            Error::Decode(decode) => {
                assert!(decode.message.contains("passed"));
                assert_eq!(decode.element.as_deref(), Some("assembly"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_test_children() {
        let el = root(
            r#"<test name="NS.Type.Method" type="NS.Type" method="Method" result="Fail" time="0.5">
                 <traits><trait name="Category" value="Fast" /><trait name="Owner" value="qa" /></traits>
                 <warnings><warning>first</warning></warnings>
                 <warnings><warning>second</warning></warnings>
                 <failure exception-type="Xunit.Sdk.EqualException">
                   <message>Assert.Equal() Failure</message>
                   <stack-trace>at NS.Type.Method()</stack-trace>
                 </failure>
                 <output>hello</output>
                 <unknown-element />
               </test>"#,
        );
        let test = TestRaw::from_element(&el).unwrap();

        assert_eq!(test.type_name, "NS.Type");
        assert_eq!(test.result, "Fail");
        assert_eq!(
            test.trait_keys().collect::<Vec<_>>(),
            vec!["Category - Fast", "Owner - qa"]
        );
        assert_eq!(test.warnings, vec!["first", "second"]);
        let failure = test.failure.unwrap();
        assert_eq!(failure.exception_type, "Xunit.Sdk.EqualException");
        assert_eq!(failure.message, "Assert.Equal() Failure");
        assert_eq!(failure.stack_trace, "at NS.Type.Method()");
        assert_eq!(test.output.as_deref(), Some("hello"));
        assert_eq!(test.reason, None);
    }

    #[test]
    fn test_assembly_errors() {
        let el = root(
            r#"<assembly name="a.dll">
                 <errors>
                   <error type="fixture-cleanup" name="NS.Fixture">
                     <failure exception-type="System.Exception"><message>boom</message></failure>
                   </error>
                 </errors>
               </assembly>"#,
        );
        let assembly = AssemblyRaw::from_element(&el).unwrap();

        assert_eq!(assembly.errors.len(), 1);
        assert_eq!(assembly.errors[0].type_name, "fixture-cleanup");
        assert_eq!(
            assembly.errors[0].failure.as_ref().map(|f| f.message.as_str()),
            Some("boom")
        );
    }

    #[test]
    fn test_repeated_children() {
        let el = root(
            r#"<test name="NS.Type.Method" result="Fail">
                 <traits><trait name="Category" value="Fast" /></traits>
                 <failure exception-type="System.Exception">
                   <message>first</message>
                 </failure>
                 <output>first output</output>
                 <reason>first reason</reason>
                 <traits><trait name="Owner" value="qa" /><trait name="Category" value="Slow" /></traits>
                 <failure exception-type="Xunit.Sdk.TrueException">
                   <message>ignored</message>
                   <message>second</message>
                   <stack-trace>ignored</stack-trace>
                   <stack-trace>at NS.Type.Method()</stack-trace>
                 </failure>
                 <output>second output</output>
                 <reason>second reason</reason>
               </test>"#,
        );
        let test = TestRaw::from_element(&el).unwrap();

        assert_eq!(
            test.trait_keys().collect::<Vec<_>>(),
            vec!["Category - Fast", "Owner - qa", "Category - Slow"]
        );
        let failure = test.failure.unwrap();
        assert_eq!(failure.exception_type, "Xunit.Sdk.TrueException");
        assert_eq!(failure.message, "second");
        assert_eq!(failure.stack_trace, "at NS.Type.Method()");
        assert_eq!(test.output.as_deref(), Some("second output"));
        assert_eq!(test.reason.as_deref(), Some("second reason"));
    }

    #[test]
    fn test_repeated_error_blocks() {
        let el = root(
            r#"<assembly name="a.dll">
                 <errors><error type="assembly-cleanup" name="first" /></errors>
                 <collection name="c" />
                 <errors>
                   <error type="fixture-cleanup" name="second" />
                   <error type="test-case-cleanup" name="third" />
                 </errors>
               </assembly>"#,
        );
        let assembly = AssemblyRaw::from_element(&el).unwrap();

        let names: Vec<&str> = assembly.errors.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["first", "second", "third"]);
        assert_eq!(assembly.collections.len(), 1);
    }

    #[test]
    fn test_mixed_text_and_cdata() {
        let el = root(
            r#"<failure><message>a<![CDATA[<b>]]>c</message><stack-trace>x &amp; <![CDATA[y]]></stack-trace></failure>"#,
        );
        let failure = Failure::from_element(&el).unwrap();

        assert_eq!(failure.message, "a<b>c");
        assert_eq!(failure.stack_trace, "x & y");
    }

    #[test]
    fn test_trait_key() {
        let t = Trait {
            name: "Category".to_string(),
            value: "Slow".to_string(),
        };
        assert_eq!(t.key(), "Category - Slow");
    }
}
