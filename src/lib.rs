//! # xunit-report
//!
//! Reads .NET test results written in xUnit's v2+ XML format and turns them
//! into a tree fit for reporting: tests are grouped per assembly by trait,
//! and within a trait by the nested types encoded in their names.
//!
//! More information about the format can be found at
//! <https://xunit.net/docs/format-xml-v2>.
//!
//! ## Example
//!
//! ```rust
//! let xml = r#"<assemblies>
//!   <assembly name="C:\build\Tests.dll" total="1" passed="1">
//!     <collection name="Test collection for NS.Calculator">
//!       <test name="NS.Calculator+Add+ReturnsSum" result="Pass" />
//!     </collection>
//!   </assembly>
//! </assemblies>"#;
//!
//! let run = xunit_report::load(xml.as_bytes())?;
//! let assembly = &run.assemblies[0];
//! assert_eq!(assembly.name, "Tests.dll");
//!
//! let add = assembly.groups[0].find("Calculator").and_then(|g| g.find("Add"));
//! assert_eq!(add.and_then(|g| g.find("ReturnsSum")).map(|g| g.tests.len()), Some(1));
//! # Ok::<(), xunit_report::Error>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod limits;

pub mod documents;
pub mod loaders;

pub mod decoder;
pub mod schema;

pub mod model;
pub mod projector;
pub mod utils;

pub use decoder::{decode, Decoder, EmptyInput};
pub use error::{DecodeError, Error, Result};
pub use model::{Assembly, TestCase, TestGroup, TestRun};
pub use projector::project;
pub use schema::Report;

use std::io::Read;

/// Version of the xunit-report library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Decode a report from `reader` and build its display model
pub fn load<R: Read>(reader: R) -> Result<TestRun> {
    let report = decode(reader)?;
    Ok(project(&report))
}
