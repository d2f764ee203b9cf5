//! # JUnit Ingestion Module / JUnit 解析模块
//!
//! Reads a JUnit XML report into suites and test cases. The root element may be
//! `<testsuites>` or a single `<testsuite>`. Suites nested inside a suite are
//! kept as children of that suite.
//!
//! 将 JUnit XML 报告读取为测试套件和测试用例。

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("failed to read report")]
    Io(#[from] std::io::Error),
    #[error("malformed report XML")]
    Xml(#[from] quick_xml::Error),
    #[error("malformed attribute")]
    Attr(#[from] quick_xml::events::attributes::AttrError),
    #[error("unbalanced or unclosed <{0}> element")]
    Unbalanced(String),
}

/// Raw status of a test case, derived from its child elements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CaseStatus {
    #[default]
    Passed,
    Failed,
    Error,
    Skipped,
}

impl CaseStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            CaseStatus::Passed => "passed",
            CaseStatus::Failed => "failed",
            CaseStatus::Error => "error",
            CaseStatus::Skipped => "skipped",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct TestCase {
    pub name: String,
    pub classname: String,
    pub duration: Duration,
    pub status: CaseStatus,
    /// Failure or error message, when there is one.
    pub message: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Suite {
    pub name: String,
    pub tests: Vec<TestCase>,
    /// Child suites. Not expanded by the result mapper.
    pub suites: Vec<Suite>,
}

pub fn ingest_file(path: &Path) -> Result<Vec<Suite>, IngestError> {
    let xml = std::fs::read_to_string(path)?;
    ingest_str(&xml)
}

pub fn ingest_str(xml: &str) -> Result<Vec<Suite>, IngestError> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut roots: Vec<Suite> = Vec::new();
    let mut open: Vec<Suite> = Vec::new();
    let mut case: Option<TestCase> = None;

    loop {
        match reader.read_event()? {
            Event::Start(e) => match e.name().as_ref() {
                b"testsuite" => open.push(start_suite(&e)?),
                b"testcase" => case = Some(start_case(&e)?),
                other => mark_case(case.as_mut(), other, &e)?,
            },
            Event::Empty(e) => match e.name().as_ref() {
                b"testsuite" => close_suite(&mut roots, &mut open, start_suite(&e)?),
                b"testcase" => push_case(&mut open, start_case(&e)?),
                other => mark_case(case.as_mut(), other, &e)?,
            },
            Event::End(e) => match e.name().as_ref() {
                b"testsuite" => {
                    let suite = open
                        .pop()
                        .ok_or_else(|| IngestError::Unbalanced("testsuite".to_string()))?;
                    close_suite(&mut roots, &mut open, suite);
                }
                b"testcase" => {
                    let finished = case
                        .take()
                        .ok_or_else(|| IngestError::Unbalanced("testcase".to_string()))?;
                    push_case(&mut open, finished);
                }
                _ => {}
            },
            Event::Eof => break,
            _ => {}
        }
    }

    // a truncated report leaves elements open
    if case.is_some() {
        return Err(IngestError::Unbalanced("testcase".to_string()));
    }
    if !open.is_empty() {
        return Err(IngestError::Unbalanced("testsuite".to_string()));
    }
    Ok(roots)
}

fn attr(e: &BytesStart<'_>, key: &[u8]) -> Result<Option<String>, IngestError> {
    for attribute in e.attributes() {
        let attribute = attribute?;
        if attribute.key.as_ref() == key {
            return Ok(Some(attribute.unescape_value()?.into_owned()));
        }
    }
    Ok(None)
}

fn start_suite(e: &BytesStart<'_>) -> Result<Suite, IngestError> {
    Ok(Suite {
        name: attr(e, b"name")?.unwrap_or_default(),
        ..Default::default()
    })
}

fn start_case(e: &BytesStart<'_>) -> Result<TestCase, IngestError> {
    // missing, negative, non-numeric or out-of-range times all read as zero
    let duration = attr(e, b"time")?
        .and_then(|t| t.trim().parse::<f64>().ok())
        .and_then(|s| Duration::try_from_secs_f64(s).ok())
        .unwrap_or_default();
    Ok(TestCase {
        name: attr(e, b"name")?.unwrap_or_default(),
        classname: attr(e, b"classname")?.unwrap_or_default(),
        duration,
        ..Default::default()
    })
}

fn mark_case(case: Option<&mut TestCase>, element: &[u8], e: &BytesStart<'_>) -> Result<(), IngestError> {
    let Some(case) = case else {
        return Ok(());
    };
    let status = match element {
        b"failure" => CaseStatus::Failed,
        b"error" => CaseStatus::Error,
        b"skipped" => CaseStatus::Skipped,
        _ => return Ok(()),
    };
    // a failure outranks a skip marker on the same case
    if case.status == CaseStatus::Passed || status != CaseStatus::Skipped {
        case.status = status;
    }
    if case.message.is_none() {
        case.message = attr(e, b"message")?;
    }
    Ok(())
}

fn push_case(open: &mut [Suite], case: TestCase) {
    // cases outside any suite have nowhere to go
    if let Some(suite) = open.last_mut() {
        suite.tests.push(case);
    }
}

fn close_suite(roots: &mut Vec<Suite>, open: &mut [Suite], suite: Suite) {
    match open.last_mut() {
        Some(parent) => parent.suites.push(suite),
        None => roots.push(suite),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const GINKGO_REPORT: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<testsuites tests="3" disabled="0" errors="0" failures="1" time="1.25">
  <testsuite name="Books Suite" package="/src/books" tests="3" failures="1" time="1.25">
    <properties>
      <property name="SuiteSucceeded" value="false"></property>
    </properties>
    <testcase name="[It] Books can be loaded" classname="Books Suite" status="passed" time="0.5"></testcase>
    <testcase name="[It] Books can be categorized" classname="Books Suite" status="failed" time="0.75">
      <failure message="Expected &lt;int&gt;: 1" type="failed">books_test.go:23</failure>
      <system-err>some output</system-err>
    </testcase>
    <testcase name="[It] Books can be shelved" classname="Books Suite" status="skipped" time="0">
      <skipped message="skipped"></skipped>
    </testcase>
  </testsuite>
</testsuites>"#;

    #[test]
    fn test_ingest_ginkgo_report() {
        let suites = ingest_str(GINKGO_REPORT).unwrap();

        assert_eq!(suites.len(), 1);
        let suite = &suites[0];
        assert_eq!(suite.name, "Books Suite");
        assert_eq!(suite.tests.len(), 3);
        assert_eq!(suite.tests[0].status, CaseStatus::Passed);
        assert_eq!(suite.tests[0].duration, Duration::from_millis(500));
        assert_eq!(suite.tests[1].status, CaseStatus::Failed);
        assert_eq!(suite.tests[1].message.as_deref(), Some("Expected <int>: 1"));
        assert_eq!(suite.tests[2].status, CaseStatus::Skipped);
    }

    #[test]
    fn test_ingest_single_suite_root_with_empty_elements() {
        let xml = r#"<testsuite name="A"><testcase name="t1" time="0.1"/><testcase name="t2"><error/></testcase></testsuite>"#;
        let suites = ingest_str(xml).unwrap();

        assert_eq!(suites[0].tests[0].status, CaseStatus::Passed);
        assert_eq!(suites[0].tests[1].status, CaseStatus::Error);
        assert_eq!(suites[0].tests[1].duration, Duration::ZERO);
    }

    #[test]
    fn test_nested_suites_stay_children() {
        let xml = r#"<testsuites><testsuite name="outer"><testsuite name="inner"><testcase name="deep"/></testsuite><testcase name="top"/></testsuite></testsuites>"#;
        let suites = ingest_str(xml).unwrap();

        assert_eq!(suites.len(), 1);
        assert_eq!(suites[0].tests.len(), 1);
        assert_eq!(suites[0].tests[0].name, "top");
        assert_eq!(suites[0].suites[0].tests[0].name, "deep");
    }

    #[test]
    fn test_unrepresentable_times_read_as_zero() {
        let xml = r#"<testsuite name="A">
            <testcase name="huge" time="1e30"/>
            <testcase name="negative" time="-1"/>
            <testcase name="nan" time="NaN"/>
            <testcase name="text" time="soon"/>
        </testsuite>"#;
        let suites = ingest_str(xml).unwrap();

        assert_eq!(suites[0].tests.len(), 4);
        assert!(suites[0].tests.iter().all(|t| t.duration == Duration::ZERO));
    }

    #[test]
    fn test_truncated_report_is_an_error() {
        assert!(ingest_str(r#"<testsuites><testsuite name="A"><testcase name="t1"/>"#).is_err());
        assert!(ingest_str(r#"<testsuite name="A"><testcase name="t1">"#).is_err());
    }

    #[test]
    fn test_empty_report_has_no_suites() {
        assert!(ingest_str("<testsuites></testsuites>").unwrap().is_empty());
    }

    #[test]
    fn test_malformed_report_is_an_error() {
        assert!(ingest_str("<testsuites><testsuite name=\"x\"></testsuites>").is_err());
    }
}
