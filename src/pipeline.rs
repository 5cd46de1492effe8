//! Ordered, fail-fast operation pipelines
//!
//! A [`Pipeline`] is an ordered list of [`Operation`]s. Running it threads one
//! [`Document`] through every operation left to right; the first failure ends
//! the run and the partially edited document is dropped. A pipeline holds no
//! state between runs, so the same instance can be applied to any number of
//! documents with different environments.

use log::debug;
use serde::{Deserialize, Serialize};

use crate::document::Document;
use crate::encoding::Encoding;
use crate::env::EnvVars;
use crate::error::Result;
use crate::logging::LogSink;
use crate::operations::Operation;

/// An ordered list of document operations.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Pipeline {
    operations: Vec<Operation>,
}

impl Pipeline {
    pub fn new(operations: Vec<Operation>) -> Self {
        Self { operations }
    }

    pub fn operations(&self) -> &[Operation] {
        &self.operations
    }

    pub fn len(&self) -> usize {
        self.operations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    /// Run every operation over `doc`, stopping at the first failure.
    ///
    /// An empty pipeline returns `doc` unchanged.
    pub fn run(&self, doc: Document, env: &EnvVars, log: &mut dyn LogSink) -> Result<Document> {
        self.operations
            .iter()
            .enumerate()
            .try_fold(doc, |doc, (index, operation)| {
                debug!("operation {}/{}: {}", index + 1, self.len(), operation);
                operation.perform(doc, env, log)
            })
    }

    /// Parse `bytes`, run the pipeline and serialize the result.
    pub fn transform(
        &self,
        bytes: &[u8],
        encoding: Encoding,
        indent: bool,
        env: &EnvVars,
        log: &mut dyn LogSink,
    ) -> Result<Vec<u8>> {
        let doc = Document::from_bytes(bytes, encoding)?;
        let doc = self.run(doc, env, log)?;
        doc.to_bytes(encoding, indent)
    }
}

impl From<Vec<Operation>> for Pipeline {
    fn from(operations: Vec<Operation>) -> Self {
        Self::new(operations)
    }
}

impl FromIterator<Operation> for Pipeline {
    fn from_iter<I: IntoIterator<Item = Operation>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    const XML: &str = "<project><disabled>false</disabled><desc>from alpha</desc></project>";

    fn env() -> EnvVars {
        [("NAME", "beta")].into_iter().collect()
    }

    #[test]
    fn test_empty_pipeline_is_noop() {
        let pipeline = Pipeline::default();
        let mut log: Vec<String> = Vec::new();
        let doc = pipeline
            .run(Document::parse(XML).unwrap(), &env(), &mut log)
            .unwrap();
        assert_eq!(
            doc.to_xml_string(false).unwrap(),
            Document::parse(XML).unwrap().to_xml_string(false).unwrap()
        );
        assert!(log.is_empty());
    }

    #[test]
    fn test_operations_run_in_order() {
        let pipeline: Pipeline = vec![
            Operation::replace("alpha", false, "${NAME}", true),
            Operation::replace("beta", false, "gamma", false),
            Operation::disable(),
        ]
        .into();
        let doc = pipeline
            .run(Document::parse(XML).unwrap(), &env(), &mut Vec::new())
            .unwrap();
        assert_eq!(doc.text_values(), vec!["true", "from gamma"]);
    }

    #[test]
    fn test_first_failure_stops_pipeline() {
        let pipeline: Pipeline = vec![
            Operation::replace("alpha", false, "beta", false),
            Operation::replace("", false, "x", false),
            Operation::disable(),
        ]
        .into();
        let mut log: Vec<String> = Vec::new();
        let result = pipeline.run(Document::parse(XML).unwrap(), &env(), &mut log);
        assert!(matches!(result, Err(Error::EmptyPattern { .. })));
        // Only the first operation reported progress.
        assert_eq!(log.len(), 1);
        assert!(!log.iter().any(|line| line.contains("disabled")));
    }

    #[test]
    fn test_pipeline_is_reusable_across_environments() {
        let pipeline: Pipeline =
            std::iter::once(Operation::replace("alpha", false, "${NAME}", true)).collect();
        let first = pipeline
            .run(Document::parse(XML).unwrap(), &env(), &mut Vec::new())
            .unwrap();
        let other: EnvVars = [("NAME", "delta")].into_iter().collect();
        let second = pipeline
            .run(Document::parse(XML).unwrap(), &other, &mut Vec::new())
            .unwrap();
        assert_eq!(first.text_values()[1], "from beta");
        assert_eq!(second.text_values()[1], "from delta");
    }

    #[test]
    fn test_transform_round_trip_bytes() {
        let pipeline: Pipeline = vec![Operation::replace("alpha", false, "omega", false)].into();
        let out = pipeline
            .transform(XML.as_bytes(), Encoding::Utf8, false, &env(), &mut Vec::new())
            .unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.starts_with("<?xml"));
        assert!(text.contains("<desc>from omega</desc>"));
    }

    #[test]
    fn test_transform_rejects_malformed_document() {
        let pipeline = Pipeline::default();
        let result = pipeline.transform(b"<open>", Encoding::Utf8, true, &env(), &mut Vec::new());
        assert!(matches!(result, Err(Error::XmlParse { .. })));
    }

    #[test]
    fn test_deserialize_transparent_list() {
        let pipeline: Pipeline = serde_yaml::from_str("- disable: {}\n").unwrap();
        assert_eq!(pipeline.len(), 1);
        let empty: Pipeline = serde_yaml::from_str("[]").unwrap();
        assert!(empty.is_empty());
    }
}
