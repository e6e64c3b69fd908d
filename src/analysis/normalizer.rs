//! Turns a raw backend response into an [`AnalysisResult`].
//!
//! The text payload can sit in several places depending on how the response was
//! produced. A fixed, ordered list of adapters is tried in turn; the first one that
//! applies wins, and the serialized response is used when none does. The text
//! is then parsed strictly as JSON.

use super::{AnalysisError, AnalysisResult};
use serde_json::Value;
use tracing::{debug, error};

/// One way of pulling the text payload out of a response.
pub trait ResponseAdapter: Send + Sync {
    fn name(&self) -> &'static str;

    /// `None` when the response does not have this shape.
    fn extract(&self, response: &Value) -> Option<String>;
}

/// `candidates[0].content.parts[*].text`, concatenated.
pub struct CandidateText;

impl ResponseAdapter for CandidateText {
    fn name(&self) -> &'static str {
        "candidate_text"
    }

    fn extract(&self, response: &Value) -> Option<String> {
        let parts = response
            .get("candidates")?
            .as_array()?
            .first()?
            .get("content")?
            .get("parts")?
            .as_array()?;

        let texts: Vec<&str> = parts
            .iter()
            .filter_map(|part| part.get("text").and_then(Value::as_str))
            .collect();

        if texts.is_empty() {
            None
        } else {
            Some(texts.concat())
        }
    }
}

/// A top-level `text` string.
pub struct TextField;

impl ResponseAdapter for TextField {
    fn name(&self) -> &'static str {
        "text_field"
    }

    fn extract(&self, response: &Value) -> Option<String> {
        response.get("text")?.as_str().map(str::to_string)
    }
}

/// The response is itself a string.
pub struct PlainString;

impl ResponseAdapter for PlainString {
    fn name(&self) -> &'static str {
        "plain_string"
    }

    fn extract(&self, response: &Value) -> Option<String> {
        response.as_str().map(str::to_string)
    }
}

/// A top-level `output` list, one line per item.
pub struct OutputList;

impl ResponseAdapter for OutputList {
    fn name(&self) -> &'static str {
        "output_list"
    }

    fn extract(&self, response: &Value) -> Option<String> {
        let items = response.get("output")?.as_array()?;

        let lines: Vec<String> = items
            .iter()
            .map(|item| {
                let non_empty = |key: &str| {
                    item.get(key)
                        .and_then(Value::as_str)
                        .filter(|s| !s.is_empty())
                        .map(str::to_string)
                };
                non_empty("content")
                    .or_else(|| non_empty("text"))
                    .unwrap_or_else(|| item.to_string())
            })
            .collect();

        Some(lines.join("\n"))
    }
}

pub struct ResponseNormalizer {
    adapters: Vec<Box<dyn ResponseAdapter>>,
}

impl Default for ResponseNormalizer {
    fn default() -> Self {
        Self::new(vec![
            Box::new(CandidateText),
            Box::new(TextField),
            Box::new(PlainString),
            Box::new(OutputList),
        ])
    }
}

impl ResponseNormalizer {
    pub fn new(adapters: Vec<Box<dyn ResponseAdapter>>) -> Self {
        Self { adapters }
    }

    /// Text payload of the response, from the first adapter that applies.
    pub fn extract_text(&self, response: &Value) -> String {
        for adapter in &self.adapters {
            if let Some(text) = adapter.extract(response) {
                debug!("Extracted response text via {}", adapter.name());
                return text;
            }
        }
        debug!("No response adapter applied, using serialized response");
        response.to_string()
    }

    pub fn normalize(&self, response: &Value) -> Result<AnalysisResult, AnalysisError> {
        let text = self.extract_text(response);
        parse_analysis(text)
    }
}

/// Strict parse of the model's text into an [`AnalysisResult`].
///
/// The raw text travels with every error unmodified.
pub fn parse_analysis(text: String) -> Result<AnalysisResult, AnalysisError> {
    let value: Value = match serde_json::from_str(&text) {
        Ok(value) => value,
        Err(source) => {
            error!("Invalid JSON from model. Raw response: {}", text);
            return Err(AnalysisError::InvalidJson { raw: text, source });
        }
    };

    let analysis: AnalysisResult = match serde_json::from_value(value) {
        Ok(analysis) => analysis,
        Err(e) => {
            error!("Model JSON is not a valid analysis ({}). Raw response: {}", e, text);
            return Err(AnalysisError::InvalidAnalysis {
                raw: text,
                reason: e.to_string(),
            });
        }
    };

    if analysis.topic.trim().is_empty() {
        error!("Model returned an empty topic. Raw response: {}", text);
        return Err(AnalysisError::InvalidAnalysis {
            raw: text,
            reason: "empty topic".to_string(),
        });
    }

    Ok(analysis)
}
