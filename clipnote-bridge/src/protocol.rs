//! Line-delimited JSON wire format.
//!
//! Request:  `{"type": "capture"|"mark"|"get-marks"|"export", "lines"?: [int]}`
//! Response: `{"type": "result"|"error", "data"?: ..., "message"?: string}`

use crate::error::BridgeError;
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const CAPTURE: &str = "capture";
pub const MARK: &str = "mark";
pub const GET_MARKS: &str = "get-marks";
pub const EXPORT: &str = "export";

/// A request exactly as it appears on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawRequest {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lines: Option<Vec<i64>>,
}

impl RawRequest {
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            lines: None,
        }
    }

    pub fn with_lines(mut self, lines: Vec<i64>) -> Self {
        self.lines = Some(lines);
        self
    }
}

/// A validated bridge request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BridgeRequest {
    /// Capture the paired pane's visible area and append it.
    Capture,
    /// Mark the given buffer lines. Indices may be out of range.
    Mark(Vec<i64>),
    /// List marks in creation order.
    GetMarks,
    /// Export marks and copy them to the clipboard.
    Export,
}

impl TryFrom<RawRequest> for BridgeRequest {
    type Error = BridgeError;

    fn try_from(raw: RawRequest) -> Result<Self, Self::Error> {
        match raw.kind.as_str() {
            CAPTURE => Ok(BridgeRequest::Capture),
            MARK => match raw.lines {
                Some(lines) if !lines.is_empty() => Ok(BridgeRequest::Mark(lines)),
                _ => Err(BridgeError::NoLines),
            },
            GET_MARKS => Ok(BridgeRequest::GetMarks),
            EXPORT => Ok(BridgeRequest::Export),
            other => Err(BridgeError::UnknownCommand(other.to_string())),
        }
    }
}

/// Parse one request line.
pub fn parse_request(line: &str) -> Result<BridgeRequest, BridgeError> {
    let raw: RawRequest = serde_json::from_str(line).map_err(|e| {
        log::debug!("malformed bridge request {line:?}: {e}");
        BridgeError::InvalidRequest
    })?;
    BridgeRequest::try_from(raw)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseKind {
    Result,
    Error,
}

/// Exactly one of these is written back per request line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BridgeResponse {
    #[serde(rename = "type")]
    pub kind: ResponseKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl BridgeResponse {
    pub fn result<T: Serialize>(data: &T) -> Self {
        match serde_json::to_value(data) {
            Ok(data) => Self {
                kind: ResponseKind::Result,
                data: Some(data),
                message: None,
            },
            Err(e) => Self::error(e),
        }
    }

    pub fn error(message: impl ToString) -> Self {
        Self {
            kind: ResponseKind::Error,
            data: None,
            message: Some(message.to_string()),
        }
    }

    pub fn is_error(&self) -> bool {
        self.kind == ResponseKind::Error
    }

    /// Serialize as a single newline-terminated line.
    pub fn to_line(&self) -> Result<String, BridgeError> {
        let mut line = serde_json::to_string(self)?;
        line.push('\n');
        Ok(line)
    }
}

/// `capture` result payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaptureSummary {
    pub lines_captured: usize,
    pub total_lines: usize,
}

/// `mark` result payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarkSummary {
    pub marked: usize,
}

/// One element of the `get-marks` result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarkEntry {
    pub line: usize,
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

/// `export` result payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportSummary {
    pub exported: String,
    pub status: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_known_requests() {
        assert_eq!(parse_request(r#"{"type":"capture"}"#).unwrap(), BridgeRequest::Capture);
        assert_eq!(
            parse_request(r#"{"type":"mark","lines":[-1,3,10000]}"#).unwrap(),
            BridgeRequest::Mark(vec![-1, 3, 10000])
        );
        assert_eq!(parse_request(r#"{"type":"get-marks"}"#).unwrap(), BridgeRequest::GetMarks);
        assert_eq!(parse_request(r#"{"type":"export"}"#).unwrap(), BridgeRequest::Export);
    }

    #[test]
    fn test_unknown_type_is_named() {
        let err = parse_request(r#"{"type":"explode"}"#).unwrap_err();
        assert_eq!(err.to_string(), "unknown command: explode");
    }

    #[test]
    fn test_malformed_payloads() {
        for line in ["not json", "{}", r#"{"type":7}"#, r#"{"type":"mark","lines":"1,2"}"#] {
            let err = parse_request(line).unwrap_err();
            assert_eq!(err.to_string(), "invalid request", "line {line:?}");
        }
    }

    #[test]
    fn test_mark_requires_lines() {
        for line in [r#"{"type":"mark"}"#, r#"{"type":"mark","lines":[]}"#] {
            let err = parse_request(line).unwrap_err();
            assert_eq!(err.to_string(), "no lines specified");
        }
    }

    #[test]
    fn test_response_shapes() {
        let ok = BridgeResponse::result(&MarkSummary { marked: 2 });
        assert_eq!(
            serde_json::to_value(&ok).unwrap(),
            json!({"type": "result", "data": {"marked": 2}})
        );

        let err = BridgeResponse::error(BridgeError::NotReady);
        assert!(err.is_error());
        assert_eq!(
            serde_json::to_value(&err).unwrap(),
            json!({"type": "error", "message": "annotation loop not ready"})
        );
    }

    #[test]
    fn test_mark_entry_omits_missing_note() {
        let entries = vec![
            MarkEntry {
                line: 0,
                text: "foo".to_string(),
                note: None,
            },
            MarkEntry {
                line: 4,
                text: "bar".to_string(),
                note: Some("why".to_string()),
            },
        ];
        assert_eq!(
            serde_json::to_value(&entries).unwrap(),
            json!([{"line": 0, "text": "foo"}, {"line": 4, "text": "bar", "note": "why"}])
        );
    }

    #[test]
    fn test_response_line_is_newline_terminated() {
        let line = BridgeResponse::error("boom").to_line().unwrap();
        assert!(line.ends_with('\n'));
        assert_eq!(line.matches('\n').count(), 1);
    }
}
