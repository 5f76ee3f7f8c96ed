use std::fmt;
use std::io::Read;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::de::IgnoredAny;
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::Result;

/// Semantic kind of a workflow step. Anything the upstream generator emits
/// beyond the four known kinds is treated as a process step.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum NodeKind {
    Start,
    End,
    Decision,
    #[default]
    Process,
}

impl NodeKind {
    pub const ALL: [NodeKind; 4] = [
        NodeKind::Start,
        NodeKind::End,
        NodeKind::Decision,
        NodeKind::Process,
    ];

    pub fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "start" => NodeKind::Start,
            "end" => NodeKind::End,
            "decision" => NodeKind::Decision,
            _ => NodeKind::Process,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            NodeKind::Start => "start",
            NodeKind::End => "end",
            NodeKind::Decision => "decision",
            NodeKind::Process => "process",
        }
    }
}

impl From<String> for NodeKind {
    fn from(value: String) -> Self {
        NodeKind::parse(&value)
    }
}

impl From<NodeKind> for String {
    fn from(value: NodeKind) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A workflow step. `type_name` keeps the type string exactly as it arrived;
/// `kind` is what that string means for shape and color.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(from = "WireNode")]
pub struct WorkflowNode {
    pub id: String,
    #[serde(skip)]
    pub kind: NodeKind,
    #[serde(rename = "type")]
    pub type_name: String,
    pub label: String,
    pub connections: Vec<String>,
}

#[derive(Deserialize)]
struct WireNode {
    id: String,
    #[serde(rename = "type", default)]
    type_name: String,
    #[serde(default)]
    label: String,
    #[serde(default)]
    connections: Vec<String>,
}

impl From<WireNode> for WorkflowNode {
    fn from(wire: WireNode) -> Self {
        Self {
            id: wire.id,
            kind: NodeKind::parse(&wire.type_name),
            type_name: wire.type_name,
            label: wire.label,
            connections: wire.connections,
        }
    }
}

impl WorkflowNode {
    pub fn new(id: impl Into<String>, kind: NodeKind, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind,
            type_name: kind.as_str().to_string(),
            label: label.into(),
            connections: Vec::new(),
        }
    }

    /// Upper-cased type name shown in the node's badge. Unknown types keep
    /// their own name even though they are styled as process steps.
    pub fn badge_text(&self) -> String {
        match self.type_name.trim() {
            "" => self.kind.as_str().to_uppercase(),
            name => name.to_uppercase(),
        }
    }

    pub fn connect(mut self, target: impl Into<String>) -> Self {
        self.connections.push(target.into());
        self
    }
}

/// A workflow as produced by the document analysis backend.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Workflow {
    pub workflow_type: String,
    #[serde(default)]
    pub workflow_nodes: Vec<WorkflowNode>,
    #[serde(default, deserialize_with = "deserialize_timestamp")]
    pub timestamp: Option<DateTime<Utc>>,
    #[serde(default)]
    pub document_length: u64,
}

impl Workflow {
    pub fn new(workflow_type: impl Into<String>, workflow_nodes: Vec<WorkflowNode>) -> Self {
        Self {
            workflow_type: workflow_type.into(),
            workflow_nodes,
            timestamp: None,
            document_length: 0,
        }
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        Ok(serde_json::from_reader(reader)?)
    }

    /// Category with underscores spelled as spaces, e.g. `user journey`.
    pub fn display_type(&self) -> String {
        self.workflow_type.replace('_', " ")
    }

    /// Heading painted at the top of the diagram.
    pub fn title(&self) -> String {
        format!("{} WORKFLOW", self.display_type().to_uppercase())
    }

    pub fn is_empty(&self) -> bool {
        self.workflow_nodes.is_empty()
    }

    pub fn summary_lines(&self) -> Vec<String> {
        let generated = self
            .timestamp
            .map(|ts| ts.format("%Y-%m-%d %H:%M:%S UTC").to_string())
            .unwrap_or_else(|| "unknown".to_string());
        vec![
            format!("Workflow: {}", self.display_type()),
            format!("Nodes: {}", self.workflow_nodes.len()),
            format!("Generated: {generated}"),
        ]
    }
}

/// Parse an RFC 3339 timestamp, a naive ISO-8601 date-time taken as UTC, or a
/// bare date taken as midnight UTC.
pub fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(value) {
        return Some(parsed.with_timezone(&Utc));
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(value, "%Y-%m-%d")
                .ok()
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })
        .map(|naive| naive.and_utc())
}

/// Epoch milliseconds, fractions allowed.
pub fn timestamp_from_millis(millis: f64) -> Option<DateTime<Utc>> {
    if !millis.is_finite() {
        return None;
    }
    let micros = (millis * 1000.0).round();
    if micros < i64::MIN as f64 || micros > i64::MAX as f64 {
        return None;
    }
    DateTime::from_timestamp_micros(micros as i64)
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawTimestamp {
    EpochMillis(i64),
    FractionalMillis(f64),
    Text(String),
    Other(IgnoredAny),
}

/// The timestamp is informational, so a value that cannot be read becomes
/// `None` instead of failing the whole workflow.
fn deserialize_timestamp<'de, D>(deserializer: D) -> std::result::Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let parsed = match Option::<RawTimestamp>::deserialize(deserializer)? {
        None => return Ok(None),
        Some(RawTimestamp::EpochMillis(millis)) => DateTime::from_timestamp_millis(millis),
        Some(RawTimestamp::FractionalMillis(millis)) => timestamp_from_millis(millis),
        Some(RawTimestamp::Text(text)) => {
            let parsed = parse_timestamp(&text);
            if parsed.is_none() {
                tracing::debug!(timestamp = %text, "ignoring unrecognized workflow timestamp");
            }
            return Ok(parsed);
        }
        Some(RawTimestamp::Other(_)) => None,
    };
    if parsed.is_none() {
        tracing::debug!("ignoring unusable workflow timestamp");
    }
    Ok(parsed)
}
