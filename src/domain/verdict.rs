use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::{Map, Value};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Verdict {
    Real,
    Fake,
    Uncertain,
    /// Any label the model invents is kept verbatim.
    Other(String),
}

impl Verdict {
    pub fn as_str(&self) -> &str {
        match self {
            Verdict::Real => "Real",
            Verdict::Fake => "Fake",
            Verdict::Uncertain => "Uncertain",
            Verdict::Other(label) => label,
        }
    }
}

impl From<&str> for Verdict {
    fn from(raw: &str) -> Self {
        match raw {
            "Real" => Verdict::Real,
            "Fake" => Verdict::Fake,
            "Uncertain" => Verdict::Uncertain,
            other => Verdict::Other(other.to_string()),
        }
    }
}

impl From<String> for Verdict {
    fn from(raw: String) -> Self {
        Verdict::from(raw.as_str())
    }
}

impl From<Verdict> for String {
    fn from(verdict: Verdict) -> Self {
        verdict.as_str().to_string()
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Confidence as reported upstream: a numeric score, or whatever placeholder
/// the model put there instead.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Confidence {
    Score(f64),
    Raw(String),
}

impl Confidence {
    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Null => None,
            Value::Number(n) => n.as_f64().map(Confidence::Score),
            Value::Bool(b) => Some(Confidence::Score(if *b { 1.0 } else { 0.0 })),
            Value::String(s) => Some(Confidence::Raw(s.clone())),
            other => Some(Confidence::Raw(other.to_string())),
        }
    }

    /// Whole-percent label: scores are scaled and truncated, raw values pass through.
    pub fn percent_label(&self) -> String {
        match self {
            Confidence::Score(score) => format!("{}", (score * 100.0).trunc() as i64),
            Confidence::Raw(raw) => raw.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceLink {
    pub title: String,
    pub link: String,
}

/// Normalized verdict parsed out of a model response.
///
/// Every field is optional because the upstream object is untrusted; display
/// defaults are applied by the formatter, never stored here.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct VerdictRecord {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub verdict: Option<Verdict>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confidence: Option<Confidence>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(serialize_with = "serialize_sources")]
    pub sources: Vec<SourceLink>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub input: Option<String>,
    #[serde(skip)]
    empty: bool,
}

impl VerdictRecord {
    /// Builds a record from a parsed JSON value without touching source links.
    /// Anything other than an object yields `None`.
    pub fn from_value(value: &Value) -> Option<Self> {
        let object = value.as_object()?;
        Some(Self {
            verdict: field_text(object, "verdict").map(Verdict::from),
            confidence: object.get("confidence").and_then(Confidence::from_value),
            reason: field_text(object, "reason"),
            sources: object
                .get("sources")
                .and_then(Value::as_object)
                .map(collect_sources)
                .unwrap_or_default(),
            input: field_text(object, "input"),
            empty: object.is_empty(),
        })
    }

    /// True when the upstream object had no keys at all. Unknown keys still
    /// count; such a record renders with the display defaults.
    pub fn is_empty(&self) -> bool {
        self.empty
    }

    pub fn source(&self, title: &str) -> Option<&str> {
        self.sources
            .iter()
            .find(|source| source.title == title)
            .map(|source| source.link.as_str())
    }
}

fn field_text(object: &Map<String, Value>, key: &str) -> Option<String> {
    match object.get(key)? {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

fn collect_sources(sources: &Map<String, Value>) -> Vec<SourceLink> {
    sources
        .iter()
        .map(|(title, link)| SourceLink {
            title: title.clone(),
            link: match link {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            },
        })
        .collect()
}

fn serialize_sources<S: Serializer>(sources: &[SourceLink], serializer: S) -> Result<S::Ok, S::Error> {
    let mut map = serializer.serialize_map(Some(sources.len()))?;
    for source in sources {
        map.serialize_entry(&source.title, &source.link)?;
    }
    map.end()
}
