//! The verdict returned by `/api/analyze`.
//!
//! Every field is defaulted so a model reply that omits (or nulls) a field still
//! deserializes. A field of the wrong type is treated the same way, and list
//! items of the wrong type are skipped, so one odd field does not cost the
//! whole verdict. The serialized form always carries the five primary fields;
//! `error` only appears on degraded results.

use serde::de::{DeserializeOwned, Error as _};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    /// Overall match, nominally 0 – 100. Passed through unclamped.
    #[serde(default, deserialize_with = "deserialize_score")]
    pub score: i64,
    #[serde(default, deserialize_with = "lenient")]
    pub summary: String,
    #[serde(default, deserialize_with = "lenient_list")]
    pub strengths: Vec<String>,
    #[serde(default, deserialize_with = "lenient_list")]
    pub gaps: Vec<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub extracted_info: ExtractedInfo,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Candidate details pulled out of the resume by the model.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExtractedInfo {
    #[serde(default, deserialize_with = "lenient")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient")]
    pub email: String,
    #[serde(default, deserialize_with = "lenient_list")]
    pub experience: Vec<Experience>,
    #[serde(default, deserialize_with = "lenient_list")]
    pub education: Vec<Education>,
    #[serde(default, deserialize_with = "lenient_list")]
    pub skills: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Experience {
    #[serde(default, deserialize_with = "lenient")]
    pub company: String,
    #[serde(default, deserialize_with = "lenient")]
    pub title: String,
    #[serde(default, deserialize_with = "lenient")]
    pub duration: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Education {
    #[serde(default, deserialize_with = "lenient")]
    pub institution: String,
    #[serde(default, deserialize_with = "lenient")]
    pub degree: String,
    #[serde(default, deserialize_with = "lenient")]
    pub field: String,
}

impl AnalysisResult {
    /// A zero-score result carrying `error`, used whenever the model could not
    /// produce a usable verdict.
    pub fn degraded(error: impl Into<String>, summary: impl Into<String>) -> Self {
        Self {
            summary: summary.into(),
            error: Some(error.into()),
            ..Self::default()
        }
    }

    pub fn is_degraded(&self) -> bool {
        self.error.is_some()
    }
}

/// Null or a value of the wrong type becomes `T::default()`.
fn lenient<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let value = Value::deserialize(deserializer)?;
    Ok(T::deserialize(value).unwrap_or_default())
}

/// Anything but an array is empty; items that do not fit `T` are dropped.
fn lenient_list<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Array(items) => items
            .into_iter()
            .filter_map(|item| T::deserialize(item).ok())
            .collect(),
        _ => Vec::new(),
    })
}

/// Models are told to emit an integer but regularly send `82.5` or `"82"`.
fn deserialize_score<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawScore {
        Int(i64),
        Float(f64),
        Text(String),
    }

    match Option::<RawScore>::deserialize(deserializer)? {
        None => Ok(0),
        Some(RawScore::Int(n)) => Ok(n),
        Some(RawScore::Float(f)) => Ok(f.round() as i64),
        Some(RawScore::Text(s)) => s
            .trim()
            .trim_end_matches('%')
            .trim()
            .parse::<f64>()
            .map(|f| f.round() as i64)
            .map_err(|_| D::Error::custom(format!("score is not a number: {s:?}"))),
    }
}
