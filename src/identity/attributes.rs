//! Attribute shapes returned by CAS verification.
//! Directory-backed CAS deployments return the same attribute either as a bare
//! string or as a list of strings depending on multiplicity, so every accessor
//! goes through the `first_or_self` policy instead of inspecting shapes at call
//! sites.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// A single attribute value: scalar or ordered sequence of strings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum AttributeValue {
    Scalar(String),
    Sequence(Vec<String>),
}

impl AttributeValue {
    /// First element when a sequence, the string itself when scalar.
    /// An empty sequence behaves like an absent attribute.
    pub fn first_or_self(&self) -> Option<&str> {
        match self {
            AttributeValue::Scalar(s) => Some(s.as_str()),
            AttributeValue::Sequence(v) => v.first().map(String::as_str),
        }
    }
}

impl From<&str> for AttributeValue {
    fn from(s: &str) -> Self { AttributeValue::Scalar(s.to_string()) }
}

impl From<Vec<&str>> for AttributeValue {
    fn from(v: Vec<&str>) -> Self {
        AttributeValue::Sequence(v.into_iter().map(str::to_string).collect())
    }
}

/// Attribute set from one ticket verification. Not persisted; cached in the
/// session scope for the lifetime of the authenticated session.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Attributes(pub HashMap<String, AttributeValue>);

impl Attributes {
    pub fn new() -> Self { Self(HashMap::new()) }

    pub fn is_empty(&self) -> bool { self.0.is_empty() }

    pub fn get(&self, name: &str) -> Option<&AttributeValue> { self.0.get(name) }

    pub fn insert(&mut self, name: impl Into<String>, value: AttributeValue) {
        self.0.insert(name.into(), value);
    }

    /// Profile-field accessor: first-or-self of the named attribute, empty
    /// string when absent.
    pub fn profile_field(&self, name: &str) -> String {
        self.0
            .get(name)
            .and_then(AttributeValue::first_or_self)
            .unwrap_or_default()
            .to_string()
    }

    /// Group identifiers from `memberOf`. A sequence passes through unchanged;
    /// a scalar arrives as a bracketed comma-separated list ("[g1, g2]") and is
    /// stripped and split with each element trimmed. None when absent or empty.
    pub fn member_of(&self) -> Option<Vec<String>> {
        let groups = match self.0.get("memberOf")? {
            AttributeValue::Sequence(v) => v.clone(),
            AttributeValue::Scalar(s) => s
                .trim_start_matches('[')
                .trim_end_matches(']')
                .split(',')
                .map(|g| g.trim().to_string())
                .filter(|g| !g.is_empty())
                .collect(),
        };
        if groups.is_empty() { None } else { Some(groups) }
    }
}
