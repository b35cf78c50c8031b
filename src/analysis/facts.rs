//! Fact structures extracted from a syntax tree.

use std::fmt;

use serde::ser::SerializeStruct;
use serde::{Deserialize, Serialize};

/// One call site, classified by the shape of its callee.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CallSite {
    /// `callee(...)`
    Name { callee: String },
    /// `object.attribute(...)`; `object` is the receiver as written.
    Attribute { object: String, attribute: String },
}

impl fmt::Display for CallSite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CallSite::Name { callee } => write!(f, "{}", callee),
            CallSite::Attribute { object, attribute } => write!(f, "{}.{}", object, attribute),
        }
    }
}

/// A class and the functions declared directly in its body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassFacts {
    pub name: String,
    pub methods: Vec<String>,
}

/// A simple `name = value` binding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Binding {
    pub name: String,
    pub value: String,
}

/// Structural summary of one source unit.
///
/// Serializes with two derived lists next to the stored fields:
/// `function_calls` and `attributes`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct FactSet {
    /// Import statements in appearance order, duplicates kept.
    pub imports: Vec<String>,
    pub calls: Vec<CallSite>,
    /// Classes in appearance order; nested classes included.
    pub classes: Vec<ClassFacts>,
    pub variables: Vec<Binding>,
}

impl FactSet {
    /// Methods of the first class with this name.
    pub fn methods_of(&self, class: &str) -> Option<&[String]> {
        self.classes
            .iter()
            .find(|c| c.name == class)
            .map(|c| c.methods.as_slice())
    }

    /// Names of bare-identifier callees.
    pub fn function_calls(&self) -> Vec<&str> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                CallSite::Name { callee } => Some(callee.as_str()),
                CallSite::Attribute { .. } => None,
            })
            .collect()
    }

    /// `object.attribute` strings for member-access callees.
    pub fn attribute_calls(&self) -> Vec<String> {
        self.calls
            .iter()
            .filter(|c| matches!(c, CallSite::Attribute { .. }))
            .map(|c| c.to_string())
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.imports.is_empty()
            && self.calls.is_empty()
            && self.classes.is_empty()
            && self.variables.is_empty()
    }
}

impl Serialize for FactSet {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let mut state = serializer.serialize_struct("FactSet", 6)?;
        state.serialize_field("imports", &self.imports)?;
        state.serialize_field("calls", &self.calls)?;
        state.serialize_field("classes", &self.classes)?;
        state.serialize_field("variables", &self.variables)?;
        state.serialize_field("function_calls", &self.function_calls())?;
        state.serialize_field("attributes", &self.attribute_calls())?;
        state.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> FactSet {
        FactSet {
            imports: vec!["import os".to_string()],
            calls: vec![
                CallSite::Name {
                    callee: "print".to_string(),
                },
                CallSite::Attribute {
                    object: "os.path".to_string(),
                    attribute: "join".to_string(),
                },
            ],
            classes: vec![ClassFacts {
                name: "Config".to_string(),
                methods: vec!["__init__".to_string(), "load".to_string()],
            }],
            variables: vec![Binding {
                name: "x".to_string(),
                value: "1".to_string(),
            }],
        }
    }

    #[test]
    fn test_call_site_display() {
        let facts = sample();
        assert_eq!(facts.calls[0].to_string(), "print");
        assert_eq!(facts.calls[1].to_string(), "os.path.join");
    }

    #[test]
    fn test_derived_call_views() {
        let facts = sample();
        assert_eq!(facts.function_calls(), vec!["print"]);
        assert_eq!(facts.attribute_calls(), vec!["os.path.join".to_string()]);
    }

    #[test]
    fn test_json_includes_derived_call_lists() {
        let json = serde_json::to_value(sample()).unwrap();
        assert_eq!(json["function_calls"], serde_json::json!(["print"]));
        assert_eq!(json["attributes"], serde_json::json!(["os.path.join"]));
        assert_eq!(json["calls"][1]["kind"], "attribute");

        let back: FactSet = serde_json::from_value(json).unwrap();
        assert_eq!(back, sample());
    }

    #[test]
    fn test_methods_of() {
        let facts = sample();
        assert_eq!(
            facts.methods_of("Config"),
            Some(&["__init__".to_string(), "load".to_string()][..])
        );
        assert_eq!(facts.methods_of("Missing"), None);
        assert!(!facts.is_empty());
        assert!(FactSet::default().is_empty());
    }

    #[test]
    fn test_call_site_serialization() {
        let json = serde_json::to_value(&sample().calls[1]).unwrap();
        assert_eq!(json["kind"], "attribute");
        assert_eq!(json["object"], "os.path");
        assert_eq!(json["attribute"], "join");
    }
}
