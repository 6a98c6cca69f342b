//! Rule condition evaluation against a JSON view of a spec.

use serde::de::Deserializer;
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use std::collections::BTreeMap;

const CONTAINS_OP: &str = "$contains";

/// A single rule condition on a dotted path.
///
/// On the wire a literal (`true`, `"crm"`) means equality and
/// `{"$contains": v}` means array membership.
#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    Equals(Value),
    Contains(Value),
}

impl Condition {
    /// Evaluate against the resolved value; a missing value never matches.
    pub fn holds(&self, resolved: Option<&Value>) -> bool {
        let Some(actual) = resolved else {
            return false;
        };
        match self {
            Self::Equals(expected) => actual == expected,
            Self::Contains(needle) => actual
                .as_array()
                .is_some_and(|items| items.contains(needle)),
        }
    }
}

impl<'de> Deserialize<'de> for Condition {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        if let Value::Object(map) = &value {
            if map.len() == 1 {
                if let Some(needle) = map.get(CONTAINS_OP) {
                    return Ok(Self::Contains(needle.clone()));
                }
            }
        }
        Ok(Self::Equals(value))
    }
}

impl Serialize for Condition {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Equals(value) => value.serialize(serializer),
            Self::Contains(needle) => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry(CONTAINS_OP, needle)?;
                map.end()
            }
        }
    }
}

/// Walk a dotted path (`security.sso`) through nested JSON objects.
///
/// Returns `None` if any segment is absent or the value is `null`.
pub fn resolve_path<'a>(root: &'a Value, path: &str) -> Option<&'a Value> {
    let mut current = root;
    for segment in path.split('.') {
        current = current.as_object()?.get(segment)?;
    }
    (!current.is_null()).then_some(current)
}

/// All conditions must hold (logical AND). An empty map never matches.
pub fn matches_rule(original: &Value, when: &BTreeMap<String, Condition>) -> bool {
    !when.is_empty()
        && when
            .iter()
            .all(|(path, condition)| condition.holds(resolve_path(original, path)))
}
