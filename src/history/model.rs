use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::history::description::decode_description;

/// A wire attribute that is kept verbatim when it does not have the expected
/// shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Lenient<T> {
    Typed(T),
    Other(Value),
}

impl<T> Lenient<T> {
    pub fn typed(&self) -> Option<&T> {
        match self {
            Self::Typed(value) => Some(value),
            Self::Other(_) => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Author {
    pub id: Option<String>,
    pub name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MentionedUser {
    #[serde(rename = "__typename")]
    pub typename: Option<String>,
    pub id: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub user_name: Option<String>,
    pub enabled: Option<bool>,
}

/// Activity node as returned by the endpoint, `description` still encoded.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawActivityNode {
    pub id: Option<Lenient<String>>,
    pub author: Option<Lenient<Author>>,
    pub description: Option<Value>,
    pub timestamp: Option<Lenient<i64>>,
    pub call_id: Option<Lenient<String>>,
    pub cause: Option<Value>,
    pub activity_type: Option<Lenient<String>>,
    pub mentioned_users: Option<Lenient<Vec<MentionedUser>>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct RawActivityEdge {
    pub node: Option<RawActivityNode>,
}

impl RawActivityEdge {
    /// Decode one element of the `edges` array. A node that is not an object
    /// is treated as missing.
    pub fn from_wire(value: &Value) -> Self {
        let node = value
            .get("node")
            .filter(|node| node.is_object())
            .and_then(|node| serde_json::from_value(node.clone()).ok());
        Self { node }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityNode {
    pub id: Option<Lenient<String>>,
    pub author: Option<Lenient<Author>>,
    pub description: Value,
    pub timestamp: Option<Lenient<i64>>,
    pub call_id: Option<Lenient<String>>,
    pub cause: Option<Value>,
    pub activity_type: Option<Lenient<String>>,
    pub mentioned_users: Option<Lenient<Vec<MentionedUser>>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityEdge {
    pub node: Option<ActivityNode>,
}

impl From<RawActivityNode> for ActivityNode {
    fn from(raw: RawActivityNode) -> Self {
        Self {
            id: raw.id,
            author: raw.author,
            description: decode_description(raw.description.unwrap_or(Value::Null)),
            timestamp: raw.timestamp,
            call_id: raw.call_id,
            cause: raw.cause,
            activity_type: raw.activity_type,
            mentioned_users: raw.mentioned_users,
            extra: raw.extra,
        }
    }
}

impl From<RawActivityEdge> for ActivityEdge {
    fn from(raw: RawActivityEdge) -> Self {
        Self {
            node: raw.node.map(ActivityNode::from),
        }
    }
}

fn typed_str(value: &Option<Lenient<String>>) -> Option<&str> {
    value.as_ref().and_then(Lenient::typed).map(String::as_str)
}

impl ActivityNode {
    /// The `field` entry of an object description.
    pub fn description_field(&self) -> Option<&str> {
        self.description
            .as_object()
            .and_then(|obj| obj.get("field"))
            .and_then(Value::as_str)
    }

    pub fn id(&self) -> Option<&str> {
        typed_str(&self.id)
    }

    pub fn activity_type(&self) -> Option<&str> {
        typed_str(&self.activity_type)
    }

    pub fn author_name(&self) -> Option<&str> {
        self.author
            .as_ref()
            .and_then(Lenient::typed)
            .and_then(|a| a.name.as_deref())
    }

    /// Epoch milliseconds; integral floats are accepted.
    pub fn timestamp_millis(&self) -> Option<i64> {
        match self.timestamp.as_ref()? {
            Lenient::Typed(ms) => Some(*ms),
            Lenient::Other(value) => value
                .as_f64()
                .filter(|ms| ms.is_finite() && ms.fract() == 0.0)
                .filter(|ms| *ms >= i64::MIN as f64 && *ms <= i64::MAX as f64)
                .map(|ms| ms as i64),
        }
    }
}
