use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;
use uuid::Uuid;

use super::class::ClassName;

/// Attribute names owned by the model itself. They are written by the
/// console, never by `update`.
pub const RESERVED_ATTRIBUTES: [&str; 4] = ["id", "created_at", "updated_at", "__class__"];

/// A stored data-model object.
///
/// All classes share this shape. The persisted form is a flat JSON object:
/// the class goes under `__class__`, and user-set attributes sit next to the
/// identifier and timestamps rather than in a nested map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Instance {
    #[serde(rename = "__class__")]
    pub class: ClassName,
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Free-form attributes set through `update`.
    #[serde(flatten)]
    pub attributes: BTreeMap<String, Value>,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AttributeError {
    #[error("attribute `{0}` is reserved")]
    Reserved(String),

    #[error("attribute `{0}` must be a scalar value")]
    NotScalar(String),
}

impl Instance {
    /// Create a fresh instance with a random id and both timestamps set to now.
    pub fn new(class: ClassName) -> Self {
        let now = Utc::now();
        Self {
            class,
            id: Uuid::new_v4(),
            created_at: now,
            updated_at: now,
            attributes: BTreeMap::new(),
        }
    }

    /// The storage key for a class/id pair: `"<ClassName>.<id>"`.
    ///
    /// Takes the id as a string so lookups with arbitrary user input never
    /// need to parse it first.
    pub fn key_for(class: ClassName, id: &str) -> String {
        format!("{}.{}", class, id)
    }

    pub fn key(&self) -> String {
        Self::key_for(self.class, &self.id.to_string())
    }

    /// Mark the instance as modified.
    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    pub fn is_reserved(name: &str) -> bool {
        RESERVED_ATTRIBUTES.contains(&name)
    }

    /// Check that `name` may be set to `value`: the name is not reserved and
    /// the value is a string, number, boolean or null.
    pub fn check_attribute(name: &str, value: &Value) -> Result<(), AttributeError> {
        if Self::is_reserved(name) {
            return Err(AttributeError::Reserved(name.to_string()));
        }
        if value.is_array() || value.is_object() {
            return Err(AttributeError::NotScalar(name.to_string()));
        }
        Ok(())
    }

    /// Set a free-form attribute. Does not touch `updated_at`; callers decide
    /// when a batch of changes counts as one modification.
    pub fn set_attribute(
        &mut self,
        name: impl Into<String>,
        value: Value,
    ) -> Result<(), AttributeError> {
        let name = name.into();
        Self::check_attribute(&name, &value)?;
        self.attributes.insert(name, value);
        Ok(())
    }

    /// The attribute dictionary shown by `show` and `all`.
    pub fn to_dict(&self) -> Map<String, Value> {
        let mut dict: Map<String, Value> = self
            .attributes
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        dict.insert("id".into(), Value::String(self.id.to_string()));
        dict.insert(
            "created_at".into(),
            Value::String(self.created_at.to_rfc3339_opts(SecondsFormat::Micros, true)),
        );
        dict.insert(
            "updated_at".into(),
            Value::String(self.updated_at.to_rfc3339_opts(SecondsFormat::Micros, true)),
        );
        dict
    }
}

impl fmt::Display for Instance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] ({}) {}",
            self.class,
            self.id,
            Value::Object(self.to_dict())
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_display_includes_class_id_and_attributes() {
        let mut instance = Instance::new(ClassName::User);
        instance.set_attribute("email", json!("ada@example.com")).unwrap();

        let rendered = instance.to_string();
        assert!(rendered.starts_with(&format!("[User] ({}) {{", instance.id)));
        assert!(rendered.contains("\"email\":\"ada@example.com\""));
        assert!(rendered.contains(&format!("\"id\":\"{}\"", instance.id)));
    }

    #[test]
    fn test_persisted_form_is_flat() {
        let mut instance = Instance::new(ClassName::Place);
        instance.set_attribute("rooms", json!(3)).unwrap();

        let value = serde_json::to_value(&instance).unwrap();
        assert_eq!(value["__class__"], "Place");
        assert_eq!(value["rooms"], 3);

        let back: Instance = serde_json::from_value(value).unwrap();
        assert_eq!(back, instance);
    }

    #[test]
    fn test_reserved_attributes_are_rejected() {
        let mut instance = Instance::new(ClassName::BaseModel);
        let err = instance.set_attribute("id", json!("nope")).unwrap_err();
        assert_eq!(err, AttributeError::Reserved("id".to_string()));
        assert!(instance.attributes.is_empty());
    }

    #[test]
    fn test_nested_values_are_rejected() {
        let mut instance = Instance::new(ClassName::User);
        assert_eq!(
            instance.set_attribute("tags", json!([1, 2])).unwrap_err(),
            AttributeError::NotScalar("tags".to_string())
        );
        assert_eq!(
            instance.set_attribute("address", json!({"city": "Paris"})).unwrap_err(),
            AttributeError::NotScalar("address".to_string())
        );
        instance.set_attribute("verified", json!(true)).unwrap();
        instance.set_attribute("nickname", Value::Null).unwrap();
        assert_eq!(instance.attributes.len(), 2);
    }
}
