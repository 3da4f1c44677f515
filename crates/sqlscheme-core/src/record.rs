//! Live instances of a scheme.

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::config::ExtraValues;
use crate::error::{Error, Result};
use crate::scheme::Scheme;
use crate::tuple::Tuple;
use crate::value::Value;

/// A scheme instance owning exactly one tuple.
///
/// Field access is dispatched through the accessor pairs installed on the
/// scheme; nothing is stored per instance besides the tuple.
#[derive(Debug, Clone)]
pub struct Record {
    scheme: Arc<Scheme>,
    tuple: Tuple,
}

impl Record {
    /// Create a new record.
    ///
    /// Attributes are visited in declaration order. A supplied value is
    /// stored through the attribute's setter; otherwise a declared default is
    /// resolved once and stored; otherwise the field stays unset. Supplied
    /// keys naming no attribute are handled per the scheme's
    /// [`ExtraValues`] policy. Default producer failures are returned as-is.
    pub fn new<I, K>(scheme: &Arc<Scheme>, values: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, Value)>,
        K: Into<String>,
    {
        let mut supplied: BTreeMap<String, Value> =
            values.into_iter().map(|(k, v)| (k.into(), v)).collect();

        let extras: Vec<String> = supplied
            .keys()
            .filter(|name| scheme.attribute(name).is_none())
            .cloned()
            .collect();
        let policy = scheme.config().extra_values;
        match policy {
            ExtraValues::Forbid => {
                if let Some(name) = extras.first() {
                    tracing::warn!(
                        scheme = %scheme.store_name(),
                        name = %name,
                        "rejected value for undeclared attribute"
                    );
                    return Err(Error::ExtraValue {
                        scheme: scheme.store_name().to_string(),
                        name: name.clone(),
                    });
                }
            }
            ExtraValues::Allow => {
                for name in &extras {
                    let owner = scheme.attributes().iter().find(|a| a.field() == name);
                    if let Some(owner) = owner {
                        tracing::warn!(
                            scheme = %scheme.store_name(),
                            name = %name,
                            attribute = %owner.name(),
                            "extra value collides with an attribute field"
                        );
                        return Err(Error::DuplicateField {
                            scheme: scheme.store_name().to_string(),
                            field: name.clone(),
                            existing: owner.name().to_string(),
                        });
                    }
                }
            }
            ExtraValues::Ignore => {}
        }

        let mut tuple = scheme.new_tuple();
        for attribute in scheme.attributes() {
            let accessor = scheme.accessor(attribute.name())?;
            if let Some(value) = supplied.remove(attribute.name()) {
                accessor.set(&mut tuple, value);
            } else if let Some(value) = attribute.resolve_default()? {
                accessor.set(&mut tuple, value);
            }
        }

        // Only undeclared names remain, and none under Forbid.
        for (name, value) in supplied {
            if policy == ExtraValues::Allow {
                tuple.store(name, value);
            } else {
                tracing::debug!(
                    scheme = %scheme.store_name(),
                    name = %name,
                    "ignored value for undeclared attribute"
                );
            }
        }

        Ok(Self {
            scheme: Arc::clone(scheme),
            tuple,
        })
    }

    /// Wrap a tuple materialized from storage. No defaults are resolved.
    pub fn wrap(scheme: &Arc<Scheme>, tuple: Tuple) -> Self {
        Self {
            scheme: Arc::clone(scheme),
            tuple,
        }
    }

    pub fn scheme(&self) -> &Arc<Scheme> {
        &self.scheme
    }

    /// Borrow the backing tuple.
    pub fn tuple(&self) -> &Tuple {
        &self.tuple
    }

    /// Take the backing tuple, e.g. to serialize a write.
    pub fn into_tuple(self) -> Tuple {
        self.tuple
    }

    /// Read an attribute. An unset field reads as [`Value::Null`].
    pub fn get(&self, name: &str) -> Result<Value> {
        Ok(self.scheme.accessor(name)?.get(&self.tuple))
    }

    /// Write an attribute, overwriting any prior value.
    pub fn set(&mut self, name: &str, value: impl Into<Value>) -> Result<()> {
        self.scheme
            .accessor(name)?
            .set(&mut self.tuple, value.into());
        Ok(())
    }

    /// Write several attributes.
    ///
    /// Every name is checked before anything is written, so an unknown name
    /// leaves the record untouched.
    pub fn update<I, K>(&mut self, values: I) -> Result<()>
    where
        I: IntoIterator<Item = (K, Value)>,
        K: AsRef<str>,
    {
        let mut writes = Vec::new();
        for (name, value) in values {
            writes.push((self.scheme.accessor(name.as_ref())?.clone(), value));
        }
        for (accessor, value) in writes {
            accessor.set(&mut self.tuple, value);
        }
        Ok(())
    }

    /// Values of the key attributes in declaration order; unset keys are
    /// [`Value::Null`].
    pub fn key_values(&self) -> Vec<Value> {
        self.scheme
            .key_attributes()
            .into_iter()
            .map(|a| self.tuple.get(a.field()).cloned().unwrap_or(Value::Null))
            .collect()
    }

    /// Field/value pairs for an INSERT: insertable attributes with a value.
    pub fn insert_values(&self) -> Vec<(&str, &Value)> {
        self.scheme
            .insertable()
            .into_iter()
            .filter_map(|a| self.tuple.get(a.field()).map(|v| (a.field(), v)))
            .collect()
    }

    /// JSON object keyed by attribute name. Unset attributes are omitted.
    pub fn dump(&self) -> serde_json::Value {
        let map = self
            .scheme
            .attributes()
            .iter()
            .filter_map(|a| {
                self.tuple
                    .get(a.field())
                    .map(|v| (a.name().to_string(), v.to_json()))
            })
            .collect();
        serde_json::Value::Object(map)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attribute::{AttributeKind, AttributeOptions, DefaultSpec};
    use crate::config::SchemeConfig;

    fn scheme_with(config: SchemeConfig) -> Arc<Scheme> {
        Scheme::builder("posts")
            .unwrap()
            .config(config)
            .attribute(
                "id",
                AttributeKind::Integer,
                AttributeOptions::new().serial().key(),
            )
            .unwrap()
            .attribute(
                "title",
                AttributeKind::String,
                AttributeOptions::new().field("post_title"),
            )
            .unwrap()
            .attribute(
                "draft",
                AttributeKind::Boolean,
                AttributeOptions::new().default(DefaultSpec::value(true)),
            )
            .unwrap()
            .build()
    }

    #[test]
    fn test_supplied_value_wins_over_default() {
        let scheme = scheme_with(SchemeConfig::default());
        let record = Record::new(&scheme, [("draft", Value::Bool(false))]).unwrap();
        assert_eq!(record.get("draft").unwrap(), Value::Bool(false));
    }

    #[test]
    fn test_unset_without_default_stays_absent() {
        let scheme = scheme_with(SchemeConfig::default());
        let record = Record::new(&scheme, Vec::<(&str, Value)>::new()).unwrap();

        assert!(!record.tuple().contains("id"));
        assert!(!record.tuple().contains("post_title"));
        assert_eq!(record.get("title").unwrap(), Value::Null);
        assert_eq!(record.tuple().len(), 1);
    }

    #[test]
    fn test_supplied_values_stored_under_field() {
        let scheme = scheme_with(SchemeConfig::default());
        let record = Record::new(&scheme, [("title", Value::from("Hello"))]).unwrap();

        assert_eq!(
            record.tuple().get("post_title"),
            Some(&Value::from("Hello"))
        );
        assert!(!record.tuple().contains("title"));
    }

    #[test]
    fn test_wrap_applies_no_defaults() {
        let scheme = scheme_with(SchemeConfig::default());
        let tuple: Tuple = [("id", Value::Int(3))].into_iter().collect();
        let record = Record::wrap(&scheme, tuple);

        assert_eq!(record.get("id").unwrap(), Value::Int(3));
        assert!(!record.tuple().contains("draft"));
        assert_eq!(record.get("draft").unwrap(), Value::Null);
    }

    #[test]
    fn test_unknown_attribute_access() {
        let scheme = scheme_with(SchemeConfig::default());
        let mut record = scheme.load(Tuple::new());

        assert!(matches!(
            record.get("post_title"),
            Err(Error::UnknownAttribute { .. })
        ));
        assert!(record.set("body", "text").is_err());
        assert!(record.tuple().is_empty());
    }

    #[test]
    fn test_extra_values_ignored_by_default() {
        let scheme = scheme_with(SchemeConfig::default());
        let record = Record::new(&scheme, [("body", Value::from("x"))]).unwrap();
        assert!(!record.tuple().contains("body"));
    }

    #[test]
    fn test_extra_values_forbidden() {
        let scheme = scheme_with(SchemeConfig::default().extra_values(ExtraValues::Forbid));
        let err = Record::new(&scheme, [("body", Value::from("x"))]).unwrap_err();
        assert_eq!(
            err,
            Error::ExtraValue {
                scheme: "posts".to_string(),
                name: "body".to_string(),
            }
        );
    }

    #[test]
    fn test_extra_values_allowed() {
        let scheme = scheme_with(SchemeConfig::default().extra_values(ExtraValues::Allow));
        let record = Record::new(&scheme, [("body", Value::from("x"))]).unwrap();
        assert_eq!(record.tuple().get("body"), Some(&Value::from("x")));
    }

    #[test]
    fn test_allowed_extra_cannot_clobber_renamed_field() {
        let scheme = scheme_with(SchemeConfig::default().extra_values(ExtraValues::Allow));
        let err = Record::new(
            &scheme,
            [
                ("title", Value::from("real")),
                ("post_title", Value::from("extra")),
            ],
        )
        .unwrap_err();

        assert_eq!(
            err,
            Error::DuplicateField {
                scheme: "posts".to_string(),
                field: "post_title".to_string(),
                existing: "title".to_string(),
            }
        );

        let record = Record::new(&scheme, [("title", Value::from("real"))]).unwrap();
        assert_eq!(record.get("title").unwrap(), Value::from("real"));
    }

    #[test]
    fn test_ignored_extra_matching_field_leaves_attribute_alone() {
        let scheme = scheme_with(SchemeConfig::default());
        let record = Record::new(
            &scheme,
            [
                ("title", Value::from("real")),
                ("post_title", Value::from("extra")),
            ],
        )
        .unwrap();
        assert_eq!(record.get("title").unwrap(), Value::from("real"));
    }

    #[test]
    fn test_update_is_all_or_nothing() {
        let scheme = scheme_with(SchemeConfig::default());
        let mut record = scheme.load(Tuple::new());

        let err = record
            .update([("title", Value::from("New")), ("nope", Value::Int(1))])
            .unwrap_err();
        assert!(matches!(err, Error::UnknownAttribute { .. }));
        assert!(record.tuple().is_empty());

        record
            .update([("title", Value::from("New")), ("draft", Value::Bool(false))])
            .unwrap();
        assert_eq!(record.get("title").unwrap(), Value::from("New"));
        assert_eq!(record.get("draft").unwrap(), Value::Bool(false));
    }

    #[test]
    fn test_key_and_insert_values() {
        let scheme = scheme_with(SchemeConfig::default());
        let mut record = Record::new(&scheme, [("title", Value::from("Hi"))]).unwrap();

        assert_eq!(record.key_values(), vec![Value::Null]);
        let pairs = record.insert_values();
        assert_eq!(
            pairs,
            vec![("post_title", &Value::from("Hi")), ("draft", &Value::Bool(true))]
        );

        record.set("id", 9).unwrap();
        assert_eq!(record.key_values(), vec![Value::Int(9)]);
        assert_eq!(record.insert_values().len(), 2);
    }

    #[test]
    fn test_dump_uses_attribute_names() {
        let scheme = scheme_with(SchemeConfig::default());
        let record = Record::new(&scheme, [("title", Value::from("Hi"))]).unwrap();

        assert_eq!(
            record.dump(),
            serde_json::json!({ "title": "Hi", "draft": true })
        );
    }

    #[test]
    fn test_into_tuple() {
        let scheme = scheme_with(SchemeConfig::default());
        let record = Record::new(&scheme, [("title", Value::from("Hi"))]).unwrap();
        let tuple = record.into_tuple();
        assert_eq!(tuple.get("draft"), Some(&Value::Bool(true)));
    }
}
