//! Record shapes and the accessor table installed for them.
//!
//! A [`Scheme`] is declared once through a [`SchemeBuilder`]. Every declared
//! attribute immediately installs its getter/setter pair in the builder's
//! accessor table; [`SchemeBuilder::build`] then closes the attribute list and
//! hands out a shared, immutable scheme.
//!
//! # Example
//!
//! ```
//! use sqlscheme_core::{AttributeKind, AttributeOptions, DefaultSpec, Scheme, Value};
//!
//! let users = Scheme::builder("users")?
//!     .attribute("id", AttributeKind::Integer, AttributeOptions::new().serial().key())?
//!     .attribute("name", AttributeKind::String, AttributeOptions::new())?
//!     .attribute(
//!         "created",
//!         AttributeKind::Time,
//!         AttributeOptions::new().default(DefaultSpec::computed(Value::now)),
//!     )?
//!     .build();
//!
//! let user = users.create([("name", Value::from("Apple Arthurton"))])?;
//! assert_eq!(user.get("name")?.as_str(), Some("Apple Arthurton"));
//! assert!(user.get("id")?.is_null());
//! # Ok::<(), sqlscheme_core::Error>(())
//! ```

use std::collections::HashMap;
use std::sync::Arc;

use crate::attribute::{Accessor, Attribute, AttributeKind, AttributeOptions};
use crate::config::SchemeConfig;
use crate::error::{Error, Result};
use crate::identifiers::validate_identifier;
use crate::record::Record;
use crate::tuple::Tuple;
use crate::value::Value;

/// Declaration-phase builder for a [`Scheme`].
#[derive(Debug)]
pub struct SchemeBuilder {
    store_name: String,
    attributes: Vec<Attribute>,
    accessors: HashMap<String, Accessor>,
    config: SchemeConfig,
}

impl SchemeBuilder {
    /// Start declaring a scheme persisted under `store_name`.
    pub fn new(store_name: impl Into<String>) -> Result<Self> {
        let store_name = store_name.into();
        validate_identifier(&store_name)?;
        Ok(Self {
            store_name,
            attributes: Vec::new(),
            accessors: HashMap::new(),
            config: SchemeConfig::default(),
        })
    }

    /// Attach configuration.
    pub fn config(mut self, config: SchemeConfig) -> Self {
        self.config = config;
        self
    }

    /// Declare an attribute and install its accessor pair.
    ///
    /// Fails fast with [`Error::DuplicateAttribute`] when the name is taken and
    /// with [`Error::DuplicateField`] when another attribute already stores
    /// under the same tuple field. A failed declaration leaves the builder
    /// unchanged.
    pub fn declare_attribute(
        &mut self,
        name: impl Into<String>,
        kind: AttributeKind,
        options: AttributeOptions,
    ) -> Result<&mut Self> {
        let attribute = Attribute::new(name, kind, options)?;

        if self.accessors.contains_key(attribute.name()) {
            return Err(Error::DuplicateAttribute {
                scheme: self.store_name.clone(),
                name: attribute.name().to_string(),
            });
        }
        if let Some(existing) = self
            .attributes
            .iter()
            .find(|a| a.field() == attribute.field())
        {
            return Err(Error::DuplicateField {
                scheme: self.store_name.clone(),
                field: attribute.field().to_string(),
                existing: existing.name().to_string(),
            });
        }

        tracing::debug!(
            scheme = %self.store_name,
            attribute = %attribute.name(),
            field = %attribute.field(),
            kind = attribute.kind().sql_name(),
            key = attribute.is_key(),
            serial = attribute.is_serial(),
            "declared attribute"
        );

        self.accessors
            .insert(attribute.name().to_string(), attribute.accessor());
        self.attributes.push(attribute);
        Ok(self)
    }

    /// Chaining form of [`declare_attribute`](Self::declare_attribute).
    pub fn attribute(
        mut self,
        name: impl Into<String>,
        kind: AttributeKind,
        options: AttributeOptions,
    ) -> Result<Self> {
        self.declare_attribute(name, kind, options)?;
        Ok(self)
    }

    /// Close the attribute list.
    pub fn build(self) -> Arc<Scheme> {
        tracing::debug!(
            scheme = %self.store_name,
            attributes = self.attributes.len(),
            "built scheme"
        );
        Arc::new(Scheme {
            store_name: self.store_name,
            attributes: self.attributes,
            accessors: self.accessors,
            config: self.config,
        })
    }
}

/// An immutable record shape: a store name plus attributes in declaration
/// order.
#[derive(Debug)]
pub struct Scheme {
    store_name: String,
    attributes: Vec<Attribute>,
    accessors: HashMap<String, Accessor>,
    config: SchemeConfig,
}

impl Scheme {
    /// Start declaring a scheme. Shorthand for [`SchemeBuilder::new`].
    pub fn builder(store_name: impl Into<String>) -> Result<SchemeBuilder> {
        SchemeBuilder::new(store_name)
    }

    pub fn store_name(&self) -> &str {
        &self.store_name
    }

    pub fn config(&self) -> &SchemeConfig {
        &self.config
    }

    /// Attributes in declaration order.
    pub fn attributes(&self) -> &[Attribute] {
        &self.attributes
    }

    /// Look up an attribute by name.
    pub fn attribute(&self, name: &str) -> Option<&Attribute> {
        self.attributes.iter().find(|a| a.name() == name)
    }

    /// Attributes that form the record identity.
    pub fn key_attributes(&self) -> Vec<&Attribute> {
        self.attributes.iter().filter(|a| a.is_key()).collect()
    }

    /// The storage-assigned attribute, if any.
    ///
    /// At most one is expected; the first declared wins.
    pub fn serial_attribute(&self) -> Option<&Attribute> {
        self.attributes.iter().find(|a| a.is_serial())
    }

    /// Attributes written on insert (everything except serial).
    pub fn insertable(&self) -> Vec<&Attribute> {
        self.attributes.iter().filter(|a| !a.is_serial()).collect()
    }

    /// Attributes written on update (everything except keys).
    pub fn updatable(&self) -> Vec<&Attribute> {
        self.attributes.iter().filter(|a| !a.is_key()).collect()
    }

    /// Storage field names in declaration order.
    pub fn fields(&self) -> Vec<&str> {
        self.attributes.iter().map(Attribute::field).collect()
    }

    /// The accessor pair installed for an attribute.
    pub fn accessor(&self, name: &str) -> Result<&Accessor> {
        self.accessors
            .get(name)
            .ok_or_else(|| Error::UnknownAttribute {
                scheme: self.store_name.clone(),
                name: name.to_string(),
            })
    }

    /// An empty tuple for a new record of this scheme.
    pub fn new_tuple(&self) -> Tuple {
        Tuple::new()
    }

    /// Create a new record, resolving defaults for attributes not supplied.
    ///
    /// See [`Record::new`].
    pub fn create<I, K>(self: &Arc<Self>, values: I) -> Result<Record>
    where
        I: IntoIterator<Item = (K, Value)>,
        K: Into<String>,
    {
        Record::new(self, values)
    }

    /// Wrap a tuple materialized from storage. No defaults are applied.
    pub fn load(self: &Arc<Self>, tuple: Tuple) -> Record {
        Record::wrap(self, tuple)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attribute::DefaultSpec;

    fn users() -> Arc<Scheme> {
        Scheme::builder("users")
            .unwrap()
            .attribute(
                "id",
                AttributeKind::Integer,
                AttributeOptions::new().serial().key(),
            )
            .unwrap()
            .attribute("name", AttributeKind::String, AttributeOptions::new())
            .unwrap()
            .attribute(
                "email",
                AttributeKind::String,
                AttributeOptions::new().field("email_address"),
            )
            .unwrap()
            .attribute(
                "active",
                AttributeKind::Boolean,
                AttributeOptions::new().default(DefaultSpec::value(true)),
            )
            .unwrap()
            .build()
    }

    #[test]
    fn test_declaration_order_preserved() {
        let scheme = users();
        let names: Vec<&str> = scheme.attributes().iter().map(Attribute::name).collect();
        assert_eq!(names, vec!["id", "name", "email", "active"]);
        assert_eq!(scheme.fields(), vec!["id", "name", "email_address", "active"]);
    }

    #[test]
    fn test_key_and_serial_views() {
        let scheme = users();
        let keys: Vec<&str> = scheme.key_attributes().iter().map(|a| a.name()).collect();
        assert_eq!(keys, vec!["id"]);
        assert_eq!(scheme.serial_attribute().map(Attribute::name), Some("id"));

        let insertable: Vec<&str> = scheme.insertable().iter().map(|a| a.name()).collect();
        assert_eq!(insertable, vec!["name", "email", "active"]);
        let updatable: Vec<&str> = scheme.updatable().iter().map(|a| a.name()).collect();
        assert_eq!(updatable, vec!["name", "email", "active"]);
    }

    #[test]
    fn test_no_serial_attribute() {
        let scheme = Scheme::builder("tags")
            .unwrap()
            .attribute(
                "label",
                AttributeKind::String,
                AttributeOptions::new().key(),
            )
            .unwrap()
            .build();
        assert!(scheme.serial_attribute().is_none());
        assert_eq!(scheme.key_attributes().len(), 1);
    }

    #[test]
    fn test_duplicate_attribute_fails_fast() {
        let mut builder = Scheme::builder("users").unwrap();
        builder
            .declare_attribute("name", AttributeKind::String, AttributeOptions::new())
            .unwrap();
        let err = builder
            .declare_attribute("name", AttributeKind::Integer, AttributeOptions::new())
            .unwrap_err();

        assert_eq!(
            err,
            Error::DuplicateAttribute {
                scheme: "users".to_string(),
                name: "name".to_string(),
            }
        );
        let scheme = builder.build();
        assert_eq!(scheme.attributes().len(), 1);
        assert_eq!(scheme.attributes()[0].kind(), AttributeKind::String);
    }

    #[test]
    fn test_duplicate_field_fails_fast() {
        let err = Scheme::builder("users")
            .unwrap()
            .attribute("email", AttributeKind::String, AttributeOptions::new())
            .unwrap()
            .attribute(
                "mail",
                AttributeKind::String,
                AttributeOptions::new().field("email"),
            )
            .unwrap_err();

        assert_eq!(
            err,
            Error::DuplicateField {
                scheme: "users".to_string(),
                field: "email".to_string(),
                existing: "email".to_string(),
            }
        );
    }

    #[test]
    fn test_invalid_store_name() {
        let err = Scheme::builder("user accounts").unwrap_err();
        assert_eq!(err, Error::InvalidIdentifier("user accounts".to_string()));
    }

    #[test]
    fn test_accessor_lookup() {
        let scheme = users();
        assert_eq!(scheme.accessor("email").unwrap().field(), "email_address");
        assert!(matches!(
            scheme.accessor("email_address"),
            Err(Error::UnknownAttribute { .. })
        ));
    }

    #[test]
    fn test_attribute_lookup() {
        let scheme = users();
        assert_eq!(scheme.store_name(), "users");
        assert!(scheme.attribute("active").unwrap().has_default());
        assert!(scheme.attribute("missing").is_none());
    }
}
