//! Attribute definitions and the accessor pairs generated from them.
//!
//! An [`Attribute`] describes one named field of a scheme: the tuple field it
//! is stored under, its default policy and its key/serial flags. Declaring an
//! attribute on a [`SchemeBuilder`](crate::scheme::SchemeBuilder) installs the
//! [`Accessor`] produced by [`Attribute::accessor`], so reads and writes go
//! through closures bound to the storage field rather than the name.

use std::fmt;
use std::sync::Arc;

use crate::error::{Error, Result};
use crate::identifiers::validate_identifier;
use crate::tuple::Tuple;
use crate::value::Value;

/// Declared kind of an attribute.
///
/// Kinds are metadata for storage and migration collaborators. The core never
/// coerces or validates values against them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AttributeKind {
    Integer,
    Float,
    BigDecimal,
    String,
    Boolean,
    Date,
    Time,
    /// Binary blob.
    IO,
}

impl AttributeKind {
    /// Generic column type name for DDL generators.
    pub const fn sql_name(&self) -> &'static str {
        match self {
            AttributeKind::Integer => "integer",
            AttributeKind::Float => "float",
            AttributeKind::BigDecimal => "numeric",
            AttributeKind::String => "text",
            AttributeKind::Boolean => "boolean",
            AttributeKind::Date => "date",
            AttributeKind::Time => "timestamp",
            AttributeKind::IO => "blob",
        }
    }
}

/// Zero-argument producer backing a computed default.
pub type Producer = Arc<dyn Fn() -> Result<Value> + Send + Sync>;

/// Default-value policy of an attribute.
#[derive(Clone, Default)]
pub enum DefaultSpec {
    /// No default; the field stays unset unless a value is supplied.
    #[default]
    Absent,
    /// A fixed value. Mutable kinds are duplicated for every record.
    Static(Value),
    /// Invoked every time a default is requested.
    Computed(Producer),
}

impl DefaultSpec {
    /// Static default from anything convertible into a [`Value`].
    pub fn value(value: impl Into<Value>) -> Self {
        DefaultSpec::Static(value.into())
    }

    /// Computed default from an infallible producer.
    pub fn computed<F>(producer: F) -> Self
    where
        F: Fn() -> Value + Send + Sync + 'static,
    {
        DefaultSpec::Computed(Arc::new(move || Ok(producer())))
    }

    /// Computed default from a producer that may fail.
    ///
    /// Failures surface unchanged from record construction.
    pub fn try_computed<F>(producer: F) -> Self
    where
        F: Fn() -> Result<Value> + Send + Sync + 'static,
    {
        DefaultSpec::Computed(Arc::new(producer))
    }

    pub fn is_absent(&self) -> bool {
        matches!(self, DefaultSpec::Absent)
    }
}

impl fmt::Debug for DefaultSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DefaultSpec::Absent => f.write_str("Absent"),
            DefaultSpec::Static(value) => f.debug_tuple("Static").field(value).finish(),
            DefaultSpec::Computed(_) => f.write_str("Computed(<producer>)"),
        }
    }
}

/// Options recognized when declaring an attribute.
#[derive(Debug, Clone, Default)]
pub struct AttributeOptions {
    /// Default-value policy.
    pub default: DefaultSpec,
    /// Tuple field; `None` stores under the attribute name.
    pub field: Option<String>,
    /// Part of the record identity.
    pub key: bool,
    /// Assigned by storage (auto-increment).
    pub serial: bool,
}

impl AttributeOptions {
    pub fn new() -> Self {
        <Self as Default>::default()
    }

    /// Set the default-value policy.
    pub fn default(mut self, default: DefaultSpec) -> Self {
        self.default = default;
        self
    }

    /// Store the attribute under a different tuple field.
    pub fn field(mut self, field: impl Into<String>) -> Self {
        self.field = Some(field.into());
        self
    }

    /// Mark as (part of) the record key.
    pub fn key(mut self) -> Self {
        self.key = true;
        self
    }

    /// Mark as assigned by storage.
    pub fn serial(mut self) -> Self {
        self.serial = true;
        self
    }
}

/// Reads an attribute's field from a tuple, yielding [`Value::Null`] when unset.
pub type Getter = Arc<dyn Fn(&Tuple) -> Value + Send + Sync>;

/// Stores a value into an attribute's field, overwriting any prior value.
pub type Setter = Arc<dyn Fn(&mut Tuple, Value) + Send + Sync>;

/// The getter/setter pair installed on a scheme for one attribute.
#[derive(Clone)]
pub struct Accessor {
    field: String,
    getter: Getter,
    setter: Setter,
}

impl Accessor {
    /// Tuple field both closures are bound to.
    pub fn field(&self) -> &str {
        &self.field
    }

    /// Read through the getter. Never mutates the tuple.
    pub fn get(&self, tuple: &Tuple) -> Value {
        (self.getter)(tuple)
    }

    /// Write through the setter. Always succeeds.
    pub fn set(&self, tuple: &mut Tuple, value: Value) {
        (self.setter)(tuple, value);
    }
}

impl fmt::Debug for Accessor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Accessor")
            .field("field", &self.field)
            .finish_non_exhaustive()
    }
}

/// One named field of a scheme.
#[derive(Debug, Clone)]
pub struct Attribute {
    name: String,
    field: String,
    kind: AttributeKind,
    key: bool,
    serial: bool,
    default: DefaultSpec,
}

impl Attribute {
    /// Build an attribute, validating its name and storage field.
    pub fn new(
        name: impl Into<String>,
        kind: AttributeKind,
        options: AttributeOptions,
    ) -> Result<Self> {
        let name = name.into();
        validate_identifier(&name)?;
        let field = options.field.unwrap_or_else(|| name.clone());
        validate_identifier(&field)?;

        Ok(Self {
            name,
            field,
            kind,
            key: options.key,
            serial: options.serial,
            default: options.default,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Tuple field the attribute is stored under.
    pub fn field(&self) -> &str {
        &self.field
    }

    pub fn kind(&self) -> AttributeKind {
        self.kind
    }

    pub fn is_key(&self) -> bool {
        self.key
    }

    pub fn is_serial(&self) -> bool {
        self.serial
    }

    pub fn default_spec(&self) -> &DefaultSpec {
        &self.default
    }

    pub fn has_default(&self) -> bool {
        !self.default.is_absent()
    }

    /// Resolve the default value for a new record.
    ///
    /// Computed producers run on every call. Static values of mutable kinds
    /// come back as fresh copies; scalar kinds are returned as-is. Returns
    /// `Ok(None)` when the attribute has no default.
    pub fn resolve_default(&self) -> Result<Option<Value>> {
        let value = match &self.default {
            DefaultSpec::Absent => return Ok(None),
            DefaultSpec::Computed(producer) => producer().map_err(|err| match err {
                Error::DefaultProducer { attribute, message } if attribute.is_empty() => {
                    Error::DefaultProducer {
                        attribute: self.name.clone(),
                        message,
                    }
                }
                other => other,
            })?,
            DefaultSpec::Static(value) if value.is_mutable_kind() => value.duplicate(),
            DefaultSpec::Static(value) => value.clone(),
        };

        tracing::trace!(
            attribute = %self.name,
            kind = value.kind_name(),
            "resolved default"
        );
        Ok(Some(value))
    }

    /// Generate the accessor pair, both closures bound to the storage field.
    pub fn accessor(&self) -> Accessor {
        let read_field = self.field.clone();
        let write_field = self.field.clone();

        Accessor {
            field: self.field.clone(),
            getter: Arc::new(move |tuple: &Tuple| {
                tuple.get(&read_field).cloned().unwrap_or(Value::Null)
            }),
            setter: Arc::new(move |tuple: &mut Tuple, value: Value| {
                tuple.store(write_field.as_str(), value);
            }),
        }
    }
}
