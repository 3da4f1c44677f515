//! Core types for SQLScheme.
//!
//! `sqlscheme-core` is the **attribute-definition and tuple-binding layer**. A
//! [`Scheme`] declares a record shape as an ordered list of [`Attribute`]s;
//! each attribute installs a getter/setter pair bound to its storage field; a
//! [`Record`] pairs a shared scheme with the [`Tuple`] that holds its values.
//!
//! # Role In The Architecture
//!
//! - **Declaration**: [`SchemeBuilder`] validates names, rejects duplicates and
//!   builds the accessor table.
//! - **Construction**: [`Record::new`] resolves defaults once per record;
//!   [`Record::wrap`] hydrates a record from a storage tuple as-is.
//! - **Boundary**: SQL generation, drivers and query execution live outside
//!   this crate. They enumerate [`Scheme::attributes`] and read or write
//!   tuples through [`Tuple::get`] and [`Tuple::store`].
//!
//! Records are single-owner and not synchronized; a built scheme is immutable
//! and may be shared freely behind its `Arc`.

pub mod attribute;
pub mod config;
pub mod error;
pub mod identifiers;
pub mod record;
pub mod scheme;
pub mod tuple;
pub mod value;

pub use attribute::{
    Accessor, Attribute, AttributeKind, AttributeOptions, DefaultSpec, Getter, Producer, Setter,
};
pub use config::{ExtraValues, SchemeConfig};
pub use error::{Error, Result};
pub use identifiers::{is_valid_identifier, validate_identifier};
pub use record::Record;
pub use scheme::{Scheme, SchemeBuilder};
pub use tuple::Tuple;
pub use value::Value;
