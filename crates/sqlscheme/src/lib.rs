//! SQLScheme: tuple-backed records with generated attribute accessors.
//!
//! This is the facade crate. It re-exports [`sqlscheme_core`] and offers a
//! [`prelude`] for glob imports.
//!
//! ```
//! use sqlscheme::prelude::*;
//!
//! let users = Scheme::builder("users")?
//!     .attribute("id", AttributeKind::Integer, AttributeOptions::new().serial().key())?
//!     .attribute("name", AttributeKind::String, AttributeOptions::new())?
//!     .build();
//!
//! let mut user = users.create([("name", Value::from("Benny Arthurton"))])?;
//! user.set("name", "Jimmy Arthurton")?;
//! assert_eq!(user.get("name")?.as_str(), Some("Jimmy Arthurton"));
//! # Ok::<(), sqlscheme::Error>(())
//! ```

pub use sqlscheme_core::*;

/// Everything needed to declare schemes and work with records.
pub mod prelude {
    pub use sqlscheme_core::{
        AttributeKind, AttributeOptions, DefaultSpec, Error, ExtraValues, Record, Result, Scheme,
        SchemeBuilder, SchemeConfig, Tuple, Value,
    };
}
