//! duffel-core: small generic helpers around a compound-key config container
//!
//! The centerpiece is [`Conf`], a nested-mapping configuration container
//! addressed by compound keys (`database.host`) with recursive deep-merge
//! updates and aliasing sub-config views. Around it sit a handful of
//! everyday helpers: predicate search, chunked iteration, ISO-8601
//! formatting, an extension registry, and a lazy cache slot.
//!
//! # Example
//!
//! ```rust
//! use duffel_core::Conf;
//!
//! let yaml = r#"
//! database:
//!   host: localhost
//!   port: 5432
//! "#;
//!
//! let conf = Conf::from_yaml(yaml).unwrap();
//! assert_eq!(conf.get("database.host").unwrap().as_str(), Some("localhost"));
//!
//! let db = conf.node("database").unwrap();
//! db.set("user", "admin").unwrap();
//! assert!(conf.contains("database.user"));
//! ```

pub mod algorithm;
pub mod cache;
pub mod datetime;
pub mod error;
pub mod ext;
pub mod iter;
pub mod value;

mod conf;

pub use cache::Cached;
pub use conf::{Conf, DEFAULT_SEPARATOR};
pub use error::{Error, ErrorKind, Result};
pub use ext::ExtensionRegistry;
pub use value::Value;
