//! An implementation of the [JSON Type Definition](https://jsontypedef.com)
//! data model, [RFC 8927](https://tools.ietf.org/html/rfc8927).
//!
//! `typedef` represents JSON Typedef schemas in memory, checks that schemas
//! are themselves well-formed, and validates JSON data against those schemas,
//! producing the standardized validation errors the specification calls for.
//!
//! # Quick start
//!
//! Here's how you can parse a schema and then use it to validate data:
//!
//! ```
//! use typedef::{Schema, SerdeSchema};
//! use serde_json::json;
//!
//! let schema: Schema = serde_json::from_value::<SerdeSchema>(json!({
//!     "properties": {
//!         "foo": { "type": "string" },
//!         "bar": { "type": "boolean" }
//!     }
//! }))
//! .expect("Parse schema")
//! .into();
//!
//! schema.validate().expect("Invalid schema");
//!
//! // This input is ok, so validate comes back empty.
//! let input_ok = json!({ "foo": "xxx", "bar": true });
//! assert!(typedef::validate(&schema, &input_ok, Default::default()).unwrap().is_empty());
//!
//! // This input is bad (bar has type string, not boolean), so validate does
//! // not come back empty.
//! let input_bad = json!({ "foo": "xxx", "bar": "false" });
//! assert!(!typedef::validate(&schema, &input_bad, Default::default()).unwrap().is_empty());
//! ```
//!
//! At a high level:
//!
//! 1. Use `serde_json` to parse JSON data into a [`SerdeSchema`].
//! 2. Convert that into a [`Schema`] with `into()`.
//! 3. Ensure the schema is well-formed with [`Schema::validate`].
//! 4. Verify data against the schema with [`validate()`].
//!
//! # Validation errors
//!
//! Usually you want to know *why* input was rejected, not just that it was.
//! JSON Typedef standardizes the exact contents of validation errors, so the
//! errors this crate produces are portable across implementations. Each
//! [`ValidationErrorIndicator`] carries the path to the part of the input
//! that was rejected (the "instance path") and the path to the part of the
//! schema that rejected it (the "schema path"):
//!
//! ```
//! use typedef::{Schema, SerdeSchema, ValidationErrorIndicator};
//! use serde_json::json;
//!
//! let schema: Schema = serde_json::from_value::<SerdeSchema>(json!({
//!     "properties": {
//!         "name": { "type": "string" },
//!         "age": { "type": "uint32" },
//!         "phones": {
//!             "elements": {
//!                 "type": "string"
//!             }
//!         }
//!     }
//! }))
//! .expect("Parse schema")
//! .into();
//!
//! schema.validate().expect("Invalid schema");
//!
//! // Three problems with this input:
//! //
//! // 1. "name" is required but not present,
//! // 2. "age" has the wrong type,
//! // 3. "phones[1]" has the wrong type.
//! let input_bad = json!({
//!     "age": "43",
//!     "phones": ["+44 1234567", 442345678]
//! });
//!
//! assert_eq!(
//!     vec![
//!         // "age" has the wrong type (rejected by "/properties/age/type")
//!         ValidationErrorIndicator {
//!             instance_path: vec!["age".into()],
//!             schema_path: vec!["properties".into(), "age".into(), "type".into()],
//!         },
//!
//!         // "name" is missing (rejected by "/properties/name")
//!         ValidationErrorIndicator {
//!             instance_path: vec![],
//!             schema_path: vec!["properties".into(), "name".into()],
//!         },
//!
//!         // "phones/1" has the wrong type (rejected by
//!         // "/properties/phones/elements/type")
//!         ValidationErrorIndicator {
//!             instance_path: vec!["phones".into(), "1".into()],
//!             schema_path: vec![
//!                 "properties".into(),
//!                 "phones".into(),
//!                 "elements".into(),
//!                 "type".into()
//!             ],
//!         },
//!     ],
//!     typedef::validate(&schema, &input_bad, Default::default()).unwrap(),
//! );
//! ```
//!
//! Schemas keep their sub-schemas in ordered maps, so for a given schema and
//! instance the indicators come back in a stable order. The specification
//! does not promise any particular order across implementations, though; if
//! you compare error sets produced by different tools, sort them first.
//!
//! # Security considerations
//!
//! If you're validating against untrusted schemas (untrusted *inputs* are
//! always fine), be aware of this consideration from RFC 8927:
//!
//! > Implementations that evaluate user-inputted schemas SHOULD implement
//! > mechanisms to detect and abort circular references that might cause a
//! > naive implementation to go into an infinite loop. Without such
//! > mechanisms, implementations may be vulnerable to denial-of-service
//! > attacks.
//!
//! This crate supports that "detect and abort" mechanism via
//! [`ValidateOptions::with_max_depth`]. Please see that documentation if
//! you're validating data against untrusted schemas.

mod schema;
mod serde_schema;
mod validate;

pub use schema::*;
pub use serde_schema::*;
pub use validate::*;
