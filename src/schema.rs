use serde_json::Value;
use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// A JSON Type Definition schema.
///
/// `Schema` is a plain record: every keyword is a field, and any combination
/// of keywords is representable, including combinations that don't make for a
/// sensible schema. Use [`Schema::validate`] to check that a schema is
/// well-formed before validating instances against it; the behavior of
/// [`crate::validate`] on a schema that fails [`Schema::validate`] is
/// unspecified (though it will never panic, and never loop forever if you set
/// a max depth).
///
/// The `definitions` keyword is only meaningful on a root schema, and `ref`s
/// always resolve against the root's definitions.
///
/// You can construct a `Schema` directly, or convert one from a
/// [`SerdeSchema`][crate::SerdeSchema] you parsed from JSON:
///
/// ```
/// use typedef::{Schema, SerdeSchema};
/// use serde_json::json;
///
/// let schema: Schema = serde_json::from_value::<SerdeSchema>(json!({
///     "elements": { "type": "string" }
/// }))
/// .unwrap()
/// .into();
///
/// assert!(schema.validate().is_ok());
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Schema {
    pub definitions: Option<BTreeMap<String, Schema>>,
    pub metadata: Option<BTreeMap<String, Value>>,
    pub nullable: bool,
    pub ref_: Option<String>,
    pub type_: Option<String>,
    pub enum_: Option<Vec<String>>,
    pub elements: Option<Box<Schema>>,
    pub properties: Option<BTreeMap<String, Schema>>,
    pub optional_properties: Option<BTreeMap<String, Schema>>,
    pub additional_properties: bool,
    pub values: Option<Box<Schema>>,
    pub discriminator: Option<String>,
    pub mapping: Option<BTreeMap<String, Schema>>,
}

/// The values the "type" keyword can take on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Type {
    Boolean,
    Float32,
    Float64,
    Int8,
    Uint8,
    Int16,
    Uint16,
    Int32,
    Uint32,
    String,
    Timestamp,
}

impl Type {
    /// The name of this type as it appears in a schema.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Boolean => "boolean",
            Self::Float32 => "float32",
            Self::Float64 => "float64",
            Self::Int8 => "int8",
            Self::Uint8 => "uint8",
            Self::Int16 => "int16",
            Self::Uint16 => "uint16",
            Self::Int32 => "int32",
            Self::Uint32 => "uint32",
            Self::String => "string",
            Self::Timestamp => "timestamp",
        }
    }
}

impl FromStr for Type {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "boolean" => Ok(Self::Boolean),
            "float32" => Ok(Self::Float32),
            "float64" => Ok(Self::Float64),
            "int8" => Ok(Self::Int8),
            "uint8" => Ok(Self::Uint8),
            "int16" => Ok(Self::Int16),
            "uint16" => Ok(Self::Uint16),
            "int32" => Ok(Self::Int32),
            "uint32" => Ok(Self::Uint32),
            "string" => Ok(Self::String),
            "timestamp" => Ok(Self::Timestamp),
            _ => Err(()),
        }
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The eight forms a schema may take on.
///
/// A schema's form is a function of which keywords it carries; see
/// [`Schema::form`]. The `definitions`, `nullable`, and `metadata` keywords
/// never affect a schema's form.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Form {
    Empty,
    Ref,
    Type,
    Enum,
    Elements,
    Properties,
    Values,
    Discriminator,
}

impl Form {
    /// The name of this form.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Empty => "empty",
            Self::Ref => "ref",
            Self::Type => "type",
            Self::Enum => "enum",
            Self::Elements => "elements",
            Self::Properties => "properties",
            Self::Values => "values",
            Self::Discriminator => "discriminator",
        }
    }
}

impl fmt::Display for Form {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors that may arise from [`Schema::validate`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum SchemaValidateError {
    /// The schema uses an invalid combination of keywords.
    #[error("invalid form")]
    InvalidForm,

    /// The schema uses "definitions" outside of a root schema.
    #[error("non-root definitions")]
    NonRootDefinition,

    /// The schema has a "ref" with no corresponding definition.
    #[error("ref to non-existent definition")]
    NoSuchDefinition,

    /// The schema has a "type" keyword with an invalid value.
    #[error("invalid type")]
    InvalidType,

    /// The schema has an "enum" keyword with no values.
    #[error("empty enum")]
    EmptyEnum,

    /// The schema has an "enum" keyword with repeated values.
    #[error("enum contains repeated values")]
    RepeatedEnumValue,

    /// The schema has the same property name in "properties" and
    /// "optionalProperties".
    #[error("properties and optionalProperties share a property")]
    SharedProperty,

    /// The schema has a mapping value that isn't a schema of the properties
    /// form.
    #[error("mapping value not of properties form")]
    NonPropertiesMapping,

    /// The schema has a mapping value that re-specifies the discriminator
    /// property it's selected by.
    #[error("mapping re-specifies discriminator property")]
    MappingRepeatedDiscriminator,

    /// The schema has a mapping value with "nullable" set to true.
    #[error("mapping allows for nullable values")]
    NullableMapping,
}

// Combinations of keyword presence that make for a well-formed schema, in the
// order:
//
// ref type enum elements properties optionalProperties additionalProperties
// values discriminator mapping
//
// The "definitions", "nullable", and "metadata" keywords are left out because
// they restrict nothing. "additionalProperties" contributes its value, not
// its presence: an explicit false is indistinguishable from leaving it out.
#[rustfmt::skip]
const VALID_FORM_SIGNATURES: [[bool; 10]; 13] = [
    // Empty form
    [false, false, false, false, false, false, false, false, false, false],
    // Ref form
    [true, false, false, false, false, false, false, false, false, false],
    // Type form
    [false, true, false, false, false, false, false, false, false, false],
    // Enum form
    [false, false, true, false, false, false, false, false, false, false],
    // Elements form
    [false, false, false, true, false, false, false, false, false, false],
    // Properties form -- properties or optionalProperties or both, and never
    // additionalProperties on its own
    [false, false, false, false, true, false, false, false, false, false],
    [false, false, false, false, false, true, false, false, false, false],
    [false, false, false, false, true, true, false, false, false, false],
    [false, false, false, false, true, false, true, false, false, false],
    [false, false, false, false, false, true, true, false, false, false],
    [false, false, false, false, true, true, true, false, false, false],
    // Values form
    [false, false, false, false, false, false, false, true, false, false],
    // Discriminator form
    [false, false, false, false, false, false, false, false, true, true],
];

impl Schema {
    /// The form this schema takes on.
    ///
    /// Classification is total: every schema, well-formed or not, has a form.
    /// Form-bearing keywords are tried in a fixed precedence, so a schema
    /// that illegally combines keywords still gets exactly one form; it's
    /// [`Schema::validate`]'s job to reject such combinations.
    pub fn form(&self) -> Form {
        if self.ref_.is_some() {
            Form::Ref
        } else if self.type_.is_some() {
            Form::Type
        } else if self.enum_.is_some() {
            Form::Enum
        } else if self.elements.is_some() {
            Form::Elements
        } else if self.properties.is_some() || self.optional_properties.is_some() {
            Form::Properties
        } else if self.values.is_some() {
            Form::Values
        } else if self.mapping.is_some() {
            Form::Discriminator
        } else {
            Form::Empty
        }
    }

    /// Returns an error if this schema is not a well-formed root schema.
    ///
    /// Checking is fail-fast: the first violation found is returned, and it
    /// is always exactly one of the [`SchemaValidateError`] variants.
    ///
    /// ```
    /// use typedef::{Schema, SchemaValidateError};
    ///
    /// let schema = Schema {
    ///     ref_: Some("missing".to_owned()),
    ///     ..Default::default()
    /// };
    ///
    /// assert_eq!(Err(SchemaValidateError::NoSuchDefinition), schema.validate());
    /// ```
    pub fn validate(&self) -> Result<(), SchemaValidateError> {
        self.check(true, self)
    }

    fn check(&self, is_root: bool, root: &Schema) -> Result<(), SchemaValidateError> {
        let signature = [
            self.ref_.is_some(),
            self.type_.is_some(),
            self.enum_.is_some(),
            self.elements.is_some(),
            self.properties.is_some(),
            self.optional_properties.is_some(),
            self.additional_properties,
            self.values.is_some(),
            self.discriminator.is_some(),
            self.mapping.is_some(),
        ];

        if !VALID_FORM_SIGNATURES.contains(&signature) {
            return Err(SchemaValidateError::InvalidForm);
        }

        if let Some(definitions) = &self.definitions {
            if !is_root {
                return Err(SchemaValidateError::NonRootDefinition);
            }

            for sub_schema in definitions.values() {
                sub_schema.check(false, root)?;
            }
        }

        if let Some(ref_) = &self.ref_ {
            let defined = root
                .definitions
                .as_ref()
                .map_or(false, |definitions| definitions.contains_key(ref_));

            if !defined {
                return Err(SchemaValidateError::NoSuchDefinition);
            }
        }

        if let Some(type_) = &self.type_ {
            if type_.parse::<Type>().is_err() {
                return Err(SchemaValidateError::InvalidType);
            }
        }

        if let Some(enum_) = &self.enum_ {
            if enum_.is_empty() {
                return Err(SchemaValidateError::EmptyEnum);
            }

            let mut seen = HashSet::new();
            for value in enum_ {
                if !seen.insert(value) {
                    return Err(SchemaValidateError::RepeatedEnumValue);
                }
            }
        }

        if let Some(elements) = &self.elements {
            elements.check(false, root)?;
        }

        if let Some(properties) = &self.properties {
            for (name, sub_schema) in properties {
                sub_schema.check(false, root)?;

                let shared = self
                    .optional_properties
                    .as_ref()
                    .map_or(false, |optional| optional.contains_key(name));

                if shared {
                    return Err(SchemaValidateError::SharedProperty);
                }
            }
        }

        if let Some(optional_properties) = &self.optional_properties {
            for sub_schema in optional_properties.values() {
                sub_schema.check(false, root)?;
            }
        }

        if let Some(values) = &self.values {
            values.check(false, root)?;
        }

        if let (Some(discriminator), Some(mapping)) = (&self.discriminator, &self.mapping) {
            for sub_schema in mapping.values() {
                sub_schema.check(false, root)?;

                if sub_schema.form() != Form::Properties {
                    return Err(SchemaValidateError::NonPropertiesMapping);
                }

                let repeats = |properties: &Option<BTreeMap<String, Schema>>| {
                    properties
                        .as_ref()
                        .map_or(false, |properties| properties.contains_key(discriminator))
                };

                if repeats(&sub_schema.properties) || repeats(&sub_schema.optional_properties) {
                    return Err(SchemaValidateError::MappingRepeatedDiscriminator);
                }

                if sub_schema.nullable {
                    return Err(SchemaValidateError::NullableMapping);
                }
            }
        }

        Ok(())
    }
}
