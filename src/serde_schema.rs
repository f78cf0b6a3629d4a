use crate::Schema;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// A serde-friendly format for representing schemas.
///
/// `SerdeSchema` is a transparent mirror of the JSON representation of a
/// schema: every keyword is optional, and unknown keywords are rejected at
/// parse time. It exists so that serialization concerns stay out of
/// [`Schema`]; convert between the two with the `From` impls in both
/// directions.
///
/// Conversion to [`Schema`] is infallible, because a `Schema` can represent
/// any keyword combination a parsed schema might carry. Whether the result is
/// actually a well-formed schema is a separate question, answered by
/// [`Schema::validate`].
///
/// ```
/// use typedef::{Schema, SerdeSchema};
/// use serde_json::json;
///
/// let serde_schema: SerdeSchema = serde_json::from_value(json!({
///     "properties": {
///         "name": { "type": "string" },
///     },
/// }))
/// .unwrap();
///
/// let schema: Schema = serde_schema.into();
/// assert!(schema.validate().is_ok());
/// ```
#[derive(Clone, Serialize, Deserialize, Debug, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
#[serde(deny_unknown_fields)]
pub struct SerdeSchema {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub definitions: Option<BTreeMap<String, SerdeSchema>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<BTreeMap<String, Value>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub nullable: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub ref_: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub type_: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub enum_: Option<Vec<String>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub elements: Option<Box<SerdeSchema>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub properties: Option<BTreeMap<String, SerdeSchema>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub optional_properties: Option<BTreeMap<String, SerdeSchema>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub additional_properties: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub values: Option<Box<SerdeSchema>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub discriminator: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub mapping: Option<BTreeMap<String, SerdeSchema>>,
}

fn from_serde_map(schemas: BTreeMap<String, SerdeSchema>) -> BTreeMap<String, Schema> {
    schemas
        .into_iter()
        .map(|(name, schema)| (name, schema.into()))
        .collect()
}

fn into_serde_map(schemas: BTreeMap<String, Schema>) -> BTreeMap<String, SerdeSchema> {
    schemas
        .into_iter()
        .map(|(name, schema)| (name, schema.into()))
        .collect()
}

impl From<SerdeSchema> for Schema {
    fn from(schema: SerdeSchema) -> Self {
        Schema {
            definitions: schema.definitions.map(from_serde_map),
            metadata: schema.metadata,
            nullable: schema.nullable.unwrap_or(false),
            ref_: schema.ref_,
            type_: schema.type_,
            enum_: schema.enum_,
            elements: schema.elements.map(|schema| Box::new((*schema).into())),
            properties: schema.properties.map(from_serde_map),
            optional_properties: schema.optional_properties.map(from_serde_map),
            additional_properties: schema.additional_properties.unwrap_or(false),
            values: schema.values.map(|schema| Box::new((*schema).into())),
            discriminator: schema.discriminator,
            mapping: schema.mapping.map(from_serde_map),
        }
    }
}

impl From<Schema> for SerdeSchema {
    fn from(schema: Schema) -> Self {
        SerdeSchema {
            definitions: schema.definitions.map(into_serde_map),
            metadata: schema.metadata,
            nullable: schema.nullable.then(|| true),
            ref_: schema.ref_,
            type_: schema.type_,
            enum_: schema.enum_,
            elements: schema.elements.map(|schema| Box::new((*schema).into())),
            properties: schema.properties.map(into_serde_map),
            optional_properties: schema.optional_properties.map(into_serde_map),
            additional_properties: schema.additional_properties.then(|| true),
            values: schema.values.map(|schema| Box::new((*schema).into())),
            discriminator: schema.discriminator,
            mapping: schema.mapping.map(into_serde_map),
        }
    }
}

#[cfg(feature = "fuzz")]
impl arbitrary::Arbitrary for SerdeSchema {
    fn arbitrary(u: &mut arbitrary::Unstructured<'_>) -> arbitrary::Result<Self> {
        Ok(SerdeSchema {
            definitions: arbitrary::Arbitrary::arbitrary(u)?,

            // serde_json::Value does not implement Arbitrary, and metadata
            // never constrains validation, so it is always absent in fuzzed
            // schemas.
            metadata: None,

            nullable: arbitrary::Arbitrary::arbitrary(u)?,
            ref_: arbitrary::Arbitrary::arbitrary(u)?,
            type_: arbitrary::Arbitrary::arbitrary(u)?,
            enum_: arbitrary::Arbitrary::arbitrary(u)?,
            elements: arbitrary::Arbitrary::arbitrary(u)?,
            properties: arbitrary::Arbitrary::arbitrary(u)?,
            optional_properties: arbitrary::Arbitrary::arbitrary(u)?,
            additional_properties: arbitrary::Arbitrary::arbitrary(u)?,
            values: arbitrary::Arbitrary::arbitrary(u)?,
            discriminator: arbitrary::Arbitrary::arbitrary(u)?,
            mapping: arbitrary::Arbitrary::arbitrary(u)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parse_empty() {
        assert_eq!(
            SerdeSchema::default(),
            serde_json::from_value(json!({})).unwrap()
        );
    }

    #[test]
    fn parse_partial() {
        assert_eq!(
            SerdeSchema {
                nullable: Some(true),
                optional_properties: Some(
                    vec![(
                        "foo".to_owned(),
                        SerdeSchema {
                            type_: Some("uint32".to_owned()),
                            ..Default::default()
                        }
                    )]
                    .into_iter()
                    .collect()
                ),
                ..Default::default()
            },
            serde_json::from_value(json!({
                "optionalProperties": {
                    "foo": {
                        "type": "uint32",
                    },
                },
                "nullable": true,
            }))
            .unwrap()
        );
    }

    #[test]
    fn parse_full() {
        assert_eq!(
            SerdeSchema {
                definitions: Some(
                    vec![(
                        "foo".to_owned(),
                        SerdeSchema {
                            type_: Some("uint32".to_owned()),
                            ..Default::default()
                        }
                    )]
                    .into_iter()
                    .collect()
                ),
                metadata: Some(vec![("foo".to_owned(), json!("bar"))].into_iter().collect()),
                nullable: Some(true),
                ref_: Some("foo".to_owned()),
                type_: Some("uint32".to_owned()),
                enum_: Some(vec!["foo".to_owned(), "bar".to_owned()]),
                elements: Some(Box::new(SerdeSchema {
                    type_: Some("uint32".to_owned()),
                    ..Default::default()
                })),
                properties: Some(
                    vec![(
                        "foo".to_owned(),
                        SerdeSchema {
                            type_: Some("uint32".to_owned()),
                            ..Default::default()
                        }
                    )]
                    .into_iter()
                    .collect()
                ),
                optional_properties: Some(
                    vec![(
                        "bar".to_owned(),
                        SerdeSchema {
                            type_: Some("uint32".to_owned()),
                            ..Default::default()
                        }
                    )]
                    .into_iter()
                    .collect()
                ),
                additional_properties: Some(true),
                values: Some(Box::new(SerdeSchema {
                    type_: Some("uint32".to_owned()),
                    ..Default::default()
                })),
                discriminator: Some("foo".to_owned()),
                mapping: Some(
                    vec![(
                        "foo".to_owned(),
                        SerdeSchema {
                            type_: Some("uint32".to_owned()),
                            ..Default::default()
                        }
                    )]
                    .into_iter()
                    .collect()
                ),
            },
            serde_json::from_value(json!({
                "definitions": {
                    "foo": {
                        "type": "uint32",
                    },
                },
                "metadata": {
                    "foo": "bar",
                },
                "nullable": true,
                "ref": "foo",
                "type": "uint32",
                "enum": ["foo", "bar"],
                "elements": {
                    "type": "uint32",
                },
                "properties": {
                    "foo": {
                        "type": "uint32",
                    },
                },
                "optionalProperties": {
                    "bar": {
                        "type": "uint32",
                    },
                },
                "additionalProperties": true,
                "values": {
                    "type": "uint32",
                },
                "discriminator": "foo",
                "mapping": {
                    "foo": {
                        "type": "uint32",
                    },
                },
            }))
            .unwrap()
        );
    }

    #[test]
    fn parse_rejects_unknown_keywords() {
        assert!(serde_json::from_value::<SerdeSchema>(json!({ "extra": 1 })).is_err());
    }

    #[test]
    fn parse_rejects_null() {
        assert!(serde_json::from_value::<SerdeSchema>(json!(null)).is_err());
    }

    #[test]
    fn convert_collapses_absent_flags() {
        let schema: Schema = serde_json::from_value::<SerdeSchema>(json!({
            "properties": {
                "a": { "type": "string" },
            },
            "additionalProperties": false,
        }))
        .unwrap()
        .into();

        assert!(!schema.nullable);
        assert!(!schema.additional_properties);

        // An explicit false serializes back as absent.
        let serde_schema: SerdeSchema = schema.into();
        assert_eq!(None, serde_schema.nullable);
        assert_eq!(None, serde_schema.additional_properties);
    }

    #[test]
    fn convert_round_trips() {
        let value = json!({
            "definitions": {
                "user": {
                    "properties": {
                        "name": { "type": "string" },
                    },
                    "optionalProperties": {
                        "age": { "type": "uint32" },
                    },
                },
            },
            "elements": {
                "ref": "user",
            },
            "nullable": true,
        });

        let parsed: SerdeSchema = serde_json::from_value(value).unwrap();
        let schema: Schema = parsed.clone().into();
        assert_eq!(parsed, SerdeSchema::from(schema));
    }
}
