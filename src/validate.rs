use crate::{Form, Schema, Type};
use chrono::DateTime;
use serde_json::Value;
use thiserror::Error;

/// Settings for how validation should behave.
///
/// The defaults are maximally permissive: no limit on the number of errors
/// returned, and no limit on how many refs will be recursively followed.
///
/// If you are validating against schemas you did not author, you should set a
/// max depth; see [`ValidateOptions::with_max_depth`].
#[derive(Clone, Copy, Debug, Default)]
pub struct ValidateOptions {
    max_depth: usize,
    max_errors: usize,
}

impl ValidateOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the maximum number of refs to follow recursively before
    /// [`validate`] aborts with [`ValidateError::MaxDepthExceeded`]. Zero,
    /// the default, disables the limit.
    ///
    /// A cyclically-defined schema (such as a definition whose value refers
    /// back to itself) can make validation recurse forever. The depth counter
    /// is the only safeguard against that, so pick a limit comfortably above
    /// the deepest legitimate ref chain your schemas use.
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Sets the maximum number of validation errors to return. Zero, the
    /// default, disables the limit.
    ///
    /// If all you care about is whether an instance is valid, rather than
    /// every way it is invalid, set this to 1 to stop validation at the first
    /// error.
    pub fn with_max_errors(mut self, max_errors: usize) -> Self {
        self.max_errors = max_errors;
        self
    }
}

/// Errors that may arise from [`validate`].
///
/// Note that validation *errors* are not in this enum: an instance failing to
/// conform to a schema is the successful result of [`validate`], as a list of
/// [`ValidationErrorIndicator`]s.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum ValidateError {
    /// More refs were followed than the configured maximum depth.
    #[error("max depth exceeded")]
    MaxDepthExceeded,
}

/// A single reason an instance did not conform to a schema.
///
/// The contents of both paths are standardized by the JSON Type Definition
/// specification: every conformant implementation emits the same set of
/// indicators for a given schema and instance, making them portable across
/// languages.
///
/// `instance_path` points at the part of the instance that was rejected;
/// `schema_path` points at the keyword that rejected it. Array indices appear
/// as decimal strings without leading zeros.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ValidationErrorIndicator {
    pub instance_path: Vec<String>,
    pub schema_path: Vec<String>,
}

/// Validates an instance against a schema.
///
/// Returns [`ValidateError::MaxDepthExceeded`] if more refs are followed than
/// [`ValidateOptions::with_max_depth`] allows. Otherwise, returns the list of
/// error indicators the instance produced, in conformance with the JSON Type
/// Definition specification; an empty list means the instance is valid.
///
/// The schema should first have passed [`Schema::validate`]. Validating
/// against an ill-formed schema produces unspecified indicators, but never
/// panics; set a max depth to also rule out unbounded recursion.
///
/// ```
/// use typedef::{Schema, SerdeSchema, ValidateOptions};
/// use serde_json::json;
///
/// let schema: Schema = serde_json::from_value::<SerdeSchema>(json!({
///     "type": "boolean"
/// }))
/// .unwrap()
/// .into();
///
/// let errors = typedef::validate(&schema, &json!(true), ValidateOptions::new()).unwrap();
/// assert!(errors.is_empty());
///
/// let errors = typedef::validate(&schema, &json!("true"), ValidateOptions::new()).unwrap();
/// assert_eq!(1, errors.len());
/// ```
pub fn validate(
    schema: &Schema,
    instance: &Value,
    options: ValidateOptions,
) -> Result<Vec<ValidationErrorIndicator>, ValidateError> {
    let mut vm = Vm {
        max_depth: options.max_depth,
        max_errors: options.max_errors,
        instance_tokens: vec![],
        schema_tokens: vec![vec![]],
        errors: vec![],
    };

    // MaxErrorsReached is not an error from the caller's point of view; it
    // only exists to short-circuit the walk once enough errors accumulate.
    match vm.validate(schema, schema, None, instance) {
        Ok(()) | Err(VmValidateError::MaxErrorsReached) => Ok(vm.errors),
        Err(VmValidateError::MaxDepthExceeded) => Err(ValidateError::MaxDepthExceeded),
    }
}

struct Vm {
    max_depth: usize,
    max_errors: usize,

    // Path tokens into the instance being validated.
    instance_tokens: Vec<String>,

    // Stack of frames of path tokens into the schema. Following a ref pushes
    // a fresh frame rooted at ["definitions", name]; errors always report the
    // top frame, so indicators from inside a definition are rooted at that
    // definition rather than at the referring keyword.
    schema_tokens: Vec<Vec<String>>,

    errors: Vec<ValidationErrorIndicator>,
}

enum VmValidateError {
    MaxErrorsReached,
    MaxDepthExceeded,
}

impl Vm {
    fn validate(
        &mut self,
        root: &Schema,
        schema: &Schema,
        parent_tag: Option<&str>,
        instance: &Value,
    ) -> Result<(), VmValidateError> {
        if schema.nullable && instance.is_null() {
            return Ok(());
        }

        match schema.form() {
            Form::Empty => {}
            Form::Ref => {
                // The frame stack starts out non-empty, so a max_depth of
                // zero can never trip this.
                if self.schema_tokens.len() == self.max_depth {
                    return Err(VmValidateError::MaxDepthExceeded);
                }

                if let Some(definition) = &schema.ref_ {
                    self.schema_tokens
                        .push(vec!["definitions".to_owned(), definition.clone()]);

                    // A ref to a definition that doesn't exist can only
                    // happen on an ill-formed schema; such a ref constrains
                    // nothing.
                    if let Some(sub_schema) = root
                        .definitions
                        .as_ref()
                        .and_then(|definitions| definitions.get(definition))
                    {
                        self.validate(root, sub_schema, None, instance)?;
                    }

                    self.schema_tokens.pop();
                }
            }
            Form::Type => {
                self.push_schema_token("type");

                match schema.type_.as_deref().and_then(|t| t.parse::<Type>().ok()) {
                    Some(Type::Boolean) => {
                        if !instance.is_boolean() {
                            self.push_error()?;
                        }
                    }
                    Some(Type::Float32) | Some(Type::Float64) => {
                        if !instance.is_number() {
                            self.push_error()?;
                        }
                    }
                    Some(Type::Int8) => self.validate_int(instance, -128.0, 127.0)?,
                    Some(Type::Uint8) => self.validate_int(instance, 0.0, 255.0)?,
                    Some(Type::Int16) => self.validate_int(instance, -32768.0, 32767.0)?,
                    Some(Type::Uint16) => self.validate_int(instance, 0.0, 65535.0)?,
                    Some(Type::Int32) => {
                        self.validate_int(instance, -2147483648.0, 2147483647.0)?
                    }
                    Some(Type::Uint32) => self.validate_int(instance, 0.0, 4294967295.0)?,
                    Some(Type::String) => {
                        if !instance.is_string() {
                            self.push_error()?;
                        }
                    }
                    Some(Type::Timestamp) => {
                        if let Some(s) = instance.as_str() {
                            if DateTime::parse_from_rfc3339(s).is_err() {
                                self.push_error()?;
                            }
                        } else {
                            self.push_error()?;
                        }
                    }

                    // An unrecognized type name constrains nothing; the
                    // schema checker is what reports it.
                    None => {}
                };

                self.pop_schema_token();
            }
            Form::Enum => {
                self.push_schema_token("enum");

                let values: &[String] = schema.enum_.as_deref().unwrap_or(&[]);
                if let Some(s) = instance.as_str() {
                    if !values.iter().any(|value| value == s) {
                        self.push_error()?;
                    }
                } else {
                    self.push_error()?;
                }

                self.pop_schema_token();
            }
            Form::Elements => {
                self.push_schema_token("elements");

                if let Some(arr) = instance.as_array() {
                    if let Some(sub_schema) = &schema.elements {
                        for (i, sub_instance) in arr.iter().enumerate() {
                            self.push_instance_token(&i.to_string());
                            self.validate(root, sub_schema, None, sub_instance)?;
                            self.pop_instance_token();
                        }
                    }
                } else {
                    self.push_error()?;
                }

                self.pop_schema_token();
            }
            Form::Properties => {
                if let Some(obj) = instance.as_object() {
                    self.push_schema_token("properties");
                    if let Some(properties) = &schema.properties {
                        for (name, sub_schema) in properties {
                            self.push_schema_token(name);
                            if let Some(sub_instance) = obj.get(name) {
                                self.push_instance_token(name);
                                self.validate(root, sub_schema, None, sub_instance)?;
                                self.pop_instance_token();
                            } else {
                                self.push_error()?;
                            }
                            self.pop_schema_token();
                        }
                    }
                    self.pop_schema_token();

                    self.push_schema_token("optionalProperties");
                    if let Some(optional_properties) = &schema.optional_properties {
                        for (name, sub_schema) in optional_properties {
                            self.push_schema_token(name);
                            if let Some(sub_instance) = obj.get(name) {
                                self.push_instance_token(name);
                                self.validate(root, sub_schema, None, sub_instance)?;
                                self.pop_instance_token();
                            }
                            self.pop_schema_token();
                        }
                    }
                    self.pop_schema_token();

                    if !schema.additional_properties {
                        for name in obj.keys() {
                            let in_properties = schema
                                .properties
                                .as_ref()
                                .map_or(false, |properties| properties.contains_key(name));
                            let in_optional = schema
                                .optional_properties
                                .as_ref()
                                .map_or(false, |properties| properties.contains_key(name));

                            if parent_tag != Some(name.as_str()) && !in_properties && !in_optional {
                                self.push_instance_token(name);
                                self.push_error()?;
                                self.pop_instance_token();
                            }
                        }
                    }
                } else {
                    self.push_schema_token(if schema.properties.is_some() {
                        "properties"
                    } else {
                        "optionalProperties"
                    });
                    self.push_error()?;
                    self.pop_schema_token();
                }
            }
            Form::Values => {
                self.push_schema_token("values");

                if let Some(obj) = instance.as_object() {
                    if let Some(sub_schema) = &schema.values {
                        for (name, sub_instance) in obj {
                            self.push_instance_token(name);
                            self.validate(root, sub_schema, None, sub_instance)?;
                            self.pop_instance_token();
                        }
                    }
                } else {
                    self.push_error()?;
                }

                self.pop_schema_token();
            }
            Form::Discriminator => {
                let (discriminator, mapping) = match (&schema.discriminator, &schema.mapping) {
                    (Some(discriminator), Some(mapping)) => (discriminator, mapping),
                    _ => return Ok(()),
                };

                if let Some(obj) = instance.as_object() {
                    if let Some(tag) = obj.get(discriminator) {
                        if let Some(tag) = tag.as_str() {
                            if let Some(sub_schema) = mapping.get(tag) {
                                self.push_schema_token("mapping");
                                self.push_schema_token(tag);
                                self.validate(root, sub_schema, Some(discriminator), instance)?;
                                self.pop_schema_token();
                                self.pop_schema_token();
                            } else {
                                self.push_schema_token("mapping");
                                self.push_instance_token(discriminator);
                                self.push_error()?;
                                self.pop_instance_token();
                                self.pop_schema_token();
                            }
                        } else {
                            self.push_schema_token("discriminator");
                            self.push_instance_token(discriminator);
                            self.push_error()?;
                            self.pop_instance_token();
                            self.pop_schema_token();
                        }
                    } else {
                        self.push_schema_token("discriminator");
                        self.push_error()?;
                        self.pop_schema_token();
                    }
                } else {
                    self.push_schema_token("discriminator");
                    self.push_error()?;
                    self.pop_schema_token();
                }
            }
        };

        Ok(())
    }

    fn validate_int(
        &mut self,
        instance: &Value,
        min: f64,
        max: f64,
    ) -> Result<(), VmValidateError> {
        if let Some(val) = instance.as_f64() {
            if val.fract() != 0.0 || val < min || val > max {
                self.push_error()
            } else {
                Ok(())
            }
        } else {
            self.push_error()
        }
    }

    fn push_error(&mut self) -> Result<(), VmValidateError> {
        self.errors.push(ValidationErrorIndicator {
            instance_path: self.instance_tokens.clone(),
            schema_path: self.schema_tokens.last().cloned().unwrap_or_default(),
        });

        if self.max_errors == self.errors.len() {
            Err(VmValidateError::MaxErrorsReached)
        } else {
            Ok(())
        }
    }

    fn push_schema_token(&mut self, token: &str) {
        if let Some(frame) = self.schema_tokens.last_mut() {
            frame.push(token.to_owned());
        }
    }

    fn pop_schema_token(&mut self) {
        if let Some(frame) = self.schema_tokens.last_mut() {
            frame.pop();
        }
    }

    fn push_instance_token(&mut self, token: &str) {
        self.instance_tokens.push(token.to_owned());
    }

    fn pop_instance_token(&mut self) {
        self.instance_tokens.pop();
    }
}
