//! Restricted JSON schema validation
//!
//! Validates tool arguments against a small structural subset of JSON
//! Schema: `string`, `integer`, `number`, `boolean` and `object` types,
//! inclusive `minimum`/`maximum` bounds on numerics, and `required`
//! properties on objects. Schemas are plain `serde_json::Value` trees, the
//! same representation that travels the wire in `tools/list`.
//!
//! Validation is a single depth-first traversal that stops at the first
//! violation; there is no aggregation.

use {
    serde_json::{json, Map, Value},
    std::fmt,
};

/// What went wrong, split into data defects and schema-authoring defects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationErrorKind {
    /// The data value has the wrong JSON type for the schema node
    TypeMismatch,
    /// A `required` property is absent from the data object
    MissingRequired,
    /// A numeric value violates an inclusive `minimum`/`maximum` bound
    OutOfRange,
    /// A property not named in `properties` was rejected. Never produced by
    /// the lenient traversal; reserved for a future strict mode.
    UnknownProperty,
    /// The schema itself is malformed (missing or unsupported `type`)
    InvalidSchema,
}

impl ValidationErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::TypeMismatch => "type_mismatch",
            Self::MissingRequired => "missing_required",
            Self::OutOfRange => "out_of_range",
            Self::UnknownProperty => "unknown_property",
            Self::InvalidSchema => "invalid_schema",
        }
    }
}

/// The first violation found during a validation pass
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub kind: ValidationErrorKind,
    pub message: String,
    /// Dotted location of the offending node, rooted at `"root"`
    pub path: String,
}

impl ValidationError {
    fn new(kind: ValidationErrorKind, message: impl Into<String>, path: &str) -> Self {
        Self {
            kind,
            message: message.into(),
            path: path.to_string(),
        }
    }

    /// Wire representation for a JSON-RPC error's `data` field
    pub fn to_data(&self) -> Value {
        json!({
            "kind": self.kind.as_str(),
            "message": self.message,
            "path": self.path,
        })
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (at {})", self.message, self.path)
    }
}

/// Validate a data value against a schema tree, rooted at path `"root"`.
pub fn validate(data: &Value, schema: &Value) -> Result<(), ValidationError> {
    validate_node(data, schema, "root")
}

/// Validate tool-call arguments against a tool's registered input schema.
///
/// No schema accepts anything, including absent arguments. A schema with
/// absent arguments validates an empty object, so required fields are still
/// enforced.
pub fn validate_tool_arguments(
    arguments: Option<&Value>,
    schema: Option<&Value>,
) -> Result<(), ValidationError> {
    let Some(schema) = schema else {
        return Ok(());
    };
    match arguments {
        Some(arguments) => validate(arguments, schema),
        None => validate(&json!({}), schema),
    }
}

fn validate_node(data: &Value, schema: &Value, path: &str) -> Result<(), ValidationError> {
    let Some(expected) = schema.get("type").and_then(Value::as_str) else {
        return Err(ValidationError::new(
            ValidationErrorKind::InvalidSchema,
            "Schema missing or invalid type",
            path,
        ));
    };

    match expected {
        "string" => {
            if !data.is_string() {
                return Err(ValidationError::new(
                    ValidationErrorKind::TypeMismatch,
                    "Expected string",
                    path,
                ));
            }
        }
        // `integer` and `number` share the numeric check; bounds are
        // inclusive on both ends.
        "integer" | "number" => {
            let Some(value) = data.as_f64() else {
                return Err(ValidationError::new(
                    ValidationErrorKind::TypeMismatch,
                    "Expected number",
                    path,
                ));
            };
            if let Some(minimum) = schema.get("minimum").and_then(Value::as_f64) {
                if value < minimum {
                    return Err(ValidationError::new(
                        ValidationErrorKind::OutOfRange,
                        "Value below minimum",
                        path,
                    ));
                }
            }
            if let Some(maximum) = schema.get("maximum").and_then(Value::as_f64) {
                if value > maximum {
                    return Err(ValidationError::new(
                        ValidationErrorKind::OutOfRange,
                        "Value above maximum",
                        path,
                    ));
                }
            }
        }
        "boolean" => {
            if !data.is_boolean() {
                return Err(ValidationError::new(
                    ValidationErrorKind::TypeMismatch,
                    "Expected boolean",
                    path,
                ));
            }
        }
        "object" => {
            let Some(fields) = data.as_object() else {
                return Err(ValidationError::new(
                    ValidationErrorKind::TypeMismatch,
                    "Expected object",
                    path,
                ));
            };
            return validate_object(fields, schema, path);
        }
        _ => {
            return Err(ValidationError::new(
                ValidationErrorKind::InvalidSchema,
                "Unsupported type in schema",
                path,
            ));
        }
    }

    Ok(())
}

fn validate_object(
    fields: &Map<String, Value>,
    schema: &Value,
    path: &str,
) -> Result<(), ValidationError> {
    // Required fields are reported at the object's own path, not the
    // missing child's.
    if let Some(required) = schema.get("required").and_then(Value::as_array) {
        for name in required.iter().filter_map(Value::as_str) {
            if !fields.contains_key(name) {
                return Err(ValidationError::new(
                    ValidationErrorKind::MissingRequired,
                    format!("Missing required field: {name}"),
                    path,
                ));
            }
        }
    }

    let Some(properties) = schema.get("properties").and_then(Value::as_object) else {
        // No properties declared: any object shape is acceptable
        return Ok(());
    };

    // Lenient superset policy: keys absent from `properties` pass silently
    for (name, value) in fields {
        if let Some(property_schema) = properties.get(name) {
            let child_path = format!("{path}.{name}");
            validate_node(value, property_schema, &child_path)?;
        }
    }

    Ok(())
}

/// Fluent builder for object schemas in the restricted subset.
///
/// Produces the same `Value` trees the validator consumes and that
/// `tools/list` reports as `inputSchema`.
#[derive(Debug, Default)]
pub struct SchemaBuilder {
    properties: Map<String, Value>,
    required: Vec<String>,
}

impl SchemaBuilder {
    /// Start an object schema
    pub fn object() -> Self {
        Self::default()
    }

    /// Add a string property
    pub fn string(self, name: &str, description: Option<&str>, required: bool) -> Self {
        let mut node = json!({"type": "string"});
        if let Some(description) = description {
            node["description"] = json!(description);
        }
        self.property(name, node, required)
    }

    /// Add an integer property with optional inclusive bounds
    pub fn integer(
        self,
        name: &str,
        description: Option<&str>,
        minimum: Option<i64>,
        maximum: Option<i64>,
        required: bool,
    ) -> Self {
        let mut node = json!({"type": "integer"});
        if let Some(description) = description {
            node["description"] = json!(description);
        }
        if let Some(minimum) = minimum {
            node["minimum"] = json!(minimum);
        }
        if let Some(maximum) = maximum {
            node["maximum"] = json!(maximum);
        }
        self.property(name, node, required)
    }

    /// Add a number property with optional inclusive bounds
    pub fn number(
        self,
        name: &str,
        description: Option<&str>,
        minimum: Option<f64>,
        maximum: Option<f64>,
        required: bool,
    ) -> Self {
        let mut node = json!({"type": "number"});
        if let Some(description) = description {
            node["description"] = json!(description);
        }
        if let Some(minimum) = minimum {
            node["minimum"] = json!(minimum);
        }
        if let Some(maximum) = maximum {
            node["maximum"] = json!(maximum);
        }
        self.property(name, node, required)
    }

    /// Add a boolean property
    pub fn boolean(self, name: &str, description: Option<&str>, required: bool) -> Self {
        let mut node = json!({"type": "boolean"});
        if let Some(description) = description {
            node["description"] = json!(description);
        }
        self.property(name, node, required)
    }

    fn property(mut self, name: &str, node: Value, required: bool) -> Self {
        self.properties.insert(name.to_string(), node);
        if required {
            self.required.push(name.to_string());
        }
        self
    }

    /// Finish the schema tree
    pub fn build(self) -> Value {
        json!({
            "type": "object",
            "properties": Value::Object(self.properties),
            "required": self.required,
        })
    }
}
