//! Tool descriptors, parameter schemas and validated arguments.

use std::sync::Arc;

use serde::Serialize;
use serde_json::{Map, Number, Value};

use super::error::ToolError;

/// JSON object type used for schemas and argument maps.
pub type JsonObject = Map<String, Value>;

/// Declared type of a tool parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ParamType {
    String,
    Number,
    Integer,
    Boolean,
}

impl ParamType {
    /// The JSON Schema type name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Number => "number",
            Self::Integer => "integer",
            Self::Boolean => "boolean",
        }
    }

    /// Best-effort coercion of a JSON value to this type.
    ///
    /// Returns `None` when the value cannot represent this type.
    pub fn coerce(self, value: &Value) -> Option<Value> {
        match (self, value) {
            (Self::String, Value::String(_)) => Some(value.clone()),
            (Self::String, Value::Number(n)) => Some(Value::String(n.to_string())),
            (Self::String, Value::Bool(b)) => Some(Value::String(b.to_string())),

            (Self::Number, Value::Number(_)) => Some(value.clone()),
            (Self::Number, Value::String(s)) => s
                .trim()
                .parse::<f64>()
                .ok()
                .and_then(Number::from_f64)
                .map(Value::Number),

            (Self::Integer, Value::Number(n)) => n
                .as_i64()
                .or_else(|| {
                    n.as_f64()
                        // i64::MAX as f64 rounds up to 2^63, which does not fit.
                        .filter(|f| f.fract() == 0.0 && f.abs() < i64::MAX as f64)
                        .map(|f| f as i64)
                })
                .map(Value::from),
            (Self::Integer, Value::String(s)) => s.trim().parse::<i64>().ok().map(Value::from),

            (Self::Boolean, Value::Bool(_)) => Some(value.clone()),
            (Self::Boolean, Value::String(s)) => match s.trim().to_ascii_lowercase().as_str() {
                "true" => Some(Value::Bool(true)),
                "false" => Some(Value::Bool(false)),
                _ => None,
            },

            _ => None,
        }
    }
}

/// Schema of a single tool parameter.
#[derive(Debug, Clone, Serialize)]
pub struct ParamSpec {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: ParamType,
    pub required: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
    pub description: String,
}

impl ParamSpec {
    /// A parameter the caller must supply.
    pub fn required(name: impl Into<String>, kind: ParamType, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind,
            required: true,
            default: None,
            description: description.into(),
        }
    }

    /// A parameter the caller may omit.
    pub fn optional(name: impl Into<String>, kind: ParamType, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind,
            required: false,
            default: None,
            description: description.into(),
        }
    }

    /// Value used when the parameter is omitted.
    pub fn with_default(mut self, default: impl Into<Value>) -> Self {
        self.default = Some(default.into());
        self
    }
}

/// Metadata describing a registered tool.
///
/// Created at registration time and never mutated afterwards.
#[derive(Debug, Clone)]
pub struct ToolDescriptor {
    name: String,
    description: String,
    params: Vec<ParamSpec>,
    output_schema: Option<Arc<JsonObject>>,
}

impl ToolDescriptor {
    /// Create a descriptor with no parameters.
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            params: Vec::new(),
            output_schema: None,
        }
    }

    /// Add a parameter.
    pub fn param(mut self, spec: ParamSpec) -> Self {
        self.params.push(spec);
        self
    }

    /// Attach a JSON Schema describing the structured output.
    pub fn with_output_schema(mut self, schema: Arc<JsonObject>) -> Self {
        self.output_schema = Some(schema);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn params(&self) -> &[ParamSpec] {
        &self.params
    }

    pub fn output_schema(&self) -> Option<&Arc<JsonObject>> {
        self.output_schema.as_ref()
    }

    /// Render the parameter list as a JSON Schema object.
    pub fn input_schema(&self) -> JsonObject {
        let mut properties = JsonObject::new();
        let mut required = Vec::new();

        for param in &self.params {
            let mut property = JsonObject::new();
            property.insert("type".into(), param.kind.as_str().into());
            property.insert("description".into(), param.description.clone().into());
            if let Some(default) = &param.default {
                property.insert("default".into(), default.clone());
            }
            properties.insert(param.name.clone(), Value::Object(property));

            if param.required {
                required.push(Value::String(param.name.clone()));
            }
        }

        let mut schema = JsonObject::new();
        schema.insert("type".into(), "object".into());
        schema.insert("properties".into(), Value::Object(properties));
        schema.insert("required".into(), Value::Array(required));
        schema.insert("additionalProperties".into(), Value::Bool(false));
        schema
    }

    /// Validate raw arguments against the parameter schema.
    ///
    /// Unknown parameter names are rejected. `null` counts as absent.
    /// Omitted optional parameters take their default, if any.
    pub fn validate(&self, raw: &Value) -> Result<Arguments, ToolError> {
        let empty = JsonObject::new();
        let supplied = match raw {
            Value::Object(map) => map,
            Value::Null => &empty,
            other => {
                return Err(ToolError::invalid_argument(
                    "arguments",
                    format!("expected a JSON object, got {}", json_type_name(other)),
                ));
            }
        };

        if let Some(unknown) = supplied
            .keys()
            .find(|key| !self.params.iter().any(|p| &p.name == *key))
        {
            return Err(ToolError::invalid_argument(
                unknown.as_str(),
                format!("'{}' does not accept this parameter", self.name),
            ));
        }

        let mut values = JsonObject::new();
        for param in &self.params {
            match supplied.get(&param.name).filter(|v| !v.is_null()) {
                Some(value) => {
                    let coerced = param.kind.coerce(value).ok_or_else(|| {
                        ToolError::invalid_argument(
                            param.name.as_str(),
                            format!(
                                "expected {}, got {}",
                                param.kind.as_str(),
                                json_type_name(value)
                            ),
                        )
                    })?;
                    values.insert(param.name.clone(), coerced);
                }
                None if param.required => {
                    return Err(ToolError::missing_argument(param.name.as_str()));
                }
                None => {
                    if let Some(default) = &param.default {
                        values.insert(param.name.clone(), default.clone());
                    }
                }
            }
        }

        Ok(Arguments { values })
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Arguments that passed schema validation, with typed accessors.
#[derive(Debug, Clone, Default)]
pub struct Arguments {
    values: JsonObject,
}

impl Arguments {
    /// Wrap an already-validated argument map.
    pub fn new(values: JsonObject) -> Self {
        Self { values }
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    /// Get a required string argument.
    pub fn str(&self, name: &str) -> Result<&str, ToolError> {
        self.opt_str(name)?
            .ok_or_else(|| ToolError::missing_argument(name))
    }

    /// Get an optional string argument.
    pub fn opt_str(&self, name: &str) -> Result<Option<&str>, ToolError> {
        match self.values.get(name) {
            None => Ok(None),
            Some(Value::String(s)) => Ok(Some(s)),
            Some(_) => Err(ToolError::invalid_argument(name, "expected string")),
        }
    }

    /// Get a required numeric argument.
    pub fn f64(&self, name: &str) -> Result<f64, ToolError> {
        match self.values.get(name) {
            None => Err(ToolError::missing_argument(name)),
            Some(value) => value
                .as_f64()
                .ok_or_else(|| ToolError::invalid_argument(name, "expected number")),
        }
    }

    /// Get a required integer argument.
    pub fn i64(&self, name: &str) -> Result<i64, ToolError> {
        match self.values.get(name) {
            None => Err(ToolError::missing_argument(name)),
            Some(value) => value
                .as_i64()
                .ok_or_else(|| ToolError::invalid_argument(name, "expected integer")),
        }
    }

    /// Get a required boolean argument.
    pub fn bool(&self, name: &str) -> Result<bool, ToolError> {
        match self.values.get(name) {
            None => Err(ToolError::missing_argument(name)),
            Some(value) => value
                .as_bool()
                .ok_or_else(|| ToolError::invalid_argument(name, "expected boolean")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::tools::ErrorKind;
    use serde_json::json;

    fn descriptor() -> ToolDescriptor {
        ToolDescriptor::new("demo", "A demo tool")
            .param(ParamSpec::required("text", ParamType::String, "Input text"))
            .param(ParamSpec::optional("count", ParamType::Integer, "Repeat count").with_default(1))
            .param(ParamSpec::optional("ratio", ParamType::Number, "A ratio"))
            .param(ParamSpec::optional("loud", ParamType::Boolean, "Shout"))
    }

    #[test]
    fn test_input_schema() {
        let schema = Value::Object(descriptor().input_schema());
        assert_eq!(schema["type"], "object");
        assert_eq!(schema["properties"]["text"]["type"], "string");
        assert_eq!(schema["properties"]["count"]["default"], 1);
        assert_eq!(schema["required"], json!(["text"]));
        assert_eq!(schema["additionalProperties"], false);
    }

    #[test]
    fn test_validate_fills_defaults() {
        let args = descriptor().validate(&json!({ "text": "hi" })).unwrap();
        assert_eq!(args.str("text").unwrap(), "hi");
        assert_eq!(args.i64("count").unwrap(), 1);
        assert!(!args.contains("ratio"));
    }

    #[test]
    fn test_validate_missing_required() {
        let err = descriptor().validate(&json!({ "count": 2 })).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingArgumentError);

        let err = descriptor().validate(&json!({ "text": null })).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingArgumentError);
    }

    #[test]
    fn test_validate_rejects_unknown_parameters() {
        let err = descriptor()
            .validate(&json!({ "text": "hi", "colour": "red" }))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgumentError);
        assert!(err.to_string().contains("colour"));
    }

    #[test]
    fn test_validate_coerces_types() {
        let args = descriptor()
            .validate(&json!({ "text": 42, "count": "3", "ratio": "0.5", "loud": "TRUE" }))
            .unwrap();
        assert_eq!(args.str("text").unwrap(), "42");
        assert_eq!(args.i64("count").unwrap(), 3);
        assert_eq!(args.f64("ratio").unwrap(), 0.5);
        assert!(args.bool("loud").unwrap());

        let args = descriptor()
            .validate(&json!({ "text": "x", "count": 4.0 }))
            .unwrap();
        assert_eq!(args.i64("count").unwrap(), 4);
    }

    #[test]
    fn test_validate_rejects_wrong_types() {
        for bad in [
            json!({ "text": "x", "count": "three" }),
            json!({ "text": "x", "count": 2.5 }),
            json!({ "text": "x", "ratio": [1] }),
            json!({ "text": "x", "loud": "maybe" }),
            json!({ "text": { "nested": true } }),
        ] {
            let err = descriptor().validate(&bad).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::InvalidArgumentError, "{}", bad);
        }
    }

    #[test]
    fn test_integer_coercion_stays_in_range() {
        let two_pow_63 = 9_223_372_036_854_775_808.0_f64;
        for bad in [json!(two_pow_63), json!(-two_pow_63), json!(9_223_372_036_854_775_808_u64)] {
            let err = descriptor()
                .validate(&json!({ "text": "x", "count": bad }))
                .unwrap_err();
            assert_eq!(err.kind(), ErrorKind::InvalidArgumentError, "{}", bad);
        }

        let args = descriptor()
            .validate(&json!({ "text": "x", "count": 9_007_199_254_740_992.0_f64 }))
            .unwrap();
        assert_eq!(args.i64("count").unwrap(), 9_007_199_254_740_992);
    }

    #[test]
    fn test_validate_non_object_arguments() {
        let err = descriptor().validate(&json!([1, 2])).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgumentError);

        let err = descriptor().validate(&Value::Null).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingArgumentError);
    }
}
