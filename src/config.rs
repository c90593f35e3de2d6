//! Filter configuration schema.
//!
//! Every filter publishes a [`Descriptor`]: an ordered list of human-readable
//! parameter labels, each with a [`ParamSpec`] saying what kind of value it
//! takes, its default and its valid range. UI layers render controls from it,
//! and constructors resolve user-supplied [`Params`] against it.
//!
//! ## JSON Shape
//!
//! ```json
//! {
//!   "Horizontal": {"type": "double", "default": 1.0, "range": [0.1, 10.0], "step_size": 0.1, "input": true},
//!   "Pad and Crop": {"type": "constant", "value": true}
//! }
//! ```
//!
//! ## Keys
//!
//! Labels map to constructor keys by lower-casing and replacing spaces with
//! underscores, so "Pad and Crop" is addressed as `pad_and_crop`.

use serde::de::DeserializeOwned;
use serde::ser::{Serialize, Serializer};
use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::debug;

use crate::error::{FilterError, Result};

/// Normalize a parameter label or key to its constructor key.
pub fn param_key(label: &str) -> String {
    label.trim().to_lowercase().replace([' ', '-'], "_")
}

/// Kind of value a parameter accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParamType {
    Boolean,
    Double,
    /// Fixed value, not adjustable from a UI.
    Constant,
    /// Opaque capture device identifier.
    Device,
}

/// Specification record for one parameter.
#[derive(Debug, Clone, PartialEq, serde::Serialize, Deserialize)]
pub struct ParamSpec {
    #[serde(rename = "type")]
    pub kind: ParamType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
    /// Inclusive `[min, max]` for numeric parameters.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub range: Option<[f64; 2]>,
    /// Quantization granularity for UI controls.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub step_size: Option<f64>,
    /// Runtime-adjustable from the UI.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub input: bool,
    /// Fixed value of a constant parameter.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
}

impl ParamSpec {
    fn of_kind(kind: ParamType) -> Self {
        ParamSpec {
            kind,
            default: None,
            range: None,
            step_size: None,
            input: false,
            value: None,
        }
    }

    pub fn boolean(default: bool) -> Self {
        ParamSpec {
            default: Some(Value::Bool(default)),
            ..Self::of_kind(ParamType::Boolean)
        }
    }

    /// Adjustable double bounded by the inclusive range `[min, max]`.
    pub fn double(default: f64, min: f64, max: f64, step_size: f64) -> Self {
        ParamSpec {
            default: Some(Value::from(default)),
            range: Some([min, max]),
            step_size: Some(step_size),
            input: true,
            ..Self::of_kind(ParamType::Double)
        }
    }

    pub fn constant<V: Into<Value>>(value: V) -> Self {
        ParamSpec {
            value: Some(value.into()),
            ..Self::of_kind(ParamType::Constant)
        }
    }

    pub fn device() -> Self {
        Self::of_kind(ParamType::Device)
    }

    /// Value used when the caller supplies nothing.
    pub fn fallback(&self) -> Option<&Value> {
        self.default.as_ref().or(self.value.as_ref())
    }

    /// Check a supplied value against this spec. Values are never clamped.
    pub fn check(&self, key: &str, value: &Value) -> Result<()> {
        match self.kind {
            ParamType::Boolean => {
                if !value.is_boolean() {
                    return Err(FilterError::invalid_parameter(
                        key,
                        format!("expected a boolean, got {value}"),
                    ));
                }
            }
            ParamType::Double => {
                let v = value.as_f64().ok_or_else(|| {
                    FilterError::invalid_parameter(key, format!("expected a number, got {value}"))
                })?;
                if let Some([min, max]) = self.range {
                    if !(min..=max).contains(&v) {
                        return Err(FilterError::invalid_parameter(
                            key,
                            format!("{v} is outside [{min}, {max}]"),
                        ));
                    }
                }
            }
            ParamType::Device => {
                if !(value.is_u64() || value.is_i64() || value.is_string()) {
                    return Err(FilterError::invalid_parameter(
                        key,
                        format!("expected a device index or path, got {value}"),
                    ));
                }
            }
            ParamType::Constant => {}
        }
        Ok(())
    }
}

/// Ordered parameter schema of one filter.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Descriptor {
    params: Vec<(String, ParamSpec)>,
}

impl Descriptor {
    pub fn new() -> Self {
        Descriptor { params: Vec::new() }
    }

    /// Append a parameter under its human-readable label.
    pub fn with<L: Into<String>>(mut self, label: L, spec: ParamSpec) -> Self {
        self.params.push((label.into(), spec));
        self
    }

    pub fn len(&self) -> usize {
        self.params.len()
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    /// Iterate `(label, spec)` pairs in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ParamSpec)> {
        self.params.iter().map(|(label, spec)| (label.as_str(), spec))
    }

    /// Look up a parameter by label or constructor key.
    pub fn get(&self, key: &str) -> Option<&ParamSpec> {
        let key = param_key(key);
        self.params
            .iter()
            .find(|(label, _)| param_key(label) == key)
            .map(|(_, spec)| spec)
    }

    /// Verify that adjustable parameters carry a default inside their range.
    pub fn validate_schema(&self) -> Result<()> {
        for (label, spec) in &self.params {
            if !spec.input {
                continue;
            }
            let default = spec.default.as_ref().ok_or_else(|| {
                FilterError::invalid_parameter(label.as_str(), "adjustable parameter has no default")
            })?;
            if spec.kind == ParamType::Double && spec.range.is_none() {
                return Err(FilterError::invalid_parameter(
                    label.as_str(),
                    "adjustable numeric parameter has no range",
                ));
            }
            spec.check(label, default)?;
        }
        Ok(())
    }

    /// Check one value against the parameter registered under `key`.
    pub fn check(&self, key: &str, value: &Value) -> Result<()> {
        let spec = self
            .get(key)
            .ok_or_else(|| FilterError::invalid_parameter(key, "unknown parameter"))?;
        spec.check(key, value)
    }

    /// Check a typed numeric value, rejecting non-finite input.
    pub fn check_number(&self, key: &str, value: f64) -> Result<()> {
        if !value.is_finite() {
            return Err(FilterError::invalid_parameter(
                key,
                format!("{value} is not a finite number"),
            ));
        }
        self.check(key, &Value::from(value))
    }

    /// Resolve supplied parameters into a complete map keyed by constructor key.
    ///
    /// Missing parameters take the default (or the constant's value); a
    /// parameter with neither is required.
    pub fn resolve(&self, params: &Params) -> Result<Map<String, Value>> {
        let mut resolved = Map::new();
        for (label, spec) in &self.params {
            let key = param_key(label);
            let value = match params.get(&key).or_else(|| spec.fallback()) {
                Some(value) => value.clone(),
                None => {
                    return Err(FilterError::invalid_parameter(
                        key,
                        "required parameter is missing",
                    ))
                }
            };
            spec.check(&key, &value)?;
            resolved.insert(key, value);
        }

        for key in params.keys() {
            if !resolved.contains_key(key) {
                debug!(parameter = %key, "ignoring parameter not declared by descriptor");
            }
        }

        Ok(resolved)
    }

    /// Resolve and deserialize into a typed parameter struct.
    pub fn resolve_into<T: DeserializeOwned>(&self, params: &Params) -> Result<T> {
        let resolved = self.resolve(params)?;
        serde_json::from_value(Value::Object(resolved))
            .map_err(|e| FilterError::invalid_parameter("parameters", e.to_string()))
    }
}

impl Serialize for Descriptor {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_map(self.params.iter().map(|(label, spec)| (label, spec)))
    }
}

/// Parameter values supplied by the caller.
///
/// Keys are normalized with [`param_key`] on the way in.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, Deserialize)]
#[serde(from = "Map<String, Value>")]
pub struct Params(Map<String, Value>);

impl Params {
    pub fn new() -> Self {
        Params(Map::new())
    }

    /// Builder-style insert.
    pub fn with<K: AsRef<str>, V: Into<Value>>(mut self, key: K, value: V) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert<K: AsRef<str>, V: Into<Value>>(&mut self, key: K, value: V) {
        self.0.insert(param_key(key.as_ref()), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(&param_key(key))
    }

    pub fn contains(&self, key: &str) -> bool {
        self.0.contains_key(&param_key(key))
    }

    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.0.keys()
    }

    /// Parse a JSON object of parameter values.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json)
            .map_err(|e| FilterError::invalid_parameter("parameters", e.to_string()))
    }
}

impl From<Map<String, Value>> for Params {
    fn from(map: Map<String, Value>) -> Self {
        Params(
            map.into_iter()
                .map(|(key, value)| (param_key(&key), value))
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn zoom_like() -> Descriptor {
        Descriptor::new()
            .with("Horizontal", ParamSpec::double(1.0, 0.1, 10.0, 0.1))
            .with("Mirror", ParamSpec::boolean(false))
            .with("Pad and Crop", ParamSpec::constant(true))
    }

    #[test]
    fn test_param_key_normalizes_labels() {
        assert_eq!(param_key("Pad and Crop"), "pad_and_crop");
        assert_eq!(param_key("horizontal"), "horizontal");
    }

    #[test]
    fn test_descriptor_json_shape() {
        let value = serde_json::to_value(zoom_like()).unwrap();
        assert_eq!(
            value,
            json!({
                "Horizontal": {"type": "double", "default": 1.0, "range": [0.1, 10.0], "step_size": 0.1, "input": true},
                "Mirror": {"type": "boolean", "default": false},
                "Pad and Crop": {"type": "constant", "value": true},
            })
        );
    }

    #[test]
    fn test_resolve_fills_defaults() {
        let resolved = zoom_like().resolve(&Params::new()).unwrap();
        assert_eq!(resolved["horizontal"], json!(1.0));
        assert_eq!(resolved["mirror"], json!(false));
        assert_eq!(resolved["pad_and_crop"], json!(true));
    }

    #[test]
    fn test_resolve_accepts_labels_as_keys() {
        let params = Params::new().with("Horizontal", 2.5);
        let resolved = zoom_like().resolve(&params).unwrap();
        assert_eq!(resolved["horizontal"], json!(2.5));
    }

    #[test]
    fn test_resolve_rejects_out_of_range() {
        let params = Params::new().with("horizontal", 0.05);
        let err = zoom_like().resolve(&params).unwrap_err();
        assert!(matches!(err, FilterError::InvalidParameter { ref name, .. } if name == "horizontal"));
    }

    #[test]
    fn test_resolve_rejects_wrong_type() {
        let params = Params::new().with("mirror", "yes");
        assert!(zoom_like().resolve(&params).is_err());
    }

    #[test]
    fn test_resolve_requires_device() {
        let descriptor = Descriptor::new().with("Device", ParamSpec::device());
        let err = descriptor.resolve(&Params::new()).unwrap_err();
        assert!(matches!(err, FilterError::InvalidParameter { .. }));

        let resolved = descriptor.resolve(&Params::new().with("device", 0)).unwrap();
        assert_eq!(resolved["device"], json!(0));
    }

    #[test]
    fn test_validate_schema() {
        assert!(zoom_like().validate_schema().is_ok());

        let mut broken = ParamSpec::double(20.0, 0.1, 10.0, 0.1);
        assert!(Descriptor::new()
            .with("Scale", broken.clone())
            .validate_schema()
            .is_err());

        broken.default = None;
        assert!(Descriptor::new().with("Scale", broken).validate_schema().is_err());
    }

    #[test]
    fn test_check_number_rejects_nan() {
        assert!(zoom_like().check_number("horizontal", f64::NAN).is_err());
        assert!(zoom_like().check_number("horizontal", 10.0).is_ok());
    }

    #[test]
    fn test_params_from_json_normalizes_keys() {
        let params = Params::from_json(r#"{"Pad and Crop": false, "Horizontal": 2}"#).unwrap();
        assert_eq!(params.get("pad_and_crop"), Some(&json!(false)));
        assert!(params.contains("horizontal"));
    }
}
