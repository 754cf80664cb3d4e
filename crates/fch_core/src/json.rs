//! Typed access to edited JSON trees.
//!
//! Absent keys fall back to the caller's default. Present keys must hold the
//! declared type; a mismatch aborts with a `TypeMismatch` naming the key.

use serde_json::{Map as JsonMap, Number, Value as JsonValue};

use crate::core_api::{CoreError, CoreResult};

pub struct JsonFields<'a> {
    what: &'a str,
    map: &'a JsonMap<String, JsonValue>,
}

impl<'a> JsonFields<'a> {
    pub fn new(what: &'a str, value: &'a JsonValue) -> CoreResult<Self> {
        match value {
            JsonValue::Object(map) => Ok(Self { what, map }),
            other => Err(CoreError::type_mismatch(format!(
                "{what} has type {}, expected object",
                type_name(other)
            ))),
        }
    }

    pub fn has(&self, key: &str) -> bool {
        self.map.contains_key(key)
    }

    pub fn value(&self, key: &str) -> Option<&'a JsonValue> {
        self.map.get(key)
    }

    fn mismatch(&self, key: &str, found: &JsonValue, expected: &str) -> CoreError {
        CoreError::type_mismatch(format!(
            "{} key '{key}' has type {}, expected {expected}",
            self.what,
            type_name(found)
        ))
    }

    pub fn get_str(&self, key: &str, default: &str) -> CoreResult<String> {
        match self.map.get(key) {
            None => Ok(default.to_string()),
            Some(JsonValue::String(s)) => Ok(s.clone()),
            Some(other) => Err(self.mismatch(key, other, "string")),
        }
    }

    pub fn get_bool(&self, key: &str, default: bool) -> CoreResult<bool> {
        match self.map.get(key) {
            None => Ok(default),
            Some(JsonValue::Bool(b)) => Ok(*b),
            Some(other) => Err(self.mismatch(key, other, "boolean")),
        }
    }

    pub fn get_i64(&self, key: &str, default: i64) -> CoreResult<i64> {
        match self.map.get(key) {
            None => Ok(default),
            Some(value) => value
                .as_i64()
                .ok_or_else(|| self.mismatch(key, value, "64-bit integer")),
        }
    }

    pub fn get_i32(&self, key: &str, default: i32) -> CoreResult<i32> {
        match self.map.get(key) {
            None => Ok(default),
            Some(value) => value
                .as_i64()
                .and_then(|v| i32::try_from(v).ok())
                .ok_or_else(|| self.mismatch(key, value, "32-bit integer")),
        }
    }

    pub fn get_f32(&self, key: &str, default: f32) -> CoreResult<f32> {
        match self.map.get(key) {
            None => Ok(default),
            Some(value) => f32_from_json(value).ok_or_else(|| self.mismatch(key, value, "number")),
        }
    }

    pub fn get_f32_array<const N: usize>(&self, key: &str, default: [f32; N]) -> CoreResult<[f32; N]> {
        let Some(value) = self.map.get(key) else {
            return Ok(default);
        };
        let items = self.fixed_list(key, value, N)?;
        let mut out = [0f32; N];
        for (slot, item) in out.iter_mut().zip(items) {
            *slot = f32_from_json(item)
                .ok_or_else(|| self.mismatch(key, item, "list of numbers"))?;
        }
        Ok(out)
    }

    pub fn get_i32_array<const N: usize>(&self, key: &str, default: [i32; N]) -> CoreResult<[i32; N]> {
        let Some(value) = self.map.get(key) else {
            return Ok(default);
        };
        let items = self.fixed_list(key, value, N)?;
        let mut out = [0i32; N];
        for (slot, item) in out.iter_mut().zip(items) {
            *slot = item
                .as_i64()
                .and_then(|v| i32::try_from(v).ok())
                .ok_or_else(|| self.mismatch(key, item, "list of 32-bit integers"))?;
        }
        Ok(out)
    }

    fn fixed_list(&self, key: &str, value: &'a JsonValue, count: usize) -> CoreResult<&'a Vec<JsonValue>> {
        let JsonValue::Array(items) = value else {
            return Err(self.mismatch(key, value, "list"));
        };
        if items.len() != count {
            return Err(CoreError::type_mismatch(format!(
                "{} key '{key}' expects a list of {count} elements, got {}",
                self.what,
                items.len()
            )));
        }
        Ok(items)
    }

    pub fn get_str_list(&self, key: &str) -> CoreResult<Vec<String>> {
        let Some(value) = self.map.get(key) else {
            return Ok(Vec::new());
        };
        let JsonValue::Array(items) = value else {
            return Err(self.mismatch(key, value, "list of strings"));
        };
        items
            .iter()
            .map(|item| match item {
                JsonValue::String(s) => Ok(s.clone()),
                other => Err(self.mismatch(key, other, "list of strings")),
            })
            .collect()
    }

    /// Decode each element of a list of records. Absent means empty.
    pub fn get_records<T>(
        &self,
        key: &str,
        mut decode: impl FnMut(&JsonValue) -> CoreResult<T>,
    ) -> CoreResult<Vec<T>> {
        match self.map.get(key) {
            None => Ok(Vec::new()),
            Some(value) => decode_list(&format!("{}.{key}", self.what), value, &mut decode),
        }
    }

    pub fn get_hex(&self, key: &str) -> CoreResult<Vec<u8>> {
        let text = self.get_str(key, "")?;
        hex::decode(&text).map_err(|e| {
            CoreError::type_mismatch(format!(
                "{} key '{key}' is not a hex byte string: {e}",
                self.what
            ))
        })
    }
}

/// Decode a bare JSON list element by element.
pub fn decode_list<T>(
    what: &str,
    value: &JsonValue,
    mut decode: impl FnMut(&JsonValue) -> CoreResult<T>,
) -> CoreResult<Vec<T>> {
    let JsonValue::Array(items) = value else {
        return Err(CoreError::type_mismatch(format!(
            "{what} has type {}, expected list",
            type_name(value)
        )));
    };
    items
        .iter()
        .enumerate()
        .map(|(index, item)| decode(item).map_err(|e| e.context(format!("{what}[{index}]"))))
        .collect()
}

pub fn type_name(value: &JsonValue) -> &'static str {
    match value {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "boolean",
        JsonValue::Number(n) if n.is_f64() => "float",
        JsonValue::Number(_) => "integer",
        JsonValue::String(_) => "string",
        JsonValue::Array(_) => "list",
        JsonValue::Object(_) => "object",
    }
}

/// Shortest decimal that reads back as the same `f32`. Non-finite values
/// become the strings `NaN`, `inf` and `-inf`.
pub fn f32_to_json(v: f32) -> JsonValue {
    if !v.is_finite() {
        return JsonValue::String(v.to_string());
    }
    let shortest: f64 = v.to_string().parse().unwrap_or(f64::from(v));
    Number::from_f64(shortest)
        .map(JsonValue::Number)
        .unwrap_or(JsonValue::Null)
}

pub fn f32_from_json(value: &JsonValue) -> Option<f32> {
    match value {
        JsonValue::Number(n) => n.as_f64().map(|v| v as f32),
        JsonValue::String(s) => match s.as_str() {
            "NaN" => Some(f32::NAN),
            "inf" => Some(f32::INFINITY),
            "-inf" => Some(f32::NEG_INFINITY),
            _ => None,
        },
        _ => None,
    }
}

pub fn f32_list_to_json(values: &[f32]) -> JsonValue {
    JsonValue::Array(values.iter().copied().map(f32_to_json).collect())
}

pub fn str_list_to_json(values: &[String]) -> JsonValue {
    JsonValue::Array(values.iter().cloned().map(JsonValue::String).collect())
}
