// Copyright 2019-2026 Clappity Contributors
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

//! Data context consulted by a render pass.
//!
//! A [`DataContext`] maps identifiers to [`ContextValue`]s. Values are
//! deliberately limited to the three shapes templates can use: a string,
//! a boolean, or an ordered sequence of strings.
//!
//! # Example
//!
//! ```rust
//! use clappity::DataContext;
//!
//! let ctx = DataContext::new()
//!     .with("title", "Home Page")
//!     .with("isUserLoggedIn", false)
//!     .with("itemList", vec!["Item 1", "Item 2"]);
//!
//! assert_eq!(ctx.display("title"), "Home Page");
//! assert!(!ctx.is_truthy("isUserLoggedIn"));
//! assert_eq!(ctx.sequence("itemList").map(|s| s.len()), Some(2));
//! ```

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use crate::error::{ClappityError, Result};

/// A single value stored in a [`DataContext`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ContextValue {
    /// Scalar string.
    Str(String),
    /// Boolean flag.
    Bool(bool),
    /// Ordered sequence of strings, iterated by `for`.
    Seq(Vec<String>),
}

impl ContextValue {
    /// Returns the text inserted by a variable directive.
    ///
    /// `false` renders as nothing, `true` as `true`, and sequences as
    /// their elements joined with `,`.
    pub fn display(&self) -> String {
        match self {
            ContextValue::Str(s) => s.clone(),
            ContextValue::Bool(true) => "true".to_string(),
            ContextValue::Bool(false) => String::new(),
            ContextValue::Seq(items) => items.join(","),
        }
    }

    /// Returns whether an `if` directive treats this value as true.
    ///
    /// A sequence is always true, even when empty.
    pub fn is_truthy(&self) -> bool {
        match self {
            ContextValue::Str(s) => !s.is_empty(),
            ContextValue::Bool(b) => *b,
            ContextValue::Seq(_) => true,
        }
    }

    /// Returns the elements if this value is a sequence.
    pub fn as_sequence(&self) -> Option<&[String]> {
        match self {
            ContextValue::Seq(items) => Some(items),
            _ => None,
        }
    }

    fn from_json_scalar(key: &str, value: &JsonValue) -> Result<String> {
        match value {
            JsonValue::String(s) => Ok(s.clone()),
            JsonValue::Bool(b) => Ok(b.to_string()),
            JsonValue::Number(n) => Ok(n.to_string()),
            JsonValue::Null => Ok(String::new()),
            JsonValue::Array(_) | JsonValue::Object(_) => Err(ClappityError::InvalidContext(
                format!("list '{}' may only contain scalar values", key),
            )),
        }
    }
}

impl From<&str> for ContextValue {
    fn from(value: &str) -> Self {
        ContextValue::Str(value.to_string())
    }
}

impl From<String> for ContextValue {
    fn from(value: String) -> Self {
        ContextValue::Str(value)
    }
}

impl From<bool> for ContextValue {
    fn from(value: bool) -> Self {
        ContextValue::Bool(value)
    }
}

impl<S: Into<String>> From<Vec<S>> for ContextValue {
    fn from(value: Vec<S>) -> Self {
        ContextValue::Seq(value.into_iter().map(Into::into).collect())
    }
}

/// Mapping from identifier to value, read-only during a render.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DataContext {
    values: HashMap<String, ContextValue>,
}

impl DataContext {
    /// Creates an empty context.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a value, builder style.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<ContextValue>) -> Self {
        self.insert(key, value);
        self
    }

    /// Inserts or replaces a value.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<ContextValue>) {
        self.values.insert(key.into(), value.into());
    }

    /// Inserts a value only if the key is not already present.
    pub fn insert_if_absent(&mut self, key: impl Into<String>, value: impl Into<ContextValue>) {
        self.values.entry(key.into()).or_insert_with(|| value.into());
    }

    /// Looks up a value by exact identifier.
    pub fn get(&self, key: &str) -> Option<&ContextValue> {
        self.values.get(key)
    }

    /// Display form of a key, empty when absent.
    pub fn display(&self, key: &str) -> String {
        self.get(key).map(ContextValue::display).unwrap_or_default()
    }

    /// Truthiness of a key, false when absent.
    pub fn is_truthy(&self, key: &str) -> bool {
        self.get(key).is_some_and(ContextValue::is_truthy)
    }

    /// Sequence stored under a key, if it is one.
    pub fn sequence(&self, key: &str) -> Option<&[String]> {
        self.get(key).and_then(ContextValue::as_sequence)
    }

    /// Number of keys.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns true when the context has no keys.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Parses a JSON document into a context.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let value: JsonValue = serde_json::from_str(json)?;
        Self::try_from(value)
    }
}

impl TryFrom<JsonValue> for DataContext {
    type Error = ClappityError;

    /// Converts a JSON object.
    ///
    /// Numbers become their decimal text, `null` entries are dropped,
    /// and arrays must hold scalars only.
    fn try_from(value: JsonValue) -> Result<Self> {
        let JsonValue::Object(map) = value else {
            return Err(ClappityError::InvalidContext(
                "data context must be a JSON object".to_string(),
            ));
        };

        let mut ctx = DataContext::new();
        for (key, value) in map {
            let converted = match &value {
                JsonValue::Null => continue,
                JsonValue::String(s) => ContextValue::Str(s.clone()),
                JsonValue::Bool(b) => ContextValue::Bool(*b),
                JsonValue::Number(n) => ContextValue::Str(n.to_string()),
                JsonValue::Array(items) => ContextValue::Seq(
                    items
                        .iter()
                        .map(|item| ContextValue::from_json_scalar(&key, item))
                        .collect::<Result<Vec<_>>>()?,
                ),
                JsonValue::Object(_) => {
                    return Err(ClappityError::InvalidContext(format!(
                        "key '{}' holds a nested object",
                        key
                    )))
                }
            };
            ctx.values.insert(key, converted);
        }

        Ok(ctx)
    }
}

impl<K: Into<String>, V: Into<ContextValue>> FromIterator<(K, V)> for DataContext {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut ctx = DataContext::new();
        for (k, v) in iter {
            ctx.insert(k, v);
        }
        ctx
    }
}
