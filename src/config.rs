//! Experiment configuration persistence
//!
//! This module provides [`Config`], a flat set of named configuration values
//! (learning rate, batch size, run name, ...) that can be loaded from and dumped
//! to JSON files. Train and eval configs share the same type; the schema is
//! whatever keys happen to be present.
//!
//! Serialization always sorts object keys and uses 2-space indentation, so two
//! dumps of the same config are byte-identical and diff cleanly between runs.

use crate::error::ConfigError;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};
use std::fmt;
use std::fs;
use std::path::Path;
use tracing::debug;

/// A flat mapping of configuration keys to JSON values.
///
/// Values are read through explicit typed getters rather than dynamic
/// attributes, so a misspelled key fails loudly with
/// [`ConfigError::MissingKey`] instead of silently yielding nothing. Any key is
/// accepted, since there are no reserved attribute names to collide with.
///
/// For experiments with a fixed schema, convert to and from a typed struct with
/// [`Config::from_serializable`] and [`Config::deserialize_into`].
///
/// # Example
///
/// ```json
/// {
///   "batch_size": 32,
///   "lr": 0.001,
///   "run_name": "mnist_baseline"
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Config {
    attrs: Map<String, Value>,
}

impl Config {
    /// Creates a config holding exactly `attrs`.
    pub fn new(attrs: Map<String, Value>) -> Self {
        Self { attrs }
    }

    /// Creates a config from an arbitrary JSON value.
    ///
    /// # Returns
    ///
    /// `Err(ConfigError::NotAnObject)` if `value` is not a JSON object.
    pub fn from_value(value: Value) -> Result<Self, ConfigError> {
        match value {
            Value::Object(attrs) => Ok(Self::new(attrs)),
            _ => Err(ConfigError::NotAnObject {
                origin: "config value".to_string(),
            }),
        }
    }

    /// Builds a config from any serializable struct whose JSON form is an object.
    pub fn from_serializable<T: Serialize>(value: &T) -> Result<Self, ConfigError> {
        Self::from_value(serde_json::to_value(value)?)
    }

    /// Converts the config into a typed struct.
    ///
    /// Unknown keys are ignored unless `T` opts into `deny_unknown_fields`.
    pub fn deserialize_into<T: DeserializeOwned>(&self) -> Result<T, ConfigError> {
        Ok(serde_json::from_value(Value::Object(self.attrs.clone()))?)
    }

    /// Loads a config from a JSON file.
    ///
    /// Reads the file at `path` and parses its contents, which must be a single
    /// JSON object.
    ///
    /// # Returns
    ///
    /// `Ok(Config)` on success, `ConfigError::Io` if the file cannot be read,
    /// `ConfigError::Parse` if it is not valid JSON, or
    /// `ConfigError::NotAnObject` if the top level is not an object.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use train_utils::config::Config;
    ///
    /// let cfg = Config::load("configs/train.json").unwrap();
    /// let lr = cfg.get_f64("lr").unwrap();
    /// ```
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let value: Value =
            serde_json::from_str(&contents).map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })?;

        match value {
            Value::Object(attrs) => {
                debug!(path = %path.display(), keys = attrs.len(), "loaded config");
                Ok(Self::new(attrs))
            }
            _ => Err(ConfigError::NotAnObject {
                origin: format!("config file {}", path.display()),
            }),
        }
    }

    /// Writes the config to `path` as sorted, indented JSON plus a trailing newline.
    ///
    /// Missing parent directories are created first, and the destination
    /// directory is announced on stdout. A bare file name is written to the
    /// current directory.
    pub fn dump<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let path = path.as_ref();
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        if !dir.exists() {
            fs::create_dir_all(dir).map_err(|source| ConfigError::Io {
                path: dir.to_path_buf(),
                source,
            })?;
        }
        println!("Results will be stored in: {}", dir.display());

        let mut contents = self.to_pretty_string();
        contents.push('\n');
        fs::write(path, contents).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        debug!(path = %path.display(), keys = self.attrs.len(), "dumped config");
        Ok(())
    }

    /// Returns the same text [`Config::dump`] writes, without the trailing newline.
    pub fn to_pretty_string(&self) -> String {
        self.to_string()
    }

    /// Returns the raw value stored under `key`.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.attrs.get(key)
    }

    fn require(&self, key: &str) -> Result<&Value, ConfigError> {
        self.attrs
            .get(key)
            .ok_or_else(|| ConfigError::MissingKey(key.to_string()))
    }

    /// Reads a number. Integers are widened to `f64`.
    pub fn get_f64(&self, key: &str) -> Result<f64, ConfigError> {
        self.require(key)?
            .as_f64()
            .ok_or_else(|| mismatch(key, "number"))
    }

    /// Reads a signed integer. Floats such as `3.0` are rejected.
    pub fn get_i64(&self, key: &str) -> Result<i64, ConfigError> {
        self.require(key)?
            .as_i64()
            .ok_or_else(|| mismatch(key, "integer"))
    }

    /// Reads a non-negative integer.
    pub fn get_u64(&self, key: &str) -> Result<u64, ConfigError> {
        self.require(key)?
            .as_u64()
            .ok_or_else(|| mismatch(key, "unsigned integer"))
    }

    pub fn get_bool(&self, key: &str) -> Result<bool, ConfigError> {
        self.require(key)?
            .as_bool()
            .ok_or_else(|| mismatch(key, "boolean"))
    }

    pub fn get_str(&self, key: &str) -> Result<&str, ConfigError> {
        self.require(key)?
            .as_str()
            .ok_or_else(|| mismatch(key, "string"))
    }

    /// Reads `key` as `T`, falling back to `default` when the key is absent.
    ///
    /// A present value that does not convert to `T` is still an error.
    pub fn get_or<T: DeserializeOwned>(&self, key: &str, default: T) -> Result<T, ConfigError> {
        match self.attrs.get(key) {
            None => Ok(default),
            Some(value) => serde_json::from_value(value.clone())
                .map_err(|_| mismatch(key, std::any::type_name::<T>())),
        }
    }

    /// Sets `key`, returning the previous value if there was one.
    pub fn set<K: Into<String>, V: Into<Value>>(&mut self, key: K, value: V) -> Option<Value> {
        self.attrs.insert(key.into(), value.into())
    }

    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.attrs.remove(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.attrs.contains_key(key)
    }

    /// Keys in sorted order.
    pub fn keys(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = self.attrs.keys().map(String::as_str).collect();
        keys.sort_unstable();
        keys
    }

    pub fn len(&self) -> usize {
        self.attrs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attrs.is_empty()
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.attrs
    }

    pub fn into_map(self) -> Map<String, Value> {
        self.attrs
    }
}

impl From<Map<String, Value>> for Config {
    fn from(attrs: Map<String, Value>) -> Self {
        Self::new(attrs)
    }
}

impl fmt::Display for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sorted = sort_keys(&Value::Object(self.attrs.clone()));
        let text = serde_json::to_string_pretty(&sorted).map_err(|_| fmt::Error)?;
        f.write_str(&text)
    }
}

fn mismatch(key: &str, expected: &'static str) -> ConfigError {
    ConfigError::TypeMismatch {
        key: key.to_string(),
        expected,
    }
}

/// Rebuilds `value` with every object's keys in ascending order.
///
/// `serde_json::Map` only sorts on its own when the `preserve_order` feature
/// is off, and any crate in the dependency graph can turn it on.
fn sort_keys(value: &Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut entries: Vec<(&String, &Value)> = map.iter().collect();
            entries.sort_by(|a, b| a.0.cmp(b.0));
            Value::Object(
                entries
                    .into_iter()
                    .map(|(k, v)| (k.clone(), sort_keys(v)))
                    .collect(),
            )
        }
        Value::Array(items) => Value::Array(items.iter().map(sort_keys).collect()),
        other => other.clone(),
    }
}
