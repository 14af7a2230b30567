//! Environment-driven application configuration.
//!
//! [`Config`] is a flat string-keyed mapping loaded from the process
//! environment (or any iterator of key/value pairs). Loading can filter and
//! strip a key prefix, and an optional [`Template`] restricts the loaded keys
//! while applying defaults, required-key checks, and value converters.

use std::collections::BTreeMap;

use lamroute_core::ConfigError;
use serde_json::Value;

/// Interprets a string as a boolean.
///
/// `true`, `t`, `1`, `yes` and `y` (case-insensitive) are true; everything
/// else is false.
pub fn str_to_bool(value: &str) -> bool {
    matches!(
        value.to_ascii_lowercase().as_str(),
        "true" | "t" | "1" | "yes" | "y"
    )
}

type Converter = Box<dyn Fn(&str) -> Result<Value, String> + Send + Sync>;

#[derive(Default)]
struct FieldSpec {
    required: bool,
    default: Option<Value>,
    converter: Option<Converter>,
}

/// Describes which keys to load and how to treat each one.
///
/// A templated load keeps only the keys named here. Defaults apply only when
/// the key is absent from the source; a `required` key that is absent (and has
/// no default) fails the load.
#[derive(Default)]
pub struct Template {
    fields: BTreeMap<String, FieldSpec>,
}

impl Template {
    /// Creates an empty template.
    pub fn new() -> Self {
        Self::default()
    }

    /// Names a key to load as-is.
    pub fn field(mut self, name: impl Into<String>) -> Self {
        self.fields.entry(name.into()).or_default();
        self
    }

    /// Names a key that must be present in the source.
    pub fn required(mut self, name: impl Into<String>) -> Self {
        self.fields.entry(name.into()).or_default().required = true;
        self
    }

    /// Names a key with a fallback value used when the source omits it.
    pub fn default_to(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.entry(name.into()).or_default().default = Some(value.into());
        self
    }

    /// Names a key whose raw string value runs through `convert` on load.
    ///
    /// The converter returns the parsed value or a rejection reason.
    pub fn convert_with(
        mut self,
        name: impl Into<String>,
        convert: impl Fn(&str) -> Result<Value, String> + Send + Sync + 'static,
    ) -> Self {
        self.fields.entry(name.into()).or_default().converter = Some(Box::new(convert));
        self
    }
}

/// A flat configuration mapping.
///
/// The one key the dispatch core itself consults is the event template used by
/// envelope-parsing event constructors; everything else is application-owned.
#[derive(Debug, Clone, Default)]
pub struct Config {
    values: BTreeMap<String, Value>,
}

impl Config {
    /// Creates an empty configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the value under `key`, if any.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    /// Returns the value under `key`, or `default` when absent.
    pub fn get_or<'a>(&'a self, key: &str, default: &'a Value) -> &'a Value {
        self.values.get(key).unwrap_or(default)
    }

    /// Sets `key` to `value`, replacing any earlier entry.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.values.insert(key.into(), value.into());
    }

    /// Whether `key` is present.
    pub fn contains_key(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the configuration is empty.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterates over the configured keys.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    /// Loads from the process environment.
    ///
    /// See [`load_from_iter`](Config::load_from_iter) for `prefix` and
    /// `template` semantics.
    pub fn load_from_env(
        &mut self,
        prefix: Option<&str>,
        template: Option<&Template>,
    ) -> Result<(), ConfigError> {
        self.load_from_iter(std::env::vars(), prefix, template)
    }

    /// Loads key/value pairs from `vars`.
    ///
    /// With a `prefix`, only keys carrying it are loaded and the prefix is
    /// stripped from the stored key. With a `template`, only templated keys
    /// are kept and each field's default/required/converter rules apply; the
    /// prefix filter runs first.
    pub fn load_from_iter(
        &mut self,
        vars: impl IntoIterator<Item = (String, String)>,
        prefix: Option<&str>,
        template: Option<&Template>,
    ) -> Result<(), ConfigError> {
        let mut source: BTreeMap<String, String> = vars
            .into_iter()
            .filter_map(|(key, value)| match prefix {
                Some(prefix) => key.strip_prefix(prefix).map(|rest| (rest.to_string(), value)),
                None => Some((key, value)),
            })
            .collect();

        let Some(template) = template else {
            for (key, value) in source {
                self.values.insert(key, Value::String(value));
            }
            return Ok(());
        };

        for (name, spec) in &template.fields {
            match source.remove(name) {
                Some(raw) => {
                    let value = match &spec.converter {
                        Some(convert) => convert(&raw).map_err(|reason| {
                            ConfigError::InvalidValue {
                                key: name.clone(),
                                reason,
                            }
                        })?,
                        None => Value::String(raw),
                    };
                    self.values.insert(name.clone(), value);
                }
                None => {
                    if let Some(default) = &spec.default {
                        self.values.insert(name.clone(), default.clone());
                    } else if spec.required {
                        return Err(ConfigError::MissingKey(name.clone()));
                    }
                }
            }
        }
        Ok(())
    }
}
