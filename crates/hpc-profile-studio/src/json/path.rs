//! Ordered field paths and their resolution.
//!
//! A path is walked one key at a time. The first key that is not present
//! stops the walk; [`resolve`] logs which prefix failed and returns `None`
//! instead of raising.

use crate::utils::error::FieldError;
use log::warn;
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

/// A single step in a field path
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FieldKey {
    /// Object key. Also indexes arrays when it parses as an integer.
    Name(String),
    /// Array position. Also matches the object key of the same spelling.
    Index(usize),
}

impl FieldKey {
    /// Step from `current` into the child named by this key
    fn step<'a>(&self, current: &'a Value) -> Option<&'a Value> {
        match (self, current) {
            (FieldKey::Name(name), Value::Object(map)) => map.get(name),
            (FieldKey::Name(name), Value::Array(items)) => {
                name.parse::<usize>().ok().and_then(|i| items.get(i))
            }
            (FieldKey::Index(i), Value::Array(items)) => items.get(*i),
            (FieldKey::Index(i), Value::Object(map)) => map.get(&i.to_string()),
            _ => None,
        }
    }
}

impl fmt::Display for FieldKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldKey::Name(name) => write!(f, "{}", name),
            FieldKey::Index(i) => write!(f, "{}", i),
        }
    }
}

impl From<&str> for FieldKey {
    fn from(name: &str) -> Self {
        FieldKey::Name(name.to_string())
    }
}

impl From<String> for FieldKey {
    fn from(name: String) -> Self {
        FieldKey::Name(name)
    }
}

impl From<usize> for FieldKey {
    fn from(index: usize) -> Self {
        FieldKey::Index(index)
    }
}

/// Ordered list of keys identifying a location inside a document
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct FieldPath(Vec<FieldKey>);

impl FieldPath {
    pub fn new(keys: Vec<FieldKey>) -> Self {
        Self(keys)
    }

    pub fn keys(&self) -> &[FieldKey] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Last key of the path, used as a default label
    pub fn last(&self) -> Option<&FieldKey> {
        self.0.last()
    }

    /// Return a copy of this path extended by one key
    pub fn join(&self, key: impl Into<FieldKey>) -> Self {
        let mut keys = self.0.clone();
        keys.push(key.into());
        Self(keys)
    }
}

impl<K: Into<FieldKey>> FromIterator<K> for FieldPath {
    fn from_iter<I: IntoIterator<Item = K>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

impl<K: Into<FieldKey> + Clone> From<&[K]> for FieldPath {
    fn from(keys: &[K]) -> Self {
        keys.iter().cloned().collect()
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.0.iter().map(|k| k.to_string()).collect();
        write!(f, "{}", parts.join(", "))
    }
}

/// Parse a comma separated path such as `"data, overview, cpu, percent"`
impl FromStr for FieldPath {
    type Err = FieldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let keys: Vec<FieldKey> = s
            .split(',')
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .map(FieldKey::from)
            .collect();

        if keys.is_empty() {
            return Err(FieldError::EmptyPath);
        }

        Ok(Self(keys))
    }
}

/// Walk `path` through `doc`
///
/// **Public** - strict form of [`resolve`], used by the typed schema views
///
/// # Errors
/// * `FieldError::Missing` - names the keys that were found and the one that was not
/// * `FieldError::EmptyPath` - the path has no keys
pub fn lookup<'a>(doc: &'a Value, path: &FieldPath) -> Result<&'a Value, FieldError> {
    if path.is_empty() {
        return Err(FieldError::EmptyPath);
    }

    let mut current = doc;
    for (depth, key) in path.keys().iter().enumerate() {
        current = key.step(current).ok_or_else(|| FieldError::Missing {
            resolved: path.keys()[..depth].iter().map(|k| k.to_string()).collect(),
            missing: key.to_string(),
        })?;
    }

    Ok(current)
}

/// Resolve `path` in `doc`, logging and returning `None` when a key is absent
///
/// **Public** - main entry point for best-effort field access
///
/// A stored JSON `null` resolves to `Some(&Value::Null)`; only a missing key
/// yields `None`.
pub fn resolve<'a>(doc: &'a Value, path: &FieldPath) -> Option<&'a Value> {
    match lookup(doc, path) {
        Ok(value) => Some(value),
        Err(err) => {
            warn!("{}", err);
            None
        }
    }
}

/// Resolve every path, keeping order and absent entries in position
pub fn resolve_all<'a>(doc: &'a Value, paths: &[FieldPath]) -> Vec<Option<&'a Value>> {
    paths.iter().map(|path| resolve(doc, path)).collect()
}
