//! The compound-key configuration container
//!
//! `Conf` wraps a nested mapping tree and exposes dictionary-like access
//! addressed by compound keys: separator-joined paths such as
//! `database.host`. Updates deep-merge mappings instead of overwriting
//! top-level keys wholesale, and child views alias the parent's storage so
//! sub-config handles stay live.

use std::fmt;
use std::path::Path;
use std::sync::{Arc, RwLock};

use indexmap::IndexMap;
use serde::{Serialize, Serializer};

use crate::error::{Error, Result};
use crate::value::Value;

/// Separator used for compound keys unless one is set explicitly
pub const DEFAULT_SEPARATOR: &str = ".";

/// A nested-mapping configuration container with compound-key access
///
/// The container owns a storage arena (the nested mapping tree) behind an
/// `Arc`; views returned by [`Conf::node`] hold the same arena plus the
/// path of their subtree, so mutations through a view are visible through
/// the root and vice versa.
///
/// Cloning a `Conf` clones the handle, not the tree: both handles address
/// the same storage. Build a detached copy from a snapshot instead:
/// `Conf::from_sources([conf.to_value()])`.
#[derive(Clone)]
pub struct Conf {
    /// Shared storage arena; the root value is always a mapping
    root: Arc<RwLock<Value>>,
    /// Segments from the arena root to this view's subtree; empty at the root
    prefix: Vec<String>,
    /// Compound-key separator (non-empty)
    separator: String,
}

impl Conf {
    /// Create an empty container with the default `.` separator
    pub fn new() -> Self {
        Self::with_separator(DEFAULT_SEPARATOR)
    }

    /// Create an empty container with a custom compound-key separator
    pub fn with_separator(separator: impl Into<String>) -> Self {
        Self {
            root: Arc::new(RwLock::new(Value::Mapping(IndexMap::new()))),
            prefix: Vec::new(),
            separator: separator.into(),
        }
    }

    /// Build a container from ordered source mappings
    ///
    /// Each source is deep-merged in turn, so later sources override
    /// earlier ones. Sources are consumed; the container never aliases
    /// caller-held data. An empty iterator yields an empty container.
    pub fn from_sources<I>(sources: I) -> Result<Self>
    where
        I: IntoIterator<Item = Value>,
    {
        Self::from_sources_with_separator(sources, DEFAULT_SEPARATOR)
    }

    /// Build a container from ordered source mappings and a custom separator
    pub fn from_sources_with_separator<I>(sources: I, separator: impl Into<String>) -> Result<Self>
    where
        I: IntoIterator<Item = Value>,
    {
        let conf = Self::with_separator(separator);
        for source in sources {
            conf.update(source)?;
        }
        Ok(conf)
    }

    /// The separator this container splits compound keys on
    pub fn separator(&self) -> &str {
        &self.separator
    }

    /// Load a container from a YAML string
    ///
    /// An empty document parses as null and yields an empty container.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let value: Value = serde_yaml::from_str(yaml).map_err(|e| Error::parse(e.to_string()))?;
        Self::from_parsed(value)
    }

    /// Load a container from a JSON string
    pub fn from_json(json: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(json).map_err(|e| Error::parse(e.to_string()))?;
        Self::from_parsed(value)
    }

    /// Load a container from a YAML file
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self> {
        Self::from_yaml(&read_file(path.as_ref())?)
    }

    /// Load a container from a JSON file
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        Self::from_json(&read_file(path.as_ref())?)
    }

    /// Load a container from a file, picking the parser by extension
    ///
    /// `.json` files are parsed as JSON; everything else as YAML.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let is_json = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.eq_ignore_ascii_case("json"))
            .unwrap_or(false);

        let conf = if is_json {
            Self::from_json_file(path)
        } else {
            Self::from_yaml_file(path)
        }?;

        log::debug!(
            "loaded {} ({} top-level keys)",
            path.display(),
            conf.len()
        );
        Ok(conf)
    }

    /// Load and deep-merge multiple config files
    ///
    /// Files are merged in order, with later files overriding earlier ones:
    /// mappings merge key-by-key, everything else is replaced wholesale.
    pub fn load_merged<P: AsRef<Path>>(paths: &[P]) -> Result<Self> {
        let conf = Self::new();
        for path in paths {
            let next = Self::from_file(path)?;
            conf.update(next.to_value())?;
        }
        Ok(conf)
    }

    fn from_parsed(value: Value) -> Result<Self> {
        if value.is_null() {
            return Ok(Self::new());
        }
        Self::from_sources([value])
    }

    /// Get the value at a compound key (fail-fast)
    ///
    /// Splits the key on the separator and walks the mapping tree left to
    /// right. Fails with `KeyNotFound` if any segment is absent at its
    /// level. The returned value is a snapshot clone; use [`Conf::node`]
    /// for a live view of a sub-mapping.
    pub fn get(&self, key: &str) -> Result<Value> {
        self.lookup(key, |value, _| Ok(value.clone()))
    }

    /// Get the value at a compound key, or a default if it is absent
    pub fn get_or(&self, key: &str, default: impl Into<Value>) -> Value {
        self.get(key).unwrap_or_else(|_| default.into())
    }

    /// Get an aliasing view of the sub-mapping at a compound key
    ///
    /// The view shares this container's storage and separator: writes
    /// through the view are visible through the root. Fails with
    /// `KeyNotFound` if the path is absent and with a type error if the
    /// value there is not a mapping. If the subtree is later removed, the
    /// view reads as empty and its mutations fail.
    pub fn node(&self, key: &str) -> Result<Conf> {
        let segments = self.split_key(key)?;
        self.lookup(key, |value, path| {
            if value.is_mapping() {
                Ok(())
            } else {
                Err(Error::type_coercion(path, "mapping", value.type_name()))
            }
        })?;

        let mut prefix = self.prefix.clone();
        prefix.extend(segments);
        Ok(Conf {
            root: Arc::clone(&self.root),
            prefix,
            separator: self.separator.clone(),
        })
    }

    /// Get a string value, coercing scalars to their textual form
    pub fn get_string(&self, key: &str) -> Result<String> {
        let value = self.get(key)?;
        match value {
            Value::String(s) => Ok(s),
            Value::Integer(i) => Ok(i.to_string()),
            Value::Float(f) => Ok(f.to_string()),
            Value::Bool(b) => Ok(b.to_string()),
            Value::Null => Ok("null".to_string()),
            _ => Err(Error::type_coercion(
                self.qualify(key),
                "string",
                value.type_name(),
            )),
        }
    }

    /// Get an integer value, parsing numeric strings if needed
    pub fn get_i64(&self, key: &str) -> Result<i64> {
        let value = self.get(key)?;
        match value {
            Value::Integer(i) => Ok(i),
            Value::String(s) => s.parse().map_err(|_| {
                Error::type_coercion(self.qualify(key), "integer", format!("string (\"{}\")", s))
            }),
            _ => Err(Error::type_coercion(
                self.qualify(key),
                "integer",
                value.type_name(),
            )),
        }
    }

    /// Get a float value, parsing numeric strings if needed
    pub fn get_f64(&self, key: &str) -> Result<f64> {
        let value = self.get(key)?;
        match value {
            Value::Float(f) => Ok(f),
            Value::Integer(i) => Ok(i as f64),
            Value::String(s) => s.parse().map_err(|_| {
                Error::type_coercion(self.qualify(key), "float", format!("string (\"{}\")", s))
            }),
            _ => Err(Error::type_coercion(
                self.qualify(key),
                "float",
                value.type_name(),
            )),
        }
    }

    /// Get a boolean value; only "true" and "false" strings coerce
    pub fn get_bool(&self, key: &str) -> Result<bool> {
        let value = self.get(key)?;
        match value {
            Value::Bool(b) => Ok(b),
            Value::String(s) => match s.to_lowercase().as_str() {
                "true" => Ok(true),
                "false" => Ok(false),
                _ => Err(Error::type_coercion(
                    self.qualify(key),
                    "boolean",
                    format!("string (\"{}\") - only \"true\" or \"false\" allowed", s),
                )),
            },
            _ => Err(Error::type_coercion(
                self.qualify(key),
                "boolean",
                value.type_name(),
            )),
        }
    }

    /// Set the value at a compound key
    ///
    /// Missing intermediate segments are created as empty mappings. An
    /// existing non-mapping intermediate is a type error rather than a
    /// silent overwrite.
    pub fn set(&self, key: &str, value: impl Into<Value>) -> Result<()> {
        let segments = self.split_key(key)?;
        let path = self.qualify(key);
        let value = value.into();

        self.with_subtree_mut(|mut map| {
            let (last, inner) = match segments.split_last() {
                Some(parts) => parts,
                None => return Err(Error::invalid_key(path.as_str(), "empty key")),
            };

            for seg in inner {
                let entry = map
                    .entry(seg.clone())
                    .or_insert_with(|| Value::Mapping(IndexMap::new()));
                map = match entry {
                    Value::Mapping(m) => m,
                    other => {
                        return Err(Error::type_coercion(path.as_str(), "mapping", other.type_name()))
                    }
                };
            }

            map.insert(last.clone(), value);
            Ok(())
        })
    }

    /// Remove and return the entry at a compound key
    ///
    /// Fails with `KeyNotFound` if any walked segment or the final entry
    /// is absent.
    pub fn remove(&self, key: &str) -> Result<Value> {
        let segments = self.split_key(key)?;
        let path = self.qualify(key);

        self.with_subtree_mut(|mut map| {
            let (last, inner) = match segments.split_last() {
                Some(parts) => parts,
                None => return Err(Error::invalid_key(path.as_str(), "empty key")),
            };

            for seg in inner {
                map = match map.get_mut(seg.as_str()) {
                    Some(Value::Mapping(m)) => m,
                    Some(_) | None => return Err(Error::key_not_found(path.as_str())),
                };
            }

            map.shift_remove(last.as_str())
                .ok_or_else(|| Error::key_not_found(path.as_str()))
        })
    }

    /// Check whether a compound key exists
    pub fn contains(&self, key: &str) -> bool {
        self.lookup(key, |_, _| Ok(())).is_ok()
    }

    /// Recursively merge a source mapping into this container
    ///
    /// For each key in `source`: if the key exists here and both values
    /// are mappings, merge recursively; otherwise the incoming value
    /// replaces the existing entry wholesale. Non-mapping sources are a
    /// type error.
    pub fn update(&self, source: Value) -> Result<()> {
        match source {
            Value::Mapping(map) => self.update_pairs(map),
            other => Err(Error::type_coercion(
                self.base_path(),
                "mapping",
                other.type_name(),
            )),
        }
    }

    /// Recursively merge another container's tree into this one
    pub fn update_from(&self, other: &Conf) -> Result<()> {
        self.update(other.to_value())
    }

    /// Recursively merge explicit key/value pairs into this container
    ///
    /// Keys are plain top-level keys of this node, never compound. Pairs
    /// are applied in iteration order, so among duplicates the last write
    /// wins.
    pub fn update_pairs<I>(&self, pairs: I) -> Result<()>
    where
        I: IntoIterator<Item = (String, Value)>,
    {
        self.with_subtree_mut(|map| {
            for (key, value) in pairs {
                match map.get_mut(&key) {
                    Some(existing) => existing.merge(value),
                    None => {
                        map.insert(key, value);
                    }
                }
            }
            Ok(())
        })
    }

    /// Top-level keys of this node, in insertion order
    ///
    /// Compound keys are not expanded: nested mappings contribute a single
    /// key each.
    pub fn keys(&self) -> Vec<String> {
        self.with_node(|map| map.map(|m| m.keys().cloned().collect()).unwrap_or_default())
    }

    /// Top-level key/value pairs of this node, in insertion order
    pub fn items(&self) -> Vec<(String, Value)> {
        self.with_node(|map| {
            map.map(|m| m.iter().map(|(k, v)| (k.clone(), v.clone())).collect())
                .unwrap_or_default()
        })
    }

    /// Number of top-level keys of this node
    pub fn len(&self) -> usize {
        self.with_node(|map| map.map_or(0, |m| m.len()))
    }

    /// Whether this node has no top-level keys
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Snapshot clone of this node's subtree
    pub fn to_value(&self) -> Value {
        self.with_node(|map| {
            map.cloned()
                .map(Value::Mapping)
                .unwrap_or_else(|| Value::Mapping(IndexMap::new()))
        })
    }

    /// Render this node's subtree as YAML
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(&self.to_value()).map_err(|e| Error::parse(e.to_string()))
    }

    /// Render this node's subtree as pretty-printed JSON
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(&self.to_value()).map_err(|e| Error::parse(e.to_string()))
    }

    /// Split a compound key, rejecting empty keys and empty segments
    fn split_key(&self, key: &str) -> Result<Vec<String>> {
        if key.is_empty() {
            return Err(Error::invalid_key(key, "empty key"));
        }
        let segments: Vec<String> = key
            .split(self.separator.as_str())
            .map(str::to_string)
            .collect();
        if segments.iter().any(String::is_empty) {
            return Err(Error::invalid_key(
                key,
                format!("empty segment (separator is '{}')", self.separator),
            ));
        }
        Ok(segments)
    }

    /// The absolute dotted path of `key`, for error messages
    fn qualify(&self, key: &str) -> String {
        if self.prefix.is_empty() {
            key.to_string()
        } else {
            format!(
                "{}{}{}",
                self.prefix.join(&self.separator),
                self.separator,
                key
            )
        }
    }

    /// The absolute path of this view itself
    fn base_path(&self) -> String {
        if self.prefix.is_empty() {
            "<root>".to_string()
        } else {
            self.prefix.join(&self.separator)
        }
    }

    /// Walk to the value at a compound key and apply `f` under the read lock
    fn lookup<T>(&self, key: &str, f: impl FnOnce(&Value, &str) -> Result<T>) -> Result<T> {
        let segments = self.split_key(key)?;
        let path = self.qualify(key);

        let guard = self.root.read().unwrap();
        let mut current: &Value = &guard;
        for seg in self.prefix.iter().chain(segments.iter()) {
            current = match current.as_mapping().and_then(|m| m.get(seg.as_str())) {
                Some(v) => v,
                None => return Err(Error::key_not_found(path.as_str())),
            };
        }
        f(current, &path)
    }

    /// Apply `f` to this view's sub-mapping under the read lock
    ///
    /// `f` receives `None` when the view's path no longer resolves to a
    /// mapping.
    fn with_node<T>(&self, f: impl FnOnce(Option<&IndexMap<String, Value>>) -> T) -> T {
        let guard = self.root.read().unwrap();
        let mut current: &Value = &guard;
        for seg in &self.prefix {
            match current.as_mapping().and_then(|m| m.get(seg.as_str())) {
                Some(v) => current = v,
                None => return f(None),
            }
        }
        f(current.as_mapping())
    }

    /// Apply `f` to this view's sub-mapping under the write lock
    fn with_subtree_mut<T>(
        &self,
        f: impl FnOnce(&mut IndexMap<String, Value>) -> Result<T>,
    ) -> Result<T> {
        let mut guard = self.root.write().unwrap();
        let mut current: &mut Value = &mut guard;
        for seg in &self.prefix {
            current = match current {
                Value::Mapping(map) => match map.get_mut(seg.as_str()) {
                    Some(v) => v,
                    None => return Err(Error::key_not_found(self.base_path())),
                },
                _ => return Err(Error::key_not_found(self.base_path())),
            };
        }
        match current {
            Value::Mapping(map) => f(map),
            other => Err(Error::type_coercion(
                self.base_path(),
                "mapping",
                other.type_name(),
            )),
        }
    }
}

impl Default for Conf {
    fn default() -> Self {
        Self::new()
    }
}

impl PartialEq for Conf {
    fn eq(&self, other: &Conf) -> bool {
        self.to_value() == other.to_value()
    }
}

impl PartialEq<Value> for Conf {
    fn eq(&self, other: &Value) -> bool {
        self.to_value() == *other
    }
}

impl PartialEq<IndexMap<String, Value>> for Conf {
    fn eq(&self, other: &IndexMap<String, Value>) -> bool {
        match self.to_value() {
            Value::Mapping(map) => map == *other,
            _ => false,
        }
    }
}

impl fmt::Display for Conf {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_value())
    }
}

impl fmt::Debug for Conf {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Conf")
            .field("data", &self.to_value())
            .field("separator", &self.separator)
            .finish()
    }
}

impl Serialize for Conf {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.to_value().serialize(serializer)
    }
}

fn read_file(path: &Path) -> Result<String> {
    std::fs::read_to_string(path)
        .map_err(|e| Error::io(format!("Failed to read '{}': {}", path.display(), e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use pretty_assertions::assert_eq;

    fn sample() -> Conf {
        Conf::from_yaml(
            r#"
root:
  one:
    a: 1
    b: 2
  two:
    c: 3
"#,
        )
        .unwrap()
    }

    #[test]
    fn test_round_trip_construction() {
        let source: Value = serde_yaml::from_str("a:\n  x: 1\nb: 2\n").unwrap();
        let conf = Conf::from_sources([source.clone()]).unwrap();

        assert_eq!(conf, source);

        // The source was consumed by value; mutating the container cannot
        // touch the caller's copy.
        conf.set("a.x", 99).unwrap();
        assert_eq!(
            source.as_mapping().unwrap()["a"].as_mapping().unwrap()["x"].as_i64(),
            Some(1)
        );
    }

    #[test]
    fn test_compound_key_get() {
        let conf = sample();

        assert_eq!(conf.get("root.one.a").unwrap().as_i64(), Some(1));
        assert_eq!(conf.get("root.two.c").unwrap().as_i64(), Some(3));
    }

    #[test]
    fn test_compound_key_equivalence() {
        let conf = sample();

        let direct = conf.get("root.one.a").unwrap();
        let stepped = conf
            .node("root")
            .unwrap()
            .node("one")
            .unwrap()
            .get("a")
            .unwrap();
        assert_eq!(direct, stepped);

        // Multi-segment keys also work from an inner view
        assert_eq!(
            conf.node("root").unwrap().get("one.b").unwrap().as_i64(),
            Some(2)
        );
    }

    #[test]
    fn test_alias_invariant() {
        let conf = sample();
        let sub = conf.node("root.one").unwrap();

        sub.set("x", 1).unwrap();
        assert_eq!(conf.get("root.one.x").unwrap().as_i64(), Some(1));

        // And the other way around: writes through the root show in the view
        conf.set("root.one.y", 2).unwrap();
        assert_eq!(sub.get("y").unwrap().as_i64(), Some(2));
    }

    #[test]
    fn test_node_on_scalar_is_type_error() {
        let conf = sample();
        let err = conf.node("root.one.a").unwrap_err();
        assert_eq!(err.kind, ErrorKind::TypeCoercion);
    }

    #[test]
    fn test_merge_precedence() {
        let conf = Conf::from_yaml("a:\n  x: 1\n  y: 2\n").unwrap();
        let overlay: Value = serde_yaml::from_str("a:\n  x: 42\n  z: 3\n").unwrap();

        conf.update(overlay).unwrap();

        let expected: Value = serde_yaml::from_str("a:\n  x: 42\n  y: 2\n  z: 3\n").unwrap();
        assert_eq!(conf, expected);
    }

    #[test]
    fn test_update_replaces_non_mappings_wholesale() {
        let conf = Conf::from_yaml("servers:\n  - a\n  - b\nname: old\n").unwrap();
        let overlay: Value = serde_yaml::from_str("servers:\n  - c\nname: new\n").unwrap();

        conf.update(overlay).unwrap();

        assert_eq!(conf.get("servers").unwrap(), Value::from(vec!["c"]));
        assert_eq!(conf.get_string("name").unwrap(), "new");
    }

    #[test]
    fn test_update_from_conf() {
        let base = sample();
        let other = Conf::from_yaml("root:\n  one:\n    a: 42\n    z: 13\n").unwrap();

        base.update_from(&other).unwrap();

        let one = base.node("root.one").unwrap();
        assert_eq!(one.get("a").unwrap().as_i64(), Some(42));
        assert_eq!(one.get("b").unwrap().as_i64(), Some(2));
        assert_eq!(one.get("z").unwrap().as_i64(), Some(13));
    }

    #[test]
    fn test_update_pairs_last_write_wins() {
        let conf = Conf::new();
        conf.update_pairs([
            ("k".to_string(), Value::from(1)),
            ("k".to_string(), Value::from(2)),
        ])
        .unwrap();

        assert_eq!(conf.get("k").unwrap().as_i64(), Some(2));
    }

    #[test]
    fn test_update_non_mapping_source_is_type_error() {
        let conf = Conf::new();
        let err = conf.update(Value::from(5)).unwrap_err();
        assert_eq!(err.kind, ErrorKind::TypeCoercion);
    }

    #[test]
    fn test_auto_vivification() {
        let conf = Conf::new();
        conf.set("p.q.r", 5).unwrap();

        assert_eq!(conf.get("p.q.r").unwrap().as_i64(), Some(5));
        assert_eq!(
            conf.node("p")
                .unwrap()
                .node("q")
                .unwrap()
                .get("r")
                .unwrap()
                .as_i64(),
            Some(5)
        );
    }

    #[test]
    fn test_set_through_scalar_is_type_error() {
        let conf = Conf::from_yaml("a: 1\n").unwrap();
        let err = conf.set("a.b", 2).unwrap_err();
        assert_eq!(err.kind, ErrorKind::TypeCoercion);

        // The scalar was not clobbered
        assert_eq!(conf.get("a").unwrap().as_i64(), Some(1));
    }

    #[test]
    fn test_missing_key_contract() {
        let conf = sample();

        let err = conf.get("missing").unwrap_err();
        assert_eq!(err.kind, ErrorKind::KeyNotFound);
        assert!(err.is_key_not_found());

        assert_eq!(conf.get_or("missing", 99).as_i64(), Some(99));
        assert_eq!(
            conf.get_or("root.three", "default").as_str(),
            Some("default")
        );
        assert!(!conf.contains("missing"));
        assert!(!conf.contains("root.one.missing"));
        assert!(conf.contains("root.one.a"));
    }

    #[test]
    fn test_walk_into_scalar_is_key_not_found() {
        let conf = sample();
        let err = conf.get("root.one.a.deeper").unwrap_err();
        assert_eq!(err.kind, ErrorKind::KeyNotFound);
    }

    #[test]
    fn test_deletion_contract() {
        let conf = Conf::from_yaml("a:\n  b: 1\n  c: 2\n").unwrap();

        let removed = conf.remove("a.b").unwrap();
        assert_eq!(removed.as_i64(), Some(1));

        assert!(!conf.contains("a.b"));
        assert!(conf.contains("a"));
        assert!(conf.contains("a.c"));

        let err = conf.remove("a.b").unwrap_err();
        assert_eq!(err.kind, ErrorKind::KeyNotFound);
    }

    #[test]
    fn test_custom_separator() {
        let source: Value = serde_yaml::from_str("a:\n  b: 7\n").unwrap();
        let conf = Conf::from_sources_with_separator([source], "#").unwrap();

        assert_eq!(conf.separator(), "#");
        assert_eq!(conf.get("a#b").unwrap().as_i64(), Some(7));

        // A dot is an ordinary key character now
        conf.set("x.y", 1).unwrap();
        assert_eq!(conf.get("x.y").unwrap().as_i64(), Some(1));
        assert_eq!(conf.keys(), vec!["a", "x.y"]);

        // Views inherit the separator
        let sub = conf.node("a").unwrap();
        assert_eq!(sub.separator(), "#");
    }

    #[test]
    fn test_empty_segment_is_invalid_key() {
        let conf = sample();

        for key in ["", ".a", "a.", "a..b", "."] {
            let err = conf.get(key).unwrap_err();
            assert_eq!(err.kind, ErrorKind::InvalidKey, "key: {:?}", key);
        }

        assert_eq!(conf.set(".a", 1).unwrap_err().kind, ErrorKind::InvalidKey);
        assert_eq!(conf.remove("a..b").unwrap_err().kind, ErrorKind::InvalidKey);
        assert!(!conf.contains("a."));
    }

    #[test]
    fn test_iteration_and_len() {
        let conf = sample();

        assert_eq!(conf.keys(), vec!["root"]);
        assert_eq!(conf.len(), 1);
        assert!(!conf.is_empty());

        let one = conf.node("root.one").unwrap();
        assert_eq!(one.keys(), vec!["a", "b"]);
        assert_eq!(one.len(), 2);

        let items = one.items();
        assert_eq!(items[0], ("a".to_string(), Value::Integer(1)));
        assert_eq!(items[1], ("b".to_string(), Value::Integer(2)));

        assert!(Conf::new().is_empty());
    }

    #[test]
    fn test_equality() {
        let a = Conf::from_yaml("x: 1\ny:\n  z: 2\n").unwrap();
        let b = Conf::from_yaml("x: 1\ny:\n  z: 2\n").unwrap();
        let c = Conf::from_yaml("x: 1\n").unwrap();

        assert_eq!(a, b);
        assert_ne!(a, c);

        let as_value: Value = serde_yaml::from_str("x: 1\ny:\n  z: 2\n").unwrap();
        assert_eq!(a, as_value);

        let map = as_value.into_mapping().unwrap();
        assert_eq!(a, map);

        // A view compares against the subtree it wraps
        let sub = a.node("y").unwrap();
        let sub_value: Value = serde_yaml::from_str("z: 2\n").unwrap();
        assert_eq!(sub, sub_value);
    }

    #[test]
    fn test_display_and_debug() {
        let conf = Conf::from_yaml("a: 1\nb:\n  c: x\n").unwrap();
        assert_eq!(conf.to_string(), "{a: 1, b: {c: x}}");

        let debug = format!("{:?}", conf);
        assert!(debug.contains("separator"));
    }

    #[test]
    fn test_clone_shares_storage() {
        let conf = sample();
        let handle = conf.clone();

        handle.set("root.two.d", 4).unwrap();
        assert_eq!(conf.get("root.two.d").unwrap().as_i64(), Some(4));
    }

    #[test]
    fn test_get_scenario_from_example() {
        let conf = sample();

        assert_eq!(conf.get("root.one.a").unwrap().as_i64(), Some(1));
        assert_eq!(
            conf.get_or("root.three", "default").as_str(),
            Some("default")
        );

        let overlay: Value =
            serde_yaml::from_str("root:\n  one:\n    a: 42\n    z: 13\n").unwrap();
        conf.update(overlay).unwrap();

        let expected: Value = serde_yaml::from_str("a: 42\nb: 2\nz: 13\n").unwrap();
        assert_eq!(conf.node("root.one").unwrap(), expected);
    }

    #[test]
    fn test_typed_getters() {
        let conf = Conf::from_yaml(
            r#"
port: 5432
host: localhost
ratio: 0.5
debug: true
port_str: "8080"
flag_str: "True"
"#,
        )
        .unwrap();

        assert_eq!(conf.get_string("host").unwrap(), "localhost");
        assert_eq!(conf.get_string("port").unwrap(), "5432");
        assert_eq!(conf.get_i64("port").unwrap(), 5432);
        assert_eq!(conf.get_i64("port_str").unwrap(), 8080);
        assert!((conf.get_f64("ratio").unwrap() - 0.5).abs() < f64::EPSILON);
        assert!((conf.get_f64("port").unwrap() - 5432.0).abs() < f64::EPSILON);
        assert!(conf.get_bool("debug").unwrap());
        assert!(conf.get_bool("flag_str").unwrap());

        assert_eq!(
            conf.get_bool("host").unwrap_err().kind,
            ErrorKind::TypeCoercion
        );
        assert_eq!(
            conf.get_i64("host").unwrap_err().kind,
            ErrorKind::TypeCoercion
        );
    }

    #[test]
    fn test_from_json() {
        let conf = Conf::from_json(r#"{"database": {"host": "localhost", "port": 5432}}"#).unwrap();

        assert_eq!(conf.get_string("database.host").unwrap(), "localhost");
        assert_eq!(conf.get_i64("database.port").unwrap(), 5432);
    }

    #[test]
    fn test_from_json_invalid() {
        let err = Conf::from_json(r#"{"unclosed": "#).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Parse);
    }

    #[test]
    fn test_from_yaml_empty_document() {
        let conf = Conf::from_yaml("").unwrap();
        assert!(conf.is_empty());
    }

    #[test]
    fn test_load_merged_files() {
        let dir = tempfile::tempdir().unwrap();
        let base = dir.path().join("base.yaml");
        let overlay = dir.path().join("overlay.json");

        std::fs::write(&base, "database:\n  host: localhost\n  port: 5432\n").unwrap();
        std::fs::write(
            &overlay,
            r#"{"database": {"port": 3306}, "app": {"debug": true}}"#,
        )
        .unwrap();

        let conf = Conf::load_merged(&[&base, &overlay]).unwrap();

        assert_eq!(conf.get_string("database.host").unwrap(), "localhost");
        assert_eq!(conf.get_i64("database.port").unwrap(), 3306);
        assert!(conf.get_bool("app.debug").unwrap());
    }

    #[test]
    fn test_load_merged_missing_file() {
        let err = Conf::load_merged(&["/nonexistent/duffel-test.yaml"]).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Io);
    }

    #[test]
    fn test_to_yaml_and_json_round_trip() {
        let conf = Conf::from_yaml("a: 1\nb:\n  c: text\n").unwrap();

        let yaml = conf.to_yaml().unwrap();
        assert_eq!(Conf::from_yaml(&yaml).unwrap(), conf);

        let json = conf.to_json().unwrap();
        assert_eq!(Conf::from_json(&json).unwrap(), conf);
    }

    #[test]
    fn test_stale_view_reads_as_empty() {
        let conf = sample();
        let view = conf.node("root.one").unwrap();

        conf.remove("root.one").unwrap();

        assert!(view.is_empty());
        assert_eq!(view.get("a").unwrap_err().kind, ErrorKind::KeyNotFound);
        assert_eq!(view.set("a", 1).unwrap_err().kind, ErrorKind::KeyNotFound);
    }
}
