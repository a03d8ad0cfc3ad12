use crate::EventError;

use backtrace::Backtrace;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Raw header value as delivered in an inbound event.
///
/// Event sources send a single string when the caller supplied one value and a list of strings
/// when it supplied several.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum HeaderValues {
  /// One value.
  Single(String),
  /// Zero or more values, in the order they were received.
  Multiple(Vec<String>),
}

impl HeaderValues {
  /// Return the values as a list, preserving order.
  pub fn into_vec(self) -> Vec<String> {
    match self {
      HeaderValues::Single(value) => vec![value],
      HeaderValues::Multiple(values) => values,
    }
  }
}

impl IntoIterator for HeaderValues {
  type Item = String;
  type IntoIter = std::vec::IntoIter<String>;

  fn into_iter(self) -> Self::IntoIter {
    self.into_vec().into_iter()
  }
}

/// Decode one raw header value into [`HeaderValues`].
///
/// Returns [`EventError::MalformedHeader`] if `raw` is neither a string nor a list of strings.
pub fn decode_header(name: &str, raw: serde_json::Value) -> Result<HeaderValues, EventError> {
  serde_json::from_value(raw).map_err(|err| EventError::MalformedHeader {
    header_name: name.to_string(),
    source: Box::new(err),
    backtrace: Backtrace::new(),
  })
}

/// Decode every raw header value in an inbound event, preserving the order of header names.
///
/// Decoding stops at the first malformed value; no partial header set is returned.
pub fn decode_headers(
  raw: IndexMap<String, serde_json::Value>,
) -> Result<IndexMap<String, HeaderValues>, EventError> {
  raw
    .into_iter()
    .map(|(name, value)| {
      let values = decode_header(&name, value)?;
      Ok((name, values))
    })
    .collect()
}

#[derive(Clone, Debug, PartialEq, Eq)]
struct HeaderEntry {
  name: String,
  values: Vec<String>,
}

/// Ordered multi-value header collection.
///
/// Header names are compared ASCII case-insensitively. The casing used the first time a name is
/// inserted is the casing returned by [`iter`](HeaderMultiMap::iter) and by the flattened map.
/// Names and values are kept in insertion order, and a name is never associated with an empty list
/// of values.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct HeaderMultiMap {
  // Keyed by the lowercased header name.
  entries: IndexMap<String, HeaderEntry>,
}

impl HeaderMultiMap {
  /// Create an empty header collection.
  pub fn new() -> Self {
    Self::default()
  }

  /// Add `value` under `name`, keeping any values already present.
  pub fn append(&mut self, name: impl Into<String>, value: impl Into<String>) {
    let name = name.into();
    self
      .entries
      .entry(name.to_ascii_lowercase())
      .or_insert_with(|| HeaderEntry {
        name,
        values: Vec::new(),
      })
      .values
      .push(value.into());
  }

  /// Replace every value under `name` with `value`.
  ///
  /// An existing name keeps both its position and its original casing.
  pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
    let name = name.into();
    let value = value.into();
    match self.entries.get_mut(&name.to_ascii_lowercase()) {
      Some(entry) => entry.values = vec![value],
      None => self.append(name, value),
    }
  }

  /// Return the first value under `name`.
  pub fn get(&self, name: &str) -> Option<&str> {
    self
      .get_all(name)
      .first()
      .map(String::as_str)
  }

  /// Return every value under `name` (empty if the header is absent).
  pub fn get_all(&self, name: &str) -> &[String] {
    self
      .entries
      .get(&name.to_ascii_lowercase())
      .map(|entry| entry.values.as_slice())
      .unwrap_or(&[])
  }

  /// Return whether any value exists under `name`.
  pub fn contains_key(&self, name: &str) -> bool {
    self.entries.contains_key(&name.to_ascii_lowercase())
  }

  /// Remove `name` and return its values.
  pub fn remove(&mut self, name: &str) -> Option<Vec<String>> {
    self
      .entries
      .shift_remove(&name.to_ascii_lowercase())
      .map(|entry| entry.values)
  }

  /// Number of distinct header names.
  pub fn len(&self) -> usize {
    self.entries.len()
  }

  /// Return whether the collection contains no headers.
  pub fn is_empty(&self) -> bool {
    self.entries.is_empty()
  }

  /// Iterate over `(name, values)` pairs in insertion order.
  pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
    self
      .entries
      .values()
      .map(|entry| (entry.name.as_str(), entry.values.as_slice()))
  }
}

impl From<HeaderMultiMap> for IndexMap<String, Vec<String>> {
  fn from(headers: HeaderMultiMap) -> Self {
    headers
      .entries
      .into_values()
      .map(|entry| (entry.name, entry.values))
      .collect()
  }
}

impl<N, V> FromIterator<(N, V)> for HeaderMultiMap
where
  N: Into<String>,
  V: Into<String>,
{
  fn from_iter<I: IntoIterator<Item = (N, V)>>(iter: I) -> Self {
    let mut headers = HeaderMultiMap::new();
    for (name, value) in iter {
      headers.append(name, value);
    }
    headers
  }
}

#[cfg(test)]
mod tests {
  use super::{decode_header, decode_headers, HeaderMultiMap, HeaderValues};
  use crate::EventError;

  use indexmap::IndexMap;
  use pretty_assertions::assert_eq;
  use serde_json::json;

  #[test]
  fn test_decode_single_and_multiple() {
    assert_eq!(
      decode_header("host", json!("example.com")).unwrap(),
      HeaderValues::Single("example.com".to_string())
    );
    assert_eq!(
      decode_header("foo", json!(["bar", "baz"]))
        .unwrap()
        .into_vec(),
      vec!["bar".to_string(), "baz".to_string()]
    );
  }

  #[test]
  fn test_decode_malformed() {
    for raw in [json!(1), json!(null), json!({"a": "b"}), json!(["ok", 2])] {
      match decode_header("X-Bad", raw.clone()) {
        Err(EventError::MalformedHeader { header_name, .. }) => assert_eq!(header_name, "X-Bad"),
        other => panic!("unexpected result for {raw}: {other:?}"),
      }
    }
  }

  #[test]
  fn test_decode_headers_aborts_on_first_malformed_value() {
    let raw: IndexMap<String, serde_json::Value> = [
      ("accept".to_string(), json!("*/*")),
      ("x-count".to_string(), json!(3)),
    ]
    .into_iter()
    .collect();

    assert!(matches!(
      decode_headers(raw),
      Err(EventError::MalformedHeader { header_name, .. }) if header_name == "x-count"
    ));
  }

  #[test]
  fn test_decode_then_flatten_preserves_pairs() {
    let raw: IndexMap<String, serde_json::Value> = [
      ("Host".to_string(), json!("example.com")),
      ("Set-Thing".to_string(), json!(["a", "b", "c"])),
      ("accept".to_string(), json!("*/*")),
    ]
    .into_iter()
    .collect();

    let headers = decode_headers(raw)
      .unwrap()
      .into_iter()
      .flat_map(|(name, values)| values.into_iter().map(move |value| (name.clone(), value)))
      .collect::<HeaderMultiMap>();

    let flattened = IndexMap::<String, Vec<String>>::from(headers);
    assert_eq!(
      flattened.into_iter().collect::<Vec<_>>(),
      vec![
        ("Host".to_string(), vec!["example.com".to_string()]),
        (
          "Set-Thing".to_string(),
          vec!["a".to_string(), "b".to_string(), "c".to_string()]
        ),
        ("accept".to_string(), vec!["*/*".to_string()]),
      ]
    );
  }

  #[test]
  fn test_multi_map_case_insensitive() {
    let mut headers = HeaderMultiMap::new();
    headers.append("X-Foo", "bar");
    headers.append("x-foo", "baz");
    headers.append("Content-Type", "text/plain");

    assert_eq!(headers.len(), 2);
    assert_eq!(headers.get("X-FOO"), Some("bar"));
    assert_eq!(headers.get_all("x-foo").to_vec(), vec!["bar", "baz"]);
    assert_eq!(
      headers.iter().map(|(name, _)| name).collect::<Vec<_>>(),
      vec!["X-Foo", "Content-Type"]
    );

    headers.insert("X-FOO", "qux");
    assert_eq!(headers.get_all("X-Foo").to_vec(), vec!["qux"]);
    assert_eq!(headers.iter().next().unwrap().0, "X-Foo");

    assert_eq!(headers.remove("content-type"), Some(vec!["text/plain".to_string()]));
    assert!(!headers.contains_key("Content-Type"));
    assert!(headers.get_all("Content-Type").is_empty());
    assert_eq!(headers.remove("content-type"), None);
  }
}
