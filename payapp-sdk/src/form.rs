//! URL-encoded form codec.
//!
//! PayApp speaks `application/x-www-form-urlencoded` in both directions:
//! request parameters go out as `k=v&k=v` pairs and responses and feedback
//! callbacks come back the same way. Everything on the wire is a flat
//! string, so [`FormRecord`] is an ordered list of `(name, value)` pairs
//! with map-like accessors.

use std::borrow::Cow;

/// MIME type for every PayApp request and feedback body.
pub const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// Ordered, flat key/value record.
///
/// Keys are unique: inserting an existing key replaces its value in place,
/// keeping the original position.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormRecord {
    fields: Vec<(String, String)>,
}

impl FormRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a field. Numbers and other scalars are stringified
    /// here, so the record only ever holds strings.
    pub fn insert(&mut self, key: impl Into<String>, value: impl ToString) -> &mut Self {
        let key = key.into();
        let value = value.to_string();
        match self.fields.iter_mut().find(|(k, _)| *k == key) {
            Some((_, slot)) => *slot = value,
            None => self.fields.push((key, value)),
        }
        self
    }

    /// Insert a field only when it has a value. Absent values never reach
    /// the wire.
    pub fn insert_opt<V: ToString>(&mut self, key: impl Into<String>, value: Option<V>) -> &mut Self {
        if let Some(value) = value {
            self.insert(key, value);
        }
        self
    }

    /// Builder form of [`insert`](Self::insert).
    pub fn with(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.insert(key, value);
        self
    }

    /// Builder form of [`insert_opt`](Self::insert_opt).
    pub fn with_opt<V: ToString>(mut self, key: impl Into<String>, value: Option<V>) -> Self {
        self.insert_opt(key, value);
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Like [`get`](Self::get) but treats an empty value as absent.
    pub fn get_non_empty(&self, key: &str) -> Option<&str> {
        self.get(key).filter(|v| !v.is_empty())
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.fields.iter().any(|(k, _)| k == key)
    }

    pub fn remove(&mut self, key: &str) -> Option<String> {
        let pos = self.fields.iter().position(|(k, _)| k == key)?;
        Some(self.fields.remove(pos).1)
    }

    /// Merge `other` into `self`; fields from `other` win on conflict.
    pub fn merge(&mut self, other: FormRecord) {
        for (k, v) in other.fields {
            self.insert(k, v);
        }
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Serialize to a form body. See [`encode`].
    pub fn encode(&self) -> String {
        encode(self)
    }
}

impl<K: Into<String>, V: ToString> FromIterator<(K, V)> for FormRecord {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut record = FormRecord::new();
        for (k, v) in iter {
            record.insert(k, v);
        }
        record
    }
}

impl serde::Serialize for FormRecord {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::SerializeMap;
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (k, v) in &self.fields {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

impl IntoIterator for FormRecord {
    type Item = (String, String);
    type IntoIter = std::vec::IntoIter<(String, String)>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.into_iter()
    }
}

/// Serialize a record to `k=v&k=v`, percent-encoding both sides.
pub fn encode(record: &FormRecord) -> String {
    record
        .fields
        .iter()
        .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
        .collect::<Vec<_>>()
        .join("&")
}

/// Parse a form body into a record.
///
/// `+` decodes to a space, segments without `=` get an empty value, and
/// empty segments are skipped. Unknown fields are kept as-is. A repeated
/// key keeps its first position and its last value.
pub fn decode(body: &str) -> FormRecord {
    let mut record = FormRecord::new();
    for pair in body.split('&').filter(|s| !s.is_empty()) {
        let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
        let key = decode_component(key);
        if key.is_empty() {
            continue;
        }
        record.insert(key, decode_component(value));
    }
    record
}

fn decode_component(raw: &str) -> String {
    let spaced: Cow<'_, str> = if raw.contains('+') {
        Cow::Owned(raw.replace('+', " "))
    } else {
        Cow::Borrowed(raw)
    };
    match urlencoding::decode(&spaced) {
        Ok(decoded) => decoded.into_owned(),
        Err(_) => String::from_utf8_lossy(&urlencoding::decode_binary(spaced.as_bytes())).into_owned(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_skips_absent_and_stringifies_numbers() {
        let record = FormRecord::new()
            .with("cmd", "payrequest")
            .with("price", 9900)
            .with_opt("memo", None::<String>)
            .with("goodname", "티셔츠 & 모자");

        assert_eq!(
            encode(&record),
            "cmd=payrequest&price=9900&goodname=%ED%8B%B0%EC%85%94%EC%B8%A0%20%26%20%EB%AA%A8%EC%9E%90"
        );
    }

    #[test]
    fn test_decode_handles_plus_and_missing_values() {
        let record = decode("state=1&errorMessage=hello+world&flag&&payurl=https%3A%2F%2Fpayapp.kr%2FL%2Fabc");
        assert_eq!(record.get("state"), Some("1"));
        assert_eq!(record.get("errorMessage"), Some("hello world"));
        assert_eq!(record.get("flag"), Some(""));
        assert_eq!(record.get("payurl"), Some("https://payapp.kr/L/abc"));
        assert_eq!(record.len(), 4);
    }

    #[test]
    fn test_decode_keeps_unknown_fields_and_last_duplicate() {
        let record = decode("a=1&new_field=x&a=2");
        assert_eq!(record.get("a"), Some("2"));
        assert_eq!(record.get("new_field"), Some("x"));
        assert_eq!(record.iter().next(), Some(("a", "2")));
    }

    #[test]
    fn test_decode_invalid_utf8_is_lossy() {
        let record = decode("name=%FF%FE");
        assert_eq!(record.get("name"), Some("\u{FFFD}\u{FFFD}"));
    }

    #[test]
    fn test_round_trip_preserves_scalars_as_strings() {
        let record = FormRecord::new()
            .with("goodname", "a=b&c d+e")
            .with("price", 1000u64)
            .with("ratio", 0.5)
            .with("recvphone", "01012345678");

        let decoded = decode(&encode(&record));
        assert_eq!(decoded, record);
        assert_eq!(decoded.get("price"), Some("1000"));
        assert_eq!(decoded.get("ratio"), Some("0.5"));
    }

    #[test]
    fn test_merge_overrides() {
        let mut base = FormRecord::new().with("userid", "old").with("cmd", "x");
        base.merge(FormRecord::new().with("userid", "new"));
        assert_eq!(base.get("userid"), Some("new"));
        assert_eq!(base.len(), 2);
    }
}
