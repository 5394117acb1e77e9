/// Record Module
///
/// An ordered column-name to value mapping. Records carry insert/update
/// data and equality conditions into the gateway and come back out as
/// result rows.

use super::value::Value;
use serde::ser::{Serialize, SerializeMap, Serializer};

/// Ordered mapping of column name to value.
///
/// Iteration follows insertion order. Setting a column that is already
/// present replaces its value without moving it.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Record {
    fields: Vec<(String, Value)>,
}

/// Rows returned by a select, in the order the database produced them
pub type RowSet = Vec<Record>;

impl Record {
    /// Creates an empty record
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a named value, builder style
    pub fn with_value(mut self, name: &str, value: impl Into<Value>) -> Self {
        self.set(name, value);
        self
    }

    /// Sets a column, replacing any existing value in place
    pub fn set(&mut self, name: &str, value: impl Into<Value>) {
        let value = value.into();
        match self.fields.iter_mut().find(|(key, _)| key == name) {
            Some((_, existing)) => *existing = value,
            None => self.fields.push((name.to_string(), value)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Column names in insertion order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(key, _)| key.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields.iter().map(|(key, value)| (key.as_str(), value))
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Record {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut record = Record::new();
        for (key, value) in iter {
            let key: String = key.into();
            record.set(&key, value);
        }
        record
    }
}

impl IntoIterator for Record {
    type Item = (String, Value);
    type IntoIter = std::vec::IntoIter<(String, Value)>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.into_iter()
    }
}

impl Serialize for Record {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (key, value) in &self.fields {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

/// Renders a row set as a JSON array of objects
pub fn rows_to_json(rows: &[Record]) -> serde_json::Value {
    // Records only hold strings and scalars, which always serialize.
    serde_json::to_value(rows).unwrap_or(serde_json::Value::Null)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insertion_order_preserved() {
        let record = Record::new()
            .with_value("name", "Ann")
            .with_value("age", 30)
            .with_value("email", "ann@example.com");
        let keys: Vec<&str> = record.keys().collect();
        assert_eq!(keys, vec!["name", "age", "email"]);
    }

    #[test]
    fn test_set_replaces_in_place() {
        let mut record = Record::new().with_value("a", 1).with_value("b", 2);
        record.set("a", 10);
        assert_eq!(record.len(), 2);
        assert_eq!(record.get("a"), Some(&Value::Integer(10)));
        assert_eq!(record.keys().next(), Some("a"));
    }

    #[test]
    fn test_from_iterator() {
        let record: Record = vec![("x", 1), ("y", 2), ("x", 3)].into_iter().collect();
        assert_eq!(record.len(), 2);
        assert_eq!(record.get("x"), Some(&Value::Integer(3)));
    }

    #[test]
    fn test_json_rendering() {
        let rows = vec![Record::new().with_value("id", 1).with_value("name", "Ann")];
        assert_eq!(rows_to_json(&rows).to_string(), r#"[{"id":1,"name":"Ann"}]"#);
    }
}
