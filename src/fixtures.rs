#[cfg(test)]
pub mod test {
    use crate::value::{Map, Value};

    /// Build a mapping from key-value pairs.
    pub fn map(entries: &[(&str, Value)]) -> Map {
        entries
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    /// Build a sequence value.
    pub fn seq(items: &[Value]) -> Value {
        Value::Seq(items.to_vec())
    }

    #[test]
    fn map_builder_produces_expected_keys() {
        let m = map(&[("a", Value::Int(1)), ("b", Value::Bool(true))]);
        assert_eq!(m.len(), 2);
        assert_eq!(m["a"], Value::Int(1));
    }
}
