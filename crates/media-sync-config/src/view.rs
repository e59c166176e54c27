use serde_json::Value;

/// Read-only, never-failing access into a configuration tree
///
/// Every lookup walks the path one key at a time and answers `None` as soon
/// as a level is missing, `null`, or not a table. Callers treat `None` as
/// "fall through to the next default", so a malformed section behaves
/// exactly like an absent one.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConfigView<'a> {
    root: Option<&'a Value>,
}

impl<'a> ConfigView<'a> {
    pub fn new(root: Option<&'a Value>) -> Self {
        Self { root }
    }

    pub fn empty() -> Self {
        Self { root: None }
    }

    pub fn get(&self, path: &[&str]) -> Option<&'a Value> {
        let mut current = self.root?;
        for key in path {
            current = current.as_object()?.get(*key)?;
            if current.is_null() {
                return None;
            }
        }
        Some(current)
    }

    /// Strictly positive number at `path`, truncated toward zero
    ///
    /// Integers and floats count as numeric; booleans and strings do not.
    /// Zero, negative, or sub-one values read as absent.
    pub fn positive_int(&self, path: &[&str]) -> Option<u64> {
        let number = match self.get(path)? {
            Value::Number(n) => n,
            _ => return None,
        };

        if let Some(v) = number.as_u64() {
            return (v > 0).then_some(v);
        }
        if number.is_i64() {
            // Negative integers are the only i64 values as_u64 rejects
            return None;
        }
        let v = number.as_f64()?.trunc();
        if v.is_finite() && v >= 1.0 {
            Some(if v >= u64::MAX as f64 { u64::MAX } else { v as u64 })
        } else {
            None
        }
    }

    pub fn bool(&self, path: &[&str]) -> Option<bool> {
        self.get(path)?.as_bool()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_get_walks_nested_tables() {
        let tree = json!({"sync": {"gmt": {"ratings_sec": 10}}});
        let view = ConfigView::new(Some(&tree));

        assert_eq!(view.get(&["sync", "gmt", "ratings_sec"]), Some(&json!(10)));
        assert_eq!(view.get(&["sync", "gmt", "history_sec"]), None);
        assert_eq!(view.get(&["runtime"]), None);
    }

    #[test]
    fn test_get_stops_at_wrong_shapes() {
        let tree = json!({"sync": {"gmt": 5, "gmt_quarantine_days": null}, "list": [1, 2]});
        let view = ConfigView::new(Some(&tree));

        assert_eq!(view.get(&["sync", "gmt", "ratings_sec"]), None);
        assert_eq!(view.get(&["sync", "gmt_quarantine_days"]), None);
        assert_eq!(view.get(&["list", "0"]), None);
        assert_eq!(ConfigView::empty().get(&["sync"]), None);

        let scalar_root = json!("not a table");
        assert_eq!(ConfigView::new(Some(&scalar_root)).get(&["sync"]), None);
    }

    #[test]
    fn test_positive_int_accepts_only_positive_numbers() {
        let tree = json!({
            "int": 7,
            "zero": 0,
            "negative": -3,
            "float": 2.9,
            "small_float": 0.5,
            "negative_float": -1.5,
            "string": "7",
            "flag": true
        });
        let view = ConfigView::new(Some(&tree));

        assert_eq!(view.positive_int(&["int"]), Some(7));
        assert_eq!(view.positive_int(&["float"]), Some(2));
        assert_eq!(view.positive_int(&["zero"]), None);
        assert_eq!(view.positive_int(&["negative"]), None);
        assert_eq!(view.positive_int(&["small_float"]), None);
        assert_eq!(view.positive_int(&["negative_float"]), None);
        assert_eq!(view.positive_int(&["string"]), None);
        assert_eq!(view.positive_int(&["flag"]), None);
        assert_eq!(view.positive_int(&["missing"]), None);
    }

    #[test]
    fn test_bool() {
        let tree = json!({"sync": {"gmt_enable": true, "other": "yes"}});
        let view = ConfigView::new(Some(&tree));
        assert_eq!(view.bool(&["sync", "gmt_enable"]), Some(true));
        assert_eq!(view.bool(&["sync", "other"]), None);
    }
}
