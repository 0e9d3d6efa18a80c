use serde::{Deserialize, Serialize};

/// Raw submitted form fields in the order they were posted.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct FormCollection(Vec<(String, String)>);

/// The three per-line fields of the return form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReturnLineFields {
    pub quantity: i32,
    pub reason_id: String,
    pub action_id: String,
}

impl FormCollection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.push((key.into(), value.into()));
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Case-insensitive lookup; the last matching field wins.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .rev()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, v)| v.as_str())
    }

    /// Read `quantity<id>`, `reason<id>` and `action<id>` for one order item.
    ///
    /// A missing or non-numeric quantity reads as zero.
    pub fn return_line(&self, order_item_id: &str) -> ReturnLineFields {
        let quantity_key = format!("quantity{}", order_item_id);
        let reason_key = format!("reason{}", order_item_id);
        let action_key = format!("action{}", order_item_id);

        let mut line = ReturnLineFields::default();
        for (key, value) in &self.0 {
            if key.eq_ignore_ascii_case(&quantity_key) {
                line.quantity = parse_quantity(value);
            }
            if key.eq_ignore_ascii_case(&reason_key) {
                line.reason_id = value.clone();
            }
            if key.eq_ignore_ascii_case(&action_key) {
                line.action_id = value.clone();
            }
        }
        line
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for FormCollection {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

fn parse_quantity(raw: &str) -> i32 {
    raw.trim().parse().unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_return_line_reads_all_fields() {
        let form: FormCollection = vec![
            ("quantity10", "2"),
            ("reason10", "R1"),
            ("action10", "A1"),
            ("quantity11", "5"),
        ]
        .into_iter()
        .collect();

        let line = form.return_line("10");
        assert_eq!(line.quantity, 2);
        assert_eq!(line.reason_id, "R1");
        assert_eq!(line.action_id, "A1");
    }

    #[test]
    fn test_keys_match_case_insensitively_but_exactly() {
        let form: FormCollection = vec![
            ("QUANTITY10", "3"),
            ("Reason10", "R2"),
            // prefix of another item id must not match
            ("quantity100", "9"),
            ("action1", "A9"),
        ]
        .into_iter()
        .collect();

        let line = form.return_line("10");
        assert_eq!(line.quantity, 3);
        assert_eq!(line.reason_id, "R2");
        assert_eq!(line.action_id, "");
    }

    #[test]
    fn test_bad_quantities_read_as_zero() {
        for raw in ["abc", "", "1.5", "99999999999", "2x"] {
            let mut form = FormCollection::new();
            form.push("quantity7", raw);
            assert_eq!(form.return_line("7").quantity, 0, "input {:?}", raw);
        }

        let mut form = FormCollection::new();
        form.push("quantity7", " 4 ");
        assert_eq!(form.return_line("7").quantity, 4);

        assert_eq!(FormCollection::new().return_line("7").quantity, 0);
    }

    #[test]
    fn test_later_field_overrides_earlier() {
        let mut form = FormCollection::new();
        form.push("quantity7", "1");
        form.push("Quantity7", "nope");
        assert_eq!(form.return_line("7").quantity, 0);
        assert_eq!(form.get("QUANTITY7"), Some("nope"));
    }
}
