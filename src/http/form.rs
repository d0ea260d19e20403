//! Form and query-string decoding
//!
//! Both `application/x-www-form-urlencoded` bodies and URL query strings
//! decode into the same ordered list of key/value pairs.

use crate::error::DemoError;

/// Decoded form fields, in submission order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormData {
    fields: Vec<(String, String)>,
}

impl FormData {
    /// Decode a url-encoded request body
    pub fn parse(body: &[u8]) -> Result<Self, DemoError> {
        serde_urlencoded::from_bytes::<Vec<(String, String)>>(body)
            .map(|fields| Self { fields })
            .map_err(|e| DemoError::Validation(format!("Malformed form body: {e}")))
    }

    /// Decode a query string; malformed input yields an empty form
    pub fn from_query(query: Option<&str>) -> Self {
        query
            .and_then(|q| serde_urlencoded::from_str::<Vec<(String, String)>>(q).ok())
            .map(|fields| Self { fields })
            .unwrap_or_default()
    }

    /// First value submitted under `key`
    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Value under `key`, or the empty string when absent
    pub fn get_or_empty(&self, key: &str) -> &str {
        self.get(key).unwrap_or_default()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for FormData {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            fields: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_body() {
        let form = FormData::parse(b"intent=add&text=Buy+milk%21").unwrap();
        assert_eq!(form.get("intent"), Some("add"));
        assert_eq!(form.get("text"), Some("Buy milk!"));
        assert_eq!(form.get("id"), None);
        assert_eq!(form.get_or_empty("id"), "");
    }

    #[test]
    fn test_first_value_wins() {
        let form = FormData::parse(b"intent=toggle&intent=delete").unwrap();
        assert_eq!(form.get("intent"), Some("toggle"));
    }

    #[test]
    fn test_query() {
        let form = FormData::from_query(Some("q=ALICE&page=2"));
        assert_eq!(form.get("q"), Some("ALICE"));
        assert_eq!(FormData::from_query(None), FormData::default());
    }

    #[test]
    fn test_from_iter() {
        let form: FormData = [("intent", "reset")].into_iter().collect();
        assert_eq!(form.get("intent"), Some("reset"));
    }
}
