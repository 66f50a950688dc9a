use std::fmt;

use serde::{
    Deserialize, Deserializer, Serialize, Serializer,
    de::{self, MapAccess, Visitor},
};

/// Flat string-to-string label map that keeps the order it was read in.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Labels(Vec<(String, String)>);

impl Labels {
    pub fn new() -> Self {
        Labels::default()
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Sets `key`, keeping its position when it already exists.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.0.iter_mut().find(|(k, _)| *k == key) {
            Some((_, existing)) => *existing = value,
            None => self.0.push((key, value)),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn values_mut(&mut self) -> impl Iterator<Item = &mut String> {
        self.0.iter_mut().map(|(_, v)| v)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for Labels
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut labels = Labels::new();
        for (k, v) in iter {
            labels.insert(k, v);
        }
        labels
    }
}

impl Serialize for Labels {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.0.iter().map(|(k, v)| (k, v)))
    }
}

impl<'de> Deserialize<'de> for Labels {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct LabelsVisitor;

        impl<'de> Visitor<'de> for LabelsVisitor {
            type Value = Labels;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map of string keys to string values")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Labels, A::Error> {
                let mut entries: Vec<(String, String)> = Vec::new();
                while let Some((key, value)) = map.next_entry::<String, String>()? {
                    if entries.iter().any(|(k, _)| *k == key) {
                        return Err(de::Error::custom(format!("duplicate label key '{key}'")));
                    }
                    entries.push((key, value));
                }
                Ok(Labels(entries))
            }
        }

        deserializer.deserialize_map(LabelsVisitor)
    }
}

/// Label selector with equality labels and set-based expressions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct LabelSelector {
    #[serde(default, skip_serializing_if = "Labels::is_empty")]
    pub match_labels: Labels,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub match_expressions: Vec<LabelSelectorRequirement>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct LabelSelectorRequirement {
    pub key: String,
    pub operator: LabelSelectorOperator,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub values: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LabelSelectorOperator {
    In,
    NotIn,
    Exists,
    DoesNotExist,
}

#[cfg(test)]
mod tests {
    use assert2::{check, let_assert};

    use super::*;

    #[test]
    fn labels_keep_document_order() {
        let labels: Labels = serde_yaml::from_str("zone: a\napp: web\ntier: b\n").unwrap();

        let keys: Vec<_> = labels.iter().map(|(k, _)| k).collect();
        check!(keys == vec!["zone", "app", "tier"]);
    }

    #[test]
    fn labels_reject_nested_values() {
        let result = serde_yaml::from_str::<Labels>("app:\n  nested: true\n");

        check!(result.is_err());
    }

    #[test]
    fn labels_serialize_in_order() {
        let labels: Labels = [("b", "x"), ("a", "y")].into_iter().collect();

        check!(serde_yaml::to_string(&labels).unwrap() == "b: x\na: y\n");
    }

    #[test]
    fn selector_rejects_unknown_fields() {
        let result = serde_yaml::from_str::<LabelSelector>("matchLabels: {}\nextra: 1\n");

        let_assert!(Err(e) = result);
        check!(e.to_string().contains("unknown field"));
    }

    #[test]
    fn selector_parses_expressions() {
        let selector: LabelSelector = serde_yaml::from_str(concat!(
            "matchLabels:\n  app: web\n",
            "matchExpressions:\n  - key: tier\n    operator: In\n    values: [a, b]\n",
        ))
        .unwrap();

        check!(selector.match_labels.get("app") == Some("web"));
        check!(selector.match_expressions[0].operator == LabelSelectorOperator::In);
        check!(selector.match_expressions[0].values == vec!["a", "b"]);
    }
}
