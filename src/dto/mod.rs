use serde::{Deserialize, Deserializer};

pub mod attributes;
pub mod categories;
pub mod products;
pub mod stores;
pub mod users;

/// Tells an absent field (`None`) apart from an explicit `null` (`Some(None)`).
/// Pair with `#[serde(default)]`.
pub fn double_option<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Deserialize)]
    struct Patch {
        #[serde(default, deserialize_with = "double_option")]
        unit: Option<Option<String>>,
    }

    #[test]
    fn null_and_absent_are_distinct() {
        let absent: Patch = serde_json::from_str("{}").unwrap();
        let null: Patch = serde_json::from_str(r#"{"unit":null}"#).unwrap();
        let set: Patch = serde_json::from_str(r#"{"unit":"cm"}"#).unwrap();
        assert_eq!(absent.unit, None);
        assert_eq!(null.unit, Some(None));
        assert_eq!(set.unit, Some(Some("cm".to_string())));
    }
}
