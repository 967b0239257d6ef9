use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};
use utoipa::ToSchema;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, AsRefStr, ToSchema,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum InputType {
    Select,
    Multiselect,
    Text,
    Number,
    Boolean,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, AsRefStr, ToSchema,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum DataType {
    String,
    Number,
    Boolean,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Attribute {
    pub id: i64,
    pub code: String,
    pub name: String,
    pub input_type: InputType,
    pub data_type: DataType,
    pub unit: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Field-wise replacement for [`Attribute::update`]. `unit: Some(None)` clears it.
#[derive(Debug, Clone, Default)]
pub struct AttributePatch {
    pub code: Option<String>,
    pub name: Option<String>,
    pub input_type: Option<InputType>,
    pub data_type: Option<DataType>,
    pub unit: Option<Option<String>>,
}

impl Attribute {
    /// Unsaved attribute; the repository assigns the id.
    pub fn create(
        code: String,
        name: String,
        input_type: InputType,
        data_type: DataType,
        unit: Option<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: 0,
            code,
            name,
            input_type,
            data_type,
            unit: unit.filter(|u| !u.is_empty()),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn update(self, patch: AttributePatch) -> Self {
        Self {
            code: patch.code.unwrap_or(self.code),
            name: patch.name.unwrap_or(self.name),
            input_type: patch.input_type.unwrap_or(self.input_type),
            data_type: patch.data_type.unwrap_or(self.data_type),
            unit: patch.unit.unwrap_or(self.unit),
            updated_at: Utc::now(),
            ..self
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AttributeValue {
    pub id: i64,
    pub attribute_id: i64,
    pub value_code: String,
    pub label: String,
    pub sort_order: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl AttributeValue {
    pub fn create(attribute_id: i64, value_code: String, label: String, sort_order: i32) -> Self {
        let now = Utc::now();
        Self {
            id: 0,
            attribute_id,
            value_code,
            label,
            sort_order,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn update(
        self,
        value_code: Option<String>,
        label: Option<String>,
        sort_order: Option<i32>,
    ) -> Self {
        Self {
            value_code: value_code.unwrap_or(self.value_code),
            label: label.unwrap_or(self.label),
            sort_order: sort_order.unwrap_or(self.sort_order),
            updated_at: Utc::now(),
            ..self
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AttributeSet {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub is_system: bool,
    pub sort_order: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Resolved from the set's assignments; empty on freshly loaded rows.
    pub attributes: Vec<Attribute>,
}

impl AttributeSet {
    pub fn create(name: String, description: Option<String>, is_system: bool, sort_order: i32) -> Self {
        let now = Utc::now();
        Self {
            id: 0,
            name,
            description: description.filter(|d| !d.is_empty()),
            is_system,
            sort_order,
            created_at: now,
            updated_at: now,
            attributes: Vec::new(),
        }
    }

    /// `description: Some(None)` clears it.
    pub fn update(self, name: Option<String>, description: Option<Option<String>>) -> Self {
        Self {
            name: name.unwrap_or(self.name),
            description: description.unwrap_or(self.description),
            updated_at: Utc::now(),
            ..self
        }
    }

    pub fn with_attributes(self, attributes: Vec<Attribute>) -> Self {
        Self { attributes, ..self }
    }

    pub fn has_attribute(&self, attribute_id: i64) -> bool {
        self.attributes.iter().any(|a| a.id == attribute_id)
    }

    pub fn attribute_count(&self) -> usize {
        self.attributes.len()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AttributeSetAssignment {
    pub id: i64,
    pub attribute_set_id: i64,
    pub attribute_id: i64,
    pub sort_order: i32,
    pub is_required: bool,
    pub created_at: DateTime<Utc>,
}

impl AttributeSetAssignment {
    pub fn create(attribute_set_id: i64, attribute_id: i64, sort_order: i32, is_required: bool) -> Self {
        Self {
            id: 0,
            attribute_set_id,
            attribute_id,
            sort_order,
            is_required,
            created_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn color() -> Attribute {
        Attribute::create(
            "color".into(),
            "Color".into(),
            InputType::Select,
            DataType::String,
            None,
        )
    }

    #[test]
    fn create_yields_unsaved_record_with_equal_timestamps() {
        let attribute = color();
        assert_eq!(attribute.id, 0);
        assert_eq!(attribute.created_at, attribute.updated_at);
    }

    #[test]
    fn update_keeps_untouched_fields_and_refreshes_updated_at() {
        let original = Attribute {
            unit: Some("cm".into()),
            ..color()
        };
        let created_at = original.created_at;
        let updated = original.update(AttributePatch {
            name: Some("Colour".into()),
            ..Default::default()
        });
        assert_eq!(updated.code, "color");
        assert_eq!(updated.name, "Colour");
        assert_eq!(updated.unit.as_deref(), Some("cm"));
        assert_eq!(updated.created_at, created_at);
        assert!(updated.updated_at >= created_at);

        let cleared = updated.update(AttributePatch {
            unit: Some(None),
            ..Default::default()
        });
        assert_eq!(cleared.unit, None);
    }

    #[test]
    fn enums_round_trip_through_their_storage_names() {
        assert_eq!(InputType::Multiselect.as_ref(), "multiselect");
        assert_eq!("boolean".parse::<DataType>().unwrap(), DataType::Boolean);
        assert!("date".parse::<InputType>().is_err());
    }
}
