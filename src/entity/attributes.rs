use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "attributes")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(unique)]
    pub code: String,
    pub name: String,
    pub input_type: String,
    pub data_type: String,
    pub unit: Option<String>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::attribute_values::Entity")]
    AttributeValues,
    #[sea_orm(has_many = "super::attribute_set_assignments::Entity")]
    AttributeSetAssignments,
    #[sea_orm(has_many = "super::product_attribute_values::Entity")]
    ProductAttributeValues,
}

impl Related<super::attribute_values::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::AttributeValues.def()
    }
}

impl Related<super::attribute_set_assignments::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::AttributeSetAssignments.def()
    }
}

impl Related<super::product_attribute_values::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ProductAttributeValues.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
