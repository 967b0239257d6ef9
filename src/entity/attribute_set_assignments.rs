use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "attribute_set_assignments")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub attribute_set_id: i64,
    pub attribute_id: i64,
    pub sort_order: i32,
    pub is_required: bool,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::attribute_sets::Entity",
        from = "Column::AttributeSetId",
        to = "super::attribute_sets::Column::Id"
    )]
    AttributeSet,
    #[sea_orm(
        belongs_to = "super::attributes::Entity",
        from = "Column::AttributeId",
        to = "super::attributes::Column::Id"
    )]
    Attribute,
}

impl Related<super::attribute_sets::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::AttributeSet.def()
    }
}

impl Related<super::attributes::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Attribute.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
