use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "courses")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub course_name: String,
    pub instructor: Option<String>,
    pub image: Option<String>,
    pub link: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::enrollments::Entity")]
    Enrollment,
}

impl Related<super::enrollments::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Enrollment.def()
    }
}

/// Courses reach students through the `enrollments` association.
impl Related<super::students::Entity> for Entity {
    fn to() -> RelationDef {
        super::enrollments::Relation::Student.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::enrollments::Relation::Course.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}
