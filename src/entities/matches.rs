use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// A scheduled fixture. `team1` is the home side; odds are quoted from its
/// perspective (win = `team1` wins).
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "matches")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    /// Human-readable date as published in the fixture list, e.g. `Thu 11 Jun`.
    pub date: String,
    #[sea_orm(unique)]
    pub match_number: i32,
    pub team1: String,
    pub team2: String,
    pub group: Option<String>,
    pub stadium: Option<String>,
    pub date_dt: Date,
    pub win_odds: Option<f64>,
    pub loss_odds: Option<f64>,
    pub draw_odds: Option<f64>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::predictions::Entity")]
    Prediction,
}

impl Related<super::predictions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Prediction.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
