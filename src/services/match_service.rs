use std::collections::{HashMap, HashSet};

use chrono::{NaiveDate, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect, Set,
};

use crate::entities::{Outcome, matches, predictions};
use crate::error::AppError;
use crate::services::is_unique_violation;

/// A fixture together with the viewing student's prediction, if any.
#[derive(Debug, Clone)]
pub struct FixtureWithPrediction {
    pub fixture: matches::Model,
    pub prediction: Option<predictions::Model>,
}

struct SampleMatch {
    date: &'static str,
    match_number: i32,
    team1: &'static str,
    team2: &'static str,
    group: &'static str,
    stadium: &'static str,
    ymd: (i32, u32, u32),
    odds: (f64, f64, f64),
}

/// Odds are (win, loss, draw) for `team1`.
const SAMPLE_MATCHES: [SampleMatch; 4] = [
    SampleMatch {
        date: "Thu 11 Jun",
        match_number: 1,
        team1: "Mexico",
        team2: "South Africa",
        group: "Group A",
        stadium: "Estadio Azteca",
        ymd: (2026, 6, 11),
        odds: (1.65, 5.25, 3.70),
    },
    SampleMatch {
        date: "Fri 12 Jun",
        match_number: 2,
        team1: "Canada",
        team2: "Ghana",
        group: "Group B",
        stadium: "BMO Field",
        ymd: (2026, 6, 12),
        odds: (2.30, 3.20, 3.10),
    },
    SampleMatch {
        date: "Fri 12 Jun",
        match_number: 3,
        team1: "United States",
        team2: "Paraguay",
        group: "Group D",
        stadium: "SoFi Stadium",
        ymd: (2026, 6, 12),
        odds: (1.95, 4.00, 3.40),
    },
    SampleMatch {
        date: "Sat 13 Jun",
        match_number: 4,
        team1: "Brazil",
        team2: "Morocco",
        group: "Group C",
        stadium: "MetLife Stadium",
        ymd: (2026, 6, 13),
        odds: (1.80, 4.50, 3.50),
    },
];

pub struct MatchService;

impl MatchService {
    /// All fixtures in kick-off order
    pub async fn list(db: &DatabaseConnection) -> Result<Vec<matches::Model>, AppError> {
        let rows = matches::Entity::find()
            .order_by_asc(matches::Column::DateDt)
            .order_by_asc(matches::Column::MatchNumber)
            .all(db)
            .await?;
        Ok(rows)
    }

    /// Fixtures paired with the student's predictions
    pub async fn list_with_predictions(
        db: &DatabaseConnection,
        student_id: i32,
    ) -> Result<Vec<FixtureWithPrediction>, AppError> {
        let mut picks: HashMap<i32, predictions::Model> = predictions::Entity::find()
            .filter(predictions::Column::StudentId.eq(student_id))
            .all(db)
            .await?
            .into_iter()
            .map(|p| (p.match_id, p))
            .collect();

        let fixtures = Self::list(db).await?;
        Ok(fixtures
            .into_iter()
            .map(|fixture| FixtureWithPrediction {
                prediction: picks.remove(&fixture.id),
                fixture,
            })
            .collect())
    }

    /// Insert the sample fixtures whose match numbers are not taken yet.
    /// Returns how many were inserted.
    pub async fn add_dummy_matches(db: &DatabaseConnection) -> Result<usize, AppError> {
        let taken: HashSet<i32> = matches::Entity::find()
            .select_only()
            .column(matches::Column::MatchNumber)
            .into_tuple::<i32>()
            .all(db)
            .await?
            .into_iter()
            .collect();

        let rows: Vec<matches::ActiveModel> = SAMPLE_MATCHES
            .iter()
            .filter(|m| !taken.contains(&m.match_number))
            .filter_map(|m| {
                let (y, mo, d) = m.ymd;
                let date_dt = NaiveDate::from_ymd_opt(y, mo, d)?;
                let (win, loss, draw) = m.odds;
                Some(matches::ActiveModel {
                    date: Set(m.date.to_string()),
                    match_number: Set(m.match_number),
                    team1: Set(m.team1.to_string()),
                    team2: Set(m.team2.to_string()),
                    group: Set(Some(m.group.to_string())),
                    stadium: Set(Some(m.stadium.to_string())),
                    date_dt: Set(date_dt),
                    win_odds: Set(Some(win)),
                    loss_odds: Set(Some(loss)),
                    draw_odds: Set(Some(draw)),
                    ..Default::default()
                })
            })
            .collect();

        let count = rows.len();
        if count > 0 {
            matches::Entity::insert_many(rows)
                .exec_without_returning(db)
                .await?;
        }
        tracing::info!(count, "Sample matches inserted");
        Ok(count)
    }

    /// Record a student's prediction for a match. Each student predicts a match once.
    pub async fn submit_prediction(
        db: &DatabaseConnection,
        student_id: i32,
        match_id: i32,
        outcome: &str,
    ) -> Result<predictions::Model, AppError> {
        let outcome = Outcome::from_str(outcome).ok_or_else(|| {
            AppError::BadRequest(format!(
                "Unknown outcome {outcome:?}; expected win, draw or loss."
            ))
        })?;

        matches::Entity::find_by_id(match_id)
            .one(db)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("No match with id {match_id}.")))?;

        let existing = predictions::Entity::find()
            .filter(predictions::Column::StudentId.eq(student_id))
            .filter(predictions::Column::MatchId.eq(match_id))
            .one(db)
            .await?;
        if existing.is_some() {
            return Err(AppError::Conflict(
                "You have already predicted this match.".to_string(),
            ));
        }

        let prediction = predictions::ActiveModel {
            student_id: Set(student_id),
            match_id: Set(match_id),
            outcome: Set(outcome.as_str().to_string()),
            created_at: Set(Utc::now().fixed_offset()),
            ..Default::default()
        };

        match prediction.insert(db).await {
            Ok(created) => {
                tracing::info!(student_id, match_id, outcome = %outcome, "Prediction submitted");
                Ok(created)
            }
            Err(e) if is_unique_violation(&e) => Err(AppError::Conflict(
                "You have already predicted this match.".to_string(),
            )),
            Err(e) => Err(AppError::Internal(e.into())),
        }
    }
}
