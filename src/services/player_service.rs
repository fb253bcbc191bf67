use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryOrder, Set,
    TransactionTrait,
};

use crate::entities::players;
use crate::error::AppError;
use crate::services::{check_length, non_blank};

const MAX_NAME: usize = 100;
const MAX_POSITION: usize = 50;
const MAX_TEAM: usize = 100;

/// Validated input for a new player.
#[derive(Debug, Clone, Default)]
pub struct NewPlayer {
    pub name: String,
    pub position: Option<String>,
    pub team: Option<String>,
    pub jersey_number: Option<i32>,
}

impl NewPlayer {
    /// Build from raw form values.
    ///
    /// A blank or non-numeric jersey number is stored as NULL rather than rejected.
    ///
    /// # Errors
    ///
    /// Returns `BadRequest` if `name` is missing or blank, or any text field is too long.
    pub fn from_form(
        name: Option<&str>,
        position: Option<&str>,
        team: Option<&str>,
        jersey_number: Option<&str>,
    ) -> Result<Self, AppError> {
        let name = non_blank(name)
            .ok_or_else(|| AppError::BadRequest("Missing required field: name".to_string()))?;
        let position = non_blank(position);
        let team = non_blank(team);

        check_length("name", &name, MAX_NAME).map_err(AppError::BadRequest)?;
        if let Some(position) = &position {
            check_length("position", position, MAX_POSITION).map_err(AppError::BadRequest)?;
        }
        if let Some(team) = &team {
            check_length("team", team, MAX_TEAM).map_err(AppError::BadRequest)?;
        }

        Ok(Self {
            name,
            position,
            team,
            jersey_number: jersey_number.and_then(|n| n.trim().parse::<i32>().ok()),
        })
    }
}

const SAMPLE_PLAYERS: [(&str, &str, &str, i32); 4] = [
    ("Cristiano Ronaldo", "Forward", "Manchester United", 7),
    ("Lionel Messi", "Forward", "Paris Saint-Germain", 30),
    ("Neymar Jr", "Forward", "Paris Saint-Germain", 10),
    ("Kevin De Bruyne", "Midfielder", "Manchester City", 17),
];

pub struct PlayerService;

impl PlayerService {
    /// All players, oldest first
    pub async fn list(db: &DatabaseConnection) -> Result<Vec<players::Model>, AppError> {
        let rows = players::Entity::find()
            .order_by_asc(players::Column::Id)
            .all(db)
            .await?;
        Ok(rows)
    }

    /// Insert a player
    pub async fn create(
        db: &DatabaseConnection,
        player: NewPlayer,
    ) -> Result<players::Model, AppError> {
        let model = players::ActiveModel {
            name: Set(player.name),
            position: Set(player.position),
            team: Set(player.team),
            jersey_number: Set(player.jersey_number),
            created_at: Set(Utc::now().fixed_offset()),
            ..Default::default()
        };

        let created = model.insert(db).await?;
        tracing::info!(player_id = created.id, name = %created.name, "Player created");
        Ok(created)
    }

    /// Insert the fixed placeholder player used to smoke-test the database
    pub async fn add_dummy(db: &DatabaseConnection) -> Result<players::Model, AppError> {
        Self::create(
            db,
            NewPlayer {
                name: "Dummy Player".to_string(),
                position: Some("Midfielder".to_string()),
                team: Some("Test Team".to_string()),
                jersey_number: Some(99),
            },
        )
        .await
    }

    /// Seed sample players when the table is empty. Returns how many were inserted.
    pub async fn seed_samples(db: &DatabaseConnection) -> Result<usize, AppError> {
        if players::Entity::find().count(db).await? > 0 {
            tracing::info!("Database already contains players");
            return Ok(0);
        }

        let now = Utc::now().fixed_offset();
        let rows = SAMPLE_PLAYERS.map(|(name, position, team, number)| players::ActiveModel {
            name: Set(name.to_string()),
            position: Set(Some(position.to_string())),
            team: Set(Some(team.to_string())),
            jersey_number: Set(Some(number)),
            created_at: Set(now),
            ..Default::default()
        });

        let txn = db.begin().await?;
        players::Entity::insert_many(rows)
            .exec_without_returning(&txn)
            .await?;
        txn.commit().await?;

        tracing::info!(count = SAMPLE_PLAYERS.len(), "Sample players inserted");
        Ok(SAMPLE_PLAYERS.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_form_requires_name() {
        assert!(NewPlayer::from_form(None, Some("Forward"), None, None).is_err());
        assert!(NewPlayer::from_form(Some("  "), None, None, None).is_err());
    }

    #[test]
    fn test_from_form_optional_fields() {
        let player = NewPlayer::from_form(Some(" Pele "), Some(""), None, Some("abc"))
            .unwrap_or_default();
        assert_eq!(player.name, "Pele");
        assert_eq!(player.position, None);
        assert_eq!(player.team, None);
        assert_eq!(player.jersey_number, None);
    }

    #[test]
    fn test_from_form_rejects_long_fields() {
        let long_name = "x".repeat(101);
        assert!(matches!(
            NewPlayer::from_form(Some(&long_name), None, None, None),
            Err(AppError::BadRequest(msg)) if msg.contains("at most 100")
        ));
        let long_position = "p".repeat(51);
        assert!(NewPlayer::from_form(Some("Pele"), Some(&long_position), None, None).is_err());
        assert!(NewPlayer::from_form(Some(&"x".repeat(100)), None, None, None).is_ok());
    }

    #[test]
    fn test_from_form_parses_jersey_number() {
        let player = NewPlayer::from_form(Some("Pele"), None, Some("Santos"), Some(" 10 "))
            .unwrap_or_default();
        assert_eq!(player.team.as_deref(), Some("Santos"));
        assert_eq!(player.jersey_number, Some(10));
    }
}
