//! Bulk import of match fixtures from CSV.
//!
//! Expected columns, in order, after a header row:
//! `date, match_number, teams, group, stadium, date_dt`, where `teams` reads `Home v Away`
//! and `date_dt` is an ISO `YYYY-MM-DD` date. Rows with any other number of columns, or with
//! text too long for its column, are rejected. Bad rows are reported and skipped; the good
//! rows are inserted in a single transaction.

use std::collections::HashSet;

use chrono::NaiveDate;
use csv::{ReaderBuilder, StringRecord, Trim};
use sea_orm::ActiveValue::{self, NotSet, Set};
use sea_orm::{DatabaseConnection, EntityTrait, QuerySelect, TransactionTrait};
use serde::Deserialize;

use crate::entities::matches;
use crate::services::check_length;

/// Rows per `INSERT` statement, keeping well under `SQLite`'s bind-parameter limit.
const INSERT_CHUNK: usize = 100;

/// Separator between the home and away side in the `teams` column.
const TEAMS_DELIMITER: &str = " v ";

const COLUMNS: usize = 6;

// Column widths of the `matches` table
const MAX_DATE: usize = 50;
const MAX_TEAM: usize = 100;
const MAX_GROUP: usize = 50;
const MAX_STADIUM: usize = 150;

/// A row that could not be imported.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("line {line}: {reason}")]
pub struct RowError {
    /// 1-based line in the input, counting the header.
    pub line: u64,
    pub reason: String,
}

/// Outcome of an import run.
#[derive(Debug, Default)]
pub struct ImportReport {
    pub imported: usize,
    pub errors: Vec<RowError>,
}

impl ImportReport {
    /// Whether every data row made it into the database.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.errors.is_empty()
    }
}

#[derive(Debug, Deserialize)]
struct CsvMatchRow {
    date: String,
    match_number: String,
    teams: String,
    group: String,
    stadium: String,
    date_dt: String,
}

/// Split `Home v Away` into its two sides.
///
/// # Errors
///
/// Returns a message if the delimiter is missing or either side is blank.
pub fn split_teams(field: &str) -> Result<(String, String), String> {
    let (home, away) = field
        .split_once(TEAMS_DELIMITER)
        .ok_or_else(|| format!("teams field {field:?} is missing the \"v\" delimiter"))?;

    let (home, away) = (home.trim(), away.trim());
    if home.is_empty() || away.is_empty() {
        return Err(format!("teams field {field:?} names an empty side"));
    }
    Ok((home.to_string(), away.to_string()))
}

fn none_if_blank(value: String) -> Option<String> {
    if value.trim().is_empty() { None } else { Some(value) }
}

/// Turn one CSV record into a staged match.
///
/// # Errors
///
/// Returns a message naming the offending field.
pub fn parse_match_record(record: &StringRecord) -> Result<matches::ActiveModel, String> {
    if record.len() != COLUMNS {
        return Err(format!(
            "expected {COLUMNS} columns, found {}",
            record.len()
        ));
    }

    let row: CsvMatchRow = record
        .deserialize(None)
        .map_err(|e| format!("malformed row: {e}"))?;

    let match_number = row
        .match_number
        .trim()
        .parse::<i32>()
        .map_err(|_| format!("match number {:?} is not an integer", row.match_number))?;

    let date_dt = NaiveDate::parse_from_str(row.date_dt.trim(), "%Y-%m-%d")
        .map_err(|_| format!("date {:?} is not in YYYY-MM-DD format", row.date_dt))?;

    let (team1, team2) = split_teams(&row.teams)?;
    let date = row.date.trim().to_string();
    let group = none_if_blank(row.group);
    let stadium = none_if_blank(row.stadium);

    check_length("date", &date, MAX_DATE)?;
    check_length("home team", &team1, MAX_TEAM)?;
    check_length("away team", &team2, MAX_TEAM)?;
    if let Some(group) = &group {
        check_length("group", group, MAX_GROUP)?;
    }
    if let Some(stadium) = &stadium {
        check_length("stadium", stadium, MAX_STADIUM)?;
    }

    Ok(matches::ActiveModel {
        id: NotSet,
        date: Set(date),
        match_number: Set(match_number),
        team1: Set(team1),
        team2: Set(team2),
        group: Set(group),
        stadium: Set(stadium),
        date_dt: Set(date_dt),
        win_odds: Set(None),
        loss_odds: Set(None),
        draw_odds: Set(None),
    })
}

/// Import match fixtures from CSV bytes.
///
/// Rows that fail to parse, or whose match number already exists (in the database or earlier
/// in the same file), are collected in the report. Everything else is committed at once.
///
/// # Errors
///
/// Returns an error only if the database cannot be read or the final commit fails.
pub async fn import_matches(db: &DatabaseConnection, input: &[u8]) -> anyhow::Result<ImportReport> {
    let mut taken: HashSet<i32> = matches::Entity::find()
        .select_only()
        .column(matches::Column::MatchNumber)
        .into_tuple::<i32>()
        .all(db)
        .await?
        .into_iter()
        .collect();

    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(input);

    let mut staged = Vec::new();
    let mut errors = Vec::new();

    for result in reader.records() {
        let record = match result {
            Ok(record) => record,
            Err(e) => {
                let line = e.position().map_or(0, csv::Position::line);
                errors.push(RowError {
                    line,
                    reason: format!("unreadable row: {e}"),
                });
                continue;
            }
        };
        let line = record.position().map_or(0, csv::Position::line);

        if record.iter().all(str::is_empty) {
            continue;
        }

        match parse_match_record(&record) {
            Ok(model) => {
                let number = match &model.match_number {
                    ActiveValue::Set(n) | ActiveValue::Unchanged(n) => *n,
                    ActiveValue::NotSet => continue,
                };
                if taken.insert(number) {
                    staged.push(model);
                } else {
                    errors.push(RowError {
                        line,
                        reason: format!("match number {number} already exists"),
                    });
                }
            }
            Err(reason) => errors.push(RowError { line, reason }),
        }
    }

    let imported = staged.len();
    if !staged.is_empty() {
        let txn = db.begin().await?;
        for chunk in staged.chunks(INSERT_CHUNK) {
            matches::Entity::insert_many(chunk.to_vec())
                .exec_without_returning(&txn)
                .await?;
        }
        txn.commit().await?;
    }

    for err in &errors {
        tracing::warn!(line = err.line, reason = %err.reason, "Skipped match row");
    }
    tracing::info!(imported, failed = errors.len(), "Match import finished");

    Ok(ImportReport { imported, errors })
}
