use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};

use crate::auth::google::GoogleIdentity;
use crate::auth::password::{
    hash_password, normalize_email, validate_email, validate_password, verify_password,
};
use crate::entities::students;
use crate::error::AppError;
use crate::services::{check_length, is_unique_violation, non_blank, truncate_chars};

const MAX_NAME: usize = 100;
const MAX_EMAIL: usize = 255;
const INVALID_CREDENTIALS: &str = "Invalid email or password.";
const EMAIL_TAKEN: &str = "An account with this email already exists.";

pub struct StudentService;

impl StudentService {
    /// Register a student with a password.
    ///
    /// # Errors
    ///
    /// 400 for a missing or over-long name, or a malformed email or password; 409 if the email
    /// is taken.
    pub async fn register(
        db: &DatabaseConnection,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<students::Model, AppError> {
        let name = non_blank(Some(name))
            .ok_or_else(|| AppError::BadRequest("Missing required field: name".to_string()))?;
        check_length("name", &name, MAX_NAME).map_err(AppError::BadRequest)?;
        validate_email(email).map_err(AppError::BadRequest)?;
        validate_password(password).map_err(AppError::BadRequest)?;
        let email = normalize_email(email);
        check_length("email", &email, MAX_EMAIL).map_err(AppError::BadRequest)?;

        if Self::find_by_email(db, &email).await?.is_some() {
            return Err(AppError::Conflict(EMAIL_TAKEN.to_string()));
        }

        let student = students::ActiveModel {
            name: Set(name),
            email: Set(email),
            password_hash: Set(Some(hash_password(password)?)),
            google_id: Set(None),
            ..Default::default()
        };

        match student.insert(db).await {
            Ok(created) => {
                tracing::info!(student_id = created.id, "Student registered");
                Ok(created)
            }
            // Lost a race with a concurrent registration
            Err(e) if is_unique_violation(&e) => Err(AppError::Conflict(EMAIL_TAKEN.to_string())),
            Err(e) => Err(AppError::Internal(e.into())),
        }
    }

    /// Check an email and password pair.
    ///
    /// Unknown emails, wrong passwords and Google-only accounts all fail the same way.
    pub async fn authenticate(
        db: &DatabaseConnection,
        email: &str,
        password: &str,
    ) -> Result<students::Model, AppError> {
        let student = Self::find_by_email(db, &normalize_email(email))
            .await?
            .ok_or_else(|| AppError::Unauthorized(INVALID_CREDENTIALS.to_string()))?;

        let Some(hash) = student.password_hash.as_deref() else {
            return Err(AppError::Unauthorized(INVALID_CREDENTIALS.to_string()));
        };

        if !verify_password(password, hash)? {
            tracing::debug!(student_id = student.id, "Password mismatch");
            return Err(AppError::Unauthorized(INVALID_CREDENTIALS.to_string()));
        }

        Ok(student)
    }

    /// Sign in with a verified Google identity, creating or linking the account as needed.
    ///
    /// 1. A student already linked to this Google subject is returned as is.
    /// 2. Otherwise the email is looked up: no match creates a password-less student.
    /// 3. A match with no Google link gets this subject attached.
    /// 4. A match linked to a different subject is refused with 401.
    pub async fn sign_in_with_google(
        db: &DatabaseConnection,
        identity: &GoogleIdentity,
    ) -> Result<students::Model, AppError> {
        let txn = db.begin().await?;

        if let Some(student) = students::Entity::find()
            .filter(students::Column::GoogleId.eq(identity.subject.as_str()))
            .one(&txn)
            .await?
        {
            txn.commit().await?;
            return Ok(student);
        }

        let email = normalize_email(&identity.email);
        check_length("email", &email, MAX_EMAIL).map_err(AppError::BadRequest)?;
        let existing = students::Entity::find()
            .filter(students::Column::Email.eq(email.as_str()))
            .one(&txn)
            .await?;

        let student = match existing {
            None => {
                let name = identity
                    .name
                    .clone()
                    .or_else(|| non_blank(email.split('@').next()))
                    .unwrap_or_else(|| email.clone());
                let name = truncate_chars(&name, MAX_NAME);
                let created = students::ActiveModel {
                    name: Set(name),
                    email: Set(email),
                    password_hash: Set(None),
                    google_id: Set(Some(identity.subject.clone())),
                    ..Default::default()
                }
                .insert(&txn)
                .await?;
                tracing::info!(student_id = created.id, "Student created from Google sign-in");
                created
            }
            Some(student) if student.google_id.is_none() => {
                let student_id = student.id;
                let mut active: students::ActiveModel = student.into();
                active.google_id = Set(Some(identity.subject.clone()));
                let linked = active.update(&txn).await?;
                tracing::info!(student_id, "Google identity linked to existing student");
                linked
            }
            Some(student) => {
                tracing::warn!(
                    student_id = student.id,
                    "Email already linked to a different Google account"
                );
                return Err(AppError::Unauthorized(
                    "This email is linked to a different Google account.".to_string(),
                ));
            }
        };

        txn.commit().await?;
        Ok(student)
    }

    pub async fn find_by_email(
        db: &DatabaseConnection,
        email: &str,
    ) -> Result<Option<students::Model>, AppError> {
        let student = students::Entity::find()
            .filter(students::Column::Email.eq(normalize_email(email)))
            .one(db)
            .await?;
        Ok(student)
    }

    /// Every student, by name.
    pub async fn list(db: &DatabaseConnection) -> Result<Vec<students::Model>, AppError> {
        let rows = students::Entity::find()
            .order_by_asc(students::Column::Name)
            .all(db)
            .await?;
        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use migration::{Migrator, MigratorTrait};
    use sea_orm::Database;

    use super::*;

    async fn setup_db() -> DatabaseConnection {
        let db = Database::connect("sqlite::memory:")
            .await
            .expect("Failed to connect to test database");
        Migrator::up(&db, None)
            .await
            .expect("Failed to run migrations");
        db
    }

    fn identity(subject: &str, email: &str) -> GoogleIdentity {
        GoogleIdentity {
            subject: subject.to_string(),
            email: email.to_string(),
            name: None,
        }
    }

    #[tokio::test]
    async fn test_register_and_authenticate() {
        let db = setup_db().await;
        let created = StudentService::register(&db, "Ana", " Ana@Example.com ", "correct-horse")
            .await
            .expect("register");
        assert_eq!(created.email, "ana@example.com");
        assert!(created.password_hash.is_some());

        let found = StudentService::authenticate(&db, "ANA@example.com", "correct-horse")
            .await
            .expect("authenticate");
        assert_eq!(found.id, created.id);

        let wrong = StudentService::authenticate(&db, "ana@example.com", "wrong-horse").await;
        assert!(matches!(wrong, Err(AppError::Unauthorized(_))));
    }

    #[tokio::test]
    async fn test_register_duplicate_email_conflicts() {
        let db = setup_db().await;
        StudentService::register(&db, "Ana", "ana@example.com", "correct-horse")
            .await
            .expect("first register");
        let second = StudentService::register(&db, "Ana B", "ANA@example.com", "another-pass").await;
        assert!(matches!(second, Err(AppError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_register_validates_input() {
        let db = setup_db().await;
        let no_name = StudentService::register(&db, "  ", "ana@example.com", "correct-horse").await;
        assert!(matches!(no_name, Err(AppError::BadRequest(_))));
        let short = StudentService::register(&db, "Ana", "ana@example.com", "short").await;
        assert!(matches!(short, Err(AppError::BadRequest(_))));
        let bad_email = StudentService::register(&db, "Ana", "not-an-email", "correct-horse").await;
        assert!(matches!(bad_email, Err(AppError::BadRequest(_))));
    }

    #[tokio::test]
    async fn test_google_creates_then_reuses_student() {
        let db = setup_db().await;
        let first = StudentService::sign_in_with_google(&db, &identity("g-1", "fan@example.com"))
            .await
            .expect("create");
        assert_eq!(first.name, "fan");
        assert_eq!(first.google_id.as_deref(), Some("g-1"));
        assert!(first.password_hash.is_none());

        let again = StudentService::sign_in_with_google(&db, &identity("g-1", "fan@example.com"))
            .await
            .expect("reuse");
        assert_eq!(again.id, first.id);

        // Google-only accounts cannot log in with a password
        let login = StudentService::authenticate(&db, "fan@example.com", "whatever-pass").await;
        assert!(matches!(login, Err(AppError::Unauthorized(_))));
    }

    #[tokio::test]
    async fn test_register_rejects_long_name() {
        let db = setup_db().await;
        let name = "n".repeat(101);
        let result = StudentService::register(&db, &name, "ana@example.com", "correct-horse").await;
        assert!(matches!(result, Err(AppError::BadRequest(msg)) if msg.contains("name")));
    }

    #[tokio::test]
    async fn test_google_truncates_long_display_name() {
        let db = setup_db().await;
        let mut long = identity("g-5", "fan@example.com");
        long.name = Some("Ñ".repeat(150));
        let student = StudentService::sign_in_with_google(&db, &long)
            .await
            .expect("create");
        assert_eq!(student.name.chars().count(), 100);
    }

    #[tokio::test]
    async fn test_google_links_existing_email() {
        let db = setup_db().await;
        let registered = StudentService::register(&db, "Ana", "ana@example.com", "correct-horse")
            .await
            .expect("register");
        let linked = StudentService::sign_in_with_google(&db, &identity("g-2", "ana@example.com"))
            .await
            .expect("link");
        assert_eq!(linked.id, registered.id);
        assert_eq!(linked.google_id.as_deref(), Some("g-2"));
        assert!(linked.password_hash.is_some());
    }

    #[tokio::test]
    async fn test_google_rejects_different_subject() {
        let db = setup_db().await;
        StudentService::sign_in_with_google(&db, &identity("g-3", "ana@example.com"))
            .await
            .expect("create");
        let other = StudentService::sign_in_with_google(&db, &identity("g-4", "ana@example.com")).await;
        assert!(matches!(other, Err(AppError::Unauthorized(_))));
    }
}
