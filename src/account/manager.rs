/// Account manager implementation using runtime queries
use crate::{
    account::{ProfilePatch, SignupRequest},
    config::ServerConfig,
    db::account::{
        Account, Address, AdminPermissions, BookingPreferences, EmergencyContact, Session,
        UserRole,
    },
    error::{ApiError, ApiResult},
    validation::{self, FieldError},
};
use chrono::{DateTime, Duration, NaiveDate, Utc};
use sqlx::{sqlite::SqliteRow, Row, SqlitePool};
use std::sync::Arc;
use uuid::Uuid;

const ACCOUNT_COLUMNS: &str = "id, name, email, phone, password_hash, user_type, date_of_birth,
    gender, nationality, address, emergency_contact, occupation, company, student_id,
    booking_preferences, admin_permissions, is_active, is_verified, is_blocked,
    login_attempts, lock_until, last_login, created_at, updated_at";

/// Account manager service
pub struct AccountManager {
    db: SqlitePool,
    config: Arc<ServerConfig>,
}

impl AccountManager {
    pub fn new(db: SqlitePool, config: Arc<ServerConfig>) -> Self {
        Self { db, config }
    }

    /// Register a new account
    ///
    /// Email and phone uniqueness is ultimately decided by the schema's
    /// UNIQUE constraints, so two concurrent registrations cannot both
    /// succeed; the pre-checks exist to keep the two per-field conflict
    /// messages distinct.
    pub async fn register(&self, req: SignupRequest) -> ApiResult<Account> {
        let mut missing = Vec::new();
        for (field, value) in [
            ("name", &req.name),
            ("email", &req.email),
            ("phone", &req.phone),
            ("password", &req.password),
        ] {
            if value.trim().is_empty() {
                missing.push(FieldError::new(
                    field,
                    &format!("Field '{}' is required", field),
                ));
            }
        }
        if !req.email.trim().is_empty() && !validation::is_valid_email(req.email.trim()) {
            missing.push(FieldError::new("email", "Please enter a valid email"));
        }
        if !missing.is_empty() {
            return Err(ApiError::InvalidForm(missing));
        }

        let user_type = match &req.user_type {
            Some(raw) => UserRole::from_str(raw)?,
            None => UserRole::Customer,
        };

        let email = normalize_email(&req.email);
        let phone = req.phone.trim().to_string();

        if self.email_exists(&email).await? {
            return Err(ApiError::Conflict(
                "Email already in use. Please use a different email or sign in.".to_string(),
            ));
        }
        if self.phone_exists(&phone).await? {
            return Err(ApiError::Conflict(
                "Phone number already in use. Please use a different phone number.".to_string(),
            ));
        }

        let password_hash = bcrypt::hash(&req.password, self.config.auth.bcrypt_cost)
            .map_err(|e| ApiError::Internal(format!("Password hashing failed: {}", e)))?;

        // Role-specific sub-structures are mutually exclusive
        let booking_preferences = match user_type {
            UserRole::Customer => Some(req.booking_preferences.unwrap_or_default()),
            UserRole::Admin => None,
        };
        let admin_permissions = match user_type {
            UserRole::Admin => Some(req.admin_permissions.unwrap_or_default()),
            UserRole::Customer => None,
        };

        let now = Utc::now();
        let account = Account {
            id: Uuid::new_v4().to_string(),
            name: req.name.trim().to_string(),
            email,
            phone,
            password_hash,
            user_type,
            date_of_birth: req.date_of_birth,
            gender: req.gender,
            nationality: req.nationality,
            address: req.address,
            emergency_contact: req.emergency_contact,
            occupation: req.occupation,
            company: req.company,
            student_id: req.student_id,
            booking_preferences,
            admin_permissions,
            is_active: true,
            is_verified: false,
            is_blocked: false,
            login_attempts: 0,
            lock_until: None,
            last_login: None,
            created_at: now,
            updated_at: now,
        };

        self.insert_account(&account).await?;

        tracing::info!(account_id = %account.id, role = account.user_type.as_str(), "account registered");

        Ok(account)
    }

    async fn insert_account(&self, account: &Account) -> ApiResult<()> {
        sqlx::query(
            "INSERT INTO account (id, name, email, phone, password_hash, user_type,
                 date_of_birth, gender, nationality, address, emergency_contact,
                 occupation, company, student_id, booking_preferences, admin_permissions,
                 is_active, is_verified, is_blocked, login_attempts, lock_until, last_login,
                 created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16,
                 ?17, ?18, ?19, ?20, ?21, ?22, ?23, ?24)",
        )
        .bind(&account.id)
        .bind(&account.name)
        .bind(&account.email)
        .bind(&account.phone)
        .bind(&account.password_hash)
        .bind(account.user_type.as_str())
        .bind(account.date_of_birth.map(|d| d.to_string()))
        .bind(&account.gender)
        .bind(&account.nationality)
        .bind(to_json_opt(account.address.as_ref())?)
        .bind(to_json_opt(account.emergency_contact.as_ref())?)
        .bind(&account.occupation)
        .bind(&account.company)
        .bind(&account.student_id)
        .bind(to_json_opt(account.booking_preferences.as_ref())?)
        .bind(to_json_opt(account.admin_permissions.as_ref())?)
        .bind(account.is_active)
        .bind(account.is_verified)
        .bind(account.is_blocked)
        .bind(account.login_attempts)
        .bind(account.lock_until)
        .bind(account.last_login)
        .bind(account.created_at)
        .bind(account.updated_at)
        .execute(&self.db)
        .await
        .map_err(map_unique_violation)?;

        Ok(())
    }

    /// Authenticate by email and password, enforcing the lockout policy
    pub async fn authenticate(&self, email: &str, password: &str) -> ApiResult<(Account, Session)> {
        // Normalized the same way registration normalizes, so an account
        // signed up with a mixed-case email can still log in
        let email = normalize_email(email);
        let account = self
            .get_account_by_email(&email)
            .await?
            .ok_or_else(|| ApiError::NotFound("No account found with this email".to_string()))?;

        let now = Utc::now();
        if account.is_locked(now) {
            return Err(ApiError::Locked(
                "Account locked due to too many failed login attempts. Try again later."
                    .to_string(),
            ));
        }

        let valid = bcrypt::verify(password, &account.password_hash)
            .map_err(|e| ApiError::Internal(format!("Password verification failed: {}", e)))?;

        if !valid {
            self.record_failed_login(&account, now).await?;
            return Err(ApiError::InvalidCredential(
                "Invalid email or password".to_string(),
            ));
        }

        sqlx::query(
            "UPDATE account SET login_attempts = 0, lock_until = NULL, last_login = ?1 WHERE id = ?2",
        )
        .bind(now)
        .bind(&account.id)
        .execute(&self.db)
        .await
        .map_err(ApiError::Database)?;

        let session = self.create_session(&account.id).await?;

        Ok((account, session))
    }

    /// Record one failed login.
    ///
    /// A previous lock that has expired restarts the counter at one
    /// (not zero); otherwise the counter increments, and reaching the
    /// threshold sets the lock expiry.
    async fn record_failed_login(&self, account: &Account, now: DateTime<Utc>) -> ApiResult<()> {
        if account.lock_until.is_some() && !account.is_locked(now) {
            sqlx::query("UPDATE account SET login_attempts = 1, lock_until = NULL WHERE id = ?1")
                .bind(&account.id)
                .execute(&self.db)
                .await
                .map_err(ApiError::Database)?;
            return Ok(());
        }

        let attempts = account.login_attempts + 1;
        let lock_until = if attempts >= self.config.auth.lockout_threshold {
            Some(now + Duration::hours(self.config.auth.lockout_window_hours))
        } else {
            None
        };

        if let Some(until) = lock_until {
            tracing::warn!(account_id = %account.id, "account locked until {}", until);
            sqlx::query("UPDATE account SET login_attempts = ?1, lock_until = ?2 WHERE id = ?3")
                .bind(attempts)
                .bind(until)
                .bind(&account.id)
                .execute(&self.db)
                .await
                .map_err(ApiError::Database)?;
        } else {
            sqlx::query("UPDATE account SET login_attempts = ?1 WHERE id = ?2")
                .bind(attempts)
                .bind(&account.id)
                .execute(&self.db)
                .await
                .map_err(ApiError::Database)?;
        }

        Ok(())
    }

    /// Create a session for an account
    pub async fn create_session(&self, account_id: &str) -> ApiResult<Session> {
        let now = Utc::now();
        let session = Session {
            id: Uuid::new_v4().to_string(),
            account_id: account_id.to_string(),
            token: Uuid::new_v4().to_string(),
            created_at: now,
            expires_at: now + Duration::hours(self.config.auth.session_ttl_hours),
        };

        sqlx::query(
            "INSERT INTO session (id, account_id, token, created_at, expires_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
        )
        .bind(&session.id)
        .bind(&session.account_id)
        .bind(&session.token)
        .bind(session.created_at)
        .bind(session.expires_at)
        .execute(&self.db)
        .await
        .map_err(ApiError::Database)?;

        Ok(session)
    }

    /// Resolve a bearer token to its account
    pub async fn validate_token(&self, token: &str) -> ApiResult<Account> {
        let row = sqlx::query("SELECT account_id, expires_at FROM session WHERE token = ?1")
            .bind(token)
            .fetch_optional(&self.db)
            .await
            .map_err(ApiError::Database)?
            .ok_or_else(|| {
                ApiError::InvalidCredential("Invalid or expired session".to_string())
            })?;

        let expires_at: DateTime<Utc> = row.get("expires_at");
        if Utc::now() > expires_at {
            return Err(ApiError::InvalidCredential(
                "Invalid or expired session".to_string(),
            ));
        }

        let account_id: String = row.get("account_id");
        self.get_account(&account_id).await
    }

    /// Get account by id
    pub async fn get_account(&self, id: &str) -> ApiResult<Account> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM account WHERE id = ?1",
            ACCOUNT_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.db)
        .await
        .map_err(ApiError::Database)?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

        account_from_row(&row)
    }

    async fn get_account_by_email(&self, email: &str) -> ApiResult<Option<Account>> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM account WHERE email = ?1",
            ACCOUNT_COLUMNS
        ))
        .bind(email)
        .fetch_optional(&self.db)
        .await
        .map_err(ApiError::Database)?;

        row.as_ref().map(account_from_row).transpose()
    }

    async fn email_exists(&self, email: &str) -> ApiResult<bool> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM account WHERE email = ?1")
            .bind(email)
            .fetch_one(&self.db)
            .await
            .map_err(ApiError::Database)?;

        Ok(count > 0)
    }

    async fn phone_exists(&self, phone: &str) -> ApiResult<bool> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM account WHERE phone = ?1")
            .bind(phone)
            .fetch_one(&self.db)
            .await
            .map_err(ApiError::Database)?;

        Ok(count > 0)
    }

    /// All accounts, newest first
    pub async fn list_accounts(&self) -> ApiResult<Vec<Account>> {
        let rows = sqlx::query(&format!(
            "SELECT {} FROM account ORDER BY created_at DESC",
            ACCOUNT_COLUMNS
        ))
        .fetch_all(&self.db)
        .await
        .map_err(ApiError::Database)?;

        rows.iter().map(account_from_row).collect()
    }

    /// Accounts holding one role, newest first
    pub async fn list_accounts_by_role(&self, role: UserRole) -> ApiResult<Vec<Account>> {
        let rows = sqlx::query(&format!(
            "SELECT {} FROM account WHERE user_type = ?1 ORDER BY created_at DESC",
            ACCOUNT_COLUMNS
        ))
        .bind(role.as_str())
        .fetch_all(&self.db)
        .await
        .map_err(ApiError::Database)?;

        rows.iter().map(account_from_row).collect()
    }

    /// Change an account's role.
    ///
    /// Booking preferences and admin permissions are mutually exclusive:
    /// demotion to customer clears every permission flag, promotion to
    /// admin clears the preferences and stamps the provided permissions.
    pub async fn set_role(
        &self,
        id: &str,
        role: UserRole,
        permissions: Option<AdminPermissions>,
    ) -> ApiResult<Account> {
        let account = self.get_account(id).await?;

        let (booking_preferences, admin_permissions) = match role {
            UserRole::Customer => (
                Some(account.booking_preferences.unwrap_or_default()),
                None,
            ),
            UserRole::Admin => (None, Some(permissions.unwrap_or_default())),
        };

        sqlx::query(
            "UPDATE account SET user_type = ?1, booking_preferences = ?2,
                 admin_permissions = ?3, updated_at = ?4
             WHERE id = ?5",
        )
        .bind(role.as_str())
        .bind(to_json_opt(booking_preferences.as_ref())?)
        .bind(to_json_opt(admin_permissions.as_ref())?)
        .bind(Utc::now())
        .bind(id)
        .execute(&self.db)
        .await
        .map_err(ApiError::Database)?;

        self.get_account(id).await
    }

    /// Apply a profile patch. The patch type cannot carry credentials,
    /// role, permissions, or status flags.
    pub async fn update_profile(&self, id: &str, patch: ProfilePatch) -> ApiResult<Account> {
        let mut account = self.get_account(id).await?;

        if let Some(name) = patch.name {
            account.name = name.trim().to_string();
        }
        if let Some(email) = patch.email {
            account.email = normalize_email(&email);
        }
        if let Some(phone) = patch.phone {
            account.phone = phone.trim().to_string();
        }
        if let Some(dob) = patch.date_of_birth {
            account.date_of_birth = Some(dob);
        }
        if let Some(gender) = patch.gender {
            account.gender = Some(gender);
        }
        if let Some(nationality) = patch.nationality {
            account.nationality = Some(nationality);
        }
        if let Some(address) = patch.address {
            account.address = Some(address);
        }
        if let Some(contact) = patch.emergency_contact {
            account.emergency_contact = Some(contact);
        }
        if let Some(occupation) = patch.occupation {
            account.occupation = Some(occupation);
        }
        if let Some(company) = patch.company {
            account.company = Some(company);
        }
        if let Some(student_id) = patch.student_id {
            account.student_id = Some(student_id);
        }
        // Preferences only apply to customers
        if account.is_customer() {
            if let Some(preferences) = patch.booking_preferences {
                account.booking_preferences = Some(preferences);
            }
        }
        account.updated_at = Utc::now();

        sqlx::query(
            "UPDATE account SET name = ?1, email = ?2, phone = ?3, date_of_birth = ?4,
                 gender = ?5, nationality = ?6, address = ?7, emergency_contact = ?8,
                 occupation = ?9, company = ?10, student_id = ?11, booking_preferences = ?12,
                 updated_at = ?13
             WHERE id = ?14",
        )
        .bind(&account.name)
        .bind(&account.email)
        .bind(&account.phone)
        .bind(account.date_of_birth.map(|d| d.to_string()))
        .bind(&account.gender)
        .bind(&account.nationality)
        .bind(to_json_opt(account.address.as_ref())?)
        .bind(to_json_opt(account.emergency_contact.as_ref())?)
        .bind(&account.occupation)
        .bind(&account.company)
        .bind(&account.student_id)
        .bind(to_json_opt(account.booking_preferences.as_ref())?)
        .bind(account.updated_at)
        .bind(id)
        .execute(&self.db)
        .await
        .map_err(map_unique_violation)?;

        self.get_account(id).await
    }
}

/// Lower-case and trim, matching registration and login alike
fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Map a UNIQUE-constraint failure to the field-specific conflict
/// message; this is what decides a duplicate race lost at insert time
fn map_unique_violation(e: sqlx::Error) -> ApiError {
    if let sqlx::Error::Database(ref db_err) = e {
        let message = db_err.message();
        if message.contains("account.email") {
            return ApiError::Conflict(
                "Email already in use. Please use a different email or sign in.".to_string(),
            );
        }
        if message.contains("account.phone") {
            return ApiError::Conflict(
                "Phone number already in use. Please use a different phone number.".to_string(),
            );
        }
    }
    ApiError::Database(e)
}

fn to_json_opt<T: serde::Serialize>(value: Option<&T>) -> ApiResult<Option<String>> {
    value
        .map(|v| serde_json::to_string(v))
        .transpose()
        .map_err(|e| ApiError::Internal(format!("Serialization failed: {}", e)))
}

fn from_json_opt<T: serde::de::DeserializeOwned>(raw: Option<String>) -> ApiResult<Option<T>> {
    raw.map(|s| serde_json::from_str(&s))
        .transpose()
        .map_err(|e| ApiError::Internal(format!("Corrupt stored record: {}", e)))
}

fn account_from_row(row: &SqliteRow) -> ApiResult<Account> {
    let user_type: String = row.get("user_type");
    let date_of_birth: Option<String> = row.get("date_of_birth");
    let date_of_birth = date_of_birth
        .map(|s| NaiveDate::parse_from_str(&s, "%Y-%m-%d"))
        .transpose()
        .map_err(|e| ApiError::Internal(format!("Invalid stored date of birth: {}", e)))?;

    let address: Option<Address> = from_json_opt(row.get("address"))?;
    let emergency_contact: Option<EmergencyContact> = from_json_opt(row.get("emergency_contact"))?;
    let booking_preferences: Option<BookingPreferences> =
        from_json_opt(row.get("booking_preferences"))?;
    let admin_permissions: Option<AdminPermissions> = from_json_opt(row.get("admin_permissions"))?;

    Ok(Account {
        id: row.get("id"),
        name: row.get("name"),
        email: row.get("email"),
        phone: row.get("phone"),
        password_hash: row.get("password_hash"),
        user_type: UserRole::from_str(&user_type)?,
        date_of_birth,
        gender: row.get("gender"),
        nationality: row.get("nationality"),
        address,
        emergency_contact,
        occupation: row.get("occupation"),
        company: row.get("company"),
        student_id: row.get("student_id"),
        booking_preferences,
        admin_permissions,
        is_active: row.get("is_active"),
        is_verified: row.get("is_verified"),
        is_blocked: row.get("is_blocked"),
        login_attempts: row.get("login_attempts"),
        lock_until: row.get("lock_until"),
        last_login: row.get("last_login"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{AuthConfig, LoggingConfig, ServiceConfig, StorageConfig};
    use std::path::PathBuf;

    async fn setup_manager() -> AccountManager {
        let db = SqlitePool::connect(":memory:").await.unwrap();

        sqlx::query(
            r#"
            CREATE TABLE account (
                id TEXT PRIMARY KEY,
                name TEXT NOT NULL,
                email TEXT NOT NULL UNIQUE,
                phone TEXT NOT NULL UNIQUE,
                password_hash TEXT NOT NULL,
                user_type TEXT NOT NULL DEFAULT 'customer',
                date_of_birth TEXT,
                gender TEXT,
                nationality TEXT,
                address TEXT,
                emergency_contact TEXT,
                occupation TEXT,
                company TEXT,
                student_id TEXT,
                booking_preferences TEXT,
                admin_permissions TEXT,
                is_active BOOLEAN NOT NULL DEFAULT 1,
                is_verified BOOLEAN NOT NULL DEFAULT 0,
                is_blocked BOOLEAN NOT NULL DEFAULT 0,
                login_attempts INTEGER NOT NULL DEFAULT 0,
                lock_until DATETIME,
                last_login DATETIME,
                created_at DATETIME NOT NULL,
                updated_at DATETIME NOT NULL
            )
            "#,
        )
        .execute(&db)
        .await
        .unwrap();

        sqlx::query(
            r#"
            CREATE TABLE session (
                id TEXT PRIMARY KEY,
                account_id TEXT NOT NULL,
                token TEXT NOT NULL UNIQUE,
                created_at DATETIME NOT NULL,
                expires_at DATETIME NOT NULL,
                FOREIGN KEY (account_id) REFERENCES account(id)
            )
            "#,
        )
        .execute(&db)
        .await
        .unwrap();

        let config = Arc::new(ServerConfig {
            service: ServiceConfig {
                hostname: "localhost".to_string(),
                port: 5000,
                version: "0.1.0".to_string(),
            },
            storage: StorageConfig {
                data_directory: PathBuf::from("./data"),
                database: PathBuf::from(":memory:"),
            },
            auth: AuthConfig {
                // Low cost keeps hashing fast in tests
                bcrypt_cost: 4,
                session_ttl_hours: 12,
                lockout_threshold: 5,
                lockout_window_hours: 2,
            },
            logging: LoggingConfig {
                level: "info".to_string(),
            },
        });

        AccountManager::new(db, config)
    }

    fn signup(name: &str, email: &str, phone: &str) -> SignupRequest {
        SignupRequest {
            name: name.to_string(),
            email: email.to_string(),
            phone: phone.to_string(),
            password: "secret123".to_string(),
            user_type: None,
            date_of_birth: None,
            gender: None,
            nationality: None,
            address: None,
            emergency_contact: None,
            occupation: None,
            company: None,
            student_id: None,
            booking_preferences: None,
            admin_permissions: None,
        }
    }

    #[tokio::test]
    async fn test_register_normalizes_and_hashes() {
        let manager = setup_manager().await;

        let account = manager
            .register(signup("Ama Mensah", "  AMA@Example.COM ", " +233541234567 "))
            .await
            .unwrap();

        assert_eq!(account.email, "ama@example.com");
        assert_eq!(account.phone, "+233541234567");
        assert_eq!(account.user_type, UserRole::Customer);
        assert!(account.booking_preferences.is_some());
        assert!(account.admin_permissions.is_none());
        assert_ne!(account.password_hash, "secret123");
        assert!(bcrypt::verify("secret123", &account.password_hash).unwrap());
    }

    #[tokio::test]
    async fn test_register_missing_fields_enumerated() {
        let manager = setup_manager().await;

        let err = manager.register(signup("", "", "")).await.unwrap_err();
        match err {
            ApiError::InvalidForm(errors) => {
                let fields: Vec<&str> = errors.iter().map(|e| e.field.as_str()).collect();
                assert!(fields.contains(&"name"));
                assert!(fields.contains(&"email"));
                assert!(fields.contains(&"phone"));
                assert!(fields.contains(&"password"));
            }
            other => panic!("expected InvalidForm, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_register_rejects_unknown_role() {
        let manager = setup_manager().await;

        let mut req = signup("Ama", "ama@example.com", "+233541234567");
        req.user_type = Some("superuser".to_string());
        assert!(matches!(
            manager.register(req).await.unwrap_err(),
            ApiError::Validation(_)
        ));
    }

    #[tokio::test]
    async fn test_duplicate_email_and_phone_conflict() {
        let manager = setup_manager().await;
        manager
            .register(signup("Ama", "ama@example.com", "+233541234567"))
            .await
            .unwrap();

        // Same email (differently cased), different phone
        let err = manager
            .register(signup("Kofi", "AMA@example.com", "+233209998877"))
            .await
            .unwrap_err();
        match err {
            ApiError::Conflict(message) => assert!(message.contains("Email")),
            other => panic!("expected Conflict, got {:?}", other),
        }

        // Different email, same phone
        let err = manager
            .register(signup("Kofi", "kofi@example.com", "+233541234567"))
            .await
            .unwrap_err();
        match err {
            ApiError::Conflict(message) => assert!(message.contains("Phone")),
            other => panic!("expected Conflict, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_unique_constraint_backstops_duplicates() {
        let manager = setup_manager().await;
        manager
            .register(signup("Ama", "ama@example.com", "+233541234567"))
            .await
            .unwrap();

        // Bypass the pre-checks and hit the constraint directly, as a
        // racing second registration would
        let mut dup = manager
            .register(signup("Kofi", "kofi@example.com", "+233209998877"))
            .await
            .unwrap();
        dup.id = Uuid::new_v4().to_string();
        dup.email = "ama@example.com".to_string();
        dup.phone = "+233301112233".to_string();
        let err = manager.insert_account(&dup).await.unwrap_err();
        assert!(matches!(err, ApiError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_authenticate_success_and_failure() {
        let manager = setup_manager().await;
        manager
            .register(signup("Ama", "Ama@Example.com", "+233541234567"))
            .await
            .unwrap();

        // Login normalizes the email the same way registration does
        let (account, session) = manager
            .authenticate(" AMA@EXAMPLE.COM ", "secret123")
            .await
            .unwrap();
        assert_eq!(account.email, "ama@example.com");
        assert!(!session.token.is_empty());

        let resolved = manager.validate_token(&session.token).await.unwrap();
        assert_eq!(resolved.id, account.id);

        assert!(matches!(
            manager
                .authenticate("ama@example.com", "wrong")
                .await
                .unwrap_err(),
            ApiError::InvalidCredential(_)
        ));
        assert!(matches!(
            manager
                .authenticate("nobody@example.com", "secret123")
                .await
                .unwrap_err(),
            ApiError::NotFound(_)
        ));
    }

    #[tokio::test]
    async fn test_lockout_after_five_failures() {
        let manager = setup_manager().await;
        let account = manager
            .register(signup("Ama", "ama@example.com", "+233541234567"))
            .await
            .unwrap();

        for _ in 0..5 {
            let err = manager
                .authenticate("ama@example.com", "wrong")
                .await
                .unwrap_err();
            assert!(matches!(err, ApiError::InvalidCredential(_)));
        }

        // Sixth attempt fails Locked even with the correct password
        let err = manager
            .authenticate("ama@example.com", "secret123")
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Locked(_)));

        let locked = manager.get_account(&account.id).await.unwrap();
        assert_eq!(locked.login_attempts, 5);
        assert!(locked.lock_until.is_some());
    }

    #[tokio::test]
    async fn test_expired_lock_resets_counter_to_one() {
        let manager = setup_manager().await;
        let account = manager
            .register(signup("Ama", "ama@example.com", "+233541234567"))
            .await
            .unwrap();

        // Simulate an expired lock with a saturated counter
        sqlx::query("UPDATE account SET login_attempts = 5, lock_until = ?1 WHERE id = ?2")
            .bind(Utc::now() - Duration::minutes(1))
            .bind(&account.id)
            .execute(&manager.db)
            .await
            .unwrap();

        let err = manager
            .authenticate("ama@example.com", "wrong")
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::InvalidCredential(_)));

        // Counter restarts at one, not zero
        let refreshed = manager.get_account(&account.id).await.unwrap();
        assert_eq!(refreshed.login_attempts, 1);
        assert!(refreshed.lock_until.is_none());
    }

    #[tokio::test]
    async fn test_set_role_clears_permissions_on_demotion() {
        let manager = setup_manager().await;
        let mut req = signup("Esi", "esi@example.com", "+233501112233");
        req.user_type = Some("admin".to_string());
        req.admin_permissions = Some(AdminPermissions {
            can_manage_users: true,
            can_view_reports: true,
            ..AdminPermissions::none()
        });
        let account = manager.register(req).await.unwrap();
        assert!(account.has_permission("canManageUsers"));

        let demoted = manager
            .set_role(&account.id, UserRole::Customer, None)
            .await
            .unwrap();
        assert_eq!(demoted.user_type, UserRole::Customer);
        assert!(demoted.admin_permissions.is_none());
        assert!(demoted.booking_preferences.is_some());
        assert!(!demoted.has_permission("canManageUsers"));
        assert!(!demoted.has_permission("canViewReports"));
    }

    #[tokio::test]
    async fn test_set_role_promotion_populates_permissions() {
        let manager = setup_manager().await;
        let account = manager
            .register(signup("Ama", "ama@example.com", "+233541234567"))
            .await
            .unwrap();

        let promoted = manager
            .set_role(
                &account.id,
                UserRole::Admin,
                Some(AdminPermissions {
                    can_manage_bookings: true,
                    ..AdminPermissions::none()
                }),
            )
            .await
            .unwrap();
        assert!(promoted.is_admin());
        assert!(promoted.booking_preferences.is_none());
        assert!(promoted.has_permission("canManageBookings"));
        assert!(!promoted.has_permission("canManageUsers"));
    }

    #[tokio::test]
    async fn test_update_profile_leaves_credentials_and_role() {
        let manager = setup_manager().await;
        let account = manager
            .register(signup("Ama", "ama@example.com", "+233541234567"))
            .await
            .unwrap();

        let updated = manager
            .update_profile(
                &account.id,
                ProfilePatch {
                    name: Some("Ama Serwaa Mensah".to_string()),
                    occupation: Some("Student".to_string()),
                    date_of_birth: NaiveDate::from_ymd_opt(2001, 3, 9),
                    ..ProfilePatch::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.name, "Ama Serwaa Mensah");
        assert_eq!(updated.occupation.as_deref(), Some("Student"));
        assert_eq!(updated.user_type, UserRole::Customer);
        assert_eq!(updated.password_hash, account.password_hash);
        assert!(manager
            .authenticate("ama@example.com", "secret123")
            .await
            .is_ok());
    }

    #[tokio::test]
    async fn test_list_accounts_by_role() {
        let manager = setup_manager().await;
        manager
            .register(signup("Ama", "ama@example.com", "+233541234567"))
            .await
            .unwrap();
        let mut admin = signup("Esi", "esi@example.com", "+233501112233");
        admin.user_type = Some("admin".to_string());
        manager.register(admin).await.unwrap();

        assert_eq!(manager.list_accounts().await.unwrap().len(), 2);
        assert_eq!(
            manager
                .list_accounts_by_role(UserRole::Admin)
                .await
                .unwrap()
                .len(),
            1
        );
        assert_eq!(
            manager
                .list_accounts_by_role(UserRole::Customer)
                .await
                .unwrap()
                .len(),
            1
        );
    }
}
