/// Account database models and derived state
use crate::error::{ApiError, ApiResult};
use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Account role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Customer,
    Admin,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Customer => "customer",
            UserRole::Admin => "admin",
        }
    }

    pub fn from_str(s: &str) -> ApiResult<Self> {
        match s {
            "customer" => Ok(UserRole::Customer),
            "admin" => Ok(UserRole::Admin),
            _ => Err(ApiError::Validation(
                "Invalid user type. Must be 'customer' or 'admin'".to_string(),
            )),
        }
    }

    /// Human-readable role label
    pub fn display(&self) -> &'static str {
        match self {
            UserRole::Customer => "Customer",
            UserRole::Admin => "Administrator",
        }
    }
}

/// Account status derived from the boolean flags, in precedence order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AccountStatus {
    Blocked,
    Inactive,
    PendingVerification,
    Active,
}

impl AccountStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AccountStatus::Blocked => "blocked",
            AccountStatus::Inactive => "inactive",
            AccountStatus::PendingVerification => "pending-verification",
            AccountStatus::Active => "active",
        }
    }
}

/// Postal address
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    pub street: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub country: Option<String>,
    pub postal_code: Option<String>,
}

/// Emergency contact details
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmergencyContact {
    pub name: Option<String>,
    pub relationship: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
}

/// Customer booking preferences
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingPreferences {
    pub preferred_block: Option<String>,
    pub preferred_room_type: Option<String>,
    pub preferred_floor: Option<i64>,
    pub budget_range: Option<String>,
    #[serde(default)]
    pub special_requirements: Vec<String>,
    pub preferred_check_in_time: Option<String>,
}

/// Admin permission flags, each independently boolean
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminPermissions {
    #[serde(default)]
    pub can_manage_users: bool,
    #[serde(default)]
    pub can_manage_bookings: bool,
    #[serde(default)]
    pub can_manage_rooms: bool,
    #[serde(default)]
    pub can_view_reports: bool,
    #[serde(default)]
    pub can_manage_settings: bool,
}

impl AdminPermissions {
    /// All flags false
    pub fn none() -> Self {
        Self::default()
    }

    pub fn has(&self, permission: &str) -> bool {
        match permission {
            "canManageUsers" => self.can_manage_users,
            "canManageBookings" => self.can_manage_bookings,
            "canManageRooms" => self.can_manage_rooms,
            "canViewReports" => self.can_view_reports,
            "canManageSettings" => self.can_manage_settings,
            _ => false,
        }
    }
}

/// Account record in the database
#[derive(Debug, Clone)]
pub struct Account {
    pub id: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub password_hash: String,
    pub user_type: UserRole,
    pub date_of_birth: Option<NaiveDate>,
    pub gender: Option<String>,
    pub nationality: Option<String>,
    pub address: Option<Address>,
    pub emergency_contact: Option<EmergencyContact>,
    pub occupation: Option<String>,
    pub company: Option<String>,
    pub student_id: Option<String>,
    /// Present only for customers
    pub booking_preferences: Option<BookingPreferences>,
    /// Present only for admins
    pub admin_permissions: Option<AdminPermissions>,
    pub is_active: bool,
    pub is_verified: bool,
    pub is_blocked: bool,
    pub login_attempts: i64,
    pub lock_until: Option<DateTime<Utc>>,
    pub last_login: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Account {
    pub fn is_admin(&self) -> bool {
        self.user_type == UserRole::Admin
    }

    pub fn is_customer(&self) -> bool {
        self.user_type == UserRole::Customer
    }

    /// Check an admin permission flag; always false for non-admins
    pub fn has_permission(&self, permission: &str) -> bool {
        if !self.is_admin() {
            return false;
        }
        self.admin_permissions
            .as_ref()
            .map(|p| p.has(permission))
            .unwrap_or(false)
    }

    /// Derived account status, evaluated in precedence order
    pub fn account_status(&self) -> AccountStatus {
        if self.is_blocked {
            AccountStatus::Blocked
        } else if !self.is_active {
            AccountStatus::Inactive
        } else if !self.is_verified {
            AccountStatus::PendingVerification
        } else {
            AccountStatus::Active
        }
    }

    pub fn role_display(&self) -> &'static str {
        self.user_type.display()
    }

    /// Age in whole years, when a date of birth is on record
    pub fn age(&self) -> Option<i32> {
        self.age_at(Utc::now().date_naive())
    }

    fn age_at(&self, today: NaiveDate) -> Option<i32> {
        let dob = self.date_of_birth?;
        let mut age = today.year() - dob.year();
        if (today.month(), today.day()) < (dob.month(), dob.day()) {
            age -= 1;
        }
        Some(age)
    }

    /// Whether a login lock is currently in effect
    pub fn is_locked(&self, now: DateTime<Utc>) -> bool {
        self.lock_until.map(|until| until > now).unwrap_or(false)
    }

    /// API projection of the account, excluding the credential hash
    pub fn view(&self) -> AccountView {
        AccountView {
            id: self.id.clone(),
            name: self.name.clone(),
            email: self.email.clone(),
            phone: self.phone.clone(),
            user_type: self.user_type,
            account_status: self.account_status(),
            role_display: self.role_display().to_string(),
            age: self.age(),
            date_of_birth: self.date_of_birth,
            gender: self.gender.clone(),
            nationality: self.nationality.clone(),
            address: self.address.clone(),
            emergency_contact: self.emergency_contact.clone(),
            occupation: self.occupation.clone(),
            company: self.company.clone(),
            student_id: self.student_id.clone(),
            booking_preferences: self.booking_preferences.clone(),
            admin_permissions: self.admin_permissions,
            is_active: self.is_active,
            is_verified: self.is_verified,
            is_blocked: self.is_blocked,
            last_login: self.last_login,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

/// Serialized account shape returned by the API; never carries the hash
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountView {
    pub id: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub user_type: UserRole,
    pub account_status: AccountStatus,
    pub role_display: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub age: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_of_birth: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nationality: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<Address>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub emergency_contact: Option<EmergencyContact>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub occupation: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub student_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub booking_preferences: Option<BookingPreferences>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub admin_permissions: Option<AdminPermissions>,
    pub is_active: bool,
    pub is_verified: bool,
    pub is_blocked: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_login: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Session record in the database
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub id: String,
    pub account_id: String,
    pub token: String,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}
