/// Account management system
///
/// Signup, login, role management, and profile updates for customers
/// and admins.

mod manager;

pub use manager::AccountManager;

use crate::db::account::{
    AccountView, Address, AdminPermissions, BookingPreferences, EmergencyContact,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Signup request
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignupRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub password: String,
    /// Defaults to customer
    pub user_type: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub gender: Option<String>,
    pub nationality: Option<String>,
    pub address: Option<Address>,
    pub emergency_contact: Option<EmergencyContact>,
    pub occupation: Option<String>,
    pub company: Option<String>,
    pub student_id: Option<String>,
    pub booking_preferences: Option<BookingPreferences>,
    pub admin_permissions: Option<AdminPermissions>,
}

/// Signup response: the created account projection plus onboarding hints
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignupResponse {
    pub message: String,
    pub token: String,
    pub user: SignupUser,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignupUser {
    #[serde(flatten)]
    pub account: AccountView,
    pub next_steps: Vec<String>,
}

/// Login request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// Login response: confirmation message, session token, and the
/// account projection
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub message: String,
    pub token: String,
    pub user: AccountView,
}

/// Role-change request
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateRoleRequest {
    #[serde(default)]
    pub user_type: String,
    pub admin_permissions: Option<AdminPermissions>,
}

/// Profile update patch. Credential hash, role, permissions, and the
/// status/verification flags are deliberately not representable here;
/// those change through the dedicated role-update or admin flows.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfilePatch {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub gender: Option<String>,
    pub nationality: Option<String>,
    pub address: Option<Address>,
    pub emergency_contact: Option<EmergencyContact>,
    pub occupation: Option<String>,
    pub company: Option<String>,
    pub student_id: Option<String>,
    pub booking_preferences: Option<BookingPreferences>,
}

/// List response for the user directory
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UsersResponse {
    pub message: String,
    pub users: Vec<AccountView>,
    pub total: usize,
}

/// Single-account response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserResponse {
    pub message: String,
    pub user: AccountView,
}
