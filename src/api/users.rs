/// Signup, login, and user management endpoints
use crate::{
    account::{
        LoginRequest, LoginResponse, ProfilePatch, SignupRequest, SignupResponse, SignupUser,
        UpdateRoleRequest, UserResponse, UsersResponse,
    },
    auth::{AdminContext, AuthContext},
    context::AppContext,
    db::account::UserRole,
    error::{ApiError, ApiResult},
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post, put},
    Json, Router,
};

/// Build user routes
pub fn routes() -> Router<AppContext> {
    Router::new()
        .route("/signup", post(signup))
        .route("/login", post(login))
        .route("/users", get(list_users))
        .route("/users/type/:user_type", get(list_users_by_type))
        .route("/users/:user_id/type", put(update_user_type))
        .route(
            "/users/:user_id/profile",
            get(get_profile).put(update_profile),
        )
}

/// Onboarding hints returned alongside a freshly created account
fn next_steps(role: UserRole) -> Vec<String> {
    let steps: &[&str] = match role {
        UserRole::Customer => &[
            "Complete your profile with additional information",
            "Verify your email address",
            "Set your booking preferences",
            "Start browsing available estates",
        ],
        UserRole::Admin => &[
            "Complete your admin profile",
            "Set your admin permissions",
            "Access admin dashboard",
            "Start managing the system",
        ],
    };
    steps.iter().map(|s| s.to_string()).collect()
}

/// Register a new account
async fn signup(
    State(ctx): State<AppContext>,
    Json(req): Json<SignupRequest>,
) -> ApiResult<(StatusCode, Json<SignupResponse>)> {
    let account = ctx.account_manager.register(req).await?;
    let session = ctx.account_manager.create_session(&account.id).await?;

    let response = SignupResponse {
        message: format!(
            "Account created successfully! Welcome to EstatePro as a {}.",
            account.role_display()
        ),
        token: session.token,
        user: SignupUser {
            next_steps: next_steps(account.user_type),
            account: account.view(),
        },
    };

    Ok((StatusCode::CREATED, Json(response)))
}

/// Authenticate and open a session
async fn login(
    State(ctx): State<AppContext>,
    Json(req): Json<LoginRequest>,
) -> ApiResult<Json<LoginResponse>> {
    let (account, session) = ctx
        .account_manager
        .authenticate(&req.email, &req.password)
        .await?;

    Ok(Json(LoginResponse {
        message: "Login successful".to_string(),
        token: session.token,
        user: account.view(),
    }))
}

/// List all users; admin only
async fn list_users(
    State(ctx): State<AppContext>,
    _admin: AdminContext,
) -> ApiResult<Json<UsersResponse>> {
    let accounts = ctx.account_manager.list_accounts().await?;
    let users: Vec<_> = accounts.iter().map(|a| a.view()).collect();
    let total = users.len();

    Ok(Json(UsersResponse {
        message: "Users retrieved successfully".to_string(),
        users,
        total,
    }))
}

/// List users holding one role; admin only
async fn list_users_by_type(
    State(ctx): State<AppContext>,
    _admin: AdminContext,
    Path(user_type): Path<String>,
) -> ApiResult<Json<UsersResponse>> {
    let role = UserRole::from_str(&user_type)?;
    let accounts = ctx.account_manager.list_accounts_by_role(role).await?;
    let users: Vec<_> = accounts.iter().map(|a| a.view()).collect();
    let total = users.len();

    Ok(Json(UsersResponse {
        message: format!("{}s retrieved successfully", capitalize(role.as_str())),
        users,
        total,
    }))
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Change a user's role; admin only
async fn update_user_type(
    State(ctx): State<AppContext>,
    _admin: AdminContext,
    Path(user_id): Path<String>,
    Json(req): Json<UpdateRoleRequest>,
) -> ApiResult<Json<UserResponse>> {
    let role = UserRole::from_str(&req.user_type)?;
    let account = ctx
        .account_manager
        .set_role(&user_id, role, req.admin_permissions)
        .await?;

    Ok(Json(UserResponse {
        message: "User type updated successfully".to_string(),
        user: account.view(),
    }))
}

/// Self-or-admin ownership check shared by the profile endpoints
fn check_profile_access(auth: &AuthContext, user_id: &str) -> ApiResult<()> {
    if auth.account.id != user_id && !auth.account.is_admin() {
        return Err(ApiError::Forbidden(
            "Access denied. You can only access your own profile.".to_string(),
        ));
    }
    Ok(())
}

/// Fetch a user's profile; the owner or any admin
async fn get_profile(
    State(ctx): State<AppContext>,
    auth: AuthContext,
    Path(user_id): Path<String>,
) -> ApiResult<Json<UserResponse>> {
    check_profile_access(&auth, &user_id)?;

    let account = ctx.account_manager.get_account(&user_id).await?;

    Ok(Json(UserResponse {
        message: "User profile retrieved successfully".to_string(),
        user: account.view(),
    }))
}

/// Update a user's profile; the owner or any admin
async fn update_profile(
    State(ctx): State<AppContext>,
    auth: AuthContext,
    Path(user_id): Path<String>,
    Json(patch): Json<ProfilePatch>,
) -> ApiResult<Json<UserResponse>> {
    check_profile_access(&auth, &user_id)?;

    let account = ctx.account_manager.update_profile(&user_id, patch).await?;

    Ok(Json(UserResponse {
        message: "User profile updated successfully".to_string(),
        user: account.view(),
    }))
}
