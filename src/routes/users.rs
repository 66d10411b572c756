use crate::{
    auth::{hash_password, verify_password, AuthenticatedUser},
    email::EmailKind,
    error::AppError,
    models::{user::normalize_email, AuthResponse, LoginRequest, RegisterRequest, User},
    state::AppState,
};
use actix_web::{delete, get, post, web, HttpResponse, Responder};
use validator::Validate;

/// Register a new user
///
/// Creates the account, sends the welcome email in the background and
/// returns the user with a fresh token.
#[post("")]
pub async fn register(
    state: web::Data<AppState>,
    register_data: web::Json<RegisterRequest>,
) -> Result<impl Responder, AppError> {
    register_data.validate()?;

    let password_hash = hash_password(&register_data.password, state.bcrypt_cost)?;
    let user = User::new(&register_data.name, &register_data.email, password_hash);
    let user = state.users.insert_user(&user).await?;

    state
        .notifier
        .notify(EmailKind::Welcome, &user.email, &user.name);
    log::info!("registered user {}", user.id);

    let token = state.tokens.issue(user.id)?;
    Ok(HttpResponse::Created().json(AuthResponse { user, token }))
}

/// Login user
///
/// Unknown email and wrong password fail the same way.
#[post("/login")]
pub async fn login(
    state: web::Data<AppState>,
    login_data: web::Json<LoginRequest>,
) -> Result<impl Responder, AppError> {
    login_data.validate()?;

    let user = state
        .users
        .find_user_by_email(&normalize_email(&login_data.email))
        .await?;

    match user {
        Some(user) if verify_password(&login_data.password, &user.password_hash)? => {
            let token = state.tokens.issue(user.id)?;
            Ok(HttpResponse::Ok().json(AuthResponse { user, token }))
        }
        _ => Err(AppError::BadRequest("Unable to login".into())),
    }
}

/// Profile of the authenticated user.
#[get("/me")]
pub async fn me(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
) -> Result<impl Responder, AppError> {
    let user = state
        .users
        .find_user(user.0)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".into()))?;
    Ok(HttpResponse::Ok().json(user))
}

/// Delete the authenticated user's account
///
/// Removes every task the user owns, then sends the cancellation email.
#[delete("/me")]
pub async fn delete_me(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
) -> Result<impl Responder, AppError> {
    let user = state
        .users
        .delete_user(user.0)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".into()))?;

    state
        .notifier
        .notify(EmailKind::Cancellation, &user.email, &user.name);
    log::info!("deleted user {}", user.id);

    Ok(HttpResponse::Ok().json(user))
}
