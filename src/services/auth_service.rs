use argon2::{
    Argon2, PasswordHasher,
    password_hash::{PasswordHash, PasswordVerifier, SaltString},
};
use chrono::{Duration, Utc};
use jsonwebtoken::{EncodingKey, Header, encode};
use password_hash::rand_core::OsRng;
use sea_orm::{ActiveModelTrait, ActiveValue::NotSet, ColumnTrait, EntityTrait, QueryFilter, Set};
use uuid::Uuid;

use crate::{
    dto::auth::{Claims, LoginRequest, LoginResponse, RegisterRequest},
    entity::users::{ActiveModel, Column, Entity as Users, Model as UserModel},
    error::{AppError, AppResult},
    models::User,
    response::{ApiResponse, Meta},
    state::AppState,
};

/// Seven days with `rememberMe`, one hour otherwise.
pub fn token_ttl(remember_me: bool) -> Duration {
    if remember_me {
        Duration::days(7)
    } else {
        Duration::hours(1)
    }
}

pub fn hash_password(password: &str) -> AppResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| AppError::Internal(anyhow::anyhow!(e.to_string())))?
        .to_string();
    Ok(hash)
}

pub fn issue_token(user: &UserModel, secret: &str, ttl: Duration) -> AppResult<String> {
    let expiration = Utc::now()
        .checked_add_signed(ttl)
        .ok_or_else(|| AppError::Internal(anyhow::anyhow!("Failed to set expiration")))?;

    let claims = Claims {
        sub: user.id.to_string(),
        email: user.email.clone(),
        role: user.role.clone(),
        exp: expiration.timestamp() as usize,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| AppError::Internal(anyhow::anyhow!(e.to_string())))
}

pub async fn register_user(
    state: &AppState,
    payload: RegisterRequest,
) -> AppResult<ApiResponse<User>> {
    let RegisterRequest { email, password } = payload;
    let email = email.trim().to_lowercase();
    if email.is_empty() || password.is_empty() {
        return Err(AppError::BadRequest(
            "Email and password are required".to_string(),
        ));
    }

    let exist = Users::find()
        .filter(Column::Email.eq(email.as_str()))
        .one(state.db())
        .await?;
    if exist.is_some() {
        return Err(AppError::BadRequest("Email is already taken".to_string()));
    }

    let user = ActiveModel {
        id: Set(Uuid::new_v4()),
        email: Set(email),
        password_hash: Set(hash_password(&password)?),
        created_at: NotSet,
        role: NotSet,
    }
    .insert(state.db())
    .await?;

    tracing::info!(user_id = %user.id, "user registered");
    Ok(ApiResponse::success(
        "User created",
        user_from_entity(user),
        None,
    ))
}

pub async fn login_user(
    state: &AppState,
    payload: LoginRequest,
) -> AppResult<ApiResponse<LoginResponse>> {
    let LoginRequest {
        email,
        password,
        remember_me,
    } = payload;
    let invalid = || AppError::Unauthorized("Invalid email or password".into());

    let user = Users::find()
        .filter(Column::Email.eq(email.trim().to_lowercase()))
        .one(state.db())
        .await?
        .ok_or_else(invalid)?;

    let parsed_hash = PasswordHash::new(&user.password_hash)
        .map_err(|_| AppError::Internal(anyhow::anyhow!("Invalid password hash")))?;
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .map_err(|_| invalid())?;

    let token = issue_token(&user, &state.config.jwt_secret, token_ttl(remember_me))?;

    tracing::info!(user_id = %user.id, remember_me, "user logged in");
    Ok(ApiResponse::success(
        "Logged in",
        LoginResponse {
            token: format!("Bearer {token}"),
        },
        Some(Meta::empty()),
    ))
}

pub fn user_from_entity(model: UserModel) -> User {
    User {
        id: model.id,
        email: model.email,
        password_hash: model.password_hash,
        created_at: model.created_at.to_utc(),
        role: model.role,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::middleware::auth::verify_token;

    fn user(role: &str) -> UserModel {
        UserModel {
            id: Uuid::new_v4(),
            email: "admin@example.com".into(),
            password_hash: hash_password("secret").unwrap(),
            created_at: Utc::now().fixed_offset(),
            role: role.into(),
        }
    }

    #[test]
    fn password_hash_verifies() {
        let hash = hash_password("hunter2").unwrap();
        let parsed = PasswordHash::new(&hash).unwrap();
        assert!(Argon2::default().verify_password(b"hunter2", &parsed).is_ok());
        assert!(Argon2::default().verify_password(b"hunter3", &parsed).is_err());
    }

    #[test]
    fn issued_token_round_trips_through_the_extractor_check() {
        let admin = user("admin");
        let token = issue_token(&admin, "test-secret", token_ttl(false)).unwrap();
        let decoded = verify_token(&token, "test-secret").unwrap();
        assert_eq!(decoded.user_id, admin.id);
        assert_eq!(decoded.email, admin.email);
        assert_eq!(decoded.role, "admin");
    }

    #[test]
    fn remember_me_extends_token_lifetime() {
        assert_eq!(token_ttl(true), Duration::days(7));
        assert_eq!(token_ttl(false), Duration::hours(1));
    }

    #[test]
    fn token_signed_with_other_secret_is_rejected() {
        let token = issue_token(&user("user"), "one", token_ttl(true)).unwrap();
        assert!(matches!(
            verify_token(&token, "two"),
            Err(AppError::Unauthorized(_))
        ));
    }
}
