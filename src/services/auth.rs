use argon2::{
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use rand::rngs::OsRng;

use crate::config::Config;
use crate::db::Database;
use crate::error::{AppError, Result};
use crate::models::{Claims, CurrentUser, Employee, TokenResponse};

const INVALID_CREDENTIALS: &str = "Invalid username or password";

/// Authentication service
pub struct AuthService;

impl AuthService {
    /// Exchange a username/password pair for a signed access token
    pub async fn issue_token(
        db: &Database,
        config: &Config,
        username: &str,
        password: &str,
    ) -> Result<TokenResponse> {
        let employee: Employee = sqlx::query_as("SELECT * FROM employees WHERE username = ?")
            .bind(username)
            .fetch_optional(db.pool())
            .await?
            .ok_or_else(|| AppError::BadRequest(INVALID_CREDENTIALS.to_string()))?;

        if !Self::verify_password(password, &employee.password_hash)? {
            tracing::info!("Rejected credentials for {}", username);
            return Err(AppError::BadRequest(INVALID_CREDENTIALS.to_string()));
        }

        let access_token = Self::generate_access_token(&employee, config, Utc::now())?;
        tracing::info!("Issued token for employee {}", employee.id);

        Ok(TokenResponse {
            access_token,
            username: employee.username,
            token_type: "Bearer".to_string(),
            expires_in: config.jwt.access_token_expire_minutes * 60,
        })
    }

    /// Generate access token (JWT, HS256)
    pub fn generate_access_token(
        employee: &Employee,
        config: &Config,
        now: DateTime<Utc>,
    ) -> Result<String> {
        let exp = now + Duration::minutes(config.jwt.access_token_expire_minutes as i64);

        let claims = Claims {
            name: employee.username.clone(),
            user_id: Some(employee.id),
            iss: config.jwt.issuer.clone(),
            aud: config.jwt.audience.clone(),
            iat: now.timestamp() as usize,
            nbf: now.timestamp() as usize,
            exp: exp.timestamp() as usize,
        };

        Self::sign(&claims, config)
    }

    pub(crate) fn sign(claims: &Claims, config: &Config) -> Result<String> {
        encode(
            &Header::new(Algorithm::HS256),
            claims,
            &EncodingKey::from_secret(config.jwt.secret.as_bytes()),
        )
        .map_err(|e| AppError::Internal(format!("Token signing failed: {}", e)))
    }

    /// Validate access token and extract claims
    pub fn validate_token(token: &str, config: &Config) -> Result<Claims> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.validate_nbf = true;
        validation.leeway = config.jwt.leeway_seconds;
        validation.set_issuer(&[config.jwt.issuer.as_str()]);
        validation.set_audience(&[config.jwt.audience.as_str()]);

        decode::<Claims>(
            token,
            &DecodingKey::from_secret(config.jwt.secret.as_bytes()),
            &validation,
        )
        .map(|data| data.claims)
        .map_err(|e| {
            tracing::debug!("Token rejected: {}", e);
            AppError::Unauthorized("Invalid token".to_string())
        })
    }

    /// Validate a token and resolve the employee it was issued to
    pub fn authenticate(token: &str, config: &Config) -> Result<CurrentUser> {
        let claims = Self::validate_token(token, config)?;
        let id = claims
            .user_id
            .ok_or_else(|| AppError::Unauthorized("Invalid token".to_string()))?;

        Ok(CurrentUser {
            id,
            username: claims.name,
        })
    }

    /// Hash password using Argon2
    pub fn hash_password(password: &str) -> Result<String> {
        let salt = SaltString::generate(&mut OsRng);
        let argon2 = Argon2::default();

        let password_hash = argon2
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| AppError::Internal(format!("Password hashing failed: {}", e)))?
            .to_string();

        Ok(password_hash)
    }

    /// Verify password against hash
    fn verify_password(password: &str, hash: &str) -> Result<bool> {
        let parsed_hash = PasswordHash::new(hash)
            .map_err(|e| AppError::Internal(format!("Invalid password hash: {}", e)))?;

        Ok(Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok())
    }
}
