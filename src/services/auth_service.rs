use crate::{
    database::MongoDB,
    models::{RoleProfile, User},
    services::user_service::{parse_categories, parse_social_media, SocialMediaInput},
    utils::error::{is_duplicate_key_error, AppError},
};
use bcrypt::{hash, verify, DEFAULT_COST};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use mongodb::bson::{doc, oid::ObjectId};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use uuid::Uuid;

// JWT Claims
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub sub: String,           // user_id
    pub email: String,
    pub role: String,          // "company" | "influencer"
    pub iat: usize,            // issued at
    pub exp: usize,            // expiration
    pub jti: String,           // JWT ID
    pub aud: String,           // audience
    pub iss: String,           // issuer
}

// Request/Response structures
#[derive(Debug, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SignupRequest {
    pub role: Option<String>,
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub contact_info: Option<String>,
    pub description: Option<String>,
    // Company-specific
    pub industry: Option<String>,
    pub company_size: Option<String>,
    pub website: Option<String>,
    // Influencer-specific
    pub social_media: Option<Vec<SocialMediaInput>>,
    pub categories: Option<Vec<String>>,
}

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: User,
}

/// Signup payload after required-field and role validation.
#[derive(Debug)]
pub struct ValidSignup {
    pub name: String,
    pub email: String,
    pub password: String,
    pub contact_info: String,
    pub description: Option<String>,
    pub profile: RoleProfile,
}

fn get_jwt_secret() -> String {
    std::env::var("JWT_SECRET").unwrap_or_else(|_| "default-secret-change-me".to_string())
}

fn get_jwt_issuer() -> String {
    std::env::var("JWT_ISSUER").unwrap_or_else(|_| "adchain-service".to_string())
}

fn get_jwt_audience() -> String {
    std::env::var("JWT_AUDIENCE").unwrap_or_else(|_| "adchain-api".to_string())
}

// Generate JWT token (1h expiry, matching the session length the clients expect)
pub fn generate_jwt(user: &User) -> Result<String, AppError> {
    let iat = Utc::now().timestamp() as usize;
    let exp = (Utc::now() + Duration::hours(1)).timestamp() as usize;
    let jti = Uuid::new_v4().to_string();

    let claims = Claims {
        sub: user.user_id.clone(),
        email: user.email.clone(),
        role: user.role().to_string(),
        iat,
        exp,
        jti,
        aud: get_jwt_audience(),
        iss: get_jwt_issuer(),
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(get_jwt_secret().as_ref()),
    )
    .map_err(|e| AppError::Internal(format!("Failed to generate token: {}", e)))
}

// Verify JWT token
pub fn verify_token(token: &str) -> Result<Claims, AppError> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_audience(&[get_jwt_audience()]);

    let mut issuers = HashSet::new();
    issuers.insert(get_jwt_issuer());
    validation.iss = Some(issuers);

    decode::<Claims>(
        token,
        &DecodingKey::from_secret(get_jwt_secret().as_ref()),
        &validation,
    )
    .map(|data| data.claims)
    .map_err(|e| AppError::Unauthorized(format!("Invalid token: {}", e)))
}

/// Required-field, role, and role-conditional validation for signup.
/// Cross-role fields in the request are dropped, not rejected.
pub fn validate_signup(request: &SignupRequest) -> Result<ValidSignup, AppError> {
    let role = request.role.as_deref().unwrap_or("").trim();
    let name = request.name.as_deref().unwrap_or("").trim();
    let email = request.email.as_deref().unwrap_or("").trim();
    let password = request.password.as_deref().unwrap_or("");
    let contact_info = request.contact_info.as_deref().unwrap_or("").trim();

    if role.is_empty()
        || name.is_empty()
        || email.is_empty()
        || password.is_empty()
        || contact_info.is_empty()
    {
        return Err(AppError::Validation(
            "Missing required fields: role, name, email, password, and contactInfo are required"
                .to_string(),
        ));
    }

    let profile = match role {
        "company" => RoleProfile::Company {
            industry: request.industry.clone(),
            company_size: request.company_size.clone(),
            website: request.website.clone(),
        },
        "influencer" => RoleProfile::Influencer {
            social_media: parse_social_media(request.social_media.as_deref().unwrap_or(&[]))?,
            categories: parse_categories(request.categories.as_deref().unwrap_or(&[]))?,
        },
        _ => {
            return Err(AppError::Validation(
                "Invalid role. Must be \"company\" or \"influencer\"".to_string(),
            ))
        }
    };

    Ok(ValidSignup {
        name: name.to_string(),
        email: email.to_string(),
        password: password.to_string(),
        contact_info: contact_info.to_string(),
        description: request.description.clone(),
        profile,
    })
}

// User signup
pub async fn signup(db: &MongoDB, request: &SignupRequest) -> Result<AuthResponse, AppError> {
    let valid = validate_signup(request)?;

    let collection = db.collection::<User>("users");

    // Pre-check; the unique index on email closes the remaining race.
    if collection
        .find_one(doc! { "email": &valid.email })
        .await?
        .is_some()
    {
        return Err(AppError::Conflict("User already exists".to_string()));
    }

    let hashed_password = hash(&valid.password, DEFAULT_COST)?;
    let now = Utc::now().timestamp();
    let new_user_id = ObjectId::new().to_hex();

    let new_user = User {
        id: None,
        user_id: new_user_id,
        name: valid.name,
        email: valid.email,
        password: Some(hashed_password),
        contact_info: valid.contact_info,
        description: valid.description,
        profile: valid.profile,
        notifications: vec![],
        created_at: now,
        updated_at: now,
    };

    match collection.insert_one(&new_user).await {
        Ok(_) => {}
        Err(e) if is_duplicate_key_error(&e) => {
            return Err(AppError::Conflict("User already exists".to_string()));
        }
        Err(e) => return Err(e.into()),
    }

    let token = generate_jwt(&new_user)?;

    log::info!("✅ User registered: {} ({})", new_user.email, new_user.role());

    Ok(AuthResponse {
        token,
        user: new_user.into_public(),
    })
}

// User login
pub async fn login(db: &MongoDB, request: &LoginRequest) -> Result<AuthResponse, AppError> {
    let email = request.email.as_deref().unwrap_or("").trim();
    let password = request.password.as_deref().unwrap_or("");

    if email.is_empty() || password.is_empty() {
        return Err(AppError::Validation(
            "Email and password are required".to_string(),
        ));
    }

    let collection = db.collection::<User>("users");

    // Unknown email and wrong password share one message, no user enumeration.
    let user = collection
        .find_one(doc! { "email": email })
        .await?
        .ok_or_else(|| AppError::Unauthorized("Invalid credentials".to_string()))?;

    let stored_password = user
        .password
        .as_ref()
        .ok_or_else(|| AppError::Internal("User record has no password hash".to_string()))?;

    let valid = verify(password, stored_password)?;
    if !valid {
        return Err(AppError::Unauthorized("Invalid credentials".to_string()));
    }

    let token = generate_jwt(&user)?;

    Ok(AuthResponse {
        token,
        user: user.into_public(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Category, Platform, SocialMediaAccount};

    fn test_user() -> User {
        User {
            id: None,
            user_id: ObjectId::new().to_hex(),
            name: "Ana".to_string(),
            email: "a@x.com".to_string(),
            password: None,
            contact_info: "555".to_string(),
            description: None,
            profile: RoleProfile::Influencer {
                social_media: vec![SocialMediaAccount {
                    platform: Platform::Instagram,
                    followers: 1000,
                }],
                categories: vec![Category::Fashion],
            },
            notifications: vec![],
            created_at: 0,
            updated_at: 0,
        }
    }

    fn signup_request() -> SignupRequest {
        SignupRequest {
            role: Some("influencer".to_string()),
            name: Some("Ana".to_string()),
            email: Some("a@x.com".to_string()),
            password: Some("secret1".to_string()),
            contact_info: Some("555".to_string()),
            description: None,
            industry: None,
            company_size: None,
            website: None,
            social_media: Some(vec![SocialMediaInput {
                platform: "Instagram".to_string(),
                followers: 1000,
            }]),
            categories: Some(vec!["Fashion".to_string()]),
        }
    }

    #[test]
    fn jwt_round_trip() {
        let user = test_user();
        let token = generate_jwt(&user).unwrap();
        let claims = verify_token(&token).unwrap();
        assert_eq!(claims.sub, user.user_id);
        assert_eq!(claims.email, "a@x.com");
        assert_eq!(claims.role, "influencer");
    }

    #[test]
    fn expired_token_is_rejected() {
        let iat = (Utc::now() - Duration::hours(3)).timestamp() as usize;
        let exp = (Utc::now() - Duration::hours(2)).timestamp() as usize;
        let claims = Claims {
            sub: "someone".to_string(),
            email: "a@x.com".to_string(),
            role: "company".to_string(),
            iat,
            exp,
            jti: Uuid::new_v4().to_string(),
            aud: get_jwt_audience(),
            iss: get_jwt_issuer(),
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(get_jwt_secret().as_ref()),
        )
        .unwrap();
        assert!(verify_token(&token).is_err());
    }

    #[test]
    fn tampered_token_is_rejected() {
        let token = generate_jwt(&test_user()).unwrap();
        let mut tampered = token;
        tampered.push('x');
        assert!(verify_token(&tampered).is_err());
    }

    #[test]
    fn password_hash_round_trip() {
        let hashed = hash("secret1", DEFAULT_COST).unwrap();
        assert!(verify("secret1", &hashed).unwrap());
        assert!(!verify("wrong", &hashed).unwrap());
    }

    #[test]
    fn signup_requires_all_base_fields() {
        let mut request = signup_request();
        request.contact_info = None;
        let err = validate_signup(&request).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Missing required fields: role, name, email, password, and contactInfo are required"
        );
    }

    #[test]
    fn signup_rejects_unknown_role() {
        let mut request = signup_request();
        request.role = Some("admin".to_string());
        let err = validate_signup(&request).unwrap_err();
        assert_eq!(err.to_string(), "Invalid role. Must be \"company\" or \"influencer\"");
    }

    #[test]
    fn company_signup_drops_influencer_fields() {
        let mut request = signup_request();
        request.role = Some("company".to_string());
        request.industry = Some("Retail".to_string());
        // socialMedia/categories still present in the body; they must be ignored
        let valid = validate_signup(&request).unwrap();
        match valid.profile {
            RoleProfile::Company { industry, .. } => {
                assert_eq!(industry.as_deref(), Some("Retail"));
            }
            RoleProfile::Influencer { .. } => panic!("expected company profile"),
        }
    }

    #[test]
    fn influencer_signup_rejects_bad_platform() {
        let mut request = signup_request();
        request.social_media = Some(vec![SocialMediaInput {
            platform: "Twitter".to_string(),
            followers: 10,
        }]);
        let err = validate_signup(&request).unwrap_err();
        assert_eq!(err.to_string(), "Platform must be one of: Instagram, YouTube, TikTok");
    }

    #[test]
    fn influencer_signup_rejects_negative_followers() {
        let mut request = signup_request();
        request.social_media = Some(vec![SocialMediaInput {
            platform: "Instagram".to_string(),
            followers: -5,
        }]);
        let err = validate_signup(&request).unwrap_err();
        assert_eq!(err.to_string(), "Followers must be a positive number");
    }
}
