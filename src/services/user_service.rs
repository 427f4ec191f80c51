use crate::{
    database::MongoDB,
    models::{Category, Notification, RoleProfile, SocialMediaAccount, User},
    utils::error::AppError,
};
use chrono::Utc;
use mongodb::bson::doc;
use serde::Deserialize;

/// Raw social account as it arrives in a request body; validated into
/// `SocialMediaAccount` before it touches a user record.
#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct SocialMediaInput {
    pub platform: String,
    pub followers: i64,
}

/// Request para atualizar perfil (partial update; cross-role fields are ignored)
#[derive(Debug, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    pub name: Option<String>,
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

pub fn parse_social_media(raw: &[SocialMediaInput]) -> Result<Vec<SocialMediaAccount>, AppError> {
    raw.iter()
        .map(|account| {
            let platform = account.platform.parse().map_err(AppError::Validation)?;
            if account.followers < 0 {
                return Err(AppError::Validation(
                    "Followers must be a positive number".to_string(),
                ));
            }
            Ok(SocialMediaAccount {
                platform,
                followers: account.followers,
            })
        })
        .collect()
}

pub fn parse_categories(raw: &[String]) -> Result<Vec<Category>, AppError> {
    raw.iter()
        .map(|category| category.parse().map_err(AppError::Validation))
        .collect()
}

/// Applies a partial update in place. Only fields matching the user's role are
/// touched; the role itself is immutable.
pub fn apply_profile_update(user: &mut User, request: &UpdateProfileRequest) -> Result<(), AppError> {
    if let Some(name) = &request.name {
        user.name = name.clone();
    }
    if let Some(contact_info) = &request.contact_info {
        user.contact_info = contact_info.clone();
    }
    if let Some(description) = &request.description {
        user.description = Some(description.clone());
    }

    match &mut user.profile {
        RoleProfile::Company {
            industry,
            company_size,
            website,
        } => {
            if request.industry.is_some() {
                *industry = request.industry.clone();
            }
            if request.company_size.is_some() {
                *company_size = request.company_size.clone();
            }
            if request.website.is_some() {
                *website = request.website.clone();
            }
        }
        RoleProfile::Influencer {
            social_media,
            categories,
        } => {
            if let Some(raw) = &request.social_media {
                *social_media = parse_social_media(raw)?;
            }
            if let Some(raw) = &request.categories {
                *categories = parse_categories(raw)?;
            }
        }
    }

    user.updated_at = Utc::now().timestamp();
    Ok(())
}

// Fetch a user's own profile (password stripped)
pub async fn get_profile(db: &MongoDB, user_id: &str) -> Result<User, AppError> {
    let collection = db.collection::<User>("users");

    let user = collection
        .find_one(doc! { "userId": user_id })
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    Ok(user.into_public())
}

// Partial profile update; returns the updated record (password stripped)
pub async fn update_profile(
    db: &MongoDB,
    user_id: &str,
    request: &UpdateProfileRequest,
) -> Result<User, AppError> {
    let collection = db.collection::<User>("users");

    let mut user = collection
        .find_one(doc! { "userId": user_id })
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    apply_profile_update(&mut user, request)?;

    collection
        .replace_one(doc! { "userId": user_id }, &user)
        .await?;

    Ok(user.into_public())
}

// Notification list only, nothing else from the record
pub async fn get_notifications(db: &MongoDB, user_id: &str) -> Result<Vec<Notification>, AppError> {
    let collection = db.collection::<User>("users");

    let user = collection
        .find_one(doc! { "userId": user_id })
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    Ok(user.notifications)
}

/// Appends a notification to a user's record.
pub async fn push_notification(
    db: &MongoDB,
    user_id: &str,
    message: &str,
) -> Result<(), AppError> {
    let collection = db.collection::<User>("users");
    let notification = Notification::new(message);

    collection
        .update_one(
            doc! { "userId": user_id },
            doc! { "$push": { "notifications": {
                "message": &notification.message,
                "createdAt": notification.created_at,
            } } },
        )
        .await?;

    Ok(())
}
