use crate::{
    database::MongoDB,
    models::{Ad, AdStatus, Category, CreateAdRequest, SubmitProofRequest, User},
    services::user_service,
    utils::error::AppError,
};
use crate::services::auth_service::Claims;
use chrono::Utc;
use futures::stream::StreamExt;
use mongodb::bson::{doc, oid::ObjectId};
use mongodb::options::ReturnDocument;

const COLLECTION: &str = "ads";

/// Validated create-ad payload.
pub fn validate_create_ad(request: &CreateAdRequest) -> Result<(String, String, f64, Category), AppError> {
    let title = request.title.as_deref().unwrap_or("").trim();
    let description = request.description.as_deref().unwrap_or("").trim();
    let category = request.category.as_deref().unwrap_or("").trim();

    if title.is_empty() || description.is_empty() || category.is_empty() || request.budget.is_none()
    {
        return Err(AppError::Validation(
            "Missing required fields: title, description, budget, and category are required"
                .to_string(),
        ));
    }

    let budget = request.budget.unwrap_or(0.0);
    if !(budget > 0.0) {
        return Err(AppError::Validation(
            "Budget must be a positive number".to_string(),
        ));
    }

    let category = category.parse().map_err(AppError::Validation)?;

    Ok((title.to_string(), description.to_string(), budget, category))
}

pub fn validate_proof(request: &SubmitProofRequest) -> Result<(String, String), AppError> {
    let link = request.link.as_deref().unwrap_or("").trim();
    let description = request.description.as_deref().unwrap_or("").trim();

    if link.is_empty() || description.is_empty() {
        return Err(AppError::Validation(
            "Proof link and description are required".to_string(),
        ));
    }

    Ok((link.to_string(), description.to_string()))
}

fn parse_ad_id(ad_id: &str) -> Result<ObjectId, AppError> {
    ObjectId::parse_str(ad_id).map_err(|_| AppError::Validation("Invalid ad ID".to_string()))
}

async fn caller(db: &MongoDB, claims: &Claims) -> Result<User, AppError> {
    let collection = db.collection::<User>("users");
    collection
        .find_one(doc! { "userId": &claims.sub })
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))
}

async fn collect_ads(mut cursor: mongodb::Cursor<Ad>) -> Vec<Ad> {
    let mut ads = Vec::new();
    while let Some(result) = cursor.next().await {
        match result {
            Ok(ad) => ads.push(ad),
            Err(e) => log::warn!("⚠️ Skipping unreadable ad document: {}", e),
        }
    }
    // Mais recentes primeiro
    ads.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    ads
}

// Create an ad posting (company only)
pub async fn create_ad(
    db: &MongoDB,
    claims: &Claims,
    request: &CreateAdRequest,
) -> Result<Ad, AppError> {
    let company = caller(db, claims).await?;
    if !company.is_company() {
        return Err(AppError::Forbidden("Only companies can post ads".to_string()));
    }

    let (title, description, budget, category) = validate_create_ad(request)?;

    let mut ad = Ad {
        id: None,
        title,
        description,
        budget,
        category,
        company_id: company.user_id.clone(),
        company_name: company.name.clone(),
        status: AdStatus::Open,
        accepted_by: None,
        accepted_at: None,
        proof: None,
        created_at: Utc::now().timestamp(),
    };

    let collection = db.collection::<Ad>(COLLECTION);
    let result = collection.insert_one(&ad).await?;
    ad.id = result.inserted_id.as_object_id();

    log::info!("✅ Ad created by {}: {}", company.name, ad.title);

    Ok(ad)
}

// Open feed. Influencers with categories see only matching ads.
pub async fn list_open_ads(db: &MongoDB, claims: &Claims) -> Result<Vec<Ad>, AppError> {
    let user = caller(db, claims).await?;

    let mut filter = doc! { "status": "open" };
    let categories = user.categories();
    if user.is_influencer() && !categories.is_empty() {
        let names: Vec<String> = categories.iter().map(|c| c.to_string()).collect();
        filter.insert("category", doc! { "$in": names });
    }

    let collection = db.collection::<Ad>(COLLECTION);
    let cursor = collection.find(filter).await?;

    Ok(collect_ads(cursor).await)
}

// Ads posted by the calling company, including acceptance state and proof
pub async fn list_posted_ads(db: &MongoDB, claims: &Claims) -> Result<Vec<Ad>, AppError> {
    if claims.role != "company" {
        return Err(AppError::Forbidden(
            "Only companies can view their posted ads".to_string(),
        ));
    }

    let collection = db.collection::<Ad>(COLLECTION);
    let cursor = collection.find(doc! { "companyId": &claims.sub }).await?;

    Ok(collect_ads(cursor).await)
}

// Ads accepted by the calling influencer
pub async fn list_accepted_ads(db: &MongoDB, claims: &Claims) -> Result<Vec<Ad>, AppError> {
    if claims.role != "influencer" {
        return Err(AppError::Forbidden(
            "Only influencers can view accepted ads".to_string(),
        ));
    }

    let collection = db.collection::<Ad>(COLLECTION);
    let cursor = collection.find(doc! { "acceptedBy": &claims.sub }).await?;

    Ok(collect_ads(cursor).await)
}

// Accept an open ad. The conditional update is atomic: the first influencer
// wins, the second caller finds no open document and gets a conflict.
pub async fn accept_ad(db: &MongoDB, claims: &Claims, ad_id: &str) -> Result<Ad, AppError> {
    let influencer = caller(db, claims).await?;
    if !influencer.is_influencer() {
        return Err(AppError::Forbidden(
            "Only influencers can accept ads".to_string(),
        ));
    }

    let object_id = parse_ad_id(ad_id)?;
    let collection = db.collection::<Ad>(COLLECTION);

    let accepted = collection
        .find_one_and_update(
            doc! { "_id": object_id, "status": "open" },
            doc! { "$set": {
                "status": "accepted",
                "acceptedBy": &influencer.user_id,
                "acceptedAt": Utc::now().timestamp(),
            } },
        )
        .return_document(ReturnDocument::After)
        .await?;

    let ad = match accepted {
        Some(ad) => ad,
        None => {
            // Lost the race, or the id never existed
            return match collection.find_one(doc! { "_id": object_id }).await? {
                Some(_) => Err(AppError::Conflict("Ad already accepted".to_string())),
                None => Err(AppError::NotFound("Ad not found".to_string())),
            };
        }
    };

    let message = format!(
        "Your ad \"{}\" has been accepted by {}",
        ad.title, influencer.name
    );
    if let Err(e) = user_service::push_notification(db, &ad.company_id, &message).await {
        log::warn!("⚠️ Failed to notify company {}: {}", ad.company_id, e);
    }

    log::info!("✅ Ad {} accepted by {}", ad_id, influencer.name);

    Ok(ad)
}

// Submit proof for an accepted ad. `proof: null` matches both a missing and a
// null field, so the conditional update enforces submit-once.
pub async fn submit_proof(
    db: &MongoDB,
    claims: &Claims,
    ad_id: &str,
    request: &SubmitProofRequest,
) -> Result<Ad, AppError> {
    if claims.role != "influencer" {
        return Err(AppError::Forbidden(
            "Only influencers can submit proof".to_string(),
        ));
    }

    let (link, description) = validate_proof(request)?;
    let object_id = parse_ad_id(ad_id)?;
    let collection = db.collection::<Ad>(COLLECTION);

    let updated = collection
        .find_one_and_update(
            doc! { "_id": object_id, "acceptedBy": &claims.sub, "proof": null },
            doc! { "$set": { "proof": {
                "link": &link,
                "description": &description,
                "submittedAt": Utc::now().timestamp(),
            } } },
        )
        .return_document(ReturnDocument::After)
        .await?;

    let ad = match updated {
        Some(ad) => ad,
        None => {
            return match collection.find_one(doc! { "_id": object_id }).await? {
                None => Err(AppError::NotFound("Ad not found".to_string())),
                Some(ad) if ad.accepted_by.as_deref() != Some(claims.sub.as_str()) => Err(
                    AppError::Forbidden("You have not accepted this ad".to_string()),
                ),
                Some(_) => Err(AppError::Conflict("Proof already submitted".to_string())),
            };
        }
    };

    let message = format!("Proof submitted for your ad \"{}\"", ad.title);
    if let Err(e) = user_service::push_notification(db, &ad.company_id, &message).await {
        log::warn!("⚠️ Failed to notify company {}: {}", ad.company_id, e);
    }

    log::info!("✅ Proof submitted for ad {}", ad_id);

    Ok(ad)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_request() -> CreateAdRequest {
        CreateAdRequest {
            title: Some("Spring drop".to_string()),
            description: Some("Promote our new line".to_string()),
            budget: Some(500.0),
            category: Some("Fashion".to_string()),
        }
    }

    #[test]
    fn create_ad_requires_all_fields() {
        let mut request = create_request();
        request.title = None;
        let err = validate_create_ad(&request).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Missing required fields: title, description, budget, and category are required"
        );
    }

    #[test]
    fn create_ad_rejects_non_positive_budget() {
        let mut request = create_request();
        request.budget = Some(0.0);
        let err = validate_create_ad(&request).unwrap_err();
        assert_eq!(err.to_string(), "Budget must be a positive number");

        request.budget = Some(-10.0);
        assert!(validate_create_ad(&request).is_err());
    }

    #[test]
    fn create_ad_rejects_unknown_category() {
        let mut request = create_request();
        request.category = Some("Gaming".to_string());
        let err = validate_create_ad(&request).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Category must be one of: Fashion, Fitness, Travel, Tech, Food"
        );
    }

    #[test]
    fn create_ad_accepts_valid_request() {
        let (title, _, budget, category) = validate_create_ad(&create_request()).unwrap();
        assert_eq!(title, "Spring drop");
        assert_eq!(budget, 500.0);
        assert_eq!(category, Category::Fashion);
    }

    #[test]
    fn proof_requires_link_and_description() {
        let request = SubmitProofRequest {
            link: Some("https://example.com/post".to_string()),
            description: None,
        };
        let err = validate_proof(&request).unwrap_err();
        assert_eq!(err.to_string(), "Proof link and description are required");

        let request = SubmitProofRequest {
            link: Some("https://example.com/post".to_string()),
            description: Some("Story posted".to_string()),
        };
        let (link, description) = validate_proof(&request).unwrap();
        assert_eq!(link, "https://example.com/post");
        assert_eq!(description, "Story posted");
    }

    #[test]
    fn bad_object_id_is_a_validation_error() {
        let err = parse_ad_id("not-an-id").unwrap_err();
        assert_eq!(err.to_string(), "Invalid ad ID");
    }
}
