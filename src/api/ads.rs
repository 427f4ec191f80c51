use actix_web::{web, HttpResponse, ResponseError};

use crate::database::MongoDB;
use crate::models::{CreateAdRequest, SubmitProofRequest};
use crate::services::ad_service;
use crate::services::auth_service::Claims;

#[utoipa::path(
    post,
    path = "/api/ads",
    tag = "Ads",
    request_body = CreateAdRequest,
    responses(
        (status = 201, description = "Ad created"),
        (status = 400, description = "Missing or invalid fields"),
        (status = 403, description = "Caller is not a company")
    ),
    security(("bearer_auth" = []))
)]
pub async fn create_ad(
    user: web::ReqData<Claims>,
    db: web::Data<MongoDB>,
    request: web::Json<CreateAdRequest>,
) -> HttpResponse {
    log::info!("📢 POST /api/ads - company: {}", user.sub);

    match ad_service::create_ad(&db, &user, &request).await {
        Ok(ad) => HttpResponse::Created().json(ad),
        Err(e) => {
            log::warn!("❌ Ad creation failed for {}: {}", user.sub, e);
            e.error_response()
        }
    }
}

#[utoipa::path(
    get,
    path = "/api/ads",
    tag = "Ads",
    responses(
        (status = 200, description = "Open ads; filtered by the caller's categories for influencers"),
        (status = 401, description = "Missing or invalid token")
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_ads(user: web::ReqData<Claims>, db: web::Data<MongoDB>) -> HttpResponse {
    match ad_service::list_open_ads(&db, &user).await {
        Ok(ads) => HttpResponse::Ok().json(ads),
        Err(e) => {
            log::warn!("❌ Ad feed fetch failed for {}: {}", user.sub, e);
            e.error_response()
        }
    }
}

#[utoipa::path(
    get,
    path = "/api/ads/posted",
    tag = "Ads",
    responses(
        (status = 200, description = "Ads posted by the calling company"),
        (status = 403, description = "Caller is not a company")
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_posted_ads(user: web::ReqData<Claims>, db: web::Data<MongoDB>) -> HttpResponse {
    match ad_service::list_posted_ads(&db, &user).await {
        Ok(ads) => HttpResponse::Ok().json(ads),
        Err(e) => {
            log::warn!("❌ Posted ads fetch failed for {}: {}", user.sub, e);
            e.error_response()
        }
    }
}

#[utoipa::path(
    get,
    path = "/api/ads/accepted",
    tag = "Ads",
    responses(
        (status = 200, description = "Ads accepted by the calling influencer"),
        (status = 403, description = "Caller is not an influencer")
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_accepted_ads(user: web::ReqData<Claims>, db: web::Data<MongoDB>) -> HttpResponse {
    match ad_service::list_accepted_ads(&db, &user).await {
        Ok(ads) => HttpResponse::Ok().json(ads),
        Err(e) => {
            log::warn!("❌ Accepted ads fetch failed for {}: {}", user.sub, e);
            e.error_response()
        }
    }
}

#[utoipa::path(
    post,
    path = "/api/ads/{id}/accept",
    tag = "Ads",
    params(("id" = String, Path, description = "Ad id")),
    responses(
        (status = 200, description = "Ad accepted by the caller"),
        (status = 400, description = "Ad already accepted by someone else"),
        (status = 404, description = "Ad not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn accept_ad(
    user: web::ReqData<Claims>,
    path: web::Path<String>,
    db: web::Data<MongoDB>,
) -> HttpResponse {
    let ad_id = path.into_inner();
    log::info!("🤝 POST /api/ads/{}/accept - influencer: {}", ad_id, user.sub);

    match ad_service::accept_ad(&db, &user, &ad_id).await {
        Ok(ad) => HttpResponse::Ok().json(ad),
        Err(e) => {
            log::warn!("❌ Accept failed for ad {}: {}", ad_id, e);
            e.error_response()
        }
    }
}

#[utoipa::path(
    post,
    path = "/api/ads/{id}/submit-proof",
    tag = "Ads",
    params(("id" = String, Path, description = "Ad id")),
    request_body = SubmitProofRequest,
    responses(
        (status = 200, description = "Proof stored; the ad is immutable afterwards"),
        (status = 400, description = "Missing fields or proof already submitted"),
        (status = 403, description = "Caller did not accept this ad"),
        (status = 404, description = "Ad not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn submit_proof(
    user: web::ReqData<Claims>,
    path: web::Path<String>,
    db: web::Data<MongoDB>,
    request: web::Json<SubmitProofRequest>,
) -> HttpResponse {
    let ad_id = path.into_inner();
    log::info!("📎 POST /api/ads/{}/submit-proof - influencer: {}", ad_id, user.sub);

    match ad_service::submit_proof(&db, &user, &ad_id, &request).await {
        Ok(ad) => HttpResponse::Ok().json(ad),
        Err(e) => {
            log::warn!("❌ Proof submission failed for ad {}: {}", ad_id, e);
            e.error_response()
        }
    }
}
