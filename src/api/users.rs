use actix_web::{web, HttpResponse, ResponseError};

use crate::database::MongoDB;
use crate::services::auth_service::{self, Claims, LoginRequest, SignupRequest};
use crate::services::user_service::{self, UpdateProfileRequest};

#[utoipa::path(
    post,
    path = "/api/users/signup",
    tag = "Users",
    request_body = SignupRequest,
    responses(
        (status = 201, description = "Account created; returns token and user without password"),
        (status = 400, description = "Missing/invalid fields or duplicate email")
    )
)]
pub async fn signup(
    db: web::Data<MongoDB>,
    request: web::Json<SignupRequest>,
) -> HttpResponse {
    let email = request.email.as_deref().unwrap_or("N/A");
    log::info!("📝 POST /api/users/signup - email: {}", email);

    match auth_service::signup(&db, &request).await {
        Ok(response) => {
            log::info!("✅ Signup successful: {}", email);
            HttpResponse::Created().json(response)
        }
        Err(e) => {
            log::warn!("❌ Signup failed: {} - {}", email, e);
            e.error_response()
        }
    }
}

#[utoipa::path(
    post,
    path = "/api/users/login",
    tag = "Users",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful; returns token and user without password"),
        (status = 401, description = "Invalid credentials")
    )
)]
pub async fn login(
    db: web::Data<MongoDB>,
    request: web::Json<LoginRequest>,
) -> HttpResponse {
    let email = request.email.as_deref().unwrap_or("N/A");
    log::info!("🔐 POST /api/users/login - email: {}", email);

    match auth_service::login(&db, &request).await {
        Ok(response) => {
            log::info!("✅ Login successful: {}", email);
            HttpResponse::Ok().json(response)
        }
        Err(e) => {
            log::warn!("❌ Login failed: {} - {}", email, e);
            e.error_response()
        }
    }
}

#[utoipa::path(
    get,
    path = "/api/users/profile",
    tag = "Users",
    responses(
        (status = 200, description = "Caller's profile without password"),
        (status = 401, description = "Missing or invalid token")
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_profile(user: web::ReqData<Claims>, db: web::Data<MongoDB>) -> HttpResponse {
    match user_service::get_profile(&db, &user.sub).await {
        Ok(profile) => HttpResponse::Ok().json(profile),
        Err(e) => {
            log::warn!("❌ Profile fetch failed for {}: {}", user.sub, e);
            e.error_response()
        }
    }
}

#[utoipa::path(
    put,
    path = "/api/users/profile",
    tag = "Users",
    request_body = UpdateProfileRequest,
    responses(
        (status = 200, description = "Updated profile without password"),
        (status = 400, description = "Invalid field values"),
        (status = 401, description = "Missing or invalid token")
    ),
    security(("bearer_auth" = []))
)]
pub async fn update_profile(
    user: web::ReqData<Claims>,
    db: web::Data<MongoDB>,
    request: web::Json<UpdateProfileRequest>,
) -> HttpResponse {
    log::info!("✏️ PUT /api/users/profile - user: {}", user.sub);

    match user_service::update_profile(&db, &user.sub, &request).await {
        Ok(profile) => {
            log::info!("✅ Profile updated: {}", user.sub);
            HttpResponse::Ok().json(profile)
        }
        Err(e) => {
            log::warn!("❌ Profile update failed for {}: {}", user.sub, e);
            e.error_response()
        }
    }
}

#[utoipa::path(
    get,
    path = "/api/users/notifications",
    tag = "Users",
    responses(
        (status = 200, description = "Caller's notification list"),
        (status = 401, description = "Missing or invalid token")
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_notifications(user: web::ReqData<Claims>, db: web::Data<MongoDB>) -> HttpResponse {
    match user_service::get_notifications(&db, &user.sub).await {
        Ok(notifications) => HttpResponse::Ok().json(notifications),
        Err(e) => {
            log::warn!("❌ Notifications fetch failed for {}: {}", user.sub, e);
            e.error_response()
        }
    }
}
