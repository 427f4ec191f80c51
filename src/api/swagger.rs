use utoipa::OpenApi;
use utoipa::openapi::security::{SecurityScheme, HttpAuthScheme, HttpBuilder};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "AdChain API",
        version = "1.0.0",
        description = "Marketplace backend connecting companies and influencers. \n\n**Authentication:** All routes except signup, login, and health require a JWT Bearer token.\n\n**Features:**\n- Company and influencer accounts with role-specific profiles\n- Ad postings with category-matched feed\n- First-come ad acceptance and proof-of-completion submission\n- Per-user notifications",
        contact(
            name = "AdChain Team"
        )
    ),
    paths(
        // Users
        crate::api::users::signup,
        crate::api::users::login,
        crate::api::users::get_profile,
        crate::api::users::update_profile,
        crate::api::users::get_notifications,

        // Ads
        crate::api::ads::create_ad,
        crate::api::ads::get_ads,
        crate::api::ads::get_posted_ads,
        crate::api::ads::get_accepted_ads,
        crate::api::ads::accept_ad,
        crate::api::ads::submit_proof,

        // Health
        crate::api::health::health_check,
    ),
    components(
        schemas(
            crate::services::auth_service::SignupRequest,
            crate::services::auth_service::LoginRequest,
            crate::services::user_service::UpdateProfileRequest,
            crate::services::user_service::SocialMediaInput,
            crate::models::ad::CreateAdRequest,
            crate::models::ad::SubmitProofRequest,
            crate::api::health::HealthResponse,
        )
    ),
    tags(
        (name = "Users", description = "Signup, login, profile, and notification endpoints. Profiles carry role-specific fields for companies and influencers."),
        (name = "Ads", description = "Ad lifecycle endpoints: post, browse the open feed, accept, and submit proof of completion."),
        (name = "Health", description = "Health check endpoint for monitoring service status."),
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("Enter your JWT token"))
                        .build()
                ),
            );
        }
    }
}
