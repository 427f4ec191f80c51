use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Social platforms an influencer can link to their profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Platform {
    Instagram,
    YouTube,
    TikTok,
}

impl FromStr for Platform {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Instagram" => Ok(Platform::Instagram),
            "YouTube" => Ok(Platform::YouTube),
            "TikTok" => Ok(Platform::TikTok),
            _ => Err("Platform must be one of: Instagram, YouTube, TikTok".to_string()),
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Platform::Instagram => write!(f, "Instagram"),
            Platform::YouTube => write!(f, "YouTube"),
            Platform::TikTok => write!(f, "TikTok"),
        }
    }
}

/// Ad categories shared by influencer profiles and ad postings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Category {
    Fashion,
    Fitness,
    Travel,
    Tech,
    Food,
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Fashion" => Ok(Category::Fashion),
            "Fitness" => Ok(Category::Fitness),
            "Travel" => Ok(Category::Travel),
            "Tech" => Ok(Category::Tech),
            "Food" => Ok(Category::Food),
            _ => Err("Category must be one of: Fashion, Fitness, Travel, Tech, Food".to_string()),
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Category::Fashion => write!(f, "Fashion"),
            Category::Fitness => write!(f, "Fitness"),
            Category::Travel => write!(f, "Travel"),
            Category::Tech => write!(f, "Tech"),
            Category::Food => write!(f, "Food"),
        }
    }
}

/// One linked social account on an influencer profile.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SocialMediaAccount {
    pub platform: Platform,
    pub followers: i64,
}

/// Role-conditional half of a user record. The `role` tag lands in the stored
/// document, so a company can never carry influencer fields and vice versa.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "role", rename_all = "lowercase")]
pub enum RoleProfile {
    #[serde(rename_all = "camelCase")]
    Company {
        #[serde(skip_serializing_if = "Option::is_none")]
        industry: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        company_size: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        website: Option<String>,
    },
    #[serde(rename_all = "camelCase")]
    Influencer {
        #[serde(default)]
        social_media: Vec<SocialMediaAccount>,
        #[serde(default)]
        categories: Vec<Category>,
    },
}

/// In-app notification appended to the owning user (e.g. "Your ad has been accepted").
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub message: String,
    pub created_at: i64,
}

impl Notification {
    pub fn new(message: impl Into<String>) -> Self {
        Notification {
            message: message.into(),
            created_at: chrono::Utc::now().timestamp(),
        }
    }
}

/// User record (armazenado no MongoDB, coleção `users`)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,

    /// PRIMARY IDENTIFIER - hex string, matches MongoDB structure
    pub user_id: String,

    pub name: String,

    /// Unique across the collection (unique index + pre-insert check)
    pub email: String,

    /// bcrypt hash. None after stripping for a response, never serialized then.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,

    pub contact_info: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Role tag plus the fields only that role may carry.
    #[serde(flatten)]
    pub profile: RoleProfile,

    #[serde(default)]
    pub notifications: Vec<Notification>,

    pub created_at: i64,
    pub updated_at: i64,
}

impl User {
    pub fn role(&self) -> &'static str {
        match self.profile {
            RoleProfile::Company { .. } => "company",
            RoleProfile::Influencer { .. } => "influencer",
        }
    }

    pub fn is_company(&self) -> bool {
        matches!(self.profile, RoleProfile::Company { .. })
    }

    pub fn is_influencer(&self) -> bool {
        matches!(self.profile, RoleProfile::Influencer { .. })
    }

    /// Categories an influencer subscribed to; empty for companies.
    pub fn categories(&self) -> &[Category] {
        match &self.profile {
            RoleProfile::Influencer { categories, .. } => categories,
            RoleProfile::Company { .. } => &[],
        }
    }

    /// Drops the password hash before the record is serialized into a response.
    pub fn into_public(mut self) -> User {
        self.password = None;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn influencer_user() -> User {
        User {
            id: None,
            user_id: "64b000000000000000000001".to_string(),
            name: "Ana".to_string(),
            email: "a@x.com".to_string(),
            password: Some("$2b$10$hash".to_string()),
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
            created_at: 1_700_000_000,
            updated_at: 1_700_000_000,
        }
    }

    #[test]
    fn platform_parses_known_values_only() {
        assert_eq!("Instagram".parse::<Platform>().unwrap(), Platform::Instagram);
        assert_eq!("TikTok".parse::<Platform>().unwrap(), Platform::TikTok);
        let err = "Twitter".parse::<Platform>().unwrap_err();
        assert_eq!(err, "Platform must be one of: Instagram, YouTube, TikTok");
    }

    #[test]
    fn category_parses_known_values_only() {
        assert_eq!("Food".parse::<Category>().unwrap(), Category::Food);
        let err = "Gaming".parse::<Category>().unwrap_err();
        assert_eq!(err, "Category must be one of: Fashion, Fitness, Travel, Tech, Food");
    }

    #[test]
    fn influencer_document_has_no_company_fields() {
        let json = serde_json::to_value(influencer_user()).unwrap();
        assert_eq!(json["role"], "influencer");
        assert_eq!(json["socialMedia"][0]["platform"], "Instagram");
        assert_eq!(json["categories"][0], "Fashion");
        assert!(json.get("industry").is_none());
        assert!(json.get("companySize").is_none());
        assert!(json.get("website").is_none());
    }

    #[test]
    fn company_document_has_no_influencer_fields() {
        let mut user = influencer_user();
        user.profile = RoleProfile::Company {
            industry: Some("Retail".to_string()),
            company_size: Some("11-50".to_string()),
            website: None,
        };
        let json = serde_json::to_value(&user).unwrap();
        assert_eq!(json["role"], "company");
        assert_eq!(json["industry"], "Retail");
        assert_eq!(json["companySize"], "11-50");
        assert!(json.get("socialMedia").is_none());
        assert!(json.get("categories").is_none());
    }

    #[test]
    fn public_user_never_serializes_password() {
        let json = serde_json::to_value(influencer_user().into_public()).unwrap();
        assert!(json.get("password").is_none());
    }

    #[test]
    fn role_tag_round_trips_through_deserialization() {
        let json = serde_json::to_string(&influencer_user()).unwrap();
        let back: User = serde_json::from_str(&json).unwrap();
        assert_eq!(back.role(), "influencer");
        assert_eq!(back.categories(), &[Category::Fashion]);
    }
}
