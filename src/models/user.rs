//! Identity claims and capabilities checked at the handler boundary

use serde::{Deserialize, Deserializer, Serialize};
use sqlx::FromRow;

use crate::error::AppError;

/// Staff capabilities, one per protected action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Capability {
    /// Renew copies and see every copy on loan
    #[serde(rename = "can_mark_returned")]
    MarkReturned,
    #[serde(rename = "add_author")]
    AddAuthor,
    #[serde(rename = "change_author")]
    ChangeAuthor,
    #[serde(rename = "delete_author")]
    DeleteAuthor,
}

impl Capability {
    pub const ALL: [Capability; 4] = [
        Capability::MarkReturned,
        Capability::AddAuthor,
        Capability::ChangeAuthor,
        Capability::DeleteAuthor,
    ];

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.as_str() == name)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Capability::MarkReturned => "can_mark_returned",
            Capability::AddAuthor => "add_author",
            Capability::ChangeAuthor => "change_author",
            Capability::DeleteAuthor => "delete_author",
        }
    }
}

/// Library user as referenced by copies
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: i32,
    pub username: String,
}

/// JWT claims issued by the identity provider
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserClaims {
    pub sub: String,
    pub user_id: i32,
    pub username: String,
    /// Permissions this service does not know are dropped
    #[serde(default, deserialize_with = "known_capabilities")]
    pub capabilities: Vec<Capability>,
    pub exp: i64,
    pub iat: i64,
}

fn known_capabilities<'de, D>(deserializer: D) -> Result<Vec<Capability>, D::Error>
where
    D: Deserializer<'de>,
{
    let names = Vec::<String>::deserialize(deserializer)?;
    Ok(names.iter().filter_map(|name| Capability::from_name(name)).collect())
}

impl UserClaims {
    /// Create a new JWT token
    pub fn create_token(&self, secret: &str) -> Result<String, jsonwebtoken::errors::Error> {
        use jsonwebtoken::{encode, EncodingKey, Header};
        encode(
            &Header::default(),
            self,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
    }

    /// Parse JWT token
    pub fn from_token(token: &str, secret: &str) -> Result<Self, jsonwebtoken::errors::Error> {
        use jsonwebtoken::{decode, DecodingKey, Validation};
        let token_data = decode::<Self>(
            token,
            &DecodingKey::from_secret(secret.as_bytes()),
            &Validation::default(),
        )?;
        Ok(token_data.claims)
    }

    pub fn has(&self, capability: Capability) -> bool {
        self.capabilities.contains(&capability)
    }

    pub fn require(&self, capability: Capability) -> Result<(), AppError> {
        if self.has(capability) {
            Ok(())
        } else {
            Err(AppError::Authorization(format!(
                "Missing capability {}",
                capability.as_str()
            )))
        }
    }
}
