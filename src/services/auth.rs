use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Capabilities the host editor grants to a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Capability {
    /// Edit content; required to process images.
    EditPosts,
    /// Manage site options; required to change settings.
    ManageOptions,
}

/// Claims of a host editor session token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionClaims {
    pub sub: String,
    /// Capability names as the host editor lists them, including ones the
    /// relay does not check.
    #[serde(default)]
    pub caps: Vec<String>,
    pub exp: usize,
}

/// An authenticated caller.
#[derive(Debug, Clone)]
pub struct Session {
    pub user: String,
    pub capabilities: Vec<Capability>,
}

impl Session {
    pub fn can(&self, capability: Capability) -> bool {
        self.capabilities.contains(&capability)
    }

    pub fn require(&self, capability: Capability) -> Result<(), AuthError> {
        if self.can(capability) {
            Ok(())
        } else {
            Err(AuthError::Forbidden(capability))
        }
    }
}

/// Verifies HS256 session tokens issued by the host editor.
pub struct SessionVerifier {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
}

impl SessionVerifier {
    pub fn new(secret: &str) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            validation: Validation::new(Algorithm::HS256),
        }
    }

    pub fn verify(&self, token: &str) -> Result<Session, AuthError> {
        let data = decode::<SessionClaims>(token, &self.decoding, &self.validation)
            .map_err(AuthError::InvalidToken)?;

        let capabilities = data
            .claims
            .caps
            .iter()
            .filter_map(|name| name.parse::<Capability>().ok())
            .collect();

        Ok(Session {
            user: data.claims.sub,
            capabilities,
        })
    }

    /// Sign a session token, as the host editor does for a logged-in user.
    pub fn issue(
        &self,
        user: &str,
        capabilities: &[Capability],
        ttl: chrono::Duration,
    ) -> Result<String, AuthError> {
        let claims = SessionClaims {
            sub: user.to_string(),
            caps: capabilities.iter().map(Capability::to_string).collect(),
            exp: (chrono::Utc::now() + ttl).timestamp().max(0) as usize,
        };
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(AuthError::InvalidToken)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("Missing session token")]
    MissingToken,

    #[error("Invalid session token: {0}")]
    InvalidToken(#[source] jsonwebtoken::errors::Error),

    #[error("Session lacks the {0} capability")]
    Forbidden(Capability),
}
