use serde::{Deserialize, Serialize};

/// What a token may be used for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenUse {
    Access,
    Refresh,
}

/// JWT payload carried by every issued token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// The authenticated username.
    pub sub: String,
    /// Issued-at, seconds since the epoch.
    pub iat: i64,
    /// Expiry, seconds since the epoch.
    pub exp: i64,
    pub token_use: TokenUse,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_use_serializes_lowercase() {
        let claims = Claims {
            sub: "merchant".to_string(),
            iat: 1,
            exp: 2,
            token_use: TokenUse::Refresh,
        };
        let json = serde_json::to_value(&claims).unwrap();
        assert_eq!(json["token_use"], "refresh");
        assert_eq!(json["sub"], "merchant");
    }
}
