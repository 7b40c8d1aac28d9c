use crate::api::{ApiError, ApiResult, EnvConfig};
use crate::storage::{load_json_from_storage, remove_from_storage, save_json_to_storage, SESSION_KEY};
use serde::{Deserialize, Serialize};

pub(crate) mod watcher;

/// Profile fields the provider attaches to an identity. All optional;
/// providers differ in which ones they populate.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Default)]
pub(crate) struct UserMetadata {
    #[serde(default)]
    pub user_name: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub avatar_url: Option<String>,
}

/// External identity as returned by the hosted provider. Distinct from the
/// application's own user record (`models::DbUser`).
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub(crate) struct Identity {
    pub id: String,
    #[serde(default)]
    pub user_metadata: UserMetadata,
}

impl Identity {
    pub fn username(&self) -> &str {
        self.user_metadata
            .user_name
            .as_deref()
            .or(self.user_metadata.name.as_deref())
            .unwrap_or("User")
    }

    /// Avatar from the provider, with a generated fallback.
    pub fn avatar_url(&self) -> String {
        match &self.user_metadata.avatar_url {
            Some(url) if !url.trim().is_empty() => url.clone(),
            _ => format!(
                "https://ui-avatars.com/api/?name={}&background=7F35FF&color=fff",
                urlencoding::encode(self.username())
            ),
        }
    }
}

/// Provider session: access token plus an identity snapshot. Persisted to
/// localStorage so a reload stays signed in until the provider says
/// otherwise.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub(crate) struct Session {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    pub user: Identity,
}

#[derive(Serialize, Clone, Debug)]
struct ExchangeCodePayload {
    code: String,
}

/// Client for the hosted identity provider. The provider's protocol is an
/// opaque collaborator; this wraps exactly the calls the app consumes:
/// session query, sign-in redirect, sign-out, and code exchange.
#[derive(Clone)]
pub(crate) struct AuthClient {
    auth_url: String,
}

impl AuthClient {
    pub fn new(auth_url: String) -> Self {
        Self { auth_url }
    }

    pub fn from_env() -> Self {
        Self::new(EnvConfig::new().auth_url)
    }

    pub fn load_session() -> Option<Session> {
        load_json_from_storage::<Session>(SESSION_KEY)
    }

    pub fn save_session(session: &Session) {
        save_json_to_storage(SESSION_KEY, session);
    }

    pub fn clear_session() {
        remove_from_storage(SESSION_KEY);
    }

    /// URL that starts the provider's OAuth flow; the browser navigates
    /// away and comes back to `redirect_to` with a code.
    pub fn sign_in_url(&self, provider: &str, redirect_to: &str) -> String {
        format!(
            "{}/authorize?provider={}&redirect_to={}",
            self.auth_url,
            provider,
            urlencoding::encode(redirect_to)
        )
    }

    /// GET {auth}/user — validate a token and fetch the identity behind it.
    pub async fn fetch_user(&self, access_token: &str) -> ApiResult<Identity> {
        let client = reqwest::Client::new();
        let url = format!("{}/user", self.auth_url);
        let res = client
            .get(url)
            .header("Authorization", format!("Bearer {access_token}"))
            .send()
            .await
            .map_err(ApiError::network)?;

        if res.status().is_success() {
            res.json().await.map_err(ApiError::parse)
        } else if res.status().as_u16() == 401 {
            Err(ApiError::unauthorized())
        } else {
            let status = res.status();
            let body = res.text().await.unwrap_or_default();
            Err(ApiError::http(status, body, "Session check failed"))
        }
    }

    /// POST {auth}/token — exchange the callback code for a session.
    /// The session is persisted before returning.
    pub async fn exchange_code(&self, code: &str) -> ApiResult<Session> {
        let client = reqwest::Client::new();
        let url = format!("{}/token?grant_type=authorization_code", self.auth_url);
        let res = client
            .post(url)
            .json(&ExchangeCodePayload {
                code: code.to_string(),
            })
            .send()
            .await
            .map_err(ApiError::network)?;

        if res.status().is_success() {
            let session: Session = res.json().await.map_err(ApiError::parse)?;
            Self::save_session(&session);
            Ok(session)
        } else {
            let status = res.status();
            let body = res.text().await.unwrap_or_default();
            Err(ApiError::http(status, body, "Code exchange failed"))
        }
    }

    /// POST {auth}/logout, then drop the persisted session. The local drop
    /// happens regardless of the provider's answer; a dead token is not
    /// worth keeping either way.
    pub async fn sign_out(&self, access_token: &str) -> ApiResult<()> {
        let client = reqwest::Client::new();
        let url = format!("{}/logout", self.auth_url);
        let result = client
            .post(url)
            .header("Authorization", format!("Bearer {access_token}"))
            .send()
            .await;

        Self::clear_session();

        match result {
            Ok(_) => Ok(()),
            Err(e) => Err(ApiError::network(e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_contract_deserialize() {
        // Shape captured from the provider's token endpoint.
        let json = r#"{
            "access_token": "jwt",
            "refresh_token": "r1",
            "user": {
                "id": "uuid-1",
                "user_metadata": {"user_name": "octocat", "avatar_url": "https://a/b.png"}
            }
        }"#;
        let parsed: Session = serde_json::from_str(json).expect("session should parse");
        assert_eq!(parsed.access_token, "jwt");
        assert_eq!(parsed.user.id, "uuid-1");
        assert_eq!(parsed.user.username(), "octocat");
    }

    #[test]
    fn identity_tolerates_missing_metadata() {
        let json = r#"{"id": "uuid-2"}"#;
        let parsed: Identity = serde_json::from_str(json).expect("identity should parse");
        assert_eq!(parsed.username(), "User");
    }

    #[test]
    fn username_falls_back_to_display_name() {
        let id = Identity {
            id: "u".to_string(),
            user_metadata: UserMetadata {
                user_name: None,
                name: Some("Ada".to_string()),
                avatar_url: None,
            },
        };
        assert_eq!(id.username(), "Ada");
    }

    #[test]
    fn avatar_falls_back_to_generated_url() {
        let id = Identity {
            id: "u".to_string(),
            user_metadata: UserMetadata {
                user_name: Some("a b".to_string()),
                name: None,
                avatar_url: None,
            },
        };
        let url = id.avatar_url();
        assert!(url.starts_with("https://ui-avatars.com/api/?name=a%20b"));
    }

    #[test]
    fn sign_in_url_encodes_redirect() {
        let auth = AuthClient::new("http://localhost:54321/auth/v1".to_string());
        let url = auth.sign_in_url("github", "http://localhost:3000/oauth-callback");
        assert_eq!(
            url,
            "http://localhost:54321/auth/v1/authorize?provider=github&redirect_to=http%3A%2F%2Flocalhost%3A3000%2Foauth-callback"
        );
    }
}

// WASM-only tests (run with `cargo test --target wasm32-unknown-unknown` +
// wasm-bindgen-test-runner)
#[cfg(all(test, target_arch = "wasm32"))]
mod wasm_tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    fn session_fixture() -> Session {
        Session {
            access_token: "t1".to_string(),
            refresh_token: None,
            user: Identity {
                id: "uuid-1".to_string(),
                user_metadata: UserMetadata::default(),
            },
        }
    }

    #[wasm_bindgen_test]
    fn session_storage_roundtrip() {
        AuthClient::clear_session();
        assert!(AuthClient::load_session().is_none());

        AuthClient::save_session(&session_fixture());
        let loaded = AuthClient::load_session().expect("should load session");
        assert_eq!(loaded.access_token, "t1");
        assert_eq!(loaded.user.id, "uuid-1");

        AuthClient::clear_session();
        assert!(AuthClient::load_session().is_none());
    }
}
