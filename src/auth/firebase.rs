//! Firebase Authentication over the Identity Toolkit REST API.
//!
//! Only password sign-in and sign-out are supported. The resulting session is
//! published through an internal [`SessionHub`], so subscribers see the same
//! notifications they would from the web SDK's auth-state listener.

use crate::auth::provider::{AuthProvider, SessionHandler, SessionHub, SubscriptionId};
use crate::auth::session::Session;
use crate::config::FirebaseConfig;
use crate::error::{DashError, Result};
use serde::{Deserialize, Serialize};
use url::Url;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SignInRequest<'a> {
    email: &'a str,
    password: &'a str,
    return_secure_token: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SignInResponse {
    local_id: String,
    id_token: String,
    #[serde(default)]
    email: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

/// Identity provider backed by Firebase Authentication.
pub struct FirebaseAuth {
    client: reqwest::Client,
    sign_in_url: Url,
    hub: SessionHub,
}

impl FirebaseAuth {
    pub fn new(config: &FirebaseConfig, client: reqwest::Client) -> Result<Self> {
        Ok(Self {
            client,
            sign_in_url: sign_in_url(&config.auth_endpoint, &config.api_key)?,
            hub: SessionHub::new(),
        })
    }

    /// Sign in and publish the new session to subscribers.
    pub async fn sign_in_with_email_and_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Session> {
        log::info!("signing in as {email}");

        let response = self
            .client
            .post(self.sign_in_url.clone())
            .json(&SignInRequest {
                email,
                password,
                return_secure_token: true,
            })
            .send()
            .await
            .map_err(|err| DashError::network("sign-in request failed", err))?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|err| DashError::network("reading sign-in response failed", err))?;

        let session = parse_sign_in_response(status, &body)?;
        log::info!("signed in as user {}", session.user_id());
        self.hub.publish(Some(session.clone()));
        Ok(session)
    }

    pub fn sign_out(&self) {
        log::info!("signing out");
        self.hub.publish(None);
    }
}

impl AuthProvider for FirebaseAuth {
    fn subscribe(&self, handler: SessionHandler) -> SubscriptionId {
        self.hub.subscribe(handler)
    }

    fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.hub.unsubscribe(id)
    }

    fn current_session(&self) -> Option<Session> {
        self.hub.current_session()
    }
}

fn sign_in_url(endpoint: &str, api_key: &str) -> Result<Url> {
    let raw = format!(
        "{}/v1/accounts:signInWithPassword",
        endpoint.trim_end_matches('/')
    );
    let mut url = Url::parse(&raw)
        .map_err(|err| DashError::config(format!("invalid auth endpoint '{endpoint}': {err}")))?;
    url.query_pairs_mut().append_pair("key", api_key);
    Ok(url)
}

fn parse_sign_in_response(status: u16, body: &str) -> Result<Session> {
    if !(200..300).contains(&status) {
        let message = serde_json::from_str::<ErrorEnvelope>(body)
            .map(|envelope| envelope.error.message)
            .unwrap_or_else(|_| format!("identity provider returned status {status}"));
        return Err(DashError::auth(message));
    }

    let parsed: SignInResponse = serde_json::from_str(body)
        .map_err(|err| DashError::auth(format!("malformed sign-in response: {err}")))?;
    if parsed.local_id.is_empty() {
        return Err(DashError::auth("sign-in response carried no user id"));
    }

    let mut session = Session::new(parsed.local_id).with_id_token(parsed.id_token);
    if let Some(email) = parsed.email {
        session = session.with_email(email);
    }
    Ok(session)
}
