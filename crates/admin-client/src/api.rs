//! Reqwest-backed access to the users API.
//!
//! Success bodies arrive as `{ "data": ... }` envelopes; failures carry
//! `{ "statusCode", "message" }`. Both are unwrapped here so callers only see
//! domain values or a [`ClientError`].

use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, StatusCode, Url};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::debug;
use uuid::Uuid;

use crate::error::ClientError;
use crate::model::{AccessToken, User, UserDraft, UserPatch};

/// Operations the admin client performs against the API.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UsersApi: Send + Sync {
    /// Exchange credentials for a bearer token.
    async fn login(&self, credentials: &UserDraft) -> Result<AccessToken, ClientError>;

    async fn list_users(&self) -> Result<Vec<User>, ClientError>;

    async fn get_user(&self, id: Uuid) -> Result<User, ClientError>;

    async fn create_user(&self, draft: &UserDraft) -> Result<User, ClientError>;

    async fn update_user(&self, id: Uuid, patch: &UserPatch) -> Result<User, ClientError>;

    async fn delete_user(&self, id: Uuid) -> Result<(), ClientError>;
}

#[derive(Deserialize)]
struct Envelope<T> {
    data: T,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ErrorBody {
    status_code: Option<u16>,
    message: Option<String>,
}

/// [`UsersApi`] over HTTP.
pub struct HttpUsersApi {
    client: Client,
    base_url: Url,
    token: Option<String>,
}

impl HttpUsersApi {
    /// Build a client rooted at `base_url`.
    ///
    /// A trailing slash is added to the base path so that endpoints resolve
    /// beneath it (`http://host/api` serves `http://host/api/users`).
    ///
    /// # Errors
    /// Returns [`ClientError::InvalidUrl`] when `base_url` cannot carry a path
    /// and [`ClientError::Transport`] when the HTTP client cannot be built.
    pub fn new(mut base_url: Url) -> Result<Self, ClientError> {
        if base_url.cannot_be_a_base() {
            return Err(ClientError::invalid_url(format!(
                "{base_url} cannot be used as a base URL"
            )));
        }
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        let client = Client::builder()
            .build()
            .map_err(|err| ClientError::transport(err.to_string()))?;
        Ok(Self {
            client,
            base_url,
            token: None,
        })
    }

    /// Attach the bearer token sent with every request.
    #[must_use]
    pub fn with_token(mut self, token: Option<String>) -> Self {
        self.token = token;
        self
    }

    fn endpoint(&self, path: &str) -> Result<Url, ClientError> {
        self.base_url
            .join(path)
            .map_err(|err| ClientError::invalid_url(err.to_string()))
    }

    fn request(&self, method: Method, path: &str) -> Result<RequestBuilder, ClientError> {
        let url = self.endpoint(path)?;
        debug!(%method, %url, "users API request");
        let builder = self.client.request(method, url);
        Ok(match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        })
    }

    async fn send(builder: RequestBuilder) -> Result<(StatusCode, Vec<u8>), ClientError> {
        let response = builder
            .send()
            .await
            .map_err(|err| ClientError::transport(err.to_string()))?;
        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|err| ClientError::transport(err.to_string()))?;
        Ok((status, body.to_vec()))
    }
}

#[async_trait]
impl UsersApi for HttpUsersApi {
    async fn login(&self, credentials: &UserDraft) -> Result<AccessToken, ClientError> {
        let (status, body) = Self::send(self.request(Method::POST, "login")?.json(credentials)).await?;
        decode_data(status, &body)
    }

    async fn list_users(&self) -> Result<Vec<User>, ClientError> {
        let (status, body) = Self::send(self.request(Method::GET, "users")?).await?;
        decode_data(status, &body)
    }

    async fn get_user(&self, id: Uuid) -> Result<User, ClientError> {
        let (status, body) = Self::send(self.request(Method::GET, &user_path(id))?).await?;
        decode_data(status, &body)
    }

    async fn create_user(&self, draft: &UserDraft) -> Result<User, ClientError> {
        let (status, body) = Self::send(self.request(Method::POST, "users")?.json(draft)).await?;
        decode_data(status, &body)
    }

    async fn update_user(&self, id: Uuid, patch: &UserPatch) -> Result<User, ClientError> {
        let builder = self.request(Method::PUT, &user_path(id))?.json(patch);
        let (status, body) = Self::send(builder).await?;
        decode_data(status, &body)
    }

    async fn delete_user(&self, id: Uuid) -> Result<(), ClientError> {
        let (status, body) = Self::send(self.request(Method::DELETE, &user_path(id))?).await?;
        if status.is_success() {
            Ok(())
        } else {
            Err(map_status_error(status, &body))
        }
    }
}

fn user_path(id: Uuid) -> String {
    format!("users/{id}")
}

fn decode_data<T: DeserializeOwned>(status: StatusCode, body: &[u8]) -> Result<T, ClientError> {
    if !status.is_success() {
        return Err(map_status_error(status, body));
    }
    serde_json::from_slice::<Envelope<T>>(body)
        .map(|envelope| envelope.data)
        .map_err(|err| ClientError::decode(err.to_string()))
}

fn map_status_error(status: StatusCode, body: &[u8]) -> ClientError {
    match serde_json::from_slice::<ErrorBody>(body) {
        Ok(ErrorBody {
            status_code,
            message: Some(message),
        }) => ClientError::api(status_code.unwrap_or(status.as_u16()), message),
        _ => ClientError::api(status.as_u16(), fallback_message(status, body)),
    }
}

fn fallback_message(status: StatusCode, body: &[u8]) -> String {
    const PREVIEW_CHAR_LIMIT: usize = 160;

    let compact = String::from_utf8_lossy(body)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    if compact.is_empty() {
        return status.canonical_reason().unwrap_or("unknown error").to_owned();
    }
    let preview = compact.chars().take(PREVIEW_CHAR_LIMIT).collect::<String>();
    if compact.chars().count() > PREVIEW_CHAR_LIMIT {
        format!("{preview}...")
    } else {
        preview
    }
}
