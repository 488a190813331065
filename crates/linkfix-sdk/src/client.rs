//! REST client implementation.

use crate::error::SdkError;
use crate::wire::{
    ApiItem, ApiPatch, ApiProject, ApiUser, Envelope, Meta, TokenResponse,
};
use linkfix_domain::traits::{ItemRepository, PatchOperation};
use linkfix_domain::{Item, ItemId, Project, ProjectId, SyncedItem, User, UserId};
use reqwest::blocking::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use std::cell::RefCell;
use std::time::{Duration, Instant};

/// Default page size of list requests (the API maximum)
pub const DEFAULT_PAGE_SIZE: usize = 50;

/// Default timeout for a single request (60 seconds)
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Tokens are refreshed this long before they expire
const TOKEN_REFRESH_MARGIN: Duration = Duration::from_secs(30);

/// How the client authenticates
#[derive(Debug, Clone)]
pub enum Credentials {
    /// HTTP basic authentication with a user account
    Basic {
        /// Username
        username: String,
        /// Password
        password: String,
    },
    /// OAuth client-credentials grant
    OAuth {
        /// Client id
        client_id: String,
        /// Client secret
        client_secret: String,
    },
}

/// Transport options of the client
#[derive(Debug, Clone)]
pub struct ClientOptions {
    /// Accept invalid TLS certificates (self-hosted instances)
    pub accept_invalid_certs: bool,
    /// Timeout of a single request
    pub timeout: Duration,
    /// Page size of list requests
    pub page_size: usize,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            accept_invalid_certs: false,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

#[derive(Debug, Clone)]
struct BearerToken {
    value: String,
    expires_at: Option<Instant>,
}

impl BearerToken {
    fn is_fresh(&self) -> bool {
        match self.expires_at {
            Some(expires_at) => Instant::now() + TOKEN_REFRESH_MARGIN < expires_at,
            None => true,
        }
    }
}

/// Blocking client for the items REST API
///
/// Every call blocks the current thread; the repair run is sequential and
/// dominated by round trips, so there is nothing to gain from async here.
pub struct RestClient {
    instance_url: String,
    http: Client,
    credentials: Credentials,
    page_size: usize,
    token: RefCell<Option<BearerToken>>,
}

impl RestClient {
    /// Create a new client for an instance such as `https://acme.example.com`
    pub fn new(
        instance_url: &str,
        credentials: Credentials,
        options: ClientOptions,
    ) -> Result<Self, SdkError> {
        let http = Client::builder()
            .timeout(options.timeout)
            .danger_accept_invalid_certs(options.accept_invalid_certs)
            .build()
            .map_err(|e| SdkError::ConnectionError(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            instance_url: instance_url.trim_end_matches('/').to_string(),
            http,
            credentials,
            page_size: options.page_size.max(1),
            token: RefCell::new(None),
        })
    }

    /// Instance URL without trailing slash
    pub fn instance_url(&self) -> &str {
        &self.instance_url
    }

    /// Verify the credentials against the API root
    pub fn connect(&self) -> Result<(), SdkError> {
        let response = self.authorize(self.http.get(self.api_url("/")))?.send()?;
        check_status(response).map(|_| ())?;
        tracing::debug!("Authenticated against {}", self.instance_url);
        Ok(())
    }

    fn api_url(&self, path: &str) -> String {
        format!("{}/rest/v1{}", self.instance_url, path)
    }

    fn authorize(&self, request: RequestBuilder) -> Result<RequestBuilder, SdkError> {
        match &self.credentials {
            Credentials::Basic { username, password } => {
                Ok(request.basic_auth(username, Some(password)))
            }
            Credentials::OAuth { .. } => Ok(request.bearer_auth(self.bearer_token()?)),
        }
    }

    fn bearer_token(&self) -> Result<String, SdkError> {
        if let Some(token) = self.token.borrow().as_ref() {
            if token.is_fresh() {
                return Ok(token.value.clone());
            }
        }

        let token = self.fetch_token()?;
        let value = token.value.clone();
        *self.token.borrow_mut() = Some(token);
        Ok(value)
    }

    fn fetch_token(&self) -> Result<BearerToken, SdkError> {
        let Credentials::OAuth {
            client_id,
            client_secret,
        } = &self.credentials
        else {
            return Err(SdkError::AuthError("Client is not configured for OAuth".to_string()));
        };

        let url = format!("{}/rest/oauth/token", self.instance_url);
        let response = self
            .http
            .post(&url)
            .basic_auth(client_id, Some(client_secret))
            .form(&[("grant_type", "client_credentials")])
            .send()?;

        if !response.status().is_success() {
            let status = response.status();
            return Err(SdkError::AuthError(format!(
                "Token request failed with HTTP {}",
                status
            )));
        }

        let token: TokenResponse = response.json()?;
        tracing::debug!("Obtained OAuth token");
        Ok(BearerToken {
            value: token.access_token,
            expires_at: token
                .expires_in
                .map(|secs| Instant::now() + Duration::from_secs(secs)),
        })
    }

    /// GET a single resource
    fn get_one<T: DeserializeOwned>(&self, path: &str) -> Result<T, SdkError> {
        let response = self.authorize(self.http.get(self.api_url(path)))?.send()?;
        let envelope: Envelope<T> = check_status(response)?.json()?;
        envelope
            .data
            .ok_or_else(|| SdkError::InvalidResponse(format!("Missing data for {}", path)))
    }

    /// GET every page of a list resource
    fn get_all<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<Vec<T>, SdkError> {
        let mut results = Vec::new();
        let mut start_at = 0usize;

        loop {
            let request = self
                .http
                .get(self.api_url(path))
                .query(query)
                .query(&[("startAt", start_at), ("maxResults", self.page_size)]);
            let response = self.authorize(request)?.send()?;
            let envelope: Envelope<Vec<T>> = check_status(response)?.json()?;

            let page = envelope.data.unwrap_or_default();
            let received = page.len();
            results.extend(page);

            let Some(page_info) = envelope.meta.page_info else {
                break;
            };
            start_at = page_info.start_index + page_info.result_count;
            if received == 0 || start_at >= page_info.total_results {
                break;
            }
        }

        Ok(results)
    }
}

/// Turn a non-success response into an error carrying the API message
fn check_status(response: Response) -> Result<Response, SdkError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().unwrap_or_default();
    let message = serde_json::from_str::<Envelope<serde_json::Value>>(&body)
        .ok()
        .and_then(|envelope| message_from_meta(envelope.meta))
        .unwrap_or(body);

    Err(match status.as_u16() {
        401 | 403 => SdkError::AuthError(format!("HTTP {}: {}", status, message)),
        404 => SdkError::NotFound(message),
        code => SdkError::Api {
            status: code,
            message,
        },
    })
}

fn message_from_meta(meta: Meta) -> Option<String> {
    meta.message.or(meta.status)
}

impl ItemRepository for RestClient {
    type Error = SdkError;

    fn list_projects(&self) -> Result<Vec<Project>, SdkError> {
        let projects: Vec<ApiProject> = self.get_all("/projects", &[])?;
        Ok(projects.into_iter().map(Project::from).collect())
    }

    fn list_items(&self, project: ProjectId) -> Result<Vec<Item>, SdkError> {
        let items: Vec<ApiItem> =
            self.get_all("/items", &[("project", project.to_string())])?;
        Ok(items.into_iter().map(Item::from).collect())
    }

    fn get_item(&self, id: ItemId) -> Result<Item, SdkError> {
        let item: ApiItem = self.get_one(&format!("/items/{}", id))?;
        Ok(item.into())
    }

    fn get_synced_items(&self, id: ItemId) -> Result<Vec<SyncedItem>, SdkError> {
        let items: Vec<ApiItem> = self.get_all(&format!("/items/{}/synceditems", id), &[])?;
        Ok(items.iter().map(SyncedItem::from).collect())
    }

    fn get_user(&self, id: UserId) -> Result<User, SdkError> {
        let user: ApiUser = self.get_one(&format!("/users/{}", id))?;
        Ok(user.into())
    }

    fn patch_item(&self, id: ItemId, operations: &[PatchOperation]) -> Result<(), SdkError> {
        let body: Vec<ApiPatch<'_>> = operations.iter().map(ApiPatch::from).collect();
        let request = self
            .http
            .patch(self.api_url(&format!("/items/{}", id)))
            .json(&body);
        let response = self.authorize(request)?.send()?;
        check_status(response)?;
        Ok(())
    }
}
