//! reqwest-backed directory client.

use async_trait::async_trait;
use reqwest::{Client, Method, StatusCode};
use serde::{de::DeserializeOwned, Serialize};
use tracing::{debug, error, warn};
use url::Url;

use crate::auth::Credentials;
use crate::config::{DirectoryConfig, API_ROOT};
use crate::error::{DirectoryError, DirectoryResult, ErrorBody};
use crate::models::{
    Device, Group, GroupMemberList, NewEmailDevice, NewGroup, NewPerson, NewRosterMember, NewSite,
    Person, RosterMember, Site,
};
use crate::traits::DirectoryClient;

/// HTTP client for the directory REST API.
///
/// Every call is awaited to completion before the next one is issued; the
/// client never fans out requests on its own.
#[derive(Debug, Clone)]
pub struct HttpDirectoryClient {
    base_url: Url,
    credentials: Credentials,
    http_client: Client,
}

impl HttpDirectoryClient {
    /// Build a client from configuration.
    pub fn new(config: DirectoryConfig) -> DirectoryResult<Self> {
        let http_client = Client::builder()
            .timeout(config.timeout)
            .user_agent(concat!("propsync/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| {
                DirectoryError::InvalidConfig(format!("Failed to build HTTP client: {e}"))
            })?;
        Self::with_http_client(config, http_client)
    }

    /// Build a client around a pre-built `reqwest::Client`.
    pub fn with_http_client(config: DirectoryConfig, http_client: Client) -> DirectoryResult<Self> {
        let base_url = config.parsed_base_url()?;
        Ok(Self {
            base_url,
            credentials: config.credentials,
            http_client,
        })
    }

    /// Absolute URL for an API path. Segments are percent-encoded.
    fn endpoint(&self, segments: &[&str]) -> DirectoryResult<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| {
                DirectoryError::InvalidConfig(format!("'{}' cannot be a base URL", self.base_url))
            })?
            .pop_if_empty()
            .extend(API_ROOT)
            .extend(segments);
        Ok(url)
    }

    async fn send<B: Serialize + ?Sized>(
        &self,
        method: Method,
        url: Url,
        body: Option<&B>,
    ) -> DirectoryResult<reqwest::Response> {
        debug!(method = %method, url = %url, "Directory request");
        let mut builder = self.http_client.request(method, url);
        if let Some(body) = body {
            builder = builder.json(body);
        }
        let response = self.credentials.apply(builder).send().await?;
        Ok(response)
    }

    /// GET a single entity; 404 becomes `Ok(None)`.
    async fn fetch_optional<T: DeserializeOwned>(
        &self,
        url: Url,
        what: &str,
    ) -> DirectoryResult<Option<T>> {
        let response = self.send::<()>(Method::GET, url, None).await?;
        if response.status() == StatusCode::NOT_FOUND {
            warn!(entity = what, "Not found in directory");
            return Ok(None);
        }
        self.handle_response(response, what).await.map(Some)
    }

    async fn post<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        url: Url,
        body: &B,
        what: &str,
    ) -> DirectoryResult<T> {
        let response = self.send(Method::POST, url, Some(body)).await?;
        self.handle_response(response, what).await
    }

    async fn handle_response<T: DeserializeOwned>(
        &self,
        response: reqwest::Response,
        what: &str,
    ) -> DirectoryResult<T> {
        let status = response.status();

        if status.is_success() {
            let body = response.text().await?;
            serde_json::from_str(&body).map_err(|e| {
                DirectoryError::Parse(format!("Failed to parse {what} response: {e}"))
            })
        } else {
            self.handle_error_response(response, what).await
        }
    }

    async fn handle_error_response<T>(
        &self,
        response: reqwest::Response,
        what: &str,
    ) -> DirectoryResult<T> {
        let status = response.status();
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "<no body>".to_string());
        let detail = ErrorBody::detail_from(&body);

        error!(
            entity = what,
            status = status.as_u16(),
            detail = %detail,
            "Directory request failed"
        );

        match status {
            StatusCode::NOT_FOUND => Err(DirectoryError::NotFound(format!("{what}: {detail}"))),
            _ => Err(DirectoryError::Remote {
                status: status.as_u16(),
                detail,
            }),
        }
    }
}

#[async_trait]
impl DirectoryClient for HttpDirectoryClient {
    async fn find_site(&self, name: &str) -> DirectoryResult<Option<Site>> {
        let url = self.endpoint(&["sites", name])?;
        self.fetch_optional(url, "site").await
    }

    async fn create_site(&self, site: &NewSite) -> DirectoryResult<Site> {
        let url = self.endpoint(&["sites"])?;
        self.post(url, site, "site").await
    }

    async fn find_person(&self, target_name: &str) -> DirectoryResult<Option<Person>> {
        let mut url = self.endpoint(&["people", target_name])?;
        url.query_pairs_mut().append_pair("embed", "roles,supervisors");
        self.fetch_optional(url, "person").await
    }

    async fn create_person(&self, person: &NewPerson) -> DirectoryResult<Person> {
        let url = self.endpoint(&["people"])?;
        self.post(url, person, "person").await
    }

    async fn add_device(&self, device: &NewEmailDevice) -> DirectoryResult<Device> {
        let url = self.endpoint(&["devices"])?;
        self.post(url, device, "device").await
    }

    async fn find_group(&self, target_name: &str) -> DirectoryResult<Option<Group>> {
        let mut url = self.endpoint(&["groups", target_name])?;
        url.query_pairs_mut().append_pair("embed", "supervisors");
        self.fetch_optional(url, "group").await
    }

    async fn create_group(&self, group: &NewGroup) -> DirectoryResult<Group> {
        let url = self.endpoint(&["groups"])?;
        self.post(url, group, "group").await
    }

    async fn list_group_members(&self, group_id: &str) -> DirectoryResult<Vec<String>> {
        let url = self.endpoint(&["groups", group_id, "members"])?;
        let response = self.send::<()>(Method::GET, url, None).await?;
        let members: GroupMemberList = self.handle_response(response, "group members").await?;
        Ok(members.data.into_iter().map(|m| m.member.id).collect())
    }

    async fn add_group_member(
        &self,
        group_target_name: &str,
        shift_name: &str,
        person_id: &str,
    ) -> DirectoryResult<RosterMember> {
        let url = self.endpoint(&[
            "groups",
            group_target_name,
            "shifts",
            shift_name,
            "members",
        ])?;
        self.post(url, &NewRosterMember::person(person_id), "shift member")
            .await
    }
}
