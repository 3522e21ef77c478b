//! HTTP implementation of the platform gateway.
//!
//! Firm environments live under `/api/v4/f/<firm>/`, partner environments
//! under `/api/partner/v1/partners/<partner>/`. Collections are paginated
//! with `page`/`per_page` query parameters.

use std::time::Duration;

use anyhow::anyhow;
use reqwest::blocking::{Client, RequestBuilder};
use reqwest::Method;
use serde_json::Value;

use crate::error::{Result, SyncError};
use crate::template::{Environment, RemoteId, Scope, TemplateBody, TemplateKind};

use super::{GatewayResponse, PlatformGateway, RemoteRecord};

/// Default number of records per page.
pub const DEFAULT_PER_PAGE: u32 = 200;

/// Authentication header for platform requests.
#[derive(Debug, Clone)]
pub struct AuthHeader {
    /// Header name (e.g., "Authorization").
    pub header_name: String,
    /// Header value (e.g., "Bearer token123").
    pub header_value: String,
}

impl AuthHeader {
    /// Create a Bearer token auth header.
    pub fn bearer(token: &str) -> Self {
        Self {
            header_name: "Authorization".to_string(),
            header_value: format!("Bearer {}", token),
        }
    }
}

/// Talks to the platform API over HTTPS.
pub struct HttpGateway {
    host: String,
    auth: Option<AuthHeader>,
    per_page: u32,
    timeout: Duration,
    client: Client,
}

impl HttpGateway {
    /// Create a gateway with the default 30-second timeout.
    pub fn new(host: &str) -> Result<Self> {
        Self::with_timeout(host, Duration::from_secs(30))
    }

    /// Create a gateway with a custom timeout.
    pub fn with_timeout(host: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("tmplsync/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()?;

        Ok(Self {
            host: host.trim_end_matches('/').to_string(),
            auth: None,
            per_page: DEFAULT_PER_PAGE,
            timeout,
            client,
        })
    }

    /// Send this header with every request.
    pub fn with_auth(mut self, auth: AuthHeader) -> Self {
        self.auth = Some(auth);
        self
    }

    pub fn with_per_page(mut self, per_page: u32) -> Self {
        self.per_page = per_page;
        self
    }

    /// Get the configured timeout.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    fn base_url(&self, env: Environment) -> String {
        match env.scope {
            Scope::Firm => format!("{}/api/v4/f/{}", self.host, env.id),
            Scope::Partner => format!("{}/api/partner/v1/partners/{}", self.host, env.id),
        }
    }

    fn collection_url(&self, env: Environment, kind: TemplateKind) -> String {
        format!("{}/{}", self.base_url(env), kind.collection())
    }

    fn shared_part_url(
        &self,
        env: Environment,
        kind: TemplateKind,
        shared_part_id: RemoteId,
        template_id: RemoteId,
    ) -> String {
        format!(
            "{}/{}/shared_parts/{}",
            self.collection_url(env, kind),
            template_id,
            shared_part_id
        )
    }

    fn request(&self, method: Method, url: &str) -> RequestBuilder {
        let builder = self.client.request(method, url);
        match &self.auth {
            Some(auth) => builder.header(&auth.header_name, &auth.header_value),
            None => builder,
        }
    }

    fn send(&self, builder: RequestBuilder, what: &str) -> Result<GatewayResponse> {
        tracing::debug!("{}", what);
        let response = builder.send()?;
        let status = response.status().as_u16();
        let text = response.text()?;

        let data = if text.trim().is_empty() {
            Value::Null
        } else {
            serde_json::from_str(&text).unwrap_or(Value::String(text))
        };

        tracing::debug!("{} -> HTTP {}", what, status);
        Ok(GatewayResponse::new(status, data))
    }
}

impl PlatformGateway for HttpGateway {
    fn find_by_handle_or_name(
        &self,
        env: Environment,
        kind: TemplateKind,
        text: &str,
    ) -> Result<Option<RemoteRecord>> {
        let mut page = 1;
        loop {
            let records = self.read_page(env, kind, page)?;
            if records.is_empty() {
                return Ok(None);
            }
            if let Some(found) = records.into_iter().find(|r| r.handle(kind) == Some(text)) {
                return Ok(Some(found));
            }
            page += 1;
        }
    }

    fn read_by_id(
        &self,
        env: Environment,
        kind: TemplateKind,
        id: RemoteId,
    ) -> Result<Option<RemoteRecord>> {
        let url = format!("{}/{}", self.collection_url(env, kind), id);
        let response = self.send(self.request(Method::GET, &url), &format!("GET {}", url))?;

        if response.is_not_found() {
            return Ok(None);
        }
        if !response.is_success() {
            return Err(SyncError::http(response.status, format!("GET {}", url)));
        }
        Ok(Some(response.record()))
    }

    fn read_page(
        &self,
        env: Environment,
        kind: TemplateKind,
        page: u32,
    ) -> Result<Vec<RemoteRecord>> {
        let url = self.collection_url(env, kind);
        let paged = format!("{}?page={}&per_page={}", url, page, self.per_page);
        let response = self.send(
            self.request(Method::GET, &paged),
            &format!("GET {}", paged),
        )?;

        if !response.is_success() {
            return Err(SyncError::http(response.status, format!("GET {}", url)));
        }

        match response.data {
            Value::Array(items) => Ok(items.into_iter().map(RemoteRecord).collect()),
            Value::Null => Ok(Vec::new()),
            _ => Err(anyhow!("Expected a list of records from {}", url).into()),
        }
    }

    fn create(
        &self,
        env: Environment,
        kind: TemplateKind,
        body: &TemplateBody,
    ) -> Result<GatewayResponse> {
        let url = self.collection_url(env, kind);
        self.send(
            self.request(Method::POST, &url).json(body),
            &format!("POST {}", url),
        )
    }

    fn update(
        &self,
        env: Environment,
        kind: TemplateKind,
        id: RemoteId,
        body: &TemplateBody,
    ) -> Result<GatewayResponse> {
        let url = format!("{}/{}", self.collection_url(env, kind), id);
        self.send(
            self.request(Method::POST, &url).json(body),
            &format!("POST {}", url),
        )
    }

    fn attach(
        &self,
        env: Environment,
        kind: TemplateKind,
        shared_part_id: RemoteId,
        template_id: RemoteId,
    ) -> Result<GatewayResponse> {
        let url = self.shared_part_url(env, kind, shared_part_id, template_id);
        self.send(self.request(Method::POST, &url), &format!("POST {}", url))
    }

    fn detach(
        &self,
        env: Environment,
        kind: TemplateKind,
        shared_part_id: RemoteId,
        template_id: RemoteId,
    ) -> Result<GatewayResponse> {
        let url = self.shared_part_url(env, kind, shared_part_id, template_id);
        self.send(self.request(Method::DELETE, &url), &format!("DELETE {}", url))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use serde_json::json;

    fn gateway(server: &MockServer) -> HttpGateway {
        HttpGateway::with_timeout(&server.base_url(), Duration::from_secs(10))
            .unwrap()
            .with_per_page(2)
    }

    #[test]
    fn default_timeout_is_30_seconds() {
        let gateway = HttpGateway::new("https://example.com").unwrap();
        assert_eq!(gateway.timeout(), Duration::from_secs(30));
    }

    #[test]
    fn urls_follow_scope() {
        let gateway = HttpGateway::new("https://example.com/").unwrap();
        assert_eq!(
            gateway.collection_url(Environment::firm(111), TemplateKind::ReconciliationText),
            "https://example.com/api/v4/f/111/reconciliations"
        );
        assert_eq!(
            gateway.collection_url(Environment::partner(5), TemplateKind::AccountTemplate),
            "https://example.com/api/partner/v1/partners/5/account_templates"
        );
    }

    #[test]
    fn read_page_returns_records() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET)
                .path("/api/v4/f/111/shared_parts")
                .query_param("page", "1")
                .query_param("per_page", "2");
            then.status(200)
                .json_body(json!([{"id": 1, "name": "a"}, {"id": 2, "name": "b"}]));
        });

        let records = gateway(&server)
            .read_page(Environment::firm(111), TemplateKind::SharedPart, 1)
            .unwrap();

        mock.assert();
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].handle(TemplateKind::SharedPart), Some("b"));
    }

    #[test]
    fn read_page_error_status_is_transport_failure() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/api/v4/f/111/shared_parts");
            then.status(500).body("boom");
        });

        let err = gateway(&server)
            .read_page(Environment::firm(111), TemplateKind::SharedPart, 1)
            .unwrap_err();

        assert!(matches!(
            err,
            SyncError::TransportFailure {
                status: Some(500),
                ..
            }
        ));
    }

    #[test]
    fn find_walks_pages_until_match() {
        let server = MockServer::start();
        let page1 = server.mock(|when, then| {
            when.method(GET)
                .path("/api/v4/f/111/reconciliations")
                .query_param("page", "1");
            then.status(200).json_body(json!([
                {"id": 1, "handle": "a"},
                {"id": 2, "handle": "b"}
            ]));
        });
        let page2 = server.mock(|when, then| {
            when.method(GET)
                .path("/api/v4/f/111/reconciliations")
                .query_param("page", "2");
            then.status(200).json_body(json!([{"id": 42, "handle": "recon_y"}]));
        });

        let found = gateway(&server)
            .find_by_handle_or_name(
                Environment::firm(111),
                TemplateKind::ReconciliationText,
                "recon_y",
            )
            .unwrap();

        page1.assert();
        page2.assert();
        assert_eq!(found.unwrap().id(), Some(42));
    }

    #[test]
    fn find_stops_on_empty_page() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET)
                .path("/api/v4/f/111/export_files")
                .query_param("page", "1");
            then.status(200).json_body(json!([{"id": 1, "name": "a"}]));
        });
        let empty = server.mock(|when, then| {
            when.method(GET)
                .path("/api/v4/f/111/export_files")
                .query_param("page", "2");
            then.status(200).json_body(json!([]));
        });

        let found = gateway(&server)
            .find_by_handle_or_name(Environment::firm(111), TemplateKind::ExportFile, "zzz")
            .unwrap();

        empty.assert();
        assert!(found.is_none());
    }

    #[test]
    fn read_by_id_404_is_none() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/api/v4/f/111/reconciliations/9");
            then.status(404);
        });

        let found = gateway(&server)
            .read_by_id(Environment::firm(111), TemplateKind::ReconciliationText, 9)
            .unwrap();

        assert!(found.is_none());
    }

    #[test]
    fn attach_posts_to_template_shared_part_path() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(POST)
                .path("/api/v4/f/111/reconciliations/42/shared_parts/7");
            then.status(201);
        });

        let response = gateway(&server)
            .attach(
                Environment::firm(111),
                TemplateKind::ReconciliationText,
                7,
                42,
            )
            .unwrap();

        mock.assert();
        assert_eq!(response.status, 201);
        assert_eq!(response.data, Value::Null);
    }

    #[test]
    fn detach_uses_delete() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(DELETE)
                .path("/api/partner/v1/partners/5/account_templates/3/shared_parts/7");
            then.status(204);
        });

        let response = gateway(&server)
            .detach(Environment::partner(5), TemplateKind::AccountTemplate, 7, 3)
            .unwrap();

        mock.assert();
        assert!(response.is_success());
    }

    #[test]
    fn update_sends_body_and_auth() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(POST)
                .path("/api/v4/f/111/shared_parts/7")
                .header("Authorization", "Bearer secret-token")
                .json_body(json!({"name": "sp_x", "text": "hi"}));
            then.status(200).json_body(json!({"id": 7, "name": "sp_x"}));
        });

        let mut body = TemplateBody::new();
        body.insert("name".into(), json!("sp_x"));
        body.insert("text".into(), json!("hi"));

        let response = gateway(&server)
            .with_auth(AuthHeader::bearer("secret-token"))
            .update(Environment::firm(111), TemplateKind::SharedPart, 7, &body)
            .unwrap();

        mock.assert();
        assert_eq!(response.record().handle(TemplateKind::SharedPart), Some("sp_x"));
    }
}
