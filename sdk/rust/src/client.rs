//! Graph client.
//!
//! Every content lookup runs the same pipeline:
//!
//! 1. Probe the item's concrete type and whether DAM assets are enabled.
//! 2. Synthesize a query for that type from the schema registry.
//! 3. POST the query and classify any failure.
//! 4. Normalize the response.
//!
//! # Example
//!
//! ```ignore
//! use cmsgraph_sdk::{ClientConfig, GraphClient};
//!
//! let client = GraphClient::new(ClientConfig::from_env()?, registry)?;
//! let pages = client.get_content_by_path("/en/about", None).await?;
//! ```

use crate::error::{GraphError, GraphQLError, GraphRequest, GraphResult};
use crate::filter::{path_filter, preview_filter};
use crate::normalize::{decorate_with_preview_context, strip_alias_prefixes};
use crate::preview::PreviewParams;
use crate::queries::{ANCESTOR_PATH_QUERY, CHILD_ITEMS_QUERY, CONTENT_METADATA_QUERY};
use cmsgraph_query::{build_multi_item_query, build_single_item_query};
use cmsgraph_schema::SchemaRegistry;
use futures::future::try_join_all;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Environment variable holding the Graph endpoint URL.
pub const GATEWAY_ENV: &str = "CMS_GRAPH_GATEWAY";
/// Environment variable holding the Graph single key.
pub const SINGLE_KEY_ENV: &str = "CMS_GRAPH_SINGLE_KEY";

/// Client configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Full URL of the Graph content endpoint.
    pub graph_url: String,
    /// Public key sent as the `auth` query parameter.
    pub single_key: String,
    /// Per-request timeout. Requests wait indefinitely when unset.
    pub timeout: Option<Duration>,
}

impl ClientConfig {
    /// Creates a new config.
    pub fn new(graph_url: impl Into<String>, single_key: impl Into<String>) -> Self {
        Self {
            graph_url: graph_url.into(),
            single_key: single_key.into(),
            timeout: None,
        }
    }

    /// Sets the timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Reads the config from `CMS_GRAPH_GATEWAY` and `CMS_GRAPH_SINGLE_KEY`.
    pub fn from_env() -> GraphResult<Self> {
        let read = |name: &str| {
            std::env::var(name)
                .ok()
                .filter(|value| !value.trim().is_empty())
                .ok_or_else(|| GraphError::Config(format!("{name} is not set")))
        };
        Ok(Self::new(read(GATEWAY_ENV)?, read(SINGLE_KEY_ENV)?))
    }
}

/// How a request authenticates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Auth {
    /// Public single key, sent as `?auth=<key>`.
    SingleKey,
    /// Preview token, sent as a bearer token.
    Bearer(String),
}

/// Result of the metadata probe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentMetadata {
    /// Concrete content type of the matched item, if any matched.
    pub type_name: Option<String>,
    /// Whether the Graph instance exposes DAM asset types.
    pub dam_enabled: bool,
}

/// Metadata of a page linked from another item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkMetadata {
    pub key: Option<String>,
    pub display_name: Option<String>,
    pub locale: Option<String>,
    pub types: Option<Vec<String>>,
    pub sort_order: Option<i64>,
    pub url: Option<LinkUrl>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkUrl {
    pub base: Option<String>,
    pub hierarchical: Option<String>,
    pub default: Option<String>,
}

impl LinkMetadata {
    fn hierarchical_len(&self) -> usize {
        self.url
            .as_ref()
            .and_then(|url| url.hierarchical.as_deref())
            .map_or(0, str::len)
    }
}

/// Client for the CMS Graph content endpoint.
#[derive(Debug, Clone)]
pub struct GraphClient {
    config: ClientConfig,
    http: reqwest::Client,
    registry: Arc<SchemaRegistry>,
}

impl GraphClient {
    /// Creates a client that synthesizes queries from `registry`.
    pub fn new(
        config: ClientConfig,
        registry: impl Into<Arc<SchemaRegistry>>,
    ) -> GraphResult<Self> {
        reqwest::Url::parse(&config.graph_url).map_err(|e| {
            GraphError::Config(format!("invalid Graph URL `{}`: {e}", config.graph_url))
        })?;
        let http = reqwest::Client::builder()
            .build()
            .map_err(|e| GraphError::Config(e.to_string()))?;
        Ok(Self {
            config,
            http,
            registry: registry.into(),
        })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn registry(&self) -> &SchemaRegistry {
        &self.registry
    }

    /// Replaces the registry used for query synthesis.
    pub fn set_registry(&mut self, registry: impl Into<Arc<SchemaRegistry>>) {
        self.registry = registry.into();
    }

    /// Sends one GraphQL request and returns its `data`.
    pub async fn request(&self, query: &str, variables: Value, auth: &Auth) -> GraphResult<Value> {
        let request = GraphRequest {
            query: query.to_string(),
            variables,
        };

        let mut builder = self.http.post(&self.config.graph_url).json(&request);
        builder = match auth {
            Auth::SingleKey => builder.query(&[("auth", self.config.single_key.as_str())]),
            Auth::Bearer(token) => builder.bearer_auth(token),
        };
        if let Some(timeout) = self.config.timeout {
            builder = builder.timeout(timeout);
        }

        let response = match builder.send().await {
            Ok(response) => response,
            Err(e) => {
                warn!(url = %self.config.graph_url, error = %e, "Graph unreachable");
                return Err(GraphError::Unreachable {
                    url: self.config.graph_url.clone(),
                    message: e.to_string(),
                    request: Box::new(request),
                });
            }
        };

        let status = response.status().as_u16();
        let body = match response.text().await {
            Ok(body) => body,
            Err(e) => {
                return Err(GraphError::Unreachable {
                    url: self.config.graph_url.clone(),
                    message: e.to_string(),
                    request: Box::new(request),
                });
            }
        };
        debug!(status, bytes = body.len(), "Graph response");

        let parsed: Option<Value> = serde_json::from_str(&body).ok();

        if !(200..300).contains(&status) {
            if let Some(errors) = parsed.as_ref().and_then(graphql_errors) {
                return Err(GraphError::ContentResponse {
                    status,
                    errors,
                    request: Box::new(request),
                });
            }
            return Err(GraphError::HttpResponse {
                status,
                body,
                request: Box::new(request),
            });
        }

        let Some(mut parsed) = parsed else {
            return Err(GraphError::HttpResponse {
                status,
                body,
                request: Box::new(request),
            });
        };

        if let Some(errors) = graphql_errors(&parsed) {
            return Err(GraphError::ContentResponse {
                status,
                errors,
                request: Box::new(request),
            });
        }

        match parsed.get_mut("data").map(Value::take) {
            Some(data) if !data.is_null() => Ok(data),
            _ => Err(GraphError::UnexpectedShape {
                message: "response has no `data`".to_string(),
                request: Box::new(request),
            }),
        }
    }

    /// Probes the concrete type of the item matched by `variables`.
    pub async fn get_content_metadata(
        &self,
        variables: &Value,
        auth: &Auth,
    ) -> GraphResult<ContentMetadata> {
        let data = self
            .request(CONTENT_METADATA_QUERY, variables.clone(), auth)
            .await?;

        let dam_enabled = data.get("damAssetType").is_some_and(|t| !t.is_null());
        let type_name = match data.pointer("/_Content/item/_metadata/types") {
            None | Some(Value::Null) => None,
            Some(Value::Array(types)) => match types.first() {
                None | Some(Value::Null) => None,
                Some(Value::String(name)) => Some(name.clone()),
                Some(other) => {
                    return Err(unexpected(
                        format!("expected a content type name, found `{other}`"),
                        CONTENT_METADATA_QUERY,
                        variables,
                    ));
                }
            },
            Some(other) => {
                return Err(unexpected(
                    format!("expected a list of content types, found `{other}`"),
                    CONTENT_METADATA_QUERY,
                    variables,
                ));
            }
        };

        debug!(?type_name, dam_enabled, "content metadata");
        Ok(ContentMetadata {
            type_name,
            dam_enabled,
        })
    }

    /// Fetches every item published at `path`.
    ///
    /// Returns an empty list when nothing is published there.
    pub async fn get_content_by_path(
        &self,
        path: &str,
        host: Option<&str>,
    ) -> GraphResult<Vec<Value>> {
        let variables = path_filter(path, host);
        let metadata = self
            .get_content_metadata(&variables, &Auth::SingleKey)
            .await?;
        let Some(type_name) = metadata.type_name else {
            info!(path, "no content found at path");
            return Ok(Vec::new());
        };

        let query = build_multi_item_query(&self.registry, &type_name, metadata.dam_enabled)?;
        let data = self
            .request(&query, variables.clone(), &Auth::SingleKey)
            .await?;

        match data.pointer("/_Content/items") {
            Some(Value::Array(items)) => {
                info!(path, content_type = %type_name, count = items.len(), "fetched content");
                Ok(items.iter().map(strip_alias_prefixes).collect())
            }
            Some(Value::Null) => Ok(Vec::new()),
            _ => Err(unexpected(
                "`_Content.items` is missing".to_string(),
                &query,
                &variables,
            )),
        }
    }

    /// Fetches the item a preview request points at.
    ///
    /// Fails with `NoContentForKey` when the key matches nothing.
    pub async fn get_preview_content(&self, params: &PreviewParams) -> GraphResult<Value> {
        let variables = preview_filter(params);
        let auth = Auth::Bearer(params.preview_token.clone());
        let not_found = || GraphError::NoContentForKey {
            key: params.key.clone(),
        };

        let metadata = self.get_content_metadata(&variables, &auth).await?;
        let type_name = metadata.type_name.ok_or_else(not_found)?;

        let query = build_single_item_query(&self.registry, &type_name, metadata.dam_enabled)?;
        let data = self.request(&query, variables, &auth).await?;
        let item = data
            .pointer("/_Content/item")
            .filter(|item| !item.is_null())
            .ok_or_else(not_found)?;

        info!(
            key = %params.key,
            content_type = %type_name,
            edit = params.is_edit(),
            "fetched preview content"
        );
        Ok(decorate_with_preview_context(
            &strip_alias_prefixes(item),
            &params.context(),
        ))
    }

    /// Lists the pages from the site root down to the item at `path`.
    ///
    /// Returns `None` when no item exists at `path`.
    pub async fn get_ancestor_path(
        &self,
        path: &str,
        host: Option<&str>,
    ) -> GraphResult<Option<Vec<LinkMetadata>>> {
        let links = self.fetch_links(ANCESTOR_PATH_QUERY, path, host).await?;
        Ok(links.map(|mut links| {
            links.sort_by_key(LinkMetadata::hierarchical_len);
            links
        }))
    }

    /// Lists the pages directly below the item at `path`, by sort order.
    ///
    /// Returns `None` when no item exists at `path`.
    pub async fn get_child_items(
        &self,
        path: &str,
        host: Option<&str>,
    ) -> GraphResult<Option<Vec<LinkMetadata>>> {
        let links = self.fetch_links(CHILD_ITEMS_QUERY, path, host).await?;
        Ok(links.map(|mut links| {
            links.sort_by_key(|link| (link.sort_order.is_none(), link.sort_order));
            links
        }))
    }

    /// Lists the children of several items concurrently, in input order.
    pub async fn get_child_items_for(
        &self,
        paths: &[&str],
        host: Option<&str>,
    ) -> GraphResult<Vec<Option<Vec<LinkMetadata>>>> {
        try_join_all(paths.iter().map(|path| self.get_child_items(path, host))).await
    }

    async fn fetch_links(
        &self,
        query: &str,
        path: &str,
        host: Option<&str>,
    ) -> GraphResult<Option<Vec<LinkMetadata>>> {
        let variables = path_filter(path, host);
        let data = self
            .request(query, variables.clone(), &Auth::SingleKey)
            .await?;

        let Some(item) = data.pointer("/_Content/item").filter(|item| !item.is_null()) else {
            return Ok(None);
        };
        if item.get("_id").map_or(true, Value::is_null) {
            return Ok(None);
        }

        let entries: &[Value] = match item.pointer("/_link/_Page/items") {
            Some(Value::Array(entries)) => entries.as_slice(),
            _ => &[],
        };

        let mut links = Vec::with_capacity(entries.len());
        for metadata in entries.iter().filter_map(|entry| entry.get("_metadata")) {
            if metadata.is_null() {
                continue;
            }
            let link = LinkMetadata::deserialize(metadata).map_err(|e| {
                unexpected(format!("malformed link metadata: {e}"), query, &variables)
            })?;
            links.push(link);
        }

        debug!(path, count = links.len(), "fetched links");
        Ok(Some(links))
    }
}

/// Returns the GraphQL `errors` of a response body, when there are any.
fn graphql_errors(body: &Value) -> Option<Vec<GraphQLError>> {
    let errors = body.get("errors")?;
    if errors.as_array().map_or(true, Vec::is_empty) {
        return None;
    }
    serde_json::from_value(errors.clone()).ok()
}

fn unexpected(message: String, query: &str, variables: &Value) -> GraphError {
    GraphError::UnexpectedShape {
        message,
        request: Box::new(GraphRequest {
            query: query.to_string(),
            variables: variables.clone(),
        }),
    }
}
