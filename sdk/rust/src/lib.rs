//! cmsgraph SDK
//!
//! Fetches content from the CMS Graph endpoint using queries synthesized from
//! the application's content types.
//!
//! # Fetching by path
//!
//! ```ignore
//! use cmsgraph_schema::{BaseType, ContentTypeDefinition, PropertyDefinition, SchemaRegistry};
//! use cmsgraph_sdk::{ClientConfig, GraphClient};
//!
//! let registry = SchemaRegistry::with_content_types([
//!     ContentTypeDefinition::new("Article", BaseType::Page)
//!         .property("title", PropertyDefinition::string()),
//! ])?;
//!
//! let client = GraphClient::new(ClientConfig::from_env()?, registry)?;
//! let items = client.get_content_by_path("/en/news/", None).await?;
//! // Aliased fields come back under their property name.
//! println!("{}", items[0]["title"]);
//! ```
//!
//! # Preview
//!
//! ```ignore
//! use cmsgraph_sdk::PreviewParams;
//!
//! let params: PreviewParams = serde_urlencoded::from_str(query_string)?;
//! let item = client.get_preview_content(&params).await?;
//! assert!(item["__context"]["preview_token"].is_string());
//! ```

pub mod client;
pub mod error;
pub mod filter;
pub mod normalize;
pub mod preview;
pub mod queries;

pub use client::{
    Auth, ClientConfig, ContentMetadata, GraphClient, LinkMetadata, LinkUrl, GATEWAY_ENV,
    SINGLE_KEY_ENV,
};
pub use error::{ErrorCode, GraphError, GraphQLError, GraphRequest, GraphResult};
pub use filter::{path_filter, preview_filter};
pub use normalize::{decorate_with_preview_context, strip_alias_prefixes};
pub use preview::{PreviewContext, PreviewParams};
