//! Preview parameters.
//!
//! The CMS opens preview pages with `?preview_token=..&key=..&ctx=..&ver=..&loc=..`;
//! [`PreviewParams`] deserializes straight from that query string.

use serde::{Deserialize, Serialize};

/// Parameters of a CMS preview request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreviewParams {
    /// Short-lived token sent as a bearer token.
    pub preview_token: String,
    /// Content key of the item being previewed.
    pub key: String,
    /// `edit` in on-page editing mode, `preview` otherwise.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ctx: Option<String>,
    /// Content version.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ver: Option<String>,
    /// Locale.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub loc: Option<String>,
}

impl PreviewParams {
    /// Creates preview parameters for `key` with no context, version or locale.
    pub fn new(preview_token: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            preview_token: preview_token.into(),
            key: key.into(),
            ctx: None,
            ver: None,
            loc: None,
        }
    }

    pub fn ctx(mut self, ctx: impl Into<String>) -> Self {
        self.ctx = Some(ctx.into());
        self
    }

    pub fn ver(mut self, ver: impl Into<String>) -> Self {
        self.ver = Some(ver.into());
        self
    }

    pub fn loc(mut self, loc: impl Into<String>) -> Self {
        self.loc = Some(loc.into());
        self
    }

    /// Returns true when the CMS opened the page in editing mode.
    pub fn is_edit(&self) -> bool {
        self.ctx.as_deref() == Some("edit")
    }

    /// Returns the context attached to every node of a preview response.
    pub fn context(&self) -> PreviewContext {
        PreviewContext {
            edit: self.is_edit(),
            preview_token: self.preview_token.clone(),
        }
    }
}

/// Value injected as `__context` into preview responses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreviewContext {
    pub edit: bool,
    pub preview_token: String,
}
