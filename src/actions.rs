//! Entry points triggered by a visitor.
//!
//! These never fail: every error from the façades is turned into a result
//! value with `success: false` and a message fit for display.

use serde::Serialize;
use thiserror::Error;

use crate::cache::RecentLinksCache;
use crate::client::ApiTransport;
use crate::config::AppConfig;
use crate::promolinks::{self, PromolinksApi};
use crate::schema::LinkGenerationFindAllParams;
use crate::shopee::ShopeeApi;
use crate::types::LinkGenerationRecord;

/// Link prefixes accepted by [`check_shopee_link`].
pub const RECOGNIZED_LINK_PREFIXES: [&str; 5] = [
    "https://s.shopee.com",
    "https://br.shopee.com",
    "https://shopee.com.br",
    "https://br.shp.ee",
    "https://shp.ee",
];

pub const DEFAULT_RECENT_LINKS_LIMIT: u32 = 10;

const GENERATE_FALLBACK_ERROR: &str = "Unexpected error while generating the affiliate link.";
const RECENT_LINKS_FALLBACK_ERROR: &str = "Failed to fetch recent links.";

/// Rejection from the advisory link check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum LinkCheckError {
    #[error("Please paste the product link.")]
    Blank,
    #[error("Unrecognized link. Make sure it is a Shopee link.")]
    Unrecognized,
}

pub fn is_recognized_shopee_link(url: &str) -> bool {
    RECOGNIZED_LINK_PREFIXES
        .iter()
        .any(|prefix| url.starts_with(prefix))
}

/// Advisory check that `input` looks like a Shopee product link.
///
/// Returns the trimmed link. The façade schema stays the authoritative gate and
/// only requires a well-formed URL.
pub fn check_shopee_link(input: &str) -> Result<&str, LinkCheckError> {
    let link = input.trim();
    if link.is_empty() {
        return Err(LinkCheckError::Blank);
    }
    if !is_recognized_shopee_link(link) {
        return Err(LinkCheckError::Unrecognized);
    }
    Ok(link)
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateLinkResult {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub affiliate_link: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl GenerateLinkResult {
    fn failure(message: String) -> Self {
        Self {
            success: false,
            affiliate_link: None,
            error: Some(non_empty_or(message, GENERATE_FALLBACK_ERROR)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FetchRecentLinksResult {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub records: Option<Vec<LinkGenerationRecord>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl FetchRecentLinksResult {
    fn failure(message: String) -> Self {
        Self {
            success: false,
            records: None,
            error: Some(non_empty_or(message, RECENT_LINKS_FALLBACK_ERROR)),
        }
    }
}

fn non_empty_or(message: String, fallback: &str) -> String {
    if message.trim().is_empty() {
        fallback.to_string()
    } else {
        message
    }
}

/// The two façades plus the cached view of recent links.
#[derive(Clone)]
pub struct Actions<T> {
    shopee: ShopeeApi<T>,
    promolinks: PromolinksApi<T>,
    recent_links: RecentLinksCache,
}

impl<T: ApiTransport> Actions<T> {
    pub fn new(
        shopee: ShopeeApi<T>,
        promolinks: PromolinksApi<T>,
        recent_links: RecentLinksCache,
    ) -> Self {
        Self {
            shopee,
            promolinks,
            recent_links,
        }
    }

    /// Wire both façades to one transport.
    pub fn from_config(transport: T, config: &AppConfig) -> Self
    where
        T: Clone,
    {
        Self::new(
            ShopeeApi::new(transport.clone(), config),
            PromolinksApi::new(transport, config),
            RecentLinksCache::new(config.recent_links_ttl),
        )
    }

    pub fn shopee(&self) -> &ShopeeApi<T> {
        &self.shopee
    }

    pub fn promolinks(&self) -> &PromolinksApi<T> {
        &self.promolinks
    }

    pub fn recent_links(&self) -> &RecentLinksCache {
        &self.recent_links
    }

    /// Generate an affiliate link for `origin_url`.
    ///
    /// On success the recent-links feed is invalidated so the new link shows
    /// up on the next read.
    pub async fn generate_link(&self, origin_url: &str) -> GenerateLinkResult {
        match self.shopee.generate_affiliate_link(origin_url).await {
            Ok(response) => {
                self.recent_links.invalidate().await;
                GenerateLinkResult {
                    success: true,
                    affiliate_link: Some(response.affiliate_link),
                    error: None,
                }
            }
            Err(err) => GenerateLinkResult::failure(err.message),
        }
    }

    /// The `limit` most recently generated links.
    pub async fn fetch_recent_links(&self, limit: u32) -> FetchRecentLinksResult {
        if let Some(records) = self.recent_links.get(limit).await {
            tracing::debug!("Serving {} recent link(s) from cache", records.len());
            return FetchRecentLinksResult {
                success: true,
                records: Some(records),
                error: None,
            };
        }

        let generation = self.recent_links.generation().await;
        let params = LinkGenerationFindAllParams {
            pe_limit: Some(limit),
        };
        let response = match self.promolinks.link_generation_find_all(params).await {
            Ok(response) => response,
            Err(err) => return FetchRecentLinksResult::failure(err.message),
        };

        if !promolinks::is_success_response(&response) {
            return FetchRecentLinksResult::failure(response.message);
        }

        let records = promolinks::extract_link_generation_records(&response).to_vec();
        self.recent_links
            .store(limit, generation, records.clone())
            .await;

        FetchRecentLinksResult {
            success: true,
            records: Some(records),
            error: None,
        }
    }
}
