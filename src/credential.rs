//! Static credentials attached to every outbound request.
//!
//! Built once from [`AppConfig`] and never mutated afterwards.

use crate::config::AppConfig;

/// Header carrying the backend API key.
pub const API_KEY_HEADER: &str = "x-api-key";

/// Shopee affiliate credentials sent in each Shopee request body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShopeeCredentials {
    pub credential: String,
    pub secret_key: String,
    pub affiliate_endpoint: String,
    pub affiliate_subids: String,
    pub affiliate_timeout: String,
}

/// Defaults for optional Shopee query fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShopeeDefaults {
    pub sort_type: u8,
    pub page: u32,
    pub limit: u32,
}

/// Promolinks identifiers sent in each Promolinks request body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PromolinksCredentials {
    pub client_id: u64,
    pub app_id: u64,
}

impl From<&AppConfig> for ShopeeCredentials {
    fn from(config: &AppConfig) -> Self {
        let shopee = &config.shopee;
        Self {
            credential: shopee.credential.clone(),
            secret_key: shopee.secret_key.clone(),
            affiliate_endpoint: shopee.affiliate_endpoint.clone(),
            affiliate_subids: shopee.affiliate_subids.clone(),
            affiliate_timeout: shopee.affiliate_timeout.to_string(),
        }
    }
}

impl From<&AppConfig> for ShopeeDefaults {
    fn from(config: &AppConfig) -> Self {
        Self {
            sort_type: config.shopee.sort_type,
            page: config.shopee.page,
            limit: config.shopee.limit,
        }
    }
}

impl From<&AppConfig> for PromolinksCredentials {
    fn from(config: &AppConfig) -> Self {
        Self {
            client_id: config.system.client_id,
            app_id: config.system.app_id,
        }
    }
}

/// Auth headers for a backend request.
pub fn auth_headers(api_key: &str) -> Vec<(&'static str, String)> {
    vec![(API_KEY_HEADER, api_key.to_string())]
}
