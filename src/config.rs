//! Process configuration.
//!
//! Read once at startup and passed explicitly to everything that needs it.
//! Any missing or malformed critical value aborts startup; the display profile
//! is taken as-is.

use std::env;
use std::fmt::Display;
use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;

use crate::types::ShopeeOfferSortType;
use crate::validation::{FieldIssue, Violations};

const DEFAULT_PORT: u16 = 3000;
const DEFAULT_AFFILIATE_TIMEOUT_MS: u64 = 5000;
const DEFAULT_SORT_TYPE: u8 = 1;
const DEFAULT_PAGE: u32 = 1;
const DEFAULT_LIMIT: u32 = 10;
const DEFAULT_RECENT_LINKS_TTL_SECS: u64 = 60;

#[derive(Debug, Error)]
#[error("Invalid environment variables:\n{}", format_issues(&self.issues))]
pub struct ConfigError {
    pub issues: Vec<FieldIssue>,
}

fn format_issues(issues: &[FieldIssue]) -> String {
    issues
        .iter()
        .map(FieldIssue::to_string)
        .collect::<Vec<_>>()
        .join("\n")
}

/// Identifiers of this application on the Promolinks backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SystemIds {
    pub client_id: u64,
    pub app_id: u64,
}

/// Shopee affiliate settings and query defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShopeeSettings {
    pub credential: String,
    pub secret_key: String,
    pub affiliate_endpoint: String,
    pub affiliate_subids: String,
    /// Milliseconds, forwarded to the service and interpreted there.
    pub affiliate_timeout: u64,
    pub sort_type: u8,
    pub page: u32,
    pub limit: u32,
}

/// Contact details shown to visitors. Not validated.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize)]
pub struct PublicProfile {
    pub developer_name: String,
    pub developer_url: String,
    pub company_name: String,
    pub company_phone: String,
    pub company_email: String,
    pub company_whatsapp: String,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub port: u16,
    /// Base URL of the backend every service call goes to
    pub api_base_url: String,
    pub api_key: String,
    pub system: SystemIds,
    pub shopee: ShopeeSettings,
    pub recent_links_ttl: Duration,
    pub profile: PublicProfile,
}

impl AppConfig {
    /// Load configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut violations = Violations::new();
        let mut reader = EnvReader {
            lookup: &lookup,
            violations: &mut violations,
        };

        let port = reader.number("PORT", Some(DEFAULT_PORT));
        let api_base_url = reader.required("EXTERNAL_API_MAIN_URL");
        let api_key = reader.required("API_KEY");
        let client_id = reader.number::<u64>("SYSTEM_CLIENT_ID", None);
        let app_id = reader.number::<u64>("SYSTEM_APP_ID", None);

        let credential = reader.required("SHOPEE_CREDENTIAL");
        let secret_key = reader.required("SHOPEE_SECRETKEY");
        let affiliate_endpoint = reader.required("SHOPEE_AFFILIATEENDPOINT");
        let affiliate_subids = reader.required("SHOPEE_AFFILIATESUBIDS");
        let affiliate_timeout =
            reader.number("SHOPEE_AFFILIATETIMEOUT", Some(DEFAULT_AFFILIATE_TIMEOUT_MS));
        let sort_type = reader.number("SHOPEE_SORTTYPE", Some(DEFAULT_SORT_TYPE));
        let page = reader.number("SHOPEE_PAGE", Some(DEFAULT_PAGE));
        let limit = reader.number("SHOPEE_LIMIT", Some(DEFAULT_LIMIT));
        let ttl_secs =
            reader.number("RECENT_LINKS_CACHE_TTL_SECS", Some(DEFAULT_RECENT_LINKS_TTL_SECS));

        let profile = PublicProfile {
            developer_name: reader.optional("DEVELOPER_NAME"),
            developer_url: reader.optional("DEVELOPER_URL"),
            company_name: reader.optional("COMPANY_NAME"),
            company_phone: reader.optional("COMPANY_PHONE"),
            company_email: reader.optional("COMPANY_EMAIL"),
            company_whatsapp: reader.optional("COMPANY_WHATSAPP"),
        };

        if let Some(url) = &api_base_url {
            violations.absolute_url("EXTERNAL_API_MAIN_URL", url);
        }
        if let Some(port) = port {
            violations.at_least("PORT", port, 1);
        }
        if let Some(client_id) = client_id {
            violations.at_least("SYSTEM_CLIENT_ID", client_id, 1);
        }
        if let Some(app_id) = app_id {
            violations.at_least("SYSTEM_APP_ID", app_id, 1);
        }
        if let Some(timeout) = affiliate_timeout {
            violations.at_least("SHOPEE_AFFILIATETIMEOUT", timeout, 1);
        }
        // The default sort type feeds both product and campaign queries,
        // so it has to be valid for the narrower of the two.
        if let Some(sort_type) = sort_type {
            violations.one_of("SHOPEE_SORTTYPE", sort_type, &ShopeeOfferSortType::ALL);
        }
        if let Some(page) = page {
            violations.at_least("SHOPEE_PAGE", page, 1);
        }
        if let Some(limit) = limit {
            violations.within("SHOPEE_LIMIT", limit, 1, 50);
        }

        let config = Self {
            port: port.unwrap_or_default(),
            api_base_url: api_base_url.unwrap_or_default(),
            api_key: api_key.unwrap_or_default(),
            system: SystemIds {
                client_id: client_id.unwrap_or_default(),
                app_id: app_id.unwrap_or_default(),
            },
            shopee: ShopeeSettings {
                credential: credential.unwrap_or_default(),
                secret_key: secret_key.unwrap_or_default(),
                affiliate_endpoint: affiliate_endpoint.unwrap_or_default(),
                affiliate_subids: affiliate_subids.unwrap_or_default(),
                affiliate_timeout: affiliate_timeout.unwrap_or_default(),
                sort_type: sort_type.unwrap_or_default(),
                page: page.unwrap_or_default(),
                limit: limit.unwrap_or_default(),
            },
            recent_links_ttl: Duration::from_secs(ttl_secs.unwrap_or_default()),
            profile,
        };

        violations
            .finish(config)
            .map_err(|err| ConfigError { issues: err.issues })
    }
}

struct EnvReader<'a, F> {
    lookup: &'a F,
    violations: &'a mut Violations,
}

impl<F> EnvReader<'_, F>
where
    F: Fn(&str) -> Option<String>,
{
    fn get(&self, key: &str) -> Option<String> {
        (self.lookup)(key)
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
    }

    fn required(&mut self, key: &'static str) -> Option<String> {
        let value = self.get(key);
        if value.is_none() {
            self.violations.push(key, format!("{key} is required"));
        }
        value
    }

    fn optional(&mut self, key: &'static str) -> String {
        self.get(key).unwrap_or_default()
    }

    fn number<N>(&mut self, key: &'static str, default: Option<N>) -> Option<N>
    where
        N: FromStr,
        N::Err: Display,
    {
        match self.get(key) {
            Some(raw) => match raw.parse::<N>() {
                Ok(value) => Some(value),
                Err(e) => {
                    self.violations
                        .push(key, format!("{key} must be a positive number ({e})"));
                    None
                }
            },
            None if default.is_some() => default,
            None => {
                self.violations.push(key, format!("{key} is required"));
                None
            }
        }
    }
}
