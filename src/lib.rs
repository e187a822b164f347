pub mod actions;
pub mod cache;
pub mod client;
pub mod config;
pub mod credential;
pub mod error;
pub mod promolinks;
pub mod routes;
pub mod schema;
pub mod shopee;
pub mod types;
pub mod validation;

pub use actions::{Actions, FetchRecentLinksResult, GenerateLinkResult, check_shopee_link};
pub use cache::RecentLinksCache;
pub use client::{ApiClient, ApiTransport};
pub use config::AppConfig;
pub use error::{ApiError, ApiErrorKind, Service, TransportError};
pub use promolinks::PromolinksApi;
pub use shopee::ShopeeApi;
pub use types::{LinkGenerationRecord, PageInfo, ShopeeOffer, ShopeeProduct};
