//! Façade over the Shopee affiliate operations exposed by the backend.

use crate::client::{self, ApiTransport};
use crate::config::AppConfig;
use crate::credential::{ShopeeCredentials, ShopeeDefaults};
use crate::error::{ApiError, Service, codes};
use crate::schema::{self, GenerateAffiliateLinkParams, ProductOffersQuery, ShopeeOffersQuery};
use crate::types::{
    GenerateAffiliateLinkResponse, PageInfo, Paginated, ProductOffersResponse, ShopeeEnvelope,
    ShopeeOffer, ShopeeOffersResponse, ShopeeProduct,
};

pub mod endpoints {
    pub const GENERATE_AFFILIATE_LINK: &str = "/shopee-operation/v1/generate-affiliate-link";
    pub const GET_PRODUCT_OFFERS: &str = "/shopee-operation/v1/get-product-offers";
    pub const GET_SHOPEE_OFFERS: &str = "/shopee-operation/v1/get-shopee-offers";
}

#[derive(Debug, Clone)]
pub struct ShopeeApi<T> {
    transport: T,
    credentials: ShopeeCredentials,
    defaults: ShopeeDefaults,
    api_key: String,
}

impl<T: ApiTransport> ShopeeApi<T> {
    pub fn new(transport: T, config: &AppConfig) -> Self {
        Self::with_credentials(
            transport,
            ShopeeCredentials::from(config),
            ShopeeDefaults::from(config),
            &config.api_key,
        )
    }

    pub fn with_credentials(
        transport: T,
        credentials: ShopeeCredentials,
        defaults: ShopeeDefaults,
        api_key: impl Into<String>,
    ) -> Self {
        Self {
            transport,
            credentials,
            defaults,
            api_key: api_key.into(),
        }
    }

    /// Turn a Shopee product URL into a tracked affiliate link.
    pub async fn generate_affiliate_link(
        &self,
        origin_url: impl Into<String>,
    ) -> Result<GenerateAffiliateLinkResponse, ApiError> {
        let params = GenerateAffiliateLinkParams {
            origin_url: origin_url.into(),
        };

        client::execute(
            &self.transport,
            &self.api_key,
            Service::Shopee,
            codes::SHOPEE_GENERATE_LINK,
            endpoints::GENERATE_AFFILIATE_LINK,
            schema::validate_generate_affiliate_link(params, &self.credentials),
        )
        .await
    }

    /// Search product offers. At least one of keyword, shop id, item id or
    /// category id has to be given.
    pub async fn get_product_offers(
        &self,
        query: ProductOffersQuery,
    ) -> Result<ProductOffersResponse, ApiError> {
        client::execute(
            &self.transport,
            &self.api_key,
            Service::Shopee,
            codes::SHOPEE_GET_PRODUCT_OFFERS,
            endpoints::GET_PRODUCT_OFFERS,
            schema::validate_product_offers(query, &self.credentials, &self.defaults),
        )
        .await
    }

    /// Search active campaign offers.
    pub async fn get_shopee_offers(
        &self,
        query: ShopeeOffersQuery,
    ) -> Result<ShopeeOffersResponse, ApiError> {
        client::execute(
            &self.transport,
            &self.api_key,
            Service::Shopee,
            codes::SHOPEE_GET_OFFERS,
            endpoints::GET_SHOPEE_OFFERS,
            schema::validate_shopee_offers(query, &self.credentials, &self.defaults),
        )
        .await
    }
}

pub fn extract_products(response: &ProductOffersResponse) -> &[ShopeeProduct] {
    response
        .data
        .as_ref()
        .and_then(|data| data.products.as_deref())
        .unwrap_or(&[])
}

pub fn extract_offers(response: &ShopeeOffersResponse) -> &[ShopeeOffer] {
    response
        .data
        .as_ref()
        .and_then(|data| data.offers.as_deref())
        .unwrap_or(&[])
}

/// Pagination of either paginated response, `{1, 10, false}` when absent.
pub fn extract_page_info<D: Paginated>(response: &ShopeeEnvelope<D>) -> PageInfo {
    response
        .data
        .as_ref()
        .and_then(|data| data.page_info())
        .unwrap_or_default()
}

pub fn is_success_response<D>(response: &ShopeeEnvelope<D>) -> bool {
    response.success
}
