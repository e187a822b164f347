//! Request schemas.
//!
//! Each `validate_*` function merges caller parameters with the static
//! credentials, applies defaults and returns the request body to send, or a
//! [`ValidationError`] naming every offending field. None of them perform I/O.

use serde::Deserialize;

use crate::credential::{PromolinksCredentials, ShopeeCredentials, ShopeeDefaults};
use crate::types::{
    GenerateAffiliateLinkRequest, LinkGenerationFindAllRequest, ListType, ProductOffersRequest,
    PromoLinkFindAllRequest, ShopeeOfferSortType, ShopeeOffersRequest, SortType,
};
use crate::validation::{ValidationError, Violations};

const MAX_PAGE_SIZE: u32 = 50;
const DEFAULT_AFFILIATE_TIMEOUT: &str = "5000";

/// Caller input for generating an affiliate link.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateAffiliateLinkParams {
    pub origin_url: String,
}

/// Caller input for a product offer search.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProductOffersQuery {
    pub affiliate_subids: Option<String>,
    pub keyword: Option<String>,
    pub shop_id: Option<String>,
    pub item_id: Option<String>,
    pub product_cat_id: Option<i64>,
    pub list_type: Option<u8>,
    pub sort_type: Option<u8>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
    #[serde(rename = "isAMSOffer")]
    pub is_ams_offer: Option<bool>,
    pub is_key_seller: Option<bool>,
}

/// Caller input for a campaign offer search.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ShopeeOffersQuery {
    pub affiliate_subids: Option<String>,
    pub affiliate_timeout: Option<String>,
    pub keyword: Option<String>,
    pub sort_type: Option<u8>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

/// Caller input for listing generated links.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(default)]
pub struct LinkGenerationFindAllParams {
    pub pe_limit: Option<u32>,
}

/// Caller input for listing promo links.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct PromoLinkFindAllParams {
    pub pe_link_id: u64,
    #[serde(default)]
    pub pe_limit: Option<u32>,
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn shopee_credentials(violations: &mut Violations, credentials: &ShopeeCredentials) {
    violations.non_empty("credential", &credentials.credential);
    violations.non_empty("secretKey", &credentials.secret_key);
    violations.non_empty("affiliateEndpoint", &credentials.affiliate_endpoint);
}

fn page_and_limit(
    violations: &mut Violations,
    page: Option<u32>,
    limit: Option<u32>,
    defaults: &ShopeeDefaults,
) -> (u32, u32) {
    let page = page.unwrap_or(defaults.page);
    let limit = limit.unwrap_or(defaults.limit);
    violations.at_least("page", page, 1);
    violations.within("limit", limit, 1, MAX_PAGE_SIZE);
    (page, limit)
}

pub fn validate_generate_affiliate_link(
    params: GenerateAffiliateLinkParams,
    credentials: &ShopeeCredentials,
) -> Result<GenerateAffiliateLinkRequest, ValidationError> {
    let mut violations = Violations::new();
    violations.absolute_url("originUrl", &params.origin_url);
    shopee_credentials(&mut violations, credentials);
    violations.non_empty("affiliateSubids", &credentials.affiliate_subids);

    let affiliate_timeout = if credentials.affiliate_timeout.is_empty() {
        DEFAULT_AFFILIATE_TIMEOUT.to_string()
    } else {
        credentials.affiliate_timeout.clone()
    };

    violations.finish(GenerateAffiliateLinkRequest {
        origin_url: params.origin_url,
        credential: credentials.credential.clone(),
        secret_key: credentials.secret_key.clone(),
        affiliate_endpoint: credentials.affiliate_endpoint.clone(),
        affiliate_subids: credentials.affiliate_subids.clone(),
        affiliate_timeout,
    })
}

pub fn validate_product_offers(
    query: ProductOffersQuery,
    credentials: &ShopeeCredentials,
    defaults: &ShopeeDefaults,
) -> Result<ProductOffersRequest, ValidationError> {
    let mut violations = Violations::new();
    shopee_credentials(&mut violations, credentials);

    // An empty or whitespace-only criterion is no criterion: it neither
    // satisfies the rule below nor reaches the request body.
    let keyword = non_blank(query.keyword);
    let shop_id = non_blank(query.shop_id);
    let item_id = non_blank(query.item_id);

    if let Some(list_type) = query.list_type {
        violations.one_of("listType", list_type, &ListType::ALL);
    }
    let sort_type = query.sort_type.unwrap_or(defaults.sort_type);
    violations.one_of("sortType", sort_type, &SortType::ALL);
    let (page, limit) = page_and_limit(&mut violations, query.page, query.limit, defaults);

    if keyword.is_none() && shop_id.is_none() && item_id.is_none() && query.product_cat_id.is_none()
    {
        violations.push(
            "keyword",
            "At least one search criterion must be provided: keyword, shopId, itemId or productCatId",
        );
    }

    violations.finish(ProductOffersRequest {
        credential: credentials.credential.clone(),
        secret_key: credentials.secret_key.clone(),
        affiliate_endpoint: credentials.affiliate_endpoint.clone(),
        affiliate_subids: non_blank(query.affiliate_subids)
            .or_else(|| non_blank(Some(credentials.affiliate_subids.clone()))),
        keyword,
        shop_id,
        item_id,
        product_cat_id: query.product_cat_id,
        list_type: query.list_type,
        sort_type,
        page,
        limit,
        is_ams_offer: query.is_ams_offer,
        is_key_seller: query.is_key_seller,
    })
}

pub fn validate_shopee_offers(
    query: ShopeeOffersQuery,
    credentials: &ShopeeCredentials,
    defaults: &ShopeeDefaults,
) -> Result<ShopeeOffersRequest, ValidationError> {
    let mut violations = Violations::new();
    shopee_credentials(&mut violations, credentials);

    let sort_type = query.sort_type.unwrap_or(defaults.sort_type);
    violations.one_of("sortType", sort_type, &ShopeeOfferSortType::ALL);
    let (page, limit) = page_and_limit(&mut violations, query.page, query.limit, defaults);

    violations.finish(ShopeeOffersRequest {
        credential: credentials.credential.clone(),
        secret_key: credentials.secret_key.clone(),
        affiliate_endpoint: credentials.affiliate_endpoint.clone(),
        affiliate_subids: non_blank(query.affiliate_subids)
            .or_else(|| non_blank(Some(credentials.affiliate_subids.clone()))),
        affiliate_timeout: non_blank(query.affiliate_timeout)
            .or_else(|| non_blank(Some(credentials.affiliate_timeout.clone()))),
        keyword: non_blank(query.keyword),
        sort_type,
        page,
        limit,
    })
}

pub fn validate_link_generation_find_all(
    params: LinkGenerationFindAllParams,
    credentials: &PromolinksCredentials,
) -> Result<LinkGenerationFindAllRequest, ValidationError> {
    let mut violations = Violations::new();
    violations.at_least("pe_app_id", credentials.app_id, 1);
    if let Some(limit) = params.pe_limit {
        violations.at_least("pe_limit", limit, 1);
    }

    violations.finish(LinkGenerationFindAllRequest {
        pe_client_id: credentials.client_id,
        pe_app_id: credentials.app_id,
        pe_limit: params.pe_limit,
    })
}

pub fn validate_promo_link_find_all(
    params: PromoLinkFindAllParams,
    credentials: &PromolinksCredentials,
) -> Result<PromoLinkFindAllRequest, ValidationError> {
    let mut violations = Violations::new();
    violations.at_least("pe_app_id", credentials.app_id, 1);
    violations.at_least("pe_link_id", params.pe_link_id, 1);
    if let Some(limit) = params.pe_limit {
        violations.at_least("pe_limit", limit, 1);
    }

    violations.finish(PromoLinkFindAllRequest {
        pe_client_id: credentials.client_id,
        pe_app_id: credentials.app_id,
        pe_link_id: params.pe_link_id,
        pe_limit: params.pe_limit,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn credentials() -> ShopeeCredentials {
        ShopeeCredentials {
            credential: "cred".to_string(),
            secret_key: "secret".to_string(),
            affiliate_endpoint: "https://open-api.affiliate.shopee.com.br/graphql".to_string(),
            affiliate_subids: "site".to_string(),
            affiliate_timeout: "7000".to_string(),
        }
    }

    fn defaults() -> ShopeeDefaults {
        ShopeeDefaults {
            sort_type: 2,
            page: 1,
            limit: 20,
        }
    }

    #[test]
    fn test_generate_link_merges_credentials() {
        let request = validate_generate_affiliate_link(
            GenerateAffiliateLinkParams {
                origin_url: "https://shopee.com.br/produto-i.123.456".to_string(),
            },
            &credentials(),
        )
        .unwrap();

        assert_eq!(request.origin_url, "https://shopee.com.br/produto-i.123.456");
        assert_eq!(request.credential, "cred");
        assert_eq!(request.affiliate_subids, "site");
        assert_eq!(request.affiliate_timeout, "7000");
    }

    #[test]
    fn test_generate_link_timeout_default() {
        let mut creds = credentials();
        creds.affiliate_timeout = String::new();

        let request = validate_generate_affiliate_link(
            GenerateAffiliateLinkParams {
                origin_url: "https://shp.ee/abc".to_string(),
            },
            &creds,
        )
        .unwrap();
        assert_eq!(request.affiliate_timeout, "5000");
    }

    #[test]
    fn test_generate_link_rejects_invalid_url() {
        let err = validate_generate_affiliate_link(
            GenerateAffiliateLinkParams {
                origin_url: "not-a-url".to_string(),
            },
            &credentials(),
        )
        .unwrap_err();

        assert_eq!(err.issues.len(), 1);
        assert!(err.has_field("originUrl"));
    }

    #[test]
    fn test_generate_link_reports_missing_credentials() {
        let mut creds = credentials();
        creds.secret_key = String::new();
        creds.affiliate_subids = String::new();

        let err = validate_generate_affiliate_link(
            GenerateAffiliateLinkParams {
                origin_url: "https://shopee.com.br/x".to_string(),
            },
            &creds,
        )
        .unwrap_err();

        assert!(err.has_field("secretKey"));
        assert!(err.has_field("affiliateSubids"));
        assert!(!err.has_field("originUrl"));
    }

    #[test]
    fn test_product_offers_defaults() {
        let request = validate_product_offers(
            ProductOffersQuery {
                keyword: Some("fone bluetooth".to_string()),
                ..Default::default()
            },
            &credentials(),
            &defaults(),
        )
        .unwrap();

        assert_eq!(request.sort_type, 2);
        assert_eq!(request.page, 1);
        assert_eq!(request.limit, 20);
        assert_eq!(request.affiliate_subids.as_deref(), Some("site"));
        assert_eq!(request.keyword.as_deref(), Some("fone bluetooth"));
    }

    #[test]
    fn test_product_offers_requires_a_criterion() {
        let err = validate_product_offers(
            ProductOffersQuery {
                keyword: Some("   ".to_string()),
                page: Some(2),
                ..Default::default()
            },
            &credentials(),
            &defaults(),
        )
        .unwrap_err();

        assert_eq!(err.issues.len(), 1);
        assert!(
            err.messages_for("keyword")
                .any(|m| m.starts_with("At least one search criterion"))
        );
    }

    #[test]
    fn test_product_offers_blank_criteria_count_as_absent() {
        let err = validate_product_offers(
            ProductOffersQuery {
                keyword: Some(String::new()),
                shop_id: Some("   ".to_string()),
                ..Default::default()
            },
            &credentials(),
            &defaults(),
        )
        .unwrap_err();
        assert_eq!(err.messages_for("keyword").count(), 1);

        let request = validate_product_offers(
            ProductOffersQuery {
                keyword: Some(" ".to_string()),
                item_id: Some("22".to_string()),
                ..Default::default()
            },
            &credentials(),
            &defaults(),
        )
        .unwrap();
        assert_eq!(request.keyword, None);
        assert_eq!(request.item_id.as_deref(), Some("22"));
    }

    #[test]
    fn test_product_offers_accepts_category_only() {
        let request = validate_product_offers(
            ProductOffersQuery {
                product_cat_id: Some(100_636),
                ..Default::default()
            },
            &credentials(),
            &defaults(),
        )
        .unwrap();
        assert_eq!(request.product_cat_id, Some(100_636));
    }

    #[test]
    fn test_product_offers_range_checks() {
        let err = validate_product_offers(
            ProductOffersQuery {
                item_id: Some("18699601619".to_string()),
                page: Some(0),
                limit: Some(51),
                sort_type: Some(9),
                list_type: Some(5),
                ..Default::default()
            },
            &credentials(),
            &defaults(),
        )
        .unwrap_err();

        for field in ["page", "limit", "sortType", "listType"] {
            assert!(err.has_field(field), "missing issue for {}", field);
        }
    }

    #[test]
    fn test_shopee_offers_sort_type_is_restricted() {
        let err = validate_shopee_offers(
            ShopeeOffersQuery {
                sort_type: Some(3),
                ..Default::default()
            },
            &credentials(),
            &defaults(),
        )
        .unwrap_err();
        assert!(err.has_field("sortType"));

        let request = validate_shopee_offers(
            ShopeeOffersQuery::default(),
            &credentials(),
            &defaults(),
        )
        .unwrap();
        assert_eq!(request.sort_type, 2);
        assert_eq!(request.limit, 20);
        assert_eq!(request.affiliate_timeout.as_deref(), Some("7000"));
    }

    #[test]
    fn test_link_generation_find_all() {
        let creds = PromolinksCredentials {
            client_id: 12,
            app_id: 34,
        };

        let request = validate_link_generation_find_all(
            LinkGenerationFindAllParams { pe_limit: Some(5) },
            &creds,
        )
        .unwrap();
        assert_eq!(
            request,
            LinkGenerationFindAllRequest {
                pe_client_id: 12,
                pe_app_id: 34,
                pe_limit: Some(5),
            }
        );

        let err = validate_link_generation_find_all(
            LinkGenerationFindAllParams { pe_limit: Some(0) },
            &creds,
        )
        .unwrap_err();
        assert!(err.has_field("pe_limit"));
    }

    #[test]
    fn test_promo_link_requires_link_id() {
        let creds = PromolinksCredentials {
            client_id: 12,
            app_id: 0,
        };

        let err = validate_promo_link_find_all(
            PromoLinkFindAllParams {
                pe_link_id: 0,
                pe_limit: None,
            },
            &creds,
        )
        .unwrap_err();
        assert!(err.has_field("pe_link_id"));
        assert!(err.has_field("pe_app_id"));
    }
}
