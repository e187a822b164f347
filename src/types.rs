use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Status code the Promolinks service uses for a successful call.
pub const PROMOLINKS_SUCCESS_STATUS: i64 = 100200;

/// Product listing type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ListType {
    General = 1,
    Promotion = 2,
    FlashSale = 3,
    Voucher = 4,
}

impl ListType {
    pub const ALL: [u8; 4] = [1, 2, 3, 4];
}

/// Sort order for product offer searches
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum SortType {
    Relevance = 1,
    PriceAsc = 2,
    PriceDesc = 3,
    Latest = 4,
    Popular = 5,
    Sales = 6,
    CommissionDesc = 7,
    CommissionAsc = 8,
}

impl SortType {
    pub const ALL: [u8; 8] = [1, 2, 3, 4, 5, 6, 7, 8];
}

/// Sort order for campaign offer searches
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ShopeeOfferSortType {
    MostRecent = 1,
    HighestCommission = 2,
}

impl ShopeeOfferSortType {
    pub const ALL: [u8; 2] = [1, 2];
}

macro_rules! impl_wire_number {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for u8 {
                fn from(value: $ty) -> u8 {
                    value as u8
                }
            }

            impl fmt::Display for $ty {
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    write!(f, "{}", *self as u8)
                }
            }
        )*
    };
}

impl_wire_number!(ListType, SortType, ShopeeOfferSortType);

// Shopee requests

/// Validated body for the generate-affiliate-link endpoint
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateAffiliateLinkRequest {
    pub origin_url: String,
    pub credential: String,
    pub secret_key: String,
    pub affiliate_endpoint: String,
    pub affiliate_subids: String,
    pub affiliate_timeout: String,
}

/// Validated body for the get-product-offers endpoint
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductOffersRequest {
    pub credential: String,
    pub secret_key: String,
    pub affiliate_endpoint: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub affiliate_subids: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keyword: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shop_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub item_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product_cat_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub list_type: Option<u8>,
    pub sort_type: u8,
    pub page: u32,
    pub limit: u32,
    #[serde(rename = "isAMSOffer", skip_serializing_if = "Option::is_none")]
    pub is_ams_offer: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_key_seller: Option<bool>,
}

/// Validated body for the get-shopee-offers endpoint
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShopeeOffersRequest {
    pub credential: String,
    pub secret_key: String,
    pub affiliate_endpoint: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub affiliate_subids: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub affiliate_timeout: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keyword: Option<String>,
    pub sort_type: u8,
    pub page: u32,
    pub limit: u32,
}

// Shopee responses

/// Response from the generate-affiliate-link endpoint
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateAffiliateLinkResponse {
    pub affiliate_link: String,
}

/// Pagination block of the paginated Shopee responses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PageInfo {
    pub page: u32,
    pub limit: u32,
    pub has_next_page: bool,
}

impl Default for PageInfo {
    fn default() -> Self {
        Self {
            page: 1,
            limit: 10,
            has_next_page: false,
        }
    }
}

/// Paginated Shopee envelope, generic over its data block
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ShopeeEnvelope<D> {
    #[serde(default, deserialize_with = "exactly_true")]
    pub success: bool,
    pub data: Option<D>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductOffersData {
    #[serde(default)]
    pub products: Option<Vec<ShopeeProduct>>,
    #[serde(default)]
    pub page_info: Option<PageInfo>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShopeeOffersData {
    #[serde(default)]
    pub offers: Option<Vec<ShopeeOffer>>,
    #[serde(default)]
    pub page_info: Option<PageInfo>,
}

pub type ProductOffersResponse = ShopeeEnvelope<ProductOffersData>;
pub type ShopeeOffersResponse = ShopeeEnvelope<ShopeeOffersData>;

/// Access to the pagination block shared by both paginated responses.
pub trait Paginated {
    fn page_info(&self) -> Option<PageInfo>;
}

impl Paginated for ProductOffersData {
    fn page_info(&self) -> Option<PageInfo> {
        self.page_info
    }
}

impl Paginated for ShopeeOffersData {
    fn page_info(&self) -> Option<PageInfo> {
        self.page_info
    }
}

/// Product returned by the Shopee affiliate API
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ShopeeProduct {
    #[serde(deserialize_with = "null_as_default")]
    pub item_id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub product_name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub shop_name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub shop_id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub price_min: String,
    #[serde(deserialize_with = "null_as_default")]
    pub price_max: String,
    #[serde(deserialize_with = "null_as_default")]
    pub commission_rate: String,
    #[serde(deserialize_with = "null_as_default")]
    pub commission: String,
    #[serde(deserialize_with = "null_as_default")]
    pub sales: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub rating_star: String,
    #[serde(deserialize_with = "null_as_default")]
    pub image_url: String,
    #[serde(deserialize_with = "null_as_default")]
    pub product_link: String,
    #[serde(deserialize_with = "null_as_default")]
    pub offer_link: String,
    #[serde(deserialize_with = "null_as_default")]
    pub currency: String,
    #[serde(deserialize_with = "null_as_default")]
    pub discount_percent: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub original_price: String,
    #[serde(deserialize_with = "null_as_default")]
    pub category: String,
    #[serde(deserialize_with = "null_as_default")]
    pub category_id: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub brand_name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub is_official: bool,
    #[serde(deserialize_with = "null_as_default")]
    pub free_shipping: bool,
    #[serde(deserialize_with = "null_as_default")]
    pub location: String,
}

/// Campaign offer returned by the Shopee affiliate API
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ShopeeOffer {
    #[serde(deserialize_with = "null_as_default")]
    pub commission_rate: String,
    #[serde(deserialize_with = "null_as_default")]
    pub image_url: String,
    #[serde(deserialize_with = "null_as_default")]
    pub offer_link: String,
    #[serde(deserialize_with = "null_as_default")]
    pub original_link: String,
    #[serde(deserialize_with = "null_as_default")]
    pub offer_name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub offer_type: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub category_id: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub collection_id: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub period_start_time: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub period_end_time: i64,
}

// Promolinks requests

/// Validated body for the link-generation-find-all endpoint
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LinkGenerationFindAllRequest {
    pub pe_client_id: u64,
    pub pe_app_id: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pe_limit: Option<u32>,
}

/// Validated body for the promo-link-find-all endpoint
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PromoLinkFindAllRequest {
    pub pe_client_id: u64,
    pub pe_app_id: u64,
    pub pe_link_id: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pe_limit: Option<u32>,
}

// Promolinks responses

/// Promolinks envelope, generic over its data block
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PromolinksEnvelope<D> {
    #[serde(default, deserialize_with = "integer_only")]
    pub status_code: Option<i64>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub message: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub record_id: i64,
    pub data: Option<D>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub quantity: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub error_id: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub info1: String,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct LinkGenerationData {
    #[serde(rename = "Link generation find All", default)]
    pub records: Option<Vec<LinkGenerationRecord>>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct PromoLinkData {
    #[serde(rename = "Promo link find All", default)]
    pub records: Option<Vec<PromoLinkRecord>>,
}

pub type LinkGenerationFindAllResponse = PromolinksEnvelope<LinkGenerationData>;
pub type PromoLinkFindAllResponse = PromolinksEnvelope<PromoLinkData>;

/// One generated affiliate link as stored upstream
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE", default)]
pub struct LinkGenerationRecord {
    #[serde(deserialize_with = "null_as_default")]
    pub createdat: String,
    #[serde(deserialize_with = "null_as_default")]
    pub id: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub link_destination: String,
    #[serde(deserialize_with = "null_as_default")]
    pub affiliate_link: String,
    /// 0 or 1
    #[serde(deserialize_with = "null_as_default")]
    pub flag_click: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub item_id: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub product_name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub shop_name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub shop_id: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub price_min: String,
    #[serde(deserialize_with = "null_as_default")]
    pub price_max: String,
    #[serde(deserialize_with = "null_as_default")]
    pub commission_rate: String,
    #[serde(deserialize_with = "null_as_default")]
    pub commission: String,
    #[serde(deserialize_with = "null_as_default")]
    pub sales: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub rating_star: String,
    #[serde(deserialize_with = "null_as_default")]
    pub image_url: String,
    #[serde(deserialize_with = "null_as_default")]
    pub product_link: String,
    #[serde(deserialize_with = "null_as_default")]
    pub offer_link: String,
    #[serde(deserialize_with = "null_as_default")]
    pub currency: String,
    #[serde(deserialize_with = "null_as_default")]
    pub discount_percent: String,
    #[serde(deserialize_with = "null_as_default")]
    pub original_price: String,
    #[serde(deserialize_with = "null_as_default")]
    pub category: String,
    #[serde(deserialize_with = "null_as_default")]
    pub category_id: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub brand_name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub is_official: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub free_shipping: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub location: String,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct PromoLinkRecord {
    #[serde(rename = "ID", deserialize_with = "null_as_default")]
    pub id: i64,
    #[serde(rename = "LINK1", deserialize_with = "null_as_default")]
    pub link1: String,
    #[serde(rename = "LINK2", deserialize_with = "null_as_default")]
    pub link2: String,
    #[serde(rename = "LINK3", deserialize_with = "null_as_default")]
    pub link3: String,
    #[serde(rename = "LINK_NAME1", deserialize_with = "null_as_default")]
    pub link_name1: String,
    #[serde(rename = "LINK_NAME2", deserialize_with = "null_as_default")]
    pub link_name2: String,
    #[serde(rename = "LINK_NAME3", deserialize_with = "null_as_default")]
    pub link_name3: String,
    #[serde(rename = "SECRET_KEY1", deserialize_with = "null_as_default")]
    pub secret_key1: String,
    #[serde(rename = "SECRET_KEY2", deserialize_with = "null_as_default")]
    pub secret_key2: String,
    #[serde(rename = "SECRET_KEY3", deserialize_with = "null_as_default")]
    pub secret_key3: String,
    #[serde(rename = "NOTES", deserialize_with = "null_as_default")]
    pub notes: String,
    #[serde(rename = "CREATEDAT")]
    pub createdat: Option<String>,
    #[serde(rename = "UPDATEDAT")]
    pub updatedat: Option<String>,
}

/// `true` only for a JSON `true`; any other value reads as `false`.
fn exactly_true<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(matches!(value, serde_json::Value::Bool(true)))
}

/// Reads a JSON `null` as the type's default, like a missing key.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

/// Keeps JSON integers; strings, floats and nulls read as `None`.
fn integer_only<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(value.as_i64())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_link_generation_record_field_names() {
        let record: LinkGenerationRecord = serde_json::from_value(json!({
            "CREATEDAT": "2025-01-10T12:00:00Z",
            "ID": 7,
            "LINK_DESTINATION": "https://shopee.com.br/item-i.1.2",
            "AFFILIATE_LINK": "https://s.shopee.com.br/abc",
            "FLAG_CLICK": 1,
            "PRODUCT_NAME": "Fone Bluetooth",
            "IS_OFFICIAL": 0
        }))
        .unwrap();

        assert_eq!(record.id, 7);
        assert_eq!(record.affiliate_link, "https://s.shopee.com.br/abc");
        assert_eq!(record.flag_click, 1);
        assert_eq!(record.product_name, "Fone Bluetooth");
        assert_eq!(record.shop_name, "");
    }

    #[test]
    fn test_null_fields_read_as_defaults() {
        let envelope: LinkGenerationFindAllResponse = serde_json::from_value(json!({
            "statusCode": 100200,
            "message": null,
            "info1": null,
            "quantity": null,
            "data": { "Link generation find All": [{
                "ID": 3,
                "AFFILIATE_LINK": "https://s.shopee.com.br/abc",
                "BRAND_NAME": null,
                "SALES": null
            }] }
        }))
        .unwrap();

        assert_eq!(envelope.status_code, Some(PROMOLINKS_SUCCESS_STATUS));
        assert_eq!(envelope.info1, "");
        assert_eq!(envelope.quantity, 0);
        let records = envelope.data.unwrap().records.unwrap();
        assert_eq!(records[0].id, 3);
        assert_eq!(records[0].brand_name, "");
        assert_eq!(records[0].sales, 0);

        let product: ShopeeProduct = serde_json::from_value(json!({
            "itemId": "1",
            "shopName": null,
            "isOfficial": null,
            "discountPercent": null
        }))
        .unwrap();
        assert_eq!(product.shop_name, "");
        assert!(!product.is_official);

        let offer: ShopeeOffer =
            serde_json::from_value(json!({ "offerName": "Frete", "collectionId": null })).unwrap();
        assert_eq!(offer.collection_id, 0);

        let promo: PromoLinkRecord =
            serde_json::from_value(json!({ "ID": 1, "NOTES": null, "CREATEDAT": null })).unwrap();
        assert_eq!(promo.notes, "");
        assert_eq!(promo.createdat, None);
    }

    #[test]
    fn test_promolinks_status_code_is_integer_only() {
        let envelope: LinkGenerationFindAllResponse =
            serde_json::from_value(json!({ "statusCode": "100200" })).unwrap();
        assert_eq!(envelope.status_code, None);

        let envelope: LinkGenerationFindAllResponse =
            serde_json::from_value(json!({ "statusCode": 100200 })).unwrap();
        assert_eq!(envelope.status_code, Some(PROMOLINKS_SUCCESS_STATUS));
    }

    #[test]
    fn test_shopee_success_requires_boolean() {
        let envelope: ProductOffersResponse =
            serde_json::from_value(json!({ "success": "true" })).unwrap();
        assert!(!envelope.success);

        let envelope: ProductOffersResponse =
            serde_json::from_value(json!({ "success": true })).unwrap();
        assert!(envelope.success);
    }

    #[test]
    fn test_product_offers_request_wire_names() {
        let request = ProductOffersRequest {
            credential: "cred".to_string(),
            secret_key: "secret".to_string(),
            affiliate_endpoint: "https://open-api.affiliate.shopee.com.br/graphql".to_string(),
            affiliate_subids: None,
            keyword: Some("fone".to_string()),
            shop_id: None,
            item_id: None,
            product_cat_id: None,
            list_type: None,
            sort_type: 1,
            page: 1,
            limit: 10,
            is_ams_offer: Some(true),
            is_key_seller: None,
        };

        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["secretKey"], "secret");
        assert_eq!(value["isAMSOffer"], true);
        assert_eq!(value["sortType"], 1);
        assert!(value.get("shopId").is_none());
    }

    #[test]
    fn test_enum_wire_values() {
        assert_eq!(u8::from(SortType::CommissionAsc), 8);
        assert_eq!(u8::from(ListType::Voucher), 4);
        assert_eq!(ShopeeOfferSortType::HighestCommission.to_string(), "2");
    }
}
