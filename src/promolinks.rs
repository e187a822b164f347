//! Façade over the Promolinks backend, which stores every generated link.

use crate::client::{self, ApiTransport};
use crate::config::AppConfig;
use crate::credential::PromolinksCredentials;
use crate::error::{ApiError, Service, codes};
use crate::schema::{self, LinkGenerationFindAllParams, PromoLinkFindAllParams};
use crate::types::{
    LinkGenerationFindAllResponse, LinkGenerationRecord, PROMOLINKS_SUCCESS_STATUS,
    PromoLinkFindAllResponse, PromoLinkRecord, PromolinksEnvelope,
};

pub mod endpoints {
    pub const LINK_GENERATION_FIND_ALL: &str = "/promolinks/v2/link-generation-find-all";
    pub const PROMO_LINK_FIND_ALL: &str = "/promolinks/v2/promo-link-find-all";
}

#[derive(Debug, Clone)]
pub struct PromolinksApi<T> {
    transport: T,
    credentials: PromolinksCredentials,
    api_key: String,
}

impl<T: ApiTransport> PromolinksApi<T> {
    pub fn new(transport: T, config: &AppConfig) -> Self {
        Self::with_credentials(transport, PromolinksCredentials::from(config), &config.api_key)
    }

    pub fn with_credentials(
        transport: T,
        credentials: PromolinksCredentials,
        api_key: impl Into<String>,
    ) -> Self {
        Self {
            transport,
            credentials,
            api_key: api_key.into(),
        }
    }

    /// List generated affiliate link records, most recent first.
    pub async fn link_generation_find_all(
        &self,
        params: LinkGenerationFindAllParams,
    ) -> Result<LinkGenerationFindAllResponse, ApiError> {
        client::execute(
            &self.transport,
            &self.api_key,
            Service::Promolinks,
            codes::PROMOLINKS_LINK_GENERATION_FIND_ALL,
            endpoints::LINK_GENERATION_FIND_ALL,
            schema::validate_link_generation_find_all(params, &self.credentials),
        )
        .await
    }

    /// List the promo link records of one link id.
    pub async fn promo_link_find_all(
        &self,
        params: PromoLinkFindAllParams,
    ) -> Result<PromoLinkFindAllResponse, ApiError> {
        client::execute(
            &self.transport,
            &self.api_key,
            Service::Promolinks,
            codes::PROMOLINKS_PROMO_LINK_FIND_ALL,
            endpoints::PROMO_LINK_FIND_ALL,
            schema::validate_promo_link_find_all(params, &self.credentials),
        )
        .await
    }
}

pub fn extract_link_generation_records(
    response: &LinkGenerationFindAllResponse,
) -> &[LinkGenerationRecord] {
    response
        .data
        .as_ref()
        .and_then(|data| data.records.as_deref())
        .unwrap_or(&[])
}

pub fn extract_promo_link_records(response: &PromoLinkFindAllResponse) -> &[PromoLinkRecord] {
    response
        .data
        .as_ref()
        .and_then(|data| data.records.as_deref())
        .unwrap_or(&[])
}

/// True only when `statusCode` is exactly 100200.
pub fn is_success_response<D>(response: &PromolinksEnvelope<D>) -> bool {
    response.status_code == Some(PROMOLINKS_SUCCESS_STATUS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::testing::RecordingTransport;
    use crate::error::{ApiErrorKind, TransportError};
    use serde_json::json;

    fn api(transport: RecordingTransport) -> PromolinksApi<RecordingTransport> {
        PromolinksApi::with_credentials(
            transport,
            PromolinksCredentials {
                client_id: 12,
                app_id: 34,
            },
            "key-123",
        )
    }

    fn record(id: i64) -> serde_json::Value {
        json!({
            "ID": id,
            "CREATEDAT": "2025-01-10T12:00:00Z",
            "AFFILIATE_LINK": format!("https://s.shopee.com.br/{id}"),
            "PRODUCT_NAME": "Fone Bluetooth",
        })
    }

    #[tokio::test]
    async fn test_link_generation_find_all_end_to_end() {
        let transport = RecordingTransport::new().respond(json!({
            "statusCode": 100200,
            "message": "OK",
            "recordId": 0,
            "data": { "Link generation find All": [record(1), record(2), record(3)] },
            "quantity": 3,
            "errorId": 0,
            "info1": ""
        }));
        let promolinks = api(transport.clone());

        let response = promolinks
            .link_generation_find_all(LinkGenerationFindAllParams { pe_limit: Some(5) })
            .await
            .unwrap();

        assert!(is_success_response(&response));
        let records = extract_link_generation_records(&response);
        assert_eq!(records.len(), 3);
        assert_eq!(records[2].affiliate_link, "https://s.shopee.com.br/3");

        let requests = transport.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].path, endpoints::LINK_GENERATION_FIND_ALL);
        assert_eq!(
            requests[0].body,
            json!({ "pe_client_id": 12, "pe_app_id": 34, "pe_limit": 5 })
        );
        assert_eq!(
            requests[0].headers,
            vec![("x-api-key", "key-123".to_string())]
        );
    }

    #[tokio::test]
    async fn test_validation_failure_sends_nothing() {
        let transport = RecordingTransport::new();
        let promolinks = api(transport.clone());

        let err = promolinks
            .promo_link_find_all(PromoLinkFindAllParams {
                pe_link_id: 0,
                pe_limit: None,
            })
            .await
            .unwrap_err();

        assert_eq!(err.kind, ApiErrorKind::Validation);
        assert_eq!(err.service, Service::Promolinks);
        assert_eq!(err.code.as_deref(), Some(codes::PROMOLINKS_PROMO_LINK_FIND_ALL));
        assert!(err.issues.iter().any(|i| i.field == "pe_link_id"));
        assert!(transport.requests().is_empty());
    }

    #[tokio::test]
    async fn test_transport_failure_is_wrapped() {
        let transport = RecordingTransport::new()
            .fail(|| TransportError::Network("connection refused".to_string()));
        let promolinks = api(transport);

        let err = promolinks
            .link_generation_find_all(LinkGenerationFindAllParams::default())
            .await
            .unwrap_err();

        assert_eq!(err.kind, ApiErrorKind::Unexpected);
        assert_eq!(
            err.code.as_deref(),
            Some(codes::PROMOLINKS_LINK_GENERATION_FIND_ALL)
        );
        assert!(err.message.contains("connection refused"));
    }

    #[tokio::test]
    async fn test_promo_link_records() {
        let transport = RecordingTransport::new().respond(json!({
            "statusCode": 100200,
            "data": { "Promo link find All": [{
                "ID": 1,
                "LINK1": "https://shp.ee/a",
                "LINK_NAME1": "Principal",
                "CREATEDAT": null
            }] }
        }));
        let promolinks = api(transport.clone());

        let response = promolinks
            .promo_link_find_all(PromoLinkFindAllParams {
                pe_link_id: 1,
                pe_limit: Some(10),
            })
            .await
            .unwrap();

        let records = extract_promo_link_records(&response);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].link_name1, "Principal");
        assert_eq!(records[0].createdat, None);
        assert_eq!(transport.requests()[0].body["pe_link_id"], 1);
    }

    #[test]
    fn test_extract_records_without_key() {
        let response: LinkGenerationFindAllResponse =
            serde_json::from_value(json!({ "statusCode": 100200, "data": {} })).unwrap();
        assert!(extract_link_generation_records(&response).is_empty());

        let response: LinkGenerationFindAllResponse =
            serde_json::from_value(json!({ "statusCode": 100200 })).unwrap();
        assert!(extract_link_generation_records(&response).is_empty());
    }

    #[test]
    fn test_success_sentinel_is_exact() {
        for (status, expected) in [
            (json!(100200), true),
            (json!(100201), false),
            (json!(200), false),
            (json!("100200"), false),
            (json!(null), false),
        ] {
            let response: LinkGenerationFindAllResponse =
                serde_json::from_value(json!({ "statusCode": status.clone() })).unwrap();
            assert_eq!(is_success_response(&response), expected, "status {}", status);
        }
    }
}
