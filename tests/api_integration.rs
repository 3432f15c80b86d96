//! Integration tests for the MMPay API client against a mock HTTP server.

use std::time::Duration;

use mmpay::api::MmPayClient;
use mmpay::auth::verify_signature;
use mmpay::config::ClientConfig;
use mmpay::error::MmPayError;
use mmpay::types::{PayParams, PaymentItem};
use serde_json::{json, Value};
use wiremock::matchers::{body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, Request, ResponseTemplate};

const SECRET_KEY: &str = "test_secret_key";

fn client_for(server: &MockServer) -> MmPayClient {
    let config = ClientConfig::new("test_app_id", "test_pub_key", SECRET_KEY, server.uri());
    MmPayClient::new(config).unwrap()
}

fn sample_params() -> PayParams {
    PayParams::new("ORD-123", 1000, vec![PaymentItem::new("Item 1", 1000, 1)])
}

fn header_str<'a>(req: &'a Request, name: &str) -> Option<&'a str> {
    req.headers.get(name).and_then(|v| v.to_str().ok())
}

fn body_str(req: &Request) -> &str {
    std::str::from_utf8(&req.body).unwrap()
}

async fn mount_json(server: &MockServer, route: &str, body: Value) {
    Mock::given(method("POST"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .expect(1)
        .mount(server)
        .await;
}

// =============================================================================
// Payment flow
// =============================================================================

mod pay_flow {
    use super::*;

    #[tokio::test]
    async fn test_sandbox_pay_flow() {
        let server = MockServer::start().await;
        mount_json(
            &server,
            "/payments/sandbox-handshake",
            json!({ "token": "mock_btoken" }),
        )
        .await;
        Mock::given(method("POST"))
            .and(path("/payments/sandbox-create"))
            .and(header("X-Mmpay-Btoken", "mock_btoken"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({ "url": "https://pay.com", "status": "PENDING" })),
            )
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server);
        let result = client.sandbox_pay(sample_params()).await.unwrap();

        assert_eq!(result.get_str("status"), Some("PENDING"));
        assert_eq!(result.get_str("url"), Some("https://pay.com"));
        assert_eq!(
            Value::Object(result.into_map()),
            json!({ "url": "https://pay.com", "status": "PENDING" })
        );

        let requests = server.received_requests().await.unwrap();
        assert_eq!(requests.len(), 2);

        let payment = &requests[1];
        assert_eq!(payment.url.path(), "/payments/sandbox-create");
        assert_eq!(header_str(payment, "X-Mmpay-Btoken"), Some("mock_btoken"));
        assert_eq!(header_str(payment, "Authorization"), Some("Bearer test_pub_key"));
        assert_eq!(header_str(payment, "Content-Type"), Some("application/json"));
    }

    #[tokio::test]
    async fn test_payment_body_and_signature() {
        let server = MockServer::start().await;
        mount_json(
            &server,
            "/payments/sandbox-handshake",
            json!({ "token": "tok" }),
        )
        .await;
        mount_json(&server, "/payments/sandbox-create", json!({})).await;

        let client = client_for(&server);
        client
            .sandbox_pay(sample_params().with_callback_url("https://shop.example/cb"))
            .await
            .unwrap();

        let requests = server.received_requests().await.unwrap();
        let payment = &requests[1];
        let body = body_str(payment);
        let nonce = header_str(payment, "X-Mmpay-Nonce").unwrap();
        let signature = header_str(payment, "X-Mmpay-Signature").unwrap();

        // Body is the canonical payload, with the header nonce embedded
        let expected = format!(
            r#"{{"appId":"test_app_id","nonce":"{}","amount":1000,"orderId":"ORD-123","items":[{{"name":"Item 1","amount":1000,"quantity":1}}],"callbackUrl":"https://shop.example/cb"}}"#,
            nonce
        );
        assert_eq!(body, expected);

        // Signature covers the exact bytes sent
        assert!(verify_signature(SECRET_KEY.as_bytes(), body, nonce, signature));
    }

    #[tokio::test]
    async fn test_handshake_precedes_payment_with_payment_nonce() {
        let server = MockServer::start().await;
        mount_json(
            &server,
            "/payments/sandbox-handshake",
            json!({ "token": "tok" }),
        )
        .await;
        mount_json(&server, "/payments/sandbox-create", json!({})).await;

        let client = client_for(&server);
        client.sandbox_pay(sample_params()).await.unwrap();

        let requests = server.received_requests().await.unwrap();
        let handshake = &requests[0];
        let payment = &requests[1];
        assert_eq!(handshake.url.path(), "/payments/sandbox-handshake");

        let payment_body: Value = serde_json::from_slice(&payment.body).unwrap();
        let payment_nonce = payment_body["nonce"].as_str().unwrap();
        assert_eq!(
            body_str(handshake),
            format!(r#"{{"orderId":"ORD-123","nonce":"{}"}}"#, payment_nonce)
        );

        // The handshake is signed on its own
        let hs_nonce = header_str(handshake, "X-Mmpay-Nonce").unwrap();
        let hs_sig = header_str(handshake, "X-Mmpay-Signature").unwrap();
        assert!(verify_signature(
            SECRET_KEY.as_bytes(),
            body_str(handshake),
            hs_nonce,
            hs_sig
        ));
        assert!(header_str(handshake, "X-Mmpay-Btoken").is_none());
        assert_eq!(header_str(handshake, "Authorization"), Some("Bearer test_pub_key"));
    }

    #[tokio::test]
    async fn test_production_pay_uses_production_endpoints() {
        let server = MockServer::start().await;
        mount_json(&server, "/payments/handshake", json!({ "token": "prod_tok" })).await;
        Mock::given(method("POST"))
            .and(path("/payments/create"))
            .and(header("X-Mmpay-Btoken", "prod_tok"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "status": "PENDING" })))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server);
        let result = client
            .pay(sample_params().with_currency("MMK"))
            .await
            .unwrap();
        assert_eq!(result.get_str("status"), Some("PENDING"));

        let requests = server.received_requests().await.unwrap();
        let payment_body: Value = serde_json::from_slice(&requests[1].body).unwrap();
        assert_eq!(payment_body["currency"], "MMK");
    }

    #[tokio::test]
    async fn test_missing_token_omits_btoken_header() {
        let server = MockServer::start().await;
        mount_json(
            &server,
            "/payments/sandbox-handshake",
            json!({ "status": "ok" }),
        )
        .await;
        mount_json(&server, "/payments/sandbox-create", json!({ "status": "PENDING" })).await;

        let client = client_for(&server);
        let result = client.sandbox_pay(sample_params()).await.unwrap();
        assert_eq!(result.get_str("status"), Some("PENDING"));

        let requests = server.received_requests().await.unwrap();
        assert!(header_str(&requests[1], "X-Mmpay-Btoken").is_none());
    }

    #[tokio::test]
    async fn test_concurrent_payments_keep_their_own_tokens() {
        let server = MockServer::start().await;
        for order in ["ORD-A", "ORD-B"] {
            Mock::given(method("POST"))
                .and(path("/payments/sandbox-handshake"))
                .and(body_string_contains(order))
                .respond_with(
                    ResponseTemplate::new(200)
                        .set_body_json(json!({ "token": format!("token-{}", order) }))
                        .set_delay(Duration::from_millis(if order == "ORD-A" { 150 } else { 0 })),
                )
                .mount(&server)
                .await;
        }
        Mock::given(method("POST"))
            .and(path("/payments/sandbox-create"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let item = || vec![PaymentItem::new("Item", 10, 1)];
        let (a, b) = tokio::join!(
            client.sandbox_pay(PayParams::new("ORD-A", 10, item())),
            client.sandbox_pay(PayParams::new("ORD-B", 10, item())),
        );
        a.unwrap();
        b.unwrap();

        let requests = server.received_requests().await.unwrap();
        let creates: Vec<&Request> = requests
            .iter()
            .filter(|r| r.url.path() == "/payments/sandbox-create")
            .collect();
        assert_eq!(creates.len(), 2);

        for req in creates {
            let body: Value = serde_json::from_slice(&req.body).unwrap();
            let order = body["orderId"].as_str().unwrap();
            assert_eq!(
                header_str(req, "X-Mmpay-Btoken"),
                Some(format!("token-{}", order).as_str())
            );
        }
    }
}

// =============================================================================
// Handshake
// =============================================================================

mod handshake {
    use super::*;

    #[tokio::test]
    async fn test_handshake_returns_full_response() {
        let server = MockServer::start().await;
        mount_json(
            &server,
            "/payments/handshake",
            json!({ "token": "abc", "expiresIn": 300 }),
        )
        .await;

        let client = client_for(&server);
        let resp = client
            .handshake(&json!({ "orderId": "ORD-9", "nonce": "1" }))
            .await
            .unwrap();

        assert_eq!(resp.token(), Some("abc"));
        assert_eq!(resp.get("expiresIn"), Some(&json!(300)));

        let requests = server.received_requests().await.unwrap();
        assert_eq!(body_str(&requests[0]), r#"{"orderId":"ORD-9","nonce":"1"}"#);
    }

    #[tokio::test]
    async fn test_sandbox_handshake_without_token() {
        let server = MockServer::start().await;
        mount_json(
            &server,
            "/payments/sandbox-handshake",
            json!({ "status": "ok" }),
        )
        .await;

        let client = client_for(&server);
        let resp = client
            .sandbox_handshake(&json!({ "orderId": "ORD-9" }))
            .await
            .unwrap();
        assert_eq!(resp.token(), None);
        assert_eq!(resp.get("status"), Some(&json!("ok")));
    }

    #[tokio::test]
    async fn test_trailing_slash_base_url() {
        let server = MockServer::start().await;
        mount_json(&server, "/payments/handshake", json!({ "token": "t" })).await;

        let config = ClientConfig::new(
            "test_app_id",
            "test_pub_key",
            SECRET_KEY,
            format!("{}/", server.uri()),
        );
        let client = MmPayClient::new(config).unwrap();
        client.handshake(&json!({})).await.unwrap();
    }
}

// =============================================================================
// Errors
// =============================================================================

mod errors {
    use super::*;

    #[tokio::test]
    async fn test_handshake_failure_aborts_payment() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/payments/sandbox-handshake"))
            .respond_with(ResponseTemplate::new(500).set_body_string("internal"))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/payments/sandbox-create"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
            .expect(0)
            .mount(&server)
            .await;

        let client = client_for(&server);
        let err = client.sandbox_pay(sample_params()).await.unwrap_err();
        assert!(matches!(err, MmPayError::ServerError(ref r) if r.get_message() == "internal"));
    }

    #[tokio::test]
    async fn test_invalid_params_fail_before_network() {
        let server = MockServer::start().await;
        let client = client_for(&server);

        let err = client
            .sandbox_pay(PayParams::new("ORD-1", 1000, vec![]))
            .await
            .unwrap_err();
        assert!(matches!(err, MmPayError::InvalidParameter(_)));

        let err = client
            .pay(PayParams::new("", 1000, vec![PaymentItem::new("A", 1, 1)]))
            .await
            .unwrap_err();
        assert!(matches!(err, MmPayError::InvalidParameter(_)));

        assert!(server.received_requests().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_unauthorized_maps_error_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/payments/handshake"))
            .respond_with(
                ResponseTemplate::new(401).set_body_json(json!({ "message": "invalid key" })),
            )
            .mount(&server)
            .await;

        let client = client_for(&server);
        let err = client.handshake(&json!({})).await.unwrap_err();
        match err {
            MmPayError::Unauthorized(resp) => assert_eq!(resp.get_message(), "invalid key"),
            other => panic!("expected Unauthorized, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_malformed_success_body_is_decode_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/payments/handshake"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>ok</html>"))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let err = client.handshake(&json!({})).await.unwrap_err();
        assert!(matches!(err, MmPayError::Decode(_)));
    }

    #[tokio::test]
    async fn test_payment_error_status() {
        let server = MockServer::start().await;
        mount_json(
            &server,
            "/payments/sandbox-handshake",
            json!({ "token": "tok" }),
        )
        .await;
        Mock::given(method("POST"))
            .and(path("/payments/sandbox-create"))
            .respond_with(
                ResponseTemplate::new(400).set_body_json(json!({ "error": "amount mismatch" })),
            )
            .mount(&server)
            .await;

        let client = client_for(&server);
        let err = client.sandbox_pay(sample_params()).await.unwrap_err();
        assert!(matches!(err, MmPayError::BadRequest(ref r) if r.get_message() == "amount mismatch"));
    }

    #[tokio::test]
    async fn test_timeout_is_transport_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/payments/handshake"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({ "token": "late" }))
                    .set_delay(Duration::from_millis(500)),
            )
            .mount(&server)
            .await;

        let config = ClientConfig::new("test_app_id", "test_pub_key", SECRET_KEY, server.uri());
        let client = MmPayClient::builder(config)
            .timeout(Duration::from_millis(100))
            .build()
            .unwrap();

        let err = client.handshake(&json!({})).await.unwrap_err();
        assert!(matches!(err, MmPayError::Http(ref e) if e.is_timeout()));
    }

    #[tokio::test]
    async fn test_connection_refused_is_transport_error() {
        let config = ClientConfig::new("test_app_id", "test_pub_key", SECRET_KEY, "http://127.0.0.1:1");
        let client = MmPayClient::new(config).unwrap();

        let err = client.sandbox_pay(sample_params()).await.unwrap_err();
        assert!(matches!(err, MmPayError::Http(_)));
    }
}
