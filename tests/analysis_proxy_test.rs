//! Analysis proxy tests against a mock analysis service

use serde_json::{json, Value};
use wallet_shield::{
    AnalysisProxy, AnalysisServiceClient, AnalyzeWalletRequest, ErrorCode, RiskRating,
};
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn proxy_for(server: &MockServer) -> AnalysisProxy {
    AnalysisProxy::new(AnalysisServiceClient::new(&server.uri(), None).unwrap())
}

fn low_risk_result() -> Value {
    json!({
        "wallet": "ABC123",
        "risk_rating": "LOW",
        "trust_score": 85,
        "detailed": {
            "token_forensics": {
                "Mint1": { "risk_score": 5, "is_verified": true }
            }
        }
    })
}

#[tokio::test]
async fn analyze_low_risk_wallet_end_to_end() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/analyze_wallet"))
        .and(body_json(json!({ "wallet": "ABC123" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(low_risk_result()))
        .expect(1)
        .mount(&server)
        .await;

    let proxy = proxy_for(&server);
    let result = proxy
        .analyze(&AnalyzeWalletRequest::new("ABC123"))
        .await
        .unwrap();

    assert_eq!(result.wallet, "ABC123");
    assert_eq!(result.risk_rating, RiskRating::Low);
    assert_eq!(result.trust_score, 85);
    assert_eq!(serde_json::to_value(&result).unwrap(), low_risk_result());
    let forensics = result.detailed.token_forensics.as_ref().unwrap();
    assert_eq!(forensics.len(), 1);
    assert_eq!(
        forensics["Mint1"],
        json!({ "risk_score": 5, "is_verified": true })
    );
    assert_eq!(result.high_risk_token_count(), 0);
}

#[tokio::test]
async fn missing_or_empty_wallet_issues_no_call() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(low_risk_result()))
        .expect(0)
        .mount(&server)
        .await;

    let proxy = proxy_for(&server);
    for request in [
        AnalyzeWalletRequest::default(),
        AnalyzeWalletRequest::new(""),
        AnalyzeWalletRequest::new("   "),
    ] {
        let err = proxy.analyze(&request).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationMissingWallet);
        assert_eq!(err.http_status(), 400);
        assert_eq!(err.message, "Wallet address is required");
    }

    server.verify().await;
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn outbound_request_defeats_caches() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/analyze_wallet"))
        .respond_with(ResponseTemplate::new(200).set_body_json(low_risk_result()))
        .mount(&server)
        .await;

    let proxy = proxy_for(&server);
    let mut request = AnalyzeWalletRequest::new("ABC123");
    request.timestamp = Some(json!("abc"));
    proxy.analyze(&request).await.unwrap();

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    let sent = &requests[0];

    let header = |name: &str| {
        sent.headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    };
    assert_eq!(
        header("cache-control").as_deref(),
        Some("no-cache, no-store, must-revalidate")
    );
    assert_eq!(header("pragma").as_deref(), Some("no-cache"));

    let buster = sent
        .url
        .query_pairs()
        .find(|(key, _)| key == "t")
        .map(|(_, value)| value.into_owned())
        .unwrap();
    let millis: i64 = buster.parse().unwrap();
    assert!(millis > 1_600_000_000_000);

    let body: Value = serde_json::from_slice(&sent.body).unwrap();
    assert_eq!(body, json!({ "wallet": "ABC123" }));
}

#[tokio::test]
async fn upstream_status_and_body_propagated() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/analyze_wallet"))
        .respond_with(ResponseTemplate::new(429).set_body_json(json!({
            "error": "Too many requests",
            "details": "Retry in 60 seconds"
        })))
        .mount(&server)
        .await;

    let err = proxy_for(&server)
        .analyze(&AnalyzeWalletRequest::new("ABC123"))
        .await
        .unwrap_err();

    assert_eq!(err.code, ErrorCode::UpstreamStatus);
    assert_eq!(err.http_status(), 429);
    assert_eq!(err.message, "Too many requests");
    assert_eq!(err.details.as_deref(), Some("Retry in 60 seconds"));
}

#[tokio::test]
async fn upstream_status_with_unreadable_body_uses_defaults() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/analyze_wallet"))
        .respond_with(ResponseTemplate::new(503).set_body_string("Service Unavailable"))
        .mount(&server)
        .await;

    let err = proxy_for(&server)
        .analyze(&AnalyzeWalletRequest::new("ABC123"))
        .await
        .unwrap_err();

    assert_eq!(err.http_status(), 503);
    assert_eq!(err.message, "Backend error");
    assert_eq!(err.details.as_deref(), Some("Unknown error occurred"));
}

#[tokio::test]
async fn success_with_invalid_json_is_bad_gateway() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/analyze_wallet"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let err = proxy_for(&server)
        .analyze(&AnalyzeWalletRequest::new("ABC123"))
        .await
        .unwrap_err();

    assert_eq!(err.code, ErrorCode::UpstreamMalformedBody);
    assert_eq!(err.http_status(), 502);
}

#[tokio::test]
async fn unreachable_service_is_internal_error() {
    let proxy = AnalysisProxy::new(AnalysisServiceClient::new("http://127.0.0.1:1", None).unwrap());

    let err = proxy
        .analyze(&AnalyzeWalletRequest::new("ABC123"))
        .await
        .unwrap_err();

    assert_eq!(err.http_status(), 500);
    assert_eq!(err.message, "Internal server error");
    assert!(err.details.is_some());
}

#[tokio::test]
async fn forensics_keys_normalized_before_return() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/analyze_wallet"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "wallet": "XYZ",
            "risk_rating": "HIGH",
            "trust_score": 20,
            "combined_summary": "High risk",
            "detailed": {
                "transaction_monitor": { "suspicious": true },
                "risk_advisor": { "score": 20, "risk_level": "HIGH" },
                "token_forensics": {
                    "{\"mint\":\"M1\",\"symbol\":\"FOO\",\"logo\":\"https://img/foo.png\"}":
                        { "symbol": "BAR", "risk_score": 90, "is_verified": false },
                    "{not valid": { "risk_score": 30 },
                    "M2": { "risk_score": 75, "is_verified": false }
                }
            }
        })))
        .mount(&server)
        .await;

    let (result, report) = proxy_for(&server)
        .analyze_with_report(&AnalyzeWalletRequest::new("XYZ"))
        .await
        .unwrap();

    let forensics = result.detailed.token_forensics.as_ref().unwrap();
    assert_eq!(forensics.len(), 3);
    assert_eq!(forensics["M1"]["symbol"], "FOO");
    assert_eq!(forensics["M1"]["logo"], "https://img/foo.png");
    assert_eq!(forensics["M1"]["risk_score"], 90);
    assert_eq!(forensics["{not valid"], json!({ "risk_score": 30 }));
    assert_eq!(report.rewritten, 1);
    assert_eq!(report.passed_through, 2);
    assert_eq!(result.high_risk_token_count(), 2);
    assert_eq!(result.extra["combined_summary"], "High risk");
}

#[tokio::test]
async fn wallet_activity_relayed_unmodified() {
    let server = MockServer::start().await;
    let activity = json!({
        "wallet": "ABC123",
        "transactions": [{ "signature": "sig1", "type": "TRANSFER" }],
        "summary": { "count": 1 }
    });
    Mock::given(method("GET"))
        .and(path("/api/wallet_activity/ABC123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(activity.clone()))
        .mount(&server)
        .await;

    let relayed = proxy_for(&server).wallet_activity("ABC123").await.unwrap();
    assert_eq!(relayed, activity);
}

#[tokio::test]
async fn wallet_activity_error_propagated() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/wallet_activity/ABC123"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({ "detail": "Not Found" })))
        .mount(&server)
        .await;

    let err = proxy_for(&server).wallet_activity("ABC123").await.unwrap_err();
    assert_eq!(err.http_status(), 404);
    assert_eq!(err.details.as_deref(), Some("Not Found"));
}

#[tokio::test]
async fn explain_relays_payload() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/explain"))
        .and(body_json(json!({ "wallet": "ABC123", "risk_rating": "LOW" })))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "explanation": "Looks fine." })),
        )
        .mount(&server)
        .await;

    let explanation = proxy_for(&server)
        .explain(&json!({ "wallet": "ABC123", "risk_rating": "LOW" }))
        .await
        .unwrap();
    assert_eq!(explanation["explanation"], "Looks fine.");
}
