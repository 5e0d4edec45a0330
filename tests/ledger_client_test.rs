//! Ledger RPC client tests against a mock JSON-RPC endpoint

use serde_json::{json, Value};
use wallet_shield::{LedgerClient, RpcProvider};
use wiremock::matchers::{body_partial_json, method};
use wiremock::{Mock, MockServer, ResponseTemplate};

const WALLET: &str = "ABC123";

fn client_for(server: &MockServer) -> LedgerClient {
    LedgerClient::new(RpcProvider::new(server.uri(), None).unwrap())
}

fn rpc_result(id: &str, result: Value) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "jsonrpc": "2.0",
        "id": id,
        "result": result
    }))
}

fn token_account(mint: &str, amount: &str, decimals: u8, ui_amount: Value, ui_string: &str) -> Value {
    json!({
        "pubkey": format!("{}-account", mint),
        "account": {
            "data": {
                "parsed": {
                    "info": {
                        "mint": mint,
                        "owner": WALLET,
                        "tokenAmount": {
                            "amount": amount,
                            "decimals": decimals,
                            "uiAmount": ui_amount,
                            "uiAmountString": ui_string
                        }
                    },
                    "type": "account"
                },
                "program": "spl-token",
                "space": 165
            },
            "executable": false,
            "lamports": 2039280,
            "owner": "TokenkegQfeZyiNwAJbNbGKPFXCWuBvf9Ss623VQ5DA"
        }
    })
}

async fn mount(server: &MockServer, rpc_method: &str, response: ResponseTemplate) {
    Mock::given(method("POST"))
        .and(body_partial_json(json!({ "method": rpc_method })))
        .respond_with(response)
        .mount(server)
        .await;
}

async fn sent_bodies(server: &MockServer) -> Vec<Value> {
    server
        .received_requests()
        .await
        .unwrap()
        .iter()
        .map(|req| serde_json::from_slice(&req.body).unwrap())
        .collect()
}

#[tokio::test]
async fn token_balances_skip_zero_holdings() {
    let server = MockServer::start().await;
    mount(
        &server,
        "getTokenAccountsByOwner",
        rpc_result(
            "getTokenAccountsByOwner",
            json!({
                "context": { "slot": 250000000 },
                "value": [
                    token_account("Mint1", "2500000", 6, json!(2.5), "2.5"),
                    token_account("Mint0", "0", 9, json!(0.0), "0"),
                    token_account("Mint2", "1", 0, json!(1.0), "1")
                ]
            }),
        ),
    )
    .await;

    let tokens = client_for(&server).fetch_token_balances(WALLET).await;

    assert_eq!(tokens.len(), 2);
    assert_eq!(tokens[0].mint, "Mint1");
    assert_eq!(tokens[0].amount, "2500000");
    assert_eq!(tokens[0].decimals, 6);
    assert_eq!(tokens[0].token_account, "Mint1-account");
    let meta = tokens[0].token_metadata.as_ref().unwrap();
    assert_eq!(meta.symbol, "TOKEN");
    assert_eq!(meta.name, "2.5");
    assert!(tokens.iter().all(|t| t.mint != "Mint0"));

    let bodies = sent_bodies(&server).await;
    assert_eq!(bodies.len(), 1);
    let params = &bodies[0]["params"];
    assert_eq!(params[0], WALLET);
    assert_eq!(
        params[1]["programId"],
        "TokenkegQfeZyiNwAJbNbGKPFXCWuBvf9Ss623VQ5DA"
    );
    assert_eq!(params[2]["encoding"], "jsonParsed");
    assert_eq!(params[2]["commitment"], "confirmed");
}

#[tokio::test]
async fn token_balances_empty_on_rpc_error() {
    let server = MockServer::start().await;
    mount(
        &server,
        "getTokenAccountsByOwner",
        ResponseTemplate::new(200).set_body_json(json!({
            "jsonrpc": "2.0",
            "id": "getTokenAccountsByOwner",
            "error": { "code": -32602, "message": "Invalid param: WrongSize" }
        })),
    )
    .await;

    let tokens = client_for(&server).fetch_token_balances(WALLET).await;
    assert!(tokens.is_empty());
}

#[tokio::test]
async fn transactions_mapped_in_provider_order() {
    let server = MockServer::start().await;
    mount(
        &server,
        "getSignaturesForAddress",
        rpc_result(
            "getSignaturesForAddress",
            json!([
                {
                    "signature": "sigNewest",
                    "slot": 300,
                    "err": null,
                    "memo": null,
                    "blockTime": 1700000000,
                    "confirmationStatus": "finalized"
                },
                {
                    "signature": "sigPending",
                    "slot": 299,
                    "err": null,
                    "memo": null,
                    "blockTime": null,
                    "confirmationStatus": "processed"
                },
                {
                    "signature": "sigOldest",
                    "slot": 298,
                    "err": null,
                    "memo": null,
                    "blockTime": 1699999990,
                    "confirmationStatus": null
                }
            ]),
        ),
    )
    .await;

    let txs = client_for(&server).fetch_transactions(WALLET, 3).await;

    assert_eq!(txs.len(), 2);
    assert_eq!(txs[0].signature, "sigNewest");
    assert_eq!(txs[0].timestamp, "2023-11-14T22:13:20.000Z");
    assert_eq!(txs[0].status, "finalized");
    assert_eq!(txs[0].tx_type, "Unknown");
    assert_eq!(txs[0].fee, 0.0);
    assert_eq!(txs[1].signature, "sigOldest");
    assert_eq!(txs[1].status, "confirmed");

    let bodies = sent_bodies(&server).await;
    assert_eq!(bodies[0]["params"], json!([WALLET, { "limit": 3 }]));
}

#[tokio::test]
async fn recent_transactions_use_default_limit() {
    let server = MockServer::start().await;
    mount(
        &server,
        "getSignaturesForAddress",
        rpc_result("getSignaturesForAddress", json!([])),
    )
    .await;

    let txs = client_for(&server).fetch_recent_transactions(WALLET).await;
    assert!(txs.is_empty());

    let bodies = sent_bodies(&server).await;
    assert_eq!(bodies[0]["params"][1]["limit"], 10);
}

#[tokio::test]
async fn native_balance_converted_to_sol() {
    let server = MockServer::start().await;
    mount(
        &server,
        "getBalance",
        rpc_result(
            "getBalance",
            json!({ "context": { "slot": 1 }, "value": 1_500_000_000u64 }),
        ),
    )
    .await;

    let balance = client_for(&server).fetch_native_balance(WALLET).await;
    assert_eq!(balance, 1.5);
}

#[tokio::test]
async fn native_balance_zero_on_http_error() {
    let server = MockServer::start().await;
    mount(&server, "getBalance", ResponseTemplate::new(500)).await;

    let balance = client_for(&server).fetch_native_balance(WALLET).await;
    assert_eq!(balance, 0.0);
}

#[tokio::test]
async fn empty_account_makes_no_call() {
    let server = MockServer::start().await;
    let client = client_for(&server);

    assert!(client.fetch_token_balances("  ").await.is_empty());
    assert!(client.fetch_transactions("", 5).await.is_empty());
    assert_eq!(client.fetch_native_balance("").await, 0.0);
    assert!(sent_bodies(&server).await.is_empty());
}

#[tokio::test]
async fn unreachable_provider_degrades_to_empty() {
    let client = LedgerClient::new(RpcProvider::new("http://127.0.0.1:1", None).unwrap());

    let overview = client.fetch_overview(WALLET, 5).await;
    assert_eq!(overview.wallet, WALLET);
    assert_eq!(overview.native_balance, 0.0);
    assert_eq!(overview.token_count, 0);
    assert!(overview.tokens.is_empty());
    assert!(overview.transactions.is_empty());
}

#[tokio::test]
async fn overview_combines_all_reads() {
    let server = MockServer::start().await;
    mount(
        &server,
        "getBalance",
        rpc_result("getBalance", json!({ "context": { "slot": 1 }, "value": 250_000_000u64 })),
    )
    .await;
    mount(
        &server,
        "getTokenAccountsByOwner",
        rpc_result(
            "getTokenAccountsByOwner",
            json!({
                "context": { "slot": 1 },
                "value": [token_account("Mint1", "1000", 3, json!(1.0), "1")]
            }),
        ),
    )
    .await;
    mount(
        &server,
        "getSignaturesForAddress",
        rpc_result(
            "getSignaturesForAddress",
            json!([{ "signature": "sig1", "blockTime": 0, "confirmationStatus": "confirmed" }]),
        ),
    )
    .await;

    let overview = client_for(&server).fetch_overview(WALLET, 1).await;

    assert_eq!(overview.native_balance, 0.25);
    assert_eq!(overview.token_count, 1);
    assert_eq!(overview.tokens[0].mint, "Mint1");
    assert_eq!(overview.transactions.len(), 1);
    assert_eq!(overview.transactions[0].timestamp, "1970-01-01T00:00:00.000Z");
}
