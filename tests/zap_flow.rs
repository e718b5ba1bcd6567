//! End-to-end flow: profile metadata ingestion against a live HTTP
//! capability endpoint, through to zap receipt validation.

use std::sync::Arc;

use axum::{routing::post, Json, Router};
use serde_json::{json, Value};
use zapstr::event::{Event, Tag, METADATA_KIND, ZAP_RECEIPT_KIND, ZAP_REQUEST_KIND};
use zapstr::zapper::HttpZapperInfoFetcher;
use zapstr::{validate_zaps, ZapperDirectory};

const RECIPIENT: &str = "recipientpk";
const SENDER: &str = "senderpk";
const ZAPPER_PK: &str = "zapperpk";

/// Serve a canned capability payload and return the endpoint URL.
async fn spawn_info_server(response: Value) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let app = Router::new().route(
        "/zapper/info",
        post(move |_body: Json<Value>| {
            let response = response.clone();
            async move { Json(response) }
        }),
    );
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}/zapper/info")
}

fn metadata_event(created_at: u64, content: &str) -> Event {
    Event {
        id: "meta".into(),
        pubkey: RECIPIENT.into(),
        kind: METADATA_KIND,
        created_at,
        tags: vec![],
        content: content.into(),
        sig: String::new(),
    }
}

fn zap_receipt(signer: &str, bolt11: &str, request_pubkey: &str) -> Event {
    let request = Event {
        id: "req".into(),
        pubkey: request_pubkey.into(),
        kind: ZAP_REQUEST_KIND,
        created_at: 10,
        tags: vec![Tag::new(["p", RECIPIENT])],
        content: String::new(),
        sig: String::new(),
    };
    Event {
        id: "receipt".into(),
        pubkey: signer.into(),
        kind: ZAP_RECEIPT_KIND,
        created_at: 20,
        tags: vec![
            Tag::new(["p", RECIPIENT]),
            Tag::new(["bolt11", bolt11]),
            Tag::new([
                "description",
                serde_json::to_string(&request).unwrap().as_str(),
            ]),
        ],
        content: String::new(),
        sig: String::new(),
    }
}

#[tokio::test]
async fn metadata_through_validation() {
    let url = spawn_info_server(json!({
        "allowsNostr": true,
        "nostrPubkey": ZAPPER_PK,
        "callback": "https://example.com/callback",
        "minSendable": 1000,
        "maxSendable": 100000000,
    }))
    .await;

    let dir = ZapperDirectory::new(Arc::new(HttpZapperInfoFetcher::new(url)));
    dir.ingest(&metadata_event(100, r#"{"lud16":"user@example.com"}"#))
        .await;

    let record = dir.lookup(RECIPIENT).expect("record resolved over http");
    assert_eq!(record.nostr_pubkey, ZAPPER_PK);
    assert_eq!(record.callback, "https://example.com/callback");
    assert_eq!(record.min_sendable, 1000);

    let verified = validate_zaps(
        &dir,
        &[
            zap_receipt(ZAPPER_PK, "lnbc10n1qqfake", SENDER),
            zap_receipt("intruderpk", "lnbc10n1qqfake", SENDER),
            zap_receipt(ZAPPER_PK, "lnbc10n1qqfake", RECIPIENT),
        ],
        RECIPIENT,
    );
    assert_eq!(verified.len(), 1);
    assert_eq!(verified[0].invoice_amount, 1000);
    assert_eq!(verified[0].request.pubkey, SENDER);

    // A stale metadata event re-delivered later must not displace the record.
    dir.ingest(&metadata_event(50, r#"{"lud16":"other@elsewhere.com"}"#))
        .await;
    assert_eq!(dir.lookup(RECIPIENT).unwrap().created_at, 100);
}

#[tokio::test]
async fn endpoint_without_zap_support_yields_no_records() {
    let url = spawn_info_server(json!({
        "allowsNostr": false,
        "callback": "https://example.com/callback",
    }))
    .await;

    let dir = ZapperDirectory::new(Arc::new(HttpZapperInfoFetcher::new(url)));
    dir.ingest(&metadata_event(100, r#"{"lud16":"user@example.com"}"#))
        .await;

    assert!(dir.lookup(RECIPIENT).is_none());
    assert!(validate_zaps(
        &dir,
        &[zap_receipt(ZAPPER_PK, "lnbc10n1qqfake", SENDER)],
        RECIPIENT
    )
    .is_empty());
}

#[tokio::test]
async fn unreachable_endpoint_leaves_directory_empty() {
    // Nothing is listening on this port by the time the request is made.
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let fetcher = HttpZapperInfoFetcher::new(format!("http://{addr}/zapper/info"));
    let dir = ZapperDirectory::new(Arc::new(fetcher));
    dir.ingest(&metadata_event(100, r#"{"lud16":"user@example.com"}"#))
        .await;

    assert!(dir.lookup(RECIPIENT).is_none());
}
