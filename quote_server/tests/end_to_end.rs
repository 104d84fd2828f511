//! Full pipeline: quote client → axum server → provider (wiremock) + SQLite store.
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use quote_client::client::QuoteClient;
use quote_client::writer::persist_bid;
use quote_common::{Deadline, ErrorKind};
use quote_server::config::{ApiConfig, DatabaseConfig};
use quote_server::fetcher::HttpQuoteFetcher;
use quote_server::handler::{AppState, router};
use quote_server::service::QuoteService;
use quote_server::store::{QuoteStore, SqliteQuoteStore};
use sqlx::{Connection, SqliteConnection};
use tempfile::TempDir;
use tokio::net::TcpListener;
use wiremock::matchers::method;
use wiremock::{Mock, MockServer, ResponseTemplate};

struct Harness {
    _dir: TempDir,
    dsn: String,
    provider: MockServer,
    store: Arc<SqliteQuoteStore>,
    addr: SocketAddr,
}

impl Harness {
    async fn start(db_timeout: Duration) -> Self {
        let dir = TempDir::new().unwrap();
        let dsn = dir.path().join("quotes.db").display().to_string();
        let provider = MockServer::start().await;

        let fetcher = HttpQuoteFetcher::new(&ApiConfig {
            base_url: format!("{}/json/last/USD-BRL", provider.uri()),
            timeout: Duration::from_millis(200),
            pair: "USDBRL".to_string(),
        })
        .unwrap();
        let store = Arc::new(
            SqliteQuoteStore::connect(&DatabaseConfig {
                dsn: dsn.clone(),
                max_connections: 4,
                timeout: db_timeout,
            })
            .await
            .unwrap(),
        );
        let service = QuoteService::new(Arc::new(fetcher), store.clone());
        let app = router(AppState {
            service: Arc::new(service),
            request_timeout: Duration::from_secs(2),
        });

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            _dir: dir,
            dsn,
            provider,
            store,
            addr,
        }
    }

    fn url(&self) -> String {
        format!("http://{}/quote", self.addr)
    }

    async fn provider_answers(&self, template: ResponseTemplate) {
        Mock::given(method("GET"))
            .respond_with(template)
            .mount(&self.provider)
            .await;
    }

    async fn get_raw(&self) -> (u16, serde_json::Value) {
        let response = reqwest::get(self.url()).await.unwrap();
        let status = response.status().as_u16();
        (status, response.json().await.unwrap())
    }

    async fn stored(&self, id: i64) -> Option<String> {
        let store = SqliteQuoteStore::connect(&DatabaseConfig {
            dsn: self.dsn.clone(),
            max_connections: 1,
            timeout: Duration::from_secs(5),
        })
        .await
        .unwrap();
        let found = store.find_by_id(&Deadline::unbounded(), id).await;
        store.close().await;
        found.ok().map(|q| q.bid)
    }
}

fn provider_body(bid: &str) -> serde_json::Value {
    serde_json::json!({
        "USDBRL": {
            "code": "USD", "codein": "BRL", "name": "Dólar Americano/Real Brasileiro",
            "high": "5.4612", "low": "5.4011", "varBid": "0.0123", "pctChange": "0.23",
            "bid": bid, "ask": "5.4330", "timestamp": "1718900000",
            "create_date": "2024-06-20 13:33:20"
        }
    })
}

#[tokio::test]
async fn bid_flows_from_provider_to_artifact() {
    let harness = Harness::start(Duration::from_secs(1)).await;
    harness
        .provider_answers(ResponseTemplate::new(200).set_body_json(provider_body("5.43")))
        .await;

    let client = QuoteClient::new(harness.url()).unwrap();
    let bid = client
        .get_bid(&Deadline::after(Duration::from_secs(3)))
        .await
        .unwrap();
    assert_eq!(bid, "5.43");

    let out = TempDir::new().unwrap();
    let artifact = out.path().join("cotacao.txt");
    persist_bid(&artifact, &bid).await.unwrap();
    assert_eq!(std::fs::read_to_string(&artifact).unwrap(), "Dólar: 5.43\n");

    assert_eq!(harness.stored(1).await.as_deref(), Some("5.43"));
    let by_id = harness
        .store
        .find_by_id(&Deadline::unbounded(), 1)
        .await
        .unwrap();
    assert_eq!(by_id.code, "USD");
}

#[tokio::test]
async fn slow_provider_yields_504_and_no_row() {
    let harness = Harness::start(Duration::from_secs(1)).await;
    harness
        .provider_answers(
            ResponseTemplate::new(200)
                .set_body_json(provider_body("5.43"))
                .set_delay(Duration::from_millis(600)),
        )
        .await;

    let (status, body) = harness.get_raw().await;
    assert_eq!(status, 504);
    assert_eq!(
        body,
        serde_json::json!({ "error": "Timeout while executing operation: upstream call" })
    );
    assert_eq!(harness.stored(1).await, None);

    let err = QuoteClient::new(harness.url())
        .unwrap()
        .get_bid(&Deadline::after(Duration::from_secs(3)))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Internal);
    assert!(err.detailed().contains("upstream call"));
}

#[tokio::test]
async fn blocked_storage_yields_504_and_no_row() {
    let harness = Harness::start(Duration::from_millis(10)).await;
    harness
        .provider_answers(ResponseTemplate::new(200).set_body_json(provider_body("5.43")))
        .await;

    let mut blocker = SqliteConnection::connect(&format!("sqlite://{}", harness.dsn))
        .await
        .unwrap();
    sqlx::query("BEGIN EXCLUSIVE")
        .execute(&mut blocker)
        .await
        .unwrap();

    let (status, body) = harness.get_raw().await;
    assert_eq!(status, 504);
    assert_eq!(
        body,
        serde_json::json!({ "error": "Timeout while executing operation: persist quote" })
    );

    sqlx::query("ROLLBACK").execute(&mut blocker).await.unwrap();
    blocker.close().await.unwrap();

    assert_eq!(harness.stored(1).await, None);
}

#[tokio::test]
async fn empty_bid_yields_400_and_no_row() {
    let harness = Harness::start(Duration::from_secs(1)).await;
    harness
        .provider_answers(ResponseTemplate::new(200).set_body_json(provider_body("")))
        .await;

    let (status, body) = harness.get_raw().await;
    assert_eq!(status, 400);
    assert_eq!(body["error"], "bid must not be empty");
    assert_eq!(harness.stored(1).await, None);
}

#[tokio::test]
async fn provider_failure_yields_502() {
    let harness = Harness::start(Duration::from_secs(1)).await;
    harness
        .provider_answers(ResponseTemplate::new(500).set_body_string("oops"))
        .await;

    let (status, body) = harness.get_raw().await;
    assert_eq!(status, 502);
    assert_eq!(body["error"], "Failed to call external API");
}
