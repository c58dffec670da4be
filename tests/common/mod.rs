#![allow(dead_code)]

pub mod thrift;

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::{Router, body::Body, http::Request, response::Response};
use payments_service::{
    error::AppError,
    models::{
        account::Account,
        order::{OrderItem, WarehouseUserInfo},
    },
    services::{account_directory::AccountDirectory, order_relay::OrderRelay},
    state::AppState,
    warehouse::{RemoteFault, WarehouseGateway, protocol::Decoder},
};
use tokio::io::AsyncWriteExt;
use tokio::net::{TcpListener, TcpStream};
use tower::ServiceExt;

pub type Calls = Arc<Mutex<Vec<(WarehouseUserInfo, Vec<OrderItem>)>>>;

/// How the fake warehouse answers `prepareOrder`.
#[derive(Clone)]
pub enum Reply {
    Accept,
    Fault(RemoteFault),
    /// Read the call, never answer.
    Silent,
}

pub struct FakeWarehouse {
    pub addr: String,
    pub calls: Calls,
}

/// Start a Thrift warehouse on an ephemeral port.
pub async fn spawn_warehouse(reply: Reply) -> FakeWarehouse {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap().to_string();
    let calls = Calls::default();
    tokio::spawn(accept_loop(listener, reply, calls.clone()));
    FakeWarehouse { addr, calls }
}

/// Serve `prepareOrder` on an already bound listener.
pub async fn accept_loop(listener: TcpListener, reply: Reply, calls: Calls) {
    while let Ok((stream, _)) = listener.accept().await {
        tokio::spawn(serve_connection(stream, reply.clone(), calls.clone()));
    }
}

async fn serve_connection(stream: TcpStream, reply: Reply, calls: Calls) {
    let (read, mut write) = stream.into_split();
    let mut dec = Decoder::new(read);
    while let Ok(header) = dec.read_message_begin().await {
        let Ok(args) = thrift::read_args(&mut dec).await else {
            return;
        };
        calls.lock().unwrap().push(args);

        let outcome = match &reply {
            Reply::Accept => Ok(()),
            Reply::Fault(fault) => Err(fault.clone()),
            Reply::Silent => continue,
        };
        let frame = thrift::encode_reply(header.seq_id, &outcome);
        if write.write_all(&frame).await.is_err() {
            return;
        }
    }
}

/// An address nothing listens on.
pub async fn closed_addr() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap().to_string();
    drop(listener);
    addr
}

#[derive(Default)]
pub struct InMemoryDirectory {
    accounts: HashMap<i32, Account>,
}

impl InMemoryDirectory {
    pub fn with(accounts: impl IntoIterator<Item = Account>) -> Self {
        Self {
            accounts: accounts.into_iter().map(|a| (a.id, a)).collect(),
        }
    }
}

#[async_trait]
impl AccountDirectory for InMemoryDirectory {
    async fn find_by_id(&self, id: i32) -> Result<Option<Account>, AppError> {
        Ok(self.accounts.get(&id).cloned())
    }
}

pub fn jane() -> Account {
    Account {
        id: 1,
        name: Some("Jane".into()),
        middle_name: Some("Q".into()),
        surname: Some("Doe".into()),
        address: Some("1 Main St".into()),
        credit_card: Some("4111111111111111".into()),
        cvv: Some("123".into()),
    }
}

/// Router whose order path uses `directory` and `warehouse`.
///
/// The pool is lazy and never connected; only the order route is exercised.
pub fn app(directory: Arc<dyn AccountDirectory>, warehouse: Arc<dyn WarehouseGateway>) -> Router {
    let pool = sqlx::postgres::PgPoolOptions::new()
        .connect_lazy("postgres://postgres@localhost/unused")
        .unwrap();
    let relay = Arc::new(OrderRelay::new(directory, warehouse.clone()));

    payments_service::router(AppState {
        pool,
        relay,
        warehouse,
    })
}

pub async fn post_order(app: Router, body: &str) -> Response {
    app.oneshot(
        Request::builder()
            .method("POST")
            .uri("/api/order")
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
    )
    .await
    .unwrap()
}

pub async fn json_body(response: Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

/// Send one request through `app`, with an optional JSON body.
pub async fn send(app: &Router, method: &str, uri: &str, body: Option<serde_json::Value>) -> Response {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string())),
        None => builder.body(Body::empty()),
    };
    app.clone().oneshot(request.unwrap()).await.unwrap()
}

pub fn error_code(body: &serde_json::Value) -> &str {
    body["error"]["code"].as_str().unwrap()
}
