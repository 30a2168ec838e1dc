//! Browser facing part of the dashboard.
//!
//! Handlers never touch price history. They read the latest snapshot from the
//! watch channel and forward selection changes to the poller.



use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{
        Html,
        IntoResponse,
        Response,
    },
    routing::{
        get,
        post,
    },
    Json,
    Router,
};

use serde::{
    Deserialize,
    Serialize,
};

use serde_json::json;

use tokio::sync::{
    mpsc,
    watch,
};

use crate::{
    chart::Snapshot,
    dashboard::Event,
    price_info::Symbol,
    shared_state::SharedState,
};



const INDEX_HTML: &str = include_str!("../static/index.html");



/// State shared by all route handlers.
#[derive(Clone)]
pub struct AppState {
    pub shared: Arc<SharedState>,
    pub tx_events: mpsc::Sender<Event>,
    pub rx_snapshot: watch::Receiver<Snapshot>,
}



/// Error answered to the browser as `{"error": "..."}`.
#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    Unavailable(String),
}



impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Unavailable(msg) => (StatusCode::SERVICE_UNAVAILABLE, msg),
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}



#[derive(Debug, Serialize)]
struct SymbolOption {
    value: Symbol,
    label: &'static str,
}



#[derive(Debug, Serialize)]
struct SymbolList {
    options: Vec<SymbolOption>,
    selected: Symbol,
}



#[derive(Debug, Deserialize)]
struct SelectSymbol {
    symbol: String,
}



pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/health", get(health))
        .route("/api/snapshot", get(snapshot))
        .route("/api/symbols", get(symbols))
        .route("/api/symbol", post(select_symbol))
        .with_state(state)
}



async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}


async fn health() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}


async fn snapshot(State(state): State<AppState>) -> Json<Snapshot> {
    Json(state.rx_snapshot.borrow().clone())
}


async fn symbols(State(state): State<AppState>) -> Json<SymbolList> {
    let options = Symbol::all()
        .into_iter()
        .map(|symbol| SymbolOption { value: symbol, label: symbol.label() })
        .collect();

    Json(SymbolList {
        options,
        selected: state.rx_snapshot.borrow().symbol,
    })
}


async fn select_symbol(State(state): State<AppState>, Json(req): Json<SelectSymbol>)
    -> Result<StatusCode, ApiError>
{
    let Ok(symbol) = req.symbol.trim().parse::<Symbol>() else {
        return Err(ApiError::BadRequest(format!("unsupported symbol: {}", req.symbol)))
    };

    if state.shared.is_shut_down() {
        return Err(ApiError::Unavailable("service is shutting down".to_string()))
    }

    // Selection changes are not queued up behind a busy poller, the operator
    // can simply select again.
    if let Err(e) = state.tx_events.try_send(Event::SymbolChanged(symbol)) {
        tracing::warn!("dropping selection of {}: {}", symbol, e);
        return Err(ApiError::Unavailable("poller is busy, try again".to_string()))
    }

    Ok(StatusCode::ACCEPTED)
}



#[cfg(test)]
mod test {
    use super::*;

    use axum::{
        body::{
            to_bytes,
            Body,
        },
        http::{
            header,
            Request,
        },
    };
    use tower::ServiceExt;

    use crate::chart::ChartDescription;

    fn app(capacity: usize) -> (Router, mpsc::Receiver<Event>, watch::Sender<Snapshot>) {
        let (tx_events, rx_events) = mpsc::channel(capacity);
        let (tx_snapshot, rx_snapshot) = watch::channel(Snapshot::waiting(Symbol::BTCUSDT));
        let state = AppState {
            shared: Arc::new(SharedState::default()),
            tx_events,
            rx_snapshot,
        };

        (router(state), rx_events, tx_snapshot)
    }

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn post_symbol(body: &str) -> Request<Body> {
        Request::post("/api/symbol")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_snapshot_returns_latest() {
        let (app, _rx, tx_snapshot) = app(4);
        tx_snapshot.send_replace(Snapshot {
            symbol: Symbol::ETHUSDT,
            chart: ChartDescription {
                x: vec!["10:00:00".to_string()],
                y: vec![3100.5],
                title: "Real-time price: ETHUSDT".to_string(),
            },
            status: "current price: 3100.5 at 10:00:00".to_string(),
        });

        let response = app
            .oneshot(Request::get("/api/snapshot").body(Body::empty()).unwrap())
            .await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let value = body_json(response).await;
        assert_eq!(value["symbol"], "ETHUSDT");
        assert_eq!(value["chart"]["x"], json!(["10:00:00"]));
        assert_eq!(value["chart"]["y"], json!([3100.5]));
        assert_eq!(value["status"], "current price: 3100.5 at 10:00:00");
    }

    #[tokio::test]
    async fn test_symbols_lists_options_and_selection() {
        let (app, _rx, _tx_snapshot) = app(4);

        let response = app
            .oneshot(Request::get("/api/symbols").body(Body::empty()).unwrap())
            .await.unwrap();
        let value = body_json(response).await;

        assert_eq!(value["selected"], "BTCUSDT");
        assert_eq!(value["options"].as_array().unwrap().len(), 3);
        assert_eq!(value["options"][1]["value"], "ETHUSDT");
        assert_eq!(value["options"][1]["label"], "Ethereum (ETH/USDT)");
    }

    #[tokio::test]
    async fn test_select_symbol_queues_event() {
        let (app, mut rx, _tx_snapshot) = app(4);

        let response = app.oneshot(post_symbol(r#"{"symbol": "ltcusdt"}"#)).await.unwrap();

        assert_eq!(response.status(), StatusCode::ACCEPTED);
        assert_eq!(rx.try_recv().unwrap(), Event::SymbolChanged(Symbol::LTCUSDT));
    }

    #[tokio::test]
    async fn test_select_unknown_symbol_is_rejected() {
        let (app, mut rx, _tx_snapshot) = app(4);

        let response = app.oneshot(post_symbol(r#"{"symbol": "FOOUSDT"}"#)).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["error"], "unsupported symbol: FOOUSDT");
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_select_symbol_when_poller_is_busy() {
        let (app, _rx, _tx_snapshot) = app(1);

        let response = app.clone().oneshot(post_symbol(r#"{"symbol": "ETHUSDT"}"#)).await.unwrap();
        assert_eq!(response.status(), StatusCode::ACCEPTED);

        let response = app.oneshot(post_symbol(r#"{"symbol": "LTCUSDT"}"#)).await.unwrap();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn test_index_serves_page() {
        let (app, _rx, _tx_snapshot) = app(4);

        let response = app
            .oneshot(Request::get("/").body(Body::empty()).unwrap())
            .await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let page = String::from_utf8(bytes.to_vec()).unwrap();
        assert!(page.contains("/api/snapshot"));
    }
}
