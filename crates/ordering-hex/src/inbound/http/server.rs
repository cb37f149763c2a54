use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    routing::{get, patch, post},
    serve, Json, Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tower_http::trace::TraceLayer;
use uuid::Uuid;

use crate::application::order_service::OrderService;
use crate::errors::AppError;
use ordering_types::domain::cart::Cart;
use ordering_types::domain::order::{NewOrderRequest, Order, OrderPatch};
use ordering_types::ports::cart_store::CartStore;
use ordering_types::ports::order_store::OrderStore;

#[derive(Clone)]
pub struct HttpServerConfig {
    pub port: String,
}

type SharedService<S, C> = Arc<OrderService<S, C>>;

pub struct HttpServer<S: OrderStore, C: CartStore> {
    pub service: SharedService<S, C>,
    pub config: HttpServerConfig,
}

impl<S: OrderStore, C: CartStore> HttpServer<S, C> {
    pub async fn new(service: OrderService<S, C>, config: HttpServerConfig) -> anyhow::Result<Self> {
        Ok(Self {
            service: Arc::new(service),
            config,
        })
    }

    pub async fn run(self) -> anyhow::Result<()> {
        let app = router(self.service.clone());

        let addr: SocketAddr = format!("0.0.0.0:{}", self.config.port).parse()?;
        tracing::info!("starting server on {}", addr);
        let listener = tokio::net::TcpListener::bind(addr).await?;
        serve(listener, app.into_make_service()).await?;
        Ok(())
    }
}

/// All routes with request tracing, bound to one shared service.
pub fn router<S: OrderStore, C: CartStore>(service: SharedService<S, C>) -> Router {
    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(|request: &axum::extract::Request<_>| {
            let uri = request.uri().to_string();
            let request_id = Uuid::new_v4();
            tracing::info_span!(
                "http_request",
                %request_id,
                method = %request.method(),
                uri
            )
        })
        .on_request(|request: &axum::extract::Request<_>, span: &tracing::Span| {
            tracing::info!(
                parent: span,
                method = %request.method(),
                uri = %request.uri(),
                "request"
            );
        })
        .on_response(
            |response: &axum::response::Response, latency: Duration, span: &tracing::Span| {
                tracing::info!(
                    parent: span,
                    status = %response.status(),
                    latency_ms = %latency.as_millis(),
                    "response"
                );
            },
        );

    Router::new()
        .route("/health", get(health))
        .route("/orders", get(list_orders::<S, C>).post(create_order::<S, C>))
        .route(
            "/orders/{id}",
            get(get_order::<S, C>)
                .put(update_order::<S, C>)
                .delete(delete_order::<S, C>),
        )
        .route("/orders/{id}/status", patch(advance_status::<S, C>))
        .route("/carts", post(open_cart::<S, C>))
        .route("/carts/{id}", get(get_cart::<S, C>))
        .layer(trace_layer)
        .with_state(service)
}

fn parse_id(raw: &str) -> Result<i64, AppError> {
    raw.parse::<i64>()
        .map_err(|e| AppError::InvalidArgument(format!("invalid id {raw:?}: {e}")))
}

async fn health() -> (StatusCode, Json<serde_json::Value>) {
    (StatusCode::OK, Json(serde_json::json!({ "status": "ok" })))
}

async fn create_order<S: OrderStore, C: CartStore>(
    State(service): State<SharedService<S, C>>,
    payload: Result<Json<NewOrderRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Order>), AppError> {
    let Json(payload) = payload?;
    let order = service.save(payload).await?;
    Ok((StatusCode::CREATED, Json(order)))
}

async fn get_order<S: OrderStore, C: CartStore>(
    State(service): State<SharedService<S, C>>,
    Path(id): Path<String>,
) -> Result<Json<Order>, AppError> {
    let order = service.find_by_id(parse_id(&id)?).await?;
    Ok(Json(order))
}

async fn list_orders<S: OrderStore, C: CartStore>(
    State(service): State<SharedService<S, C>>,
) -> Result<Json<Vec<Order>>, AppError> {
    let list = service.find_all().await?;
    Ok(Json(list))
}

async fn update_order<S: OrderStore, C: CartStore>(
    State(service): State<SharedService<S, C>>,
    Path(id): Path<String>,
    body: Result<Json<OrderPatch>, JsonRejection>,
) -> Result<Json<Order>, AppError> {
    let Json(patch) = body?;
    let updated = service.update(parse_id(&id)?, patch).await?;
    Ok(Json(updated))
}

async fn advance_status<S: OrderStore, C: CartStore>(
    State(service): State<SharedService<S, C>>,
    Path(id): Path<String>,
) -> Result<Json<Order>, AppError> {
    let updated = service.update_status(parse_id(&id)?).await?;
    Ok(Json(updated))
}

async fn delete_order<S: OrderStore, C: CartStore>(
    State(service): State<SharedService<S, C>>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    service.delete_by_id(parse_id(&id)?).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn open_cart<S: OrderStore, C: CartStore>(
    State(service): State<SharedService<S, C>>,
) -> Result<(StatusCode, Json<Cart>), AppError> {
    let cart = service.open_cart().await?;
    Ok((StatusCode::CREATED, Json(cart)))
}

async fn get_cart<S: OrderStore, C: CartStore>(
    State(service): State<SharedService<S, C>>,
    Path(id): Path<String>,
) -> Result<Json<Cart>, AppError> {
    let cart = service.find_cart(parse_id(&id)?).await?;
    Ok(Json(cart))
}
