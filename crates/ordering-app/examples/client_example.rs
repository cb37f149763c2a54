///  To run :
///  cargo r --example client_example
use ordering_client::{ClientError, OrdersClient};
use ordering_hex::application::order_service::OrderService;
use ordering_hex::inbound::http::{HttpServer, HttpServerConfig};
use ordering_repo::build_repo;
use ordering_types::domain::cart::CartRef;
use ordering_types::domain::order::{NewOrderRequest, OrderPatch, OrderStatus};
use rust_decimal_macros::dec;
use tempfile::tempdir;

fn find_free_port() -> anyhow::Result<u16> {
    Ok(std::net::TcpListener::bind("127.0.0.1:0")?
        .local_addr()?
        .port())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let port = find_free_port()?;
    let addr = format!("http://127.0.0.1:{port}/");

    // Temp file-backed SQLite so every pool connection sees the same data.
    let tmp = tempdir()?;
    let db_url = format!("sqlite://{}", tmp.path().join("orders.db").display());

    let repo = build_repo(Some(&db_url)).await?;
    let service = OrderService::new(repo.clone(), repo);
    let server = HttpServer::new(
        service,
        HttpServerConfig {
            port: port.to_string(),
        },
    )
    .await?;

    let handle = tokio::spawn(async move {
        if let Err(e) = server.run().await {
            eprintln!("server stopped: {e:#}");
        }
    });
    tokio::time::sleep(std::time::Duration::from_millis(50)).await;

    let client = OrdersClient::new(&addr)?;
    let cart = client.open_cart().await?;
    println!("Opened cart id={}", cart.id);

    let order = client
        .create_order(&NewOrderRequest {
            description: "Example order".into(),
            fee: dec!(49.90),
            cart: Some(CartRef::new(cart.id)),
        })
        .await?;
    println!("Created order id={} status={}", order.id, order.status);

    let order = client
        .update_order(
            order.id,
            &OrderPatch {
                description: Some("Example order, gift wrapped".into()),
                fee: Some(dec!(54.90)),
            },
        )
        .await?;
    println!("Updated order fee={}", order.fee);

    while order_status(&client, order.id).await? != OrderStatus::InPayment {
        let advanced = client.advance_status(order.id).await?;
        println!("Advanced order to {}", advanced.status);
    }

    match client.delete_order(order.id).await {
        Err(ClientError::Conflict(msg)) => println!("Delete refused as expected: {msg}"),
        other => anyhow::bail!("expected a conflict, got {other:?}"),
    }

    handle.abort();
    Ok(())
}

async fn order_status(client: &OrdersClient, id: i64) -> anyhow::Result<OrderStatus> {
    Ok(client.get_order(id).await?.status)
}
