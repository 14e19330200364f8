//! Test publisher for the order worker
//!
//! Run with: cargo run -p order_worker --example publish_order

use domain_orders::{LineItem, OpaqueId, OrderEvent};
use lapin::options::{BasicPublishOptions, QueueDeclareOptions};
use lapin::types::FieldTable;
use lapin::{BasicProperties, Connection, ConnectionProperties};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let host = std::env::var("BROKER_HOST").unwrap_or_else(|_| "localhost".to_string());
    let port = std::env::var("BROKER_PORT").unwrap_or_else(|_| "5672".to_string());
    let uri = format!("amqp://{}:{}", host, port);

    println!("Connecting to broker at {}...", uri);
    let connection = Connection::connect(&uri, ConnectionProperties::default()).await?;
    let channel = connection.create_channel().await?;

    let queue = std::env::var("ORDERS_QUEUE").unwrap_or_else(|_| "orders.created".to_string());
    channel
        .queue_declare(
            &queue,
            QueueDeclareOptions {
                durable: true,
                ..Default::default()
            },
            FieldTable::default(),
        )
        .await?;

    let event = OrderEvent {
        order_id: Some(OpaqueId::Text("A1".to_string())),
        customer_id: Some(OpaqueId::Number(7)),
        customer_name: Some("Test Customer".to_string()),
        customer_email: Some("test@example.com".to_string()),
        products: vec![LineItem {
            name: "Widget".to_string(),
            quantity: 2,
            price: 9.99,
        }],
        total_price: 19.98,
    };

    let payload = serde_json::to_vec(&event)?;

    println!("Publishing order {} to '{}'", event.order_ref(), queue);

    channel
        .basic_publish(
            "",
            &queue,
            BasicPublishOptions::default(),
            &payload,
            BasicProperties::default().with_delivery_mode(2),
        )
        .await?
        .await?;

    println!("Published! Check the worker logs.");

    Ok(())
}
