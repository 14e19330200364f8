//! Order Processing Worker (AMQP)
//!
//! Binary entry point for the AMQP-based order worker.

#[tokio::main]
async fn main() {
    if let Err(e) = order_worker::run().await {
        eprintln!("Fatal error: {:#}", e);
        std::process::exit(1);
    }
}
