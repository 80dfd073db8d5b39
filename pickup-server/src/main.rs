use pickup_server::{Server, setup_environment};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. dotenv + configuration + logging
    let config = setup_environment();

    tracing::info!(
        work_dir = %config.work_dir,
        timezone = %config.business_timezone,
        quantity_policy = ?config.quantity_edit_policy,
        "Pickup server starting..."
    );

    // 2. state is initialized inside run()
    let server = Server::new(config);

    if let Err(e) = server.run().await {
        tracing::error!("Server error: {}", e);
        return Err(e.into());
    }

    Ok(())
}
