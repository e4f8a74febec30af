//! `lugang serve`: Start the HTTP API server.

use super::load_config;

pub async fn run(
    host_override: Option<String>,
    port_override: Option<u16>,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = load_config()?;

    if let Some(host) = host_override {
        config.gateway.host = host;
    }
    if let Some(port) = port_override {
        config.gateway.port = port;
    }

    println!("鲁港通 Lu-Gang Connect Gateway");
    println!("   Listening: {}:{}", config.gateway.host, config.gateway.port);
    println!("   CORS:      {}", config.gateway.allowed_origins.join(", "));

    lugang_gateway::start(config).await?;

    Ok(())
}
