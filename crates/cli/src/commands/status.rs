//! `lugang status`: Show configuration and provider status.

use lugang_config::AppConfig;
use lugang_core::ProviderKind;
use lugang_providers::build_from_config;

use super::load_config;

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config()?;
    let router = build_from_config(&config);

    println!("鲁港通 Lu-Gang Connect Status");
    println!("=============================");
    println!("  Config file:  {}", AppConfig::config_path().display());
    println!("  Gateway:      {}:{}", config.gateway.host, config.gateway.port);
    println!("  Temperature:  {}", config.default_temperature);
    println!("  Max tokens:   {}", config.default_max_tokens);
    println!("  Timeout:      {}s", config.request_timeout_secs);
    println!(
        "  Knowledge:    {}",
        config.knowledge.path.as_deref().unwrap_or("built-in")
    );

    println!();
    for kind in ProviderKind::ALL {
        let status = if router.is_configured(kind) {
            "configured"
        } else {
            "not_configured"
        };
        let endpoint = router.get(kind).map(|p| p.endpoint()).unwrap_or_default();
        println!("  {:<9} {:<15} {:<14} {}", kind.title(), status, router.model_for(kind), endpoint);
    }

    if !AppConfig::config_path().exists() {
        println!("\n  ⚠️  No config file, run `lugang onboard` first");
    }

    Ok(())
}
