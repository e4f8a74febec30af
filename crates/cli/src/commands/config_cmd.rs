//! `lugang config`: Configuration management commands.

use lugang_config::AppConfig;
use lugang_core::ProviderKind;

use super::load_config;

pub fn validate() -> Result<(), Box<dyn std::error::Error>> {
    println!("🔍 Validating configuration...");

    match AppConfig::load() {
        Ok(config) => {
            println!("   ✅ Config parsed successfully");

            let mut warnings = Vec::new();
            for kind in ProviderKind::ALL {
                if !config.has_api_key(kind) {
                    warnings.push(format!("No {} API key set", kind.title()));
                }
            }
            if config.gateway.allowed_origins.is_empty() {
                warnings.push("gateway.allowed_origins is empty; browsers will be refused".into());
            }

            if warnings.is_empty() {
                println!("   ✅ All checks passed");
            } else {
                println!();
                for w in &warnings {
                    println!("   ⚠️  {w}");
                }
            }

            println!();
            println!("   Gateway:   {}:{}", config.gateway.host, config.gateway.port);
            println!("   Timeout:   {}s", config.request_timeout_secs);
        }
        Err(e) => {
            println!("   ❌ Config error: {e}");
            return Err(e.into());
        }
    }

    Ok(())
}

/// Print the effective configuration with API keys redacted.
pub fn show() -> Result<(), Box<dyn std::error::Error>> {
    let mut config = load_config()?;
    for kind in ProviderKind::ALL {
        if config.has_api_key(kind) {
            config.set_api_key(kind, "[REDACTED]");
        }
    }
    let toml_str = toml::to_string_pretty(&config)?;
    println!("{toml_str}");
    Ok(())
}

pub fn path() -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", AppConfig::config_path().display());
    Ok(())
}
