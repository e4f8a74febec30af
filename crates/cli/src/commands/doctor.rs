//! `lugang doctor`: Diagnose setup problems.

use lugang_config::{AppConfig, api_key_env_var};
use lugang_core::ProviderKind;

use super::load_knowledge;

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    println!("🩺 Lu-Gang Connect Doctor");
    println!("========================\n");

    let mut issues = 0;

    let config_path = AppConfig::config_path();
    let config = if config_path.exists() {
        match AppConfig::load() {
            Ok(config) => {
                println!("  ✅ Config file valid: {}", config_path.display());
                config
            }
            Err(e) => {
                println!("  ❌ Config file invalid: {e}");
                println!("\n  ⚠️  Fix the config file before running other checks.");
                return Ok(());
            }
        }
    } else {
        println!("  ⚠️  No config file, using defaults, run `lugang onboard`");
        issues += 1;
        let mut config = AppConfig::default();
        config.apply_env_overrides(|key| std::env::var(key).ok())?;
        config
    };

    for kind in ProviderKind::ALL {
        if config.has_api_key(kind) {
            println!("  ✅ {} API key configured", kind.title());
        } else {
            println!(
                "  ⚠️  No {} API key, set {} or providers.{}.api_key",
                kind.title(),
                api_key_env_var(kind),
                kind
            );
            issues += 1;
        }
    }

    match load_knowledge(&config) {
        Ok(knowledge) => println!(
            "  ✅ Knowledge base loaded ({} items)",
            knowledge.total_items()
        ),
        Err(e) => {
            println!("  ❌ Knowledge base failed to load: {e}");
            issues += 1;
        }
    }

    println!();
    if issues == 0 {
        println!("  🎉 All checks passed!");
    } else {
        println!("  ⚠️  {issues} issue(s) found. See above for details.");
    }

    Ok(())
}
