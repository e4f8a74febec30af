//! `lugang onboard`: First-time setup.

use lugang_config::{AppConfig, api_key_env_var};
use lugang_core::ProviderKind;

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config_path = AppConfig::config_path();

    println!("鲁港通 Lu-Gang Connect: First-Time Setup");
    println!("=========================================\n");

    if let Some(dir) = config_path.parent() {
        if !dir.exists() {
            std::fs::create_dir_all(dir)?;
            println!("✅ Created config directory: {}", dir.display());
        } else {
            println!("  Config directory exists: {}", dir.display());
        }
    }

    if config_path.exists() {
        println!("\n⚠️  Config already exists at: {}", config_path.display());
        println!("   Edit it manually or delete and re-run onboard.\n");
        return Ok(());
    }

    std::fs::write(&config_path, AppConfig::default_toml())?;
    println!("✅ Created config.toml at: {}", config_path.display());
    println!("\n📝 Next steps:");
    for kind in ProviderKind::ALL {
        println!(
            "   - Set {} or add providers.{}.api_key",
            api_key_env_var(kind),
            kind
        );
    }
    println!("   - Run: lugang serve\n");

    Ok(())
}
