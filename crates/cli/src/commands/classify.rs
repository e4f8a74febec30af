//! `lugang classify`: Show which upstream a question routes to.

use lugang_core::classify;

use super::load_config;

pub fn run(question: &str) -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config()?;
    let classification = classify(question);
    let kind = classification.provider;

    println!("  Provider:  {} ({})", kind.title(), kind);
    println!("  Model:     {}", config.model_for(kind));
    if !config.has_api_key(kind) {
        println!("  ⚠️  {} has no API key; answers will be a placeholder", kind.title());
    }

    Ok(())
}
