//! `lugang ask`: Answer one question through the full pipeline.

use lugang_agent::Assistant;
use lugang_core::{Language, QueryRequest, Scope, UserType};

use super::load_config;

pub async fn run(
    question: String,
    scope: Scope,
    user_type: UserType,
    language: Language,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config()?;
    let assistant = Assistant::from_config(&config)?;

    let request = QueryRequest::new(question)
        .with_scope(scope)
        .with_user_type(user_type)
        .with_language(language);

    let response = assistant.answer(&request).await;
    println!("{}", serde_json::to_string_pretty(&response)?);

    Ok(())
}
