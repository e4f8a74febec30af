//! `lugang search`: Show the knowledge context for a question.

use lugang_core::{Scope, UserType};
use lugang_knowledge::FALLBACK_CONTEXT;

use super::{load_config, load_knowledge};

pub fn run(question: &str, scope: Scope) -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config()?;
    let knowledge = load_knowledge(&config)?;

    let matches = knowledge.matches(question, scope);
    if matches.is_empty() {
        println!("  (no match, fallback context)");
        println!("  {FALLBACK_CONTEXT}");
        return Ok(());
    }

    println!("  {} match(es) in {scope}:", matches.len());
    for (i, fact) in matches.iter().enumerate() {
        println!("  {}. {fact}", i + 1);
    }
    println!();
    println!("  Context: {}", knowledge.search(question, scope, UserType::default()));

    Ok(())
}
