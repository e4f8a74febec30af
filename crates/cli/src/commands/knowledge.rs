//! `lugang knowledge`: Print the knowledge table.

use lugang_core::Scope;

use super::{load_config, load_knowledge};

pub fn run(scope: Scope) -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config()?;
    let knowledge = load_knowledge(&config)?;

    for region in scope.regions() {
        let table = knowledge.region(*region);
        println!("{} ({} items)", region.label(), table.item_count());
        for category in table.categories() {
            println!("  [{}]", category.name);
            for entry in &category.entries {
                println!("    - {entry}");
            }
        }
        println!();
    }

    if scope == Scope::Both {
        println!("Total: {} items", knowledge.total_items());
    }

    Ok(())
}
