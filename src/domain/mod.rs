//! Tool surface and the shared plumbing behind it
//!
//! One module per upstream resource; `build_registry` assembles the complete
//! tool set once at startup.

pub mod accounts;
pub mod categories;
pub mod credit_cards;
pub mod data;
pub mod query;
pub mod registry;
pub mod render;
pub mod settings;
pub mod summary;
pub mod transactions;
pub mod transfers;
pub mod validate;

use registry::{RegistryError, ToolRegistry};

pub fn build_registry() -> Result<ToolRegistry, RegistryError> {
    let mut registry = ToolRegistry::new();
    accounts::register_tools(&mut registry)?;
    transactions::register_tools(&mut registry)?;
    credit_cards::register_tools(&mut registry)?;
    categories::register_tools(&mut registry)?;
    transfers::register_tools(&mut registry)?;
    summary::register_tools(&mut registry)?;
    settings::register_tools(&mut registry)?;
    data::register_tools(&mut registry)?;
    Ok(registry)
}
