//! Declarations command implementation.

use crate::context::Context;

pub fn run(context: &Context) -> Result<(), Box<dyn std::error::Error>> {
    let declarations = context.registry().declarations();
    println!("{}", serde_json::to_string_pretty(declarations)?);
    Ok(())
}
