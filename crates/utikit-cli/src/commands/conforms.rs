//! Conforms command implementation.

use crate::context::Context;

pub fn run(
    context: &Context,
    file_type: String,
    targets: Vec<String>,
) -> Result<(), Box<dyn std::error::Error>> {
    let resolver = context.resolver();
    let file_type = file_type.to_lowercase();
    let targets: Vec<String> = targets.iter().map(|t| t.to_lowercase()).collect();

    let conforms = resolver.raw_conforms_to_any_of(Some(file_type.as_str()), targets.as_slice());
    println!("{}", conforms);
    if !conforms {
        std::process::exit(1);
    }
    Ok(())
}
