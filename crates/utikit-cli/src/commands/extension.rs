//! Extension command implementation.

use crate::context::Context;
use utikit::TypeIdentifier;

pub fn run(context: &Context, identifier: String) -> Result<(), Box<dyn std::error::Error>> {
    let identifier = TypeIdentifier::new(identifier);
    match context.resolver().preferred_path_extension(&identifier) {
        Some(extension) => {
            println!("{}", extension);
            Ok(())
        }
        None => {
            eprintln!("No preferred extension for {}", identifier);
            std::process::exit(1);
        }
    }
}
