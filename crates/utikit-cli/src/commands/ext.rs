//! Ext command implementation.

use crate::context::Context;
use crate::output::{self, TypeReport};
use utikit::Preference;

pub fn run(
    context: &Context,
    extension: String,
    is_directory: Option<bool>,
    preference: Preference,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let resolver = context.resolver();
    let extension = extension.trim_start_matches('.');
    let identifier = resolver.for_path_extension(extension, is_directory, preference);
    output::print(&TypeReport::new(&resolver, &identifier), json);
    Ok(())
}
