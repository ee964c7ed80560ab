//! Tag command implementation.

use crate::context::Context;
use crate::output::{self, TypeReport};
use utikit::tags::{FILENAME_EXTENSION, MIME_TYPE};
use utikit::{Preference, TypeIdentifier};

/// Expands the short class names accepted on the command line.
fn tag_class(class: &str) -> &str {
    match class {
        "ext" | "extension" => FILENAME_EXTENSION,
        "mime" => MIME_TYPE,
        other => other,
    }
}

pub fn run(
    context: &Context,
    class: String,
    value: String,
    conforming_to: Option<String>,
    preference: Preference,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let resolver = context.resolver();
    let conforming_to = conforming_to.map(TypeIdentifier::new);
    let identifier = resolver.for_tag(tag_class(&class), &value, conforming_to.as_ref(), preference);
    output::print(&TypeReport::new(&resolver, &identifier), json);
    Ok(())
}
