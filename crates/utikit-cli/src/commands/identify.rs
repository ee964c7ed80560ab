//! Identify command implementation.

use crate::context::Context;
use crate::output::{self, TypeReport};
use std::path::PathBuf;
use utikit::Preference;

pub fn run(
    context: &Context,
    paths: Vec<PathBuf>,
    preference: Preference,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let resolver = context.resolver();
    let mut failures = 0usize;

    for path in &paths {
        match resolver.for_path(path, preference) {
            Ok(identifier) => {
                let report = TypeReport::new(&resolver, &identifier).with_path(path);
                output::print(&report, json);
            }
            Err(e) => {
                failures += 1;
                eprintln!("{}: {}", path.display(), e);
            }
        }
    }

    if failures > 0 {
        return Err(format!("{} of {} paths could not be identified", failures, paths.len()).into());
    }
    Ok(())
}
