use std::collections::HashMap;
use std::path::Path;

use tera::{Tera, Value};

/// Every element of `items` except those equal to `not_this`, in their
/// original relative order. The input is left untouched; an absent value
/// yields a copy of the input.
pub fn all_but<T: PartialEq + Clone>(items: &[T], not_this: &T) -> Vec<T> {
    items
        .iter()
        .filter(|item| *item != not_this)
        .cloned()
        .collect()
}

/// Template-facing form of [`all_but`], operating on an array value with
/// the exclusion passed as the `not` argument:
///
/// ```text
/// {{ tags | all_but(not="draft") }}
/// ```
pub fn all_but_filter(value: &Value, args: &HashMap<String, Value>) -> tera::Result<Value> {
    let items = value
        .as_array()
        .ok_or_else(|| tera::Error::msg("all_but expects an array"))?;
    let not_this = args
        .get("not")
        .ok_or_else(|| tera::Error::msg("all_but requires a `not` argument"))?;

    Ok(Value::Array(all_but(items, not_this)))
}

/// Register the custom filters under their fixed template names.
pub fn register(tera: &mut Tera) {
    tera.register_filter("all_but", all_but_filter);
}

/// Load a theme's templates with the custom filters pre-registered, so a
/// template calling `all_but` parses and renders.
pub fn theme_templates(theme_dir: &Path) -> tera::Result<Tera> {
    let glob = format!("{}/templates/**/*.html", theme_dir.display());
    let mut tera = Tera::new(&glob)?;
    register(&mut tera);

    Ok(tera)
}
