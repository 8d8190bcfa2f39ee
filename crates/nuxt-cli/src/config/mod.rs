//! Project configuration for Nuxt commands.
//!
//! The configuration is an untyped tree: the framework owns its schema, the
//! CLI only loads it and writes the handful of keys its flags control.
//! Unknown keys pass through untouched.
//!
//! Sources, lowest priority first:
//!
//! 1. `nuxt.config.json` (or the file named by `--config-file`)
//! 2. `NUXT_`-prefixed environment variables
//! 3. `HOST`/`PORT` for the server address
//! 4. Command overrides and option mutators, applied by
//!    [`NuxtCommand::get_nuxt_config`](crate::command::NuxtCommand::get_nuxt_config)

mod loading;

use serde_json::{Map, Value};

pub use loading::{load_nuxt_config, DEFAULT_CONFIG_FILE};

/// Composed configuration handed to the framework instance.
pub type OptionsTree = Map<String, Value>;

/// Nested object stored under `key`, created when missing.
///
/// A non-object value under `key` is replaced by an empty object.
pub fn ensure_object<'a>(tree: &'a mut OptionsTree, key: &str) -> &'a mut OptionsTree {
    let slot = tree
        .entry(key.to_string())
        .or_insert_with(|| Value::Object(Map::new()));
    if !slot.is_object() {
        *slot = Value::Object(Map::new());
    }
    match slot {
        Value::Object(map) => map,
        _ => unreachable!("slot was just set to an object"),
    }
}

/// Whether the bundle analyzer is switched on: `build.analyze` is `true` or
/// an analyzer options object.
pub fn is_analyze(tree: &OptionsTree) -> bool {
    matches!(
        tree.get("build").and_then(|build| build.get("analyze")),
        Some(Value::Bool(true)) | Some(Value::Object(_))
    )
}

/// String value at a dotted path, e.g. `generate.dir`.
pub fn get_str<'a>(tree: &'a OptionsTree, path: &str) -> Option<&'a str> {
    let mut segments = path.split('.');
    let first = segments.next()?;
    let mut value = tree.get(first)?;
    for segment in segments {
        value = value.get(segment)?;
    }
    value.as_str()
}
