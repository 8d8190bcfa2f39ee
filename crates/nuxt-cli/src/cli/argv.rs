//! Argument binding: option schema → parser configuration → parsed argv.
//!
//! The parser configuration is a flat description of the schema (aliases,
//! boolean and string buckets, defaults). It is translated into a
//! `clap::Command` built at runtime, which does the actual token parsing.

use std::collections::HashMap;
use std::ffi::OsString;

use clap::parser::ValueSource;
use clap::{Arg, ArgAction, ArgMatches};
use indexmap::IndexMap;

use crate::cli::{ArgValue, OptionSchema, OptionType};
use crate::error::{CliError, Result};

/// Flags recognized for every command, declared or not.
pub const RESERVED_FLAGS: [&str; 2] = ["help", "version"];

/// Clap id collecting positional tokens.
const POSITIONAL: &str = "_";

/// Parser configuration derived from an [`OptionSchema`].
///
/// Bucket keys follow one rule: an option is listed under its alias when it
/// has one, otherwise under its name. `alias` itself maps name → alias.
/// Every key belongs to exactly one option.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParserConfig {
    pub alias: IndexMap<String, char>,
    pub boolean: Vec<String>,
    pub string: Vec<String>,
    pub default: IndexMap<String, ArgValue>,
    /// Bucket key → option name.
    keys: IndexMap<String, String>,
}

impl ParserConfig {
    /// Build the configuration.
    ///
    /// Fails when two options claim the same alias, or when an alias equals
    /// the name of another option.
    pub fn from_schema(schema: &OptionSchema) -> Result<Self> {
        let mut config = Self::default();
        let mut claimed: HashMap<char, &str> = HashMap::new();

        for (name, option) in schema {
            let key = option
                .alias
                .map(|alias| alias.to_string())
                .unwrap_or_else(|| name.clone());

            if let Some(alias) = option.alias {
                if let Some(other) = claimed.insert(alias, name) {
                    return Err(CliError::InvalidArgument(format!(
                        "alias -{} is declared by both --{} and --{}",
                        alias, other, name
                    )));
                }
                config.alias.insert(name.clone(), alias);
            }

            if let Some(other) = config.keys.insert(key.clone(), name.clone()) {
                return Err(CliError::InvalidArgument(format!(
                    "--{} and --{} are both bound to `{}`",
                    other, name, key
                )));
            }

            match option.kind {
                Some(OptionType::Boolean) => config.boolean.push(key.clone()),
                Some(OptionType::String) => config.string.push(key.clone()),
                None => {}
            }

            if let Some(default) = &option.default {
                config.default.insert(key, default.clone());
            }
        }

        Ok(config)
    }

    /// Option name a bucket key refers to.
    fn resolve(&self, key: &str) -> String {
        self.keys
            .get(key)
            .cloned()
            .unwrap_or_else(|| key.to_string())
    }

    /// Names declared without a type; they take an optional value.
    fn untyped(&self) -> Vec<String> {
        let typed: Vec<String> = self
            .boolean
            .iter()
            .chain(&self.string)
            .map(|key| self.resolve(key))
            .collect();

        let mut names: Vec<String> = Vec::new();
        let candidates = self
            .alias
            .keys()
            .cloned()
            .chain(self.default.keys().map(|key| self.resolve(key)));
        for name in candidates {
            if !typed.contains(&name) && !names.contains(&name) {
                names.push(name);
            }
        }
        names
    }

    fn declares(&self, name: &str) -> bool {
        self.boolean
            .iter()
            .chain(&self.string)
            .any(|key| self.resolve(key) == name)
            || self.untyped().iter().any(|n| n == name)
    }

    fn with_alias(&self, arg: Arg, name: &str) -> Arg {
        match self.alias.get(name) {
            Some(alias) => arg.short(*alias),
            None => arg,
        }
    }

    /// Translate into a clap command that accepts exactly these flags.
    pub fn clap_command(&self) -> clap::Command {
        let mut cmd = clap::Command::new(crate::PROGRAM)
            .no_binary_name(true)
            .disable_help_flag(true)
            .disable_version_flag(true)
            .disable_help_subcommand(true)
            .args_override_self(true)
            .arg(
                Arg::new(POSITIONAL)
                    .num_args(1..)
                    .action(ArgAction::Append)
                    .value_name("DIR"),
            );

        for key in &self.boolean {
            let name = self.resolve(key);
            let negated = format!("no-{}", name);
            let flag = Arg::new(name.clone())
                .long(name.clone())
                .action(ArgAction::SetTrue)
                .overrides_with(negated.clone());
            cmd = cmd.arg(self.with_alias(flag, &name)).arg(
                Arg::new(negated.clone())
                    .long(negated)
                    .action(ArgAction::SetTrue)
                    .overrides_with(name)
                    .hide(true),
            );
        }

        for key in &self.string {
            let name = self.resolve(key);
            let arg = Arg::new(name.clone())
                .long(name.clone())
                .action(ArgAction::Set)
                .num_args(0..=1)
                .default_missing_value("");
            cmd = cmd.arg(self.with_alias(arg, &name));
        }

        for name in self.untyped() {
            let arg = Arg::new(name.clone())
                .long(name.clone())
                .action(ArgAction::Set)
                .num_args(0..=1)
                .default_missing_value("true");
            cmd = cmd.arg(self.with_alias(arg, &name));
        }

        for flag in RESERVED_FLAGS {
            if !self.declares(flag) {
                cmd = cmd.arg(Arg::new(flag).long(flag).action(ArgAction::SetTrue));
            }
        }

        cmd
    }

    /// Parse a flat token list.
    ///
    /// Declared booleans always end up in the result: given, negated, their
    /// default, or `false`. Strings appear only when given or defaulted.
    pub fn parse<I, T>(&self, args: I) -> Result<ParsedArgv>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        let matches = self
            .clap_command()
            .try_get_matches_from(args)
            .map_err(|e| {
                let rendered = e.to_string();
                let first = rendered.lines().next().unwrap_or_default();
                CliError::InvalidArgument(first.trim_start_matches("error: ").to_string())
            })?;

        let mut argv = ParsedArgv::default();

        for key in &self.boolean {
            let name = self.resolve(key);
            let given = if from_command_line(&matches, &format!("no-{}", name)) {
                Some(false)
            } else if from_command_line(&matches, &name) {
                Some(true)
            } else {
                None
            };
            let value = match given {
                Some(b) => ArgValue::Bool(b),
                None => self
                    .default
                    .get(key)
                    .cloned()
                    .unwrap_or(ArgValue::Bool(false)),
            };
            self.store(&mut argv, &name, value);
        }

        for key in &self.string {
            let name = self.resolve(key);
            let value = if from_command_line(&matches, &name) {
                matches.get_one::<String>(&name).cloned().map(ArgValue::Str)
            } else {
                self.default.get(key).cloned()
            };
            if let Some(value) = value {
                self.store(&mut argv, &name, value);
            }
        }

        for name in self.untyped() {
            let value = if from_command_line(&matches, &name) {
                matches.get_one::<String>(&name).map(|raw| match raw.as_str() {
                    "true" => ArgValue::Bool(true),
                    other => ArgValue::Str(other.to_string()),
                })
            } else {
                let key = self
                    .alias
                    .get(&name)
                    .map(|alias| alias.to_string())
                    .unwrap_or_else(|| name.clone());
                self.default.get(&key).cloned()
            };
            if let Some(value) = value {
                self.store(&mut argv, &name, value);
            }
        }

        for flag in RESERVED_FLAGS {
            if !self.declares(flag) && from_command_line(&matches, flag) {
                argv.values.insert(flag.to_string(), ArgValue::Bool(true));
            }
        }

        argv.positionals = matches
            .get_many::<String>(POSITIONAL)
            .map(|values| values.cloned().collect())
            .unwrap_or_default();

        Ok(argv)
    }

    /// Store under the name and, when declared, the alias too.
    fn store(&self, argv: &mut ParsedArgv, name: &str, value: ArgValue) {
        if let Some(alias) = self.alias.get(name) {
            argv.values.insert(alias.to_string(), value.clone());
        }
        argv.values.insert(name.to_string(), value);
    }
}

fn from_command_line(matches: &ArgMatches, id: &str) -> bool {
    matches.value_source(id) == Some(ValueSource::CommandLine)
}

/// Flags parsed for one command invocation.
///
/// Values are reachable by option name and by alias. Positional tokens
/// (the project directory, usually) are kept separately.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedArgv {
    values: IndexMap<String, ArgValue>,
    positionals: Vec<String>,
}

impl ParsedArgv {
    pub fn with_positionals(mut self, positionals: Vec<String>) -> Self {
        self.positionals = positionals;
        self
    }

    pub fn get(&self, key: &str) -> Option<&ArgValue> {
        self.values.get(key)
    }

    /// Boolean value of a flag, `None` when absent or not a boolean.
    pub fn flag(&self, key: &str) -> Option<bool> {
        self.get(key).and_then(ArgValue::as_bool)
    }

    /// Whether the flag is present with a truthy value.
    pub fn is_set(&self, key: &str) -> bool {
        self.get(key).is_some_and(ArgValue::is_truthy)
    }

    pub fn string(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(ArgValue::as_str)
    }

    pub fn positionals(&self) -> &[String] {
        &self.positionals
    }

    pub fn help(&self) -> bool {
        self.is_set("help")
    }

    pub fn version(&self) -> bool {
        self.is_set("version")
    }
}

impl<K: Into<String>> FromIterator<(K, ArgValue)> for ParsedArgv {
    fn from_iter<I: IntoIterator<Item = (K, ArgValue)>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
            positionals: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::CliOption;

    fn build_schema() -> OptionSchema {
        let mut schema = OptionSchema::new();
        schema.insert("spa".into(), CliOption::boolean().alias('s'));
        schema.insert(
            "config-file".into(),
            CliOption::string().alias('c').default_value("nuxt.config.json"),
        );
        schema.insert("analyze".into(), CliOption::boolean().alias('a'));
        schema.insert("generate".into(), CliOption::boolean().default_value(true));
        schema.insert("port".into(), CliOption::string().alias('p'));
        schema.insert("title".into(), CliOption::string());
        schema
    }

    fn parse(args: &[&str]) -> ParsedArgv {
        ParserConfig::from_schema(&build_schema())
            .unwrap()
            .parse(args.iter().copied())
            .unwrap()
    }

    #[test]
    fn test_parser_config_buckets() {
        let config = ParserConfig::from_schema(&build_schema()).unwrap();

        assert_eq!(
            config.alias.iter().map(|(k, v)| (k.as_str(), *v)).collect::<Vec<_>>(),
            vec![("spa", 's'), ("config-file", 'c'), ("analyze", 'a'), ("port", 'p')]
        );
        assert_eq!(config.boolean, vec!["s", "a", "generate"]);
        assert_eq!(config.string, vec!["c", "p", "title"]);
        assert_eq!(config.default.len(), 2);
        assert_eq!(config.default.get("c"), Some(&ArgValue::from("nuxt.config.json")));
        assert_eq!(config.default.get("generate"), Some(&ArgValue::Bool(true)));
    }

    #[test]
    fn test_untyped_options_stay_out_of_buckets() {
        let mut schema = OptionSchema::new();
        schema.insert("legacy".into(), CliOption::default().alias('l'));
        let config = ParserConfig::from_schema(&schema).unwrap();
        assert!(config.boolean.is_empty());
        assert!(config.string.is_empty());
        assert!(config.default.is_empty());
        assert_eq!(config.alias.get("legacy"), Some(&'l'));

        let argv = config.parse(["-l"]).unwrap();
        assert_eq!(argv.flag("legacy"), Some(true));
        let argv = config.parse(["--legacy", "x"]).unwrap();
        assert_eq!(argv.string("legacy"), Some("x"));
    }

    #[test]
    fn test_duplicate_alias_rejected() {
        let mut schema = OptionSchema::new();
        schema.insert("modern".into(), CliOption::boolean().alias('m'));
        schema.insert("minify".into(), CliOption::boolean().alias('m'));
        let err = ParserConfig::from_schema(&schema).unwrap_err();
        assert!(err.to_string().contains("alias -m"));
    }

    #[test]
    fn test_alias_colliding_with_option_name_rejected() {
        let mut schema = OptionSchema::new();
        schema.insert("x".into(), CliOption::boolean());
        schema.insert("xray".into(), CliOption::boolean().alias('x'));
        let err = ParserConfig::from_schema(&schema).unwrap_err();
        assert!(err.to_string().contains("--x and --xray"));
    }

    #[test]
    fn test_single_letter_names_without_alias() {
        let mut schema = OptionSchema::new();
        schema.insert("s".into(), CliOption::string());
        schema.insert("quiet".into(), CliOption::boolean().alias('q'));
        let config = ParserConfig::from_schema(&schema).unwrap();

        let argv = config.parse(["--s", "value", "-q"]).unwrap();
        assert_eq!(argv.string("s"), Some("value"));
        assert_eq!(argv.flag("quiet"), Some(true));
        assert_eq!(argv.flag("q"), Some(true));
    }

    #[test]
    fn test_booleans_default_to_false_or_declared_default() {
        let argv = parse(&[]);
        assert_eq!(argv.flag("analyze"), Some(false));
        assert_eq!(argv.flag("a"), Some(false));
        assert_eq!(argv.flag("generate"), Some(true));
        assert_eq!(argv.string("config-file"), Some("nuxt.config.json"));
        assert_eq!(argv.string("c"), Some("nuxt.config.json"));
        assert!(argv.get("port").is_none());
        assert!(!argv.help());
        assert!(!argv.version());
    }

    #[test]
    fn test_alias_and_negation() {
        let argv = parse(&["-a", "--no-generate"]);
        assert_eq!(argv.flag("analyze"), Some(true));
        assert_eq!(argv.flag("a"), Some(true));
        assert_eq!(argv.flag("generate"), Some(false));
    }

    #[test]
    fn test_last_of_flag_and_negation_wins() {
        assert_eq!(parse(&["--generate", "--no-generate"]).flag("generate"), Some(false));
        assert_eq!(parse(&["--no-generate", "--generate"]).flag("generate"), Some(true));
    }

    #[test]
    fn test_string_values() {
        assert_eq!(parse(&["-p", "4000"]).string("port"), Some("4000"));
        assert_eq!(parse(&["--port=4000"]).string("p"), Some("4000"));
        assert_eq!(parse(&["--port"]).string("port"), Some(""));
        assert_eq!(parse(&["-c", "other.json"]).string("config-file"), Some("other.json"));
    }

    #[test]
    fn test_positionals_are_collected() {
        let argv = parse(&["my-app", "-a"]);
        assert_eq!(argv.positionals(), ["my-app".to_string()]);
        assert_eq!(argv.flag("analyze"), Some(true));
    }

    #[test]
    fn test_reserved_flags_without_declaration() {
        let argv = parse(&["--help"]);
        assert!(argv.help());
        let argv = parse(&["--version"]);
        assert!(argv.version());
    }

    #[test]
    fn test_declared_help_uses_schema_alias() {
        let mut schema = build_schema();
        schema.insert("help".into(), CliOption::boolean().alias('h'));
        let argv = ParserConfig::from_schema(&schema).unwrap().parse(["-h"]).unwrap();
        assert!(argv.help());
    }

    #[test]
    fn test_unknown_flag_is_an_error() {
        let err = ParserConfig::from_schema(&build_schema())
            .unwrap()
            .parse(["--bogus"])
            .unwrap_err();
        assert!(matches!(err, CliError::InvalidArgument(_)));
        assert!(err.to_string().contains("--bogus"));
    }

    #[test]
    fn test_parsed_argv_from_iter() {
        let argv: ParsedArgv = [("generate", ArgValue::Bool(false))].into_iter().collect();
        assert_eq!(argv.flag("generate"), Some(false));
        assert!(!argv.is_set("generate"));
        assert!(argv.positionals().is_empty());
    }
}
