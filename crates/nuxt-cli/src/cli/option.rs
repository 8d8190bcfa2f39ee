//! Declarative option schema.
//!
//! Every command declares its flags as an ordered table of [`CliOption`]s.
//! The table drives three things: the parser configuration, the help text,
//! and the mutator hooks that write CLI overrides into the options tree.

use indexmap::IndexMap;

use crate::cli::ParsedArgv;
use crate::command::NuxtCommand;
use crate::config::OptionsTree;
use crate::error::Result;

/// Parser bucket an option belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionType {
    /// Flag without a value; negatable with `--no-<name>`
    Boolean,
    /// Flag taking a single value
    String,
}

/// Value of a parsed flag or a declared default.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArgValue {
    Bool(bool),
    Str(String),
}

impl ArgValue {
    /// Truthiness the way a shell user reads it: `false` and `""` are off.
    pub fn is_truthy(&self) -> bool {
        match self {
            ArgValue::Bool(b) => *b,
            ArgValue::Str(s) => !s.is_empty(),
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            ArgValue::Bool(b) => Some(*b),
            ArgValue::Str(_) => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            ArgValue::Str(s) => Some(s),
            ArgValue::Bool(_) => None,
        }
    }
}

impl From<bool> for ArgValue {
    fn from(value: bool) -> Self {
        ArgValue::Bool(value)
    }
}

impl From<&str> for ArgValue {
    fn from(value: &str) -> Self {
        ArgValue::Str(value.to_string())
    }
}

impl From<String> for ArgValue {
    fn from(value: String) -> Self {
        ArgValue::Str(value)
    }
}

/// Hook run during config composition.
///
/// Receives the command, the options tree being composed and the parsed
/// argv. Hooks run in schema order and should do nothing when their flag is
/// absent.
pub type Mutator = fn(&NuxtCommand, &mut OptionsTree, &ParsedArgv) -> Result<()>;

/// One entry of a command's option schema.
///
/// The option name is the key it is stored under in [`OptionSchema`].
///
/// ```
/// use nuxt_cli::cli::{CliOption, OptionType};
///
/// let generate = CliOption::boolean()
///     .default_value(true)
///     .describe("Don't generate static version for SPA mode");
/// assert_eq!(generate.kind, Some(OptionType::Boolean));
/// assert!(generate.is_negatable());
/// ```
#[derive(Clone, Default)]
pub struct CliOption {
    pub alias: Option<char>,
    pub kind: Option<OptionType>,
    pub default: Option<ArgValue>,
    pub description: String,
    pub mutator: Option<Mutator>,
}

impl CliOption {
    /// A boolean flag.
    pub fn boolean() -> Self {
        Self {
            kind: Some(OptionType::Boolean),
            ..Self::default()
        }
    }

    /// A flag that takes a value.
    pub fn string() -> Self {
        Self {
            kind: Some(OptionType::String),
            ..Self::default()
        }
    }

    pub fn alias(mut self, alias: char) -> Self {
        self.alias = Some(alias);
        self
    }

    pub fn default_value(mut self, value: impl Into<ArgValue>) -> Self {
        self.default = Some(value.into());
        self
    }

    pub fn describe(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn mutator(mut self, mutator: Mutator) -> Self {
        self.mutator = Some(mutator);
        self
    }

    /// Boolean flags that default to on are shown as `--no-<name>`.
    pub fn is_negatable(&self) -> bool {
        self.kind == Some(OptionType::Boolean)
            && self.default.as_ref().is_some_and(ArgValue::is_truthy)
    }
}

impl std::fmt::Debug for CliOption {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CliOption")
            .field("alias", &self.alias)
            .field("kind", &self.kind)
            .field("default", &self.default)
            .field("description", &self.description)
            .field("mutator", &self.mutator.is_some())
            .finish()
    }
}

/// Ordered option table, keyed by option name.
pub type OptionSchema = IndexMap<String, CliOption>;
