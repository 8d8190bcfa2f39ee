//! Option schemas, argument parsing and help rendering.
//!
//! Commands declare their flags as an [`OptionSchema`]. From it the CLI
//! derives a [`ParserConfig`], parses the argument list into a
//! [`ParsedArgv`], and renders the help page.

mod argv;
pub mod help;
mod option;

pub use argv::{ParsedArgv, ParserConfig, RESERVED_FLAGS};
pub use option::{ArgValue, CliOption, Mutator, OptionSchema, OptionType};
