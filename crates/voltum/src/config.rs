use std::path::Path;
use std::str::FromStr;

use serde::Deserialize;

use crate::VoltumError;

/// Grammar root a parse starts from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryPoint {
    #[default]
    Program,
    Expression,
    Statement,
    Block,
}

impl FromStr for EntryPoint {
    type Err = VoltumError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "program" => Ok(EntryPoint::Program),
            "expression" | "expr" => Ok(EntryPoint::Expression),
            "statement" | "stmt" => Ok(EntryPoint::Statement),
            "block" => Ok(EntryPoint::Block),
            other => Err(VoltumError::Config(format!("unknown entry point `{other}`"))),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct VoltumToml {
    #[serde(default)]
    pub parser: ParseOptions,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ParseOptions {
    #[serde(default)]
    pub entry: EntryPoint,
    /// Maximum number of nested rule invocations.
    #[serde(default = "default_max_depth")]
    pub max_depth: u32,
    /// How often one rule may be active at the same token position.
    #[serde(default = "default_reentry_limit")]
    pub reentry_limit: u32,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            entry: EntryPoint::default(),
            max_depth: default_max_depth(),
            reentry_limit: default_reentry_limit(),
        }
    }
}

impl ParseOptions {
    pub fn with_entry(entry: EntryPoint) -> Self {
        Self {
            entry,
            ..Self::default()
        }
    }
}

fn default_max_depth() -> u32 {
    512
}

fn default_reentry_limit() -> u32 {
    4
}

pub fn read_voltum_toml(path: &Path) -> Result<VoltumToml, VoltumError> {
    let text = std::fs::read_to_string(path)?;
    parse_voltum_toml(&text)
        .map_err(|err| VoltumError::Config(format!("failed to parse {}: {err}", path.display())))
}

fn parse_voltum_toml(text: &str) -> Result<VoltumToml, toml::de::Error> {
    toml::from_str(text)
}

pub fn load_options(path: &Path) -> Result<ParseOptions, VoltumError> {
    Ok(read_voltum_toml(path)?.parser)
}
