//! Resolver configuration, usually a section of a larger TOML document.
//!
//! ```toml
//! [coercion]
//! list_into_array = "reject"
//! int_as_float = true
//! ```

#[derive(Debug, Default, serde::Deserialize, Clone, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct ResolverConfig {
    pub coercion: CoercionConfig,
}

#[derive(Debug, serde::Deserialize, Clone, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct CoercionConfig {
    /// What to do with a list-like argument bound to a fixed-size array parameter.
    pub list_into_array: ListIntoArray,
    /// Whether ints are accepted for `Float` parameters.
    pub int_as_float: bool,
}

impl Default for CoercionConfig {
    fn default() -> Self {
        Self {
            list_into_array: ListIntoArray::Reject,
            int_as_float: true,
        }
    }
}

#[derive(Debug, Default, serde::Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ListIntoArray {
    /// Fail with a coercion error.
    #[default]
    Reject,
    /// Copy the items into an array, coercing each of them.
    Convert,
}

#[derive(Debug, thiserror::Error)]
#[error("Invalid resolver configuration: {0}")]
pub struct ConfigError(#[from] toml::de::Error);

impl ResolverConfig {
    pub fn from_toml(input: &str) -> Result<Self, ConfigError> {
        toml::from_str(input).map_err(Into::into)
    }
}
