//! Environment name to base URL table.

use std::collections::HashMap;

use crate::error::{ConfigurationError, Error};

use super::BaseUrl;

const PRODUCTION: &str = "https://api.currencycloud.com";
const DEMONSTRATION: &str = "https://devapi.currencycloud.com";

/// Static lookup table from environment name to API base URL.
///
/// The default table knows `production`, `demonstration` and its short
/// alias `demo`. Entries can be added or overridden, which is how tests
/// point a session at a stub server.
///
/// # Example
///
/// ```
/// use currencycloud_core::{BaseUrl, Environments};
///
/// let envs = Environments::default()
///     .with("local", BaseUrl::new("http://localhost:3000").unwrap());
/// assert!(envs.resolve("local").is_ok());
/// assert!(envs.resolve("staging").is_err());
/// ```
#[derive(Clone, Debug)]
pub struct Environments {
    table: HashMap<String, BaseUrl>,
}

impl Environments {
    /// An empty table. Every lookup fails until entries are added.
    pub fn empty() -> Self {
        Self {
            table: HashMap::new(),
        }
    }

    /// Add or replace an entry.
    pub fn with(mut self, name: impl Into<String>, base_url: BaseUrl) -> Self {
        self.insert(name, base_url);
        self
    }

    /// Add or replace an entry in place.
    pub fn insert(&mut self, name: impl Into<String>, base_url: BaseUrl) {
        self.table.insert(name.into(), base_url);
    }

    /// Resolve an environment name to its base URL.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError::UnknownEnvironment`] for names not in the table.
    pub fn resolve(&self, name: &str) -> Result<BaseUrl, Error> {
        self.table.get(name).cloned().ok_or_else(|| {
            ConfigurationError::UnknownEnvironment {
                name: name.to_string(),
            }
            .into()
        })
    }
}

impl Default for Environments {
    fn default() -> Self {
        let mut table = HashMap::new();
        for (name, url) in [
            ("production", PRODUCTION),
            ("demonstration", DEMONSTRATION),
            ("demo", DEMONSTRATION),
        ] {
            if let Ok(base) = BaseUrl::new(url) {
                table.insert(name.to_string(), base);
            }
        }
        Self { table }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_table_resolves_known_names() {
        let envs = Environments::default();
        assert_eq!(
            envs.resolve("production").unwrap().host(),
            Some("api.currencycloud.com")
        );
        assert_eq!(
            envs.resolve("demo").unwrap(),
            envs.resolve("demonstration").unwrap()
        );
    }

    #[test]
    fn unknown_name_is_configuration_error() {
        for name in ["", "Production", "staging", "uat "] {
            let err = Environments::default().resolve(name).unwrap_err();
            assert!(matches!(
                err,
                Error::Configuration(ConfigurationError::UnknownEnvironment { .. })
            ));
        }
    }

    #[test]
    fn with_overrides_existing_entry() {
        let local = BaseUrl::new("http://localhost:9000").unwrap();
        let envs = Environments::default().with("demo", local.clone());
        assert_eq!(envs.resolve("demo").unwrap(), local);
    }
}
