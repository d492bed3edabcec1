use {
    crate::error::Error,
    config::{Config, Environment, File},
    std::path::Path,
};

pub struct ConfigParser;

impl ConfigParser {
    /// Load a TOML file and overlay environment variables, `__` separating
    /// nested keys: `HUB__OWNER` overrides `hub.owner`.
    pub fn parse<D, P>(path: P) -> Result<D, Error>
    where
        D: serde::de::DeserializeOwned,
        P: AsRef<Path>,
    {
        let path = path.as_ref();

        if !path.exists() {
            return Err(Error::NotFound(path.display().to_string()));
        }

        Self::parse_with_prefix(path, None)
    }

    /// Like [`ConfigParser::parse`], but only variables starting with
    /// `{prefix}__` are considered, with the prefix stripped.
    pub fn parse_with_prefix<D>(path: &Path, prefix: Option<&str>) -> Result<D, Error>
    where
        D: serde::de::DeserializeOwned,
    {
        let mut env_override = Environment::default().separator("__");

        if let Some(prefix) = prefix {
            env_override = env_override.prefix(prefix).prefix_separator("__");
        }

        let config = Config::builder()
            .add_source(File::from(path))
            .add_source(env_override)
            .build()?;

        Ok(config.try_deserialize()?)
    }
}
