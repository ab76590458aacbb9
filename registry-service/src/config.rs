use serde::Deserialize;
use std::fs;

#[derive(Debug, Clone, Deserialize)]
pub struct GridConfig {
    /// The one identity allowed to write grid-status updates.
    pub owner_identity: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub grid: GridConfig,
}

impl AppConfig {
    /// Load from the path in `REGISTRY_CONFIG`, falling back to
    /// `registry-config.toml` in the working directory.
    pub fn load() -> anyhow::Result<Self> {
        use std::env;

        let path = env::var("REGISTRY_CONFIG").unwrap_or_else(|_| "registry-config.toml".to_string());
        let contents = fs::read_to_string(&path)?;
        let cfg: AppConfig = toml::from_str(&contents)?;
        Ok(cfg)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_owner_identity() {
        let cfg: AppConfig = toml::from_str(
            r#"
            [grid]
            owner_identity = "ST1PQHQKV0RJXZFY1DGX8MNSNYVE3VGZJSRTPGZGM"
            "#,
        )
        .unwrap();
        assert_eq!(
            cfg.grid.owner_identity,
            "ST1PQHQKV0RJXZFY1DGX8MNSNYVE3VGZJSRTPGZGM"
        );
    }

    #[test]
    fn rejects_config_without_owner() {
        let res: Result<AppConfig, _> = toml::from_str("[grid]\n");
        assert!(res.is_err());
    }
}
