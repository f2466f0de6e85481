//! Common utilities shared across CLI commands.

use anyhow::Result;

use crate::config::SiteConfig;
use crate::database::Database;
use crate::debug;

/// Load the configured database, if any.
pub fn load_database(config: &SiteConfig) -> Result<Option<Database>> {
    let Some(path) = &config.build.database else {
        return Ok(None);
    };

    let database = Database::load(path)?;
    debug!("database"; "{} entries from {}", database.len(), path.display());
    Ok(Some(database))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_load_database() {
        let dir = TempDir::new().unwrap();
        let mut config = SiteConfig::default();
        assert!(load_database(&config).unwrap().is_none());

        let path = dir.path().join("db.toml");
        fs::write(&path, "[hero]\nname = \"Bill\"\n").unwrap();
        config.build.database = Some(path);
        let database = load_database(&config).unwrap().unwrap();
        assert_eq!(database.get("hero").unwrap()["name"], "Bill");
    }
}
