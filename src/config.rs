use anyhow::{Context, Result};
use std::env;
use std::path::PathBuf;

const DEFAULT_PAGE_SIZE: usize = 15;

#[derive(Clone, Debug)]
pub struct Config {
    /// `None` means the per-user data directory.
    pub db_path: Option<PathBuf>,
    pub page_size: usize,
}

impl Config {
    /// Reads `FARMREG_DB` and `FARMREG_PAGE_SIZE`, after loading `.env` if present.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let db_path = env::var("FARMREG_DB")
            .ok()
            .filter(|path| !path.trim().is_empty())
            .map(PathBuf::from);

        let page_size = match env::var("FARMREG_PAGE_SIZE") {
            Ok(raw) => parse_page_size(&raw).with_context(|| {
                format!("FARMREG_PAGE_SIZE must be a positive number, got '{}'", raw)
            })?,
            Err(_) => DEFAULT_PAGE_SIZE,
        };

        Ok(Config { db_path, page_size })
    }
}

fn parse_page_size(raw: &str) -> Result<usize> {
    let size: usize = raw.trim().parse()?;
    anyhow::ensure!(size > 0, "page size must be at least 1");
    Ok(size)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_page_size() {
        assert_eq!(parse_page_size(" 20 ").unwrap(), 20);
        assert!(parse_page_size("0").is_err());
        assert!(parse_page_size("-3").is_err());
        assert!(parse_page_size("many").is_err());
    }
}
