use std::path::PathBuf;

pub const DEFAULT_DATA_DIR: &str = "./fittrack-data";
pub const DEFAULT_TIMELINE_RANGE: usize = 30;

#[derive(Clone, Debug)]
pub struct Config {
    pub data_dir: PathBuf,
    pub timeline_range: usize,
    /// `None` when no food-database key is configured; search is then unavailable.
    pub food_db: Option<food_db_client::config::Config>,
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_env_with(|k| std::env::var(k).ok())
    }

    /// Testable helper that reads configuration values using the provided
    /// function instead of the process environment.
    pub fn from_env_with<F>(mut get: F) -> Self
    where
        F: FnMut(&str) -> Option<String>,
    {
        let data_dir = get("FITTRACK_DATA_DIR")
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR));
        let timeline_range = get("FITTRACK_TIMELINE_RANGE")
            .and_then(|v| v.trim().parse::<usize>().ok())
            .unwrap_or(DEFAULT_TIMELINE_RANGE)
            .max(1);
        let food_db = match food_db_client::config::Config::from_env_with(&mut get) {
            Ok(cfg) => Some(cfg),
            Err(e) => {
                tracing::debug!(error = %e, "food search disabled");
                None
            }
        };
        Self {
            data_dir,
            timeline_range,
            food_db,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_without_environment() {
        let cfg = Config::from_env_with(|_| None);
        assert_eq!(cfg.data_dir, PathBuf::from(DEFAULT_DATA_DIR));
        assert_eq!(cfg.timeline_range, 30);
        assert!(cfg.food_db.is_none());
    }

    #[test]
    fn reads_values_and_enforces_minimum_range() {
        let get = |k: &str| match k {
            "FITTRACK_DATA_DIR" => Some("/tmp/ft".into()),
            "FITTRACK_TIMELINE_RANGE" => Some("0".into()),
            "FOOD_DB_API_KEY" => Some("key".into()),
            _ => None,
        };
        let cfg = Config::from_env_with(get);
        assert_eq!(cfg.data_dir, PathBuf::from("/tmp/ft"));
        assert_eq!(cfg.timeline_range, 1);
        let food = cfg.food_db.expect("food db config");
        assert_eq!(food.base_url, food_db_client::config::DEFAULT_BASE_URL);
        assert_eq!(food.page_size, food_db_client::DEFAULT_PAGE_SIZE);
    }

    #[test]
    fn unparseable_range_uses_default() {
        let cfg = Config::from_env_with(|k| (k == "FITTRACK_TIMELINE_RANGE").then(|| "lots".into()));
        assert_eq!(cfg.timeline_range, DEFAULT_TIMELINE_RANGE);
    }
}
