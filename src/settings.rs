//! Environment-backed settings for the store URL and bind address.

#[derive(Clone, Debug)]
pub struct Settings {
    pub database_url: String,
    pub bind_addr: String,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            database_url: "sqlite::memory:".into(),
            bind_addr: "127.0.0.1:5000".into(),
        }
    }
}

impl Settings {
    /// Read `DATABASE_URL` and `BIND_ADDR` from the environment, falling
    /// back to the defaults. `.env` loading is the binary's concern.
    pub fn from_env() -> Self {
        let defaults = Settings::default();
        Settings {
            database_url: std::env::var("DATABASE_URL").unwrap_or(defaults.database_url),
            bind_addr: std::env::var("BIND_ADDR").unwrap_or(defaults.bind_addr),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_in_memory_and_loopback() {
        let s = Settings::default();
        assert_eq!(s.database_url, "sqlite::memory:");
        assert_eq!(s.bind_addr, "127.0.0.1:5000");
    }
}
