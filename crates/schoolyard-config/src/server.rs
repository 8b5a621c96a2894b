#[derive(Clone, Debug)]
pub struct ServerConfig {
    /// Address the HTTP listener binds to (`SERVER_ADDR`, default `0.0.0.0:3000`)
    pub addr: String,
    /// Address of the Prometheus scrape listener (`METRICS_ADDR`, default `0.0.0.0:9000`)
    pub metrics_addr: String,
}

impl ServerConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(crate::env_lookup)
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Self {
            addr: lookup("SERVER_ADDR").unwrap_or_else(|| "0.0.0.0:3000".to_string()),
            metrics_addr: lookup("METRICS_ADDR").unwrap_or_else(|| "0.0.0.0:9000".to_string()),
        }
    }
}
