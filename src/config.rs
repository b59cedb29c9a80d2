use std::{net::SocketAddr, time::Duration};

use anyhow::Context;

const DEFAULT_BOXOFFICE_TIMEOUT_SECS: u64 = 10;

#[derive(Clone, Debug)]
pub struct Config {
    pub addr: SocketAddr,
    pub database_url: String,
    pub boxoffice_url: Option<String>,
    pub boxoffice_api_key: Option<String>,
    pub boxoffice_timeout: Duration,
    pub auth_token: Option<String>,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port: u16 =
            std::env::var("PORT").unwrap_or_else(|_| "8080".to_string()).parse().context("PORT")?;

        let database_url =
            non_blank("DB_URL").unwrap_or_else(|| "sqlite://marquee.db?mode=rwc".to_string());

        let boxoffice_timeout_secs =
            timeout_secs(std::env::var("BOXOFFICE_TIMEOUT_SECS").ok().as_deref());

        Ok(Self {
            addr: format!("{host}:{port}").parse().context("HOST/PORT")?,
            database_url,
            boxoffice_url: non_blank("BOXOFFICE_URL"),
            boxoffice_api_key: non_blank("BOXOFFICE_API_KEY"),
            boxoffice_timeout: Duration::from_secs(boxoffice_timeout_secs),
            auth_token: non_blank("AUTH_TOKEN"),
        })
    }
}

fn non_blank(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn timeout_secs(raw: Option<&str>) -> u64 {
    let Some(raw) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
        return DEFAULT_BOXOFFICE_TIMEOUT_SECS;
    };
    match raw.parse() {
        Ok(secs) => secs,
        Err(err) => {
            tracing::warn!(
                value = %raw,
                error = %err,
                default = DEFAULT_BOXOFFICE_TIMEOUT_SECS,
                "invalid BOXOFFICE_TIMEOUT_SECS, using default"
            );
            DEFAULT_BOXOFFICE_TIMEOUT_SECS
        },
    }
}
