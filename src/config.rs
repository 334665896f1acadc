use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;

use anyhow::Context;

pub const DEFAULT_PORT: u16 = 8080;

#[derive(Debug, Clone)]
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub pass: String,
    pub from: String,
}

impl SmtpConfig {
    /// `None` unless host, a non-zero port, user and password are all present.
    pub fn from_env() -> Option<Self> {
        let host = non_empty_var("SMTP_HOST")?;
        let port = non_empty_var("SMTP_PORT")?
            .parse::<u16>()
            .ok()
            .filter(|p| *p != 0)?;
        let user = non_empty_var("SMTP_USER")?;
        let pass = non_empty_var("SMTP_PASS")?;
        let from = non_empty_var("SMTP_FROM").unwrap_or_else(|| user.clone());
        Some(Self {
            host,
            port,
            user,
            pass,
            from,
        })
    }

    /// Port 465 speaks TLS from the first byte; every other port upgrades with STARTTLS.
    pub fn implicit_tls(&self) -> bool {
        self.port == 465
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind_addr: SocketAddr,
    pub database_url: Option<String>,
    pub data_dir: PathBuf,
    pub smtp: Option<SmtpConfig>,
    pub site_url: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::new(IpAddr::V4(Ipv4Addr::UNSPECIFIED), DEFAULT_PORT),
            database_url: None,
            data_dir: PathBuf::from("data"),
            smtp: None,
            site_url: None,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let data_dir = non_empty_var("DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("data"));
        let bind_addr = bind_addr(
            non_empty_var("APP_HOST").as_deref(),
            non_empty_var("APP_PORT").as_deref(),
        )?;
        Ok(Self {
            bind_addr,
            database_url: non_empty_var("DATABASE_URL"),
            data_dir,
            smtp: SmtpConfig::from_env(),
            site_url: std::env::var("SITE_URL")
                .ok()
                .and_then(|raw| normalize_site_url(&raw)),
        })
    }
}

/// Accepts only absolute http(s) URLs; placeholder values leaked from templating are ignored.
pub fn normalize_site_url(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    let lower = trimmed.to_ascii_lowercase();
    if trimmed.is_empty() || lower == "undefined" || lower == "null" || !lower.starts_with("http")
    {
        return None;
    }
    Some(trimmed.trim_end_matches('/').to_string())
}

/// Host defaults to all interfaces, port to 8080.
pub fn bind_addr(host: Option<&str>, port: Option<&str>) -> anyhow::Result<SocketAddr> {
    let ip: IpAddr = match host {
        Some(h) => h.parse().with_context(|| format!("APP_HOST is not an ip address: {h}"))?,
        None => IpAddr::V4(Ipv4Addr::UNSPECIFIED),
    };
    let port = match port {
        Some(p) => p.parse().with_context(|| format!("APP_PORT is not a port: {p}"))?,
        None => DEFAULT_PORT,
    };
    Ok(SocketAddr::new(ip, port))
}

fn non_empty_var(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
