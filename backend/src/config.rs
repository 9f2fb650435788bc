use std::{env, net::SocketAddr};

/// Backend used when `PUBLIC_API_BASE_URL` is not set outside production.
pub const DEFAULT_API_BASE_URL: &str = "https://localhost:3000/api";

/// AppConfig
///
/// Holds the portal gateway's entire configuration state. Loaded once at startup and
/// never mutated afterwards; handlers and middleware pull it out of the application
/// state via FromRef.
#[derive(Clone, Debug)]
pub struct AppConfig {
    // Runtime environment marker. Decides whether the development bypass may be honored.
    pub env: Env,
    // Fabricate a session for visitors without a role cookie. Local exploration only.
    pub dev_bypass: bool,
    // Base URL of the travel backend API; request paths are appended to it.
    pub api_base_url: String,
    // Server-side page renderer allowed requests are forwarded to. `None` serves the
    // built-in page shell instead.
    pub portal_upstream: Option<String>,
    // Directory holding the built static assets (`_astro/`, `favicon.svg`).
    pub assets_dir: String,
    // Address the gateway listens on.
    pub bind_addr: SocketAddr,
}

/// Env
///
/// Runtime context. Local enables developer conveniences (bypass, self-signed backend
/// certificates); Production disables them regardless of other settings.
#[derive(Clone, PartialEq, Debug)]
pub enum Env {
    Local,
    Production,
}

impl Default for AppConfig {
    /// default
    ///
    /// Safe values for test state setup, no environment variables needed.
    fn default() -> Self {
        Self {
            env: Env::Local,
            dev_bypass: false,
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            portal_upstream: None,
            assets_dir: "dist/client".to_string(),
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 4321)),
        }
    }
}

/// parse_flag
///
/// Boolean-like environment flag: `"true"` in any letter case, surrounding whitespace
/// ignored. Everything else is false.
pub fn parse_flag(value: &str) -> bool {
    value.trim().eq_ignore_ascii_case("true")
}

impl AppConfig {
    /// load
    ///
    /// Reads the configuration from environment variables, failing fast.
    ///
    /// # Panics
    /// Panics when Production lacks `PUBLIC_API_BASE_URL` or `PORTAL_UPSTREAM_URL`, or
    /// when `PORTAL_PORT` is not a port number.
    pub fn load() -> Self {
        let env_str = env::var("APP_ENV").unwrap_or_else(|_| "local".to_string());
        let env = match env_str.as_str() {
            "production" => Env::Production,
            _ => Env::Local,
        };

        let requested_bypass = env::var("PUBLIC_IS_DEV")
            .map(|v| parse_flag(&v))
            .unwrap_or(false);

        let host: std::net::IpAddr = env::var("PORTAL_HOST")
            .unwrap_or_else(|_| "0.0.0.0".to_string())
            .parse()
            .expect("FATAL: PORTAL_HOST must be an IP address");
        let port: u16 = env::var("PORTAL_PORT")
            .unwrap_or_else(|_| "4321".to_string())
            .parse()
            .expect("FATAL: PORTAL_PORT must be a port number");
        let bind_addr = SocketAddr::new(host, port);

        let assets_dir =
            env::var("PORTAL_ASSETS_DIR").unwrap_or_else(|_| "dist/client".to_string());

        match env {
            Env::Local => Self {
                env: Env::Local,
                dev_bypass: requested_bypass,
                api_base_url: env::var("PUBLIC_API_BASE_URL")
                    .unwrap_or_else(|_| DEFAULT_API_BASE_URL.to_string()),
                portal_upstream: env::var("PORTAL_UPSTREAM_URL").ok(),
                assets_dir,
                bind_addr,
            },
            // PUBLIC_IS_DEV is ignored here: the bypass never runs in production.
            Env::Production => Self {
                env: Env::Production,
                dev_bypass: false,
                api_base_url: env::var("PUBLIC_API_BASE_URL")
                    .expect("FATAL: PUBLIC_API_BASE_URL required in prod"),
                portal_upstream: Some(
                    env::var("PORTAL_UPSTREAM_URL")
                        .expect("FATAL: PORTAL_UPSTREAM_URL required in prod"),
                ),
                assets_dir,
                bind_addr,
            },
        }
    }
}
