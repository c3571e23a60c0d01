use std::env;

/// Direct origin of the ElCentre backend, used when running locally.
pub const ORIGIN_API_URL: &str = "http://elcentre.runasp.net";

/// Public deployment URL. In production every backend call and image goes
/// through the `/api` reverse proxy mounted on this origin.
pub const PRODUCTION_URL: &str = "https://elcentre.vercel.app";

/// Served when a lesson or course has no image at all.
pub const PLACEHOLDER_IMAGE: &str = "/placeholder.svg";

const LOCAL_SESSION_SECRET: &str = "super-secure-test-secret-value-local";

/// AppConfig
///
/// Holds the portal's configuration. Loaded once at startup and shared through
/// `AppState` via `FromRef`, so every handler sees the same immutable values.
#[derive(Clone, Debug)]
pub struct AppConfig {
    // Runtime environment marker. Selects the API base URL and the dev auth bypass.
    pub env: Env,
    // Base URL for every lesson API call (direct origin locally, proxy path in prod).
    pub api_base_url: String,
    // Public origin of the portal deployment, used to build proxied image URLs.
    pub public_url: String,
    // Secret used to verify incoming session JWTs.
    pub jwt_secret: String,
    // Socket address the HTTP server binds to.
    pub bind_addr: String,
}

/// Env
///
/// The build mode. `Local` talks to the backend origin directly, `Production`
/// goes through the reverse-proxied `/api` path.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Env {
    Local,
    Production,
}

impl Default for AppConfig {
    /// Non-panicking configuration for tests.
    fn default() -> Self {
        Self {
            env: Env::Local,
            api_base_url: ORIGIN_API_URL.to_string(),
            public_url: PRODUCTION_URL.to_string(),
            jwt_secret: LOCAL_SESSION_SECRET.to_string(),
            bind_addr: "0.0.0.0:3000".to_string(),
        }
    }
}

impl AppConfig {
    /// load
    ///
    /// Reads the configuration from environment variables.
    ///
    /// # Panics
    /// Panics in `Env::Production` when `SESSION_JWT_SECRET` is missing, so the
    /// portal never starts verifying sessions against a known dev secret.
    pub fn load() -> Self {
        let env = match env::var("APP_ENV").as_deref() {
            Ok("production") => Env::Production,
            _ => Env::Local,
        };

        let jwt_secret = match env {
            Env::Production => env::var("SESSION_JWT_SECRET")
                .expect("FATAL: SESSION_JWT_SECRET must be set in production."),
            Env::Local => env::var("SESSION_JWT_SECRET")
                .unwrap_or_else(|_| LOCAL_SESSION_SECRET.to_string()),
        };

        let public_url = env::var("PUBLIC_URL")
            .map(|url| url.trim_end_matches('/').to_string())
            .unwrap_or_else(|_| PRODUCTION_URL.to_string());

        let api_base_url = match env {
            Env::Production => format!("{}/api", public_url),
            Env::Local => env::var("API_BASE_URL")
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or_else(|_| ORIGIN_API_URL.to_string()),
        };

        let bind_addr = env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string());

        Self {
            env,
            api_base_url,
            public_url,
            jwt_secret,
            bind_addr,
        }
    }

    /// image_url
    ///
    /// Normalizes a partial image path coming from the backend into an absolute
    /// URL the browser can load.
    pub fn image_url(&self, path: Option<&str>) -> String {
        let path = match path {
            Some(p) if !p.is_empty() => p,
            _ => return PLACEHOLDER_IMAGE.to_string(),
        };

        if path.starts_with("http") || path.contains(ORIGIN_API_URL) {
            return path.to_string();
        }

        let clean_path = path.strip_prefix('/').unwrap_or(path);

        match self.env {
            Env::Production => format!("{}/api/{}", self.public_url, clean_path),
            Env::Local => format!("{}/{}", ORIGIN_API_URL, clean_path),
        }
    }
}
