use anyhow::{Context, Result};

const DEFAULT_MODEL: &str = "gemini-2.5-flash";
const DEFAULT_ADMIN_EMAILS: &str = "admin@resume.com";
const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Application configuration loaded from environment variables.
/// Startup fails if required variables are missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub gemini_api_key: String,
    pub gemini_model: String,
    pub jwt_secret: String,
    pub jwt_expire_minutes: i64,
    /// Lowercased. Accounts registered with one of these get the admin role.
    pub admin_emails: Vec<String>,
    pub max_upload_bytes: usize,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            database_url: require_env("DATABASE_URL")?,
            gemini_api_key: require_env("GEMINI_API_KEY")?,
            gemini_model: std::env::var("GEMINI_MODEL")
                .unwrap_or_else(|_| DEFAULT_MODEL.to_string()),
            jwt_secret: require_env("JWT_SECRET")?,
            jwt_expire_minutes: std::env::var("JWT_EXPIRE_MINUTES")
                .unwrap_or_else(|_| "1440".to_string())
                .parse::<i64>()
                .context("JWT_EXPIRE_MINUTES must be an integer")?,
            admin_emails: parse_admin_emails(
                &std::env::var("ADMIN_EMAILS").unwrap_or_else(|_| DEFAULT_ADMIN_EMAILS.to_string()),
            ),
            max_upload_bytes: match std::env::var("MAX_UPLOAD_BYTES") {
                Ok(v) => v
                    .parse::<usize>()
                    .context("MAX_UPLOAD_BYTES must be a byte count")?,
                Err(_) => DEFAULT_MAX_UPLOAD_BYTES,
            },
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }

    pub fn is_admin_email(&self, email: &str) -> bool {
        let email = email.trim().to_lowercase();
        self.admin_emails.iter().any(|e| *e == email)
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn parse_admin_emails(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|e| e.trim().to_lowercase())
        .filter(|e| !e.is_empty())
        .collect()
}

#[cfg(test)]
pub(crate) fn test_config() -> Config {
    Config {
        database_url: "postgres://localhost/resume_analyzer_test".to_string(),
        gemini_api_key: "test-key".to_string(),
        gemini_model: DEFAULT_MODEL.to_string(),
        jwt_secret: "test-secret".to_string(),
        jwt_expire_minutes: 60,
        admin_emails: parse_admin_emails(DEFAULT_ADMIN_EMAILS),
        max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        port: 8080,
        rust_log: "info".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_admin_emails_trims_and_lowercases() {
        let emails = parse_admin_emails(" Admin@Resume.com, ops@example.org ,,");
        assert_eq!(emails, vec!["admin@resume.com", "ops@example.org"]);
    }

    #[test]
    fn test_is_admin_email_case_insensitive() {
        let config = test_config();
        assert!(config.is_admin_email("ADMIN@resume.com"));
        assert!(!config.is_admin_email("someone@resume.com"));
    }
}
