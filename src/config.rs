use anyhow::Context;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    pub ttl_hours: i64,
}

/// SMTP settings. All-or-nothing: when EMAIL_HOST is unset the service runs
/// with a log-only mailer instead.
#[derive(Debug, Clone, Deserialize)]
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    pub from: String,
    /// Restaurant inbox that receives new-reservation notifications.
    pub admin_to: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database_url: String,
    pub jwt: JwtConfig,
    pub otp_ttl_minutes: i64,
    pub smtp: Option<SmtpConfig>,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = std::env::var("DATABASE_URL").context("DATABASE_URL must be set")?;
        let jwt = JwtConfig {
            secret: std::env::var("JWT_SECRET").context("JWT_SECRET must be set")?,
            ttl_hours: std::env::var("JWT_TTL_HOURS")
                .ok()
                .and_then(|v| v.parse::<i64>().ok())
                .unwrap_or(24),
        };
        let otp_ttl_minutes = std::env::var("OTP_TTL_MINUTES")
            .ok()
            .and_then(|v| v.parse::<i64>().ok())
            .unwrap_or(10);

        let smtp = match std::env::var("EMAIL_HOST") {
            Ok(host) => Some(SmtpConfig {
                host,
                port: std::env::var("EMAIL_PORT")
                    .ok()
                    .and_then(|v| v.parse::<u16>().ok())
                    .unwrap_or(587),
                username: std::env::var("EMAIL_USER").context("EMAIL_USER must be set")?,
                password: std::env::var("EMAIL_PASSWORD").context("EMAIL_PASSWORD must be set")?,
                from: std::env::var("EMAIL_FROM").context("EMAIL_FROM must be set")?,
                admin_to: std::env::var("EMAIL_ADMIN_TO")
                    .or_else(|_| std::env::var("EMAIL_USER"))
                    .context("EMAIL_ADMIN_TO or EMAIL_USER must be set")?,
            }),
            Err(_) => None,
        };

        Ok(Self {
            database_url,
            jwt,
            otp_ttl_minutes,
            smtp,
        })
    }
}
