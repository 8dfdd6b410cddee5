use std::env;

use fsp_common::{helpers::parse_boolean_flag, Secret};
use fsp_engine::{sqlite_db::db_url, OrderFlowConfig, DEFAULT_ORDER_WRITE_ATTEMPTS};
use log::*;
use rand::{distributions::Alphanumeric, thread_rng, Rng};
use razorpay_tools::RazorpayConfig;

use crate::errors::ServerError;

const DEFAULT_FSP_HOST: &str = "127.0.0.1";
const DEFAULT_FSP_PORT: u16 = 8360;
const MIN_JWT_SECRET_LENGTH: usize = 32;

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    pub auth: AuthConfig,
    pub razorpay: RazorpayConfig,
    /// When true, create-order requests whose total does not match the price breakdown are rejected.
    pub strict_totals: bool,
    /// How many times the local order write is attempted after the gateway order has been created.
    pub order_write_attempts: u32,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_FSP_HOST.to_string(),
            port: DEFAULT_FSP_PORT,
            database_url: db_url(),
            auth: AuthConfig::default(),
            razorpay: RazorpayConfig::default(),
            strict_totals: true,
            order_write_attempts: DEFAULT_ORDER_WRITE_ATTEMPTS,
        }
    }
}

impl ServerConfig {
    pub fn new(host: &str, port: u16) -> Self {
        Self { host: host.to_string(), port, ..Default::default() }
    }

    pub fn from_env_or_default() -> Self {
        let host = env::var("FSP_HOST").ok().unwrap_or_else(|| DEFAULT_FSP_HOST.into());
        let port = env::var("FSP_PORT")
            .map(|s| {
                s.parse::<u16>().unwrap_or_else(|e| {
                    error!(
                        "🪛️ {s} is not a valid port for FSP_PORT. {e} Using the default, {DEFAULT_FSP_PORT}, instead."
                    );
                    DEFAULT_FSP_PORT
                })
            })
            .ok()
            .unwrap_or(DEFAULT_FSP_PORT);
        let database_url = db_url();
        let auth = AuthConfig::try_from_env().unwrap_or_else(|e| {
            warn!(
                "🪛️ Could not load the authentication configuration from environment variables. {e}. Reverting to the \
                 default configuration."
            );
            AuthConfig::default()
        });
        let razorpay = RazorpayConfig::new_from_env_or_default();
        let strict_totals = parse_boolean_flag(env::var("FSP_STRICT_TOTALS").ok(), true);
        if !strict_totals {
            warn!("🪛️ FSP_STRICT_TOTALS is off. Order totals supplied by clients will be trusted as-is.");
        }
        let order_write_attempts = configure_order_write_attempts();
        Self { host, port, database_url, auth, razorpay, strict_totals, order_write_attempts }
    }

    pub fn order_flow(&self) -> OrderFlowConfig {
        OrderFlowConfig { strict_totals: self.strict_totals, write_attempts: self.order_write_attempts }
    }
}

fn configure_order_write_attempts() -> u32 {
    env::var("FSP_ORDER_WRITE_ATTEMPTS")
        .ok()
        .and_then(|s| {
            s.parse::<u32>()
                .ok()
                .filter(|n| *n > 0)
                .or_else(|| {
                    warn!(
                        "🪛️ {s} is not a valid value for FSP_ORDER_WRITE_ATTEMPTS. Using the default, \
                         {DEFAULT_ORDER_WRITE_ATTEMPTS}, instead."
                    );
                    None
                })
        })
        .unwrap_or(DEFAULT_ORDER_WRITE_ATTEMPTS)
}

//--------------------------------------      AuthConfig       ---------------------------------------------------------
#[derive(Clone, Debug)]
pub struct AuthConfig {
    /// The HS256 secret shared with the service that issues customer tokens.
    pub jwt_secret: Secret<String>,
}

impl Default for AuthConfig {
    fn default() -> Self {
        let secret = thread_rng().sample_iter(&Alphanumeric).take(64).map(char::from).collect::<String>();
        warn!(
            "🚨️ No JWT secret was configured, so a random one has been generated. Tokens issued by any other service \
             will be rejected, and tokens issued by this server will not survive a restart. Set FSP_JWT_SECRET to fix \
             this."
        );
        Self { jwt_secret: Secret::new(secret) }
    }
}

impl AuthConfig {
    pub fn new<S: Into<String>>(secret: S) -> Self {
        Self { jwt_secret: Secret::new(secret.into()) }
    }

    pub fn try_from_env() -> Result<Self, ServerError> {
        let secret = env::var("FSP_JWT_SECRET")
            .map_err(|e| ServerError::ConfigurationError(format!("FSP_JWT_SECRET is not set. {e}")))?;
        let secret = secret.trim().to_string();
        if secret.is_empty() {
            return Err(ServerError::ConfigurationError("FSP_JWT_SECRET is empty".into()));
        }
        if secret.len() < MIN_JWT_SECRET_LENGTH {
            warn!(
                "🔐️ FSP_JWT_SECRET is shorter than {MIN_JWT_SECRET_LENGTH} characters. Consider using a longer secret."
            );
        }
        Ok(Self::new(secret))
    }
}
