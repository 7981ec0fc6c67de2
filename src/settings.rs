//! Service configuration
//!
//! Every option can come from a CLI flag or its environment variable. The
//! five required values have no default, so the process exits at startup
//! when one is absent.

use clap::Parser;
use std::fmt;
use std::time::Duration;

use crate::error::{Result, ServiceError};

pub const DEFAULT_BROCHURE_URL: &str = "https://assets.irth.ae/marketing-assets/3.Rove%20Home%20Dubai%20Marina/3.Brochures/ROVE%20HOME%20DUBAI%20MARINA%20BROCHURE.pdf";

/// Log output format.
#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum LogFormat {
    Text,
    Json,
}

/// salescall-server: contact store, outbound VAPI calls, brochure Q&A.
#[derive(Clone, Parser)]
#[command(name = "salescall-server", version, about, long_about = None)]
pub struct Config {
    /// Contact store location: a file path, sqlite://PATH, or :memory:
    #[arg(long, env = "DATABASE_URL")]
    pub database_url: String,

    /// Address the HTTP API binds to
    #[arg(long, env = "SALESCALL_BIND", default_value = "0.0.0.0:8000")]
    pub bind: String,

    /// VAPI assistant placed on outbound calls
    #[arg(long, env = "VAPI_ASSISTANT_ID")]
    pub vapi_assistant_id: String,

    /// VAPI phone number the calls originate from
    #[arg(long, env = "VAPI_PHONE_NUMBER_ID")]
    pub vapi_phone_number_id: String,

    /// Bearer token for the VAPI API
    #[arg(long, env = "VAPI_API_KEY", hide_env_values = true)]
    pub vapi_api_key: String,

    #[arg(long, env = "VAPI_BASE_URL", default_value = "https://api.vapi.ai")]
    pub vapi_base_url: String,

    /// API key for the chat completion provider
    #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true)]
    pub openai_api_key: String,

    #[arg(long, env = "OPENAI_BASE_URL", default_value = "https://api.openai.com/v1")]
    pub openai_base_url: String,

    #[arg(long, env = "OPENAI_MODEL", default_value = "gpt-4o")]
    pub openai_model: String,

    /// PDF brochure used to answer questions
    #[arg(long, env = "BROCHURE_URL", default_value = DEFAULT_BROCHURE_URL)]
    pub brochure_url: String,

    /// Timeout applied to every outbound HTTP request
    #[arg(long, env = "HTTP_TIMEOUT_SECS", default_value_t = 30)]
    pub http_timeout_secs: u64,

    /// Log format: text (default) or json
    #[arg(long, value_enum, default_value = "text")]
    pub log_format: LogFormat,

    /// Verbosity level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl Config {
    /// Reject required values that are present but blank.
    pub fn validate(&self) -> Result<()> {
        let required = [
            ("DATABASE_URL", &self.database_url),
            ("VAPI_ASSISTANT_ID", &self.vapi_assistant_id),
            ("VAPI_PHONE_NUMBER_ID", &self.vapi_phone_number_id),
            ("VAPI_API_KEY", &self.vapi_api_key),
            ("OPENAI_API_KEY", &self.openai_api_key),
        ];
        for (name, value) in required {
            if value.trim().is_empty() {
                return Err(ServiceError::config(format!(
                    "Environment variable {} is not set. Please check your environment.",
                    name
                )));
            }
        }
        if self.http_timeout_secs == 0 {
            return Err(ServiceError::config("HTTP_TIMEOUT_SECS must be greater than zero"));
        }
        Ok(())
    }

    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs)
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("database_url", &self.database_url)
            .field("bind", &self.bind)
            .field("vapi_assistant_id", &self.vapi_assistant_id)
            .field("vapi_phone_number_id", &self.vapi_phone_number_id)
            .field("vapi_api_key", &mask_secret(&self.vapi_api_key))
            .field("vapi_base_url", &self.vapi_base_url)
            .field("openai_api_key", &mask_secret(&self.openai_api_key))
            .field("openai_base_url", &self.openai_base_url)
            .field("openai_model", &self.openai_model)
            .field("brochure_url", &self.brochure_url)
            .field("http_timeout_secs", &self.http_timeout_secs)
            .field("log_format", &self.log_format)
            .field("verbose", &self.verbose)
            .finish()
    }
}

/// Mask a secret for display (shows first 8 / last 4 chars of long keys)
pub fn mask_secret(key: &str) -> String {
    let chars: Vec<char> = key.chars().collect();
    if chars.len() > 12 {
        let head: String = chars[..8].iter().collect();
        let tail: String = chars[chars.len() - 4..].iter().collect();
        format!("{}...{}", head, tail)
    } else {
        "*".repeat(chars.len())
    }
}
