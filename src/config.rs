//! Configuration for the Gemini endpoint and credential

use serde::{Deserialize, Serialize};
use log::debug;

/// Model served by the generateContent endpoint
pub const GEMINI_MODEL: &str
  = "gemini-2.5-flash-preview-09-2025";

/// Base URL of the generative language service
pub const API_BASE: &str
  = "https://generativelanguage.googleapis.com";

/// Environment variable holding the API credential
pub const API_KEY_ENV: &str = "GEMINI_API_KEY";

/// Gemini client configuration
///
/// The credential is injected here once and treated as
/// immutable for the lifetime of the value; it is never
/// re-read from the process environment mid-call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeminiConfig
{   /// API credential; None when unconfigured
    pub api_key: Option<String>
  , /// Model identifier
    pub model: String
  , /// API base URL (if custom)
    pub api_base: String
  , /// Request timeout in seconds
    pub timeout_secs: Option<u64>
}

impl GeminiConfig
{   /// Create a configuration with an explicit credential
    pub fn new(api_key: Option<String>) -> Self
    {   GeminiConfig
        {   api_key
          , model: GEMINI_MODEL.to_string()
          , api_base: API_BASE.to_string()
          , timeout_secs: None
        }
    }

    /// Read the credential from the environment, once
    pub fn from_env() -> Self
    {   let api_key = std::env::var(API_KEY_ENV).ok();
        debug!(
          "Loading config from env, key present: {}",
          api_key.is_some()
        );
        GeminiConfig::new(api_key)
    }

    /// Override the base URL (mock transports in tests)
    pub fn with_api_base(mut self, api_base: &str) -> Self
    {   self.api_base = api_base.to_string();
        self
    }

    /// Override the model identifier
    pub fn with_model(mut self, model: &str) -> Self
    {   self.model = model.to_string();
        self
    }

    /// Whether a usable credential is present
    pub fn is_configured(&self) -> bool
    {   match &self.api_key
        {   Some(key) => !key.is_empty()
          , None => false
        }
    }

    /// Full generateContent URL including the key parameter
    pub fn generate_url(&self)
      -> Result<String, crate::error::Error>
    {   let key = self.api_key.as_deref()
          .filter(|k| !k.is_empty())
          .ok_or(crate::error::Error::MissingCredential)?;
        Ok(format!(
          "{}/v1beta/models/{}:generateContent?key={}",
          self.api_base, self.model, key
        ))
    }
}

impl Default for GeminiConfig
{   fn default() -> Self
    {   GeminiConfig::new(None)
    }
}
