use std::fmt;

/// Custom error type for monphon operations
/// Implements Clone for sending through channels
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error
{   /// No API key configured, checked before any network attempt
    MissingCredential
  , /// API key rejected by the endpoint (HTTP 403)
    AuthRejected
  , /// Malformed request (HTTP 400), with server message if any
    BadRequest(String)
  , /// Rate limit exceeded (HTTP 429)
    RateLimited
  , /// Any other non-success HTTP status
    ApiError
    {   status: u16
      , message: String
    }
  , /// Transport-level HTTP failure
    HttpError(String)
  , /// Success status but no generated text in the response
    EmptyResponse
  , /// Generated text was not valid JSON
    ParseError(String)
  , /// Parsed JSON missing or blanking a required field
    IncompleteResult(String)
  , /// Story generation invoked with an empty letter set
    NoLettersSelected
  , /// All attempts failed; carries the rendered last error
    RetriesExhausted
    {   attempts: usize
      , last: String
    }
  , /// Generic error
    Other(String)
}

impl Error
{   /// Whether another attempt may be made for this failure.
    /// Incomplete payloads retry exactly like transport faults;
    /// a permanently bad schema contract will burn the whole
    /// backoff window before surfacing.
    pub fn is_retryable(&self) -> bool
    {   match self
        {   Error::RateLimited => true
          , Error::ApiError { .. } => true
          , Error::HttpError(_) => true
          , Error::EmptyResponse => true
          , Error::ParseError(_) => true
          , Error::IncompleteResult(_) => true
          , _ => false
        }
    }
}

impl fmt::Display for Error
{   fn fmt(&self, f: &mut fmt::Formatter<'_>)
      -> fmt::Result
    {   match self
        {   Error::MissingCredential => {
              write!(f,
                "API key not configured. Please set {} in your \
                 environment variables.",
                crate::config::API_KEY_ENV
              )
            }
          , Error::AuthRejected => {
              write!(f,
                "API key is invalid or missing. Please check your \
                 {} environment variable.",
                crate::config::API_KEY_ENV
              )
            }
          , Error::BadRequest(msg) => {
              write!(f, "Invalid request: {}", msg)
            }
          , Error::RateLimited => {
              write!(f,
                "Rate limit exceeded. Please try again later."
              )
            }
          , Error::ApiError { status, message } => {
              write!(f,
                "HTTP error! status: {} ({})",
                status, message
              )
            }
          , Error::HttpError(msg) => {
              write!(f, "HTTP error: {}", msg)
            }
          , Error::EmptyResponse => {
              write!(f, "Invalid response format from API.")
            }
          , Error::ParseError(msg) => {
              write!(f, "Parse error: {}", msg)
            }
          , Error::IncompleteResult(field) => {
              write!(f,
                "Invalid response format: missing or empty \
                 field '{}'.",
                field
              )
            }
          , Error::NoLettersSelected => {
              write!(f, "Please select at least one letter.")
            }
          , Error::RetriesExhausted { attempts, last } => {
              write!(f,
                "Could not generate text after {} attempts. \
                 Please try again. (last error: {})",
                attempts, last
              )
            }
          , Error::Other(msg) => {
              write!(f, "Error: {}", msg)
            }
        }
    }
}

impl std::error::Error for Error {}

impl From<String> for Error
{   fn from(s: String) -> Self
    {   Error::Other(s)
    }
}

impl From<&str> for Error
{   fn from(s: &str) -> Self
    {   Error::Other(s.to_string())
    }
}
