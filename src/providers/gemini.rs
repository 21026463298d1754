use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use log::{debug, trace, error, info};
use std::time::Duration;

use crate::request::
{ GenerationRequest
, GeneratedKind
, GeneratedSentence
, GeneratedStory
, ResponseSchema
};
use crate::retry::{RetryPolicy, RetryState};

// ===== Wire Types =====

/// generateContent request body
#[derive(Debug, Clone, Serialize)]
pub struct GenerateContentBody
{   pub contents: Vec<Content>
  , #[serde(rename = "systemInstruction")]
    pub system_instruction: Content
  , #[serde(rename = "generationConfig")]
    pub generation_config: GenerationConfig
}

#[derive(Debug, Clone, Serialize)]
pub struct Content
{   pub parts: Vec<Part>
}

#[derive(Debug, Clone, Serialize)]
pub struct Part
{   pub text: String
}

#[derive(Debug, Clone, Serialize)]
pub struct GenerationConfig
{   #[serde(rename = "responseMimeType")]
    pub response_mime_type: String
  , #[serde(rename = "responseSchema")]
    pub response_schema: ResponseSchema
}

/// generateContent response envelope
/// Every level is tolerant of omission; an empty path to
/// the text is reported as EmptyResponse, not a parse error
#[derive(Debug, Clone, Deserialize)]
pub struct GenerateContentResponse
{   #[serde(default)]
    pub candidates: Vec<Candidate>
}

#[derive(Debug, Clone, Deserialize)]
pub struct Candidate
{   pub content: Option<CandidateContent>
}

#[derive(Debug, Clone, Deserialize)]
pub struct CandidateContent
{   #[serde(default)]
    pub parts: Vec<ResponsePart>
}

#[derive(Debug, Clone, Deserialize)]
pub struct ResponsePart
{   pub text: Option<String>
}

/// Error envelope consulted on HTTP 400
#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorEnvelope
{   pub error: Option<ApiErrorDetail>
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorDetail
{   pub message: Option<String>
}

// ===== Gemini Client State =====

/// Gemini client state
/// Cheap to clone; every generation task gets its own copy
#[derive(Debug, Clone)]
pub struct GeminiClientState
{   config: crate::config::GeminiConfig
  , policy: RetryPolicy
  , http_client: reqwest::Client
}

impl GeminiClientState
{   pub fn new(
      config: crate::config::GeminiConfig
    , policy: RetryPolicy
    ) -> Self
    {   debug!("Creating GeminiClientState");
        let http_client = match config.timeout_secs
        {   Some(secs) => {
              reqwest::Client::builder()
                .timeout(Duration::from_secs(secs))
                .build()
                .unwrap_or_else(|e| {
                  error!(
                    "Failed to build HTTP client: {}", e
                  );
                  reqwest::Client::new()
                })
            }
          , None => reqwest::Client::new()
        };
        GeminiClientState
        {   config
          , policy
          , http_client
        }
    }

    fn build_body(
      request: &GenerationRequest
    ) -> GenerateContentBody
    {   GenerateContentBody
        {   contents: vec![
              Content
              {   parts: vec![
                    Part
                    {   text: request.user_prompt.clone()
                    }
                  ]
              }
            ]
          , system_instruction: Content
            {   parts: vec![
                  Part
                  {   text: request
                        .system_instruction
                        .clone()
                  }
                ]
            }
          , generation_config: GenerationConfig
            {   response_mime_type
                  : "application/json".to_string()
              , response_schema
                  : request.response_schema.clone()
            }
        }
    }

    /// One transport attempt: send, classify, extract,
    /// decode, check completeness
    async fn attempt<T: GeneratedKind>(
      &self
    , url: &str
    , body: &GenerateContentBody
    ) -> Result<T, crate::error::Error>
    {   let response = self.http_client
          .post(url)
          .header("Content-Type", "application/json")
          .json(body)
          .send()
          .await
          .map_err(|e| {
            error!("HTTP error: {}", e);
            crate::error::Error::HttpError(e.to_string())
          })?;

        let status = response.status();
        trace!("Gemini response status: {}", status);

        if !status.is_success()
        {   return Err(classify_failure(status, response).await);
        }

        let envelope: GenerateContentResponse
          = response.json().await.map_err(|e| {
            error!("Envelope parse error: {}", e);
            crate::error::Error::ParseError(e.to_string())
          })?;

        let text = extract_text(envelope)
          .ok_or_else(|| {
            error!("No generated text in response");
            crate::error::Error::EmptyResponse
          })?;

        let parsed: T = serde_json::from_str(&text)
          .map_err(|e| {
            error!("Result parse error: {}", e);
            crate::error::Error::ParseError(e.to_string())
          })?;

        parsed.check_complete()?;
        Ok(parsed)
    }

    /// Shared generation routine: bounded attempts with
    /// exponential backoff between retryable failures
    pub async fn generate<T: GeneratedKind>(
      &self
    , request: &GenerationRequest
    ) -> Result<T, crate::error::Error>
    {   // Credential absence is detected before any attempt
        let url = self.config.generate_url()?;
        let body = Self::build_body(request);
        trace!("Gemini request body: {:?}", body);

        let mut state = RetryState::new();
        loop
        {   match self.attempt::<T>(&url, &body).await
            {   Ok(result) => {
                  debug!(
                    "Generated {} on attempt {}",
                    T::kind(),
                    state.attempts_made + 1
                  );
                  return Ok(result);
                }
              , Err(err) if !err.is_retryable() => {
                  error!(
                    "Terminal {} failure: {}",
                    T::kind(), err
                  );
                  return Err(err);
                }
              , Err(err) => {
                  state.record_failure(err);
                  if state.exhausted(&self.policy)
                  {   error!(
                        "{} generation failed after {} attempts",
                        T::kind(), state.attempts_made
                      );
                      return Err(state.into_error());
                  }
                  let delay = self.policy
                    .backoff_for_attempt(state.attempts_made);
                  debug!(
                    "Backing off {:?} before retry", delay
                  );
                  tokio::time::sleep(delay).await;
                }
            }
        }
    }

    pub async fn handle_generate_sentence(
      &self
    , word: String
    ) -> Result<GeneratedSentence, crate::error::Error>
    {   debug!("Handling generate_sentence for: {}", word);
        let request = crate::request::sentence_request(&word);
        self.generate(&request).await
    }

    pub async fn handle_generate_story(
      &self
    , letters: Vec<String>
    ) -> Result<GeneratedStory, crate::error::Error>
    {   debug!(
          "Handling generate_story with {} letters",
          letters.len()
        );
        // Caller error, reported before the credential check
        // and without any transport attempt
        if letters.is_empty()
        {   error!("Story generation with no letters selected");
            return Err(
              crate::error::Error::NoLettersSelected
            );
        }
        let request = crate::request::story_request(&letters);
        self.generate(&request).await
    }
}

async fn classify_failure(
  status: reqwest::StatusCode
, response: reqwest::Response
) -> crate::error::Error
{   match status.as_u16()
    {   403 => {
          error!("API key rejected by endpoint");
          crate::error::Error::AuthRejected
        }
      , 429 => {
          error!("Rate limit exceeded");
          crate::error::Error::RateLimited
        }
      , 400 => {
          let message = response
            .json::<ApiErrorEnvelope>()
            .await
            .ok()
            .and_then(|envelope| envelope.error)
            .and_then(|detail| detail.message)
            .unwrap_or_else(||
              "Please check your API configuration"
                .to_string()
            );
          error!("Bad request: {}", message);
          crate::error::Error::BadRequest(message)
        }
      , code => {
          let message = response.text().await
            .unwrap_or_else(|_|
              "Unknown error".to_string()
            );
          error!(
            "Gemini API error {}: {}", code, message
          );
          crate::error::Error::ApiError
          {   status: code
            , message
          }
        }
    }
}

fn extract_text(
  envelope: GenerateContentResponse
) -> Option<String>
{   envelope.candidates
      .into_iter()
      .next()?
      .content?
      .parts
      .into_iter()
      .next()?
      .text
      .filter(|text| !text.is_empty())
}

// ===== Gemini Client Actor =====

/// Commands for GeminiClient actor
pub enum GeminiCommand
{   GenerateSentence
    {   word: String
      , reply: mpsc::UnboundedSender
        <crate::GenerateSentenceReply>
    }
  , GenerateStory
    {   letters: Vec<String>
      , reply: mpsc::UnboundedSender
        <crate::GenerateStoryReply>
    }
  , Shutdown
}

/// Public Gemini client interface
pub struct GeminiClient
{   tx: mpsc::UnboundedSender<GeminiCommand>
  , _task: tokio::task::JoinHandle<()>
}

impl GeminiClient
{   /// Create and spawn a new Gemini client
    pub fn new(
      config: crate::config::GeminiConfig
    , policy: RetryPolicy
    ) -> Self
    {   debug!("Creating GeminiClient");
        let (cmd_tx, cmd_rx)
          = mpsc::unbounded_channel();

        let _task = tokio::spawn(async move {
          run_gemini_loop(cmd_rx, config, policy).await;
        });

        GeminiClient
        {   tx: cmd_tx
          , _task
        }
    }

    /// Queue a sentence generation - returns immediately
    pub async fn generate_sentence(
      &self
    , word: String
    , reply: mpsc::UnboundedSender
        <crate::GenerateSentenceReply>
    ) -> Result<(), crate::error::Error>
    {   debug!("generate_sentence queued for: {}", word);

        self.tx.send(GeminiCommand::GenerateSentence {
          word,
          reply,
        }).map_err(|_| {
          error!("Gemini client disconnected");
          crate::error::Error::Other(
            "Gemini client disconnected".to_string()
          )
        })
    }

    /// Queue a story generation - returns immediately
    pub async fn generate_story(
      &self
    , letters: Vec<String>
    , reply: mpsc::UnboundedSender
        <crate::GenerateStoryReply>
    ) -> Result<(), crate::error::Error>
    {   debug!(
          "generate_story queued with {} letters",
          letters.len()
        );

        self.tx.send(GeminiCommand::GenerateStory {
          letters,
          reply,
        }).map_err(|_| {
          error!("Gemini client disconnected");
          crate::error::Error::Other(
            "Gemini client disconnected".to_string()
          )
        })
    }

    /// Shutdown the client
    pub async fn shutdown(self)
      -> Result<(), crate::error::Error>
    {   debug!("Shutting down GeminiClient");
        self.tx.send(GeminiCommand::Shutdown)
          .map_err(|_| {
            crate::error::Error::Other(
              "Client already shutdown".to_string()
            )
          })
    }
}

/// Main gemini event loop
///
/// Each generation command is spawned as its own task so a
/// second call issued while one is in flight runs
/// independently instead of queueing behind it.
async fn run_gemini_loop(
  mut cmd_rx: mpsc::UnboundedReceiver<GeminiCommand>
, config: crate::config::GeminiConfig
, policy: RetryPolicy
)
{   debug!("Starting Gemini client loop");
    let state = GeminiClientState::new(config, policy);

    loop
    { match cmd_rx.recv().await
      {   Some(GeminiCommand::GenerateSentence {
            word, reply
          }) => {
            debug!("Processing GenerateSentence");
            let task_state = state.clone();
            tokio::spawn(async move {
              let result = task_state
                .handle_generate_sentence(word)
                .await;
              let _ = reply.send(result);
            });
          }
        , Some(GeminiCommand::GenerateStory {
            letters, reply
          }) => {
            debug!("Processing GenerateStory");
            let task_state = state.clone();
            tokio::spawn(async move {
              let result = task_state
                .handle_generate_story(letters)
                .await;
              let _ = reply.send(result);
            });
          }
        , Some(GeminiCommand::Shutdown) => {
            info!("Gemini client shutting down");
            break;
          }
        , None => {
            debug!("Command channel closed");
            break;
          }
      }
    }
}
