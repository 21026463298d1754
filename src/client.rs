use std::sync::Arc;
use tokio::sync::mpsc;
use log::{debug, error, info};
use crate::PhonicsFoot;

/// Backend state for routing phonics commands
pub struct PhonicsBackendState
{   pub gemini_client: crate::providers::gemini::GeminiClient
  , pub speech: Arc<dyn crate::speech::SpeechSink>
}

impl PhonicsBackendState
{   /// Create a new backend state
    pub fn new(
      config: crate::config::GeminiConfig
    , speech: Arc<dyn crate::speech::SpeechSink>
    ) -> Self
    {   debug!("Initializing PhonicsBackendState");
        let gemini_client
          = crate::providers::gemini::GeminiClient::new(
              config,
              crate::retry::RetryPolicy::default()
            );
        PhonicsBackendState
        {   gemini_client
          , speech
        }
    }
}

/// Public API for the phonics backend - owns the task
pub struct PhonicsBackend
{   hand: crate::PhonicsHand
  , _task_handle: tokio::task::JoinHandle<()>
}

impl PhonicsBackend
{   /// Create and spawn a new backend with the default
    /// log-only speech sink
    pub fn new(
      config: crate::config::GeminiConfig
    ) -> Self
    {   PhonicsBackend::with_speech(
          config,
          Arc::new(crate::speech::LogSpeech)
        )
    }

    /// Create and spawn a new backend with an injected
    /// speech sink
    /// Returns immediately - spawns background task
    pub fn with_speech(
      config: crate::config::GeminiConfig
    , speech: Arc<dyn crate::speech::SpeechSink>
    ) -> Self
    {   debug!("Creating PhonicsBackend with task ownership");

        let (generate_sentence_tx, generate_sentence_rx)
          = mpsc::unbounded_channel();
        let (generate_story_tx, generate_story_rx)
          = mpsc::unbounded_channel();
        let (speak_tx, speak_rx)
          = mpsc::unbounded_channel();
        let (kill_process_tx, kill_process_rx)
          = mpsc::unbounded_channel();

        let hand = crate::PhonicsHand
        {   generate_sentence_tx: generate_sentence_tx.clone()
          , generate_story_tx: generate_story_tx.clone()
          , speak_tx: speak_tx.clone()
          , kill_process_tx: kill_process_tx.clone()
        };

        let foot = crate::PhonicsFoot
        {   generate_sentence_rx
          , generate_story_rx
          , speak_rx
          , kill_process_rx
        };

        let _task_handle = tokio::spawn(async move {
          run_backend_loop(foot, config, speech).await
        });

        PhonicsBackend
        {   hand
          , _task_handle
        }
    }

    /// Request an example sentence - returns almost immediately
    pub async fn generate_sentence(
      &self
    , word: String
    ) -> Result<
        mpsc::UnboundedReceiver<crate::GenerateSentenceReply>,
        crate::error::Error
      >
    {   debug!(
          "generate_sentence queuing command for: {}", word
        );
        let (reply_tx, reply_rx)
          = mpsc::unbounded_channel();

        let cmd = crate::GenerateSentenceArgs
        {   word
          , reply: reply_tx
        };

        self.hand.generate_sentence_tx
          .send(cmd)
          .map_err(|_| {
            error!("Backend channel closed");
            crate::error::Error::Other(
              "Backend disconnected".to_string()
            )
          })?;

        Ok(reply_rx)
    }

    /// Request a mini story - returns almost immediately
    pub async fn generate_story(
      &self
    , letters: Vec<String>
    ) -> Result<
        mpsc::UnboundedReceiver<crate::GenerateStoryReply>,
        crate::error::Error
      >
    {   debug!(
          "generate_story queuing {} letters", letters.len()
        );
        let (reply_tx, reply_rx)
          = mpsc::unbounded_channel();

        let cmd = crate::GenerateStoryArgs
        {   letters
          , reply: reply_tx
        };

        self.hand.generate_story_tx
          .send(cmd)
          .map_err(|_| {
            error!("Backend channel closed");
            crate::error::Error::Other(
              "Backend disconnected".to_string()
            )
          })?;

        Ok(reply_rx)
    }

    /// Hand text to the speech collaborator - one way,
    /// nothing comes back
    pub async fn speak(
      &self
    , text: String
    , rate: f32
    ) -> Result<(), crate::error::Error>
    {   debug!("speak queuing {} chars", text.len());

        self.hand.speak_tx
          .send(crate::SpeakArgs
          {   text
            , rate
          })
          .map_err(|_| {
            error!("Backend channel closed");
            crate::error::Error::Other(
              "Backend disconnected".to_string()
            )
          })
    }

    /// Speak a generated result at the default rate
    pub async fn speak_content(
      &self
    , content: &crate::request::GeneratedContent
    ) -> Result<(), crate::error::Error>
    {   self.speak(
          content.text().to_string(),
          crate::speech::DEFAULT_RATE
        ).await
    }

    /// Gracefully shutdown the backend
    pub async fn shutdown(self)
      -> Result<(), crate::error::Error>
    {   debug!("Shutting down PhonicsBackend");
        let (reply_tx, mut reply_rx)
          = mpsc::unbounded_channel();

        let cmd = crate::KillProcessArgs
        {   reply: reply_tx
        };

        self.hand.kill_process_tx
          .send(cmd)
          .map_err(|_| {
            error!("Backend channel already closed");
            crate::error::Error::Other(
              "Backend already shutdown".to_string()
            )
          })?;

        // Wait for shutdown confirmation
        if let Some(result) = reply_rx.recv().await
        {   debug!("Backend shutdown confirmed");
            result
        } else
        {   error!("Backend shutdown channel dropped");
            Err(crate::error::Error::Other(
              "Backend shutdown unconfirmed".to_string()
            ))
        }
    }
}

/// Main backend event loop
///
/// Design: tokio::select! is ONLY for fast queueing.
/// Generation commands are forwarded straight into the
/// Gemini actor and speech commands into the sink; the
/// loop itself never awaits on work.
async fn run_backend_loop(
  foot: crate::PhonicsFoot
, config: crate::config::GeminiConfig
, speech: Arc<dyn crate::speech::SpeechSink>
)
{   debug!("Starting PhonicsBackend event loop");
    let state = PhonicsBackendState::new(config, speech);
    let PhonicsFoot
    {   mut generate_sentence_rx
      , mut generate_story_rx
      , mut speak_rx
      , mut kill_process_rx
    } = foot;

    loop
    { tokio::select!
      { Some(cmd) = generate_sentence_rx.recv() => {
          debug!(
            "Received GenerateSentence for: {}", cmd.word
          );
          let _ = state.gemini_client
            .generate_sentence(cmd.word, cmd.reply)
            .await;
        }
      , Some(cmd) = generate_story_rx.recv() => {
          debug!(
            "Received GenerateStory with {} letters",
            cmd.letters.len()
          );
          let _ = state.gemini_client
            .generate_story(cmd.letters, cmd.reply)
            .await;
        }
      , Some(cmd) = speak_rx.recv() => {
          debug!("Received Speak");
          state.speech.speak(
            crate::speech::SpeechRequest
            {   text: cmd.text
              , rate: cmd.rate
            }
          );
        }
      , Some(cmd) = kill_process_rx.recv() => {
          debug!("Received KillProcess");
          let _ = state.gemini_client.shutdown().await;
          let _ = cmd.reply.send(Ok(()));
          info!("PhonicsBackend shutting down");
          break;
        }
      }
    }
}
