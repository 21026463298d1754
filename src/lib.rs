pub mod error;
pub mod config;
pub mod retry;
pub mod request;
pub mod providers;
pub mod client;
pub mod curriculum;
pub mod speech;
pub mod blending;

/*

monphon (Mongol Phonics) is an async-only rust library that powers
a Mongolian Cyrillic phonics trainer; it holds the curriculum
reference data, builds structured-output requests for the Gemini
generateContent endpoint, retries transient failures with
exponential backoff, and hands finished text to a platform speech
capability it never waits on.

monphon/
├── Cargo.toml          # Main manifest
├── src/
│   ├── lib.rs          # Channel API types and main documentation
│   ├── error.rs        # Custom error types and handling
│   ├── config.rs       # Endpoint and credential configuration
│   ├── client.rs       # Backend facade over the provider actor
│   ├── providers/      # Provider-specific implementations
│   │   ├── mod.rs      # Re-exports all providers
│   │   └── gemini.rs   # Gemini generateContent client
│   ├── request.rs      # Prompts, schemas and decoded results
│   ├── retry.rs        # Retry policy and per-call retry state
│   ├── curriculum.rs   # Static vowel/consonant/alphabet tables
│   ├── speech.rs       # One-way speech hand-off
│   └── blending.rs     # Debounced syllable blending
└── tests/              # Integration and mock-transport tests

*/

/// MONPHON API INTERFACE:

// ===== GenerateSentence =====

pub type GenerateSentenceReply
  = Result<crate::request::GeneratedSentence, crate::error::Error>;
pub type GenerateSentenceReplySender
  = tokio::sync::mpsc::UnboundedSender<GenerateSentenceReply>;

pub struct GenerateSentenceArgs
{   pub word: String
  , pub reply: GenerateSentenceReplySender
}

// ===== GenerateStory =====

pub type GenerateStoryReply
  = Result<crate::request::GeneratedStory, crate::error::Error>;
pub type GenerateStoryReplySender
  = tokio::sync::mpsc::UnboundedSender<GenerateStoryReply>;

pub struct GenerateStoryArgs
{   pub letters: Vec<String>
  , pub reply: GenerateStoryReplySender
}

// ===== Speak =====

/// One-way hand-off to the speech collaborator.
/// Carries no reply sender: playback outcome is never
/// surfaced back to the core.
pub struct SpeakArgs
{   pub text: String
  , pub rate: f32
}

// ===== KillProcess =====

pub type KillProcessReply = Result<(), crate::error::Error>;
pub type KillProcessReplySender
  = tokio::sync::mpsc::UnboundedSender<KillProcessReply>;

pub struct KillProcessArgs
{   pub reply: KillProcessReplySender
}

// ===== PhonicsHand (sender side) =====

pub struct PhonicsHand
{   pub generate_sentence_tx
      : tokio::sync::mpsc::UnboundedSender<GenerateSentenceArgs>
  , pub generate_story_tx
      : tokio::sync::mpsc::UnboundedSender<GenerateStoryArgs>
  , pub speak_tx
      : tokio::sync::mpsc::UnboundedSender<SpeakArgs>
  , pub kill_process_tx
      : tokio::sync::mpsc::UnboundedSender<KillProcessArgs>
}

// ===== PhonicsFoot (receiver side) =====

pub struct PhonicsFoot
{   pub generate_sentence_rx
      : tokio::sync::mpsc::UnboundedReceiver<GenerateSentenceArgs>
  , pub generate_story_rx
      : tokio::sync::mpsc::UnboundedReceiver<GenerateStoryArgs>
  , pub speak_rx
      : tokio::sync::mpsc::UnboundedReceiver<SpeakArgs>
  , pub kill_process_rx
      : tokio::sync::mpsc::UnboundedReceiver<KillProcessArgs>
}
