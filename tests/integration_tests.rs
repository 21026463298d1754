use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use serde_json::json;
use wiremock::{Mock, MockServer, ResponseTemplate};
use wiremock::matchers::
{ body_partial_json
, method
, path
, query_param
};

use monphon::config::GeminiConfig;
use monphon::error::Error;
use monphon::providers::gemini::GeminiClientState;
use monphon::request::
{ sentence_request
, story_request
, GeneratedContent
, GeneratedSentence
, GeneratedStory
, GeneratedKind
};
use monphon::retry::RetryPolicy;
use monphon::speech::{SpeechRequest, SpeechSink};

fn init_logging()
{   let _ = env_logger::builder()
      .is_test(true)
      .try_init();
}

/// Speech sink that records every utterance it receives
#[derive(Default)]
struct RecordingSpeech
{   utterances: Mutex<Vec<SpeechRequest>>
}

impl RecordingSpeech
{   fn recorded(&self) -> Vec<SpeechRequest>
    {   self.utterances.lock().unwrap().clone()
    }
}

impl SpeechSink for RecordingSpeech
{   fn speak(&self, request: SpeechRequest)
    {   self.utterances.lock().unwrap().push(request);
    }
}

fn generate_path() -> String
{   format!(
      "/v1beta/models/{}:generateContent",
      monphon::config::GEMINI_MODEL
    )
}

fn mock_config(server: &MockServer) -> GeminiConfig
{   GeminiConfig::new(Some("test-key".to_string()))
      .with_api_base(&server.uri())
}

/// Fast policy so retry-loop tests do not sit through the
/// production backoff window
fn fast_policy() -> RetryPolicy
{   RetryPolicy::new(3, 2.0, 10)
}

fn mock_state(server: &MockServer) -> GeminiClientState
{   GeminiClientState::new(
      mock_config(server),
      fast_policy()
    )
}

/// Well-formed envelope whose inner text is the given JSON
fn envelope_with(inner: serde_json::Value)
  -> serde_json::Value
{   json!({
      "candidates": [
        {
          "content": {
            "parts": [
              { "text": inner.to_string() }
            ],
            "role": "model"
          }
        }
      ]
    })
}

fn sentence_envelope() -> serde_json::Value
{   envelope_with(json!({
      "sentence": "Муур сүү уусан."
    , "phonetic": "Moor suu oosan."
    , "english": "The cat drank milk."
    }))
}

// ===== Config =====

#[test]
fn test_is_configured_predicate()
{   assert!(!GeminiConfig::new(None).is_configured());
    assert!(
      !GeminiConfig::new(Some(String::new()))
        .is_configured()
    );
    assert!(
      GeminiConfig::new(Some("abc".to_string()))
        .is_configured()
    );
}

#[test]
fn test_generate_url_shape()
{   let config
      = GeminiConfig::new(Some("abc".to_string()))
        .with_api_base("http://localhost:1234");
    let url = config.generate_url().unwrap();
    assert_eq!(
      url,
      format!(
        "http://localhost:1234/v1beta/models/{}:\
         generateContent?key=abc",
        monphon::config::GEMINI_MODEL
      )
    );
}

#[test]
fn test_generate_url_requires_credential()
{   let config = GeminiConfig::new(None);
    assert_eq!(
      config.generate_url(),
      Err(Error::MissingCredential)
    );
}

// ===== Retry policy =====

#[test]
fn test_default_backoff_schedule()
{   let policy = RetryPolicy::default();
    assert_eq!(policy.max_attempts, 3);
    assert_eq!(
      policy.backoff_for_attempt(1),
      Duration::from_millis(2000)
    );
    assert_eq!(
      policy.backoff_for_attempt(2),
      Duration::from_millis(4000)
    );
}

// ===== Prompts and schemas =====

#[test]
fn test_sentence_request_embeds_word()
{   let request = sentence_request("Муур");
    assert!(request.user_prompt.contains("Муур"));
    assert!(
      request.system_instruction
        .contains("Mongolian language tutor")
    );
    assert_eq!(
      request.response_schema.required,
      vec!["sentence", "phonetic", "english"]
    );
}

#[test]
fn test_story_request_embeds_letters()
{   let letters = vec![
      "М".to_string()
    , "А".to_string()
    , "Н".to_string()
    ];
    let request = story_request(&letters);
    assert!(request.system_instruction.contains("М, А, Н"));
    assert!(request.user_prompt.contains("М, А, Н"));
    assert_eq!(
      request.response_schema.required,
      vec!["story", "phonetic", "english"]
    );
}

#[test]
fn test_schema_serialization()
{   let schema = GeneratedSentence::response_schema();
    let value = serde_json::to_value(&schema).unwrap();
    assert_eq!(value["type"], "OBJECT");
    assert_eq!(
      value["properties"]["sentence"]["type"],
      "STRING"
    );
    assert_eq!(
      value["properties"]["phonetic"]["type"],
      "STRING"
    );
}

#[test]
fn test_check_complete_rejects_blank_field()
{   let sentence = GeneratedSentence
    {   sentence: "Муур сүү уусан.".to_string()
      , phonetic: "Moor suu oosan.".to_string()
      , english: "  ".to_string()
    };
    let err = sentence.check_complete().unwrap_err();
    assert_eq!(
      err,
      Error::IncompleteResult("english".to_string())
    );
    assert!(err.is_retryable());
}

#[test]
fn test_generated_content_accessors()
{   let content: GeneratedContent = GeneratedStory
    {   story: "Нар мандсан.".to_string()
      , phonetic: "Nar mandsan.".to_string()
      , english: "The sun rose.".to_string()
    }.into();
    assert_eq!(content.text(), "Нар мандсан.");
    assert_eq!(content.phonetic(), "Nar mandsan.");
    assert_eq!(content.english(), "The sun rose.");
}

// ===== Error taxonomy =====

#[test]
fn test_error_retryability()
{   assert!(!Error::MissingCredential.is_retryable());
    assert!(!Error::AuthRejected.is_retryable());
    assert!(
      !Error::BadRequest("bad".to_string()).is_retryable()
    );
    assert!(!Error::NoLettersSelected.is_retryable());
    assert!(Error::RateLimited.is_retryable());
    assert!(Error::EmptyResponse.is_retryable());
    assert!(
      Error::ParseError("oops".to_string()).is_retryable()
    );
    assert!(
      Error::ApiError
      {   status: 503
        , message: "unavailable".to_string()
      }.is_retryable()
    );
}

#[test]
fn test_error_display_messages()
{   assert!(
      Error::MissingCredential
        .to_string()
        .contains(monphon::config::API_KEY_ENV)
    );
    assert_eq!(
      Error::NoLettersSelected.to_string(),
      "Please select at least one letter."
    );
    let exhausted = Error::RetriesExhausted
    {   attempts: 3
      , last: "Rate limit exceeded.".to_string()
    };
    assert!(
      exhausted.to_string().contains("after 3 attempts")
    );
}

// ===== Transport behavior (mocked) =====

#[tokio::test]
async fn test_generate_sentence_returns_payload()
{   init_logging();
    let server = MockServer::start().await;

    Mock::given(method("POST"))
      .and(path(generate_path()))
      .and(query_param("key", "test-key"))
      .and(body_partial_json(json!({
        "generationConfig": {
          "responseMimeType": "application/json"
        }
      })))
      .respond_with(
        ResponseTemplate::new(200)
          .set_body_json(sentence_envelope())
      )
      .expect(1)
      .mount(&server)
      .await;

    let state = mock_state(&server);
    let sentence = state
      .handle_generate_sentence("Муур".to_string())
      .await
      .unwrap();

    assert_eq!(sentence.sentence, "Муур сүү уусан.");
    assert_eq!(sentence.phonetic, "Moor suu oosan.");
    assert_eq!(sentence.english, "The cat drank milk.");
}

#[tokio::test]
async fn test_missing_credential_makes_no_call()
{   init_logging();
    let server = MockServer::start().await;

    Mock::given(method("POST"))
      .respond_with(
        ResponseTemplate::new(200)
          .set_body_json(sentence_envelope())
      )
      .expect(0)
      .mount(&server)
      .await;

    let state = GeminiClientState::new(
      GeminiConfig::new(None)
        .with_api_base(&server.uri()),
      fast_policy()
    );

    let result = state
      .handle_generate_sentence("Муур".to_string())
      .await;
    assert_eq!(result, Err(Error::MissingCredential));
}

#[tokio::test]
async fn test_auth_rejection_is_terminal()
{   init_logging();
    let server = MockServer::start().await;

    Mock::given(method("POST"))
      .and(path(generate_path()))
      .respond_with(ResponseTemplate::new(403))
      .expect(1)
      .mount(&server)
      .await;

    let state = mock_state(&server);
    let result = state
      .handle_generate_sentence("Муур".to_string())
      .await;
    assert_eq!(result, Err(Error::AuthRejected));
}

#[tokio::test]
async fn test_bad_request_passes_server_message()
{   init_logging();
    let server = MockServer::start().await;

    Mock::given(method("POST"))
      .and(path(generate_path()))
      .respond_with(
        ResponseTemplate::new(400)
          .set_body_json(json!({
            "error": { "message": "API key expired" }
          }))
      )
      .expect(1)
      .mount(&server)
      .await;

    let state = mock_state(&server);
    let result = state
      .handle_generate_sentence("Муур".to_string())
      .await;
    assert_eq!(
      result,
      Err(Error::BadRequest("API key expired".to_string()))
    );
}

#[tokio::test]
async fn test_rate_limit_retries_then_succeeds()
{   init_logging();
    let server = MockServer::start().await;

    Mock::given(method("POST"))
      .and(path(generate_path()))
      .respond_with(ResponseTemplate::new(429))
      .up_to_n_times(2)
      .expect(2)
      .mount(&server)
      .await;

    Mock::given(method("POST"))
      .and(path(generate_path()))
      .respond_with(
        ResponseTemplate::new(200)
          .set_body_json(sentence_envelope())
      )
      .expect(1)
      .mount(&server)
      .await;

    let state = mock_state(&server);
    let started = Instant::now();
    let sentence = state
      .handle_generate_sentence("Муур".to_string())
      .await
      .unwrap();

    assert_eq!(sentence.english, "The cat drank milk.");
    // Two backoffs under the fast policy: 20ms then 40ms
    assert!(started.elapsed() >= Duration::from_millis(60));
}

#[tokio::test]
async fn test_incomplete_payload_exhausts_attempts()
{   init_logging();
    let server = MockServer::start().await;

    // Parses fine but the english field is blank every time
    Mock::given(method("POST"))
      .and(path(generate_path()))
      .respond_with(
        ResponseTemplate::new(200)
          .set_body_json(envelope_with(json!({
            "sentence": "Муур сүү уусан."
          , "phonetic": "Moor suu oosan."
          , "english": ""
          })))
      )
      .expect(3)
      .mount(&server)
      .await;

    let state = mock_state(&server);
    let result = state
      .handle_generate_sentence("Муур".to_string())
      .await;

    match result
    {   Err(Error::RetriesExhausted { attempts, last }) => {
          assert_eq!(attempts, 3);
          assert!(last.contains("english"));
        }
      , other => {
          panic!("Expected RetriesExhausted, got {:?}", other)
        }
    }
}

#[tokio::test]
async fn test_empty_candidates_exhaust_attempts()
{   init_logging();
    let server = MockServer::start().await;

    Mock::given(method("POST"))
      .and(path(generate_path()))
      .respond_with(
        ResponseTemplate::new(200)
          .set_body_json(json!({ "candidates": [] }))
      )
      .expect(3)
      .mount(&server)
      .await;

    let state = mock_state(&server);
    let result = state
      .handle_generate_sentence("Муур".to_string())
      .await;

    match result
    {   Err(Error::RetriesExhausted { attempts, .. }) => {
          assert_eq!(attempts, 3);
        }
      , other => {
          panic!("Expected RetriesExhausted, got {:?}", other)
        }
    }
}

#[tokio::test]
async fn test_empty_letter_set_is_synchronous_error()
{   init_logging();
    let server = MockServer::start().await;

    Mock::given(method("POST"))
      .respond_with(ResponseTemplate::new(200))
      .expect(0)
      .mount(&server)
      .await;

    let state = mock_state(&server);
    let result = state
      .handle_generate_story(Vec::new())
      .await;
    assert_eq!(result, Err(Error::NoLettersSelected));
}

#[tokio::test]
async fn test_story_generation_roundtrip()
{   init_logging();
    let server = MockServer::start().await;

    Mock::given(method("POST"))
      .and(path(generate_path()))
      .respond_with(
        ResponseTemplate::new(200)
          .set_body_json(envelope_with(json!({
            "story": "Нар мандсан. Муур унтсан."
          , "phonetic": "Nar mandsan. Moor untsan."
          , "english": "The sun rose. The cat slept."
          })))
      )
      .expect(1)
      .mount(&server)
      .await;

    let state = mock_state(&server);
    let story = state
      .handle_generate_story(vec![
        "М".to_string()
      , "А".to_string()
      ])
      .await
      .unwrap();

    assert_eq!(story.story, "Нар мандсан. Муур унтсан.");
    assert_eq!(
      story.english,
      "The sun rose. The cat slept."
    );
}

#[tokio::test]
async fn test_concurrent_generations_run_independently()
{   init_logging();
    let server = MockServer::start().await;

    Mock::given(method("POST"))
      .and(path(generate_path()))
      .respond_with(
        ResponseTemplate::new(200)
          .set_body_json(sentence_envelope())
          .set_delay(Duration::from_millis(500))
      )
      .expect(2)
      .mount(&server)
      .await;

    let client = monphon::providers::gemini::GeminiClient::new(
      mock_config(&server),
      fast_policy()
    );

    let (first_tx, mut first_rx)
      = tokio::sync::mpsc::unbounded_channel();
    let (second_tx, mut second_rx)
      = tokio::sync::mpsc::unbounded_channel();

    let started = Instant::now();
    client
      .generate_sentence("Муур".to_string(), first_tx)
      .await
      .unwrap();
    client
      .generate_sentence("Нар".to_string(), second_tx)
      .await
      .unwrap();

    let first = first_rx.recv().await.unwrap().unwrap();
    let second = second_rx.recv().await.unwrap().unwrap();
    assert_eq!(first.english, "The cat drank milk.");
    assert_eq!(second.english, "The cat drank milk.");

    // Two sequential calls would need at least a second
    assert!(started.elapsed() < Duration::from_millis(900));

    let _ = client.shutdown().await;
}

// ===== Backend facade =====

#[tokio::test]
async fn test_backend_generation_and_speech()
{   init_logging();
    let server = MockServer::start().await;

    Mock::given(method("POST"))
      .and(path(generate_path()))
      .respond_with(
        ResponseTemplate::new(200)
          .set_body_json(sentence_envelope())
      )
      .expect(1)
      .mount(&server)
      .await;

    let sink = Arc::new(RecordingSpeech::default());
    let backend = monphon::client::PhonicsBackend::with_speech(
      mock_config(&server),
      sink.clone() as Arc<dyn SpeechSink>
    );

    let mut reply_rx = backend
      .generate_sentence("Муур".to_string())
      .await
      .unwrap();
    let sentence = reply_rx.recv().await.unwrap().unwrap();
    assert_eq!(sentence.sentence, "Муур сүү уусан.");

    let content = GeneratedContent::from(sentence);
    backend.speak_content(&content).await.unwrap();

    // The speak hand-off is one-way; give the loop a moment
    tokio::time::sleep(Duration::from_millis(100)).await;
    let utterances = sink.recorded();
    assert_eq!(utterances.len(), 1);
    assert_eq!(utterances[0].text, "Муур сүү уусан.");
    assert_eq!(
      utterances[0].rate,
      monphon::speech::DEFAULT_RATE
    );

    backend.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_backend_shutdown()
{   init_logging();
    let backend = monphon::client::PhonicsBackend::new(
      GeminiConfig::new(None)
    );
    backend.shutdown().await.unwrap();
}

// ===== Curriculum =====

#[test]
fn test_curriculum_tables()
{   assert_eq!(monphon::curriculum::VOWELS.len(), 7);
    assert_eq!(monphon::curriculum::CONSONANTS.len(), 4);
    assert_eq!(monphon::curriculum::LONG_VOWELS.len(), 4);
    assert_eq!(monphon::curriculum::FULL_ALPHABET.len(), 35);

    let unique: std::collections::HashSet<&str>
      = monphon::curriculum::FULL_ALPHABET
        .iter()
        .map(|entry| entry.letter)
        .collect();
    assert_eq!(unique.len(), 35);

    let entry
      = monphon::curriculum::find_letter("М").unwrap();
    assert_eq!(entry.word, "Муур");
    assert_eq!(entry.translation, "Cat");

    let letters = monphon::curriculum::all_letters();
    assert_eq!(letters.first().map(String::as_str), Some("А"));
    assert_eq!(letters.last().map(String::as_str), Some("Я"));
}

// ===== Speech =====

#[test]
fn test_vowel_length_rates()
{   use monphon::speech::VowelLength;
    assert_eq!(
      VowelLength::Short.rate(),
      monphon::speech::SHORT_VOWEL_RATE
    );
    assert_eq!(
      VowelLength::Long.rate(),
      monphon::speech::LONG_VOWEL_RATE
    );

    let pair = &monphon::curriculum::LONG_VOWELS[0];
    assert_eq!(VowelLength::Short.sound_of(pair), "ah");
    assert_eq!(VowelLength::Long.sound_of(pair), "aaah");
}

#[test]
fn test_story_playback_text()
{   let letters = vec!["М".to_string(), "А".to_string()];
    assert_eq!(
      monphon::speech::story_playback_text(
        &letters,
        "Нар мандсан."
      ),
      "М, А. Нар мандсан."
    );
}

// ===== Blending =====

#[tokio::test]
async fn test_blending_debounce_produces_blend()
{   init_logging();
    let sink = Arc::new(RecordingSpeech::default());
    let (mut train, mut blends_rx)
      = monphon::blending::BlendingTrain::new(
          sink.clone() as Arc<dyn SpeechSink>
        );

    train.select_consonant(
      monphon::curriculum::CONSONANTS[0]
    );
    train.select_vowel(monphon::curriculum::VOWELS[0]);

    let blend = tokio::time::timeout(
      Duration::from_secs(2),
      blends_rx.recv()
    ).await.unwrap().unwrap();

    assert_eq!(blend.syllable, "Ма");
    assert_eq!(blend.sound, "mah");

    let utterances = sink.recorded();
    assert_eq!(utterances.len(), 1);
    assert_eq!(utterances[0].text, "mah");
}

#[tokio::test]
async fn test_blending_reselection_cancels_timer()
{   init_logging();
    let sink = Arc::new(RecordingSpeech::default());
    let (mut train, mut blends_rx)
      = monphon::blending::BlendingTrain::new(
          sink.clone() as Arc<dyn SpeechSink>
        );

    train.select_consonant(
      monphon::curriculum::CONSONANTS[0]
    );
    train.select_vowel(monphon::curriculum::VOWELS[0]);

    // Reselect before the 600ms debounce elapses; only
    // the latest pair may be announced
    tokio::time::sleep(Duration::from_millis(100)).await;
    train.select_consonant(
      monphon::curriculum::CONSONANTS[1]
    );

    let blend = tokio::time::timeout(
      Duration::from_secs(2),
      blends_rx.recv()
    ).await.unwrap().unwrap();
    assert_eq!(blend.syllable, "Са");
    assert_eq!(blend.sound, "sah");

    let second = tokio::time::timeout(
      Duration::from_millis(900),
      blends_rx.recv()
    ).await;
    assert!(second.is_err(), "stale blend was not cancelled");

    let utterances = sink.recorded();
    assert_eq!(utterances.len(), 1);
}

// ===== Live endpoint (requires GEMINI_API_KEY) =====

#[tokio::test]
#[ignore]
async fn test_live_generate_sentence()
{   init_logging();
    let api_key
      = match std::env::var(monphon::config::API_KEY_ENV)
    {   Ok(key) => key
      , Err(_) => {
          println!(
            "Skipping test: {} not set",
            monphon::config::API_KEY_ENV
          );
          return;
        }
    };

    let state = GeminiClientState::new(
      GeminiConfig::new(Some(api_key)),
      RetryPolicy::default()
    );

    match state
      .handle_generate_sentence("Муур".to_string())
      .await
    {   Ok(sentence) => {
          println!("Sentence: {}", sentence.sentence);
          println!("Phonetic: {}", sentence.phonetic);
          println!("English: {}", sentence.english);
          assert!(!sentence.sentence.is_empty());
        }
      , Err(e) => {
          println!("Failed to generate sentence: {}", e);
        }
    }
}

#[tokio::test]
#[ignore]
async fn test_live_generate_story()
{   init_logging();
    let api_key
      = match std::env::var(monphon::config::API_KEY_ENV)
    {   Ok(key) => key
      , Err(_) => {
          println!(
            "Skipping test: {} not set",
            monphon::config::API_KEY_ENV
          );
          return;
        }
    };

    let state = GeminiClientState::new(
      GeminiConfig::new(Some(api_key)),
      RetryPolicy::default()
    );

    let letters = vec![
      "М".to_string()
    , "А".to_string()
    , "Н".to_string()
    , "Р".to_string()
    ];

    match state.handle_generate_story(letters).await
    {   Ok(story) => {
          println!("Story: {}", story.story);
          println!("English: {}", story.english);
          assert!(!story.story.is_empty());
        }
      , Err(e) => {
          println!("Failed to generate story: {}", e);
        }
    }
}
