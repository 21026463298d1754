//! Prompts, structured-output schemas and decoded results

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// ===== Structured-output schema descriptor =====

/// Declared shape of the JSON the model must produce
#[derive(Debug, Clone, Serialize)]
pub struct ResponseSchema
{   #[serde(rename = "type")]
    pub schema_type: String
  , pub properties: HashMap<String, SchemaProperty>
  , pub required: Vec<String>
}

/// One named field of a response schema
#[derive(Debug, Clone, Serialize)]
pub struct SchemaProperty
{   #[serde(rename = "type")]
    pub property_type: String
  , pub description: String
}

impl ResponseSchema
{   /// OBJECT schema of STRING fields, all of them required
    pub fn object(fields: &[(&str, &str)]) -> Self
    {   let mut properties = HashMap::new();
        let mut required = Vec::new();
        for (name, description) in fields
        {   properties.insert(
              name.to_string(),
              SchemaProperty
              {   property_type: "STRING".to_string()
                , description: description.to_string()
              }
            );
            required.push(name.to_string());
        }
        ResponseSchema
        {   schema_type: "OBJECT".to_string()
          , properties
          , required
        }
    }
}

// ===== Generation request =====

/// One fully-built generation request
/// Immutable once built; constructed fresh per invocation
#[derive(Debug, Clone)]
pub struct GenerationRequest
{   /// Fixed task instruction for the call site
    pub system_instruction: String
  , /// Prompt embedding the caller's word or letter list
    pub user_prompt: String
  , /// Schema the model is instructed to populate
    pub response_schema: ResponseSchema
}

// ===== Decoded results =====

/// Example sentence for a single word
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedSentence
{   /// The complete, simple Mongolian sentence
    pub sentence: String
  , /// Romanized phonetic pronunciation of the sentence
    pub phonetic: String
  , /// English translation of the sentence
    pub english: String
}

/// Mini story built from a selected letter set
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedStory
{   /// The complete story in Mongolian Cyrillic
    pub story: String
  , /// Romanized phonetic pronunciation of the story
    pub phonetic: String
  , /// English translation of the story
    pub english: String
}

/// Closed variant over everything the client can produce
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GeneratedContent
{   Sentence(GeneratedSentence)
  , Story(GeneratedStory)
}

impl GeneratedContent
{   /// The Mongolian text, as handed to speech playback
    pub fn text(&self) -> &str
    {   match self
        {   GeneratedContent::Sentence(s) => &s.sentence
          , GeneratedContent::Story(s) => &s.story
        }
    }

    /// Romanized phonetic pronunciation
    pub fn phonetic(&self) -> &str
    {   match self
        {   GeneratedContent::Sentence(s) => &s.phonetic
          , GeneratedContent::Story(s) => &s.phonetic
        }
    }

    /// English translation
    pub fn english(&self) -> &str
    {   match self
        {   GeneratedContent::Sentence(s) => &s.english
          , GeneratedContent::Story(s) => &s.english
        }
    }
}

impl From<GeneratedSentence> for GeneratedContent
{   fn from(s: GeneratedSentence) -> Self
    {   GeneratedContent::Sentence(s)
    }
}

impl From<GeneratedStory> for GeneratedContent
{   fn from(s: GeneratedStory) -> Self
    {   GeneratedContent::Story(s)
    }
}

// ===== Generic result seam =====

/// One transport/retry routine serves both call sites;
/// each result kind supplies its schema and its
/// completeness check through this trait
pub trait GeneratedKind: serde::de::DeserializeOwned
{   /// Short name used in logs
    fn kind() -> &'static str;

    /// Structured-output schema for this kind
    fn response_schema() -> ResponseSchema;

    /// Every required field present and non-empty
    fn check_complete(&self)
      -> Result<(), crate::error::Error>;
}

fn require_field(
  value: &str
, field: &str
) -> Result<(), crate::error::Error>
{   if value.trim().is_empty()
    {   return Err(crate::error::Error::IncompleteResult(
          field.to_string()
        ));
    }
    Ok(())
}

impl GeneratedKind for GeneratedSentence
{   fn kind() -> &'static str
    {   "sentence"
    }

    fn response_schema() -> ResponseSchema
    {   ResponseSchema::object(&[
          ( "sentence"
          , "The complete, simple Mongolian sentence."
          )
        , ( "phonetic"
          , "The Romanized, easy-to-read phonetic \
             pronunciation of the entire sentence."
          )
        , ( "english"
          , "The English translation of the sentence."
          )
        ])
    }

    fn check_complete(&self)
      -> Result<(), crate::error::Error>
    {   require_field(&self.sentence, "sentence")?;
        require_field(&self.phonetic, "phonetic")?;
        require_field(&self.english, "english")
    }
}

impl GeneratedKind for GeneratedStory
{   fn kind() -> &'static str
    {   "story"
    }

    fn response_schema() -> ResponseSchema
    {   ResponseSchema::object(&[
          ( "story"
          , "The complete Mongolian mini story (5-6 sentences) \
             written in Mongolian Cyrillic script using only the \
             specified Cyrillic letters. MUST be in Cyrillic \
             characters, NOT romanized."
          )
        , ( "phonetic"
          , "The Romanized phonetic pronunciation of the \
             entire story."
          )
        , ( "english"
          , "The English translation of the entire story."
          )
        ])
    }

    fn check_complete(&self)
      -> Result<(), crate::error::Error>
    {   require_field(&self.story, "story")?;
        require_field(&self.phonetic, "phonetic")?;
        require_field(&self.english, "english")
    }
}

// ===== Prompt builders =====

const SENTENCE_SYSTEM_PROMPT: &str
  = "You are an expert Mongolian language tutor specializing in \
     phonics. Your task is to generate one very short, simple, \
     and grammatically correct Mongolian sentence using the \
     provided word. Include a Romanized phonetic pronunciation \
     and an accurate English translation. Respond only in the \
     requested JSON format.";

/// Request for an example sentence using one word
pub fn sentence_request(word: &str) -> GenerationRequest
{   GenerationRequest
    {   system_instruction
          : SENTENCE_SYSTEM_PROMPT.to_string()
      , user_prompt: format!(
          "Create a simple sentence using the Mongolian \
           word: {}",
          word
        )
      , response_schema: GeneratedSentence::response_schema()
    }
}

/// Request for a mini story restricted to the given letters
/// Callers check for an empty selection before building this
pub fn story_request(letters: &[String]) -> GenerationRequest
{   let letter_list = letters.join(", ");
    GenerationRequest
    {   system_instruction: format!(
          "You are an expert Mongolian language tutor and \
           storyteller. Generate a short, simple mini story \
           (5-6 sentences) in Mongolian Cyrillic script using \
           ONLY the following Cyrillic letters: {}. The story \
           must be written in actual Mongolian Cyrillic \
           characters (А, Б, В, Г, Д, Е, Ё, Ж, З, И, Й, К, Л, \
           М, Н, О, Ө, П, Р, С, Т, У, Ү, Ф, Х, Ц, Ч, Ш, Щ, Ъ, \
           Ы, Ь, Э, Ю, Я), NOT in romanized/transliterated \
           form. The story should be engaging, easy to \
           understand, and suitable for language learning. The \
           story must be grammatically correct and use only the \
           specified Cyrillic letters. Include a Romanized \
           phonetic pronunciation of the entire story and an \
           accurate English translation. Respond only in JSON \
           format with fields: story (the complete story in \
           Mongolian Cyrillic), phonetic (phonetic \
           pronunciation), and english (English translation).",
          letter_list
        )
      , user_prompt: format!(
          "Create a short mini story (5-6 sentences) in \
           Mongolian Cyrillic script using only these Cyrillic \
           letters: {}. IMPORTANT: Write the story in actual \
           Mongolian Cyrillic characters, NOT in \
           romanized/transliterated form. Make it a simple, \
           engaging story suitable for language learning.",
          letter_list
        )
      , response_schema: GeneratedStory::response_schema()
    }
}
