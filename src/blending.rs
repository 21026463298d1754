//! Debounced syllable blending (the syllable train)

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use log::debug;

use crate::curriculum::{Consonant, Vowel};
use crate::speech::{SpeechRequest, SpeechSink, DEFAULT_RATE};

/// Delay between the second selection and the blend
pub const BLEND_DELAY: Duration = Duration::from_millis(600);

/// A blended syllable and its spoken sound
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Blend
{   pub syllable: String
  , pub sound: String
}

/// Combine a consonant and a vowel into one syllable
pub fn blend(
  consonant: &Consonant
, vowel: &Vowel
) -> Blend
{   Blend
    {   syllable: format!(
          "{}{}",
          consonant.letter,
          vowel.letter.to_lowercase()
        )
      , sound: format!(
          "{}{}",
          consonant.sound, vowel.sound
        )
    }
}

/// Debounced blending interaction
///
/// At most one timer is pending per train; re-selection
/// during the debounce aborts the stale timer so only the
/// latest pair is announced and spoken.
pub struct BlendingTrain
{   consonant: Option<Consonant>
  , vowel: Option<Vowel>
  , pending: Option<JoinHandle<()>>
  , sink: Arc<dyn SpeechSink>
  , blends_tx: mpsc::UnboundedSender<Blend>
}

impl BlendingTrain
{   /// Create a train and the channel its blends arrive on
    pub fn new(sink: Arc<dyn SpeechSink>)
      -> (Self, mpsc::UnboundedReceiver<Blend>)
    {   let (blends_tx, blends_rx)
          = mpsc::unbounded_channel();
        let train = BlendingTrain
        {   consonant: None
          , vowel: None
          , pending: None
          , sink
          , blends_tx
        };
        (train, blends_rx)
    }

    pub fn select_consonant(&mut self, consonant: Consonant)
    {   debug!("Selected consonant: {}", consonant.letter);
        self.consonant = Some(consonant);
        self.schedule();
    }

    pub fn select_vowel(&mut self, vowel: Vowel)
    {   debug!("Selected vowel: {}", vowel.letter);
        self.vowel = Some(vowel);
        self.schedule();
    }

    /// Reset both selections and drop any pending timer
    pub fn clear(&mut self)
    {   debug!("Clearing blending train");
        self.cancel_pending();
        self.consonant = None;
        self.vowel = None;
    }

    fn cancel_pending(&mut self)
    {   if let Some(handle) = self.pending.take()
        {   debug!("Cancelling pending blend timer");
            handle.abort();
        }
    }

    fn schedule(&mut self)
    {   self.cancel_pending();

        let (consonant, vowel)
          = match (self.consonant, self.vowel)
        {   (Some(c), Some(v)) => (c, v)
          , _ => return
        };

        let sink = Arc::clone(&self.sink);
        let blends_tx = self.blends_tx.clone();
        self.pending = Some(tokio::spawn(async move {
          tokio::time::sleep(BLEND_DELAY).await;
          let result = blend(&consonant, &vowel);
          debug!("Blended: {}", result.syllable);
          sink.speak(SpeechRequest
          {   text: result.sound.clone()
            , rate: DEFAULT_RATE
          });
          let _ = blends_tx.send(result);
        }));
    }
}
