//! Mongolian phonics curriculum data
//!
//! Static, read-only reference tables. Callers hand subsets
//! of this data (letters or words) to the generation client;
//! nothing in the crate mutates it.

use serde::Serialize;

/// One of the seven basic vowels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Vowel
{   pub letter: &'static str
  , pub ipa: &'static str
  , pub sound: &'static str
  , pub word: &'static str
  , pub translation: &'static str
}

/// Short/long vowel pair for the contrast drill
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LongVowelPair
{   pub short: &'static str
  , pub long: &'static str
  , pub short_sound: &'static str
  , pub long_sound: &'static str
  , pub example: &'static str
}

/// Consonant used by the syllable train
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Consonant
{   pub letter: &'static str
  , pub name: &'static str
  , pub sound: &'static str
}

/// One letter of the full alphabet with its example word
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AlphabetLetter
{   pub letter: &'static str
  , pub sound: &'static str
  , pub word: &'static str
  , pub word_sound: &'static str
  , pub translation: &'static str
}

pub const VOWELS: [Vowel; 7] = [
  Vowel { letter: "А", ipa: "a", sound: "ah", word: "Алим", translation: "Apple" },
  Vowel { letter: "Э", ipa: "e", sound: "eh", word: "Ээж", translation: "Mother" },
  Vowel { letter: "И", ipa: "i", sound: "ee", word: "Инээд", translation: "Smile" },
  Vowel { letter: "О", ipa: "ɔ", sound: "oh", word: "Од", translation: "Star" },
  Vowel { letter: "У", ipa: "ʊ", sound: "ooh", word: "Уул", translation: "Mountain" },
  Vowel { letter: "Ө", ipa: "ө", sound: "uh", word: "Өвөө", translation: "Grandfather" },
  Vowel { letter: "Ү", ipa: "u", sound: "ew", word: "Үүл", translation: "Cloud" },
];

pub const LONG_VOWELS: [LongVowelPair; 4] = [
  LongVowelPair { short: "А", long: "АА", short_sound: "ah", long_sound: "aaah", example: "Аав" },
  LongVowelPair { short: "Э", long: "ЭЭ", short_sound: "eh", long_sound: "eeeh", example: "Ээж" },
  LongVowelPair { short: "О", long: "ОО", short_sound: "oh", long_sound: "oooh", example: "Оосор" },
  LongVowelPair { short: "У", long: "УУ", short_sound: "ooh", long_sound: "oooooh", example: "Уух" },
];

pub const CONSONANTS: [Consonant; 4] = [
  Consonant { letter: "М", name: "M", sound: "m" },
  Consonant { letter: "С", name: "S", sound: "s" },
  Consonant { letter: "Х", name: "Kh", sound: "h" },
  Consonant { letter: "Б", name: "B", sound: "b" },
];

pub const FULL_ALPHABET: [AlphabetLetter; 35] = [
  AlphabetLetter { letter: "А", sound: "ah", word: "Алим", word_sound: "ah-lim", translation: "Apple" },
  AlphabetLetter { letter: "Б", sound: "buh", word: "Бөмбөг", word_sound: "bum-bug", translation: "Ball" },
  AlphabetLetter { letter: "В", sound: "vuh", word: "Ваар", word_sound: "vaar", translation: "Vase" },
  AlphabetLetter { letter: "Г", sound: "guh", word: "Гар", word_sound: "gar", translation: "Hand" },
  AlphabetLetter { letter: "Д", sound: "duh", word: "Дээл", word_sound: "dail", translation: "Deel (Dress)" },
  AlphabetLetter { letter: "Е", sound: "yeh", word: "Ес", word_sound: "yes", translation: "Nine" },
  AlphabetLetter { letter: "Ё", sound: "yoh", word: "Ёотон", word_sound: "yo-ton", translation: "Sugar Cube" },
  AlphabetLetter { letter: "Ж", sound: "juh", word: "Жимс", word_sound: "jims", translation: "Fruit" },
  AlphabetLetter { letter: "З", sound: "zuh", word: "Зөгий", word_sound: "zuh-gii", translation: "Bee" },
  AlphabetLetter { letter: "И", sound: "ee", word: "Ирвэс", word_sound: "ir-ves", translation: "Leopard" },
  AlphabetLetter { letter: "Й", sound: "ee", word: "Йог", word_sound: "yog", translation: "Yoga" },
  AlphabetLetter { letter: "К", sound: "kuh", word: "Кино", word_sound: "ki-no", translation: "Movie" },
  AlphabetLetter { letter: "Л", sound: "luh", word: "Луу", word_sound: "loo", translation: "Dragon" },
  AlphabetLetter { letter: "М", sound: "muh", word: "Муур", word_sound: "moor", translation: "Cat" },
  AlphabetLetter { letter: "Н", sound: "nuh", word: "Нар", word_sound: "nar", translation: "Sun" },
  AlphabetLetter { letter: "О", sound: "oh", word: "Од", word_sound: "od", translation: "Star" },
  AlphabetLetter { letter: "Ө", sound: "uh", word: "Өглөө", word_sound: "uh-gluh", translation: "Morning" },
  AlphabetLetter { letter: "П", sound: "puh", word: "Пицца", word_sound: "pizza", translation: "Pizza" },
  AlphabetLetter { letter: "Р", sound: "ruh", word: "Радио", word_sound: "radio", translation: "Radio" },
  AlphabetLetter { letter: "С", sound: "suh", word: "Сар", word_sound: "sar", translation: "Moon" },
  AlphabetLetter { letter: "Т", sound: "tuh", word: "Тэмээ", word_sound: "tem-eh", translation: "Camel" },
  AlphabetLetter { letter: "У", sound: "ooh", word: "Уул", word_sound: "ool", translation: "Mountain" },
  AlphabetLetter { letter: "Ү", sound: "ew", word: "Үүл", word_sound: "ew-ul", translation: "Cloud" },
  AlphabetLetter { letter: "Ф", sound: "fuh", word: "Фото", word_sound: "photo", translation: "Photo" },
  AlphabetLetter { letter: "Х", sound: "huh", word: "Хонь", word_sound: "hon", translation: "Sheep" },
  AlphabetLetter { letter: "Ц", sound: "tsuh", word: "Цэцэг", word_sound: "tse-tseg", translation: "Flower" },
  AlphabetLetter { letter: "Ч", sound: "chuh", word: "Чих", word_sound: "chih", translation: "Ear" },
  AlphabetLetter { letter: "Ш", sound: "shuh", word: "Шүд", word_sound: "shud", translation: "Tooth" },
  AlphabetLetter { letter: "Щ", sound: "shch", word: "Щетка", word_sound: "shchet-ka", translation: "Brush (Loan)" },
  AlphabetLetter { letter: "Ъ", sound: "Hard Sign", word: "Гавъяа", word_sound: "gav-iya", translation: "Merit (In word)" },
  AlphabetLetter { letter: "Ы", sound: "ee", word: "Ахын", word_sound: "a-hin", translation: "Brother's (Suffix)" },
  AlphabetLetter { letter: "Ь", sound: "Soft Sign", word: "Морь", word_sound: "mor", translation: "Horse (Softener)" },
  AlphabetLetter { letter: "Э", sound: "eh", word: "Ээж", word_sound: "eh-j", translation: "Mother" },
  AlphabetLetter { letter: "Ю", sound: "you", word: "Юбка", word_sound: "yub-ka", translation: "Skirt" },
  AlphabetLetter { letter: "Я", sound: "yah", word: "Ямаа", word_sound: "yama", translation: "Goat" },
];

/// Look up an alphabet entry by its letter
pub fn find_letter(letter: &str)
  -> Option<&'static AlphabetLetter>
{   FULL_ALPHABET
      .iter()
      .find(|entry| entry.letter == letter)
}

/// Every letter of the alphabet, in order
/// (the select-all path of the story generator)
pub fn all_letters() -> Vec<String>
{   FULL_ALPHABET
      .iter()
      .map(|entry| entry.letter.to_string())
      .collect()
}
