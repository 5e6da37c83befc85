use async_trait::async_trait;
use rand::Rng;
use rand::rng;
use rand::seq::SliceRandom;
use serde::Deserialize;
use std::path::Path;
use thiserror::Error;

use quiz_core::matching::normalize;
use quiz_core::model::{
    AnswerStyle, CategoryFilter, CategoryName, PracticeMode, QuestionError, QuestionItem,
    QuestionLimit, SessionConfig, VerbEntry, VerbError,
};

use crate::contract::{QuestionProvider, TransportError};

/// Distractor count for multiple-choice items; fewer available answers in
/// the dictionary makes the question fall back to free text.
const CHOICE_DISTRACTORS: usize = 3;

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum DictionaryError {
    #[error("cannot read dictionary file: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed dictionary: {0}")]
    Parse(#[from] serde_json::Error),

    #[error(transparent)]
    Verb(#[from] VerbError),
}

/// Stored shape of one dictionary entry. Category names validate during
/// deserialization.
#[derive(Debug, Deserialize)]
struct VerbRecord {
    present: String,
    past: String,
    continuous: String,
    translation: String,
    category: CategoryName,
}

impl VerbRecord {
    fn into_entry(self) -> Result<VerbEntry, VerbError> {
        VerbEntry::new(
            self.present,
            self.past,
            self.continuous,
            self.translation,
            self.category,
        )
    }
}

//
// ─── DICTIONARY ────────────────────────────────────────────────────────────────
//

/// Local verb dictionary the drill generator draws from.
#[derive(Debug, Clone, Default)]
pub struct VerbDictionary {
    entries: Vec<VerbEntry>,
}

impl VerbDictionary {
    #[must_use]
    pub fn new(entries: Vec<VerbEntry>) -> Self {
        Self { entries }
    }

    /// Parse a dictionary from a JSON array of entries.
    ///
    /// # Errors
    ///
    /// Returns `DictionaryError::Parse` for malformed JSON and the entry
    /// validation errors for blank forms or categories.
    pub fn from_json(json: &str) -> Result<Self, DictionaryError> {
        let records: Vec<VerbRecord> = serde_json::from_str(json)?;
        let entries = records
            .into_iter()
            .map(VerbRecord::into_entry)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::new(entries))
    }

    /// Load a dictionary from a JSON file on disk.
    ///
    /// # Errors
    ///
    /// Returns `DictionaryError::Io` when the file cannot be read, plus the
    /// parse/validation errors of [`VerbDictionary::from_json`].
    pub fn load(path: impl AsRef<Path>) -> Result<Self, DictionaryError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    #[must_use]
    pub fn entries(&self) -> &[VerbEntry] {
        &self.entries
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn filtered(&self, filter: &CategoryFilter) -> Vec<&VerbEntry> {
        self.entries
            .iter()
            .filter(|entry| filter.accepts(entry.category()))
            .collect()
    }
}

//
// ─── DRILL GENERATION ──────────────────────────────────────────────────────────
//

/// The prompt/answer pair a drill asks for, before rendering as free text
/// or multiple choice.
struct Drill {
    prompt: String,
    answers: Vec<String>,
}

fn build_drill(verb: &VerbEntry, mode: PracticeMode, reverse: bool) -> Drill {
    match mode {
        PracticeMode::SimplePast => {
            if reverse {
                let past = verb.past_variants().remove(0);
                Drill {
                    prompt: format!("Which verb has the simple past '{past}'?"),
                    answers: vec![verb.present().to_string()],
                }
            } else {
                Drill {
                    prompt: format!("What is the simple past of '{}'?", verb.present()),
                    answers: verb.past_variants(),
                }
            }
        }
        PracticeMode::Continuous => Drill {
            prompt: format!("What is the continuous form of '{}'?", verb.present()),
            answers: vec![verb.continuous().to_string()],
        },
        PracticeMode::Translation => Drill {
            prompt: format!("How do you say '{}' in Spanish?", verb.present()),
            answers: vec![verb.translation().to_string()],
        },
        PracticeMode::WhQuestion => {
            let past = verb.past_variants().remove(0);
            Drill {
                prompt: format!("Turn 'You {past}' into a question"),
                answers: vec![
                    format!("did you {}", verb.present()),
                    format!("did you {}?", verb.present()),
                ],
            }
        }
    }
}

/// The answer other entries would give to the same drill, used as
/// distractor material for multiple-choice items.
fn drill_answer(verb: &VerbEntry, mode: PracticeMode, reverse: bool) -> String {
    match mode {
        PracticeMode::SimplePast => {
            if reverse {
                verb.present().to_string()
            } else {
                verb.past_variants().remove(0)
            }
        }
        PracticeMode::Continuous => verb.continuous().to_string(),
        PracticeMode::Translation => verb.translation().to_string(),
        PracticeMode::WhQuestion => format!("did you {}", verb.present()),
    }
}

//
// ─── PROVIDER ──────────────────────────────────────────────────────────────────
//

/// Generates drill questions from a local dictionary.
///
/// Mirrors the original server's question endpoint: filter entries by
/// category, sample for bounded runs, shuffle for unlimited ones, and pick
/// the drill direction per question.
#[derive(Debug, Clone)]
pub struct DictionaryProvider {
    dictionary: VerbDictionary,
}

impl DictionaryProvider {
    #[must_use]
    pub fn new(dictionary: VerbDictionary) -> Self {
        Self { dictionary }
    }

    /// Generate the question list for `config`. Empty when nothing in the
    /// dictionary passes the category filter.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError` if a generated item fails validation.
    pub fn generate(&self, config: &SessionConfig) -> Result<Vec<QuestionItem>, QuestionError> {
        let mut rng = rng();
        let pool = self.dictionary.filtered(config.category());
        if pool.is_empty() {
            return Ok(Vec::new());
        }

        let mut selected = pool.clone();
        selected.shuffle(&mut rng);
        if let QuestionLimit::Bounded(count) = config.limit() {
            selected.truncate(usize::try_from(count).unwrap_or(usize::MAX));
        }

        let mut questions = Vec::with_capacity(selected.len());
        for verb in selected {
            let reverse =
                config.mode() == PracticeMode::SimplePast && rng.random_bool(0.5);
            let item = match config.style() {
                AnswerStyle::Typed => {
                    let drill = build_drill(verb, config.mode(), reverse);
                    QuestionItem::free_text(drill.prompt, drill.answers)?
                }
                AnswerStyle::Choice => {
                    build_choice_question(verb, &pool, config.mode(), reverse, &mut rng)?
                }
            };
            questions.push(item);
        }
        Ok(questions)
    }
}

fn build_choice_question(
    verb: &VerbEntry,
    pool: &[&VerbEntry],
    mode: PracticeMode,
    reverse: bool,
    rng: &mut impl Rng,
) -> Result<QuestionItem, QuestionError> {
    let drill = build_drill(verb, mode, reverse);
    let correct = drill.answers[0].clone();
    let correct_norm = normalize(&correct);

    let mut distractors: Vec<String> = Vec::new();
    for &other in pool {
        let candidate = drill_answer(other, mode, reverse);
        let candidate_norm = normalize(&candidate);
        if candidate_norm == correct_norm
            || distractors.iter().any(|d| normalize(d) == candidate_norm)
        {
            continue;
        }
        distractors.push(candidate);
    }
    distractors.shuffle(rng);
    distractors.truncate(CHOICE_DISTRACTORS);

    // Not enough distinct answers for a real choice; ask it as free text.
    if distractors.len() < CHOICE_DISTRACTORS {
        return QuestionItem::free_text(drill.prompt, drill.answers);
    }

    let correct_index = rng.random_range(0..=distractors.len());
    let mut options = distractors;
    options.insert(correct_index, correct);
    QuestionItem::multiple_choice(drill.prompt, options, correct_index)
}

#[async_trait]
impl QuestionProvider for DictionaryProvider {
    async fn fetch_questions(
        &self,
        config: &SessionConfig,
    ) -> Result<Vec<QuestionItem>, TransportError> {
        self.generate(config)
            .map_err(|e| TransportError::Decode(format!("generated invalid question: {e}")))
    }
}
