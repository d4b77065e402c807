//! Question synthesis and option generation. Pure heuristic computation:
//! this never calls out anywhere and never fails, even for empty notes.
//! Every entry point takes an `Rng` so tests can seed it.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::quiz::extract::ConceptPool;
use crate::quiz::templates::{
    TemplateKind, CONCEPT_DISTRACTOR, GENERIC_DISTRACTORS, QUESTION_TEMPLATES,
};
use crate::quiz::{Question, Quiz};

pub const QUESTIONS_PER_QUIZ: usize = 10;
const OPTIONS_PER_QUESTION: usize = 4;
const DISTRACTORS_PER_QUESTION: usize = OPTIONS_PER_QUESTION - 1;
const MAX_CONCEPT_DISTRACTORS: usize = 5;

/// Builds the full quiz for a batch of lecture notes: extract a concept
/// pool, pair it round-robin with the question templates, then attach one
/// correct option and three distractors to each question.
pub fn generate_quiz<R: Rng>(notes: &str, rng: &mut R) -> Quiz {
    let pool = ConceptPool::from_text(notes);
    let questions = QUESTION_TEMPLATES
        .iter()
        .take(QUESTIONS_PER_QUIZ)
        .enumerate()
        .map(|(i, (kind, template))| {
            let concept = pool.concept_for(i).to_lowercase();
            let text = template.replace("{}", &concept);
            build_question(i, *kind, text, &concept, &pool, rng)
        })
        .collect();
    Quiz::new(questions)
}

fn build_question<R: Rng>(
    id: usize,
    kind: TemplateKind,
    text: String,
    concept: &str,
    pool: &ConceptPool,
    rng: &mut R,
) -> Question {
    let correct = correct_option(kind, concept, rng);

    // Tag each option while shuffling so the correct one can be located
    // afterwards.
    let mut tagged: Vec<(bool, String)> = vec![(true, correct)];
    tagged.extend(
        distractors(concept, pool, rng)
            .into_iter()
            .map(|text| (false, text)),
    );
    tagged.shuffle(rng);

    let correct_index = tagged
        .iter()
        .position(|(is_correct, _)| *is_correct)
        .unwrap_or(0);
    let options = tagged.into_iter().map(|(_, text)| text).collect();

    Question {
        id,
        kind,
        text,
        options,
        correct_index,
    }
}

/// One phrase from the kind's bank, picked uniformly, concept substituted.
fn correct_option<R: Rng>(kind: TemplateKind, concept: &str, rng: &mut R) -> String {
    let bank = kind.correct_phrases();
    let phrase = bank.choose(rng).unwrap_or(&bank[0]);
    phrase.replace("{}", concept)
}

/// The generic pool plus up to five options built from *other* concepts,
/// shuffled together; the first three survive.
fn distractors<R: Rng>(concept: &str, pool: &ConceptPool, rng: &mut R) -> Vec<String> {
    let mut candidates: Vec<String> = GENERIC_DISTRACTORS
        .iter()
        .map(|d| d.to_string())
        .collect();
    candidates.extend(
        pool.others(concept)
            .take(MAX_CONCEPT_DISTRACTORS)
            .map(|other| CONCEPT_DISTRACTOR.replace("{}", &other.to_lowercase())),
    );
    candidates.shuffle(rng);
    candidates.truncate(DISTRACTORS_PER_QUESTION);
    candidates
}
