pub mod extract;
pub mod generate;
pub mod templates;

use std::collections::HashMap;

use crate::quiz::templates::TemplateKind;

#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
pub struct Quiz {
    pub questions: Vec<Question>,
}

impl Quiz {
    pub fn new(questions: Vec<Question>) -> Self {
        Self { questions }
    }
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct Question {
    pub id: usize,
    pub kind: TemplateKind,
    pub text: String,
    /// Always exactly four entries.
    pub options: Vec<String>,
    /// Index of the correct entry within `options`.
    pub correct_index: usize,
}

/// One interactive run through a quiz: the questions, the answers selected
/// so far, and whether the attempt has been scored. Serializable because it
/// rides inside the dialogue state.
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
pub struct QuizSession {
    pub quiz: Quiz,
    /// Question id -> selected option index. At most one entry per id.
    pub answers: HashMap<usize, usize>,
    pub completed: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct QuizResult {
    pub correct_count: usize,
    pub total_questions: usize,
    /// Rounded percentage in 0..=100.
    pub accuracy: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    UnknownQuestion(usize),
    OptionOutOfRange { question: usize, option: usize },
    AlreadyCompleted,
    Unanswered(usize),
}

impl std::fmt::Display for SessionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SessionError::UnknownQuestion(id) => write!(f, "no question with id {}", id),
            SessionError::OptionOutOfRange { question, option } => {
                write!(f, "option {} out of range for question {}", option, question)
            }
            SessionError::AlreadyCompleted => write!(f, "quiz already submitted"),
            SessionError::Unanswered(count) => {
                write!(f, "{} question(s) still unanswered", count)
            }
        }
    }
}

impl std::error::Error for SessionError {}

impl QuizSession {
    pub fn new(quiz: Quiz) -> Self {
        Self {
            quiz,
            answers: HashMap::new(),
            completed: false,
        }
    }

    /// Records an answer, overwriting any prior selection for the same
    /// question. Rejected once the attempt has been scored.
    pub fn select_answer(
        &mut self,
        question_id: usize,
        option_index: usize,
    ) -> Result<(), SessionError> {
        if self.completed {
            return Err(SessionError::AlreadyCompleted);
        }
        let question = self
            .quiz
            .questions
            .iter()
            .find(|q| q.id == question_id)
            .ok_or(SessionError::UnknownQuestion(question_id))?;
        if option_index >= question.options.len() {
            return Err(SessionError::OptionOutOfRange {
                question: question_id,
                option: option_index,
            });
        }
        self.answers.insert(question_id, option_index);
        Ok(())
    }

    pub fn is_fully_answered(&self) -> bool {
        self.answers.len() == self.quiz.questions.len()
    }

    /// Scores the attempt. Refuses partial answer sets; the dialogue layer
    /// only calls this after the last answer is in.
    pub fn submit(&mut self) -> Result<QuizResult, SessionError> {
        if self.completed {
            return Err(SessionError::AlreadyCompleted);
        }
        if !self.is_fully_answered() {
            return Err(SessionError::Unanswered(
                self.quiz.questions.len() - self.answers.len(),
            ));
        }
        let total_questions = self.quiz.questions.len();
        let correct_count = self
            .quiz
            .questions
            .iter()
            .filter(|q| self.answers.get(&q.id) == Some(&q.correct_index))
            .count();
        let accuracy = if total_questions == 0 {
            0
        } else {
            (100.0 * correct_count as f64 / total_questions as f64).round() as u32
        };
        self.completed = true;
        Ok(QuizResult {
            correct_count,
            total_questions,
            accuracy,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn question(id: usize, correct_index: usize) -> Question {
        Question {
            id,
            kind: TemplateKind::Purpose,
            text: format!("Question {}", id),
            options: vec![
                "option a".into(),
                "option b".into(),
                "option c".into(),
                "option d".into(),
            ],
            correct_index,
        }
    }

    fn session_of(n: usize) -> QuizSession {
        QuizSession::new(Quiz::new((0..n).map(|id| question(id, id % 4)).collect()))
    }

    #[test]
    fn select_answer_overwrites_prior_selection() {
        let mut session = session_of(3);
        session.select_answer(1, 0).unwrap();
        session.select_answer(1, 2).unwrap();
        assert_eq!(session.answers.get(&1), Some(&2));
        assert_eq!(session.answers.len(), 1);
    }

    #[test]
    fn select_answer_validates_question_and_option() {
        let mut session = session_of(2);
        assert_eq!(
            session.select_answer(9, 0),
            Err(SessionError::UnknownQuestion(9))
        );
        assert_eq!(
            session.select_answer(0, 4),
            Err(SessionError::OptionOutOfRange {
                question: 0,
                option: 4
            })
        );
        assert!(session.answers.is_empty());
    }

    #[test]
    fn submit_rejects_partial_answer_sets() {
        let mut session = session_of(10);
        for id in 0..6 {
            session.select_answer(id, 0).unwrap();
        }
        assert_eq!(session.submit(), Err(SessionError::Unanswered(4)));
        assert!(!session.completed);
    }

    #[test]
    fn seven_of_ten_scores_seventy_percent() {
        let mut session = session_of(10);
        for question in session.quiz.questions.clone() {
            // First seven get the right option, the rest a wrong one.
            let pick = if question.id < 7 {
                question.correct_index
            } else {
                (question.correct_index + 1) % 4
            };
            session.select_answer(question.id, pick).unwrap();
        }
        let result = session.submit().unwrap();
        assert_eq!(result.correct_count, 7);
        assert_eq!(result.total_questions, 10);
        assert_eq!(result.accuracy, 70);
        assert!(session.completed);
    }

    #[test]
    fn no_answers_after_submission() {
        let mut session = session_of(1);
        session.select_answer(0, 0).unwrap();
        session.submit().unwrap();
        assert_eq!(
            session.select_answer(0, 1),
            Err(SessionError::AlreadyCompleted)
        );
        assert_eq!(session.submit(), Err(SessionError::AlreadyCompleted));
    }
}
