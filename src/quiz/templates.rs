//! Static string tables for quiz generation: question templates, the
//! correct-answer phrase banks, distractor pools and the stop-word list.
//! Kept as data so they can be swapped or localized without touching logic.

/// One of the ten fixed question categories. Each has its own question
/// phrasing and its own bank of correct-answer phrases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum TemplateKind {
    Purpose,
    Relationship,
    Application,
    Description,
    Significance,
    Implementation,
    Benefits,
    Demonstration,
    Importance,
    ProblemSolving,
}

/// The `{}` placeholder is replaced with a (lower-cased) concept.
pub const QUESTION_TEMPLATES: [(TemplateKind, &str); 10] = [
    (TemplateKind::Purpose, "What is the primary purpose of {}?"),
    (
        TemplateKind::Relationship,
        "How does {} relate to the main topic of these notes?",
    ),
    (
        TemplateKind::Application,
        "Which of the following best applies {} in practice?",
    ),
    (TemplateKind::Description, "Which statement best describes {}?"),
    (
        TemplateKind::Significance,
        "What is the significance of {} in this subject?",
    ),
    (
        TemplateKind::Implementation,
        "How is {} typically implemented or carried out?",
    ),
    (
        TemplateKind::Benefits,
        "What is the main benefit of understanding {}?",
    ),
    (
        TemplateKind::Demonstration,
        "How can {} be demonstrated or observed?",
    ),
    (
        TemplateKind::Importance,
        "Why is {} important in this area of study?",
    ),
    (
        TemplateKind::ProblemSolving,
        "How does {} help in solving problems in this field?",
    ),
];

impl TemplateKind {
    /// Correct-answer phrase bank for this kind. One entry is picked at
    /// random per question and the concept is substituted for `{}`.
    pub fn correct_phrases(self) -> &'static [&'static str] {
        match self {
            TemplateKind::Purpose => &[
                "To provide a framework for understanding {}",
                "To establish the foundations on which {} rests",
                "To explain the role {} plays in the subject",
            ],
            TemplateKind::Relationship => &[
                "It forms a core part of how the topic builds on {}",
                "It connects the surrounding material directly to {}",
                "It places {} at the center of the discussion",
            ],
            TemplateKind::Application => &[
                "By applying the principles of {} to concrete cases",
                "By using {} to guide practical decisions",
                "By working through examples grounded in {}",
            ],
            TemplateKind::Description => &[
                "A key idea characterized by the properties of {}",
                "The notion that the material defines through {}",
                "An idea best understood in terms of {}",
            ],
            TemplateKind::Significance => &[
                "It underpins much of the reasoning about {}",
                "It determines how {} is interpreted in this subject",
                "It gives {} its central place in the material",
            ],
            TemplateKind::Implementation => &[
                "Through a systematic approach built around {}",
                "By following the established methods for {}",
                "Step by step, guided by the structure of {}",
            ],
            TemplateKind::Benefits => &[
                "A deeper grasp of how {} shapes the subject",
                "The ability to reason correctly about {}",
                "A solid basis for further work involving {}",
            ],
            TemplateKind::Demonstration => &[
                "Through worked examples that exercise {}",
                "By observing {} at work in representative cases",
                "With experiments designed around {}",
            ],
            TemplateKind::Importance => &[
                "Because later material depends on {}",
                "Because {} recurs throughout the subject",
                "Because mastering {} unlocks the harder topics",
            ],
            TemplateKind::ProblemSolving => &[
                "By reducing hard problems to instances of {}",
                "By using {} as a lens for analyzing problems",
                "By framing each problem in terms of {}",
            ],
        }
    }
}

/// Generic-sounding wrong answers, usable for any question.
pub const GENERIC_DISTRACTORS: [&str; 10] = [
    "Through memorization techniques alone",
    "By avoiding practical applications entirely",
    "It has no measurable effect on outcomes",
    "Only through specialized laboratory equipment",
    "By following unrelated procedures",
    "It is a purely decorative concept",
    "Through random trial and error",
    "By ignoring the underlying theory",
    "It only applies to historical contexts",
    "Through repetition without understanding",
];

/// Distractor built from a concept *other* than the question's subject.
pub const CONCEPT_DISTRACTOR: &str = "By focusing primarily on {}";

/// Words too common to be useful quiz topics. `extract_topics` also drops
/// everything of length <= 4, so only the longer entries actually matter.
pub const STOP_WORDS: [&str; 36] = [
    "about", "above", "after", "again", "because", "before", "being", "below",
    "between", "could", "during", "every", "further", "having", "however",
    "other", "others", "should", "since", "their", "there", "therefore",
    "these", "thing", "things", "those", "through", "under", "until", "where",
    "which", "while", "within", "without", "would", "really",
];
