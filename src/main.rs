mod progress;
mod quiz;

use std::io::Cursor;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use dotenv::dotenv;
use teloxide::{
    dispatching::dialogue::{serializer::Json, ErasedStorage, SqliteStorage, Storage},
    net::Download,
    prelude::*,
    types::{ChatAction, KeyboardButton, KeyboardMarkup, KeyboardRemove},
};

use progress::ProgressStore;
use quiz::{generate::generate_quiz, QuizSession};

type QuizDialogue = Dialogue<State, ErasedStorage<State>>;
type HandlerResult = Result<(), Box<dyn std::error::Error + Send + Sync>>;

#[derive(Clone, Default, serde::Serialize, serde::Deserialize)]
pub enum State {
    #[default]
    Start,
    ReceiveCourseCode,
    ReceiveLectureNotes {
        course: String,
    },
    TakingQuiz {
        course: String,
        session: QuizSession,
        question_number: usize,
        started_at: DateTime<Utc>,
    },
}

type SessionStorage = std::sync::Arc<ErasedStorage<State>>;

#[tokio::main]
async fn main() {
    dotenv().ok();
    pretty_env_logger::init();
    log::info!("Starting study assistant bot...");

    let bot = Bot::from_env();

    println!("Establishing connection to the database...");
    let storage: SessionStorage = SqliteStorage::open("db.sqlite", Json)
        .await
        .expect("Failed to open the dialogue database")
        .erase();
    println!("Connection established");

    let store_path =
        std::env::var("PROGRESS_STORE").unwrap_or_else(|_| "progress.json".to_string());
    let progress = Arc::new(ProgressStore::open(store_path).await);

    Dispatcher::builder(
        bot,
        Update::filter_message()
            .enter_dialogue::<Message, ErasedStorage<State>, State>()
            .branch(dptree::case![State::Start].endpoint(start))
            .branch(dptree::case![State::ReceiveCourseCode].endpoint(receive_course_code))
            .branch(
                dptree::case![State::ReceiveLectureNotes { course }]
                    .endpoint(receive_lecture_notes),
            )
            .branch(
                dptree::case![State::TakingQuiz {
                    course,
                    session,
                    question_number,
                    started_at
                }]
                .endpoint(
                    move |bot: Bot,
                          dialogue: QuizDialogue,
                          (course, session, question_number, started_at): (
                        String,
                        QuizSession,
                        usize,
                        DateTime<Utc>,
                    ),
                          msg: Message| {
                        taking_quiz(
                            progress.clone(),
                            bot,
                            dialogue,
                            (course, session, question_number, started_at),
                            msg,
                        )
                    },
                ),
            ),
    )
    .dependencies(dptree::deps![storage])
    .enable_ctrlc_handler()
    .build()
    .dispatch()
    .await;
}

const GREETING_TEXT: &str = "Hi! I'm your study assistant. Send me your lecture notes and I'll \
turn them into a practice quiz. Which course are you studying for? (e.g. CS101)";

async fn start(bot: Bot, dialogue: QuizDialogue, msg: Message) -> HandlerResult {
    bot.send_message(msg.chat.id, GREETING_TEXT).await?;

    dialogue.update(State::ReceiveCourseCode).await?;
    Ok(())
}

async fn receive_course_code(bot: Bot, dialogue: QuizDialogue, msg: Message) -> HandlerResult {
    match msg.text() {
        Some(course) => {
            let course = course.trim().to_string();
            bot.send_message(
                msg.chat.id,
                format!(
                    "Got it, {} it is! Now upload your lecture notes as a plain-text (.txt) \
                     document and I'll build a quiz from them.",
                    course
                ),
            )
            .await?;
            dialogue.update(State::ReceiveLectureNotes { course }).await?;
        }
        None => {
            bot.send_message(msg.chat.id, "Please type the course code (text only)")
                .await?;
        }
    }
    Ok(())
}

async fn receive_lecture_notes(
    bot: Bot,
    dialogue: QuizDialogue,
    course: String,
    msg: Message,
) -> HandlerResult {
    let document = match msg.document() {
        Some(document) => document,
        None => {
            bot.send_message(
                msg.chat.id,
                "Please upload your notes as a .txt document to get a quiz",
            )
            .await?;
            return Ok(());
        }
    };

    // Only plain-text uploads are accepted; anything else is rejected
    // without touching the dialogue state.
    if !is_plain_text_upload(document.mime_type.as_ref()) {
        bot.send_message(
            msg.chat.id,
            "That file doesn't look like plain text. Please upload a .txt file",
        )
        .await?;
        return Ok(());
    }

    // We don't really care about the result here, so we'll just ignore the error if this action is unsuccessful
    // But it adds to the user's experience if it works!
    let _ = bot.send_chat_action(msg.chat.id, ChatAction::Typing).await;

    let file = bot.get_file(document.file.id.clone()).await?;
    let mut buffer = Cursor::new(Vec::new());
    bot.download_file(&file.path, &mut buffer).await?;
    let notes = String::from_utf8_lossy(buffer.get_ref()).into_owned();

    log::debug!(
        "Loaded {} bytes of notes for course {}",
        notes.len(),
        course
    );

    let session = QuizSession::new(generate_quiz(&notes, &mut rand::thread_rng()));

    bot.send_message(
        msg.chat.id,
        format!(
            "Your quiz is ready -- {} questions. Let's go!",
            session.quiz.questions.len()
        ),
    )
    .await?;
    send_question(&bot, msg.chat.id, &session, 0).await?;

    dialogue
        .update(State::TakingQuiz {
            course,
            session,
            question_number: 0,
            started_at: Utc::now(),
        })
        .await?;
    Ok(())
}

async fn send_question(
    bot: &Bot,
    chat_id: ChatId,
    session: &QuizSession,
    question_number: usize,
) -> HandlerResult {
    let question = &session.quiz.questions[question_number];

    let keyboard = KeyboardMarkup::new(
        question
            .options
            .iter()
            .map(|option| vec![KeyboardButton::new(option.clone())])
            .collect::<Vec<_>>(),
    );
    let text = format!(
        "Question {} of {}:\n{}",
        question_number + 1,
        session.quiz.questions.len(),
        question.text
    );

    bot.send_message(chat_id, text).reply_markup(keyboard).await?;
    Ok(())
}

async fn taking_quiz(
    progress: Arc<ProgressStore>,
    bot: Bot,
    dialogue: QuizDialogue,
    (course, mut session, question_number, started_at): (String, QuizSession, usize, DateTime<Utc>),
    msg: Message,
) -> HandlerResult {
    let question_id = session.quiz.questions[question_number].id;
    let selected = msg.text().and_then(|answer| {
        session.quiz.questions[question_number]
            .options
            .iter()
            .position(|option| option == answer)
    });
    let selected = match selected {
        Some(index) => index,
        None => {
            bot.send_message(msg.chat.id, "Please pick one of the answers on the keyboard")
                .await?;
            return Ok(());
        }
    };

    if let Err(e) = session.select_answer(question_id, selected) {
        log::warn!("Rejected answer for question {}: {}", question_id, e);
        bot.send_message(msg.chat.id, "Please pick one of the answers on the keyboard")
            .await?;
        return Ok(());
    }

    let next = question_number + 1;
    if next < session.quiz.questions.len() {
        send_question(&bot, msg.chat.id, &session, next).await?;
        dialogue
            .update(State::TakingQuiz {
                course,
                session,
                question_number: next,
                started_at,
            })
            .await?;
        return Ok(());
    }

    // Last answer is in; score the attempt.
    let result = match session.submit() {
        Ok(result) => result,
        Err(e) => {
            log::error!("Could not score the quiz: {}", e);
            bot.send_message(msg.chat.id, "Something went wrong, let's start over. Upload your notes again")
                .await?;
            dialogue.update(State::ReceiveLectureNotes { course }).await?;
            return Ok(());
        }
    };

    bot.send_message(
        msg.chat.id,
        format!(
            "Quiz finished! You answered {} out of {} correctly ({}% accuracy).\n\nSend me \
             another .txt with lecture notes whenever you want a new quiz.",
            result.correct_count, result.total_questions, result.accuracy
        ),
    )
    .reply_markup(KeyboardRemove::new())
    .await?;

    // Best effort: the results are already on screen, so a failed write
    // only costs the aggregate stats.
    let study_minutes = minutes_since(started_at);
    let user_id = msg.chat.id.to_string();
    let course_for_store = course.clone();
    tokio::spawn(async move {
        if let Err(e) = progress
            .record_quiz(&user_id, &course_for_store, &result, study_minutes)
            .await
        {
            log::warn!(
                "Failed to persist study progress for {}/{}: {}",
                user_id,
                course_for_store,
                e
            );
        }
    });

    dialogue.update(State::ReceiveLectureNotes { course }).await?;
    Ok(())
}

/// Gate for uploaded documents: only `text/plain` reaches quiz generation.
/// A missing MIME type counts as not plain text.
fn is_plain_text_upload(mime: Option<&mime::Mime>) -> bool {
    mime.is_some_and(|mime| mime.essence_str() == mime::TEXT_PLAIN.essence_str())
}

fn minutes_since(started_at: DateTime<Utc>) -> u32 {
    Utc::now()
        .signed_duration_since(started_at)
        .num_minutes()
        .max(0) as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_plain_text_uploads_pass_the_gate() {
        let plain: mime::Mime = "text/plain".parse().unwrap();
        let plain_utf8: mime::Mime = "text/plain; charset=utf-8".parse().unwrap();
        let pdf: mime::Mime = "application/pdf".parse().unwrap();

        assert!(is_plain_text_upload(Some(&plain)));
        assert!(is_plain_text_upload(Some(&plain_utf8)));
        assert!(!is_plain_text_upload(Some(&pdf)));
        assert!(!is_plain_text_upload(None));
    }
}

