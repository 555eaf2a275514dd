use std::collections::{BTreeMap, HashMap};

use chrono::Utc;
use color_eyre::Result;

use super::{Outcome, UserId};
use crate::db::models::{AnswerKeyRow, NewQuizAttempt, QuizAttempt};
use crate::db::Db;
use crate::names::ANSWER_FIELD_PREFIX;

/// Selected option id per question id.
pub type SubmittedAnswers = HashMap<i64, i64>;

/// Correctness of every option of every question of a quiz, as stored at the
/// moment of scoring.
#[derive(Clone, Debug, Default)]
pub struct AnswerKey {
    questions: BTreeMap<i64, HashMap<i64, bool>>,
}

impl AnswerKey {
    pub fn from_rows(rows: impl IntoIterator<Item = AnswerKeyRow>) -> Self {
        let mut questions: BTreeMap<i64, HashMap<i64, bool>> = BTreeMap::new();
        for row in rows {
            let options = questions.entry(row.question_id).or_default();
            if let Some(option_id) = row.option_id {
                options.insert(option_id, row.is_correct.unwrap_or(false));
            }
        }
        Self { questions }
    }

    pub fn total_questions(&self) -> i64 {
        self.questions.len() as i64
    }

    /// Whether `option_id` is a correct option of `question_id`. Options of
    /// other questions and unknown ids are never correct.
    pub fn is_correct(&self, question_id: i64, option_id: i64) -> bool {
        self.questions
            .get(&question_id)
            .and_then(|options| options.get(&option_id))
            .copied()
            .unwrap_or(false)
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScoreCard {
    pub score: i64,
    pub total_questions: i64,
    pub percentage: f64,
}

pub fn percentage(score: i64, total_questions: i64) -> f64 {
    if total_questions > 0 {
        score as f64 / total_questions as f64 * 100.0
    } else {
        0.0
    }
}

/// One point per question whose submitted option is that question's correct
/// option. Missing answers and foreign or unknown option ids earn nothing.
pub fn score(key: &AnswerKey, answers: &SubmittedAnswers) -> ScoreCard {
    let score = key
        .questions
        .keys()
        .filter(|&&question_id| {
            answers
                .get(&question_id)
                .is_some_and(|&option_id| key.is_correct(question_id, option_id))
        })
        .count() as i64;
    let total_questions = key.total_questions();

    ScoreCard {
        score,
        total_questions,
        percentage: percentage(score, total_questions),
    }
}

/// Collect `question_<id>=<option id>` form fields. Anything that does not
/// parse is dropped and so counts as unanswered.
pub fn answers_from_form(form: &HashMap<String, String>) -> SubmittedAnswers {
    form.iter()
        .filter_map(|(key, value)| {
            let question_id = key.strip_prefix(ANSWER_FIELD_PREFIX)?.parse().ok()?;
            let option_id = value.trim().parse().ok()?;
            Some((question_id, option_id))
        })
        .collect()
}

// ---------------------------------------------------------------------------
// ScoringRepository trait (DIP: service defines the abstraction it needs)
// ---------------------------------------------------------------------------

#[cfg_attr(test, mockall::automock)]
pub trait ScoringRepository: Send + Sync {
    fn quiz_exists(&self, quiz_id: i64) -> impl std::future::Future<Output = Result<bool>> + Send;

    fn answer_key(
        &self,
        quiz_id: i64,
    ) -> impl std::future::Future<Output = Result<AnswerKey>> + Send;

    fn insert_quiz_attempt(
        &self,
        attempt: NewQuizAttempt,
    ) -> impl std::future::Future<Output = Result<QuizAttempt>> + Send;
}

#[derive(Clone, Debug)]
pub struct Submission {
    pub card: ScoreCard,
    /// The stored attempt; `None` for anonymous submissions.
    pub attempt: Option<QuizAttempt>,
}

// ---------------------------------------------------------------------------
// ScoringService
// ---------------------------------------------------------------------------

#[derive(Clone)]
pub struct ScoringService<R: ScoringRepository = Db> {
    repo: R,
}

impl<R: ScoringRepository> ScoringService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Score `answers` against the quiz's current questions. Authenticated
    /// submitters get a new attempt row every time; anonymous ones only get
    /// the result.
    pub async fn submit(
        &self,
        quiz_id: i64,
        submitter: Option<UserId>,
        answers: &SubmittedAnswers,
    ) -> Result<Outcome<Submission>> {
        if !self.repo.quiz_exists(quiz_id).await? {
            return Ok(Outcome::NotFound);
        }

        let key = self.repo.answer_key(quiz_id).await?;
        let card = score(&key, answers);

        let attempt = match submitter {
            Some(user_id) => {
                let attempt = self
                    .repo
                    .insert_quiz_attempt(NewQuizAttempt {
                        user_id,
                        quiz_id,
                        score: card.score,
                        total_questions: card.total_questions,
                        percentage: card.percentage,
                        created_at: Utc::now(),
                    })
                    .await?;
                tracing::info!(
                    "attempt {} recorded for quiz {quiz_id} by user_id: {user_id} ({}/{})",
                    attempt.id,
                    card.score,
                    card.total_questions
                );
                Some(attempt)
            }
            None => {
                tracing::debug!(
                    "anonymous submission for quiz {quiz_id} scored {}/{}",
                    card.score,
                    card.total_questions
                );
                None
            }
        };

        Ok(Outcome::Done(Submission { card, attempt }))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    // Q1 = 1 with options A..D (A correct), Q2 = 2 with options E..H (F correct)
    const Q1: i64 = 1;
    const Q2: i64 = 2;
    const A: i64 = 11;
    const B: i64 = 12;
    const C: i64 = 13;
    const D: i64 = 14;
    const E: i64 = 21;
    const F: i64 = 22;
    const G: i64 = 23;
    const H: i64 = 24;

    fn row(question_id: i64, option_id: i64, is_correct: bool) -> AnswerKeyRow {
        AnswerKeyRow {
            question_id,
            option_id: Some(option_id),
            is_correct: Some(is_correct),
        }
    }

    fn two_question_key() -> AnswerKey {
        AnswerKey::from_rows([
            row(Q1, A, true),
            row(Q1, B, false),
            row(Q1, C, false),
            row(Q1, D, false),
            row(Q2, E, false),
            row(Q2, F, true),
            row(Q2, G, false),
            row(Q2, H, false),
        ])
    }

    #[test]
    fn one_of_two_correct_is_fifty_percent() {
        let answers = SubmittedAnswers::from([(Q1, A), (Q2, G)]);
        let card = score(&two_question_key(), &answers);
        assert_eq!(
            card,
            ScoreCard {
                score: 1,
                total_questions: 2,
                percentage: 50.0
            }
        );
    }

    #[test]
    fn no_answers_scores_zero() {
        let card = score(&two_question_key(), &SubmittedAnswers::new());
        assert_eq!(card.score, 0);
        assert_eq!(card.total_questions, 2);
        assert_eq!(card.percentage, 0.0);
    }

    #[test]
    fn correct_option_of_another_question_earns_nothing() {
        let answers = SubmittedAnswers::from([(Q2, A)]);
        assert_eq!(score(&two_question_key(), &answers).score, 0);
    }

    #[test]
    fn unknown_option_and_question_ids_are_ignored() {
        let answers = SubmittedAnswers::from([(Q1, 9999), (Q2, F), (777, A)]);
        let card = score(&two_question_key(), &answers);
        assert_eq!(card.score, 1);
        assert_eq!(card.total_questions, 2);
    }

    #[test]
    fn empty_quiz_scores_zero_percent() {
        let key = AnswerKey::default();
        let card = score(&key, &SubmittedAnswers::from([(Q1, A)]));
        assert_eq!(card.total_questions, 0);
        assert_eq!(card.percentage, 0.0);
    }

    #[test]
    fn question_without_options_still_counts_toward_total() {
        let key = AnswerKey::from_rows([
            row(Q1, A, true),
            AnswerKeyRow {
                question_id: Q2,
                option_id: None,
                is_correct: None,
            },
        ]);
        let card = score(&key, &SubmittedAnswers::from([(Q1, A)]));
        assert_eq!(card.total_questions, 2);
        assert_eq!(card.percentage, 50.0);
    }

    #[test]
    fn scoring_is_deterministic() {
        let key = two_question_key();
        let answers = SubmittedAnswers::from([(Q1, A), (Q2, F)]);
        assert_eq!(score(&key, &answers), score(&key, &answers));
    }

    #[test]
    fn answers_from_form_skips_garbage() {
        let form = HashMap::from([
            ("question_1".to_string(), "11".to_string()),
            ("question_2".to_string(), "not-a-number".to_string()),
            ("question_x".to_string(), "5".to_string()),
            ("csrf".to_string(), "abc".to_string()),
        ]);
        let answers = answers_from_form(&form);
        assert_eq!(answers, SubmittedAnswers::from([(1, 11)]));
    }

    // ----- service tests -----

    fn repo_with_key() -> MockScoringRepository {
        let mut mock = MockScoringRepository::new();
        mock.expect_quiz_exists()
            .returning(|_| Box::pin(async { Ok(true) }));
        mock.expect_answer_key()
            .returning(|_| Box::pin(async { Ok(two_question_key()) }));
        mock
    }

    #[tokio::test]
    async fn anonymous_submission_is_not_persisted() {
        // No insert expectation: persisting would panic the mock.
        let svc = ScoringService::new(repo_with_key());
        let answers = SubmittedAnswers::from([(Q1, A), (Q2, F)]);
        let outcome = svc.submit(1, None, &answers).await.unwrap();

        let Outcome::Done(submission) = outcome else {
            panic!("expected a score");
        };
        assert_eq!(submission.card.percentage, 100.0);
        assert!(submission.attempt.is_none());
    }

    #[tokio::test]
    async fn authenticated_submission_records_attempt() {
        let mut mock = repo_with_key();
        mock.expect_insert_quiz_attempt()
            .withf(|a| a.user_id == 3 && a.score == 1 && a.total_questions == 2 && a.percentage == 50.0)
            .times(1)
            .returning(|a| {
                let attempt = QuizAttempt {
                    id: 1,
                    user_id: a.user_id,
                    quiz_id: a.quiz_id,
                    score: a.score,
                    total_questions: a.total_questions,
                    percentage: a.percentage,
                    created_at: a.created_at,
                };
                Box::pin(async move { Ok(attempt) })
            });

        let svc = ScoringService::new(mock);
        let answers = SubmittedAnswers::from([(Q1, A), (Q2, G)]);
        let outcome = svc.submit(1, Some(3), &answers).await.unwrap();
        assert!(matches!(outcome, Outcome::Done(ref s) if s.attempt.is_some()));
    }

    #[tokio::test]
    async fn unknown_quiz_is_not_found() {
        let mut mock = MockScoringRepository::new();
        mock.expect_quiz_exists()
            .returning(|_| Box::pin(async { Ok(false) }));

        let svc = ScoringService::new(mock);
        let outcome = svc.submit(42, Some(3), &SubmittedAnswers::new()).await.unwrap();
        assert!(matches!(outcome, Outcome::NotFound));
    }
}
