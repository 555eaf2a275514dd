use color_eyre::Result;

use super::{Outcome, UserId};
use crate::db::models::{
    AttemptHistoryEntry, Category, LeaderboardEntry, LegacyAttemptEntry, OwnedQuizStats,
    QuestionWithOptions, Quiz, QuizSummary,
};
use crate::db::Db;
use crate::names::{LEADERBOARD_SIZE, QUIZZES_PER_PAGE};

// ---------------------------------------------------------------------------
// ListingRepository trait (DIP: service defines the abstraction it needs)
// ---------------------------------------------------------------------------

#[cfg_attr(test, mockall::automock)]
pub trait ListingRepository: Send + Sync {
    /// Number of active quizzes whose title matches the `LIKE` pattern.
    fn count_active_quizzes(
        &self,
        title_pattern: Option<String>,
    ) -> impl std::future::Future<Output = Result<i64>> + Send;

    /// Active quizzes, newest first.
    fn active_quizzes(
        &self,
        title_pattern: Option<String>,
        limit: i64,
        offset: i64,
    ) -> impl std::future::Future<Output = Result<Vec<QuizSummary>>> + Send;

    fn quiz_by_id(
        &self,
        quiz_id: i64,
    ) -> impl std::future::Future<Output = Result<Option<Quiz>>> + Send;

    fn questions_for_quiz(
        &self,
        quiz_id: i64,
    ) -> impl std::future::Future<Output = Result<Vec<QuestionWithOptions>>> + Send;

    fn category_by_id(
        &self,
        category_id: i64,
    ) -> impl std::future::Future<Output = Result<Option<Category>>> + Send;

    fn categories(&self) -> impl std::future::Future<Output = Result<Vec<Category>>> + Send;

    /// Best attempts: percentage descending, earlier first on ties.
    fn leaderboard(
        &self,
        quiz_id: i64,
        limit: i64,
    ) -> impl std::future::Future<Output = Result<Vec<LeaderboardEntry>>> + Send;

    fn owned_quiz_stats(
        &self,
        user_id: UserId,
    ) -> impl std::future::Future<Output = Result<Vec<OwnedQuizStats>>> + Send;

    fn attempt_history(
        &self,
        user_id: UserId,
    ) -> impl std::future::Future<Output = Result<Vec<AttemptHistoryEntry>>> + Send;

    fn legacy_attempt_history(
        &self,
        user_id: UserId,
    ) -> impl std::future::Future<Output = Result<Vec<LegacyAttemptEntry>>> + Send;
}

// ---------------------------------------------------------------------------
// Result types
// ---------------------------------------------------------------------------

/// One page of a listing. Page numbers start at 1.
#[derive(Clone, Debug)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub number: u32,
    pub per_page: u32,
    pub total_items: i64,
}

impl<T> Page<T> {
    pub fn total_pages(&self) -> u32 {
        let per_page = i64::from(self.per_page.max(1));
        ((self.total_items + per_page - 1) / per_page) as u32
    }

    pub fn has_previous(&self) -> bool {
        self.number > 1
    }

    pub fn has_next(&self) -> bool {
        self.number < self.total_pages()
    }
}

#[derive(Clone, Debug)]
pub struct QuizDetail {
    pub quiz: Quiz,
    pub category: Option<Category>,
    pub questions: Vec<QuestionWithOptions>,
    pub leaderboard: Vec<LeaderboardEntry>,
}

#[derive(Clone, Debug)]
pub struct StartableQuiz {
    pub quiz: Quiz,
    pub questions: Vec<QuestionWithOptions>,
}

#[derive(Clone, Debug, Default)]
pub struct Dashboard {
    /// The user's quizzes, newest first, each with the average percentage of
    /// the attempts it received.
    pub owned_quizzes: Vec<OwnedQuizStats>,
    /// The user's own attempts, most recent first.
    pub own_attempts: Vec<AttemptHistoryEntry>,
    pub legacy_attempts: Vec<LegacyAttemptEntry>,
}

/// Turn a search term into a substring `LIKE` pattern over the lowercased
/// title column, with the wildcard characters of the term itself escaped by
/// `\`. Lowercasing here is Unicode-aware, unlike SQLite's `LIKE`.
pub fn like_pattern(term: &str) -> Option<String> {
    let term = term.trim().to_lowercase();
    if term.is_empty() {
        return None;
    }

    let mut pattern = String::with_capacity(term.len() + 2);
    pattern.push('%');
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    Some(pattern)
}

// ---------------------------------------------------------------------------
// ListingService
// ---------------------------------------------------------------------------

#[derive(Clone)]
pub struct ListingService<R: ListingRepository = Db> {
    repo: R,
}

impl<R: ListingRepository> ListingService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    pub async fn list_active_quizzes(
        &self,
        search: Option<&str>,
        page: u32,
    ) -> Result<Page<QuizSummary>> {
        let number = page.max(1);
        let pattern = search.and_then(like_pattern);
        let per_page = QUIZZES_PER_PAGE;

        let total_items = self.repo.count_active_quizzes(pattern.clone()).await?;
        let offset = i64::from(number - 1) * i64::from(per_page);
        let items = if offset < total_items {
            self.repo
                .active_quizzes(pattern, i64::from(per_page), offset)
                .await?
        } else {
            Vec::new()
        };

        Ok(Page {
            items,
            number,
            per_page,
            total_items,
        })
    }

    pub async fn leaderboard(&self, quiz_id: i64) -> Result<Vec<LeaderboardEntry>> {
        self.repo
            .leaderboard(quiz_id, i64::from(LEADERBOARD_SIZE))
            .await
    }

    /// Public quiz page data; readable whatever the active flag says.
    pub async fn quiz_detail(&self, quiz_id: i64) -> Result<Outcome<QuizDetail>> {
        let Some(quiz) = self.repo.quiz_by_id(quiz_id).await? else {
            return Ok(Outcome::NotFound);
        };

        let category = match quiz.category_id {
            Some(category_id) => self.repo.category_by_id(category_id).await?,
            None => None,
        };
        let questions = self.repo.questions_for_quiz(quiz_id).await?;
        let leaderboard = self.leaderboard(quiz_id).await?;

        Ok(Outcome::Done(QuizDetail {
            quiz,
            category,
            questions,
            leaderboard,
        }))
    }

    /// The quiz as a taker sees it. Inactive quizzes cannot be started.
    pub async fn start_quiz(&self, quiz_id: i64) -> Result<Outcome<StartableQuiz>> {
        let quiz = match self.repo.quiz_by_id(quiz_id).await? {
            Some(quiz) if quiz.is_active => quiz,
            _ => return Ok(Outcome::NotFound),
        };

        let questions = self.repo.questions_for_quiz(quiz_id).await?;
        Ok(Outcome::Done(StartableQuiz { quiz, questions }))
    }

    pub async fn quiz(&self, quiz_id: i64) -> Result<Option<Quiz>> {
        self.repo.quiz_by_id(quiz_id).await
    }

    pub async fn categories(&self) -> Result<Vec<Category>> {
        self.repo.categories().await
    }

    pub async fn dashboard(&self, user_id: UserId) -> Result<Dashboard> {
        let owned_quizzes = self.repo.owned_quiz_stats(user_id).await?;
        let own_attempts = self.repo.attempt_history(user_id).await?;
        let legacy_attempts = self.repo.legacy_attempt_history(user_id).await?;

        Ok(Dashboard {
            owned_quizzes,
            own_attempts,
            legacy_attempts,
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::Utc;

    use super::*;

    fn summary(id: i64) -> QuizSummary {
        QuizSummary {
            id,
            title: format!("Quiz {id}"),
            description: String::new(),
            category_name: None,
            author: "alice".to_string(),
            created_at: Utc::now(),
            question_count: 0,
        }
    }

    fn quiz(is_active: bool) -> Quiz {
        Quiz {
            id: 1,
            title: "Hidden".to_string(),
            category_id: None,
            description: String::new(),
            created_by: 1,
            created_at: Utc::now(),
            is_active,
        }
    }

    #[test]
    fn like_pattern_escapes_wildcards() {
        assert_eq!(like_pattern("rust"), Some("%rust%".to_string()));
        assert_eq!(like_pattern(" 100%_ "), Some("%100\\%\\_%".to_string()));
        assert_eq!(like_pattern("   "), None);
    }

    #[test]
    fn like_pattern_lowercases_beyond_ascii() {
        assert_eq!(like_pattern("ÉLÉMENTS"), Some("%éléments%".to_string()));
    }

    #[test]
    fn page_navigation() {
        let page = Page::<()> {
            items: Vec::new(),
            number: 2,
            per_page: 6,
            total_items: 7,
        };
        assert_eq!(page.total_pages(), 2);
        assert!(page.has_previous());
        assert!(!page.has_next());

        let empty = Page::<()> {
            items: Vec::new(),
            number: 1,
            per_page: 6,
            total_items: 0,
        };
        assert_eq!(empty.total_pages(), 0);
        assert!(!empty.has_next());
    }

    #[tokio::test]
    async fn list_uses_fixed_page_size_and_offset() {
        let mut mock = MockListingRepository::new();
        mock.expect_count_active_quizzes()
            .withf(|pattern| pattern.as_deref() == Some("%geo%"))
            .returning(|_| Box::pin(async { Ok(8) }));
        mock.expect_active_quizzes()
            .withf(|pattern, limit, offset| {
                pattern.as_deref() == Some("%geo%") && *limit == 6 && *offset == 6
            })
            .returning(|_, _, _| Box::pin(async { Ok(vec![summary(1), summary(2)]) }));

        let svc = ListingService::new(mock);
        let page = svc.list_active_quizzes(Some("geo"), 2).await.unwrap();
        assert_eq!(page.items.len(), 2);
        assert_eq!(page.total_pages(), 2);
    }

    #[tokio::test]
    async fn list_clamps_page_zero_and_skips_pages_past_the_end() {
        let mut mock = MockListingRepository::new();
        mock.expect_count_active_quizzes()
            .returning(|_| Box::pin(async { Ok(3) }));
        mock.expect_active_quizzes()
            .withf(|_, _, offset| *offset == 0)
            .times(1)
            .returning(|_, _, _| Box::pin(async { Ok(vec![summary(1)]) }));

        let svc = ListingService::new(mock);
        let first = svc.list_active_quizzes(None, 0).await.unwrap();
        assert_eq!(first.number, 1);

        let beyond = svc.list_active_quizzes(Some(""), 5).await.unwrap();
        assert!(beyond.items.is_empty());
    }

    #[tokio::test]
    async fn leaderboard_is_capped_at_five() {
        let mut mock = MockListingRepository::new();
        mock.expect_leaderboard()
            .withf(|quiz_id, limit| *quiz_id == 9 && *limit == 5)
            .returning(|_, _| Box::pin(async { Ok(Vec::new()) }));

        let svc = ListingService::new(mock);
        assert!(svc.leaderboard(9).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn inactive_quiz_cannot_be_started_but_stays_readable() {
        let mut mock = MockListingRepository::new();
        mock.expect_quiz_by_id()
            .returning(|_| Box::pin(async { Ok(Some(quiz(false))) }));
        mock.expect_questions_for_quiz()
            .returning(|_| Box::pin(async { Ok(Vec::new()) }));
        mock.expect_leaderboard()
            .returning(|_, _| Box::pin(async { Ok(Vec::new()) }));

        let svc = ListingService::new(mock);
        assert!(matches!(svc.start_quiz(1).await.unwrap(), Outcome::NotFound));
        assert!(svc.quiz_detail(1).await.unwrap().is_done());
    }
}
