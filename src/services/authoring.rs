use chrono::{DateTime, Utc};
use color_eyre::Result;

use super::{Outcome, UserId, ValidationError};
use crate::db::models::{AuthUser, Category, QuestionWithOptions, Quiz};
use crate::db::Db;
use crate::models::{CategoryDraft, OptionDraft, QuestionDraft, QuizFields};
use crate::names::{MAX_CATEGORY_NAME_LENGTH, MAX_OPTION_LENGTH, MAX_TITLE_LENGTH};

pub const CORRECT_OPTION_MESSAGE: &str = "exactly one option must be marked correct";

// ---------------------------------------------------------------------------
// AuthoringRepository trait (DIP: service defines the abstraction it needs)
// ---------------------------------------------------------------------------

#[cfg_attr(test, mockall::automock)]
pub trait AuthoringRepository: Send + Sync {
    /// Owner of the quiz, or `None` when it does not exist.
    fn quiz_owner(
        &self,
        quiz_id: i64,
    ) -> impl std::future::Future<Output = Result<Option<UserId>>> + Send;

    /// Owner of the quiz the question belongs to, or `None` when the question
    /// does not exist.
    fn question_owner(
        &self,
        question_id: i64,
    ) -> impl std::future::Future<Output = Result<Option<UserId>>> + Send;

    fn insert_quiz(
        &self,
        owner: UserId,
        fields: &QuizFields,
        created_at: DateTime<Utc>,
    ) -> impl std::future::Future<Output = Result<Quiz>> + Send;

    fn update_quiz(
        &self,
        quiz_id: i64,
        fields: &QuizFields,
    ) -> impl std::future::Future<Output = Result<Quiz>> + Send;

    fn delete_quiz(&self, quiz_id: i64) -> impl std::future::Future<Output = Result<()>> + Send;

    /// Insert the question and its four options in one transaction.
    fn insert_question(
        &self,
        quiz_id: i64,
        draft: &QuestionDraft,
    ) -> impl std::future::Future<Output = Result<QuestionWithOptions>> + Send;

    /// Overwrite the question text and its four options in place, in one transaction.
    fn replace_question(
        &self,
        question_id: i64,
        draft: &QuestionDraft,
    ) -> impl std::future::Future<Output = Result<QuestionWithOptions>> + Send;

    fn delete_question(
        &self,
        question_id: i64,
    ) -> impl std::future::Future<Output = Result<()>> + Send;

    fn question_with_options(
        &self,
        question_id: i64,
    ) -> impl std::future::Future<Output = Result<Option<QuestionWithOptions>>> + Send;

    fn category_by_id(
        &self,
        category_id: i64,
    ) -> impl std::future::Future<Output = Result<Option<Category>>> + Send;

    /// Whether another category (other than `except`) already uses the name or slug.
    fn category_conflict(
        &self,
        name: &str,
        slug: &str,
        except: Option<i64>,
    ) -> impl std::future::Future<Output = Result<bool>> + Send;

    fn insert_category(
        &self,
        name: &str,
        slug: &str,
    ) -> impl std::future::Future<Output = Result<Category>> + Send;

    fn update_category(
        &self,
        category_id: i64,
        name: &str,
        slug: &str,
    ) -> impl std::future::Future<Output = Result<Category>> + Send;
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

pub fn validate_quiz_fields(fields: QuizFields) -> Result<QuizFields, ValidationError> {
    let title = fields.title.trim().to_string();
    if title.is_empty() {
        return Err(ValidationError::new("title", "title is required"));
    }
    if title.chars().count() > MAX_TITLE_LENGTH {
        return Err(ValidationError::new(
            "title",
            format!("title must be at most {MAX_TITLE_LENGTH} characters"),
        ));
    }

    Ok(QuizFields {
        title,
        description: fields.description.trim().to_string(),
        ..fields
    })
}

/// Check a submitted question: text present, every option filled in, and
/// exactly one option marked correct.
pub fn validate_question(draft: QuestionDraft) -> Result<QuestionDraft, ValidationError> {
    let question_text = draft.question_text.trim().to_string();
    if question_text.is_empty() {
        return Err(ValidationError::new(
            "question_text",
            "question text is required",
        ));
    }

    let options = draft.options.map(|o| OptionDraft {
        text: o.text.trim().to_string(),
        is_correct: o.is_correct,
    });

    for (idx, option) in options.iter().enumerate() {
        if option.text.is_empty() {
            return Err(ValidationError::new(
                "options",
                format!("option {} needs some text", idx + 1),
            ));
        }
        if option.text.chars().count() > MAX_OPTION_LENGTH {
            return Err(ValidationError::new(
                "options",
                format!(
                    "option {} must be at most {MAX_OPTION_LENGTH} characters",
                    idx + 1
                ),
            ));
        }
    }

    let draft = QuestionDraft {
        question_text,
        options,
    };

    if draft.correct_count() != 1 {
        return Err(ValidationError::new("options", CORRECT_OPTION_MESSAGE));
    }

    Ok(draft)
}

/// Lowercase ASCII alphanumerics; every other run of characters becomes a
/// single `-`, with none at either end.
pub fn slugify(input: &str) -> String {
    let mut slug = String::with_capacity(input.len());
    for c in input.chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
        } else if !slug.is_empty() && !slug.ends_with('-') {
            slug.push('-');
        }
    }
    while slug.ends_with('-') {
        slug.pop();
    }
    slug
}

pub fn validate_category(draft: CategoryDraft) -> Result<(String, String), ValidationError> {
    let name = draft.name.trim().to_string();
    if name.is_empty() {
        return Err(ValidationError::new("name", "name is required"));
    }
    if name.chars().count() > MAX_CATEGORY_NAME_LENGTH {
        return Err(ValidationError::new(
            "name",
            format!("name must be at most {MAX_CATEGORY_NAME_LENGTH} characters"),
        ));
    }

    let slug = match draft.slug.as_deref().map(str::trim) {
        Some(slug) if !slug.is_empty() => slugify(slug),
        _ => slugify(&name),
    };
    if slug.is_empty() {
        return Err(ValidationError::new(
            "slug",
            "slug needs at least one letter or digit",
        ));
    }

    Ok((name, slug))
}

// ---------------------------------------------------------------------------
// Authorization
// ---------------------------------------------------------------------------

enum Denied {
    Forbidden,
    NotFound,
}

impl<T> From<Denied> for Outcome<T> {
    fn from(denied: Denied) -> Self {
        match denied {
            Denied::Forbidden => Outcome::Forbidden,
            Denied::NotFound => Outcome::NotFound,
        }
    }
}

fn check_owner(owner: Option<UserId>, editor: UserId) -> Result<UserId, Denied> {
    match owner {
        None => Err(Denied::NotFound),
        Some(owner) if owner != editor => Err(Denied::Forbidden),
        Some(owner) => Ok(owner),
    }
}

// ---------------------------------------------------------------------------
// AuthoringService
// ---------------------------------------------------------------------------

#[derive(Clone)]
pub struct AuthoringService<R: AuthoringRepository = Db> {
    repo: R,
}

impl<R: AuthoringRepository> AuthoringService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    async fn authorize_quiz(
        &self,
        quiz_id: i64,
        editor: Option<UserId>,
    ) -> Result<Result<UserId, Denied>> {
        let Some(editor) = editor else {
            tracing::warn!("anonymous caller tried to modify quiz {quiz_id}");
            return Ok(Err(Denied::Forbidden));
        };

        let owner = self.repo.quiz_owner(quiz_id).await?;
        let access = check_owner(owner, editor);
        if let Err(Denied::Forbidden) = access {
            tracing::warn!("user {editor} is not the owner of quiz {quiz_id}");
        }
        Ok(access)
    }

    async fn authorize_question(
        &self,
        question_id: i64,
        editor: Option<UserId>,
    ) -> Result<Result<UserId, Denied>> {
        let Some(editor) = editor else {
            tracing::warn!("anonymous caller tried to modify question {question_id}");
            return Ok(Err(Denied::Forbidden));
        };

        let owner = self.repo.question_owner(question_id).await?;
        let access = check_owner(owner, editor);
        if let Err(Denied::Forbidden) = access {
            tracing::warn!("user {editor} does not own the quiz of question {question_id}");
        }
        Ok(access)
    }

    async fn check_category(&self, category_id: Option<i64>) -> Result<Option<ValidationError>> {
        let Some(category_id) = category_id else {
            return Ok(None);
        };
        Ok(match self.repo.category_by_id(category_id).await? {
            Some(_) => None,
            None => Some(ValidationError::new("category_id", "unknown category")),
        })
    }

    pub async fn create_quiz(
        &self,
        owner: Option<UserId>,
        fields: QuizFields,
    ) -> Result<Outcome<Quiz>> {
        let Some(owner) = owner else {
            return Ok(Outcome::Forbidden);
        };

        let fields = match validate_quiz_fields(fields) {
            Ok(fields) => fields,
            Err(e) => return Ok(Outcome::Invalid(e)),
        };
        if let Some(e) = self.check_category(fields.category_id).await? {
            return Ok(Outcome::Invalid(e));
        }

        let quiz = self.repo.insert_quiz(owner, &fields, Utc::now()).await?;

        tracing::info!("new quiz created with id: {} for user_id: {owner}", quiz.id);
        Ok(Outcome::Done(quiz))
    }

    pub async fn update_quiz(
        &self,
        quiz_id: i64,
        editor: Option<UserId>,
        fields: QuizFields,
    ) -> Result<Outcome<Quiz>> {
        let editor = match self.authorize_quiz(quiz_id, editor).await? {
            Ok(editor) => editor,
            Err(denied) => return Ok(denied.into()),
        };

        let fields = match validate_quiz_fields(fields) {
            Ok(fields) => fields,
            Err(e) => return Ok(Outcome::Invalid(e)),
        };
        if let Some(e) = self.check_category(fields.category_id).await? {
            return Ok(Outcome::Invalid(e));
        }

        let quiz = self.repo.update_quiz(quiz_id, &fields).await?;

        tracing::info!("quiz updated with id: {quiz_id} by user_id: {editor}");
        Ok(Outcome::Done(quiz))
    }

    pub async fn delete_quiz(&self, quiz_id: i64, editor: Option<UserId>) -> Result<Outcome<()>> {
        let editor = match self.authorize_quiz(quiz_id, editor).await? {
            Ok(editor) => editor,
            Err(denied) => return Ok(denied.into()),
        };

        self.repo.delete_quiz(quiz_id).await?;

        tracing::info!("quiz deleted with id: {quiz_id} by user_id: {editor}");
        Ok(Outcome::Done(()))
    }

    pub async fn add_question(
        &self,
        quiz_id: i64,
        editor: Option<UserId>,
        draft: QuestionDraft,
    ) -> Result<Outcome<QuestionWithOptions>> {
        let editor = match self.authorize_quiz(quiz_id, editor).await? {
            Ok(editor) => editor,
            Err(denied) => return Ok(denied.into()),
        };

        let draft = match validate_question(draft) {
            Ok(draft) => draft,
            Err(e) => return Ok(Outcome::Invalid(e)),
        };

        let question = self.repo.insert_question(quiz_id, &draft).await?;

        tracing::info!(
            "question {} added to quiz {quiz_id} by user_id: {editor}",
            question.question.id
        );
        Ok(Outcome::Done(question))
    }

    pub async fn update_question(
        &self,
        question_id: i64,
        editor: Option<UserId>,
        draft: QuestionDraft,
    ) -> Result<Outcome<QuestionWithOptions>> {
        let editor = match self.authorize_question(question_id, editor).await? {
            Ok(editor) => editor,
            Err(denied) => return Ok(denied.into()),
        };

        let draft = match validate_question(draft) {
            Ok(draft) => draft,
            Err(e) => return Ok(Outcome::Invalid(e)),
        };

        let question = self.repo.replace_question(question_id, &draft).await?;

        tracing::info!("question {question_id} updated by user_id: {editor}");
        Ok(Outcome::Done(question))
    }

    pub async fn delete_question(
        &self,
        question_id: i64,
        editor: Option<UserId>,
    ) -> Result<Outcome<i64>> {
        let editor = match self.authorize_question(question_id, editor).await? {
            Ok(editor) => editor,
            Err(denied) => return Ok(denied.into()),
        };

        let quiz_id = match self.repo.question_with_options(question_id).await? {
            Some(q) => q.question.quiz_id,
            None => return Ok(Outcome::NotFound),
        };

        self.repo.delete_question(question_id).await?;

        tracing::info!("question {question_id} deleted by user_id: {editor}");
        Ok(Outcome::Done(quiz_id))
    }

    /// The question and its options, for the owner's edit form.
    pub async fn question_for_edit(
        &self,
        question_id: i64,
        editor: Option<UserId>,
    ) -> Result<Outcome<QuestionWithOptions>> {
        if let Err(denied) = self.authorize_question(question_id, editor).await? {
            return Ok(denied.into());
        }

        Ok(match self.repo.question_with_options(question_id).await? {
            Some(question) => Outcome::Done(question),
            None => Outcome::NotFound,
        })
    }

    /// The quiz, for the owner's edit form.
    pub async fn quiz_for_edit(&self, quiz_id: i64, editor: Option<UserId>) -> Result<Outcome<()>> {
        Ok(match self.authorize_quiz(quiz_id, editor).await? {
            Ok(_) => Outcome::Done(()),
            Err(denied) => denied.into(),
        })
    }

    pub async fn create_category(
        &self,
        editor: Option<&AuthUser>,
        draft: CategoryDraft,
    ) -> Result<Outcome<Category>> {
        let Some(editor) = editor.filter(|u| u.is_admin) else {
            return Ok(Outcome::Forbidden);
        };

        let (name, slug) = match validate_category(draft) {
            Ok(pair) => pair,
            Err(e) => return Ok(Outcome::Invalid(e)),
        };
        if self.repo.category_conflict(&name, &slug, None).await? {
            return Ok(Outcome::Invalid(ValidationError::new(
                "name",
                "a category with this name or slug already exists",
            )));
        }

        let category = self.repo.insert_category(&name, &slug).await?;

        tracing::info!(
            "category {} ({slug}) created by user_id: {}",
            category.id,
            editor.id
        );
        Ok(Outcome::Done(category))
    }

    pub async fn update_category(
        &self,
        editor: Option<&AuthUser>,
        category_id: i64,
        draft: CategoryDraft,
    ) -> Result<Outcome<Category>> {
        let Some(editor) = editor.filter(|u| u.is_admin) else {
            return Ok(Outcome::Forbidden);
        };

        if self.repo.category_by_id(category_id).await?.is_none() {
            return Ok(Outcome::NotFound);
        }

        let (name, slug) = match validate_category(draft) {
            Ok(pair) => pair,
            Err(e) => return Ok(Outcome::Invalid(e)),
        };
        if self
            .repo
            .category_conflict(&name, &slug, Some(category_id))
            .await?
        {
            return Ok(Outcome::Invalid(ValidationError::new(
                "name",
                "a category with this name or slug already exists",
            )));
        }

        let category = self.repo.update_category(category_id, &name, &slug).await?;

        tracing::info!("category {category_id} updated by user_id: {}", editor.id);
        Ok(Outcome::Done(category))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::db::models::{Question, QuestionOption};

    const OWNER: UserId = 7;
    const STRANGER: UserId = 8;

    fn draft(correct: &[usize]) -> QuestionDraft {
        let mut draft = QuestionDraft {
            question_text: "Capital of France?".to_string(),
            options: ["Paris", "Lyon", "Nice", "Lille"].map(|t| OptionDraft::new(t, false)),
        };
        for &idx in correct {
            draft.options[idx].is_correct = true;
        }
        draft
    }

    fn stored(question_id: i64, quiz_id: i64, draft: &QuestionDraft) -> QuestionWithOptions {
        QuestionWithOptions {
            question: Question {
                id: question_id,
                quiz_id,
                question_text: draft.question_text.clone(),
            },
            options: draft
                .options
                .iter()
                .enumerate()
                .map(|(idx, o)| QuestionOption {
                    id: question_id * 10 + idx as i64,
                    question_id,
                    position: idx as i64,
                    option_text: o.text.clone(),
                    is_correct: o.is_correct,
                })
                .collect(),
        }
    }

    fn quiz(id: i64, owner: UserId, fields: &QuizFields) -> Quiz {
        Quiz {
            id,
            title: fields.title.clone(),
            category_id: fields.category_id,
            description: fields.description.clone(),
            created_by: owner,
            created_at: Utc::now(),
            is_active: fields.is_active,
        }
    }

    fn owned_quiz_repo() -> MockAuthoringRepository {
        let mut mock = MockAuthoringRepository::new();
        mock.expect_quiz_owner()
            .returning(|_| Box::pin(async { Ok(Some(OWNER)) }));
        mock
    }

    fn owned_question_repo() -> MockAuthoringRepository {
        let mut mock = MockAuthoringRepository::new();
        mock.expect_question_owner()
            .returning(|_| Box::pin(async { Ok(Some(OWNER)) }));
        mock
    }

    fn admin() -> AuthUser {
        AuthUser {
            id: 1,
            username: "admin".to_string(),
            is_admin: true,
        }
    }

    // ----- validation tests -----

    #[test]
    fn validate_question_rejects_zero_and_multiple_correct() {
        let err = validate_question(draft(&[])).unwrap_err();
        assert_eq!(err.message, CORRECT_OPTION_MESSAGE);

        let err = validate_question(draft(&[0, 2])).unwrap_err();
        assert_eq!(err.message, CORRECT_OPTION_MESSAGE);

        assert!(validate_question(draft(&[3])).is_ok());
    }

    #[test]
    fn validate_question_trims_and_requires_text() {
        let mut d = draft(&[0]);
        d.question_text = "   ".to_string();
        assert_eq!(validate_question(d).unwrap_err().field, "question_text");

        let mut d = draft(&[0]);
        d.options[2].text = " ".to_string();
        assert_eq!(validate_question(d).unwrap_err().field, "options");

        let mut d = draft(&[1]);
        d.options[0].text = "  Paris ".to_string();
        assert_eq!(validate_question(d).unwrap().options[0].text, "Paris");
    }

    #[test]
    fn validate_question_bounds_option_length() {
        let mut d = draft(&[0]);
        d.options[1].text = "x".repeat(MAX_OPTION_LENGTH + 1);
        assert!(validate_question(d).is_err());
    }

    #[test]
    fn validate_quiz_fields_requires_bounded_title() {
        let fields = QuizFields {
            title: "  ".to_string(),
            ..Default::default()
        };
        assert_eq!(validate_quiz_fields(fields).unwrap_err().field, "title");

        let fields = QuizFields {
            title: "x".repeat(MAX_TITLE_LENGTH + 1),
            ..Default::default()
        };
        assert!(validate_quiz_fields(fields).is_err());

        let fields = QuizFields {
            title: " Rust basics ".to_string(),
            ..Default::default()
        };
        assert_eq!(validate_quiz_fields(fields).unwrap().title, "Rust basics");
    }

    #[test]
    fn slugify_collapses_separators() {
        assert_eq!(slugify("Science & Nature"), "science-nature");
        assert_eq!(slugify("  --Rust 2024-- "), "rust-2024");
        assert_eq!(slugify("日本"), "");
    }

    #[test]
    fn validate_category_derives_slug_from_name() {
        let (name, slug) = validate_category(CategoryDraft {
            name: " World History ".to_string(),
            slug: None,
        })
        .unwrap();
        assert_eq!(name, "World History");
        assert_eq!(slug, "world-history");

        let err = validate_category(CategoryDraft {
            name: "日本".to_string(),
            slug: None,
        })
        .unwrap_err();
        assert_eq!(err.field, "slug");
    }

    // ----- quiz tests -----

    #[tokio::test]
    async fn create_quiz_assigns_caller_as_owner() {
        let mut mock = MockAuthoringRepository::new();
        mock.expect_insert_quiz()
            .withf(|owner, fields, _| *owner == OWNER && fields.title == "Geography")
            .returning(|owner, fields, _| {
                let quiz = quiz(1, owner, fields);
                Box::pin(async move { Ok(quiz) })
            });

        let svc = AuthoringService::new(mock);
        let fields = QuizFields {
            title: " Geography ".to_string(),
            is_active: true,
            ..Default::default()
        };
        let outcome = svc.create_quiz(Some(OWNER), fields).await.unwrap();

        assert!(matches!(outcome, Outcome::Done(ref q) if q.created_by == OWNER));
    }

    #[tokio::test]
    async fn create_quiz_anonymous_is_forbidden() {
        let svc = AuthoringService::new(MockAuthoringRepository::new());
        let fields = QuizFields {
            title: "Geography".to_string(),
            ..Default::default()
        };
        let outcome = svc.create_quiz(None, fields).await.unwrap();
        assert!(matches!(outcome, Outcome::Forbidden));
    }

    #[tokio::test]
    async fn create_quiz_with_unknown_category_is_invalid() {
        let mut mock = MockAuthoringRepository::new();
        mock.expect_category_by_id()
            .returning(|_| Box::pin(async { Ok(None) }));

        let svc = AuthoringService::new(mock);
        let fields = QuizFields {
            title: "Geography".to_string(),
            category_id: Some(99),
            ..Default::default()
        };
        let outcome = svc.create_quiz(Some(OWNER), fields).await.unwrap();
        assert!(matches!(outcome, Outcome::Invalid(ref e) if e.field == "category_id"));
    }

    #[tokio::test]
    async fn update_quiz_by_stranger_is_forbidden() {
        let svc = AuthoringService::new(owned_quiz_repo());
        let fields = QuizFields {
            title: "Hijacked".to_string(),
            ..Default::default()
        };
        let outcome = svc.update_quiz(1, Some(STRANGER), fields).await.unwrap();
        assert!(matches!(outcome, Outcome::Forbidden));
    }

    #[tokio::test]
    async fn update_missing_quiz_is_not_found() {
        let mut mock = MockAuthoringRepository::new();
        mock.expect_quiz_owner()
            .returning(|_| Box::pin(async { Ok(None) }));

        let svc = AuthoringService::new(mock);
        let fields = QuizFields {
            title: "Anything".to_string(),
            ..Default::default()
        };
        let outcome = svc.update_quiz(404, Some(OWNER), fields).await.unwrap();
        assert!(matches!(outcome, Outcome::NotFound));
    }

    #[tokio::test]
    async fn update_quiz_by_owner_persists_fields() {
        let mut mock = owned_quiz_repo();
        mock.expect_update_quiz()
            .withf(|id, fields| *id == 1 && fields.title == "Renamed" && !fields.is_active)
            .returning(|id, fields| {
                let quiz = quiz(id, OWNER, fields);
                Box::pin(async move { Ok(quiz) })
            });

        let svc = AuthoringService::new(mock);
        let fields = QuizFields {
            title: "Renamed".to_string(),
            is_active: false,
            ..Default::default()
        };
        let outcome = svc.update_quiz(1, Some(OWNER), fields).await.unwrap();
        assert!(matches!(outcome, Outcome::Done(ref q) if q.title == "Renamed"));
    }

    #[tokio::test]
    async fn delete_quiz_anonymous_is_forbidden_without_lookup() {
        let svc = AuthoringService::new(MockAuthoringRepository::new());
        let outcome = svc.delete_quiz(1, None).await.unwrap();
        assert!(matches!(outcome, Outcome::Forbidden));
    }

    #[tokio::test]
    async fn delete_quiz_by_owner() {
        let mut mock = owned_quiz_repo();
        mock.expect_delete_quiz()
            .withf(|id| *id == 1)
            .times(1)
            .returning(|_| Box::pin(async { Ok(()) }));

        let svc = AuthoringService::new(mock);
        let outcome = svc.delete_quiz(1, Some(OWNER)).await.unwrap();
        assert!(outcome.is_done());
    }

    // ----- question tests -----

    #[tokio::test]
    async fn add_question_with_no_correct_option_writes_nothing() {
        // No insert expectation: any write would panic the mock.
        let svc = AuthoringService::new(owned_quiz_repo());
        let outcome = svc.add_question(1, Some(OWNER), draft(&[])).await.unwrap();
        assert!(matches!(outcome, Outcome::Invalid(ref e) if e.message == CORRECT_OPTION_MESSAGE));
    }

    #[tokio::test]
    async fn add_question_with_two_correct_options_writes_nothing() {
        let svc = AuthoringService::new(owned_quiz_repo());
        let outcome = svc
            .add_question(1, Some(OWNER), draft(&[0, 1]))
            .await
            .unwrap();
        assert!(matches!(outcome, Outcome::Invalid(_)));
    }

    #[tokio::test]
    async fn add_question_by_stranger_is_forbidden_before_validation() {
        let svc = AuthoringService::new(owned_quiz_repo());
        let outcome = svc
            .add_question(1, Some(STRANGER), draft(&[]))
            .await
            .unwrap();
        assert!(matches!(outcome, Outcome::Forbidden));
    }

    #[tokio::test]
    async fn add_question_persists_four_options() {
        let mut mock = owned_quiz_repo();
        mock.expect_insert_question()
            .withf(|quiz_id, d| *quiz_id == 1 && d.correct_count() == 1)
            .times(1)
            .returning(|quiz_id, d| {
                let q = stored(5, quiz_id, d);
                Box::pin(async move { Ok(q) })
            });

        let svc = AuthoringService::new(mock);
        let outcome = svc.add_question(1, Some(OWNER), draft(&[0])).await.unwrap();

        let Outcome::Done(question) = outcome else {
            panic!("expected question to be created");
        };
        assert_eq!(question.options.len(), 4);
        assert_eq!(question.correct_option().unwrap().option_text, "Paris");
    }

    #[tokio::test]
    async fn update_question_rechecks_invariant() {
        let svc = AuthoringService::new(owned_question_repo());
        let outcome = svc
            .update_question(5, Some(OWNER), draft(&[1, 2]))
            .await
            .unwrap();
        assert!(matches!(outcome, Outcome::Invalid(_)));
    }

    #[tokio::test]
    async fn update_question_by_stranger_is_forbidden() {
        let svc = AuthoringService::new(owned_question_repo());
        let outcome = svc
            .update_question(5, Some(STRANGER), draft(&[1]))
            .await
            .unwrap();
        assert!(matches!(outcome, Outcome::Forbidden));
    }

    #[tokio::test]
    async fn update_question_replaces_options() {
        let mut mock = owned_question_repo();
        mock.expect_replace_question()
            .withf(|id, d| *id == 5 && d.options[2].is_correct)
            .times(1)
            .returning(|id, d| {
                let q = stored(id, 1, d);
                Box::pin(async move { Ok(q) })
            });

        let svc = AuthoringService::new(mock);
        let outcome = svc
            .update_question(5, Some(OWNER), draft(&[2]))
            .await
            .unwrap();
        assert!(outcome.is_done());
    }

    #[tokio::test]
    async fn delete_question_returns_parent_quiz() {
        let mut mock = owned_question_repo();
        mock.expect_question_with_options().returning(|id| {
            let q = stored(id, 3, &draft(&[0]));
            Box::pin(async move { Ok(Some(q)) })
        });
        mock.expect_delete_question()
            .times(1)
            .returning(|_| Box::pin(async { Ok(()) }));

        let svc = AuthoringService::new(mock);
        let outcome = svc.delete_question(5, Some(OWNER)).await.unwrap();
        assert!(matches!(outcome, Outcome::Done(3)));
    }

    #[tokio::test]
    async fn delete_question_anonymous_is_forbidden() {
        let svc = AuthoringService::new(MockAuthoringRepository::new());
        let outcome = svc.delete_question(5, None).await.unwrap();
        assert!(matches!(outcome, Outcome::Forbidden));
    }

    // ----- category tests -----

    #[tokio::test]
    async fn create_category_requires_admin() {
        let svc = AuthoringService::new(MockAuthoringRepository::new());
        let user = AuthUser {
            is_admin: false,
            ..admin()
        };
        let draft = CategoryDraft {
            name: "Science".to_string(),
            slug: None,
        };
        let outcome = svc.create_category(Some(&user), draft).await.unwrap();
        assert!(matches!(outcome, Outcome::Forbidden));
    }

    #[tokio::test]
    async fn create_category_rejects_duplicates() {
        let mut mock = MockAuthoringRepository::new();
        mock.expect_category_conflict()
            .returning(|_, _, _| Box::pin(async { Ok(true) }));

        let svc = AuthoringService::new(mock);
        let draft = CategoryDraft {
            name: "Science".to_string(),
            slug: None,
        };
        let outcome = svc.create_category(Some(&admin()), draft).await.unwrap();
        assert!(matches!(outcome, Outcome::Invalid(_)));
    }

    #[tokio::test]
    async fn create_category_stores_derived_slug() {
        let mut mock = MockAuthoringRepository::new();
        mock.expect_category_conflict()
            .returning(|_, _, _| Box::pin(async { Ok(false) }));
        mock.expect_insert_category()
            .withf(|name, slug| name == "Pop Culture" && slug == "pop-culture")
            .returning(|name, slug| {
                let category = Category {
                    id: 1,
                    name: name.to_string(),
                    slug: slug.to_string(),
                };
                Box::pin(async move { Ok(category) })
            });

        let svc = AuthoringService::new(mock);
        let draft = CategoryDraft {
            name: "Pop Culture".to_string(),
            slug: Some("".to_string()),
        };
        let outcome = svc.create_category(Some(&admin()), draft).await.unwrap();
        assert!(matches!(outcome, Outcome::Done(ref c) if c.slug == "pop-culture"));
    }
}
