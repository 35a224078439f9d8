use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;

use quiz_core::model::{Difficulty, Quiz, QuizId};
use storage::QuizRepository;

use crate::error::CatalogError;

/// Listing order for catalog pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    /// Most attempted first.
    #[default]
    Popular,
    Rating,
    /// Highest id first.
    Newest,
    Title,
}

impl std::str::FromStr for SortOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "popular" => Ok(SortOrder::Popular),
            "rating" => Ok(SortOrder::Rating),
            "newest" => Ok(SortOrder::Newest),
            "title" => Ok(SortOrder::Title),
            other => Err(format!("unknown sort order: {other}")),
        }
    }
}

/// Search, filter and paging knobs for the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogQuery {
    pub search: Option<String>,
    pub categories: Vec<String>,
    pub difficulties: Vec<Difficulty>,
    pub sort: SortOrder,
    /// 1-based.
    pub page: usize,
    pub per_page: usize,
}

impl Default for CatalogQuery {
    fn default() -> Self {
        Self {
            search: None,
            categories: Vec::new(),
            difficulties: Vec::new(),
            sort: SortOrder::default(),
            page: 1,
            per_page: 6,
        }
    }
}

impl CatalogQuery {
    fn matches(&self, quiz: &Quiz) -> bool {
        let term_ok = self
            .search
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .is_none_or(|term| {
                let term = term.to_lowercase();
                quiz.title().to_lowercase().contains(&term)
                    || quiz.category().to_lowercase().contains(&term)
                    || quiz.description().to_lowercase().contains(&term)
            });
        let category_ok = self.categories.is_empty()
            || self
                .categories
                .iter()
                .any(|c| c.eq_ignore_ascii_case(quiz.category()));
        let difficulty_ok =
            self.difficulties.is_empty() || self.difficulties.contains(&quiz.difficulty());
        term_ok && category_ok && difficulty_ok
    }
}

/// Catalog card data. Answers are never exposed here.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuizListing {
    pub id: QuizId,
    pub title: String,
    pub description: String,
    pub category: String,
    pub difficulty: Difficulty,
    pub duration_minutes: u32,
    pub question_count: usize,
    pub attempts: u32,
    pub rating: f32,
    pub tags: Vec<String>,
}

impl QuizListing {
    #[must_use]
    pub fn from_quiz(quiz: &Quiz) -> Self {
        Self {
            id: quiz.id(),
            title: quiz.title().to_string(),
            description: quiz.description().to_string(),
            category: quiz.category().to_string(),
            difficulty: quiz.difficulty(),
            duration_minutes: quiz.duration_minutes(),
            question_count: quiz.question_count(),
            attempts: quiz.popularity().attempts,
            rating: quiz.popularity().rating,
            tags: quiz.tags().to_vec(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CatalogPage {
    pub items: Vec<QuizListing>,
    pub total_matches: usize,
    pub page: usize,
    pub total_pages: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategorySummary {
    pub name: String,
    pub quiz_count: usize,
}

#[derive(Clone)]
pub struct QuizCatalogService {
    quizzes: Arc<dyn QuizRepository>,
}

impl QuizCatalogService {
    #[must_use]
    pub fn new(quizzes: Arc<dyn QuizRepository>) -> Self {
        Self { quizzes }
    }

    /// Search the catalog and return one page of listings.
    ///
    /// An empty result set yields page 1 of 1 with no items.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::PageOutOfRange` for a page past the end, or
    /// `CatalogError::Storage` if the catalog cannot be read.
    pub async fn search(&self, query: &CatalogQuery) -> Result<CatalogPage, CatalogError> {
        let mut matches: Vec<Arc<Quiz>> = self
            .quizzes
            .list_quizzes()
            .await?
            .into_iter()
            .filter(|quiz| query.matches(quiz))
            .collect();

        match query.sort {
            SortOrder::Popular => {
                matches.sort_by(|a, b| b.popularity().attempts.cmp(&a.popularity().attempts));
            }
            SortOrder::Rating => matches.sort_by(|a, b| {
                b.popularity()
                    .rating
                    .total_cmp(&a.popularity().rating)
            }),
            SortOrder::Newest => matches.sort_by_key(|q| std::cmp::Reverse(q.id())),
            SortOrder::Title => matches.sort_by(|a, b| a.title().cmp(b.title())),
        }

        let per_page = query.per_page.max(1);
        let total_matches = matches.len();
        let total_pages = total_matches.div_ceil(per_page).max(1);
        let page = query.page.max(1);
        if page > total_pages {
            return Err(CatalogError::PageOutOfRange { page, total_pages });
        }

        let items = matches
            .iter()
            .skip((page - 1) * per_page)
            .take(per_page)
            .map(|quiz| QuizListing::from_quiz(quiz))
            .collect();

        Ok(CatalogPage {
            items,
            total_matches,
            page,
            total_pages,
        })
    }

    /// Distinct categories with their quiz counts, by name.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Storage` if the catalog cannot be read.
    pub async fn categories(&self) -> Result<Vec<CategorySummary>, CatalogError> {
        let mut counts: BTreeMap<String, usize> = BTreeMap::new();
        for quiz in self.quizzes.list_quizzes().await? {
            *counts.entry(quiz.category().to_string()).or_default() += 1;
        }
        Ok(counts
            .into_iter()
            .map(|(name, quiz_count)| CategorySummary { name, quiz_count })
            .collect())
    }

    /// # Errors
    ///
    /// Returns `CatalogError::Storage` (including `NotFound`) on lookup failure.
    pub async fn quiz(&self, id: QuizId) -> Result<QuizListing, CatalogError> {
        let quiz = self.quizzes.get_quiz(id).await?;
        Ok(QuizListing::from_quiz(&quiz))
    }
}
