//! Book (catalog entry) model and related types

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

use crate::error::{AppError, AppResult};

/// Book model from database
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Book {
    pub id: i64,
    /// Stored (generated) file name, unique across the catalog
    pub filename: String,
    pub original_name: String,
    pub name: String,
    pub author: String,
    pub genre: String,
    pub year: i32,
    /// Copies currently available for loan, never negative
    pub amount: i32,
    /// Whole days a copy may be held
    pub loan_period_days: i32,
    pub image: Option<String>,
}

/// A numeric request field that may arrive as a JSON number or as a string
/// numeral (`2020` or `"2020"`).
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum NumericField {
    Int(i64),
    Text(String),
    Other(serde_json::Value),
}

impl NumericField {
    /// Parse into an `i32`, reporting the offending field on failure
    pub fn parse(&self, field: &str) -> AppResult<i32> {
        let invalid = || AppError::Validation(format!("Invalid value for numeric field: {}", field));
        match self {
            NumericField::Int(v) => i32::try_from(*v).map_err(|_| invalid()),
            NumericField::Text(s) => s.trim().parse::<i32>().map_err(|_| invalid()),
            NumericField::Other(_) => Err(invalid()),
        }
    }
}

fn required<'a, T>(value: &'a Option<T>, field: &str) -> AppResult<&'a T> {
    value
        .as_ref()
        .ok_or_else(|| AppError::Validation(format!("Missing field: {}", field)))
}

fn required_text(value: &Option<String>, field: &str) -> AppResult<String> {
    let text = required(value, field)?;
    if text.trim().is_empty() {
        return Err(AppError::Validation(format!("Missing field: {}", field)));
    }
    Ok(text.clone())
}

/// Create book request (`POST /upload-metadata`)
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct CreateBookRequest {
    /// File name returned by `/upload-file`
    pub filename: Option<String>,
    pub name: Option<String>,
    pub author: Option<String>,
    pub genre: Option<String>,
    #[schema(value_type = Option<String>, example = "2020")]
    pub year: Option<NumericField>,
    #[schema(value_type = Option<String>, example = "3")]
    pub amount: Option<NumericField>,
    /// Loan period in days
    #[serde(alias = "loandate")]
    #[schema(value_type = Option<String>, example = "14")]
    pub loan_period_days: Option<NumericField>,
}

/// Validated book ready for insertion
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewBook {
    pub filename: String,
    pub name: String,
    pub author: String,
    pub genre: String,
    pub year: i32,
    pub amount: i32,
    pub loan_period_days: i32,
}

impl TryFrom<CreateBookRequest> for NewBook {
    type Error = AppError;

    fn try_from(req: CreateBookRequest) -> AppResult<Self> {
        // Presence first, in declaration order, then numeric parsing, then ranges
        let filename = required_text(&req.filename, "filename")?;
        let name = required_text(&req.name, "name")?;
        let author = required_text(&req.author, "author")?;
        let genre = required_text(&req.genre, "genre")?;
        let year = required(&req.year, "year")?;
        let amount = required(&req.amount, "amount")?;
        let loan_period_days = required(&req.loan_period_days, "loandate")?;

        let year = year.parse("year")?;
        let amount = amount.parse("amount")?;
        let loan_period_days = loan_period_days.parse("loandate")?;

        if amount < 0 {
            return Err(AppError::Validation("amount must not be negative".to_string()));
        }
        if loan_period_days < 0 {
            return Err(AppError::Validation("loandate must not be negative".to_string()));
        }

        Ok(Self {
            filename,
            name,
            author,
            genre,
            year,
            amount,
            loan_period_days,
        })
    }
}

/// Update book request (`PUT /update-book/{id}`), all fields required
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UpdateBookRequest {
    pub name: Option<String>,
    pub author: Option<String>,
    pub genre: Option<String>,
    #[schema(value_type = Option<String>, example = "2020")]
    pub year: Option<NumericField>,
}

/// Validated bibliographic update
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookUpdate {
    pub name: String,
    pub author: String,
    pub genre: String,
    pub year: i32,
}

impl TryFrom<UpdateBookRequest> for BookUpdate {
    type Error = AppError;

    fn try_from(req: UpdateBookRequest) -> AppResult<Self> {
        let all_present = req.name.as_deref().is_some_and(|s| !s.trim().is_empty())
            && req.author.as_deref().is_some_and(|s| !s.trim().is_empty())
            && req.genre.as_deref().is_some_and(|s| !s.trim().is_empty())
            && req.year.is_some();
        if !all_present {
            return Err(AppError::Validation("All fields are required".to_string()));
        }

        Ok(Self {
            name: required_text(&req.name, "name")?,
            author: required_text(&req.author, "author")?,
            genre: required_text(&req.genre, "genre")?,
            year: required(&req.year, "year")?.parse("year")?,
        })
    }
}
