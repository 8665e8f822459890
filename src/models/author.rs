//! Author model and related types

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use super::form::{parse_optional_date, FieldErrors};

pub fn author_url(id: i32) -> String {
    format!("/catalog/authors/{}", id)
}

/// Full author model from database
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Author {
    pub id: i32,
    pub first_name: String,
    pub last_name: String,
    pub date_of_birth: Option<NaiveDate>,
    /// Labelled "died" on forms
    pub date_of_death: Option<NaiveDate>,
}

impl Author {
    /// "First, Last"
    pub fn display_name(&self) -> String {
        format!("{}, {}", self.first_name, self.last_name)
    }

    pub fn url(&self) -> String {
        author_url(self.id)
    }
}

/// Author reference embedded in book views
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AuthorRef {
    pub id: i32,
    pub name: String,
    pub url: String,
}

impl From<&Author> for AuthorRef {
    fn from(author: &Author) -> Self {
        Self {
            id: author.id,
            name: author.display_name(),
            url: author.url(),
        }
    }
}

/// Author create/update form as submitted
#[derive(Debug, Clone, Default, Deserialize, Serialize, Validate, ToSchema)]
pub struct AuthorForm {
    #[serde(default)]
    #[validate(length(min = 1, max = 200, message = "First name must be 1 to 200 characters"))]
    pub first_name: String,
    #[serde(default)]
    #[validate(length(min = 1, max = 200, message = "Last name must be 1 to 200 characters"))]
    pub last_name: String,
    /// Date of birth (YYYY-MM-DD), blank for unknown
    #[serde(default)]
    pub date_of_birth: Option<String>,
    /// Date of death (YYYY-MM-DD), blank if alive or unknown
    #[serde(default)]
    pub date_of_death: Option<String>,
}

impl AuthorForm {
    /// Form pre-filled from an existing record
    pub fn from_author(author: &Author) -> Self {
        Self {
            first_name: author.first_name.clone(),
            last_name: author.last_name.clone(),
            date_of_birth: author.date_of_birth.map(|d| d.to_string()),
            date_of_death: author.date_of_death.map(|d| d.to_string()),
        }
    }

    /// Validate lengths and parse dates.
    ///
    /// Death before birth is accepted; the catalog has never enforced it.
    pub fn clean(&self) -> Result<AuthorData, FieldErrors> {
        let mut errors = match self.validate() {
            Ok(()) => FieldErrors::new(),
            Err(e) => FieldErrors::from(e),
        };
        if self.first_name.trim().is_empty() && errors.get("first_name").is_none() {
            errors.add("first_name", super::form::REQUIRED_MESSAGE);
        }
        if self.last_name.trim().is_empty() && errors.get("last_name").is_none() {
            errors.add("last_name", super::form::REQUIRED_MESSAGE);
        }

        let date_of_birth =
            parse_optional_date("date_of_birth", self.date_of_birth.as_deref(), &mut errors);
        let date_of_death =
            parse_optional_date("date_of_death", self.date_of_death.as_deref(), &mut errors);

        errors.into_result()?;

        Ok(AuthorData {
            first_name: self.first_name.trim().to_string(),
            last_name: self.last_name.trim().to_string(),
            date_of_birth,
            date_of_death,
        })
    }
}

/// Cleaned author values ready to be stored
#[derive(Debug, Clone, PartialEq)]
pub struct AuthorData {
    pub first_name: String,
    pub last_name: String,
    pub date_of_birth: Option<NaiveDate>,
    pub date_of_death: Option<NaiveDate>,
}
