use serde::Serialize;
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;
use crate::error::{ConsentsError, ConsentsResult};

/// A single consent mapping, keyed by the person's identifier.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsentRecord {
    /// the unique person identifier, e.g. `people/123`. This is the conflict key
    person_name: String,
    /// human friendly name
    display_name: String,
    email: String,
    /// when this record was produced, always UTC
    #[serde(skip)]
    updated_at: OffsetDateTime,
    /// `updated_at` rendered as RFC 3339
    #[serde(rename = "updatedAt")]
    updated_at_text: String,
}

impl ConsentRecord {
    /// Builds a record stamped with the current UTC time
    pub fn new<StrT: Into<String>>(person_name: StrT, display_name: StrT, email: StrT) -> ConsentsResult<Self> {
        Self::at(person_name, display_name, email, OffsetDateTime::now_utc())
    }

    pub fn at<StrT: Into<String>>(person_name: StrT, display_name: StrT, email: StrT, instant: OffsetDateTime) -> ConsentsResult<Self> {
        let person_name = require_non_empty("person_name", person_name.into())?;
        let display_name = require_non_empty("display_name", display_name.into())?;
        let email = require_non_empty("email", email.into())?;

        let updated_at = instant.to_offset(time::UtcOffset::UTC);
        let updated_at_text = updated_at.format(&Rfc3339)
            .map_err(|err| ConsentsError::configuration("Failed to format timestamp").with_cause(err))?;

        Ok(Self {
            person_name,
            display_name,
            email,
            updated_at,
            updated_at_text,
        })
    }

    pub fn person_name(&self) -> &str {
        &self.person_name
    }
    pub fn display_name(&self) -> &str {
        &self.display_name
    }
    pub fn email(&self) -> &str {
        &self.email
    }
    pub fn updated_at(&self) -> OffsetDateTime {
        self.updated_at
    }
    pub fn updated_at_text(&self) -> &str {
        &self.updated_at_text
    }

    /// The values bound to the upsert, in column order
    pub fn bindings(&self) -> [(&'static str, &str); 4] {
        [
            ("person_name", self.person_name.as_str()),
            ("display_name", self.display_name.as_str()),
            ("email", self.email.as_str()),
            ("updated_at", self.updated_at_text.as_str()),
        ]
    }
}

fn require_non_empty(field: &str, value: String) -> ConsentsResult<String> {
    if value.trim().is_empty() {
        return Err(ConsentsError::configuration(format!("{} must not be empty", field)));
    }

    Ok(value)
}
