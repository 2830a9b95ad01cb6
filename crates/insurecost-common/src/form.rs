//! Form state for the prediction view and its coercion into a typed request.
//!
//! Every field is held as the raw string the user typed. Numeric validity is
//! only checked when a [`PredictionRequest`] is built from the form.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{InsureCostError, Result};

// ---------------------------------------------------------------------------
// Categorical attributes
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Smoker {
    Yes,
    No,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Sex {
    Male,
    Female,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Region {
    Northeast,
    Northwest,
    Southeast,
    Southwest,
}

impl Smoker {
    /// Options in the order the view lists them.
    pub const ALL: [Smoker; 2] = [Smoker::No, Smoker::Yes];

    pub fn as_str(&self) -> &'static str {
        match self {
            Smoker::Yes => "yes",
            Smoker::No => "no",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Smoker::Yes => "Yes",
            Smoker::No => "No",
        }
    }
}

impl Sex {
    pub const ALL: [Sex; 2] = [Sex::Female, Sex::Male];

    pub fn as_str(&self) -> &'static str {
        match self {
            Sex::Male => "male",
            Sex::Female => "female",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Sex::Male => "Male",
            Sex::Female => "Female",
        }
    }
}

impl Region {
    pub const ALL: [Region; 4] = [
        Region::Northeast,
        Region::Northwest,
        Region::Southeast,
        Region::Southwest,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Region::Northeast => "northeast",
            Region::Northwest => "northwest",
            Region::Southeast => "southeast",
            Region::Southwest => "southwest",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Region::Northeast => "Northeast",
            Region::Northwest => "Northwest",
            Region::Southeast => "Southeast",
            Region::Southwest => "Southwest",
        }
    }
}

impl FromStr for Smoker {
    type Err = InsureCostError;

    fn from_str(s: &str) -> Result<Self> {
        Smoker::ALL
            .into_iter()
            .find(|v| v.as_str() == s)
            .ok_or_else(|| InsureCostError::InvalidChoice {
                field: "smoker",
                allowed: "yes, no",
                value: s.to_string(),
            })
    }
}

impl FromStr for Sex {
    type Err = InsureCostError;

    fn from_str(s: &str) -> Result<Self> {
        Sex::ALL
            .into_iter()
            .find(|v| v.as_str() == s)
            .ok_or_else(|| InsureCostError::InvalidChoice {
                field: "sex",
                allowed: "male, female",
                value: s.to_string(),
            })
    }
}

impl FromStr for Region {
    type Err = InsureCostError;

    fn from_str(s: &str) -> Result<Self> {
        Region::ALL
            .into_iter()
            .find(|v| v.as_str() == s)
            .ok_or_else(|| InsureCostError::InvalidChoice {
                field: "region",
                allowed: "northeast, northwest, southeast, southwest",
                value: s.to_string(),
            })
    }
}

// ---------------------------------------------------------------------------
// Form fields
// ---------------------------------------------------------------------------

/// Names of the six editable inputs.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum FormField {
    Age,
    Bmi,
    Children,
    Smoker,
    Sex,
    Region,
}

impl FormField {
    pub const ALL: [FormField; 6] = [
        FormField::Age,
        FormField::Bmi,
        FormField::Children,
        FormField::Smoker,
        FormField::Sex,
        FormField::Region,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            FormField::Age => "age",
            FormField::Bmi => "bmi",
            FormField::Children => "children",
            FormField::Smoker => "smoker",
            FormField::Sex => "sex",
            FormField::Region => "region",
        }
    }
}

impl fmt::Display for FormField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for FormField {
    type Err = InsureCostError;

    fn from_str(s: &str) -> Result<Self> {
        FormField::ALL
            .into_iter()
            .find(|f| f.name() == s)
            .ok_or_else(|| InsureCostError::UnknownField(s.to_string()))
    }
}

// ---------------------------------------------------------------------------
// FormData
// ---------------------------------------------------------------------------

/// The six user-entered attributes, exactly as typed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FormData {
    pub age: String,
    pub bmi: String,
    pub children: String,
    pub smoker: String,
    pub sex: String,
    pub region: String,
}

impl Default for FormData {
    fn default() -> Self {
        Self {
            age: "31".to_string(),
            bmi: "34.390".to_string(),
            children: "3".to_string(),
            smoker: "yes".to_string(),
            sex: "male".to_string(),
            region: "northwest".to_string(),
        }
    }
}

impl FormData {
    pub fn get(&self, field: FormField) -> &str {
        match field {
            FormField::Age => &self.age,
            FormField::Bmi => &self.bmi,
            FormField::Children => &self.children,
            FormField::Smoker => &self.smoker,
            FormField::Sex => &self.sex,
            FormField::Region => &self.region,
        }
    }

    /// Replace a single field. Every other field is left untouched.
    pub fn set(&mut self, field: FormField, value: impl Into<String>) {
        let slot = match field {
            FormField::Age => &mut self.age,
            FormField::Bmi => &mut self.bmi,
            FormField::Children => &mut self.children,
            FormField::Smoker => &mut self.smoker,
            FormField::Sex => &mut self.sex,
            FormField::Region => &mut self.region,
        };
        *slot = value.into();
    }

    /// Coerce into the typed payload sent to the prediction service.
    pub fn to_request(&self) -> Result<PredictionRequest> {
        PredictionRequest::try_from(self)
    }
}

// ---------------------------------------------------------------------------
// PredictionRequest
// ---------------------------------------------------------------------------

/// Typed body of `POST /predict`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PredictionRequest {
    pub age: i64,
    pub bmi: f64,
    pub children: i64,
    pub smoker: Smoker,
    pub sex: Sex,
    pub region: Region,
}

fn parse_integer(field: &'static str, raw: &str) -> Result<i64> {
    raw.trim()
        .parse::<i64>()
        .map_err(|_| InsureCostError::InvalidInteger {
            field,
            value: raw.to_string(),
        })
}

fn parse_number(field: &'static str, raw: &str) -> Result<f64> {
    // NaN and infinities parse, but cannot be encoded as JSON numbers
    match raw.trim().parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(v),
        _ => Err(InsureCostError::InvalidNumber {
            field,
            value: raw.to_string(),
        }),
    }
}

impl TryFrom<&FormData> for PredictionRequest {
    type Error = InsureCostError;

    fn try_from(form: &FormData) -> Result<Self> {
        Ok(Self {
            age: parse_integer("age", &form.age)?,
            bmi: parse_number("bmi", &form.bmi)?,
            children: parse_integer("children", &form.children)?,
            smoker: form.smoker.parse()?,
            sex: form.sex.parse()?,
            region: form.region.parse()?,
        })
    }
}
