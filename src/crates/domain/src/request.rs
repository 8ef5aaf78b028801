use log::warn;
use std::fmt::{self, Display};
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const MIN_YEAR: i64 = 0;
pub const MAX_YEAR: i64 = 9999;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum RequestError {
    #[error("Undecodable message: {0}")]
    Undecodable(String),
    #[error("Missing or empty field: {0}")]
    MissingField(&'static str),
    #[error("Invalid DB path: {0}")]
    SourceUnreadable(String),
    #[error("Invalid year: {0}")]
    InvalidYear(String),
}

/// year 字段解码后的原始形态，是否合法由 validate 判断
#[derive(Debug, Clone, PartialEq)]
pub enum YearInput {
    Missing,
    Integer(i64),
    NotInteger(String),
}

/// 从消息中解码出来、尚未校验的报表请求
#[derive(Debug, Clone, PartialEq)]
pub struct RawReportRequest {
    pub db_path: Option<String>,
    pub country: Option<String>,
    pub year: YearInput,
}

impl RawReportRequest {
    pub fn new(db_path: impl Into<String>, country: impl Into<String>, year: i64) -> Self {
        Self {
            db_path: Some(db_path.into()),
            country: Some(country.into()),
            year: YearInput::Integer(year),
        }
    }

    /// Checks run in order: required fields, source file, year range.
    /// The first failing check wins.
    pub fn validate(self) -> Result<ReportRequest, RequestError> {
        let db_path = non_empty(self.db_path, "db_path")?;
        let country = non_empty(self.country, "country")?;
        if self.year == YearInput::Missing {
            return Err(RequestError::MissingField("year"));
        }

        let source_path = PathBuf::from(db_path);
        if !source_path.is_file() {
            return Err(RequestError::SourceUnreadable(
                source_path.display().to_string(),
            ));
        }

        let year = match self.year {
            YearInput::Integer(value) => ReportYear::new(value)?,
            YearInput::NotInteger(raw) => return Err(RequestError::InvalidYear(raw)),
            YearInput::Missing => return Err(RequestError::MissingField("year")),
        };

        Ok(ReportRequest {
            source_path,
            country,
            year,
        })
    }

    pub fn is_valid(&self) -> bool {
        match self.clone().validate() {
            Ok(_) => true,
            Err(e) => {
                warn!("{}", e);
                false
            }
        }
    }
}

fn non_empty(value: Option<String>, field: &'static str) -> Result<String, RequestError> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(RequestError::MissingField(field)),
    }
}

/// 报表起始年份，范围 [0, 9999]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ReportYear(i32);

impl ReportYear {
    pub fn new(value: i64) -> Result<Self, RequestError> {
        if !(MIN_YEAR..=MAX_YEAR).contains(&value) {
            return Err(RequestError::InvalidYear(value.to_string()));
        }
        Ok(Self(value as i32))
    }

    pub fn as_i32(&self) -> i32 {
        self.0
    }

    /// Inclusive lower bound for invoice dates, e.g. `2009-01-01`.
    pub fn first_day(&self) -> String {
        format!("{:04}-01-01", self.0)
    }
}

impl Display for ReportYear {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// 校验通过的报表请求，一个处理周期内有效
#[derive(Debug, Clone, PartialEq)]
pub struct ReportRequest {
    pub source_path: PathBuf,
    pub country: String,
    pub year: ReportYear,
}

impl ReportRequest {
    pub fn source_path(&self) -> &Path {
        &self.source_path
    }
}
