use std::result;

use diesel::result::{DatabaseErrorKind, Error as DieselError};
use rocket::http::Status;
use rocket::response::{self, Responder};
use rocket::Request;
use thiserror::Error;

pub type Result<T> = result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("{field} {reason}")]
    ValidationFailed { field: &'static str, reason: String },

    #[error("{0}")]
    ConstraintViolation(String),

    #[error("database error: {0}")]
    Database(DieselError),
}

impl Error {
    pub fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        Error::ValidationFailed {
            field,
            reason: reason.into(),
        }
    }

    pub fn status(&self) -> Status {
        match self {
            Error::NotFound(_) => Status::NotFound,
            Error::ValidationFailed { .. } => Status::UnprocessableEntity,
            Error::ConstraintViolation(_) => Status::Conflict,
            Error::Database(_) => Status::InternalServerError,
        }
    }
}

impl From<DieselError> for Error {
    fn from(error: DieselError) -> Self {
        match error {
            DieselError::NotFound => Error::NotFound("record"),
            DieselError::DatabaseError(
                kind @ (DatabaseErrorKind::ForeignKeyViolation
                | DatabaseErrorKind::UniqueViolation
                | DatabaseErrorKind::NotNullViolation
                | DatabaseErrorKind::CheckViolation),
                info,
            ) => Error::ConstraintViolation(format!("{:?}: {}", kind, info.message())),
            other => Error::Database(other),
        }
    }
}

impl<'r> Responder<'r, 'static> for Error {
    fn respond_to(self, _: &'r Request<'_>) -> response::Result<'static> {
        if let Error::Database(e) = &self {
            tracing::error!(error = %e, "database failure");
        }
        Err(self.status())
    }
}
