use std::fmt::{Debug, Display};
use std::io::Error as IoError;

use actix_web::body::BoxBody;
use actix_web::error::{JsonPayloadError, PathError, QueryPayloadError, UrlencodedError};
use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use derivative::Derivative;
use mongodb::bson::ser::Error as BsonError;
use mongodb::error::Error as DatabaseError;
use reqwest::Error as HttpClientError;
use serde::{Serialize, Serializer};

use crate::campaign::CampaignId;
use crate::product::ProductId;
use crate::user::attributes::AttributeKind;
use crate::user::UserId;

#[derive(Debug, Serialize, Derivative)]
#[derivative(PartialEq, Eq)]
#[serde(untagged)]
pub enum Error {
    // 400
    #[serde(serialize_with = "display")]
    InvalidJson(#[derivative(PartialEq = "ignore")] JsonPayloadError),
    #[serde(serialize_with = "display")]
    InvalidPath(#[derivative(PartialEq = "ignore")] PathError),
    #[serde(serialize_with = "display")]
    InvalidForm(#[derivative(PartialEq = "ignore")] UrlencodedError),
    #[serde(serialize_with = "display")]
    InvalidQuery(#[derivative(PartialEq = "ignore")] QueryPayloadError),
    MissingAttributeField {
        attribute: AttributeKind,
        field: &'static str,
    },
    InvalidUploadFilename {
        filename: String,
    },

    // 404
    PathNotFound,
    UserNotFound {
        user_id: UserId,
    },
    ProductNotFound {
        product_id: ProductId,
    },
    CampaignNotFound {
        campaign_id: CampaignId,
    },

    // 409
    ConcurrentModificationDetected,

    // 500
    GenerationNotConfigured,
    #[serde(serialize_with = "display")]
    FailedGenerationCall(#[derivative(PartialEq = "ignore")] HttpClientError),
    MalformedGenerationResponse(String),
    ExistentialState(String),
    #[serde(serialize_with = "display")]
    FailedDatabaseCall(#[derivative(PartialEq = "ignore")] DatabaseError),
    #[serde(serialize_with = "display")]
    FailedToSerializeToBson(#[derivative(PartialEq = "ignore")] BsonError),
    #[serde(serialize_with = "display")]
    FailedUpload(#[derivative(PartialEq = "ignore")] IoError),
    #[serde(serialize_with = "display")]
    IoError(#[derivative(PartialEq = "ignore")] IoError),
}

impl Error {
    pub fn error_code(&self) -> &'static str {
        match self {
            Error::InvalidJson(_) => "E4001000",
            Error::InvalidPath(_) => "E4001001",
            Error::InvalidForm(_) => "E4001002",
            Error::InvalidQuery(_) => "E4001003",
            Error::MissingAttributeField { .. } => "E4001004",
            Error::InvalidUploadFilename { .. } => "E4001005",
            Error::PathNotFound => "E4041000",
            Error::UserNotFound { .. } => "E4041001",
            Error::ProductNotFound { .. } => "E4041002",
            Error::CampaignNotFound { .. } => "E4041003",
            Error::ConcurrentModificationDetected => "E4091000",
            Error::GenerationNotConfigured => "E5001000",
            Error::FailedGenerationCall(_) => "E5001001",
            Error::MalformedGenerationResponse(_) => "E5001002",
            Error::ExistentialState(_) => "E5001003",
            Error::FailedDatabaseCall(_) => "E5001004",
            Error::FailedToSerializeToBson(_) => "E5001005",
            Error::FailedUpload(_) => "E5001006",
            Error::IoError(_) => "E5001007",
        }
    }

    pub fn error_message(&self) -> &'static str {
        match self {
            Error::InvalidJson(_) => "The given json could not be parsed",
            Error::InvalidPath(_) => "The given path could not be parsed",
            Error::InvalidForm(_) => "The given form could not be parsed",
            Error::InvalidQuery(_) => "The given query could not be parsed",
            Error::MissingAttributeField { .. } => {
                "The given attribute set is missing a required field"
            }
            Error::InvalidUploadFilename { .. } => "The given filename cannot be used",
            Error::PathNotFound => "The requested path was not found",
            Error::UserNotFound { .. } => "The requested user was not found",
            Error::ProductNotFound { .. } => "The requested product was not found",
            Error::CampaignNotFound { .. } => "The requested campaign was not found",
            Error::ConcurrentModificationDetected => {
                "The server detected a concurrent modification"
            }
            Error::GenerationNotConfigured => "The text generation API is not configured",
            Error::FailedGenerationCall(_) => {
                "An error occurred when communicating with the text generation API"
            }
            Error::MalformedGenerationResponse(_) => {
                "The text generation API returned a response that could not be used"
            }
            Error::ExistentialState(_) => "The server detected an invalid state",
            Error::FailedDatabaseCall(_) => {
                "An error occurred when communicating with the database"
            }
            Error::FailedToSerializeToBson(_) => {
                "An error occurred when serializing an object to bson"
            }
            Error::FailedUpload(_) => "The uploaded file could not be stored",
            Error::IoError(_) => "An error occurred during an I/O operation",
        }
    }
}

impl ResponseError for Error {
    fn status_code(&self) -> StatusCode {
        match self {
            Error::InvalidJson(_) => StatusCode::BAD_REQUEST,
            Error::InvalidPath(_) => StatusCode::BAD_REQUEST,
            Error::InvalidForm(_) => StatusCode::BAD_REQUEST,
            Error::InvalidQuery(_) => StatusCode::BAD_REQUEST,
            Error::MissingAttributeField { .. } => StatusCode::BAD_REQUEST,
            Error::InvalidUploadFilename { .. } => StatusCode::BAD_REQUEST,
            Error::PathNotFound => StatusCode::NOT_FOUND,
            Error::UserNotFound { .. } => StatusCode::NOT_FOUND,
            Error::ProductNotFound { .. } => StatusCode::NOT_FOUND,
            Error::CampaignNotFound { .. } => StatusCode::NOT_FOUND,
            Error::ConcurrentModificationDetected => StatusCode::CONFLICT,
            Error::GenerationNotConfigured => StatusCode::INTERNAL_SERVER_ERROR,
            Error::FailedGenerationCall(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Error::MalformedGenerationResponse(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Error::ExistentialState(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Error::FailedDatabaseCall(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Error::FailedToSerializeToBson(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Error::FailedUpload(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Error::IoError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse<BoxBody> {
        #[derive(Serialize)]
        struct Dummy<'a> {
            error_code: &'static str,
            error_message: &'static str,
            error_meta: &'a Error,
        }

        HttpResponse::build(self.status_code()).json(&Dummy {
            error_code: self.error_code(),
            error_message: self.error_message(),
            error_meta: self,
        })
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> Result<(), std::fmt::Error> {
        Debug::fmt(self, f)
    }
}

impl From<DatabaseError> for Error {
    fn from(error: DatabaseError) -> Error {
        Error::FailedDatabaseCall(error)
    }
}

impl From<BsonError> for Error {
    fn from(error: BsonError) -> Error {
        Error::FailedToSerializeToBson(error)
    }
}

impl From<HttpClientError> for Error {
    fn from(error: HttpClientError) -> Error {
        Error::FailedGenerationCall(error)
    }
}

impl From<IoError> for Error {
    fn from(error: IoError) -> Error {
        Error::IoError(error)
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::InvalidJson(err) => Some(err),
            Error::InvalidPath(err) => Some(err),
            Error::InvalidForm(err) => Some(err),
            Error::InvalidQuery(err) => Some(err),
            Error::FailedGenerationCall(err) => Some(err),
            Error::FailedDatabaseCall(err) => Some(err),
            Error::FailedToSerializeToBson(err) => Some(err),
            Error::FailedUpload(err) => Some(err),
            Error::IoError(err) => Some(err),
            _ => None,
        }
    }
}

fn display<T, S>(value: &T, serializer: S) -> Result<S::Ok, S::Error>
where
    T: Display,
    S: Serializer,
{
    serializer.collect_str(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::body::to_bytes;

    #[actix_rt::test]
    async fn not_found_errors_render_code_message_and_meta() {
        let user_id = UserId::new();
        let error = Error::UserNotFound { user_id };

        let response = error.error_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let body = to_bytes(response.into_body()).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(body["error_code"], "E4041001");
        assert_eq!(body["error_message"], "The requested user was not found");
        assert_eq!(body["error_meta"]["user_id"], user_id.to_string());
    }

    #[test]
    fn generation_errors_are_server_errors() {
        assert_eq!(
            Error::GenerationNotConfigured.status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            Error::MalformedGenerationResponse("not json".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn io_backed_errors_compare_by_variant() {
        let left = Error::FailedUpload(IoError::new(std::io::ErrorKind::Other, "disk full"));
        let right = Error::FailedUpload(IoError::new(std::io::ErrorKind::NotFound, "gone"));

        assert_eq!(left, right);
        assert_ne!(left, Error::PathNotFound);
    }
}
