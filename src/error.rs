use thiserror::Error;

#[derive(Error, Debug)]
pub enum ShorthandError {
    #[error("Invalid resource type: expected {expected}, got {got}")]
    InvalidResourceType { expected: String, got: String },

    #[error("Missing element: {0}")]
    MissingElement(String),

    #[error("Missing required field: {field}")]
    MissingRequiredField { field: String },

    #[error("Slicing not defined on element: {id}")]
    SlicingNotDefined { id: String },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ShorthandError>;

impl ShorthandError {
    pub fn invalid_resource_type<S: Into<String>>(expected: S, got: S) -> Self {
        Self::InvalidResourceType {
            expected: expected.into(),
            got: got.into(),
        }
    }

    pub fn missing_element<S: Into<String>>(id: S) -> Self {
        Self::MissingElement(id.into())
    }

    pub fn missing_required_field<S: Into<String>>(field: S) -> Self {
        Self::MissingRequiredField {
            field: field.into(),
        }
    }

    pub fn slicing_not_defined<S: Into<String>>(id: S) -> Self {
        Self::SlicingNotDefined { id: id.into() }
    }
}
