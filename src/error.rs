use thiserror::Error;

#[derive(Debug, Error)]
pub enum PrmError {
    #[error("{field} cannot be blank")]
    BlankField { field: String },

    #[error("{field} cannot be empty")]
    EmptySet { field: String },

    #[error("Invalid coordinates: lat {lat}, lng {lng}")]
    InvalidCoordinates { lat: f64, lng: f64 },

    #[error("{field} ends before it starts")]
    InvalidDateRange { field: String },

    #[error("{entity_type} not found: {id}")]
    NotFound { entity_type: String, id: String },

    #[error("{entity_type} already exists: {identifier}")]
    AlreadyExists {
        entity_type: String,
        identifier: String,
    },

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },

    #[error("Configuration error: {0}")]
    Config(#[from] Box<figment::Error>),

    #[error("{0}")]
    Other(String),
}

impl PrmError {
    pub fn not_found(entity_type: &str, id: impl ToString) -> Self {
        PrmError::NotFound {
            entity_type: entity_type.into(),
            id: id.to_string(),
        }
    }
}

impl From<figment::Error> for PrmError {
    fn from(err: figment::Error) -> Self {
        PrmError::Config(Box::new(err))
    }
}

pub type PrmResult<T> = Result<T, PrmError>;
