use std::fmt;
use std::io;

#[derive(Debug)]
pub enum RouterError {
    NotFound { method: String, path: String },
    InvalidRule { rule: String, reason: String },
    BadRequest(String),
    IoError(io::Error),
    InternalError(String),
    PanicError(String),
}

impl RouterError {
    pub fn not_found<M: AsRef<str>, P: AsRef<str>>(method: M, path: P) -> Self {
        RouterError::NotFound {
            method: method.as_ref().to_string(),
            path: path.as_ref().to_string(),
        }
    }

    pub fn status_code(&self) -> u16 {
        match self {
            RouterError::BadRequest(_) => 400,
            RouterError::NotFound { .. } => 404,
            RouterError::InvalidRule { .. }
            | RouterError::IoError(_)
            | RouterError::InternalError(_)
            | RouterError::PanicError(_) => 500,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, RouterError::NotFound { .. })
    }
}

impl fmt::Display for RouterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RouterError::NotFound { method, path } => {
                write!(f, "No route for {} {}", method, path)
            }
            RouterError::InvalidRule { rule, reason } => {
                write!(f, "Invalid rule {:?}: {}", rule, reason)
            }
            RouterError::BadRequest(msg) => write!(f, "Bad request: {}", msg),
            RouterError::IoError(err) => write!(f, "IO error: {}", err),
            RouterError::InternalError(msg) => write!(f, "Internal error: {}", msg),
            RouterError::PanicError(msg) => write!(f, "Panic: {}", msg),
        }
    }
}

impl std::error::Error for RouterError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RouterError::IoError(err) => Some(err),
            _ => None,
        }
    }
}

impl From<io::Error> for RouterError {
    fn from(err: io::Error) -> Self {
        RouterError::IoError(err)
    }
}

pub type RouterResult<T> = Result<T, RouterError>;
