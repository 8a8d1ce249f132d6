use mailcraft_document::TreeError;
use thiserror::Error;

pub type CommonResult<T> = Result<T, CommonError>;

/// Failures of the storage seams shared by the service crates
#[derive(Error, Debug)]
pub enum CommonError {
    #[error("Document error: {0}")]
    Tree(#[from] TreeError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sources_convert() {
        let io: CommonError = std::io::Error::new(std::io::ErrorKind::NotFound, "gone").into();
        assert_eq!(io.to_string(), "IO error: gone");

        let tree: CommonError = TreeError::MissingRoot.into();
        assert_eq!(tree.to_string(), "Document error: Document has no root node");
    }
}
