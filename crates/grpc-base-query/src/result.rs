use serde::{Deserialize, Serialize};

/// Tagged outcome handed back to the query layer. Exactly one of data or
/// error, serialized as `{"data": ...}` or `{"error": ...}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QueryResult<T, E> {
    Data(T),
    Error(E),
}

impl<T, E> QueryResult<T, E> {
    pub fn is_data(&self) -> bool {
        matches!(self, QueryResult::Data(_))
    }

    pub fn is_error(&self) -> bool {
        matches!(self, QueryResult::Error(_))
    }

    pub fn data(&self) -> Option<&T> {
        match self {
            QueryResult::Data(data) => Some(data),
            QueryResult::Error(_) => None,
        }
    }

    pub fn error(&self) -> Option<&E> {
        match self {
            QueryResult::Data(_) => None,
            QueryResult::Error(err) => Some(err),
        }
    }

    pub fn into_result(self) -> Result<T, E> {
        self.into()
    }
}

impl<T, E> From<Result<T, E>> for QueryResult<T, E> {
    fn from(result: Result<T, E>) -> Self {
        match result {
            Ok(data) => QueryResult::Data(data),
            Err(err) => QueryResult::Error(err),
        }
    }
}

impl<T, E> From<QueryResult<T, E>> for Result<T, E> {
    fn from(result: QueryResult<T, E>) -> Self {
        match result {
            QueryResult::Data(data) => Ok(data),
            QueryResult::Error(err) => Err(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GrpcQueryError;
    use crate::status::Code;
    use serde_json::json;

    #[test]
    fn test_serializes_data_branch() {
        let result: QueryResult<Vec<u32>, GrpcQueryError> = QueryResult::Data(vec![1, 2]);
        assert_eq!(serde_json::to_value(&result).unwrap(), json!({ "data": [1, 2] }));
    }

    #[test]
    fn test_serializes_error_branch() {
        let result: QueryResult<u32, GrpcQueryError> =
            QueryResult::Error(GrpcQueryError::new(Code::NotFound, "no such user"));
        assert_eq!(
            serde_json::to_value(&result).unwrap(),
            json!({ "error": { "code": "NOT_FOUND", "message": "no such user" } })
        );
    }

    #[test]
    fn test_result_round_trip() {
        let ok: QueryResult<u8, String> = Ok(3).into();
        assert!(ok.is_data());
        assert_eq!(ok.data(), Some(&3));
        assert_eq!(ok.into_result(), Ok(3));

        let err: QueryResult<u8, String> = Err("boom".to_string()).into();
        assert!(err.is_error());
        assert_eq!(err.error().map(String::as_str), Some("boom"));
    }
}
