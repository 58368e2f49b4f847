use axum::{
    async_trait,
    extract::{FromRequestParts, Query},
    http::request::Parts,
};

use crate::api::ApiError;
use crate::model::{
    AddressQueryParams, ApplyQueryParams, DestroyQueryParams, ForceUnlockQueryParams,
    ImportQueryParams, PlanQueryParams, StateMvQueryParams, WorkspaceQueryParams,
};

/// Raw query string as ordered `(key, value)` pairs
#[derive(Debug, Clone, Default)]
pub struct QueryPairs(Vec<(String, String)>);

impl QueryPairs {
    pub fn new(pairs: Vec<(String, String)>) -> Self {
        Self(pairs)
    }

    /// All values given for an array parameter, accepting both `key=` and
    /// `key[]=`, in request order
    pub fn list(&self, key: &str) -> Vec<String> {
        let bracketed = format!("{}[]", key);
        self.0
            .iter()
            .filter(|(k, _)| k == key || *k == bracketed)
            .map(|(_, v)| v.clone())
            .collect()
    }

    /// First value given for a scalar parameter
    pub fn optional(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn required(&self, key: &str) -> Result<String, ApiError> {
        match self.optional(key) {
            Some(value) if !value.is_empty() => Ok(value.to_string()),
            _ => Err(ApiError::Query(format!(
                "missing required parameter \"{}\"",
                key
            ))),
        }
    }

    /// Boolean parameter, `false` when absent
    pub fn flag(&self, key: &str) -> Result<bool, ApiError> {
        match self.optional(key) {
            None | Some("") => Ok(false),
            Some(value) => match value {
                "1" | "t" | "T" | "true" | "TRUE" | "True" => Ok(true),
                "0" | "f" | "F" | "false" | "FALSE" | "False" => Ok(false),
                _ => Err(ApiError::Query(format!(
                    "parameter \"{}\" must be a boolean, got \"{}\"",
                    key, value
                ))),
            },
        }
    }

    /// Non-negative integer parameter, `0` when absent
    pub fn count(&self, key: &str) -> Result<u32, ApiError> {
        match self.optional(key) {
            None | Some("") => Ok(0),
            Some(value) => value.parse().map_err(|_| {
                ApiError::Query(format!(
                    "parameter \"{}\" must be a non-negative integer, got \"{}\"",
                    key, value
                ))
            }),
        }
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for QueryPairs
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(pairs) = Query::<Vec<(String, String)>>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| ApiError::Query(rejection.body_text()))?;
        Ok(QueryPairs(pairs))
    }
}

/// Parameters that can be built and validated from a query string
pub trait FromQuery: Sized {
    fn from_query(query: &QueryPairs) -> Result<Self, ApiError>;
}

/// Axum extractor yielding validated parameters, rejecting with a 400
/// before the handler body runs
#[derive(Debug, Clone)]
pub struct ValidQuery<T>(pub T);

#[async_trait]
impl<S, T> FromRequestParts<S> for ValidQuery<T>
where
    S: Send + Sync,
    T: FromQuery + Send,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let query = QueryPairs::from_request_parts(parts, state).await?;
        Ok(ValidQuery(T::from_query(&query)?))
    }
}

impl FromQuery for PlanQueryParams {
    fn from_query(query: &QueryPairs) -> Result<Self, ApiError> {
        Ok(Self {
            vars: query.list("vars"),
            var_files: query.list("var_files"),
        })
    }
}

impl FromQuery for ApplyQueryParams {
    fn from_query(query: &QueryPairs) -> Result<Self, ApiError> {
        Ok(Self {
            refresh_only: query.flag("refresh_only")?,
            replace: query.optional("replace").unwrap_or_default().to_string(),
            vars: query.list("vars"),
            var_files: query.list("var_files"),
            parallelism: query.count("parallelism")?,
        })
    }
}

impl FromQuery for DestroyQueryParams {
    fn from_query(query: &QueryPairs) -> Result<Self, ApiError> {
        Ok(Self {
            vars: query.list("vars"),
            var_files: query.list("var_files"),
            parallelism: query.count("parallelism")?,
        })
    }
}

impl FromQuery for ForceUnlockQueryParams {
    fn from_query(query: &QueryPairs) -> Result<Self, ApiError> {
        Ok(Self {
            lock_id: query.required("lock_id")?,
        })
    }
}

impl FromQuery for ImportQueryParams {
    fn from_query(query: &QueryPairs) -> Result<Self, ApiError> {
        Ok(Self {
            address: query.required("address")?,
            id: query.required("id")?,
        })
    }
}

impl FromQuery for AddressQueryParams {
    fn from_query(query: &QueryPairs) -> Result<Self, ApiError> {
        Ok(Self {
            address: query.required("address")?,
        })
    }
}

impl FromQuery for StateMvQueryParams {
    fn from_query(query: &QueryPairs) -> Result<Self, ApiError> {
        Ok(Self {
            source: query.required("source")?,
            destination: query.required("destination")?,
        })
    }
}

impl FromQuery for WorkspaceQueryParams {
    fn from_query(query: &QueryPairs) -> Result<Self, ApiError> {
        Ok(Self {
            name: query.required("name")?,
        })
    }
}
