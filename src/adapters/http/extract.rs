//! Extractors whose rejections are validation faults.
//!
//! Axum's own `Json` and `Query` reject with plain-text bodies; these wrappers
//! route the rejection through [`FaultResponse`] so it leaves the service in
//! the failure envelope with a field-level error.

use async_trait::async_trait;
use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        FromRequest, FromRequestParts, Query, Request,
    },
    http::request::Parts,
    Json,
};
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::domain::foundation::FieldError;

use super::error::FaultResponse;

/// JSON request body; malformed input is a validation error on `body`.
#[derive(Debug, Clone)]
pub struct JsonBody<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = FaultResponse;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(Self(value)),
            Err(rejection) => Err(json_rejection(rejection)),
        }
    }
}

fn json_rejection(rejection: JsonRejection) -> FaultResponse {
    FieldError::new("body", rejection.body_text(), Value::Null).into()
}

/// Query string; malformed parameters are a validation error on `query`.
#[derive(Debug, Clone)]
pub struct QueryParams<T>(pub T);

#[async_trait]
impl<T, S> FromRequestParts<S> for QueryParams<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = FaultResponse;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match Query::<T>::from_request_parts(parts, state).await {
            Ok(Query(value)) => Ok(Self(value)),
            Err(rejection) => Err(query_rejection(rejection, parts.uri.query())),
        }
    }
}

fn query_rejection(rejection: QueryRejection, raw: Option<&str>) -> FaultResponse {
    let value = raw.map(|q| Value::String(q.to_string())).unwrap_or(Value::Null);
    FieldError::new("query", rejection.body_text(), value).into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::fault::FaultKind;
    use axum::body::Body;
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    struct Payload {
        #[allow(dead_code)]
        name: String,
    }

    #[derive(Debug, Deserialize)]
    struct Paging {
        limit: Option<u32>,
    }

    #[tokio::test]
    async fn malformed_json_is_body_validation_error() {
        let request = Request::builder()
            .method("POST")
            .header("content-type", "application/json")
            .body(Body::from("{not json"))
            .unwrap();

        let Err(FaultResponse(fault)) = JsonBody::<Payload>::from_request(request, &()).await else {
            panic!("expected rejection");
        };
        match fault.kind {
            FaultKind::Validation(errors) => assert_eq!(errors[0].field, "body"),
            other => panic!("unexpected kind {other:?}"),
        }
    }

    #[tokio::test]
    async fn bad_query_is_query_validation_error() {
        let request = Request::builder()
            .uri("/x?limit=lots")
            .body(Body::empty())
            .unwrap();
        let (mut parts, _) = request.into_parts();

        let Err(FaultResponse(fault)) =
            QueryParams::<Paging>::from_request_parts(&mut parts, &()).await
        else {
            panic!("expected rejection");
        };
        match fault.kind {
            FaultKind::Validation(errors) => {
                assert_eq!(errors[0].field, "query");
                assert_eq!(errors[0].value, "limit=lots");
            }
            other => panic!("unexpected kind {other:?}"),
        }
    }

    #[tokio::test]
    async fn valid_query_parses() {
        let request = Request::builder()
            .uri("/x?limit=5")
            .body(Body::empty())
            .unwrap();
        let (mut parts, _) = request.into_parts();

        let QueryParams(paging) = QueryParams::<Paging>::from_request_parts(&mut parts, &())
            .await
            .unwrap();
        assert_eq!(paging.limit, Some(5));
    }
}
