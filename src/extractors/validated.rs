//! Extractors that run a route's rule table and hand handlers typed input.
//!
//! Path and body rules share one collector, so a request with a bad id and a
//! bad body reports both in a single `400`.

use crate::error::AppError;
use crate::model::{ProductFields, ProductId};
use crate::service::validation::{
    product_fields, validate, Location, RequestInput, Rule, CREATE_RULES, ID_RULES,
    REPLACE_RULES,
};
use async_trait::async_trait;
use axum::{
    body::Bytes,
    extract::{FromRequest, FromRequestParts, Path, Request},
    http::{header, request::Parts, HeaderMap},
};
use serde_json::{Map, Value};

/// Product id from the `/:id` segment, after it passed the integer rule.
#[derive(Clone, Copy, Debug)]
pub struct ValidId(pub ProductId);

/// Body of a create request that passed every create rule.
#[derive(Clone, Debug)]
pub struct NewProduct(pub ProductFields);

/// Id and body of a replace request that passed every replace rule.
#[derive(Clone, Debug)]
pub struct ReplaceProduct {
    pub id: ProductId,
    pub fields: ProductFields,
}

#[async_trait]
impl<S> FromRequestParts<S> for ValidId
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let params = path_params(parts, state).await?;
        let input = RequestInput::new(params, Map::new());
        checked_id(ID_RULES, &input).map(ValidId)
    }
}

#[async_trait]
impl<S> FromRequest<S> for NewProduct
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let body = json_object(req, state).await?;
        let input = RequestInput::new(Map::new(), body);
        validate(CREATE_RULES, &input)?;
        product_fields(&input, Some(true)).map(NewProduct)
    }
}

#[async_trait]
impl<S> FromRequest<S> for ReplaceProduct
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let (mut parts, body) = req.into_parts();
        let params = path_params(&mut parts, state).await?;
        let body = json_object(Request::from_parts(parts, body), state).await?;
        let input = RequestInput::new(params, body);
        let id = checked_id(REPLACE_RULES, &input)?;
        let fields = product_fields(&input, None)?;
        Ok(ReplaceProduct { id, fields })
    }
}

async fn path_params<S>(parts: &mut Parts, state: &S) -> Result<Map<String, Value>, AppError>
where
    S: Send + Sync,
{
    let Path(id) = Path::<String>::from_request_parts(parts, state)
        .await
        .map_err(|e| AppError::BadRequest(e.body_text()))?;
    let mut params = Map::new();
    params.insert("id".into(), Value::String(id));
    Ok(params)
}

/// Run `rules`, then read the id. An id that passes the integer rule but does
/// not fit the key type cannot name a stored product.
fn checked_id(rules: &[Rule], input: &RequestInput) -> Result<ProductId, AppError> {
    validate(rules, input)?;
    input
        .get(Location::Params, "id")
        .and_then(Value::as_str)
        .and_then(|s| s.parse::<ProductId>().ok())
        .ok_or(AppError::NotFound)
}

/// Read the body as a JSON object. Empty bodies, non-JSON content types and
/// non-object documents read as `{}`; malformed JSON is rejected.
async fn json_object<S>(req: Request, state: &S) -> Result<Map<String, Value>, AppError>
where
    S: Send + Sync,
{
    let is_json = has_json_content_type(req.headers());
    let bytes = Bytes::from_request(req, state)
        .await
        .map_err(|e| AppError::BadRequest(e.body_text()))?;
    if !is_json || bytes.is_empty() {
        return Ok(Map::new());
    }
    let value: Value = serde_json::from_slice(&bytes)
        .map_err(|e| AppError::BadRequest(format!("JSON no válido: {e}")))?;
    Ok(match value {
        Value::Object(map) => map,
        _ => Map::new(),
    })
}

fn has_json_content_type(headers: &HeaderMap) -> bool {
    headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(';').next())
        .map(|mime| {
            let mime = mime.trim().to_ascii_lowercase();
            mime == "application/json" || mime.ends_with("+json")
        })
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use serde_json::json;

    fn json_request(uri: &str, body: Value) -> Request {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn create_keeps_explicit_availability() {
        let body = json!({ "name": "Mouse", "price": 50, "availability": false });
        let NewProduct(fields) = NewProduct::from_request(json_request("/", body), &())
            .await
            .unwrap();
        assert!(!fields.availability);
        assert_eq!(fields.name, "Mouse");
    }

    #[tokio::test]
    async fn create_defaults_to_available() {
        let body = json!({ "name": "Mouse", "price": 50, "availability": "maybe" });
        let NewProduct(fields) = NewProduct::from_request(json_request("/", body), &())
            .await
            .unwrap();
        assert!(fields.availability);
    }

    #[tokio::test]
    async fn non_json_body_reads_as_empty_object() {
        let req = Request::builder()
            .method("POST")
            .uri("/")
            .header(header::CONTENT_TYPE, "text/plain")
            .body(Body::from("name=Mouse"))
            .unwrap();
        match NewProduct::from_request(req, &()).await {
            Err(AppError::Validation(errors)) => assert_eq!(errors.len(), 4),
            other => panic!("unexpected extraction: {other:?}"),
        }
    }

    #[tokio::test]
    async fn malformed_json_is_a_bad_request() {
        let req = Request::builder()
            .method("POST")
            .uri("/")
            .header(header::CONTENT_TYPE, "application/json; charset=utf-8")
            .body(Body::from("{\"name\": "))
            .unwrap();
        assert!(matches!(
            NewProduct::from_request(req, &()).await,
            Err(AppError::BadRequest(_))
        ));
    }

    #[test]
    fn json_content_types() {
        let mut headers = HeaderMap::new();
        assert!(!has_json_content_type(&headers));
        headers.insert(header::CONTENT_TYPE, "application/json".parse().unwrap());
        assert!(has_json_content_type(&headers));
        headers.insert(
            header::CONTENT_TYPE,
            "application/merge-patch+json".parse().unwrap(),
        );
        assert!(has_json_content_type(&headers));
    }
}
