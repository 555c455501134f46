//! Lets HTML forms, which can only GET and POST, reach the PUT and DELETE
//! routes: a POST with `?_method=PUT` (or an `X-HTTP-Method-Override`
//! header) is routed as a PUT.

use std::collections::HashMap;

use axum::extract::{Query, Request};
use axum::http::{HeaderMap, Method, Uri};

const OVERRIDE_PARAM: &str = "_method";
const OVERRIDE_HEADER: &str = "x-http-method-override";

pub fn apply(mut req: Request) -> Request {
    if req.method() != Method::POST {
        return req;
    }

    let requested = from_query(req.uri()).or_else(|| from_header(req.headers()));
    if let Some(method) = requested.as_deref().and_then(parse_method) {
        *req.method_mut() = method;
    }
    req
}

fn from_query(uri: &Uri) -> Option<String> {
    let Query(params) = Query::<HashMap<String, String>>::try_from_uri(uri).ok()?;
    params.get(OVERRIDE_PARAM).cloned()
}

fn from_header(headers: &HeaderMap) -> Option<String> {
    headers
        .get(OVERRIDE_HEADER)?
        .to_str()
        .ok()
        .map(str::to_owned)
}

fn parse_method(name: &str) -> Option<Method> {
    match name.trim().to_ascii_uppercase().as_str() {
        "PUT" => Some(Method::PUT),
        "PATCH" => Some(Method::PATCH),
        "DELETE" => Some(Method::DELETE),
        _ => None,
    }
}
