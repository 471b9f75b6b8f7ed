//! Maps method + path under the collection to exactly one riddle operation.

use crate::error::AppError;
use crate::representation::RESOURCE_PATH;
use axum::http::Method;

/// Segment that selects a random published riddle instead of an id.
const RANDOM_SEGMENT: &str = "random";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Route {
    List,
    Create,
    Random,
    Read(i32),
    Patch(i32),
    Delete(i32),
}

impl Route {
    /// Operations that must pass the allow-list gate.
    pub fn is_mutating(self) -> bool {
        matches!(self, Route::Patch(_) | Route::Delete(_))
    }
}

pub fn resolve(method: &Method, path: &str) -> Result<Route, AppError> {
    let not_found = || AppError::NotFound("not found".into());
    let rest = path.strip_prefix(RESOURCE_PATH).ok_or_else(not_found)?;

    if rest.is_empty() {
        return match *method {
            Method::GET => Ok(Route::List),
            Method::POST => Ok(Route::Create),
            _ => Err(AppError::MethodNotAllowed),
        };
    }

    let rest = rest.strip_prefix('/').ok_or_else(not_found)?;
    let segments: Vec<&str> = rest.split('/').collect();
    let [segment] = segments.as_slice() else {
        tracing::warn!(path = %path, "invalid request path");
        return Err(AppError::BadRequest("invalid request".into()));
    };

    // Checked before the id shape: "random" is never an id.
    if *segment == RANDOM_SEGMENT {
        return match *method {
            Method::GET => Ok(Route::Random),
            _ => Err(AppError::MethodNotAllowed),
        };
    }

    let route: fn(i32) -> Route = match *method {
        Method::GET => Route::Read,
        Method::PATCH => Route::Patch,
        Method::DELETE => Route::Delete,
        _ => return Err(AppError::MethodNotAllowed),
    };
    Ok(route(parse_id(segment)?))
}

/// Non-negative integer ids only.
fn parse_id(segment: &str) -> Result<i32, AppError> {
    match segment.parse::<i32>() {
        Ok(id) if id >= 0 => Ok(id),
        _ => {
            tracing::warn!(segment = %segment, "invalid riddle id in path");
            Err(AppError::BadRequest("invalid id".into()))
        }
    }
}
