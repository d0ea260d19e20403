//! Error boundary demo
//!
//! Loader and action fail on request, either with an expected status or with
//! an unexpected fault, so every boundary path can be exercised.

use serde::Serialize;

use super::{timestamp, RouteArgs};
use crate::error::DemoError;
use crate::http::FormData;

/// Failures the demo can be asked to produce
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    LoaderNotFound,
    LoaderServerError,
    LoaderThrow,
    ActionBadRequest,
    ActionServerError,
    ActionThrow,
}

impl Trigger {
    /// Anything unrecognized means "no failure"
    pub fn parse(tag: &str) -> Option<Self> {
        match tag {
            "loader-404" => Some(Self::LoaderNotFound),
            "loader-500" => Some(Self::LoaderServerError),
            "loader-throw" => Some(Self::LoaderThrow),
            "action-400" => Some(Self::ActionBadRequest),
            "action-500" => Some(Self::ActionServerError),
            "action-throw" => Some(Self::ActionThrow),
            _ => None,
        }
    }

    pub fn into_error(self) -> DemoError {
        match self {
            Self::LoaderNotFound => DemoError::status(404, "Resource not found in loader"),
            Self::LoaderServerError => DemoError::status(500, "Internal server error in loader"),
            Self::LoaderThrow => DemoError::unexpected("Unexpected error thrown in loader!"),
            Self::ActionBadRequest => DemoError::status(400, "Bad request in action"),
            Self::ActionServerError => DemoError::status(500, "Server error in action"),
            Self::ActionThrow => DemoError::unexpected("Unexpected error thrown in action!"),
        }
    }

    const fn is_loader(self) -> bool {
        matches!(
            self,
            Self::LoaderNotFound | Self::LoaderServerError | Self::LoaderThrow
        )
    }
}

#[derive(Debug, Serialize)]
pub struct Loaded {
    pub loaded_at: String,
}

#[derive(Debug, Serialize)]
pub struct Submitted {
    pub ok: bool,
}

#[allow(clippy::unused_async)]
pub async fn loader(args: RouteArgs<'_>) -> Result<Loaded, DemoError> {
    match Trigger::parse(args.query.get_or_empty("error")) {
        Some(trigger) if trigger.is_loader() => Err(trigger.into_error()),
        _ => Ok(Loaded {
            loaded_at: timestamp(),
        }),
    }
}

#[allow(clippy::unused_async)]
pub async fn action(form: &FormData) -> Result<Submitted, DemoError> {
    match Trigger::parse(form.get_or_empty("errorType")) {
        Some(trigger) if !trigger.is_loader() => Err(trigger.into_error()),
        _ => Ok(Submitted { ok: true }),
    }
}
