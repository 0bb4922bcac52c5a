//! Request handlers for the feed's four entry points.
//!
//! These are transport-agnostic: the caller parses the method, body and query
//! parameter from whatever server it runs and writes the returned [`Reply`]
//! back. Routing and socket handling live outside this crate.

use crate::error::{FeedError, Result};
use crate::store::Feed;
use crossbeam_channel::Receiver;
use serde::Serialize;
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;
use tracing::warn;

/// Content type of every JSON reply body.
pub const JSON_CONTENT_TYPE: &str = "application/json";

/// Plain-text content type for error replies.
pub const TEXT_CONTENT_TYPE: &str = "text/plain; charset=utf-8";

/// Request method.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Method {
    Get,
    Put,
    Post,
    Delete,
    Other(String),
}

impl FromStr for Method {
    type Err = Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(match s.to_ascii_uppercase().as_str() {
            "GET" => Method::Get,
            "PUT" => Method::Put,
            "POST" => Method::Post,
            "DELETE" => Method::Delete,
            other => Method::Other(other.to_string()),
        })
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Method::Get => write!(f, "GET"),
            Method::Put => write!(f, "PUT"),
            Method::Post => write!(f, "POST"),
            Method::Delete => write!(f, "DELETE"),
            Method::Other(m) => write!(f, "{}", m),
        }
    }
}

/// Reply status.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Status {
    Ok,
    Created,
    BadRequest,
    MethodNotAllowed,
    RequestTimeout,
    /// The client went away before the reply was ready.
    ClientClosedRequest,
    InternalServerError,
}

impl Status {
    pub fn code(self) -> u16 {
        match self {
            Status::Ok => 200,
            Status::Created => 201,
            Status::BadRequest => 400,
            Status::MethodNotAllowed => 405,
            Status::RequestTimeout => 408,
            Status::ClientClosedRequest => 499,
            Status::InternalServerError => 500,
        }
    }

    pub fn is_success(self) -> bool {
        (200..300).contains(&self.code())
    }
}

impl FeedError {
    /// Reply status this error maps to.
    pub fn status(&self) -> Status {
        match self {
            FeedError::InvalidPattern(_) | FeedError::MissingParameter(_) => Status::BadRequest,
            FeedError::MethodNotAllowed(_) => Status::MethodNotAllowed,
            FeedError::Timeout(_) => Status::RequestTimeout,
            FeedError::Cancelled => Status::ClientClosedRequest,
            FeedError::Serialization(_) => Status::InternalServerError,
        }
    }
}

/// A handler's response.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Reply {
    pub status: Status,
    pub content_type: Option<&'static str>,
    pub body: String,
}

impl Reply {
    fn empty(status: Status) -> Self {
        Self {
            status,
            content_type: None,
            body: String::new(),
        }
    }

    fn json<T: Serialize + ?Sized>(value: &T) -> Result<Self> {
        Ok(Self {
            status: Status::Ok,
            content_type: Some(JSON_CONTENT_TYPE),
            body: serde_json::to_string_pretty(value)?,
        })
    }

    fn error(err: &FeedError) -> Self {
        if !err.is_client_error() {
            warn!(error = %err, "request failed");
        }
        Self {
            status: err.status(),
            content_type: Some(TEXT_CONTENT_TYPE),
            body: err.to_string(),
        }
    }
}

impl From<Result<Reply>> for Reply {
    fn from(result: Result<Reply>) -> Self {
        result.unwrap_or_else(|err| Reply::error(&err))
    }
}

fn require(method: &Method, allowed: Method) -> Result<()> {
    if *method == allowed {
        Ok(())
    } else {
        Err(FeedError::MethodNotAllowed(method.to_string()))
    }
}

/// Append the request body to the feed. PUT only.
///
/// Bodies that are not valid UTF-8 are stored lossily.
pub fn put(feed: &Feed, method: Method, body: &[u8]) -> Reply {
    let result = require(&method, Method::Put).map(|()| {
        feed.put(String::from_utf8_lossy(body).into_owned());
        Reply::empty(Status::Created)
    });
    result.into()
}

/// The whole window as pretty-printed JSON. GET only.
pub fn get(feed: &Feed, method: Method) -> Reply {
    let result = require(&method, Method::Get).and_then(|()| Reply::json(&feed.get()));
    result.into()
}

/// Entries matching the `q` regular expression. GET only.
pub fn search(feed: &Feed, method: Method, query: Option<&str>) -> Reply {
    let result = require(&method, Method::Get).and_then(|()| {
        let pattern = query
            .filter(|q| !q.is_empty())
            .ok_or(FeedError::MissingParameter("q"))?;
        Reply::json(&feed.search(pattern)?)
    });
    result.into()
}

/// Block until the window changes or the long-poll timeout passes. GET only.
///
/// When `cancel` is given, a message on it (or its sender being dropped)
/// ends the wait early. The subscriber is unregistered before returning on
/// every path.
pub fn long_poll(feed: &Feed, method: Method, cancel: Option<&Receiver<()>>) -> Reply {
    let result = require(&method, Method::Get).and_then(|()| {
        let snapshot = match cancel {
            Some(cancel) => feed.long_poll_cancellable(cancel)?,
            None => feed.long_poll()?,
        };
        Reply::json(&snapshot)
    });
    result.into()
}
