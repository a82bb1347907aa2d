//! Transport-agnostic web API engine.
//!
//! The HTTP adapter feeds requests in as (method, path, query, body) and
//! writes the returned status/body out; every routing and mapping decision
//! lives here so the whole external contract runs under the host test
//! runner. Each route translates directly to one registry operation.
//!
//! | Method | Path                     | Operation          |
//! |--------|--------------------------|--------------------|
//! | GET    | `/api/rumors[?name=]`    | list               |
//! | POST   | `/api/rumors`            | create             |
//! | PUT    | `/api/rumors/{id}`       | update             |
//! | DELETE | `/api/rumors/{id}`       | delete             |
//! | POST   | `/api/rumors/{id}/reset` | reset one count    |
//! | POST   | `/api/rumors/resetAll`   | reset all counts   |

use crate::app::RumorRegistry;
use crate::app::ports::SnapshotStore;
use crate::app::rumor::{RumorDraft, RumorPatch};
use crate::error::Error;

// ───────────────────────────────────────────────────────────────
// Request / response surface
// ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

/// Status plus optional JSON body. The adapter adds the content type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    pub status: u16,
    pub body: Option<String>,
}

impl Response {
    fn json(status: u16, body: String) -> Self {
        Self {
            status,
            body: Some(body),
        }
    }

    fn empty(status: u16) -> Self {
        Self { status, body: None }
    }

    fn error(status: u16, message: &str) -> Self {
        Self::json(status, format!("{{\"error\":\"{message}\"}}"))
    }
}

// ───────────────────────────────────────────────────────────────
// Routing
// ───────────────────────────────────────────────────────────────

/// Dispatch one API request. Unknown routes yield 404; the adapter only
/// forwards paths under `/api/`.
pub fn handle<S: SnapshotStore>(
    registry: &RumorRegistry<S>,
    method: Method,
    path: &str,
    query: Option<&str>,
    body: &[u8],
) -> Response {
    let segments: Vec<&str> = path.trim_matches('/').split('/').collect();

    match (method, segments.as_slice()) {
        (Method::Get, ["api", "rumors"]) => list(registry, query),
        (Method::Post, ["api", "rumors"]) => create(registry, body),
        (Method::Post, ["api", "rumors", "resetAll"]) => {
            finish(registry.reset_all_counts())
        }
        (Method::Put, ["api", "rumors", id]) => match parse_id(id) {
            Some(id) => update(registry, id, body),
            None => Response::error(404, "not found"),
        },
        (Method::Delete, ["api", "rumors", id]) => match parse_id(id) {
            Some(id) => finish(registry.delete(id)),
            None => Response::error(404, "not found"),
        },
        (Method::Post, ["api", "rumors", id, "reset"]) => match parse_id(id) {
            Some(id) => finish(registry.reset_count(id)),
            None => Response::error(404, "not found"),
        },
        _ => Response::error(404, "not found"),
    }
}

fn parse_id(segment: &str) -> Option<u32> {
    segment.parse().ok()
}

// ───────────────────────────────────────────────────────────────
// Handlers
// ───────────────────────────────────────────────────────────────

fn list<S: SnapshotStore>(registry: &RumorRegistry<S>, query: Option<&str>) -> Response {
    let filter = query.and_then(|q| query_param(q, "name"));
    match registry.list(filter.as_deref()) {
        Ok(rumors) => match serde_json::to_string(&rumors) {
            Ok(body) => Response::json(200, body),
            Err(_) => Response::error(500, "encode failed"),
        },
        Err(e) => error_response(e),
    }
}

fn create<S: SnapshotStore>(registry: &RumorRegistry<S>, body: &[u8]) -> Response {
    match parse_body::<RumorDraft>(body, "missing fields").and_then(|d| registry.create(d)) {
        Ok(rumor) => match serde_json::to_string(&rumor) {
            Ok(body) => Response::json(201, body),
            Err(_) => Response::error(500, "encode failed"),
        },
        Err(e) => error_response(e),
    }
}

fn update<S: SnapshotStore>(registry: &RumorRegistry<S>, id: u32, body: &[u8]) -> Response {
    match parse_body::<RumorPatch>(body, "invalid fields").and_then(|p| registry.update(id, p)) {
        Ok(rumor) => match serde_json::to_string(&rumor) {
            Ok(body) => Response::json(200, body),
            Err(_) => Response::error(500, "encode failed"),
        },
        Err(e) => error_response(e),
    }
}

/// Decode a JSON body in two steps so the caller can tell syntactically
/// broken JSON apart from a structurally wrong document.
fn parse_body<T: serde::de::DeserializeOwned>(
    body: &[u8],
    shape_error: &'static str,
) -> crate::error::Result<T> {
    let value: serde_json::Value =
        serde_json::from_slice(body).map_err(|_| Error::InvalidInput("invalid json"))?;
    serde_json::from_value(value).map_err(|_| Error::InvalidInput(shape_error))
}

/// Map an empty-success registry result onto 204 / error status.
fn finish(result: crate::error::Result<()>) -> Response {
    match result {
        Ok(()) => Response::empty(204),
        Err(e) => error_response(e),
    }
}

fn error_response(e: Error) -> Response {
    match e {
        Error::NotFound => Response::error(404, "not found"),
        Error::Busy => Response::error(503, "busy"),
        Error::InvalidInput(msg) => Response::error(400, msg),
        Error::Storage(_) => Response::error(500, "storage"),
    }
}

// ───────────────────────────────────────────────────────────────
// Query-string handling
// ───────────────────────────────────────────────────────────────

/// Extract and percent-decode one parameter from a query string.
pub fn query_param(query: &str, name: &str) -> Option<String> {
    query.split('&').find_map(|pair| {
        let (key, value) = pair.split_once('=')?;
        (key == name).then(|| percent_decode(value))
    })
}

/// Decode `%XX` escapes and `+` as space. Malformed escapes are passed
/// through literally rather than rejected — a filter that matches nothing
/// beats a 400 on a hand-typed URL.
fn percent_decode(input: &str) -> String {
    let bytes = input.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'+' => {
                out.push(b' ');
                i += 1;
            }
            b'%' if i + 2 < bytes.len()
                && bytes[i + 1].is_ascii_hexdigit()
                && bytes[i + 2].is_ascii_hexdigit() =>
            {
                let hi = hex_val(bytes[i + 1]);
                let lo = hex_val(bytes[i + 2]);
                out.push((hi << 4) | lo);
                i += 3;
            }
            b => {
                out.push(b);
                i += 1;
            }
        }
    }
    String::from_utf8_lossy(&out).into_owned()
}

fn hex_val(digit: u8) -> u8 {
    match digit {
        b'0'..=b'9' => digit - b'0',
        b'a'..=b'f' => digit - b'a' + 10,
        _ => digit - b'A' + 10,
    }
}
