//! HTTP transport binding for the web engine.
//!
//! Thin by design: four wildcard handlers forward `/api/*` requests into
//! [`crate::web::handle`], and a catch-all GET serves the embedded
//! management UI. Routing, parsing, and status mapping all live in the
//! engine where they are host-tested; this file only moves bytes.

use std::sync::Arc;

use esp_idf_svc::http::Method as HttpMethod;
use esp_idf_svc::http::server::{Configuration as HttpServerConfig, EspHttpServer};
use esp_idf_svc::io::{Read, Write};

use crate::app::RumorRegistry;
use crate::app::ports::SnapshotStore;
use crate::web::{self, Method};

/// The management UI, baked into the firmware image.
const INDEX_HTML: &str = include_str!("../../static/index.html");

/// Largest request body we accept; covers any sane rumor payload.
const MAX_BODY: usize = 8 * 1024;

/// Bring up the web server on port 80 and wire the API routes.
///
/// The returned server must be kept alive for the process lifetime —
/// dropping it unregisters every handler.
pub fn start<S>(registry: Arc<RumorRegistry<S>>) -> anyhow::Result<EspHttpServer<'static>>
where
    S: SnapshotStore + Send + Sync + 'static,
{
    let conf = HttpServerConfig {
        uri_match_wildcard: true,
        ..Default::default()
    };
    let mut server = EspHttpServer::new(&conf)?;

    for (http_method, method) in [
        (HttpMethod::Get, Method::Get),
        (HttpMethod::Post, Method::Post),
        (HttpMethod::Put, Method::Put),
        (HttpMethod::Delete, Method::Delete),
    ] {
        let registry = Arc::clone(&registry);
        server.fn_handler("/api/*", http_method, move |mut req| -> anyhow::Result<()> {
            let uri = req.uri().to_string();
            let (path, query) = match uri.split_once('?') {
                Some((path, query)) => (path, Some(query)),
                None => (uri.as_str(), None),
            };

            let mut body = Vec::new();
            let mut chunk = [0u8; 512];
            loop {
                let n = req.read(&mut chunk)?;
                if n == 0 {
                    break;
                }
                body.extend_from_slice(&chunk[..n]);
                if body.len() > MAX_BODY {
                    req.into_response(413, None, &[])?;
                    return Ok(());
                }
            }

            let resp = web::handle(&registry, method, path, query, &body);
            match resp.body {
                Some(payload) => {
                    let mut out = req.into_response(
                        resp.status,
                        None,
                        &[("Content-Type", "application/json")],
                    )?;
                    out.write_all(payload.as_bytes())?;
                }
                None => {
                    req.into_response(resp.status, None, &[])?;
                }
            }
            Ok(())
        })?;
    }

    // Any other GET lands on the management UI, mirroring the appliance's
    // serve-index-for-everything behavior.
    server.fn_handler("/*", HttpMethod::Get, |req| -> anyhow::Result<()> {
        let mut out = req.into_response(200, None, &[("Content-Type", "text/html")])?;
        out.write_all(INDEX_HTML.as_bytes())?;
        Ok(())
    })?;

    log::info!("http: server up, UI + /api/rumors routes registered");
    Ok(server)
}
