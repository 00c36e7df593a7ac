//! Notes API
//!
//! Serves three resources:
//!
//! - `/notes`: a collection with list views, JSON or MessagePack
//! - `/settings`: a single settings document
//! - `/counters`: dispatcher counters
//!
//! Note ids are chosen by the client. POSTing an id that already exists is
//! refused by the in-memory provider and answered with a 500.
//!
//! ```bash
//! cargo run --example notes-api
//! curl -s 'localhost:8080/notes?_sortDir=desc&_perPage=2&_page=1'
//! curl -s -XPOST localhost:8080/notes -H 'content-type: application/json' \
//!     -d '{"id":4,"title":"buy milk","done":false,"created_at":"2026-01-01T00:00:00Z"}'
//! curl -s 'localhost:8080/notes?_filters=%7B%22done%22%3Atrue%7D'
//! curl -s localhost:8080/notes/health-check
//! curl -s localhost:8080/counters
//! ```

use std::sync::{Arc, RwLock};

use chrono::{DateTime, Utc};
use restmux::prelude::*;
use restmux::responses;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Note {
    id: u64,
    title: String,
    done: bool,
    created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Settings {
    owner: String,
    page_size: usize,
}

struct SettingsDocument(RwLock<Settings>);

impl ItemResource<Settings> for SettingsDocument {
    fn current(&self, _ctx: &RequestContext) -> Result<Option<Settings>> {
        let settings = self
            .0
            .read()
            .map_err(|_| Error::Internal("settings lock poisoned".into()))?;
        Ok(Some(settings.clone()))
    }

    fn accept_post(&self, _item: Settings, _ctx: &RequestContext) -> Result<RestResponse> {
        Ok(responses::method_not_allowed())
    }

    fn accept_put(&self, item: Settings, _ctx: &RequestContext) -> Result<RestResponse> {
        *self
            .0
            .write()
            .map_err(|_| Error::Internal("settings lock poisoned".into()))? = item;
        Ok(responses::no_content())
    }
}

fn seed() -> Vec<Note> {
    let now = Utc::now();
    ["write the release notes", "review the dispatcher", "water the plants"]
        .into_iter()
        .enumerate()
        .map(|(i, title)| Note {
            id: i as u64 + 1,
            title: title.to_string(),
            done: i == 1,
            created_at: now,
        })
        .collect()
}

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::load()?;
    init_tracing(&config)?;

    let state = Arc::new(ServiceState::new());

    let notes = GenericCrudHandler::with_comparator(
        Arc::new(MemoryProvider::new(|n: &Note| n.id).with_items(seed())),
        |a: &Note, b: &Note| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)),
    )
    .with_serializers(vec![
        Arc::new(MsgPackSerializer::new()) as Arc<dyn ContentSerializer<Note>>,
    ])
    .with_dispatch_config(&config.dispatch);

    let settings = SingleItemHandler::new(Arc::new(SettingsDocument(RwLock::new(Settings {
        owner: "ops".into(),
        page_size: config.dispatch.default_per_page,
    }))));

    let resolver = PathResolver::new()
        .route("notes", Arc::new(notes))
        .route("settings", Arc::new(settings))
        .route("counters", Arc::new(CountersHandler::new(Arc::clone(&state))));

    let dispatcher = Dispatcher::builder(resolver)
        .config(&config)
        .state(state)
        .build()?;

    Server::new(config).serve(Arc::new(dispatcher)).await
}
