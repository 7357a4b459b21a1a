use crate::book::Book;
use crate::page;
use crate::scroll::{self, ScrollTarget, TextStore};
use axum::{
    Router,
    extract::State,
    http::{StatusCode, header},
    response::Html,
    routing::{get, post},
};
use std::sync::Arc;

#[derive(Clone)]
struct AppState {
    book: Arc<Book>,
    env: Arc<minijinja::Environment<'static>>,
    store: Arc<dyn TextStore + Send + Sync>,
}

/// Host the assembled book. `GET /` serves the page with the persisted
/// scroll offset injected; `POST /scroll` persists one scroll tick.
pub async fn serve(
    book: Book,
    store: impl TextStore + Send + Sync + 'static,
    addr: &str,
) -> anyhow::Result<()> {
    let state = AppState {
        book: Arc::new(book),
        env: Arc::new(page::template_env()),
        store: Arc::new(store),
    };

    let app = Router::new()
        .route("/", get(index))
        .route("/scroll", post(record_scroll))
        .with_state(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    log::info!("listening on http://{}", listener.local_addr()?);
    axum::serve(listener, app).await?;
    Ok(())
}

async fn index(
    State(state): State<AppState>,
) -> Result<([(header::HeaderName, &'static str); 1], Html<String>), (StatusCode, String)> {
    // Fragments never reach the server; anchor handling is the page's job.
    // Only a persisted offset can seed the initial position here.
    let offset = match scroll::initial_position(None, &state.book.sections, state.store.as_ref()) {
        ScrollTarget::Offset(y) => Some(y),
        _ => None,
    };

    match page::render_page(&state.book, &state.env, offset, true) {
        Ok(html) => Ok(([(header::CACHE_CONTROL, "no-cache")], Html(html))),
        Err(e) => Err((
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("page rendering failed: {e}"),
        )),
    }
}

async fn record_scroll(State(state): State<AppState>, body: String) -> StatusCode {
    match body.trim().parse::<f64>() {
        Ok(offset) => {
            log::debug!("scroll tick: {offset}");
            scroll::record(state.store.as_ref(), offset);
            StatusCode::NO_CONTENT
        }
        Err(_) => StatusCode::BAD_REQUEST,
    }
}
