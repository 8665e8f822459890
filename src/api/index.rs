//! Dashboard endpoint

use axum::{extract::State, Json};
use axum_extra::extract::cookie::{Cookie, CookieJar};
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{error::AppResult, models::stats::CatalogCounts, AppState};

/// Dashboard page
#[derive(Serialize, ToSchema)]
pub struct IndexResponse {
    pub counts: CatalogCounts,
    /// Visits to this page earlier in the session
    pub num_visits: u64,
}

/// Catalog counts and the session visit counter
#[utoipa::path(
    get,
    path = "/catalog/",
    tag = "catalog",
    responses(
        (status = 200, description = "Dashboard", body = IndexResponse)
    )
)]
pub async fn index(
    State(state): State<AppState>,
    jar: CookieJar,
) -> AppResult<(CookieJar, Json<IndexResponse>)> {
    let counts = state.services.catalog.counts().await?;

    let cookie_name = state.config.session.cookie_name.clone();
    let existing = jar.get(&cookie_name).map(|c| c.value().to_string());
    let (jar, session_id) = match existing {
        Some(session_id) => (jar, session_id),
        None => {
            let session_id = Uuid::new_v4().to_string();
            let cookie = Cookie::build((cookie_name, session_id.clone()))
                .path("/")
                .http_only(true);
            (jar.add(cookie), session_id)
        }
    };

    let num_visits = state.services.sessions.record_visit(&session_id).await?;

    Ok((jar, Json(IndexResponse { counts, num_visits })))
}
