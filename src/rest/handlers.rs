use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    Json,
};

use crate::{
    models::{Banner, EntityId},
    repository::RepositoryError,
};

use super::{
    models::{
        BannerResponse, CreateBannerRequest, ErrorResponse, HealthResponse, UpdateBannerRequest,
    },
    AppState,
};

fn error_body(status: StatusCode, message: impl Into<String>) -> Response {
    (
        status,
        Json(ErrorResponse {
            message: message.into(),
        }),
    )
        .into_response()
}

fn repository_error(err: RepositoryError) -> Response {
    match err {
        RepositoryError::InvalidArgument { .. } => {
            log::warn!("Rejected banner request: {}", err);
            error_body(StatusCode::BAD_REQUEST, err.to_string())
        }
        RepositoryError::DuplicateKey(_) => error_body(StatusCode::CONFLICT, err.to_string()),
        RepositoryError::Store(ref inner) => {
            log::error!("Banner store failure: {:?}", inner);
            error_body(StatusCode::INTERNAL_SERVER_ERROR, "internal store error")
        }
    }
}

pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let uptime_secs = state.started_at.elapsed().map(|d| d.as_secs()).unwrap_or(0);
    (
        StatusCode::OK,
        Json(HealthResponse {
            status: "ok",
            uptime_secs,
        }),
    )
}

pub async fn banners_page(State(state): State<AppState>) -> Response {
    let banners = match state.repository.get_all().await {
        Ok(banners) => banners,
        Err(err) => return repository_error(err),
    };
    match state.views.banner_list_page(&banners) {
        Ok(page) => Html(page).into_response(),
        Err(err) => {
            log::error!("Template error: {:?}", err);
            error_body(StatusCode::INTERNAL_SERVER_ERROR, "page rendering failed")
        }
    }
}

pub async fn list_banners(State(state): State<AppState>) -> Response {
    match state.repository.get_all().await {
        Ok(banners) => Json(
            banners
                .into_iter()
                .map(BannerResponse::from)
                .collect::<Vec<_>>(),
        )
        .into_response(),
        Err(err) => repository_error(err),
    }
}

pub async fn get_banner(State(state): State<AppState>, Path(id): Path<EntityId>) -> Response {
    match state.repository.get(id).await {
        Ok(Some(banner)) => Json(BannerResponse::from(banner)).into_response(),
        Ok(None) => error_body(StatusCode::NOT_FOUND, "banner not found"),
        Err(err) => repository_error(err),
    }
}

pub async fn create_banner(
    State(state): State<AppState>,
    Json(body): Json<CreateBannerRequest>,
) -> Response {
    match state
        .repository
        .create(Banner::new(body.id, body.html))
        .await
    {
        Ok(banner) => (StatusCode::CREATED, Json(BannerResponse::from(banner))).into_response(),
        Err(err) => repository_error(err),
    }
}

pub async fn update_banner(
    State(state): State<AppState>,
    Path(id): Path<EntityId>,
    Json(body): Json<UpdateBannerRequest>,
) -> Response {
    if let Some(body_id) = body.id.filter(|body_id| *body_id != id) {
        log::warn!("Banner id mismatch: path {} body {}", id, body_id);
        return error_body(
            StatusCode::BAD_REQUEST,
            format!("body id {body_id} does not match path id {id}"),
        );
    }

    match state.repository.update(Banner::new(id, body.html)).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => repository_error(err),
    }
}

pub async fn delete_banner(State(state): State<AppState>, Path(id): Path<EntityId>) -> Response {
    match state.repository.delete(id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => repository_error(err),
    }
}

pub async fn not_found() -> impl IntoResponse {
    error_body(StatusCode::NOT_FOUND, "endpoint not found")
}
