use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use std::sync::Arc;
use warp::Filter;
use warp::http::StatusCode;

use crate::config::Config;
use crate::service::NebulaService;
use nebula_core::CoreResult;
use nebula_types::{
    ErrorResponse, InfiniteScoreRequest, LevelCompleteRequest, LevelId, ProgressUpdateRequest,
    ServiceInfo,
};

pub mod config;
pub mod service;

const MAX_BODY_BYTES: u64 = 64 * 1024;
const DEFAULT_LEADERBOARD_LIMIT: u64 = 100;

#[derive(Deserialize)]
struct LeaderboardQuery {
    limit: Option<u64>,
}

pub fn create_routes(
    service: Arc<NebulaService>,
    config: Config,
) -> impl Filter<Extract = impl warp::Reply, Error = warp::Rejection> + Clone {
    let service_filter = warp::any().map({
        let service = service.clone();
        move || service.clone()
    });
    let leaderboard_max = config.leaderboard_max_limit;

    // Health check endpoint
    let health = warp::path("health")
        .and(warp::path::end())
        .and(warp::get())
        .map(|| warp::reply::with_status("OK", StatusCode::OK));

    let root = warp::path("api")
        .and(warp::path::end())
        .and(warp::get())
        .map(|| {
            warp::reply::json(&ServiceInfo {
                message: "Nebula Game API is running".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            })
        });

    let levels = warp::path!("api" / "levels")
        .and(warp::get())
        .and(service_filter.clone())
        .map(|service: Arc<NebulaService>| warp::reply::json(&service.levels()));

    let level = warp::path!("api" / "levels" / LevelId)
        .and(warp::get())
        .and(service_filter.clone())
        .map(|level_id: LevelId, service: Arc<NebulaService>| {
            json_result(service.level(level_id), "fetch level")
        });

    let get_progress = warp::path!("api" / "progress" / String)
        .and(warp::get())
        .and(service_filter.clone())
        .and_then(handle_get_progress);

    let update_progress = warp::path!("api" / "progress" / String)
        .and(warp::post())
        .and(json_body::<ProgressUpdateRequest>())
        .and(service_filter.clone())
        .and_then(handle_update_progress);

    let complete_level = warp::path!("api" / "progress" / String / "complete-level")
        .and(warp::post())
        .and(json_body::<LevelCompleteRequest>())
        .and(service_filter.clone())
        .and_then(handle_complete_level);

    let leaderboard = warp::path!("api" / "infinite" / "highscores")
        .and(warp::get())
        .and(warp::query::<LeaderboardQuery>())
        .and(service_filter.clone())
        .and_then(move |query: LeaderboardQuery, service: Arc<NebulaService>| {
            let limit = query
                .limit
                .unwrap_or(DEFAULT_LEADERBOARD_LIMIT)
                .min(leaderboard_max);
            handle_leaderboard(limit, service)
        });

    let submit_score = warp::path!("api" / "infinite" / "highscores" / String)
        .and(warp::post())
        .and(json_body::<InfiniteScoreRequest>())
        .and(service_filter.clone())
        .and_then(handle_submit_score);

    let achievements = warp::path!("api" / "achievements" / String)
        .and(warp::get())
        .and(service_filter.clone())
        .and_then(handle_get_achievements);

    // CORS configuration
    let cors = warp::cors()
        .allow_headers(vec!["content-type", "authorization"])
        .allow_methods(vec!["GET", "POST", "OPTIONS"]);
    let cors = if config.allows_any_origin() {
        cors.allow_any_origin()
    } else {
        cors.allow_origins(config.cors_origins.iter().map(String::as_str))
    };

    health
        .or(root)
        .or(levels)
        .or(level)
        .or(get_progress)
        .or(update_progress)
        .or(complete_level)
        .or(leaderboard)
        .or(submit_score)
        .or(achievements)
        .recover(handle_rejection)
        .with(cors)
        .with(warp::log("nebula"))
}

fn json_body<T>() -> impl Filter<Extract = (T,), Error = warp::Rejection> + Clone
where
    T: for<'de> Deserialize<'de> + Send,
{
    warp::body::content_length_limit(MAX_BODY_BYTES).and(warp::body::json())
}

fn error_reply(message: &str, status: StatusCode) -> warp::reply::WithStatus<warp::reply::Json> {
    warp::reply::with_status(warp::reply::json(&ErrorResponse::new(message)), status)
}

/// Map a service result onto a JSON reply; storage failures become 500s.
fn json_result<T: Serialize>(
    result: CoreResult<T>,
    action: &str,
) -> warp::reply::WithStatus<warp::reply::Json> {
    match result {
        Ok(value) => warp::reply::with_status(warp::reply::json(&value), StatusCode::OK),
        Err(err) if err.is_not_found() => {
            error_reply(&err.to_string(), StatusCode::NOT_FOUND)
        }
        Err(err) => {
            tracing::error!("Failed to {}: {}", action, err);
            error_reply(
                &format!("Failed to {}", action),
                StatusCode::INTERNAL_SERVER_ERROR,
            )
        }
    }
}

async fn handle_get_progress(
    player_id: String,
    service: Arc<NebulaService>,
) -> Result<impl warp::Reply, warp::Rejection> {
    Ok(json_result(
        service.progress(&player_id).await,
        "fetch progress",
    ))
}

async fn handle_update_progress(
    player_id: String,
    update: ProgressUpdateRequest,
    service: Arc<NebulaService>,
) -> Result<impl warp::Reply, warp::Rejection> {
    Ok(json_result(
        service.update_progress(&player_id, update).await,
        "update progress",
    ))
}

async fn handle_complete_level(
    player_id: String,
    request: LevelCompleteRequest,
    service: Arc<NebulaService>,
) -> Result<impl warp::Reply, warp::Rejection> {
    let result = service
        .complete_level(&player_id, &request)
        .await
        .map(|outcome| outcome.result);

    Ok(json_result(result, "complete level"))
}

async fn handle_leaderboard(
    limit: u64,
    service: Arc<NebulaService>,
) -> Result<impl warp::Reply, warp::Rejection> {
    Ok(json_result(
        service.leaderboard(limit).await,
        "fetch leaderboard",
    ))
}

async fn handle_submit_score(
    player_id: String,
    request: InfiniteScoreRequest,
    service: Arc<NebulaService>,
) -> Result<impl warp::Reply, warp::Rejection> {
    let result = service
        .submit_infinite_score(&player_id, &request)
        .await
        .map(|outcome| outcome.result);

    Ok(json_result(result, "save infinite score"))
}

async fn handle_get_achievements(
    player_id: String,
    service: Arc<NebulaService>,
) -> Result<impl warp::Reply, warp::Rejection> {
    Ok(json_result(
        service.achievements(&player_id).await,
        "fetch achievements",
    ))
}

async fn handle_rejection(err: warp::Rejection) -> Result<impl warp::Reply, Infallible> {
    let (status, message) = if err.is_not_found() {
        (StatusCode::NOT_FOUND, "Not found".to_string())
    } else if let Some(body_err) = err.find::<warp::filters::body::BodyDeserializeError>() {
        (StatusCode::BAD_REQUEST, format!("Invalid request body: {}", body_err))
    } else if err.find::<warp::reject::PayloadTooLarge>().is_some() {
        (StatusCode::PAYLOAD_TOO_LARGE, "Request body too large".to_string())
    } else if err.find::<warp::reject::LengthRequired>().is_some() {
        (StatusCode::LENGTH_REQUIRED, "Content-Length required".to_string())
    } else if err.find::<warp::reject::InvalidQuery>().is_some() {
        (StatusCode::BAD_REQUEST, "Invalid query string".to_string())
    } else if err.find::<warp::reject::MethodNotAllowed>().is_some() {
        (StatusCode::METHOD_NOT_ALLOWED, "Method not allowed".to_string())
    } else {
        tracing::error!("Unhandled rejection: {:?}", err);
        (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error".to_string())
    };

    Ok(error_reply(&message, status))
}
