//! Goal routes, their handlers and the OpenAPI document.

use crate::auth::require_user;
use crate::envelope::{construct, ApiError, JsonBody, PathParams};
use crate::AppState;
use api_shared::{
    AuthenticatedUser, CommentDoc, CommentFields, CommentReq, ErrorBody, ErrorRes, GoalDoc,
    GoalFields, GoalReq, GoalRes, GoalsRes, HealthRes, HealthService,
};
use axum::{
    extract::State,
    middleware,
    response::Json,
    routing::{delete, get, post},
    Extension, Router,
};
use goals_core::{
    Comment, CommentId, Goal, GoalChanges, GoalId, GoalResult, NewComment, NewGoal,
};
use tower_http::cors::CorsLayer;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};
use utoipa_swagger_ui::SwaggerUi;

#[derive(OpenApi)]
#[openapi(
    paths(
        health,
        list_goals,
        list_archived_goals,
        upcoming_goal,
        goals_by_due_date_range,
        create_goal,
        get_goal,
        update_goal,
        remove_goal,
        create_note,
        remove_note,
    ),
    components(schemas(
        HealthRes,
        GoalDoc,
        CommentDoc,
        GoalsRes,
        GoalRes,
        GoalReq,
        GoalFields,
        CommentReq,
        CommentFields,
        ErrorRes,
        ErrorBody,
    )),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer",
                SecurityScheme::Http(HttpBuilder::new().scheme(HttpAuthScheme::Bearer).build()),
            );
        }
    }
}

/// Builds the REST application: authenticated goal routes, an open health check and Swagger UI.
pub fn router(state: AppState) -> Router {
    let api = Router::new()
        .route("/api/goals", get(list_goals).post(create_goal))
        .route("/api/goals/archived", get(list_archived_goals))
        .route("/api/goals/upcoming", get(upcoming_goal))
        // the range's first segment must reuse the `:id` name of the single-goal routes
        .route("/api/goals/:id/:due_date_stop", get(goals_by_due_date_range))
        .route(
            "/api/goals/:id",
            get(get_goal).put(update_goal).delete(remove_goal),
        )
        .route("/api/goal/notes/:id", post(create_note))
        .route("/api/goal/notes/:id/:note_id", delete(remove_note))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_user));

    Router::new()
        .route("/health", get(health))
        .merge(api)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Health check response", body = HealthRes)
    )
)]
/// Health check endpoint for the REST API
///
/// Returns the current health status of the goals service. Not behind authentication.
#[axum::debug_handler]
async fn health(State(_state): State<AppState>) -> Json<HealthRes> {
    Json(HealthService::check_health())
}

#[utoipa::path(
    get,
    path = "/api/goals",
    responses(
        (status = 200, description = "The user's active goals", body = GoalsRes),
        (status = 401, description = "Unauthenticated", body = ErrorRes),
        (status = 500, description = "Internal server error", body = ErrorRes)
    ),
    security(("bearer" = []))
)]
#[axum::debug_handler]
async fn list_goals(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> Result<Json<GoalsRes>, ApiError> {
    construct(state.controller().list(&user.user_id).await, goals_res)
}

#[utoipa::path(
    get,
    path = "/api/goals/archived",
    responses(
        (status = 200, description = "The user's archived goals", body = GoalsRes),
        (status = 401, description = "Unauthenticated", body = ErrorRes),
        (status = 500, description = "Internal server error", body = ErrorRes)
    ),
    security(("bearer" = []))
)]
#[axum::debug_handler]
async fn list_archived_goals(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> Result<Json<GoalsRes>, ApiError> {
    construct(
        state.controller().list_archived(&user.user_id).await,
        goals_res,
    )
}

#[utoipa::path(
    get,
    path = "/api/goals/upcoming",
    responses(
        (status = 200, description = "The next active goal due, or null", body = GoalRes),
        (status = 401, description = "Unauthenticated", body = ErrorRes),
        (status = 500, description = "Internal server error", body = ErrorRes)
    ),
    security(("bearer" = []))
)]
#[axum::debug_handler]
async fn upcoming_goal(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> Result<Json<GoalRes>, ApiError> {
    construct(
        state.controller().upcoming_one(&user.user_id).await,
        goal_res,
    )
}

#[utoipa::path(
    get,
    path = "/api/goals/{due_date_start}/{due_date_stop}",
    params(
        ("due_date_start" = String, Path, description = "Exclusive lower bound in epoch ms, or 0 for none"),
        ("due_date_stop" = String, Path, description = "Inclusive upper bound in epoch ms, or 0 for none")
    ),
    responses(
        (status = 200, description = "Active goals due within the range", body = GoalsRes),
        (status = 400, description = "Bound is not epoch milliseconds", body = ErrorRes),
        (status = 401, description = "Unauthenticated", body = ErrorRes),
        (status = 500, description = "Internal server error", body = ErrorRes)
    ),
    security(("bearer" = []))
)]
#[axum::debug_handler]
async fn goals_by_due_date_range(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    PathParams((start, stop)): PathParams<(String, String)>,
) -> Result<Json<GoalsRes>, ApiError> {
    construct(
        state
            .controller()
            .by_due_date_range(&user.user_id, &start, &stop)
            .await,
        goals_res,
    )
}

#[utoipa::path(
    post,
    path = "/api/goals",
    request_body = GoalReq,
    responses(
        (status = 200, description = "Goal created", body = GoalRes),
        (status = 400, description = "Bad request", body = ErrorRes),
        (status = 401, description = "Unauthenticated", body = ErrorRes),
        (status = 403, description = "Goal belongs to another user", body = ErrorRes),
        (status = 500, description = "Internal server error", body = ErrorRes)
    ),
    security(("bearer" = []))
)]
/// Create a goal
///
/// The goal is owned by the authenticated user. A `userId` in the body must match that user;
/// an `id` (or `_id`) in the body becomes the goal's identifier.
#[axum::debug_handler]
async fn create_goal(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    JsonBody(req): JsonBody<GoalReq>,
) -> Result<Json<GoalRes>, ApiError> {
    let input = new_goal(req.goal)?;
    construct(
        state.controller().create(&user.user_id, input).await,
        |goal| goal_res(Some(goal)),
    )
}

#[utoipa::path(
    get,
    path = "/api/goals/{id}",
    params(("id" = String, Path, description = "Goal identifier")),
    responses(
        (status = 200, description = "The goal with comments rendered as HTML, or null", body = GoalRes),
        (status = 400, description = "Malformed identifier", body = ErrorRes),
        (status = 401, description = "Unauthenticated", body = ErrorRes),
        (status = 500, description = "Internal server error", body = ErrorRes)
    ),
    security(("bearer" = []))
)]
#[axum::debug_handler]
async fn get_goal(
    State(state): State<AppState>,
    PathParams(id): PathParams<String>,
) -> Result<Json<GoalRes>, ApiError> {
    let id = GoalId::parse(&id)?;
    construct(state.controller().get(&id).await, goal_res)
}

#[utoipa::path(
    put,
    path = "/api/goals/{id}",
    params(("id" = String, Path, description = "Goal identifier")),
    request_body = GoalReq,
    responses(
        (status = 200, description = "The updated goal, or null if there is none", body = GoalRes),
        (status = 400, description = "Bad request", body = ErrorRes),
        (status = 401, description = "Unauthenticated", body = ErrorRes),
        (status = 500, description = "Internal server error", body = ErrorRes)
    ),
    security(("bearer" = []))
)]
/// Update a goal
///
/// `title`, `type` and `status` change when present; `description` is always written and
/// defaults to empty; `dueDate` changes only when the key is present.
#[axum::debug_handler]
async fn update_goal(
    State(state): State<AppState>,
    PathParams(id): PathParams<String>,
    JsonBody(req): JsonBody<GoalReq>,
) -> Result<Json<GoalRes>, ApiError> {
    let id = GoalId::parse(&id)?;
    construct(
        state.controller().update(&id, goal_changes(req.goal)).await,
        goal_res,
    )
}

#[utoipa::path(
    delete,
    path = "/api/goals/{id}",
    params(("id" = String, Path, description = "Goal identifier")),
    responses(
        (status = 200, description = "The goal as it was before deletion", body = GoalRes),
        (status = 400, description = "Malformed identifier", body = ErrorRes),
        (status = 401, description = "Unauthenticated", body = ErrorRes),
        (status = 404, description = "No such goal", body = ErrorRes),
        (status = 500, description = "Internal server error", body = ErrorRes)
    ),
    security(("bearer" = []))
)]
#[axum::debug_handler]
async fn remove_goal(
    State(state): State<AppState>,
    PathParams(id): PathParams<String>,
) -> Result<Json<GoalRes>, ApiError> {
    let id = GoalId::parse(&id)?;
    construct(state.controller().remove(&id).await, |goal| {
        goal_res(Some(goal))
    })
}

#[utoipa::path(
    post,
    path = "/api/goal/notes/{id}",
    params(("id" = String, Path, description = "Goal identifier")),
    request_body = CommentReq,
    responses(
        (status = 200, description = "The goal with the comment appended", body = GoalRes),
        (status = 400, description = "Bad request", body = ErrorRes),
        (status = 401, description = "Unauthenticated", body = ErrorRes),
        (status = 404, description = "No such goal", body = ErrorRes),
        (status = 500, description = "Internal server error", body = ErrorRes)
    ),
    security(("bearer" = []))
)]
#[axum::debug_handler]
async fn create_note(
    State(state): State<AppState>,
    PathParams(id): PathParams<String>,
    JsonBody(req): JsonBody<CommentReq>,
) -> Result<Json<GoalRes>, ApiError> {
    let id = GoalId::parse(&id)?;
    let note = NewComment {
        content: req.comment.content,
        date: req.comment.date,
    };
    construct(state.controller().create_note(&id, note).await, |goal| {
        goal_res(Some(goal))
    })
}

#[utoipa::path(
    delete,
    path = "/api/goal/notes/{id}/{note_id}",
    params(
        ("id" = String, Path, description = "Goal identifier"),
        ("note_id" = String, Path, description = "Comment identifier")
    ),
    responses(
        (status = 200, description = "The goal without the comment", body = GoalRes),
        (status = 400, description = "Malformed identifier", body = ErrorRes),
        (status = 401, description = "Unauthenticated", body = ErrorRes),
        (status = 404, description = "No such goal", body = ErrorRes),
        (status = 500, description = "Internal server error", body = ErrorRes)
    ),
    security(("bearer" = []))
)]
#[axum::debug_handler]
async fn remove_note(
    State(state): State<AppState>,
    PathParams((id, note_id)): PathParams<(String, String)>,
) -> Result<Json<GoalRes>, ApiError> {
    let id = GoalId::parse(&id)?;
    let note_id = CommentId::parse(&note_id)?;
    construct(
        state.controller().remove_note(&id, &note_id).await,
        |goal| goal_res(Some(goal)),
    )
}

fn new_goal(fields: GoalFields) -> GoalResult<NewGoal> {
    Ok(NewGoal {
        id: fields.id.as_deref().map(GoalId::parse).transpose()?,
        user_id: fields.user_id,
        title: fields.title,
        description: fields.description,
        goal_type: fields.goal_type,
        status: fields.status,
        due_date: fields.due_date.flatten(),
        create_date: fields.create_date,
    })
}

// id, userId and createDate are not updatable
fn goal_changes(fields: GoalFields) -> GoalChanges {
    GoalChanges {
        title: fields.title,
        description: fields.description,
        goal_type: fields.goal_type,
        status: fields.status,
        due_date: fields.due_date,
    }
}

fn comment_doc(comment: Comment) -> CommentDoc {
    CommentDoc {
        id: comment.id.into(),
        content: comment.content,
        date: comment.date,
    }
}

fn goal_doc(goal: Goal) -> GoalDoc {
    GoalDoc {
        id: goal.id.into(),
        user_id: goal.user_id,
        title: goal.title,
        description: goal.description,
        goal_type: goal.goal_type,
        status: goal.status,
        due_date: goal.due_date,
        create_date: goal.create_date,
        comments: goal.comments.into_iter().map(comment_doc).collect(),
    }
}

fn goals_res(goals: Vec<Goal>) -> GoalsRes {
    GoalsRes {
        goals: goals.into_iter().map(goal_doc).collect(),
    }
}

fn goal_res(goal: Option<Goal>) -> GoalRes {
    GoalRes {
        goal: goal.map(goal_doc),
    }
}
