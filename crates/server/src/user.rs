//! User API endpoints

use api_types::{
    ApiResponse,
    user::{User, UserPayload, UserSearch},
};
use axum::{
    Form, Json,
    extract::{FromRequest, Path, Query, Request, State, rejection::QueryRejection},
    http::{StatusCode, header},
};
use engine::{NewUser, UserField};

use crate::{NOT_FOUND_MESSAGE, ServerError, server::ServerState};

const NAME_REQUIRED: &str = "Name is required";

fn user_view(user: engine::User) -> User {
    User {
        id: user.id,
        name: user.name,
        class: user.class,
        nationality: user.nationality,
    }
}

/// Validate a request body into the fields handed to the engine.
///
/// `name` must be non-blank and is stored trimmed. Missing optional fields
/// become empty strings.
fn new_user(payload: UserPayload) -> Result<NewUser, ServerError> {
    let name = payload
        .name
        .as_deref()
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .ok_or_else(|| ServerError::Validation(NAME_REQUIRED.to_string()))?;

    Ok(NewUser::new(
        name,
        payload.class.unwrap_or_default(),
        payload.nationality.unwrap_or_default(),
    ))
}

/// Body of the create and modify endpoints, sent either as JSON or as an
/// urlencoded form.
pub struct UserBody(UserPayload);

impl<S> FromRequest<S> for UserBody
where
    S: Send + Sync,
{
    type Rejection = ServerError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let is_form = req
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .is_some_and(|value| value.starts_with("application/x-www-form-urlencoded"));

        let payload = if is_form {
            Form::<UserPayload>::from_request(req, state)
                .await
                .map(|Form(payload)| payload)
                .map_err(|rejection| ServerError::Validation(rejection.body_text()))?
        } else {
            Json::<UserPayload>::from_request(req, state)
                .await
                .map(|Json(payload)| payload)
                .map_err(|rejection| ServerError::Validation(rejection.body_text()))?
        };

        Ok(UserBody(payload))
    }
}

/// Parse an id from the path.
///
/// A malformed id cannot match any row, so it is reported as not found
/// without querying the database.
fn parse_id(raw: &str) -> Result<i32, ServerError> {
    raw.parse().map_err(|_| {
        tracing::debug!("malformed user id {raw:?}");
        ServerError::NotFound(NOT_FOUND_MESSAGE.to_string())
    })
}

/// Handle requests for listing every user
pub async fn list(
    State(state): State<ServerState>,
) -> Result<Json<ApiResponse<Vec<User>>>, ServerError> {
    let users = state
        .engine
        .list_users()
        .await
        .map_err(ServerError::engine("Failed to fetch users"))?;

    Ok(Json(ApiResponse::data(
        users.into_iter().map(user_view).collect(),
    )))
}

/// Handle requests for finding users by a single column
pub async fn search(
    State(state): State<ServerState>,
    query: Result<Query<UserSearch>, QueryRejection>,
) -> Result<Json<ApiResponse<Vec<User>>>, ServerError> {
    let Query(query) =
        query.map_err(|rejection| ServerError::Validation(rejection.body_text()))?;
    let field: UserField = query
        .field
        .parse()
        .map_err(ServerError::engine("Failed to search users"))?;
    let users = state
        .engine
        .find_users_by(field, &query.value)
        .await
        .map_err(ServerError::engine("Failed to search users"))?;

    Ok(Json(ApiResponse::data(
        users.into_iter().map(user_view).collect(),
    )))
}

/// Handle requests for creating a new user
pub async fn add(
    State(state): State<ServerState>,
    UserBody(payload): UserBody,
) -> Result<(StatusCode, Json<ApiResponse<User>>), ServerError> {
    let new_user = new_user(payload)?;
    let user = state
        .engine
        .create_user(new_user)
        .await
        .map_err(ServerError::engine("Failed to add user"))?;

    tracing::info!("created user {}", user.id);
    Ok((StatusCode::CREATED, Json(ApiResponse::data(user_view(user)))))
}

/// Handle requests for overwriting a user
pub async fn modify(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    UserBody(payload): UserBody,
) -> Result<Json<ApiResponse<User>>, ServerError> {
    let new_user = new_user(payload)?;
    let id = parse_id(&id)?;

    let user = state
        .engine
        .update_user(id, new_user)
        .await
        .map_err(ServerError::engine("Failed to modify user"))?
        .ok_or_else(|| ServerError::NotFound(NOT_FOUND_MESSAGE.to_string()))?;

    Ok(Json(ApiResponse::data(user_view(user))))
}

/// Handle requests for deleting a user
pub async fn remove(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<()>>, ServerError> {
    let id = parse_id(&id)?;

    let deleted = state
        .engine
        .delete_user(id)
        .await
        .map_err(ServerError::engine("Failed to remove user"))?;
    if !deleted {
        return Err(ServerError::NotFound(NOT_FOUND_MESSAGE.to_string()));
    }

    tracing::info!("deleted user {id}");
    Ok(Json(ApiResponse::message("User deleted successfully")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn name_is_trimmed_and_defaults_filled() {
        let user = new_user(UserPayload {
            name: Some("  Ana ".to_string()),
            class: None,
            nationality: Some("PT".to_string()),
        })
        .unwrap();
        assert_eq!(user, NewUser::new("Ana", "", "PT"));
    }

    #[test]
    fn blank_name_is_rejected() {
        let err = new_user(UserPayload {
            name: Some("   ".to_string()),
            ..Default::default()
        })
        .unwrap_err();
        assert!(matches!(err, ServerError::Validation(msg) if msg == NAME_REQUIRED));
    }

    #[test]
    fn malformed_id_is_not_found() {
        assert!(matches!(parse_id("abc"), Err(ServerError::NotFound(_))));
        assert_eq!(parse_id("12").unwrap(), 12);
    }
}
