use std::sync::Arc;

use axum::{
    Json, Router,
    extract::State,
    response::{IntoResponse, Response},
    routing::post,
};

use crate::{
    application::usecases::token::TokenUseCase,
    domain::{repositories::token_issuer::TokenIssuer, value_objects::tokens::TokenRequest},
};

pub fn routes<T>(token_usecase: Arc<TokenUseCase<T>>) -> Router
where
    T: TokenIssuer + 'static,
{
    Router::new()
        .route("/getToken", post(get_token::<T>))
        .with_state(token_usecase)
}

pub async fn get_token<T>(
    State(token_usecase): State<Arc<TokenUseCase<T>>>,
    Json(request): Json<TokenRequest>,
) -> Response
where
    T: TokenIssuer + 'static,
{
    match token_usecase.issue(request) {
        Ok(response) => Json(response).into_response(),
        Err(err) => err.into_response(),
    }
}
