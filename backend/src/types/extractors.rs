//! Custom extractors for request validation

use aide::operation::OperationInput;
use axum::{
    extract::{rejection::JsonRejection, FromRequest, Request},
    Json,
};
use schemars::JsonSchema;
use validator::Validate;

use crate::types::error::AppError;

/// Custom JSON extractor that validates the payload
pub struct ValidatedJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: serde::de::DeserializeOwned + Validate + JsonSchema,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        // First extract JSON
        let Json(payload) = Json::<T>::from_request(req, state)
            .await
            .map_err(|err| match err {
                JsonRejection::MissingJsonContentType(_) => {
                    AppError::bad_request("Missing Content-Type: application/json header")
                }
                JsonRejection::JsonDataError(e) => {
                    AppError::bad_request(format!("Invalid request body: {}", e.body_text()))
                }
                _ => AppError::bad_request("Invalid JSON payload"),
            })?;

        // Then validate
        payload.validate().map_err(|errors| {
            // Report the first field error that carries a message
            let message = errors
                .field_errors()
                .into_values()
                .flat_map(|field_errors| field_errors.iter())
                .find_map(|error| error.message.as_ref().map(ToString::to_string))
                .unwrap_or_else(|| "Request validation failed".to_string());

            AppError::bad_request(message)
        })?;

        Ok(Self(payload))
    }
}

impl<T> OperationInput for ValidatedJson<T>
where
    T: JsonSchema,
{
    fn operation_input(
        ctx: &mut aide::generate::GenContext,
        operation: &mut aide::openapi::Operation,
    ) {
        // Delegate to Json<T>'s implementation since ValidatedJson has the same structure
        Json::<T>::operation_input(ctx, operation);
    }
}
