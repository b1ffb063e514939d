//! HTTP handlers for payment endpoints.

use axum::body::Bytes;
use axum::extract::{Json, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};

use crate::application::handlers::payment::{
    InitiatePaymentCommand, PaymentFlowError, ProcessWebhookCommand,
};
use crate::ports::GatewayError;

use super::super::StoreAppState;
use super::dto::{ErrorResponse, InitPaymentRequest};

/// POST /pay/init - Initialize a transaction with the remote gateway.
pub async fn initiate_payment(
    State(state): State<StoreAppState>,
    Json(request): Json<InitPaymentRequest>,
) -> Result<impl IntoResponse, PaymentApiError> {
    let handler = state.initiate_payment_handler();
    let result = handler
        .handle(InitiatePaymentCommand {
            email: request.email,
            amount: request.amount,
            reference: request.reference,
        })
        .await?;

    // The gateway's initialization payload goes back to the client verbatim
    Ok(Json(result.gateway_response))
}

/// POST /webhook/paystack - Handle gateway webhook events.
///
/// The body is taken as raw bytes; signature verification runs over the
/// exact wire bytes before any JSON parsing.
pub async fn handle_paystack_webhook(
    State(state): State<StoreAppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<impl IntoResponse, PaymentApiError> {
    let signature = headers
        .get("X-Paystack-Signature")
        .and_then(|v| v.to_str().ok())
        .ok_or(PaymentApiError::MissingSignature)?;

    let handler = state.webhook_handler();
    handler
        .handle(ProcessWebhookCommand {
            payload: body.to_vec(),
            signature: signature.to_string(),
        })
        .await?;

    // Acknowledge quickly; every authenticated event gets a 200
    Ok(StatusCode::OK)
}

// ════════════════════════════════════════════════════════════════════════════════
// Error Handling
// ════════════════════════════════════════════════════════════════════════════════

/// API error type that converts payment flow errors to HTTP responses.
pub enum PaymentApiError {
    /// Webhook arrived without its signature header.
    MissingSignature,

    /// Error from the payment flow itself.
    Flow(PaymentFlowError),
}

impl From<PaymentFlowError> for PaymentApiError {
    fn from(err: PaymentFlowError) -> Self {
        Self::Flow(err)
    }
}

impl IntoResponse for PaymentApiError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            PaymentApiError::MissingSignature => (
                StatusCode::BAD_REQUEST,
                "MISSING_SIGNATURE",
                "missing signature header".to_string(),
            ),

            PaymentApiError::Flow(err) => match err {
                PaymentFlowError::Validation { .. } => {
                    (StatusCode::BAD_REQUEST, "VALIDATION_FAILED", err.to_string())
                }
                PaymentFlowError::LockedOut => (
                    StatusCode::TOO_MANY_REQUESTS,
                    "PAYMENT_ATTEMPTS_BLOCKED",
                    "payment attempts temporarily blocked".to_string(),
                ),
                PaymentFlowError::InvalidSignature => (
                    StatusCode::BAD_REQUEST,
                    "INVALID_SIGNATURE",
                    "invalid signature".to_string(),
                ),
                PaymentFlowError::MalformedPayload(_) => (
                    StatusCode::BAD_REQUEST,
                    "MALFORMED_PAYLOAD",
                    "malformed webhook payload".to_string(),
                ),
                PaymentFlowError::Gateway(gateway_err) => {
                    // Full detail stays server-side; the client gets a
                    // generic message.
                    tracing::error!(error = %gateway_err, "payment gateway failure");
                    let status = match gateway_err {
                        GatewayError::Network(_) => StatusCode::BAD_GATEWAY,
                        GatewayError::ErrorStatus { .. } => StatusCode::BAD_GATEWAY,
                    };
                    (status, "GATEWAY_ERROR", "failed to initialize payment".to_string())
                }
            },
        };

        (status, Json(ErrorResponse::new(code, message))).into_response()
    }
}
