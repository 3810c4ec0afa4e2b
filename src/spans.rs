// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! OpenTelemetry span helpers for CCTP operations
//!
//! Every operation the [`Keeper`](crate::Keeper) exposes opens one span with a
//! static name and structured attributes. Failures are recorded on the span
//! with [`record_error`], following OpenTelemetry semantic conventions.
//!
//! # Example
//!
//! ```rust
//! use cctp_core::{spans, DomainId};
//!
//! let span = spans::send_message("noble1sender", DomainId::ETHEREUM, 64);
//! let _guard = span.enter();
//! // Custom send logic here
//! ```

use alloy_primitives::{hex, B256, U256};
use tracing::Span;

use crate::protocol::DomainId;

/// Create span for a deposit-for-burn.
///
/// Parent: Host transaction span (auto-attached by tracing)
/// Children: None
#[inline]
pub fn deposit_for_burn(
    from: &str,
    denom: &str,
    amount: &U256,
    destination_domain: DomainId,
) -> Span {
    tracing::info_span!(
        "cctp.deposit_for_burn",
        from = from,
        denom = denom,
        amount = %amount,
        destination_domain = destination_domain.as_u32(),
        nonce = tracing::field::Empty,
        error.type = tracing::field::Empty,
        error.message = tracing::field::Empty,
        error.source = tracing::field::Empty,
        error.context = tracing::field::Empty,
        otel.status_code = "OK",
    )
}

/// Create span for originating a message.
///
/// Parent: Host transaction span
/// Children: None
#[inline]
pub fn send_message(from: &str, destination_domain: DomainId, body_len: usize) -> Span {
    tracing::info_span!(
        "cctp.send_message",
        from = from,
        destination_domain = destination_domain.as_u32(),
        body_len_bytes = body_len,
        nonce = tracing::field::Empty,
        error.type = tracing::field::Empty,
        error.message = tracing::field::Empty,
        error.source = tracing::field::Empty,
        error.context = tracing::field::Empty,
        otel.status_code = "OK",
    )
}

/// Create span for processing an inbound message.
///
/// Parent: Host transaction span
/// Children: cctp.verify_attestation
#[inline]
pub fn receive_message(from: &str, message_len: usize, attestation_len: usize) -> Span {
    tracing::info_span!(
        "cctp.receive_message",
        from = from,
        message_len_bytes = message_len,
        attestation_length_bytes = attestation_len,
        source_domain = tracing::field::Empty,
        nonce = tracing::field::Empty,
        success = tracing::field::Empty,
        error.type = tracing::field::Empty,
        error.message = tracing::field::Empty,
        error.source = tracing::field::Empty,
        error.context = tracing::field::Empty,
        otel.status_code = "OK",
    )
}

/// Create span for replacing a previously sent message.
///
/// Parent: Host transaction span
/// Children: cctp.verify_attestation
#[inline]
pub fn replace_message(from: &str, original_len: usize, new_body_len: usize) -> Span {
    tracing::info_span!(
        "cctp.replace_message",
        from = from,
        original_len_bytes = original_len,
        new_body_len_bytes = new_body_len,
        nonce = tracing::field::Empty,
        error.type = tracing::field::Empty,
        error.message = tracing::field::Empty,
        error.source = tracing::field::Empty,
        error.context = tracing::field::Empty,
        otel.status_code = "OK",
    )
}

/// Create span for an administrative operation.
///
/// Parent: Host transaction span
/// Children: None
#[inline]
pub fn admin(operation: &'static str, from: &str) -> Span {
    tracing::info_span!(
        "cctp.admin",
        operation = operation,
        from = from,
        error.type = tracing::field::Empty,
        error.message = tracing::field::Empty,
        error.source = tracing::field::Empty,
        error.context = tracing::field::Empty,
        otel.status_code = "OK",
    )
}

/// Create span for attestation verification.
///
/// Parent: cctp.receive_message or cctp.replace_message
/// Children: None
#[inline]
pub fn verify_attestation(message_hash: &B256, attestation_len: usize, threshold: u32) -> Span {
    tracing::debug_span!(
        "cctp.verify_attestation",
        message_hash = %hex::encode(message_hash),
        attestation_length_bytes = attestation_len,
        threshold = threshold,
        error.type = tracing::field::Empty,
        error.message = tracing::field::Empty,
        error.source = tracing::field::Empty,
        otel.status_code = "OK",
    )
}

/// Record error attributes on the current span.
///
/// Follows OpenTelemetry semantic conventions for error tracking:
/// - error.type: The error type/variant
/// - error.message: Human-readable error message
/// - error.source: The underlying cause, when there is one
///
/// # Example
///
/// ```rust
/// use cctp_core::{spans, CctpError};
///
/// # fn example() -> Result<(), CctpError> {
/// let span = tracing::info_span!("cctp.operation");
/// let _guard = span.enter();
///
/// let result = some_operation();
/// if let Err(ref e) = result {
///     spans::record_error(e);
/// }
/// result
/// # }
/// # fn some_operation() -> Result<(), CctpError> { Ok(()) }
/// ```
pub fn record_error<E: std::error::Error>(error: &E) {
    let current_span = tracing::Span::current();
    let message = error.to_string();
    current_span.record("error.type", message.split(':').next().unwrap_or("Unknown"));
    current_span.record("error.message", message.as_str());
    current_span.record("otel.status_code", "ERROR");

    if let Some(source) = error.source() {
        current_span.record("error.source", source.to_string());
    }
}

/// Record error attributes with custom context on the current span.
///
/// Used where the failure is an expected outcome rather than a returned
/// error, such as a mint that could not complete.
pub fn record_error_with_context(
    error_type: &str,
    error_message: &str,
    additional_context: Option<&str>,
) {
    let current_span = tracing::Span::current();
    current_span.record("error.type", error_type);
    current_span.record("error.message", error_message);
    current_span.record("otel.status_code", "ERROR");

    if let Some(context) = additional_context {
        current_span.record("error.context", context);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RECORDED_FIELDS: [&str; 6] = [
        "error.type",
        "error.message",
        "error.source",
        "error.context",
        "otel.status_code",
        "nonce",
    ];

    #[test]
    fn test_operation_spans_declare_recorded_fields() {
        tracing::subscriber::with_default(tracing_subscriber::registry(), || {
            let spans = [
                deposit_for_burn("from", "uusdc", &U256::from(1), DomainId::ETHEREUM),
                send_message("from", DomainId::ETHEREUM, 5),
                receive_message("from", 121, 65),
                replace_message("from", 121, 5),
            ];
            for span in &spans {
                for name in RECORDED_FIELDS {
                    assert!(span.field(name).is_some(), "{span:?} lacks {name}");
                }
            }

            let span = admin("update_owner", "owner");
            for name in &RECORDED_FIELDS[..5] {
                assert!(span.field(*name).is_some(), "admin span lacks {name}");
            }
        });
    }
}
