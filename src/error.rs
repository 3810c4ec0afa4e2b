// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CctpError {
    // Format errors
    #[error("Invalid message version: expected {expected}, got {actual}")]
    InvalidMessageVersion { expected: u32, actual: u32 },

    #[error("Invalid message body version: expected {expected}, got {actual}")]
    InvalidMessageBodyVersion { expected: u32, actual: u32 },

    #[error("Invalid message length: {actual} bytes, need at least {minimum}")]
    InvalidMessageLength { minimum: usize, actual: usize },

    #[error("Invalid message body: {0}")]
    InvalidMessageBody(String),

    #[error("Invalid address length: {field} must be {expected} bytes, got {actual}")]
    InvalidAddressLength {
        field: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    #[error("Invalid mint recipient")]
    InvalidMintRecipient,

    #[error("Invalid recipient")]
    InvalidRecipient,

    #[error("Invalid destination caller")]
    InvalidDestinationCaller,

    #[error("Invalid burn token: {0}")]
    InvalidBurnToken(String),

    #[error("Invalid destination domain: expected {expected}, got {actual}")]
    InvalidDestinationDomain { expected: u32, actual: u32 },

    #[error("Invalid source domain: expected {expected}, got {actual}")]
    InvalidSourceDomain { expected: u32, actual: u32 },

    #[error("Invalid signature length: expected {expected} bytes, got {actual}")]
    InvalidSignatureLength { expected: usize, actual: usize },

    #[error("Invalid signature: {0}")]
    InvalidSignature(String),

    #[error("Signature recovery failed: {0}")]
    InvalidSignatureRecovery(String),

    #[error("Invalid signature threshold: {0}")]
    InvalidSignatureThreshold(String),

    // Authorization errors
    #[error("Owner not set")]
    OwnerNotSet,

    #[error("Not owner")]
    NotOwner,

    #[error("Pending owner not set")]
    PendingOwnerNotSet,

    #[error("Not pending owner")]
    NotPendingOwner,

    #[error("Attester manager not set")]
    AttesterManagerNotSet,

    #[error("Not attester manager")]
    NotAttesterManager,

    #[error("Token controller not set")]
    TokenControllerNotSet,

    #[error("Not token controller")]
    NotTokenController,

    #[error("Pauser not set")]
    PauserNotSet,

    #[error("Not pauser")]
    NotPauser,

    #[error("Not destination caller")]
    NotDestinationCaller,

    #[error("Not original sender")]
    NotOriginalSender,

    // State errors
    #[error("Nonce already used: source domain {source_domain}, nonce {nonce}")]
    NonceAlreadyUsed { source_domain: u32, nonce: u64 },

    #[error("Token pair not found")]
    TokenPairNotFound,

    #[error("Token pair already found")]
    TokenPairAlreadyFound,

    #[error("Attester not found: {0}")]
    AttesterNotFound(String),

    #[error("Attester already found: {0}")]
    AttesterAlreadyFound(String),

    #[error("Cannot remove last attester: {enabled} enabled, threshold {threshold}")]
    CannotRemoveLastAttester { enabled: usize, threshold: u32 },

    #[error("Remote token messenger not found for domain {0}")]
    RemoteTokenMessengerNotFound(u32),

    #[error("Remote token messenger already found for domain {0}")]
    RemoteTokenMessengerAlreadyFound(u32),

    // Attestation errors
    #[error("Attester not enabled: {0}")]
    AttesterNotEnabled(String),

    #[error("Signatures out of order")]
    SignaturesOutOfOrder,

    #[error("Duplicate signatures from {0}")]
    DuplicateSignatures(String),

    #[error("Insufficient signatures: need {required}, got {actual}")]
    InsufficientSignatures { required: u32, actual: usize },

    // Operational errors
    #[error("Burning and minting paused")]
    BurningAndMintingPaused,

    #[error("Sending and receiving messages paused")]
    SendingAndReceivingPaused,

    #[error("Exceeds burn limit: limit {limit}, amount {amount}")]
    ExceedsBurnLimit { limit: String, amount: String },

    #[error("Exceeds max message body size: max {max}, got {actual}")]
    ExceedsMaxMessageBodySize { max: u64, actual: u64 },

    #[error("Burning failed: {reason}")]
    BurningFailed { reason: String },

    // Collaborator errors
    #[error("Ledger error: {0}")]
    Ledger(String),

    #[error("Store error: {0}")]
    Store(String),

    #[error("Invalid genesis: {0}")]
    InvalidGenesis(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, CctpError>;
