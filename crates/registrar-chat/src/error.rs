//! Error types for the conversational interface.

use registrar_core::error::RegistrarError;

/// Errors from the chat engine.
#[derive(Debug, thiserror::Error)]
pub enum ChatError {
    #[error("message cannot be empty")]
    EmptyMessage,
    #[error("a reply is still pending")]
    Busy,
    #[error("resolver fault: {0}")]
    ResolverFault(String),
    #[error("conversation state unavailable: {0}")]
    StateLock(String),
    #[error("config error: {0}")]
    Config(String),
}

impl From<RegistrarError> for ChatError {
    fn from(err: RegistrarError) -> Self {
        ChatError::Config(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chat_error_display() {
        assert_eq!(ChatError::EmptyMessage.to_string(), "message cannot be empty");
        assert_eq!(ChatError::Busy.to_string(), "a reply is still pending");

        let err = ChatError::ResolverFault("backend gone".to_string());
        assert_eq!(err.to_string(), "resolver fault: backend gone");

        let err = ChatError::StateLock("poisoned".to_string());
        assert_eq!(err.to_string(), "conversation state unavailable: poisoned");

        let err = ChatError::Config("bad".to_string());
        assert_eq!(err.to_string(), "config error: bad");
    }

    #[test]
    fn test_chat_error_from_registrar_error() {
        let core_err = RegistrarError::Config("min exceeds max".to_string());
        let chat_err: ChatError = core_err.into();
        assert!(matches!(chat_err, ChatError::Config(_)));
        assert!(chat_err.to_string().contains("min exceeds max"));
    }

    #[test]
    fn test_errors_implement_debug() {
        assert!(format!("{:?}", ChatError::Busy).contains("Busy"));
        assert!(format!("{:?}", ChatError::EmptyMessage).contains("EmptyMessage"));
    }
}
