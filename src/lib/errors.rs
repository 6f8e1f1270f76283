//! Custom error types for storymill operations.

use thiserror::Error;

/// Result type alias for storymill operations
pub type Result<T> = std::result::Result<T, StorymillError>;

/// Error type for storymill operations
#[derive(Error, Debug)]
pub enum StorymillError {
    /// A channel peer hung up before the protocol completed
    #[error("Peer '{peer}' disconnected mid-protocol")]
    Disconnected {
        /// Name of the remote role
        peer: String,
    },

    /// A transport-level I/O failure on a TCP link
    #[error("Transport failure on link to '{peer}': {source}")]
    Transport {
        /// Name of the remote role
        peer: String,
        /// The underlying I/O error
        source: std::io::Error,
    },

    /// A message violated the wire protocol
    #[error("Protocol violation from '{peer}': {reason}")]
    ProtocolViolation {
        /// Name of the remote role
        peer: String,
        /// Explanation of the violation
        reason: String,
    },

    /// Invalid process-group rank
    #[error("Invalid rank {rank} (process group has exactly {expected} members)")]
    InvalidRank {
        /// The offending rank
        rank: usize,
        /// Required process-group size
        expected: usize,
    },

    /// Process group formed with the wrong membership
    #[error("Invalid process group: {reason}")]
    InvalidProcessGroup {
        /// Explanation of the mismatch
        reason: String,
    },

    /// A required input file is missing or unreadable
    #[error("Invalid {description} '{path}': {reason}")]
    InvalidInputFile {
        /// Human-readable description of the file
        description: String,
        /// Path to the file
        path: String,
        /// Explanation of the problem
        reason: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disconnected_message() {
        let error = StorymillError::Disconnected { peer: "horror".to_string() };
        let msg = format!("{error}");
        assert!(msg.contains("'horror'"));
        assert!(msg.contains("disconnected"));
    }

    #[test]
    fn test_invalid_rank_message() {
        let error = StorymillError::InvalidRank { rank: 7, expected: 5 };
        let msg = format!("{error}");
        assert!(msg.contains("rank 7"));
        assert!(msg.contains("exactly 5"));
    }

    #[test]
    fn test_protocol_violation_message() {
        let error = StorymillError::ProtocolViolation {
            peer: "coordinator".to_string(),
            reason: "negative body length".to_string(),
        };
        let msg = format!("{error}");
        assert!(msg.contains("coordinator"));
        assert!(msg.contains("negative body length"));
    }
}
