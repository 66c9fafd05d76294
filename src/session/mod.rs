//! The remote session capability consumed by the traversal code.

pub mod ftp;

pub use ftp::FtpSession;

use thiserror::Error;

/// Reply code the mail appliance sends for paths that exist but cannot
/// be listed. The traversal counts such subtrees as empty.
pub const REPLY_CANNOT_LIST: u32 = 505;

#[derive(Debug, Error)]
pub enum SessionError {
    /// Permanent negative completion from the server (5xx reply).
    #[error("denied by server ({code}): {message}")]
    Denied { code: u32, message: String },
    /// Transport failures, malformed replies, timeouts.
    #[error("session failure: {0}")]
    Protocol(String),
}

impl SessionError {
    /// The one denial the traversal tolerates.
    pub fn is_cannot_list(&self) -> bool {
        matches!(self, SessionError::Denied { code: REPLY_CANNOT_LIST, .. })
    }

    pub fn is_denied(&self) -> bool {
        matches!(self, SessionError::Denied { .. })
    }
}

/// Navigation and listing operations of an authenticated connection to
/// the remote file server. Implemented by [`FtpSession`]; tests drive
/// the traversal with scripted in-memory fakes instead.
pub trait RemoteSession {
    /// Changes the working directory. Relative names and `..` are
    /// resolved by the server.
    fn change_dir(&mut self, path: &str) -> Result<(), SessionError>;

    /// Detailed listing of the current directory, one raw line per
    /// entry.
    fn list_detailed(&mut self) -> Result<Vec<String>, SessionError>;

    /// Name-only listing of the current directory.
    fn list_names(&mut self) -> Result<Vec<String>, SessionError>;

    /// Graceful goodbye. The connection is unusable afterwards.
    fn quit(&mut self) -> Result<(), SessionError>;
}
