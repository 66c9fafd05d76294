use suppaftp::{FtpError, FtpStream};

use super::{RemoteSession, SessionError};

/// FTP-backed [`RemoteSession`]. One instance serves one refresh cycle;
/// the connection is opened and logged in eagerly.
pub struct FtpSession {
    stream: FtpStream,
}

impl FtpSession {
    /// Connects to `addr` (`host:port`) and logs in.
    pub fn connect(addr: &str, user: &str, password: &str) -> Result<Self, SessionError> {
        let mut stream = FtpStream::connect(addr).map_err(classify)?;
        stream.login(user, password).map_err(classify)?;
        Ok(Self { stream })
    }
}

impl RemoteSession for FtpSession {
    fn change_dir(&mut self, path: &str) -> Result<(), SessionError> {
        self.stream.cwd(path).map_err(classify)
    }

    fn list_detailed(&mut self) -> Result<Vec<String>, SessionError> {
        self.stream.list(None).map_err(classify)
    }

    fn list_names(&mut self) -> Result<Vec<String>, SessionError> {
        self.stream.nlst(None).map_err(classify)
    }

    fn quit(&mut self) -> Result<(), SessionError> {
        self.stream.quit().map_err(classify)
    }
}

fn classify(err: FtpError) -> SessionError {
    classify_message(err.to_string())
}

/// Sorts an FTP-level failure into the session taxonomy: permanent
/// negative replies (5xx) become [`SessionError::Denied`], everything
/// else, transport errors included, is a protocol failure.
fn classify_message(message: String) -> SessionError {
    match reply_code(&message) {
        Some(code @ 500..=599) => SessionError::Denied { code, message },
        _ => SessionError::Protocol(message),
    }
}

/// First three-digit run in the error text. FTP reply codes are three
/// digits and lead the server's response line.
fn reply_code(message: &str) -> Option<u32> {
    message
        .split(|c: char| !c.is_ascii_digit())
        .find(|run| run.len() == 3)
        .and_then(|run| run.parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn permanent_replies_are_denials() {
        let err = classify_message("Invalid response: [550] Failed to change directory.".to_string());
        assert!(matches!(err, SessionError::Denied { code: 550, .. }));

        let err = classify_message("505 LIST not allowed here".to_string());
        assert!(err.is_cannot_list());
    }

    #[test]
    fn transport_failures_are_protocol_errors() {
        let err = classify_message("Connection error: connection timed out".to_string());
        assert!(matches!(err, SessionError::Protocol(_)));
    }

    #[test]
    fn transient_replies_are_not_denials() {
        let err = classify_message("421 Service not available".to_string());
        assert!(matches!(err, SessionError::Protocol(_)));
    }

    #[test]
    fn reply_code_ignores_shorter_digit_runs() {
        assert_eq!(reply_code("os error 13 while reading 550 reply"), Some(550));
        assert_eq!(reply_code("no digits at all"), None);
        assert_eq!(reply_code("retry in 30s"), None);
    }
}
