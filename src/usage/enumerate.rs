use crate::session::RemoteSession;

use super::WalkError;

/// Names of the immediate subdirectories of `path`.
///
/// The server's name listing does not distinguish files from
/// directories, so every entry is probed with a directory change.
/// Entries the server denies are files or otherwise off limits and are
/// skipped; any other probe failure aborts the enumeration.
pub fn list_subdirectories<S: RemoteSession>(
    session: &mut S,
    path: &str,
) -> Result<Vec<String>, WalkError> {
    session.change_dir(path)?;
    let names = session.list_names()?;

    let mut directories = Vec::new();
    for name in names {
        match session.change_dir(&name) {
            Ok(()) => {
                directories.push(name);
                session.change_dir("..")?;
            }
            Err(err) if err.is_denied() => {}
            Err(err) => return Err(err.into()),
        }
    }
    Ok(directories)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::SessionError;
    use crate::usage::testing::FakeSession;

    #[test]
    fn keeps_directories_and_drops_files() {
        let mut session = FakeSession::new()
            .names("/srv/vmail", &["alice", "README", "bob"])
            .dir("/srv/vmail/alice", &[])
            .dir("/srv/vmail/bob", &[]);
        let dirs = list_subdirectories(&mut session, "/srv/vmail").unwrap();
        assert_eq!(dirs, vec!["alice".to_string(), "bob".to_string()]);
    }

    #[test]
    fn empty_root_yields_no_tenants() {
        let mut session = FakeSession::new().names("/srv/vmail", &[]);
        let dirs = list_subdirectories(&mut session, "/srv/vmail").unwrap();
        assert!(dirs.is_empty());
    }

    #[test]
    fn unreachable_root_propagates() {
        let mut session = FakeSession::new().denied("/srv/vmail", 550);
        let err = list_subdirectories(&mut session, "/srv/vmail").unwrap_err();
        assert!(matches!(err, WalkError::Session(SessionError::Denied { .. })));
    }

    #[test]
    fn hard_probe_failures_propagate() {
        let mut session = FakeSession::new()
            .names("/srv/vmail", &["alice", "evil"])
            .dir("/srv/vmail/alice", &[])
            .broken("/srv/vmail/evil");
        let err = list_subdirectories(&mut session, "/srv/vmail").unwrap_err();
        assert!(matches!(err, WalkError::Session(SessionError::Protocol(_))));
    }
}
