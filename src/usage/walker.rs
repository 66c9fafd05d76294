use log::debug;

use crate::listing;
use crate::session::RemoteSession;

use super::WalkError;

/// Upper bound on recursion depth. The remote hierarchy is not under
/// our control; a deeper tree is treated as malformed instead of
/// walking it towards stack exhaustion.
pub const MAX_DEPTH: usize = 64;

/// Total size in bytes of the subtree rooted at `path`.
///
/// Directories the server refuses to list with reply code 505 count as
/// empty. Any other failure aborts the walk and yields no partial sum.
pub fn total_size<S: RemoteSession>(session: &mut S, path: &str) -> Result<u64, WalkError> {
    walk(session, path, 0)
}

fn walk<S: RemoteSession>(session: &mut S, path: &str, depth: usize) -> Result<u64, WalkError> {
    if depth >= MAX_DEPTH {
        return Err(WalkError::TooDeep {
            path: path.to_string(),
            limit: MAX_DEPTH,
        });
    }

    let lines = match session.change_dir(path).and_then(|()| session.list_detailed()) {
        Ok(lines) => lines,
        Err(err) if err.is_cannot_list() => {
            debug!("treating unlistable path {path} as empty");
            return Ok(0);
        }
        Err(err) => return Err(err.into()),
    };

    let mut total = 0;
    for line in &lines {
        let Some(entry) = listing::parse(line) else {
            continue;
        };
        if entry.is_directory {
            if entry.name != "." && entry.name != ".." {
                total += walk(session, &format!("{path}/{}", entry.name), depth + 1)?;
            }
        } else {
            total += entry.size_bytes.unwrap_or(0);
        }
    }
    Ok(total)
}
