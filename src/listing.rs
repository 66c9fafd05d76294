//! Parsing of detailed directory listing (`LIST`) output.

/// One parsed listing line.
///
/// Lines follow the conventional `ls -l` layout: type and permission
/// flags, link count, owner, group, size, three date fields, then the
/// file name, which may itself contain spaces.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingEntry<'a> {
    pub is_directory: bool,
    /// `None` when the size field is not a plain integer; such entries
    /// contribute nothing to size accumulation.
    pub size_bytes: Option<u64>,
    pub name: &'a str,
}

/// Parses one raw listing line. Lines that do not carry the nine
/// expected fields yield `None`; callers skip those silently.
pub fn parse(raw: &str) -> Option<ListingEntry<'_>> {
    let raw = raw.trim_end_matches(['\r', '\n']);
    let (fields, name) = split_fields(raw)?;

    Some(ListingEntry {
        is_directory: raw.starts_with('d'),
        size_bytes: fields[4].parse().ok(),
        name,
    })
}

/// Splits a line into eight whitespace-delimited fields plus the name
/// remainder. Runs of whitespace count as a single separator.
fn split_fields(line: &str) -> Option<([&str; 8], &str)> {
    let mut fields = [""; 8];
    let mut rest = line;

    for field in &mut fields {
        rest = rest.trim_start();
        let end = rest.find(char::is_whitespace)?;
        *field = &rest[..end];
        rest = &rest[end..];
    }

    let name = rest.trim_start();
    if name.is_empty() {
        return None;
    }
    Some((fields, name))
}
