//! Delimited reply parsing.
//!
//! List-style remote procedures return their results as lines of
//! delimiter-separated positional fields (`^` for most catalog procedures,
//! `;` for some lookup lists). By convention field 0 carries the record
//! identifier; a reply whose first populated line has an *empty* field 0 is
//! the backend signalling an error out of band, with the error text occupying
//! the remainder of that line.
//!
//! Parsing is deliberately forgiving about shape: lines without the delimiter
//! become single-field rows and blank lines are skipped. Only the explicit
//! server-signalled error line short-circuits parsing.

/// Errors detected while parsing a reply payload.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ReplyError {
    /// The backend signalled an error in the leading status line.
    #[error("server signalled an error: {message}")]
    ServerSignaled {
        /// The error text the backend placed after the leading delimiter.
        message: String,
    },
}

/// Splits a raw reply payload into rows of positional fields.
///
/// Lines are separated by `\n` or `\r\n`; fields within a line by
/// `field_delimiter`. Empty lines are skipped. If the first populated line
/// begins with the delimiter (empty field 0), the remainder of that line is a
/// server-signalled error message and parsing short-circuits.
pub fn parse_reply(payload: &str, field_delimiter: char) -> Result<Vec<Vec<String>>, ReplyError> {
    let mut rows = Vec::new();

    for line in payload.lines() {
        if line.is_empty() {
            continue;
        }

        if rows.is_empty() {
            if let Some(rest) = line.strip_prefix(field_delimiter) {
                return Err(ReplyError::ServerSignaled {
                    message: rest.to_owned(),
                });
            }
        }

        rows.push(line.split(field_delimiter).map(str::to_owned).collect());
    }

    Ok(rows)
}
