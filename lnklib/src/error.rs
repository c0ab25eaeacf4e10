use std::fmt;

#[derive(Debug, PartialEq, Eq)]
pub enum LnkError {
    Parse,
    BadHeader,
    NotLnkData,
    ReadFile,
    MissingTarget,
    PropertyStore,
}

impl std::error::Error for LnkError {}

impl fmt::Display for LnkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LnkError::Parse => write!(f, "Failed to parse shortcut data"),
            LnkError::BadHeader => write!(f, "Bad LNK header"),
            LnkError::NotLnkData => write!(f, "Not shortcut data"),
            LnkError::ReadFile => write!(f, "Could not read lnk file"),
            LnkError::MissingTarget => {
                write!(f, "Neither a target path nor an item ID list was provided")
            }
            LnkError::PropertyStore => write!(f, "Failed to parse property store data"),
        }
    }
}
