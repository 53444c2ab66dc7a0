use thiserror::Error;

use crate::data::model::ColumnType;

/// Raised when a selection names a column the filtered view cannot use.
///
/// This is a configuration defect, not a transient condition: the same
/// criteria always fail the same way, so callers never retry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigurationError {
    #[error("column '{0}' does not exist in the dataset")]
    UnknownColumn(String),

    #[error("column '{column}' is {found}, expected a numeric column")]
    NotNumeric { column: String, found: ColumnType },
}
