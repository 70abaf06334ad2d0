//! Row → paragraph formatting.

use appctx_core::{ContextError, Result, Row};

/// Turns one row into a human-readable paragraph.
pub trait RowFormatter: Send + Sync {
    /// Fails with [`ContextError::MissingField`] when the row cannot be rendered.
    fn format(&self, row: &Row) -> Result<String>;
}

/// Fixed eight-line template over the nine required app columns.
///
/// Values are interpolated verbatim: no escaping, no truncation.
#[derive(Debug, Clone, Copy, Default)]
pub struct AppRowFormatter;

impl AppRowFormatter {
    pub fn new() -> Self {
        Self
    }
}

fn field(row: &Row, column: &str) -> Result<String> {
    row.text(column)
        .ok_or_else(|| ContextError::missing_field(column))
}

impl RowFormatter for AppRowFormatter {
    fn format(&self, row: &Row) -> Result<String> {
        // Resolved in REQUIRED_FIELDS order so the first missing column is reported.
        let name = field(row, "name")?;
        let size = field(row, "size")?;
        let price = field(row, "price")?;
        let currency = field(row, "currency")?;
        let rating_count = field(row, "rating_count_tot")?;
        let user_rating = field(row, "user_rating")?;
        let version = field(row, "ver")?;
        let genre = field(row, "prime_genre")?;
        let description = field(row, "app_desc")?;

        Ok(format!(
            "App Name: {name}\n\
             Size: {size} MB\n\
             Price: {price} {currency}\n\
             Rating Count: {rating_count}\n\
             User Rating: {user_rating}\n\
             Version: {version}\n\
             Genre: {genre}\n\
             Description: {description}"
        ))
    }
}
