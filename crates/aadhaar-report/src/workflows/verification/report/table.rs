use super::ExportError;
use std::borrow::Cow;

pub(crate) const MISSING_TEXT: &str = "N/A";

/// A typed CSV cell. Rendering is the only place values become text.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Cell {
    Text(String),
    Number(f64),
    Flag(bool),
    Missing,
}

impl Cell {
    pub(crate) fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }

    pub(crate) fn optional(value: Option<&str>) -> Self {
        value.map_or(Self::Missing, |text| Self::Text(text.to_string()))
    }

    fn render(&self) -> Cow<'_, str> {
        match self {
            Self::Text(value) => Cow::Borrowed(value.as_str()),
            Self::Number(value) => Cow::Owned(value.to_string()),
            Self::Flag(true) => Cow::Borrowed("Yes"),
            Self::Flag(false) => Cow::Borrowed("No"),
            Self::Missing => Cow::Borrowed(MISSING_TEXT),
        }
    }
}

/// Header plus rows of equal width.
#[derive(Debug)]
pub(crate) struct CsvTable {
    header: &'static [&'static str],
    rows: Vec<Vec<Cell>>,
}

impl CsvTable {
    pub(crate) fn new(header: &'static [&'static str]) -> Self {
        Self {
            header,
            rows: Vec::new(),
        }
    }

    pub(crate) fn push(&mut self, row: Vec<Cell>) {
        debug_assert_eq!(row.len(), self.header.len());
        self.rows.push(row);
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.rows.len()
    }

    /// Quotes every field and doubles embedded quotes; nothing else is escaped.
    /// Records are joined by `\n` with no trailing terminator.
    pub(crate) fn render(&self) -> Result<String, ExportError> {
        let mut writer = csv::WriterBuilder::new()
            .quote_style(csv::QuoteStyle::Always)
            .double_quote(true)
            .terminator(csv::Terminator::Any(b'\n'))
            .from_writer(Vec::new());

        writer.write_record(self.header)?;
        for row in &self.rows {
            writer.write_record(row.iter().map(|cell| cell.render().into_owned()))?;
        }

        let bytes = writer
            .into_inner()
            .map_err(|err| ExportError::Io(err.into_error()))?;
        let mut text = String::from_utf8(bytes)?;
        if text.ends_with('\n') {
            text.pop();
        }
        Ok(text)
    }
}
