use super::IngestError;

/// Canonical record fields an upload can supply.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Field {
    Title,
    Author,
    Category,
    Demand,
    Action,
}

impl Field {
    pub const ALL: [Field; 5] = [Field::Title, Field::Author, Field::Category, Field::Demand, Field::Action];

    pub fn name(&self) -> &'static str {
        match self {
            Field::Title => "title",
            Field::Author => "author",
            Field::Category => "category",
            Field::Demand => "demand",
            Field::Action => "action",
        }
    }

    /// Accepted header spellings, in order of preference (already lowercase).
    pub fn aliases(&self) -> &'static [&'static str] {
        match self {
            Field::Title => &["title", "book title", "name"],
            Field::Author => &["author", "author name", "writer"],
            Field::Category => &["category", "genre", "subject"],
            Field::Demand => &["demand"],
            Field::Action => &["action"],
        }
    }

    pub fn is_required(&self) -> bool {
        matches!(self, Field::Title | Field::Author | Field::Category)
    }
}

/// Header index for each canonical field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnMap {
    pub title: usize,
    pub author: usize,
    pub category: usize,
    pub demand: Option<usize>,
    pub action: Option<usize>,
}

/// Map raw headers onto canonical fields.
///
/// Matching is case-insensitive and ignores surrounding whitespace. When
/// several aliases are present the earliest alias in `Field::aliases` wins.
pub fn normalize_columns<S: AsRef<str>>(headers: &[S]) -> Result<ColumnMap, IngestError> {
    let lowered: Vec<String> = headers.iter().map(|h| h.as_ref().trim().to_lowercase()).collect();

    let find = |field: Field| -> Option<usize> {
        field
            .aliases()
            .iter()
            .find_map(|alias| lowered.iter().position(|h| h == alias))
    };

    let required = |field: Field| -> Result<usize, IngestError> {
        find(field).ok_or_else(|| IngestError::MissingColumn {
            column: field.name(),
            aliases: field.aliases().join(", "),
        })
    };

    Ok(ColumnMap {
        title: required(Field::Title)?,
        author: required(Field::Author)?,
        category: required(Field::Category)?,
        demand: find(Field::Demand),
        action: find(Field::Action),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_headers_map_directly() {
        let map = normalize_columns(&["title", "author", "category", "demand"]).unwrap();
        assert_eq!(
            map,
            ColumnMap {
                title: 0,
                author: 1,
                category: 2,
                demand: Some(3),
                action: None
            }
        );
    }

    #[test]
    fn aliases_match_case_and_whitespace_insensitively() {
        let map = normalize_columns(&[" Genre ", "Book Title", "WRITER", "Action"]).unwrap();
        assert_eq!(map.title, 1);
        assert_eq!(map.author, 2);
        assert_eq!(map.category, 0);
        assert_eq!(map.demand, None);
        assert_eq!(map.action, Some(3));
    }

    #[test]
    fn earlier_alias_wins_over_later_one() {
        let map = normalize_columns(&["name", "title", "author", "subject"]).unwrap();
        assert_eq!(map.title, 1);
    }

    #[test]
    fn missing_required_column_names_it_and_its_aliases() {
        let err = normalize_columns(&["title", "writer", "shelf"]).unwrap_err();
        match err {
            IngestError::MissingColumn { column, aliases } => {
                assert_eq!(column, "category");
                assert_eq!(aliases, "category, genre, subject");
            }
            other => panic!("expected MissingColumn, got {other:?}"),
        }
    }

    #[test]
    fn required_fields_are_title_author_category() {
        let required: Vec<&str> = Field::ALL.iter().filter(|f| f.is_required()).map(|f| f.name()).collect();
        assert_eq!(required, vec!["title", "author", "category"]);
    }
}
