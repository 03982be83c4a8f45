use crate::error::Error;
use crate::video::VideoRecord;
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    Name,
    Size,
    Date,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Ascending,
    Descending,
}

/// Parsed form of keys such as `nameu`, `sized` or `date`.
///
/// The first four characters pick the field, the fifth picks the direction:
/// `u` is ascending, anything else (including nothing) is descending.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortKey {
    pub field: SortField,
    pub direction: Direction,
}

impl SortKey {
    pub fn new(field: SortField, direction: Direction) -> SortKey {
        SortKey { field, direction }
    }

    pub fn compare(&self, a: &VideoRecord, b: &VideoRecord) -> Ordering {
        let ord = match self.field {
            SortField::Name => a.name.cmp(&b.name),
            SortField::Size => a.size.cmp(&b.size),
            SortField::Date => a.modified_at.cmp(&b.modified_at),
        };
        match self.direction {
            Direction::Ascending => ord,
            Direction::Descending => ord.reverse(),
        }
    }

    /// Two-argument ordering function for this key.
    pub fn comparator(self) -> impl Fn(&VideoRecord, &VideoRecord) -> Ordering {
        move |a, b| self.compare(a, b)
    }
}

impl Default for SortKey {
    fn default() -> Self {
        SortKey::new(SortField::Name, Direction::Ascending)
    }
}

impl FromStr for SortKey {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let field = match s.get(..4) {
            Some("name") => SortField::Name,
            Some("size") => SortField::Size,
            Some("date") => SortField::Date,
            _ => return Err(Error::SortKey(s.to_string())),
        };
        let direction = match s[4..].chars().next() {
            Some('u') => Direction::Ascending,
            _ => Direction::Descending,
        };
        Ok(SortKey { field, direction })
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let field = match self.field {
            SortField::Name => "name",
            SortField::Size => "size",
            SortField::Date => "date",
        };
        let direction = match self.direction {
            Direction::Ascending => 'u',
            Direction::Descending => 'd',
        };
        write!(f, "{}{}", field, direction)
    }
}
