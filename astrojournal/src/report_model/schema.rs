//! Column schemas for the three report profiles
//!
//! A schema names the metadata keys a report header may carry and the
//! ordered columns of its item table. Both field sets are closed
//! enumerations; each profile picks a subset.

/// Metadata keys of a report header, in display order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum MetaField {
    /// Observation date, `dd/mm/yyyy[x]`
    Date,
    /// Time or time span of the session
    Time,
    /// Observing site
    Location,
    /// Site altitude
    Altitude,
    /// Air temperature
    Temperature,
    /// Seeing estimate
    Seeing,
    /// Transparency estimate
    Transparency,
    /// Sky darkness reading (optional even in the extended profile)
    Darkness,
    /// Instruments used
    Telescopes,
    /// Eyepieces used
    Eyepieces,
    /// Filters used
    Filters,
}

/// Which column of the two-column metadata table a field is rendered in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayoutColumn {
    /// When and where
    Left,
    /// Conditions and equipment
    Right,
}

impl MetaField {
    /// Every metadata field in declaration order
    pub const ALL: [MetaField; 11] = [
        MetaField::Date,
        MetaField::Time,
        MetaField::Location,
        MetaField::Altitude,
        MetaField::Temperature,
        MetaField::Seeing,
        MetaField::Transparency,
        MetaField::Darkness,
        MetaField::Telescopes,
        MetaField::Eyepieces,
        MetaField::Filters,
    ];

    /// Key as written in raw report files
    pub fn col_name(self) -> &'static str {
        match self {
            MetaField::Date => "Date",
            MetaField::Time => "Time",
            MetaField::Location => "Location",
            MetaField::Altitude => "Altitude",
            MetaField::Temperature => "Temperature",
            MetaField::Seeing => "Seeing",
            MetaField::Transparency => "Transparency",
            MetaField::Darkness => "Darkness",
            MetaField::Telescopes => "Telescopes",
            MetaField::Eyepieces => "Eyepieces",
            MetaField::Filters => "Filters",
        }
    }

    /// Case-insensitive lookup by key
    pub fn from_col_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|field| field.col_name().eq_ignore_ascii_case(name))
    }

    /// Fields that are left out of rendered output when empty
    pub fn is_optional(self) -> bool {
        matches!(self, MetaField::Darkness)
    }

    /// Column of the metadata table this field is rendered in
    pub fn layout_column(self) -> LayoutColumn {
        match self {
            MetaField::Date | MetaField::Time | MetaField::Location | MetaField::Altitude => {
                LayoutColumn::Left
            }
            _ => LayoutColumn::Right,
        }
    }
}

/// Columns of a report's item table
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ItemField {
    /// Observed object
    Target,
    /// Constellation abbreviation
    Constellation,
    /// Object type (galaxy, planet, dbl star, ...)
    Type,
    /// Magnification used
    Power,
    /// Free-form notes
    Notes,
}

impl ItemField {
    /// Column header as written in raw report files
    pub fn col_name(self) -> &'static str {
        match self {
            ItemField::Target => "Target",
            ItemField::Constellation => "Cons",
            ItemField::Type => "Type",
            ItemField::Power => "Power",
            ItemField::Notes => "Notes",
        }
    }
}

/// Field sets accepted by one report profile
#[derive(Debug, PartialEq, Eq)]
pub struct Schema {
    name: &'static str,
    metadata: &'static [MetaField],
    items: &'static [ItemField],
}

impl Schema {
    /// Date header and a three-column item table
    pub const MINIMAL: Schema = Schema {
        name: "minimal",
        metadata: &[MetaField::Date],
        items: &[ItemField::Target, ItemField::Constellation, ItemField::Type],
    };

    /// Adds conditions, telescopes and magnification
    pub const BASIC: Schema = Schema {
        name: "basic",
        metadata: &[
            MetaField::Date,
            MetaField::Seeing,
            MetaField::Transparency,
            MetaField::Telescopes,
        ],
        items: &[
            ItemField::Target,
            ItemField::Constellation,
            ItemField::Type,
            ItemField::Power,
        ],
    };

    /// Every metadata field plus notes per target
    pub const EXTENDED: Schema = Schema {
        name: "extended",
        metadata: &MetaField::ALL,
        items: &[
            ItemField::Target,
            ItemField::Constellation,
            ItemField::Type,
            ItemField::Power,
            ItemField::Notes,
        ],
    };

    /// Profile name this schema belongs to
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Metadata fields in display order
    pub fn metadata_fields(&self) -> &'static [MetaField] {
        self.metadata
    }

    /// Item columns in file order
    pub fn item_fields(&self) -> &'static [ItemField] {
        self.items
    }

    /// Number of columns an item row must have
    pub fn item_column_count(&self) -> usize {
        self.items.len()
    }

    /// Resolve a header key, accepting only fields that belong to this schema
    pub fn metadata_field(&self, key: &str) -> Option<MetaField> {
        MetaField::from_col_name(key).filter(|field| self.metadata.contains(field))
    }

    /// Whether the schema has the given metadata field
    pub fn has_metadata_field(&self, field: MetaField) -> bool {
        self.metadata.contains(&field)
    }

    /// Whether the schema has the given item column
    pub fn has_item_field(&self, field: ItemField) -> bool {
        self.items.contains(&field)
    }

    /// Whether a line is this schema's item header
    ///
    /// The line must have exactly the schema's column count and each cell
    /// must equal the column name, ignoring case.
    pub fn matches_item_header(&self, fields: &[String]) -> bool {
        fields.len() == self.items.len()
            && self
                .items
                .iter()
                .zip(fields)
                .all(|(column, cell)| column.col_name().eq_ignore_ascii_case(cell))
    }

    /// Column header line for this schema, tab separated
    pub fn item_header_line(&self) -> String {
        self.items
            .iter()
            .map(|field| field.col_name())
            .collect::<Vec<_>>()
            .join("\t")
    }
}
