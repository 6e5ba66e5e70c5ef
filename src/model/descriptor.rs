//! Static resource descriptors: field set, relations, ownership and validation rules per entity.

/// Storage-generated fields; never taken from client input.
pub const GENERATED_FIELDS: &[&str] = &["id", "created_at", "updated_at"];

/// Column kind, used for DDL, SQL casts and query-string coercion.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FieldKind {
    /// Primary key (uuid, generated by storage).
    Id,
    Uuid,
    Text,
    Bool,
    Integer,
    BigInt,
    Timestamp,
}

impl FieldKind {
    pub fn pg_type(&self) -> &'static str {
        match self {
            FieldKind::Id | FieldKind::Uuid => "uuid",
            FieldKind::Text => "text",
            FieldKind::Bool => "boolean",
            FieldKind::Integer => "integer",
            FieldKind::BigInt => "bigint",
            FieldKind::Timestamp => "timestamptz",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Format {
    Email,
}

#[derive(Clone, Copy, Debug, Default)]
pub struct Rules {
    pub required: bool,
    pub format: Option<Format>,
    pub min_length: Option<usize>,
    pub max_length: Option<usize>,
    /// Allowed string values; empty means unrestricted.
    pub allowed: &'static [&'static str],
}

impl Rules {
    pub const NONE: Rules = Rules {
        required: false,
        format: None,
        min_length: None,
        max_length: None,
        allowed: &[],
    };
}

#[derive(Clone, Copy, Debug)]
pub struct FieldSpec {
    pub name: &'static str,
    pub kind: FieldKind,
    pub nullable: bool,
    pub unique: bool,
    pub rules: Rules,
}

impl FieldSpec {
    const fn new(name: &'static str, kind: FieldKind) -> Self {
        FieldSpec {
            name,
            kind,
            nullable: true,
            unique: false,
            rules: Rules::NONE,
        }
    }

    pub const fn id() -> Self {
        FieldSpec {
            nullable: false,
            ..FieldSpec::new("id", FieldKind::Id)
        }
    }

    pub const fn created_at() -> Self {
        FieldSpec {
            nullable: false,
            ..FieldSpec::new("created_at", FieldKind::Timestamp)
        }
    }

    pub const fn updated_at() -> Self {
        FieldSpec {
            nullable: false,
            ..FieldSpec::new("updated_at", FieldKind::Timestamp)
        }
    }

    pub const fn text(name: &'static str) -> Self {
        FieldSpec::new(name, FieldKind::Text)
    }

    pub const fn uuid(name: &'static str) -> Self {
        FieldSpec::new(name, FieldKind::Uuid)
    }

    pub const fn boolean(name: &'static str) -> Self {
        FieldSpec::new(name, FieldKind::Bool)
    }

    pub const fn integer(name: &'static str) -> Self {
        FieldSpec::new(name, FieldKind::Integer)
    }

    pub const fn bigint(name: &'static str) -> Self {
        FieldSpec::new(name, FieldKind::BigInt)
    }

    /// NOT NULL in storage and required on writes.
    pub const fn required(self) -> Self {
        FieldSpec {
            nullable: false,
            rules: Rules {
                required: true,
                ..self.rules
            },
            ..self
        }
    }

    /// NOT NULL in storage; the zero value is acceptable.
    pub const fn not_null(self) -> Self {
        FieldSpec {
            nullable: false,
            ..self
        }
    }

    pub const fn unique(self) -> Self {
        FieldSpec {
            unique: true,
            ..self
        }
    }

    pub const fn email(self) -> Self {
        FieldSpec {
            rules: Rules {
                format: Some(Format::Email),
                ..self.rules
            },
            ..self
        }
    }

    pub const fn min_length(self, n: usize) -> Self {
        FieldSpec {
            rules: Rules {
                min_length: Some(n),
                ..self.rules
            },
            ..self
        }
    }

    pub const fn max_length(self, n: usize) -> Self {
        FieldSpec {
            rules: Rules {
                max_length: Some(n),
                ..self.rules
            },
            ..self
        }
    }

    pub const fn one_of(self, allowed: &'static [&'static str]) -> Self {
        FieldSpec {
            rules: Rules {
                allowed,
                ..self.rules
            },
            ..self
        }
    }

    pub fn is_generated(&self) -> bool {
        GENERATED_FIELDS.contains(&self.name)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OnDelete {
    Cascade,
    SetNull,
}

impl OnDelete {
    pub fn sql(&self) -> &'static str {
        match self {
            OnDelete::Cascade => "CASCADE",
            OnDelete::SetNull => "SET NULL",
        }
    }
}

/// Foreign key from `field` to the `id` of resource `target`.
#[derive(Clone, Copy, Debug)]
pub struct Relation {
    pub field: &'static str,
    pub target: &'static str,
    pub on_delete: OnDelete,
}

impl Relation {
    pub const fn cascade(field: &'static str, target: &'static str) -> Self {
        Relation {
            field,
            target,
            on_delete: OnDelete::Cascade,
        }
    }

    pub const fn set_null(field: &'static str, target: &'static str) -> Self {
        Relation {
            field,
            target,
            on_delete: OnDelete::SetNull,
        }
    }
}

/// Who owns a row, for the ownership gate and owner stamping on create.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Ownership {
    /// The row id is the owner's subject id.
    PathId,
    /// Any of the named columns holds an owner's subject id. The first one is
    /// stamped with the caller's id on create.
    Columns(&'static [&'static str]),
}

#[derive(Debug)]
pub struct ResourceDescriptor {
    /// Path segment and table name.
    pub name: &'static str,
    pub fields: &'static [FieldSpec],
    pub relations: &'static [Relation],
    pub owner: Option<Ownership>,
    /// Never emitted in responses.
    pub sensitive: &'static [&'static str],
    /// Stripped from client bodies by the field-filter gate.
    pub protected: &'static [&'static str],
    /// Records who created the row without granting ownership. Stamped on
    /// create and immutable afterwards.
    pub author: Option<&'static str>,
}

impl ResourceDescriptor {
    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn has_field(&self, name: &str) -> bool {
        self.field(name).is_some()
    }

    /// Fields a client may write (everything but storage-generated ones).
    pub fn writable_fields(&self) -> impl Iterator<Item = &FieldSpec> {
        self.fields.iter().filter(|f| !f.is_generated())
    }

    pub fn owner_columns(&self) -> &'static [&'static str] {
        match self.owner {
            Some(Ownership::Columns(cols)) => cols,
            _ => &[],
        }
    }

    /// Column stamped with the caller's subject id on create.
    pub fn stamp_column(&self) -> Option<&'static str> {
        self.author.or_else(|| self.owner_columns().first().copied())
    }

    /// Fields the field-filter gate strips from create bodies.
    pub fn filtered_on_create(&self) -> Vec<&'static str> {
        self.protected.iter().copied().chain(self.stamp_column()).collect()
    }

    /// Fields the field-filter gate strips from update bodies; owner columns are immutable.
    pub fn filtered_on_update(&self) -> Vec<&'static str> {
        let mut fields: Vec<&'static str> = self.protected.to_vec();
        for c in self.owner_columns().iter().chain(&self.author) {
            if !fields.contains(c) {
                fields.push(*c);
            }
        }
        fields
    }
}
