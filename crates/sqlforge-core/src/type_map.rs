//! Vendor SQL type names to generic host types.
//!
//! The table is a `static` slice: it is built at compile time and read
//! concurrently without locking. Lookups are case-insensitive, collapse
//! whitespace, and ignore size suffixes (`VARCHAR(30)`) and `UNSIGNED`.
//!
//! A name that is not in the table maps to the text family with
//! [`TypeMapping::fallback`] set, and a warning is logged.

use serde::Serialize;
use tracing::warn;

use crate::error::{GenerateError, Result};

/// How a result-set value is read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AccessorKind {
    String,
    Int,
    Long,
    Short,
    BigDecimal,
    Float,
    Double,
    Boolean,
    LocalDate,
    LocalTime,
    LocalDateTime,
    Bytes,
}

impl AccessorKind {
    /// The `ResultSet` getter for this kind.
    #[must_use]
    pub const fn method(&self) -> &'static str {
        match self {
            Self::String => "getString",
            Self::Int => "getInt",
            Self::Long => "getLong",
            Self::Short => "getShort",
            Self::BigDecimal => "getBigDecimal",
            Self::Float => "getFloat",
            Self::Double => "getDouble",
            Self::Boolean => "getBoolean",
            Self::LocalDate | Self::LocalTime | Self::LocalDateTime => "getObject",
            Self::Bytes => "getBytes",
        }
    }

    const fn is_primitive(&self) -> bool {
        matches!(
            self,
            Self::Int | Self::Long | Self::Short | Self::Float | Self::Double | Self::Boolean
        )
    }
}

/// The generic (Java) type a value is held in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum HostType {
    String,
    Integer,
    Long,
    Short,
    BigDecimal,
    Float,
    Double,
    Boolean,
    LocalDate,
    LocalTime,
    LocalDateTime,
    ByteArray,
}

impl HostType {
    /// The type name as written in source.
    #[must_use]
    pub const fn java_name(&self) -> &'static str {
        match self {
            Self::String => "String",
            Self::Integer => "Integer",
            Self::Long => "Long",
            Self::Short => "Short",
            Self::BigDecimal => "BigDecimal",
            Self::Float => "Float",
            Self::Double => "Double",
            Self::Boolean => "Boolean",
            Self::LocalDate => "LocalDate",
            Self::LocalTime => "LocalTime",
            Self::LocalDateTime => "LocalDateTime",
            Self::ByteArray => "byte[]",
        }
    }

    /// The import the type needs, if it is not in `java.lang`.
    #[must_use]
    pub const fn import(&self) -> Option<&'static str> {
        match self {
            Self::BigDecimal => Some("java.math.BigDecimal"),
            Self::LocalDate => Some("java.time.LocalDate"),
            Self::LocalTime => Some("java.time.LocalTime"),
            Self::LocalDateTime => Some("java.time.LocalDateTime"),
            _ => None,
        }
    }
}

/// Generic (JDBC) type codes.
pub mod type_code {
    pub const BIT: i32 = -7;
    pub const TINYINT: i32 = -6;
    pub const BIGINT: i32 = -5;
    pub const LONGVARBINARY: i32 = -4;
    pub const VARBINARY: i32 = -3;
    pub const BINARY: i32 = -2;
    pub const LONGVARCHAR: i32 = -1;
    pub const CHAR: i32 = 1;
    pub const NUMERIC: i32 = 2;
    pub const DECIMAL: i32 = 3;
    pub const INTEGER: i32 = 4;
    pub const SMALLINT: i32 = 5;
    pub const FLOAT: i32 = 6;
    pub const REAL: i32 = 7;
    pub const DOUBLE: i32 = 8;
    pub const VARCHAR: i32 = 12;
    pub const BOOLEAN: i32 = 16;
    pub const DATE: i32 = 91;
    pub const TIME: i32 = 92;
    pub const TIMESTAMP: i32 = 93;
    pub const OTHER: i32 = 1111;
    pub const BLOB: i32 = 2004;
    pub const CLOB: i32 = 2005;
    pub const NCLOB: i32 = 2011;
    pub const TIMESTAMP_WITH_TIMEZONE: i32 = 2014;
    pub const NCHAR: i32 = -15;
    pub const NVARCHAR: i32 = -9;
    pub const LONGNVARCHAR: i32 = -16;
}

/// The generic view of a vendor type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TypeMapping {
    /// How to read the value.
    pub accessor: AccessorKind,
    /// What to hold it in.
    pub host: HostType,
    /// Generic (JDBC) type code.
    pub type_code: i32,
    /// True when the vendor name was not recognized and text was assumed.
    pub fallback: bool,
}

impl TypeMapping {
    const fn new(accessor: AccessorKind, host: HostType, type_code: i32) -> Self {
        Self {
            accessor,
            host,
            type_code,
            fallback: false,
        }
    }

    /// Java expression reading column `label` from result set `rs`.
    ///
    /// Nullable primitive-backed columns are read through `getObject` so
    /// that SQL NULL stays `null` instead of becoming zero.
    #[must_use]
    pub fn read_expression(&self, rs: &str, label: &str, nullable: bool) -> String {
        let label = format!("\"{}\"", escape_java(label));
        let by_class = matches!(
            self.accessor,
            AccessorKind::LocalDate | AccessorKind::LocalTime | AccessorKind::LocalDateTime
        ) || (nullable && self.accessor.is_primitive());
        if by_class {
            format!("{rs}.getObject({label}, {}.class)", self.host.java_name())
        } else {
            format!("{rs}.{}({label})", self.accessor.method())
        }
    }
}

/// Escapes text for use inside a Java string literal.
#[must_use]
pub fn escape_java(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c => out.push(c),
        }
    }
    out
}

use type_code as tc;
use AccessorKind as A;
use HostType as H;

const TEXT: (A, H) = (A::String, H::String);
const INT: (A, H) = (A::Int, H::Integer);
const LONG: (A, H) = (A::Long, H::Long);
const SHORT: (A, H) = (A::Short, H::Short);
const DECIMAL: (A, H) = (A::BigDecimal, H::BigDecimal);
const FLOAT: (A, H) = (A::Float, H::Float);
const DOUBLE: (A, H) = (A::Double, H::Double);
const BOOL: (A, H) = (A::Boolean, H::Boolean);
const DATE: (A, H) = (A::LocalDate, H::LocalDate);
const TIME: (A, H) = (A::LocalTime, H::LocalTime);
const STAMP: (A, H) = (A::LocalDateTime, H::LocalDateTime);
const BYTES: (A, H) = (A::Bytes, H::ByteArray);

const fn entry(name: &'static str, family: (A, H), code: i32) -> (&'static str, TypeMapping) {
    (name, TypeMapping::new(family.0, family.1, code))
}

static TABLE: &[(&str, TypeMapping)] = &[
    // character/text
    entry("CHAR", TEXT, tc::CHAR),
    entry("CHARACTER", TEXT, tc::CHAR),
    entry("NCHAR", TEXT, tc::NCHAR),
    entry("VARCHAR", TEXT, tc::VARCHAR),
    entry("VARCHAR2", TEXT, tc::VARCHAR),
    entry("CHARACTER VARYING", TEXT, tc::VARCHAR),
    entry("NVARCHAR", TEXT, tc::NVARCHAR),
    entry("NVARCHAR2", TEXT, tc::NVARCHAR),
    entry("TEXT", TEXT, tc::LONGVARCHAR),
    entry("TINYTEXT", TEXT, tc::LONGVARCHAR),
    entry("MEDIUMTEXT", TEXT, tc::LONGVARCHAR),
    entry("LONGTEXT", TEXT, tc::LONGVARCHAR),
    entry("NTEXT", TEXT, tc::LONGNVARCHAR),
    entry("CLOB", TEXT, tc::CLOB),
    entry("NCLOB", TEXT, tc::NCLOB),
    entry("UUID", TEXT, tc::OTHER),
    entry("JSON", TEXT, tc::OTHER),
    entry("JSONB", TEXT, tc::OTHER),
    // 32-bit integer
    entry("INT", INT, tc::INTEGER),
    entry("INTEGER", INT, tc::INTEGER),
    entry("INT4", INT, tc::INTEGER),
    entry("MEDIUMINT", INT, tc::INTEGER),
    entry("SERIAL", INT, tc::INTEGER),
    // 64-bit integer
    entry("BIGINT", LONG, tc::BIGINT),
    entry("INT8", LONG, tc::BIGINT),
    entry("BIGSERIAL", LONG, tc::BIGINT),
    // small/tiny integer
    entry("SMALLINT", SHORT, tc::SMALLINT),
    entry("INT2", SHORT, tc::SMALLINT),
    entry("TINYINT", SHORT, tc::TINYINT),
    // exact decimal/currency
    entry("DECIMAL", DECIMAL, tc::DECIMAL),
    entry("DEC", DECIMAL, tc::DECIMAL),
    entry("NUMERIC", DECIMAL, tc::NUMERIC),
    entry("NUMBER", DECIMAL, tc::NUMERIC),
    entry("MONEY", DECIMAL, tc::DECIMAL),
    entry("SMALLMONEY", DECIMAL, tc::DECIMAL),
    // single and double float
    // SQLite stores REAL as an 8-byte IEEE double.
    entry("REAL", DOUBLE, tc::REAL),
    entry("FLOAT4", FLOAT, tc::REAL),
    entry("FLOAT", DOUBLE, tc::FLOAT),
    entry("DOUBLE", DOUBLE, tc::DOUBLE),
    entry("DOUBLE PRECISION", DOUBLE, tc::DOUBLE),
    entry("FLOAT8", DOUBLE, tc::DOUBLE),
    // boolean/bit
    entry("BOOLEAN", BOOL, tc::BOOLEAN),
    entry("BOOL", BOOL, tc::BOOLEAN),
    entry("BIT", BOOL, tc::BIT),
    // date, time, timestamp
    entry("DATE", DATE, tc::DATE),
    entry("TIME", TIME, tc::TIME),
    entry("TIME WITHOUT TIME ZONE", TIME, tc::TIME),
    entry("TIMESTAMP", STAMP, tc::TIMESTAMP),
    entry("TIMESTAMP WITHOUT TIME ZONE", STAMP, tc::TIMESTAMP),
    entry("DATETIME", STAMP, tc::TIMESTAMP),
    entry("DATETIME2", STAMP, tc::TIMESTAMP),
    entry("SMALLDATETIME", STAMP, tc::TIMESTAMP),
    entry("TIMESTAMPTZ", STAMP, tc::TIMESTAMP_WITH_TIMEZONE),
    entry("TIMESTAMP WITH TIME ZONE", STAMP, tc::TIMESTAMP_WITH_TIMEZONE),
    entry("DATETIMEOFFSET", STAMP, tc::TIMESTAMP_WITH_TIMEZONE),
    // fixed/variable binary
    entry("BINARY", BYTES, tc::BINARY),
    entry("VARBINARY", BYTES, tc::VARBINARY),
    entry("BYTEA", BYTES, tc::BINARY),
    entry("BLOB", BYTES, tc::BLOB),
    entry("TINYBLOB", BYTES, tc::VARBINARY),
    entry("MEDIUMBLOB", BYTES, tc::LONGVARBINARY),
    entry("LONGBLOB", BYTES, tc::LONGVARBINARY),
    entry("IMAGE", BYTES, tc::LONGVARBINARY),
];

const FALLBACK: TypeMapping = TypeMapping {
    accessor: AccessorKind::String,
    host: HostType::String,
    type_code: tc::VARCHAR,
    fallback: true,
};

/// Canonical form of a vendor type name: upper case, single spaces, no
/// size suffix, no `UNSIGNED`.
#[must_use]
pub fn canonical_name(vendor_type_name: &str) -> String {
    let mut depth = 0usize;
    let without_sizes: String = vendor_type_name
        .chars()
        .filter(|c| match c {
            '(' => {
                depth += 1;
                false
            }
            ')' => {
                depth = depth.saturating_sub(1);
                false
            }
            _ => depth == 0,
        })
        .collect();
    let words: Vec<String> = without_sizes
        .split_whitespace()
        .map(str::to_uppercase)
        .filter(|w| w != "UNSIGNED")
        .collect();
    words.join(" ")
}

/// Looks up the mapping for a vendor type name.
///
/// # Errors
///
/// Returns `ContractViolation` for an empty or whitespace-only name.
pub fn lookup(vendor_type_name: &str) -> Result<TypeMapping> {
    let canonical = canonical_name(vendor_type_name);
    if canonical.is_empty() {
        return Err(GenerateError::ContractViolation(format!(
            "empty vendor type name '{vendor_type_name}'"
        )));
    }
    match TABLE.iter().find(|(name, _)| *name == canonical) {
        Some((_, mapping)) => Ok(*mapping),
        None => {
            warn!(
                vendor_type = %vendor_type_name,
                "Unrecognized vendor type, falling back to text"
            );
            Ok(FALLBACK)
        }
    }
}

/// Every table entry, in table order.
pub fn entries() -> impl Iterator<Item = (&'static str, TypeMapping)> {
    TABLE.iter().copied()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_name() {
        assert_eq!(canonical_name("varchar(30)"), "VARCHAR");
        assert_eq!(canonical_name("  double   precision "), "DOUBLE PRECISION");
        assert_eq!(canonical_name("INT(11) UNSIGNED"), "INT");
        assert_eq!(canonical_name("timestamp(6) with time zone"), "TIMESTAMP WITH TIME ZONE");
    }

    #[test]
    fn test_lookup_documented_pairs() {
        let cases = [
            ("VARCHAR", AccessorKind::String, HostType::String, tc::VARCHAR),
            ("integer", AccessorKind::Int, HostType::Integer, tc::INTEGER),
            ("BIGINT", AccessorKind::Long, HostType::Long, tc::BIGINT),
            ("decimal(10,2)", AccessorKind::BigDecimal, HostType::BigDecimal, tc::DECIMAL),
            ("DATE", AccessorKind::LocalDate, HostType::LocalDate, tc::DATE),
            ("DATETIME", AccessorKind::LocalDateTime, HostType::LocalDateTime, tc::TIMESTAMP),
            ("BLOB", AccessorKind::Bytes, HostType::ByteArray, tc::BLOB),
            ("BOOLEAN", AccessorKind::Boolean, HostType::Boolean, tc::BOOLEAN),
        ];
        for (name, accessor, host, code) in cases {
            let mapping = lookup(name).unwrap();
            assert_eq!(mapping.accessor, accessor, "{name}");
            assert_eq!(mapping.host, host, "{name}");
            assert_eq!(mapping.type_code, code, "{name}");
            assert!(!mapping.fallback, "{name}");
        }
    }

    #[test]
    fn test_every_entry_is_reachable() {
        for (name, mapping) in entries() {
            assert_eq!(lookup(name).unwrap(), mapping, "{name}");
        }
    }

    #[test]
    fn test_unknown_type_falls_back_to_text() {
        let mapping = lookup("GEOMETRY").unwrap();
        assert_eq!(mapping.host, HostType::String);
        assert_eq!(mapping.accessor, AccessorKind::String);
        assert!(mapping.fallback);
    }

    #[test]
    fn test_empty_name_is_rejected() {
        assert!(matches!(
            lookup("   "),
            Err(GenerateError::ContractViolation(_))
        ));
    }

    #[test]
    fn test_read_expression() {
        let int = lookup("INT").unwrap();
        assert_eq!(int.read_expression("rs", "qty", false), "rs.getInt(\"qty\")");
        assert_eq!(
            int.read_expression("rs", "qty", true),
            "rs.getObject(\"qty\", Integer.class)"
        );
        let date = lookup("DATE").unwrap();
        assert_eq!(
            date.read_expression("rs", "shipped_on", false),
            "rs.getObject(\"shipped_on\", LocalDate.class)"
        );
    }
}
