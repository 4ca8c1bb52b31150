use bytes::Bytes;

/// MySQL column types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ColumnType {
    Decimal = 0x00,
    Tiny = 0x01,
    Short = 0x02,
    Long = 0x03,
    Float = 0x04,
    Double = 0x05,
    Null = 0x06,
    Timestamp = 0x07,
    LongLong = 0x08,
    Int24 = 0x09,
    Date = 0x0A,
    Time = 0x0B,
    Datetime = 0x0C,
    Year = 0x0D,
    VarChar = 0x0F,
    Bit = 0x10,
    Json = 0xF5,
    NewDecimal = 0xF6,
    Enum = 0xF7,
    Set = 0xF8,
    TinyBlob = 0xF9,
    MediumBlob = 0xFA,
    LongBlob = 0xFB,
    Blob = 0xFC,
    VarString = 0xFD,
    String = 0xFE,
    Geometry = 0xFF,
}

/// Column descriptor of a result set
#[derive(Debug, Clone)]
pub struct Field {
    pub name: String,
    pub typ: ColumnType,
    pub flags: u16,
}

impl Field {
    pub fn new(name: impl Into<String>, typ: ColumnType) -> Self {
        Self {
            name: name.into(),
            typ,
            flags: 0,
        }
    }
}

/// One result row: raw-encoded values, None for SQL NULL
pub type Row = Vec<Option<Bytes>>;

/// Which phases of the result write protocol a call executes.
///
/// A complete response can be delivered in one `Complete` call, or streamed
/// across a `FieldsOnly` call, any number of `RowsOnly` calls, and a final
/// `FinishedOnly` call; the client observes the same wire format either way.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResultState {
    /// Write fields, rows, and the terminal packet in one call
    #[default]
    Complete,
    /// Write only the column definition block
    FieldsOnly,
    /// Write only row packets
    RowsOnly,
    /// Write only the terminal packet
    FinishedOnly,
}

/// An in-memory query result, produced by the execution layer and read-only
/// to the session
#[derive(Debug, Clone, Default)]
pub struct QueryResult {
    pub fields: Vec<Field>,
    pub rows: Vec<Row>,
    pub rows_affected: u64,
    pub insert_id: u64,
    pub warnings: u16,
    pub state: ResultState,
}

impl QueryResult {
    /// Mutation acknowledgment with no result set
    pub fn ok(rows_affected: u64, insert_id: u64) -> Self {
        Self {
            rows_affected,
            insert_id,
            ..Default::default()
        }
    }

    /// Result set carrying fields and rows
    pub fn with_rows(fields: Vec<Field>, rows: Vec<Row>) -> Self {
        Self {
            fields,
            rows,
            ..Default::default()
        }
    }
}
