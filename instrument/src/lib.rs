//! Column recording of market-run events.
//!
//! `market-core` emits `tracing` events (behind its `instrument` feature) with
//! one target per table: [`SELLER_MOVE`] for every search a seller runs and
//! [`TICK_SUMMARY`] for each seller's state after a tick. The subscriber here
//! turns each event into a row, growing columns as new fields appear.
//!
//! ```ignore
//! instrument::install_subscriber();
//! instrument::clear();
//! sim.run(50);
//! let recorder = instrument::drain();
//! let prices = recorder.table(instrument::TICK_SUMMARY).unwrap().i64_column("price");
//! ```

use std::cell::RefCell;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use polars::prelude::*;
use tracing::field::{Field, Visit};
use tracing::span::{Attributes, Record};
use tracing::{Event, Id, Metadata, Subscriber};

/// One row per seller search: from/to cell and price, score, candidate counts.
/// `score` is left unset when no candidate was legal.
pub const SELLER_MOVE: &str = "seller_move";
/// One row per seller per tick: position, price, revenue, aggressiveness.
pub const TICK_SUMMARY: &str = "tick_summary";

#[derive(Debug, Clone, PartialEq)]
pub enum TypedColumn {
    U64(Vec<u64>),
    I64(Vec<i64>),
    F64(Vec<f64>),
    Bool(Vec<bool>),
    Str(Vec<String>),
}

impl TypedColumn {
    pub fn len(&self) -> usize {
        match self {
            TypedColumn::U64(v) => v.len(),
            TypedColumn::I64(v) => v.len(),
            TypedColumn::F64(v) => v.len(),
            TypedColumn::Bool(v) => v.len(),
            TypedColumn::Str(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Fill with the type's zero value up to `rows`.
    fn pad_to(&mut self, rows: usize) {
        let missing = rows.saturating_sub(self.len());
        match self {
            TypedColumn::U64(v) => v.extend(std::iter::repeat_n(0, missing)),
            TypedColumn::I64(v) => v.extend(std::iter::repeat_n(0, missing)),
            TypedColumn::F64(v) => v.extend(std::iter::repeat_n(0.0, missing)),
            TypedColumn::Bool(v) => v.extend(std::iter::repeat_n(false, missing)),
            TypedColumn::Str(v) => v.extend(std::iter::repeat_n(String::new(), missing)),
        }
    }
}

/// Rows recorded under one tracing target.
#[derive(Debug, Clone, Default)]
pub struct DynamicTable {
    pub columns: HashMap<String, TypedColumn>,
    pub row_count: usize,
}

impl DynamicTable {
    fn pad_columns(&mut self) {
        let rows = self.row_count;
        for col in self.columns.values_mut() {
            col.pad_to(rows);
        }
    }

    pub fn u64_column(&self, name: &str) -> Option<&[u64]> {
        match self.columns.get(name)? {
            TypedColumn::U64(v) => Some(v),
            _ => None,
        }
    }

    pub fn i64_column(&self, name: &str) -> Option<&[i64]> {
        match self.columns.get(name)? {
            TypedColumn::I64(v) => Some(v),
            _ => None,
        }
    }

    pub fn f64_column(&self, name: &str) -> Option<&[f64]> {
        match self.columns.get(name)? {
            TypedColumn::F64(v) => Some(v),
            _ => None,
        }
    }

    pub fn bool_column(&self, name: &str) -> Option<&[bool]> {
        match self.columns.get(name)? {
            TypedColumn::Bool(v) => Some(v),
            _ => None,
        }
    }

    pub fn to_dataframe(&self) -> PolarsResult<DataFrame> {
        let columns = self
            .columns
            .iter()
            .map(|(name, col)| match col {
                TypedColumn::U64(v) => Column::new(name.into(), v),
                TypedColumn::I64(v) => Column::new(name.into(), v),
                TypedColumn::F64(v) => Column::new(name.into(), v),
                TypedColumn::Bool(v) => Column::new(name.into(), v),
                TypedColumn::Str(v) => Column::new(name.into(), v),
            })
            .collect();
        DataFrame::new(columns)
    }
}

/// All tables recorded on this thread, keyed by target.
#[derive(Debug, Clone, Default)]
pub struct Recorder {
    pub tables: HashMap<String, DynamicTable>,
}

impl Recorder {
    pub fn table(&self, target: &str) -> Option<&DynamicTable> {
        self.tables.get(target)
    }

    pub fn to_dataframes(&self) -> HashMap<String, DataFrame> {
        self.tables
            .iter()
            .filter_map(|(name, table)| table.to_dataframe().ok().map(|df| (name.clone(), df)))
            .collect()
    }
}

thread_local! {
    static RECORDER: RefCell<Recorder> = RefCell::default();
}

struct RowVisitor<'a> {
    table: &'a mut DynamicTable,
}

impl RowVisitor<'_> {
    fn push<T>(
        &mut self,
        field: &Field,
        value: T,
        make: impl FnOnce(usize) -> TypedColumn,
        slot: impl FnOnce(&mut TypedColumn) -> Option<&mut Vec<T>>,
    ) {
        let rows = self.table.row_count;
        let col = self
            .table
            .columns
            .entry(field.name().to_string())
            .or_insert_with(|| make(rows));
        // A field that changes type mid-run keeps its first type; the row is padded instead.
        if let Some(v) = slot(col) {
            v.push(value);
        }
    }
}

impl Visit for RowVisitor<'_> {
    fn record_u64(&mut self, field: &Field, value: u64) {
        self.push(
            field,
            value,
            |n| TypedColumn::U64(vec![0; n]),
            |c| match c {
                TypedColumn::U64(v) => Some(v),
                _ => None,
            },
        );
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        self.push(
            field,
            value,
            |n| TypedColumn::I64(vec![0; n]),
            |c| match c {
                TypedColumn::I64(v) => Some(v),
                _ => None,
            },
        );
    }

    fn record_f64(&mut self, field: &Field, value: f64) {
        self.push(
            field,
            value,
            |n| TypedColumn::F64(vec![0.0; n]),
            |c| match c {
                TypedColumn::F64(v) => Some(v),
                _ => None,
            },
        );
    }

    fn record_bool(&mut self, field: &Field, value: bool) {
        self.push(
            field,
            value,
            |n| TypedColumn::Bool(vec![false; n]),
            |c| match c {
                TypedColumn::Bool(v) => Some(v),
                _ => None,
            },
        );
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        self.push(
            field,
            value.to_string(),
            |n| TypedColumn::Str(vec![String::new(); n]),
            |c| match c {
                TypedColumn::Str(v) => Some(v),
                _ => None,
            },
        );
    }

    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        self.record_str(field, &format!("{:?}", value));
    }
}

/// Subscriber that appends every info-or-above event to its target's table.
pub struct TableSubscriber;

impl Subscriber for TableSubscriber {
    fn enabled(&self, metadata: &Metadata<'_>) -> bool {
        metadata.is_event() && *metadata.level() <= tracing::Level::INFO
    }

    fn new_span(&self, _span: &Attributes<'_>) -> Id {
        Id::from_u64(1)
    }

    fn record(&self, _span: &Id, _values: &Record<'_>) {}

    fn record_follows_from(&self, _span: &Id, _follows: &Id) {}

    fn event(&self, event: &Event<'_>) {
        let target = event.metadata().target().to_string();
        RECORDER.with(|r| {
            let mut recorder = r.borrow_mut();
            let table = recorder.tables.entry(target).or_default();
            table.pad_columns();
            event.record(&mut RowVisitor { table: &mut *table });
            table.row_count += 1;
            table.pad_columns();
        });
    }

    fn enter(&self, _span: &Id) {}

    fn exit(&self, _span: &Id) {}
}

/// Install [`TableSubscriber`] as the global default. Later calls are no-ops.
pub fn install_subscriber() {
    let _ = tracing::subscriber::set_global_default(TableSubscriber);
}

/// Take everything recorded on this thread.
pub fn drain() -> Recorder {
    RECORDER.with(|r| std::mem::take(&mut *r.borrow_mut()))
}

pub fn clear() {
    RECORDER.with(|r| *r.borrow_mut() = Recorder::default());
}

/// Write each frame to `{dir}/{name}.parquet`.
pub fn save_parquet(dfs: &mut HashMap<String, DataFrame>, dir: &Path) -> PolarsResult<()> {
    let io = |e: std::io::Error| PolarsError::IO {
        error: e.into(),
        msg: None,
    };
    std::fs::create_dir_all(dir).map_err(io)?;
    for (name, df) in dfs.iter_mut() {
        let file = std::fs::File::create(dir.join(format!("{name}.parquet"))).map_err(io)?;
        ParquetWriter::new(file).finish(df)?;
    }
    Ok(())
}

/// Records one run and writes its tables as parquet when dropped.
///
/// The run lands in `{parent}/{label}/`, where `label` is typically the
/// simulation's run label.
pub struct ScopedRecorder {
    run_dir: PathBuf,
    dfs: Option<HashMap<String, DataFrame>>,
}

impl ScopedRecorder {
    pub fn new(parent: impl Into<PathBuf>, label: &str) -> Self {
        let dir_name: String = label
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '_' { c } else { '-' })
            .collect();
        clear();
        install_subscriber();
        Self {
            run_dir: parent.into().join(dir_name),
            dfs: None,
        }
    }

    /// Drain recorded data on first call; later calls return the cached frames.
    pub fn get(&mut self) -> &HashMap<String, DataFrame> {
        self.dfs.get_or_insert_with(|| drain().to_dataframes())
    }

    pub fn run_dir(&self) -> &Path {
        &self.run_dir
    }
}

impl Drop for ScopedRecorder {
    fn drop(&mut self) {
        let mut dfs = self.dfs.take().unwrap_or_else(|| drain().to_dataframes());
        if dfs.is_empty() {
            return;
        }
        if let Err(e) = save_parquet(&mut dfs, &self.run_dir) {
            eprintln!("ScopedRecorder: failed to write {}: {}", self.run_dir.display(), e);
        }
    }
}
