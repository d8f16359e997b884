// ============================================================
// CSV INFRASTRUCTURE LAYER
// ============================================================
// CSV parsing, encoding detection, type inference and export

mod csv_exporter;
mod csv_parser;
mod type_inferencer;

pub use csv_exporter::{CsvExporter, ExportedFile, EXPORT_MIME};
pub use csv_parser::{decode, detect_delimiter, CsvParser, ParsedCsv};
pub use type_inferencer::TypeInferencer;
