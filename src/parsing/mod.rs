pub mod assembler;
pub mod classifier;
pub mod entity_builder;
pub mod line_parser;
pub mod regex;

pub use assembler::{Conversion, LogConverter, SkippedLine};
pub use classifier::{Classification, classify_statement};
pub use entity_builder::{build_payload, parse_values_list};
pub use line_parser::{ParsedLine, parse_log_line};
