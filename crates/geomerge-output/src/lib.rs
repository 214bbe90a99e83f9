//! CSV export of matching results.

pub mod csv_writer;

pub use csv_writer::{
    MERGED_FILE_NAME, OutputPaths, UNMATCHED_A_FILE_NAME, UNMATCHED_B_FILE_NAME, table_to_csv,
    write_match_outputs, write_table_csv, write_table_csv_file,
};
