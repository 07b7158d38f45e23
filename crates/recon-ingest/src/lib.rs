pub mod csv_table;
pub mod dictionary_file;

pub use csv_table::read_export_table;
pub use dictionary_file::load_dictionary;
