pub mod saved_summary;
