pub mod csv;
pub mod json;
pub mod supabase;
pub mod traits;

pub use self::csv::CsvSource;
pub use self::json::JsonRowsSource;
pub use self::supabase::SupabaseSource;
pub use self::traits::RecordSource;
