pub mod traits;

// Data store implementations
pub mod supabase;
