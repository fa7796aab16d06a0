//! Fixed names used in the binsparse on-disk layout

/// Attribute key the metadata record is stored under
pub const METADATA_KEY: &str = "binsparse";

/// Array role names
pub mod roles {
    /// Major-axis indices of a COO matrix (rows)
    pub const INDICES_0: &str = "indices_0";
    /// Minor-axis indices (columns for COO/CSR, rows for CSC)
    pub const INDICES_1: &str = "indices_1";
    /// Compressed pointer array of CSR/CSC
    pub const POINTERS_TO_1: &str = "pointers_to_1";
    /// Stored values
    pub const VALUES: &str = "values";

    /// Every role name any format uses
    pub const ALL: [&str; 4] = [INDICES_0, INDICES_1, POINTERS_TO_1, VALUES];
}
