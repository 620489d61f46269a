//! Constants shared between the backend and the host entry points.

/// Marker for an unknown dimension inside a shape array.
pub const UNKNOWN_DIM: i64 = -1;

/// Marker for an unknown rank on the shape wire encoding.
pub const UNKNOWN_RANK: i32 = -1;

/// Handle value meaning "absent" or "failed".
pub const NULL_HANDLE: u64 = 0;

pub mod attrs {
    /// Reserved attribute holding colocation constraints.
    pub const COLOCATION: &str = "_class";

    /// Prefix of every colocation constraint entry.
    pub const COLOCATION_PREFIX: &str = "loc:@";

    /// Attribute names with this prefix are not checked against op definitions.
    pub const RESERVED_PREFIX: char = '_';
}

pub mod modules {
    pub const BRIDGE: &str = "bridge";
    pub const BACKEND: &str = "backend";
    pub const BUILDER: &str = "builder";
    pub const CATALOG: &str = "catalog";
    pub const CONFIG: &str = "config";
    pub const HOST: &str = "host";
}
