//! Constants used throughout the analyzer

pub mod known_contracts;

/// Core-symbol markers looked for in deployed code.
///
/// A hit only suggests which chain the code was built for; it proves nothing.
pub const CODE_MARKERS: &[&[u8]] = &[b"SYS", b"EOS"];

/// Width of the dashed section banners
pub const BANNER_WIDTH: usize = 69;

/// Report section titles, in output order
pub const SECTION_PACKED: &str = "PACKED TRANSACTION";
pub const SECTION_SIGNED: &str = "SIGNED TRANSACTION";
pub const SECTION_HEADER: &str = "TRANSACTION HEADER";
pub const SECTION_ACTIONS: &str = "ACTIONS";

/// Bytes per line in verbose hex dumps
pub const DUMP_LINE_WIDTH: usize = 16;
