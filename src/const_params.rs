//! Dedicated to store compile-time-known constants that influence design
//! choices.

/// Parser's maximum AST nesting depth (`target` inside `target`), guarding
/// against stack exhaustion on hostile input.
pub const MAX_AST_DEPTH: usize = 64;

/// Parser's maximum buffered token count before aborting with a
/// `ResourceLimit` diagnostic.
pub const MAX_TOKEN_COUNT: usize = 1 << 20;

/// Motif miner's default minimum reported motif length.
pub const DEFAULT_MOTIF_MIN_LEN: usize = 2;

/// Motif miner's default result cap.
pub const DEFAULT_MOTIF_TOP_K: usize = 10;

/// Event-name sequences longer than this are truncated (with a diagnostic)
/// before suffix array construction.
pub const MAX_MOTIF_SEQUENCE_LENGTH: usize = 1 << 17;

/// Recognized corpus file extensions.
pub const CORPUS_FILE_EXTENSIONS: [&str; 3] = ["zenith", "zth", "znth"];
