//! Path tokenization
//!
//! Shortcut targets, working directories and icon paths are stored in marker
//! files in a relocatable form. A path under the app's own folder is written
//! with the `[.app_path]` token, a path under the Windows directory with
//! `%SystemRoot%`, and the command interpreter itself as `%ComSpec%`.
//! Tokens are resolved against the app's *current* folder each time a
//! shortcut is materialized, so moving the portable-apps folder never breaks
//! a marker.
//!
//! All functions work on strings with Windows path semantics (`\` and `/`
//! are both separators, comparisons ignore case) so their behavior does not
//! depend on the host platform.

pub mod description;
pub mod tokens;

pub use description::clean_description;
pub use tokens::{
    APP_PATH_TOKEN, COMSPEC_TOKEN, SYSTEM_ROOT_TOKEN, TokenContext, detokenize, expand_arguments,
    normalize_path, split_icon_location, tokenize, tokenize_arguments,
};
