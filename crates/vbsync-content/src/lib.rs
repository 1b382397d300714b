//! Component text handling for vbsync
//!
//! Everything that touches the *content* of a component lives here:
//! removing and regenerating the host's framing, deciding whether two texts
//! differ in a way that matters, rendering diffs for conflict prompts, and
//! bridging between UTF-8 files and the host's legacy single-byte encoding.

pub mod compare;
pub mod diff;
pub mod encoding;
pub mod error;
pub mod framing;

pub use compare::{differ, normalize};
pub use diff::{DiffSummary, unified_diff};
pub use encoding::{Encoded, LegacyCodec, TextSource, decode_local};
pub use error::{Error, Result};
pub use framing::{
    canonicalize, code_body, declared_name, declares_class, name_attribute, restore, restore_for,
    split_framing, strip, strip_for,
};
