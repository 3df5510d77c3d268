//! Output path templating shared by images and annotation sidecars.

pub(crate) mod filename;

pub use filename::{
    FilenameResolver, FormatOverrides, ValidationFlags, expand_tokens, normalize_path,
    remove_frame_number_tokens, validate_format_string,
};
