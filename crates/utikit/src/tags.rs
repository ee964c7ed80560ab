/// Tag class whose values are filename extensions without the leading dot.
pub const FILENAME_EXTENSION: &str = "public.filename-extension";

/// Tag class whose values are MIME types.
pub const MIME_TYPE: &str = "public.mime-type";

/// Extension that marks a plain, user-browsable folder when paired with a
/// directory.
pub const DIRECTORY_PATH_EXTENSION: &str = "";
