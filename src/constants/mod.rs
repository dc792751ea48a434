pub mod urls;

/// Key inside a package descriptor's `engines` table that declares the
/// host-version range an extension is compatible with.
pub const ENGINES_KEY: &str = "extman";

/// Descriptor file carried by every extension, and by the extension root
/// itself (where it doubles as the manifest of installed extensions).
pub const DESCRIPTOR_FILE: &str = "package.json";
