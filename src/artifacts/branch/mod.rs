pub mod branch_name;

/// Git-style ref name rules: no leading dot or slash, no `..`, `/.`, trailing slash,
/// `.lock` suffix, `@{`, control characters, spaces or glob/revision metacharacters
pub const INVALID_BRANCH_NAME_REGEX: &str =
    r"^\.|\/\.|\.\.|^\/|\/$|\.lock$|@\{|[\x00-\x20\*:\?\[\\~\^\x7f]";
