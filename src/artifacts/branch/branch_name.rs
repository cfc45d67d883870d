use crate::artifacts::branch::INVALID_BRANCH_NAME_REGEX;
use crate::errors::DvcError;
use anyhow::Context;

pub const REF_PREFIX: &str = "refs/heads/";

/// Validated branch name, e.g. `main` or `feature/login`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, PartialOrd, Ord)]
pub struct BranchName(String);

impl BranchName {
    pub fn try_parse(name: impl Into<String>) -> anyhow::Result<Self> {
        let name = name.into();

        let re = regex::Regex::new(INVALID_BRANCH_NAME_REGEX)
            .with_context(|| format!("invalid branch name regex: {INVALID_BRANCH_NAME_REGEX}"))?;

        if name.is_empty() || name == "HEAD" || re.is_match(&name) {
            return Err(DvcError::InvalidBranchName(name).into());
        }

        Ok(Self(name))
    }

    /// Extract the branch from a symbolic ref target such as `refs/heads/main`
    pub fn try_parse_ref_path(ref_path: &str) -> anyhow::Result<Self> {
        let name = ref_path.strip_prefix(REF_PREFIX).with_context(|| {
            format!("symbolic ref must start with '{REF_PREFIX}', got '{ref_path}'")
        })?;

        Self::try_parse(name)
    }

    /// `refs/heads/<name>`
    pub fn ref_path(&self) -> String {
        format!("{REF_PREFIX}{}", self.0)
    }
}

impl AsRef<str> for BranchName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for BranchName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
