//! Repository URL parsing for GitHub and GitLab file links.

use url::Url;

use crate::scm::ScmIntegrationKind;

/// Path segments naming the kind of a GitHub file view.
const GITHUB_URL_TYPES: &[&str] = &["blob", "tree", "edit", "raw"];

/// Owner and name of a hosted repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GitRepository {
    /// User, organization or (for GitLab) full group path.
    pub organization: String,
    /// Repository name without `.git`.
    pub name: String,
}

impl GitRepository {
    /// `/{organization}/{name}`.
    #[must_use]
    pub fn path(&self) -> String {
        format!("/{}/{}", self.organization, self.name)
    }
}

/// Rewrite a GitHub file URL to another view type.
///
/// `https://github.com/o/r/edit/main/docs/index.md` becomes
/// `https://github.com/o/r/blob/main/docs/index.md` for `new_type = "blob"`.
/// URLs without a recognized view segment are returned unchanged.
#[must_use]
pub fn replace_github_url_type(url: &Url, new_type: &str) -> Url {
    let segments: Vec<&str> = url.path_segments().map(Iterator::collect).unwrap_or_default();
    if segments.len() < 3 || !GITHUB_URL_TYPES.contains(&segments[2]) {
        return url.clone();
    }

    let mut replaced = url.clone();
    let path = segments
        .iter()
        .enumerate()
        .map(|(i, s)| if i == 2 { new_type } else { *s })
        .collect::<Vec<_>>()
        .join("/");
    replaced.set_path(&format!("/{path}"));
    replaced
}

/// Extract the repository owning a file URL.
///
/// GitHub repositories are the first two path segments. GitLab repositories
/// end before the `/-/` separator; the last segment is the name and the rest
/// is the group path.
#[must_use]
pub fn parse_repository(url: &Url, kind: ScmIntegrationKind) -> Option<GitRepository> {
    let segments: Vec<&str> = url
        .path_segments()?
        .filter(|s| !s.is_empty())
        .collect();

    let repo = match kind {
        ScmIntegrationKind::GitHub => segments.get(..2)?,
        ScmIntegrationKind::GitLab => {
            let end = segments
                .iter()
                .position(|s| *s == "-")
                .or_else(|| {
                    segments
                        .iter()
                        .skip(2)
                        .position(|s| GITHUB_URL_TYPES.contains(s))
                        .map(|i| i + 2)
                })
                .unwrap_or(segments.len());
            segments.get(..end)?
        }
    };

    let (name, organization) = repo.split_last()?;
    if organization.is_empty() {
        return None;
    }

    Some(GitRepository {
        organization: organization.join("/"),
        name: name.strip_suffix(".git").unwrap_or(name).to_owned(),
    })
}
