//! "Leave feedback" link next to the MkDocs "Edit this page" button.
//!
//! The edit link points at the page source in a GitHub or GitLab repository.
//! The feedback link opens a new issue in the same repository, pre-filled with
//! the page title and the source URL.

use std::sync::LazyLock;

use rw_dom::{AdjacentPosition, Selector, ShadowDom};
use rw_storage::encode_uri_component;
use url::Url;

use crate::error::TransformError;
use crate::git_url::{parse_repository, replace_github_url_type};
use crate::portal::Portal;
use crate::reader::Window;
use crate::scm::{ScmIntegrationKind, ScmIntegrations};

/// Id of the element the feedback link is mounted into.
pub const FEEDBACK_LINK_ID: &str = "git-feedback-link";

static EDIT_LINK: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse(r#"[title="Edit this page"]"#).expect("invalid edit link selector")
});

static FEEDBACK_MOUNT: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("#git-feedback-link").expect("invalid feedback selector"));

static PAGE_TITLE: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("article>h1").expect("invalid title selector"));

/// Material "feedback outlined" icon.
const FEEDBACK_ICON: &str = concat!(
    r#"<svg class="MuiSvgIcon-root" focusable="false" viewBox="0 0 24 24" aria-hidden="true">"#,
    r#"<path d="M20 2H4c-1.1 0-1.99.9-1.99 2L2 22l4-4h14c1.1 0 2-.9 2-2V4c0-1.1-.9-2-2-2zm0 14H5.17l-.59.59-.58.58V4h16v12zm-9-4h2v2h-2zm0-6h2v4h-2z"></path>"#,
    "</svg>",
);

fn escape_attribute(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('"', "&quot;")
        .replace('<', "&lt;")
}

/// Issue-creation URL for feedback on the page whose source is `edit_url`.
///
/// Returns `None` when no repository can be read from `edit_url`.
#[must_use]
pub fn feedback_href(edit_url: &Url, kind: ScmIntegrationKind, title: &str) -> Option<String> {
    let issue_title = encode_uri_component(&format!("Documentation Feedback: {title}"));
    let issue_desc = encode_uri_component(&format!("Page source:\n{edit_url}\n\nFeedback:"));

    let git_url = match kind {
        ScmIntegrationKind::GitHub => replace_github_url_type(edit_url, "blob"),
        ScmIntegrationKind::GitLab => edit_url.clone(),
    };
    let repository = parse_repository(&git_url, kind)?;

    let params = match kind {
        ScmIntegrationKind::GitHub => format!("title={issue_title}&body={issue_desc}"),
        ScmIntegrationKind::GitLab => {
            format!("issue[title]={issue_title}&issue[description]={issue_desc}")
        }
    };

    Some(format!(
        "{}{}/issues/new?{params}",
        edit_url.origin().ascii_serialization(),
        repository.path(),
    ))
}

/// Text of the first child node of the page's top heading.
fn page_title(dom: &ShadowDom) -> String {
    dom.select_first(&PAGE_TITLE)
        .and_then(|h1| h1.first_child_text())
        .unwrap_or_default()
}

/// Mount the feedback link before the page's edit link.
///
/// Returns `Ok(None)` when the page has no edit link, the edit link's host is
/// not a GitHub or GitLab integration, or no repository can be read from it.
///
/// # Errors
///
/// Returns [`TransformError::Dom`] if an existing mount point contains the
/// edit link and cannot be moved before it.
pub fn render_feedback_link(
    dom: &ShadowDom,
    window: &dyn Window,
    integrations: &dyn ScmIntegrations,
) -> Result<Option<Portal>, TransformError> {
    let Some(edit_link) = dom.select_first(&EDIT_LINK) else {
        return Ok(None);
    };
    let Some(edit_href) = edit_link.attribute("href").filter(|href| !href.is_empty()) else {
        return Ok(None);
    };

    let edit_url = match window.location().join(&edit_href) {
        Ok(url) => url,
        Err(e) => {
            tracing::warn!(
                href = %edit_href,
                error = %e,
                "Skipping feedback link for unparsable edit link"
            );
            return Ok(None);
        }
    };

    let Some(integration) = integrations.by_url(&edit_url) else {
        return Ok(None);
    };

    let title = page_title(dom);
    let Some(href) = feedback_href(&edit_url, integration.kind, &title) else {
        tracing::warn!(
            url = %edit_url,
            kind = %integration.kind,
            "Edit link does not name a repository"
        );
        return Ok(None);
    };

    let mount = dom.select_first(&FEEDBACK_MOUNT).unwrap_or_else(|| {
        let div = dom.create_element("div");
        div.set_attribute("id", FEEDBACK_LINK_ID);
        div
    });
    edit_link.insert_adjacent_element(AdjacentPosition::BeforeBegin, &mount)?;

    let html = format!(
        concat!(
            r#"<a class="md-content__button md-icon" title="Leave feedback for this page" "#,
            r#"href="{href}" style="padding-left: 5px">{icon}</a>"#,
        ),
        href = escape_attribute(&href),
        icon = FEEDBACK_ICON,
    );
    let portal = Portal::mount(mount, &html);

    tracing::debug!(kind = %integration.kind, href = %href, "Mounted feedback link");
    Ok(Some(portal))
}
