//! Static CSS injected into MkDocs pages.
//!
//! The rules adapt the Material for MkDocs theme to the host application:
//! its own header, navigation drawer and footer are hidden, and typography
//! follows the host's variables.

/// Theme variables mapped onto host variables.
pub const VARIABLES: &str = "\
:host {
  --md-default-fg-color: var(--rw-text-primary, #000000de);
  --md-default-bg-color: var(--rw-background, #ffffff);
  --md-primary-fg-color: var(--rw-primary, #1f5493);
  --md-accent-fg-color: var(--rw-secondary, #526cfe);
  --md-typeset-a-color: var(--rw-link, #1f5493);
  --md-code-bg-color: var(--rw-code-background, #f5f5f5);
}";

/// Base element reset.
pub const RESET: &str = "\
body {
  margin: 0;
  --md-text-font-family: inherit;
  --md-code-font-family: monospace;
}
.md-container { display: block; padding-top: 0; }
.md-main__inner { margin-top: 0; }";

/// Page layout: hide theme chrome owned by the host.
pub const LAYOUT: &str = "\
.md-header,
.md-footer,
.md-tabs,
.md-nav__title .md-nav__button,
.md-sidebar--primary .md-sidebar__scrollwrap .md-nav__title { display: none; }
.md-sidebar { position: sticky; top: 0; height: 100vh; }
.md-content { max-width: 100%; margin-left: 0; }
.md-content__button { float: right; margin: 0.4rem 0 0 0.4rem; }";

/// Typography.
pub const TYPESET: &str = "\
.md-typeset { font-size: 1rem; line-height: 1.6; }
.md-typeset h1 { font-size: 2rem; font-weight: 700; margin: 0 0 1rem; }
.md-typeset h2 { font-size: 1.5rem; font-weight: 600; }
.md-typeset a { color: var(--md-typeset-a-color); }
.md-typeset code { background-color: var(--md-code-bg-color); border-radius: 2px; }
.md-typeset table:not([class]) { font-size: 0.875rem; }";

/// Admonitions, tabs and other Markdown extensions.
pub const EXTENSIONS: &str = "\
.md-typeset .admonition,
.md-typeset details { font-size: 0.875rem; border-left-width: 4px; }
.md-typeset .tabbed-labels > label { font-size: 0.875rem; }
.md-typeset .highlight code { font-size: 0.85em; }";

/// Rule groups in injection order.
pub const ALL: &[&str] = &[VARIABLES, RESET, LAYOUT, TYPESET, EXTENSIONS];

/// Built-in rules followed by `extra` rules, one group per line block.
#[must_use]
pub fn css_rules(extra: &[String]) -> String {
    ALL.iter()
        .copied()
        .chain(extra.iter().map(String::as_str))
        .collect::<Vec<_>>()
        .join("\n")
}
