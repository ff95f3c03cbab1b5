//! End-to-end tests for the composed page transformers.

use std::cell::RefCell;
use std::rc::Rc;

use pretty_assertions::assert_eq;
use rw_config::{Config, ConfigOverrides};
use rw_dom::{Event, EventType, Modifiers, ShadowDom};
use rw_storage::{EntityName, MockStorage, StorageErrorKind};
use rw_techdocs::{
    ContentTransformers, Navigator, ReaderState, ScmIntegrationKind, ScmIntegrationRegistry,
    TransformError, Window,
};
use url::Url;

const API_ORIGIN: &str = "http://localhost:7007/api/techdocs";

const LOCATION: &str = "http://localhost:3000/docs/default/component/backstage/";

/// Inline head script emitted by mkdocs-material.
const MATERIAL_SCRIPT: &str = concat!(
    r#"__md_scope=new URL(".",location),"#,
    "__md_hash=e=>[...e].reduce((e,_)=>(e<<5)-e+_.charCodeAt(0),0),",
    r#"__md_get=(e,_=localStorage,t=__md_scope)=>JSON.parse(_.getItem(t.pathname+"."+e)),"#,
    r#"__md_sep="&amp;""#,
);

const MATERIAL_STYLE: &str = r#":root{--md-text-font:"Roboto"}.md-typeset a > code{color:inherit}"#;

#[derive(Default)]
struct Host {
    location: RefCell<String>,
    opened: RefCell<Vec<String>>,
    navigated: RefCell<Vec<String>>,
}

struct HostWindow(Rc<Host>);

impl Window for HostWindow {
    fn location(&self) -> Url {
        Url::parse(&self.0.location.borrow()).unwrap()
    }

    fn open(&self, url: &str, target: &str) {
        assert_eq!(target, "_blank");
        self.0.opened.borrow_mut().push(url.to_owned());
    }
}

struct HostNavigator(Rc<Host>);

impl Navigator for HostNavigator {
    fn navigate(&self, to: &str) {
        self.0.navigated.borrow_mut().push(to.to_owned());
    }
}

struct Fixture {
    host: Rc<Host>,
    storage: Rc<MockStorage>,
    transformers: ContentTransformers<MockStorage>,
}

fn fixture_with(storage: MockStorage, config: &Config) -> Fixture {
    let host = Rc::new(Host::default());
    *host.location.borrow_mut() = LOCATION.to_owned();
    let storage = Rc::new(storage.with_api_origin(API_ORIGIN));
    let integrations = ScmIntegrationRegistry::new()
        .with(ScmIntegrationKind::GitHub, "github.com")
        .with(ScmIntegrationKind::GitLab, "gitlab.com");
    let transformers = ContentTransformers::new(
        Rc::clone(&storage),
        Rc::new(HostWindow(Rc::clone(&host))),
        Rc::new(HostNavigator(Rc::clone(&host))),
        Rc::new(integrations),
        config,
    );
    Fixture {
        host,
        storage,
        transformers,
    }
}

fn fixture() -> Fixture {
    fixture_with(MockStorage::new(), &Config::default())
}

fn reader() -> ReaderState {
    ReaderState::new(EntityName::new("Component", "default", "backstage"), "")
}

fn page(body: &str) -> ShadowDom {
    ShadowDom::parse(&format!(
        concat!(
            r#"<html><head><link rel="stylesheet" "#,
            r#"href="{}/static/docs/default/Component/backstage/assets/main.css">"#,
            "</head><body>{}</body></html>",
        ),
        API_ORIGIN,
        body,
    ))
}

fn material_page() -> ShadowDom {
    ShadowDom::parse(&format!(
        concat!(
            "<!doctype html>\n",
            r#"<html lang="en"><head><meta charset="utf-8">"#,
            "<script>{script}</script>\n",
            r#"<link rel="stylesheet" "#,
            r#"href="{origin}/static/docs/default/Component/backstage/assets/stylesheets/main.css">"#,
            "\n<style>{style}</style></head>\n",
            r#"<body dir="ltr"><div class="md-container"><main class="md-main">"#,
            r#"<article class="md-content__inner md-typeset">"#,
            r#"<a href="https://github.com/backstage/backstage/edit/master/docs/index.md" "#,
            r#"title="Edit this page" class="md-content__button md-icon">Edit</a>"#,
            "\n",
            r#"<h1 id="getting-started">Getting Started<a class="headerlink" "#,
            r##"href="#getting-started" title="Permanent link">&para;</a></h1>"##,
            "\n<p>Tom &amp; Jerry &copy; 2024 &lt;draft&gt;</p>\n",
            r#"<p><img id="logo" src="assets/logo.png" alt="Logo &amp; mark"></p>"#,
            "</article></main></div></body></html>",
        ),
        script = MATERIAL_SCRIPT,
        origin = API_ORIGIN,
        style = MATERIAL_STYLE,
    ))
}

fn attr(dom: &ShadowDom, selector: &str, name: &str) -> Option<String> {
    dom.query_selector(selector).unwrap().unwrap().attribute(name)
}

#[tokio::test]
async fn test_material_page_waits_for_stylesheets() {
    let dom = material_page();
    let mut fixture = fixture();

    assert!(fixture.transformers.render(Some(&dom), &reader()).await.unwrap());

    let stylesheets = dom.query_selector_all(r#"head > link[rel="stylesheet"]"#).unwrap();
    assert_eq!(stylesheets.len(), 1);
    let stylesheet = &stylesheets[0];
    assert_eq!(dom.root().style_property("opacity").as_deref(), Some("0"));
    assert_eq!(stylesheet.listener_count(&EventType::Load), 1);

    let script = dom.query_selector("head > script").unwrap().unwrap();
    assert_eq!(script.text_content(), MATERIAL_SCRIPT);
    let page_style = dom.query_selector("head > style").unwrap().unwrap();
    assert_eq!(page_style.text_content(), MATERIAL_STYLE);
    assert_eq!(dom.query_selector_all("head > style").unwrap().len(), 2);

    let text = dom.query_selector("article > p").unwrap().unwrap().text_content();
    assert_eq!(text, "Tom & Jerry \u{a9} 2024 <draft>");
    assert_eq!(attr(&dom, "#logo", "alt").as_deref(), Some("Logo & mark"));
    let logo = format!("{API_ORIGIN}/static/docs/default/Component/backstage/assets/logo.png");
    assert_eq!(attr(&dom, "#logo", "src"), Some(logo));

    let href = attr(&dom, "#git-feedback-link a", "href").unwrap();
    assert!(href.contains("?title=Documentation%20Feedback%3A%20Getting%20Started&body="));

    stylesheet.dispatch_event(Event::load());

    assert_eq!(dom.root().style_property("opacity"), None);
    assert_eq!(stylesheet.listener_count(&EventType::Load), 0);
    assert_eq!(script.text_content(), MATERIAL_SCRIPT);
}

#[tokio::test]
async fn test_external_anchor_opens_in_new_tab() {
    let dom = page(r#"<a id="ext" href="https://backstage.io/docs">Backstage</a>"#);
    let mut fixture = fixture();

    assert!(fixture.transformers.render(Some(&dom), &reader()).await.unwrap());

    assert_eq!(attr(&dom, "#ext", "target").as_deref(), Some("_blank"));
}

#[tokio::test]
async fn test_internal_anchor_click_navigates_in_app() {
    let dom = page(r##"<a id="int" href="guide/#install">Guide</a>"##);
    let mut fixture = fixture();
    fixture.transformers.render(Some(&dom), &reader()).await.unwrap();

    // base URL pass made the href absolute on the current origin
    assert_eq!(
        attr(&dom, "#int", "href").as_deref(),
        Some("http://localhost:3000/docs/default/component/backstage/guide/#install")
    );

    let event = dom.query_selector("#int").unwrap().unwrap().click();

    assert!(event.default_prevented());
    assert_eq!(
        *fixture.host.navigated.borrow(),
        vec!["/docs/default/component/backstage/guide/#install"]
    );
    assert!(fixture.host.opened.borrow().is_empty());
}

#[tokio::test]
async fn test_modifier_click_opens_new_tab() {
    let dom = page(r#"<a id="int" href="/catalog">Catalog</a>"#);
    let mut fixture = fixture();
    fixture.transformers.render(Some(&dom), &reader()).await.unwrap();

    let anchor = dom.query_selector("#int").unwrap().unwrap();
    let event = anchor.click_with(Modifiers {
        meta: true,
        ..Modifiers::default()
    });

    assert!(event.default_prevented());
    assert_eq!(*fixture.host.opened.borrow(), vec!["/catalog"]);
    assert!(fixture.host.navigated.borrow().is_empty());
}

#[tokio::test]
async fn test_download_and_foreign_anchors_do_not_navigate() {
    let dom = page(concat!(
        r#"<a id="dl" href="files/report.pdf" download>Report</a>"#,
        r#"<a id="ext" href="https://example.com/x">X</a>"#,
    ));
    let storage = MockStorage::new()
        .with_base_url("files/report.pdf", "http://localhost:3000/static/report.pdf");
    let mut fixture = fixture_with(storage, &Config::default());
    fixture.transformers.render(Some(&dom), &reader()).await.unwrap();

    // download anchors take the storage value verbatim
    assert_eq!(
        attr(&dom, "#dl", "href").as_deref(),
        Some("http://localhost:3000/static/report.pdf")
    );

    for id in ["#dl", "#ext"] {
        let event = dom.query_selector(id).unwrap().unwrap().click();
        assert!(!event.default_prevented());
    }
    assert!(fixture.host.navigated.borrow().is_empty());
}

#[tokio::test]
async fn test_origin_relative_anchor_ignores_lookup_value() {
    let dom = page(r#"<a id="a" href="/docs/backstage">Docs</a>"#);
    let storage =
        MockStorage::new().with_base_url("/docs/backstage", "https://storage.example.com/nope");
    let mut fixture = fixture_with(storage, &Config::default());
    *fixture.host.location.borrow_mut() = "http://localhost/".to_owned();

    fixture.transformers.render(Some(&dom), &reader()).await.unwrap();

    assert_eq!(attr(&dom, "#a", "href").as_deref(), Some("http://localhost/docs/backstage"));
    assert!(
        fixture
            .storage
            .requests()
            .iter()
            .any(|r| r.old_base_url == "/docs/backstage")
    );
}

#[tokio::test]
async fn test_feedback_link_for_github_edit_link() {
    let dom = page(concat!(
        r#"<article><a title="Edit this page" "#,
        r#"href="https://github.com/backstage/backstage/edit/master/docs/index.md">Edit</a>"#,
        "<h1>Getting Started</h1></article>",
    ));
    let mut fixture = fixture();

    fixture.transformers.render(Some(&dom), &reader()).await.unwrap();

    let href = attr(&dom, "#git-feedback-link a", "href").unwrap();
    assert!(href.starts_with(concat!(
        "https://github.com/backstage/backstage/issues/new",
        "?title=Documentation%20Feedback%3A%20Getting%20Started&body=Page%20source%3A%0A",
    )));
    assert!(href.contains(
        "https%3A%2F%2Fgithub.com%2Fbackstage%2Fbackstage%2Fedit%2Fmaster%2Fdocs%2Findex.md"
    ));
}

#[tokio::test]
async fn test_feedback_link_for_gitlab_edit_link() {
    let dom = page(concat!(
        r#"<article><a title="Edit this page" "#,
        r#"href="https://gitlab.com/group/docs/-/edit/main/docs/index.md">Edit</a>"#,
        "<h1>Runbook</h1></article>",
    ));
    let mut fixture = fixture();

    fixture.transformers.render(Some(&dom), &reader()).await.unwrap();

    let href = attr(&dom, "#git-feedback-link a", "href").unwrap();
    assert!(href.starts_with(concat!(
        "https://gitlab.com/group/docs/issues/new",
        "?issue[title]=Documentation%20Feedback%3A%20Runbook&issue[description]=",
    )));
}

#[tokio::test]
async fn test_no_feedback_link_for_unknown_host() {
    let dom = page(concat!(
        r#"<article><a title="Edit this page" "#,
        r#"href="https://bitbucket.org/o/r/src/main/docs/index.md">Edit</a><h1>T</h1></article>"#,
    ));
    let mut fixture = fixture();

    fixture.transformers.render(Some(&dom), &reader()).await.unwrap();

    assert!(dom.query_selector("#git-feedback-link").unwrap().is_none());
}

#[tokio::test]
async fn test_feedback_link_disabled_by_config() {
    let dom = page(concat!(
        r#"<article><a title="Edit this page" "#,
        r#"href="https://github.com/o/r/edit/main/docs/index.md">Edit</a><h1>T</h1></article>"#,
    ));
    let mut config = Config::default();
    config.feedback.enabled = false;
    let mut fixture = fixture_with(MockStorage::new(), &config);

    fixture.transformers.render(Some(&dom), &reader()).await.unwrap();

    assert!(dom.query_selector("#git-feedback-link").unwrap().is_none());
}

#[tokio::test]
async fn test_content_hidden_until_both_stylesheets_load() {
    let dom = ShadowDom::parse(&format!(
        concat!(
            r#"<head><link id="s1" rel="stylesheet" href="{origin}/a.css">"#,
            r#"<link id="s2" rel="stylesheet" href="{origin}/b.css"></head>"#,
            "<body><p>x</p></body>",
        ),
        origin = API_ORIGIN,
    ));
    let mut fixture = fixture();

    fixture.transformers.render(Some(&dom), &reader()).await.unwrap();
    assert_eq!(dom.root().style_property("opacity").as_deref(), Some("0"));

    dom.query_selector("#s1").unwrap().unwrap().dispatch_event(Event::load());
    assert_eq!(dom.root().style_property("opacity").as_deref(), Some("0"));

    dom.query_selector("#s2").unwrap().unwrap().dispatch_event(Event::load());
    assert_eq!(dom.root().style_property("opacity"), None);
}

#[tokio::test]
async fn test_repeated_render_does_not_duplicate_listeners() {
    let dom = page(r#"<a id="a" href="https://example.com">a</a><a href="/b">b</a>"#);
    let mut fixture = fixture();

    fixture.transformers.render(Some(&dom), &reader()).await.unwrap();
    let anchor = dom.query_selector("#a").unwrap().unwrap();
    let clicks = anchor.listener_count(&EventType::Click);
    let target = anchor.attribute("target");

    fixture.transformers.render(Some(&dom), &reader()).await.unwrap();

    assert_eq!(clicks, 1);
    assert_eq!(anchor.listener_count(&EventType::Click), 1);
    assert_eq!(anchor.attribute("target"), target);
}

#[tokio::test]
async fn test_page_change_reruns_passes() {
    let dom = page(r#"<img src="img/a.png">"#);
    let mut fixture = fixture();

    fixture.transformers.render(Some(&dom), &reader()).await.unwrap();
    let next = ReaderState::new(reader().entity, "guide/");
    fixture.transformers.render(Some(&dom), &next).await.unwrap();

    let paths: Vec<String> = fixture.storage.requests().into_iter().map(|r| r.path).collect();
    assert!(paths.contains(&String::new()));
    assert!(paths.contains(&"guide/".to_owned()));
}

#[tokio::test]
async fn test_gate_released_and_error_returned_on_lookup_failure() {
    let dom = page(r#"<img src="broken.png"><a id="ext" href="https://example.com">x</a>"#);
    let storage =
        MockStorage::new().with_base_url_failure("broken.png", StorageErrorKind::NotFound);
    let mut fixture = fixture_with(storage, &Config::default());

    let err = fixture.transformers.render(Some(&dom), &reader()).await.unwrap_err();

    assert!(matches!(err, TransformError::Storage(_)));
    assert!(fixture.transformers.gate().is_ready());
    assert_eq!(attr(&dom, "#ext", "target").as_deref(), Some("_blank"));
}

#[tokio::test]
async fn test_no_document_renders_children() {
    let mut fixture = fixture();

    assert!(fixture.transformers.render(None, &reader()).await.unwrap());
    assert!(fixture.storage.requests().is_empty());
}

#[tokio::test]
async fn test_teardown_removes_listeners() {
    let dom = page(r#"<a href="/a">a</a>"#);
    let mut fixture = fixture();
    fixture.transformers.render(Some(&dom), &reader()).await.unwrap();
    assert!(dom.listener_count() > 0);

    fixture.transformers.teardown();

    assert_eq!(dom.listener_count(), 0);
}

#[tokio::test]
async fn test_from_config_uses_configured_integrations() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("rw.toml");
    std::fs::write(&path, "[[integrations.gitlab]]\nhost = \"git.example.com\"\n").unwrap();
    let overrides = ConfigOverrides {
        api_origin: Some("https://backstage.example.com/api/techdocs".to_owned()),
        extra_style_rules: vec![".x { color: red; }".to_owned()],
        ..Default::default()
    };
    let config = Config::load(Some(&path), Some(&overrides)).unwrap();

    let host = Rc::new(Host::default());
    *host.location.borrow_mut() = LOCATION.to_owned();
    let mut transformers = ContentTransformers::from_config(
        &config,
        Rc::new(HostWindow(Rc::clone(&host))),
        Rc::new(HostNavigator(host)),
    );
    assert!(!transformers.gate().is_ready());

    let dom = ShadowDom::parse(concat!(
        r#"<article><a title="Edit this page" "#,
        r#"href="https://git.example.com/team/docs/-/edit/main/index.md">Edit</a>"#,
        "<h1>Home</h1></article>",
    ));
    assert!(transformers.render(Some(&dom), &reader()).await.unwrap());

    let href = attr(&dom, "#git-feedback-link a", "href").unwrap();
    assert!(href.starts_with("https://git.example.com/team/docs/issues/new?issue[title]="));
    let style = dom.query_selector("head > style").unwrap().unwrap();
    assert!(style.text_content().ends_with(".x { color: red; }"));
}
