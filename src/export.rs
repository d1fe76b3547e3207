//! Static HTML export
//!
//! Selects every menu entry in flattened order, waits for the page's diagrams
//! to settle, and writes `<out>/<id>.html` from the pure page view.

use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::{SecondsFormat, Utc};

use docview_app::services::{Clipboard, DiagramEngine};
use docview_app::view::SidebarGroup;
use docview_app::{Engine, Message, PageView};
use docview_core::prelude::*;
use docview_render::{escape_href, escape_html};

const INDEX_FILENAME: &str = "index.html";

/// What an export run wrote.
#[derive(Debug, Default)]
pub struct ExportSummary {
    /// Written page files, in menu order
    pub pages: Vec<PathBuf>,
    /// Ids whose diagrams were still rendering when the settle timeout hit
    pub unsettled: Vec<String>,
}

/// File name for a document id. Path separators are flattened so every page
/// lands directly in the output directory.
pub fn page_file_name(id: &str) -> String {
    let stem: String = id
        .chars()
        .map(|c| if matches!(c, '/' | '\\') { '-' } else { c })
        .collect();
    format!("{}.html", stem)
}

/// Export every menu entry into `out_dir`.
pub async fn export_site<D, C>(engine: &mut Engine<D, C>, out_dir: &Path) -> Result<ExportSummary>
where
    D: DiagramEngine + Sync + 'static,
    C: Clipboard + Sync + 'static,
{
    std::fs::create_dir_all(out_dir)
        .with_context(|| format!("Failed to create {}", out_dir.display()))?;

    let timeout = Duration::from_millis(engine.state.settings.export.settle_timeout_ms);
    let generated = Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true);
    let ids: Vec<String> = engine
        .state
        .navigator
        .flattened()
        .entries()
        .iter()
        .map(|entry| entry.id.clone())
        .collect();

    let mut summary = ExportSummary::default();
    for id in &ids {
        engine.process_message(Message::SelectDocument { id: id.clone() });
        if !engine.settle(timeout).await {
            summary.unsettled.push(id.clone());
        }

        let path = out_dir.join(page_file_name(id));
        std::fs::write(&path, render_page(&engine.page_view(), &generated))
            .with_context(|| format!("Failed to write {}", path.display()))?;
        debug!("Exported '{}' to {}", id, path.display());
        summary.pages.push(path);
    }

    if let Some(first) = engine.state.initial_document() {
        let path = out_dir.join(INDEX_FILENAME);
        std::fs::write(&path, render_index(&page_file_name(&first)))
            .with_context(|| format!("Failed to write {}", path.display()))?;
    }

    info!(
        "Exported {} page(s) to {} ({} unsettled)",
        summary.pages.len(),
        out_dir.display(),
        summary.unsettled.len()
    );
    Ok(summary)
}

/// Full HTML document for one page view.
pub fn render_page(view: &PageView, generated: &str) -> String {
    let mut html = String::new();
    html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
    html.push_str("<meta charset=\"utf-8\" />\n");
    html.push_str(
        "<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\" />\n",
    );
    html.push_str(&format!(
        "<meta name=\"generator\" content=\"docview {}\" />\n",
        env!("CARGO_PKG_VERSION")
    ));
    html.push_str(&format!(
        "<meta name=\"generated\" content=\"{}\" />\n",
        escape_html(generated)
    ));
    html.push_str(&format!("<title>{}</title>\n", escape_html(&view.title)));
    html.push_str("</head>\n<body>\n<div class=\"doc-layout\">\n");

    html.push_str(&render_sidebar(&view.sidebar));

    html.push_str("<main class=\"doc-main\">\n");
    html.push_str(&format!(
        "<nav class=\"doc-breadcrumb\"><span>Docs</span> / <span class=\"doc-breadcrumb-current\">{}</span></nav>\n",
        escape_html(&view.breadcrumb)
    ));
    if view.placeholder {
        html.push_str("<article class=\"doc-content doc-placeholder\">\n");
    } else {
        html.push_str("<article class=\"doc-content\">\n");
    }
    html.push_str(&view.content_html);
    html.push_str("</article>\n");
    html.push_str(&render_pager(view));
    html.push_str("</main>\n");

    if !view.outline.is_empty() {
        html.push_str("<aside class=\"doc-aside\">\n<h4>On this page</h4>\n");
        html.push_str(&view.outline_html);
        html.push_str("</aside>\n");
    }

    html.push_str("</div>\n</body>\n</html>\n");
    html
}

fn render_sidebar(groups: &[SidebarGroup]) -> String {
    let mut html = String::from("<nav class=\"doc-sidebar\">\n");
    for group in groups {
        html.push_str(&format!(
            "<div class=\"doc-nav-group\">\n<h4>{}</h4>\n<ul>\n",
            escape_html(&group.title)
        ));
        for item in &group.items {
            let class = if item.active {
                "doc-nav-item doc-nav-active"
            } else {
                "doc-nav-item"
            };
            html.push_str(&format!(
                "<li><a class=\"{}\" href=\"{}\" data-icon=\"{}\">{}</a></li>\n",
                class,
                escape_href(&page_file_name(&item.id)),
                item.icon,
                escape_html(&item.label)
            ));
        }
        html.push_str("</ul>\n</div>\n");
    }
    html.push_str("</nav>\n");
    html
}

fn render_pager(view: &PageView) -> String {
    if view.previous.is_none() && view.next.is_none() {
        return String::new();
    }

    let mut html = String::from("<nav class=\"doc-pager\">\n");
    if let Some(previous) = &view.previous {
        html.push_str(&format!(
            "<a class=\"doc-pager-previous\" href=\"{}\"><span>Previous</span> {}</a>\n",
            escape_href(&page_file_name(&previous.id)),
            escape_html(&previous.label)
        ));
    }
    if let Some(next) = &view.next {
        html.push_str(&format!(
            "<a class=\"doc-pager-next\" href=\"{}\"><span>Next</span> {}</a>\n",
            escape_href(&page_file_name(&next.id)),
            escape_html(&next.label)
        ));
    }
    html.push_str("</nav>\n");
    html
}

fn render_index(target: &str) -> String {
    let target = escape_html(target);
    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\" />\n<meta http-equiv=\"refresh\" content=\"0; url={0}\" />\n<title>Redirecting</title>\n</head>\n<body>\n<a href=\"{0}\">{0}</a>\n</body>\n</html>\n",
        target
    )
}
