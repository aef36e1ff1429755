// crates/jobboard-server/src/pages.rs
// ============================================================================
// Module: HTML Pages
// Description: Server-rendered pages for the job list and job form.
// Purpose: Render the browsing surface without a template engine.
// Dependencies: jobboard-core
// ============================================================================

//! ## Overview
//! Two pages cover the whole browsing surface: the job list at `/` and the
//! combined create/edit form at `/job/{id}`. Rendering is plain string
//! assembly with HTML escaping of record fields; titles and descriptions are
//! caller-supplied and untrusted.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt::Write;

use jobboard_core::Job;
use jobboard_core::JobId;

// ============================================================================
// SECTION: Rendering
// ============================================================================

/// Renders the job list page.
#[must_use]
pub fn render_job_list(jobs: &[Job]) -> String {
    let mut body = String::new();
    body.push_str("<ul class=\"jobs\">\n");
    for job in jobs {
        let _ = write!(
            body,
            "<li><a href=\"/job/{id}\">{title}</a> \
             <a class=\"remove\" href=\"/remove/{id}\">remove</a><p>{description}</p></li>\n",
            id = job.id,
            title = escape_html(&job.title),
            description = escape_html(&job.description),
        );
    }
    body.push_str("</ul>\n<a href=\"/job/0\">New job</a>\n");
    wrap_page("Jobs", &body)
}

/// Renders the create/edit form. `None` renders an empty creation form.
#[must_use]
pub fn render_job_form(job: Option<&Job>) -> String {
    let (id, title, description) = job.map_or((JobId::UNASSIGNED, String::new(), String::new()), |job| {
        (job.id, escape_html(&job.title), escape_html(&job.description))
    });
    let heading = if id.is_unassigned() { "New job" } else { "Edit job" };
    let body = format!(
        "<h2>{heading}</h2>\n<form method=\"post\" action=\"/job/{id}\">\n<label>Title \
         <input name=\"Title\" value=\"{title}\"></label>\n<label>Description <textarea \
         name=\"Description\">{description}</textarea></label>\n<button \
         type=\"submit\">Save</button>\n</form>\n"
    );
    wrap_page(heading, &body)
}

/// Wraps page content in the shared document shell.
fn wrap_page(title: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html>\n<head><meta \
         charset=\"utf-8\"><title>{title}</title></head>\n<body>\n<h1>Job \
         board</h1>\n{body}</body>\n</html>\n"
    )
}

/// Escapes text for safe interpolation into HTML content and attributes.
#[must_use]
pub fn escape_html(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }
    escaped
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
mod tests {
    #![allow(
        clippy::panic,
        clippy::unwrap_used,
        clippy::expect_used,
        reason = "Test-only assertions are permitted."
    )]

    use jobboard_core::Job;
    use jobboard_core::JobId;

    use super::escape_html;
    use super::render_job_form;
    use super::render_job_list;

    fn job(id: u64, title: &str, description: &str) -> Job {
        Job {
            id: JobId::new(id),
            title: title.to_string(),
            description: description.to_string(),
        }
    }

    #[test]
    fn list_page_links_every_job() {
        let page = render_job_list(&[job(1, "Engineer", "Build things"), job(2, "Writer", "Docs")]);
        assert!(page.contains("href=\"/job/1\""));
        assert!(page.contains("href=\"/job/2\""));
        assert!(page.contains("href=\"/remove/1\""));
        assert!(page.contains("Engineer"));
    }

    #[test]
    fn empty_list_still_offers_creation() {
        let page = render_job_list(&[]);
        assert!(page.contains("href=\"/job/0\""));
    }

    #[test]
    fn creation_form_posts_to_id_zero() {
        let page = render_job_form(None);
        assert!(page.contains("action=\"/job/0\""));
        assert!(page.contains("New job"));
    }

    #[test]
    fn edit_form_carries_the_record() {
        let record = job(7, "Engineer", "Build things");
        let page = render_job_form(Some(&record));
        assert!(page.contains("action=\"/job/7\""));
        assert!(page.contains("value=\"Engineer\""));
        assert!(page.contains(">Build things</textarea>"));
    }

    #[test]
    fn record_fields_are_escaped() {
        let record = job(1, "<script>", "a \"b\" & c");
        let page = render_job_form(Some(&record));
        assert!(page.contains("&lt;script&gt;"));
        assert!(page.contains("a &quot;b&quot; &amp; c"));
        assert!(!page.contains("<script>"));
    }

    #[test]
    fn escape_covers_the_html_metacharacters() {
        assert_eq!(escape_html("<a href='x'>&\"</a>"), "&lt;a href=&#39;x&#39;&gt;&amp;&quot;&lt;/a&gt;");
    }
}
