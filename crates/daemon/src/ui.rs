// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `GET /ui` rendering (§4.B). Deliberately minimal server-rendered HTML —
//! its visual design is out of scope, only the data it's handed is.

use devloop_wire::JobRow;

pub fn render_jobs_page(rows: &[JobRow]) -> String {
    let mut body = String::new();
    body.push_str("<table border=\"1\" cellpadding=\"4\">");
    body.push_str(
        "<tr><th>id</th><th>kind</th><th>status</th><th>repo</th><th>issue</th>\
         <th>pr</th><th>iter</th><th>updated</th><th>error</th></tr>",
    );
    for row in rows {
        body.push_str(&format!(
            "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>",
            row.id,
            escape(&row.kind),
            escape(&row.status),
            row.repo.as_deref().map(escape).unwrap_or_default(),
            row.issue_number.map(|n| n.to_string()).unwrap_or_default(),
            row.pr_number.map(|n| n.to_string()).unwrap_or_default(),
            row.iter,
            escape(&row.updated_at),
            row.error.as_deref().map(escape).unwrap_or_default(),
        ));
    }
    body.push_str("</table>");

    format!("<html><head><title>devloop jobs</title></head><body><h1>Jobs</h1>{body}</body></html>")
}

fn escape(s: &str) -> String {
    s.replace('&', "&amp;").replace('<', "&lt;").replace('>', "&gt;")
}

#[cfg(test)]
#[path = "ui_tests.rs"]
mod tests;
