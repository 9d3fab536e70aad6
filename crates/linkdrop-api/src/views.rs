//! Server-rendered HTML pages for the upload form and its result.

use chrono::{DateTime, Utc};
use linkdrop_core::LinkState;

use crate::constants::{UPLOAD_FIELD_NAME, UPLOAD_PATH};
use crate::services::{RecentUpload, UploadOutcome};

/// Escape text for HTML element and attribute contexts.
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn timestamp(at: &DateTime<Utc>) -> String {
    at.format("%Y-%m-%d %H:%M:%S UTC").to_string()
}

fn layout(title: &str, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>{title}</title>
</head>
<body>
<main>
<h1>{title}</h1>
{body}
</main>
</body>
</html>
"#,
        title = escape_html(title),
        body = body
    )
}

/// Upload form settings shown to the user.
pub struct FormContext<'a> {
    pub max_file_size_bytes: u64,
    pub allowed_extensions: &'a [String],
}

fn upload_form(ctx: &FormContext<'_>) -> String {
    let accept = ctx
        .allowed_extensions
        .iter()
        .map(|e| format!(".{}", e))
        .collect::<Vec<_>>()
        .join(",");
    let max_mb = ctx.max_file_size_bytes as f64 / (1024.0 * 1024.0);

    format!(
        r#"<form method="post" action="{action}" enctype="multipart/form-data">
<input type="file" name="{field}" accept="{accept}">
<button type="submit">Upload</button>
</form>
<p class="hint">Allowed: {accept} (max {max_mb:.0} MB). Links expire after upload.</p>
"#,
        action = UPLOAD_PATH,
        field = UPLOAD_FIELD_NAME,
        accept = escape_html(&accept),
        max_mb = max_mb
    )
}

fn recent_list(recent: &[RecentUpload]) -> String {
    if recent.is_empty() {
        return String::new();
    }

    let items: String = recent
        .iter()
        .map(|entry| {
            let name = escape_html(&entry.record.original_name);
            let when = timestamp(&entry.record.uploaded_at);
            match entry.state {
                LinkState::Active => format!(
                    "<li><a href=\"{path}\">{name}</a> uploaded {when}, expires {expires}</li>\n",
                    path = escape_html(&entry.record.share_path()),
                    name = name,
                    when = when,
                    expires = timestamp(&entry.expires_at)
                ),
                LinkState::Expired => {
                    format!("<li>{} uploaded {} (expired)</li>\n", name, when)
                }
            }
        })
        .collect();

    format!(
        "<section class=\"recent\">\n<h2>Recent uploads</h2>\n<ul>\n{}</ul>\n</section>\n",
        items
    )
}

pub fn home_page(ctx: &FormContext<'_>, recent: &[RecentUpload]) -> String {
    layout(
        "Share a file",
        &format!("{}{}", upload_form(ctx), recent_list(recent)),
    )
}

pub fn upload_success_page(outcome: &UploadOutcome) -> String {
    let path = escape_html(&outcome.share_path());
    layout(
        "Upload complete",
        &format!(
            r#"<p class="success">{name} ({size} bytes) is ready to share.</p>
<p>Share link: <a id="share-link" href="{path}">{path}</a></p>
<p>The link expires at {expires}.</p>
<p><a href="/">Upload another file</a></p>
"#,
            name = escape_html(&outcome.record.original_name),
            size = outcome.record.size_bytes,
            path = path,
            expires = timestamp(&outcome.expires_at)
        ),
    )
}

pub fn upload_error_page(ctx: &FormContext<'_>, message: &str, details: Option<&str>) -> String {
    let details = details
        .map(|d| format!("<pre class=\"details\">{}</pre>\n", escape_html(d)))
        .unwrap_or_default();
    layout(
        "Upload failed",
        &format!(
            "<p class=\"error\">{}</p>\n{}{}",
            escape_html(message),
            details,
            upload_form(ctx)
        ),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use linkdrop_core::UploadRecord;

    fn ctx(exts: &[String]) -> FormContext<'_> {
        FormContext {
            max_file_size_bytes: 10 * 1024 * 1024,
            allowed_extensions: exts,
        }
    }

    fn record(name: &str) -> UploadRecord {
        UploadRecord {
            key: "3f2a.png".to_string(),
            original_name: name.to_string(),
            size_bytes: 10,
            content_type: "image/png".to_string(),
            uploaded_at: Utc.with_ymd_and_hms(2024, 7, 1, 10, 0, 0).unwrap(),
            uploaded_by: "anonymous".to_string(),
        }
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html("<a href=\"x\">'&'</a>"),
            "&lt;a href=&quot;x&quot;&gt;&#39;&amp;&#39;&lt;/a&gt;"
        );
    }

    #[test]
    fn test_home_page_renders_form_and_recent() {
        let exts = vec!["png".to_string(), "jpg".to_string()];
        let rec = record("<script>.png");
        let recent = vec![
            RecentUpload {
                expires_at: rec.uploaded_at + Duration::minutes(10),
                state: LinkState::Active,
                record: rec.clone(),
            },
            RecentUpload {
                expires_at: rec.uploaded_at + Duration::minutes(10),
                state: LinkState::Expired,
                record: record("old.png"),
            },
        ];
        let html = home_page(&ctx(&exts), &recent);

        assert!(html.contains("action=\"/Home/Upload\""));
        assert!(html.contains("name=\"file\""));
        assert!(html.contains("accept=\".png,.jpg\""));
        assert!(html.contains("href=\"/download/3f2a.png\""));
        assert!(html.contains("&lt;script&gt;.png"));
        assert!(!html.contains("<script>"));
        assert!(html.contains("old.png uploaded 2024-07-01 10:00:00 UTC (expired)"));
    }

    #[test]
    fn test_home_page_without_recent_uploads() {
        let exts = vec!["png".to_string()];
        let html = home_page(&ctx(&exts), &[]);
        assert!(!html.contains("Recent uploads"));
    }

    #[test]
    fn test_error_page_shows_message() {
        let exts = vec!["png".to_string()];
        let html = upload_error_page(&ctx(&exts), "Unsupported file type '.exe'", None);
        assert!(html.contains("Unsupported file type &#39;.exe&#39;"));
        assert!(!html.contains("class=\"details\""));
    }
}
