//! HTML directory listings for the static file server

use std::fmt::Write as _;
use std::io;
use std::path::Path;
use tokio::fs;

/// Render a sorted listing of `dir`; subdirectories carry a trailing slash
pub async fn render_listing(dir: &Path) -> io::Result<String> {
    let mut entries = fs::read_dir(dir).await?;
    let mut names = Vec::new();
    while let Some(entry) = entries.next_entry().await? {
        let mut name = entry.file_name().to_string_lossy().into_owned();
        if entry.file_type().await.is_ok_and(|t| t.is_dir()) {
            name.push('/');
        }
        names.push(name);
    }
    names.sort();

    let mut html = String::from(
        "<!doctype html>\n<meta name=\"viewport\" content=\"width=device-width\">\n<pre>\n",
    );
    for name in &names {
        let _ = writeln!(html, "<a href=\"{}\">{}</a>", href(name), escape_html(name));
    }
    html.push_str("</pre>\n");
    Ok(html)
}

/// Relative link target, percent-encoded except for the directory slash
fn href(name: &str) -> String {
    let (stem, slash) = name
        .strip_suffix('/')
        .map_or((name, ""), |stem| (stem, "/"));
    format!("{}{slash}", urlencoding::encode(stem))
}

fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&#34;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}
